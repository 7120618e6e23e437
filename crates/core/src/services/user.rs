//! User and session service.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use lapor_common::{AppError, AppResult, FieldError, IdGenerator};
use lapor_db::{
    entities::user::{self, UserRole},
    repositories::{UnitWorkRepository, UserRepository},
};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use validator::Validate;

use super::require_admin;

/// Inserts tried before giving up on a free user number.
const USER_NUMBER_ATTEMPTS: u32 = 3;

/// Input for citizen self-registration.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct SignupInput {
    #[validate(length(min = 3, max = 50))]
    pub name: String,

    #[validate(email, length(max = 50))]
    pub email: String,

    #[validate(length(min = 8, max = 255))]
    pub password: String,
}

/// Input for signing in.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct SigninInput {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1))]
    pub password: String,
}

/// Input for an admin creating officer or admin accounts.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct CreateStaffInput {
    #[validate(length(min = 3, max = 50))]
    pub name: String,

    #[validate(email, length(max = 50))]
    pub email: String,

    #[validate(length(min = 8, max = 255))]
    pub password: String,

    pub role: UserRole,

    /// Required for officers.
    pub unit_work_id: Option<String>,
}

/// A signed-in user and the bearer token issued for the session.
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    pub token: String,
    pub user: user::Model,
}

/// User service for accounts and bearer tokens.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    unit_work_repo: UnitWorkRepository,
    id_gen: IdGenerator,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(user_repo: UserRepository, unit_work_repo: UnitWorkRepository) -> Self {
        Self {
            user_repo,
            unit_work_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Register a citizen account.
    pub async fn signup(&self, input: SignupInput) -> AppResult<user::Model> {
        input.validate()?;
        self.insert(input.name, &input.email, &input.password, UserRole::User, None)
            .await
    }

    /// Create an officer or admin account. Admins only.
    ///
    /// Only a superadmin may create another superadmin.
    pub async fn create_staff(
        &self,
        caller: &user::Model,
        input: CreateStaffInput,
    ) -> AppResult<user::Model> {
        input.validate()?;
        require_admin(caller)?;

        if input.role == UserRole::SuperAdmin && caller.role != UserRole::SuperAdmin {
            return Err(AppError::Forbidden(
                "only a superadmin can create superadmins".to_string(),
            ));
        }

        let unit_work_id = match input.unit_work_id.as_deref() {
            Some(id) => Some(self.unit_work_repo.get_by_id(id).await?.id),
            None if input.role == UserRole::Officer => {
                return Err(AppError::Validation(vec![FieldError::new(
                    "unit_work_id",
                    "required",
                    "officers must belong to a unit work",
                )]));
            }
            None => None,
        };

        self.insert(
            input.name,
            &input.email,
            &input.password,
            input.role,
            unit_work_id,
        )
        .await
    }

    async fn insert(
        &self,
        name: String,
        email: &str,
        password: &str,
        role: UserRole,
        unit_work_id: Option<String>,
    ) -> AppResult<user::Model> {
        if self.user_repo.find_by_email(email).await?.is_some() {
            return Err(AppError::Conflict("email already registered".to_string()));
        }

        let password_hash = hash_password(password)?;
        let email = email.to_lowercase();
        let id = self.id_gen.generate();
        let guid = self.id_gen.generate_uuid_v4();

        // A concurrent signup can take the same number between read and insert.
        for attempt in 1..=USER_NUMBER_ATTEMPTS {
            let user_number = self.user_repo.next_user_number().await?;
            let now = chrono::Utc::now();

            let model = user::ActiveModel {
                id: Set(id.clone()),
                guid: Set(guid.clone()),
                user_number: Set(user_number),
                name: Set(name.clone()),
                email: Set(email.clone()),
                password: Set(password_hash.clone()),
                role: Set(role),
                image: Set(None),
                unit_work_id: Set(unit_work_id.clone()),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
            };

            match self.user_repo.create(model).await {
                Ok(user) => {
                    info!(user_id = %user.id, role = user.role.as_str(), "User created");
                    return Ok(user);
                }
                Err(AppError::Conflict(_)) => {
                    if self.user_repo.find_by_email(&email).await?.is_some() {
                        return Err(AppError::Conflict("email already registered".to_string()));
                    }
                    debug!(attempt, user_number, "User number taken, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::Conflict(
            "could not allocate a user number, try again".to_string(),
        ))
    }

    /// Check credentials and issue a new bearer token.
    pub async fn signin(&self, input: SigninInput) -> AppResult<AuthSession> {
        input.validate()?;

        let user = self
            .user_repo
            .find_by_email(&input.email)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !verify_password(&input.password, &user.password)? {
            return Err(AppError::Unauthorized);
        }

        let token = self.id_gen.generate_token();
        self.user_repo.add_token(&user.id, &token).await?;

        Ok(AuthSession { token, user })
    }

    /// Revoke the presented token.
    pub async fn signout(&self, token: &str) -> AppResult<()> {
        if self.user_repo.remove_token(token).await? {
            Ok(())
        } else {
            Err(AppError::Unauthorized)
        }
    }

    /// Authenticate a user by token.
    pub async fn authenticate_by_token(&self, token: &str) -> AppResult<user::Model> {
        self.user_repo
            .find_by_token(token)
            .await?
            .ok_or(AppError::Unauthorized)
    }

    /// Get a user by ID.
    pub async fn get(&self, id: &str) -> AppResult<user::Model> {
        self.user_repo.get_by_id(id).await
    }

    /// Look up any user. Admins only.
    pub async fn get_as_admin(&self, caller: &user::Model, id: &str) -> AppResult<user::Model> {
        require_admin(caller)?;
        self.user_repo.get_by_id(id).await
    }
}

/// Hash a password using Argon2.
fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against a stored hash.
fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn service(db: MockDatabase) -> UserService {
        let db = Arc::new(db.into_connection());
        UserService::new(
            UserRepository::new(Arc::clone(&db)),
            UnitWorkRepository::new(db),
        )
    }

    fn admin() -> user::Model {
        user::Model {
            id: "admin".to_string(),
            guid: "guid".to_string(),
            user_number: 1,
            name: "Admin".to_string(),
            email: "admin@example.com".to_string(),
            password: String::new(),
            role: UserRole::Admin,
            image: None,
            unit_work_id: None,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[test]
    fn test_hash_password() {
        let hash = hash_password("rahasia123").unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("rahasia123", &hash).unwrap());
        assert!(!verify_password("salah", &hash).unwrap());
    }

    #[test]
    fn test_verify_password_invalid_hash() {
        assert!(verify_password("test", "invalid_hash").is_err());
    }

    #[tokio::test]
    async fn test_signup_lists_every_invalid_field() {
        let service = service(MockDatabase::new(DatabaseBackend::Postgres));
        let input = SignupInput {
            name: "Al".to_string(),
            email: "not-an-email".to_string(),
            password: "short".to_string(),
        };

        let err = service.signup(input).await.unwrap_err();

        let fields: Vec<&str> = err
            .field_errors()
            .unwrap()
            .iter()
            .map(|f| f.field.as_str())
            .collect();
        assert_eq!(fields, vec!["email", "name", "password"]);
    }

    #[tokio::test]
    async fn test_signup_duplicate_email_conflicts() {
        let mut existing = admin();
        existing.email = "budi@example.com".to_string();
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[existing]]),
        );

        let input = SignupInput {
            name: "Budi".to_string(),
            email: "Budi@Example.com".to_string(),
            password: "rahasia123".to_string(),
        };
        let err = service.signup(input).await.unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_create_officer_requires_unit_work() {
        let service = service(MockDatabase::new(DatabaseBackend::Postgres));
        let input = CreateStaffInput {
            name: "Petugas".to_string(),
            email: "petugas@example.com".to_string(),
            password: "rahasia123".to_string(),
            role: UserRole::Officer,
            unit_work_id: None,
        };

        let err = service.create_staff(&admin(), input).await.unwrap_err();

        assert_eq!(err.field_errors().unwrap()[0].field, "unit_work_id");
    }

    #[tokio::test]
    async fn test_admin_cannot_create_superadmin() {
        let service = service(MockDatabase::new(DatabaseBackend::Postgres));
        let input = CreateStaffInput {
            name: "Root".to_string(),
            email: "root@example.com".to_string(),
            password: "rahasia123".to_string(),
            role: UserRole::SuperAdmin,
            unit_work_id: None,
        };

        let err = service.create_staff(&admin(), input).await.unwrap_err();

        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_authenticate_by_unknown_token() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()]),
        );

        let err = service.authenticate_by_token("nope").await.unwrap_err();

        assert!(matches!(err, AppError::Unauthorized));
    }
}
