//! User repository.

use std::sync::Arc;

use super::constraint_error;
use crate::entities::{User, UserToken, user, user_token};
use lapor_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, JoinType, QueryFilter,
    QuerySelect, RelationTrait, Set,
};

/// User repository for database operations.
#[derive(Clone)]
pub struct UserRepository {
    db: Arc<DatabaseConnection>,
}

impl UserRepository {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<user::Model>> {
        User::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a user by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<user::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {id}")))
    }

    /// Find users by IDs.
    pub async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<user::Model>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        User::find()
            .filter(user::Column::Id.is_in(ids.to_vec()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a user by email (case-insensitive; emails are stored lowercased).
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<user::Model>> {
        User::find()
            .filter(user::Column::Email.eq(email.to_lowercase()))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Resolve a bearer token to its owner.
    pub async fn find_by_token(&self, token: &str) -> AppResult<Option<user::Model>> {
        User::find()
            .join(JoinType::InnerJoin, user::Relation::Tokens.def())
            .filter(user_token::Column::Token.eq(token))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Next sequential user number.
    pub async fn next_user_number(&self) -> AppResult<i64> {
        let max: Option<Option<i64>> = User::find()
            .select_only()
            .column_as(user::Column::UserNumber.max(), "max_number")
            .into_tuple()
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(max.flatten().unwrap_or(0) + 1)
    }

    /// Create a new user.
    ///
    /// A taken email or user number is a `Conflict`.
    pub async fn create(&self, model: user::ActiveModel) -> AppResult<user::Model> {
        model.insert(self.db.as_ref()).await.map_err(|e| {
            constraint_error(
                e,
                || AppError::Conflict("email or user number already taken".to_string()),
                || AppError::NotFound("unit work".to_string()),
            )
        })
    }

    /// Attach a bearer token to a user.
    pub async fn add_token(&self, user_id: &str, token: &str) -> AppResult<()> {
        let model = user_token::ActiveModel {
            token: Set(token.to_string()),
            user_id: Set(user_id.to_string()),
            created_at: Set(chrono::Utc::now().into()),
        };

        UserToken::insert(model)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Revoke a bearer token. Returns whether a token was removed.
    pub async fn remove_token(&self, token: &str) -> AppResult<bool> {
        let result = UserToken::delete_by_id(token)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected > 0)
    }

    /// Tokens held by a user, oldest first.
    pub async fn find_tokens(&self, user_id: &str) -> AppResult<Vec<String>> {
        UserToken::find()
            .select_only()
            .column(user_token::Column::Token)
            .filter(user_token::Column::UserId.eq(user_id))
            .into_tuple()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::user::UserRole;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::collections::BTreeMap;

    fn create_test_user(id: &str, email: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            guid: "0d5b9c1e-6c1d-4f6e-9d0e-4d8f7f0f2a11".to_string(),
            user_number: 1,
            name: "Budi".to_string(),
            email: email.to_string(),
            password: "hash".to_string(),
            role: UserRole::User,
            image: None,
            unit_work_id: None,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_id_found() {
        let user = create_test_user("user1", "budi@example.com");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user.clone()]])
                .into_connection(),
        );

        let repo = UserRepository::new(db);
        let found = repo.find_by_id("user1").await.unwrap().unwrap();

        assert_eq!(found.id, "user1");
        assert_eq!(found.email, "budi@example.com");
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );

        let repo = UserRepository::new(db);
        let result = repo.get_by_id("missing").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_find_by_ids_empty_skips_query() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let repo = UserRepository::new(db);
        let result = repo.find_by_ids(&[]).await.unwrap();

        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_next_user_number_starts_at_one() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[BTreeMap::from([(
                    "max_number",
                    sea_orm::Value::BigInt(None),
                )])]])
                .into_connection(),
        );

        let repo = UserRepository::new(db);
        assert_eq!(repo.next_user_number().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_next_user_number_increments() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[BTreeMap::from([(
                    "max_number",
                    sea_orm::Value::BigInt(Some(41)),
                )])]])
                .into_connection(),
        );

        let repo = UserRepository::new(db);
        assert_eq!(repo.next_user_number().await.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_remove_token_reports_absence() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = UserRepository::new(db);
        assert!(!repo.remove_token("nope").await.unwrap());
    }
}
