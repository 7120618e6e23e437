//! Account registration against a migrated in-memory database.

#![allow(clippy::unwrap_used)]

use lapor_common::AppError;
use lapor_core::{SignupInput, UserService};
use lapor_db::{
    repositories::{UnitWorkRepository, UserRepository},
    test_utils::TestDatabase,
};

fn signup(name: &str, email: &str) -> SignupInput {
    SignupInput {
        name: name.to_string(),
        email: email.to_string(),
        password: "rahasia123".to_string(),
    }
}

fn service(db: &TestDatabase) -> UserService {
    UserService::new(
        UserRepository::new(db.shared()),
        UnitWorkRepository::new(db.shared()),
    )
}

#[tokio::test]
async fn test_concurrent_signups_get_distinct_numbers() {
    let db = TestDatabase::new().await.unwrap();
    let users = service(&db);

    let (a, b) = tokio::join!(
        users.signup(signup("Budi", "budi@example.com")),
        users.signup(signup("Siti", "siti@example.com")),
    );

    let (a, b) = (a.unwrap(), b.unwrap());
    assert_ne!(a.user_number, b.user_number);
}

#[tokio::test]
async fn test_concurrent_signups_with_same_email_conflict() {
    let db = TestDatabase::new().await.unwrap();
    let users = service(&db);

    let (a, b) = tokio::join!(
        users.signup(signup("Budi", "budi@example.com")),
        users.signup(signup("Budi Dua", "BUDI@example.com")),
    );

    let outcomes = [a, b];
    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(
        outcomes
            .iter()
            .any(|r| matches!(r, Err(AppError::Conflict(_))))
    );
}
