//! Database entities.

pub mod category;
pub mod comment;
pub mod officer_report;
pub mod report;
pub mod unit_work;
pub mod user;
pub mod user_token;

pub use category::Entity as Category;
pub use comment::Entity as Comment;
pub use officer_report::Entity as OfficerReport;
pub use report::Entity as Report;
pub use unit_work::Entity as UnitWork;
pub use user::Entity as User;
pub use user_token::Entity as UserToken;

/// Decode a JSON array column holding image references.
///
/// Values that are not an array of strings decode to an empty list.
#[must_use]
pub fn image_list(value: &sea_orm::prelude::Json) -> Vec<String> {
    serde_json::from_value(value.clone()).unwrap_or_default()
}

/// Encode image references for a JSON array column.
#[must_use]
pub fn image_json(images: &[String]) -> sea_orm::prelude::Json {
    serde_json::Value::from(images.to_vec())
}
