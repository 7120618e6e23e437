//! Category service.

use lapor_common::{AppResult, IdGenerator};
use lapor_db::{
    entities::{category, user},
    repositories::CategoryRepository,
};
use sea_orm::Set;
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use super::require_admin;

/// Input for creating a category.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct CreateCategoryInput {
    #[validate(length(min = 3))]
    pub name: String,

    #[validate(length(min = 1))]
    pub image: String,
}

/// Category service.
#[derive(Clone)]
pub struct CategoryService {
    category_repo: CategoryRepository,
    id_gen: IdGenerator,
}

impl CategoryService {
    /// Create a new category service.
    #[must_use]
    pub const fn new(category_repo: CategoryRepository) -> Self {
        Self {
            category_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a category. Admins only.
    pub async fn create(
        &self,
        caller: &user::Model,
        input: CreateCategoryInput,
    ) -> AppResult<category::Model> {
        input.validate()?;
        require_admin(caller)?;

        let model = category::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(input.name),
            image: Set(input.image),
            created_at: Set(chrono::Utc::now().into()),
        };

        let category = self.category_repo.create(model).await?;
        info!(category_id = %category.id, "Category created");
        Ok(category)
    }

    /// All categories, newest first.
    pub async fn list(&self) -> AppResult<Vec<category::Model>> {
        self.category_repo.find_all().await
    }

    /// Delete a category. Admins only.
    ///
    /// Reports keep their category id and show it as unknown afterwards.
    pub async fn delete(&self, caller: &user::Model, id: &str) -> AppResult<()> {
        require_admin(caller)?;
        self.category_repo.delete(id).await?;
        info!(category_id = %id, "Category deleted");
        Ok(())
    }
}
