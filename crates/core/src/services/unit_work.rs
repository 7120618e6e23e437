//! Unit work service.

use lapor_common::{AppResult, IdGenerator};
use lapor_db::{
    entities::{image_json, unit_work, user},
    repositories::{CascadeSummary, UnitWorkRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use super::require_admin;

/// Input for creating a unit work.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct CreateUnitWorkInput {
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    pub image: Vec<String>,

    #[validate(length(min = 1, max = 255))]
    pub detail: String,
}

/// Unit work service.
#[derive(Clone)]
pub struct UnitWorkService {
    unit_work_repo: UnitWorkRepository,
    id_gen: IdGenerator,
}

impl UnitWorkService {
    /// Create a new unit work service.
    #[must_use]
    pub const fn new(unit_work_repo: UnitWorkRepository) -> Self {
        Self {
            unit_work_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a unit work. Admins only.
    pub async fn create(
        &self,
        caller: &user::Model,
        input: CreateUnitWorkInput,
    ) -> AppResult<unit_work::Model> {
        input.validate()?;
        require_admin(caller)?;

        let model = unit_work::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(input.name),
            image: Set(image_json(&input.image)),
            detail: Set(input.detail),
            created_at: Set(chrono::Utc::now().into()),
        };

        let unit_work = self.unit_work_repo.create(model).await?;
        info!(unit_work_id = %unit_work.id, "Unit work created");
        Ok(unit_work)
    }

    /// All unit works, newest first.
    pub async fn list(&self) -> AppResult<Vec<unit_work::Model>> {
        self.unit_work_repo.find_all().await
    }

    /// Get a unit work by ID.
    pub async fn get(&self, id: &str) -> AppResult<unit_work::Model> {
        self.unit_work_repo.get_by_id(id).await
    }

    /// Delete a unit work with its users and reports. Admins only.
    pub async fn delete(&self, caller: &user::Model, id: &str) -> AppResult<CascadeSummary> {
        require_admin(caller)?;
        self.unit_work_repo.delete_cascade(id).await
    }
}
