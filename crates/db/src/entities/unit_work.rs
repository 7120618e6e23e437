//! Unit work entity - a department that reports are routed to.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "unit_work")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub name: String,

    /// Image references (JSON array of strings).
    #[sea_orm(column_type = "Json")]
    pub image: Json,

    pub detail: String,

    pub created_at: DateTimeWithTimeZone,
}

impl Model {
    /// Image references as a list.
    #[must_use]
    pub fn images(&self) -> Vec<String> {
        super::image_list(&self.image)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
