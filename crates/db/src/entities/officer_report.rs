//! Officer resolution record. Written once when a report is completed.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "officer_report")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Report this record resolves.
    #[sea_orm(indexed)]
    pub report_id: String,

    #[sea_orm(column_type = "Text")]
    pub message: String,

    /// Evidence image references (JSON array of strings).
    #[sea_orm(column_type = "Json")]
    pub image_report: Json,

    pub officer_id: String,

    pub created_at: DateTimeWithTimeZone,
}

impl Model {
    /// Image references as a list.
    #[must_use]
    pub fn images(&self) -> Vec<String> {
        super::image_list(&self.image_report)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
