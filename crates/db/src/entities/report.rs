//! Citizen report entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Report processing status.
///
/// Stored and serialized with the Indonesian labels used by existing
/// clients.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum ReportStatus {
    #[sea_orm(string_value = "Menunggu")]
    #[serde(rename = "Menunggu")]
    #[default]
    Waiting,
    #[sea_orm(string_value = "Diproses")]
    #[serde(rename = "Diproses")]
    Processing,
    #[sea_orm(string_value = "Selesai")]
    #[serde(rename = "Selesai")]
    Done,
    #[sea_orm(string_value = "Ditolak")]
    #[serde(rename = "Ditolak")]
    Rejected,
}

impl ReportStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 4] = [Self::Waiting, Self::Processing, Self::Done, Self::Rejected];

    /// Wire label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Waiting => "Menunggu",
            Self::Processing => "Diproses",
            Self::Done => "Selesai",
            Self::Rejected => "Ditolak",
        }
    }

    /// Parse a wire label.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.label() == label)
    }

    /// Whether no further transition is possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Rejected)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "report")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    #[sea_orm(column_type = "Text")]
    pub address: String,

    pub latitude: String,

    pub longitude: String,

    #[sea_orm(indexed)]
    pub status: ReportStatus,

    /// Image references (JSON array of strings).
    #[sea_orm(column_type = "Json")]
    pub image_report: Json,

    #[sea_orm(indexed)]
    pub category_id: String,

    /// Submitting user. Set once at creation.
    #[sea_orm(indexed)]
    pub reporter_id: String,

    /// Unit work the report is routed to.
    #[sea_orm(nullable, indexed)]
    pub unit_work_id: Option<String>,

    /// Resolution record, set on officer completion.
    #[sea_orm(nullable)]
    pub officer_report_id: Option<String>,

    /// Officer who resolved the report.
    #[sea_orm(nullable, indexed)]
    pub officer_id: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    /// Image references as a list.
    #[must_use]
    pub fn images(&self) -> Vec<String> {
        super::image_list(&self.image_report)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::comment::Entity")]
    Comments,
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
