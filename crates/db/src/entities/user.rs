//! User entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Account role.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Citizen submitting reports.
    #[sea_orm(string_value = "user")]
    #[default]
    User,
    #[sea_orm(string_value = "admin")]
    Admin,
    /// Field officer attached to a unit work.
    #[sea_orm(string_value = "officer")]
    Officer,
    #[sea_orm(string_value = "superadmin")]
    SuperAdmin,
}

impl UserRole {
    /// Admins and superadmins manage categories, unit works and routing.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin | Self::SuperAdmin)
    }

    /// Anyone who is not a plain citizen.
    #[must_use]
    pub const fn is_staff(self) -> bool {
        !matches!(self, Self::User)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
            Self::Officer => "officer",
            Self::SuperAdmin => "superadmin",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Public UUID, stable across exports.
    #[sea_orm(unique)]
    pub guid: String,

    /// Sequential human-friendly number.
    #[sea_orm(unique)]
    pub user_number: i64,

    pub name: String,

    #[sea_orm(unique)]
    pub email: String,

    /// Argon2 password hash
    #[serde(skip_serializing)]
    pub password: String,

    pub role: UserRole,

    #[sea_orm(nullable)]
    pub image: Option<String>,

    /// Unit work the account belongs to (officers and unit admins).
    #[sea_orm(nullable, indexed)]
    pub unit_work_id: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_token::Entity")]
    Tokens,
}

impl Related<super::user_token::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tokens.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
