//! Test utilities for database operations.
//!
//! [`TestDatabase`] opens a private in-memory SQLite database with all
//! migrations applied. The `fixtures` module inserts rows directly,
//! bypassing services, so tests can arrange any state including dangling
//! references.

use std::sync::Arc;

use crate::migrations::Migrator;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use tracing::debug;

/// A migrated in-memory database, dropped with its last connection.
pub struct TestDatabase {
    conn: Arc<DatabaseConnection>,
}

impl TestDatabase {
    /// Open a fresh database and run migrations.
    pub async fn new() -> Result<Self, DbErr> {
        // One connection: every pooled connection would get its own memory db.
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1)
            .min_connections(1)
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;
        Migrator::up(&conn, None).await?;

        debug!("Opened in-memory test database");

        Ok(Self {
            conn: Arc::new(conn),
        })
    }

    /// Get the database connection.
    #[must_use]
    pub fn connection(&self) -> &DatabaseConnection {
        self.conn.as_ref()
    }

    /// Shared handle for repositories.
    #[must_use]
    pub fn shared(&self) -> Arc<DatabaseConnection> {
        Arc::clone(&self.conn)
    }
}

pub mod fixtures {
    //! Row builders for tests.

    use crate::entities::{
        category, comment, image_json, report, report::ReportStatus, unit_work, user,
        user::UserRole, user_token,
    };
    use chrono::Utc;
    use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, Set};
    use std::sync::atomic::{AtomicI64, Ordering};

    static USER_NUMBER: AtomicI64 = AtomicI64::new(1);

    fn next_id() -> String {
        lapor_common::IdGenerator::new().generate()
    }

    /// Insert a user. The password column holds a placeholder, not a hash.
    pub async fn user(
        db: &DatabaseConnection,
        name: &str,
        role: UserRole,
        unit_work_id: Option<&str>,
    ) -> Result<user::Model, DbErr> {
        let id = next_id();
        user::ActiveModel {
            id: Set(id.clone()),
            guid: Set(lapor_common::IdGenerator::new().generate_uuid_v4()),
            user_number: Set(USER_NUMBER.fetch_add(1, Ordering::Relaxed)),
            name: Set(name.to_string()),
            email: Set(format!("{id}@example.com")),
            password: Set("not-a-hash".to_string()),
            role: Set(role),
            image: Set(None),
            unit_work_id: Set(unit_work_id.map(str::to_string)),
            created_at: Set(Utc::now().into()),
            updated_at: Set(Utc::now().into()),
        }
        .insert(db)
        .await
    }

    /// Attach a bearer token to a user.
    pub async fn token(db: &DatabaseConnection, user_id: &str) -> Result<String, DbErr> {
        let token = lapor_common::IdGenerator::new().generate_token();
        user_token::ActiveModel {
            token: Set(token.clone()),
            user_id: Set(user_id.to_string()),
            created_at: Set(Utc::now().into()),
        }
        .insert(db)
        .await?;
        Ok(token)
    }

    pub async fn category(db: &DatabaseConnection, name: &str) -> Result<category::Model, DbErr> {
        category::ActiveModel {
            id: Set(next_id()),
            name: Set(name.to_string()),
            image: Set(format!("{}.png", name.to_lowercase())),
            created_at: Set(Utc::now().into()),
        }
        .insert(db)
        .await
    }

    pub async fn unit_work(db: &DatabaseConnection, name: &str) -> Result<unit_work::Model, DbErr> {
        unit_work::ActiveModel {
            id: Set(next_id()),
            name: Set(name.to_string()),
            image: Set(image_json(&[])),
            detail: Set(format!("{name} detail")),
            created_at: Set(Utc::now().into()),
        }
        .insert(db)
        .await
    }

    /// Insert a report in any status, optionally routed to a unit work.
    pub async fn report(
        db: &DatabaseConnection,
        title: &str,
        status: ReportStatus,
        category_id: &str,
        reporter_id: &str,
        unit_work_id: Option<&str>,
    ) -> Result<report::Model, DbErr> {
        report::ActiveModel {
            id: Set(next_id()),
            title: Set(title.to_string()),
            description: Set(format!("{title} description")),
            address: Set("Jl. Sudirman 10".to_string()),
            latitude: Set("-6.2088".to_string()),
            longitude: Set("106.8456".to_string()),
            status: Set(status),
            image_report: Set(image_json(&[])),
            category_id: Set(category_id.to_string()),
            reporter_id: Set(reporter_id.to_string()),
            unit_work_id: Set(unit_work_id.map(str::to_string)),
            officer_report_id: Set(None),
            officer_id: Set(None),
            created_at: Set(Utc::now().into()),
            updated_at: Set(Utc::now().into()),
        }
        .insert(db)
        .await
    }

    pub async fn comment(
        db: &DatabaseConnection,
        report_id: &str,
        name: &str,
        message: &str,
    ) -> Result<comment::Model, DbErr> {
        comment::ActiveModel {
            id: Set(next_id()),
            report_id: Set(report_id.to_string()),
            name: Set(name.to_string()),
            message: Set(message.to_string()),
            created_at: Set(Utc::now().into()),
        }
        .insert(db)
        .await
    }
}
