use std::time::Duration;

use db_migration::Migrator;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use utils::assets::db_path;

pub mod entities;
pub mod models;
pub mod store;
pub mod types;

pub use sea_orm::DbErr;

const DATABASE_URL_ENV: &str = "DATABASE_URL";

#[derive(Clone)]
pub struct DBService {
    pub conn: DatabaseConnection,
}

impl DBService {
    pub async fn new() -> Result<DBService, DbErr> {
        let database_url = std::env::var(DATABASE_URL_ENV)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| format!("sqlite://{}?mode=rwc", db_path().to_string_lossy()));

        let mut options = ConnectOptions::new(database_url);
        options
            .max_connections(5)
            .connect_timeout(Duration::from_secs(30))
            .sqlx_logging(false);

        let conn = Database::connect(options).await?;
        Migrator::up(&conn, None).await?;
        tracing::debug!("Database connected and migrations applied");
        Ok(DBService { conn })
    }
}
