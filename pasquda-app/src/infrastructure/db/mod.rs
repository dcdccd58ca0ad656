pub mod entities;
mod battle_repository;
mod email_repository;
mod roast_repository;

pub use battle_repository::BattleRepository;
pub use email_repository::EmailRepository;
pub use roast_repository::{NewRoast, RoastRepository, MAX_HISTORY_PAGE};

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};
use std::time::Duration;

pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(database_url);
    opt.max_connections(10)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(10))
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(600))
        .sqlx_logging(false);

    Database::connect(opt).await
}

pub async fn run_migrations(db: &DatabaseConnection) -> Result<(), DbErr> {
    let migration = include_str!("../../../../migrations/001_initial.sql");

    // Statements are idempotent (IF NOT EXISTS / ON CONFLICT), so failures
    // from re-runs are ignored.
    for statement in migration.split(';') {
        let statement = statement.trim();
        if !statement.is_empty() {
            let _ = db
                .execute(Statement::from_string(
                    sea_orm::DatabaseBackend::Postgres,
                    statement.to_string(),
                ))
                .await;
        }
    }

    Ok(())
}
