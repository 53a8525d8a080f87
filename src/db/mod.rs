use sea_orm::{Database, DatabaseConnection, DbErr, SqlErr};

use crate::config::Config;
use crate::error::{AppError, AppResult};

pub async fn connect(config: &Config) -> AppResult<DatabaseConnection> {
    Database::connect(&config.database_url)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to connect to database: {}", e)))
}

/// Message of a unique-constraint violation, if that is what `err` is.
///
/// Works across backends: Postgres reports the constraint name, SQLite
/// the offending `table.column` list.
pub fn unique_violation(err: &DbErr) -> Option<String> {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) => Some(msg),
        _ => None,
    }
}
