pub mod config;
pub mod models;
pub mod pool;
pub mod repositories;

pub use config::DatabaseConfig;
pub use pool::DatabasePool;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Write conflict on concurrent settlement")]
    Conflict,

    #[error("Timed out waiting for the database")]
    Timeout,
}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            if let Some(code) = db_err.code() {
                // serialization_failure / deadlock_detected
                if matches!(code.as_ref(), "40001" | "40P01") {
                    return DatabaseError::Conflict;
                }
            }
        }
        match err {
            sqlx::Error::PoolTimedOut => DatabaseError::Timeout,
            other => DatabaseError::Query(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DatabaseError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DatabaseError::Migration(err.to_string())
    }
}

impl From<DatabaseError> for ledger_core::LedgerError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::Conflict => ledger_core::LedgerError::Conflict,
            other => ledger_core::LedgerError::Database(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, DatabaseError>;
