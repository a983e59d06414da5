//! Error types for the ShareHaus crate

use config::ConfigError;
use store_object::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShareHausError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database connection error: {0}")]
    DatabaseConnection(#[from] sqlx::Error),
}
