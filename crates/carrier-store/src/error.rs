use thiserror::Error;

use crate::CarrierCode;

/// Errors that can occur when interacting with the carrier directory.
#[derive(Debug, Error)]
pub enum CarrierStoreError {
    /// Another carrier already normalizes to the same code.
    #[error("Carrier code already in use: {0}")]
    DuplicateCode(CarrierCode),

    /// The carrier record is not acceptable for storage.
    #[error("Invalid carrier: {0}")]
    InvalidCarrier(String),

    /// The backing table does not exist yet.
    #[error("Carrier directory has not been migrated")]
    NotMigrated,

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for carrier directory operations.
pub type Result<T> = std::result::Result<T, CarrierStoreError>;
