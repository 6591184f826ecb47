//! Error types for the Nursedesk core library.

use thiserror::Error;

/// All errors that can occur within the Nursedesk core library.
#[derive(Debug, Error)]
pub enum NursedeskError {
    /// A SQLite operation failed.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A required field was missing, empty, or malformed.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Another record already holds this license number.
    #[error("License number already exists: {0}")]
    DuplicateLicense(String),

    /// A nurse ID was requested that does not exist in the database.
    #[error("Nurse not found: {0}")]
    NotFound(i64),

    /// The opened file is not a valid Nursedesk database.
    #[error("Invalid database: {0}")]
    InvalidDatabase(String),

    /// An I/O operation on the filesystem failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Data could not be serialized or deserialized as JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Writing an export document failed.
    #[error("Export error: {0}")]
    Export(String),
}

/// Convenience alias that pins the error type to [`NursedeskError`].
pub type Result<T> = std::result::Result<T, NursedeskError>;

impl NursedeskError {
    /// Returns a short, human-readable message suitable for display to the end user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Database(e) => format!("Failed to save: {e}"),
            Self::Validation(msg) => msg.clone(),
            Self::DuplicateLicense(_) => "License number already exists".to_string(),
            Self::NotFound(_) => "Nurse not found".to_string(),
            Self::InvalidDatabase(_) => "Could not open database file".to_string(),
            Self::Io(e) => format!("File error: {e}"),
            Self::Json(e) => format!("Data format error: {e}"),
            Self::Export(e) => format!("Export failed: {e}"),
        }
    }
}

impl From<zip::result::ZipError> for NursedeskError {
    fn from(value: zip::result::ZipError) -> Self {
        Self::Export(value.to_string())
    }
}
