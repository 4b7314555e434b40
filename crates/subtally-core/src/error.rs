//! Error types for subtally

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Encryption error: {0}")]
    Encryption(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    /// Malformed or out-of-range input: non-positive value, unknown enum, missing owner
    #[error("Validation error: {0}")]
    Validation(String),

    /// Referenced subscription absent or not owned by the caller
    #[error("Not found: {0}")]
    NotFound(String),

    /// Optimistic version check failed on a payment advance
    #[error("Concurrent update conflict: {0}")]
    ConcurrencyConflict(String),
}

impl Error {
    /// Short message suitable for showing to an end user.
    ///
    /// Never includes identifiers or lower-level error detail.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Validation(_) => "Some of the information provided is invalid.",
            Self::NotFound(_) => "Subscription not found.",
            Self::ConcurrencyConflict(_) => {
                "This subscription was changed at the same time. Please try again."
            }
            Self::Config(_) => "The configuration file could not be read.",
            Self::Encryption(_) => "The database could not be unlocked.",
            _ => "Something went wrong. Please try again.",
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
