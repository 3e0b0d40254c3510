//! Error handling for the Apiary Monitor core
//!
//! Missing ids are never errors here; lookups return `Option`. What remains
//! are ingestion and refresh failures plus configuration problems.

use apiary_shared::IngestError;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Ingestion errors
    #[error("Ingestion error: {0}")]
    Ingest(#[from] IngestError),

    // Feed errors
    #[error("Sensor feed unavailable: {0}")]
    FeedUnavailable(String),

    /// Limit in milliseconds
    #[error("Refresh timed out after {0}ms")]
    RefreshTimeout(u64),

    #[error("Configuration error: {0}")]
    Configuration(String),

    // Internal errors
    #[error("Internal error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Stable code for logs and client badges
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Ingest(_) => "INGEST_ERROR",
            AppError::FeedUnavailable(_) => "FEED_UNAVAILABLE",
            AppError::RefreshTimeout(_) => "REFRESH_TIMEOUT",
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the failure means the backend could not be reached
    pub fn is_connectivity(&self) -> bool {
        matches!(
            self,
            AppError::FeedUnavailable(_) | AppError::RefreshTimeout(_)
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Configuration(err.to_string())
    }
}

/// Result type alias for core operations
pub type AppResult<T> = Result<T, AppError>;
