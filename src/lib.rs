//! # salesdb - Company Sales Analysis Store
//!
//! Append-only persistence for B2B sales analyses of companies.
//!
//! salesdb provides:
//! - A typed analysis payload with documented defaults
//! - SQLite-backed storage of analyses and their scoring dimensions
//! - Lookup of the current analysis per company and full listings
//! - Pattern reports: average score and count per scoring dimension

pub mod analysis;
pub mod codec;
pub mod storage;
pub mod config;
pub mod ui;

// Re-exports for convenient access
pub use analysis::{
    Analysis, AnalysisId, AnalysisPayload, AnalysisSummary, DimensionAverage, DimensionInput,
    PatternReport, ScoringDimension,
};
pub use storage::{AnalysisStore, DbStats};

/// Result type alias for salesdb operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for salesdb operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Storage error: connection is closed")]
    Closed,

    #[error("Deserialization error: {0}")]
    Deserialization(#[from] serde_json::Error),

    #[error("Unsupported framework format version {found} (supported up to {supported})")]
    UnsupportedFormat { found: u64, supported: u64 },
}

impl Error {
    /// Connection-level failures, including use of a closed store.
    pub fn is_storage(&self) -> bool {
        matches!(self, Error::Storage(_) | Error::Closed)
    }

    pub fn is_constraint(&self) -> bool {
        matches!(self, Error::Constraint(_))
    }

    /// Splits constraint violations out of raw engine errors.
    pub(crate) fn from_sqlite(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(ref failure, ref message)
                if failure.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                let detail = message.clone().unwrap_or_else(|| failure.to_string());
                Error::Constraint(detail)
            }
            other => Error::Storage(other),
        }
    }
}
