//! Result storage error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("failed to write {count} result(s): {message}")]
    WriteFailed { count: usize, message: String },

    #[error("database error: {message}")]
    DatabaseError { message: String },

    #[error("migration failed: {message}")]
    MigrationFailed { message: String },

    #[error("query failed: {message}")]
    QueryFailed { message: String },
}

impl UserFacingError for StorageError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::WriteFailed { .. } => {
                Some("Results were not stored; rerun the batch once the database is reachable.")
            }
            Self::MigrationFailed { .. } => {
                Some("The results database schema could not be upgraded; check file permissions.")
            }
            _ => None,
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::WriteFailed { .. } | Self::DatabaseError { .. })
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::WriteFailed { .. } => "storage.write_failed",
            Self::DatabaseError { .. } => "storage.database_error",
            Self::MigrationFailed { .. } => "storage.migration_failed",
            Self::QueryFailed { .. } => "storage.query_failed",
        };
        Some(code)
    }
}
