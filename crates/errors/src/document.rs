//! Document access and parsing error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum DocumentError {
    #[error("document not found: {path}")]
    NotFound { path: String },

    #[error("permission denied: {path}")]
    PermissionDenied { path: String },

    #[error("document unreadable: {path}: {message}")]
    Unreadable { path: String, message: String },

    #[error("unsupported document format: {path} (extension '{extension}')")]
    UnsupportedFormat { path: String, extension: String },

    #[error("corrupt document: {path}: {message}")]
    Corrupt { path: String, message: String },
}

impl DocumentError {
    /// Convert an `io::Error` into a `DocumentError` with an associated path
    #[must_use]
    pub fn from_io_with_path(err: &std::io::Error, path: &std::path::Path) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound {
                path: path.display().to_string(),
            },
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied {
                path: path.display().to_string(),
            },
            _ => Self::Unreadable {
                path: path.display().to_string(),
                message: err.to_string(),
            },
        }
    }
}

impl UserFacingError for DocumentError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::NotFound { .. } => Some("Check that the document was downloaded to the input directory."),
            Self::PermissionDenied { .. } => Some("Adjust filesystem permissions on the document and retry."),
            Self::UnsupportedFormat { .. } => {
                Some("Only .xlsx, .xlsm, .xltx and .xltm workbooks can be validated.")
            }
            Self::Corrupt { .. } => Some("Ask the submitting entity for a new copy of the workbook."),
            Self::Unreadable { .. } => None,
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::Unreadable { .. })
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::NotFound { .. } => "document.not_found",
            Self::PermissionDenied { .. } => "document.permission_denied",
            Self::Unreadable { .. } => "document.unreadable",
            Self::UnsupportedFormat { .. } => "document.unsupported_format",
            Self::Corrupt { .. } => "document.corrupt",
        };
        Some(code)
    }
}
