//! Check execution error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum CheckError {
    #[error("{message}")]
    Failed { message: String },

    #[error("check '{check}' panicked: {message}")]
    Panicked { check: String, message: String },

    #[error("sheet not found: {sheet}")]
    SheetMissing { sheet: String },
}

impl CheckError {
    /// Create a plain failure with a message
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }
}

impl UserFacingError for CheckError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::Failed { .. } => "check.failed",
            Self::Panicked { .. } => "check.panicked",
            Self::SheetMissing { .. } => "check.sheet_missing",
        };
        Some(code)
    }
}
