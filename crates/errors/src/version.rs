//! Fingerprinting and version bookkeeping error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum VersionError {
    #[error("failed to fingerprint {path}: {message}")]
    FingerprintFailed { path: String, message: String },

    #[error("invalid fingerprint: {message}")]
    InvalidFingerprint { message: String },

    #[error("invalid version record for {entity}/{document}: {message}")]
    InvalidRecord {
        entity: String,
        document: String,
        message: String,
    },

    #[error("no version numbers left for {entity}/{document}")]
    Exhausted { entity: String, document: String },
}

impl UserFacingError for VersionError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::FingerprintFailed { .. } => Some("Make sure the document is readable and retry."),
            Self::InvalidFingerprint { .. } | Self::InvalidRecord { .. } => {
                Some("The stored version history looks damaged; inspect the results database.")
            }
            Self::Exhausted { .. } => {
                Some("Invalidate the document's history before submitting new content.")
            }
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::FingerprintFailed { .. })
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::FingerprintFailed { .. } => "version.fingerprint_failed",
            Self::InvalidFingerprint { .. } => "version.invalid_fingerprint",
            Self::InvalidRecord { .. } => "version.invalid_record",
            Self::Exhausted { .. } => "version.exhausted",
        };
        Some(code)
    }
}
