//! Check verdicts, outcomes and persisted results

use crate::document::{BusinessMetadata, EntityId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sheetcheck_hash::Fingerprint;

/// Read-only context shared by every check run against one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckContext {
    pub entity: EntityId,
    pub document: String,
    pub version: u32,
}

/// What a single check function reports about a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckVerdict {
    pub passed: bool,
    /// Supplementary measurement (sheet count, row count, ...)
    pub value: Option<f64>,
    pub description: String,
}

impl CheckVerdict {
    pub fn new(passed: bool, value: Option<f64>, description: impl Into<String>) -> Self {
        Self {
            passed,
            value,
            description: description.into(),
        }
    }

    pub fn pass(description: impl Into<String>) -> Self {
        Self::new(true, None, description)
    }

    pub fn fail(description: impl Into<String>) -> Self {
        Self::new(false, None, description)
    }

    #[must_use]
    pub fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }
}

/// A verdict attributed to the check that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckOutcome {
    pub check: String,
    #[serde(flatten)]
    pub verdict: CheckVerdict,
}

impl CheckOutcome {
    pub fn new(check: impl Into<String>, verdict: CheckVerdict) -> Self {
        Self {
            check: check.into(),
            verdict,
        }
    }

    #[must_use]
    pub fn passed(&self) -> bool {
        self.verdict.passed
    }
}

/// One stored verdict of one check against one document version.
///
/// Identified by (entity, document, version, check).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub entity: EntityId,
    pub document: String,
    pub fingerprint: Fingerprint,
    pub version: u32,
    pub check: String,
    pub passed: bool,
    pub value: Option<f64>,
    pub description: String,
    pub processed_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_case: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reporting_year: Option<i32>,
}

impl CheckResult {
    /// Stamp an outcome with the identity of the document version it was computed for
    #[must_use]
    pub fn stamp(
        context: &CheckContext,
        fingerprint: &Fingerprint,
        metadata: &BusinessMetadata,
        outcome: CheckOutcome,
        processed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            entity: context.entity.clone(),
            document: context.document.clone(),
            fingerprint: fingerprint.clone(),
            version: context.version,
            check: outcome.check,
            passed: outcome.verdict.passed,
            value: outcome.verdict.value,
            description: outcome.verdict.description,
            processed_at,
            business_case: metadata.business_case.clone(),
            reporting_year: metadata.reporting_year,
        }
    }

    /// Natural key used by stores for deduplication
    #[must_use]
    pub fn natural_key(&self) -> (&EntityId, &str, u32, &str) {
        (&self.entity, &self.document, self.version, &self.check)
    }
}
