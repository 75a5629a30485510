//! Per-document outcomes and the batch summary built from them

use crate::document::EntityId;
use serde::{Deserialize, Serialize};
use sheetcheck_hash::Fingerprint;

/// How the processor disposed of one document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Processed,
    Skipped,
    Failed,
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Processed => write!(f, "processed"),
            Self::Skipped => write!(f, "skipped"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Result of running the per-document algorithm on one input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentOutcome {
    pub name: String,
    pub entity: EntityId,
    pub status: DocumentStatus,
    /// Absent when the document could not be fingerprinted
    pub version: Option<u32>,
    pub fingerprint: Option<Fingerprint>,
    pub checks_run: usize,
    pub checks_passed: usize,
    /// Skip reason or failure message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl DocumentOutcome {
    #[must_use]
    pub fn checks_failed(&self) -> usize {
        self.checks_run - self.checks_passed
    }
}

/// Counters accumulated over one processing run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
    pub checks_run: usize,
    pub checks_passed: usize,
    pub checks_failed: usize,
    /// Distinct entities in first-seen order
    pub entities: Vec<EntityId>,
    pub duration_ms: u64,
    pub documents: Vec<DocumentOutcome>,
}

impl BatchSummary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one document outcome into the counters
    pub fn record(&mut self, outcome: DocumentOutcome) {
        match outcome.status {
            DocumentStatus::Processed => self.processed += 1,
            DocumentStatus::Skipped => self.skipped += 1,
            DocumentStatus::Failed => self.failed += 1,
        }
        self.checks_run += outcome.checks_run;
        self.checks_passed += outcome.checks_passed;
        self.checks_failed += outcome.checks_failed();
        if !self.entities.contains(&outcome.entity) {
            self.entities.push(outcome.entity.clone());
        }
        self.documents.push(outcome);
    }

    /// Total number of documents submitted to the batch
    #[must_use]
    pub fn total_documents(&self) -> usize {
        self.processed + self.skipped + self.failed
    }

    /// Share of executed checks that passed, 0.0 when nothing ran
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn pass_rate(&self) -> f64 {
        if self.checks_run == 0 {
            0.0
        } else {
            self.checks_passed as f64 / self.checks_run as f64
        }
    }
}
