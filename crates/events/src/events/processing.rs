use serde::{Deserialize, Serialize};
use sheetcheck_types::EntityId;

use super::FailureContext;

/// Events emitted by the document processor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ProcessingEvent {
    BatchStarted {
        documents: usize,
        checks: usize,
        force: bool,
    },

    /// Content already validated; no checks ran
    DocumentSkipped {
        entity: EntityId,
        document: String,
        version: u32,
    },

    DocumentProcessed {
        entity: EntityId,
        document: String,
        version: u32,
        new_version: bool,
        checks_run: usize,
        checks_passed: usize,
    },

    /// Document could not be read, fingerprinted or opened
    DocumentFailed {
        entity: EntityId,
        document: String,
        failure: FailureContext,
    },

    CheckFailed {
        entity: EntityId,
        document: String,
        version: u32,
        check: String,
        description: String,
    },

    ResultsWritten {
        entity: EntityId,
        document: String,
        count: usize,
    },

    BatchCompleted {
        processed: usize,
        skipped: usize,
        failed: usize,
        checks_run: usize,
        checks_passed: usize,
        duration_ms: u64,
    },
}
