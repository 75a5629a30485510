//! Per-document and batch processing

use crate::entity::{EntityExtractor, SeparatorExtractor};
use crate::sink::ResultSink;
use crate::source::DocumentSource;
use chrono::Utc;
use futures::stream::{self, StreamExt};
use sheetcheck_cache::VersionCache;
use sheetcheck_checks::CheckRegistry;
use sheetcheck_errors::{DocumentError, Error, UserFacingError};
use sheetcheck_events::{
    CorrelatedEmitter, EventEmitter, EventSender, FailureContext, ProcessingEvent,
};
use sheetcheck_hash::Fingerprint;
use sheetcheck_types::{
    BatchSummary, CheckContext, CheckOutcome, CheckResult, DocumentInput, DocumentOutcome,
    DocumentStatus, EntityId, VersionRecord,
};
use sheetcheck_workbook::DocumentReader;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

const ENUMERATE_OPERATION: &str = "enumerate documents";

/// Runs documents through fingerprinting, versioning and checks
pub struct DocumentProcessor {
    cache: Arc<VersionCache>,
    registry: Arc<CheckRegistry>,
    reader: Arc<dyn DocumentReader>,
    sink: Arc<dyn ResultSink>,
    extractor: Arc<dyn EntityExtractor>,
    force: bool,
    concurrency: usize,
    tx: Option<EventSender>,
}

impl DocumentProcessor {
    /// Create a processor with an empty cache, sequential processing and the
    /// default entity rule
    pub fn new(
        registry: Arc<CheckRegistry>,
        reader: Arc<dyn DocumentReader>,
        sink: Arc<dyn ResultSink>,
    ) -> Self {
        Self {
            cache: Arc::new(VersionCache::new()),
            registry,
            reader,
            sink,
            extractor: Arc::new(SeparatorExtractor::default()),
            force: false,
            concurrency: 1,
            tx: None,
        }
    }

    /// Share an existing version cache
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<VersionCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Run checks even for content that was already validated
    ///
    /// Versions are unaffected: unchanged content keeps its version.
    #[must_use]
    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Number of documents in flight at once (minimum 1)
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    #[must_use]
    pub fn with_entity_extractor(mut self, extractor: Arc<dyn EntityExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    #[must_use]
    pub fn with_event_sender(mut self, tx: EventSender) -> Self {
        self.tx = Some(tx);
        self
    }

    #[must_use]
    pub fn cache(&self) -> &VersionCache {
        &self.cache
    }

    #[must_use]
    pub fn registry(&self) -> &CheckRegistry {
        &self.registry
    }

    /// Entity a document name belongs to
    #[must_use]
    pub fn entity_for(&self, document_name: &str) -> EntityId {
        self.extractor.extract(document_name)
    }

    /// Warm the cache with persisted version records
    ///
    /// # Errors
    /// Returns a version error if the records contradict each other or the cache.
    pub fn load_history<I>(&self, records: I) -> Result<usize, Error>
    where
        I: IntoIterator<Item = VersionRecord>,
    {
        Ok(self.cache.load_history(records)?)
    }

    /// Process a whole source
    ///
    /// Enumeration and the batch share one correlation id.
    ///
    /// # Errors
    /// Returns an error if the source cannot be enumerated or a result write fails.
    pub async fn process_source(&self, source: &dyn DocumentSource) -> Result<BatchSummary, Error> {
        let events = CorrelatedEmitter::new(self.tx.clone());
        events.emit_operation_started(ENUMERATE_OPERATION);
        let inputs = source.documents().await.inspect_err(|e| {
            events.emit_operation_failed(ENUMERATE_OPERATION, e.to_string());
        })?;
        events.emit_operation_completed(ENUMERATE_OPERATION, true);
        if inputs.is_empty() {
            events.emit_warning("source contains no documents");
        }
        self.run_batch(&inputs, &events).await
    }

    /// Process documents in order and summarize the run
    ///
    /// Documents that cannot be read or opened are counted as failed. The
    /// batch stops at the first result write failure.
    ///
    /// Every event of the run carries the same correlation id.
    ///
    /// # Errors
    /// Returns a storage error if the sink rejects a batch of results.
    pub async fn process_batch(&self, inputs: &[DocumentInput]) -> Result<BatchSummary, Error> {
        let events = CorrelatedEmitter::new(self.tx.clone());
        self.run_batch(inputs, &events).await
    }

    async fn run_batch(
        &self,
        inputs: &[DocumentInput],
        events: &CorrelatedEmitter,
    ) -> Result<BatchSummary, Error> {
        let started = Instant::now();
        info!(
            batch = events.correlation_id(),
            documents = inputs.len(),
            checks = self.registry.len(),
            force = self.force,
            concurrency = self.concurrency,
            "starting batch"
        );
        events.emit_processing(ProcessingEvent::BatchStarted {
            documents: inputs.len(),
            checks: self.registry.len(),
            force: self.force,
        });

        let mut summary = BatchSummary::new();

        if self.concurrency <= 1 {
            for input in inputs {
                let entity = self.entity_for(&input.name);
                summary.record(self.run_document(entity, input, events).await?);
            }
        } else {
            // `buffered` yields in input order, keeping the entity listing stable
            let mut outcomes = stream::iter(inputs)
                .map(|input| self.run_document(self.entity_for(&input.name), input, events))
                .buffered(self.concurrency);
            while let Some(outcome) = outcomes.next().await {
                summary.record(outcome?);
            }
        }

        summary.duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        info!(
            batch = events.correlation_id(),
            processed = summary.processed,
            skipped = summary.skipped,
            failed = summary.failed,
            checks_run = summary.checks_run,
            checks_passed = summary.checks_passed,
            duration_ms = summary.duration_ms,
            "batch complete"
        );
        events.emit_processing(ProcessingEvent::BatchCompleted {
            processed: summary.processed,
            skipped: summary.skipped,
            failed: summary.failed,
            checks_run: summary.checks_run,
            checks_passed: summary.checks_passed,
            duration_ms: summary.duration_ms,
        });

        Ok(summary)
    }

    /// Process one document, deriving its entity from the name
    ///
    /// # Errors
    /// Returns an error only if the result sink fails; unreadable documents
    /// yield a failed outcome.
    pub async fn process_document(&self, input: &DocumentInput) -> Result<DocumentOutcome, Error> {
        let entity = self.entity_for(&input.name);
        self.process_document_as(entity, input).await
    }

    /// Process one document for an explicit entity
    ///
    /// # Errors
    /// Returns an error only if the result sink fails.
    pub async fn process_document_as(
        &self,
        entity: EntityId,
        input: &DocumentInput,
    ) -> Result<DocumentOutcome, Error> {
        let events = CorrelatedEmitter::new(self.tx.clone());
        self.run_document(entity, input, &events).await
    }

    /// Versions are reserved before the checks run and marked completed only
    /// after the sink accepted the results, so content whose results were
    /// lost is processed again under the same version.
    #[allow(clippy::too_many_lines)]
    async fn run_document(
        &self,
        entity: EntityId,
        input: &DocumentInput,
        events: &CorrelatedEmitter,
    ) -> Result<DocumentOutcome, Error> {
        let fingerprint = match Fingerprint::hash_file(&input.path).await {
            Ok(fingerprint) => fingerprint,
            Err(e) if e.is_document_failure() => {
                return Ok(failed(events, entity, input, None, None, &e));
            }
            Err(e) => return Err(e),
        };

        let resolved = match self.cache.resolve_version(&entity, &input.name, &fingerprint) {
            Ok(resolved) => resolved,
            Err(e) => {
                let e = Error::from(e);
                return Ok(failed(events, entity, input, None, Some(fingerprint), &e));
            }
        };

        if resolved.completed && !self.force {
            info!(
                entity = %entity,
                document = %input.name,
                version = resolved.version,
                fingerprint = %fingerprint.short(),
                "content unchanged, skipping"
            );
            events.emit_processing(ProcessingEvent::DocumentSkipped {
                entity: entity.clone(),
                document: input.name.clone(),
                version: resolved.version,
            });
            return Ok(DocumentOutcome {
                name: input.name.clone(),
                entity,
                status: DocumentStatus::Skipped,
                version: Some(resolved.version),
                fingerprint: Some(fingerprint),
                checks_run: 0,
                checks_passed: 0,
                reason: Some("content already processed".to_string()),
            });
        }

        let context = CheckContext {
            entity: entity.clone(),
            document: input.name.clone(),
            version: resolved.version,
        };

        let outcomes = match self.run_checks(input, context.clone()).await {
            Ok(outcomes) => outcomes,
            Err(e) => {
                let e = Error::from(e);
                return Ok(failed(
                    events,
                    entity,
                    input,
                    Some(resolved.version),
                    Some(fingerprint),
                    &e,
                ));
            }
        };

        let processed_at = Utc::now();
        let results: Vec<CheckResult> = outcomes
            .into_iter()
            .map(|outcome| {
                CheckResult::stamp(&context, &fingerprint, &input.metadata, outcome, processed_at)
            })
            .collect();

        let checks_passed = results.iter().filter(|r| r.passed).count();
        for result in results.iter().filter(|r| !r.passed) {
            debug!(
                entity = %entity,
                document = %input.name,
                check = %result.check,
                description = %result.description,
                "check failed"
            );
            events.emit_processing(ProcessingEvent::CheckFailed {
                entity: entity.clone(),
                document: input.name.clone(),
                version: resolved.version,
                check: result.check.clone(),
                description: result.description.clone(),
            });
        }

        let written = self.sink.write(&results).await.inspect_err(|e| {
            error!(
                entity = %entity,
                document = %input.name,
                results = results.len(),
                error = %e,
                "failed to write results"
            );
        })?;
        self.cache.mark_completed(&entity, &input.name, &fingerprint);
        events.emit_processing(ProcessingEvent::ResultsWritten {
            entity: entity.clone(),
            document: input.name.clone(),
            count: written,
        });

        info!(
            entity = %entity,
            document = %input.name,
            version = resolved.version,
            new_version = resolved.is_new,
            passed = checks_passed,
            total = results.len(),
            "document processed"
        );
        events.emit_processing(ProcessingEvent::DocumentProcessed {
            entity: entity.clone(),
            document: input.name.clone(),
            version: resolved.version,
            new_version: resolved.is_new,
            checks_run: results.len(),
            checks_passed,
        });

        Ok(DocumentOutcome {
            name: input.name.clone(),
            entity,
            status: DocumentStatus::Processed,
            version: Some(resolved.version),
            fingerprint: Some(fingerprint),
            checks_run: results.len(),
            checks_passed,
            reason: None,
        })
    }

    /// Open the workbook and run all checks on a blocking thread
    ///
    /// The workbook is owned by the closure and dropped before it returns,
    /// on success, on check failure and on unwinding alike.
    async fn run_checks(
        &self,
        input: &DocumentInput,
        context: CheckContext,
    ) -> Result<Vec<CheckOutcome>, DocumentError> {
        let reader = Arc::clone(&self.reader);
        let registry = Arc::clone(&self.registry);
        let path = input.path.clone();

        let task = tokio::task::spawn_blocking(move || -> Result<Vec<CheckOutcome>, DocumentError> {
            let workbook = reader.open(&path)?;
            debug!(
                document = %context.document,
                sheets = workbook.sheet_count(),
                checks = registry.len(),
                "running checks"
            );
            Ok(registry.run_all(&workbook, &context))
        });

        task.await.unwrap_or_else(|join_error| {
            Err(DocumentError::Corrupt {
                path: input.path.display().to_string(),
                message: format!("reader aborted: {join_error}"),
            })
        })
    }
}

fn failed(
    events: &CorrelatedEmitter,
    entity: EntityId,
    input: &DocumentInput,
    version: Option<u32>,
    fingerprint: Option<Fingerprint>,
    err: &Error,
) -> DocumentOutcome {
    warn!(
        entity = %entity,
        document = %input.name,
        path = %input.path.display(),
        error = %err,
        "document failed"
    );
    events.emit_processing(ProcessingEvent::DocumentFailed {
        entity: entity.clone(),
        document: input.name.clone(),
        failure: FailureContext::from_error(err),
    });
    DocumentOutcome {
        name: input.name.clone(),
        entity,
        status: DocumentStatus::Failed,
        version,
        fingerprint,
        checks_run: 0,
        checks_passed: 0,
        reason: Some(err.user_message().into_owned()),
    }
}
