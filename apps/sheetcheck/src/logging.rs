//! Structured logging integration for events
//!
//! Converts pipeline events into tracing records with structured fields.

use sheetcheck_events::{AppEvent, EventMessage, GeneralEvent, ProcessingEvent};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

/// Initialize tracing/logging
///
/// Logs go to stderr so that JSON results on stdout stay parseable.
pub fn init_tracing(json_mode: bool, debug_enabled: bool) {
    let default_filter = if debug_enabled {
        "debug,sheetcheck=debug"
    } else {
        "info,sheetcheck=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json_mode {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Log an `EventMessage` at its level with structured fields
pub fn log_event_with_tracing(message: &EventMessage) {
    let meta = &message.meta;
    match &message.event {
        AppEvent::Processing(processing_event) => match processing_event {
            ProcessingEvent::BatchStarted {
                documents,
                checks,
                force,
            } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    documents = documents,
                    checks = checks,
                    force = force,
                    "Batch started"
                );
            }
            ProcessingEvent::DocumentSkipped {
                entity,
                document,
                version,
            } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    entity = %entity,
                    document = %document,
                    version = version,
                    "Document unchanged, skipped"
                );
            }
            ProcessingEvent::DocumentProcessed {
                entity,
                document,
                version,
                new_version,
                checks_run,
                checks_passed,
            } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    entity = %entity,
                    document = %document,
                    version = version,
                    new_version = new_version,
                    checks_run = checks_run,
                    checks_passed = checks_passed,
                    "Document processed"
                );
            }
            ProcessingEvent::DocumentFailed {
                entity,
                document,
                failure,
            } => {
                warn!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    entity = %entity,
                    document = %document,
                    retryable = failure.retryable,
                    code = ?failure.code,
                    message = %failure.message,
                    hint = ?failure.hint,
                    "Document failed"
                );
            }
            ProcessingEvent::CheckFailed {
                entity,
                document,
                version,
                check,
                description,
            } => {
                debug!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    entity = %entity,
                    document = %document,
                    version = version,
                    check = %check,
                    description = %description,
                    "Check failed"
                );
            }
            ProcessingEvent::ResultsWritten {
                entity,
                document,
                count,
            } => {
                debug!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    entity = %entity,
                    document = %document,
                    count = count,
                    "Results written"
                );
            }
            ProcessingEvent::BatchCompleted {
                processed,
                skipped,
                failed,
                checks_run,
                checks_passed,
                duration_ms,
            } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    processed = processed,
                    skipped = skipped,
                    failed = failed,
                    checks_run = checks_run,
                    checks_passed = checks_passed,
                    duration_ms = duration_ms,
                    "Batch completed"
                );
            }
        },

        AppEvent::General(general_event) => match general_event {
            GeneralEvent::OperationFailed { operation, error } => {
                error!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    operation = %operation,
                    error = %error,
                    "Operation failed"
                );
            }
            GeneralEvent::Warning { message } => {
                warn!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    message = %message,
                    "Warning"
                );
            }
            GeneralEvent::OperationStarted { operation } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    operation = %operation,
                    "Operation started"
                );
            }
            GeneralEvent::OperationCompleted { operation, success } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    operation = %operation,
                    success = success,
                    "Operation completed"
                );
            }
        },
    }
}
