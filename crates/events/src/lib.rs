#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Event system for sheetcheck
//!
//! Library crates report progress by emitting events rather than printing.
//! The CLI drains the channel and turns each [`EventMessage`] into a
//! structured `tracing` record.
//!
//! ## Architecture
//!
//! - **Domain events**: [`GeneralEvent`] for generic notices and
//!   [`ProcessingEvent`] for the validation pipeline
//! - **Metadata**: every emission carries an [`EventMeta`] with id, timestamp,
//!   level and source
//! - **Fire and forget**: [`EventEmitter::emit`] never fails; a dropped
//!   receiver is ignored
//! - **Correlation**: [`CorrelatedEmitter`] stamps one id on every event of a
//!   batch run

pub mod meta;
pub use meta::{EventLevel, EventMeta, EventSource};

pub mod events;
pub use events::{AppEvent, FailureContext, GeneralEvent, ProcessingEvent};

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;
use uuid::Uuid;

/// An event together with its emission metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMessage {
    pub meta: EventMeta,
    pub event: AppEvent,
}

impl EventMessage {
    #[must_use]
    pub fn new(meta: EventMeta, event: AppEvent) -> Self {
        Self { meta, event }
    }

    /// Wrap an event with metadata derived from its domain and severity
    #[must_use]
    pub fn from_event(event: AppEvent) -> Self {
        let meta = EventMeta::new(event.log_level(), event.event_source());
        Self { meta, event }
    }
}

/// Type alias for the event sender
pub type EventSender = UnboundedSender<EventMessage>;

/// Type alias for the event receiver
pub type EventReceiver = tokio::sync::mpsc::UnboundedReceiver<EventMessage>;

/// Create a new event channel
#[must_use]
pub fn channel() -> (EventSender, EventReceiver) {
    tokio::sync::mpsc::unbounded_channel()
}

/// The unified trait for emitting events
///
/// Implemented for the raw [`EventSender`] and for any struct that may hold
/// one, so callers never branch on whether events are being collected.
pub trait EventEmitter {
    /// Get the event sender for this emitter
    fn event_sender(&self) -> Option<&EventSender>;

    /// Emit an event with explicit metadata
    fn emit_with_meta(&self, meta: EventMeta, event: AppEvent) {
        if let Some(sender) = self.event_sender() {
            // Ignore send errors - if receiver is dropped, we just continue
            let _ = sender.send(EventMessage::new(meta, event));
        }
    }

    /// Emit an event with metadata derived from the event itself
    fn emit(&self, event: AppEvent) {
        let meta = EventMeta::new(event.log_level(), event.event_source());
        self.emit_with_meta(meta, event);
    }

    /// Emit a processing event
    fn emit_processing(&self, event: ProcessingEvent) {
        self.emit(AppEvent::Processing(event));
    }

    /// Emit a warning event
    fn emit_warning(&self, message: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::warning(message)));
    }

    /// Emit an operation started event
    fn emit_operation_started(&self, operation: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::OperationStarted {
            operation: operation.into(),
        }));
    }

    /// Emit an operation completed event
    fn emit_operation_completed(&self, operation: impl Into<String>, success: bool) {
        self.emit(AppEvent::General(GeneralEvent::OperationCompleted {
            operation: operation.into(),
            success,
        }));
    }

    /// Emit an operation failed event
    fn emit_operation_failed(&self, operation: impl Into<String>, error: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::OperationFailed {
            operation: operation.into(),
            error: error.into(),
        }));
    }
}

impl EventEmitter for EventSender {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(self)
    }
}

impl EventEmitter for Option<EventSender> {
    fn event_sender(&self) -> Option<&EventSender> {
        self.as_ref()
    }
}

/// Emitter that attaches the same correlation id to everything it sends
#[derive(Debug, Clone)]
pub struct CorrelatedEmitter {
    sender: Option<EventSender>,
    correlation_id: String,
}

impl CorrelatedEmitter {
    /// Wrap a sender under a fresh random correlation id
    #[must_use]
    pub fn new(sender: Option<EventSender>) -> Self {
        Self {
            sender,
            correlation_id: Uuid::new_v4().to_string(),
        }
    }

    #[must_use]
    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }
}

impl EventEmitter for CorrelatedEmitter {
    fn event_sender(&self) -> Option<&EventSender> {
        self.sender.as_ref()
    }

    fn emit(&self, event: AppEvent) {
        let meta = EventMeta::new(event.log_level(), event.event_source())
            .with_correlation_id(self.correlation_id.as_str());
        self.emit_with_meta(meta, event);
    }
}
