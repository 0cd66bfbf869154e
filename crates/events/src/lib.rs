#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Event system for imgcheck
//!
//! All verification progress and diagnostics flow through events - no
//! direct logging or printing is allowed outside the CLI. Events are
//! grouped by functional domain (Check, General) and consumed by the
//! CLI's handler thread.

pub mod events;
pub use events::{
    AppEvent, CheckEvent, CheckFailureInfo, CheckTargetSummary, GeneralEvent, RunMetrics,
};

use crossbeam::channel::{Receiver, Sender};

/// Type alias for event sender using the `AppEvent` system
pub type EventSender = Sender<AppEvent>;

/// Type alias for event receiver using the `AppEvent` system
pub type EventReceiver = Receiver<AppEvent>;

/// Create a new event channel with the `AppEvent` system
#[must_use]
pub fn channel() -> (EventSender, EventReceiver) {
    crossbeam::channel::unbounded()
}

/// The unified trait for emitting events throughout imgcheck
///
/// This trait provides a single, consistent API for emitting events
/// regardless of whether you have a raw `EventSender` or a struct that
/// contains one.
pub trait EventEmitter {
    /// Get the event sender for this emitter
    fn event_sender(&self) -> Option<&EventSender>;

    /// Emit an event through this emitter
    fn emit(&self, event: AppEvent) {
        if let Some(sender) = self.event_sender() {
            // Ignore send errors - if receiver is dropped, we just continue
            let _ = sender.send(event);
        }
    }

    /// Emit a debug log event
    fn emit_debug(&self, message: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::debug(message)));
    }

    /// Emit a warning event
    fn emit_warning(&self, message: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::warning(message)));
    }

    /// Emit an error event
    fn emit_error(&self, message: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::error(message)));
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
}

impl EventEmitter for EventSender {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(self)
    }
}
