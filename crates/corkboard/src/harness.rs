//! Harness pieces for driving the pipeline without a real host.
//!
//! A [`RecordingSink`] captures diagnostics and a [`CaptureChannel`]
//! captures outbound messages, so tests assert on what the engine did
//! instead of scraping log text. Both are cheap cloneable handles to
//! shared storage: install one clone, keep the other to inspect.
//!
//! # Example
//!
//! ```rust
//! use corkboard::engine::CardGrid;
//! use corkboard::diag::Severity;
//! use corkboard::harness::RecordingSink;
//! use serde_json::json;
//!
//! let sink = RecordingSink::new();
//! let mut grid = CardGrid::new().with_sink(sink.clone());
//! grid.inject(json!(["not", "a", "payload"]));
//!
//! assert!(sink.max_severity() >= Some(Severity::Error));
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use crate::diag::{DiagnosticEvent, DiagnosticSink, Severity};
use crate::outbound::{OutboundChannel, UserMessage};

/// Sink that records every diagnostic event in arrival order.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Rc<RefCell<Vec<DiagnosticEvent>>>,
}

impl RecordingSink {
    /// Create an empty recording sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<DiagnosticEvent> {
        self.events.borrow().clone()
    }

    /// Number of events recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    /// True when nothing was recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    /// True when `event` was recorded at least once.
    #[must_use]
    pub fn contains(&self, event: &DiagnosticEvent) -> bool {
        self.events.borrow().iter().any(|seen| seen == event)
    }

    /// The highest severity recorded so far, if anything was.
    #[must_use]
    pub fn max_severity(&self) -> Option<Severity> {
        self.events
            .borrow()
            .iter()
            .map(DiagnosticEvent::severity)
            .max()
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl DiagnosticSink for RecordingSink {
    fn report(&self, event: &DiagnosticEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}

/// Channel that captures outbound messages instead of delivering them.
#[derive(Debug, Clone, Default)]
pub struct CaptureChannel {
    sent: Rc<RefCell<Vec<UserMessage>>>,
}

impl CaptureChannel {
    /// Create an empty capture channel.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every message sent so far.
    #[must_use]
    pub fn sent(&self) -> Vec<UserMessage> {
        self.sent.borrow().clone()
    }

    /// The most recently sent message, if any.
    #[must_use]
    pub fn last(&self) -> Option<UserMessage> {
        self.sent.borrow().last().cloned()
    }
}

impl OutboundChannel for CaptureChannel {
    fn send(&self, message: &UserMessage) {
        self.sent.borrow_mut().push(message.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::PayloadError;

    #[test]
    fn test_recording_sink_clones_share_storage() {
        let sink = RecordingSink::new();
        let handle = sink.clone();
        sink.report(&DiagnosticEvent::InboundReceived);
        assert_eq!(handle.len(), 1);
        assert!(handle.contains(&DiagnosticEvent::InboundReceived));
    }

    #[test]
    fn test_recording_sink_max_severity() {
        let sink = RecordingSink::new();
        assert_eq!(sink.max_severity(), None);
        sink.report(&DiagnosticEvent::InboundReceived);
        assert_eq!(sink.max_severity(), Some(Severity::Info));
        sink.report(&DiagnosticEvent::MalformedEnvelope);
        assert_eq!(sink.max_severity(), Some(Severity::Warning));
        sink.report(&DiagnosticEvent::InvalidPayload(PayloadError::NotAnObject));
        assert_eq!(sink.max_severity(), Some(Severity::Error));
    }

    #[test]
    fn test_recording_sink_clear() {
        let sink = RecordingSink::new();
        sink.report(&DiagnosticEvent::NoSelection);
        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn test_capture_channel_keeps_order() {
        let channel = CaptureChannel::new();
        channel.send(&UserMessage::new("first", "1"));
        channel.send(&UserMessage::new("second", "2"));
        let sent = channel.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].message, "first");
        assert_eq!(channel.last().map(|m| m.message), Some("second".to_owned()));
    }
}
