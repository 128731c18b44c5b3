//! Log events and the sink abstraction job execution reports through
//!
//! The execution runtime forwards every categorized stream item as a
//! [`LogEvent`]; callers decide where events go by supplying a [`LogSink`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::types::MessageLevel;

/// A single categorized log message emitted while a job runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEvent {
    pub level: MessageLevel,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl LogEvent {
    /// Create a new event stamped with the current time
    pub fn new(level: MessageLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Destination for log events raised during job execution.
///
/// Sinks must be callable from any thread; the runtime may deliver events
/// from engine callback threads while the invoking task is blocked.
pub trait LogSink: Send + Sync {
    /// Deliver one event
    fn log(&self, event: LogEvent);

    /// Log a message at the given level
    fn log_message(&self, level: MessageLevel, message: &str) {
        self.log(LogEvent::new(level, message));
    }

    fn log_debug(&self, message: &str) {
        self.log_message(MessageLevel::Debug, message);
    }

    fn log_information(&self, message: &str) {
        self.log_message(MessageLevel::Information, message);
    }

    fn log_warning(&self, message: &str) {
        self.log_message(MessageLevel::Warning, message);
    }

    fn log_error(&self, message: &str) {
        self.log_message(MessageLevel::Error, message);
    }
}

/// Sink that forwards events to the `tracing` subscriber
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogSink;

impl LogSink for TracingLogSink {
    fn log(&self, event: LogEvent) {
        match event.level {
            MessageLevel::Debug => tracing::debug!(target: "pawl::job", "{}", event.message),
            MessageLevel::Information => tracing::info!(target: "pawl::job", "{}", event.message),
            MessageLevel::Warning => tracing::warn!(target: "pawl::job", "{}", event.message),
            MessageLevel::Error => tracing::error!(target: "pawl::job", "{}", event.message),
        }
    }
}

/// Sink that pushes events into an unbounded channel.
///
/// Events are dropped once the receiving half is gone; logging never fails.
#[derive(Debug, Clone)]
pub struct ChannelLogSink {
    sender: mpsc::UnboundedSender<LogEvent>,
}

impl ChannelLogSink {
    /// Create a sink/receiver pair
    pub fn new() -> (Self, mpsc::UnboundedReceiver<LogEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl LogSink for ChannelLogSink {
    fn log(&self, event: LogEvent) {
        let _ = self.sender.send(event);
    }
}

/// Sink that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLogSink;

impl LogSink for NullLogSink {
    fn log(&self, _event: LogEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_sink_delivers_in_order() {
        let (sink, mut receiver) = ChannelLogSink::new();

        sink.log_debug("first");
        sink.log_error("second");

        let first = receiver.try_recv().unwrap();
        assert_eq!(first.level, MessageLevel::Debug);
        assert_eq!(first.message, "first");

        let second = receiver.try_recv().unwrap();
        assert_eq!(second.level, MessageLevel::Error);
        assert_eq!(second.message, "second");
    }

    #[test]
    fn test_channel_sink_survives_dropped_receiver() {
        let (sink, receiver) = ChannelLogSink::new();
        drop(receiver);

        // Must not panic or error
        sink.log_information("nobody is listening");
    }

    #[test]
    fn test_level_helpers_set_level() {
        let (sink, mut receiver) = ChannelLogSink::new();
        sink.log_warning("careful");

        let event = receiver.try_recv().unwrap();
        assert_eq!(event.level, MessageLevel::Warning);
    }
}
