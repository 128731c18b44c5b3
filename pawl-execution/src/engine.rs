//! The narrow contract a scripting engine must satisfy
//!
//! A session holds named variable state across one script run, emits items
//! on five independent output streams, and supports a cooperative stop. The
//! runtime is written entirely against these traits; the real platform
//! engine and the in-memory stub both live behind them.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc;

use pawl_core::OutputCategory;

use crate::error::EngineError;

/// One event raised by an engine during invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// An item arrived on one of the output streams
    Stream {
        category: OutputCategory,
        text: String,
    },

    /// The script asked the host to terminate with an exit code
    ExitRequested { code: i32 },
}

/// Callback surface handed to an engine for the duration of one invocation.
///
/// Stream writers may be called from any thread the engine spawns; events
/// funnel into a single consumer owned by the runtime. Clones must not
/// outlive the invocation; the runtime waits for every sender to drop
/// before it finalizes the result.
///
/// The interactive entry points unconditionally fail: execution is
/// unattended by contract and the host never supplies input.
#[derive(Debug, Clone)]
pub struct SessionHost {
    events: mpsc::UnboundedSender<EngineEvent>,
}

impl SessionHost {
    pub(crate) fn new(events: mpsc::UnboundedSender<EngineEvent>) -> Self {
        Self { events }
    }

    /// Emit one item on an output stream
    pub fn write(&self, category: OutputCategory, text: impl Into<String>) {
        let _ = self.events.send(EngineEvent::Stream {
            category,
            text: text.into(),
        });
    }

    pub fn write_output(&self, text: impl Into<String>) {
        self.write(OutputCategory::Output, text);
    }

    pub fn write_debug(&self, text: impl Into<String>) {
        self.write(OutputCategory::Debug, text);
    }

    pub fn write_verbose(&self, text: impl Into<String>) {
        self.write(OutputCategory::Verbose, text);
    }

    pub fn write_warning(&self, text: impl Into<String>) {
        self.write(OutputCategory::Warning, text);
    }

    pub fn write_error(&self, text: impl Into<String>) {
        self.write(OutputCategory::Error, text);
    }

    /// Record the script's requested exit code; the latest request wins
    pub fn request_exit(&self, code: i32) {
        let _ = self.events.send(EngineEvent::ExitRequested { code });
    }

    /// Always fails: no console input during unattended execution
    pub fn read_line(&self) -> Result<String, EngineError> {
        Err(EngineError::PromptsNotSupported(
            "reading lines from the console is not supported".to_string(),
        ))
    }

    /// Always fails: no interactive prompts during unattended execution
    pub fn prompt(&self, message: &str) -> Result<String, EngineError> {
        Err(EngineError::PromptsNotSupported(format!(
            "input prompt rejected: {}",
            message
        )))
    }

    /// Always fails: no credential prompts during unattended execution
    pub fn prompt_for_credential(&self, message: &str) -> Result<(String, String), EngineError> {
        Err(EngineError::PromptsNotSupported(format!(
            "credential prompt rejected: {}",
            message
        )))
    }
}

/// Cooperative stop request for an in-flight invocation.
///
/// Advisory only; the engine halts at its next internal checkpoint, not
/// instantaneously.
pub trait StopHandle: Send + Sync {
    fn request_stop(&self);
}

/// An isolated execution context holding named variable state across one
/// script run. Owned exclusively by one runner for its lifetime; never
/// shared across concurrent invocations.
#[async_trait]
pub trait ScriptSession: Send {
    /// Set a session-level variable before (or between) runs
    fn set_variable(&mut self, name: &str, value: &str) -> Result<(), EngineError>;

    /// Read a session-level variable; `None` when unset
    fn get_variable(&mut self, name: &str) -> Result<Option<String>, EngineError>;

    /// Enable or disable delivery of the debug/verbose streams
    fn set_stream_preference(
        &mut self,
        category: OutputCategory,
        enabled: bool,
    ) -> Result<(), EngineError>;

    /// Handle that can request a stop of an in-flight invocation
    fn stop_handle(&self) -> Arc<dyn StopHandle>;

    /// Run script text as a single unit of execution bound to this session.
    ///
    /// Script-level errors go to the error stream and return `Ok`; only
    /// infrastructure failures (including a rejected interactive prompt)
    /// return `Err`.
    async fn invoke(&mut self, script: &str, host: SessionHost) -> Result<(), EngineError>;
}

/// Factory for execution sessions
pub trait ScriptEngine: Send + Sync {
    type Session: ScriptSession;

    fn open_session(&self) -> Result<Self::Session, EngineError>;
}

impl<E: ScriptEngine> ScriptEngine for &E {
    type Session = E::Session;

    fn open_session(&self) -> Result<Self::Session, EngineError> {
        (**self).open_session()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_forwards_stream_events() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let host = SessionHost::new(tx);

        host.write_output("out");
        host.write_error("err");
        host.request_exit(2);
        drop(host);

        assert_eq!(
            rx.try_recv().unwrap(),
            EngineEvent::Stream {
                category: OutputCategory::Output,
                text: "out".to_string()
            }
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            EngineEvent::Stream {
                category: OutputCategory::Error,
                text: "err".to_string()
            }
        );
        assert_eq!(rx.try_recv().unwrap(), EngineEvent::ExitRequested { code: 2 });
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_interactive_entry_points_always_fail() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let host = SessionHost::new(tx);

        assert!(matches!(
            host.read_line(),
            Err(EngineError::PromptsNotSupported(_))
        ));
        assert!(matches!(
            host.prompt("pick one"),
            Err(EngineError::PromptsNotSupported(_))
        ));
        assert!(matches!(
            host.prompt_for_credential("login"),
            Err(EngineError::PromptsNotSupported(_))
        ));
    }
}
