//! Core domain types for Pawl
//!
//! This crate holds the types shared by the script-analysis, wire-protocol,
//! and execution crates: the categorized output streams an engine emits, the
//! log event/sink abstraction those streams are multiplexed into, and the
//! case-insensitive variable maps used by job descriptors and results.

pub mod logging;
pub mod types;
pub mod vars;

// Re-export commonly used types
pub use logging::{ChannelLogSink, LogEvent, LogSink, NullLogSink, TracingLogSink};
pub use types::{MessageLevel, OutputCategory};
pub use vars::{OutVariableMap, VariableMap};
