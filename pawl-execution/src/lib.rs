//! Script execution runtime for Pawl
//!
//! This crate runs one [`JobDescriptor`](pawl_ipc::JobDescriptor) against a
//! scripting engine session and produces one
//! [`JobResult`](pawl_ipc::JobResult), multiplexing the engine's five output
//! streams into categorized log events along the way. The engine itself is
//! an injected collaborator behind the [`ScriptEngine`] trait; the crate
//! ships a [`StubEngine`] interpreter for tests and simulation.

pub mod cancel;
pub mod engine;
pub mod error;
pub mod executor;
pub mod process;
pub mod runner;
pub mod stub;
pub mod worker;

// Re-export main types
pub use cancel::{CancellationSignal, CancellationSource};
pub use engine::{EngineEvent, ScriptEngine, ScriptSession, SessionHost, StopHandle};
pub use error::{EngineError, ExecutionError};
pub use executor::{JobExecutor, LocalJobExecutor, RemoteJobExecutor};
pub use process::{ProcessExecutorConfig, ProcessJobExecutor};
pub use runner::ScriptRunner;
pub use stub::{StubEngine, StubSession};
pub use worker::serve;
