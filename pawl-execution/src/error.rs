//! Error types for script execution

use thiserror::Error;

use pawl_ipc::{IpcError, WireError};

/// Infrastructure failures reported by a scripting engine.
///
/// Script-level errors never appear here; they surface as Error-level
/// stream events and leave the invocation's result intact.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine could not create an execution session
    #[error("failed to initialize script engine session: {0}")]
    InitializationFailed(String),

    /// The script attempted to read interactive input; execution is
    /// unattended by contract
    #[error("interactive prompts are not supported: {0}")]
    PromptsNotSupported(String),

    /// Any other engine-internal failure
    #[error("script engine failure: {0}")]
    EngineFailure(String),
}

/// Errors produced while executing a job
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("IPC error: {0}")]
    Ipc(#[from] IpcError),

    #[error("wire format error: {0}")]
    Wire(#[from] WireError),

    /// The runner was closed and cannot run further jobs
    #[error("script runner is closed")]
    RunnerClosed,

    #[error("worker process error: {0}")]
    WorkerProcess(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_errors_convert() {
        let err: ExecutionError = EngineError::InitializationFailed("no engine".to_string()).into();
        assert!(matches!(err, ExecutionError::Engine(_)));

        let err: ExecutionError = IpcError::ConnectionClosed.into();
        assert!(matches!(err, ExecutionError::Ipc(_)));
    }
}
