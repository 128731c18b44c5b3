//! Worker-side serve loop
//!
//! A worker receives descriptor frames, runs each against a fresh engine
//! session, and sends the result frame back, until the peer closes the
//! stream. Log events raised by the jobs go to the worker's own sink; the
//! wire carries only descriptors and results.
//!
//! The format is unversioned and has no error-response message: a frame
//! that fails to decode, or an engine that cannot create sessions, ends the
//! serve loop with an error and the connection drops. Script-level failures
//! always produce a result.

use std::sync::Arc;
use uuid::Uuid;

use pawl_core::LogSink;
use pawl_ipc::{IpcError, JobDescriptor, JobTransport};

use crate::cancel::CancellationSignal;
use crate::engine::ScriptEngine;
use crate::error::ExecutionError;
use crate::runner::ScriptRunner;

/// Serve jobs from a transport until the peer closes it
pub async fn serve<E, T>(
    engine: E,
    transport: &mut T,
    log: Arc<dyn LogSink>,
) -> Result<(), ExecutionError>
where
    E: ScriptEngine,
    T: JobTransport,
{
    let worker_id = Uuid::new_v4();
    tracing::info!(worker = %worker_id, "worker ready for jobs");

    loop {
        let frame = match transport.receive().await {
            Ok(frame) => frame,
            Err(IpcError::ConnectionClosed) => {
                tracing::info!(worker = %worker_id, "peer closed the job stream");
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };

        let descriptor = JobDescriptor::from_bytes(&frame)?;
        tracing::debug!(worker = %worker_id, bytes = frame.len(), "job received");

        // One fresh session per job
        let mut runner = ScriptRunner::new(&engine, Arc::clone(&log));
        let result = runner.run(&descriptor, CancellationSignal::never()).await?;

        let response = result.to_bytes()?;
        transport.send(&response).await?;
    }
}
