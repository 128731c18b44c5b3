//! Job executor implementations
//!
//! A [`JobExecutor`] takes one descriptor to one result. The local executor
//! runs in-process against an engine; the remote executor ships the
//! descriptor over a [`JobTransport`] and decodes what comes back.

use async_trait::async_trait;
use std::sync::Arc;

use pawl_core::LogSink;
use pawl_ipc::{JobDescriptor, JobResult, JobTransport};

use crate::cancel::CancellationSignal;
use crate::engine::ScriptEngine;
use crate::error::ExecutionError;
use crate::runner::ScriptRunner;

/// Executes one job per call, serially
#[async_trait]
pub trait JobExecutor: Send {
    async fn execute_job(
        &mut self,
        descriptor: &JobDescriptor,
        cancel: CancellationSignal,
    ) -> Result<JobResult, ExecutionError>;
}

/// Runs jobs in-process against an engine session
pub struct LocalJobExecutor<E: ScriptEngine> {
    runner: ScriptRunner<E>,
}

impl<E: ScriptEngine> LocalJobExecutor<E> {
    pub fn new(engine: E, log: Arc<dyn LogSink>) -> Self {
        Self {
            runner: ScriptRunner::new(engine, log),
        }
    }

    /// Release the underlying session
    pub fn close(&mut self) {
        self.runner.close();
    }
}

#[async_trait]
impl<E: ScriptEngine> JobExecutor for LocalJobExecutor<E> {
    async fn execute_job(
        &mut self,
        descriptor: &JobDescriptor,
        cancel: CancellationSignal,
    ) -> Result<JobResult, ExecutionError> {
        self.runner.run(descriptor, cancel).await
    }
}

/// Ships jobs across a transport to a remote worker.
///
/// One request/response round trip per job. The wire format carries no
/// cancellation message, so the `cancel` signal cannot reach the far side;
/// abandoning a remote job means tearing down the transport.
pub struct RemoteJobExecutor<T: JobTransport> {
    transport: T,
}

impl<T: JobTransport> RemoteJobExecutor<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Close the underlying transport, signalling EOF to the worker
    pub async fn close(&mut self) -> Result<(), ExecutionError> {
        self.transport.close().await?;
        Ok(())
    }
}

#[async_trait]
impl<T: JobTransport> JobExecutor for RemoteJobExecutor<T> {
    async fn execute_job(
        &mut self,
        descriptor: &JobDescriptor,
        _cancel: CancellationSignal,
    ) -> Result<JobResult, ExecutionError> {
        let frame = descriptor.to_bytes()?;
        self.transport.send(&frame).await?;

        let response = self.transport.receive().await?;
        let result = JobResult::from_bytes(&response)?;
        Ok(result)
    }
}
