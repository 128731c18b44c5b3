//! Process-based job executor
//!
//! Spawns a worker binary (`pawl worker` or equivalent) and drives it over
//! its stdio pipes. The worker owns the engine; this side only moves frames.

use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::{Child, Command};
use uuid::Uuid;

use pawl_ipc::{ChildProcessTransport, JobDescriptor, JobResult};

use crate::cancel::CancellationSignal;
use crate::error::ExecutionError;
use crate::executor::{JobExecutor, RemoteJobExecutor};

/// Configuration for a spawned worker process
#[derive(Debug, Clone)]
pub struct ProcessExecutorConfig {
    /// Worker binary to run
    pub program: PathBuf,

    /// Arguments passed to the worker
    pub args: Vec<String>,

    /// Kill the worker if this executor is dropped before `stop`
    pub kill_on_drop: bool,
}

impl ProcessExecutorConfig {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            kill_on_drop: true,
        }
    }
}

/// Executes jobs in a dedicated worker process
pub struct ProcessJobExecutor {
    config: ProcessExecutorConfig,
    worker_id: Uuid,
    child: Option<Child>,
    remote: Option<RemoteJobExecutor<ChildProcessTransport>>,
}

impl ProcessJobExecutor {
    pub fn new(config: ProcessExecutorConfig) -> Self {
        Self {
            config,
            worker_id: Uuid::new_v4(),
            child: None,
            remote: None,
        }
    }

    /// Spawn the worker process. Idempotent while running.
    pub async fn start(&mut self) -> Result<(), ExecutionError> {
        if self.remote.is_some() {
            return Ok(());
        }

        let mut child = Command::new(&self.config.program)
            .args(&self.config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .kill_on_drop(self.config.kill_on_drop)
            .spawn()
            .map_err(|err| {
                ExecutionError::WorkerProcess(format!(
                    "failed to spawn {}: {}",
                    self.config.program.display(),
                    err
                ))
            })?;

        let stdin = child.stdin.take().ok_or_else(|| {
            ExecutionError::WorkerProcess("worker stdin was not captured".to_string())
        })?;
        let stdout = child.stdout.take().ok_or_else(|| {
            ExecutionError::WorkerProcess("worker stdout was not captured".to_string())
        })?;

        tracing::info!(
            worker = %self.worker_id,
            pid = child.id(),
            program = %self.config.program.display(),
            "worker process started"
        );

        self.remote = Some(RemoteJobExecutor::new(ChildProcessTransport::child_process(
            stdout, stdin,
        )));
        self.child = Some(child);
        Ok(())
    }

    /// Close the worker's stdin and wait for it to exit
    pub async fn stop(&mut self) -> Result<(), ExecutionError> {
        if let Some(mut remote) = self.remote.take() {
            remote.close().await?;
        }

        if let Some(mut child) = self.child.take() {
            let status = child.wait().await.map_err(|err| {
                ExecutionError::WorkerProcess(format!("failed to wait for worker: {}", err))
            })?;
            tracing::info!(worker = %self.worker_id, %status, "worker process exited");
        }

        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.remote.is_some()
    }
}

#[async_trait]
impl JobExecutor for ProcessJobExecutor {
    async fn execute_job(
        &mut self,
        descriptor: &JobDescriptor,
        cancel: CancellationSignal,
    ) -> Result<JobResult, ExecutionError> {
        let remote = self.remote.as_mut().ok_or_else(|| {
            ExecutionError::WorkerProcess("worker process is not running".to_string())
        })?;
        remote.execute_job(descriptor, cancel).await
    }
}
