//! The script runner: one descriptor in, one result out
//!
//! The runner owns a single engine session, opened lazily on first use.
//! During an invocation every engine event funnels through one channel into
//! a single consumer task, which maps stream items to log events, buffers
//! collected output under a mutex, and tracks the most recent exit request.
//! Teardown of that channel is tied to the invocation itself, so exit-code
//! capture is scoped to the run on every exit path.

use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use uuid::Uuid;

use pawl_core::{LogSink, OutVariableMap, OutputCategory};
use pawl_ipc::{JobDescriptor, JobResult};

use crate::cancel::CancellationSignal;
use crate::engine::{EngineEvent, ScriptEngine, ScriptSession, SessionHost};
use crate::error::ExecutionError;

/// Runs job descriptors against a scripting engine session.
///
/// The session is exclusively owned: one runner, one session, one invocation
/// at a time. Session state (variables, preferences) persists across runs of
/// the same runner, which allows callers to pool a warm session.
pub struct ScriptRunner<E: ScriptEngine> {
    engine: E,
    session: Option<E::Session>,
    session_id: Uuid,
    log: Arc<dyn LogSink>,
    closed: bool,
}

impl<E: ScriptEngine> ScriptRunner<E> {
    pub fn new(engine: E, log: Arc<dyn LogSink>) -> Self {
        Self {
            engine,
            session: None,
            session_id: Uuid::new_v4(),
            log,
            closed: false,
        }
    }

    /// The lazily created session; creation failure is fatal
    fn session(&mut self) -> Result<&mut E::Session, ExecutionError> {
        if self.session.is_none() {
            tracing::debug!(session = %self.session_id, "opening engine session");
            self.session = Some(self.engine.open_session()?);
        }
        Ok(self.session.as_mut().expect("session initialized above"))
    }

    /// Execute one descriptor and produce its result.
    ///
    /// Script-level errors surface only as Error-level log events; they do
    /// not abort result construction. Only infrastructure failures (session
    /// creation, a rejected interactive prompt) return `Err`. Cancellation
    /// is cooperative and is not an error: the partial result recoverable at
    /// the stop point is returned.
    pub async fn run(
        &mut self,
        descriptor: &JobDescriptor,
        cancel: CancellationSignal,
    ) -> Result<JobResult, ExecutionError> {
        if self.closed {
            return Err(ExecutionError::RunnerClosed);
        }

        let log = Arc::clone(&self.log);
        let session = self.session()?;

        for (name, value) in descriptor.variables.iter() {
            log.log_debug(&format!("Importing {}={}", name, value));
            session.set_variable(name, value)?;
        }

        if descriptor.debug_logging {
            session.set_stream_preference(OutputCategory::Debug, true)?;
        }
        if descriptor.verbose_logging {
            session.set_stream_preference(OutputCategory::Verbose, true)?;
        }

        let (events, receiver) = mpsc::unbounded_channel();
        let host = SessionHost::new(events);

        // Appends arrive from the consumer task while this task is blocked
        // in the engine call; the runner reads the buffer only after the
        // consumer has drained.
        let collected = Arc::new(Mutex::new(Vec::new()));
        let consumer = tokio::spawn(pump_events(
            receiver,
            Arc::clone(&log),
            descriptor.log_output,
            descriptor.collect_output,
            Arc::clone(&collected),
        ));

        let stop = session.stop_handle();
        let stop_watch = tokio::spawn({
            let cancel = cancel.clone();
            async move {
                cancel.cancelled().await;
                tracing::debug!("cancellation requested, asking engine to stop");
                stop.request_stop();
            }
        });

        // A signal that fired before the run begins skips invocation
        // entirely; the first safe checkpoint is "before anything ran".
        let invoke_result = if cancel.is_cancelled() {
            drop(host);
            Ok(())
        } else {
            session.invoke(&descriptor.script_text, host).await
        };
        stop_watch.abort();

        // The host and all engine-held clones are gone once invoke returns,
        // so the consumer drains to completion here on every path.
        let exit_code = match consumer.await {
            Ok(code) => code,
            Err(err) => {
                tracing::error!("output consumer task failed: {err}");
                None
            }
        };

        invoke_result?;

        // Best-effort harvest, attempted even after a cooperative stop
        let mut out_variables = OutVariableMap::new();
        for name in &descriptor.out_variable_names {
            match session.get_variable(name) {
                Ok(value) => out_variables.set(name.clone(), value),
                Err(err) => {
                    log.log_warning(&format!("unable to read output variable {}: {}", name, err));
                    out_variables.set(name.clone(), None);
                }
            }
        }

        let output = {
            let mut buffer = collected.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            std::mem::take(&mut *buffer)
        };

        Ok(JobResult {
            exit_code,
            output,
            out_variables,
        })
    }

    /// Release the session. Idempotent; also runs on drop.
    pub fn close(&mut self) {
        if let Some(session) = self.session.take() {
            tracing::debug!(session = %self.session_id, "closing engine session");
            drop(session);
        }
        self.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl<E: ScriptEngine> Drop for ScriptRunner<E> {
    fn drop(&mut self) {
        self.close();
    }
}

/// Single consumer for all engine events of one invocation.
///
/// Every stream item becomes a log event per the category level mapping; the
/// output category is logged only when `log_output` is set and buffered only
/// when `collect_output` is set (both set means both happen, once each).
/// Blank output lines are never buffered. Returns the last requested exit
/// code.
async fn pump_events(
    mut receiver: mpsc::UnboundedReceiver<EngineEvent>,
    log: Arc<dyn LogSink>,
    log_output: bool,
    collect_output: bool,
    collected: Arc<Mutex<Vec<String>>>,
) -> Option<i32> {
    let mut exit_code = None;

    while let Some(event) = receiver.recv().await {
        match event {
            EngineEvent::Stream { category, text } => {
                if category != OutputCategory::Output || log_output {
                    log.log_message(category.message_level(), &text);
                }
                if category == OutputCategory::Output && collect_output && !text.trim().is_empty()
                {
                    let mut buffer =
                        collected.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                    buffer.push(text);
                }
            }
            EngineEvent::ExitRequested { code } => exit_code = Some(code),
        }
    }

    exit_code
}
