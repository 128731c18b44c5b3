//! In-memory stub engine
//!
//! A line-oriented interpreter for a small slice of the scripting surface,
//! used by tests, `pawl run`, and simulation. It honors the full session
//! contract: variable state, debug/verbose stream preferences, cooperative
//! stop between statements, and the unattended-prompt policy.
//!
//! Supported statements: `Write-Output` / `Write-Error` / `Write-Warning` /
//! `Write-Debug` / `Write-Verbose`, `$name = value` assignment, a bare
//! `$name` or string literal (echoed to output), `exit N`, `Read-Host`
//! (rejected by policy), and `Start-Sleep -Seconds/-Milliseconds N`.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use pawl_core::{OutputCategory, VariableMap};

use crate::engine::{ScriptEngine, ScriptSession, SessionHost, StopHandle};
use crate::error::EngineError;

/// Engine whose sessions interpret scripts in-process
#[derive(Debug, Clone, Copy, Default)]
pub struct StubEngine;

impl StubEngine {
    pub fn new() -> Self {
        Self
    }
}

impl ScriptEngine for StubEngine {
    type Session = StubSession;

    fn open_session(&self) -> Result<Self::Session, EngineError> {
        Ok(StubSession::new())
    }
}

/// One stub execution context
pub struct StubSession {
    variables: VariableMap,
    debug_enabled: bool,
    verbose_enabled: bool,
    stopped: Arc<AtomicBool>,
}

struct StubStop(Arc<AtomicBool>);

impl StopHandle for StubStop {
    fn request_stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

enum Flow {
    Continue,
    Exit,
}

impl StubSession {
    fn new() -> Self {
        Self {
            variables: VariableMap::new(),
            debug_enabled: false,
            verbose_enabled: false,
            stopped: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Resolve one argument expression: quoted strings (single quotes are
    /// literal, double quotes expand), otherwise bare text with expansion.
    fn evaluate(&self, text: &str) -> String {
        let text = text.trim();
        if text.len() >= 2 {
            if let Some(inner) = text.strip_prefix('\'').and_then(|t| t.strip_suffix('\'')) {
                return inner.replace("''", "'");
            }
            if let Some(inner) = text.strip_prefix('"').and_then(|t| t.strip_suffix('"')) {
                return self.expand(inner);
            }
        }
        self.expand(text)
    }

    /// Substitute `$name` / `${name}` references and resolve backtick escapes
    fn expand(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut chars = text.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '`' => {
                    if let Some(escaped) = chars.next() {
                        out.push(match escaped {
                            'n' => '\n',
                            't' => '\t',
                            'r' => '\r',
                            other => other,
                        });
                    }
                }
                '$' => match chars.peek() {
                    Some('{') => {
                        chars.next();
                        let mut name = String::new();
                        for c in chars.by_ref() {
                            if c == '}' {
                                break;
                            }
                            name.push(c);
                        }
                        out.push_str(self.variables.get(&name).unwrap_or(""));
                    }
                    Some(&next) if next.is_alphanumeric() || next == '_' => {
                        let mut name = String::new();
                        while let Some(&next) = chars.peek() {
                            if !(next.is_alphanumeric() || next == '_') {
                                break;
                            }
                            name.push(next);
                            chars.next();
                        }
                        out.push_str(self.variables.get(&name).unwrap_or(""));
                    }
                    _ => out.push('$'),
                },
                other => out.push(other),
            }
        }

        out
    }

    async fn execute_line(&mut self, line: &str, host: &SessionHost) -> Result<Flow, EngineError> {
        // $name = value
        if let Some(rest) = line.strip_prefix('$') {
            if let Some((name, value)) = rest.split_once('=') {
                let name = name.trim();
                if !name.is_empty() && name.chars().all(|c| c.is_alphanumeric() || c == '_') {
                    let value = self.evaluate(value);
                    self.variables.insert(name, value);
                    return Ok(Flow::Continue);
                }
            }
        }

        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        match command.to_ascii_lowercase().as_str() {
            "write-output" => host.write_output(self.evaluate(rest)),
            "write-error" => host.write_error(self.evaluate(rest)),
            "write-warning" => host.write_warning(self.evaluate(rest)),
            "write-debug" => {
                // Suppressed unless the debug preference was enabled
                if self.debug_enabled {
                    host.write_debug(self.evaluate(rest));
                }
            }
            "write-verbose" => {
                if self.verbose_enabled {
                    host.write_verbose(self.evaluate(rest));
                }
            }
            "exit" => {
                host.request_exit(rest.parse().unwrap_or(0));
                return Ok(Flow::Exit);
            }
            "read-host" => {
                host.read_line()?;
            }
            "start-sleep" => {
                tokio::time::sleep(parse_sleep(rest)).await;
            }
            _ if command.starts_with('$') => {
                // Bare reference echoes its value; unset produces nothing
                let value = self.evaluate(command);
                if !value.is_empty() {
                    host.write_output(value);
                }
            }
            _ if command.starts_with('"') || command.starts_with('\'') => {
                host.write_output(self.evaluate(line));
            }
            _ => host.write_error(format!(
                "The term '{}' is not recognized as a command",
                command
            )),
        }

        Ok(Flow::Continue)
    }
}

fn parse_sleep(arguments: &str) -> Duration {
    let mut millis = 0u64;
    let mut parts = arguments.split_whitespace();
    while let Some(part) = parts.next() {
        if part.eq_ignore_ascii_case("-milliseconds") {
            millis = parts.next().and_then(|v| v.parse().ok()).unwrap_or(0);
        } else if part.eq_ignore_ascii_case("-seconds") {
            millis = parts.next().and_then(|v| v.parse().ok()).unwrap_or(0) * 1000;
        }
    }
    Duration::from_millis(millis)
}

#[async_trait]
impl ScriptSession for StubSession {
    fn set_variable(&mut self, name: &str, value: &str) -> Result<(), EngineError> {
        self.variables.insert(name, value);
        Ok(())
    }

    fn get_variable(&mut self, name: &str) -> Result<Option<String>, EngineError> {
        Ok(self.variables.get(name).map(str::to_string))
    }

    fn set_stream_preference(
        &mut self,
        category: OutputCategory,
        enabled: bool,
    ) -> Result<(), EngineError> {
        match category {
            OutputCategory::Debug => self.debug_enabled = enabled,
            OutputCategory::Verbose => self.verbose_enabled = enabled,
            // Warning, error, and output always flow
            _ => {}
        }
        Ok(())
    }

    fn stop_handle(&self) -> Arc<dyn StopHandle> {
        Arc::new(StubStop(Arc::clone(&self.stopped)))
    }

    async fn invoke(&mut self, script: &str, host: SessionHost) -> Result<(), EngineError> {
        for raw_line in script.lines() {
            // Stop is observed between statements; a stopped session stays
            // stopped and its runner is expected to be discarded
            if self.stopped.load(Ordering::SeqCst) {
                break;
            }

            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Flow::Exit = self.execute_line(line, &host).await? {
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineEvent;
    use tokio::sync::mpsc;

    async fn run_script(session: &mut StubSession, script: &str) -> Vec<EngineEvent> {
        let (tx, mut rx) = mpsc::unbounded_channel();
        session
            .invoke(script, SessionHost::new(tx))
            .await
            .expect("stub invoke failed");

        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    fn output_lines(events: &[EngineEvent]) -> Vec<&str> {
        events
            .iter()
            .filter_map(|e| match e {
                EngineEvent::Stream {
                    category: OutputCategory::Output,
                    text,
                } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_interpolation_forms() {
        let mut session = StubSession::new();
        session.set_variable("Name", "world").unwrap();

        let events = run_script(
            &mut session,
            "Write-Output \"hi $Name and ${Name} and `$Name\"",
        )
        .await;
        assert_eq!(output_lines(&events), vec!["hi world and world and $Name"]);
    }

    #[tokio::test]
    async fn test_single_quotes_do_not_expand() {
        let mut session = StubSession::new();
        session.set_variable("x", "value").unwrap();

        let events = run_script(&mut session, "Write-Output '$x literal'").await;
        assert_eq!(output_lines(&events), vec!["$x literal"]);
    }

    #[tokio::test]
    async fn test_assignment_and_lookup_are_case_insensitive() {
        let mut session = StubSession::new();
        run_script(&mut session, "$Mixed = \"stored\"").await;

        assert_eq!(session.get_variable("MIXED").unwrap().as_deref(), Some("stored"));
        assert_eq!(session.get_variable("other").unwrap(), None);
    }

    #[tokio::test]
    async fn test_exit_stops_remaining_statements() {
        let mut session = StubSession::new();
        let events = run_script(&mut session, "exit 7\nWrite-Output unreachable").await;

        assert!(events.contains(&EngineEvent::ExitRequested { code: 7 }));
        assert!(output_lines(&events).is_empty());
    }

    #[tokio::test]
    async fn test_debug_and_verbose_gated_by_preference() {
        let mut session = StubSession::new();
        let events = run_script(&mut session, "Write-Debug d\nWrite-Verbose v").await;
        assert!(events.is_empty());

        session
            .set_stream_preference(OutputCategory::Debug, true)
            .unwrap();
        session
            .set_stream_preference(OutputCategory::Verbose, true)
            .unwrap();
        let events = run_script(&mut session, "Write-Debug d\nWrite-Verbose v").await;
        assert_eq!(events.len(), 2);
    }

    #[tokio::test]
    async fn test_read_host_trips_prompt_policy() {
        let mut session = StubSession::new();
        let (tx, _rx) = mpsc::unbounded_channel();

        let err = session
            .invoke("Read-Host answer", SessionHost::new(tx))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::PromptsNotSupported(_)));
    }

    #[tokio::test]
    async fn test_unknown_command_is_script_level_error() {
        let mut session = StubSession::new();
        let events = run_script(&mut session, "Frobnicate-Widget now").await;

        assert!(matches!(
            &events[0],
            EngineEvent::Stream { category: OutputCategory::Error, text }
                if text.contains("Frobnicate-Widget")
        ));
    }

    #[tokio::test]
    async fn test_stop_between_statements() {
        let mut session = StubSession::new();
        session.stop_handle().request_stop();

        let events = run_script(&mut session, "Write-Output never").await;
        assert!(events.is_empty());
    }

    #[test]
    fn test_parse_sleep_arguments() {
        assert_eq!(parse_sleep("-Milliseconds 250"), Duration::from_millis(250));
        assert_eq!(parse_sleep("-Seconds 2"), Duration::from_secs(2));
        assert_eq!(parse_sleep("nonsense"), Duration::from_millis(0));
    }
}
