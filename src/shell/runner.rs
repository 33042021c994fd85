use crate::audit::{AuditLogger, Stopwatch};
use serde::Serialize;
use std::path::Path;
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("Shell command is empty")]
    EmptyCommand,

    #[error("Shell command not allowed: {0}")]
    DisallowedCommand(String),
}

/// Captured output of one shell invocation.
///
/// Streams are split on every newline, so output ending in a newline carries
/// a final empty entry. `error` is populated when the process exited
/// non-zero or could not be started.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ShellOutput {
    pub stdout: Vec<String>,
    pub stderr: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ShellOutput {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Runs arbitrary commands in a working directory, with the same capture
/// mechanics as the git dispatcher but none of its subcommand knowledge.
///
/// This runner is intentionally unrestricted; callers are expected to check
/// candidate commands against a [`crate::shell::ShellPolicy`] (or their own
/// allow-list) before invoking it.
#[derive(Debug, Default)]
pub struct ShellRunner {
    audit: Option<AuditLogger>,
}

impl ShellRunner {
    pub fn new() -> Self {
        Self { audit: None }
    }

    /// Attach an audit logger; every invocation is recorded.
    pub fn set_audit_logger(&mut self, logger: AuditLogger) {
        self.audit = Some(logger);
    }

    /// Spawn `command args...` in `workdir` and await completion.
    ///
    /// An empty or whitespace-only command token fails before any process
    /// spawns. Arguments are passed through as given: no shell is involved
    /// and nothing is re-split.
    pub async fn run(
        &self,
        workdir: &Path,
        command: &str,
        args: &[String],
    ) -> Result<ShellOutput, ShellError> {
        if command.trim().is_empty() {
            return Err(ShellError::EmptyCommand);
        }

        let stopwatch = Stopwatch::start();
        let spawned = Command::new(command)
            .args(args)
            .current_dir(workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await;

        let output = match spawned {
            Ok(output) => output,
            Err(e) => {
                return Ok(ShellOutput {
                    stdout: Vec::new(),
                    stderr: Vec::new(),
                    error: Some(e.to_string()),
                });
            }
        };

        let exit_code = output.status.code().unwrap_or(-1);

        if let Some(logger) = &self.audit {
            let line = format!("{} {}", command, args.join(" "));
            let _ = logger.log_command(&line, Some(workdir), exit_code, stopwatch.elapsed_ms());
        }

        let error = if exit_code == 0 {
            None
        } else {
            Some(format!("Error code {exit_code}"))
        };

        Ok(ShellOutput {
            stdout: split_lines(&String::from_utf8_lossy(&output.stdout)),
            stderr: split_lines(&String::from_utf8_lossy(&output.stderr)),
            error,
        })
    }

    /// Split a full command line on whitespace and run it: the first token
    /// is the command, the rest are its arguments.
    pub async fn run_line(
        &self,
        workdir: &Path,
        command_line: &str,
    ) -> Result<ShellOutput, ShellError> {
        let mut tokens = command_line.split_whitespace().map(String::from);
        let command = tokens.next().ok_or(ShellError::EmptyCommand)?;
        let args: Vec<String> = tokens.collect();

        self.run(workdir, &command, &args).await
    }
}

fn split_lines(text: &str) -> Vec<String> {
    text.split('\n').map(str::to_string).collect()
}
