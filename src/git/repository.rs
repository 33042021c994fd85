use crate::audit::{AuditLogger, Stopwatch};
use crate::config::Config;
use crate::error::{AppResult, GitError, GitResult};
use crate::git::command::{CommandParams, GitCommand};
use crate::git::executor::GitExecutor;
use crate::git::parser::{LogEntry, ParsedOutput, StatusSummary};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// The result envelope handed back to callers.
///
/// `error` is populated exactly when the invocation failed; `result` exactly
/// when a decoder exists for the subcommand and the exit succeeded. Raw
/// stdout and stderr are always preserved for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ParsedOutput>,
}

impl CommandResult {
    fn success(stdout: String, stderr: String, result: Option<ParsedOutput>) -> Self {
        Self {
            stdout,
            stderr,
            error: None,
            result,
        }
    }

    fn failure(stdout: String, stderr: String, error: String) -> Self {
        Self {
            stdout,
            stderr,
            error: Some(error),
            result: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Combined status-and-last-commit summary of a repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoInfo {
    #[serde(flatten)]
    pub status: StatusSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_commit: Option<LogEntry>,
}

/// Dispatches git subcommands against one working directory.
///
/// The repository holds no state beyond its path and collaborators; every
/// invocation builds, spawns and decodes from scratch, and concurrent
/// invocations are not serialized; conflicting mutations of one working
/// tree surface as non-zero exits from git itself.
#[derive(Debug)]
pub struct Repository {
    path: PathBuf,
    executor: GitExecutor,
    audit: Option<AuditLogger>,
}

impl Repository {
    /// Create a Repository for a known working directory.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self::with_executor(path, GitExecutor::new())
    }

    /// Create a Repository with a specific executor (custom git binary).
    pub fn with_executor<P: AsRef<Path>>(path: P, executor: GitExecutor) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            executor,
            audit: None,
        }
    }

    /// Build a Repository from loaded settings: configured git binary plus
    /// an audit logger when command logging is enabled.
    pub fn from_config<P: AsRef<Path>>(path: P, config: &Config) -> AppResult<Self> {
        let mut repo = Self::with_executor(path, GitExecutor::with_binary(&config.git.binary));

        if config.audit.log_commands {
            let logger = match &config.audit.log_path {
                Some(log_path) => AuditLogger::with_path(log_path)?,
                None => AuditLogger::new()?,
            };
            repo.set_audit_logger(logger);
        }

        Ok(repo)
    }

    /// Attach an audit logger; every dispatched command is recorded with its
    /// exit code and elapsed time.
    pub fn set_audit_logger(&mut self, logger: AuditLogger) {
        self.audit = Some(logger);
    }

    /// The working directory commands run against.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Dispatch a subcommand by name.
    ///
    /// Unsupported names and missing required parameters return `Err` with
    /// zero processes spawned. Everything after validation, spawn failures
    /// included, is reported inside the `Ok` envelope.
    pub async fn run(&self, subcommand: &str, params: &CommandParams) -> GitResult<CommandResult> {
        let command = GitCommand::from_params(subcommand, params)?;
        self.dispatch(&command).await
    }

    /// Dispatch an already-validated command.
    pub async fn dispatch(&self, command: &GitCommand) -> GitResult<CommandResult> {
        execute(
            &self.executor,
            self.audit.as_ref(),
            Some(&self.path),
            command,
        )
        .await
    }

    /// Clone a repository. The one entry point with no pre-existing working
    /// directory: git itself creates `destination`.
    pub async fn clone_repository(url: &str, destination: &Path) -> GitResult<CommandResult> {
        let command = GitCommand::Clone {
            url: url.to_string(),
            destination: destination.to_path_buf(),
        };
        execute(&GitExecutor::new(), None, None, &command).await
    }

    /// Combined status and last-commit summary.
    ///
    /// Sub-command failures (an empty repository has no log, for instance)
    /// leave the corresponding fields empty instead of failing the whole
    /// aggregate.
    pub async fn info(&self) -> GitResult<RepoInfo> {
        let status = self.dispatch(&GitCommand::Status).await?;
        let log = self.dispatch(&GitCommand::Log { count: Some(1) }).await?;

        let mut info = RepoInfo::default();
        if let Some(ParsedOutput::Status(summary)) = status.result {
            info.status = summary;
        }
        if let Some(ParsedOutput::Log(list)) = log.result {
            info.last_commit = list.logs.into_iter().next();
        }

        Ok(info)
    }

    // Per-subcommand conveniences over `run`, mirroring the wire surface.

    pub async fn add(&self, params: &CommandParams) -> GitResult<CommandResult> {
        self.run("add", params).await
    }

    pub async fn branch(&self, params: &CommandParams) -> GitResult<CommandResult> {
        self.run("branch", params).await
    }

    pub async fn checkout(&self, params: &CommandParams) -> GitResult<CommandResult> {
        self.run("checkout", params).await
    }

    pub async fn commit(&self, params: &CommandParams) -> GitResult<CommandResult> {
        self.run("commit", params).await
    }

    pub async fn describe(&self) -> GitResult<CommandResult> {
        self.dispatch(&GitCommand::Describe).await
    }

    pub async fn log(&self, params: &CommandParams) -> GitResult<CommandResult> {
        self.run("log", params).await
    }

    pub async fn pull(&self, params: &CommandParams) -> GitResult<CommandResult> {
        self.run("pull", params).await
    }

    pub async fn push(&self) -> GitResult<CommandResult> {
        self.dispatch(&GitCommand::Push).await
    }

    pub async fn status(&self) -> GitResult<CommandResult> {
        self.dispatch(&GitCommand::Status).await
    }

    pub async fn submodule(&self, params: &CommandParams) -> GitResult<CommandResult> {
        self.run("submodule", params).await
    }
}

/// Spawn, classify and decode one command.
async fn execute(
    executor: &GitExecutor,
    audit: Option<&AuditLogger>,
    workdir: Option<&Path>,
    command: &GitCommand,
) -> GitResult<CommandResult> {
    let argv = command.argv(workdir);
    let stopwatch = Stopwatch::start();

    let output = match executor.run(workdir, &argv).await {
        Ok(output) => output,
        // The process never started; its message stands in for an exit code.
        Err(GitError::SpawnFailed(message)) => {
            return Ok(CommandResult::failure(String::new(), String::new(), message));
        }
        Err(e) => return Err(e),
    };

    if let Some(logger) = audit {
        let line = format!("{} {}", executor.binary(), argv.join(" "));
        let _ = logger.log_command(&line, workdir, output.exit_code, stopwatch.elapsed_ms());
    }

    if output.success() {
        let result = command.parse_output(&output.stdout)?;
        Ok(CommandResult::success(output.stdout, output.stderr, result))
    } else {
        Ok(CommandResult::failure(
            output.stdout,
            output.stderr,
            format!("Error code {}", output.exit_code),
        ))
    }
}
