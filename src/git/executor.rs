use crate::error::{GitError, GitResult};
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

/// Exit code reported when the process was terminated without one
/// (e.g. killed by a signal).
const NO_EXIT_CODE: i32 = -1;

/// Raw result of one child-process invocation.
///
/// Produced exactly once, when the process closes; immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    /// Exit code `0` is success; anything else is failure, regardless of
    /// what landed on stderr.
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Executes git subcommands as child processes.
///
/// The executor holds no per-invocation state: each call spawns one process,
/// inherits the host environment, and captures stdout/stderr to completion.
/// There is no retry, no timeout and no cap on captured output; a hung child
/// hangs the invocation, and cancellation is a caller concern.
#[derive(Debug, Clone)]
pub struct GitExecutor {
    binary: String,
}

impl GitExecutor {
    /// Create an executor for the system `git` binary.
    pub fn new() -> Self {
        Self::with_binary("git")
    }

    /// Create an executor for a specific git binary path.
    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Spawn `git <argv...>` in `workdir` and await its completion.
    ///
    /// `workdir` is `None` only for `clone`, which has no pre-existing
    /// working directory. Returns `Err(SpawnFailed)` when the process could
    /// not be started at all; a process that ran and exited non-zero is an
    /// `Ok` whose exit code the caller classifies.
    pub async fn run(&self, workdir: Option<&Path>, argv: &[String]) -> GitResult<ProcessOutput> {
        let mut command = Command::new(&self.binary);
        command
            .args(argv)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        if let Some(dir) = workdir {
            command.current_dir(dir);
        }

        let output = command
            .output()
            .await
            .map_err(|e| GitError::SpawnFailed(e.to_string()))?;

        Ok(ProcessOutput {
            exit_code: output.status.code().unwrap_or(NO_EXIT_CODE),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    /// The binary this executor spawns.
    pub fn binary(&self) -> &str {
        &self.binary
    }
}

impl Default for GitExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::process::Command as StdCommand;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let repo_path = temp_dir.path().to_path_buf();

        StdCommand::new("git")
            .args(["init"])
            .current_dir(&repo_path)
            .output()
            .unwrap();

        StdCommand::new("git")
            .args(["config", "user.name", "Test User"])
            .current_dir(&repo_path)
            .output()
            .unwrap();

        StdCommand::new("git")
            .args(["config", "user.email", "test@example.com"])
            .current_dir(&repo_path)
            .output()
            .unwrap();

        (temp_dir, repo_path)
    }

    #[tokio::test]
    async fn test_run_status() {
        let (_temp, repo_path) = create_test_repo();
        let executor = GitExecutor::new();

        let output = executor
            .run(Some(&repo_path), &["status".to_string()])
            .await
            .unwrap();

        assert!(output.success());
        assert_eq!(output.exit_code, 0);
        assert!(output.stdout.contains("On branch"));
    }

    #[tokio::test]
    async fn test_run_log_in_empty_repo_fails() {
        let (_temp, repo_path) = create_test_repo();
        let executor = GitExecutor::new();

        // No commits yet, so log exits non-zero but still yields output.
        let output = executor
            .run(Some(&repo_path), &["log".to_string()])
            .await
            .unwrap();

        assert!(!output.success());
        assert_ne!(output.exit_code, 0);
        assert!(!output.stderr.is_empty());
    }

    #[tokio::test]
    async fn test_missing_binary_is_a_spawn_error() {
        let (_temp, repo_path) = create_test_repo();
        let executor = GitExecutor::with_binary("definitely-not-a-git-binary");

        let result = executor
            .run(Some(&repo_path), &["status".to_string()])
            .await;

        assert!(matches!(result, Err(GitError::SpawnFailed(_))));
    }

    #[tokio::test]
    async fn test_run_without_workdir() {
        let executor = GitExecutor::new();

        // The clone path spawns without a working directory.
        let output = executor
            .run(None, &["--version".to_string()])
            .await
            .unwrap();

        assert!(output.success());
        assert!(output.stdout.starts_with("git version"));
    }
}
