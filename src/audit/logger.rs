use chrono::Utc;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

const MAX_LOG_SIZE: u64 = 10 * 1024 * 1024; // 10MB

/// Commands taking at least this long are tagged in the log.
const SLOW_COMMAND_MS: u128 = 1000;

/// Append-only record of dispatched commands.
///
/// Constructed by the composition point and handed to the components that
/// need it; there is no process-global logger and no lazy initialization.
#[derive(Debug)]
pub struct AuditLogger {
    log_path: PathBuf,
}

impl AuditLogger {
    /// Create an AuditLogger with the default log path.
    pub fn new() -> std::io::Result<Self> {
        let log_path = Self::default_log_path()?;
        Self::with_path(log_path)
    }

    /// Create an AuditLogger with a custom log path.
    pub fn with_path<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let log_path = path.as_ref().to_path_buf();

        // Ensure directory exists
        if let Some(parent) = log_path.parent() {
            fs::create_dir_all(parent)?;
        }

        Ok(Self { log_path })
    }

    /// Get the default log path: ~/.config/gitrelay/command.log
    fn default_log_path() -> std::io::Result<PathBuf> {
        let home = std::env::var("HOME").map_err(|_| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "HOME environment variable not set",
            )
        })?;

        Ok(PathBuf::from(home)
            .join(".config")
            .join("gitrelay")
            .join("command.log"))
    }

    /// Record one completed command with its exit code and elapsed time.
    pub fn log_command(
        &self,
        command: &str,
        workdir: Option<&Path>,
        exit_code: i32,
        elapsed_ms: u128,
    ) -> std::io::Result<()> {
        let slow_marker = if elapsed_ms >= SLOW_COMMAND_MS {
            " [slow]"
        } else {
            ""
        };

        let entry = format!(
            "[{}] [{}] [{}] [exit:{}] [{}ms]{} {}\n",
            Utc::now().to_rfc3339(),
            Self::user(),
            Self::dir_label(workdir),
            exit_code,
            elapsed_ms,
            slow_marker,
            command
        );

        self.append(&entry)
    }

    /// Record a command that was rejected before any process spawned.
    pub fn log_rejected(
        &self,
        command: &str,
        workdir: Option<&Path>,
        reason: &str,
    ) -> std::io::Result<()> {
        let entry = format!(
            "[{}] [{}] [{}] [REJECTED] reason=\"{}\" {}\n",
            Utc::now().to_rfc3339(),
            Self::user(),
            Self::dir_label(workdir),
            reason,
            command
        );

        self.append(&entry)
    }

    /// Get the path to the log file.
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    fn append(&self, entry: &str) -> std::io::Result<()> {
        self.rotate_if_needed()?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)?;

        file.write_all(entry.as_bytes())?;
        file.flush()?;

        Ok(())
    }

    fn user() -> String {
        std::env::var("USER").unwrap_or_else(|_| "unknown".to_string())
    }

    fn dir_label(workdir: Option<&Path>) -> String {
        match workdir {
            Some(dir) => dir.display().to_string(),
            None => "-".to_string(),
        }
    }

    /// Rotate log file if it exceeds MAX_LOG_SIZE.
    fn rotate_if_needed(&self) -> std::io::Result<()> {
        if !self.log_path.exists() {
            return Ok(());
        }

        let metadata = fs::metadata(&self.log_path)?;
        if metadata.len() > MAX_LOG_SIZE {
            // Rotate: command.log -> command.log.1
            let backup_path = self.log_path.with_extension("log.1");
            fs::rename(&self.log_path, backup_path)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_create_logger() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("test.log");

        let logger = AuditLogger::with_path(&log_path).unwrap();
        assert_eq!(logger.log_path(), log_path);
    }

    #[test]
    fn test_log_command() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("test.log");

        let logger = AuditLogger::with_path(&log_path).unwrap();
        logger
            .log_command("git status", Some(Path::new("/test/repo")), 0, 12)
            .unwrap();

        let content = fs::read_to_string(&log_path).unwrap();
        assert!(content.contains("git status"));
        assert!(content.contains("/test/repo"));
        assert!(content.contains("exit:0"));
        assert!(content.contains("[12ms]"));
        assert!(!content.contains("[slow]"));
    }

    #[test]
    fn test_slow_command_is_tagged() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("test.log");

        let logger = AuditLogger::with_path(&log_path).unwrap();
        logger
            .log_command("git clone https://example.com/big.git", None, 0, 4500)
            .unwrap();

        let content = fs::read_to_string(&log_path).unwrap();
        assert!(content.contains("[slow]"));
        // Clone runs without a working directory.
        assert!(content.contains("[-]"));
    }

    #[test]
    fn test_log_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("test.log");

        let logger = AuditLogger::with_path(&log_path).unwrap();
        logger
            .log_rejected(
                "rm -rf /",
                Some(Path::new("/test/repo")),
                "command not in allow-list",
            )
            .unwrap();

        let content = fs::read_to_string(&log_path).unwrap();
        assert!(content.contains("REJECTED"));
        assert!(content.contains("rm -rf /"));
        assert!(content.contains("allow-list"));
    }

    #[test]
    fn test_multiple_entries() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("test.log");

        let logger = AuditLogger::with_path(&log_path).unwrap();
        logger
            .log_command("git status", Some(Path::new("/r")), 0, 3)
            .unwrap();
        logger
            .log_command("git log --date=iso", Some(Path::new("/r")), 128, 5)
            .unwrap();

        let content = fs::read_to_string(&log_path).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.contains("exit:128"));
    }

    #[test]
    fn test_log_rotation() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("test.log");

        let logger = AuditLogger::with_path(&log_path).unwrap();

        // Write a large entry to push the file past the rotation limit.
        let large_command = "git ".to_string() + &"x".repeat(MAX_LOG_SIZE as usize);
        logger
            .log_command(&large_command, Some(Path::new("/r")), 0, 1)
            .unwrap();

        logger
            .log_command("git status", Some(Path::new("/r")), 0, 1)
            .unwrap();

        let backup_path = log_path.with_extension("log.1");
        assert!(backup_path.exists());

        assert!(log_path.exists());
        let metadata = fs::metadata(&log_path).unwrap();
        assert!(metadata.len() < MAX_LOG_SIZE);
    }
}
