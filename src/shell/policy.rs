use crate::shell::runner::ShellError;
use std::collections::HashSet;

/// Commands permitted when no explicit allow-list is configured.
pub const DEFAULT_ALLOWED_COMMANDS: &[&str] = &["make", "ls"];

/// Caller-side allow-list for [`crate::shell::ShellRunner`].
///
/// The runner itself stays unrestricted; services exposing it are expected
/// to check every candidate command here first and reject the rest.
#[derive(Debug, Clone)]
pub struct ShellPolicy {
    allowed: HashSet<String>,
}

impl ShellPolicy {
    pub fn new<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: allowed.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_allowed(&self, command: &str) -> bool {
        self.allowed.contains(command)
    }

    /// Validate a command token against the allow-list.
    pub fn check(&self, command: &str) -> Result<(), ShellError> {
        let command = command.trim();

        if command.is_empty() {
            return Err(ShellError::EmptyCommand);
        }

        if !self.is_allowed(command) {
            return Err(ShellError::DisallowedCommand(command.to_string()));
        }

        Ok(())
    }
}

impl Default for ShellPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_ALLOWED_COMMANDS.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = ShellPolicy::default();
        assert!(policy.is_allowed("make"));
        assert!(policy.is_allowed("ls"));
        assert!(!policy.is_allowed("rm"));
    }

    #[test]
    fn test_check_disallowed() {
        let policy = ShellPolicy::new(["cargo"]);
        assert!(policy.check("cargo").is_ok());

        let result = policy.check("rm");
        assert!(matches!(result, Err(ShellError::DisallowedCommand(name)) if name == "rm"));
    }

    #[test]
    fn test_check_empty() {
        let policy = ShellPolicy::default();
        assert!(matches!(policy.check("  "), Err(ShellError::EmptyCommand)));
    }
}
