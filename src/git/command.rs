use crate::error::{GitError, GitResult};
use crate::git::parser::{
    self, EmptyOutput, ParsedOutput,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Fixed format flags for `log`: ISO dates, tab-separated
/// hash/author/date/subject (one commit per line).
const LOG_DATE_FLAG: &str = "--date=iso";
const LOG_PRETTY_FLAG: &str = "--pretty=format:%h%x09%an%x09%ad%x09%s";

/// The supported subcommand names, as accepted by [`GitCommand::from_params`].
pub const SUPPORTED_SUBCOMMANDS: &[&str] = &[
    "add",
    "branch",
    "checkout",
    "commit",
    "describe",
    "log",
    "pull",
    "push",
    "status",
    "submodule",
    "clone",
];

/// Loosely-typed parameters accepted at the dispatch boundary.
///
/// Mirrors the wire parameter object: every field is optional and unknown
/// keys are ignored. Which fields are consumed depends on the subcommand;
/// the rest are silently ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandParams {
    pub args: Option<String>,
    pub branch: Option<String>,
    pub message: Option<String>,
    pub count: Option<u32>,
    pub remote_repo: Option<String>,
}

/// One supported git subcommand with its typed parameters.
///
/// Each variant knows how to build its own argument list and how to decode
/// its own output, so dispatch is an exhaustive match rather than a lookup
/// table keyed by strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitCommand {
    Add { args: Option<String> },
    Branch { args: Option<String> },
    Checkout { args: Option<String>, branch: Option<String> },
    Commit { message: String },
    Describe,
    Log { count: Option<u32> },
    Pull { remote: Option<String> },
    Push,
    Status,
    Submodule { remote: Option<String> },
    Clone { url: String, destination: PathBuf },
}

impl GitCommand {
    /// Validate a subcommand name and bind the parameters it consumes.
    ///
    /// Unsupported names and missing required parameters fail here, before
    /// any process is spawned. `clone` takes an explicit url and destination
    /// instead of drawing from `CommandParams`; it is dispatched through
    /// [`crate::git::Repository::clone_repository`] and rejected here.
    pub fn from_params(subcommand: &str, params: &CommandParams) -> GitResult<Self> {
        match subcommand {
            "add" => Ok(Self::Add {
                args: params.args.clone(),
            }),
            "branch" => Ok(Self::Branch {
                args: params.args.clone(),
            }),
            "checkout" => Ok(Self::Checkout {
                args: params.args.clone(),
                branch: params.branch.clone(),
            }),
            "commit" => match params.message.as_deref() {
                Some(message) if !message.is_empty() => Ok(Self::Commit {
                    message: message.to_string(),
                }),
                _ => Err(GitError::MissingParameter("message")),
            },
            "describe" => Ok(Self::Describe),
            "log" => Ok(Self::Log {
                count: params.count,
            }),
            "pull" => Ok(Self::Pull {
                remote: params.remote_repo.clone(),
            }),
            "push" => Ok(Self::Push),
            "status" => Ok(Self::Status),
            "submodule" => Ok(Self::Submodule {
                remote: params.remote_repo.clone(),
            }),
            "clone" => Err(GitError::MissingParameter("url")),
            other => Err(GitError::UnsupportedCommand(other.to_string())),
        }
    }

    /// The subcommand name as passed to git.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Add { .. } => "add",
            Self::Branch { .. } => "branch",
            Self::Checkout { .. } => "checkout",
            Self::Commit { .. } => "commit",
            Self::Describe => "describe",
            Self::Log { .. } => "log",
            Self::Pull { .. } => "pull",
            Self::Push => "push",
            Self::Status => "status",
            Self::Submodule { .. } => "submodule",
            Self::Clone { .. } => "clone",
        }
    }

    /// Build the argument list that follows the subcommand name.
    ///
    /// The working directory is appended when supplied (only `add` consumes
    /// it). Free-form `args` values are passed through as a single token,
    /// not word-split; a multi-flag string like `". -A"` therefore reaches
    /// git as one argument.
    pub fn build_args(&self, workdir: Option<&Path>) -> Vec<String> {
        let mut argv = Vec::new();

        match self {
            Self::Add { args } => {
                if let Some(dir) = workdir {
                    argv.push(dir.display().to_string());
                }
                if let Some(extra) = args {
                    argv.push(extra.clone());
                }
            }
            Self::Branch { args } => {
                if let Some(extra) = args {
                    argv.push(extra.clone());
                }
            }
            Self::Checkout { args, branch } => {
                if let Some(extra) = args {
                    argv.push(extra.clone());
                }
                if let Some(branch) = branch {
                    argv.push(branch.clone());
                }
            }
            // The message is validated at construction but not forwarded;
            // `commit` runs bare. See DESIGN.md.
            Self::Commit { message: _ } => {}
            Self::Describe => {}
            Self::Log { count } => {
                argv.push(LOG_DATE_FLAG.to_string());
                argv.push(LOG_PRETTY_FLAG.to_string());
                if let Some(count) = count {
                    argv.push(format!("-n{count}"));
                }
            }
            Self::Pull { remote } => {
                if let Some(remote) = remote {
                    argv.push(remote.clone());
                }
            }
            // Remote and branch are accepted by the wire shape but not
            // forwarded. See DESIGN.md.
            Self::Push => {}
            Self::Status => {}
            Self::Submodule { remote } => {
                if let Some(remote) = remote {
                    argv.push(remote.clone());
                }
            }
            Self::Clone { url, destination } => {
                argv.push(url.clone());
                argv.push(destination.display().to_string());
            }
        }

        argv
    }

    /// The full argv handed to the executor: subcommand name first.
    pub fn argv(&self, workdir: Option<&Path>) -> Vec<String> {
        let mut argv = vec![self.name().to_string()];
        argv.extend(self.build_args(workdir));
        argv
    }

    /// Decode this subcommand's stdout into a structured result.
    ///
    /// Returns `Ok(None)` for subcommands without a registered decoder;
    /// callers then expose the raw text only.
    pub fn parse_output(&self, stdout: &str) -> GitResult<Option<ParsedOutput>> {
        match self {
            Self::Branch { .. } => Ok(Some(ParsedOutput::Branches(parser::parse_branches(
                stdout,
            )?))),
            Self::Log { .. } => Ok(Some(ParsedOutput::Log(parser::parse_log(stdout)?))),
            Self::Status => Ok(Some(ParsedOutput::Status(parser::parse_status(stdout)?))),
            Self::Add { .. } | Self::Clone { .. } => {
                Ok(Some(ParsedOutput::Empty(EmptyOutput {})))
            }
            _ => Ok(None),
        }
    }
}
