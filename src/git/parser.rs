use crate::error::GitResult;
use serde::Serialize;

/// Parse `git branch` output into the branch list.
///
/// A `*`-prefixed line marks the current branch; a first token starting with
/// `remotes/` is a remote-tracking branch whose remote name sits between
/// `remotes/` and the next `/`. Everything else is a local branch. Input
/// order is preserved.
pub fn parse_branches(output: &str) -> GitResult<BranchList> {
    let mut list = BranchList::default();

    for raw in output.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let mut tokens = line.split_whitespace();
        let first = match tokens.next() {
            Some(token) => token,
            None => continue,
        };

        if first == "*" {
            let name = tokens.next().unwrap_or_default().to_string();
            list.current = Some(name.clone());
            list.branches.push(BranchInfo {
                name,
                kind: BranchKind::Local,
                location: None,
            });
        } else if let Some(rest) = first.strip_prefix("remotes/") {
            match rest.split_once('/') {
                Some((location, name)) => list.branches.push(BranchInfo {
                    name: name.to_string(),
                    kind: BranchKind::Remote,
                    location: Some(location.to_string()),
                }),
                // No remote segment to split off; treat as a plain entry.
                None => list.branches.push(BranchInfo {
                    name: first.to_string(),
                    kind: BranchKind::Local,
                    location: None,
                }),
            }
        } else {
            list.branches.push(BranchInfo {
                name: first.to_string(),
                kind: BranchKind::Local,
                location: None,
            });
        }
    }

    Ok(list)
}

/// Parse `git log` output produced with the tab-separated pretty format.
///
/// Each non-blank line is split on tabs into hash/author/date/subject, in
/// that fixed order. Lines with fewer fields leave the remainder empty;
/// extra fields are dropped. The shape is not validated, so malformed lines
/// mis-parse rather than fail. Order matches input (most-recent-first).
pub fn parse_log(output: &str) -> GitResult<LogList> {
    let mut logs = Vec::new();

    for raw in output.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let mut fields = line.split('\t');
        logs.push(LogEntry {
            hash: fields.next().unwrap_or_default().to_string(),
            author: fields.next().unwrap_or_default().to_string(),
            date: fields.next().unwrap_or_default().to_string(),
            subject: fields.next().unwrap_or_default().to_string(),
        });
    }

    Ok(LogList { logs })
}

/// Which section of `git status` output the scan is currently inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusSection {
    Neutral,
    NotStaged,
    Untracked,
}

/// Parse human-readable `git status` output.
///
/// Single forward scan with a small section state: `On branch ` names the
/// current branch, the `Changes not staged for commit:` and
/// `Untracked files:` headers switch sections, and tab-prefixed lines are
/// classified by the section in force. Older git versions prefix every line
/// with `# `; that prefix is stripped before classification. The section
/// state never resets once set: the source format carries no end-of-section
/// marker, sections are distinguished purely by order.
pub fn parse_status(output: &str) -> GitResult<StatusSummary> {
    let mut summary = StatusSummary::default();
    let mut section = StatusSection::Neutral;

    for raw in output.lines() {
        let line = raw.strip_prefix("# ").unwrap_or(raw);

        if let Some(branch) = line.strip_prefix("On branch ") {
            summary.current_branch = Some(branch.to_string());
            continue;
        }

        if line.starts_with("Changes not staged for commit:") {
            section = StatusSection::NotStaged;
        }
        if line.starts_with("Untracked files:") {
            section = StatusSection::Untracked;
        }

        if line.starts_with('\t') {
            match section {
                StatusSection::NotStaged => {
                    let mut tokens = line.split_whitespace();
                    match tokens.next() {
                        Some("modified:") => {
                            if let Some(path) = tokens.next() {
                                summary.modified.push(path.to_string());
                            }
                        }
                        Some("deleted:") => {
                            if let Some(path) = tokens.next() {
                                summary.deleted.push(path.to_string());
                            }
                        }
                        _ => {}
                    }
                }
                StatusSection::Untracked => {
                    summary.untracked.push(line.trim().to_string());
                }
                StatusSection::Neutral => {}
            }
        }
    }

    Ok(summary)
}

/// Whether a branch lives in this repository or on a remote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BranchKind {
    Local,
    Remote,
}

/// One branch from `git branch` output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: BranchKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// All branches plus the distinguished current one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BranchList {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<String>,
    pub branches: Vec<BranchInfo>,
}

/// One commit from `git log` output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub hash: String,
    pub author: String,
    pub date: String,
    pub subject: String,
}

/// Commits in the order the tool emitted them, most-recent-first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LogList {
    pub logs: Vec<LogEntry>,
}

/// Working-tree summary from `git status` output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_branch: Option<String>,
    pub modified: Vec<String>,
    pub deleted: Vec<String>,
    pub untracked: Vec<String>,
}

/// Structured result for subcommands whose success is purely exit-code
/// based; serializes as `{}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EmptyOutput {}

/// The structured decoding of one subcommand's stdout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ParsedOutput {
    Branches(BranchList),
    Log(LogList),
    Status(StatusSummary),
    Empty(EmptyOutput),
}
