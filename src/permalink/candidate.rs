//! Building the ordered list of candidate links.

use serde::Serialize;

use super::lines::SelectedLines;
use super::provider::{LinkKind, RepositoryType};
use crate::git::RemoteUrl;

/// One link offered to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    /// File path relative to the repository root.
    pub label: String,
    /// `"<branch> | <remote>"`.
    pub detail: String,
    /// `"[<command name>]"`.
    pub description: String,
    /// The permalink itself.
    pub url: String,
}

/// What to link to, independent of remotes and branches.
#[derive(Debug, Clone, Copy)]
pub struct LinkTarget<'a> {
    /// File path relative to the repository root, `/` separated.
    pub relative_path: &'a str,
    /// Selected lines, if any.
    pub lines: Option<SelectedLines>,
    /// Repository type setting.
    pub repository_type: RepositoryType,
    /// Which page to open.
    pub kind: LinkKind,
}

impl LinkTarget<'_> {
    fn candidate(&self, remote: &RemoteUrl, branch: &str) -> Candidate {
        let url = self.repository_type.provider_for(remote).format(
            remote,
            branch,
            self.relative_path,
            self.lines,
            self.kind,
        );
        Candidate {
            label: self.relative_path.to_string(),
            detail: format!("{branch} | {remote}"),
            description: format!("[{}]", self.kind.command_name()),
            url,
        }
    }
}

/// One candidate per remote for a single branch, in remote order.
#[must_use]
pub fn format_candidates(
    target: &LinkTarget<'_>,
    remotes: &[RemoteUrl],
    branch: &str,
) -> Vec<Candidate> {
    remotes
        .iter()
        .map(|remote| target.candidate(remote, branch))
        .collect()
}

/// Candidates for every remote and branch.
///
/// With several branches the per-branch lists are interleaved by remote, so
/// all links for the first remote come first.
#[must_use]
pub fn prepare_candidates(
    target: &LinkTarget<'_>,
    remotes: &[RemoteUrl],
    branches: &[String],
) -> Vec<Candidate> {
    match branches {
        [] => Vec::new(),
        [branch] => format_candidates(target, remotes, branch),
        _ => interleave(
            branches
                .iter()
                .map(|branch| format_candidates(target, remotes, branch))
                .collect(),
        ),
    }
}

/// Flatten `[[a1, a2], [b1, b2]]` into `[a1, b1, a2, b2]`.
///
/// Rows are walked column by column up to the length of the first row.
#[must_use]
pub fn interleave<T>(rows: Vec<Vec<T>>) -> Vec<T> {
    let width = rows.first().map_or(0, Vec::len);
    let mut columns: Vec<Vec<T>> = (0..width).map(|_| Vec::with_capacity(rows.len())).collect();
    for row in rows {
        for (column, item) in columns.iter_mut().zip(row) {
            column.push(item);
        }
    }
    columns.into_iter().flatten().collect()
}
