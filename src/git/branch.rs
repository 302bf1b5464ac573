//! Branch and revision resolution
//!
//! Decides which branch names are worth linking to: the current branch and the
//! default branch, but only once they are confirmed on some remote. The HEAD
//! commit is appended as a stable fallback anchor.

use std::path::Path;

use tracing::debug;

use super::exec::{ExecError, GitExec};
use super::remote::dedupe;

/// Resolves the relevant branches for a working copy.
#[derive(Debug)]
pub struct Resolver<'a, G: GitExec> {
    git: &'a G,
    default_branch: &'a str,
    max_output: Option<usize>,
    exclude_current_revision: bool,
}

impl<'a, G: GitExec> Resolver<'a, G> {
    /// Create a resolver.
    #[must_use]
    pub const fn new(git: &'a G, default_branch: &'a str) -> Self {
        Self {
            git,
            default_branch,
            max_output: None,
            exclude_current_revision: false,
        }
    }

    /// Cap the size of the branch listing in bytes.
    #[must_use]
    pub const fn with_max_output(mut self, max_output: Option<usize>) -> Self {
        self.max_output = max_output;
        self
    }

    /// Skip the HEAD commit fallback.
    #[must_use]
    pub const fn exclude_current_revision(mut self, exclude: bool) -> Self {
        self.exclude_current_revision = exclude;
        self
    }

    /// List the pushed branches, followed by the HEAD commit unless excluded.
    ///
    /// # Errors
    ///
    /// Returns an error if either git command fails. No partial list is
    /// returned.
    pub fn resolve(&self, cwd: &Path) -> Result<Vec<String>, ExecError> {
        let listing = self
            .git
            .exec(&["branch", "--no-color", "-a"], cwd, self.max_output)?;
        let mut branches = relevant_branches(&listing, self.default_branch);
        debug!(?branches, "Resolved pushed branches");

        if !self.exclude_current_revision {
            branches.push(current_revision(self.git, cwd)?);
        }

        Ok(branches)
    }
}

/// The commit SHA of HEAD.
///
/// # Errors
///
/// Returns an error if `git rev-parse HEAD` fails.
pub fn current_revision<G: GitExec + ?Sized>(git: &G, cwd: &Path) -> Result<String, ExecError> {
    Ok(git.exec(&["rev-parse", "HEAD"], cwd, None)?.trim().to_string())
}

/// The branch marked with `*` in `git branch` output.
#[must_use]
pub fn current_branch(listing: &str) -> Option<String> {
    listing
        .lines()
        .find(|line| line.starts_with('*'))
        .map(|line| line.replacen('*', "", 1).trim().to_string())
        .filter(|name| !name.is_empty())
}

/// The current and default branches, current first, without duplicates.
#[must_use]
pub fn candidate_branches(current: Option<&str>, default_branch: &str) -> Vec<String> {
    dedupe(
        current
            .into_iter()
            .chain(std::iter::once(default_branch))
            .filter(|name| !name.is_empty())
            .map(str::to_string),
    )
}

/// Whether `branch` appears as `remotes/<remote>/<branch>` in the listing.
#[must_use]
pub fn is_pushed(listing: &str, branch: &str) -> bool {
    let suffix = format!("/{branch}");
    listing
        .lines()
        .filter_map(|line| line.trim_start_matches('*').split_whitespace().next())
        .filter_map(|name| name.strip_prefix("remotes/"))
        .any(|tracking| {
            tracking
                .strip_suffix(suffix.as_str())
                .is_some_and(|remote| !remote.is_empty())
        })
}

/// Candidate branches that are confirmed on at least one remote.
#[must_use]
pub fn relevant_branches(listing: &str, default_branch: &str) -> Vec<String> {
    let current = current_branch(listing);
    candidate_branches(current.as_deref(), default_branch)
        .into_iter()
        .filter(|branch| is_pushed(listing, branch))
        .collect()
}
