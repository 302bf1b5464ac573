//! Git operations module

mod branch;
mod exec;
mod remote;

pub use branch::{
    Resolver as BranchResolver, candidate_branches, current_branch, current_revision, is_pushed,
    relevant_branches,
};
pub use exec::{CliGit, ExecError, GitExec};
pub use remote::{
    RemoteScope, RemoteUrl, canonicalize, dedupe, format_remotes, parse_remote_listing,
    parse_single_remote,
};

use std::path::{Path, PathBuf};

/// Get the root of the git repository containing the given path
///
/// # Errors
///
/// Returns an error if the path is not inside a git repository
pub fn repository_root<G: GitExec + ?Sized>(git: &G, path: &Path) -> Result<PathBuf, ExecError> {
    let root = git.exec(&["rev-parse", "--show-toplevel"], path, None)?;
    Ok(PathBuf::from(root.trim()))
}

/// Raw URLs of the remotes in scope, before normalization
///
/// # Errors
///
/// Returns an error if the git command fails
pub fn list_remotes<G: GitExec + ?Sized>(
    git: &G,
    path: &Path,
    scope: &RemoteScope,
) -> Result<Vec<String>, ExecError> {
    match scope {
        RemoteScope::Named(name) => {
            let key = format!("remote.{name}.url");
            let stdout = git.exec(&["config", "--get", &key], path, None)?;
            Ok(parse_single_remote(&stdout))
        }
        RemoteScope::All => {
            let stdout = git.exec(&["remote", "-v"], path, None)?;
            Ok(parse_remote_listing(&stdout))
        }
    }
}
