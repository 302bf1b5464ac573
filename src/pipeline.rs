//! End-to-end permalink resolution
//!
//! Ties the git layer and the formatters together: find the repository root,
//! resolve the relevant branches, pick the remotes and build the candidates.

use std::path::{Component, Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::config::Config;
use crate::git::{
    self, BranchResolver, ExecError, GitExec, RemoteScope, RemoteUrl, format_remotes,
};
use crate::permalink::{Candidate, LinkKind, LinkTarget, SelectedLines, prepare_candidates};

/// Why no candidate list could be produced.
#[derive(Debug, Error)]
pub enum ResolutionError {
    /// A git command failed.
    #[error(transparent)]
    Exec(#[from] ExecError),

    /// There is no file to link to.
    #[error("No file to link: {path} is not a readable file")]
    NoActiveContext {
        /// The requested path.
        path: PathBuf,
    },

    /// The file lives outside the repository git reported.
    #[error("{path} is not inside the repository at {root}")]
    OutsideRepository {
        /// The requested path.
        path: PathBuf,
        /// The repository root.
        root: PathBuf,
    },
}

/// A single request: one file, one selection, one kind of link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// The file to link to.
    pub file_path: PathBuf,
    /// Directory git commands run in.
    pub project_root: PathBuf,
    /// Selected lines, if any.
    pub selection: Option<SelectedLines>,
    /// Which page to open.
    pub kind: LinkKind,
}

impl Request {
    /// Build a request for `file_path`, running git from its directory.
    ///
    /// # Errors
    ///
    /// Returns an error if `file_path` is not an existing regular file.
    pub fn for_file(
        file_path: &Path,
        selection: Option<SelectedLines>,
        kind: LinkKind,
    ) -> Result<Self, ResolutionError> {
        let missing = || ResolutionError::NoActiveContext {
            path: file_path.to_path_buf(),
        };
        let file_path = std::fs::canonicalize(file_path).map_err(|_| missing())?;
        if !file_path.is_file() {
            return Err(missing());
        }
        let project_root = file_path.parent().ok_or_else(missing)?.to_path_buf();

        Ok(Self {
            file_path,
            project_root,
            selection,
            kind,
        })
    }
}

/// Resolve every candidate permalink for a request.
///
/// Returns an empty list when no branch is confirmed on a remote and the
/// revision fallback is disabled.
///
/// # Errors
///
/// Returns an error as soon as any git command fails; no partial list is
/// produced.
pub fn build_permalink_candidates<G: GitExec>(
    git: &G,
    request: &Request,
    config: &Config,
) -> Result<Vec<Candidate>, ResolutionError> {
    let root = git::repository_root(git, &request.project_root)?;
    let relative_path = relative_path(&root, &request.file_path)?;
    debug!(root = %root.display(), relative_path = %relative_path, "Found repository");

    let branches = BranchResolver::new(git, &config.default_branch)
        .with_max_output(config.max_buffer)
        .exclude_current_revision(config.exclude_current_revision)
        .resolve(&request.project_root)?;
    if branches.is_empty() {
        info!("No branch found on any remote");
        return Ok(Vec::new());
    }

    let remotes = resolve_remotes(git, &request.project_root, &branches, config)?;
    let target = LinkTarget {
        relative_path: &relative_path,
        lines: request.selection,
        repository_type: config.repository_type,
        kind: request.kind,
    };
    let candidates = prepare_candidates(&target, &remotes, &branches);
    info!(
        remotes = remotes.len(),
        branches = branches.len(),
        candidates = candidates.len(),
        "Built permalink candidates"
    );
    Ok(candidates)
}

/// Canonical remotes to link against for the resolved branches.
///
/// # Errors
///
/// Returns an error if the git command fails.
pub fn resolve_remotes<G: GitExec + ?Sized>(
    git: &G,
    cwd: &Path,
    branches: &[String],
    config: &Config,
) -> Result<Vec<RemoteUrl>, ExecError> {
    let scope = RemoteScope::for_branches(branches, &config.default_branch, &config.default_remote);
    debug!(?scope, "Listing remotes");
    let raw = git::list_remotes(git, cwd, &scope)?;
    Ok(format_remotes(&raw))
}

/// `file` relative to `root`, with `/` separators.
///
/// # Errors
///
/// Returns an error if `file` is not below `root`.
pub fn relative_path(root: &Path, file: &Path) -> Result<String, ResolutionError> {
    let outside = || ResolutionError::OutsideRepository {
        path: file.to_path_buf(),
        root: root.to_path_buf(),
    };
    let relative = file.strip_prefix(root).map_err(|_| outside())?;

    let parts: Vec<String> = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    if parts.is_empty() {
        return Err(outside());
    }
    Ok(parts.join("/"))
}
