//! Permalinker - permanent links to source lines on git hosting services
//!
//! Permalinker turns the remotes of a local git repository into links to a
//! file (and optionally a line range) on GitHub, Bitbucket Cloud or Bitbucket
//! Server, for every branch that has actually been pushed.

mod command;

pub mod browser;
pub mod config;
pub mod git;
pub mod paths;
pub mod permalink;
pub mod pipeline;

pub use config::Config;
pub use permalink::{Candidate, LinkKind, RepositoryType, SelectedLines};
pub use pipeline::{Request, ResolutionError, build_permalink_candidates};
