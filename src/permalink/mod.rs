//! Permalink formatting for GitHub, Bitbucket Cloud and Bitbucket Server.

mod candidate;
mod lines;
mod provider;

pub use candidate::{Candidate, LinkTarget, format_candidates, interleave, prepare_candidates};
pub use lines::{LinesError, SelectedLines};
pub use provider::{LinkKind, Provider, RepositoryType, is_bitbucket};
