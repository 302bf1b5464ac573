//! Hosting providers and their permalink layouts.

use std::fmt;

use percent_encoding::{AsciiSet, CONTROLS, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use url::Url;
use url::form_urlencoded;

use super::lines::SelectedLines;
use crate::git::RemoteUrl;

/// Repository type setting.
///
/// `Auto` picks Bitbucket Cloud for `bitbucket.org` remotes and GitHub for
/// everything else.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RepositoryType {
    /// Infer from the remote URL.
    #[default]
    Auto,
    /// GitHub or GitHub Enterprise.
    Github,
    /// Bitbucket Cloud.
    Bitbucket,
    /// Self-hosted Bitbucket Server / Data Center.
    BitbucketServer,
}

impl RepositoryType {
    /// All settings, in display order.
    pub const ALL: &'static [Self] = &[
        Self::Auto,
        Self::Github,
        Self::Bitbucket,
        Self::BitbucketServer,
    ];

    /// Setting value as written in config files.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Github => "github",
            Self::Bitbucket => "bitbucket",
            Self::BitbucketServer => "bitbucket-server",
        }
    }

    /// Choose the provider for a remote.
    #[must_use]
    pub fn provider_for(self, remote: &RemoteUrl) -> Provider {
        match self {
            Self::Auto if is_bitbucket(remote.as_str()) => Provider::BitbucketCloud,
            Self::Auto | Self::Github => Provider::GitHub,
            Self::Bitbucket => Provider::BitbucketCloud,
            Self::BitbucketServer => Provider::BitbucketServer,
        }
    }
}

/// Whether a remote points at Bitbucket Cloud.
#[must_use]
pub fn is_bitbucket(remote: &str) -> bool {
    remote.contains("bitbucket.org")
}

/// Which page a permalink opens.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    /// The file view.
    #[default]
    File,
    /// The blame / annotate view.
    Blame,
    /// The commit history of the file.
    History,
}

impl LinkKind {
    /// All kinds, in display order.
    pub const ALL: &'static [Self] = &[Self::File, Self::Blame, Self::History];

    /// Command name shown next to each candidate.
    #[must_use]
    pub const fn command_name(self) -> &'static str {
        match self {
            Self::File => "File",
            Self::Blame => "Blame",
            Self::History => "History",
        }
    }
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.command_name())
    }
}

/// A hosting provider's URL layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    /// `https://github.com/owner/repo/blob/<branch>/<path>#L1-L2`
    GitHub,
    /// `https://bitbucket.org/owner/repo/src/<branch>/<path>#file-1:2`
    BitbucketCloud,
    /// `https://host/projects/<P>/repos/<r>/browse/<path>?at=<branch>#1-2`
    BitbucketServer,
}

impl Provider {
    /// Build the permalink for a file on a branch or revision.
    #[must_use]
    pub fn format(
        self,
        remote: &RemoteUrl,
        branch: &str,
        file_path: &str,
        lines: Option<SelectedLines>,
        kind: LinkKind,
    ) -> String {
        match self {
            Self::GitHub => github(remote, branch, file_path, lines, kind),
            Self::BitbucketCloud => bitbucket_cloud(remote, branch, file_path, lines, kind),
            Self::BitbucketServer => bitbucket_server(remote, branch, file_path, lines, kind),
        }
    }
}

fn github(
    remote: &RemoteUrl,
    branch: &str,
    file_path: &str,
    lines: Option<SelectedLines>,
    kind: LinkKind,
) -> String {
    let (view, anchor) = match kind {
        LinkKind::File => ("blob", lines.map(|l| l.github_anchor())),
        LinkKind::Blame => ("blame", lines.map(|l| l.github_anchor())),
        LinkKind::History => ("commits", None),
    };
    let path = join_segments(view, branch, file_path);
    finish(remote.url().clone(), &path, None, anchor.as_deref())
}

fn bitbucket_cloud(
    remote: &RemoteUrl,
    branch: &str,
    file_path: &str,
    lines: Option<SelectedLines>,
    kind: LinkKind,
) -> String {
    let (view, anchor) = match kind {
        LinkKind::File => ("src", lines.map(|l| l.bitbucket_anchor(file_path))),
        LinkKind::Blame => ("annotate", lines.map(|l| l.bitbucket_anchor(file_path))),
        LinkKind::History => ("history-node", None),
    };
    let path = join_segments(view, branch, file_path);
    finish(remote.url().clone(), &path, None, anchor.as_deref())
}

fn bitbucket_server(
    remote: &RemoteUrl,
    branch: &str,
    file_path: &str,
    lines: Option<SelectedLines>,
    kind: LinkKind,
) -> String {
    let Some((base, project, repo)) = server_repository(remote.url()) else {
        return github(remote, branch, file_path, lines, kind);
    };

    let anchor = lines.map(|l| l.bitbucket_server_anchor());
    let (view, query, anchor) = match kind {
        LinkKind::File => ("browse", vec![("at", branch)], anchor),
        LinkKind::Blame => ("browse", vec![("at", branch), ("blame", "true")], anchor),
        LinkKind::History => ("history", vec![("until", branch)], None),
    };
    let segments: Vec<String> = ["projects", project.as_str(), "repos", repo.as_str(), view]
        .into_iter()
        .map(str::to_string)
        .chain(encode_path(file_path))
        .collect();

    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(query)
        .finish();
    finish(base, &segments, Some(query.as_str()), anchor.as_deref())
}

/// Split a Bitbucket Server clone URL into base, project key and repo slug.
///
/// Project and repo come back percent-encoded, as they appear in the URL.
/// Drops an `scm` clone prefix and a numeric segment left behind by an SSH
/// port (`ssh://git@host:7999/proj/repo`).
fn server_repository(url: &Url) -> Option<(Url, String, String)> {
    let mut segments: Vec<String> = url
        .path_segments()?
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect();
    let repo = segments.pop()?;
    let project = segments.pop()?;
    if segments.last().is_some_and(|segment| segment == "scm") {
        segments.pop();
    }
    if segments
        .first()
        .is_some_and(|segment| segment.chars().all(|c| c.is_ascii_digit()))
    {
        segments.remove(0);
    }

    let mut base = url.clone();
    base.set_path(&segments.join("/"));
    Some((base, project, repo))
}

/// Characters `encodeURIComponent` escapes.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Characters that cannot appear raw in a single path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b'%');

/// Branch segments, each escaped as a URI component.
fn encode_branch(branch: &str) -> impl Iterator<Item = String> + '_ {
    branch
        .split('/')
        .map(|segment| utf8_percent_encode(segment, COMPONENT).to_string())
}

fn encode_path(file_path: &str) -> impl Iterator<Item = String> + '_ {
    file_path
        .split('/')
        .map(|segment| utf8_percent_encode(segment, PATH_SEGMENT).to_string())
}

fn join_segments(view: &str, branch: &str, file_path: &str) -> Vec<String> {
    std::iter::once(view.to_string())
        .chain(encode_branch(branch))
        .chain(encode_path(file_path))
        .collect()
}

/// Append already encoded path segments, query and fragment to `base`.
fn finish(mut base: Url, segments: &[String], query: Option<&str>, anchor: Option<&str>) -> String {
    let mut path = base.path().trim_end_matches('/').to_string();
    for segment in segments {
        path.push('/');
        path.push_str(segment);
    }
    base.set_path(&path);
    base.set_query(query);
    base.set_fragment(anchor);
    base.into()
}
