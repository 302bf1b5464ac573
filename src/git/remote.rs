//! Remote URL normalization
//!
//! Turns the raw output of `git remote -v` or `git config --get
//! remote.<name>.url` into canonical `https://host/owner/repo` base URLs that
//! the permalink formatters can build on.

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

use url::Url;

/// A canonical remote base URL.
///
/// Always `http(s)://host/path` with a lowercase host, no credentials, no
/// `.git` suffix and no trailing slash. Only [`canonicalize`] creates these.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RemoteUrl {
    canonical: String,
    parsed: Url,
}

impl RemoteUrl {
    /// The canonical string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.canonical
    }

    /// The parsed form, for building links on top of.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.parsed
    }
}

impl fmt::Display for RemoteUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

/// Which remotes to look up for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteScope {
    /// Only the named remote.
    Named(String),
    /// Every configured remote.
    All,
}

impl RemoteScope {
    /// Pick the scope for a resolved branch list.
    ///
    /// When the only relevant branch is the default branch there is nothing to
    /// disambiguate, so only the default remote is consulted.
    #[must_use]
    pub fn for_branches(branches: &[String], default_branch: &str, default_remote: &str) -> Self {
        match branches {
            [only] if only == default_branch => Self::Named(default_remote.to_string()),
            _ => Self::All,
        }
    }
}

/// Remove duplicates, keeping the first occurrence of each item.
pub fn dedupe<T, I>(items: I) -> Vec<T>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

/// Extract raw URLs from `git remote -v` output.
///
/// Each line looks like `origin\tgit@host:owner/repo.git (fetch)`. Lines
/// without a tab-separated URL are skipped.
#[must_use]
pub fn parse_remote_listing(stdout: &str) -> Vec<String> {
    dedupe(
        stdout
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| line.split('\t').nth(1))
            .filter_map(|field| field.split(' ').next())
            .filter(|url| !url.is_empty())
            .map(str::to_string),
    )
}

/// Extract the raw URL from `git config --get remote.<name>.url` output.
#[must_use]
pub fn parse_single_remote(stdout: &str) -> Vec<String> {
    let url = stdout.trim();
    if url.is_empty() {
        Vec::new()
    } else {
        vec![url.to_string()]
    }
}

/// Canonicalize every raw URL, dropping unrecognized ones and duplicates.
#[must_use]
pub fn format_remotes<S: AsRef<str>>(raw: &[S]) -> Vec<RemoteUrl> {
    dedupe(raw.iter().filter_map(|url| canonicalize(url.as_ref())))
}

/// Convert a single raw remote URL into its canonical web form.
///
/// Returns `None` for schemes that have no web counterpart (local paths,
/// `file://`, ...).
#[must_use]
pub fn canonicalize(raw: &str) -> Option<RemoteUrl> {
    let raw = raw.trim();
    let rewritten = rewrite_scheme(raw)?;
    let cleaned = strip_trailing_slashes(&strip_git_suffix(&strip_credentials(&rewritten)));
    if cleaned.is_empty() {
        return None;
    }

    let parsed = Url::parse(&cleaned).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return None;
    }

    Some(RemoteUrl {
        canonical: strip_trailing_slashes(parsed.as_str()),
        parsed,
    })
}

fn rewrite_scheme(raw: &str) -> Option<String> {
    if raw.starts_with("https:") || raw.starts_with("http:") {
        return Some(strip_git_suffix(raw));
    }

    if let Some(at) = raw.rfind('@') {
        let host_and_path = strip_git_suffix(&raw[at + 1..]).replace(':', "/");
        return Some(format!("https://{host_and_path}"));
    }

    if let Some(rest) = raw.strip_prefix("ftp") {
        // Covers both `ftp:` and `ftps:`.
        if rest.starts_with(':') || rest.starts_with("s:") {
            return Some(strip_git_suffix(&format!("http{rest}")));
        }
    }

    if let Some(rest) = raw.strip_prefix("ssh:") {
        return Some(strip_git_suffix(&format!("https:{rest}")));
    }

    if let Some(rest) = raw.strip_prefix("git:") {
        return Some(strip_git_suffix(&format!("https:{rest}")));
    }

    None
}

/// Drop a `user[:password]@` segment from the authority.
fn strip_credentials(url: &str) -> String {
    let Some(scheme_end) = url.find("//") else {
        return url.to_string();
    };
    let authority_start = scheme_end + 2;
    let rest = &url[authority_start..];
    let authority_end = rest.find('/').unwrap_or(rest.len());

    rest[..authority_end].rfind('@').map_or_else(
        || url.to_string(),
        |at| format!("{}{}", &url[..authority_start], &rest[at + 1..]),
    )
}

/// Remove `.git` suffixes and trailing slashes.
fn strip_git_suffix(url: &str) -> String {
    let mut trimmed = url.trim_end_matches('/');
    while let Some(rest) = trimmed.strip_suffix(".git") {
        trimmed = rest.trim_end_matches('/');
    }
    trimmed.to_string()
}

fn strip_trailing_slashes(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}
