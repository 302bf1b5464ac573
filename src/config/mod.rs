//! Configuration management for permalinker

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::paths;
use crate::permalink::RepositoryType;

/// Environment variable that points at an alternative config file.
pub const CONFIG_PATH_ENV: &str = "PERMALINKER_CONFIG";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Which hosting provider layout to use
    #[serde(default)]
    pub repository_type: RepositoryType,

    /// Branch that is always offered when it exists on a remote
    #[serde(default = "default_branch")]
    pub default_branch: String,

    /// Remote consulted when only the default branch is relevant
    #[serde(default = "default_remote")]
    pub default_remote: String,

    /// Maximum size of `git branch -a` output in bytes
    #[serde(default)]
    pub max_buffer: Option<usize>,

    /// Do not offer a link pinned to the current commit
    #[serde(default)]
    pub exclude_current_revision: bool,

    /// Clear `GIT_DIR` before running git
    #[serde(default)]
    pub unset_git_dir: bool,

    /// Command used to open links (the URL is appended)
    #[serde(default)]
    pub browser: Option<String>,
}

fn default_branch() -> String {
    "master".to_string()
}

fn default_remote() -> String {
    "origin".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            repository_type: RepositoryType::default(),
            default_branch: default_branch(),
            default_remote: default_remote(),
            max_buffer: None,
            exclude_current_revision: false,
            unset_git_dir: false,
            browser: None,
        }
    }
}

/// Values given on the command line, layered over the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    /// Replaces `repository_type`.
    pub repository_type: Option<RepositoryType>,
    /// Replaces `default_branch`.
    pub default_branch: Option<String>,
    /// Replaces `default_remote`.
    pub default_remote: Option<String>,
    /// Replaces `max_buffer`.
    pub max_buffer: Option<usize>,
    /// Sets `exclude_current_revision` when true.
    pub exclude_current_revision: bool,
    /// Sets `unset_git_dir` when true.
    pub unset_git_dir: bool,
    /// Replaces `browser`.
    pub browser: Option<String>,
}

impl Config {
    /// Load configuration from the default location
    ///
    /// # Errors
    ///
    /// Returns an error if reading or parsing the config file fails
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            debug!(path = %path.display(), "Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Save configuration to a specific path
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory {}", parent.display())
            })?;
        }
        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        Ok(())
    }

    /// Get the configuration file path
    ///
    /// `PERMALINKER_CONFIG` wins over the platform config directory.
    #[must_use]
    pub fn default_path() -> PathBuf {
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV).filter(|p| !p.is_empty()) {
            return PathBuf::from(path);
        }
        paths::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("permalinker")
            .join("config.json")
    }

    /// Layer command line values over this configuration
    #[must_use]
    pub fn apply_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(repository_type) = overrides.repository_type {
            self.repository_type = repository_type;
        }
        if let Some(branch) = overrides.default_branch {
            self.default_branch = branch;
        }
        if let Some(remote) = overrides.default_remote {
            self.default_remote = remote;
        }
        if overrides.max_buffer.is_some() {
            self.max_buffer = overrides.max_buffer;
        }
        self.exclude_current_revision |= overrides.exclude_current_revision;
        self.unset_git_dir |= overrides.unset_git_dir;
        if overrides.browser.is_some() {
            self.browser = overrides.browser;
        }
        self
    }
}
