//! Test fixture for setting up temporary git repositories

use std::fs;
use std::path::{Path, PathBuf};

use git2::{Repository, RepositoryInitOptions, Signature};
use tempfile::TempDir;

/// Test fixture that sets up a temporary git repository with one commit
pub struct TestFixture {
    /// Temporary directory containing the git repo
    _temp_dir: TempDir,
    /// Path to the git repository
    pub repo_path: PathBuf,
    repo: Repository,
}

impl TestFixture {
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let temp_dir = TempDir::new()?;
        // Canonicalize to handle symlinked temp dirs.
        let repo_path = temp_dir
            .path()
            .canonicalize()
            .unwrap_or_else(|_| temp_dir.path().to_path_buf());

        // Git's default branch is user-configurable, pin it so every run
        // resolves the same branch names.
        let mut init_opts = RepositoryInitOptions::new();
        init_opts.initial_head("master");
        let repo = Repository::init_opts(&repo_path, &init_opts)?;
        repo.set_head("refs/heads/master")?;
        let sig = Signature::now("Test", "test@test.com")?;

        fs::write(repo_path.join("README.md"), "# Test Repository\n")?;
        fs::create_dir_all(repo_path.join("src"))?;
        fs::write(
            repo_path.join("src/lib.rs"),
            "//! Test crate\n\npub fn answer() -> u32 {\n    42\n}\n",
        )?;

        let mut index = repo.index()?;
        index.add_path(Path::new("README.md"))?;
        index.add_path(Path::new("src/lib.rs"))?;
        index.write()?;

        let tree_id = index.write_tree()?;
        {
            let tree = repo.find_tree(tree_id)?;
            repo.commit(Some("HEAD"), &sig, &sig, "Initial commit", &tree, &[])?;
        }

        Ok(Self {
            _temp_dir: temp_dir,
            repo_path,
            repo,
        })
    }

    /// Absolute path of a file in the checkout
    pub fn file(&self, relative: &str) -> PathBuf {
        self.repo_path.join(relative)
    }

    /// Configure a remote without fetching anything
    pub fn add_remote(&self, name: &str, url: &str) -> Result<(), git2::Error> {
        self.repo.remote(name, url)?;
        Ok(())
    }

    /// Record `branch` as pushed to `remote` by creating its tracking ref at HEAD
    pub fn publish(&self, remote: &str, branch: &str) -> Result<(), git2::Error> {
        let head = self.repo.head()?.peel_to_commit()?;
        self.repo.reference(
            &format!("refs/remotes/{remote}/{branch}"),
            head.id(),
            true,
            "test fixture",
        )?;
        Ok(())
    }

    /// Create a branch at HEAD and make it current
    pub fn checkout_new_branch(&self, name: &str) -> Result<(), git2::Error> {
        let head = self.repo.head()?.peel_to_commit()?;
        self.repo.branch(name, &head, false)?;
        self.repo.set_head(&format!("refs/heads/{name}"))?;
        Ok(())
    }

    /// Full SHA of the current commit
    pub fn head_sha(&self) -> Result<String, git2::Error> {
        Ok(self.repo.head()?.peel_to_commit()?.id().to_string())
    }
}
