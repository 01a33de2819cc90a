//! Test infrastructure for omz-update integration tests.

#![allow(dead_code)]

use anyhow::Result;
use omz_update::git::{self, no_op_logger, run_git};
use omz_update::repo::RepoState;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A working copy cloned from a bare upstream, plus a second clone used to
/// publish new upstream commits. Everything lives in one temp dir that is
/// removed when dropped.
pub struct TestRepo {
    _temp_dir: TempDir,
    path: PathBuf,
    upstream: PathBuf,
    publisher: PathBuf,
}

fn configure_identity(path: &Path) -> Result<()> {
    run_git(path, &["config", "user.email", "test@example.com"])?;
    run_git(path, &["config", "user.name", "Test User"])?;
    run_git(path, &["config", "commit.gpgsign", "false"])?;
    Ok(())
}

fn commit_file(path: &Path, file: &str, contents: &str, message: &str) -> Result<String> {
    std::fs::write(path.join(file), contents)?;
    run_git(path, &["add", file])?;
    run_git(path, &["commit", "-m", message])?;
    run_git(path, &["rev-parse", "HEAD"])
}

impl TestRepo {
    /// Creates an upstream with one commit on `master` and a clone of it.
    pub fn with_remote() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path();
        let upstream = root.join("upstream.git");
        let publisher = root.join("publisher");
        let path = root.join("local");

        std::fs::create_dir_all(&upstream)?;
        std::fs::create_dir_all(&publisher)?;
        run_git(&upstream, &["init", "--bare", "-b", "master"])?;

        run_git(&publisher, &["init", "-b", "master"])?;
        configure_identity(&publisher)?;
        commit_file(&publisher, "README.md", "# Oh My Zsh\n", "Initial commit")?;
        run_git(&publisher, &["remote", "add", "origin", path_str(&upstream)])?;
        run_git(&publisher, &["push", "-q", "-u", "origin", "master"])?;

        run_git(root, &["clone", "-q", path_str(&upstream), path_str(&path)])?;
        configure_identity(&path)?;

        Ok(Self {
            _temp_dir: temp_dir,
            path,
            upstream,
            publisher,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn upstream(&self) -> &Path {
        &self.upstream
    }

    pub fn state(&self) -> RepoState {
        RepoState::new(&self.path, no_op_logger)
    }

    /// Pushes a new commit to the upstream `master` and returns its id.
    pub fn publish_commit(&self, file: &str, contents: &str) -> Result<String> {
        let sha = commit_file(&self.publisher, file, contents, "Upstream change")?;
        run_git(&self.publisher, &["push", "-q", "origin", "master"])?;
        Ok(sha)
    }

    /// Commits in the working copy and returns the new commit id.
    pub fn commit_local(&self, file: &str, contents: &str) -> Result<String> {
        commit_file(&self.path, file, contents, "Local change")
    }

    pub fn create_branch(&self, name: &str) -> Result<()> {
        run_git(&self.path, &["branch", name])?;
        Ok(())
    }

    pub fn head_commit(&self) -> Result<String> {
        git::get_current_commit(&self.path, no_op_logger)
    }

    pub fn commit_of(&self, rev: &str) -> Result<String> {
        git::rev_parse(&self.path, rev, no_op_logger)
    }

    /// Branch HEAD is attached to, or `None` when detached.
    pub fn current_branch(&self) -> Result<Option<String>> {
        git::symbolic_ref(&self.path, no_op_logger)
    }

    pub fn config(&self, key: &str) -> Result<Option<String>> {
        git::get_local_config(&self.path, key, no_op_logger)
    }

    pub fn set_config(&self, key: &str, value: &str) -> Result<()> {
        run_git(&self.path, &["config", key, value])?;
        Ok(())
    }

    pub fn file_exists(&self, file: &str) -> bool {
        self.path.join(file).exists()
    }
}

pub fn path_str(path: &Path) -> &str {
    path.to_str().expect("temp paths are valid UTF-8")
}
