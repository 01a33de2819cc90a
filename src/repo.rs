//! Repository state: settings, HEAD snapshots, and session-scoped config.
//!
//! [`RepoState`] owns the path of the installation's working copy and
//! routes every read and write of repository state through the git wrappers.

use crate::constants::{AUTO_STASH_KEY, FIXUPS, setting_key};
use crate::error::UpdateError;
use crate::git::{self, GitLogger};
use crate::remote;
use std::fmt;
use std::path::{Path, PathBuf};

/// Where HEAD pointed before the update started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OriginalHead {
    /// HEAD was attached to a branch.
    Branch(String),
    /// HEAD was detached at a commit.
    DetachedAt(String),
}

impl OriginalHead {
    /// The ref to check out to get back here.
    #[must_use]
    pub fn as_ref_name(&self) -> &str {
        match self {
            Self::Branch(name) | Self::DetachedAt(name) => name,
        }
    }
}

impl fmt::Display for OriginalHead {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Branch(name) => write!(f, "{name}"),
            Self::DetachedAt(sha) => write!(f, "detached at {}", &sha[..sha.len().min(7)]),
        }
    }
}

/// Value of `rebase.autoStash` before the run; `None` means it was unset.
pub type AutoStash = Option<String>;

#[derive(Debug, Clone)]
pub struct RepoState {
    path: PathBuf,
    logger: GitLogger,
}

impl RepoState {
    pub fn new(path: impl Into<PathBuf>, logger: GitLogger) -> Self {
        Self {
            path: path.into(),
            logger,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Points the first remote found at the legacy location to the canonical
    /// URL. Returns the name of the rewritten remote, if any.
    pub fn normalize_remote(&self) -> anyhow::Result<Option<String>> {
        for name in git::list_remotes(&self.path, self.logger)? {
            let key = format!("remote.{name}.url");
            let Some(url) = git::get_config(&self.path, &key, self.logger)? else {
                continue;
            };
            if let Some(canonical) = remote::canonical_replacement(&url) {
                tracing::info!(remote = %name, from = %url, to = canonical, "rewriting legacy remote");
                git::set_remote_url(&self.path, &name, canonical, self.logger)?;
                return Ok(Some(name));
            }
        }
        Ok(None)
    }

    /// Applies the permanent line-ending and fsck fixups.
    pub fn apply_fixups(&self) -> anyhow::Result<()> {
        for (key, value) in FIXUPS {
            git::set_config(&self.path, key, value, self.logger)?;
        }
        Ok(())
    }

    pub fn capture_auto_stash(&self) -> anyhow::Result<AutoStash> {
        git::get_bool_config(&self.path, AUTO_STASH_KEY, self.logger)
    }

    pub fn enable_auto_stash(&self) -> anyhow::Result<()> {
        git::set_config(&self.path, AUTO_STASH_KEY, "true", self.logger)
    }

    /// Puts `rebase.autoStash` back the way [`Self::capture_auto_stash`] found it.
    pub fn restore_auto_stash(&self, prior: Option<&str>) -> anyhow::Result<()> {
        match prior {
            Some(value) if !value.is_empty() => {
                git::set_config(&self.path, AUTO_STASH_KEY, value, self.logger)
            }
            _ => git::unset_config(&self.path, AUTO_STASH_KEY, self.logger),
        }
    }

    /// Reads one of this tool's settings from the local repository config.
    pub fn get_setting(&self, key: &str, default: &str) -> anyhow::Result<String> {
        let value = git::get_local_config(&self.path, &setting_key(key), self.logger)?;
        Ok(value
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| default.to_string()))
    }

    pub fn set_setting(&self, key: &str, value: &str) -> anyhow::Result<()> {
        git::set_config(&self.path, &setting_key(key), value, self.logger)
    }

    /// Snapshots HEAD. Fails unless HEAD resolves to a commit, so an
    /// unborn branch is rejected too.
    pub fn capture_head(&self) -> Result<OriginalHead, UpdateError> {
        let to_state = |e: anyhow::Error| UpdateError::GitState(format!("{e:#}"));
        let branch = git::symbolic_ref(&self.path, self.logger).map_err(to_state)?;
        let commit = git::get_current_commit(&self.path, self.logger).map_err(to_state)?;

        Ok(match branch {
            Some(branch) => OriginalHead::Branch(branch),
            None => OriginalHead::DetachedAt(commit),
        })
    }

    pub fn checkout(&self, reference: &str) -> Result<(), UpdateError> {
        git::checkout(&self.path, reference, self.logger).map_err(|e| UpdateError::Checkout {
            reference: reference.to_string(),
            reason: format!("{e:#}"),
        })
    }

    pub fn commit_of(&self, rev: &str) -> anyhow::Result<String> {
        git::rev_parse(&self.path, rev, self.logger)
    }

    pub fn pull(&self, remote: &str, branch: &str) -> Result<(), UpdateError> {
        let output = git::pull_rebase(&self.path, remote, branch, self.logger)?;
        if output.success() {
            return Ok(());
        }
        Err(UpdateError::Pull {
            code: output.code.unwrap_or(crate::constants::FAILURE_EXIT_CODE),
            stderr: output.stderr,
        })
    }
}
