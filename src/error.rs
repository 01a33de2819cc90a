//! Domain errors for the update run.
//!
//! Git wrappers return [`anyhow::Error`]; the repository state manager
//! narrows the failures the orchestrator cares about into [`UpdateError`],
//! which also knows the process exit status each failure maps to.

use crate::constants::FAILURE_EXIT_CODE;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UpdateError {
    /// The update branch (or the saved HEAD) could not be checked out.
    #[error("failed to check out '{reference}': {reason}")]
    Checkout { reference: String, reason: String },

    /// `git pull` exited with a non-zero status.
    #[error("git pull exited with status {code}: {stderr}")]
    Pull { code: i32, stderr: String },

    /// HEAD resolves to neither a branch nor a commit.
    #[error("unable to determine the current HEAD: {0}")]
    GitState(String),

    /// Any other git invocation failed.
    #[error(transparent)]
    Git(#[from] anyhow::Error),
}

impl UpdateError {
    /// Process exit status for this failure.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Pull { code, .. } => *code,
            Self::Checkout { .. } | Self::GitState(_) | Self::Git(_) => FAILURE_EXIT_CODE,
        }
    }
}
