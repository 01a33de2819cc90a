//! Runtime configuration derived from CLI arguments and the environment.

use crate::git::{self, GitLogger};
use crate::update::UpdateOptions;
use std::path::PathBuf;

#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Controls the verbosity level of CLI output.
    pub verbosity: Verbosity,
    /// Show the changelog after an update.
    pub interactive: bool,
    /// Working copy of the installation.
    pub repo: PathBuf,
    /// Changelog renderer to run in interactive mode.
    pub changelog: PathBuf,
}

impl Config {
    #[must_use]
    pub fn is_quiet(&self) -> bool {
        self.verbosity == Verbosity::Quiet
    }

    #[must_use]
    pub fn is_verbose(&self) -> bool {
        self.verbosity == Verbosity::Verbose
    }

    /// Returns the git logger matching the verbosity setting.
    #[must_use]
    pub fn git_logger(&self) -> GitLogger {
        if self.is_verbose() {
            git::verbose_logger
        } else {
            git::no_op_logger
        }
    }

    #[must_use]
    pub fn update_options(&self) -> UpdateOptions {
        UpdateOptions {
            interactive: self.interactive,
            changelog: self.changelog.clone(),
        }
    }

    /// Default `tracing` filter directive for this verbosity.
    #[must_use]
    pub fn log_level(&self) -> &'static str {
        match self.verbosity {
            Verbosity::Quiet => "error",
            Verbosity::Normal => "warn",
            Verbosity::Verbose => "debug",
        }
    }
}

/// Verbosity level for CLI output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Verbose,
}
