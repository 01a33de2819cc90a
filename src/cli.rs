use crate::config::{Config, Verbosity};
use crate::constants::{CHANGELOG_TOOL, DEFAULT_INSTALL_DIR, INSTALL_DIR_ENV};
use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;

/// Update Oh My Zsh to the latest version of its configured branch.
#[derive(Parser, Debug)]
#[command(name = "omz-update", version)]
pub struct Cli {
    /// Show the changelog of the new commits after updating
    #[arg(long)]
    pub interactive: bool,

    /// Log every git command that runs
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Print only the status line
    #[arg(short, long)]
    pub quiet: bool,

    /// Installation directory [default: $ZSH, then ~/.oh-my-zsh]
    #[arg(long, value_name = "DIR")]
    pub repo: Option<PathBuf>,

    /// Changelog tool [default: <DIR>/tools/changelog.sh]
    #[arg(long, value_name = "FILE")]
    pub changelog: Option<PathBuf>,
}

impl Cli {
    /// Resolves the runtime configuration against the process environment.
    pub fn into_config(self) -> anyhow::Result<Config> {
        self.resolve(|key| std::env::var(key).ok())
    }

    fn resolve<F>(self, lookup: F) -> anyhow::Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let verbosity = if self.verbose {
            Verbosity::Verbose
        } else if self.quiet {
            Verbosity::Quiet
        } else {
            Verbosity::Normal
        };

        let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let repo = match self.repo {
            Some(repo) => repo,
            None => match non_empty(INSTALL_DIR_ENV) {
                Some(dir) => PathBuf::from(dir),
                None => non_empty("HOME")
                    .map(|home| PathBuf::from(home).join(DEFAULT_INSTALL_DIR))
                    .context("cannot locate the installation: set $ZSH or pass --repo")?,
            },
        };
        let changelog = self
            .changelog
            .unwrap_or_else(|| repo.join(CHANGELOG_TOOL));

        Ok(Config {
            verbosity,
            interactive: self.interactive,
            repo,
            changelog,
        })
    }
}
