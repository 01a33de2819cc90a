//! Self-updater for an Oh My Zsh installation.
//!
//! This crate provides functionality to update the installation's git
//! working copy by:
//! - Rewriting remotes that still point at the legacy repository
//! - Applying permanent line-ending and fsck config fixups
//! - Checking out the update branch and pulling with rebase
//! - Restoring the original HEAD and `rebase.autoStash` afterwards
//!
//! Output styling adapts to the terminal: hyperlinks and 24-bit color are
//! used only where the terminal is detected to support them.

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod git;
pub mod logging;
pub mod output;
pub mod remote;
pub mod repo;
pub mod terminal;
pub mod update;
