//! Application-wide constants.
//!
//! Centralized names and defaults to avoid magic strings throughout the codebase.

/// Namespace for this tool's settings in the repository's git config.
pub const SETTINGS_NAMESPACE: &str = "oh-my-zsh";

/// Settings keys, relative to [`SETTINGS_NAMESPACE`].
pub const REMOTE_KEY: &str = "remote";
pub const BRANCH_KEY: &str = "branch";
pub const LAST_VERSION_KEY: &str = "lastVersion";

/// Defaults used when the settings are absent.
pub const DEFAULT_REMOTE: &str = "origin";
pub const DEFAULT_BRANCH: &str = "master";

/// Git config key toggled for the duration of the pull.
pub const AUTO_STASH_KEY: &str = "rebase.autoStash";

/// Permanent fixups applied on every run.
pub const FIXUPS: &[(&str, &str)] = &[
    ("core.eol", "lf"),
    ("core.autocrlf", "false"),
    ("fsck.zeroPaddedFilemode", "ignore"),
    ("fetch.fsck.zeroPaddedFilemode", "ignore"),
    ("receive.fsck.zeroPaddedFilemode", "ignore"),
];

/// Environment variable holding the installation directory.
pub const INSTALL_DIR_ENV: &str = "ZSH";

/// Installation directory under `$HOME` when `ZSH` is not set.
pub const DEFAULT_INSTALL_DIR: &str = ".oh-my-zsh";

/// Changelog renderer, relative to the installation directory.
pub const CHANGELOG_TOOL: &str = "tools/changelog.sh";

/// Environment variable overriding the log filter.
pub const LOG_ENV: &str = "OMZ_UPDATE_LOG";

/// Progress spinner tick interval in milliseconds.
pub const PROGRESS_TICK_MS: u64 = 80;

/// Exit status for failures that carry no tool exit code of their own.
pub const FAILURE_EXIT_CODE: i32 = 1;

/// Builds the fully-qualified git config key for one of this tool's settings.
#[must_use]
pub fn setting_key(key: &str) -> String {
    format!("{SETTINGS_NAMESPACE}.{key}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setting_key_is_namespaced() {
        assert_eq!(setting_key(REMOTE_KEY), "oh-my-zsh.remote");
        assert_eq!(setting_key(LAST_VERSION_KEY), "oh-my-zsh.lastVersion");
    }
}
