//! Git command wrappers.
//!
//! This module provides a thin wrapper around git CLI commands,
//! handling command execution and error formatting.

use anyhow::Context;
use std::path::Path;
use std::process::Command;

/// Callback invoked with the arguments of every git command before it runs.
pub type GitLogger = fn(&[&str]);

/// Logs each git invocation as a debug event.
pub fn verbose_logger(args: &[&str]) {
    tracing::debug!(target: "omz_update::git", "git {}", args.join(" "));
}

pub fn no_op_logger(_args: &[&str]) {}

/// Exit status `git config --get` uses for a missing key.
const CONFIG_KEY_MISSING: i32 = 1;

/// Exit status `git config --unset` uses for a missing key.
const CONFIG_UNSET_MISSING: i32 = 5;

/// Captured result of a git invocation, successful or not.
#[derive(Debug)]
pub struct GitOutput {
    pub stdout: String,
    pub stderr: String,
    pub code: Option<i32>,
}

impl GitOutput {
    #[must_use]
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

fn exec(repo: &Path, args: &[&str], envs: &[(&str, &str)]) -> anyhow::Result<GitOutput> {
    let mut cmd = Command::new("git");
    cmd.current_dir(repo).args(args);
    for (key, value) in envs {
        cmd.env(key, value);
    }

    let output = cmd.output().context("Failed to spawn git command")?;
    Ok(GitOutput {
        stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        code: output.status.code(),
    })
}

/// Runs git in `repo`, returning trimmed stdout or failing on a non-zero exit.
pub fn run_git(repo: &Path, args: &[&str]) -> anyhow::Result<String> {
    let output = exec(repo, args, &[])?;
    if output.success() {
        Ok(output.stdout)
    } else {
        anyhow::bail!("git {} failed: {}", args.join(" "), output.stderr)
    }
}

fn run_logged(repo: &Path, args: &[&str], logger: GitLogger) -> anyhow::Result<String> {
    logger(args);
    run_git(repo, args)
}

fn validate_ref_name(reference: &str) -> anyhow::Result<()> {
    if reference.is_empty()
        || reference.starts_with('-')
        || reference.contains('\0')
        || reference.contains('\n')
    {
        anyhow::bail!("Invalid ref name: {:?}", reference);
    }
    Ok(())
}

pub fn list_remotes(repo: &Path, logger: GitLogger) -> anyhow::Result<Vec<String>> {
    let output = run_logged(repo, &["remote"], logger).context("Failed to list remotes")?;
    Ok(output.lines().map(str::to_string).collect())
}

pub fn set_remote_url(
    repo: &Path,
    remote: &str,
    url: &str,
    logger: GitLogger,
) -> anyhow::Result<()> {
    run_logged(repo, &["remote", "set-url", remote, url], logger)
        .with_context(|| format!("Failed to set url of remote '{remote}'"))?;
    Ok(())
}

fn query_config(
    repo: &Path,
    flags: &[&str],
    key: &str,
    logger: GitLogger,
) -> anyhow::Result<Option<String>> {
    let mut args = vec!["config"];
    args.extend_from_slice(flags);
    args.extend_from_slice(&["--get", key]);

    logger(&args);
    let output = exec(repo, &args, &[])?;
    match output.code {
        Some(0) => Ok(Some(output.stdout)),
        Some(CONFIG_KEY_MISSING) => Ok(None),
        _ => anyhow::bail!("Failed to read git config '{key}': {}", output.stderr),
    }
}

/// Reads `key` from any config scope; `None` when unset.
pub fn get_config(repo: &Path, key: &str, logger: GitLogger) -> anyhow::Result<Option<String>> {
    query_config(repo, &[], key, logger)
}

/// Reads `key` from the repository's own config file only.
pub fn get_local_config(
    repo: &Path,
    key: &str,
    logger: GitLogger,
) -> anyhow::Result<Option<String>> {
    query_config(repo, &["--local"], key, logger)
}

/// Reads `key` canonicalized as a boolean (`true`/`false`).
pub fn get_bool_config(
    repo: &Path,
    key: &str,
    logger: GitLogger,
) -> anyhow::Result<Option<String>> {
    query_config(repo, &["--bool"], key, logger)
}

pub fn set_config(repo: &Path, key: &str, value: &str, logger: GitLogger) -> anyhow::Result<()> {
    run_logged(repo, &["config", key, value], logger)
        .with_context(|| format!("Failed to set git config '{key}'"))?;
    Ok(())
}

/// Removes `key`; a key that is already absent is not an error.
pub fn unset_config(repo: &Path, key: &str, logger: GitLogger) -> anyhow::Result<()> {
    let args = ["config", "--unset", key];
    logger(&args);
    let output = exec(repo, &args, &[])?;
    match output.code {
        Some(0 | CONFIG_UNSET_MISSING) => Ok(()),
        _ => anyhow::bail!("Failed to unset git config '{key}': {}", output.stderr),
    }
}

/// Short name of the branch HEAD points at, or `None` when detached.
pub fn symbolic_ref(repo: &Path, logger: GitLogger) -> anyhow::Result<Option<String>> {
    let args = ["symbolic-ref", "--quiet", "--short", "HEAD"];
    logger(&args);
    let output = exec(repo, &args, &[])?;
    if output.success() {
        Ok(Some(output.stdout))
    } else {
        Ok(None)
    }
}

pub fn rev_parse(repo: &Path, rev: &str, logger: GitLogger) -> anyhow::Result<String> {
    validate_ref_name(rev)?;
    run_logged(repo, &["rev-parse", "--verify", "--quiet", rev], logger)
        .with_context(|| format!("Failed to resolve '{rev}'"))
}

pub fn get_current_commit(repo: &Path, logger: GitLogger) -> anyhow::Result<String> {
    rev_parse(repo, "HEAD", logger)
}

pub fn checkout(repo: &Path, reference: &str, logger: GitLogger) -> anyhow::Result<()> {
    validate_ref_name(reference)?;
    run_logged(repo, &["checkout", "-q", reference, "--"], logger)
        .with_context(|| format!("Failed to checkout '{reference}'"))?;
    Ok(())
}

/// Runs `git pull --rebase` with a neutral locale and returns the raw
/// result so the caller can inspect the exit status.
pub fn pull_rebase(
    repo: &Path,
    remote: &str,
    branch: &str,
    logger: GitLogger,
) -> anyhow::Result<GitOutput> {
    validate_ref_name(remote)?;
    validate_ref_name(branch)?;
    let args = ["pull", "--quiet", "--rebase", remote, branch];
    logger(&args);
    exec(repo, &args, &[("LANG", "")])
}
