mod common;

use common::TestRepo;
use omz_update::constants::{AUTO_STASH_KEY, setting_key};
use omz_update::error::UpdateError;
use omz_update::git::{no_op_logger, run_git};
use omz_update::remote::CANONICAL_URL;
use omz_update::repo::{OriginalHead, RepoState};

#[test]
fn test_normalize_remote_rewrites_legacy_url() -> anyhow::Result<()> {
    let repo = TestRepo::with_remote()?;
    run_git(
        repo.path(),
        &["remote", "add", "legacy", "https://github.com/snakewarhead/oh-my-zsh.git"],
    )?;

    let rewritten = repo.state().normalize_remote()?;

    assert_eq!(rewritten, Some("legacy".to_string()));
    assert_eq!(
        repo.config("remote.legacy.url")?,
        Some(CANONICAL_URL.to_string())
    );
    Ok(())
}

#[test]
fn test_normalize_remote_leaves_other_remotes_untouched() -> anyhow::Result<()> {
    let repo = TestRepo::with_remote()?;
    let origin = repo.config("remote.origin.url")?;
    run_git(
        repo.path(),
        &["remote", "add", "fork", "https://github.com/someone/oh-my-zsh.git"],
    )?;

    let rewritten = repo.state().normalize_remote()?;

    assert_eq!(rewritten, None);
    assert_eq!(repo.config("remote.origin.url")?, origin);
    assert_eq!(
        repo.config("remote.fork.url")?,
        Some("https://github.com/someone/oh-my-zsh.git".to_string())
    );
    Ok(())
}

#[test]
fn test_normalize_remote_stops_after_first_match() -> anyhow::Result<()> {
    let repo = TestRepo::with_remote()?;
    run_git(
        repo.path(),
        &["remote", "add", "a-legacy", "git@github.com:snakewarhead/oh-my-zsh.git"],
    )?;
    run_git(
        repo.path(),
        &["remote", "add", "b-legacy", "git://github.com/snakewarhead/oh-my-zsh"],
    )?;

    let rewritten = repo.state().normalize_remote()?;

    assert_eq!(rewritten, Some("a-legacy".to_string()));
    assert_eq!(
        repo.config("remote.a-legacy.url")?,
        Some(CANONICAL_URL.to_string())
    );
    assert_eq!(
        repo.config("remote.b-legacy.url")?,
        Some("git://github.com/snakewarhead/oh-my-zsh".to_string())
    );
    Ok(())
}

#[test]
fn test_apply_fixups_is_idempotent() -> anyhow::Result<()> {
    let repo = TestRepo::with_remote()?;
    let state = repo.state();

    state.apply_fixups()?;
    state.apply_fixups()?;

    assert_eq!(repo.config("core.eol")?, Some("lf".to_string()));
    assert_eq!(repo.config("core.autocrlf")?, Some("false".to_string()));
    assert_eq!(
        repo.config("fsck.zeroPaddedFilemode")?,
        Some("ignore".to_string())
    );
    assert_eq!(
        repo.config("fetch.fsck.zeroPaddedFilemode")?,
        Some("ignore".to_string())
    );
    assert_eq!(
        repo.config("receive.fsck.zeroPaddedFilemode")?,
        Some("ignore".to_string())
    );
    Ok(())
}

#[test]
fn test_get_setting_falls_back_to_default() -> anyhow::Result<()> {
    let repo = TestRepo::with_remote()?;
    let state = repo.state();

    assert_eq!(state.get_setting("remote", "origin")?, "origin");

    repo.set_config(&setting_key("remote"), "upstream")?;
    assert_eq!(state.get_setting("remote", "origin")?, "upstream");
    Ok(())
}

#[test]
fn test_set_setting_is_namespaced() -> anyhow::Result<()> {
    let repo = TestRepo::with_remote()?;

    repo.state().set_setting("lastVersion", "abc123")?;

    assert_eq!(
        repo.config("oh-my-zsh.lastVersion")?,
        Some("abc123".to_string())
    );
    Ok(())
}

#[test]
fn test_capture_head_on_branch_and_detached() -> anyhow::Result<()> {
    let repo = TestRepo::with_remote()?;
    let state = repo.state();

    assert_eq!(
        state.capture_head()?,
        OriginalHead::Branch("master".to_string())
    );

    let commit = repo.head_commit()?;
    run_git(repo.path(), &["checkout", "-q", "--detach", "HEAD"])?;
    assert_eq!(state.capture_head()?, OriginalHead::DetachedAt(commit));
    Ok(())
}

#[test]
fn test_capture_head_rejects_unborn_branch() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    run_git(dir.path(), &["init", "-q", "-b", "master"])?;
    let state = RepoState::new(dir.path(), no_op_logger);

    match state.capture_head() {
        Err(UpdateError::GitState(_)) => Ok(()),
        other => anyhow::bail!("expected a git state error, got {other:?}"),
    }
}

#[test]
fn test_auto_stash_round_trip_from_unset() -> anyhow::Result<()> {
    let repo = TestRepo::with_remote()?;
    let state = repo.state();

    let prior = state.capture_auto_stash()?;
    assert_eq!(prior, None);

    state.enable_auto_stash()?;
    assert_eq!(repo.config(AUTO_STASH_KEY)?, Some("true".to_string()));

    state.restore_auto_stash(prior.as_deref())?;
    assert_eq!(repo.config(AUTO_STASH_KEY)?, None);
    Ok(())
}

#[test]
fn test_auto_stash_round_trip_from_false() -> anyhow::Result<()> {
    let repo = TestRepo::with_remote()?;
    repo.set_config(AUTO_STASH_KEY, "false")?;
    let state = repo.state();

    let prior = state.capture_auto_stash()?;
    state.enable_auto_stash()?;
    state.restore_auto_stash(prior.as_deref())?;

    assert_eq!(repo.config(AUTO_STASH_KEY)?, Some("false".to_string()));
    Ok(())
}

#[test]
fn test_restore_auto_stash_when_already_unset() -> anyhow::Result<()> {
    let repo = TestRepo::with_remote()?;

    repo.state().restore_auto_stash(None)?;

    assert_eq!(repo.config(AUTO_STASH_KEY)?, None);
    Ok(())
}

#[test]
fn test_checkout_unknown_ref_is_checkout_error() -> anyhow::Result<()> {
    let repo = TestRepo::with_remote()?;

    let err = repo
        .state()
        .checkout("no-such-branch")
        .expect_err("checkout of a missing branch should fail");

    assert!(matches!(err, UpdateError::Checkout { ref reference, .. } if reference == "no-such-branch"));
    assert_eq!(err.exit_code(), 1);
    Ok(())
}

#[test]
fn test_pull_from_missing_remote_is_pull_error() -> anyhow::Result<()> {
    let repo = TestRepo::with_remote()?;

    let err = repo
        .state()
        .pull("no-such-remote", "master")
        .expect_err("pull from an unknown remote should fail");

    match err {
        UpdateError::Pull { code, .. } => assert_ne!(code, 0),
        other => anyhow::bail!("expected pull error, got {other:?}"),
    }
    Ok(())
}
