//! Update orchestration.
//!
//! Runs the linear update sequence against a [`RepoState`]: normalize the
//! remote, apply fixups, snapshot HEAD and `rebase.autoStash`, check out the
//! update branch, pull, then put HEAD and `rebase.autoStash` back. Progress is
//! reported through [`UpdateCallbacks`]; nothing here writes to the terminal.

use crate::constants::{
    BRANCH_KEY, DEFAULT_BRANCH, DEFAULT_REMOTE, LAST_VERSION_KEY, REMOTE_KEY,
};
use crate::error::UpdateError;
use crate::repo::{AutoStash, OriginalHead, RepoState};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStep {
    NormalizingRemote,
    ApplyingFixups,
    CapturingState,
    CheckingOut,
    Pulling,
    ShowingChangelog,
    RestoringHead,
    RestoringAutoStash,
    Completed,
}

impl fmt::Display for UpdateStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NormalizingRemote => "normalizing remote",
            Self::ApplyingFixups => "applying config fixups",
            Self::CapturingState => "capturing repository state",
            Self::CheckingOut => "checking out update branch",
            Self::Pulling => "pulling updates",
            Self::ShowingChangelog => "showing changelog",
            Self::RestoringHead => "restoring HEAD",
            Self::RestoringAutoStash => "restoring rebase.autoStash",
            Self::Completed => "completed",
        };
        f.write_str(label)
    }
}

/// Receives progress notifications from [`update`].
pub trait UpdateCallbacks {
    fn on_step(&self, step: &UpdateStep);

    fn on_complete(&self, _result: &UpdateResult) {}
}

#[derive(Debug, Clone, Default)]
pub struct UpdateOptions {
    /// Run the changelog tool when new commits arrive.
    pub interactive: bool,
    /// Path to the changelog tool.
    pub changelog: PathBuf,
}

#[derive(Debug)]
pub struct UpdateFailure {
    pub error: UpdateError,
    pub step: UpdateStep,
}

#[derive(Debug)]
pub enum UpdateOutcome {
    /// The branch already matched the remote.
    UpToDate,
    /// New commits were pulled; `previous` is the branch tip before the pull.
    Updated { previous: String },
    Failed(UpdateFailure),
}

#[derive(Debug)]
pub struct UpdateResult {
    pub outcome: UpdateOutcome,
    /// HEAD as captured at the start of the run, when it could be resolved.
    pub original_head: Option<OriginalHead>,
    pub duration: Duration,
}

impl UpdateResult {
    #[must_use]
    pub fn is_success(&self) -> bool {
        !matches!(self.outcome, UpdateOutcome::Failed(_))
    }

    /// Process exit status for this run.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match &self.outcome {
            UpdateOutcome::UpToDate | UpdateOutcome::Updated { .. } => 0,
            UpdateOutcome::Failed(failure) => failure.error.exit_code(),
        }
    }
}

fn at_step<T, E>(step: UpdateStep, result: Result<T, E>) -> Result<T, UpdateFailure>
where
    E: Into<UpdateError>,
{
    result.map_err(|e| UpdateFailure {
        error: e.into(),
        step,
    })
}

/// Session state captured before anything is checked out.
struct Session {
    last_head: OriginalHead,
    reset_auto_stash: AutoStash,
    remote: String,
    branch: String,
}

/// Runs the update and always reports a result.
pub fn update(
    state: &RepoState,
    options: &UpdateOptions,
    callbacks: &impl UpdateCallbacks,
) -> UpdateResult {
    let start = Instant::now();
    let (outcome, original_head) = match run(state, options, callbacks) {
        Ok((outcome, head)) => (outcome, Some(head)),
        Err((failure, head)) => (UpdateOutcome::Failed(failure), head),
    };
    callbacks.on_step(&UpdateStep::Completed);

    let result = UpdateResult {
        outcome,
        original_head,
        duration: start.elapsed(),
    };
    callbacks.on_complete(&result);
    result
}

type RunError = (UpdateFailure, Option<OriginalHead>);

fn run(
    state: &RepoState,
    options: &UpdateOptions,
    callbacks: &impl UpdateCallbacks,
) -> Result<(UpdateOutcome, OriginalHead), RunError> {
    callbacks.on_step(&UpdateStep::NormalizingRemote);
    at_step(UpdateStep::NormalizingRemote, state.normalize_remote()).map_err(|f| (f, None))?;

    callbacks.on_step(&UpdateStep::ApplyingFixups);
    at_step(UpdateStep::ApplyingFixups, state.apply_fixups()).map_err(|f| (f, None))?;

    callbacks.on_step(&UpdateStep::CapturingState);
    let session = capture_session(state).map_err(|f| (f, None))?;

    callbacks.on_step(&UpdateStep::CheckingOut);
    if let Err(error) = state.checkout(&session.branch) {
        // HEAD never moved, but autoStash was already switched on.
        restore_auto_stash(state, &session, callbacks);
        return Err((
            UpdateFailure {
                error,
                step: UpdateStep::CheckingOut,
            },
            Some(session.last_head),
        ));
    }

    let outcome = pull(state, &session, options, callbacks);

    restore_head(state, &session, callbacks);
    restore_auto_stash(state, &session, callbacks);

    match outcome {
        Ok(outcome) => Ok((outcome, session.last_head)),
        Err(failure) => Err((failure, Some(session.last_head))),
    }
}

fn capture_session(state: &RepoState) -> Result<Session, UpdateFailure> {
    let step = UpdateStep::CapturingState;
    let last_head = at_step(step, state.capture_head())?;
    let reset_auto_stash = at_step(step, state.capture_auto_stash())?;
    let remote = at_step(step, state.get_setting(REMOTE_KEY, DEFAULT_REMOTE))?;
    let branch = at_step(step, state.get_setting(BRANCH_KEY, DEFAULT_BRANCH))?;
    at_step(step, state.enable_auto_stash())?;

    tracing::debug!(
        head = %last_head,
        auto_stash = ?reset_auto_stash,
        %remote,
        %branch,
        "captured repository state"
    );

    Ok(Session {
        last_head,
        reset_auto_stash,
        remote,
        branch,
    })
}

fn pull(
    state: &RepoState,
    session: &Session,
    options: &UpdateOptions,
    callbacks: &impl UpdateCallbacks,
) -> Result<UpdateOutcome, UpdateFailure> {
    callbacks.on_step(&UpdateStep::Pulling);
    let step = UpdateStep::Pulling;
    let last_commit = at_step(step, state.commit_of(&session.branch))?;
    at_step(step, state.pull(&session.remote, &session.branch))?;
    let new_commit = at_step(step, state.commit_of(&session.branch))?;

    if new_commit == last_commit {
        return Ok(UpdateOutcome::UpToDate);
    }

    at_step(step, state.set_setting(LAST_VERSION_KEY, &last_commit))?;

    if options.interactive {
        callbacks.on_step(&UpdateStep::ShowingChangelog);
        if let Err(e) = show_changelog(&options.changelog, state.path(), &last_commit) {
            tracing::warn!("changelog unavailable: {e:#}");
        }
    }

    Ok(UpdateOutcome::Updated {
        previous: last_commit,
    })
}

fn restore_head(state: &RepoState, session: &Session, callbacks: &impl UpdateCallbacks) {
    callbacks.on_step(&UpdateStep::RestoringHead);
    if let Err(e) = state.checkout(session.last_head.as_ref_name()) {
        tracing::warn!("could not return to {}: {e}", session.last_head);
    }
}

fn restore_auto_stash(state: &RepoState, session: &Session, callbacks: &impl UpdateCallbacks) {
    callbacks.on_step(&UpdateStep::RestoringAutoStash);
    if let Err(e) = state.restore_auto_stash(session.reset_auto_stash.as_deref()) {
        tracing::warn!("could not restore rebase.autoStash: {e:#}");
    }
}

/// Runs the changelog tool between the new HEAD and `since`, with the
/// terminal handed over to it.
fn show_changelog(tool: &Path, repo: &Path, since: &str) -> anyhow::Result<()> {
    use anyhow::Context;

    let status = Command::new(tool)
        .current_dir(repo)
        .args(["HEAD", since])
        .status()
        .with_context(|| format!("failed to run {}", tool.display()))?;
    if !status.success() {
        anyhow::bail!("{} exited with {status}", tool.display());
    }
    Ok(())
}
