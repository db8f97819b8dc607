//! Branch/PR provisioning
//!
//! Cuts the disposable branch from freshly pulled trunk, commits a marker
//! file, pushes, and opens a pull request. Each step either succeeds or
//! aborts the rest; the lifecycle records how far we got so cleanup can
//! undo exactly that.

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::probe::clock::Clock;
use crate::probe::lifecycle::{BranchLifecycle, BranchState};
use crate::probe::progress::{Phase, ProgressCallback};
use crate::probe::run::ProbeSettings;
use crate::repo::Vcs;
use crate::types::{PullRequestRef, TestBranch};
use chrono::{DateTime, Local};
use std::path::Path;
use tracing::debug;

/// Body of the test pull request
pub const PR_BODY: &str = "Disposable pull request opened by merge-probe to check that a \
conflict-free branch merges automatically. Safe to merge or close.";

/// Named provisioning steps, reported when one fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionStep {
    /// `git checkout <trunk>`
    CheckoutTrunk,
    /// `git pull <remote> <trunk>`
    PullTrunk,
    /// `git checkout -b <branch>`
    CreateBranch,
    /// Write the marker file
    WriteMarker,
    /// `git add <marker>`
    StageMarker,
    /// `git commit`
    CommitMarker,
    /// `git push <remote> <branch>`
    PushBranch,
}

impl std::fmt::Display for ProvisionStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::CheckoutTrunk => "checkout-trunk",
            Self::PullTrunk => "pull-trunk",
            Self::CreateBranch => "create-branch",
            Self::WriteMarker => "write-marker",
            Self::StageMarker => "stage-marker",
            Self::CommitMarker => "commit-marker",
            Self::PushBranch => "push-branch",
        };
        f.write_str(name)
    }
}

/// Contents of the marker file committed on the test branch
pub fn marker_contents(now: DateTime<Local>) -> String {
    format!(
        "Merge probe marker created at {}\n\
         This file only exists to test automatic merging of a conflict-free branch.\n",
        now.to_rfc3339()
    )
}

/// Commit message for the marker commit
pub fn commit_message(branch: &TestBranch) -> String {
    format!("Merge probe: marker file for automatic merge test - {}", branch.stamp)
}

/// Title of the test pull request
pub fn pr_title(branch: &TestBranch) -> String {
    format!("[merge-probe] Auto-merge {}", branch.name)
}

fn step_failed(step: ProvisionStep) -> impl FnOnce(Error) -> Error {
    move |e| Error::ProvisioningFailed {
        step,
        message: e.to_string(),
    }
}

/// Create, commit, and push the test branch.
///
/// Advances `lifecycle` after every step that leaves something behind.
pub async fn create_test_branch(
    vcs: &dyn Vcs,
    lifecycle: &mut BranchLifecycle,
    settings: &ProbeSettings,
    now: DateTime<Local>,
    progress: &dyn ProgressCallback,
) -> Result<()> {
    let branch = lifecycle.branch().clone();
    debug!(branch = %branch.name, trunk = %settings.trunk, "creating test branch");

    vcs.checkout(&settings.trunk)
        .map_err(step_failed(ProvisionStep::CheckoutTrunk))?;
    vcs.pull(&settings.remote, &settings.trunk)
        .map_err(step_failed(ProvisionStep::PullTrunk))?;
    progress
        .on_message(&format!("Updated {} from {}", settings.trunk, settings.remote))
        .await;

    vcs.create_branch(&branch.name)
        .map_err(step_failed(ProvisionStep::CreateBranch))?;
    lifecycle.advance(BranchState::Created);

    let marker = Path::new(&settings.marker_file);
    std::fs::write(vcs.workdir().join(marker), marker_contents(now)).map_err(|e| {
        Error::ProvisioningFailed {
            step: ProvisionStep::WriteMarker,
            message: e.to_string(),
        }
    })?;
    vcs.add(marker).map_err(step_failed(ProvisionStep::StageMarker))?;
    vcs.commit(&commit_message(&branch))
        .map_err(step_failed(ProvisionStep::CommitMarker))?;
    lifecycle.advance(BranchState::Committed);

    vcs.push(&settings.remote, &branch.name)
        .map_err(step_failed(ProvisionStep::PushBranch))?;
    lifecycle.advance(BranchState::Pushed);

    progress
        .on_message(&format!("Branch created: {}", branch.name))
        .await;
    debug!(branch = %branch.name, "test branch pushed");
    Ok(())
}

/// Open the pull request for a pushed test branch, then give the platform
/// a moment to start computing mergeability.
pub async fn open_pull_request(
    platform: &dyn PlatformService,
    lifecycle: &mut BranchLifecycle,
    settings: &ProbeSettings,
    clock: &dyn Clock,
    progress: &dyn ProgressCallback,
) -> Result<PullRequestRef> {
    let branch = lifecycle.branch().clone();
    progress
        .on_message(&format!("Opening PR: {} → {}", branch.name, branch.base))
        .await;

    let pr = platform
        .create_pr(&branch.name, &branch.base, &pr_title(&branch), PR_BODY)
        .await?;
    lifecycle.advance(BranchState::PullRequestOpen(pr.number));
    progress.on_message(&format!("PR created: #{}", pr.number)).await;

    if !settings.settle_delay.is_zero() {
        progress
            .on_wait(settings.settle_delay, "letting GitHub start the mergeability check")
            .await;
        clock.sleep(settings.settle_delay).await;
    }

    Ok(pr)
}

/// Run the whole provisioning sequence: branch, marker commit, push, PR.
pub async fn provision(
    platform: &dyn PlatformService,
    vcs: &dyn Vcs,
    clock: &dyn Clock,
    progress: &dyn ProgressCallback,
    lifecycle: &mut BranchLifecycle,
    settings: &ProbeSettings,
) -> Result<PullRequestRef> {
    progress.on_phase(Phase::Provisioning).await;
    create_test_branch(vcs, lifecycle, settings, clock.now(), progress).await?;
    open_pull_request(platform, lifecycle, settings, clock, progress).await
}
