//! Lifecycle cleanup
//!
//! The plan is derived purely from how far the branch got; execution is
//! best-effort and collects failures instead of stopping at the first one.
//! Trunk is always checked out again, including after a successful merge.

use crate::error::Error;
use crate::probe::lifecycle::BranchLifecycle;
use crate::probe::progress::{Phase, ProgressCallback};
use crate::probe::run::ProbeSettings;
use crate::repo::Vcs;
use tracing::debug;

/// One cleanup action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupStep {
    /// `git checkout <trunk>`
    RestoreTrunk,
    /// `git branch -D <branch>`
    DeleteLocalBranch,
    /// `git push <remote> --delete <branch>`
    DeleteRemoteBranch,
    /// Remove the marker file from the working copy if present
    RemoveMarkerFile,
}

impl std::fmt::Display for CleanupStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::RestoreTrunk => "restore-trunk",
            Self::DeleteLocalBranch => "delete-local-branch",
            Self::DeleteRemoteBranch => "delete-remote-branch",
            Self::RemoveMarkerFile => "remove-marker-file",
        };
        f.write_str(name)
    }
}

/// Outcome of a cleanup pass
#[derive(Debug, Default)]
pub struct CleanupReport {
    /// Steps that succeeded
    pub completed: Vec<CleanupStep>,
    /// Steps that failed (`Error::CleanupFailed`)
    pub failures: Vec<Error>,
}

impl CleanupReport {
    /// Whether every planned step succeeded
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Create a cleanup plan (PURE - no I/O)
///
/// A merged branch is left alone apart from returning to trunk. Otherwise
/// undo whatever exists: local branch, remote branch, stray marker file.
pub fn plan_cleanup(lifecycle: &BranchLifecycle) -> Vec<CleanupStep> {
    let mut steps = vec![CleanupStep::RestoreTrunk];
    if lifecycle.is_merged() {
        return steps;
    }
    if lifecycle.exists_locally() {
        steps.push(CleanupStep::DeleteLocalBranch);
    }
    if lifecycle.is_on_remote() {
        steps.push(CleanupStep::DeleteRemoteBranch);
    }
    steps.push(CleanupStep::RemoveMarkerFile);
    steps
}

/// Execute the cleanup plan (EFFECTFUL, best-effort)
pub async fn execute_cleanup(
    vcs: &dyn Vcs,
    lifecycle: &BranchLifecycle,
    settings: &ProbeSettings,
    progress: &dyn ProgressCallback,
) -> CleanupReport {
    progress.on_phase(Phase::Cleanup).await;
    let branch = &lifecycle.branch().name;
    let mut report = CleanupReport::default();

    for step in plan_cleanup(lifecycle) {
        let outcome = match step {
            CleanupStep::RestoreTrunk => vcs.checkout(&settings.trunk).map_err(|e| e.to_string()),
            CleanupStep::DeleteLocalBranch => {
                vcs.delete_local_branch(branch).map_err(|e| e.to_string())
            }
            CleanupStep::DeleteRemoteBranch => vcs
                .delete_remote_branch(&settings.remote, branch)
                .map_err(|e| e.to_string()),
            CleanupStep::RemoveMarkerFile => {
                let marker = vcs.workdir().join(&settings.marker_file);
                if marker.exists() {
                    std::fs::remove_file(&marker).map_err(|e| e.to_string())
                } else {
                    Ok(())
                }
            }
        };

        match outcome {
            Ok(()) => {
                debug!(%step, branch = %branch, "cleanup step done");
                report.completed.push(step);
            }
            Err(message) => {
                progress
                    .on_warning(&format!("Cleanup step {step} failed: {message}"))
                    .await;
                report.failures.push(Error::CleanupFailed { step, message });
            }
        }
    }

    if report.is_clean() {
        progress.on_message("Cleanup complete").await;
    }
    report
}
