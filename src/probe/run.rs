//! Probe orchestration
//!
//! Provision -> poll -> merge (only with a ticket) -> cleanup. The first hard
//! failure ends the sequence and is recorded in the report; cleanup runs on
//! every path.

use crate::error::Error;
use crate::platform::PlatformService;
use crate::probe::cleanup::{CleanupReport, execute_cleanup};
use crate::probe::clock::Clock;
use crate::probe::execute::execute_merge;
use crate::probe::lifecycle::{BranchLifecycle, BranchState};
use crate::probe::poll::{PollReport, PollSettings, poll_mergeability};
use crate::probe::progress::ProgressCallback;
use crate::probe::provision::provision;
use crate::repo::Vcs;
use crate::types::{MergeResult, PollOutcome, PullRequestRef, TestBranch};
use std::time::Duration;
use tracing::debug;

/// Default trunk branch
pub const DEFAULT_TRUNK: &str = "main";

/// Default remote
pub const DEFAULT_REMOTE: &str = "origin";

/// File committed on the test branch
pub const DEFAULT_MARKER_FILE: &str = "test_merge_file.txt";

/// Default pause between opening the PR and the first poll
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(2);

/// Knobs for one probe run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeSettings {
    /// Branch the test branch is cut from and merged into
    pub trunk: String,
    /// Remote to pull from and push to
    pub remote: String,
    /// Marker file path, relative to the working copy root
    pub marker_file: String,
    /// Pause after PR creation
    pub settle_delay: Duration,
    /// Poll budget
    pub poll: PollSettings,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            trunk: DEFAULT_TRUNK.to_string(),
            remote: DEFAULT_REMOTE.to_string(),
            marker_file: DEFAULT_MARKER_FILE.to_string(),
            settle_delay: DEFAULT_SETTLE_DELAY,
            poll: PollSettings::default(),
        }
    }
}

/// What the probe concluded about the merge mechanism
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnosis {
    /// A clean PR merged; trouble lies in conflict resolution
    MergeMechanismWorks,
    /// A clean PR could not be merged
    MergeMechanismBroken,
    /// A branch with one new file was reported conflicted
    UnexpectedConflict,
    /// The run ended before the question could be answered
    Inconclusive(String),
}

impl std::fmt::Display for Diagnosis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MergeMechanismWorks => write!(
                f,
                "automatic merging works; failures come from PRs with real conflicts"
            ),
            Self::MergeMechanismBroken => write!(
                f,
                "automatic merging is broken; a conflict-free PR was rejected"
            ),
            Self::UnexpectedConflict => write!(
                f,
                "a conflict-free branch was reported as conflicted; \
                 trunk may have moved during the run"
            ),
            Self::Inconclusive(reason) => write!(f, "inconclusive: {reason}"),
        }
    }
}

/// Everything one probe run observed
#[derive(Debug)]
pub struct ProbeReport {
    /// The disposable branch
    pub branch: TestBranch,
    /// How far the branch got before cleanup
    pub state: BranchState,
    /// The PR, if one was opened
    pub pr: Option<PullRequestRef>,
    /// Poll result, if polling finished
    pub poll: Option<PollReport>,
    /// Merge verdict, if a merge was attempted
    pub merge: Option<MergeResult>,
    /// Cleanup outcome (always present)
    pub cleanup: CleanupReport,
    /// The failure that ended the sequence early
    pub failure: Option<Error>,
}

impl ProbeReport {
    /// Classify the run
    pub fn diagnosis(&self) -> Diagnosis {
        match (&self.merge, self.poll.as_ref().map(|p| p.outcome)) {
            (Some(MergeResult::Merged { .. }), _) => Diagnosis::MergeMechanismWorks,
            (Some(MergeResult::Rejected { .. }), _) => Diagnosis::MergeMechanismBroken,
            (None, Some(PollOutcome::Conflicted)) => Diagnosis::UnexpectedConflict,
            (None, _) => Diagnosis::Inconclusive(
                self.failure
                    .as_ref()
                    .map_or_else(|| "no merge was attempted".to_string(), ToString::to_string),
            ),
        }
    }
}

/// Failure recorded for a poll outcome that does not lead to a merge
fn poll_failure(report: &PollReport) -> Option<Error> {
    match report.outcome {
        PollOutcome::ReadyClean | PollOutcome::Conflicted => None,
        PollOutcome::TimedOut => Some(Error::PollTimedOut {
            attempts: report.attempts,
        }),
        PollOutcome::Ambiguous => Some(Error::PollAmbiguous {
            mergeable: report.observation.mergeable,
            state: report.observation.state.clone(),
        }),
    }
}

struct Stages {
    pr: Option<PullRequestRef>,
    poll: Option<PollReport>,
    merge: Option<MergeResult>,
    failure: Option<Error>,
}

async fn run_stages(
    platform: &dyn PlatformService,
    vcs: &dyn Vcs,
    clock: &dyn Clock,
    progress: &dyn ProgressCallback,
    lifecycle: &mut BranchLifecycle,
    settings: &ProbeSettings,
) -> Stages {
    let mut stages = Stages {
        pr: None,
        poll: None,
        merge: None,
        failure: None,
    };

    let pr = match provision(platform, vcs, clock, progress, lifecycle, settings).await {
        Ok(pr) => pr,
        Err(e) => {
            stages.failure = Some(e);
            return stages;
        }
    };
    stages.pr = Some(pr.clone());

    let report = match poll_mergeability(platform, clock, progress, &pr, &settings.poll).await {
        Ok(report) => report,
        Err(e) => {
            stages.failure = Some(e);
            return stages;
        }
    };
    stages.failure = poll_failure(&report);
    let ticket = report.merge_ticket();
    stages.poll = Some(report);

    let Some(ticket) = ticket else {
        return stages;
    };

    match execute_merge(platform, &ticket, progress).await {
        Ok(result) => {
            lifecycle.record_merge(&result);
            if let MergeResult::Rejected {
                status, message, ..
            } = &result
            {
                stages.failure = Some(Error::MergeAttemptFailed {
                    status: *status,
                    message: message.clone(),
                });
            }
            stages.merge = Some(result);
        }
        Err(e) => stages.failure = Some(e),
    }
    stages
}

/// Run the whole probe. Never fails; see [`ProbeReport::failure`].
pub async fn run_merge_probe(
    platform: &dyn PlatformService,
    vcs: &dyn Vcs,
    clock: &dyn Clock,
    progress: &dyn ProgressCallback,
    settings: &ProbeSettings,
) -> ProbeReport {
    let branch = TestBranch::new(&settings.trunk, clock.now());
    debug!(branch = %branch.name, repo = %platform.config().identity, "starting merge probe");
    let mut lifecycle = BranchLifecycle::new(branch);

    let stages = run_stages(platform, vcs, clock, progress, &mut lifecycle, settings).await;
    if let Some(failure) = &stages.failure {
        progress.on_warning(&failure.to_string()).await;
    }

    let state = lifecycle.state();
    let cleanup = execute_cleanup(vcs, &lifecycle, settings, progress).await;
    debug!(%state, cleanup_failures = cleanup.failures.len(), "merge probe finished");

    ProbeReport {
        branch: lifecycle.branch().clone(),
        state,
        pr: stages.pr,
        poll: stages.poll,
        merge: stages.merge,
        cleanup,
        failure: stages.failure,
    }
}
