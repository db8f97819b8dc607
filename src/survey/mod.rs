//! Conflict survey
//!
//! Read-only pass over every open pull request, picking out the ones the
//! platform reports as conflicted (`mergeable_state: dirty`). These are the
//! PRs that need manual resolution before any automatic merge can work.

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::probe::progress::{Phase, ProgressCallback};
use crate::types::{MergeableState, PullRequestDetails};
use tracing::debug;

/// What the survey found
#[derive(Debug, Default)]
pub struct SurveyReport {
    /// Number of open PRs listed
    pub examined: usize,
    /// PRs reported dirty, in listing order
    pub conflicted: Vec<PullRequestDetails>,
    /// PRs whose mergeability was still being computed
    pub undetermined: usize,
    /// PRs whose details could not be fetched (`Error::SurveyFetchFailed`)
    pub skipped: Vec<Error>,
}

impl SurveyReport {
    /// Whether any open PR is conflicted
    pub fn has_conflicts(&self) -> bool {
        !self.conflicted.is_empty()
    }
}

/// Classify every open pull request.
///
/// Fails only if the listing itself fails; a PR whose details cannot be
/// fetched is recorded in [`SurveyReport::skipped`] and the survey goes on.
pub async fn survey_conflicts(
    platform: &dyn PlatformService,
    progress: &dyn ProgressCallback,
) -> Result<SurveyReport> {
    progress.on_phase(Phase::Survey).await;
    let open = platform.list_open_prs().await?;
    progress
        .on_message(&format!("Found {} open PR(s)", open.len()))
        .await;

    let mut report = SurveyReport {
        examined: open.len(),
        ..SurveyReport::default()
    };

    for pr in &open {
        let details = match platform.get_pr_details(pr.number).await {
            Ok(details) => details,
            Err(e) => {
                let error = Error::SurveyFetchFailed {
                    number: pr.number,
                    message: e.to_string(),
                };
                progress.on_warning(&error.to_string()).await;
                report.skipped.push(error);
                continue;
            }
        };

        debug!(pr_number = pr.number, observation = %details.observation, "surveyed PR");
        match details.observation.state {
            MergeableState::Dirty => report.conflicted.push(details),
            MergeableState::Unknown => report.undetermined += 1,
            MergeableState::Clean | MergeableState::Other(_) => {}
        }
    }

    debug!(
        examined = report.examined,
        conflicted = report.conflicted.len(),
        skipped = report.skipped.len(),
        "survey finished"
    );
    Ok(report)
}
