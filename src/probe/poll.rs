//! Mergeability polling
//!
//! GitHub computes `mergeable` asynchronously after a PR is opened or its
//! base moves. Until it settles the API reports `mergeable_state: unknown`.
//! We poll with a fixed linear backoff and a bounded number of attempts;
//! a timeout is its own outcome rather than an indefinite wait.

use crate::error::Result;
use crate::platform::PlatformService;
use crate::probe::clock::Clock;
use crate::probe::progress::{Phase, ProgressCallback};
use crate::types::{MergeabilityObservation, MergeableState, PollOutcome, PullRequestRef};
use std::time::Duration;
use tracing::debug;

/// Default number of fetches before giving up
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default wait between fetches
pub const DEFAULT_BACKOFF: Duration = Duration::from_secs(3);

/// Retry budget for the poller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    /// Maximum number of fetches (values below 1 are treated as 1)
    pub max_attempts: u32,
    /// Fixed wait between fetches
    pub backoff: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff: DEFAULT_BACKOFF,
        }
    }
}

/// Classify one observation (PURE).
///
/// Returns `None` while the platform is still computing (`unknown`), which
/// is the only case the poller retries. Never returns `TimedOut`; that is a
/// property of the whole sequence, decided by [`poll_mergeability`].
pub fn classify_observation(observation: &MergeabilityObservation) -> Option<PollOutcome> {
    match (observation.mergeable, &observation.state) {
        (Some(true), MergeableState::Clean) => Some(PollOutcome::ReadyClean),
        (Some(false), MergeableState::Dirty) => Some(PollOutcome::Conflicted),
        (_, MergeableState::Unknown) => None,
        _ => Some(PollOutcome::Ambiguous),
    }
}

/// Proof that a pull request was last observed mergeable and clean.
///
/// Only a [`PollReport`] with outcome [`PollOutcome::ReadyClean`] hands one
/// out, and the merge executor only accepts a ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeTicket {
    pr: PullRequestRef,
}

impl MergeTicket {
    /// The pull request cleared for merging
    pub const fn pr(&self) -> &PullRequestRef {
        &self.pr
    }
}

/// Result of polling one pull request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollReport {
    /// The pull request that was polled
    pub pr: PullRequestRef,
    /// Terminal classification
    pub outcome: PollOutcome,
    /// The last observation fetched
    pub observation: MergeabilityObservation,
    /// Number of fetches performed
    pub attempts: u32,
}

impl PollReport {
    /// A merge ticket, if and only if the outcome is `ReadyClean`
    pub fn merge_ticket(&self) -> Option<MergeTicket> {
        match self.outcome {
            PollOutcome::ReadyClean => Some(MergeTicket {
                pr: self.pr.clone(),
            }),
            PollOutcome::Conflicted | PollOutcome::Ambiguous | PollOutcome::TimedOut => None,
        }
    }
}

/// Poll a pull request's mergeability until it settles or the budget runs out.
///
/// Every attempt fetches a fresh observation. Waits `settings.backoff`
/// between attempts, never after the last one. Fetch errors are returned
/// immediately; only `unknown` is retried.
pub async fn poll_mergeability(
    platform: &dyn PlatformService,
    clock: &dyn Clock,
    progress: &dyn ProgressCallback,
    pr: &PullRequestRef,
    settings: &PollSettings,
) -> Result<PollReport> {
    progress.on_phase(Phase::Polling).await;
    let max_attempts = settings.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;
        let observation = platform.get_mergeability(pr.number).await?;
        debug!(pr_number = pr.number, attempt, %observation, "observed mergeability");
        progress
            .on_poll_attempt(attempt, max_attempts, &observation)
            .await;

        let outcome = match classify_observation(&observation) {
            Some(outcome) => outcome,
            None if attempt >= max_attempts => PollOutcome::TimedOut,
            None => {
                progress
                    .on_wait(settings.backoff, "GitHub is still computing mergeability")
                    .await;
                clock.sleep(settings.backoff).await;
                continue;
            }
        };

        debug!(pr_number = pr.number, %outcome, attempts = attempt, "poll finished");
        return Ok(PollReport {
            pr: pr.clone(),
            outcome,
            observation,
            attempts: attempt,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(mergeable: Option<bool>, state: &str) -> MergeabilityObservation {
        MergeabilityObservation::new(mergeable, MergeableState::parse(Some(state)))
    }

    #[test]
    fn test_classify_clean_and_dirty() {
        assert_eq!(
            classify_observation(&obs(Some(true), "clean")),
            Some(PollOutcome::ReadyClean)
        );
        assert_eq!(
            classify_observation(&obs(Some(false), "dirty")),
            Some(PollOutcome::Conflicted)
        );
    }

    #[test]
    fn test_classify_unknown_is_pending_whatever_mergeable_says() {
        assert_eq!(classify_observation(&obs(None, "unknown")), None);
        assert_eq!(classify_observation(&obs(Some(true), "unknown")), None);
        assert_eq!(classify_observation(&obs(Some(false), "unknown")), None);
    }

    #[test]
    fn test_classify_mismatched_pairs_are_ambiguous() {
        for (mergeable, state) in [
            (None, "clean"),
            (Some(false), "clean"),
            (Some(true), "dirty"),
            (None, "dirty"),
            (None, "blocked"),
            (Some(true), "unstable"),
            (Some(true), "behind"),
        ] {
            assert_eq!(
                classify_observation(&obs(mergeable, state)),
                Some(PollOutcome::Ambiguous),
                "({mergeable:?}, {state}) must not be treated as clean"
            );
        }
    }

    #[test]
    fn test_only_ready_clean_yields_ticket() {
        let pr = PullRequestRef {
            number: 9,
            title: "t".into(),
            head_ref: "h".into(),
            base_ref: "main".into(),
            html_url: String::new(),
        };
        let mut report = PollReport {
            pr,
            outcome: PollOutcome::ReadyClean,
            observation: obs(Some(true), "clean"),
            attempts: 1,
        };
        assert_eq!(report.merge_ticket().map(|t| t.pr().number), Some(9));

        for outcome in [
            PollOutcome::Conflicted,
            PollOutcome::Ambiguous,
            PollOutcome::TimedOut,
        ] {
            report.outcome = outcome;
            assert!(report.merge_ticket().is_none());
        }
    }
}
