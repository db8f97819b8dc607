//! Progress reporting for the probe and survey
//!
//! Console output is injected as a [`ProgressCallback`] so the engine never
//! writes to stdout itself.

use crate::types::MergeabilityObservation;
use async_trait::async_trait;
use std::time::Duration;

/// Stage of a diagnostic run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Creating the test branch and pull request
    Provisioning,
    /// Waiting for the platform to compute mergeability
    Polling,
    /// Attempting the merge
    Merging,
    /// Tearing down the test branch
    Cleanup,
    /// Classifying open pull requests
    Survey,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Provisioning => write!(f, "provisioning"),
            Self::Polling => write!(f, "polling"),
            Self::Merging => write!(f, "merging"),
            Self::Cleanup => write!(f, "cleanup"),
            Self::Survey => write!(f, "survey"),
        }
    }
}

/// Receives progress events from the probe and survey
#[async_trait]
pub trait ProgressCallback: Send + Sync {
    /// A new phase started
    async fn on_phase(&self, phase: Phase);

    /// Informational line
    async fn on_message(&self, message: &str);

    /// Something failed but the run continues
    async fn on_warning(&self, message: &str);

    /// A mergeability fetch completed (`attempt` is 1-based)
    async fn on_poll_attempt(
        &self,
        attempt: u32,
        max_attempts: u32,
        observation: &MergeabilityObservation,
    );

    /// About to sleep for `duration`
    async fn on_wait(&self, duration: Duration, reason: &str);
}

/// Progress callback that discards everything
pub struct NoopProgress;

#[async_trait]
impl ProgressCallback for NoopProgress {
    async fn on_phase(&self, _phase: Phase) {}
    async fn on_message(&self, _message: &str) {}
    async fn on_warning(&self, _message: &str) {}
    async fn on_poll_attempt(
        &self,
        _attempt: u32,
        _max_attempts: u32,
        _observation: &MergeabilityObservation,
    ) {
    }
    async fn on_wait(&self, _duration: Duration, _reason: &str) {}
}
