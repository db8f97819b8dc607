//! Platform services for GitHub
//!
//! Provides the resource-oriented pull request interface the probe and
//! survey need, so both can run against a mock in tests.

mod detection;
mod github;

pub use detection::{RemoteInfo, api_base_for_host, parse_remote_url};
pub use github::GitHubService;

use crate::error::Result;
use crate::types::{
    MergeRequest, MergeResult, MergeabilityObservation, PlatformConfig, PullRequestDetails,
    PullRequestRef,
};
use async_trait::async_trait;

/// Platform service trait for pull request operations
#[async_trait]
pub trait PlatformService: Send + Sync {
    /// Open a pull request from `head` into `base`.
    ///
    /// A non-2xx response is reported as
    /// [`Error::PullRequestCreationFailed`](crate::error::Error::PullRequestCreationFailed).
    async fn create_pr(
        &self,
        head: &str,
        base: &str,
        title: &str,
        body: &str,
    ) -> Result<PullRequestRef>;

    /// Fetch a pull request together with its current mergeability.
    ///
    /// Never cached: the platform computes mergeability asynchronously and
    /// the answer can change between calls.
    async fn get_pr_details(&self, pr_number: u64) -> Result<PullRequestDetails>;

    /// Fetch only the mergeability observation for a pull request.
    ///
    /// Convenience wrapper over [`get_pr_details`](Self::get_pr_details).
    async fn get_mergeability(&self, pr_number: u64) -> Result<MergeabilityObservation> {
        Ok(self.get_pr_details(pr_number).await?.observation)
    }

    /// Attempt to merge a pull request.
    ///
    /// A rejection by the platform is a successful call returning
    /// [`MergeResult::Rejected`]; only transport failures are errors.
    async fn merge_pr(&self, pr_number: u64, request: &MergeRequest) -> Result<MergeResult>;

    /// List every open pull request, following pagination
    async fn list_open_prs(&self) -> Result<Vec<PullRequestRef>>;

    /// Get the platform configuration
    fn config(&self) -> &PlatformConfig;
}
