//! Error types for merge-probe

use crate::types::MergeableState;
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while probing and surveying pull requests
#[derive(Debug, Error)]
pub enum Error {
    /// Token file missing, unreadable, or without a usable token
    #[error("GitHub credential missing: {0}")]
    CredentialMissing(String),

    /// The remote URL does not name an `owner/repo` pair
    #[error("cannot determine repository from remote URL: {0}")]
    RepositoryIdentityUnresolvable(String),

    /// A provisioning step failed; nothing after it ran
    #[error("provisioning failed at {step}: {message}")]
    ProvisioningFailed {
        /// The step that failed
        step: crate::probe::ProvisionStep,
        /// Underlying failure
        message: String,
    },

    /// The platform refused to open the test pull request
    #[error("pull request creation failed with HTTP {status}: {body}")]
    PullRequestCreationFailed {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// Mergeability stayed `unknown` for the whole retry budget
    #[error("mergeability still unknown after {attempts} attempt(s)")]
    PollTimedOut {
        /// Number of fetches performed
        attempts: u32,
    },

    /// The platform reported a combination that is neither clean nor dirty
    #[error("ambiguous mergeability: mergeable={}, state={state}", format_mergeable(.mergeable))]
    PollAmbiguous {
        /// Reported `mergeable` flag
        mergeable: Option<bool>,
        /// Reported `mergeable_state`
        state: MergeableState,
    },

    /// The merge call on a pull request believed clean was rejected
    #[error("merge attempt failed with HTTP {status}: {message}")]
    MergeAttemptFailed {
        /// HTTP status code
        status: u16,
        /// Message reported by the platform
        message: String,
    },

    /// A cleanup step failed (reported, never fatal)
    #[error("cleanup step {step} failed: {message}")]
    CleanupFailed {
        /// The step that failed
        step: crate::probe::CleanupStep,
        /// Underlying failure
        message: String,
    },

    /// Fetching one pull request during the survey failed (that PR is skipped)
    #[error("could not fetch PR #{number}: {message}")]
    SurveyFetchFailed {
        /// Pull request number
        number: u64,
        /// Underlying failure
        message: String,
    },

    /// A git command exited non-zero or could not be spawned
    #[error("git error: {0}")]
    Vcs(String),

    /// GitHub API returned an unexpected response
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// Transport-level HTTP failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Failure reported by octocrab
    #[error("GitHub API error: {0}")]
    Octocrab(#[from] octocrab::Error),

    /// Invalid configuration value
    #[error("configuration error: {0}")]
    Config(String),

    /// Anything else that should not happen
    #[error("internal error: {0}")]
    Internal(String),
}

#[allow(clippy::ref_option)]
fn format_mergeable(mergeable: &Option<bool>) -> String {
    mergeable.map_or_else(|| "null".to_string(), |m| m.to_string())
}
