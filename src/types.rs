//! Core types for merge-probe

use chrono::{DateTime, Local};

/// Prefix of every disposable test branch
pub const TEST_BRANCH_PREFIX: &str = "test-merge-clean-";

/// `owner/name` of the repository under test
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryIdentity {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub name: String,
}

impl RepositoryIdentity {
    /// Create an identity from its two halves
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for RepositoryIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Platform configuration
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    /// Repository the service talks to
    pub identity: RepositoryIdentity,
    /// REST API base URL, without trailing slash
    pub api_base: String,
}

/// A disposable branch created for a single probe run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestBranch {
    /// Branch name (`test-merge-clean-<timestamp>`)
    pub name: String,
    /// Trunk the branch is cut from and merged into
    pub base: String,
    /// Timestamp embedded in the name, marker file, and commit message
    pub stamp: String,
}

impl TestBranch {
    /// Name a new test branch for the given moment
    pub fn new(base: &str, now: DateTime<Local>) -> Self {
        let stamp = now.format("%Y%m%d%H%M%S").to_string();
        Self {
            name: format!("{TEST_BRANCH_PREFIX}{stamp}"),
            base: base.to_string(),
            stamp,
        }
    }
}

/// A pull request as returned by the platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestRef {
    /// PR number
    pub number: u64,
    /// PR title
    pub title: String,
    /// Head branch name
    pub head_ref: String,
    /// Base branch name
    pub base_ref: String,
    /// Web URL for the PR
    pub html_url: String,
}

/// The platform's `mergeable_state` value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeableState {
    /// No conflicts and nothing blocking
    Clean,
    /// Merge conflicts
    Dirty,
    /// Still being computed
    Unknown,
    /// Any other reported state (`blocked`, `behind`, `unstable`, ...)
    Other(String),
}

impl MergeableState {
    /// Parse the raw `mergeable_state` field; an absent value has not been computed yet
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("clean") => Self::Clean,
            Some("dirty") => Self::Dirty,
            Some("unknown") | None => Self::Unknown,
            Some(other) => Self::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for MergeableState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Clean => write!(f, "clean"),
            Self::Dirty => write!(f, "dirty"),
            Self::Unknown => write!(f, "unknown"),
            Self::Other(s) => write!(f, "{s}"),
        }
    }
}

/// One fresh reading of a pull request's computed mergeability
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeabilityObservation {
    /// Whether the PR can be merged
    /// - `Some(true)` = mergeable
    /// - `Some(false)` = has conflicts
    /// - `None` = unknown (GitHub still computing)
    pub mergeable: Option<bool>,
    /// Detailed state reported next to `mergeable`
    pub state: MergeableState,
}

impl MergeabilityObservation {
    /// Build an observation from raw API fields
    pub fn new(mergeable: Option<bool>, state: MergeableState) -> Self {
        Self { mergeable, state }
    }
}

impl std::fmt::Display for MergeabilityObservation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.mergeable {
            Some(m) => write!(f, "mergeable={m}, state={}", self.state),
            None => write!(f, "mergeable=null, state={}", self.state),
        }
    }
}

/// Full PR details including its current mergeability
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestDetails {
    /// The pull request itself
    pub pr: PullRequestRef,
    /// Mergeability at the time of the fetch
    pub observation: MergeabilityObservation,
}

/// Terminal classification of a mergeability poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// Mergeable and clean: safe to attempt the merge
    ReadyClean,
    /// Mergeable is false and state is dirty
    Conflicted,
    /// A combination that is neither clean nor dirty
    Ambiguous,
    /// Still unknown when the attempt budget ran out
    TimedOut,
}

impl std::fmt::Display for PollOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ReadyClean => write!(f, "ready-clean"),
            Self::Conflicted => write!(f, "conflicted"),
            Self::Ambiguous => write!(f, "ambiguous"),
            Self::TimedOut => write!(f, "timed-out"),
        }
    }
}

/// Merge strategy sent with a merge request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeMethod {
    /// Create a merge commit
    Merge,
}

impl std::fmt::Display for MergeMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Merge => write!(f, "merge"),
        }
    }
}

/// Body of a merge request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeRequest {
    /// Title of the merge commit
    pub commit_title: String,
    /// Message of the merge commit
    pub commit_message: String,
    /// Strategy to merge with
    pub method: MergeMethod,
}

/// Result of a merge operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeResult {
    /// HTTP 200: the PR was merged
    Merged {
        /// SHA of the merge commit
        sha: String,
        /// Message from the platform
        message: Option<String>,
    },
    /// Any other status
    Rejected {
        /// HTTP status code
        status: u16,
        /// Platform-reported reason
        message: String,
        /// Raw response body, kept for diagnosis
        body: String,
    },
}

impl MergeResult {
    /// Whether the merge went through
    pub const fn is_merged(&self) -> bool {
        matches!(self, Self::Merged { .. })
    }
}
