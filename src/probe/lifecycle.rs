//! Branch lifecycle state machine
//!
//! Tracks how far the disposable branch got so cleanup undoes exactly what
//! was done. States only move forward:
//!
//! `Planned -> Created -> Committed -> Pushed -> PullRequestOpen -> Merged`

use crate::types::{MergeResult, TestBranch};

/// How far the test branch has progressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BranchState {
    /// Named, nothing created yet
    Planned,
    /// Local branch exists and is checked out
    Created,
    /// Marker commit recorded on the local branch
    Committed,
    /// Branch exists on the remote
    Pushed,
    /// A pull request is open for the branch
    PullRequestOpen(u64),
    /// The pull request was merged into trunk
    Merged,
}

impl std::fmt::Display for BranchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Planned => write!(f, "planned"),
            Self::Created => write!(f, "created"),
            Self::Committed => write!(f, "committed"),
            Self::Pushed => write!(f, "pushed"),
            Self::PullRequestOpen(n) => write!(f, "PR #{n} open"),
            Self::Merged => write!(f, "merged"),
        }
    }
}

/// A test branch together with the state it has reached
#[derive(Debug, Clone)]
pub struct BranchLifecycle {
    branch: TestBranch,
    state: BranchState,
}

impl BranchLifecycle {
    /// Start tracking a branch that has not been created yet
    pub const fn new(branch: TestBranch) -> Self {
        Self {
            branch,
            state: BranchState::Planned,
        }
    }

    /// The branch being tracked
    pub const fn branch(&self) -> &TestBranch {
        &self.branch
    }

    /// Current state
    pub const fn state(&self) -> BranchState {
        self.state
    }

    /// Whether the branch was consumed by a successful merge
    pub const fn is_merged(&self) -> bool {
        matches!(self.state, BranchState::Merged)
    }

    /// Whether the branch may exist on the remote
    pub fn is_on_remote(&self) -> bool {
        self.state >= BranchState::Pushed
    }

    /// Whether a local branch was created
    pub fn exists_locally(&self) -> bool {
        self.state >= BranchState::Created
    }

    /// Move to `next`; moving backwards is ignored
    pub fn advance(&mut self, next: BranchState) {
        if next > self.state {
            self.state = next;
        }
    }

    /// Mark the branch merged if `result` says so
    pub fn record_merge(&mut self, result: &MergeResult) {
        if result.is_merged() {
            self.advance(BranchState::Merged);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;

    fn lifecycle() -> BranchLifecycle {
        BranchLifecycle::new(TestBranch::new("main", Local::now()))
    }

    #[test]
    fn test_starts_planned_and_not_merged() {
        let lc = lifecycle();
        assert_eq!(lc.state(), BranchState::Planned);
        assert!(!lc.is_merged());
        assert!(!lc.exists_locally());
    }

    #[test]
    fn test_advance_never_moves_backwards() {
        let mut lc = lifecycle();
        lc.advance(BranchState::Pushed);
        lc.advance(BranchState::Created);
        assert_eq!(lc.state(), BranchState::Pushed);
        assert!(lc.is_on_remote());
    }

    #[test]
    fn test_record_merge_only_on_success() {
        let mut lc = lifecycle();
        lc.advance(BranchState::PullRequestOpen(4));
        lc.record_merge(&MergeResult::Rejected {
            status: 405,
            message: "not mergeable".into(),
            body: String::new(),
        });
        assert!(!lc.is_merged());

        lc.record_merge(&MergeResult::Merged {
            sha: "abc".into(),
            message: None,
        });
        assert!(lc.is_merged());
    }
}
