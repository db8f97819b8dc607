//! The merge probe: a disposable, conflict-free branch pushed through the
//! platform's merge path to tell a broken merge mechanism apart from
//! genuinely conflicted pull requests.
//!
//! Pure planning (`classify_observation`, `plan_cleanup`) is kept apart from
//! the effectful steps so the decision logic can be tested without I/O.

pub mod cleanup;
pub mod clock;
pub mod execute;
pub mod lifecycle;
pub mod poll;
pub mod progress;
pub mod provision;
pub mod run;

pub use cleanup::{CleanupReport, CleanupStep, execute_cleanup, plan_cleanup};
pub use clock::{Clock, SystemClock};
pub use execute::{PROBE_MERGE_METHOD, execute_merge, merge_request_for};
pub use lifecycle::{BranchLifecycle, BranchState};
pub use poll::{
    DEFAULT_BACKOFF, DEFAULT_MAX_ATTEMPTS, MergeTicket, PollReport, PollSettings,
    classify_observation, poll_mergeability,
};
pub use progress::{NoopProgress, Phase, ProgressCallback};
pub use provision::{ProvisionStep, provision};
pub use run::{Diagnosis, ProbeReport, ProbeSettings, run_merge_probe};
