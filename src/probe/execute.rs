//! Merge execution - effectful operations
//!
//! Takes a [`MergeTicket`] (only obtainable from a `ready-clean` poll) and
//! attempts the merge exactly once. A failed merge on a branch believed
//! clean is the diagnostic signal we are looking for, so it is not retried.

use crate::error::Result;
use crate::platform::PlatformService;
use crate::probe::poll::MergeTicket;
use crate::probe::progress::{Phase, ProgressCallback};
use crate::types::{MergeMethod, MergeRequest, MergeResult};

/// Strategy used for every probe merge
pub const PROBE_MERGE_METHOD: MergeMethod = MergeMethod::Merge;

/// Commit message of the probe's merge commit
pub const MERGE_COMMIT_MESSAGE: &str = "Automatic merge performed by merge-probe";

/// Build the merge request for a ticket
pub fn merge_request_for(ticket: &MergeTicket) -> MergeRequest {
    MergeRequest {
        commit_title: format!("Auto-merge PR #{} via merge probe", ticket.pr().number),
        commit_message: MERGE_COMMIT_MESSAGE.to_string(),
        method: PROBE_MERGE_METHOD,
    }
}

/// Attempt the merge (EFFECTFUL)
///
/// Returns the platform's verdict; `Err` only for transport failures.
pub async fn execute_merge(
    platform: &dyn PlatformService,
    ticket: &MergeTicket,
    progress: &dyn ProgressCallback,
) -> Result<MergeResult> {
    progress.on_phase(Phase::Merging).await;
    let pr_number = ticket.pr().number;
    progress
        .on_message(&format!("🔀 Merging PR #{pr_number}"))
        .await;

    let result = platform
        .merge_pr(pr_number, &merge_request_for(ticket))
        .await?;

    match &result {
        MergeResult::Merged { sha, .. } => {
            progress.on_message(&format!("✅ Merged: {sha}")).await;
        }
        MergeResult::Rejected {
            status, message, ..
        } => {
            progress
                .on_warning(&format!("Merge rejected (HTTP {status}): {message}"))
                .await;
        }
    }

    Ok(result)
}
