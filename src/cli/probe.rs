//! Probe command - push a conflict-free branch through the merge path

use crate::cli::CliProgress;
use crate::cli::context::CommandContext;
use crate::cli::style::{Stylize, arrow, check, hyperlink};
use anstream::println;
use dialoguer::Confirm;
use merge_probe::error::{Error, Result};
use merge_probe::probe::{ProbeReport, SystemClock, run_merge_probe};
use merge_probe::types::MergeResult;

/// Options for the probe command
#[derive(Debug, Clone, Copy, Default)]
pub struct ProbeOptions {
    /// Skip the confirmation prompt
    pub yes: bool,
}

/// Ask before creating anything on the remote. `Ok(false)` means aborted.
pub fn confirm_probe(ctx: &CommandContext, options: ProbeOptions) -> Result<bool> {
    println!("{}", "Merge probe".emphasis());
    println!("  Repository: {}", ctx.identity.to_string().accent());
    println!(
        "  This creates a test branch from {} on {}, opens a PR, and tries to merge it.",
        ctx.settings.trunk.accent(),
        ctx.settings.remote.accent()
    );

    if options.yes {
        return Ok(true);
    }

    let proceed = Confirm::new()
        .with_prompt("Continue?")
        .default(false)
        .interact()
        .map_err(|e| Error::Internal(format!("Failed to read confirmation: {e}")))?;
    if !proceed {
        println!("{}", "Aborted".muted());
    }
    Ok(proceed)
}

/// Run the probe and print what happened
pub async fn run_probe(ctx: &CommandContext) -> ProbeReport {
    let progress = CliProgress::new();
    let report = run_merge_probe(
        ctx.platform.as_ref(),
        &ctx.vcs,
        &SystemClock,
        &progress,
        &ctx.settings,
    )
    .await;
    print_probe_summary(&report);
    report
}

/// Print the outcome of a probe run
pub fn print_probe_summary(report: &ProbeReport) {
    println!();
    println!("{}", "Probe results".emphasis());
    println!(
        "  Branch: {} {} {}",
        report.branch.name.accent(),
        arrow(),
        report.branch.base.accent()
    );

    if let Some(pr) = &report.pr {
        println!(
            "  PR: {}",
            hyperlink(&format!("#{}", pr.number), &pr.html_url).accent()
        );
    }

    if let Some(poll) = &report.poll {
        println!(
            "  Mergeability: {} after {} check(s) ({})",
            poll.outcome.to_string().accent(),
            poll.attempts,
            poll.observation.to_string().muted()
        );
    }

    match &report.merge {
        Some(MergeResult::Merged { sha, .. }) => {
            println!("  {} Merged as {}", check(), sha.accent());
        }
        Some(MergeResult::Rejected {
            status, message, ..
        }) => {
            println!(
                "  {} Merge rejected (HTTP {status}): {message}",
                "✗".error()
            );
        }
        None => println!("  {}", "No merge attempted".muted()),
    }

    if let Some(failure) = &report.failure {
        println!("  {} {}", "Stopped:".warn(), failure);
    }

    if report.cleanup.is_clean() {
        println!("  {} Cleanup complete", check());
    } else {
        for failure in &report.cleanup.failures {
            println!("  {} {failure}", "Cleanup:".warn());
        }
        println!(
            "  {}",
            format!(
                "Remove {} by hand if it is still present.",
                report.branch.name
            )
            .muted()
        );
    }
}
