//! Survey command - list conflicted open pull requests

use crate::cli::CliProgress;
use crate::cli::context::CommandContext;
use crate::cli::style::{Stylize, arrow, check, hyperlink};
use anstream::println;
use merge_probe::error::Result;
use merge_probe::survey::{SurveyReport, survey_conflicts};

/// Run the survey and print the conflicted PRs
pub async fn run_survey(ctx: &CommandContext) -> Result<SurveyReport> {
    let progress = CliProgress::new();
    let report = survey_conflicts(ctx.platform.as_ref(), &progress).await?;
    print_survey(&report);
    Ok(report)
}

/// Print survey findings
pub fn print_survey(report: &SurveyReport) {
    println!();
    if report.conflicted.is_empty() {
        println!(
            "{} No conflicted PRs among {} open",
            check(),
            report.examined
        );
    } else {
        println!(
            "{}",
            format!(
                "⚠️  {} of {} open PR(s) have merge conflicts:",
                report.conflicted.len(),
                report.examined
            )
            .warn()
        );
        for details in &report.conflicted {
            let pr = &details.pr;
            println!(
                "  {} {}",
                hyperlink(&format!("PR #{}", pr.number), &pr.html_url).accent(),
                pr.title
            );
            println!(
                "    {} {} {}",
                pr.head_ref.muted(),
                arrow(),
                pr.base_ref.muted()
            );
        }
    }

    if report.undetermined > 0 {
        println!(
            "  {}",
            format!(
                "{} PR(s) still have mergeability being computed; \
                 re-run later for a complete picture.",
                report.undetermined
            )
            .muted()
        );
    }
    for skipped in &report.skipped {
        println!("  {} {skipped}", "Skipped:".warn());
    }
}
