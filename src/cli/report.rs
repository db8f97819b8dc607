//! Final conclusions

use crate::cli::style::Stylize;
use anstream::println;
use merge_probe::probe::{Diagnosis, ProbeReport};
use merge_probe::survey::SurveyReport;

/// Resolution strategies for conflicted PRs
const CONFLICT_STRATEGIES: &[&str] = &[
    "Update the PR branch from trunk and resolve conflicts locally",
    "Merge trunk into the branch, then push the resolution",
    "Use GitHub's web editor for simple conflicts",
    "Close stale PRs that can no longer be rebased",
];

/// Print the overall conclusion of a run.
///
/// Either input may be missing when that stage did not run.
pub fn print_conclusions(probe: Option<&ProbeReport>, survey: Option<&SurveyReport>) {
    println!();
    println!("{}", "Conclusions".emphasis());

    if let Some(probe) = probe {
        let diagnosis = probe.diagnosis();
        let line = format!("  {diagnosis}");
        match diagnosis {
            Diagnosis::MergeMechanismWorks => println!("{}", line.success()),
            Diagnosis::MergeMechanismBroken | Diagnosis::UnexpectedConflict => {
                println!("{}", line.error());
            }
            Diagnosis::Inconclusive(_) => println!("{}", line.warn()),
        }
        if diagnosis == Diagnosis::MergeMechanismBroken {
            println!(
                "  {}",
                "Check branch protection rules, required status checks, and token permissions."
                    .muted()
            );
        }
    }

    if let Some(survey) = survey
        && survey.has_conflicts()
    {
        println!(
            "  {} conflicted PR(s) need manual resolution:",
            survey.conflicted.len()
        );
        for strategy in CONFLICT_STRATEGIES {
            println!("    • {}", strategy.muted());
        }
    }
}
