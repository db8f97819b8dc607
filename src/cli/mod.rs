//! Console front end
//!
//! Renders probe and survey progress, then the final conclusions.

pub mod context;
pub mod probe;
pub mod report;
pub mod style;
pub mod survey;

use anstream::println;
use async_trait::async_trait;
use indicatif::ProgressBar;
use merge_probe::probe::{Phase, ProgressCallback};
use merge_probe::types::MergeabilityObservation;
use std::sync::Mutex;
use std::time::Duration;
use style::{Stylize, spinner_style};

/// Progress callback printing to the terminal.
///
/// Waits are shown as a spinner that stays up until the next event.
pub struct CliProgress {
    spinner: Mutex<Option<ProgressBar>>,
}

impl CliProgress {
    /// Create a new console progress reporter
    pub const fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
        }
    }

    fn finish_spinner(&self) {
        let spinner = self
            .spinner
            .lock()
            .ok()
            .and_then(|mut guard| guard.take());
        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }
    }
}

impl Default for CliProgress {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProgressCallback for CliProgress {
    async fn on_phase(&self, phase: Phase) {
        self.finish_spinner();
        let heading = match phase {
            Phase::Provisioning => "Creating test branch and pull request",
            Phase::Polling => "Checking mergeability",
            Phase::Merging => "Attempting merge",
            Phase::Cleanup => "Cleaning up",
            Phase::Survey => "Surveying open pull requests",
        };
        println!();
        println!("{}", heading.emphasis());
    }

    async fn on_message(&self, message: &str) {
        self.finish_spinner();
        println!("  {message}");
    }

    async fn on_warning(&self, message: &str) {
        self.finish_spinner();
        println!("  {}", format!("⚠️  {message}").warn());
    }

    async fn on_poll_attempt(
        &self,
        attempt: u32,
        max_attempts: u32,
        observation: &MergeabilityObservation,
    ) {
        self.finish_spinner();
        println!(
            "  {} {}",
            format!("[{attempt}/{max_attempts}]").muted(),
            observation.to_string().accent()
        );
    }

    async fn on_wait(&self, duration: Duration, reason: &str) {
        self.finish_spinner();
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(spinner_style());
        spinner.set_message(format!("Waiting {}s: {reason}", duration.as_secs()));
        spinner.enable_steady_tick(Duration::from_millis(80));
        if let Ok(mut guard) = self.spinner.lock() {
            *guard = Some(spinner);
        }
    }
}
