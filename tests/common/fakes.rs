//! Fake clock and recording progress callback

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone};
use merge_probe::probe::{Clock, Phase, ProgressCallback};
use merge_probe::types::MergeabilityObservation;
use std::sync::Mutex;
use std::time::Duration;

/// Clock that records sleeps instead of waiting
pub struct FakeClock {
    start: DateTime<Local>,
    sleeps: Mutex<Vec<Duration>>,
}

impl FakeClock {
    pub fn new() -> Self {
        Self {
            start: Local.with_ymd_and_hms(2026, 3, 14, 15, 9, 26).unwrap(),
            sleeps: Mutex::new(Vec::new()),
        }
    }

    /// Every sleep requested, in order
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }

    /// Total simulated time spent sleeping
    pub fn elapsed(&self) -> Duration {
        self.sleeps().iter().sum()
    }
}

#[async_trait]
impl Clock for FakeClock {
    fn now(&self) -> DateTime<Local> {
        let elapsed = chrono::Duration::from_std(self.elapsed()).unwrap();
        self.start + elapsed
    }

    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}

/// Progress callback that keeps everything it is told
#[derive(Default)]
pub struct RecordingProgress {
    pub phases: Mutex<Vec<Phase>>,
    pub messages: Mutex<Vec<String>>,
    pub warnings: Mutex<Vec<String>>,
    pub poll_attempts: Mutex<Vec<(u32, u32)>>,
    pub waits: Mutex<Vec<Duration>>,
}

impl RecordingProgress {
    pub fn phases(&self) -> Vec<Phase> {
        self.phases.lock().unwrap().clone()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.warnings.lock().unwrap().clone()
    }

    pub fn poll_attempts(&self) -> Vec<(u32, u32)> {
        self.poll_attempts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProgressCallback for RecordingProgress {
    async fn on_phase(&self, phase: Phase) {
        self.phases.lock().unwrap().push(phase);
    }

    async fn on_message(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }

    async fn on_warning(&self, message: &str) {
        self.warnings.lock().unwrap().push(message.to_string());
    }

    async fn on_poll_attempt(
        &self,
        attempt: u32,
        max_attempts: u32,
        _observation: &MergeabilityObservation,
    ) {
        self.poll_attempts
            .lock()
            .unwrap()
            .push((attempt, max_attempts));
    }

    async fn on_wait(&self, duration: Duration, _reason: &str) {
        self.waits.lock().unwrap().push(duration);
    }
}
