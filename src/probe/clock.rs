//! Time source for the probe
//!
//! Both suspension points (the post-creation settle delay and the poll
//! backoff) are unconditional sleeps routed through [`Clock`], so tests can
//! simulate elapsed time.

use async_trait::async_trait;
use chrono::{DateTime, Local};
use std::time::Duration;

/// Wall clock plus sleep
#[async_trait]
pub trait Clock: Send + Sync {
    /// Current local time
    fn now(&self) -> DateTime<Local>;

    /// Suspend for `duration`
    async fn sleep(&self, duration: Duration);
}

/// Real time, sleeping on the tokio timer
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
