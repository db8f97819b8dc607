//! Shared test utilities

#![allow(dead_code)]

pub mod fakes;
pub mod mock_platform;
pub mod mock_vcs;

pub use fakes::{FakeClock, RecordingProgress};
pub use mock_platform::{
    MockPlatformService, clean, dirty, github_config, make_pr, observation, unknown,
};
pub use mock_vcs::{MockVcs, VcsOp};
