//! merge-probe: diagnose why pull requests fail to merge automatically
//!
//! Separates two failure modes that look the same from the outside: the
//! platform's merge mechanism itself being broken, and pull requests that
//! simply have conflicts.
//!
//! The probe creates a disposable branch from trunk containing one new
//! file, opens a pull request, waits for GitHub to compute mergeability,
//! and tries to merge it. A branch like that cannot conflict, so a failed
//! merge points at the mechanism. The survey then lists the open pull
//! requests that are actually conflicted.
//!
//! # Example
//!
//! ```no_run
//! use merge_probe::auth::get_github_auth;
//! use merge_probe::platform::{GitHubService, api_base_for_host, parse_remote_url};
//! use merge_probe::probe::{NoopProgress, ProbeSettings, SystemClock, run_merge_probe};
//! use merge_probe::repo::{GitCli, Vcs};
//! use std::path::Path;
//!
//! # async fn example() -> merge_probe::error::Result<()> {
//! let vcs = GitCli::open(Path::new("."))?;
//! let remote = parse_remote_url(&vcs.remote_url("origin")?)?;
//! let auth = get_github_auth(None)?;
//! let api_base = api_base_for_host(&remote.host);
//! let platform = GitHubService::new(&auth.token, remote.identity, &api_base)?;
//!
//! let settings = ProbeSettings::default();
//! let report = run_merge_probe(&platform, &vcs, &SystemClock, &NoopProgress, &settings).await;
//! println!("{}", report.diagnosis());
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod error;
pub mod platform;
pub mod probe;
pub mod repo;
pub mod survey;
pub mod types;

pub use error::{Error, Result};
