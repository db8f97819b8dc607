//! In-memory VCS double
//!
//! Records every git operation as the command line it stands for and can
//! be told to fail a given operation. The working directory is a real temp
//! dir so marker-file writes and removals can be observed.

#![allow(dead_code)]

use merge_probe::error::{Error, Result};
use merge_probe::repo::Vcs;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Mutex;
use tempfile::TempDir;

/// Operations that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VcsOp {
    Checkout,
    Pull,
    CreateBranch,
    Add,
    Commit,
    Push,
    DeleteLocalBranch,
    DeleteRemoteBranch,
    RemoteUrl,
}

pub struct MockVcs {
    dir: TempDir,
    remote_url: String,
    calls: Mutex<Vec<String>>,
    failing: Mutex<HashSet<VcsOp>>,
}

impl MockVcs {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
            remote_url: "git@github.com:test/repo.git".to_string(),
            calls: Mutex::new(Vec::new()),
            failing: Mutex::new(HashSet::new()),
        }
    }

    /// Make every call of `op` fail
    pub fn fail_on(&self, op: VcsOp) {
        self.failing.lock().unwrap().insert(op);
    }

    /// Recorded git command lines, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Whether a recorded command line starts with `prefix`
    pub fn called(&self, prefix: &str) -> bool {
        self.calls().iter().any(|c| c.starts_with(prefix))
    }

    fn record(&self, op: VcsOp, call: String) -> Result<()> {
        self.calls.lock().unwrap().push(call.clone());
        if self.failing.lock().unwrap().contains(&op) {
            return Err(Error::Vcs(format!("git {call} exited with 1: simulated failure")));
        }
        Ok(())
    }
}

impl Vcs for MockVcs {
    fn workdir(&self) -> &Path {
        self.dir.path()
    }

    fn checkout(&self, reference: &str) -> Result<()> {
        self.record(VcsOp::Checkout, format!("checkout {reference}"))
    }

    fn pull(&self, remote: &str, reference: &str) -> Result<()> {
        self.record(VcsOp::Pull, format!("pull {remote} {reference}"))
    }

    fn create_branch(&self, name: &str) -> Result<()> {
        self.record(VcsOp::CreateBranch, format!("checkout -b {name}"))
    }

    fn add(&self, path: &Path) -> Result<()> {
        self.record(VcsOp::Add, format!("add {}", path.display()))
    }

    fn commit(&self, message: &str) -> Result<()> {
        self.record(VcsOp::Commit, format!("commit -m {message}"))
    }

    fn push(&self, remote: &str, branch: &str) -> Result<()> {
        self.record(VcsOp::Push, format!("push {remote} {branch}"))
    }

    fn delete_local_branch(&self, name: &str) -> Result<()> {
        self.record(VcsOp::DeleteLocalBranch, format!("branch -D {name}"))
    }

    fn delete_remote_branch(&self, remote: &str, name: &str) -> Result<()> {
        self.record(
            VcsOp::DeleteRemoteBranch,
            format!("push {remote} --delete {name}"),
        )
    }

    fn remote_url(&self, remote: &str) -> Result<String> {
        self.record(VcsOp::RemoteUrl, format!("config --get remote.{remote}.url"))?;
        Ok(self.remote_url.clone())
    }
}
