//! Local version control operations
//!
//! The probe only needs a handful of git commands, each of which either
//! succeeds or fails on a non-zero exit. They sit behind [`Vcs`] so the
//! branch lifecycle can be exercised without a real repository.

mod git;

pub use git::GitCli;

use crate::error::Result;
use std::path::Path;

/// Version control collaborator
pub trait Vcs: Send + Sync {
    /// Root of the working copy
    fn workdir(&self) -> &Path;

    /// Switch to an existing branch
    fn checkout(&self, reference: &str) -> Result<()>;

    /// Pull `reference` from `remote` into the current branch
    fn pull(&self, remote: &str, reference: &str) -> Result<()>;

    /// Create a new branch at HEAD and switch to it
    fn create_branch(&self, name: &str) -> Result<()>;

    /// Stage a path relative to the working copy root
    fn add(&self, path: &Path) -> Result<()>;

    /// Commit staged changes
    fn commit(&self, message: &str) -> Result<()>;

    /// Push a branch to `remote`
    fn push(&self, remote: &str, branch: &str) -> Result<()>;

    /// Force-delete a local branch
    fn delete_local_branch(&self, name: &str) -> Result<()>;

    /// Delete a branch on `remote`
    fn delete_remote_branch(&self, remote: &str, name: &str) -> Result<()>;

    /// URL configured for `remote`
    fn remote_url(&self, remote: &str) -> Result<String>;
}
