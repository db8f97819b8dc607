//! git CLI backend

use super::Vcs;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Runs `git` as a subprocess inside a working copy
#[derive(Debug, Clone)]
pub struct GitCli {
    root: PathBuf,
}

impl GitCli {
    /// Open the working copy containing `path`
    pub fn open(path: &Path) -> Result<Self> {
        let probe = Self {
            root: path.to_path_buf(),
        };
        let toplevel = probe.run(&["rev-parse", "--show-toplevel"])?;
        if toplevel.is_empty() {
            return Err(Error::Vcs(format!(
                "{} is not inside a git working copy",
                path.display()
            )));
        }
        Ok(Self {
            root: PathBuf::from(toplevel),
        })
    }

    /// Run git with `args`, returning trimmed stdout
    fn run(&self, args: &[&str]) -> Result<String> {
        debug!(?args, "running git");
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.root)
            .output()
            .map_err(|e| Error::Vcs(format!("failed to run git {}: {e}", args.join(" "))))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!(?args, status = ?output.status.code(), "git failed");
            return Err(Error::Vcs(format!(
                "git {} exited with {}: {}",
                args.join(" "),
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl Vcs for GitCli {
    fn workdir(&self) -> &Path {
        &self.root
    }

    fn checkout(&self, reference: &str) -> Result<()> {
        self.run(&["checkout", reference]).map(drop)
    }

    fn pull(&self, remote: &str, reference: &str) -> Result<()> {
        self.run(&["pull", remote, reference]).map(drop)
    }

    fn create_branch(&self, name: &str) -> Result<()> {
        self.run(&["checkout", "-b", name]).map(drop)
    }

    fn add(&self, path: &Path) -> Result<()> {
        let path = path.to_string_lossy();
        self.run(&["add", "--", &path]).map(drop)
    }

    fn commit(&self, message: &str) -> Result<()> {
        self.run(&["commit", "-m", message]).map(drop)
    }

    fn push(&self, remote: &str, branch: &str) -> Result<()> {
        self.run(&["push", remote, branch]).map(drop)
    }

    fn delete_local_branch(&self, name: &str) -> Result<()> {
        self.run(&["branch", "-D", name]).map(drop)
    }

    fn delete_remote_branch(&self, remote: &str, name: &str) -> Result<()> {
        self.run(&["push", remote, "--delete", name]).map(drop)
    }

    fn remote_url(&self, remote: &str) -> Result<String> {
        let key = format!("remote.{remote}.url");
        self.run(&["config", "--get", &key])
    }
}
