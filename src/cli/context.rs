//! Shared command context for CLI commands
//!
//! Resolves everything a run needs before any artifact is created: the git
//! working copy, the repository identity from the remote URL, credentials,
//! and the GitHub service.

use merge_probe::auth::get_github_auth;
use merge_probe::error::Result;
use merge_probe::platform::{GitHubService, PlatformService, api_base_for_host, parse_remote_url};
use merge_probe::probe::ProbeSettings;
use merge_probe::repo::{GitCli, Vcs};
use merge_probe::types::RepositoryIdentity;
use std::path::Path;
use tracing::debug;

/// Where to find things, as given on the command line
#[derive(Debug, Clone, Copy)]
pub struct ContextOptions<'a> {
    /// Any path inside the working copy
    pub path: &'a Path,
    /// Token file override
    pub token_file: Option<&'a Path>,
    /// API base override
    pub api_url: Option<&'a str>,
}

/// Shared context for CLI commands that interact with the platform
pub struct CommandContext {
    /// The git working copy
    pub vcs: GitCli,
    /// `owner/name` resolved from the remote
    pub identity: RepositoryIdentity,
    /// GitHub service
    pub platform: Box<dyn PlatformService>,
    /// Probe settings
    pub settings: ProbeSettings,
}

impl CommandContext {
    /// Create a new command context.
    ///
    /// Fails on hard startup problems: not a git repository, an unparseable
    /// remote URL, or a missing token.
    pub fn new(options: &ContextOptions<'_>, settings: ProbeSettings) -> Result<Self> {
        let vcs = GitCli::open(options.path)?;
        let remote_url = vcs.remote_url(&settings.remote)?;
        let remote = parse_remote_url(&remote_url)?;
        debug!(
            url = %remote_url,
            host = %remote.host,
            repo = %remote.identity,
            "resolved repository"
        );

        let auth = get_github_auth(options.token_file)?;
        let api_base = options
            .api_url
            .map_or_else(|| api_base_for_host(&remote.host), ToString::to_string);

        let platform = GitHubService::new(&auth.token, remote.identity.clone(), &api_base)?;

        Ok(Self {
            vcs,
            identity: remote.identity,
            platform: Box::new(platform),
            settings,
        })
    }
}
