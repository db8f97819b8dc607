//! Repository identity detection from git remote URLs

use crate::error::{Error, Result};
use crate::types::RepositoryIdentity;
use regex::Regex;
use std::sync::LazyLock;

/// Public GitHub host
const GITHUB_HOST: &str = "github.com";

/// `[scheme://][user@]host[:port](:|/)path`
static REMOTE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[A-Za-z][A-Za-z0-9+.-]*://)?(?:[^@/]+@)?([^/:]+)(?::\d+)?[:/](.+)$")
        .expect("remote URL pattern is valid")
});

/// What a remote URL tells us about where the repository lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteInfo {
    /// Host the remote points at
    pub host: String,
    /// `owner/name` of the repository
    pub identity: RepositoryIdentity,
}

/// Parse a git remote URL into host and `owner/name`.
///
/// Accepts scp-style (`git@github.com:owner/repo.git`), HTTPS, and
/// `ssh://` URLs. Trailing slashes and a `.git` suffix are ignored; the
/// last two path segments are taken as owner and name.
pub fn parse_remote_url(url: &str) -> Result<RemoteInfo> {
    let trimmed = url.trim().trim_end_matches('/');
    let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);

    let caps = REMOTE_RE
        .captures(trimmed)
        .ok_or_else(|| Error::RepositoryIdentityUnresolvable(url.to_string()))?;

    let host = caps[1].to_string();
    let segments: Vec<&str> = caps[2].split('/').filter(|s| !s.is_empty()).collect();

    let [.., owner, name] = segments.as_slice() else {
        return Err(Error::RepositoryIdentityUnresolvable(url.to_string()));
    };

    Ok(RemoteInfo {
        host,
        identity: RepositoryIdentity::new(*owner, *name),
    })
}

/// REST API base for a host: `api.github.com` for github.com, the
/// GitHub Enterprise `/api/v3` path otherwise.
pub fn api_base_for_host(host: &str) -> String {
    if host == GITHUB_HOST {
        "https://api.github.com".to_string()
    } else {
        format!("https://{host}/api/v3")
    }
}
