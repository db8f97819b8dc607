//! GitHub token file loading

use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Token file name, looked up in the home directory
pub const TOKEN_FILE_NAME: &str = ".GITHUB_TOKEN";

/// Loaded GitHub credentials
#[derive(Debug, Clone)]
pub struct GitHubAuthConfig {
    /// Personal access token
    pub token: String,
    /// File the token was read from
    pub source: PathBuf,
}

/// `~/.GITHUB_TOKEN`
pub fn default_token_path() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(TOKEN_FILE_NAME))
        .ok_or_else(|| Error::CredentialMissing("cannot locate home directory".to_string()))
}

/// Extract the token from token file contents.
///
/// The first non-empty line wins: either a bare token, or `key=token`
/// (the part after the first `=`). Returns `None` when that line yields an
/// empty token or there is no such line.
pub fn parse_token(contents: &str) -> Option<String> {
    let line = contents.lines().map(str::trim).find(|l| !l.is_empty())?;

    let token = match line.split_once('=') {
        Some((_, token)) => token.trim(),
        None => line,
    };

    (!token.is_empty()).then(|| token.to_string())
}

/// Load the GitHub token from `path`, or from `~/.GITHUB_TOKEN` if `None`
pub fn get_github_auth(path: Option<&Path>) -> Result<GitHubAuthConfig> {
    let source = match path {
        Some(p) => p.to_path_buf(),
        None => default_token_path()?,
    };
    debug!(path = %source.display(), "reading token file");

    if !source.exists() {
        return Err(Error::CredentialMissing(format!(
            "token file not found: {}",
            source.display()
        )));
    }

    let contents = fs::read_to_string(&source).map_err(|e| {
        Error::CredentialMissing(format!("failed to read {}: {e}", source.display()))
    })?;

    let token = parse_token(&contents).ok_or_else(|| {
        Error::CredentialMissing(format!("no token found in {}", source.display()))
    })?;

    Ok(GitHubAuthConfig { token, source })
}
