//! Authentication for GitHub
//!
//! Reads a personal access token from a well-known file in the home directory.

mod github;

pub use github::{
    GitHubAuthConfig, TOKEN_FILE_NAME, default_token_path, get_github_auth, parse_token,
};
