//! GitHub platform service implementation

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::{
    MergeRequest, MergeResult, MergeabilityObservation, MergeableState, PlatformConfig,
    PullRequestDetails, PullRequestRef, RepositoryIdentity,
};
use async_trait::async_trait;
use octocrab::Octocrab;
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Page size used when listing pull requests
const LIST_PAGE_SIZE: u8 = 100;

#[derive(Serialize)]
struct CreatePrPayload<'a> {
    title: &'a str,
    body: &'a str,
    head: &'a str,
    base: &'a str,
}

#[derive(Serialize)]
struct MergePayload<'a> {
    commit_title: &'a str,
    commit_message: &'a str,
    merge_method: String,
}

#[derive(Deserialize, Default)]
struct GitRef {
    #[serde(rename = "ref")]
    ref_field: String,
}

/// The subset of the pull request resource we read
#[derive(Deserialize)]
struct PullResponse {
    number: u64,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    html_url: Option<String>,
    #[serde(default)]
    head: GitRef,
    #[serde(default)]
    base: GitRef,
    #[serde(default)]
    mergeable: Option<bool>,
    #[serde(default)]
    mergeable_state: Option<String>,
}

impl PullResponse {
    fn into_details(self) -> PullRequestDetails {
        let observation = MergeabilityObservation::new(
            self.mergeable,
            MergeableState::parse(self.mergeable_state.as_deref()),
        );
        PullRequestDetails {
            pr: PullRequestRef {
                number: self.number,
                title: self.title.unwrap_or_default(),
                head_ref: self.head.ref_field,
                base_ref: self.base.ref_field,
                html_url: self.html_url.unwrap_or_default(),
            },
            observation,
        }
    }
}

#[derive(Deserialize, Default)]
struct MergeResponse {
    #[serde(default)]
    sha: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Recorded when a successful merge response carries no commit SHA
const UNKNOWN_SHA: &str = "N/A";

#[derive(Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

/// GitHub service using reqwest, with octocrab for paginated listing
pub struct GitHubService {
    client: Octocrab,
    config: PlatformConfig,
    /// Token for raw HTTP requests
    token: String,
    /// HTTP client for raw requests (status codes and bodies matter here)
    http_client: Client,
}

impl GitHubService {
    /// Create a new GitHub service against `api_base`
    /// (`https://api.github.com`, a GitHub Enterprise `/api/v3` URL, or a test server)
    pub fn new(token: &str, identity: RepositoryIdentity, api_base: &str) -> Result<Self> {
        let api_base = Url::parse(api_base)
            .map_err(|e| Error::Config(format!("invalid API URL {api_base}: {e}")))?
            .as_str()
            .trim_end_matches('/')
            .to_string();

        let client = Octocrab::builder()
            .personal_token(token.to_string())
            .base_uri(&api_base)
            .map_err(|e| Error::GitHubApi(e.to_string()))?
            .build()
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        let http_client = Client::builder()
            .user_agent("merge-probe")
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::GitHubApi(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            config: PlatformConfig { identity, api_base },
            token: token.to_string(),
            http_client,
        })
    }

    fn pulls_url(&self, suffix: &str) -> String {
        format!(
            "{}/repos/{}/{}/pulls{suffix}",
            self.config.api_base, self.config.identity.owner, self.config.identity.name
        )
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
    }
}

/// Read the `message` field of an error body, if there is one
fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
}

async fn read_body(response: Response) -> String {
    response.text().await.unwrap_or_default()
}

#[async_trait]
impl PlatformService for GitHubService {
    async fn create_pr(
        &self,
        head: &str,
        base: &str,
        title: &str,
        body: &str,
    ) -> Result<PullRequestRef> {
        debug!(head, base, "creating PR");
        let payload = CreatePrPayload {
            title,
            body,
            head,
            base,
        };

        let response = self
            .authorized(self.http_client.post(self.pulls_url("")))
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = read_body(response).await;
            debug!(status = status.as_u16(), "PR creation rejected");
            return Err(Error::PullRequestCreationFailed {
                status: status.as_u16(),
                body,
            });
        }

        let created: PullResponse = response
            .json()
            .await
            .map_err(|e| Error::GitHubApi(format!("Failed to parse created PR: {e}")))?;

        let pr = PullRequestRef {
            number: created.number,
            title: created.title.unwrap_or_else(|| title.to_string()),
            head_ref: head.to_string(),
            base_ref: base.to_string(),
            html_url: created.html_url.unwrap_or_default(),
        };
        debug!(pr_number = pr.number, "created PR");
        Ok(pr)
    }

    async fn get_pr_details(&self, pr_number: u64) -> Result<PullRequestDetails> {
        debug!(pr_number, "getting PR details");

        let response = self
            .authorized(self.http_client.get(self.pulls_url(&format!("/{pr_number}"))))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = read_body(response).await;
            return Err(Error::GitHubApi(format!(
                "GET PR #{pr_number} returned {}: {}",
                status.as_u16(),
                error_message(&body).unwrap_or(body)
            )));
        }

        let pull: PullResponse = response
            .json()
            .await
            .map_err(|e| Error::GitHubApi(format!("Failed to parse PR #{pr_number}: {e}")))?;

        let details = pull.into_details();
        debug!(
            pr_number,
            mergeable = ?details.observation.mergeable,
            state = %details.observation.state,
            "got PR details"
        );
        Ok(details)
    }

    async fn merge_pr(&self, pr_number: u64, request: &MergeRequest) -> Result<MergeResult> {
        debug!(pr_number, method = %request.method, "merging PR");

        let payload = MergePayload {
            commit_title: &request.commit_title,
            commit_message: &request.commit_message,
            merge_method: request.method.to_string(),
        };

        let response = self
            .authorized(
                self.http_client
                    .put(self.pulls_url(&format!("/{pr_number}/merge"))),
            )
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        let body = read_body(response).await;

        let result = if status == reqwest::StatusCode::OK {
            // 200 is a merge whatever the body says
            let merged: MergeResponse = serde_json::from_str(&body).unwrap_or_default();
            MergeResult::Merged {
                sha: merged.sha.unwrap_or_else(|| UNKNOWN_SHA.to_string()),
                message: merged.message,
            }
        } else {
            MergeResult::Rejected {
                status: status.as_u16(),
                message: error_message(&body).unwrap_or_else(|| "unknown error".to_string()),
                body,
            }
        };

        debug!(
            pr_number,
            status = status.as_u16(),
            merged = result.is_merged(),
            "merge attempt complete"
        );
        Ok(result)
    }

    async fn list_open_prs(&self) -> Result<Vec<PullRequestRef>> {
        debug!("listing open PRs");
        let first_page = self
            .client
            .pulls(&self.config.identity.owner, &self.config.identity.name)
            .list()
            .state(octocrab::params::State::Open)
            .per_page(LIST_PAGE_SIZE)
            .send()
            .await?;

        let prs = self.client.all_pages(first_page).await?;

        let result: Vec<PullRequestRef> = prs.iter().map(pr_from_octocrab).collect();
        debug!(count = result.len(), "listed open PRs");
        Ok(result)
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}

/// Helper to convert octocrab PR to our `PullRequestRef` type
fn pr_from_octocrab(pr: &octocrab::models::pulls::PullRequest) -> PullRequestRef {
    PullRequestRef {
        number: pr.number,
        title: pr.title.as_deref().unwrap_or_default().to_string(),
        head_ref: pr.head.ref_field.clone(),
        base_ref: pr.base.ref_field.clone(),
        html_url: pr
            .html_url
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_reads_message_field() {
        let body = r#"{"message":"Pull Request is not mergeable","documentation_url":"x"}"#;
        assert_eq!(
            error_message(body).as_deref(),
            Some("Pull Request is not mergeable")
        );
        assert_eq!(error_message("not json"), None);
    }

    #[test]
    fn test_pull_response_without_state_is_unknown() {
        let pull: PullResponse = serde_json::from_str(
            r#"{"number":3,"head":{"ref":"feat"},"base":{"ref":"main"},"mergeable":null}"#,
        )
        .unwrap();
        let details = pull.into_details();
        assert_eq!(details.pr.number, 3);
        assert_eq!(details.pr.head_ref, "feat");
        assert_eq!(details.observation.mergeable, None);
        assert_eq!(details.observation.state, MergeableState::Unknown);
    }
}
