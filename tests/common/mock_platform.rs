//! Mock platform service for testing

#![allow(dead_code)]

use async_trait::async_trait;
use merge_probe::error::{Error, Result};
use merge_probe::platform::PlatformService;
use merge_probe::types::{
    MergeRequest, MergeResult, MergeabilityObservation, MergeableState, PlatformConfig,
    PullRequestDetails, PullRequestRef, RepositoryIdentity,
};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Call record for `create_pr`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePrCall {
    pub head: String,
    pub base: String,
    pub title: String,
    pub body: String,
}

/// Call record for `merge_pr`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergePrCall {
    pub pr_number: u64,
    pub request: MergeRequest,
}

/// Simple mock platform service for testing
///
/// Features:
/// - Auto-incrementing PR numbers
/// - Scripted mergeability sequences per PR (the last one repeats)
/// - Call tracking for verification
/// - Error injection for failure path testing
pub struct MockPlatformService {
    config: PlatformConfig,
    next_pr_number: AtomicU64,
    prs: Mutex<HashMap<u64, PullRequestRef>>,
    open_prs: Mutex<Vec<PullRequestRef>>,
    observations: Mutex<HashMap<u64, VecDeque<MergeabilityObservation>>>,
    merge_responses: Mutex<HashMap<u64, MergeResult>>,
    // Call tracking
    create_pr_calls: Mutex<Vec<CreatePrCall>>,
    get_pr_details_calls: Mutex<Vec<u64>>,
    merge_pr_calls: Mutex<Vec<MergePrCall>>,
    list_open_prs_calls: AtomicU64,
    // Error injection
    error_on_create_pr: Mutex<Option<(u16, String)>>,
    error_on_details: Mutex<HashSet<u64>>,
    error_on_merge_pr: Mutex<Option<String>>,
    error_on_list: Mutex<Option<String>>,
}

impl MockPlatformService {
    /// Create a new mock with the given config
    pub fn with_config(config: PlatformConfig) -> Self {
        Self {
            config,
            next_pr_number: AtomicU64::new(1),
            prs: Mutex::new(HashMap::new()),
            open_prs: Mutex::new(Vec::new()),
            observations: Mutex::new(HashMap::new()),
            merge_responses: Mutex::new(HashMap::new()),
            create_pr_calls: Mutex::new(Vec::new()),
            get_pr_details_calls: Mutex::new(Vec::new()),
            merge_pr_calls: Mutex::new(Vec::new()),
            list_open_prs_calls: AtomicU64::new(0),
            error_on_create_pr: Mutex::new(None),
            error_on_details: Mutex::new(HashSet::new()),
            error_on_merge_pr: Mutex::new(None),
            error_on_list: Mutex::new(None),
        }
    }

    /// Create a mock for `test/repo`
    pub fn new() -> Self {
        Self::with_config(github_config())
    }

    // === Error injection methods ===

    /// Make `create_pr` answer with a non-2xx status
    pub fn fail_create_pr(&self, status: u16, body: &str) {
        *self.error_on_create_pr.lock().unwrap() = Some((status, body.to_string()));
    }

    /// Make `get_pr_details` fail for one PR
    pub fn fail_details_for(&self, pr_number: u64) {
        self.error_on_details.lock().unwrap().insert(pr_number);
    }

    /// Make `merge_pr` fail at the transport level
    pub fn fail_merge_pr(&self, msg: &str) {
        *self.error_on_merge_pr.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `list_open_prs` fail
    pub fn fail_list(&self, msg: &str) {
        *self.error_on_list.lock().unwrap() = Some(msg.to_string());
    }

    // === Response setup ===

    /// Script the observations returned for a PR, in order
    pub fn set_observations(&self, pr_number: u64, sequence: Vec<MergeabilityObservation>) {
        self.observations
            .lock()
            .unwrap()
            .insert(pr_number, sequence.into());
    }

    /// Set the response for `merge_pr` for a specific PR
    pub fn set_merge_response(&self, pr_number: u64, result: MergeResult) {
        self.merge_responses
            .lock()
            .unwrap()
            .insert(pr_number, result);
    }

    /// Add an open PR (returned by `list_open_prs`) with a fixed observation
    pub fn add_open_pr(&self, pr: PullRequestRef, observation: MergeabilityObservation) {
        self.set_observations(pr.number, vec![observation]);
        self.prs.lock().unwrap().insert(pr.number, pr.clone());
        self.open_prs.lock().unwrap().push(pr);
    }

    // === Call inspection ===

    pub fn create_pr_calls(&self) -> Vec<CreatePrCall> {
        self.create_pr_calls.lock().unwrap().clone()
    }

    pub fn get_pr_details_calls(&self) -> Vec<u64> {
        self.get_pr_details_calls.lock().unwrap().clone()
    }

    pub fn merge_pr_calls(&self) -> Vec<MergePrCall> {
        self.merge_pr_calls.lock().unwrap().clone()
    }

    pub fn list_open_prs_calls(&self) -> u64 {
        self.list_open_prs_calls.load(Ordering::SeqCst)
    }

    fn next_observation(&self, pr_number: u64) -> MergeabilityObservation {
        let mut observations = self.observations.lock().unwrap();
        let Some(queue) = observations.get_mut(&pr_number) else {
            return unknown();
        };
        if queue.len() > 1 {
            queue.pop_front().unwrap()
        } else {
            queue.front().cloned().unwrap_or_else(unknown)
        }
    }
}

#[async_trait]
impl PlatformService for MockPlatformService {
    async fn create_pr(
        &self,
        head: &str,
        base: &str,
        title: &str,
        body: &str,
    ) -> Result<PullRequestRef> {
        self.create_pr_calls.lock().unwrap().push(CreatePrCall {
            head: head.to_string(),
            base: base.to_string(),
            title: title.to_string(),
            body: body.to_string(),
        });

        if let Some((status, body)) = self.error_on_create_pr.lock().unwrap().clone() {
            return Err(Error::PullRequestCreationFailed { status, body });
        }

        let number = self.next_pr_number.fetch_add(1, Ordering::SeqCst);
        let pr = make_pr(number, head, title);
        self.prs.lock().unwrap().insert(number, pr.clone());
        Ok(pr)
    }

    async fn get_pr_details(&self, pr_number: u64) -> Result<PullRequestDetails> {
        self.get_pr_details_calls.lock().unwrap().push(pr_number);

        if self.error_on_details.lock().unwrap().contains(&pr_number) {
            return Err(Error::GitHubApi(format!(
                "GET PR #{pr_number} returned 502: Bad Gateway"
            )));
        }

        let pr = self
            .prs
            .lock()
            .unwrap()
            .get(&pr_number)
            .cloned()
            .ok_or_else(|| Error::GitHubApi(format!("PR #{pr_number} not found")))?;

        Ok(PullRequestDetails {
            pr,
            observation: self.next_observation(pr_number),
        })
    }

    async fn merge_pr(&self, pr_number: u64, request: &MergeRequest) -> Result<MergeResult> {
        self.merge_pr_calls.lock().unwrap().push(MergePrCall {
            pr_number,
            request: request.clone(),
        });

        if let Some(msg) = self.error_on_merge_pr.lock().unwrap().clone() {
            return Err(Error::GitHubApi(msg));
        }

        Ok(self
            .merge_responses
            .lock()
            .unwrap()
            .get(&pr_number)
            .cloned()
            .unwrap_or_else(|| MergeResult::Merged {
                sha: format!("merged_sha_{pr_number}"),
                message: Some("Pull Request successfully merged".to_string()),
            }))
    }

    async fn list_open_prs(&self) -> Result<Vec<PullRequestRef>> {
        self.list_open_prs_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(msg) = self.error_on_list.lock().unwrap().clone() {
            return Err(Error::GitHubApi(msg));
        }

        Ok(self.open_prs.lock().unwrap().clone())
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}

/// Config for `test/repo` on github.com
pub fn github_config() -> PlatformConfig {
    PlatformConfig {
        identity: RepositoryIdentity::new("test", "repo"),
        api_base: "https://api.github.com".to_string(),
    }
}

/// A PR into `main`
pub fn make_pr(number: u64, head: &str, title: &str) -> PullRequestRef {
    PullRequestRef {
        number,
        title: title.to_string(),
        head_ref: head.to_string(),
        base_ref: "main".to_string(),
        html_url: format!("https://github.com/test/repo/pull/{number}"),
    }
}

/// `(mergeable, mergeable_state)` as the API reports them
pub fn observation(mergeable: Option<bool>, state: &str) -> MergeabilityObservation {
    MergeabilityObservation::new(mergeable, MergeableState::parse(Some(state)))
}

pub fn clean() -> MergeabilityObservation {
    observation(Some(true), "clean")
}

pub fn dirty() -> MergeabilityObservation {
    observation(Some(false), "dirty")
}

pub fn unknown() -> MergeabilityObservation {
    observation(None, "unknown")
}
