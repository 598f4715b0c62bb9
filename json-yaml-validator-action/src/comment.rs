//! Pull request comments through the REST API.

use std::env;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::debug;

const DEFAULT_API_URL: &str = "https://api.github.com";

/// The pull request the current workflow run belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    api_url: String,
    repository: String,
    number: u64,
}

#[derive(Deserialize)]
struct EventPayload {
    pull_request: Option<PullRequestRef>,
}

#[derive(Deserialize)]
struct PullRequestRef {
    number: u64,
}

#[derive(Serialize)]
struct CommentRequest<'a> {
    body: &'a str,
}

impl PullRequest {
    /// Read the pull request from the workflow environment. `None` outside a
    /// pull request event.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let repository = env::var("GITHUB_REPOSITORY").ok()?;
        let event_path = env::var_os("GITHUB_EVENT_PATH")?;
        let api_url = env::var("GITHUB_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_owned());
        let event = std::fs::read_to_string(Path::new(&event_path)).ok()?;
        Self::from_event(&api_url, &repository, &event)
    }

    fn from_event(api_url: &str, repository: &str, event: &str) -> Option<Self> {
        let payload: EventPayload = serde_json::from_str(event).ok()?;
        let number = payload.pull_request?.number;
        Some(Self {
            api_url: api_url.trim_end_matches('/').to_owned(),
            repository: repository.to_owned(),
            number,
        })
    }

    #[must_use]
    pub fn comments_url(&self) -> String {
        format!(
            "{}/repos/{}/issues/{}/comments",
            self.api_url, self.repository, self.number
        )
    }
}

/// Post `body` as a new comment on the pull request.
///
/// # Errors
///
/// Returns an error if the request cannot be sent or the API rejects it.
pub async fn post_comment(pull_request: &PullRequest, token: &str, body: &str) -> anyhow::Result<()> {
    let client = reqwest::Client::builder()
        .user_agent(concat!("json-yaml-validate/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("failed to create HTTP client")?;

    let url = pull_request.comments_url();
    debug!("posting comment to {url}");
    client
        .post(&url)
        .bearer_auth(token)
        .header(reqwest::header::ACCEPT, "application/vnd.github+json")
        .json(&CommentRequest { body })
        .send()
        .await
        .with_context(|| format!("failed to send comment to {url}"))?
        .error_for_status()
        .context("comment was rejected")?;
    Ok(())
}
