//! GitHub contents API publisher
//!
//! `PUT /repos/{owner}/{repo}/contents/{path}` with a bearer token. GitHub
//! refuses to create a file that already exists at `path` without its blob
//! sha, so a retried post with the same address is rejected, never duplicated.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Request, Url};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::PublishError;
use crate::publish::{Committer, CreateFileRequest, Publisher};

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("microblog/", env!("CARGO_PKG_VERSION"));

/// Where and how to reach the API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GithubSettings {
    pub api_base: String,
    pub timeout: Duration,
}

impl Default for GithubSettings {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

#[derive(Serialize)]
struct CreateFileBody<'a> {
    message: &'a str,
    committer: &'a Committer,
    content: &'a str,
}

/// Authenticated client for one token
#[derive(Debug, Clone)]
pub struct GithubPublisher {
    client: Client,
    api_base: Url,
    token: String,
}

impl GithubPublisher {
    pub fn new(token: impl Into<String>, settings: &GithubSettings) -> Result<Self, PublishError> {
        let api_base = Url::parse(&settings.api_base).map_err(|e| PublishError::Client {
            message: format!("invalid API base {:?}: {}", settings.api_base, e),
        })?;

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(settings.timeout)
            .build()
            .map_err(|e| PublishError::Client {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            api_base,
            token: token.into(),
        })
    }

    /// Contents endpoint for `request`, each segment percent-encoded
    pub fn contents_url(&self, request: &CreateFileRequest) -> Result<Url, PublishError> {
        let mut url = self.api_base.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| PublishError::Client {
                message: format!("API base {} cannot take a path", self.api_base),
            })?;
            segments
                .pop_if_empty()
                .push("repos")
                .push(&request.repo.owner)
                .push(&request.repo.name)
                .push("contents")
                .extend(request.path.split('/'));
        }
        Ok(url)
    }

    /// Build the HTTP request without sending it
    pub fn build_request(&self, request: &CreateFileRequest) -> Result<Request, PublishError> {
        let body = CreateFileBody {
            message: &request.message,
            committer: &request.committer,
            content: &request.content,
        };

        self.client
            .put(self.contents_url(request)?)
            .bearer_auth(&self.token)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
            .json(&body)
            .build()
            .map_err(|e| PublishError::Client {
                message: e.to_string(),
            })
    }
}

#[async_trait]
impl Publisher for GithubPublisher {
    async fn create_file(&self, request: &CreateFileRequest) -> Result<(), PublishError> {
        let http_request = self.build_request(request)?;
        debug!(url = %http_request.url(), "PUT contents");

        let response = self.client.execute(http_request).await?;
        let status = response.status();

        if status.is_success() {
            return Ok(());
        }

        let text = response.text().await.unwrap_or_default();
        let message = error_message(&text)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Request failed").to_string());

        warn!(status = status.as_u16(), %message, path = %request.path, "GitHub rejected create-file");
        Err(PublishError::rejected(status.as_u16(), message))
    }
}

/// GitHub error bodies look like `{"message": "...", "documentation_url": "..."}`
fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .and_then(|m| m.as_str())
        .map(str::to_string)
}
