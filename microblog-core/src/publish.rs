//! Publisher seam: one "create file" request per post
//!
//! - [`Publisher`] is the transport-agnostic trait
//! - [`crate::github::GithubPublisher`] talks to the GitHub contents API
//! - [`MockPublisher`] records requests and replays scripted outcomes in tests

use std::sync::Mutex;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::PublishError;
use crate::post::Post;
use crate::repo::RepoCoordinate;

pub const COMMITTER_NAME: &str = "Microblog";
pub const COMMITTER_EMAIL: &str = "microblog-extension[bot]@github.com";

/// Identity attached to every commit, independent of the token's owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Committer {
    pub name: String,
    pub email: String,
}

impl Default for Committer {
    fn default() -> Self {
        Self {
            name: COMMITTER_NAME.to_string(),
            email: COMMITTER_EMAIL.to_string(),
        }
    }
}

/// Logical create-file request; the wire format belongs to the publisher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateFileRequest {
    pub repo: RepoCoordinate,
    pub path: String,
    pub message: String,
    pub committer: Committer,
    /// Standard base64 of the file contents
    pub content: String,
}

impl CreateFileRequest {
    pub fn for_post(post: &Post, repo: &RepoCoordinate) -> Self {
        Self {
            repo: repo.clone(),
            path: post.path.clone(),
            message: commit_message(post),
            committer: Committer::default(),
            content: STANDARD.encode(post.contents.as_bytes()),
        }
    }
}

/// `create <id>.md`
pub fn commit_message(post: &Post) -> String {
    format!("create {}", post.filename())
}

/// Anything that can write a file into a repository
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn create_file(&self, request: &CreateFileRequest) -> Result<(), PublishError>;
}

#[async_trait]
impl<'a, P: Publisher + ?Sized> Publisher for &'a P {
    async fn create_file(&self, request: &CreateFileRequest) -> Result<(), PublishError> {
        (**self).create_file(request).await
    }
}

/// Issue exactly one create-file request for `post`. No retry.
pub async fn publish<P: Publisher + ?Sized>(
    post: &Post,
    destination: &RepoCoordinate,
    publisher: &P,
) -> Result<(), PublishError> {
    let request = CreateFileRequest::for_post(post, destination);
    debug!(repo = %destination, path = %request.path, "sending create-file request");

    publisher.create_file(&request).await?;

    info!(repo = %destination, path = %post.path, "post committed");
    Ok(())
}

/// Scripted publisher for tests: records every request, pops queued outcomes
#[derive(Default)]
pub struct MockPublisher {
    outcomes: Mutex<Vec<Result<(), PublishError>>>,
    requests: Mutex<Vec<CreateFileRequest>>,
}

impl MockPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the outcome for the next call; unqueued calls succeed
    pub fn push_outcome(&self, outcome: Result<(), PublishError>) {
        self.outcomes.lock().unwrap().push(outcome);
    }

    pub fn requests(&self) -> Vec<CreateFileRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Publisher for MockPublisher {
    async fn create_file(&self, request: &CreateFileRequest) -> Result<(), PublishError> {
        self.requests.lock().unwrap().push(request.clone());
        let mut outcomes = self.outcomes.lock().unwrap();
        if outcomes.is_empty() {
            Ok(())
        } else {
            outcomes.remove(0)
        }
    }
}
