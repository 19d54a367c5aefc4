//! Submission orchestrator
//!
//! ```text
//! Idle -> Validating -> Building -> Publishing -> Succeeded
//!            |                          |
//!            +--------> Failed <--------+
//! ```
//!
//! A failed submission keeps the body so the user can retry without retyping.
//! A successful one clears it. `submit` borrows the composer mutably, so a
//! second submission cannot start while one is outstanding.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::error::SubmitError;
use crate::post::Post;
use crate::publish::{publish, Publisher};
use crate::repo::RepoCoordinate;
use crate::validate::BodyValidator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitState {
    Idle,
    Validating,
    Building,
    Publishing,
    Succeeded,
    Failed,
}

/// The compose form: body, inline error, and the submission state machine
pub struct Composer<P> {
    publisher: P,
    destination: RepoCoordinate,
    validator: BodyValidator,
    body: Option<String>,
    state: SubmitState,
    failure: Option<String>,
    last_attempt: Option<DateTime<Utc>>,
}

impl<P: Publisher> Composer<P> {
    pub fn new(publisher: P, destination: RepoCoordinate) -> Self {
        Self {
            publisher,
            destination,
            validator: BodyValidator::new(),
            body: None,
            state: SubmitState::Idle,
            failure: None,
            last_attempt: None,
        }
    }

    /// Edit the body. Clears a stale inline error and returns to `Idle`.
    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = Some(body.into());
        self.validator.clear_if_set();
        self.transition(SubmitState::Idle);
    }

    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    pub fn state(&self) -> SubmitState {
        self.state
    }

    /// Inline validation message, if the last check failed
    pub fn validation_error(&self) -> Option<&str> {
        self.validator.error()
    }

    /// Message of the last failed submission
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    /// Instant of the last attempt that got past validation
    pub fn last_attempt(&self) -> Option<DateTime<Utc>> {
        self.last_attempt
    }

    pub fn destination(&self) -> &RepoCoordinate {
        &self.destination
    }

    pub async fn submit(&mut self) -> Result<Post, SubmitError> {
        self.submit_at(Utc::now()).await
    }

    /// Resubmit the kept body at the previous attempt's instant, so the
    /// retry addresses the same path. Falls back to now on a first attempt.
    pub async fn retry(&mut self) -> Result<Post, SubmitError> {
        let now = self.last_attempt.unwrap_or_else(Utc::now);
        self.submit_at(now).await
    }

    pub async fn submit_at(&mut self, now: DateTime<Utc>) -> Result<Post, SubmitError> {
        self.failure = None;
        self.transition(SubmitState::Validating);

        if !self.validator.validate(self.body.as_deref()) {
            let message = self.validator.error().unwrap_or_default().to_string();
            return Err(self.fail(SubmitError::Validation { message }));
        }
        // Validation guarantees a body
        let body = self.body.clone().unwrap_or_default();

        self.transition(SubmitState::Building);
        self.last_attempt = Some(now);
        let post = Post::build(&body, now);
        debug!(id = %post.id, path = %post.path, timestamp = %post.timestamp, "built post");

        self.transition(SubmitState::Publishing);
        match publish(&post, &self.destination, &self.publisher).await {
            Ok(()) => {
                self.body = None;
                self.last_attempt = None;
                self.transition(SubmitState::Succeeded);
                info!(id = %post.id, "post created");
                Ok(post)
            }
            Err(e) => Err(self.fail(e.into())),
        }
    }

    fn fail(&mut self, err: SubmitError) -> SubmitError {
        warn!(error = %err, "submission failed");
        self.failure = Some(err.to_string());
        self.transition(SubmitState::Failed);
        err
    }

    fn transition(&mut self, next: SubmitState) {
        if self.state != next {
            debug!(from = ?self.state, to = ?next, "submission state");
            self.state = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PublishError;
    use crate::publish::MockPublisher;
    use chrono::TimeZone;

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 7, 12, 0, 0).unwrap()
    }

    fn repo() -> RepoCoordinate {
        RepoCoordinate::new("octocat", "blog")
    }

    #[tokio::test]
    async fn test_success_clears_body() {
        let mock = MockPublisher::new();
        let mut composer = Composer::new(&mock, repo());
        composer.set_body("hello world");

        let post = composer.submit_at(noon()).await.unwrap();

        assert_eq!(post.path, "posts/2024/03/07/0ZAhLQE.md");
        assert_eq!(composer.state(), SubmitState::Succeeded);
        assert_eq!(composer.body(), None);
        assert_eq!(composer.failure(), None);
        assert_eq!(mock.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_blank_body_never_reaches_publisher() {
        let mock = MockPublisher::new();
        let mut composer = Composer::new(&mock, repo());
        composer.set_body("   ");

        let err = composer.submit_at(noon()).await.unwrap_err();

        assert!(matches!(err, SubmitError::Validation { .. }));
        assert_eq!(composer.state(), SubmitState::Failed);
        assert_eq!(composer.validation_error(), Some("Value is required!"));
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn test_missing_body_fails_validation() {
        let mock = MockPublisher::new();
        let mut composer = Composer::new(&mock, repo());

        assert!(composer.submit().await.is_err());
        assert_eq!(composer.state(), SubmitState::Failed);
        assert_eq!(composer.last_attempt(), None);
    }

    #[tokio::test]
    async fn test_transport_failure_keeps_body() {
        let mock = MockPublisher::new();
        mock.push_outcome(Err(PublishError::transport("connection reset")));
        let mut composer = Composer::new(&mock, repo());
        composer.set_body("keep me");

        let err = composer.submit_at(noon()).await.unwrap_err();

        assert!(matches!(err, SubmitError::Publish(_)));
        assert_eq!(composer.state(), SubmitState::Failed);
        assert_eq!(composer.body(), Some("keep me"));
        assert_eq!(
            composer.failure(),
            Some("Unable to commit post: connection reset")
        );
    }

    #[tokio::test]
    async fn test_retry_targets_same_path() {
        let mock = MockPublisher::new();
        mock.push_outcome(Err(PublishError::transport("timed out")));
        let mut composer = Composer::new(&mock, repo());
        composer.set_body("retry me");

        composer.submit_at(noon()).await.unwrap_err();
        let post = composer.retry().await.unwrap();

        let requests = mock.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].path, requests[1].path);
        assert_eq!(requests[0].content, requests[1].content);
        assert_eq!(post.path, requests[0].path);
        assert_eq!(composer.state(), SubmitState::Succeeded);
    }

    #[tokio::test]
    async fn test_edit_after_failure_returns_to_idle() {
        let mock = MockPublisher::new();
        let mut composer = Composer::new(&mock, repo());
        composer.set_body("");
        composer.submit_at(noon()).await.unwrap_err();

        composer.set_body("fixed");

        assert_eq!(composer.state(), SubmitState::Idle);
        assert_eq!(composer.validation_error(), None);
        composer.submit_at(noon()).await.unwrap();
    }
}
