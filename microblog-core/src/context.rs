//! Explicit publish context: credential plus a lazily built client
//!
//! The client is created on first publish and reused afterwards. It is keyed
//! to the token it was built with; [`PublishContext::rotate_token`] is the
//! only way to swap credentials and it drops the cached client.

use async_trait::async_trait;
use once_cell::sync::OnceCell;
use tracing::debug;

use crate::error::PublishError;
use crate::github::{GithubPublisher, GithubSettings};
use crate::publish::{CreateFileRequest, Publisher};

pub struct PublishContext {
    token: String,
    settings: GithubSettings,
    client: OnceCell<GithubPublisher>,
}

impl PublishContext {
    pub fn new(token: impl Into<String>, settings: GithubSettings) -> Self {
        Self {
            token: token.into(),
            settings,
            client: OnceCell::new(),
        }
    }

    /// Cached client, built on first call
    pub fn client(&self) -> Result<&GithubPublisher, PublishError> {
        self.client.get_or_try_init(|| {
            debug!(api_base = %self.settings.api_base, "initializing GitHub client");
            GithubPublisher::new(self.token.clone(), &self.settings)
        })
    }

    pub fn is_initialized(&self) -> bool {
        self.client.get().is_some()
    }

    /// Replace the credential; the next publish builds a fresh client
    pub fn rotate_token(&mut self, token: impl Into<String>) {
        self.token = token.into();
        self.client = OnceCell::new();
    }

    pub fn settings(&self) -> &GithubSettings {
        &self.settings
    }
}

#[async_trait]
impl Publisher for PublishContext {
    async fn create_file(&self, request: &CreateFileRequest) -> Result<(), PublishError> {
        self.client()?.create_file(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_is_lazy_and_reused() {
        let ctx = PublishContext::new("first", GithubSettings::default());
        assert!(!ctx.is_initialized());

        let a = ctx.client().unwrap() as *const GithubPublisher;
        let b = ctx.client().unwrap() as *const GithubPublisher;
        assert!(ctx.is_initialized());
        assert_eq!(a, b);
    }

    #[test]
    fn test_rotate_token_drops_client() {
        let mut ctx = PublishContext::new("first", GithubSettings::default());
        ctx.client().unwrap();

        ctx.rotate_token("second");
        assert!(!ctx.is_initialized());
        ctx.client().unwrap();
        assert!(ctx.is_initialized());
    }

    #[test]
    fn test_bad_settings_fail_on_first_use() {
        let settings = GithubSettings {
            api_base: "::".to_string(),
            ..Default::default()
        };
        let ctx = PublishContext::new("t0ken", settings);
        assert!(ctx.client().is_err());
        assert!(!ctx.is_initialized());
    }
}
