pub mod config;
pub mod context;
pub mod error;
pub mod github;
pub mod post;
pub mod publish;
pub mod repo;
pub mod shorthash;
pub mod submit;
pub mod validate;

pub use config::{MicroblogConfig, ResolvedConfig};
pub use context::PublishContext;
pub use error::{MicroblogError, PublishError, Result, SubmitError};
pub use github::{GithubPublisher, GithubSettings};
pub use post::{parse_date, Post};
pub use publish::{publish, Committer, CreateFileRequest, MockPublisher, Publisher};
pub use repo::RepoCoordinate;
pub use submit::{Composer, SubmitState};
pub use validate::BodyValidator;
