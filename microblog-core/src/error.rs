/// Structured error types for microblog-core.
///
/// Library consumers get `thiserror` enums; the `microblog` binary wraps them
/// in `anyhow` for context.
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or resolving configuration
#[derive(Error, Debug)]
pub enum MicroblogError {
    /// I/O operation failed
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// Config file is not valid TOML for the expected shape
    #[error("Failed to parse config file {path:?}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Config file was not found
    #[error("Config not found at {path:?}\n\nRun: microblog config init")]
    ConfigNotFound { path: PathBuf },

    /// A required setting was not supplied by any source
    #[error("Missing required setting '{key}'. {hint}")]
    MissingSetting { key: String, hint: String },

    /// Configuration error
    #[error("Configuration error: {reason}")]
    Config { reason: String },
}

/// Result type alias for microblog-core operations
pub type Result<T> = std::result::Result<T, MicroblogError>;

impl MicroblogError {
    /// Create a config parse error
    pub fn config_parse(path: impl Into<PathBuf>, source: toml::de::Error) -> Self {
        Self::ConfigParse {
            path: path.into(),
            source,
        }
    }

    /// Create a missing setting error
    pub fn missing_setting(key: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::MissingSetting {
            key: key.into(),
            hint: hint.into(),
        }
    }

    /// Create a config error
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }
}

/// Failure of the remote create-file request.
///
/// Never retried by this crate; the caller decides whether to resubmit.
#[derive(Error, Debug)]
pub enum PublishError {
    /// Request never produced a response (DNS, connect, TLS, timeout)
    #[error("{message}")]
    Transport { message: String },

    /// GitHub answered with a non-success status
    #[error("{message} (HTTP {status})")]
    Rejected { status: u16, message: String },

    /// HTTP client could not be constructed
    #[error("Failed to build HTTP client: {message}")]
    Client { message: String },
}

impl PublishError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for PublishError {
    fn from(err: reqwest::Error) -> Self {
        Self::transport(err.to_string())
    }
}

/// Why a submission ended in the `Failed` state
#[derive(Error, Debug)]
pub enum SubmitError {
    /// Body was missing or blank; never reaches the publisher
    #[error("{message}")]
    Validation { message: String },

    #[error("Unable to commit post: {0}")]
    Publish(#[from] PublishError),
}
