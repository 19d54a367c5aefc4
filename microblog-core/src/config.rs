use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{MicroblogError, Result};
use crate::github::{GithubSettings, DEFAULT_API_BASE, DEFAULT_TIMEOUT_SECS};
use crate::repo::RepoCoordinate;

pub const TOKEN_ENV: &str = "MICROBLOG_GITHUB_TOKEN";
pub const REPO_ENV: &str = "MICROBLOG_REPO";

static VAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("valid regex"));

/// Settings file at ~/.microblog/config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MicroblogConfig {
    #[serde(default)]
    pub github: GithubConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GithubConfig {
    /// Personal access token with contents write permission
    pub token: Option<String>,
    /// `owner/name`
    pub repo: Option<String>,
    pub api_base: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Everything a publish needs, after flags, env and file are merged
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub token: String,
    pub repo: RepoCoordinate,
    pub github: GithubSettings,
}

impl MicroblogConfig {
    /// Load from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load from `path`, expanding `${VAR}` references from the environment
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(MicroblogError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(path)?;
        let mut config: Self =
            toml::from_str(&content).map_err(|e| MicroblogError::config_parse(path, e))?;
        config.expand_variables();

        Ok(config)
    }

    /// Load if present; a missing file is an empty config
    pub fn load_optional(path: &Path) -> Result<Self> {
        match Self::load_from(path) {
            Err(MicroblogError::ConfigNotFound { .. }) => Ok(Self::default()),
            other => other,
        }
    }

    /// Config file path: ~/.microblog/config.toml
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".microblog/config.toml")
    }

    fn expand_variables(&mut self) {
        let gh = &mut self.github;
        for value in [&mut gh.token, &mut gh.repo, &mut gh.api_base]
            .into_iter()
            .flatten()
        {
            *value = expand_string(value);
        }
    }

    /// Merge overrides (flags / env) over the file. Only presence is checked.
    pub fn resolve(&self, token: Option<String>, repo: Option<String>) -> Result<ResolvedConfig> {
        let token = non_empty(token)
            .or_else(|| non_empty(self.github.token.clone()))
            .ok_or_else(|| {
                MicroblogError::missing_setting(
                    "github.token",
                    format!(
                        "Use --token, the {} env var, or set [github].token in {}",
                        TOKEN_ENV,
                        Self::config_path().display()
                    ),
                )
            })?;

        let repo = non_empty(repo)
            .or_else(|| non_empty(self.github.repo.clone()))
            .ok_or_else(|| {
                MicroblogError::missing_setting(
                    "github.repo",
                    format!(
                        "Use --repo, the {} env var, or set [github].repo in {}",
                        REPO_ENV,
                        Self::config_path().display()
                    ),
                )
            })?;

        let github = GithubSettings {
            api_base: self
                .github
                .api_base
                .clone()
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            timeout: Duration::from_secs(self.github.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
        };

        Ok(ResolvedConfig {
            token,
            repo: RepoCoordinate::parse(&repo),
            github,
        })
    }

    /// Warn about raw tokens stored in the file instead of `${VAR}` references.
    ///
    /// Checks the text as written, before expansion.
    pub fn secret_warnings(raw_toml: &str) -> Vec<String> {
        let mut warnings = Vec::new();
        for (line_no, line) in raw_toml.lines().enumerate() {
            let line = line.trim();
            if line.starts_with('#') || !line.starts_with("token") {
                continue;
            }
            if let Some((_, value)) = line.split_once('=') {
                let value = value.trim().trim_matches('"');
                if !value.is_empty() && !VAR_PATTERN.is_match(value) {
                    warnings.push(format!(
                        "line {}: token is stored in plain text; prefer token = \"${{GITHUB_TOKEN}}\"",
                        line_no + 1
                    ));
                }
            }
        }
        warnings
    }

    /// Save config to `path`, creating the directory
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)
            .map_err(|e| MicroblogError::config(format!("failed to serialize config: {}", e)))?;
        fs::write(path, toml_str)?;
        Ok(())
    }
}

impl ResolvedConfig {
    /// Token with all but the last four characters hidden
    pub fn redacted_token(&self) -> String {
        redact(&self.token)
    }
}

pub fn redact(secret: &str) -> String {
    let count = secret.chars().count();
    if count <= 4 {
        return "*".repeat(count);
    }
    let tail: String = secret.chars().skip(count - 4).collect();
    format!("{}{}", "*".repeat(count - 4), tail)
}

/// Starter config written by `microblog config init`
pub fn template() -> &'static str {
    r#"# microblog configuration

[github]
# Personal access token with "contents: write" on the target repository.
# Prefer an environment reference over a literal token.
token = "${GITHUB_TOKEN}"

# Repository that receives posts, as owner/name
repo = "owner/name"

# api_base = "https://api.github.com"
# timeout_secs = 30
"#
}

/// Replace `${VAR}` with the variable's value; unset variables become empty
fn expand_string(s: &str) -> String {
    VAR_PATTERN
        .replace_all(s, |caps: &regex::Captures| env::var(&caps[1]).unwrap_or_default())
        .into_owned()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
