//! Post command - build a post and commit it to GitHub
//!
//! ```bash
//! microblog post "shipped the thing"
//! echo "from a pipe" | microblog post
//! microblog post --file note.md --dry-run
//! microblog post "same text" --at 2024-03-07T12:00:00Z   # retry a failed post
//! ```

use std::io::{IsTerminal, Read};
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use microblog_core::validate::BodyValidator;
use microblog_core::{Composer, Post, PublishContext, SubmitError};
use serde::Serialize;
use tracing::debug;

use crate::{compose, config, ui};

#[derive(Parser, Debug)]
pub struct PostArgs {
    /// Post text (falls back to --file, piped stdin, then an interactive prompt)
    pub body: Option<String>,

    /// Read the post text from a file
    #[arg(long, conflicts_with = "body")]
    pub file: Option<PathBuf>,

    /// Publish as if written at this instant (RFC 3339); reuse it to retry a failed post
    #[arg(long, value_parser = parse_instant)]
    pub at: Option<DateTime<Utc>>,

    /// Build and print the post without publishing
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,

    /// GitHub token with contents write access
    #[arg(long, env = "MICROBLOG_GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Target repository as owner/name
    #[arg(long, env = "MICROBLOG_REPO")]
    pub repo: Option<String>,

    /// Config file (default: ~/.microblog/config.toml)
    #[arg(long, env = "MICROBLOG_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Serialize)]
struct PostOutput<'a> {
    id: &'a str,
    timestamp: &'a str,
    path: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    repo: Option<String>,
    published: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    contents: Option<&'a str>,
}

fn parse_instant(value: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("expected an RFC 3339 timestamp like 2024-03-07T12:00:00Z: {}", e))
}

pub async fn run_post(args: PostArgs) -> Result<()> {
    let interactive = args.body.is_none() && args.file.is_none() && compose::can_prompt();
    let body = read_body(&args, interactive)?;
    let now = args.at.unwrap_or_else(Utc::now);

    if args.dry_run {
        return run_dry_run(body.as_deref(), now, args.json);
    }

    let settings = config::load_config(args.config.as_deref())?
        .resolve(args.token.clone(), args.repo.clone())?;
    debug!(repo = %settings.repo, token = %settings.redacted_token(), "resolved settings");

    let context = PublishContext::new(settings.token, settings.github);
    let mut composer = Composer::new(context, settings.repo);
    if let Some(body) = body {
        composer.set_body(body);
    }

    let mut attempt = submit_with_spinner(&mut composer, Some(now)).await;
    while interactive && matches!(attempt, Err(SubmitError::Publish(_))) {
        if !compose::confirm_retry()? {
            break;
        }
        attempt = submit_with_spinner(&mut composer, None).await;
    }

    match attempt {
        Ok(post) => print_post(&post, Some(composer.destination().to_string()), true, args.json),
        Err(err @ SubmitError::Validation { .. }) => Err(anyhow!(err)),
        Err(err @ SubmitError::Publish(_)) => {
            if let Some(at) = composer.last_attempt() {
                eprintln!(
                    "\nYour post was not published. Retry with the same text and:\n  --at {}",
                    microblog_core::post::iso_timestamp(at)
                );
            }
            Err(anyhow!(err))
        }
    }
}

/// `Some(now)` submits fresh; `None` retries at the previous attempt's instant
async fn submit_with_spinner(
    composer: &mut Composer<PublishContext>,
    now: Option<DateTime<Utc>>,
) -> Result<Post, SubmitError> {
    let pb = ui::spinner("Committing post to GitHub...");
    let result = match now {
        Some(now) => composer.submit_at(now).await,
        None => composer.retry().await,
    };

    match &result {
        Ok(_) => ui::finish_success(pb, "Post created"),
        Err(e) => ui::finish_error(pb, e.to_string()),
    }
    result
}

fn run_dry_run(body: Option<&str>, now: DateTime<Utc>, json: bool) -> Result<()> {
    let mut validator = BodyValidator::new();
    if !validator.validate(body) {
        return Err(anyhow!(validator.error().unwrap_or_default().to_string()));
    }

    let post = Post::build(body.unwrap_or_default(), now);
    print_post(&post, None, false, json)
}

fn print_post(post: &Post, repo: Option<String>, published: bool, json: bool) -> Result<()> {
    if json {
        let output = PostOutput {
            id: &post.id,
            timestamp: &post.timestamp,
            path: &post.path,
            repo,
            published,
            contents: (!published).then_some(post.contents.as_str()),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if published {
        match repo {
            Some(repo) => println!("{}:{}", repo, post.path),
            None => println!("{}", post.path),
        }
    } else {
        println!("id:   {}", post.id);
        println!("path: {}", post.path);
        println!();
        print!("{}", post.contents);
    }
    Ok(())
}

/// Body sources in priority order: argument, --file, piped stdin, prompt
fn read_body(args: &PostArgs, interactive: bool) -> Result<Option<String>> {
    if let Some(ref body) = args.body {
        return Ok(Some(body.clone()));
    }

    if let Some(ref path) = args.file {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;
        return Ok(Some(strip_trailing_newline(text)));
    }

    if !std::io::stdin().is_terminal() {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read from stdin")?;
        return Ok(Some(strip_trailing_newline(buf)));
    }

    if interactive {
        return compose::prompt_body().map(Some);
    }

    Ok(None)
}

/// Files and pipes end with a newline; the renderer adds its own
fn strip_trailing_newline(mut text: String) -> String {
    if text.ends_with('\n') {
        text.pop();
        if text.ends_with('\r') {
            text.pop();
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_instant() {
        let at = parse_instant("2024-03-07T12:00:00Z").unwrap();
        assert_eq!(microblog_core::post::iso_timestamp(at), "2024-03-07T12:00:00Z");

        let offset = parse_instant("2024-03-07T13:00:00+01:00").unwrap();
        assert_eq!(offset, at);

        assert!(parse_instant("yesterday").is_err());
    }

    #[test]
    fn test_strip_trailing_newline() {
        assert_eq!(strip_trailing_newline("hi\n".into()), "hi");
        assert_eq!(strip_trailing_newline("hi\r\n".into()), "hi");
        assert_eq!(strip_trailing_newline("hi\n\n".into()), "hi\n");
        assert_eq!(strip_trailing_newline("hi".into()), "hi");
    }

    #[test]
    fn test_dry_run_rejects_blank_body() {
        let err = run_dry_run(Some("   "), Utc::now(), false).unwrap_err();
        assert_eq!(err.to_string(), "Value is required!");
        assert!(run_dry_run(None, Utc::now(), false).is_err());
    }
}
