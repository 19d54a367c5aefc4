//! Interactive compose prompt - the terminal stand-in for the post form
//!
//! Used when `microblog post` gets no body from an argument, a file, or a pipe.
//!
//! ```text
//! $ microblog post
//!
//! ? Post: What's happening
//! ```

use std::io::IsTerminal;

use anyhow::{Context, Result};
use inquire::validator::Validation;
use inquire::{Confirm, CustomUserError, Text};
use microblog_core::validate::{is_valid_body, REQUIRED_MESSAGE};

/// Prompts need a human on both ends
pub fn can_prompt() -> bool {
    std::io::stdin().is_terminal() && std::io::stdout().is_terminal()
}

/// Ask for the post body, re-prompting until it is non-blank
pub fn prompt_body() -> Result<String> {
    Text::new("Post:")
        .with_placeholder("What's happening")
        .with_help_message("Markdown is fine. Enter to publish, Esc to cancel")
        .with_validator(|input: &str| -> Result<Validation, CustomUserError> {
            if is_valid_body(Some(input)) {
                Ok(Validation::Valid)
            } else {
                Ok(Validation::Invalid(REQUIRED_MESSAGE.into()))
            }
        })
        .prompt()
        .context("Failed to read post body")
}

/// Offer to resubmit the same body after a failed publish
pub fn confirm_retry() -> Result<bool> {
    Confirm::new("Retry?")
        .with_default(true)
        .with_help_message("Publishes the same text at the same timestamp")
        .prompt()
        .context("Failed to get retry choice")
}
