//! Post builder: deterministic addressing for microblog entries
//!
//! A post's id, path and contents are a pure function of its body and the
//! instant it was written. Rebuilding with the same inputs lands on the same
//! path, so a retried publish can never create a second file.
//!
//! ```text
//! posts/2024/03/07/0ZAhLQE.md
//! ---
//! date: 2024-03-07T12:00:00Z
//! ---
//!
//! hello world
//! ```

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::shorthash;

/// Seed mixed into every id so digests don't line up with other users of the
/// same hash.
pub const NAMESPACE: &str = "39b1bb9f-e55c-4fdd-8fc2-8d39bf03e217";

/// Minimum id width; shorter digests are left-padded with `0`
pub const ID_WIDTH: usize = 7;

/// Root directory of posts inside the repository
pub const POSTS_DIR: &str = "posts";

const FRONTMATTER_DELIMITER: &str = "---";

/// One submission, ready to publish. Never persisted locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    /// ISO-8601, second precision, trailing `Z`
    pub timestamp: String,
    /// Repository-relative path, `posts/YYYY/MM/DD/<id>.md`
    pub path: String,
    pub contents: String,
}

impl Post {
    /// Build a post from raw body text and the submission instant.
    ///
    /// Does not validate `body`; callers reject blank input first.
    pub fn build(body: &str, now: DateTime<Utc>) -> Self {
        let timestamp = iso_timestamp(now);
        let id = post_id(body, &timestamp);
        let path = post_path(&timestamp, &id);
        let contents = render_contents(&timestamp, body);

        Self {
            id,
            timestamp,
            path,
            contents,
        }
    }

    /// File name component of the path
    pub fn filename(&self) -> String {
        format!("{}.md", self.id)
    }
}

/// `2024-03-07T12:00:00Z`; fractional seconds are truncated, not rounded.
pub fn iso_timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Zero-padded short hash of `<namespace>:<body>:<timestamp>`
pub fn post_id(body: &str, timestamp: &str) -> String {
    let seed = format!("{}:{}:{}", NAMESPACE, body, timestamp);
    format!("{:0>width$}", shorthash::digest(&seed), width = ID_WIDTH)
}

/// `posts/<year>/<month>/<day>/<id>.md`, date taken from `timestamp`
pub fn post_path(timestamp: &str, id: &str) -> String {
    let date = timestamp.split('T').next().unwrap_or(timestamp);
    format!("{}/{}/{}.md", POSTS_DIR, date.replace('-', "/"), id)
}

/// Front matter with a single `date` field, a blank line, the raw body and a newline
pub fn render_contents(timestamp: &str, body: &str) -> String {
    format!(
        "{delim}\ndate: {timestamp}\n{delim}\n\n{body}\n",
        delim = FRONTMATTER_DELIMITER,
        timestamp = timestamp,
        body = body
    )
}

#[derive(Debug, Deserialize)]
struct FrontMatter {
    date: String,
}

/// Read the `date` value back out of rendered contents.
///
/// Returns `None` when there is no front matter block or it has no `date`.
pub fn parse_date(contents: &str) -> Option<String> {
    let rest = contents.strip_prefix(FRONTMATTER_DELIMITER)?;
    let rest = rest.strip_prefix('\n')?;
    let end = rest.find(&format!("\n{}", FRONTMATTER_DELIMITER))?;

    let front: FrontMatter = serde_yaml::from_str(&rest[..end]).ok()?;
    Some(front.date)
}
