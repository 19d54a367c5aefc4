use std::fmt;

use serde::{Deserialize, Serialize};

/// Repository coordinate, parsed from an `owner/name` string.
///
/// Nothing beyond the split is checked: a malformed value shows up as a
/// rejected request, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoCoordinate {
    pub owner: String,
    pub name: String,
}

impl RepoCoordinate {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// First two `/`-separated segments; missing segments are empty
    pub fn parse(value: &str) -> Self {
        let mut parts = value.split('/');
        let owner = parts.next().unwrap_or_default();
        let name = parts.next().unwrap_or_default();
        Self::new(owner, name)
    }
}

impl fmt::Display for RepoCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_owner_name() {
        let repo = RepoCoordinate::parse("octocat/microblog");
        assert_eq!(repo, RepoCoordinate::new("octocat", "microblog"));
        assert_eq!(repo.to_string(), "octocat/microblog");
    }

    #[test]
    fn test_parse_malformed_is_not_rejected() {
        assert_eq!(RepoCoordinate::parse("octocat"), RepoCoordinate::new("octocat", ""));
        assert_eq!(RepoCoordinate::parse(""), RepoCoordinate::new("", ""));
        assert_eq!(RepoCoordinate::parse("a/b/c"), RepoCoordinate::new("a", "b"));
    }
}
