//! Repository URL normalisation
//!
//! Registry metadata declares `repository` either as a string
//! (`git+https://github.com/lodash/lodash.git`, `github:owner/repo`,
//! `owner/repo`, ...) or as an object with a `url` field. Only GitHub
//! repositories are recognised.

use regex::Regex;
use serde_json::Value;
use std::fmt;
use std::sync::LazyLock;

static GITHUB_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://(?:www\.)?github\.com/([A-Za-z0-9_.-]+)/([A-Za-z0-9_.-]+?)(?:\.git)?(?:/.*)?$")
        .unwrap()
});

static SHORTHAND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9_.-]+)/([A-Za-z0-9_.-]+)$").unwrap()
});

/// A GitHub repository
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GitHubRepo {
    pub owner: String,
    pub repo: String,
}

impl GitHubRepo {
    /// `https://github.com/<owner>/<repo>`
    pub fn url(&self) -> String {
        format!("https://github.com/{}/{}", self.owner, self.repo)
    }

    /// Base URL for raw file content on the default branch
    pub fn raw_base(&self) -> String {
        format!(
            "https://raw.githubusercontent.com/{}/{}/HEAD",
            self.owner, self.repo
        )
    }
}

impl fmt::Display for GitHubRepo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url())
    }
}

/// Repository declared in a registry metadata document
pub fn repository_from_metadata(metadata: &Value) -> Option<GitHubRepo> {
    let raw = match metadata.get("repository")? {
        Value::String(s) => s.as_str(),
        Value::Object(obj) => obj.get("url")?.as_str()?,
        _ => return None,
    };
    normalize_repository_url(raw)
}

/// Normalise a repository declaration to a GitHub repository
pub fn normalize_repository_url(raw: &str) -> Option<GitHubRepo> {
    let mut url = raw.trim();
    if let Some(idx) = url.find('#') {
        url = &url[..idx];
    }

    if let Some(rest) = url.strip_prefix("github:") {
        return shorthand(rest);
    }
    if !url.contains(':') {
        return shorthand(url);
    }

    let url = url.strip_prefix("git+").unwrap_or(url);
    let url = if let Some(rest) = url.strip_prefix("git://") {
        format!("https://{}", rest)
    } else if let Some(rest) = url.strip_prefix("ssh://git@github.com/") {
        format!("https://github.com/{}", rest)
    } else if let Some(rest) = url.strip_prefix("git@github.com:") {
        format!("https://github.com/{}", rest)
    } else {
        url.to_string()
    };

    let caps = GITHUB_URL.captures(&url)?;
    Some(GitHubRepo {
        owner: caps[1].to_string(),
        repo: caps[2].to_string(),
    })
}

fn shorthand(path: &str) -> Option<GitHubRepo> {
    let path = path.trim_end_matches(".git");
    let caps = SHORTHAND.captures(path)?;
    Some(GitHubRepo {
        owner: caps[1].to_string(),
        repo: caps[2].to_string(),
    })
}
