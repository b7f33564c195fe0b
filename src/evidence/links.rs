//! Evidence link construction
//!
//! Pure functions: nothing in this module touches the network.

use super::repository::GitHubRepo;
use std::sync::LazyLock;

/// Conventional changelog file names
const CHANGELOG_NAMES: &[&str] = &[
    "CHANGELOG.md",
    "CHANGELOG",
    "CHANGES.md",
    "HISTORY.md",
    "NEWS.md",
    "RELEASES.md",
];

/// Changelog locations in probe order: each name at the repository root,
/// then lowercased, then both again under `docs/`
pub static CHANGELOG_PATHS: LazyLock<Vec<String>> = LazyLock::new(|| {
    let in_root: Vec<String> = CHANGELOG_NAMES
        .iter()
        .map(|name| name.to_string())
        .chain(CHANGELOG_NAMES.iter().map(|name| name.to_lowercase()))
        .collect();
    let in_docs: Vec<String> = in_root.iter().map(|path| format!("docs/{}", path)).collect();
    in_root.into_iter().chain(in_docs).collect()
});

/// Percent-encode a string for use as a single URL path segment
pub fn encode_component(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// `npm diff` command comparing the two published versions
pub fn npm_diff_link(package: &str, installed: &str, target: &str) -> String {
    format!(
        "npm diff --diff={}@{} --diff={}@{}",
        package, installed, package, target
    )
}

/// Candidate `(from, to)` tag pairs in priority order
pub fn compare_tag_pairs(package: &str, installed: &str, target: &str) -> Vec<(String, String)> {
    let mut pairs = vec![
        (format!("v{}", installed), format!("v{}", target)),
        (installed.to_string(), target.to_string()),
        (
            format!("{}@{}", package, installed),
            format!("{}@{}", package, target),
        ),
    ];
    if let Some((_, unscoped)) = package
        .strip_prefix('@')
        .and_then(|rest| rest.split_once('/'))
    {
        pairs.push((
            format!("{}@{}", unscoped, installed),
            format!("{}@{}", unscoped, target),
        ));
    }
    pairs
}

/// `<repo>/compare/<from>...<to>`
pub fn compare_url(repo: &GitHubRepo, from_tag: &str, to_tag: &str) -> String {
    format!(
        "{}/compare/{}...{}",
        repo.url(),
        encode_component(from_tag),
        encode_component(to_tag)
    )
}

/// URL probed to confirm that the repository publishes releases
pub fn releases_probe_url(repo: &GitHubRepo) -> String {
    format!("{}/releases/latest", repo.url())
}

pub fn releases_link(repo: &GitHubRepo) -> String {
    format!("{}/releases", repo.url())
}

/// Raw-content URL probed for a changelog path
pub fn changelog_probe_url(repo: &GitHubRepo, path: &str) -> String {
    format!("{}/{}", repo.raw_base(), path)
}

/// Browsable link to a changelog path
pub fn changelog_link(repo: &GitHubRepo, path: &str) -> String {
    format!("{}/blob/HEAD/{}", repo.url(), path)
}
