//! Evidence collection
//!
//! For each candidate this module resolves:
//! - a version window from the registry's published versions
//! - an `npm diff` command between installed and target
//! - GitHub releases, changelog and compare links confirmed by probing
//!
//! Every network failure is contained: the affected link is omitted and the
//! rest of the candidate, and every other candidate, proceeds.

mod links;
mod repository;
mod session;
mod transport;
mod window;

pub use links::{compare_tag_pairs, encode_component, npm_diff_link, CHANGELOG_PATHS};
pub use repository::{normalize_repository_url, repository_from_metadata, GitHubRepo};
pub use session::{EvidenceConfig, EvidenceSession, DEFAULT_CONCURRENCY, DEFAULT_TIMEOUT};
pub use transport::{EvidenceTransport, HttpTransport, DEFAULT_REGISTRY_URL};
pub use window::{published_versions, version_window};
