//! Evidence session
//!
//! One session serves one report run. It owns:
//! - the transport used for registry fetches and URL probes
//! - a registry cache keyed by package name
//! - a reachability cache keyed by URL
//! - a semaphore bounding the number of candidates resolved at once
//!
//! Cache slots are `OnceCell`s so concurrent candidates asking for the same
//! package or URL wait on a single in-flight request.

use super::links::{
    changelog_link, changelog_probe_url, compare_tag_pairs, compare_url, npm_diff_link,
    releases_link, releases_probe_url, CHANGELOG_PATHS,
};
use super::repository::{repository_from_metadata, GitHubRepo};
use super::transport::{EvidenceTransport, HttpTransport, DEFAULT_REGISTRY_URL};
use super::window::version_window;
use crate::domain::{Candidate, EnrichedCandidate, Evidence, EvidenceLinks, VersionWindow};
use crate::error::RegistryError;
use futures::future::join_all;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OnceCell, Semaphore};

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default number of candidates resolved concurrently
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Settings for evidence collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvidenceConfig {
    /// npm registry base URL
    pub registry_url: String,
    /// Per-request timeout for fetches and probes
    pub timeout: Duration,
    /// Maximum candidates resolved at once
    pub concurrency: usize,
}

impl Default for EvidenceConfig {
    fn default() -> Self {
        Self {
            registry_url: DEFAULT_REGISTRY_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

type Slot<T> = Arc<OnceCell<T>>;

/// Per-run evidence collector
pub struct EvidenceSession {
    transport: Arc<dyn EvidenceTransport>,
    timeout: Duration,
    limiter: Semaphore,
    registry_cache: Mutex<HashMap<String, Slot<Option<Arc<Value>>>>>,
    probe_cache: Mutex<HashMap<String, Slot<bool>>>,
}

impl EvidenceSession {
    /// Create a session over an arbitrary transport
    pub fn new(transport: Arc<dyn EvidenceTransport>, config: &EvidenceConfig) -> Self {
        Self {
            transport,
            timeout: config.timeout,
            limiter: Semaphore::new(config.concurrency.max(1)),
            registry_cache: Mutex::new(HashMap::new()),
            probe_cache: Mutex::new(HashMap::new()),
        }
    }

    /// Create a session over the HTTP transport
    pub fn with_http(config: &EvidenceConfig) -> Result<Self, RegistryError> {
        let transport = HttpTransport::new(&config.registry_url, config.timeout)?;
        Ok(Self::new(Arc::new(transport), config))
    }

    /// Resolve version windows and evidence for every candidate.
    ///
    /// Output order matches input order regardless of completion order.
    pub async fn collect_candidate_evidence(
        &self,
        candidates: &[Candidate],
    ) -> Vec<EnrichedCandidate> {
        self.collect_with(candidates, || {}).await
    }

    /// Like `collect_candidate_evidence`, calling `on_done` after each candidate
    pub async fn collect_with<F>(&self, candidates: &[Candidate], on_done: F) -> Vec<EnrichedCandidate>
    where
        F: Fn() + Sync,
    {
        let on_done = &on_done;
        join_all(candidates.iter().map(|candidate| async move {
            let enriched = self.resolve(candidate).await;
            on_done();
            enriched
        }))
        .await
    }

    async fn resolve(&self, candidate: &Candidate) -> EnrichedCandidate {
        // A closed semaphore only means running unbounded
        let _permit = self.limiter.acquire().await.ok();

        let name = candidate.package_name.as_str();
        let installed = candidate.current.version.as_deref();
        let target = candidate.target.version.as_deref();

        let mut links = EvidenceLinks::default();
        if let (Some(installed), Some(target)) = (installed, target) {
            links.npm_diff_link = Some(npm_diff_link(name, installed, target));
        }

        let Some(metadata) = self.registry(name).await else {
            return EnrichedCandidate {
                candidate: candidate.clone(),
                version_window: VersionWindow::default(),
                evidence: Evidence::from_links(links),
            };
        };

        let window = version_window(&metadata, installed, target);

        if let Some(repo) = repository_from_metadata(&metadata) {
            let (releases, changelog, compare) = tokio::join!(
                self.find_releases(&repo),
                self.find_changelog(&repo),
                self.find_compare(&repo, name, installed, target),
            );
            links.releases = releases;
            links.changelog = changelog;
            links.compare = compare;
        } else {
            tracing::debug!(package = name, "no GitHub repository in registry metadata");
        }

        EnrichedCandidate {
            candidate: candidate.clone(),
            version_window: window,
            evidence: Evidence::from_links(links),
        }
    }

    async fn find_releases(&self, repo: &GitHubRepo) -> Option<String> {
        self.probe(&releases_probe_url(repo))
            .await
            .then(|| releases_link(repo))
    }

    async fn find_changelog(&self, repo: &GitHubRepo) -> Option<String> {
        for path in CHANGELOG_PATHS.iter() {
            if self.probe(&changelog_probe_url(repo, path)).await {
                return Some(changelog_link(repo, path));
            }
        }
        None
    }

    async fn find_compare(
        &self,
        repo: &GitHubRepo,
        name: &str,
        installed: Option<&str>,
        target: Option<&str>,
    ) -> Option<String> {
        let (installed, target) = (installed?, target?);
        for (from, to) in compare_tag_pairs(name, installed, target) {
            let url = compare_url(repo, &from, &to);
            if self.probe(&url).await {
                return Some(url);
            }
        }
        None
    }

    /// Registry metadata for a package, fetched at most once per session
    async fn registry(&self, package: &str) -> Option<Arc<Value>> {
        let slot = {
            let mut cache = self.registry_cache.lock().await;
            cache.entry(package.to_string()).or_default().clone()
        };

        slot.get_or_init(|| async {
            match tokio::time::timeout(self.timeout, self.transport.fetch_registry(package)).await
            {
                Ok(Ok(metadata)) => Some(Arc::new(metadata)),
                Ok(Err(e)) => {
                    tracing::warn!(package, error = %e, "registry fetch failed");
                    None
                }
                Err(_) => {
                    tracing::warn!(package, "registry fetch timed out");
                    None
                }
            }
        })
        .await
        .clone()
    }

    /// Reachability of a URL, probed at most once per session
    async fn probe(&self, url: &str) -> bool {
        let slot = {
            let mut cache = self.probe_cache.lock().await;
            cache.entry(url.to_string()).or_default().clone()
        };

        *slot
            .get_or_init(|| async {
                tokio::time::timeout(self.timeout, self.transport.probe(url))
                    .await
                    .unwrap_or(false)
            })
            .await
    }
}
