//! HTTP access for evidence collection
//!
//! This module provides:
//! - `EvidenceTransport`, the seam between evidence logic and the network
//! - `HttpTransport`, a reqwest-backed implementation with a per-request
//!   timeout and User-Agent
//!
//! Nothing here retries: a failed fetch or probe is reported once and the
//! caller omits the corresponding evidence.

use super::links::encode_component;
use crate::error::RegistryError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;

/// Default npm registry base URL
pub const DEFAULT_REGISTRY_URL: &str = "https://registry.npmjs.org";

/// Default User-Agent header
const DEFAULT_USER_AGENT: &str = concat!("depwhy/", env!("CARGO_PKG_VERSION"));

/// Registry name used in error messages
const REGISTRY_NAME: &str = "npm";

/// Network operations needed to gather evidence
#[async_trait]
pub trait EvidenceTransport: Send + Sync {
    /// Fetch the registry metadata document for a package
    async fn fetch_registry(&self, package: &str) -> Result<Value, RegistryError>;

    /// Whether `url` answers a body-less request with a 2xx or 3xx status
    async fn probe(&self, url: &str) -> bool;
}

/// reqwest-backed transport
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    registry_url: String,
}

impl HttpTransport {
    /// Create a transport against `registry_url` with a per-request timeout
    pub fn new(registry_url: &str, timeout: Duration) -> Result<Self, RegistryError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(DEFAULT_USER_AGENT)
            .build()
            .map_err(|e| {
                RegistryError::network_error(
                    "",
                    "HTTP client",
                    format!("failed to create HTTP client: {}", e),
                )
            })?;

        Ok(Self {
            client,
            registry_url: registry_url.trim_end_matches('/').to_string(),
        })
    }

    /// Build the metadata URL for a package
    fn build_url(&self, package: &str) -> String {
        format!("{}/{}", self.registry_url, encode_component(package))
    }
}

#[async_trait]
impl EvidenceTransport for HttpTransport {
    async fn fetch_registry(&self, package: &str) -> Result<Value, RegistryError> {
        let url = self.build_url(package);
        tracing::debug!(%url, "fetching registry metadata");

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RegistryError::timeout(package, REGISTRY_NAME)
                } else {
                    RegistryError::network_error(package, REGISTRY_NAME, e.to_string())
                }
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(RegistryError::package_not_found(package, REGISTRY_NAME));
        }
        if !status.is_success() {
            return Err(RegistryError::network_error(
                package,
                REGISTRY_NAME,
                format!("HTTP {}", status),
            ));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| RegistryError::InvalidResponse {
                package: package.to_string(),
                registry: REGISTRY_NAME.to_string(),
                message: format!("failed to parse JSON: {}", e),
            })
    }

    async fn probe(&self, url: &str) -> bool {
        match self.client.head(url).send().await {
            Ok(response) => {
                let status = response.status();
                tracing::debug!(%url, %status, "probed");
                status.is_success() || status.is_redirection()
            }
            Err(e) => {
                tracing::debug!(%url, error = %e, "probe failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    fn transport(base: &str) -> HttpTransport {
        HttpTransport::new(base, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_build_url() {
        let t = transport("https://registry.npmjs.org/");
        assert_eq!(t.build_url("lodash"), "https://registry.npmjs.org/lodash");
        assert_eq!(
            t.build_url("@types/node"),
            "https://registry.npmjs.org/%40types%2Fnode"
        );
    }

    #[test]
    fn test_default_constants() {
        assert!(DEFAULT_USER_AGENT.starts_with("depwhy/"));
        assert_eq!(DEFAULT_REGISTRY_URL, "https://registry.npmjs.org");
    }

    #[tokio::test]
    async fn test_fetch_registry_returns_document() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/lodash")
            .match_header("accept", "application/json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"name": "lodash", "versions": {"4.17.21": {}}}"#)
            .create_async()
            .await;

        let doc = transport(&server.url())
            .fetch_registry("lodash")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(doc["name"], "lodash");
    }

    #[tokio::test]
    async fn test_fetch_registry_not_found() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/nonexistent-package")
            .with_status(404)
            .create_async()
            .await;

        let result = transport(&server.url())
            .fetch_registry("nonexistent-package")
            .await;

        mock.assert_async().await;
        assert!(matches!(result, Err(RegistryError::PackageNotFound { .. })));
    }

    #[tokio::test]
    async fn test_fetch_registry_invalid_json() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/broken")
            .with_status(200)
            .with_body("<html>")
            .create_async()
            .await;

        let result = transport(&server.url()).fetch_registry("broken").await;
        assert!(matches!(result, Err(RegistryError::InvalidResponse { .. })));
    }

    #[tokio::test]
    async fn test_fetch_registry_server_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/flaky")
            .with_status(500)
            .create_async()
            .await;

        let result = transport(&server.url()).fetch_registry("flaky").await;
        assert!(matches!(result, Err(RegistryError::NetworkError { .. })));
    }

    #[tokio::test]
    async fn test_probe_statuses() {
        let mut server = Server::new_async().await;
        let ok = server
            .mock("HEAD", "/exists")
            .with_status(200)
            .create_async()
            .await;
        let missing = server
            .mock("HEAD", "/missing")
            .with_status(404)
            .create_async()
            .await;

        let t = transport(&server.url());
        assert!(t.probe(&format!("{}/exists", server.url())).await);
        assert!(!t.probe(&format!("{}/missing", server.url())).await);

        ok.assert_async().await;
        missing.assert_async().await;
    }

    #[tokio::test]
    async fn test_probe_unreachable_host() {
        let t = transport("http://127.0.0.1:9");
        assert!(!t.probe("http://127.0.0.1:9/nothing").await);
    }
}
