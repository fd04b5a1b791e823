use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{StatusCode, Url};
use tracing::{debug, warn};

use crate::error::{LoadError, LoadResult};

use super::normalize::RemoteEnvelope;

pub const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Authoritative permission source. Implementations classify failures into the
/// load error taxonomy; they never fall back on their own.
#[async_trait]
pub trait PermissionAuthority: Send + Sync {
    async fn fetch_user_permissions(&self, principal_id: &str, token: &str) -> LoadResult<RemoteEnvelope>;
}

/// Request counters for one authority; clones share them.
#[derive(Debug, Default)]
struct HttpStats {
    requests: AtomicU64,
    failures: AtomicU64,
}

/// `GET {base}/rbac/permissions/user/{id}/effective` over reqwest.
#[derive(Clone)]
pub struct HttpAuthority {
    base: Url,
    client: reqwest::Client,
    stats: Arc<HttpStats>,
}

impl HttpAuthority {
    pub fn new(base: &str, timeout: Duration) -> Result<Self> {
        let base = Url::parse(base).context("invalid api base URL")?;
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { base, client, stats: Arc::new(HttpStats::default()) })
    }

    pub fn base(&self) -> &Url { &self.base }

    /// (requests, failures) issued through this authority.
    pub fn stats(&self) -> (u64, u64) {
        (self.stats.requests.load(Ordering::Relaxed), self.stats.failures.load(Ordering::Relaxed))
    }

    pub fn effective_permissions_url(&self, principal_id: &str) -> String {
        format!(
            "{}/rbac/permissions/user/{}/effective",
            self.base.as_str().trim_end_matches('/'),
            urlencoding::encode(principal_id)
        )
    }

    fn headers(token: &str) -> LoadResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| LoadError::authentication("token is not a valid header value"))?;
        headers.insert(AUTHORIZATION, bearer);
        if let Ok(v) = HeaderValue::from_str(&uuid::Uuid::new_v4().to_string()) {
            headers.insert("x-request-id", v);
        }
        headers.insert("x-client-version", HeaderValue::from_static(CLIENT_VERSION));
        Ok(headers)
    }
}

fn classify_status(status: StatusCode, body: &str) -> LoadError {
    match status {
        StatusCode::UNAUTHORIZED => LoadError::authentication(format!("HTTP {}", status)),
        StatusCode::FORBIDDEN => LoadError::authorization(format!("HTTP {}", status)),
        _ => {
            let snippet: String = body.chars().take(200).collect();
            LoadError::network(format!("HTTP {}: {}", status, snippet))
        }
    }
}

#[async_trait]
impl PermissionAuthority for HttpAuthority {
    async fn fetch_user_permissions(&self, principal_id: &str, token: &str) -> LoadResult<RemoteEnvelope> {
        self.stats.requests.fetch_add(1, Ordering::Relaxed);
        let url = self.effective_permissions_url(principal_id);
        debug!(target: "campusgate::authority", "GET {}", url);
        let outcome = async {
            let resp = self
                .client
                .get(&url)
                .headers(Self::headers(token)?)
                .send()
                .await
                .map_err(|e| LoadError::network(e.to_string()))?;
            let status = resp.status();
            let body = resp.text().await.map_err(|e| LoadError::network(e.to_string()))?;
            if !status.is_success() {
                return Err(classify_status(status, &body));
            }
            serde_json::from_str::<RemoteEnvelope>(&body).map_err(|e| LoadError::malformed(e.to_string()))
        }
        .await;
        if let Err(e) = &outcome {
            self.stats.failures.fetch_add(1, Ordering::Relaxed);
            warn!(target: "campusgate::authority", "fetch for user={} failed: {}", principal_id, e);
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_encodes_principal_and_keeps_base_path() {
        let a = HttpAuthority::new("http://localhost:5000/api/", Duration::from_secs(1)).unwrap();
        assert_eq!(
            a.effective_permissions_url("a b/c"),
            "http://localhost:5000/api/rbac/permissions/user/a%20b%2Fc/effective"
        );
    }

    #[test]
    fn fresh_authority_has_no_traffic() {
        let a = HttpAuthority::new("http://localhost:5000/api", Duration::from_secs(1)).unwrap();
        assert_eq!(a.clone().stats(), (0, 0));
    }

    #[test]
    fn rejects_garbage_base() {
        assert!(HttpAuthority::new("not a url", Duration::from_secs(1)).is_err());
    }

    #[test]
    fn status_mapping() {
        assert!(matches!(classify_status(StatusCode::UNAUTHORIZED, ""), LoadError::Authentication { .. }));
        assert!(matches!(classify_status(StatusCode::FORBIDDEN, ""), LoadError::Authorization { .. }));
        let e = classify_status(StatusCode::BAD_GATEWAY, "upstream");
        assert!(e.is_retryable());
        assert!(e.to_string().contains("502"));
    }
}
