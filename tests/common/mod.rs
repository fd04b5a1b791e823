//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use parking_lot::Mutex;
use serde_json::json;
use tokio::sync::Semaphore;

use campusgate::{LoadError, LoadResult, MemoryIdentityStore, PermissionAuthority, Principal, RemoteEnvelope};

/// Structurally valid JWT that expires in an hour. Unsigned; nothing here verifies it.
pub fn mint_token(sub: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let exp = chrono::Utc::now().timestamp() + 3600;
    let body = URL_SAFE_NO_PAD.encode(json!({ "sub": sub, "exp": exp }).to_string().as_bytes());
    format!("{}.{}.{}", header, body, "dGVzdC1zaWduYXR1cmUtbm90LXZlcmlmaWVk")
}

pub fn signed_in(principal: &Principal) -> Arc<MemoryIdentityStore> {
    let store = Arc::new(MemoryIdentityStore::new());
    store.bind(principal.clone(), Some(mint_token(&principal.id)));
    store
}

pub fn granted(names: &[&str]) -> LoadResult<RemoteEnvelope> {
    let data: Vec<_> = names.iter().map(|n| json!({ "name": n })).collect();
    Ok(RemoteEnvelope::ok(json!(data)))
}

pub fn unreachable() -> LoadResult<RemoteEnvelope> { Err(LoadError::network("connection refused")) }

type Responder = Box<dyn Fn(&str, usize) -> LoadResult<RemoteEnvelope> + Send + Sync>;

/// Authority whose answers come from a closure over (principal id, call index).
/// Optionally parks every call on a semaphore until the test releases it.
pub struct MockAuthority {
    respond: Responder,
    calls: AtomicUsize,
    seen: Mutex<Vec<(String, String)>>,
    gate: Option<Arc<Semaphore>>,
}

impl MockAuthority {
    pub fn new(respond: impl Fn(&str, usize) -> LoadResult<RemoteEnvelope> + Send + Sync + 'static) -> Self {
        Self { respond: Box::new(respond), calls: AtomicUsize::new(0), seen: Mutex::new(Vec::new()), gate: None }
    }

    pub fn always(result: LoadResult<RemoteEnvelope>) -> Self { Self::new(move |_, _| result.clone()) }

    pub fn gated(mut self) -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        self.gate = Some(gate.clone());
        (self, gate)
    }

    pub fn calls(&self) -> usize { self.calls.load(Ordering::SeqCst) }

    /// (principal id, bearer token) per call.
    pub fn seen(&self) -> Vec<(String, String)> { self.seen.lock().clone() }

    pub async fn wait_for_calls(&self, n: usize) {
        while self.calls() < n {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait]
impl PermissionAuthority for MockAuthority {
    async fn fetch_user_permissions(&self, principal_id: &str, token: &str) -> LoadResult<RemoteEnvelope> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().push((principal_id.to_string(), token.to_string()));
        if let Some(g) = &self.gate {
            g.acquire().await.expect("gate closed").forget();
        }
        (self.respond)(principal_id, n)
    }
}
