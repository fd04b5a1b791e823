use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use tokio::sync::watch;

use crate::tprintln;

use super::principal::Principal;
use super::provider::IdentityStore;
use super::token;

/// In-process identity holder. Principal changes are published on a watch
/// channel so the loader can react to identifier changes explicitly.
pub struct MemoryIdentityStore {
    token: RwLock<Option<String>>,
    principal_tx: watch::Sender<Option<Principal>>,
}

impl Default for MemoryIdentityStore {
    fn default() -> Self { Self::new() }
}

impl MemoryIdentityStore {
    pub fn new() -> Self {
        let (principal_tx, _) = watch::channel(None);
        Self { token: RwLock::new(None), principal_tx }
    }

    /// Login: publish the principal and the token that came with it.
    pub fn bind(&self, principal: Principal, token: Option<String>) {
        tprintln!("identity.bind user={} role={} token={}", principal.id, principal.role, token.is_some());
        *self.token.write() = token;
        self.principal_tx.send_replace(Some(principal));
    }

    /// Logout: drop both principal and token.
    pub fn unbind(&self) {
        let prev = self.principal_tx.send_replace(None);
        *self.token.write() = None;
        if let Some(p) = prev {
            tprintln!("identity.unbind user={}", p.id);
        }
    }

    pub fn set_token(&self, token: impl Into<String>) { *self.token.write() = Some(token.into()); }

    pub fn clear_token(&self) { *self.token.write() = None; }

    pub fn subscribe(&self) -> watch::Receiver<Option<Principal>> { self.principal_tx.subscribe() }
}

#[async_trait]
impl IdentityStore for MemoryIdentityStore {
    fn current_principal(&self) -> Option<Principal> { self.principal_tx.borrow().clone() }

    async fn access_token(&self) -> Option<String> { self.token.read().clone() }

    fn is_token_valid(&self, token: &str) -> bool { token::is_structurally_valid(token, Utc::now()) }
}
