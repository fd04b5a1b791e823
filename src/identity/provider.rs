use async_trait::async_trait;

use super::principal::Principal;

/// Read-only view of the authenticated session owned by the host application.
/// The permission engine never mutates identity; it only asks for the current
/// principal and a token it may forward to the remote authority.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    fn current_principal(&self) -> Option<Principal>;

    async fn access_token(&self) -> Option<String>;

    /// Cheap local check; a `false` here means the remote is never contacted.
    fn is_token_valid(&self, token: &str) -> bool;
}
