//! Permission acquisition: remote authority, then persisted snapshot, then the
//! per-role fallback table, with bounded retries in between.

mod authority;
mod diagnostics;
#[allow(clippy::module_inception)]
mod loader;
mod normalize;
mod retry;

pub use authority::{HttpAuthority, PermissionAuthority, CLIENT_VERSION};
pub use diagnostics::LoaderDiagnostics;
pub use loader::{PermissionLoader, PermissionLoaderBuilder};
pub use normalize::{normalize, permissions_from_envelope, PermissionEntry, RemoteEnvelope};
pub use retry::{backoff_delay, RetryState};
