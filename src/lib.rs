pub mod access;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod identity;
pub mod loader;

pub use access::{AccessEvaluator, LoadStatus, PermissionSet, PermissionSource, ResolvedAccessState, DEFAULT_ACTION, WILDCARD};
pub use cache::{CachedSnapshot, FilePermissionCache, MemoryPermissionCache, PermissionCache};
pub use catalog::{AccessLevel, Catalog, ComponentDescriptor, FallbackPolicyTable, FeatureDescriptor};
pub use config::AccessConfig;
pub use error::{CacheError, LoadError, LoadResult, TokenProblem, TransientCause};
pub use identity::{IdentityStore, MemoryIdentityStore, Principal};
pub use loader::{
    HttpAuthority, LoaderDiagnostics, PermissionAuthority, PermissionLoader, PermissionLoaderBuilder, RemoteEnvelope, RetryState,
};

// Test-only printing helper: expands to eprintln! during tests and debug builds, absent otherwise.
// Usage: tprintln!("debug: {}", value);
#[cfg(any(test, debug_assertions))]
#[macro_export]
macro_rules! tprintln {
    ($($arg:tt)*) => ( eprintln!($($arg)*) );
}

// In release builds, provide a no-op tprintln! so calls compile without effect.
#[cfg(not(any(test, debug_assertions)))]
#[macro_export]
macro_rules! tprintln {
    ($($arg:tt)*) => ({
        // Preserve formatting checks in release without producing code
        if false { let _ = format!($($arg)*); }
    });
}
