use std::sync::Arc;

use anyhow::{bail, Result};
use serde_json::json;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use campusgate::{
    AccessConfig, FilePermissionCache, HttpAuthority, IdentityStore, MemoryIdentityStore, PermissionLoader, Principal,
};

const ENV_TOKEN: &str = "CAMPUSGATE_TOKEN";

/// Exit status when the authority rejected the token or the principal.
const EXIT_TERMINAL_AUTH: i32 = 2;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries the JSON report
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (user_id, role) = match args.as_slice() {
        [u, r] => (u.clone(), r.clone()),
        _ => bail!("usage: campusgate <user-id> <role>   (token read from {})", ENV_TOKEN),
    };

    let cfg = AccessConfig::load()?;
    info!(
        target: "campusgate",
        "campusgate starting: api='{}', cache='{}', max_attempts={}, backoff_base_ms={}",
        cfg.api_base_url,
        cfg.cache_path.display(),
        cfg.max_attempts,
        cfg.backoff_base_ms
    );

    let principal = Principal::new(user_id, role);
    let identity = Arc::new(MemoryIdentityStore::new());
    identity.bind(principal.clone(), std::env::var(ENV_TOKEN).ok());

    let authority = Arc::new(HttpAuthority::new(&cfg.api_base_url, cfg.request_timeout())?);
    let cache = Arc::new(FilePermissionCache::new(cfg.cache_path.clone()));
    let loader = PermissionLoader::builder(identity.clone(), authority.clone(), cache).config(&cfg).build();

    loader.load_user_permissions(principal).await;

    let evaluator = loader.evaluator();
    let state = loader.state();
    let (http_requests, http_failures) = authority.stats();
    let report = json!({
        "principal": identity.current_principal(),
        "state": state,
        "error": state.error_message(),
        "accessibleFeatures": evaluator.accessible_features().iter().map(|f| f.id).collect::<Vec<_>>(),
        "accessibleComponents": evaluator.accessible_components(None).iter().map(|c| c.id).collect::<Vec<_>>(),
        "diagnostics": loader.diagnostics(),
        "http": { "requests": http_requests, "failures": http_failures },
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    if state.error.as_ref().is_some_and(|e| e.is_terminal()) {
        std::process::exit(EXIT_TERMINAL_AUTH);
    }
    Ok(())
}
