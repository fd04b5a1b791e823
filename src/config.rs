//! Runtime settings: built-in defaults, then an optional JSON file, then
//! `CAMPUSGATE_*` environment variables.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const ENV_CONFIG: &str = "CAMPUSGATE_CONFIG";
pub const ENV_API_URL: &str = "CAMPUSGATE_API_URL";
pub const ENV_CACHE_PATH: &str = "CAMPUSGATE_CACHE_PATH";
pub const ENV_MAX_ATTEMPTS: &str = "CAMPUSGATE_MAX_ATTEMPTS";
pub const ENV_BACKOFF_BASE_MS: &str = "CAMPUSGATE_BACKOFF_BASE_MS";
pub const ENV_REQUEST_TIMEOUT_MS: &str = "CAMPUSGATE_REQUEST_TIMEOUT_MS";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccessConfig {
    pub api_base_url: String,
    pub cache_path: PathBuf,
    pub max_attempts: u32,
    pub backoff_base_ms: u64,
    pub request_timeout_ms: u64,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000/api".to_string(),
            cache_path: PathBuf::from(".campusgate/permissions.json"),
            max_attempts: 3,
            backoff_base_ms: 2_000,
            request_timeout_ms: 15_000,
        }
    }
}

/// One configuration layer. Unset values inherit from the layer below.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ConfigOverrides {
    pub api_base_url: Option<String>,
    pub cache_path: Option<PathBuf>,
    pub max_attempts: Option<u32>,
    pub backoff_base_ms: Option<u64>,
    pub request_timeout_ms: Option<u64>,
}

fn parse_num<T: std::str::FromStr>(key: &str, raw: Option<String>) -> Option<T> {
    let raw = raw?;
    match raw.trim().parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("ignoring {}={:?}: not a number", key, raw);
            None
        }
    }
}

impl ConfigOverrides {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_env() -> Self { Self::from_lookup(|k| std::env::var(k).ok()) }

    /// Environment layer read through `lookup`; malformed numbers are dropped with a warning.
    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
        let non_empty = |k: &str| lookup(k).filter(|v| !v.trim().is_empty());
        Self {
            api_base_url: non_empty(ENV_API_URL),
            cache_path: non_empty(ENV_CACHE_PATH).map(PathBuf::from),
            max_attempts: parse_num(ENV_MAX_ATTEMPTS, non_empty(ENV_MAX_ATTEMPTS)),
            backoff_base_ms: parse_num(ENV_BACKOFF_BASE_MS, non_empty(ENV_BACKOFF_BASE_MS)),
            request_timeout_ms: parse_num(ENV_REQUEST_TIMEOUT_MS, non_empty(ENV_REQUEST_TIMEOUT_MS)),
        }
    }
}

impl AccessConfig {
    /// Later layers win.
    pub fn from_layers(defaults: &AccessConfig, layers: &[&ConfigOverrides]) -> Self {
        let mut cfg = defaults.clone();
        for l in layers {
            if let Some(v) = &l.api_base_url { cfg.api_base_url = v.clone(); }
            if let Some(v) = &l.cache_path { cfg.cache_path = v.clone(); }
            if let Some(v) = l.max_attempts { cfg.max_attempts = v; }
            if let Some(v) = l.backoff_base_ms { cfg.backoff_base_ms = v; }
            if let Some(v) = l.request_timeout_ms { cfg.request_timeout_ms = v; }
        }
        cfg
    }

    /// Defaults, then the file named by `CAMPUSGATE_CONFIG` (if any), then the environment.
    pub fn load() -> Result<Self> {
        let file = match std::env::var(ENV_CONFIG).ok().filter(|p| !p.trim().is_empty()) {
            Some(p) => ConfigOverrides::from_file(Path::new(&p))?,
            None => ConfigOverrides::default(),
        };
        let env = ConfigOverrides::from_env();
        Ok(Self::from_layers(&AccessConfig::default(), &[&file, &env]))
    }

    pub fn backoff_base(&self) -> Duration { Duration::from_millis(self.backoff_base_ms) }

    pub fn request_timeout(&self) -> Duration { Duration::from_millis(self.request_timeout_ms) }
}
