//! Structural access-token checks. Signature verification belongs to the remote
//! authority; here we only decide whether a token is worth sending at all.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use chrono::{DateTime, TimeZone, Utc};

/// Anything shorter cannot be a real signed JWT.
pub const MIN_TOKEN_LEN: usize = 50;

const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

fn payload(token: &str) -> Option<serde_json::Value> {
    let mut parts = token.split('.');
    let (_header, body, _sig) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() { return None; }
    // Accept standard-alphabet payloads too
    let normalized = body.replace('+', "-").replace('/', "_");
    let bytes = URL_SAFE_LENIENT.decode(normalized.as_bytes()).ok()?;
    serde_json::from_slice::<serde_json::Value>(&bytes).ok()
}

/// `exp` claim as a timestamp, when present and positive.
pub fn expiry(token: &str) -> Option<DateTime<Utc>> {
    let exp = payload(token)?.get("exp")?.as_f64()?;
    if exp <= 0.0 { return None; }
    Utc.timestamp_millis_opt((exp * 1000.0) as i64).single()
}

pub fn is_structurally_valid(token: &str, now: DateTime<Utc>) -> bool {
    if token.trim().is_empty() || token.len() < MIN_TOKEN_LEN { return false; }
    if token.split('.').count() != 3 { return false; }
    if payload(token).is_none() { return false; }
    match expiry(token) {
        Some(exp) => exp >= now,
        None => true,
    }
}
