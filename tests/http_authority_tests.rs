//! HttpAuthority against a local axum server standing in for the permission service.

mod common;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::extract::Path;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use campusgate::{
    HttpAuthority, LoadError, LoadStatus, MemoryPermissionCache, PermissionAuthority, PermissionLoader,
    PermissionSource, Principal, TransientCause,
};

const GOOD_TOKEN: &str = "good-token";

async fn effective(Path(user): Path<String>, headers: HeaderMap) -> Response {
    let bearer = headers.get("authorization").and_then(|v| v.to_str().ok()).unwrap_or("");
    if bearer != format!("Bearer {}", GOOD_TOKEN) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if headers.get("x-request-id").is_none() || headers.get("x-client-version").is_none() {
        return StatusCode::BAD_REQUEST.into_response();
    }
    match user.as_str() {
        "forbidden" => StatusCode::FORBIDDEN.into_response(),
        "boom" => (StatusCode::INTERNAL_SERVER_ERROR, "database unavailable").into_response(),
        "garbled" => (StatusCode::OK, "<html>maintenance</html>").into_response(),
        "rejected" => Json(json!({"success": false, "message": "denied by policy"})).into_response(),
        "object-data" => Json(json!({"success": true, "data": {"name": "student:read"}})).into_response(),
        "slow" => {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({"success": true, "data": []})).into_response()
        }
        other => Json(json!({
            "success": true,
            "data": [
                {"permission": {"name": "student:read"}},
                {"name": "attendance:read"},
                {"name": format!("user:{}", other)},
                {"unrelated": true}
            ]
        }))
        .into_response(),
    }
}

async fn serve() -> Result<SocketAddr> {
    let app = Router::new().route("/api/rbac/permissions/user/{user}/effective", get(effective));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(addr)
}

async fn authority() -> Result<HttpAuthority> {
    let addr = serve().await?;
    HttpAuthority::new(&format!("http://{}/api", addr), Duration::from_secs(2))
}

#[tokio::test]
async fn success_envelope_is_returned_verbatim() -> Result<()> {
    let a = authority().await?;
    let env = a.fetch_user_permissions("u 1", GOOD_TOKEN).await?;
    assert!(env.success);
    assert_eq!(env.entries().len(), 4);
    let perms = campusgate::loader::permissions_from_envelope(&env)?;
    assert!(perms.contains("student:read"));
    assert!(perms.contains("attendance:read"));
    assert!(perms.contains("user:u 1"));
    assert_eq!(perms.len(), 3);
    assert_eq!(a.stats(), (1, 0));
    Ok(())
}

#[tokio::test]
async fn status_codes_map_onto_the_error_taxonomy() -> Result<()> {
    let a = authority().await?;

    let e = a.fetch_user_permissions("u1", "stale-token").await.unwrap_err();
    assert!(matches!(e, LoadError::Authentication { .. }));

    let e = a.fetch_user_permissions("forbidden", GOOD_TOKEN).await.unwrap_err();
    assert!(matches!(e, LoadError::Authorization { .. }));

    let e = a.fetch_user_permissions("boom", GOOD_TOKEN).await.unwrap_err();
    assert!(matches!(e, LoadError::Transient { cause: TransientCause::Network, .. }));
    assert!(e.to_string().contains("database unavailable"));

    let e = a.fetch_user_permissions("garbled", GOOD_TOKEN).await.unwrap_err();
    assert!(matches!(e, LoadError::Transient { cause: TransientCause::Malformed, .. }));
    assert_eq!(a.stats(), (4, 4));
    Ok(())
}

#[tokio::test]
async fn rejected_and_non_array_envelopes_are_transient() -> Result<()> {
    let a = authority().await?;

    let env = a.fetch_user_permissions("rejected", GOOD_TOKEN).await?;
    let e = campusgate::loader::permissions_from_envelope(&env).unwrap_err();
    assert!(matches!(e, LoadError::Transient { cause: TransientCause::Rejected, .. }));

    let env = a.fetch_user_permissions("object-data", GOOD_TOKEN).await?;
    let e = campusgate::loader::permissions_from_envelope(&env).unwrap_err();
    assert!(matches!(e, LoadError::Transient { cause: TransientCause::Empty, .. }));
    Ok(())
}

#[tokio::test]
async fn timeout_is_a_network_failure() -> Result<()> {
    let addr = serve().await?;
    let a = HttpAuthority::new(&format!("http://{}/api", addr), Duration::from_millis(200))?;
    let e = a.fetch_user_permissions("slow", GOOD_TOKEN).await.unwrap_err();
    assert!(e.is_retryable());
    Ok(())
}

#[tokio::test]
async fn unreachable_host_is_a_network_failure() -> Result<()> {
    // bind then drop to get a port nobody listens on
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    drop(listener);
    let a = HttpAuthority::new(&format!("http://{}/api", addr), Duration::from_secs(1))?;
    let e = a.fetch_user_permissions("u1", GOOD_TOKEN).await.unwrap_err();
    assert!(matches!(e, LoadError::Transient { cause: TransientCause::Network, .. }));
    Ok(())
}

/// Loader wired to the real HTTP authority; the identity token here is a minted JWT,
/// which the stand-in server rejects, so the load must end terminal with no retry.
#[tokio::test]
async fn loader_over_http_rejected_token_is_terminal() -> Result<()> {
    let a = Arc::new(authority().await?);
    let p = Principal::new("t-1", "TEACHER");
    let loader = PermissionLoader::builder(common::signed_in(&p), a, Arc::new(MemoryPermissionCache::new())).build();
    loader.load_user_permissions(p).await;
    let d = loader.diagnostics();
    assert_eq!(d.state.load_status, LoadStatus::Error);
    assert_eq!(d.state.source, PermissionSource::Fallback);
    assert!(d.last_error.as_ref().is_some_and(|e| e.is_terminal()));
    assert!(!d.retry_pending);
    assert_eq!(
        d.state.error_message().as_deref(),
        Some("Authentication required. Please login to access permissions.")
    );
    Ok(())
}
