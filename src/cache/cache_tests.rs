use super::*;
use crate::identity::Attrs;

fn principal() -> Principal {
    Principal::new("u-7", "TEACHER").with_attrs(Attrs {
        school_id: Some("sch-1".into()),
        department: Some("science".into()),
        last_login: None,
        is_active: Some(true),
    })
}

fn snapshot(perms: &[&str]) -> CachedSnapshot {
    CachedSnapshot::from_resolution(&principal(), &perms.iter().copied().collect())
}

#[test]
fn granted_skips_false_entries() {
    let mut snap = snapshot(&["student:read"]);
    snap.permissions.insert("exam:delete".into(), false);
    let g = snap.granted();
    assert!(g.contains("student:read"));
    assert!(!g.contains("exam:delete"));
    assert_eq!(g.len(), 1);
}

#[test]
fn slot_layout_uses_camel_case_and_omits_absent_fields() {
    let mut snap = snapshot(&["a:read"]);
    snap.department = None;
    let v = serde_json::to_value(&snap).unwrap();
    assert_eq!(v["userId"], "u-7");
    assert_eq!(v["schoolId"], "sch-1");
    assert_eq!(v["permissions"]["a:read"], true);
    assert!(v.get("department").is_none());
    assert!(v.get("cachedAt").is_some());
}

#[tokio::test]
async fn memory_cache_roundtrip_and_clear() {
    let cache = MemoryPermissionCache::new();
    assert!(cache.read().await.is_none());
    cache.write(&snapshot(&["a:read"])).await.unwrap();
    cache.write(&snapshot(&["b:read"])).await.unwrap();
    let got = cache.read().await.unwrap();
    assert!(got.granted().contains("b:read"));
    assert!(!got.granted().contains("a:read"));
    cache.clear().await.unwrap();
    assert!(cache.read().await.is_none());
}

#[tokio::test]
async fn file_cache_missing_file_is_no_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let cache = FilePermissionCache::new(dir.path().join("perms.json"));
    assert!(cache.read().await.is_none());
    cache.clear().await.unwrap();
}

#[tokio::test]
async fn file_cache_persists_across_instances() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("perms.json");
    FilePermissionCache::new(&path).write(&snapshot(&["x:read", "y:read"])).await.unwrap();
    assert!(!path.with_extension("json.tmp").exists());

    let got = FilePermissionCache::new(&path).read().await.unwrap();
    assert_eq!(got.user_id, "u-7");
    assert_eq!(got.granted().len(), 2);
}

#[tokio::test]
async fn file_cache_corrupt_json_is_no_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("perms.json");
    std::fs::write(&path, b"{not json").unwrap();
    assert!(FilePermissionCache::new(&path).read().await.is_none());
}

#[tokio::test]
async fn file_cache_accepts_slot_without_cached_at() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("perms.json");
    std::fs::write(&path, br#"{"permissions":{"report:read":true},"role":"STAFF","userId":"u-1"}"#).unwrap();
    let got = FilePermissionCache::new(&path).read().await.unwrap();
    assert_eq!(got.role, "STAFF");
    assert!(got.granted().contains("report:read"));
}
