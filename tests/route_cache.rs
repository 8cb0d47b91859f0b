//! Cache staleness tests for the route loader.

use std::fs::{self, File};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use routerunner::cache::{CacheEntry, FileCache, RouteCache};
use routerunner::routing::{compile, RouteLoader, RouteOrigin};
use routerunner::RouterError;

mod common;

fn set_mtime(path: &Path, time: SystemTime) {
    File::options().write(true).open(path).unwrap().set_modified(time).unwrap();
}

fn epoch(secs: u64) -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(secs)
}

#[test]
fn test_fresh_entry_is_served_without_rewrite() {
    let path = common::write_routes("GET / HomeController->index\n");
    set_mtime(&path, epoch(1_000));

    let cache = Arc::new(common::CountingCache::default());
    let loader = RouteLoader::with_cache(cache.clone());

    let first = loader.load(&path).unwrap();
    assert_eq!(first.origin, RouteOrigin::Parsed);
    assert_eq!(cache.writes(), 1);
    assert_eq!(cache.read().unwrap().timestamp, epoch(1_000));

    let second = loader.load(&path).unwrap();
    assert_eq!(second.origin, RouteOrigin::Cache);
    assert_eq!(second.routes, first.routes);
    assert_eq!(cache.writes(), 1);

    fs::remove_file(&path).unwrap_or_default();
}

#[test]
fn test_cached_table_wins_while_timestamp_matches() {
    let path = common::write_routes("GET / HomeController->index\n");
    set_mtime(&path, epoch(2_000));

    // An entry that differs from the file but carries the same timestamp.
    let cache = Arc::new(common::CountingCache::default());
    let cached = vec![compile("POST /cached CachedController->hit").unwrap()];
    cache.write(&CacheEntry::new(epoch(2_000), cached.clone())).unwrap();

    let loaded = RouteLoader::with_cache(cache.clone()).load(&path).unwrap();
    assert_eq!(loaded.origin, RouteOrigin::Cache);
    assert_eq!(loaded.routes, cached);
    assert_eq!(cache.writes(), 1);

    fs::remove_file(&path).unwrap_or_default();
}

#[test]
fn test_changed_timestamp_reparses_and_overwrites() {
    let path = common::write_routes("GET / HomeController->index\n");
    set_mtime(&path, epoch(3_000));

    let cache = Arc::new(common::CountingCache::default());
    let loader = RouteLoader::with_cache(cache.clone());
    loader.load(&path).unwrap();

    fs::write(&path, "GET / HomeController->index\nPOST /users UserController->create\n").unwrap();
    set_mtime(&path, epoch(3_001));

    let loaded = loader.load(&path).unwrap();
    assert_eq!(loaded.origin, RouteOrigin::Refreshed);
    assert_eq!(loaded.routes.len(), 2);
    assert_eq!(cache.writes(), 2);

    let entry = cache.read().unwrap();
    assert_eq!(entry.timestamp, epoch(3_001));
    assert_eq!(entry.routes, loaded.routes);

    assert_eq!(loader.load(&path).unwrap().origin, RouteOrigin::Cache);

    fs::remove_file(&path).unwrap_or_default();
}

#[test]
fn test_file_cache_staleness_round_trip() {
    let path = common::write_routes(common::APP_ROUTES);
    set_mtime(&path, epoch(4_000));
    let cache = Arc::new(FileCache::new(common::temp_path("json")));
    let loader = RouteLoader::with_cache(cache.clone());

    assert_eq!(loader.load(&path).unwrap().origin, RouteOrigin::Parsed);
    assert!(cache.filled());
    assert_eq!(loader.load(&path).unwrap().origin, RouteOrigin::Cache);

    set_mtime(&path, epoch(4_500));
    assert_eq!(loader.load(&path).unwrap().origin, RouteOrigin::Refreshed);
    assert_eq!(cache.read().unwrap().timestamp, epoch(4_500));

    cache.clear().unwrap();
    assert!(!cache.filled());
    fs::remove_file(&path).unwrap_or_default();
}

#[test]
fn test_corrupt_cache_falls_back_to_parsing() {
    let path = common::write_routes(common::APP_ROUTES);
    let cache = Arc::new(FileCache::new(common::temp_path("json")));
    fs::write(cache.path(), "[1, 2").unwrap();

    let loaded = RouteLoader::with_cache(cache.clone()).load(&path).unwrap();
    assert_eq!(loaded.origin, RouteOrigin::Refreshed);
    assert_eq!(loaded.routes.len(), 6);
    assert_eq!(cache.read().unwrap().routes, loaded.routes);

    cache.clear().unwrap();
    fs::remove_file(&path).unwrap_or_default();
}

#[test]
fn test_unusable_cache_is_bypassed() {
    let path = common::write_routes(common::APP_ROUTES);
    let missing_dir = std::env::temp_dir().join(uuid::Uuid::new_v4().to_string());
    let cache = Arc::new(FileCache::new(missing_dir.join("cache.json")));

    let loaded = RouteLoader::with_cache(cache).load(&path).unwrap();
    assert_eq!(loaded.origin, RouteOrigin::Direct);
    assert!(!missing_dir.exists());

    fs::remove_file(&path).unwrap_or_default();
}

#[test]
fn test_grammar_error_does_not_touch_cache() {
    let path = common::write_routes("GET / HomeController->index\nGET /broken\n");
    let cache = Arc::new(common::CountingCache::default());

    let err = RouteLoader::with_cache(cache.clone()).load(&path).unwrap_err();
    match err {
        RouterError::Grammar(e) => assert_eq!(e.line(), Some(2)),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(cache.writes(), 0);
    assert!(!cache.filled());

    fs::remove_file(&path).unwrap_or_default();
}

#[test]
fn test_missing_source_fails_even_with_cache_entry() {
    let path = common::temp_path("routes");
    let cache = Arc::new(common::CountingCache::default());
    cache.write(&CacheEntry::new(epoch(1), Vec::new())).unwrap();

    let err = RouteLoader::with_cache(cache.clone()).load(&path).unwrap_err();
    assert!(matches!(err, RouterError::SourceUnavailable { .. }));
    assert_eq!(cache.reads(), 0);
}

#[test]
fn test_failed_cache_write_is_swallowed() {
    let path = common::write_routes(common::APP_ROUTES);
    set_mtime(&path, epoch(5_000));

    let cache = Arc::new(common::ReadOnlyCache::default());
    let loaded = RouteLoader::with_cache(cache.clone()).load(&path).unwrap();
    assert_eq!(loaded.origin, RouteOrigin::Parsed);
    assert_eq!(loaded.routes.len(), 6);
    assert_eq!(cache.writes.load(std::sync::atomic::Ordering::SeqCst), 1);

    let stale = Arc::new(common::ReadOnlyCache {
        entry: Some(CacheEntry::new(epoch(4_999), Vec::new())),
        ..Default::default()
    });
    let loaded = RouteLoader::with_cache(stale.clone()).load(&path).unwrap();
    assert_eq!(loaded.origin, RouteOrigin::Refreshed);
    assert_eq!(loaded.routes.len(), 6);
    assert_eq!(stale.writes.load(std::sync::atomic::Ordering::SeqCst), 1);

    fs::remove_file(&path).unwrap_or_default();
}

#[cfg(unix)]
#[test]
fn test_unreadable_source_fails_even_with_fresh_cache() {
    use std::os::unix::fs::PermissionsExt;

    let path = common::write_routes(common::APP_ROUTES);
    let cache = Arc::new(common::CountingCache::default());
    let loader = RouteLoader::with_cache(cache.clone());
    assert_eq!(loader.load(&path).unwrap().origin, RouteOrigin::Parsed);

    fs::set_permissions(&path, fs::Permissions::from_mode(0o000)).unwrap();
    // Privileged users can read regardless of mode bits.
    if fs::read(&path).is_ok() {
        fs::remove_file(&path).unwrap_or_default();
        return;
    }

    let err = loader.load(&path).unwrap_err();
    assert!(matches!(err, RouterError::SourceUnavailable { .. }));
    assert_eq!(cache.reads(), 0);

    fs::remove_file(&path).unwrap_or_default();
}
