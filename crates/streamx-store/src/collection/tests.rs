use super::*;
use crate::error::StorageError;
use crate::storage::{MemoryStorage, StorageBackend};
use chrono::{TimeZone, Utc};
use std::sync::Arc;
use streamx_models::{DownloadEntry, DownloadQuality, RecentlyWatchedEntry, WatchlistEntry};

fn record(id: u64, title: &str) -> MediaRecord {
    MediaRecord::new(id, title)
}

fn watchlist_entry(id: u64, title: &str) -> WatchlistEntry {
    WatchlistEntry::from(record(id, title))
}

fn download_entry(id: u64, title: &str) -> DownloadEntry {
    let when = Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).unwrap();
    DownloadEntry::new(record(id, title), when, DownloadQuality::FullHd1080)
}

fn store_with(key: &str, content: &str) -> MediaStateStore {
    let backend = Arc::new(MemoryStorage::new());
    backend.set(key, content).unwrap();
    MediaStateStore::new(backend)
}

/// Backend whose reads work but whose writes always fail
struct ReadOnlyStorage(MemoryStorage);

impl StorageBackend for ReadOnlyStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.0.get(key)
    }

    fn set(&self, key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Io {
            key: key.to_string(),
            source: std::io::Error::new(std::io::ErrorKind::Other, "quota exceeded"),
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.0.remove(key)
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        self.0.keys()
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.0.clear()
    }
}

#[test]
fn test_load_empty_storage_is_empty() {
    let store = MediaStateStore::in_memory();
    assert!(store.watchlist().load().is_empty());
    assert!(store.continue_watching().load().is_empty());
    assert!(store.downloads().load().is_empty());
    assert!(store.recently_watched().load().is_empty());
}

#[test]
fn test_load_malformed_snapshot_is_empty() {
    let store = store_with("recentlyWatched", "[{\"id\": 1, \"title\": ");
    assert!(store.recently_watched().load().is_empty());
}

#[test]
fn test_load_wrong_shape_is_empty() {
    let store = store_with("watchlist", "{\"id\": 1}");
    assert!(store.watchlist().load().is_empty());
}

#[test]
fn test_add_keeps_entries_with_null_fields() {
    let store = store_with(
        "watchlist",
        r#"[{"id":1,"title":"Kept by web client","overview":null},{"id":2,"title":"Two","overview":"ok"}]"#,
    );

    let entries = store.watchlist().add(watchlist_entry(3, "Three")).unwrap();

    let ids: Vec<u64> = entries.iter().map(|e| e.media.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(entries[0].media.overview, "");
    assert_eq!(store.watchlist().len(), 3);
}

#[test]
fn test_unreadable_entry_skipped_on_load_and_kept_on_write() {
    let store = store_with(
        "watchlist",
        r#"[{"id":1,"title":"One"},{"id":7,"poster_path":"/no-title.jpg"}]"#,
    );

    let loaded = store.watchlist().load();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].media.id, 1);

    store.watchlist().add(watchlist_entry(2, "Two")).unwrap();
    store.watchlist().remove(1).unwrap();

    let raw = store.backend().get("watchlist").unwrap().unwrap();
    let values: Vec<serde_json::Value> = serde_json::from_str(&raw).unwrap();
    assert_eq!(values.len(), 2);
    assert_eq!(values[0]["id"], 2);
    assert_eq!(values[1]["id"], 7);
    assert_eq!(values[1]["poster_path"], "/no-title.jpg");
}

#[test]
fn test_add_then_load_round_trips_entry() {
    let store = MediaStateStore::in_memory();
    let entry = download_entry(550, "Fight Club");

    store.downloads().add(entry.clone()).unwrap();

    let loaded = store.downloads().load();
    assert_eq!(loaded, vec![entry]);
}

#[test]
fn test_add_returns_updated_snapshot() {
    let store = MediaStateStore::in_memory();
    store.watchlist().add(watchlist_entry(1, "One")).unwrap();
    let snapshot = store.watchlist().add(watchlist_entry(2, "Two")).unwrap();

    let ids: Vec<u64> = snapshot.iter().map(|e| e.media.id).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[test]
fn test_watchlist_add_is_idempotent() {
    let store = MediaStateStore::in_memory();
    store.watchlist().add(watchlist_entry(1, "One")).unwrap();
    store.watchlist().add(watchlist_entry(1, "One")).unwrap();

    assert_eq!(store.watchlist().len(), 1);
}

#[test]
fn test_downloads_add_is_idempotent() {
    let store = MediaStateStore::in_memory();
    store.downloads().add(download_entry(7, "Seven")).unwrap();
    let mut later = download_entry(7, "Seven");
    later.quality = DownloadQuality::Uhd4k;
    store.downloads().add(later).unwrap();

    let loaded = store.downloads().load();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].quality, DownloadQuality::FullHd1080);
}

#[test]
fn test_membership_re_add_ignores_new_content() {
    let store = MediaStateStore::in_memory();
    store.watchlist().add(watchlist_entry(1, "Original")).unwrap();
    store.watchlist().add(watchlist_entry(2, "Second")).unwrap();

    store.watchlist().add(watchlist_entry(1, "Different title")).unwrap();

    let loaded = store.watchlist().load();
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[0].media.id, 1);
    assert_eq!(loaded[0].media.title, "Original");
}

#[test]
fn test_recently_watched_re_add_replaces_in_place() {
    let store = MediaStateStore::in_memory();
    let first = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let second = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();

    store.recently_watched().add(RecentlyWatchedEntry::new(record(1, "A"), first)).unwrap();
    store.recently_watched().add(RecentlyWatchedEntry::new(record(2, "B"), first)).unwrap();
    store.recently_watched().add(RecentlyWatchedEntry::new(record(1, "A"), second)).unwrap();

    let loaded = store.recently_watched().load();
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[0].media.id, 1);
    assert_eq!(loaded[0].watched_at, second);
    assert_eq!(loaded[1].media.id, 2);
}

#[test]
fn test_replace_is_call_order_not_timestamp_order() {
    let store = MediaStateStore::in_memory();
    let newer = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
    let older = Utc.with_ymd_and_hms(2023, 5, 1, 0, 0, 0).unwrap();

    store.recently_watched().add(RecentlyWatchedEntry::new(record(1, "A"), newer)).unwrap();
    store.recently_watched().add(RecentlyWatchedEntry::new(record(1, "A"), older)).unwrap();

    assert_eq!(store.recently_watched().get(1).unwrap().watched_at, older);
}

#[test]
fn test_remove_present_id() {
    let store = store_with("downloads", r#"[{"id":1,"title":"Only","downloadedAt":"2024-01-01T00:00:00Z","quality":"720p","size":"1.2 GB"}]"#);
    assert_eq!(store.downloads().len(), 1);

    let snapshot = store.downloads().remove(1).unwrap();

    assert!(snapshot.is_empty());
    assert!(store.downloads().load().is_empty());
}

#[test]
fn test_remove_absent_id_is_noop() {
    let store = MediaStateStore::in_memory();
    store.watchlist().add(watchlist_entry(1, "One")).unwrap();

    let snapshot = store.watchlist().remove(404).unwrap();
    assert_eq!(snapshot.len(), 1);

    let empty = MediaStateStore::in_memory();
    assert!(empty.watchlist().remove(1).unwrap().is_empty());
}

#[test]
fn test_remove_only_touches_matching_id() {
    let store = MediaStateStore::in_memory();
    for id in 1..=3 {
        store.watchlist().add(watchlist_entry(id, "x")).unwrap();
    }
    store.watchlist().remove(2).unwrap();

    let ids: Vec<u64> = store.watchlist().load().iter().map(|e| e.media.id).collect();
    assert_eq!(ids, vec![1, 3]);
    assert!(!store.watchlist().contains(2));
}

#[test]
fn test_update_progress_last_write_wins() {
    let store = MediaStateStore::in_memory();
    let t1 = Utc.with_ymd_and_hms(2024, 3, 1, 20, 0, 0).unwrap();
    let t2 = Utc.with_ymd_and_hms(2024, 3, 2, 21, 0, 0).unwrap();

    store.continue_watching().update_progress(record(9, "Nine"), 40.0, t1).unwrap();
    store.continue_watching().update_progress(record(9, "Nine"), 75.0, t2).unwrap();

    let loaded = store.continue_watching().load();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].progress, 75.0);
    assert_eq!(loaded[0].last_watched, t2);
}

#[test]
fn test_update_progress_keeps_stored_record() {
    let store = MediaStateStore::in_memory();
    let now = Utc::now();
    store.continue_watching().update_progress(record(9, "Stored"), 10.0, now).unwrap();
    store.continue_watching().update_progress(record(9, "Ignored"), 20.0, now).unwrap();

    assert_eq!(store.continue_watching().get(9).unwrap().media.title, "Stored");
}

#[test]
fn test_update_progress_clamps() {
    let store = MediaStateStore::in_memory();
    let now = Utc::now();
    store.continue_watching().update_progress(record(1, "Over"), 180.0, now).unwrap();
    store.continue_watching().update_progress(record(2, "Under"), -5.0, now).unwrap();

    assert_eq!(store.continue_watching().get(1).unwrap().progress, 100.0);
    assert_eq!(store.continue_watching().get(2).unwrap().progress, 0.0);
}

#[test]
fn test_continue_watching_add_replaces() {
    let store = MediaStateStore::in_memory();
    let t1 = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
    let t2 = Utc.with_ymd_and_hms(2024, 3, 5, 0, 0, 0).unwrap();

    store.continue_watching().add(ContinueWatchingEntry::new(record(3, "Three"), 15.0, t1)).unwrap();
    store.continue_watching().add(ContinueWatchingEntry::new(record(3, "Three"), 60.0, t2)).unwrap();

    let loaded = store.continue_watching().load();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].progress, 60.0);
}

#[test]
fn test_duplicate_ids_in_stored_snapshot_are_collapsed() {
    let store = store_with(
        "watchlist",
        r#"[{"id":1,"title":"First"},{"id":2,"title":"Two"},{"id":1,"title":"Dup"}]"#,
    );
    let loaded = store.watchlist().load();
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[0].media.title, "First");

    store.watchlist().add(watchlist_entry(3, "Three")).unwrap();
    assert_eq!(store.watchlist().len(), 3);
}

#[test]
fn test_collections_are_independent() {
    let store = MediaStateStore::in_memory();
    store.watchlist().add(watchlist_entry(1, "One")).unwrap();
    store.downloads().add(download_entry(1, "One")).unwrap();

    store.watchlist().remove(1).unwrap();

    assert!(store.watchlist().is_empty());
    assert!(store.downloads().contains(1));
}

#[test]
fn test_snapshot_is_plain_json_array() {
    let backend = Arc::new(MemoryStorage::new());
    let store = MediaStateStore::new(backend.clone());
    store.watchlist().add(watchlist_entry(5, "Five")).unwrap();

    let raw = backend.get("watchlist").unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert!(value.is_array());
    assert_eq!(value[0]["id"], 5);
    assert_eq!(value[0]["title"], "Five");
}

#[test]
fn test_write_failure_propagates() {
    let store = MediaStateStore::new(Arc::new(ReadOnlyStorage(MemoryStorage::new())));

    let result = store.watchlist().add(watchlist_entry(1, "One"));
    assert!(matches!(result, Err(StoreError::Storage(StorageError::Io { .. }))));

    let result = store.continue_watching().update_progress(record(1, "One"), 50.0, Utc::now());
    assert!(result.is_err());
}

#[test]
fn test_failed_write_emits_no_event() {
    let store = MediaStateStore::new(Arc::new(ReadOnlyStorage(MemoryStorage::new())));
    let mut events = store.subscribe();

    let _ = store.watchlist().add(watchlist_entry(1, "One"));
    assert!(events.try_recv().is_err());
}

#[test]
fn test_handle_reports_collection() {
    let store = MediaStateStore::in_memory();
    assert_eq!(store.watchlist().collection(), Collection::Watchlist);
    assert_eq!(store.downloads().collection(), Collection::Downloads);
}
