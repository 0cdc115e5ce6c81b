use crate::collection::{CollectionHandle, Snapshot};
use crate::entry::CollectionEntry;
use crate::error::{Result, StoreError};
use crate::events::{ChangeKind, StoreEvent};
use crate::storage::{FileStorage, MemoryStorage, StorageBackend};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::PathBuf;
use std::sync::Arc;
use streamx_models::{
    Collection, ContinueWatchingEntry, DownloadEntry, MediaRecord, RecentlyWatchedEntry, UserSettings,
    WatchlistEntry,
};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

const SETTINGS_KEY: &str = "userSettings";
const EVENT_CAPACITY: usize = 64;

/// Sole writer of the persisted media-state slots.
///
/// Cheap to clone; clones share the backend and the event channel.
#[derive(Clone)]
pub struct MediaStateStore {
    backend: Arc<dyn StorageBackend>,
    events: broadcast::Sender<StoreEvent>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CollectionCounts {
    pub watchlist: usize,
    pub continue_watching: usize,
    pub downloads: usize,
    pub recently_watched: usize,
}

impl CollectionCounts {
    pub fn get(&self, collection: Collection) -> usize {
        match collection {
            Collection::Watchlist => self.watchlist,
            Collection::ContinueWatching => self.continue_watching,
            Collection::Downloads => self.downloads,
            Collection::RecentlyWatched => self.recently_watched,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RefreshSummary {
    /// Entries whose catalog record changed, per collection
    pub updated: BTreeMap<Collection, usize>,
}

impl RefreshSummary {
    pub fn total(&self) -> usize {
        self.updated.values().sum()
    }
}

impl MediaStateStore {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self { backend, events }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    pub fn open_dir(dir: impl Into<PathBuf>) -> Result<Self> {
        let storage = FileStorage::new(dir)?;
        Ok(Self::new(Arc::new(storage)))
    }

    pub(crate) fn backend(&self) -> &dyn StorageBackend {
        self.backend.as_ref()
    }

    /// Receive an event for every successful write made through this store
    /// or any of its clones.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    pub(crate) fn emit(&self, collection: Collection, change: ChangeKind) {
        // Err only means nobody is listening
        let _ = self.events.send(StoreEvent { collection, change });
    }

    pub fn collection<E: CollectionEntry>(&self) -> CollectionHandle<'_, E> {
        CollectionHandle::new(self)
    }

    pub fn watchlist(&self) -> CollectionHandle<'_, WatchlistEntry> {
        self.collection()
    }

    pub fn continue_watching(&self) -> CollectionHandle<'_, ContinueWatchingEntry> {
        self.collection()
    }

    pub fn downloads(&self) -> CollectionHandle<'_, DownloadEntry> {
        self.collection()
    }

    pub fn recently_watched(&self) -> CollectionHandle<'_, RecentlyWatchedEntry> {
        self.collection()
    }

    pub fn counts(&self) -> CollectionCounts {
        CollectionCounts {
            watchlist: self.watchlist().len(),
            continue_watching: self.continue_watching().len(),
            downloads: self.downloads().len(),
            recently_watched: self.recently_watched().len(),
        }
    }

    /// Every id present in at least one collection, ascending
    pub fn tracked_ids(&self) -> Vec<u64> {
        let mut ids = BTreeSet::new();
        ids.extend(self.watchlist().load().iter().map(|e| e.media_id()));
        ids.extend(self.continue_watching().load().iter().map(|e| e.media_id()));
        ids.extend(self.downloads().load().iter().map(|e| e.media_id()));
        ids.extend(self.recently_watched().load().iter().map(|e| e.media_id()));
        ids.into_iter().collect()
    }

    /// Merge freshly fetched catalog records into every stored entry with a
    /// matching id, keeping each collection's own attributes.
    ///
    /// Collections without a changed entry are not rewritten.
    pub fn refresh_media(&self, records: &[MediaRecord]) -> Result<RefreshSummary> {
        let fresh: HashMap<u64, &MediaRecord> = records.iter().map(|r| (r.id, r)).collect();
        let mut summary = RefreshSummary::default();

        if fresh.is_empty() {
            debug!("No catalog records supplied, nothing to refresh");
            return Ok(summary);
        }

        for (collection, updated) in [
            (Collection::Watchlist, self.refresh_collection::<WatchlistEntry>(&fresh)?),
            (Collection::ContinueWatching, self.refresh_collection::<ContinueWatchingEntry>(&fresh)?),
            (Collection::Downloads, self.refresh_collection::<DownloadEntry>(&fresh)?),
            (Collection::RecentlyWatched, self.refresh_collection::<RecentlyWatchedEntry>(&fresh)?),
        ] {
            if updated > 0 {
                summary.updated.insert(collection, updated);
            }
        }

        info!(
            "Refreshed catalog metadata: {} entr(ies) updated from {} record(s)",
            summary.total(),
            fresh.len()
        );
        Ok(summary)
    }

    fn refresh_collection<E: CollectionEntry>(&self, fresh: &HashMap<u64, &MediaRecord>) -> Result<usize> {
        let handle = self.collection::<E>();
        let Snapshot { mut entries, unreadable } = handle.read_snapshot();
        let mut changed = Vec::new();

        for entry in entries.iter_mut() {
            if let Some(record) = fresh.get(&entry.media_id()) {
                if entry.media() != *record {
                    *entry.media_mut() = (*record).clone();
                    changed.push(entry.media_id());
                }
            }
        }

        if changed.is_empty() {
            return Ok(0);
        }

        handle.persist(&entries, &unreadable)?;
        for id in &changed {
            self.emit(E::COLLECTION, ChangeKind::Updated(*id));
        }
        Ok(changed.len())
    }

    /// Wipe every slot (sign-out), settings included.
    pub fn clear_all(&self) -> Result<()> {
        self.backend.clear()?;
        for collection in Collection::ALL {
            self.emit(collection, ChangeKind::Cleared);
        }
        info!("Cleared all media state");
        Ok(())
    }

    /// Stored settings, or defaults when missing or unreadable
    pub fn load_settings(&self) -> UserSettings {
        match self.backend.get(SETTINGS_KEY) {
            Ok(Some(content)) => match serde_json::from_str(&content) {
                Ok(settings) => settings,
                Err(e) => {
                    warn!("Malformed settings: {}. Using defaults.", e);
                    UserSettings::default()
                }
            },
            Ok(None) => {
                debug!("No stored settings, using defaults");
                UserSettings::default()
            }
            Err(e) => {
                warn!("Failed to read settings: {}. Using defaults.", e);
                UserSettings::default()
            }
        }
    }

    /// Persist settings; volume is capped at 100. Returns what was stored.
    pub fn save_settings(&self, settings: &UserSettings) -> Result<UserSettings> {
        let mut stored = settings.clone();
        stored.volume = stored.volume.min(100);

        let json = serde_json::to_string(&stored).map_err(|source| StoreError::Serialize {
            slot: SETTINGS_KEY.to_string(),
            source,
        })?;
        self.backend.set(SETTINGS_KEY, &json)?;
        info!("Settings saved");
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use streamx_models::DownloadQuality;
    use tokio::sync::broadcast::error::TryRecvError;

    fn record(id: u64, title: &str) -> MediaRecord {
        MediaRecord::new(id, title)
    }

    #[test]
    fn test_counts_and_tracked_ids() {
        let store = MediaStateStore::in_memory();
        let now = Utc::now();
        store.watchlist().add(record(3, "C").into()).unwrap();
        store.watchlist().add(record(1, "A").into()).unwrap();
        store.downloads().add(DownloadEntry::new(record(2, "B"), now, DownloadQuality::Hd720)).unwrap();
        store.continue_watching().update_progress(record(1, "A"), 10.0, now).unwrap();

        let counts = store.counts();
        assert_eq!(counts.watchlist, 2);
        assert_eq!(counts.downloads, 1);
        assert_eq!(counts.get(Collection::ContinueWatching), 1);
        assert_eq!(counts.recently_watched, 0);

        assert_eq!(store.tracked_ids(), vec![1, 2, 3]);
    }

    #[test]
    fn test_refresh_media_keeps_collection_attributes() {
        let store = MediaStateStore::in_memory();
        let watched = Utc.with_ymd_and_hms(2024, 4, 1, 20, 0, 0).unwrap();
        store.watchlist().add(record(10, "Old Title").into()).unwrap();
        store.continue_watching().update_progress(record(10, "Old Title"), 55.0, watched).unwrap();
        store.recently_watched().add(RecentlyWatchedEntry::new(record(11, "Untouched"), watched)).unwrap();

        let mut fresh = record(10, "New Title");
        fresh.poster_path = Some("/new.jpg".to_string());
        let summary = store.refresh_media(&[fresh.clone()]).unwrap();

        assert_eq!(summary.total(), 2);
        assert_eq!(summary.updated.get(&Collection::Watchlist), Some(&1));
        assert_eq!(summary.updated.get(&Collection::ContinueWatching), Some(&1));
        assert_eq!(summary.updated.get(&Collection::RecentlyWatched), None);

        assert_eq!(store.watchlist().get(10).unwrap().media, fresh);
        let progress = store.continue_watching().get(10).unwrap();
        assert_eq!(progress.media.title, "New Title");
        assert_eq!(progress.progress, 55.0);
        assert_eq!(progress.last_watched, watched);
        assert_eq!(store.recently_watched().get(11).unwrap().media.title, "Untouched");
    }

    #[test]
    fn test_refresh_media_without_changes_writes_nothing() {
        let store = MediaStateStore::in_memory();
        store.watchlist().add(record(1, "Same").into()).unwrap();
        let mut events = store.subscribe();

        let summary = store.refresh_media(&[record(1, "Same"), record(99, "Unknown")]).unwrap();
        assert_eq!(summary.total(), 0);
        assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn test_events_follow_writes() {
        let store = MediaStateStore::in_memory();
        let mut events = store.subscribe();

        store.watchlist().add(record(1, "A").into()).unwrap();
        store.watchlist().add(record(1, "A again").into()).unwrap();
        store.watchlist().remove(42).unwrap();
        store.watchlist().remove(1).unwrap();

        assert_eq!(
            events.try_recv().unwrap(),
            StoreEvent { collection: Collection::Watchlist, change: ChangeKind::Added(1) }
        );
        assert_eq!(
            events.try_recv().unwrap(),
            StoreEvent { collection: Collection::Watchlist, change: ChangeKind::Removed(1) }
        );
        assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn test_events_reach_clones() {
        let store = MediaStateStore::in_memory();
        let other_view = store.clone();
        let mut events = other_view.subscribe();

        store.continue_watching().update_progress(record(4, "D"), 20.0, Utc::now()).unwrap();
        store.continue_watching().update_progress(record(4, "D"), 30.0, Utc::now()).unwrap();

        assert_eq!(events.try_recv().unwrap().change, ChangeKind::Added(4));
        assert_eq!(events.try_recv().unwrap().change, ChangeKind::Updated(4));
        assert_eq!(other_view.continue_watching().get(4).unwrap().progress, 30.0);
    }

    #[test]
    fn test_clear_all() {
        let store = MediaStateStore::in_memory();
        store.watchlist().add(record(1, "A").into()).unwrap();
        store.downloads().add(DownloadEntry::new(record(2, "B"), Utc::now(), DownloadQuality::default())).unwrap();
        store.save_settings(&UserSettings { autoplay: false, ..UserSettings::default() }).unwrap();
        let mut events = store.subscribe();

        store.clear_all().unwrap();

        assert_eq!(store.counts(), CollectionCounts::default());
        assert!(store.load_settings().autoplay);
        for collection in Collection::ALL {
            let event = events.try_recv().unwrap();
            assert_eq!(event.collection, collection);
            assert_eq!(event.change, ChangeKind::Cleared);
        }
    }

    #[test]
    fn test_settings_default_save_and_load() {
        let store = MediaStateStore::in_memory();
        assert_eq!(store.load_settings(), UserSettings::default());

        let settings = UserSettings {
            notifications: false,
            language: "fr".to_string(),
            volume: 250,
            ..UserSettings::default()
        };
        let stored = store.save_settings(&settings).unwrap();
        assert_eq!(stored.volume, 100);

        let loaded = store.load_settings();
        assert!(!loaded.notifications);
        assert_eq!(loaded.language, "fr");
        assert_eq!(loaded.volume, 100);
    }

    #[test]
    fn test_malformed_settings_fall_back_to_defaults() {
        let backend = Arc::new(MemoryStorage::new());
        backend.set(SETTINGS_KEY, "{not json").unwrap();
        let store = MediaStateStore::new(backend);
        assert_eq!(store.load_settings(), UserSettings::default());
    }

    #[test]
    fn test_file_backed_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = MediaStateStore::open_dir(dir.path()).unwrap();
            store.watchlist().add(record(8, "Persisted").into()).unwrap();
        }

        let reopened = MediaStateStore::open_dir(dir.path()).unwrap();
        let entries = reopened.watchlist().load();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].media.title, "Persisted");
        assert!(dir.path().join("watchlist.json").exists());
    }
}
