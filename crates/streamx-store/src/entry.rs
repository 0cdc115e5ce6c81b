use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use streamx_models::{
    Collection, ContinueWatchingEntry, DownloadEntry, MediaRecord, RecentlyWatchedEntry, WatchlistEntry,
};

/// What `add` does when an entry with the same id is already present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Membership lists: the stored entry wins, re-adding is a no-op
    KeepExisting,
    /// Playback lists: the newer entry overwrites the stored one in place
    Replace,
}

/// An entry type that lives in one of the persisted collections.
pub trait CollectionEntry: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const COLLECTION: Collection;
    const ON_DUPLICATE: DuplicatePolicy;

    fn media(&self) -> &MediaRecord;
    fn media_mut(&mut self) -> &mut MediaRecord;

    fn media_id(&self) -> u64 {
        self.media().id
    }
}

impl CollectionEntry for WatchlistEntry {
    const COLLECTION: Collection = Collection::Watchlist;
    const ON_DUPLICATE: DuplicatePolicy = DuplicatePolicy::KeepExisting;

    fn media(&self) -> &MediaRecord {
        &self.media
    }

    fn media_mut(&mut self) -> &mut MediaRecord {
        &mut self.media
    }
}

impl CollectionEntry for ContinueWatchingEntry {
    const COLLECTION: Collection = Collection::ContinueWatching;
    const ON_DUPLICATE: DuplicatePolicy = DuplicatePolicy::Replace;

    fn media(&self) -> &MediaRecord {
        &self.media
    }

    fn media_mut(&mut self) -> &mut MediaRecord {
        &mut self.media
    }
}

impl CollectionEntry for DownloadEntry {
    const COLLECTION: Collection = Collection::Downloads;
    const ON_DUPLICATE: DuplicatePolicy = DuplicatePolicy::KeepExisting;

    fn media(&self) -> &MediaRecord {
        &self.media
    }

    fn media_mut(&mut self) -> &mut MediaRecord {
        &mut self.media
    }
}

impl CollectionEntry for RecentlyWatchedEntry {
    const COLLECTION: Collection = Collection::RecentlyWatched;
    const ON_DUPLICATE: DuplicatePolicy = DuplicatePolicy::Replace;

    fn media(&self) -> &MediaRecord {
        &self.media
    }

    fn media_mut(&mut self) -> &mut MediaRecord {
        &mut self.media
    }
}

/// Collapse duplicate ids in a loaded snapshot according to the entry's policy.
///
/// Each id keeps the position of its first occurrence. Returns the number of
/// entries dropped.
pub(crate) fn dedup_by_id<E: CollectionEntry>(entries: Vec<E>) -> (Vec<E>, usize) {
    let total = entries.len();
    let mut positions: HashMap<u64, usize> = HashMap::with_capacity(total);
    let mut unique: Vec<E> = Vec::with_capacity(total);

    for entry in entries {
        match positions.get(&entry.media_id()) {
            Some(&idx) => {
                if E::ON_DUPLICATE == DuplicatePolicy::Replace {
                    unique[idx] = entry;
                }
            }
            None => {
                positions.insert(entry.media_id(), unique.len());
                unique.push(entry);
            }
        }
    }

    let dropped = total - unique.len();
    (unique, dropped)
}
