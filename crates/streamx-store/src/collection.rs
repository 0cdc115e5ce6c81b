use crate::entry::{dedup_by_id, CollectionEntry, DuplicatePolicy};
use crate::error::{Result, StoreError};
use crate::events::ChangeKind;
use crate::store::MediaStateStore;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::marker::PhantomData;
use streamx_models::continue_watching::clamp_progress;
use streamx_models::{Collection, ContinueWatchingEntry, MediaRecord};
use tracing::{debug, info, warn};

/// Decoded entries plus the raw entries that failed to decode.
pub(crate) struct Snapshot<E> {
    pub(crate) entries: Vec<E>,
    pub(crate) unreadable: Vec<Value>,
}

impl<E> Snapshot<E> {
    fn empty() -> Self {
        Self {
            entries: Vec::new(),
            unreadable: Vec::new(),
        }
    }
}

/// CRUD over one persisted collection.
///
/// Every mutation is a full snapshot read-modify-write: the whole list is
/// loaded, changed in memory and written back as one JSON array. Reads fail
/// open (a missing or unparsable snapshot is an empty list), writes fail loud.
pub struct CollectionHandle<'s, E> {
    store: &'s MediaStateStore,
    _entry: PhantomData<fn() -> E>,
}

impl<'s, E: CollectionEntry> CollectionHandle<'s, E> {
    pub(crate) fn new(store: &'s MediaStateStore) -> Self {
        Self {
            store,
            _entry: PhantomData,
        }
    }

    pub fn collection(&self) -> Collection {
        E::COLLECTION
    }

    pub fn load(&self) -> Vec<E> {
        self.read_snapshot().entries
    }

    /// Decode the stored array entry by entry.
    ///
    /// Entries that fail to decode are skipped and kept aside as raw JSON so
    /// the next write puts them back untouched.
    pub(crate) fn read_snapshot(&self) -> Snapshot<E> {
        let key = E::COLLECTION.storage_key();

        let content = match self.store.backend().get(key) {
            Ok(Some(content)) => content,
            Ok(None) => {
                debug!("Snapshot miss: {} (no stored data)", key);
                return Snapshot::empty();
            }
            Err(e) => {
                warn!("Failed to read snapshot for {}: {}. Treating as empty.", key, e);
                return Snapshot::empty();
            }
        };

        let values = match serde_json::from_str::<Vec<Value>>(&content) {
            Ok(values) => values,
            Err(e) => {
                warn!("Malformed snapshot for {}: {}. Treating as empty.", key, e);
                return Snapshot::empty();
            }
        };

        let mut entries = Vec::with_capacity(values.len());
        let mut unreadable = Vec::new();
        for value in values {
            match serde_json::from_value::<E>(value.clone()) {
                Ok(entry) => entries.push(entry),
                Err(e) => {
                    warn!("Skipping unreadable entry in {}: {}", key, e);
                    unreadable.push(value);
                }
            }
        }

        let (entries, dropped) = dedup_by_id(entries);
        if dropped > 0 {
            warn!("Snapshot {} held {} duplicate entr(ies), collapsed on load", key, dropped);
        }
        debug!("Snapshot hit: {} (loaded {} items)", key, entries.len());
        Snapshot { entries, unreadable }
    }

    /// Insert `entry`, keeping one entry per id.
    ///
    /// Watchlist and downloads ignore a re-add; continue-watching and
    /// recently-watched overwrite the stored entry in place.
    pub fn add(&self, entry: E) -> Result<Vec<E>> {
        let Snapshot { mut entries, unreadable } = self.read_snapshot();
        let id = entry.media_id();

        let change = match entries.iter().position(|e| e.media_id() == id) {
            Some(idx) => match E::ON_DUPLICATE {
                DuplicatePolicy::KeepExisting => {
                    debug!("{} already holds id {}, nothing to add", E::COLLECTION, id);
                    return Ok(entries);
                }
                DuplicatePolicy::Replace => {
                    entries[idx] = entry;
                    ChangeKind::Updated(id)
                }
            },
            None => {
                entries.push(entry);
                ChangeKind::Added(id)
            }
        };

        self.persist(&entries, &unreadable)?;
        self.store.emit(E::COLLECTION, change);
        Ok(entries)
    }

    /// Drop the entry with `id`. An absent id leaves storage untouched.
    pub fn remove(&self, id: u64) -> Result<Vec<E>> {
        let Snapshot { mut entries, unreadable } = self.read_snapshot();
        let before = entries.len();
        entries.retain(|e| e.media_id() != id);

        if entries.len() == before {
            debug!("{} has no id {}, nothing to remove", E::COLLECTION, id);
            return Ok(entries);
        }

        self.persist(&entries, &unreadable)?;
        self.store.emit(E::COLLECTION, ChangeKind::Removed(id));
        Ok(entries)
    }

    pub fn get(&self, id: u64) -> Option<E> {
        self.load().into_iter().find(|e| e.media_id() == id)
    }

    pub fn contains(&self, id: u64) -> bool {
        self.load().iter().any(|e| e.media_id() == id)
    }

    pub fn len(&self) -> usize {
        self.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Write `entries` followed by any entries that could not be decoded
    pub(crate) fn persist(&self, entries: &[E], unreadable: &[Value]) -> Result<()> {
        let key = E::COLLECTION.storage_key();
        let serialize_error = |source| StoreError::Serialize {
            slot: key.to_string(),
            source,
        };

        let mut values = entries
            .iter()
            .map(serde_json::to_value)
            .collect::<std::result::Result<Vec<Value>, _>>()
            .map_err(serialize_error)?;
        values.extend(unreadable.iter().cloned());

        let json = serde_json::to_string(&values).map_err(serialize_error)?;
        self.store.backend().set(key, &json)?;
        info!("Snapshot saved: {} ({} items)", key, entries.len());
        Ok(())
    }
}

impl CollectionHandle<'_, ContinueWatchingEntry> {
    /// Record a playback position.
    ///
    /// An existing entry only has `progress` and `last_watched` overwritten.
    /// Otherwise a new entry is appended from `media`. Progress is clamped
    /// into `0..=100`.
    pub fn update_progress(
        &self,
        media: MediaRecord,
        progress: f64,
        timestamp: DateTime<Utc>,
    ) -> Result<Vec<ContinueWatchingEntry>> {
        let progress = clamp_progress(progress);
        let id = media.id;
        let Snapshot { mut entries, unreadable } = self.read_snapshot();

        let change = match entries.iter_mut().find(|e| e.media.id == id) {
            Some(existing) => {
                existing.progress = progress;
                existing.last_watched = timestamp;
                ChangeKind::Updated(id)
            }
            None => {
                entries.push(ContinueWatchingEntry::new(media, progress, timestamp));
                ChangeKind::Added(id)
            }
        };

        self.persist(&entries, &unreadable)?;
        self.store.emit(Collection::ContinueWatching, change);
        Ok(entries)
    }
}

#[cfg(test)]
mod tests;
