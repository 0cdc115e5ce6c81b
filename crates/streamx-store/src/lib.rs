pub mod collection;
pub mod entry;
pub mod error;
pub mod events;
pub mod storage;
pub mod store;

pub use collection::CollectionHandle;
pub use entry::{CollectionEntry, DuplicatePolicy};
pub use error::{Result, StorageError, StoreError};
pub use events::{ChangeKind, StoreEvent};
pub use storage::{FileStorage, MemoryStorage, StorageBackend};
pub use store::{CollectionCounts, MediaStateStore, RefreshSummary};
