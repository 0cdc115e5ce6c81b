use serde::Serialize;
use streamx_models::Collection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ChangeKind {
    Added(u64),
    Updated(u64),
    Removed(u64),
    Cleared,
}

/// Emitted after a snapshot write lands in storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StoreEvent {
    pub collection: Collection,
    pub change: ChangeKind,
}
