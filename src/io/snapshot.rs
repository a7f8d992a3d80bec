//! Persisted store state. The blob carries the entity list and the
//! filter/sort preferences; the derived view, loading flag, error, and
//! current selection are never persisted and reset at cold start.

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::entity::Entity;
use crate::model::filter::{FilterSpec, SortKey, SortOrder};

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("could not encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// The persisted blob for one store
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(serialize = "E: Entity", deserialize = "E: Entity"))]
pub struct Snapshot<E: Entity> {
    #[serde(default)]
    pub entities: Vec<E>,
    #[serde(default)]
    pub filter: FilterSpec<E>,
    #[serde(default)]
    pub search_query: String,
    #[serde(default)]
    pub sort_key: SortKey,
    #[serde(default)]
    pub sort_order: SortOrder,
}

impl<E: Entity> Default for Snapshot<E> {
    fn default() -> Self {
        Snapshot {
            entities: Vec::new(),
            filter: FilterSpec::default(),
            search_query: String::new(),
            sort_key: SortKey::default(),
            sort_order: SortOrder::default(),
        }
    }
}

/// Read a snapshot, returning None if the file is missing or unreadable.
/// A corrupt blob is treated the same as no blob: the store starts empty
/// and the next write replaces it.
pub fn read_snapshot<E: Entity>(path: &Path) -> Option<Snapshot<E>> {
    let content = fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
}

/// Write a snapshot atomically: temp file in the target directory, then
/// rename over the destination. Last write wins.
pub fn write_snapshot<E: Entity>(path: &Path, snapshot: &Snapshot<E>) -> Result<(), SnapshotError> {
    let content = serde_json::to_string_pretty(snapshot)?;
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
