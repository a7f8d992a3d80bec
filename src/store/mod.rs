//! The entity store: the authoritative in-memory entity list, a derived
//! filtered/sorted view, and mutation methods that call the remote service
//! then reconcile local state.
//!
//! Reads (`fetch_all`, `fetch_one`) capture failures into the error state
//! and resolve silently; writes capture the failure and also propagate it,
//! so the caller can surface it locally. Local state only changes on the
//! success branch, so a failed write never leaves a partial commit.

pub mod view;

use tracing::debug;

use crate::io::snapshot::Snapshot;
use crate::model::entity::Entity;
use crate::model::filter::{FilterSpec, SortKey, SortOrder};
use crate::model::project::Project;
use crate::model::task::Task;
use crate::model::validate::ValidationError;
use crate::remote::{OrderEntry, Remote, RemoteError};

pub type TaskStore<R> = EntityStore<Task, R>;
pub type ProjectStore<R> = EntityStore<Project, R>;

/// Error type for store write operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Remote(#[from] RemoteError),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// One store instance per entity type. All UI reads go through the derived
/// view; all writes go through the methods here.
pub struct EntityStore<E: Entity, R: Remote<E>> {
    remote: R,
    entities: Vec<E>,
    filtered: Vec<E>,
    current: Option<E>,
    loading: bool,
    error: Option<String>,
    filter: FilterSpec<E>,
    search_query: String,
    sort_key: SortKey,
    sort_order: SortOrder,
}

impl<E: Entity, R: Remote<E>> EntityStore<E, R> {
    pub fn new(remote: R) -> Self {
        EntityStore {
            remote,
            entities: Vec::new(),
            filtered: Vec::new(),
            current: None,
            loading: false,
            error: None,
            filter: FilterSpec::default(),
            search_query: String::new(),
            sort_key: SortKey::default(),
            sort_order: SortOrder::default(),
        }
    }

    /// Restore a store from a persisted snapshot. Transient state (view,
    /// loading, error, current) is rebuilt, not restored.
    pub fn from_snapshot(remote: R, snapshot: Snapshot<E>) -> Self {
        let mut store = Self::new(remote);
        store.entities = snapshot.entities;
        store.filter = snapshot.filter;
        store.search_query = snapshot.search_query;
        store.sort_key = snapshot.sort_key;
        store.sort_order = snapshot.sort_order;
        store.refresh();
        store
    }

    /// The persistable part of the state
    pub fn snapshot(&self) -> Snapshot<E> {
        Snapshot {
            entities: self.entities.clone(),
            filter: self.filter.clone(),
            search_query: self.search_query.clone(),
            sort_key: self.sort_key,
            sort_order: self.sort_order,
        }
    }

    // --- Read accessors ---

    pub fn filtered(&self) -> &[E] {
        &self.filtered
    }

    pub fn entities(&self) -> &[E] {
        &self.entities
    }

    pub fn current(&self) -> Option<&E> {
        self.current.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn filter(&self) -> &FilterSpec<E> {
        &self.filter
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    pub fn remote_mut(&mut self) -> &mut R {
        &mut self.remote
    }

    // --- Read operations (failures land in `error`, nothing is thrown) ---

    /// Replace the whole list from the remote. On failure the local list is
    /// left untouched.
    pub fn fetch_all(&mut self) {
        self.loading = true;
        self.error = None;
        match self.remote.fetch_all() {
            Ok(mut list) => {
                debug!(count = list.len(), "fetched {}", E::RESOURCE);
                list.sort_by_key(|e| e.order());
                self.entities = list;
                self.loading = false;
                self.refresh();
            }
            Err(err) => {
                debug!(error = %err, "fetch_all failed");
                self.error = Some(err.to_string());
                self.loading = false;
            }
        }
    }

    /// Fetch a single entity into `current`.
    pub fn fetch_one(&mut self, id: &str) {
        self.loading = true;
        self.error = None;
        match self.remote.fetch_one(id) {
            Ok(entity) => {
                self.current = Some(entity);
                self.loading = false;
            }
            Err(err) => {
                self.error = Some(err.to_string());
                self.loading = false;
            }
        }
    }

    // --- Write operations (failures land in `error` AND propagate) ---

    /// Create an entity. The new record is prepended; it keeps that position
    /// until the next refresh that sorts it elsewhere.
    pub fn create(&mut self, draft: E::Draft) -> Result<E, StoreError> {
        E::validate_draft(&draft)?;
        self.error = None;
        match self.remote.create(&draft) {
            Ok(entity) => {
                self.entities.insert(0, entity.clone());
                self.refresh();
                Ok(entity)
            }
            Err(err) => {
                self.error = Some(err.to_string());
                Err(err.into())
            }
        }
    }

    /// Update an entity; the server's record replaces the local one matched
    /// by identifier (and `current`, if it matches).
    pub fn update(&mut self, id: &str, patch: E::Patch) -> Result<E, StoreError> {
        E::validate_patch(&patch)?;
        self.error = None;
        match self.remote.update(id, &patch) {
            Ok(entity) => {
                if let Some(slot) = self.entities.iter_mut().find(|e| e.id() == id) {
                    *slot = entity.clone();
                }
                if self.current.as_ref().is_some_and(|c| c.id() == id) {
                    self.current = Some(entity.clone());
                }
                self.refresh();
                Ok(entity)
            }
            Err(err) => {
                self.error = Some(err.to_string());
                Err(err.into())
            }
        }
    }

    /// Delete an entity and drop it from local state.
    pub fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        self.error = None;
        match self.remote.delete(id) {
            Ok(()) => {
                self.entities.retain(|e| e.id() != id);
                if self.current.as_ref().is_some_and(|c| c.id() == id) {
                    self.current = None;
                }
                self.refresh();
                Ok(())
            }
            Err(err) => {
                self.error = Some(err.to_string());
                Err(err.into())
            }
        }
    }

    /// Move one element of the unfiltered list, purely in memory. Indices
    /// out of range are a no-op.
    pub fn reorder(&mut self, from: usize, to: usize) {
        if from >= self.entities.len() || to >= self.entities.len() {
            return;
        }
        let entity = self.entities.remove(from);
        self.entities.insert(to, entity);
        self.refresh();
    }

    /// Persist a manual ordering: assign dense zero-based `order` values by
    /// position, install the list as both the entity list and the view
    /// (bypassing the filter pipeline so the visual order is exact), then
    /// push `{id, order}` pairs to the remote. On failure the pre-call state
    /// is restored.
    pub fn persist_order(&mut self, mut ordered: Vec<E>) -> Result<(), StoreError> {
        self.error = None;
        for (index, entity) in ordered.iter_mut().enumerate() {
            entity.set_order(index as u32);
        }
        let entries: Vec<OrderEntry> = ordered
            .iter()
            .map(|e| OrderEntry {
                id: e.id().to_string(),
                order: e.order(),
            })
            .collect();

        let previous_entities = std::mem::replace(&mut self.entities, ordered.clone());
        let previous_view = std::mem::replace(&mut self.filtered, ordered);

        match self.remote.update_order(&entries) {
            Ok(()) => Ok(()),
            Err(err) => {
                // revert to the last server-confirmed order
                self.entities = previous_entities;
                self.filtered = previous_view;
                self.error = Some(err.to_string());
                Err(err.into())
            }
        }
    }

    // --- Filter/search/sort setters ---

    pub fn set_filter(&mut self, filter: FilterSpec<E>) {
        self.filter = filter;
        self.refresh();
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
        self.refresh();
    }

    pub fn set_sort_key(&mut self, key: SortKey) {
        self.sort_key = key;
        self.refresh();
    }

    pub fn set_sort_order(&mut self, order: SortOrder) {
        self.sort_order = order;
        self.refresh();
    }

    /// Reset filter and search; sort preferences are kept.
    pub fn clear_filters(&mut self) {
        self.filter = FilterSpec::default();
        self.search_query.clear();
        self.refresh();
    }

    /// Recompute the derived view. Every mutation and setter funnels
    /// through here; `persist_order` is the one sanctioned bypass.
    fn refresh(&mut self) {
        self.filtered = view::apply(
            &self.entities,
            &self.filter,
            &self.search_query,
            self.sort_key,
            self.sort_order,
        );
    }
}
