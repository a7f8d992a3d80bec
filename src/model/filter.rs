use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::entity::{Entity, EntityId, Priority};

/// Sort key for the filtered view. `Order` is the default and preserves
/// manual drag ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Order,
    Created,
    DueDate,
    Priority,
    Title,
}

impl Default for SortKey {
    fn default() -> Self {
        SortKey::Order
    }
}

/// Sort direction (ignored for `SortKey::Order`, which is always ascending)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl Default for SortOrder {
    fn default() -> Self {
        SortOrder::Asc
    }
}

/// Filter criteria. Every populated criterion is an independent AND;
/// empty sets and `None` fields match everything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(serialize = "E: Entity", deserialize = "E: Entity"))]
pub struct FilterSpec<E: Entity> {
    #[serde(default)]
    pub statuses: Vec<E::Status>,
    #[serde(default)]
    pub priorities: Vec<Priority>,
    #[serde(default)]
    pub project_id: Option<EntityId>,
    #[serde(default)]
    pub goal_id: Option<EntityId>,
    #[serde(default)]
    pub assignee_id: Option<EntityId>,
    /// Inclusive due-date window. Entities without a due date are excluded
    /// whenever either bound is set.
    #[serde(default)]
    pub due_from: Option<NaiveDate>,
    #[serde(default)]
    pub due_to: Option<NaiveDate>,
}

impl<E: Entity> Default for FilterSpec<E> {
    fn default() -> Self {
        FilterSpec {
            statuses: Vec::new(),
            priorities: Vec::new(),
            project_id: None,
            goal_id: None,
            assignee_id: None,
            due_from: None,
            due_to: None,
        }
    }
}

impl<E: Entity> FilterSpec<E> {
    /// True when no criterion is populated
    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
            && self.priorities.is_empty()
            && self.project_id.is_none()
            && self.goal_id.is_none()
            && self.assignee_id.is_none()
            && self.due_from.is_none()
            && self.due_to.is_none()
    }

    /// True when a due-date window is active
    pub fn has_due_window(&self) -> bool {
        self.due_from.is_some() || self.due_to.is_some()
    }
}
