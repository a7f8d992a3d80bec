use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::model::validate::ValidationError;

/// Stable server-assigned identifier.
pub type EntityId = String;

/// Priority level shared by tasks and projects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    /// Fixed rank used for priority sorting: urgent > high > medium > low
    pub fn rank(self) -> u8 {
        match self {
            Priority::Low => 1,
            Priority::Medium => 2,
            Priority::High => 3,
            Priority::Urgent => 4,
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

/// Contract every stored entity satisfies. The store and the view pipeline
/// are generic over this; `Task` and `Project` are the two instantiations.
pub trait Entity: Clone + Serialize + DeserializeOwned {
    /// Entity-specific status enum
    type Status: Copy + PartialEq + std::fmt::Debug + Serialize + DeserializeOwned;
    /// Payload for the remote create call (server-managed fields excluded)
    type Draft: Serialize;
    /// Partial-update payload; unset fields are omitted from the wire body
    type Patch: Serialize;

    /// REST resource segment, e.g. `tasks`
    const RESOURCE: &'static str;

    fn id(&self) -> &str;
    fn title(&self) -> &str;
    fn description(&self) -> Option<&str>;
    fn status(&self) -> Self::Status;
    fn priority(&self) -> Priority;
    fn due_date(&self) -> Option<NaiveDate>;
    fn created_at(&self) -> DateTime<Utc>;
    fn project_id(&self) -> Option<&str>;
    fn goal_id(&self) -> Option<&str>;
    fn assignee_id(&self) -> Option<&str>;

    /// Client-only manual ordering position
    fn order(&self) -> u32;
    fn set_order(&mut self, order: u32);

    /// Validate a draft before it leaves the client
    fn validate_draft(draft: &Self::Draft) -> Result<(), ValidationError>;
    /// Validate a patch before it leaves the client
    fn validate_patch(patch: &Self::Patch) -> Result<(), ValidationError>;

    /// Build a full entity from a draft. This is the create semantics a
    /// backend applies; the in-memory backend uses it directly.
    fn from_draft(draft: &Self::Draft, id: EntityId, now: DateTime<Utc>) -> Self;
    /// Apply every set field of a patch in place
    fn apply_patch(&mut self, patch: &Self::Patch, now: DateTime<Utc>);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_rank_ordering() {
        assert!(Priority::Urgent.rank() > Priority::High.rank());
        assert!(Priority::High.rank() > Priority::Medium.rank());
        assert!(Priority::Medium.rank() > Priority::Low.rank());
    }

    #[test]
    fn priority_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Priority::Urgent).unwrap(),
            "\"urgent\""
        );
        let p: Priority = serde_json::from_str("\"low\"").unwrap();
        assert_eq!(p, Priority::Low);
    }

    #[test]
    fn priority_defaults_to_medium() {
        assert_eq!(Priority::default(), Priority::Medium);
    }
}
