use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::model::entity::{Entity, EntityId, Priority};
use crate::model::validate::{self, ValidationError};

/// Project lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Planning,
    Active,
    OnHold,
    Done,
    Archived,
}

/// A project grouping tasks, with its own manual ordering position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: ProjectStatus,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub member_ids: Vec<EntityId>,
    #[serde(default)]
    pub order: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create payload for a project
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectDraft {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub member_ids: Vec<EntityId>,
}

/// Partial-update payload for a project
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProjectStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_ids: Option<Vec<EntityId>>,
}

const NAME_LIMIT: usize = 120;
const DESCRIPTION_LIMIT: usize = 2000;

impl Entity for Project {
    type Status = ProjectStatus;
    type Draft = ProjectDraft;
    type Patch = ProjectPatch;

    const RESOURCE: &'static str = "projects";

    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.name
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn status(&self) -> ProjectStatus {
        self.status
    }

    fn priority(&self) -> Priority {
        self.priority
    }

    fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    // Projects are not nested under other projects or goals; the id filters
    // simply never match them.
    fn project_id(&self) -> Option<&str> {
        None
    }

    fn goal_id(&self) -> Option<&str> {
        None
    }

    fn assignee_id(&self) -> Option<&str> {
        None
    }

    fn order(&self) -> u32 {
        self.order
    }

    fn set_order(&mut self, order: u32) {
        self.order = order;
    }

    fn validate_draft(draft: &ProjectDraft) -> Result<(), ValidationError> {
        validate::required("name", &draft.name)?;
        validate::max_len("name", &draft.name, NAME_LIMIT)?;
        if let Some(desc) = &draft.description {
            validate::max_len("description", desc, DESCRIPTION_LIMIT)?;
        }
        Ok(())
    }

    fn validate_patch(patch: &ProjectPatch) -> Result<(), ValidationError> {
        if let Some(name) = &patch.name {
            validate::required("name", name)?;
            validate::max_len("name", name, NAME_LIMIT)?;
        }
        if let Some(desc) = &patch.description {
            validate::max_len("description", desc, DESCRIPTION_LIMIT)?;
        }
        Ok(())
    }

    fn from_draft(draft: &ProjectDraft, id: EntityId, now: DateTime<Utc>) -> Self {
        Project {
            id,
            name: draft.name.clone(),
            description: draft.description.clone(),
            status: ProjectStatus::Planning,
            priority: draft.priority.unwrap_or_default(),
            due_date: draft.due_date,
            tags: draft.tags.clone(),
            member_ids: draft.member_ids.clone(),
            order: 0,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_patch(&mut self, patch: &ProjectPatch, now: DateTime<Utc>) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(desc) = &patch.description {
            self.description = Some(desc.clone());
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(due) = patch.due_date {
            self.due_date = Some(due);
        }
        if let Some(tags) = &patch.tags {
            self.tags = tags.clone();
        }
        if let Some(member_ids) = &patch.member_ids {
            self.member_ids = member_ids.clone();
        }
        self.updated_at = now;
    }
}
