use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::model::entity::{Entity, EntityId, Priority};
use crate::model::validate::{self, ValidationError};

/// Task lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
    Archived,
}

/// A task as returned by the remote service, plus the client-only `order`
/// field used to persist manual drag ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub project_id: Option<EntityId>,
    #[serde(default)]
    pub goal_id: Option<EntityId>,
    #[serde(default)]
    pub assignee_id: Option<EntityId>,
    #[serde(default)]
    pub order: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create payload. Server-managed fields (id, timestamps) are absent;
/// unset optional fields are omitted from the wire body entirely.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskDraft {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal_id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<EntityId>,
}

/// Partial-update payload; every field is optional
#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal_id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<EntityId>,
}

const TITLE_LIMIT: usize = 200;
const DESCRIPTION_LIMIT: usize = 2000;

impl Entity for Task {
    type Status = TaskStatus;
    type Draft = TaskDraft;
    type Patch = TaskPatch;

    const RESOURCE: &'static str = "tasks";

    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn status(&self) -> TaskStatus {
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

    fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    fn goal_id(&self) -> Option<&str> {
        self.goal_id.as_deref()
    }

    fn assignee_id(&self) -> Option<&str> {
        self.assignee_id.as_deref()
    }

    fn order(&self) -> u32 {
        self.order
    }

    fn set_order(&mut self, order: u32) {
        self.order = order;
    }

    fn validate_draft(draft: &TaskDraft) -> Result<(), ValidationError> {
        validate::required("title", &draft.title)?;
        validate::max_len("title", &draft.title, TITLE_LIMIT)?;
        if let Some(desc) = &draft.description {
            validate::max_len("description", desc, DESCRIPTION_LIMIT)?;
        }
        if let Some(due) = draft.due_date {
            validate::not_past("due_date", due)?;
        }
        Ok(())
    }

    fn validate_patch(patch: &TaskPatch) -> Result<(), ValidationError> {
        if let Some(title) = &patch.title {
            validate::required("title", title)?;
            validate::max_len("title", title, TITLE_LIMIT)?;
        }
        if let Some(desc) = &patch.description {
            validate::max_len("description", desc, DESCRIPTION_LIMIT)?;
        }
        Ok(())
    }

    fn from_draft(draft: &TaskDraft, id: EntityId, now: DateTime<Utc>) -> Self {
        Task {
            id,
            title: draft.title.clone(),
            description: draft.description.clone(),
            status: TaskStatus::Todo,
            priority: draft.priority.unwrap_or_default(),
            due_date: draft.due_date,
            tags: draft.tags.clone(),
            project_id: draft.project_id.clone(),
            goal_id: draft.goal_id.clone(),
            assignee_id: draft.assignee_id.clone(),
            order: 0,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_patch(&mut self, patch: &TaskPatch, now: DateTime<Utc>) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
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
        if let Some(project_id) = &patch.project_id {
            self.project_id = Some(project_id.clone());
        }
        if let Some(goal_id) = &patch.goal_id {
            self.goal_id = Some(goal_id.clone());
        }
        if let Some(assignee_id) = &patch.assignee_id {
            self.assignee_id = Some(assignee_id.clone());
        }
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_task() -> Task {
        Task {
            id: "t-001".into(),
            title: "Write report".into(),
            description: Some("Quarterly numbers".into()),
            status: TaskStatus::Todo,
            priority: Priority::High,
            due_date: None,
            tags: vec!["work".into()],
            project_id: Some("p-001".into()),
            goal_id: None,
            assignee_id: None,
            order: 3,
            created_at: Utc.with_ymd_and_hms(2025, 5, 1, 9, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2025, 5, 1, 9, 0, 0).unwrap(),
        }
    }

    #[test]
    fn status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
        let s: TaskStatus = serde_json::from_str("\"todo\"").unwrap();
        assert_eq!(s, TaskStatus::Todo);
    }

    #[test]
    fn draft_omits_unset_fields() {
        let draft = TaskDraft {
            title: "New task".into(),
            ..Default::default()
        };
        let value = serde_json::to_value(&draft).unwrap();
        let obj = value.as_object().unwrap();
        // only the title goes over the wire, never explicit nulls
        assert_eq!(obj.len(), 1);
        assert_eq!(obj["title"], "New task");
    }

    #[test]
    fn patch_omits_unset_fields() {
        let patch = TaskPatch {
            status: Some(TaskStatus::Done),
            ..Default::default()
        };
        let value = serde_json::to_value(&patch).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 1);
        assert_eq!(obj["status"], "done");
    }

    #[test]
    fn deserializes_minimal_record() {
        let json = r#"{
            "id": "t-9",
            "title": "Bare",
            "status": "todo",
            "created_at": "2025-05-01T09:00:00Z",
            "updated_at": "2025-05-01T09:00:00Z"
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.priority, Priority::Medium);
        assert!(task.tags.is_empty());
        assert_eq!(task.order, 0);
    }

    #[test]
    fn from_draft_fills_server_fields() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let draft = TaskDraft {
            title: "From draft".into(),
            priority: Some(Priority::Urgent),
            ..Default::default()
        };
        let task = Task::from_draft(&draft, "t-100".into(), now);
        assert_eq!(task.id, "t-100");
        assert_eq!(task.status, TaskStatus::Todo);
        assert_eq!(task.priority, Priority::Urgent);
        assert_eq!(task.created_at, now);
    }

    #[test]
    fn apply_patch_touches_only_set_fields() {
        let mut task = sample_task();
        let now = Utc.with_ymd_and_hms(2025, 6, 2, 8, 0, 0).unwrap();
        task.apply_patch(
            &TaskPatch {
                status: Some(TaskStatus::Done),
                ..Default::default()
            },
            now,
        );
        assert_eq!(task.status, TaskStatus::Done);
        assert_eq!(task.title, "Write report");
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.updated_at, now);
    }

    #[test]
    fn validate_draft_requires_title() {
        let draft = TaskDraft::default();
        assert!(Task::validate_draft(&draft).is_err());
    }

    #[test]
    fn validate_patch_rejects_blank_title() {
        let patch = TaskPatch {
            title: Some("  ".into()),
            ..Default::default()
        };
        assert!(Task::validate_patch(&patch).is_err());

        // absent title is fine
        assert!(Task::validate_patch(&TaskPatch::default()).is_ok());
    }
}
