//! Board entities as seen by the automation engine.
//!
//! These are *snapshots*, not aggregates: the event producer resolves the
//! task, its labels, checklist, and assignee before handing them to the
//! engine inside a trigger context. The engine never loads or stores them.

use serde::{Deserialize, Serialize};

use crate::id::{LabelId, ListId, TaskId, UserId};
use crate::time::Timestamp;

/// A label attached to a task, resolved to its display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelRef {
    pub id: LabelId,
    pub name: String,
}

/// A user reference, resolved to a display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: UserId,
    pub name: String,
}

/// One item on a task's checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub content: String,
    pub done: bool,
}

/// A fully resolved view of a task at the moment a trigger fired.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSnapshot {
    pub id: TaskId,
    pub title: String,
    pub list_id: ListId,
    pub assignee: Option<UserRef>,
    #[serde(default)]
    pub labels: Vec<LabelRef>,
    #[serde(default)]
    pub checklist: Vec<ChecklistItem>,
    pub due_date: Option<Timestamp>,
    pub completed: bool,
}

impl TaskSnapshot {
    /// Create a builder for constructing a [`TaskSnapshot`].
    #[must_use]
    pub fn builder() -> TaskSnapshotBuilder {
        TaskSnapshotBuilder::default()
    }
}

/// Step-by-step builder for [`TaskSnapshot`].
#[derive(Debug, Default)]
pub struct TaskSnapshotBuilder {
    id: Option<TaskId>,
    title: Option<String>,
    list_id: Option<ListId>,
    assignee: Option<UserRef>,
    labels: Vec<LabelRef>,
    checklist: Vec<ChecklistItem>,
    due_date: Option<Timestamp>,
    completed: Option<bool>,
}

impl TaskSnapshotBuilder {
    #[must_use]
    pub fn id(mut self, id: TaskId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn list_id(mut self, list_id: ListId) -> Self {
        self.list_id = Some(list_id);
        self
    }

    #[must_use]
    pub fn assignee(mut self, assignee: UserRef) -> Self {
        self.assignee = Some(assignee);
        self
    }

    #[must_use]
    pub fn label(mut self, label: LabelRef) -> Self {
        self.labels.push(label);
        self
    }

    #[must_use]
    pub fn checklist_item(mut self, item: ChecklistItem) -> Self {
        self.checklist.push(item);
        self
    }

    #[must_use]
    pub fn due_date(mut self, due_date: Timestamp) -> Self {
        self.due_date = Some(due_date);
        self
    }

    #[must_use]
    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    /// Consume the builder and return a [`TaskSnapshot`].
    ///
    /// Missing identifiers default to fresh random ones; a snapshot is a
    /// passive value with no invariants to enforce.
    #[must_use]
    pub fn build(self) -> TaskSnapshot {
        TaskSnapshot {
            id: self.id.unwrap_or_default(),
            title: self.title.unwrap_or_default(),
            list_id: self.list_id.unwrap_or_default(),
            assignee: self.assignee,
            labels: self.labels,
            checklist: self.checklist,
            due_date: self.due_date,
            completed: self.completed.unwrap_or(false),
        }
    }
}
