//! Trigger context — an immutable snapshot of "what happened".
//!
//! A context is assembled by the event producer from already-resolved
//! entities; building one performs no IO. Once built it is never mutated:
//! derived contexts for chained actions are new values, so log records stay
//! faithful to what was actually evaluated.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::board::{LabelRef, TaskSnapshot, UserRef};
use crate::error::MalformedContextError;
use crate::id::{BoardId, ListId};
use crate::time::Timestamp;

use super::Trigger;

/// The data snapshot describing one occurrence of a trigger.
///
/// `board_id` and `trigger` are always present; the remaining fields depend
/// on the trigger type (e.g. `label` is populated for `label_added`,
/// `from_list_id`/`to_list_id` for `task_moved`). Which fields each trigger
/// guarantees is documented by the event producer collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerContext {
    pub board_id: BoardId,
    pub trigger: Trigger,
    pub task: Option<TaskSnapshot>,
    pub list_id: Option<ListId>,
    pub label: Option<LabelRef>,
    /// Actor who caused the event, when one exists.
    pub user: Option<UserRef>,
    pub comment: Option<String>,
    pub due_date: Option<Timestamp>,
    pub from_list_id: Option<ListId>,
    pub to_list_id: Option<ListId>,
}

impl TriggerContext {
    /// Create a builder for assembling a [`TriggerContext`].
    #[must_use]
    pub fn builder() -> TriggerContextBuilder {
        TriggerContextBuilder::default()
    }

    /// Resolve a condition field path against this context.
    ///
    /// This is a fixed lookup table, not reflection. Paths that are not in
    /// the table, or whose underlying field is absent for this trigger,
    /// resolve to `None` — condition evaluation treats that as a non-match,
    /// never an error.
    ///
    /// Supported paths: `board_id`, `trigger`, `list_id`, `from_list_id`,
    /// `to_list_id`, `due_date`, `comment`, `task.id`, `task.title`,
    /// `task.list_id`, `task.completed`, `task.due_date`, `task.labels`
    /// (label names), `task.checklist` (item contents),
    /// `task.assignee.id`, `task.assignee.name`, `label.id`, `label.name`,
    /// `user.id`, `user.name`.
    #[must_use]
    pub fn field(&self, path: &str) -> Option<Value> {
        match path {
            "board_id" => Some(json!(self.board_id)),
            "trigger" => Some(json!(self.trigger)),
            "list_id" => self.list_id.map(|id| json!(id)),
            "from_list_id" => self.from_list_id.map(|id| json!(id)),
            "to_list_id" => self.to_list_id.map(|id| json!(id)),
            "due_date" => self.due_date.map(|ts| json!(ts.to_rfc3339())),
            "comment" => self.comment.as_ref().map(|text| json!(text)),
            "task.id" => self.task.as_ref().map(|t| json!(t.id)),
            "task.title" => self.task.as_ref().map(|t| json!(t.title)),
            "task.list_id" => self.task.as_ref().map(|t| json!(t.list_id)),
            "task.completed" => self.task.as_ref().map(|t| json!(t.completed)),
            "task.due_date" => self
                .task
                .as_ref()
                .and_then(|t| t.due_date)
                .map(|ts| json!(ts.to_rfc3339())),
            "task.labels" => self
                .task
                .as_ref()
                .map(|t| Value::Array(t.labels.iter().map(|l| json!(l.name)).collect())),
            "task.checklist" => self
                .task
                .as_ref()
                .map(|t| Value::Array(t.checklist.iter().map(|i| json!(i.content)).collect())),
            "task.assignee.id" => self
                .task
                .as_ref()
                .and_then(|t| t.assignee.as_ref())
                .map(|u| json!(u.id)),
            "task.assignee.name" => self
                .task
                .as_ref()
                .and_then(|t| t.assignee.as_ref())
                .map(|u| json!(u.name)),
            "label.id" => self.label.as_ref().map(|l| json!(l.id)),
            "label.name" => self.label.as_ref().map(|l| json!(l.name)),
            "user.id" => self.user.as_ref().map(|u| json!(u.id)),
            "user.name" => self.user.as_ref().map(|u| json!(u.name)),
            _ => None,
        }
    }
}

/// Step-by-step builder for [`TriggerContext`].
#[derive(Debug, Default)]
pub struct TriggerContextBuilder {
    board_id: Option<BoardId>,
    trigger: Option<Trigger>,
    task: Option<TaskSnapshot>,
    list_id: Option<ListId>,
    label: Option<LabelRef>,
    user: Option<UserRef>,
    comment: Option<String>,
    due_date: Option<Timestamp>,
    from_list_id: Option<ListId>,
    to_list_id: Option<ListId>,
}

impl TriggerContextBuilder {
    #[must_use]
    pub fn board_id(mut self, board_id: BoardId) -> Self {
        self.board_id = Some(board_id);
        self
    }

    #[must_use]
    pub fn trigger(mut self, trigger: Trigger) -> Self {
        self.trigger = Some(trigger);
        self
    }

    #[must_use]
    pub fn task(mut self, task: TaskSnapshot) -> Self {
        self.task = Some(task);
        self
    }

    #[must_use]
    pub fn list_id(mut self, list_id: ListId) -> Self {
        self.list_id = Some(list_id);
        self
    }

    #[must_use]
    pub fn label(mut self, label: LabelRef) -> Self {
        self.label = Some(label);
        self
    }

    #[must_use]
    pub fn user(mut self, user: UserRef) -> Self {
        self.user = Some(user);
        self
    }

    #[must_use]
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    #[must_use]
    pub fn due_date(mut self, due_date: Timestamp) -> Self {
        self.due_date = Some(due_date);
        self
    }

    #[must_use]
    pub fn from_list_id(mut self, from_list_id: ListId) -> Self {
        self.from_list_id = Some(from_list_id);
        self
    }

    #[must_use]
    pub fn to_list_id(mut self, to_list_id: ListId) -> Self {
        self.to_list_id = Some(to_list_id);
        self
    }

    /// Consume the builder, validate required fields, and return a
    /// [`TriggerContext`].
    ///
    /// # Errors
    ///
    /// Returns [`MalformedContextError`] when `board_id` or `trigger` is
    /// absent — such a context cannot be meaningfully evaluated.
    pub fn build(self) -> Result<TriggerContext, MalformedContextError> {
        let board_id = self
            .board_id
            .ok_or(MalformedContextError::MissingBoardId)?;
        let trigger = self.trigger.ok_or(MalformedContextError::MissingTrigger)?;
        Ok(TriggerContext {
            board_id,
            trigger,
            task: self.task,
            list_id: self.list_id,
            label: self.label,
            user: self.user,
            comment: self.comment,
            due_date: self.due_date,
            from_list_id: self.from_list_id,
            to_list_id: self.to_list_id,
        })
    }
}
