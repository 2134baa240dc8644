//! Task service port — the external mutation collaborator.
//!
//! Every action delegates exactly one side effect to this port. The engine
//! knows nothing about storage mechanics or write serialization; conflicting
//! concurrent writes on the same task are the store's problem and come back
//! as [`ActionError::Conflict`], an ordinary action failure.

use std::future::Future;
use std::sync::Arc;

use boardflow_domain::automation::ActionError;
use boardflow_domain::board::{LabelRef, UserRef};
use boardflow_domain::id::{LabelId, ListId, TaskId, UserId};
use boardflow_domain::time::Timestamp;

/// Mutations the engine can request against the board.
///
/// Methods that attach an entity the engine only knows by id return the
/// resolved reference, so chained trigger contexts carry display names
/// without the engine performing lookups of its own.
pub trait TaskService {
    fn move_task(
        &self,
        task_id: TaskId,
        target_list_id: ListId,
    ) -> impl Future<Output = Result<(), ActionError>> + Send;

    fn assign_member(
        &self,
        task_id: TaskId,
        user_id: UserId,
    ) -> impl Future<Output = Result<UserRef, ActionError>> + Send;

    fn add_label(
        &self,
        task_id: TaskId,
        label_id: LabelId,
    ) -> impl Future<Output = Result<LabelRef, ActionError>> + Send;

    fn remove_label(
        &self,
        task_id: TaskId,
        label_id: LabelId,
    ) -> impl Future<Output = Result<LabelRef, ActionError>> + Send;

    fn set_due_date(
        &self,
        task_id: TaskId,
        date: Timestamp,
    ) -> impl Future<Output = Result<(), ActionError>> + Send;

    fn post_comment(
        &self,
        task_id: TaskId,
        text: String,
    ) -> impl Future<Output = Result<(), ActionError>> + Send;

    fn send_webhook(
        &self,
        url: String,
        payload: serde_json::Value,
    ) -> impl Future<Output = Result<(), ActionError>> + Send;

    fn create_checklist_item(
        &self,
        task_id: TaskId,
        content: String,
    ) -> impl Future<Output = Result<(), ActionError>> + Send;
}

impl<T: TaskService + Send + Sync> TaskService for Arc<T> {
    fn move_task(
        &self,
        task_id: TaskId,
        target_list_id: ListId,
    ) -> impl Future<Output = Result<(), ActionError>> + Send {
        (**self).move_task(task_id, target_list_id)
    }

    fn assign_member(
        &self,
        task_id: TaskId,
        user_id: UserId,
    ) -> impl Future<Output = Result<UserRef, ActionError>> + Send {
        (**self).assign_member(task_id, user_id)
    }

    fn add_label(
        &self,
        task_id: TaskId,
        label_id: LabelId,
    ) -> impl Future<Output = Result<LabelRef, ActionError>> + Send {
        (**self).add_label(task_id, label_id)
    }

    fn remove_label(
        &self,
        task_id: TaskId,
        label_id: LabelId,
    ) -> impl Future<Output = Result<LabelRef, ActionError>> + Send {
        (**self).remove_label(task_id, label_id)
    }

    fn set_due_date(
        &self,
        task_id: TaskId,
        date: Timestamp,
    ) -> impl Future<Output = Result<(), ActionError>> + Send {
        (**self).set_due_date(task_id, date)
    }

    fn post_comment(
        &self,
        task_id: TaskId,
        text: String,
    ) -> impl Future<Output = Result<(), ActionError>> + Send {
        (**self).post_comment(task_id, text)
    }

    fn send_webhook(
        &self,
        url: String,
        payload: serde_json::Value,
    ) -> impl Future<Output = Result<(), ActionError>> + Send {
        (**self).send_webhook(url, payload)
    }

    fn create_checklist_item(
        &self,
        task_id: TaskId,
        content: String,
    ) -> impl Future<Output = Result<(), ActionError>> + Send {
        (**self).create_checklist_item(task_id, content)
    }
}
