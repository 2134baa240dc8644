//! Action executor — performs one action's side effect via the task service.
//!
//! The executor validates an action's parameters against the context,
//! delegates the mutation to the [`TaskService`] collaborator, and — for
//! actions that are themselves trigger types — synthesizes the follow-on
//! context the dispatcher feeds back into rule processing. It never decides
//! ordering, retries, or failure policy; that is the dispatcher's job.

use chrono::DateTime;
use serde_json::Value;

use boardflow_domain::automation::{Action, ActionError, Trigger, TriggerContext};
use boardflow_domain::board::TaskSnapshot;
use boardflow_domain::time::Timestamp;

use crate::ports::TaskService;

/// Executes single actions against a trigger context.
pub struct ActionExecutor<T> {
    tasks: T,
}

impl<T: TaskService> ActionExecutor<T> {
    pub fn new(tasks: T) -> Self {
        Self { tasks }
    }

    /// Perform one action.
    ///
    /// On success, returns the follow-on [`TriggerContext`] for chainable
    /// actions (`move_task`, `assign_member`, `add_label`, `remove_label`,
    /// `post_comment`) and `None` for the rest.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::InvalidParameters`] when the action is
    /// structurally invalid for this context (no task to mutate, malformed
    /// due date, non-HTTP webhook URL), or whatever typed failure the task
    /// service reported.
    pub async fn perform(
        &self,
        action: &Action,
        context: &TriggerContext,
    ) -> Result<Option<TriggerContext>, ActionError> {
        match action {
            Action::MoveTask { target_list_id } => {
                let task = require_task(context)?;
                self.tasks.move_task(task.id, *target_list_id).await?;
                let from = task.list_id;
                let mut moved = task.clone();
                moved.list_id = *target_list_id;
                Ok(Some(TriggerContext {
                    list_id: Some(*target_list_id),
                    from_list_id: Some(from),
                    to_list_id: Some(*target_list_id),
                    ..chained(context, Trigger::TaskMoved, moved)
                }))
            }
            Action::AssignMember { user_id } => {
                let task = require_task(context)?;
                let user = self.tasks.assign_member(task.id, *user_id).await?;
                let mut updated = task.clone();
                updated.assignee = Some(user.clone());
                Ok(Some(TriggerContext {
                    user: Some(user),
                    ..chained(context, Trigger::MemberAssigned, updated)
                }))
            }
            Action::AddLabel { label_id } => {
                let task = require_task(context)?;
                let label = self.tasks.add_label(task.id, *label_id).await?;
                let mut updated = task.clone();
                if !updated.labels.iter().any(|l| l.id == label.id) {
                    updated.labels.push(label.clone());
                }
                Ok(Some(TriggerContext {
                    label: Some(label),
                    ..chained(context, Trigger::LabelAdded, updated)
                }))
            }
            Action::RemoveLabel { label_id } => {
                let task = require_task(context)?;
                let label = self.tasks.remove_label(task.id, *label_id).await?;
                let mut updated = task.clone();
                updated.labels.retain(|l| l.id != label.id);
                Ok(Some(TriggerContext {
                    label: Some(label),
                    ..chained(context, Trigger::LabelRemoved, updated)
                }))
            }
            Action::SetDueDate { date } => {
                let task = require_task(context)?;
                let due = parse_due_date(date)?;
                self.tasks.set_due_date(task.id, due).await?;
                Ok(None)
            }
            Action::PostComment { text } => {
                let task = require_task(context)?;
                let rendered = render_template(text, context);
                self.tasks.post_comment(task.id, rendered.clone()).await?;
                Ok(Some(TriggerContext {
                    comment: Some(rendered),
                    ..chained(context, Trigger::CommentAdded, task.clone())
                }))
            }
            Action::SendWebhook { url, payload } => {
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    return Err(ActionError::invalid_parameters(format!(
                        "webhook url is not http(s): {url}"
                    )));
                }
                self.tasks.send_webhook(url.clone(), payload.clone()).await?;
                Ok(None)
            }
            Action::CreateChecklistItem { content } => {
                let task = require_task(context)?;
                self.tasks
                    .create_checklist_item(task.id, content.clone())
                    .await?;
                Ok(None)
            }
            // Caught by the rule definition check; kept total for safety.
            Action::Unknown => Err(ActionError::invalid_parameters(
                "unrecognized action type",
            )),
        }
    }
}

/// Base for a derived context: same board, new trigger, updated task,
/// everything situational cleared. The chained event's actor is the
/// automation itself, not the original user, so `user` is not carried over.
fn chained(context: &TriggerContext, trigger: Trigger, task: TaskSnapshot) -> TriggerContext {
    TriggerContext {
        board_id: context.board_id,
        trigger,
        task: Some(task),
        list_id: None,
        label: None,
        user: None,
        comment: None,
        due_date: None,
        from_list_id: None,
        to_list_id: None,
    }
}

fn require_task(context: &TriggerContext) -> Result<&TaskSnapshot, ActionError> {
    context
        .task
        .as_ref()
        .ok_or_else(|| ActionError::invalid_parameters("trigger context carries no task"))
}

fn parse_due_date(date: &str) -> Result<Timestamp, ActionError> {
    DateTime::parse_from_rfc3339(date)
        .map(|dt| dt.to_utc())
        .map_err(|err| ActionError::invalid_parameters(format!("invalid due date {date:?}: {err}")))
}

/// Replace `{{field.path}}` placeholders with context field values.
///
/// Unresolvable placeholders render as empty strings; an unterminated
/// placeholder is kept verbatim.
fn render_template(text: &str, context: &TriggerContext) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                if let Some(value) = context.field(after[..end].trim()) {
                    match value {
                        Value::String(s) => out.push_str(&s),
                        other => out.push_str(&other.to_string()),
                    }
                }
                rest = &after[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use boardflow_domain::board::{LabelRef, UserRef};
    use boardflow_domain::id::{BoardId, LabelId, ListId, TaskId, UserId};
    use std::collections::HashMap;
    use std::future::Future;
    use std::sync::Mutex;

    // ── Recording task service ─────────────────────────────────────

    #[derive(Default)]
    struct RecordingTaskService {
        calls: Mutex<Vec<String>>,
        fail_with: Mutex<HashMap<&'static str, ActionError>>,
    }

    impl RecordingTaskService {
        fn fail_on(&self, method: &'static str, error: ActionError) {
            self.fail_with.lock().unwrap().insert(method, error);
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, method: &'static str, detail: String) -> Result<(), ActionError> {
            self.calls.lock().unwrap().push(format!("{method}:{detail}"));
            match self.fail_with.lock().unwrap().get(method) {
                Some(error) => Err(error.clone()),
                None => Ok(()),
            }
        }
    }

    impl TaskService for RecordingTaskService {
        fn move_task(
            &self,
            _task_id: TaskId,
            target_list_id: ListId,
        ) -> impl Future<Output = Result<(), ActionError>> + Send {
            let result = self.record("move_task", target_list_id.to_string());
            async move { result }
        }

        fn assign_member(
            &self,
            _task_id: TaskId,
            user_id: UserId,
        ) -> impl Future<Output = Result<UserRef, ActionError>> + Send {
            let result = self.record("assign_member", user_id.to_string()).map(|()| UserRef {
                id: user_id,
                name: "sam".to_string(),
            });
            async move { result }
        }

        fn add_label(
            &self,
            _task_id: TaskId,
            label_id: LabelId,
        ) -> impl Future<Output = Result<LabelRef, ActionError>> + Send {
            let result = self.record("add_label", label_id.to_string()).map(|()| LabelRef {
                id: label_id,
                name: "Urgent".to_string(),
            });
            async move { result }
        }

        fn remove_label(
            &self,
            _task_id: TaskId,
            label_id: LabelId,
        ) -> impl Future<Output = Result<LabelRef, ActionError>> + Send {
            let result = self
                .record("remove_label", label_id.to_string())
                .map(|()| LabelRef {
                    id: label_id,
                    name: "Urgent".to_string(),
                });
            async move { result }
        }

        fn set_due_date(
            &self,
            _task_id: TaskId,
            date: Timestamp,
        ) -> impl Future<Output = Result<(), ActionError>> + Send {
            let result = self.record("set_due_date", date.to_rfc3339());
            async move { result }
        }

        fn post_comment(
            &self,
            _task_id: TaskId,
            text: String,
        ) -> impl Future<Output = Result<(), ActionError>> + Send {
            let result = self.record("post_comment", text);
            async move { result }
        }

        fn send_webhook(
            &self,
            url: String,
            _payload: serde_json::Value,
        ) -> impl Future<Output = Result<(), ActionError>> + Send {
            let result = self.record("send_webhook", url);
            async move { result }
        }

        fn create_checklist_item(
            &self,
            _task_id: TaskId,
            content: String,
        ) -> impl Future<Output = Result<(), ActionError>> + Send {
            let result = self.record("create_checklist_item", content);
            async move { result }
        }
    }

    // ── Helpers ────────────────────────────────────────────────────

    fn context_with_task() -> TriggerContext {
        TriggerContext::builder()
            .board_id(BoardId::new())
            .trigger(Trigger::LabelAdded)
            .task(
                TaskSnapshot::builder()
                    .title("Fix login flow")
                    .label(LabelRef {
                        id: LabelId::new(),
                        name: "Bug".to_string(),
                    })
                    .build(),
            )
            .label(LabelRef {
                id: LabelId::new(),
                name: "Urgent".to_string(),
            })
            .build()
            .unwrap()
    }

    fn taskless_context() -> TriggerContext {
        TriggerContext::builder()
            .board_id(BoardId::new())
            .trigger(Trigger::DueDatePassed)
            .build()
            .unwrap()
    }

    // ── Tests ──────────────────────────────────────────────────────

    #[tokio::test]
    async fn should_move_task_and_synthesize_task_moved_context() {
        let executor = ActionExecutor::new(RecordingTaskService::default());
        let context = context_with_task();
        let original_list = context.task.as_ref().unwrap().list_id;
        let target = ListId::new();

        let follow_on = executor
            .perform(&Action::MoveTask {
                target_list_id: target,
            }, &context)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(follow_on.trigger, Trigger::TaskMoved);
        assert_eq!(follow_on.board_id, context.board_id);
        assert_eq!(follow_on.from_list_id, Some(original_list));
        assert_eq!(follow_on.to_list_id, Some(target));
        assert_eq!(follow_on.task.unwrap().list_id, target);
        assert_eq!(
            executor.tasks.calls(),
            vec![format!("move_task:{target}")]
        );
    }

    #[tokio::test]
    async fn should_assign_member_with_resolved_user_in_follow_on() {
        let executor = ActionExecutor::new(RecordingTaskService::default());
        let context = context_with_task();
        let user_id = UserId::new();

        let follow_on = executor
            .perform(&Action::AssignMember { user_id }, &context)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(follow_on.trigger, Trigger::MemberAssigned);
        let user = follow_on.user.unwrap();
        assert_eq!(user.id, user_id);
        assert_eq!(user.name, "sam");
        assert_eq!(
            follow_on.task.unwrap().assignee.map(|u| u.id),
            Some(user_id)
        );
    }

    #[tokio::test]
    async fn should_add_label_to_follow_on_task_snapshot() {
        let executor = ActionExecutor::new(RecordingTaskService::default());
        let context = context_with_task();
        let label_id = LabelId::new();

        let follow_on = executor
            .perform(&Action::AddLabel { label_id }, &context)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(follow_on.trigger, Trigger::LabelAdded);
        assert_eq!(follow_on.label.as_ref().map(|l| l.id), Some(label_id));
        let labels = follow_on.task.unwrap().labels;
        assert_eq!(labels.len(), 2);
        assert!(labels.iter().any(|l| l.id == label_id));
    }

    #[tokio::test]
    async fn should_remove_label_from_follow_on_task_snapshot() {
        let executor = ActionExecutor::new(RecordingTaskService::default());
        let context = context_with_task();
        let existing = context.task.as_ref().unwrap().labels[0].id;

        let follow_on = executor
            .perform(&Action::RemoveLabel { label_id: existing }, &context)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(follow_on.trigger, Trigger::LabelRemoved);
        assert!(follow_on.task.unwrap().labels.is_empty());
    }

    #[tokio::test]
    async fn should_render_comment_template_from_context() {
        let executor = ActionExecutor::new(RecordingTaskService::default());
        let context = context_with_task();

        let follow_on = executor
            .perform(
                &Action::PostComment {
                    text: "Task {{task.title}} got label {{label.name}}".to_string(),
                },
                &context,
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(follow_on.trigger, Trigger::CommentAdded);
        assert_eq!(
            follow_on.comment.as_deref(),
            Some("Task Fix login flow got label Urgent")
        );
        assert_eq!(
            executor.tasks.calls(),
            vec!["post_comment:Task Fix login flow got label Urgent".to_string()]
        );
    }

    #[tokio::test]
    async fn should_parse_due_date_and_produce_no_follow_on() {
        let executor = ActionExecutor::new(RecordingTaskService::default());
        let context = context_with_task();

        let follow_on = executor
            .perform(
                &Action::SetDueDate {
                    date: "2026-04-01T09:00:00+00:00".to_string(),
                },
                &context,
            )
            .await
            .unwrap();
        assert!(follow_on.is_none());
        assert_eq!(executor.tasks.calls().len(), 1);
    }

    #[tokio::test]
    async fn should_fail_with_invalid_parameters_on_malformed_due_date() {
        let executor = ActionExecutor::new(RecordingTaskService::default());
        let context = context_with_task();

        let result = executor
            .perform(
                &Action::SetDueDate {
                    date: "next tuesday".to_string(),
                },
                &context,
            )
            .await;
        assert!(matches!(
            result,
            Err(ActionError::InvalidParameters { .. })
        ));
        // The collaborator was never called for a structurally invalid action.
        assert!(executor.tasks.calls().is_empty());
    }

    #[tokio::test]
    async fn should_fail_with_invalid_parameters_on_non_http_webhook_url() {
        let executor = ActionExecutor::new(RecordingTaskService::default());
        let context = context_with_task();

        let result = executor
            .perform(
                &Action::SendWebhook {
                    url: "ftp://example.com/hook".to_string(),
                    payload: serde_json::json!({}),
                },
                &context,
            )
            .await;
        assert!(matches!(
            result,
            Err(ActionError::InvalidParameters { .. })
        ));
    }

    #[tokio::test]
    async fn should_fail_task_actions_when_context_has_no_task() {
        let executor = ActionExecutor::new(RecordingTaskService::default());
        let context = taskless_context();

        let result = executor
            .perform(
                &Action::CreateChecklistItem {
                    content: "Verify deploy".to_string(),
                },
                &context,
            )
            .await;
        assert!(matches!(
            result,
            Err(ActionError::InvalidParameters { .. })
        ));
    }

    #[tokio::test]
    async fn should_send_webhook_without_requiring_a_task() {
        let executor = ActionExecutor::new(RecordingTaskService::default());
        let context = taskless_context();

        let follow_on = executor
            .perform(
                &Action::SendWebhook {
                    url: "https://example.com/hook".to_string(),
                    payload: serde_json::json!({"reason": "due date passed"}),
                },
                &context,
            )
            .await
            .unwrap();
        assert!(follow_on.is_none());
        assert_eq!(
            executor.tasks.calls(),
            vec!["send_webhook:https://example.com/hook".to_string()]
        );
    }

    #[tokio::test]
    async fn should_propagate_task_service_failure() {
        let tasks = RecordingTaskService::default();
        tasks.fail_on("move_task", ActionError::conflict("task version changed"));
        let executor = ActionExecutor::new(tasks);
        let context = context_with_task();

        let result = executor
            .perform(
                &Action::MoveTask {
                    target_list_id: ListId::new(),
                },
                &context,
            )
            .await;
        assert_eq!(
            result,
            Err(ActionError::conflict("task version changed"))
        );
    }

    #[tokio::test]
    async fn should_fail_unknown_action_type() {
        let executor = ActionExecutor::new(RecordingTaskService::default());
        let result = executor.perform(&Action::Unknown, &context_with_task()).await;
        assert!(matches!(
            result,
            Err(ActionError::InvalidParameters { .. })
        ));
    }

    #[test]
    fn should_render_unknown_placeholders_as_empty() {
        let context = context_with_task();
        let rendered = render_template("[{{task.estimate}}] {{task.title}}", &context);
        assert_eq!(rendered, "[] Fix login flow");
    }

    #[test]
    fn should_keep_unterminated_placeholder_verbatim() {
        let context = context_with_task();
        let rendered = render_template("oops {{task.title", &context);
        assert_eq!(rendered, "oops {{task.title");
    }

    #[test]
    fn should_render_non_string_values_with_json_formatting() {
        let context = context_with_task();
        let rendered = render_template("done={{task.completed}}", &context);
        assert_eq!(rendered, "done=false");
    }
}
