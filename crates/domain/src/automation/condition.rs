//! Condition — a guard that must hold for a rule's actions to execute.
//!
//! Conditions are `{field, operator, value}` triples combined with implicit
//! AND; there is no OR or grouping (a deliberate scope limit of the rule
//! grammar). Evaluation is pure and total: an absent field or an
//! operator/type mismatch is a non-match, never an error. The only
//! evaluation error is an operator name the engine does not recognize,
//! which must be surfaced to the rule author rather than silently ignored.

use std::cmp::Ordering;

use chrono::DateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::RuleDefinitionError;

use super::TriggerContext;

/// A predicate over one context field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// Field path resolved via [`TriggerContext::field`], e.g. `"label.name"`.
    pub field: String,
    pub operator: Operator,
    /// Comparison operand; unused by `is_empty`/`is_not_empty`.
    #[serde(default)]
    pub value: Value,
}

/// The fixed operator set of the condition grammar.
///
/// Unrecognized operator names deserialize into [`Operator::Other`] so that
/// misconfigured stored rules are representable; evaluating one fails the
/// rule with [`RuleDefinitionError::UnknownOperator`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Equals,
    NotEquals,
    /// Substring match on strings, membership on arrays.
    Contains,
    /// Numeric or RFC 3339 date comparison.
    GreaterThan,
    LessThan,
    IsEmpty,
    IsNotEmpty,
    #[serde(untagged)]
    Other(String),
}

impl Operator {
    fn as_str(&self) -> &str {
        match self {
            Self::Equals => "equals",
            Self::NotEquals => "not_equals",
            Self::Contains => "contains",
            Self::GreaterThan => "greater_than",
            Self::LessThan => "less_than",
            Self::IsEmpty => "is_empty",
            Self::IsNotEmpty => "is_not_empty",
            Self::Other(name) => name,
        }
    }
}

impl Condition {
    /// Evaluate this condition against a context.
    ///
    /// # Errors
    ///
    /// Returns [`RuleDefinitionError::UnknownOperator`] when the operator
    /// was not recognized at deserialization time. Every other input —
    /// absent fields, type mismatches — evaluates to `false`.
    pub fn evaluate(&self, context: &TriggerContext) -> Result<bool, RuleDefinitionError> {
        if let Operator::Other(name) = &self.operator {
            return Err(RuleDefinitionError::UnknownOperator(name.clone()));
        }
        let Some(actual) = context.field(&self.field) else {
            return Ok(false);
        };
        Ok(match &self.operator {
            Operator::Equals => values_equal(&actual, &self.value),
            Operator::NotEquals => !values_equal(&actual, &self.value),
            Operator::Contains => contains(&actual, &self.value),
            Operator::GreaterThan => compare(&actual, &self.value) == Some(Ordering::Greater),
            Operator::LessThan => compare(&actual, &self.value) == Some(Ordering::Less),
            Operator::IsEmpty => is_empty(&actual),
            Operator::IsNotEmpty => !is_empty(&actual),
            // Handled by the early return above.
            Operator::Other(_) => false,
        })
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({}, {})", self.operator.as_str(), self.field, self.value)
    }
}

/// Evaluate a rule's condition list against a context (implicit AND).
///
/// An empty list always matches.
///
/// # Errors
///
/// Returns [`RuleDefinitionError::UnknownOperator`] from the first condition
/// carrying an unrecognized operator.
pub fn evaluate_all(
    conditions: &[Condition],
    context: &TriggerContext,
) -> Result<bool, RuleDefinitionError> {
    for condition in conditions {
        if !condition.evaluate(context)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Equality with numeric coercion, so `1` and `1.0` compare equal.
fn values_equal(left: &Value, right: &Value) -> bool {
    if let (Some(l), Some(r)) = (left.as_f64(), right.as_f64()) {
        return (l - r).abs() < f64::EPSILON;
    }
    left == right
}

fn contains(actual: &Value, needle: &Value) -> bool {
    match actual {
        Value::String(s) => needle.as_str().is_some_and(|n| s.contains(n)),
        Value::Array(items) => items.iter().any(|item| values_equal(item, needle)),
        _ => false,
    }
}

/// Order two values when both are numbers or both are RFC 3339 dates.
fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    if let (Some(l), Some(r)) = (left.as_f64(), right.as_f64()) {
        return l.partial_cmp(&r);
    }
    if let (Some(l), Some(r)) = (left.as_str(), right.as_str()) {
        if let (Ok(l), Ok(r)) = (
            DateTime::parse_from_rfc3339(l),
            DateTime::parse_from_rfc3339(r),
        ) {
            return Some(l.cmp(&r));
        }
    }
    None
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{LabelRef, TaskSnapshot};
    use crate::id::{BoardId, LabelId};
    use crate::automation::Trigger;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn urgent_context() -> TriggerContext {
        TriggerContext::builder()
            .board_id(BoardId::new())
            .trigger(Trigger::LabelAdded)
            .task(
                TaskSnapshot::builder()
                    .title("Fix login flow")
                    .label(LabelRef {
                        id: LabelId::new(),
                        name: "Urgent".to_string(),
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

    fn condition(field: &str, operator: Operator, value: Value) -> Condition {
        Condition {
            field: field.to_string(),
            operator,
            value,
        }
    }

    #[test]
    fn should_match_empty_condition_list_against_any_context() {
        assert!(evaluate_all(&[], &urgent_context()).unwrap());
    }

    #[test]
    fn should_match_equals_on_label_name() {
        let c = condition("label.name", Operator::Equals, json!("Urgent"));
        assert!(c.evaluate(&urgent_context()).unwrap());
    }

    #[test]
    fn should_not_match_equals_on_different_label_name() {
        let c = condition("label.name", Operator::Equals, json!("Minor"));
        assert!(!c.evaluate(&urgent_context()).unwrap());
    }

    #[test]
    fn should_match_not_equals_when_values_differ() {
        let c = condition("label.name", Operator::NotEquals, json!("Minor"));
        assert!(c.evaluate(&urgent_context()).unwrap());
    }

    #[test]
    fn should_evaluate_false_when_field_absent_for_every_operator() {
        let context = urgent_context();
        for operator in [
            Operator::Equals,
            Operator::NotEquals,
            Operator::Contains,
            Operator::GreaterThan,
            Operator::LessThan,
            Operator::IsEmpty,
            Operator::IsNotEmpty,
        ] {
            let c = condition("user.name", operator, json!("alex"));
            assert!(!c.evaluate(&context).unwrap());
        }
    }

    #[test]
    fn should_match_contains_as_substring_on_strings() {
        let c = condition("task.title", Operator::Contains, json!("login"));
        assert!(c.evaluate(&urgent_context()).unwrap());
    }

    #[test]
    fn should_match_contains_as_membership_on_arrays() {
        let c = condition("task.labels", Operator::Contains, json!("Urgent"));
        assert!(c.evaluate(&urgent_context()).unwrap());
        let c = condition("task.labels", Operator::Contains, json!("Bug"));
        assert!(!c.evaluate(&urgent_context()).unwrap());
    }

    #[test]
    fn should_evaluate_false_on_operator_type_mismatch() {
        // greater_than on a plain string field is a non-match, not an error.
        let c = condition("label.name", Operator::GreaterThan, json!(3));
        assert!(!c.evaluate(&urgent_context()).unwrap());
    }

    #[test]
    fn should_compare_due_dates_chronologically() {
        let due = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let context = TriggerContext::builder()
            .board_id(BoardId::new())
            .trigger(Trigger::DueDatePassed)
            .due_date(due)
            .build()
            .unwrap();

        let later = condition(
            "due_date",
            Operator::GreaterThan,
            json!("2026-02-01T00:00:00+00:00"),
        );
        assert!(later.evaluate(&context).unwrap());

        let earlier = condition(
            "due_date",
            Operator::LessThan,
            json!("2026-02-01T00:00:00+00:00"),
        );
        assert!(!earlier.evaluate(&context).unwrap());
    }

    #[test]
    fn should_treat_empty_and_missing_collections_differently() {
        // Empty labels array: is_empty matches. Absent user: even is_empty
        // is a non-match, per the totality rule for absent fields.
        let context = TriggerContext::builder()
            .board_id(BoardId::new())
            .trigger(Trigger::TaskCreated)
            .task(TaskSnapshot::builder().title("New task").build())
            .build()
            .unwrap();

        let c = condition("task.labels", Operator::IsEmpty, Value::Null);
        assert!(c.evaluate(&context).unwrap());

        let c = condition("task.labels", Operator::IsNotEmpty, Value::Null);
        assert!(!c.evaluate(&context).unwrap());

        let c = condition("user.name", Operator::IsEmpty, Value::Null);
        assert!(!c.evaluate(&context).unwrap());
    }

    #[test]
    fn should_coerce_integer_and_float_for_equality() {
        let c = condition("task.completed", Operator::Equals, json!(false));
        assert!(c.evaluate(&urgent_context()).unwrap());
        assert!(values_equal(&json!(1), &json!(1.0)));
    }

    #[test]
    fn should_fail_with_unknown_operator() {
        let c = condition(
            "label.name",
            Operator::Other("matches_regex".to_string()),
            json!(".*"),
        );
        assert_eq!(
            c.evaluate(&urgent_context()),
            Err(RuleDefinitionError::UnknownOperator(
                "matches_regex".to_string()
            ))
        );
    }

    #[test]
    fn should_stop_evaluating_all_at_first_false_condition() {
        let conditions = vec![
            condition("label.name", Operator::Equals, json!("Minor")),
            condition("label.name", Operator::Equals, json!("Urgent")),
        ];
        assert!(!evaluate_all(&conditions, &urgent_context()).unwrap());
    }

    #[test]
    fn should_deserialize_known_operator_names() {
        let c: Condition = serde_json::from_value(json!({
            "field": "label.name",
            "operator": "equals",
            "value": "Urgent"
        }))
        .unwrap();
        assert_eq!(c.operator, Operator::Equals);
    }

    #[test]
    fn should_capture_unknown_operator_names_on_deserialization() {
        let c: Condition = serde_json::from_value(json!({
            "field": "label.name",
            "operator": "matches_regex",
            "value": ".*"
        }))
        .unwrap();
        assert_eq!(c.operator, Operator::Other("matches_regex".to_string()));
    }

    #[test]
    fn should_roundtrip_conditions_through_serde_json() {
        let conditions = vec![
            condition("task.labels", Operator::Contains, json!("Urgent")),
            condition("due_date", Operator::IsNotEmpty, Value::Null),
            condition("priority", Operator::Other("between".to_string()), json!([1, 5])),
        ];
        for original in &conditions {
            let json = serde_json::to_string(original).unwrap();
            let parsed: Condition = serde_json::from_str(&json).unwrap();
            assert_eq!(&parsed, original);
        }
    }

    #[test]
    fn should_display_condition_with_operator_and_field() {
        let c = condition("label.name", Operator::Equals, json!("Urgent"));
        assert_eq!(c.to_string(), "equals(label.name, \"Urgent\")");
    }
}
