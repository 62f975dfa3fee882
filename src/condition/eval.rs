use crate::{
    compare::{padded_version, relate, ComparisonOperator},
    SavedGroups, Value,
};

use super::Condition;

static NULL: Value = Value::Null;

impl Condition {
    /// Match `value` against the condition.
    ///
    /// At the top level, `value` is the attribute object. `groups` are consulted by `$inGroup` and
    /// `$notInGroup`.
    pub fn evaluate(&self, value: &Value, groups: &SavedGroups) -> bool {
        match self {
            Condition::And(conditions) => conditions.iter().all(|c| c.evaluate(value, groups)),
            Condition::Or(conditions) => any_or_empty(conditions, value, groups),
            Condition::Nor(conditions) => !any_or_empty(conditions, value, groups),
            Condition::Not(condition) => !condition.evaluate(value, groups),

            Condition::FieldPath { path, inner } => match value {
                Value::Object(_) => inner.evaluate(resolve_path(value, path), groups),
                _ => false,
            },

            Condition::Compare { operator, literal } => match operator {
                ComparisonOperator::Eq => value.equal(literal),
                ComparisonOperator::Ne => !value.equal(literal),
                _ => operator.accepts(relate(value, literal)),
            },

            Condition::ValueEquals(literal) => match literal {
                Value::Null => value.is_null(),
                Value::Array(_) | Value::Object(_) => value.equal(literal),
                _ => value.cast(literal.value_type()).equal(literal),
            },

            Condition::VersionCompare {
                operator,
                padded_literal,
            } => operator.accepts(padded_version(value).cmp(padded_literal).into()),

            Condition::Regex(regex) => value.as_str().is_some_and(|s| regex.is_match(s)),
            Condition::Exists(expected) => !value.is_null() == *expected,
            Condition::TypeIs(expected) => value.value_type() == *expected,

            Condition::Size(inner) => match value {
                Value::Array(items) => inner.evaluate(&Value::Number(items.len() as f64), groups),
                _ => false,
            },

            Condition::In(set) => is_in(value, set),
            Condition::NotIn(set) => !is_in(value, set),

            Condition::InGroup(name) => groups
                .get(name)
                .is_some_and(|members| members.iter().any(|member| member.equal(value))),

            Condition::ElemMatch(inner) => match value {
                Value::Array(items) => items.iter().any(|item| inner.evaluate(item, groups)),
                _ => false,
            },

            Condition::All(conditions) => match value {
                Value::Array(items) => conditions
                    .iter()
                    .all(|condition| items.iter().any(|item| condition.evaluate(item, groups))),
                _ => false,
            },

            Condition::True => true,
            Condition::False => false,
        }
    }
}

fn any_or_empty(conditions: &[Condition], value: &Value, groups: &SavedGroups) -> bool {
    conditions.is_empty() || conditions.iter().any(|c| c.evaluate(value, groups))
}

/// Walk `path` through nested objects. Missing fields and non-object intermediates resolve to
/// null.
fn resolve_path<'a>(value: &'a Value, path: &[String]) -> &'a Value {
    path.iter()
        .try_fold(value, |current, key| current.as_object()?.get(key))
        .unwrap_or(&NULL)
}

/// An array matches if any of its elements is in the set.
fn is_in(value: &Value, set: &[Value]) -> bool {
    let contains = |value: &Value| set.iter().any(|member| member.equal(value));
    match value {
        Value::Array(items) => items.iter().any(contains),
        _ => contains(value),
    }
}
