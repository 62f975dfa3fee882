use regex::Regex;
use serde_json::{Map, Value as JsonValue};

use crate::{compare::padded_version, Value, ValueType};

use super::{BuildError, Condition, Operator};

type Result<T> = std::result::Result<T, BuildError>;

impl Condition {
    /// Build a condition from a decoded condition document.
    ///
    /// The document must be an object. Each key is either a logical operator (`$and`, `$or`,
    /// `$nor`, `$not`) or a dotted field path; multiple keys are implicitly AND-ed, so an empty
    /// document always matches.
    ///
    /// Unknown operators inside an operator object build to [`Condition::False`]. Operators with
    /// arguments of the wrong shape fail the whole build.
    ///
    /// ```
    /// # use flag_targeting::{Condition, SavedGroups, Value};
    /// let condition = Condition::build(&serde_json::json!({
    ///     "country": {"$in": ["US", "CA"]},
    ///     "age": {"$gte": 18},
    /// }))?;
    /// let attributes = Value::from(serde_json::json!({"country": "US", "age": 21}));
    /// assert!(condition.evaluate(&attributes, &SavedGroups::default()));
    /// # Ok::<(), flag_targeting::condition::BuildError>(())
    /// ```
    pub fn build(document: &JsonValue) -> Result<Condition> {
        build_document(document, "")
    }
}

/// Build a (sub-)document. `parent` is only used to report errors.
fn build_document(document: &JsonValue, parent: &str) -> Result<Condition> {
    let JsonValue::Object(fields) = document else {
        return Err(BuildError::NotAnObject {
            path: parent.to_owned(),
        });
    };

    let conditions = fields
        .iter()
        .map(|(key, value)| build_field(key, value, parent))
        .collect::<Result<Vec<_>>>()?;

    Ok(all_of(conditions))
}

fn build_field(key: &str, value: &JsonValue, parent: &str) -> Result<Condition> {
    match key {
        "$and" | "$or" | "$nor" => {
            let JsonValue::Array(items) = value else {
                return Err(BuildError::ExpectedArray {
                    path: parent.to_owned(),
                    operator: key.to_owned(),
                });
            };
            let children = items
                .iter()
                .map(|item| {
                    expect_object(item, parent, key)?;
                    build_document(item, parent)
                })
                .collect::<Result<Vec<_>>>()?;

            Ok(match key {
                "$and" => Condition::And(children),
                "$or" => Condition::Or(children),
                _ => Condition::Nor(children),
            })
        }

        "$not" => {
            expect_object(value, parent, key)?;
            Ok(Condition::Not(Box::new(build_document(value, parent)?)))
        }

        _ => {
            let path = if parent.is_empty() {
                key.to_owned()
            } else {
                format!("{parent}.{key}")
            };
            Ok(Condition::FieldPath {
                path: key.split('.').map(str::to_owned).collect(),
                inner: Box::new(build_value_condition(value, &path)?),
            })
        }
    }
}

/// Build the condition applied to a single field value: either an operator object or a literal.
fn build_value_condition(value: &JsonValue, path: &str) -> Result<Condition> {
    match value {
        JsonValue::Object(operators) if is_operator_object(operators) => {
            let conditions = operators
                .iter()
                .map(|(key, argument)| build_operator(key, argument, path))
                .collect::<Result<Vec<_>>>()?;
            Ok(all_of(conditions))
        }
        literal => Ok(Condition::ValueEquals(literal.into())),
    }
}

fn build_operator(key: &str, argument: &JsonValue, path: &str) -> Result<Condition> {
    let Some(operator) = Operator::from_key(key) else {
        log::trace!(target: "flag_targeting", path, operator = key; "unknown operator never matches");
        return Ok(Condition::False);
    };

    if let Some(comparison) = operator.comparison() {
        let literal = Value::from(argument);
        return Ok(if operator.is_version() {
            Condition::VersionCompare {
                operator: comparison,
                padded_literal: padded_version(&literal),
            }
        } else {
            Condition::Compare {
                operator: comparison,
                literal,
            }
        });
    }

    Ok(match operator {
        Operator::Regex => {
            let pattern = expect_str(argument, path, key)?;
            let regex = Regex::new(pattern).map_err(|source| BuildError::InvalidRegex {
                path: path.to_owned(),
                operator: key.to_owned(),
                source,
            })?;
            Condition::Regex(regex)
        }

        Operator::Exists => Condition::Exists(Value::from(argument).to_bool()),

        Operator::Type => ValueType::from_name(expect_str(argument, path, key)?)
            .map_or(Condition::False, Condition::TypeIs),

        Operator::Size => Condition::Size(Box::new(build_value_condition(argument, path)?)),

        Operator::In => Condition::In(expect_values(argument, path, key)?),
        Operator::Nin => Condition::NotIn(expect_values(argument, path, key)?),

        Operator::InGroup => Condition::InGroup(expect_str(argument, path, key)?.to_owned()),
        Operator::NotInGroup => Condition::Not(Box::new(Condition::InGroup(
            expect_str(argument, path, key)?.to_owned(),
        ))),

        Operator::ElemMatch => {
            let operators = expect_object(argument, path, key)?;
            // Without operators, the argument matches fields of object elements.
            let inner = if is_operator_object(operators) {
                build_value_condition(argument, path)?
            } else {
                build_document(argument, path)?
            };
            Condition::ElemMatch(Box::new(inner))
        }

        Operator::All => {
            let JsonValue::Array(items) = argument else {
                return Err(BuildError::ExpectedArray {
                    path: path.to_owned(),
                    operator: key.to_owned(),
                });
            };
            Condition::All(
                items
                    .iter()
                    .map(|item| build_value_condition(item, path))
                    .collect::<Result<_>>()?,
            )
        }

        Operator::Not => Condition::Not(Box::new(build_value_condition(argument, path)?)),

        // Comparisons are handled above.
        Operator::Eq
        | Operator::Ne
        | Operator::Lt
        | Operator::Lte
        | Operator::Gt
        | Operator::Gte
        | Operator::Veq
        | Operator::Vne
        | Operator::Vlt
        | Operator::Vlte
        | Operator::Vgt
        | Operator::Vgte => Condition::False,
    })
}

/// An object whose keys all start with `$`. Empty objects are literals.
fn is_operator_object(fields: &Map<String, JsonValue>) -> bool {
    !fields.is_empty() && fields.keys().all(|key| key.starts_with('$'))
}

/// Single conditions are used directly instead of being wrapped in `And`.
fn all_of(mut conditions: Vec<Condition>) -> Condition {
    match conditions.pop() {
        Some(condition) if conditions.is_empty() => condition,
        Some(condition) => {
            conditions.push(condition);
            Condition::And(conditions)
        }
        None => Condition::And(conditions),
    }
}

fn expect_object<'a>(
    value: &'a JsonValue,
    path: &str,
    operator: &str,
) -> Result<&'a Map<String, JsonValue>> {
    value.as_object().ok_or_else(|| BuildError::ExpectedObject {
        path: path.to_owned(),
        operator: operator.to_owned(),
    })
}

fn expect_str<'a>(value: &'a JsonValue, path: &str, operator: &str) -> Result<&'a str> {
    value.as_str().ok_or_else(|| BuildError::ExpectedString {
        path: path.to_owned(),
        operator: operator.to_owned(),
    })
}

fn expect_values(value: &JsonValue, path: &str, operator: &str) -> Result<Vec<Value>> {
    let items = value.as_array().ok_or_else(|| BuildError::ExpectedArray {
        path: path.to_owned(),
        operator: operator.to_owned(),
    })?;
    Ok(items.iter().map(Value::from).collect())
}
