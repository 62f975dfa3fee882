//! Relational comparison of [`Value`]s and version-string canonicalization.
use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::Value;

/// Outcome of comparing two values with [`relate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Relation {
    Less,
    Equal,
    Greater,
    /// The values have no common ordering (e.g., a number and a non-numeric string).
    Incomparable,
}

impl Relation {
    /// Relation with operands swapped.
    pub fn reverse(self) -> Relation {
        match self {
            Relation::Less => Relation::Greater,
            Relation::Greater => Relation::Less,
            other => other,
        }
    }
}

impl From<Ordering> for Relation {
    fn from(value: Ordering) -> Self {
        match value {
            Ordering::Less => Relation::Less,
            Ordering::Equal => Relation::Equal,
            Ordering::Greater => Relation::Greater,
        }
    }
}

/// Compare two values the way JavaScript relational operators do.
///
/// Two strings compare lexicographically. Everything else is compared numerically after casting
/// both sides to numbers. If either side has no numeric form (or is `NaN`), the values are
/// incomparable.
pub fn relate(a: &Value, b: &Value) -> Relation {
    match (a, b) {
        (Value::Null, Value::Null) => Relation::Equal,
        (Value::String(a), Value::String(b)) => a.cmp(b).into(),
        _ => match (a.to_number(), b.to_number()) {
            (Some(a), Some(b)) => a.partial_cmp(&b).map_or(Relation::Incomparable, Into::into),
            _ => Relation::Incomparable,
        },
    }
}

/// Relational operators shared by plain comparisons (`$lt`, `$eq`, ...) and version comparisons
/// (`$vlt`, `$veq`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum ComparisonOperator {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
}

impl ComparisonOperator {
    /// Check whether the relation satisfies the operator. `Incomparable` satisfies nothing except
    /// `Ne`.
    pub fn accepts(self, relation: Relation) -> bool {
        match self {
            ComparisonOperator::Eq => relation == Relation::Equal,
            ComparisonOperator::Ne => relation != Relation::Equal,
            ComparisonOperator::Lt => relation == Relation::Less,
            ComparisonOperator::Lte => matches!(relation, Relation::Less | Relation::Equal),
            ComparisonOperator::Gt => relation == Relation::Greater,
            ComparisonOperator::Gte => matches!(relation, Relation::Greater | Relation::Equal),
        }
    }
}

/// Canonicalize a version so that plain string ordering approximates semver precedence.
///
/// - Only numbers and strings have a version form. Anything else (or an empty string) is `"0"`.
/// - A leading `v` and build metadata (`+...`) are dropped.
/// - The version is split on `.` and `-`. A plain `major.minor.patch` gets a trailing `~` part, so
///   it sorts after its pre-releases (`~` is greater than any alphanumeric character).
/// - Numeric parts shorter than 5 characters lose their leading zeros and are left-padded with
///   spaces to width 5.
///
/// ```
/// # use flag_targeting::compare::padded_version;
/// assert_eq!(padded_version(&"v1.2.3+build".into()), "    1-    2-    3-~");
/// assert!(padded_version(&"1.2.3-rc.1".into()) < padded_version(&"1.2.3".into()));
/// assert!(padded_version(&"1.9.0".into()) < padded_version(&"1.10.0".into()));
/// ```
pub fn padded_version(value: &Value) -> String {
    let raw = match value {
        Value::Number(_) | Value::String(_) => value.to_js_string().unwrap_or_default(),
        _ => String::new(),
    };
    let raw = if raw.is_empty() { "0" } else { raw.as_str() };

    let version = raw.strip_prefix('v').unwrap_or(raw);
    let version = match version.find('+') {
        Some(build) => &version[..build],
        None => version,
    };

    let mut parts: Vec<&str> = version.split(|c: char| c == '.' || c == '-').collect();
    if parts.len() == 3 {
        parts.push("~");
    }

    parts
        .into_iter()
        .map(pad_version_part)
        .collect::<Vec<_>>()
        .join("-")
}

fn pad_version_part(part: &str) -> String {
    let is_numeric = !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    if is_numeric && part.len() < 5 {
        format!("{:>5}", part.trim_start_matches('0'))
    } else {
        part.to_owned()
    }
}
