//! Weakly-typed value model.
//!
//! [`Value`] mirrors the value space of a decoded JSON document and reproduces the coercion rules
//! of JavaScript for the subset of operations the condition language needs. All SDKs share the
//! same targeting configuration, so coercions must produce the same decisions everywhere.
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A JSON-compatible value with JavaScript-style coercions.
///
/// Values are immutable once constructed. [`Value::cast`] always returns a new value.
///
/// # Examples
/// ```
/// # use flag_targeting::{Value, ValueType};
/// let age: Value = "42".into();
/// assert_eq!(age.cast(ValueType::Number), Value::Number(42.0));
/// assert_eq!(Value::from(true).cast(ValueType::String), Value::from("true"));
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// A null value or absence of value.
    #[default]
    Null,
    /// A boolean value.
    Bool(bool),
    /// A numerical value. All numbers are 64-bit floats.
    Number(f64),
    /// A string value.
    String(String),
    /// An ordered list of values.
    Array(Vec<Value>),
    /// A mapping from field name to value. Field order is irrelevant.
    Object(HashMap<String, Value>),
}

/// Type tag of a [`Value`].
///
/// Arrays and objects are distinct types (unlike `typeof` in JavaScript).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum ValueType {
    Null,
    Boolean,
    Number,
    String,
    Array,
    Object,
}

impl ValueType {
    /// Parse a type name as used by the `$type` operator.
    pub fn from_name(name: &str) -> Option<ValueType> {
        Some(match name {
            "null" => ValueType::Null,
            "boolean" => ValueType::Boolean,
            "number" => ValueType::Number,
            "string" => ValueType::String,
            "array" => ValueType::Array,
            "object" => ValueType::Object,
            _ => return None,
        })
    }

    /// Name of the type as accepted by [`ValueType::from_name`].
    pub fn name(self) -> &'static str {
        match self {
            ValueType::Null => "null",
            ValueType::Boolean => "boolean",
            ValueType::Number => "number",
            ValueType::String => "string",
            ValueType::Array => "array",
            ValueType::Object => "object",
        }
    }
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl Value {
    /// Return the type tag of the value.
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Null => ValueType::Null,
            Value::Bool(_) => ValueType::Boolean,
            Value::Number(_) => ValueType::Number,
            Value::String(_) => ValueType::String,
            Value::Array(_) => ValueType::Array,
            Value::Object(_) => ValueType::Object,
        }
    }

    /// Coerce the value to the given type.
    ///
    /// This never fails: if there is no meaningful coercion, `Value::Null` is returned. Casting to
    /// the value's own type returns an identical value. Arrays and objects cannot be produced from
    /// other types.
    pub fn cast(&self, ty: ValueType) -> Value {
        match ty {
            ValueType::Null => Value::Null,
            ValueType::Boolean => Value::Bool(self.to_bool()),
            ValueType::Number => self.to_number().map_or(Value::Null, Value::Number),
            ValueType::String => self.to_js_string().map_or(Value::Null, Value::String),
            ValueType::Array | ValueType::Object if self.value_type() == ty => self.clone(),
            ValueType::Array | ValueType::Object => Value::Null,
        }
    }

    /// Truthiness of the value. Strings are truthy when non-empty regardless of content.
    pub fn to_bool(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) => true,
        }
    }

    /// Numeric form of the value, or `None` if the value has no numeric interpretation.
    pub fn to_number(&self) -> Option<f64> {
        match self {
            Value::Null => Some(0.0),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Number(n) => Some(*n),
            Value::String(s) => parse_number(s),
            Value::Array(items) => match items.as_slice() {
                [] => Some(0.0),
                [item] => item.to_number(),
                _ => None,
            },
            Value::Object(_) => None,
        }
    }

    /// String form of the value, or `None` for objects (and arrays containing them).
    pub fn to_js_string(&self) -> Option<String> {
        match self {
            Value::Null => Some("null".to_owned()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Number(n) => Some(format_number(*n)),
            Value::String(s) => Some(s.clone()),
            Value::Array(items) => {
                let parts = items
                    .iter()
                    .map(Value::to_js_string)
                    .collect::<Option<Vec<_>>>()?;
                Some(parts.join(","))
            }
            Value::Object(_) => None,
        }
    }

    /// Strict equality: same variant and same contents, without any coercion.
    ///
    /// Numbers compare numerically. `NaN` is considered equal to itself so that equality stays
    /// reflexive.
    pub fn equal(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(a, b)| a.equal(b))
            }
            (Value::Object(a), Value::Object(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .all(|(key, a)| b.get(key).is_some_and(|b| a.equal(b)))
            }
            _ => false,
        }
    }

    /// Best-effort conversion from any serializable host value. Values that cannot be represented
    /// become `Value::Null`.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Value {
        serde_json::to_value(value).map_or(Value::Null, Value::from)
    }

    #[allow(missing_docs)]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[allow(missing_docs)]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    #[allow(missing_docs)]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    #[allow(missing_docs)]
    pub fn as_object(&self) -> Option<&HashMap<String, Value>> {
        match self {
            Value::Object(fields) => Some(fields),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.equal(other)
    }
}

/// Parse a string the way `Number(s)` does for decimal input.
///
/// Surrounding whitespace is ignored and an empty string is zero. `f64::from_str` also accepts
/// `inf`/`nan` spellings, which are not numbers here.
fn parse_number(s: &str) -> Option<f64> {
    let s = s.trim();
    match s {
        "" => return Some(0.0),
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }
    if s
        .bytes()
        .any(|b| b.is_ascii_alphabetic() && b != b'e' && b != b'E')
    {
        return None;
    }
    s.parse().ok()
}

/// Shortest round-trip representation of a number, switching to exponent notation at the same
/// magnitudes as `Number.prototype.toString`.
fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_owned();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_owned();
    }
    if n == 0.0 {
        // Also covers -0.
        return "0".to_owned();
    }

    let magnitude = n.abs();
    if magnitude >= 1e21 || magnitude < 1e-6 {
        let s = format!("{n:e}");
        match s.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{mantissa}e+{exponent}")
            }
            _ => s,
        }
    } else {
        n.to_string()
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Number(value.into())
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(value.into())
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Number(value.into())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(value as f64)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::Number(value as f64)
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        Value::Number(value as f64)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_owned())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Value::Array(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<HashMap<String, T>> for Value {
    fn from(value: HashMap<String, T>) -> Self {
        Value::Object(
            value
                .into_iter()
                .map(|(key, value)| (key, value.into()))
                .collect(),
        )
    }
}

impl From<&serde_json::Value> for Value {
    fn from(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => n.as_f64().map_or(Value::Null, Value::Number),
            serde_json::Value::String(s) => Value::String(s.clone()),
            serde_json::Value::Array(items) => Value::Array(items.iter().map(Value::from).collect()),
            serde_json::Value::Object(fields) => Value::Object(
                fields
                    .iter()
                    .map(|(key, value)| (key.clone(), Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        Value::from(&value)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde_json::json;

    use super::{Value, ValueType};

    fn samples() -> Vec<Value> {
        vec![
            Value::Null,
            true.into(),
            false.into(),
            0.0.into(),
            (-12.5).into(),
            "".into(),
            "hello".into(),
            Value::from(vec![1.0, 2.0]),
            Value::from(json!({"a": [1, {"b": null}]})),
        ]
    }

    #[test]
    fn cast_to_bool() {
        assert_eq!(Value::Null.cast(ValueType::Boolean), false.into());
        assert_eq!(Value::from(2.0).cast(ValueType::Boolean), true.into());
        assert_eq!(Value::from(0.0).cast(ValueType::Boolean), false.into());
        assert_eq!(Value::from("").cast(ValueType::Boolean), false.into());
        // Content does not matter.
        assert_eq!(Value::from("false").cast(ValueType::Boolean), true.into());
        assert_eq!(Value::from(json!([])).cast(ValueType::Boolean), true.into());
        assert_eq!(Value::from(json!({})).cast(ValueType::Boolean), true.into());
    }

    #[test]
    fn cast_to_number() {
        assert_eq!(Value::Null.cast(ValueType::Number), 0.0.into());
        assert_eq!(Value::from(true).cast(ValueType::Number), 1.0.into());
        assert_eq!(Value::from(false).cast(ValueType::Number), 0.0.into());
        assert_eq!(Value::from("  12.5 ").cast(ValueType::Number), 12.5.into());
        assert_eq!(Value::from("").cast(ValueType::Number), 0.0.into());
        assert_eq!(Value::from("1e3").cast(ValueType::Number), 1000.0.into());
        assert_eq!(Value::from("abc").cast(ValueType::Number), Value::Null);
        assert_eq!(Value::from("inf").cast(ValueType::Number), Value::Null);
        assert_eq!(Value::from("nan").cast(ValueType::Number), Value::Null);
        assert_eq!(
            Value::from("-Infinity").cast(ValueType::Number),
            f64::NEG_INFINITY.into()
        );
        assert_eq!(Value::from(json!([])).cast(ValueType::Number), 0.0.into());
        assert_eq!(Value::from(json!(["7"])).cast(ValueType::Number), 7.0.into());
        assert_eq!(Value::from(json!([1, 2])).cast(ValueType::Number), Value::Null);
        assert_eq!(Value::from(json!({})).cast(ValueType::Number), Value::Null);
    }

    #[test]
    fn cast_to_string() {
        assert_eq!(Value::Null.cast(ValueType::String), "null".into());
        assert_eq!(Value::from(false).cast(ValueType::String), "false".into());
        assert_eq!(Value::from(100.0).cast(ValueType::String), "100".into());
        assert_eq!(Value::from(0.1).cast(ValueType::String), "0.1".into());
        assert_eq!(Value::from(-0.0).cast(ValueType::String), "0".into());
        assert_eq!(Value::from(1e21).cast(ValueType::String), "1e+21".into());
        assert_eq!(Value::from(1.5e-7).cast(ValueType::String), "1.5e-7".into());
        assert_eq!(
            Value::from(json!([1, [2, 3], "a"])).cast(ValueType::String),
            "1,2,3,a".into()
        );
        assert_eq!(Value::from(json!({"a": 1})).cast(ValueType::String), Value::Null);
    }

    #[test]
    fn cast_to_containers_is_unsupported() {
        assert_eq!(Value::from("a,b").cast(ValueType::Array), Value::Null);
        assert_eq!(Value::from(1.0).cast(ValueType::Object), Value::Null);
    }

    #[test]
    fn cast_to_own_type_is_identity() {
        for value in samples() {
            assert_eq!(value.cast(value.value_type()), value, "{value:?}");
        }
    }

    #[test]
    fn equal_is_reflexive_and_symmetric() {
        let samples = samples();
        for a in &samples {
            assert!(a.equal(a), "{a:?}");
            for b in &samples {
                assert_eq!(a.equal(b), b.equal(a), "{a:?} vs {b:?}");
            }
        }
        assert!(Value::from(f64::NAN).equal(&Value::from(f64::NAN)));
    }

    #[test]
    fn equal_does_not_coerce() {
        assert!(!Value::from(1.0).equal(&"1".into()));
        assert!(!Value::from(0.0).equal(&false.into()));
        assert!(!Value::Null.equal(&"null".into()));
        assert!(Value::from(json!({"a": [1, 2]})).equal(&Value::from(json!({"a": [1, 2]}))));
        assert!(!Value::from(json!({"a": [1, 2]})).equal(&Value::from(json!({"a": [2, 1]}))));
    }

    #[test]
    fn from_host_values() {
        assert_eq!(Value::from(42_i64), Value::Number(42.0));
        assert_eq!(Value::from(None::<String>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::from("x"));
        assert_eq!(
            Value::from(HashMap::from([("a".to_owned(), 1.0)])),
            Value::from(json!({"a": 1}))
        );

        #[derive(serde::Serialize)]
        struct User {
            id: u32,
            tags: Vec<&'static str>,
        }
        assert_eq!(
            Value::from_serialize(&User {
                id: 7,
                tags: vec!["beta"]
            }),
            Value::from(json!({"id": 7, "tags": ["beta"]}))
        );
    }

    #[test]
    fn deserialize_from_json() {
        let value: Value = serde_json::from_str(r#"{"a": [null, true, 1, "x"]}"#).unwrap();
        assert_eq!(
            value,
            Value::Object(HashMap::from([(
                "a".to_owned(),
                Value::Array(vec![Value::Null, true.into(), 1.0.into(), "x".into()])
            )]))
        );
    }

    #[test]
    fn type_names() {
        for ty in [
            ValueType::Null,
            ValueType::Boolean,
            ValueType::Number,
            ValueType::String,
            ValueType::Array,
            ValueType::Object,
        ] {
            assert_eq!(ValueType::from_name(ty.name()), Some(ty));
        }
        assert_eq!(ValueType::from_name("undefined"), None);
    }
}
