//! Targeting conditions.
//!
//! A condition document uses a MongoDB-like query language:
//!
//! ```json
//! {
//!   "country": {"$in": ["US", "CA"]},
//!   "app.version": {"$vgte": "2.1.0"},
//!   "$or": [{"beta": true}, {"id": {"$inGroup": "employees"}}]
//! }
//! ```
//!
//! [`Condition::build`] compiles the document into a tree once. [`Condition::evaluate`] then
//! matches the tree against an attribute object as many times as needed, from as many threads as
//! needed.
mod builder;
mod error;
mod eval;

use regex::Regex;

use crate::{compare::ComparisonOperator, Value, ValueType};

pub use error::BuildError;

/// A compiled condition.
///
/// Each node owns its children. Evaluation never fails: unexpected data makes a node evaluate to
/// `false`.
#[derive(Debug, Clone)]
pub enum Condition {
    /// All children match. Empty list matches.
    And(Vec<Condition>),
    /// At least one child matches. Empty list matches.
    Or(Vec<Condition>),
    /// No child matches. Empty list does not match.
    Nor(Vec<Condition>),
    /// The child does not match.
    Not(Box<Condition>),
    /// Resolve a dotted path inside an object and match the field value against `inner`.
    FieldPath {
        /// Path segments.
        path: Vec<String>,
        #[allow(missing_docs)]
        inner: Box<Condition>,
    },
    /// `$eq`, `$ne`, `$lt`, `$lte`, `$gt`, `$gte`.
    Compare {
        #[allow(missing_docs)]
        operator: ComparisonOperator,
        #[allow(missing_docs)]
        literal: Value,
    },
    /// Field compared to a literal without an operator (`{"country": "US"}`).
    ValueEquals(Value),
    /// `$veq`, `$vne`, `$vlt`, `$vlte`, `$vgt`, `$vgte`.
    VersionCompare {
        #[allow(missing_docs)]
        operator: ComparisonOperator,
        /// Literal version, already padded with [`padded_version`](crate::compare::padded_version).
        padded_literal: String,
    },
    /// `$regex`.
    Regex(Regex),
    /// `$exists`.
    Exists(bool),
    /// `$type`.
    TypeIs(ValueType),
    /// `$size`: match the array length against the inner condition.
    Size(Box<Condition>),
    /// `$in`.
    In(Vec<Value>),
    /// `$nin`.
    NotIn(Vec<Value>),
    /// `$inGroup`. `$notInGroup` is `Not(InGroup)`.
    InGroup(String),
    /// `$elemMatch`.
    ElemMatch(Box<Condition>),
    /// `$all`: every child is matched by at least one array element.
    All(Vec<Condition>),
    #[allow(missing_docs)]
    True,
    #[allow(missing_docs)]
    False,
}

/// Operators allowed inside an operator object (`{"$gt": 1, "$lt": 10}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Operator {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
    Veq,
    Vne,
    Vlt,
    Vlte,
    Vgt,
    Vgte,
    Regex,
    Exists,
    Type,
    Size,
    In,
    Nin,
    InGroup,
    NotInGroup,
    ElemMatch,
    All,
    Not,
}

impl Operator {
    /// Look up an operator by its key (including the `$` prefix). Returns `None` for unknown
    /// operators.
    pub fn from_key(key: &str) -> Option<Operator> {
        Some(match key {
            "$eq" => Operator::Eq,
            "$ne" => Operator::Ne,
            "$lt" => Operator::Lt,
            "$lte" => Operator::Lte,
            "$gt" => Operator::Gt,
            "$gte" => Operator::Gte,
            "$veq" => Operator::Veq,
            "$vne" => Operator::Vne,
            "$vlt" => Operator::Vlt,
            "$vlte" => Operator::Vlte,
            "$vgt" => Operator::Vgt,
            "$vgte" => Operator::Vgte,
            "$regex" => Operator::Regex,
            "$exists" => Operator::Exists,
            "$type" => Operator::Type,
            "$size" => Operator::Size,
            "$in" => Operator::In,
            "$nin" => Operator::Nin,
            "$inGroup" => Operator::InGroup,
            "$notInGroup" => Operator::NotInGroup,
            "$elemMatch" => Operator::ElemMatch,
            "$all" => Operator::All,
            "$not" => Operator::Not,
            _ => return None,
        })
    }

    /// Relational operator behind a plain or version comparison.
    fn comparison(self) -> Option<ComparisonOperator> {
        Some(match self {
            Operator::Eq | Operator::Veq => ComparisonOperator::Eq,
            Operator::Ne | Operator::Vne => ComparisonOperator::Ne,
            Operator::Lt | Operator::Vlt => ComparisonOperator::Lt,
            Operator::Lte | Operator::Vlte => ComparisonOperator::Lte,
            Operator::Gt | Operator::Vgt => ComparisonOperator::Gt,
            Operator::Gte | Operator::Vgte => ComparisonOperator::Gte,
            _ => return None,
        })
    }

    fn is_version(self) -> bool {
        matches!(
            self,
            Operator::Veq
                | Operator::Vne
                | Operator::Vlt
                | Operator::Vlte
                | Operator::Vgt
                | Operator::Vgte
        )
    }
}
