use std::collections::HashMap;

use derive_more::From;
use serde::{Deserialize, Serialize};

use crate::Value;

/// Type alias for a HashMap representing key-value pairs of attributes.
///
/// Conditions are evaluated against a [`Value::Object`], which can be built from `Attributes`.
///
/// # Examples
/// ```
/// # use flag_targeting::{Attributes, Value};
/// let attributes = [
///     ("age".to_owned(), 30.0.into()),
///     ("is_premium_member".to_owned(), true.into()),
///     ("username".to_owned(), "john_doe".into()),
/// ].into_iter().collect::<Attributes>();
/// let attributes = Value::from(attributes);
/// ```
pub type Attributes = HashMap<String, Value>;

/// Named lists of values referenced by `$inGroup` and `$notInGroup`.
///
/// Saved groups are maintained outside of conditions and are read-only during evaluation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, From)]
#[serde(transparent)]
pub struct SavedGroups(HashMap<String, Vec<Value>>);

impl SavedGroups {
    /// Create an empty set of groups.
    pub fn new() -> SavedGroups {
        SavedGroups::default()
    }

    /// Members of the group, or `None` if there is no such group.
    pub fn get(&self, name: &str) -> Option<&[Value]> {
        self.0.get(name).map(Vec::as_slice)
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Vec<Value>)> for SavedGroups {
    fn from_iter<T: IntoIterator<Item = (String, Vec<Value>)>>(iter: T) -> Self {
        SavedGroups(iter.into_iter().collect())
    }
}
