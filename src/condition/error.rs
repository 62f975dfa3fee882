/// Errors that occur while building a [`Condition`](super::Condition) from a document.
///
/// `path` is the dotted field path the failing operator applies to (empty at the document root).
/// `operator` is the offending key, e.g. `"$regex"`.
#[derive(thiserror::Error, Debug, Clone)]
#[non_exhaustive]
#[allow(missing_docs)]
pub enum BuildError {
    /// Condition document is not an object.
    #[error("condition document at `{path}` must be an object")]
    NotAnObject { path: String },

    #[error("`{operator}` at `{path}` expects an array")]
    ExpectedArray { path: String, operator: String },

    #[error("`{operator}` at `{path}` expects an object")]
    ExpectedObject { path: String, operator: String },

    #[error("`{operator}` at `{path}` expects a string")]
    ExpectedString { path: String, operator: String },

    #[error("`{operator}` at `{path}` is not a valid regular expression")]
    InvalidRegex {
        path: String,
        operator: String,
        #[source]
        source: regex::Error,
    },
}

impl BuildError {
    /// Field path of the failing condition.
    pub fn path(&self) -> &str {
        match self {
            BuildError::NotAnObject { path }
            | BuildError::ExpectedArray { path, .. }
            | BuildError::ExpectedObject { path, .. }
            | BuildError::ExpectedString { path, .. }
            | BuildError::InvalidRegex { path, .. } => path,
        }
    }
}
