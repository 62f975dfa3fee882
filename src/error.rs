use std::sync::Arc;

use crate::{condition::BuildError, features::FeatureEvaluationError};

/// Represents a result type for operations in this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Enum representing possible errors that can occur outside of condition evaluation (which never
/// fails).
#[derive(thiserror::Error, Debug, Clone)]
#[non_exhaustive]
pub enum Error {
    /// A condition document is malformed.
    #[error(transparent)]
    Build(#[from] BuildError),

    /// Error evaluating a feature.
    #[error(transparent)]
    FeatureEvaluation(#[from] FeatureEvaluationError),

    /// Configuration payload is not valid JSON or does not have the expected shape.
    #[error("error parsing configuration")]
    // serde_json::Error is not clonable, so we're wrapping it in an Arc.
    ConfigurationParse(#[source] Arc<serde_json::Error>),

    /// An I/O error, usually reported by a cache backend.
    #[error(transparent)]
    Io(Arc<std::io::Error>),
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Error::ConfigurationParse(Arc::new(value))
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Error::Io(Arc::new(value))
    }
}
