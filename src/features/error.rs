use serde::{Deserialize, Serialize};

/// Enum representing possible errors that can occur during feature evaluation.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum FeatureEvaluationError {
    /// Configuration has not been loaded yet.
    #[error("configuration missing")]
    ConfigurationMissing,

    /// The requested feature does not exist in the configuration.
    #[error("feature not found")]
    FeatureNotFound,

    /// The feature definition could not be parsed (server sent unexpected format).
    #[error("error parsing feature definition")]
    ConfigurationParseError,

    /// One of the feature's targeting conditions is invalid. The feature is never evaluated,
    /// rather than matching users it wasn't meant for.
    #[error("invalid targeting condition in feature definition")]
    ConfigurationError,
}

impl FeatureEvaluationError {
    /// Return `true` if the error is a normal running condition and the default value should be
    /// returned silently.
    pub(crate) fn is_normal(self) -> bool {
        match self {
            FeatureEvaluationError::ConfigurationMissing
            | FeatureEvaluationError::FeatureNotFound => true,

            FeatureEvaluationError::ConfigurationParseError
            | FeatureEvaluationError::ConfigurationError => false,
        }
    }
}
