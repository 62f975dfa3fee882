//! Feature definitions and their evaluation.
//!
//! A feature has a default value and an ordered list of targeting rules. The first rule whose
//! condition matches the attributes forces the feature value.
mod compiled_features;
mod error;
mod eval;
mod models;

pub use compiled_features::FeaturesConfig;
pub use error::FeatureEvaluationError;
pub use eval::{get_feature_value, FeatureResult, FeatureSource};
pub use models::*;
