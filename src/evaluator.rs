use std::sync::Arc;

use crate::{
    configuration_store::ConfigurationStore,
    features::{self, FeatureEvaluationError, FeatureResult},
    Condition, Configuration, SavedGroups, Value,
};

/// Evaluator reads the active configuration from a [`ConfigurationStore`] and evaluates against
/// it, so callers don't have to deal with snapshots.
pub struct Evaluator {
    configuration_store: Arc<ConfigurationStore>,
}

impl Evaluator {
    #[allow(missing_docs)]
    pub fn new(configuration_store: Arc<ConfigurationStore>) -> Evaluator {
        Evaluator {
            configuration_store,
        }
    }

    /// Evaluate a feature for the attribute object.
    ///
    /// Returns `Ok(None)` if configuration hasn't been loaded yet or the feature is unknown. The
    /// caller should then use its own default value.
    pub fn get_feature_value(
        &self,
        feature_key: &str,
        attributes: &Value,
    ) -> Result<Option<FeatureResult>, FeatureEvaluationError> {
        let configuration = self.get_configuration();
        features::get_feature_value(configuration.as_deref(), feature_key, attributes)
    }

    /// Evaluate a standalone condition using the saved groups of the active configuration.
    ///
    /// If no configuration is loaded, group conditions see no groups.
    pub fn eval_condition(&self, condition: &Condition, attributes: &Value) -> bool {
        match self.get_configuration() {
            Some(configuration) => condition.evaluate(attributes, configuration.saved_groups()),
            None => condition.evaluate(attributes, &SavedGroups::default()),
        }
    }

    fn get_configuration(&self) -> Option<Arc<Configuration>> {
        self.configuration_store.get_configuration()
    }
}
