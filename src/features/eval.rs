use serde::{Deserialize, Serialize};

use crate::{Configuration, SavedGroups, Value};

use super::{compiled_features::Feature, FeatureEvaluationError};

/// Value a feature evaluated to, along with where it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureResult {
    /// Feature value.
    pub value: serde_json::Value,
    #[allow(missing_docs)]
    pub source: FeatureSource,
    /// Id of the rule that matched, if the rule has one.
    pub rule_id: Option<String>,
}

/// Where a [`FeatureResult`] value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FeatureSource {
    /// No rule matched.
    DefaultValue,
    /// A targeting rule matched and forced the value.
    Force,
}

impl Configuration {
    /// Evaluate the feature for the given attribute object.
    pub fn get_feature_value(
        &self,
        feature_key: &str,
        attributes: &Value,
    ) -> Result<FeatureResult, FeatureEvaluationError> {
        let feature = self
            .features
            .compiled
            .features
            .get(feature_key)
            .ok_or(FeatureEvaluationError::FeatureNotFound)?
            .as_ref()
            .map_err(|err| *err)?;

        Ok(feature.eval(attributes, self.saved_groups()))
    }
}

impl Feature {
    fn eval(&self, attributes: &Value, groups: &SavedGroups) -> FeatureResult {
        let matched = self.rules.iter().find(|rule| {
            rule.condition
                .as_ref()
                .map_or(true, |condition| condition.evaluate(attributes, groups))
        });

        match matched {
            Some(rule) => FeatureResult {
                value: rule.force.clone(),
                source: FeatureSource::Force,
                rule_id: rule.id.clone(),
            },
            None => FeatureResult {
                value: self.default_value.clone(),
                source: FeatureSource::DefaultValue,
                rule_id: None,
            },
        }
    }
}

/// Evaluate a feature against the (optional) configuration and log the outcome.
///
/// Normal conditions (configuration not loaded yet, unknown feature) return `Ok(None)`, so the
/// caller can fall back to its own default. Configuration problems are returned as errors.
pub fn get_feature_value(
    configuration: Option<&Configuration>,
    feature_key: &str,
    attributes: &Value,
) -> Result<Option<FeatureResult>, FeatureEvaluationError> {
    let result = configuration
        .ok_or(FeatureEvaluationError::ConfigurationMissing)
        .and_then(|configuration| configuration.get_feature_value(feature_key, attributes));

    match result {
        Ok(result) => {
            log::trace!(target: "flag_targeting",
                        feature_key,
                        result:serde = &result;
                        "evaluated a feature");
            Ok(Some(result))
        }

        Err(FeatureEvaluationError::ConfigurationMissing) => {
            log::warn!(target: "flag_targeting",
                       feature_key;
                       "evaluating a feature before configuration has been loaded");
            Ok(None)
        }

        Err(err) if err.is_normal() => {
            log::trace!(target: "flag_targeting",
                        feature_key;
                        "returning default value because of: {err}");
            Ok(None)
        }

        Err(err) => {
            log::warn!(target: "flag_targeting",
                       feature_key;
                       "error occurred while evaluating a feature: {err}");
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{get_feature_value, FeatureResult, FeatureSource};
    use crate::{
        features::{FeatureEvaluationError, FeaturesConfig},
        Configuration, Value,
    };

    fn configuration() -> Configuration {
        let json = json!({
            "features": {
                "banner": {
                    "defaultValue": "off",
                    "rules": [
                        {"id": "staff", "condition": {"id": {"$inGroup": "staff"}}, "force": "staff"},
                        {"id": "adults", "condition": {"age": {"$gte": 18}}, "force": "on"}
                    ]
                },
                "everyone": {"defaultValue": 0, "rules": [{"force": 1}]},
                "broken": {"rules": [{"condition": {"$and": 1}, "force": true}]}
            },
            "savedGroups": {"staff": ["alice"]}
        });
        Configuration::from_server_response(
            FeaturesConfig::from_json(json.to_string().into_bytes()).unwrap(),
        )
    }

    #[test]
    fn first_matching_rule_wins() {
        let configuration = configuration();
        let alice = Value::from(json!({"id": "alice", "age": 30}));
        assert_eq!(
            configuration.get_feature_value("banner", &alice),
            Ok(FeatureResult {
                value: json!("staff"),
                source: FeatureSource::Force,
                rule_id: Some("staff".to_owned()),
            })
        );

        let bob = Value::from(json!({"id": "bob", "age": 30}));
        assert_eq!(
            configuration.get_feature_value("banner", &bob).unwrap().value,
            json!("on")
        );
    }

    #[test]
    fn default_value_when_nothing_matches() {
        let configuration = configuration();
        let kid = Value::from(json!({"id": "carol", "age": 12}));
        assert_eq!(
            configuration.get_feature_value("banner", &kid),
            Ok(FeatureResult {
                value: json!("off"),
                source: FeatureSource::DefaultValue,
                rule_id: None,
            })
        );
    }

    #[test]
    fn rule_without_condition_matches_everyone() {
        let configuration = configuration();
        let result = configuration
            .get_feature_value("everyone", &Value::from(json!({})))
            .unwrap();
        assert_eq!(result.value, json!(1));
        assert_eq!(result.rule_id, None);
    }

    #[test]
    fn errors() {
        let _ = env_logger::builder().is_test(true).try_init();

        let configuration = configuration();
        let attributes = Value::from(json!({}));
        assert_eq!(
            get_feature_value(None, "banner", &attributes),
            Ok(None)
        );
        assert_eq!(
            get_feature_value(Some(&configuration), "missing", &attributes),
            Ok(None)
        );
        assert_eq!(
            get_feature_value(Some(&configuration), "broken", &attributes),
            Err(FeatureEvaluationError::ConfigurationError)
        );
        assert!(matches!(
            get_feature_value(Some(&configuration), "banner", &attributes),
            Ok(Some(FeatureResult {
                source: FeatureSource::DefaultValue,
                ..
            }))
        ));
    }
}
