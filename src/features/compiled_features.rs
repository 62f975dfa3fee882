use std::collections::HashMap;

use crate::{Condition, Error, SavedGroups};

use super::{FeatureEvaluationError, FeatureRuleWire, FeatureWire, FeaturesConfigWire};

/// Features configuration with all targeting conditions built and ready for evaluation.
#[derive(Debug)]
pub struct FeaturesConfig {
    /// Original JSON the configuration was compiled from.
    pub(crate) wire_json: Vec<u8>,
    pub(crate) compiled: CompiledFeaturesConfig,
}

#[derive(Debug)]
pub(crate) struct CompiledFeaturesConfig {
    /// For features that failed to parse or build, we store the evaluation failure directly.
    pub features: HashMap<String, Result<Feature, FeatureEvaluationError>>,
    pub saved_groups: SavedGroups,
}

#[derive(Debug)]
pub(crate) struct Feature {
    pub default_value: serde_json::Value,
    pub rules: Box<[FeatureRule]>,
}

#[derive(Debug)]
pub(crate) struct FeatureRule {
    pub id: Option<String>,
    /// `None` matches everyone.
    pub condition: Option<Condition>,
    pub force: serde_json::Value,
}

impl FeaturesConfig {
    /// Parse and compile a features payload.
    ///
    /// Malformed features do not fail the whole payload; they fail on evaluation instead.
    pub fn from_json(json: Vec<u8>) -> Result<Self, Error> {
        let config: FeaturesConfigWire = serde_json::from_slice(&json).map_err(|err| {
            log::warn!(target: "flag_targeting", "failed to parse features configuration: {err:?}");
            err
        })?;
        Ok(FeaturesConfig {
            wire_json: json,
            compiled: compile_features_config(config),
        })
    }

    #[allow(missing_docs)]
    pub fn to_json(&self) -> &[u8] {
        &self.wire_json
    }

    /// Groups shipped along with the features.
    pub fn saved_groups(&self) -> &SavedGroups {
        &self.compiled.saved_groups
    }
}

fn compile_features_config(config: FeaturesConfigWire) -> CompiledFeaturesConfig {
    let features = config
        .features
        .into_iter()
        .map(|(key, feature)| {
            let compiled = Option::from(feature)
                .ok_or(FeatureEvaluationError::ConfigurationParseError)
                .and_then(|feature: FeatureWire| compile_feature(&key, feature));
            (key, compiled)
        })
        .collect();

    CompiledFeaturesConfig {
        features,
        saved_groups: config.saved_groups,
    }
}

fn compile_feature(
    feature_key: &str,
    feature: FeatureWire,
) -> Result<Feature, FeatureEvaluationError> {
    let rules = feature
        .rules
        .into_iter()
        .filter_map(|rule| compile_rule(feature_key, rule).transpose())
        .collect::<Result<_, _>>()?;

    Ok(Feature {
        default_value: feature.default_value,
        rules,
    })
}

/// Returns `Ok(None)` for rules that don't force a value.
fn compile_rule(
    feature_key: &str,
    rule: FeatureRuleWire,
) -> Result<Option<FeatureRule>, FeatureEvaluationError> {
    let rule_id = rule.id.as_deref().unwrap_or_default();

    let Some(force) = rule.force else {
        log::debug!(target: "flag_targeting", feature_key, rule_id; "skipping rule without forced value");
        return Ok(None);
    };

    let condition = rule
        .condition
        .as_ref()
        .map(Condition::build)
        .transpose()
        .map_err(|err| {
            log::warn!(target: "flag_targeting", feature_key, rule_id; "failed to build targeting condition: {err}");
            FeatureEvaluationError::ConfigurationError
        })?;

    Ok(Some(FeatureRule {
        id: rule.id,
        condition,
        force,
    }))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::FeaturesConfig;
    use crate::{features::FeatureEvaluationError, Error};

    #[test]
    fn compile_features() {
        let _ = env_logger::builder().is_test(true).try_init();

        let config = FeaturesConfig::from_json(
            json!({
                "features": {
                    "ok": {
                        "defaultValue": 1,
                        "rules": [
                            {"id": "r1", "condition": {"age": {"$gt": 18}}, "force": 2},
                            {"id": "experiment", "variations": [1, 2]},
                            {"force": 3}
                        ]
                    },
                    "bad_condition": {
                        "defaultValue": 1,
                        "rules": [{"condition": {"email": {"$regex": "("}}, "force": 2}]
                    },
                    "bad_definition": "not a feature"
                },
                "savedGroups": {"beta": ["alice"]}
            })
            .to_string()
            .into_bytes(),
        )
        .unwrap();

        let features = &config.compiled.features;
        let ok = features["ok"].as_ref().unwrap();
        assert_eq!(ok.default_value, json!(1));
        assert_eq!(ok.rules.len(), 2);
        assert_eq!(ok.rules[0].id.as_deref(), Some("r1"));
        assert!(ok.rules[0].condition.is_some());
        assert!(ok.rules[1].condition.is_none());
        assert_eq!(ok.rules[1].force, json!(3));

        assert_eq!(
            features["bad_condition"].as_ref().unwrap_err(),
            &FeatureEvaluationError::ConfigurationError
        );
        assert_eq!(
            features["bad_definition"].as_ref().unwrap_err(),
            &FeatureEvaluationError::ConfigurationParseError
        );
        assert!(config.saved_groups().get("beta").is_some());
    }

    #[test]
    fn reject_invalid_payload() {
        assert!(matches!(
            FeaturesConfig::from_json(b"{\"features\": 1}".to_vec()),
            Err(Error::ConfigurationParse(_))
        ));
    }

    #[test]
    fn keep_original_json() {
        let json = br#"{"features": {}}"#.to_vec();
        let config = FeaturesConfig::from_json(json.clone()).unwrap();
        assert_eq!(config.to_json(), json.as_slice());
    }
}
