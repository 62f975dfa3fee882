use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::SavedGroups;

/// Features payload. This is the format served by the remote configuration endpoint.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FeaturesConfigWire {
    /// Feature definitions.
    ///
    /// Value is wrapped in `TryParse` so that if we fail to parse one feature (e.g., new server
    /// format), we can still serve other features.
    pub features: HashMap<String, TryParse<FeatureWire>>,
    /// Groups referenced by `$inGroup`/`$notInGroup` conditions.
    #[serde(default)]
    pub saved_groups: SavedGroups,
}

/// `TryParse` allows the subfield to fail parsing without failing the parsing of the whole
/// structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(untagged)]
pub enum TryParse<T> {
    /// Successfully parsed.
    Parsed(T),
    /// Parsing failed.
    ParseFailed(serde_json::Value),
}

impl<T> From<TryParse<T>> for Option<T> {
    fn from(value: TryParse<T>) -> Self {
        match value {
            TryParse::Parsed(v) => Some(v),
            TryParse::ParseFailed(_) => None,
        }
    }
}

/// Definition of a single feature.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FeatureWire {
    /// Value served when no rule matches.
    #[serde(default)]
    pub default_value: serde_json::Value,
    /// Rules are checked in order; the first matching rule wins.
    #[serde(default)]
    pub rules: Vec<FeatureRuleWire>,
}

/// A targeting rule. Rules without `force` are experiment rules, which this crate skips.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FeatureRuleWire {
    #[allow(missing_docs)]
    #[serde(default)]
    pub id: Option<String>,
    /// Condition document. Absent condition matches everyone.
    #[serde(default)]
    pub condition: Option<serde_json::Value>,
    /// Value served when the condition matches. `Some(Null)` forces `null`.
    #[serde(default, deserialize_with = "deserialize_present")]
    pub force: Option<serde_json::Value>,
}

/// Distinguish an explicit `null` from a missing field.
fn deserialize_present<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<serde_json::Value>, D::Error> {
    serde_json::Value::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::{FeaturesConfigWire, TryParse};

    #[test]
    fn parse_partially_if_unexpected() {
        let config: FeaturesConfigWire = serde_json::from_str(
            r#"
              {
                "features": {
                  "success": {
                    "defaultValue": false,
                    "rules": [{"condition": {"country": "US"}, "force": true}]
                  },
                  "fail_parsing": {
                    "defaultValue": 1,
                    "rules": "not a list"
                  }
                },
                "savedGroups": {"beta": ["alice"]}
              }
            "#,
        )
        .unwrap();
        assert!(
            matches!(config.features.get("success").unwrap(), TryParse::Parsed(_)),
            "{:?} should match TryParse::Parsed(_)",
            config.features.get("success").unwrap()
        );
        assert!(
            matches!(
                config.features.get("fail_parsing").unwrap(),
                TryParse::ParseFailed(_)
            ),
            "{:?} should match TryParse::ParseFailed(_)",
            config.features.get("fail_parsing").unwrap()
        );
        assert_eq!(config.saved_groups.len(), 1);
    }

    #[test]
    fn force_null_is_present() {
        let config: FeaturesConfigWire = serde_json::from_str(
            r#"{"features": {"f": {"rules": [{"force": null}, {"condition": {}}]}}}"#,
        )
        .unwrap();
        let TryParse::Parsed(feature) = &config.features["f"] else {
            panic!("feature should parse");
        };
        assert_eq!(feature.rules[0].force, Some(serde_json::Value::Null));
        assert_eq!(feature.rules[1].force, None);
        assert!(config.saved_groups.is_empty());
    }
}
