use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::{features::FeaturesConfig, SavedGroups};

/// Remote configuration for targeting. It's an immutable snapshot that defines how features are
/// evaluated; share it between threads behind an `Arc`.
#[derive(Debug)]
pub struct Configuration {
    /// Timestamp when configuration was loaded.
    pub fetched_at: DateTime<Utc>,
    /// Features configuration.
    pub features: FeaturesConfig,
}

impl Configuration {
    /// Create a new configuration from a server response.
    pub fn from_server_response(features: FeaturesConfig) -> Configuration {
        Configuration {
            fetched_at: Utc::now(),
            features,
        }
    }

    /// Saved groups available to `$inGroup`/`$notInGroup` conditions.
    pub fn saved_groups(&self) -> &SavedGroups {
        self.features.saved_groups()
    }

    /// Get a set of all available features. Note that this may include features with bad
    /// configuration.
    pub fn feature_keys(&self) -> HashSet<String> {
        self.features.compiled.features.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::Configuration;
    use crate::features::FeaturesConfig;

    #[test]
    fn feature_keys() {
        let features = FeaturesConfig::from_json(
            br#"{"features": {"a": {}, "b": 1}, "savedGroups": {"g": []}}"#.to_vec(),
        )
        .unwrap();
        let configuration = Configuration::from_server_response(features);
        assert_eq!(
            configuration.feature_keys(),
            HashSet::from(["a".to_owned(), "b".to_owned()])
        );
        assert_eq!(configuration.saved_groups().len(), 1);
    }
}
