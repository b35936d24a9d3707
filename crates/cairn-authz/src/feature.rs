//! Organization feature flags.
//!
//! Fail-closed by contract: a feature is enabled only when the server said
//! so in the most recent successful fetch. Missing keys, unknown keys, and
//! unloaded state all read as disabled.
use crate::{AuthzError, AuthzResult};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FeatureKey {
    ReadinessSurveys,
    GptCoach,
    Communications,
    ChangeArtifacts,
    Reports,
}

impl FeatureKey {
    pub fn as_str(self) -> &'static str {
        match self {
            FeatureKey::ReadinessSurveys => "readinessSurveys",
            FeatureKey::GptCoach => "gptCoach",
            FeatureKey::Communications => "communications",
            FeatureKey::ChangeArtifacts => "changeArtifacts",
            FeatureKey::Reports => "reports",
        }
    }
}

impl std::fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FeatureKey {
    type Err = AuthzError;

    fn from_str(value: &str) -> AuthzResult<Self> {
        match value {
            "readinessSurveys" => Ok(FeatureKey::ReadinessSurveys),
            "gptCoach" => Ok(FeatureKey::GptCoach),
            "communications" => Ok(FeatureKey::Communications),
            "changeArtifacts" => Ok(FeatureKey::ChangeArtifacts),
            "reports" => Ok(FeatureKey::Reports),
            other => Err(AuthzError::UnknownFeature(other.to_string())),
        }
    }
}

/// Feature toggles for the current organization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FeatureSet(BTreeMap<FeatureKey, bool>);

impl FeatureSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_enabled(keys: impl IntoIterator<Item = FeatureKey>) -> Self {
        Self(keys.into_iter().map(|key| (key, true)).collect())
    }

    pub fn set(&mut self, key: FeatureKey, enabled: bool) {
        self.0.insert(key, enabled);
    }

    /// Whether `key` is enabled. Absent keys are disabled.
    pub fn enabled(&self, key: FeatureKey) -> bool {
        self.0.get(&key).copied().unwrap_or(false)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for FeatureSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Same tolerant-reader policy as permission sets.
        let raw = BTreeMap::<String, bool>::deserialize(deserializer)?;
        let mut toggles = BTreeMap::new();
        for (key, value) in raw {
            if let Ok(key) = key.parse::<FeatureKey>() {
                toggles.insert(key, value);
            }
        }
        Ok(Self(toggles))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_key_string_roundtrip() {
        let keys = [
            FeatureKey::ReadinessSurveys,
            FeatureKey::GptCoach,
            FeatureKey::Communications,
            FeatureKey::ChangeArtifacts,
            FeatureKey::Reports,
        ];

        for key in keys {
            assert_eq!(key.as_str().parse::<FeatureKey>().ok(), Some(key));
        }
    }

    #[test]
    fn absent_features_are_disabled() {
        let set = FeatureSet::from_enabled([FeatureKey::Reports]);
        assert!(set.enabled(FeatureKey::Reports));
        assert!(!set.enabled(FeatureKey::GptCoach));
    }

    #[test]
    fn deserialize_skips_unknown_keys() {
        let payload = r#"{"reports": true, "timeTravel": true}"#;
        let set: FeatureSet = serde_json::from_str(payload).expect("parse");
        assert!(set.enabled(FeatureKey::Reports));
        assert!(!set.enabled(FeatureKey::Communications));
    }

    #[test]
    fn empty_set_disables_everything() {
        let set = FeatureSet::new();
        assert!(!set.enabled(FeatureKey::ReadinessSurveys));
        assert!(!set.enabled(FeatureKey::ChangeArtifacts));
    }
}
