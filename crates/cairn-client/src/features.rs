//! Fail-closed feature-flag resolver.
//!
//! Fetches the organization's toggle set once and caches it for the life of
//! the resolver; `reload` refetches on demand. Every query answers `false`
//! until a fetch has succeeded, and `false` for any key the server omitted.
use crate::api::ApiClient;
use crate::error::ClientResult;
use cairn_authz::{FeatureKey, FeatureSet};
use parking_lot::RwLock;
use std::sync::Arc;

pub struct FeatureResolver {
    api: Arc<ApiClient>,
    cache: RwLock<Option<FeatureSet>>,
}

impl FeatureResolver {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self {
            api,
            cache: RwLock::new(None),
        }
    }

    /// Fetch the toggle set unless one is already cached.
    pub async fn load(&self) -> ClientResult<()> {
        if self.cache.read().is_some() {
            return Ok(());
        }
        self.reload().await
    }

    /// Refetch unconditionally, replacing the cache on success. On failure
    /// the previous cache (if any) is kept.
    pub async fn reload(&self) -> ClientResult<()> {
        match self.api.fetch_features().await {
            Ok(features) => {
                *self.cache.write() = Some(features);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "feature flag fetch failed");
                Err(err)
            }
        }
    }

    /// Whether `key` is enabled. `false` while loading, on error, and for
    /// keys the server omitted. Never defaults a feature to enabled.
    pub fn has_feature(&self, key: FeatureKey) -> bool {
        self.cache
            .read()
            .as_ref()
            .map(|features| features.enabled(key))
            .unwrap_or(false)
    }

    pub fn loaded(&self) -> bool {
        self.cache.read().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;

    fn resolver() -> FeatureResolver {
        let config = ClientConfig::default().with_api_base("http://127.0.0.1:1");
        FeatureResolver::new(Arc::new(ApiClient::new(&config).expect("api client")))
    }

    #[test]
    fn features_fail_closed_before_load() {
        let resolver = resolver();
        assert!(!resolver.loaded());
        assert!(!resolver.has_feature(FeatureKey::Reports));
        assert!(!resolver.has_feature(FeatureKey::GptCoach));
    }

    #[tokio::test]
    async fn load_failure_keeps_everything_disabled() {
        let resolver = resolver();
        assert!(resolver.load().await.is_err());
        assert!(!resolver.loaded());
        assert!(!resolver.has_feature(FeatureKey::Communications));
    }

    #[test]
    fn cached_set_answers_queries() {
        let resolver = resolver();
        *resolver.cache.write() = Some(FeatureSet::from_enabled([FeatureKey::Reports]));
        assert!(resolver.has_feature(FeatureKey::Reports));
        assert!(!resolver.has_feature(FeatureKey::ChangeArtifacts));
    }
}
