//! Fail-closed permission resolver with a bounded freshness window.
//!
//! # Purpose
//! Caches the `{user, permissions}` payload from the permissions endpoint
//! and answers every capability predicate from that cache. A predicate is
//! true only when a fresh, successfully fetched set says so; loading, stale,
//! and errored states all answer false.
//!
//! # Refresh policy
//! - `refresh` fetches with a bounded number of automatic retries on
//!   transient failures.
//! - `on_focus` refreshes only when the cache is stale (window-focus hook).
//! - [`spawn_refresh_loop`] polls on a fixed interval; failures are logged
//!   at warn and the stale cache simply ages out of the freshness window.
use crate::api::{ApiClient, CurrentUser};
use crate::config::ClientConfig;
use crate::error::ClientResult;
use cairn_authz::{PermissionKey, PermissionSet};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::{Duration, Instant};

const RETRY_DELAY: Duration = Duration::from_millis(200);

struct CachedPermissions {
    user: CurrentUser,
    permissions: PermissionSet,
    fetched_at: Instant,
}

pub struct PermissionResolver {
    api: Arc<ApiClient>,
    cache: RwLock<Option<CachedPermissions>>,
    ttl: Duration,
    retry_limit: u32,
}

impl PermissionResolver {
    pub fn new(api: Arc<ApiClient>, config: &ClientConfig) -> Self {
        Self {
            api,
            cache: RwLock::new(None),
            ttl: config.permission_ttl,
            retry_limit: config.permission_retry_limit,
        }
    }

    /// Fetch and cache the permission set, retrying transient failures up
    /// to the configured limit.
    pub async fn refresh(&self) -> ClientResult<()> {
        let mut attempt = 0u32;
        loop {
            match self.api.fetch_permissions().await {
                Ok(response) => {
                    *self.cache.write() = Some(CachedPermissions {
                        user: response.user,
                        permissions: response.permissions,
                        fetched_at: Instant::now(),
                    });
                    return Ok(());
                }
                Err(err) if err.is_transient() && attempt < self.retry_limit => {
                    attempt += 1;
                    tracing::warn!(error = %err, attempt, "permission fetch failed, retrying");
                    tokio::time::sleep(RETRY_DELAY).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Refresh only when the cache is missing or stale. Failures are logged
    /// and swallowed; predicates keep failing closed.
    pub async fn ensure_fresh(&self) {
        if self.fresh_permissions().is_some() {
            return;
        }
        if let Err(err) = self.refresh().await {
            tracing::warn!(error = %err, "permission refresh failed");
        }
    }

    /// Window-focus hook: refetch when the freshness window has lapsed.
    pub async fn on_focus(&self) {
        self.ensure_fresh().await;
    }

    /// Whether `key` is confirmed granted by a fresh server response.
    pub fn has_permission(&self, key: PermissionKey) -> bool {
        self.fresh_permissions()
            .map(|set| set.granted(key))
            .unwrap_or(false)
    }

    pub fn all_of(&self, keys: &[PermissionKey]) -> bool {
        self.fresh_permissions()
            .map(|set| set.all_of(keys))
            .unwrap_or(false)
    }

    pub fn any_of(&self, keys: &[PermissionKey]) -> bool {
        self.fresh_permissions()
            .map(|set| set.any_of(keys))
            .unwrap_or(false)
    }

    /// The cached user, `None` until a fresh fetch has landed.
    pub fn current_user(&self) -> Option<CurrentUser> {
        let guard = self.cache.read();
        guard
            .as_ref()
            .filter(|cached| cached.fetched_at.elapsed() < self.ttl)
            .map(|cached| cached.user.clone())
    }

    // Named feature-level predicates consumed directly by UI surfaces.

    pub fn can_access_user_management(&self) -> bool {
        self.has_permission(PermissionKey::CanSeeUsers)
    }

    pub fn can_manage_projects(&self) -> bool {
        self.any_of(&[
            PermissionKey::CanModifyProjects,
            PermissionKey::CanEditAllProjects,
            PermissionKey::CanDeleteProjects,
        ])
    }

    pub fn can_delete_projects(&self) -> bool {
        self.has_permission(PermissionKey::CanDeleteProjects)
    }

    pub fn can_see_reports(&self) -> bool {
        self.has_permission(PermissionKey::CanSeeReports)
    }

    pub fn can_manage_system(&self) -> bool {
        self.has_permission(PermissionKey::CanManageSystem)
    }

    fn fresh_permissions(&self) -> Option<PermissionSet> {
        let guard = self.cache.read();
        guard
            .as_ref()
            .filter(|cached| cached.fetched_at.elapsed() < self.ttl)
            .map(|cached| cached.permissions.clone())
    }
}

/// Poll the permissions endpoint on a fixed interval.
///
/// Fetch failures are logged and the loop keeps going; the cached set ages
/// out of its freshness window on its own, so consumers degrade to denying
/// everything rather than acting on stale grants.
pub fn spawn_refresh_loop(
    resolver: Arc<PermissionResolver>,
    interval: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            if let Err(err) = resolver.refresh().await {
                tracing::warn!(error = %err, "permission refresh poll failed");
            }
            tokio::time::sleep(interval).await;
        }
    })
}
