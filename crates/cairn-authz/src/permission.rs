//! Permission keys and grant sets.
//!
//! # Purpose
//! Defines the closed enumeration of Cairn permission keys and the grant set
//! the permissions endpoint delivers for the current user.
//!
//! # How it fits
//! The client's permission resolver caches a [`PermissionSet`] and answers
//! every capability question from it. The set is a read-only copy of server
//! state; the client never derives grants locally.
//!
//! # Key invariants
//! - Lookups fail closed: a key the server did not send is not granted.
//! - Unknown wire keys are dropped on deserialization rather than rejected,
//!   so a newer server cannot break an older client.
use crate::{AuthzError, AuthzResult};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Closed enumeration of permission keys understood by this client.
///
/// Wire names are camelCase, matching the permissions endpoint payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PermissionKey {
    CanSeeUsers,
    CanModifyUsers,
    CanSeeProjects,
    CanModifyProjects,
    CanEditAllProjects,
    CanDeleteProjects,
    CanSeeReports,
    CanManageSystem,
}

impl PermissionKey {
    pub fn as_str(self) -> &'static str {
        match self {
            PermissionKey::CanSeeUsers => "canSeeUsers",
            PermissionKey::CanModifyUsers => "canModifyUsers",
            PermissionKey::CanSeeProjects => "canSeeProjects",
            PermissionKey::CanModifyProjects => "canModifyProjects",
            PermissionKey::CanEditAllProjects => "canEditAllProjects",
            PermissionKey::CanDeleteProjects => "canDeleteProjects",
            PermissionKey::CanSeeReports => "canSeeReports",
            PermissionKey::CanManageSystem => "canManageSystem",
        }
    }
}

impl std::fmt::Display for PermissionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PermissionKey {
    type Err = AuthzError;

    fn from_str(value: &str) -> AuthzResult<Self> {
        match value {
            "canSeeUsers" => Ok(PermissionKey::CanSeeUsers),
            "canModifyUsers" => Ok(PermissionKey::CanModifyUsers),
            "canSeeProjects" => Ok(PermissionKey::CanSeeProjects),
            "canModifyProjects" => Ok(PermissionKey::CanModifyProjects),
            "canEditAllProjects" => Ok(PermissionKey::CanEditAllProjects),
            "canDeleteProjects" => Ok(PermissionKey::CanDeleteProjects),
            "canSeeReports" => Ok(PermissionKey::CanSeeReports),
            "canManageSystem" => Ok(PermissionKey::CanManageSystem),
            other => Err(AuthzError::UnknownPermission(other.to_string())),
        }
    }
}

/// The current user's grants as delivered by the server.
///
/// # Summary
/// A read-only mapping from [`PermissionKey`] to a granted flag. Missing
/// keys are treated as not granted.
///
/// # Example
/// ```rust
/// use cairn_authz::{PermissionKey, PermissionSet};
///
/// let set = PermissionSet::from_granted([PermissionKey::CanSeeUsers]);
/// assert!(set.granted(PermissionKey::CanSeeUsers));
/// assert!(!set.granted(PermissionKey::CanManageSystem));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PermissionSet(BTreeMap<PermissionKey, bool>);

impl PermissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set where every listed key is granted and all others are not.
    pub fn from_granted(keys: impl IntoIterator<Item = PermissionKey>) -> Self {
        Self(keys.into_iter().map(|key| (key, true)).collect())
    }

    pub fn set(&mut self, key: PermissionKey, granted: bool) {
        self.0.insert(key, granted);
    }

    /// Whether `key` is granted. Absent keys are not granted.
    pub fn granted(&self, key: PermissionKey) -> bool {
        self.0.get(&key).copied().unwrap_or(false)
    }

    /// Whether every key in `keys` is granted. Empty input is vacuously true.
    pub fn all_of(&self, keys: &[PermissionKey]) -> bool {
        keys.iter().all(|key| self.granted(*key))
    }

    /// Whether at least one key in `keys` is granted.
    pub fn any_of(&self, keys: &[PermissionKey]) -> bool {
        keys.iter().any(|key| self.granted(*key))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for PermissionSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Tolerant reader: keys this client does not know are skipped, never
        // rejected and never granted.
        let raw = BTreeMap::<String, bool>::deserialize(deserializer)?;
        let mut grants = BTreeMap::new();
        for (key, value) in raw {
            if let Ok(key) = key.parse::<PermissionKey>() {
                grants.insert(key, value);
            }
        }
        Ok(Self(grants))
    }
}
