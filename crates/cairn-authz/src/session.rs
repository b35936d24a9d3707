//! Support/impersonation session state and capability derivation.
//!
//! # Purpose
//! Models the process-wide impersonation state a support session bind
//! produces, and derives the write/scope capabilities UI code consults.
//!
//! # Key invariants
//! - `Active` carries organization id, mode, and session id together; a
//!   partially-bound state cannot be represented.
//! - `is_read_only()` implies `is_impersonating()`.
//! - Capability derivation is a pure function of the state; callers must
//!   re-ask rather than cache the answer, since the state transitions once
//!   during the application session.
use serde::{Deserialize, Serialize};

/// Access mode granted to a support session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupportMode {
    Read,
    Write,
}

impl SupportMode {
    pub fn as_str(self) -> &'static str {
        match self {
            SupportMode::Read => "read",
            SupportMode::Write => "write",
        }
    }
}

impl std::fmt::Display for SupportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SupportMode {
    type Err = crate::AuthzError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "read" => Ok(SupportMode::Read),
            "write" => Ok(SupportMode::Write),
            other => Err(crate::AuthzError::InvalidMode(other.to_string())),
        }
    }
}

/// Impersonation state for the current application session.
///
/// # Summary
/// Created at boot as [`ImpersonationState::Inactive`] and transitioned at
/// most once by the session binder when a single-use token is exchanged.
///
/// # Example
/// ```rust
/// use cairn_authz::{ImpersonationState, SupportMode};
///
/// let idle = ImpersonationState::Inactive;
/// assert!(idle.can_write());
///
/// let bound = ImpersonationState::active("org-42", SupportMode::Read, "sess-9");
/// assert!(bound.is_impersonating());
/// assert!(!bound.can_write());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ImpersonationState {
    #[default]
    Inactive,
    Active {
        organization_id: String,
        mode: SupportMode,
        session_id: String,
    },
}

impl ImpersonationState {
    pub fn active(
        organization_id: impl Into<String>,
        mode: SupportMode,
        session_id: impl Into<String>,
    ) -> Self {
        Self::Active {
            organization_id: organization_id.into(),
            mode,
            session_id: session_id.into(),
        }
    }

    pub fn is_impersonating(&self) -> bool {
        matches!(self, Self::Active { .. })
    }

    /// True iff a support session is bound in read mode.
    pub fn is_read_only(&self) -> bool {
        matches!(
            self,
            Self::Active {
                mode: SupportMode::Read,
                ..
            }
        )
    }

    /// Target organization id when impersonating.
    pub fn organization_id(&self) -> Option<&str> {
        match self {
            Self::Inactive => None,
            Self::Active {
                organization_id, ..
            } => Some(organization_id),
        }
    }

    pub fn mode(&self) -> Option<SupportMode> {
        match self {
            Self::Inactive => None,
            Self::Active { mode, .. } => Some(*mode),
        }
    }

    pub fn session_id(&self) -> Option<&str> {
        match self {
            Self::Inactive => None,
            Self::Active { session_id, .. } => Some(session_id),
        }
    }

    /// Whether mutating actions should be enabled.
    ///
    /// Normal operation always permits writes (the server still checks
    /// per-permission); an active support session permits them only in
    /// write mode.
    pub fn can_write(&self) -> bool {
        match self {
            Self::Inactive => true,
            Self::Active { mode, .. } => *mode == SupportMode::Write,
        }
    }

    /// Whether the given scope should be reachable.
    ///
    /// Grants unconditionally during impersonation for now; this is UX
    /// gating only and not a security boundary.
    /// TODO: restrict scopes for read-mode support sessions once product
    /// settles the scope policy.
    pub fn can_access(&self, _scope: &str) -> bool {
        match self {
            Self::Inactive => true,
            Self::Active { .. } => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inactive_permits_writes_and_access() {
        let state = ImpersonationState::Inactive;
        assert!(!state.is_impersonating());
        assert!(!state.is_read_only());
        assert!(state.can_write());
        assert!(state.can_access("projects"));
        assert_eq!(state.organization_id(), None);
        assert_eq!(state.mode(), None);
        assert_eq!(state.session_id(), None);
    }

    #[test]
    fn read_mode_blocks_writes() {
        let state = ImpersonationState::active("org-1", SupportMode::Read, "sess-1");
        assert!(state.is_impersonating());
        assert!(state.is_read_only());
        assert!(!state.can_write());
        assert_eq!(state.organization_id(), Some("org-1"));
        assert_eq!(state.mode(), Some(SupportMode::Read));
        assert_eq!(state.session_id(), Some("sess-1"));
    }

    #[test]
    fn write_mode_permits_writes() {
        let state = ImpersonationState::active("org-1", SupportMode::Write, "sess-2");
        assert!(state.is_impersonating());
        assert!(!state.is_read_only());
        assert!(state.can_write());
    }

    #[test]
    fn read_only_implies_impersonating() {
        for state in [
            ImpersonationState::Inactive,
            ImpersonationState::active("o", SupportMode::Read, "s"),
            ImpersonationState::active("o", SupportMode::Write, "s"),
        ] {
            if state.is_read_only() {
                assert!(state.is_impersonating());
            }
        }
    }

    #[test]
    fn capability_checks_are_idempotent() {
        let state = ImpersonationState::active("org-1", SupportMode::Read, "sess-1");
        let first = (state.can_write(), state.can_access("reports"));
        for _ in 0..3 {
            assert_eq!((state.can_write(), state.can_access("reports")), first);
        }
    }

    #[test]
    fn support_mode_string_roundtrip() {
        for mode in [SupportMode::Read, SupportMode::Write] {
            assert_eq!(mode.as_str().parse::<SupportMode>().ok(), Some(mode));
        }
        assert!("admin".parse::<SupportMode>().is_err());
    }

    #[test]
    fn support_mode_wire_values() {
        assert_eq!(
            serde_json::from_str::<SupportMode>(r#""read""#).expect("parse"),
            SupportMode::Read
        );
        assert_eq!(
            serde_json::to_string(&SupportMode::Write).expect("serialize"),
            r#""write""#
        );
        assert!(serde_json::from_str::<SupportMode>(r#""admin""#).is_err());
    }
}
