//! Cairn authorization primitives shared by client surfaces.
//!
//! # Purpose
//! Centralizes the permission model (closed key enumeration plus grant sets),
//! organization feature flags, and the support/impersonation session state
//! that capability checks derive from.
//!
//! # How it fits
//! The Cairn client crate fetches permission and feature data from the REST
//! API and binds support sessions from single-use URL tokens; the resulting
//! values all live in types from this crate. UI layers consume the boolean
//! queries exposed here to enable or disable actions.
//!
//! # Key invariants
//! - Permission and feature lookups fail closed: an absent or unknown key is
//!   never treated as a grant.
//! - [`ImpersonationState::Active`] always carries an organization id, a
//!   mode, and a session id together; there is no partially-bound variant.
//! - Capability derivation (`can_write`, `can_access`) is a pure function of
//!   the current state and is advisory only. The server enforces
//!   authorization independently.
//!
//! # Examples
//! ```rust
//! use cairn_authz::{ImpersonationState, SupportMode};
//!
//! let state = ImpersonationState::active("org-7", SupportMode::Read, "sess-1");
//! assert!(state.is_read_only());
//! assert!(!state.can_write());
//! ```
//!
//! # Common pitfalls
//! - Treating `can_access` as a security boundary; it is UX gating only.
//! - Defaulting a missing feature flag to enabled instead of asking the set.

mod errors;
mod feature;
mod permission;
mod session;

pub use errors::{AuthzError, AuthzResult};
pub use feature::{FeatureKey, FeatureSet};
pub use permission::{PermissionKey, PermissionSet};
pub use session::{ImpersonationState, SupportMode};
