//! Cairn client SDK for the support-session and capability subsystem.
//!
//! # Purpose
//! Implements the client side of Cairn's support/impersonation flow: the
//! one-shot session binder that exchanges a single-use URL token for a bound
//! session, the capability gate UI code consults before enabling mutating
//! actions, and the fail-closed permission and feature-flag resolvers.
//!
//! # How it fits
//! The hosting application constructs a [`SessionCell`] at boot, runs
//! [`SessionBinder::bind`] exactly once with the navigation URL before
//! rendering any impersonation-aware UI, and then hands a
//! [`CapabilityGate`] plus the resolvers to the rest of the component tree.
//! The REST endpoints this crate calls are external collaborators; the
//! client-side gating here is advisory UX only, never the enforcement point.
//!
//! # Key invariants
//! - The binder issues at most one exchange request per process and scrubs
//!   the token from the returned URL whether the exchange succeeded or not.
//! - A failed or malformed exchange leaves the session cell inactive; there
//!   is no partially-bound state.
//! - Permission and feature queries answer `false` whenever authoritative
//!   data is missing, stale, or errored.
//!
//! # Examples
//! ```rust,no_run
//! use std::sync::Arc;
//! use cairn_client::{ApiClient, BindOutcome, CapabilityGate, ClientConfig, SessionBinder, SessionCell};
//! use url::Url;
//!
//! # async fn boot() -> anyhow::Result<()> {
//! let config = ClientConfig::from_env()?;
//! let api = Arc::new(ApiClient::new(&config)?);
//! let cell = Arc::new(SessionCell::new());
//!
//! let binder = SessionBinder::new(api.clone(), cell.clone());
//! let url = Url::parse("https://app.cairn.example/dashboard?_impersonation_token=abc")?;
//! match binder.bind(&url).await {
//!     BindOutcome::Bound { replace_url } => println!("install {replace_url} via history replace"),
//!     BindOutcome::Failed { error, redirect_url } => eprintln!("{error}; navigate to {redirect_url}"),
//!     BindOutcome::NoToken | BindOutcome::AlreadyAttempted => {}
//! }
//!
//! let gate = CapabilityGate::new(cell);
//! if gate.can_write() { /* enable mutating actions */ }
//! # Ok(())
//! # }
//! ```

mod api;
mod config;
mod error;
mod features;
mod gate;
mod permissions;
mod session;

pub use api::{ApiClient, BoundSession, CurrentUser};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use features::FeatureResolver;
pub use gate::CapabilityGate;
pub use permissions::{PermissionResolver, spawn_refresh_loop};
pub use session::{BindOutcome, IMPERSONATION_TOKEN_PARAM, SessionBinder, SessionCell};
