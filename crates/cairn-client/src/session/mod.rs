//! Support-session binding: the one-shot token exchange and the
//! single-writer state cell it transitions.
mod binder;
mod cell;

pub use binder::{BindOutcome, IMPERSONATION_TOKEN_PARAM, SessionBinder};
pub use cell::SessionCell;
