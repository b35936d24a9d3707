//! Single-writer cell holding the process-wide impersonation state.
//!
//! # Purpose
//! Owns the one [`ImpersonationState`] instance for the application session.
//! The session binder is the only writer and transitions the state at most
//! once; everything else takes snapshot reads.
//!
//! # Key invariants
//! - `try_begin_bind` returns true exactly once per cell, so the exchange
//!   request cannot be issued twice even under rapid re-mounts.
//! - `activate` is crate-private; no caller outside the binder can move the
//!   cell out of `Inactive`.
use cairn_authz::ImpersonationState;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Default)]
pub struct SessionCell {
    state: RwLock<ImpersonationState>,
    attempted: AtomicBool,
}

impl SessionCell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current state. Cheap clone; callers must re-ask
    /// rather than hold on to the result across the bind.
    pub fn snapshot(&self) -> ImpersonationState {
        self.state.read().clone()
    }

    /// Claim the single bind attempt. Returns false if already claimed.
    pub(crate) fn try_begin_bind(&self) -> bool {
        !self.attempted.swap(true, Ordering::SeqCst)
    }

    pub(crate) fn activate(&self, state: ImpersonationState) {
        *self.state.write() = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cairn_authz::SupportMode;

    #[test]
    fn starts_inactive() {
        let cell = SessionCell::new();
        assert_eq!(cell.snapshot(), ImpersonationState::Inactive);
    }

    #[test]
    fn bind_attempt_is_claimed_once() {
        let cell = SessionCell::new();
        assert!(cell.try_begin_bind());
        assert!(!cell.try_begin_bind());
        assert!(!cell.try_begin_bind());
    }

    #[test]
    fn activate_transitions_snapshot() {
        let cell = SessionCell::new();
        cell.activate(ImpersonationState::active(
            "org-1",
            SupportMode::Write,
            "sess-1",
        ));
        let state = cell.snapshot();
        assert!(state.is_impersonating());
        assert_eq!(state.mode(), Some(SupportMode::Write));
    }
}
