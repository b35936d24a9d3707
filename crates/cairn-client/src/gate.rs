//! Capability gate consumed by UI components.
//!
//! A thin read-side handle over the session cell. Every query re-reads the
//! current state, because the state can transition once while the component
//! tree is alive. Pure reads, no side effects, advisory only.
use crate::session::SessionCell;
use cairn_authz::ImpersonationState;
use std::sync::Arc;

#[derive(Clone)]
pub struct CapabilityGate {
    cell: Arc<SessionCell>,
}

impl CapabilityGate {
    pub fn new(cell: Arc<SessionCell>) -> Self {
        Self { cell }
    }

    /// Whether mutating actions should be enabled right now.
    pub fn can_write(&self) -> bool {
        self.cell.snapshot().can_write()
    }

    /// Whether the given UI scope should be reachable right now.
    pub fn can_access(&self, scope: &str) -> bool {
        self.cell.snapshot().can_access(scope)
    }

    /// Snapshot of the underlying impersonation state.
    pub fn state(&self) -> ImpersonationState {
        self.cell.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cairn_authz::SupportMode;

    #[test]
    fn gate_reflects_inactive_cell() {
        let cell = Arc::new(SessionCell::new());
        let gate = CapabilityGate::new(cell);
        assert!(gate.can_write());
        assert!(gate.can_access("reports"));
        assert!(!gate.state().is_impersonating());
    }

    #[test]
    fn gate_observes_transition_without_rebuild() {
        let cell = Arc::new(SessionCell::new());
        let gate = CapabilityGate::new(cell.clone());
        assert!(gate.can_write());

        cell.activate(ImpersonationState::active(
            "org-3",
            SupportMode::Read,
            "sess-3",
        ));
        // Same handle, fresh answer: no caching between calls.
        assert!(!gate.can_write());
        assert!(gate.state().is_read_only());
    }

    #[test]
    fn repeated_queries_are_stable_for_unchanged_state() {
        let cell = Arc::new(SessionCell::new());
        cell.activate(ImpersonationState::active(
            "org-3",
            SupportMode::Write,
            "sess-3",
        ));
        let gate = CapabilityGate::new(cell);
        let first = (gate.can_write(), gate.can_access("surveys"));
        for _ in 0..5 {
            assert_eq!((gate.can_write(), gate.can_access("surveys")), first);
        }
    }
}
