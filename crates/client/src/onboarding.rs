//! First-run walkthrough flag.
//!
//! The walkthrough is shown once per install. Completion is recorded in
//! the [`ClientState`](crate::storage::ClientState) store, so it
//! survives restarts with a file-backed store and resets with the rest
//! of the session state on logout.

use crate::storage::ClientState;

pub struct Onboarding {
    state: ClientState,
}

impl Onboarding {
    pub(crate) fn new(state: ClientState) -> Self {
        Self { state }
    }

    pub fn has_seen_walkthrough(&self) -> bool {
        self.state.has_seen_walkthrough()
    }

    /// Mark the walkthrough done so it is not offered again.
    pub fn complete_walkthrough(&self) {
        self.state.set_walkthrough_seen();
    }

    /// Forget completion, for a "replay the tour" action.
    pub fn reset(&self) {
        self.state.reset_walkthrough();
    }
}
