//! The do-nothing adaptor.

use serde::{Deserialize, Serialize};

use super::common::{Adapt, AdaptorKind, AdaptorState, MutationMode};
use crate::error::Result;
use crate::object::{alias_guard, Replicable};

/// Leaves values untouched.
///
/// Used where a carrier slot requires an adaptor but certain values must
/// remain frozen. The probability is pinned to 0 and the mode to
/// [`MutationMode::Never`]; neither can be changed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityAdaptor {
    state: AdaptorState,
}

impl IdentityAdaptor {
    /// An identity adaptor named `identity`.
    pub fn new() -> Self {
        let mut state = AdaptorState::new("identity", 0.0)
            .expect("default identity adaptor state is valid");
        state.set_mode(MutationMode::Never);
        Self { state }
    }

    /// Name under which the adaptor is addressed on a carrier.
    pub fn name(&self) -> &str {
        self.state.name()
    }

    /// Renames the adaptor.
    pub fn set_name(&mut self, name: &str) {
        self.state.set_name(name);
    }
}

impl Default for IdentityAdaptor {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Adapt<T> for IdentityAdaptor {
    fn kind(&self) -> AdaptorKind {
        AdaptorKind::Identity
    }

    fn state(&self) -> &AdaptorState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut AdaptorState {
        &mut self.state
    }

    fn perturb(&mut self, _value: &mut T) {}
}

impl Replicable for IdentityAdaptor {
    fn load_from(&mut self, other: &Self) -> Result<()> {
        alias_guard(self, other)?;
        self.state.load_from_state(&other.state);
        Ok(())
    }

    fn equal_to(&self, other: &Self) -> bool {
        self.state.equal_state(&other.state)
    }

    fn similar_to(&self, other: &Self, epsilon: f64) -> bool {
        self.state.similar_state(&other.state, epsilon)
    }
}
