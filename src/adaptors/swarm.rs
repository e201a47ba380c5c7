//! Always-firing gaussian step, used by swarm-style position updates.

use serde::{Deserialize, Serialize};

use super::common::{Adapt, AdaptorKind, AdaptorState, MutationMode};
use super::gauss::SigmaParams;
use crate::error::{Error, Result};
use crate::object::{alias_guard, Replicable};

/// Gaussian step over doubles that fires on every call.
///
/// The mode is pinned to [`MutationMode::Always`];
/// [`set_mode`](SwarmAdaptor::set_mode) refuses any change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwarmAdaptor {
    state: AdaptorState,
    sigma: SigmaParams,
}

impl SwarmAdaptor {
    /// A swarm adaptor with default step-width parameters.
    pub fn new() -> Self {
        let mut state =
            AdaptorState::new("swarm", 1.0).expect("default swarm adaptor state is valid");
        state.set_mode(MutationMode::Always);
        Self {
            state,
            sigma: SigmaParams::defaults(),
        }
    }

    /// Like [`new`](Self::new) with an explicit initial sigma.
    pub fn with_sigma(sigma: f64) -> Result<Self> {
        let mut adaptor = Self::new();
        adaptor.sigma.set_sigma(sigma)?;
        Ok(adaptor)
    }

    /// Name under which the adaptor is addressed on a carrier.
    pub fn name(&self) -> &str {
        self.state.name()
    }

    /// Renames the adaptor.
    pub fn set_name(&mut self, name: &str) {
        self.state.set_name(name);
    }

    /// Current step width.
    pub fn sigma(&self) -> f64 {
        self.sigma.sigma
    }

    /// Sets the step width; must lie inside the allowed range.
    pub fn set_sigma(&mut self, sigma: f64) -> Result<()> {
        self.sigma.set_sigma(sigma)
    }

    /// Allowed sigma range.
    pub fn sigma_range(&self) -> (f64, f64) {
        (self.sigma.sigma_min, self.sigma.sigma_max)
    }

    /// Sets the allowed sigma range (`0 < min < max`).
    pub fn set_sigma_range(&mut self, sigma_min: f64, sigma_max: f64) -> Result<()> {
        self.sigma.set_range(sigma_min, sigma_max)
    }

    /// Current mutation mode; always [`MutationMode::Always`].
    pub fn mode(&self) -> MutationMode {
        self.state.mode()
    }

    /// A swarm adaptor always mutates; any attempt to change the mode
    /// fails with [`Error::InvalidConfiguration`].
    pub fn set_mode(&mut self, _mode: MutationMode) -> Result<()> {
        Err(Error::InvalidConfiguration(
            "a swarm adaptor always mutates; its mode cannot be changed".into(),
        ))
    }
}

impl Default for SwarmAdaptor {
    fn default() -> Self {
        Self::new()
    }
}

impl Adapt<f64> for SwarmAdaptor {
    fn kind(&self) -> AdaptorKind {
        AdaptorKind::Swarm
    }

    fn state(&self) -> &AdaptorState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut AdaptorState {
        &mut self.state
    }

    fn perturb(&mut self, value: &mut f64) {
        let sigma = self.sigma.sigma;
        *value += self.state.rng.gauss(0.0, sigma);
    }

    fn self_adapt(&mut self) {
        let z = self.state.rng.gauss_std();
        self.sigma.adapt(z);
    }
}

impl Replicable for SwarmAdaptor {
    fn load_from(&mut self, other: &Self) -> Result<()> {
        alias_guard(self, other)?;
        self.state.load_from_state(&other.state);
        self.sigma = other.sigma;
        Ok(())
    }

    fn equal_to(&self, other: &Self) -> bool {
        self.state.equal_state(&other.state) && self.sigma == other.sigma
    }

    fn similar_to(&self, other: &Self, epsilon: f64) -> bool {
        self.state.similar_state(&other.state, epsilon)
            && self.sigma.similar(&other.sigma, epsilon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_always_fires() {
        let mut adaptor = SwarmAdaptor::new();
        let mut value = 0.0f64;
        for _ in 0..20 {
            let before = value;
            adaptor.mutate(&mut value);
            assert_ne!(value, before);
        }
    }

    #[test]
    fn test_mode_is_pinned() {
        let mut adaptor = SwarmAdaptor::new();
        assert_eq!(adaptor.mode(), MutationMode::Always);
        assert!(adaptor.set_mode(MutationMode::Never).is_err());
        assert_eq!(adaptor.mode(), MutationMode::Always);
    }

    #[test]
    fn test_clone_load_compare() {
        let a = SwarmAdaptor::with_sigma(0.5).unwrap();
        let mut b = SwarmAdaptor::new();
        assert!(!b.equal_to(&a));
        b.load_from(&a).unwrap();
        assert!(b.equal_to(&a));
    }
}
