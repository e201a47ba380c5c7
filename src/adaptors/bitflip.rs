//! Boolean flip mutation with optionally self-adapting probability.

use serde::{Deserialize, Serialize};

use super::common::{Adapt, AdaptorKind, AdaptorState, MutationMode};
use super::gauss::SigmaParams;
use crate::bounds::BoundedMap;
use crate::error::Result;
use crate::object::{alias_guard, Replicable};

/// Default flip probability.
const DEFAULT_FLIP_PROBABILITY: f64 = 0.05;
/// Initial step width of the gaussian walk on the flip probability.
const PROBABILITY_SIGMA: f64 = 0.001;
/// Strength of the step width's own self-adaption.
const PROBABILITY_SIGMA_RATE: f64 = 1e-5;
/// Minimum allowed step width.
const PROBABILITY_SIGMA_FLOOR: f64 = 1e-5;
/// Maximum allowed step width; a wider step than the unit interval is
/// pointless.
const PROBABILITY_SIGMA_CEIL: f64 = 1.0;

/// Flips a boolean with the configured probability.
///
/// Mutation only does work through the probabilistic mode path; a typical
/// flip probability is well below 1. When probability self-adaption is
/// enabled, each self-adaption event takes a small gaussian step on the
/// probability itself and folds the result back into `[0, 1]`; the step
/// width is in turn a self-adapting sigma with a hard floor, so the walk
/// can widen or narrow over time without collapsing to zero.
///
/// # Usage
///
/// ```
/// use evoparam::adaptors::{Adapt, BitFlipAdaptor};
///
/// let mut adaptor = BitFlipAdaptor::with_probability(1.0).unwrap();
/// let mut bit = false;
/// adaptor.mutate(&mut bit);
/// assert!(bit);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BitFlipAdaptor {
    state: AdaptorState,
    allow_probability_adaption: bool,
    probability_step: SigmaParams,
}

impl BitFlipAdaptor {
    /// A flip adaptor with the default probability and self-adaption of
    /// the probability disabled.
    pub fn new() -> Self {
        Self {
            state: AdaptorState::new("bitflip", DEFAULT_FLIP_PROBABILITY)
                .expect("default bit-flip adaptor state is valid"),
            allow_probability_adaption: false,
            probability_step: SigmaParams::checked(
                PROBABILITY_SIGMA,
                PROBABILITY_SIGMA_RATE,
                PROBABILITY_SIGMA_FLOOR,
                PROBABILITY_SIGMA_CEIL,
            )
            .expect("default probability step parameters are valid"),
        }
    }

    /// Like [`new`](Self::new) with an explicit flip probability.
    pub fn with_probability(probability: f64) -> Result<Self> {
        let mut adaptor = Self::new();
        adaptor.set_probability(probability)?;
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

    /// Current flip probability.
    pub fn probability(&self) -> f64 {
        self.state.probability()
    }

    /// Sets the flip probability (`[0, 1]`).
    pub fn set_probability(&mut self, probability: f64) -> Result<()> {
        self.state.set_probability(probability)
    }

    /// Current mutation mode.
    pub fn mode(&self) -> MutationMode {
        self.state.mode()
    }

    /// Sets the mutation mode.
    pub fn set_mode(&mut self, mode: MutationMode) {
        self.state.set_mode(mode);
    }

    /// Sets the number of calls between self-adaption events (0 disables).
    pub fn set_adaption_threshold(&mut self, threshold: u32) {
        self.state.set_adaption_threshold(threshold);
    }

    /// Whether self-adaption may move the flip probability.
    pub fn allow_probability_adaption(&self) -> bool {
        self.allow_probability_adaption
    }

    /// Enables or disables self-adaption of the flip probability.
    pub fn set_allow_probability_adaption(&mut self, allow: bool) {
        self.allow_probability_adaption = allow;
    }

    /// Current width of the gaussian walk on the flip probability.
    pub fn probability_step_width(&self) -> f64 {
        self.probability_step.sigma
    }
}

impl Default for BitFlipAdaptor {
    fn default() -> Self {
        Self::new()
    }
}

impl Adapt<bool> for BitFlipAdaptor {
    fn kind(&self) -> AdaptorKind {
        AdaptorKind::BitFlip
    }

    fn state(&self) -> &AdaptorState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut AdaptorState {
        &mut self.state
    }

    fn perturb(&mut self, value: &mut bool) {
        *value = !*value;
    }

    fn self_adapt(&mut self) {
        if !self.allow_probability_adaption {
            return;
        }
        let step = {
            let sigma = self.probability_step.sigma;
            self.state.rng.gauss(0.0, sigma)
        };
        let probability = BoundedMap::unit().fold(self.state.probability() + step);
        self.state.force_probability(probability);
        // The walk's own width adapts too, floored so it never collapses.
        let z = self.state.rng.gauss_std();
        self.probability_step.adapt(z);
    }
}

impl Replicable for BitFlipAdaptor {
    fn load_from(&mut self, other: &Self) -> Result<()> {
        alias_guard(self, other)?;
        self.state.load_from_state(&other.state);
        self.allow_probability_adaption = other.allow_probability_adaption;
        self.probability_step = other.probability_step;
        Ok(())
    }

    fn equal_to(&self, other: &Self) -> bool {
        self.state.equal_state(&other.state)
            && self.allow_probability_adaption == other.allow_probability_adaption
            && self.probability_step == other.probability_step
    }

    fn similar_to(&self, other: &Self, epsilon: f64) -> bool {
        self.state.similar_state(&other.state, epsilon)
            && self.allow_probability_adaption == other.allow_probability_adaption
            && self.probability_step.similar(&other.probability_step, epsilon)
    }
}
