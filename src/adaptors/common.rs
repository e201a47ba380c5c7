//! State and protocol shared by every adaptor kind.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::object::floats_similar;
use crate::random::RandomHandle;

/// Decides whether a mutation call performs work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MutationMode {
    /// Every call mutates, regardless of the probability.
    Always,
    /// No call mutates.
    Never,
    /// A call mutates with the configured probability.
    #[default]
    Probabilistic,
}

/// Runtime kind of an adaptor; doubles as its serialization type-tag name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdaptorKind {
    /// Gaussian perturbation of a double.
    GaussianDouble,
    /// Gaussian perturbation of a 32-bit integer.
    GaussianInt32,
    /// Gaussian perturbation of a double, carrying a peak-distance
    /// parameter.
    BiGauss,
    /// Boolean flip.
    BitFlip,
    /// ±1 integer step.
    IntFlip,
    /// No-op.
    Identity,
    /// Always-firing gaussian step.
    Swarm,
}

impl AdaptorKind {
    /// Stable name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            AdaptorKind::GaussianDouble => "GaussianDouble",
            AdaptorKind::GaussianInt32 => "GaussianInt32",
            AdaptorKind::BiGauss => "BiGauss",
            AdaptorKind::BitFlip => "BitFlip",
            AdaptorKind::IntFlip => "IntFlip",
            AdaptorKind::Identity => "Identity",
            AdaptorKind::Swarm => "Swarm",
        }
    }
}

impl std::fmt::Display for AdaptorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State every adaptor carries, regardless of kind.
///
/// Invariants: `probability ∈ [0, 1]`, `max_vars ≥ 1`,
/// `adaption_counter < max(adaption_threshold, 1)`,
/// `current_index < max_vars`. The random handle is neither serialized nor
/// compared; deserialized adaptors re-attach to the process-wide service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdaptorState {
    name: String,
    probability: f64,
    mode: MutationMode,
    adaption_threshold: u32,
    adaption_counter: u32,
    current_index: usize,
    max_vars: usize,
    #[serde(skip, default)]
    pub(crate) rng: RandomHandle,
}

impl AdaptorState {
    pub(crate) fn new(name: &str, probability: f64) -> Result<Self> {
        check_probability(probability)?;
        Ok(Self {
            name: name.to_owned(),
            probability,
            mode: MutationMode::default(),
            adaption_threshold: 0,
            adaption_counter: 0,
            current_index: 0,
            max_vars: 1,
            rng: RandomHandle::default(),
        })
    }

    /// Name under which the adaptor is addressed on a carrier.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: &str) {
        self.name = name.to_owned();
    }

    /// Chance that a probabilistic mutation call performs work.
    pub fn probability(&self) -> f64 {
        self.probability
    }

    pub(crate) fn set_probability(&mut self, probability: f64) -> Result<()> {
        check_probability(probability)?;
        self.probability = probability;
        Ok(())
    }

    /// Sets the probability without validation; the caller guarantees the
    /// value lies in `[0, 1]`.
    pub(crate) fn force_probability(&mut self, probability: f64) {
        self.probability = probability;
    }

    /// Current mutation mode.
    pub fn mode(&self) -> MutationMode {
        self.mode
    }

    pub(crate) fn set_mode(&mut self, mode: MutationMode) {
        self.mode = mode;
    }

    /// Number of probabilistic calls between self-adaption events;
    /// 0 disables self-adaption.
    pub fn adaption_threshold(&self) -> u32 {
        self.adaption_threshold
    }

    pub(crate) fn set_adaption_threshold(&mut self, threshold: u32) {
        self.adaption_threshold = threshold;
        if threshold == 0 {
            self.adaption_counter = 0;
        } else {
            self.adaption_counter %= threshold;
        }
    }

    /// Calls since the last self-adaption event.
    pub fn adaption_counter(&self) -> u32 {
        self.adaption_counter
    }

    /// Rolling index into the sequence currently being mutated.
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Length of the sequence this adaptor expects to mutate in a row.
    pub fn max_vars(&self) -> usize {
        self.max_vars
    }

    pub(crate) fn set_max_vars(&mut self, max_vars: usize) -> Result<()> {
        if max_vars == 0 {
            return Err(Error::InvalidConfiguration(
                "max_vars must be at least 1".into(),
            ));
        }
        self.max_vars = max_vars;
        self.current_index = 0;
        Ok(())
    }

    /// Re-arms the rolling index for a sequence of `len` values.
    pub(crate) fn rearm(&mut self, len: usize) {
        self.max_vars = len.max(1);
        self.current_index = 0;
    }

    /// Advances the rolling index, wrapping at `max_vars`.
    pub(crate) fn advance_index(&mut self) {
        if self.max_vars > 1 {
            self.current_index += 1;
            if self.current_index >= self.max_vars {
                self.current_index = 0;
            }
        }
    }

    /// Counts one probabilistic call towards self-adaption. Returns `true`
    /// when the threshold was reached and self-adaption should fire.
    pub(crate) fn tick_adaption(&mut self) -> bool {
        if self.adaption_threshold == 0 {
            return false;
        }
        self.adaption_counter += 1;
        if self.adaption_counter >= self.adaption_threshold {
            self.adaption_counter = 0;
            true
        } else {
            false
        }
    }

    pub(crate) fn load_from_state(&mut self, other: &Self) {
        self.name = other.name.clone();
        self.probability = other.probability;
        self.mode = other.mode;
        self.adaption_threshold = other.adaption_threshold;
        self.adaption_counter = other.adaption_counter;
        self.current_index = other.current_index;
        self.max_vars = other.max_vars;
    }

    pub(crate) fn equal_state(&self, other: &Self) -> bool {
        self.name == other.name
            && self.probability == other.probability
            && self.mode == other.mode
            && self.adaption_threshold == other.adaption_threshold
            && self.adaption_counter == other.adaption_counter
            && self.current_index == other.current_index
            && self.max_vars == other.max_vars
    }

    pub(crate) fn similar_state(&self, other: &Self, epsilon: f64) -> bool {
        self.name == other.name
            && floats_similar(self.probability, other.probability, epsilon)
            && self.mode == other.mode
            && self.adaption_threshold == other.adaption_threshold
            && self.adaption_counter == other.adaption_counter
            && self.current_index == other.current_index
            && self.max_vars == other.max_vars
    }
}

pub(crate) fn check_probability(probability: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&probability) {
        return Err(Error::InvalidConfiguration(format!(
            "probability {probability} not in [0, 1]"
        )));
    }
    Ok(())
}

/// The mutation protocol every adaptor implements.
///
/// Implementors provide the kind-specific [`perturb`](Adapt::perturb) and
/// optionally [`self_adapt`](Adapt::self_adapt); the provided
/// [`mutate`](Adapt::mutate) drives mode, probability, self-adaption
/// counting and the rolling index.
pub trait Adapt<T> {
    /// Runtime kind of this adaptor.
    fn kind(&self) -> AdaptorKind;

    /// Shared adaptor state.
    fn state(&self) -> &AdaptorState;

    /// Mutable shared adaptor state.
    fn state_mut(&mut self) -> &mut AdaptorState;

    /// The kind-specific mutation, applied unconditionally.
    fn perturb(&mut self, value: &mut T);

    /// Perturbs the adaptor's own meta-parameters. Fires every
    /// `adaption_threshold` probabilistic calls; the default does nothing.
    fn self_adapt(&mut self) {}

    /// Mutates one value according to the mode/probability protocol.
    ///
    /// In [`MutationMode::Probabilistic`] the self-adaption counter ticks
    /// only on calls whose draw performed work, and an adaption event
    /// applies ahead of that call's perturbation; the other modes never
    /// touch the counter.
    fn mutate(&mut self, value: &mut T) {
        match self.state().mode() {
            MutationMode::Always => self.perturb(value),
            MutationMode::Never => {}
            MutationMode::Probabilistic => {
                let perform = {
                    let state = self.state_mut();
                    let p = state.probability();
                    p > 0.0 && state.rng.even01() <= p
                };
                if perform {
                    if self.state_mut().tick_adaption() {
                        self.self_adapt();
                    }
                    self.perturb(value);
                }
            }
        }
        self.state_mut().advance_index();
    }

    /// Applies [`mutate`](Adapt::mutate) to each element front-to-back,
    /// re-arming the rolling index for the sequence length.
    fn mutate_sequence(&mut self, values: &mut [T]) {
        if values.is_empty() {
            return;
        }
        if self.state().max_vars() != values.len() {
            self.state_mut().rearm(values.len());
        }
        for value in values.iter_mut() {
            self.mutate(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_validates_probability() {
        assert!(AdaptorState::new("a", 0.0).is_ok());
        assert!(AdaptorState::new("a", 1.0).is_ok());
        assert!(AdaptorState::new("a", -0.1).is_err());
        assert!(AdaptorState::new("a", 1.1).is_err());
        assert!(AdaptorState::new("a", f64::NAN).is_err());
    }

    #[test]
    fn test_tick_adaption_wraps_at_threshold() {
        let mut state = AdaptorState::new("a", 0.5).unwrap();
        state.set_adaption_threshold(3);
        assert!(!state.tick_adaption());
        assert!(!state.tick_adaption());
        assert!(state.tick_adaption());
        assert_eq!(state.adaption_counter(), 0);
        assert!(!state.tick_adaption());
    }

    #[test]
    fn test_tick_adaption_disabled_at_zero() {
        let mut state = AdaptorState::new("a", 0.5).unwrap();
        for _ in 0..10 {
            assert!(!state.tick_adaption());
        }
        assert_eq!(state.adaption_counter(), 0);
    }

    #[test]
    fn test_lowering_threshold_keeps_counter_invariant() {
        let mut state = AdaptorState::new("a", 0.5).unwrap();
        state.set_adaption_threshold(10);
        for _ in 0..7 {
            state.tick_adaption();
        }
        assert_eq!(state.adaption_counter(), 7);
        state.set_adaption_threshold(4);
        assert!(state.adaption_counter() < 4);
        state.set_adaption_threshold(0);
        assert_eq!(state.adaption_counter(), 0);
    }

    #[test]
    fn test_index_advances_and_wraps() {
        let mut state = AdaptorState::new("a", 0.5).unwrap();
        state.set_max_vars(3).unwrap();
        assert_eq!(state.current_index(), 0);
        state.advance_index();
        state.advance_index();
        assert_eq!(state.current_index(), 2);
        state.advance_index();
        assert_eq!(state.current_index(), 0);
    }

    #[test]
    fn test_single_var_index_stays_zero() {
        let mut state = AdaptorState::new("a", 0.5).unwrap();
        for _ in 0..5 {
            state.advance_index();
        }
        assert_eq!(state.current_index(), 0);
    }

    #[test]
    fn test_set_max_vars_rejects_zero() {
        let mut state = AdaptorState::new("a", 0.5).unwrap();
        assert!(state.set_max_vars(0).is_err());
    }

    #[test]
    fn test_state_comparison_ignores_rng() {
        let a = AdaptorState::new("a", 0.5).unwrap();
        let mut b = AdaptorState::new("b", 0.75).unwrap();
        assert!(!b.equal_state(&a));
        b.load_from_state(&a);
        assert!(b.equal_state(&a));
        assert!(b.similar_state(&a, 0.0));
    }
}
