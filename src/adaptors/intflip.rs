//! ±1 integer step mutation.

use serde::{Deserialize, Serialize};

use super::common::{Adapt, AdaptorKind, AdaptorState, MutationMode};
use crate::error::Result;
use crate::object::{alias_guard, Replicable};

/// Default flip probability.
const DEFAULT_FLIP_PROBABILITY: f64 = 0.05;

/// Steps an integer to the next larger or smaller value, 50/50.
///
/// At `i32::MAX`/`i32::MIN` the direction is flipped so the step never
/// overflows.
///
/// # Usage
///
/// ```
/// use evoparam::adaptors::{Adapt, IntFlipAdaptor};
///
/// let mut adaptor = IntFlipAdaptor::with_probability(1.0).unwrap();
/// let mut value = i32::MAX;
/// adaptor.mutate(&mut value);
/// assert_eq!(value, i32::MAX - 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntFlipAdaptor {
    state: AdaptorState,
}

impl IntFlipAdaptor {
    /// A flip adaptor with the default probability.
    pub fn new() -> Self {
        Self {
            state: AdaptorState::new("intflip", DEFAULT_FLIP_PROBABILITY)
                .expect("default int-flip adaptor state is valid"),
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
}

impl Default for IntFlipAdaptor {
    fn default() -> Self {
        Self::new()
    }
}

impl Adapt<i32> for IntFlipAdaptor {
    fn kind(&self) -> AdaptorKind {
        AdaptorKind::IntFlip
    }

    fn state(&self) -> &AdaptorState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut AdaptorState {
        &mut self.state
    }

    fn perturb(&mut self, value: &mut i32) {
        if self.state.rng.coin() {
            // Up, unless that would overflow.
            *value = if *value == i32::MAX {
                i32::MAX - 1
            } else {
                *value + 1
            };
        } else {
            *value = if *value == i32::MIN {
                i32::MIN + 1
            } else {
                *value - 1
            };
        }
    }
}

impl Replicable for IntFlipAdaptor {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_is_plus_or_minus_one() {
        let mut adaptor = IntFlipAdaptor::with_probability(1.0).unwrap();
        let mut seen_up = false;
        let mut seen_down = false;
        for _ in 0..200 {
            let mut value = 100;
            adaptor.mutate(&mut value);
            match value {
                101 => seen_up = true,
                99 => seen_down = true,
                other => panic!("unexpected step target: {other}"),
            }
        }
        assert!(seen_up && seen_down, "both directions should occur");
    }

    #[test]
    fn test_direction_flips_at_max() {
        let mut adaptor = IntFlipAdaptor::with_probability(1.0).unwrap();
        for _ in 0..50 {
            let mut value = i32::MAX;
            adaptor.mutate(&mut value);
            assert_eq!(value, i32::MAX - 1);
        }
    }

    #[test]
    fn test_direction_flips_at_min() {
        let mut adaptor = IntFlipAdaptor::with_probability(1.0).unwrap();
        for _ in 0..50 {
            let mut value = i32::MIN;
            adaptor.mutate(&mut value);
            assert_eq!(value, i32::MIN + 1);
        }
    }

    #[test]
    fn test_zero_probability_keeps_value() {
        let mut adaptor = IntFlipAdaptor::with_probability(0.0).unwrap();
        let mut value = 42;
        for _ in 0..100 {
            adaptor.mutate(&mut value);
        }
        assert_eq!(value, 42);
    }

    #[test]
    fn test_clone_load_compare() {
        let a = IntFlipAdaptor::with_probability(0.25).unwrap();
        let mut b = IntFlipAdaptor::new();
        assert!(!b.equal_to(&a));
        b.load_from(&a).unwrap();
        assert!(b.equal_to(&a));
    }
}
