//! Gaussian mutation with self-adapting step width.

use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use super::common::{Adapt, AdaptorKind, AdaptorState, MutationMode};
use crate::error::{Error, Result};
use crate::object::{alias_guard, floats_similar, Replicable};

/// Default gaussian step width.
pub(crate) const DEFAULT_SIGMA: f64 = 0.1;
/// Default strength of the sigma self-adaption.
pub(crate) const DEFAULT_SIGMA_ADAPTION_RATE: f64 = 0.001;
/// Default minimum allowed sigma.
pub(crate) const DEFAULT_SIGMA_MIN: f64 = 1e-7;
/// Default maximum allowed sigma.
pub(crate) const DEFAULT_SIGMA_MAX: f64 = 5.0;

/// Step-width state shared by the gaussian-family adaptors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub(crate) struct SigmaParams {
    pub(crate) sigma: f64,
    pub(crate) sigma_min: f64,
    pub(crate) sigma_max: f64,
    pub(crate) adaption_rate: f64,
}

impl SigmaParams {
    pub(crate) fn defaults() -> Self {
        Self {
            sigma: DEFAULT_SIGMA,
            sigma_min: DEFAULT_SIGMA_MIN,
            sigma_max: DEFAULT_SIGMA_MAX,
            adaption_rate: DEFAULT_SIGMA_ADAPTION_RATE,
        }
    }

    pub(crate) fn checked(
        sigma: f64,
        adaption_rate: f64,
        sigma_min: f64,
        sigma_max: f64,
    ) -> Result<Self> {
        let mut params = Self::defaults();
        params.set_adaption_rate(adaption_rate)?;
        params.set_range(sigma_min, sigma_max)?;
        params.set_sigma(sigma)?;
        Ok(params)
    }

    pub(crate) fn set_sigma(&mut self, sigma: f64) -> Result<()> {
        if !sigma.is_finite() || sigma < self.sigma_min || sigma > self.sigma_max {
            return Err(Error::InvalidConfiguration(format!(
                "sigma {sigma} not in allowed range [{}, {}]",
                self.sigma_min, self.sigma_max
            )));
        }
        self.sigma = sigma;
        Ok(())
    }

    pub(crate) fn set_range(&mut self, sigma_min: f64, sigma_max: f64) -> Result<()> {
        if !sigma_min.is_finite() || !sigma_max.is_finite() || sigma_min <= 0.0 || sigma_min >= sigma_max
        {
            return Err(Error::InvalidConfiguration(format!(
                "invalid sigma range [{sigma_min}, {sigma_max}]: need 0 < min < max"
            )));
        }
        self.sigma_min = sigma_min;
        self.sigma_max = sigma_max;
        // Pull sigma back into the new range if necessary.
        self.sigma = self.sigma.clamp(sigma_min, sigma_max);
        Ok(())
    }

    pub(crate) fn set_adaption_rate(&mut self, rate: f64) -> Result<()> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(Error::InvalidConfiguration(format!(
                "sigma adaption rate must be positive, got {rate}"
            )));
        }
        self.adaption_rate = rate;
        Ok(())
    }

    /// One self-adaption step: `σ ← clamp(σ · exp(rate · z))`, with
    /// non-finite results pulled back into the configured range.
    pub(crate) fn adapt(&mut self, z: f64) {
        let next = self.sigma * (self.adaption_rate * z).exp();
        self.sigma = if next.is_nan() {
            self.sigma_min
        } else {
            next.clamp(self.sigma_min, self.sigma_max)
        };
    }

    pub(crate) fn similar(&self, other: &Self, epsilon: f64) -> bool {
        floats_similar(self.sigma, other.sigma, epsilon)
            && floats_similar(self.sigma_min, other.sigma_min, epsilon)
            && floats_similar(self.sigma_max, other.sigma_max, epsilon)
            && floats_similar(self.adaption_rate, other.adaption_rate, epsilon)
    }
}

/// Leaf types a [`GaussAdaptor`] can mutate.
pub trait GaussTarget: Copy + PartialEq + std::fmt::Debug + Send + Sync + 'static {
    /// Runtime kind reported for this instantiation.
    const KIND: AdaptorKind;

    /// Applies a gaussian step to the value.
    fn apply_step(value: Self, step: f64) -> Self;
}

impl GaussTarget for f64 {
    const KIND: AdaptorKind = AdaptorKind::GaussianDouble;

    fn apply_step(value: f64, step: f64) -> f64 {
        value + step
    }
}

impl GaussTarget for i32 {
    const KIND: AdaptorKind = AdaptorKind::GaussianInt32;

    fn apply_step(value: i32, step: f64) -> i32 {
        let delta = if step.is_finite() {
            step.round().clamp(-(u32::MAX as f64), u32::MAX as f64) as i64
        } else {
            0
        };
        let v = value as i64;
        // Fold the increment's sign instead of saturating at the boundary.
        let delta = if v >= 0 && delta >= 0 && (i32::MAX as i64 - v) < delta {
            -delta
        } else if v < 0 && delta < 0 && (i32::MIN as i64 - v) > delta {
            -delta
        } else {
            delta
        };
        (v + delta).clamp(i32::MIN as i64, i32::MAX as i64) as i32
    }
}

/// Gaussian mutation: `v ← v + σ·Z` with `Z ~ N(0, 1)`, rounded for
/// integer targets.
///
/// Self-adaption multiplies σ by `exp(rate · Z')` and clamps it into
/// `[sigma_min, sigma_max]`, letting the step width track the local
/// geometry of the quality surface.
///
/// # Usage
///
/// ```
/// use evoparam::adaptors::{Adapt, DoubleGaussAdaptor};
///
/// let mut adaptor = DoubleGaussAdaptor::with_parameters(0.1, 0.001, 1e-4, 1.0).unwrap();
/// let mut value = 1.0;
/// adaptor.mutate(&mut value);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(serialize = "", deserialize = ""))]
pub struct GaussAdaptor<T: GaussTarget> {
    state: AdaptorState,
    sigma: SigmaParams,
    #[serde(skip)]
    marker: PhantomData<T>,
}

/// Gaussian adaptor over doubles.
pub type DoubleGaussAdaptor = GaussAdaptor<f64>;
/// Gaussian adaptor over 32-bit integers.
pub type IntGaussAdaptor = GaussAdaptor<i32>;

impl<T: GaussTarget> GaussAdaptor<T> {
    /// A gaussian adaptor with default step-width parameters, probability
    /// 1 and probabilistic mode.
    pub fn new() -> Self {
        Self {
            state: AdaptorState::new("gauss", 1.0)
                .expect("default gauss adaptor state is valid"),
            sigma: SigmaParams::defaults(),
            marker: PhantomData,
        }
    }

    /// Like [`new`](Self::new) with an explicit initial sigma.
    pub fn with_sigma(sigma: f64) -> Result<Self> {
        let mut adaptor = Self::new();
        adaptor.set_sigma(sigma)?;
        Ok(adaptor)
    }

    /// Sets sigma, adaption rate and the allowed sigma range in one go.
    pub fn with_parameters(
        sigma: f64,
        adaption_rate: f64,
        sigma_min: f64,
        sigma_max: f64,
    ) -> Result<Self> {
        Ok(Self {
            state: AdaptorState::new("gauss", 1.0)
                .expect("default gauss adaptor state is valid"),
            sigma: SigmaParams::checked(sigma, adaption_rate, sigma_min, sigma_max)?,
            marker: PhantomData,
        })
    }

    /// Current step width.
    pub fn sigma(&self) -> f64 {
        self.sigma.sigma
    }

    /// Allowed sigma range.
    pub fn sigma_range(&self) -> (f64, f64) {
        (self.sigma.sigma_min, self.sigma.sigma_max)
    }

    /// Strength of the sigma self-adaption.
    pub fn sigma_adaption_rate(&self) -> f64 {
        self.sigma.adaption_rate
    }

    /// Sets the step width; must lie inside the allowed range.
    pub fn set_sigma(&mut self, sigma: f64) -> Result<()> {
        self.sigma.set_sigma(sigma)
    }

    /// Sets the allowed sigma range (`0 < min < max`); sigma is clamped
    /// into the new range.
    pub fn set_sigma_range(&mut self, sigma_min: f64, sigma_max: f64) -> Result<()> {
        self.sigma.set_range(sigma_min, sigma_max)
    }

    /// Sets the self-adaption strength (must be positive).
    pub fn set_sigma_adaption_rate(&mut self, rate: f64) -> Result<()> {
        self.sigma.set_adaption_rate(rate)
    }

    /// Name under which the adaptor is addressed on a carrier.
    pub fn name(&self) -> &str {
        self.state.name()
    }

    /// Renames the adaptor.
    pub fn set_name(&mut self, name: &str) {
        self.state.set_name(name);
    }

    /// Mutation probability consulted in probabilistic mode.
    pub fn probability(&self) -> f64 {
        self.state.probability()
    }

    /// Sets the mutation probability (`[0, 1]`).
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

impl<T: GaussTarget> Default for GaussAdaptor<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: GaussTarget> Adapt<T> for GaussAdaptor<T> {
    fn kind(&self) -> AdaptorKind {
        T::KIND
    }

    fn state(&self) -> &AdaptorState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut AdaptorState {
        &mut self.state
    }

    fn perturb(&mut self, value: &mut T) {
        let sigma = self.sigma.sigma;
        let step = self.state.rng.gauss(0.0, sigma);
        *value = T::apply_step(*value, step);
    }

    fn self_adapt(&mut self) {
        let z = self.state.rng.gauss_std();
        self.sigma.adapt(z);
    }
}

impl<T: GaussTarget> Replicable for GaussAdaptor<T> {
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
