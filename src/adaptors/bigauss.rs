//! Gaussian mutation carrying a peak-distance parameter.

use serde::{Deserialize, Serialize};

use super::common::{Adapt, AdaptorKind, AdaptorState, MutationMode};
use super::gauss::SigmaParams;
use crate::error::{Error, Result};
use crate::object::{alias_guard, floats_similar, Replicable};

/// Default distance between the two envisioned gaussian peaks.
const DEFAULT_PEAK_DISTANCE: f64 = 1.0;

/// Gaussian mutation with a peak-distance parameter.
///
/// The step is sampled from `N(0, σ)` with the same self-adapting σ as
/// the plain gaussian adaptor. The peak distance describes a two-peak
/// sampling scheme (peaks at `±d/2` around the value, keeping the search
/// at a preferred radius); it is validated, carried and serialized as
/// configuration state, but the step itself does not consult it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BiGaussAdaptor {
    state: AdaptorState,
    sigma: SigmaParams,
    peak_distance: f64,
}

impl BiGaussAdaptor {
    /// A bi-gaussian adaptor with default parameters.
    pub fn new() -> Self {
        Self {
            state: AdaptorState::new("bigauss", 1.0)
                .expect("default bi-gauss adaptor state is valid"),
            sigma: SigmaParams::defaults(),
            peak_distance: DEFAULT_PEAK_DISTANCE,
        }
    }

    /// Sets sigma, adaption rate, sigma range and peak distance in one go.
    pub fn with_parameters(
        sigma: f64,
        adaption_rate: f64,
        sigma_min: f64,
        sigma_max: f64,
        peak_distance: f64,
    ) -> Result<Self> {
        let mut adaptor = Self {
            state: AdaptorState::new("bigauss", 1.0)
                .expect("default bi-gauss adaptor state is valid"),
            sigma: SigmaParams::checked(sigma, adaption_rate, sigma_min, sigma_max)?,
            peak_distance: DEFAULT_PEAK_DISTANCE,
        };
        adaptor.set_peak_distance(peak_distance)?;
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

    /// Width of the gaussian step.
    pub fn sigma(&self) -> f64 {
        self.sigma.sigma
    }

    /// Sets the step width; must lie inside the allowed range.
    pub fn set_sigma(&mut self, sigma: f64) -> Result<()> {
        self.sigma.set_sigma(sigma)
    }

    /// Distance between the two envisioned peaks.
    pub fn peak_distance(&self) -> f64 {
        self.peak_distance
    }

    /// Sets the peak distance (finite, non-negative).
    pub fn set_peak_distance(&mut self, distance: f64) -> Result<()> {
        if !distance.is_finite() || distance < 0.0 {
            return Err(Error::InvalidConfiguration(format!(
                "peak distance must be finite and non-negative, got {distance}"
            )));
        }
        self.peak_distance = distance;
        Ok(())
    }

    /// Mutation probability consulted in probabilistic mode.
    pub fn probability(&self) -> f64 {
        self.state.probability()
    }

    /// Sets the mutation probability (`[0, 1]`).
    pub fn set_probability(&mut self, probability: f64) -> Result<()> {
        self.state.set_probability(probability)
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

impl Default for BiGaussAdaptor {
    fn default() -> Self {
        Self::new()
    }
}

impl Adapt<f64> for BiGaussAdaptor {
    fn kind(&self) -> AdaptorKind {
        AdaptorKind::BiGauss
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

impl Replicable for BiGaussAdaptor {
    fn load_from(&mut self, other: &Self) -> Result<()> {
        alias_guard(self, other)?;
        self.state.load_from_state(&other.state);
        self.sigma = other.sigma;
        self.peak_distance = other.peak_distance;
        Ok(())
    }

    fn equal_to(&self, other: &Self) -> bool {
        self.state.equal_state(&other.state)
            && self.sigma == other.sigma
            && self.peak_distance == other.peak_distance
    }

    fn similar_to(&self, other: &Self, epsilon: f64) -> bool {
        self.state.similar_state(&other.state, epsilon)
            && self.sigma.similar(&other.sigma, epsilon)
            && floats_similar(self.peak_distance, other.peak_distance, epsilon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_is_centred_gaussian() {
        let mut adaptor = BiGaussAdaptor::with_parameters(0.05, 0.001, 1e-4, 1.0, 2.0).unwrap();
        let n = 2000usize;
        let mut sum = 0.0f64;
        let mut sum_sq = 0.0f64;
        for _ in 0..n {
            let mut value = 0.0f64;
            adaptor.mutate(&mut value);
            sum += value;
            sum_sq += value * value;
        }
        let mean = sum / n as f64;
        let sd = (sum_sq / n as f64 - mean * mean).sqrt();
        // The peak distance is carried state only; the step stays a
        // centred gaussian of width sigma.
        assert!(mean.abs() < 0.01, "step mean drifted: {mean}");
        assert!((sd - 0.05).abs() < 0.01, "step width off: {sd}");
    }

    #[test]
    fn test_rejects_invalid_peak_distance() {
        let mut adaptor = BiGaussAdaptor::new();
        assert!(adaptor.set_peak_distance(-1.0).is_err());
        assert!(adaptor.set_peak_distance(f64::NAN).is_err());
        assert!(adaptor.set_peak_distance(0.0).is_ok());
    }

    #[test]
    fn test_clone_load_compare() {
        let a = BiGaussAdaptor::with_parameters(0.2, 0.01, 1e-3, 2.0, 0.5).unwrap();
        let mut b = BiGaussAdaptor::new();
        assert!(!b.equal_to(&a));
        b.load_from(&a).unwrap();
        assert!(b.equal_to(&a));
        assert!(b.similar_to(&a, 0.0));
    }
}
