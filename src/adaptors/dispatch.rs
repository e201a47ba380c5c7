//! Per-leaf-type tagged adaptor enums.
//!
//! A carrier of doubles can only ever hold double-compatible adaptors, a
//! carrier of booleans only boolean ones. The enums below encode that at
//! the type level and carry the runtime kind in the variant tag, which the
//! serialization codecs write ahead of the payload.

use serde::{Deserialize, Serialize};

use super::bigauss::BiGaussAdaptor;
use super::bitflip::BitFlipAdaptor;
use super::common::{Adapt, AdaptorKind, AdaptorState, MutationMode};
use super::gauss::{DoubleGaussAdaptor, IntGaussAdaptor};
use super::identity::IdentityAdaptor;
use super::intflip::IntFlipAdaptor;
use super::swarm::SwarmAdaptor;
use crate::error::{Error, Result};
use crate::object::Replicable;

/// Any adaptor over `f64` values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DoubleAdaptor {
    /// Gaussian perturbation with self-adapting step width.
    Gauss(DoubleGaussAdaptor),
    /// Gaussian step carrying a peak-distance parameter.
    BiGauss(BiGaussAdaptor),
    /// Always-firing gaussian step.
    Swarm(SwarmAdaptor),
    /// No-op.
    Identity(IdentityAdaptor),
}

/// Any adaptor over `i32` values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum IntAdaptor {
    /// Gaussian perturbation, rounded to the nearest integer.
    Gauss(IntGaussAdaptor),
    /// ±1 step.
    Flip(IntFlipAdaptor),
    /// No-op.
    Identity(IdentityAdaptor),
}

/// Any adaptor over `bool` values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BoolAdaptor {
    /// Probability-gated flip.
    Flip(BitFlipAdaptor),
    /// No-op.
    Identity(IdentityAdaptor),
}

impl DoubleAdaptor {
    /// Name under which the adaptor is addressed on a carrier.
    pub fn name(&self) -> &str {
        Adapt::<f64>::state(self).name()
    }

    /// Mutation probability consulted in probabilistic mode.
    pub fn probability(&self) -> f64 {
        Adapt::<f64>::state(self).probability()
    }

    /// Current mutation mode.
    pub fn mode(&self) -> MutationMode {
        Adapt::<f64>::state(self).mode()
    }

    /// Sets the mutation probability.
    ///
    /// An identity adaptor keeps its probability pinned to 0; the request
    /// is accepted and ignored.
    pub fn set_probability(&mut self, probability: f64) -> Result<()> {
        match self {
            DoubleAdaptor::Gauss(a) => a.set_probability(probability),
            DoubleAdaptor::BiGauss(a) => a.set_probability(probability),
            DoubleAdaptor::Swarm(a) => a.state_mut().set_probability(probability),
            DoubleAdaptor::Identity(_) => Ok(()),
        }
    }

    /// Sets the mutation mode.
    ///
    /// A swarm adaptor refuses with [`Error::InvalidConfiguration`]; an
    /// identity adaptor keeps its mode pinned and ignores the request.
    pub fn set_mode(&mut self, mode: MutationMode) -> Result<()> {
        match self {
            DoubleAdaptor::Gauss(a) => {
                a.set_mode(mode);
                Ok(())
            }
            DoubleAdaptor::BiGauss(a) => {
                a.set_mode(mode);
                Ok(())
            }
            DoubleAdaptor::Swarm(a) => a.set_mode(mode),
            DoubleAdaptor::Identity(_) => Ok(()),
        }
    }

    /// Sets the number of calls between self-adaption events (0 disables).
    pub fn set_adaption_threshold(&mut self, threshold: u32) {
        Adapt::<f64>::state_mut(self).set_adaption_threshold(threshold);
    }
}

impl IntAdaptor {
    /// Name under which the adaptor is addressed on a carrier.
    pub fn name(&self) -> &str {
        Adapt::<i32>::state(self).name()
    }

    /// Mutation probability consulted in probabilistic mode.
    pub fn probability(&self) -> f64 {
        Adapt::<i32>::state(self).probability()
    }

    /// Current mutation mode.
    pub fn mode(&self) -> MutationMode {
        Adapt::<i32>::state(self).mode()
    }

    /// Sets the mutation probability; pinned to 0 for identity adaptors.
    pub fn set_probability(&mut self, probability: f64) -> Result<()> {
        match self {
            IntAdaptor::Gauss(a) => a.set_probability(probability),
            IntAdaptor::Flip(a) => a.set_probability(probability),
            IntAdaptor::Identity(_) => Ok(()),
        }
    }

    /// Sets the mutation mode; pinned for identity adaptors.
    pub fn set_mode(&mut self, mode: MutationMode) -> Result<()> {
        match self {
            IntAdaptor::Gauss(a) => {
                a.set_mode(mode);
                Ok(())
            }
            IntAdaptor::Flip(a) => {
                a.set_mode(mode);
                Ok(())
            }
            IntAdaptor::Identity(_) => Ok(()),
        }
    }

    /// Sets the number of calls between self-adaption events (0 disables).
    pub fn set_adaption_threshold(&mut self, threshold: u32) {
        Adapt::<i32>::state_mut(self).set_adaption_threshold(threshold);
    }
}

impl BoolAdaptor {
    /// Name under which the adaptor is addressed on a carrier.
    pub fn name(&self) -> &str {
        Adapt::<bool>::state(self).name()
    }

    /// Mutation probability consulted in probabilistic mode.
    pub fn probability(&self) -> f64 {
        Adapt::<bool>::state(self).probability()
    }

    /// Current mutation mode.
    pub fn mode(&self) -> MutationMode {
        Adapt::<bool>::state(self).mode()
    }

    /// Sets the mutation probability; pinned to 0 for identity adaptors.
    pub fn set_probability(&mut self, probability: f64) -> Result<()> {
        match self {
            BoolAdaptor::Flip(a) => a.set_probability(probability),
            BoolAdaptor::Identity(_) => Ok(()),
        }
    }

    /// Sets the mutation mode; pinned for identity adaptors.
    pub fn set_mode(&mut self, mode: MutationMode) -> Result<()> {
        match self {
            BoolAdaptor::Flip(a) => {
                a.set_mode(mode);
                Ok(())
            }
            BoolAdaptor::Identity(_) => Ok(()),
        }
    }

    /// Sets the number of calls between self-adaption events (0 disables).
    pub fn set_adaption_threshold(&mut self, threshold: u32) {
        Adapt::<bool>::state_mut(self).set_adaption_threshold(threshold);
    }
}

impl Adapt<f64> for DoubleAdaptor {
    fn kind(&self) -> AdaptorKind {
        match self {
            DoubleAdaptor::Gauss(a) => a.kind(),
            DoubleAdaptor::BiGauss(a) => a.kind(),
            DoubleAdaptor::Swarm(a) => a.kind(),
            DoubleAdaptor::Identity(a) => Adapt::<f64>::kind(a),
        }
    }

    fn state(&self) -> &AdaptorState {
        match self {
            DoubleAdaptor::Gauss(a) => a.state(),
            DoubleAdaptor::BiGauss(a) => a.state(),
            DoubleAdaptor::Swarm(a) => a.state(),
            DoubleAdaptor::Identity(a) => Adapt::<f64>::state(a),
        }
    }

    fn state_mut(&mut self) -> &mut AdaptorState {
        match self {
            DoubleAdaptor::Gauss(a) => a.state_mut(),
            DoubleAdaptor::BiGauss(a) => a.state_mut(),
            DoubleAdaptor::Swarm(a) => a.state_mut(),
            DoubleAdaptor::Identity(a) => Adapt::<f64>::state_mut(a),
        }
    }

    fn perturb(&mut self, value: &mut f64) {
        match self {
            DoubleAdaptor::Gauss(a) => a.perturb(value),
            DoubleAdaptor::BiGauss(a) => a.perturb(value),
            DoubleAdaptor::Swarm(a) => a.perturb(value),
            DoubleAdaptor::Identity(a) => a.perturb(value),
        }
    }

    fn self_adapt(&mut self) {
        match self {
            DoubleAdaptor::Gauss(a) => a.self_adapt(),
            DoubleAdaptor::BiGauss(a) => a.self_adapt(),
            DoubleAdaptor::Swarm(a) => a.self_adapt(),
            DoubleAdaptor::Identity(a) => Adapt::<f64>::self_adapt(a),
        }
    }
}

impl Adapt<i32> for IntAdaptor {
    fn kind(&self) -> AdaptorKind {
        match self {
            IntAdaptor::Gauss(a) => a.kind(),
            IntAdaptor::Flip(a) => a.kind(),
            IntAdaptor::Identity(a) => Adapt::<i32>::kind(a),
        }
    }

    fn state(&self) -> &AdaptorState {
        match self {
            IntAdaptor::Gauss(a) => a.state(),
            IntAdaptor::Flip(a) => a.state(),
            IntAdaptor::Identity(a) => Adapt::<i32>::state(a),
        }
    }

    fn state_mut(&mut self) -> &mut AdaptorState {
        match self {
            IntAdaptor::Gauss(a) => a.state_mut(),
            IntAdaptor::Flip(a) => a.state_mut(),
            IntAdaptor::Identity(a) => Adapt::<i32>::state_mut(a),
        }
    }

    fn perturb(&mut self, value: &mut i32) {
        match self {
            IntAdaptor::Gauss(a) => a.perturb(value),
            IntAdaptor::Flip(a) => a.perturb(value),
            IntAdaptor::Identity(a) => a.perturb(value),
        }
    }

    fn self_adapt(&mut self) {
        match self {
            IntAdaptor::Gauss(a) => a.self_adapt(),
            IntAdaptor::Flip(a) => a.self_adapt(),
            IntAdaptor::Identity(a) => Adapt::<i32>::self_adapt(a),
        }
    }
}

impl Adapt<bool> for BoolAdaptor {
    fn kind(&self) -> AdaptorKind {
        match self {
            BoolAdaptor::Flip(a) => a.kind(),
            BoolAdaptor::Identity(a) => Adapt::<bool>::kind(a),
        }
    }

    fn state(&self) -> &AdaptorState {
        match self {
            BoolAdaptor::Flip(a) => a.state(),
            BoolAdaptor::Identity(a) => Adapt::<bool>::state(a),
        }
    }

    fn state_mut(&mut self) -> &mut AdaptorState {
        match self {
            BoolAdaptor::Flip(a) => a.state_mut(),
            BoolAdaptor::Identity(a) => Adapt::<bool>::state_mut(a),
        }
    }

    fn perturb(&mut self, value: &mut bool) {
        match self {
            BoolAdaptor::Flip(a) => a.perturb(value),
            BoolAdaptor::Identity(a) => a.perturb(value),
        }
    }

    fn self_adapt(&mut self) {
        match self {
            BoolAdaptor::Flip(a) => a.self_adapt(),
            BoolAdaptor::Identity(a) => Adapt::<bool>::self_adapt(a),
        }
    }
}

impl Replicable for DoubleAdaptor {
    fn load_from(&mut self, other: &Self) -> Result<()> {
        match (self, other) {
            (DoubleAdaptor::Gauss(a), DoubleAdaptor::Gauss(b)) => a.load_from(b),
            (DoubleAdaptor::BiGauss(a), DoubleAdaptor::BiGauss(b)) => a.load_from(b),
            (DoubleAdaptor::Swarm(a), DoubleAdaptor::Swarm(b)) => a.load_from(b),
            (DoubleAdaptor::Identity(a), DoubleAdaptor::Identity(b)) => a.load_from(b),
            (me, other) => Err(Error::TypeMismatch {
                expected: Adapt::<f64>::kind(me).as_str(),
                found: Adapt::<f64>::kind(other).as_str(),
            }),
        }
    }

    fn equal_to(&self, other: &Self) -> bool {
        match (self, other) {
            (DoubleAdaptor::Gauss(a), DoubleAdaptor::Gauss(b)) => a.equal_to(b),
            (DoubleAdaptor::BiGauss(a), DoubleAdaptor::BiGauss(b)) => a.equal_to(b),
            (DoubleAdaptor::Swarm(a), DoubleAdaptor::Swarm(b)) => a.equal_to(b),
            (DoubleAdaptor::Identity(a), DoubleAdaptor::Identity(b)) => a.equal_to(b),
            _ => false,
        }
    }

    fn similar_to(&self, other: &Self, epsilon: f64) -> bool {
        match (self, other) {
            (DoubleAdaptor::Gauss(a), DoubleAdaptor::Gauss(b)) => a.similar_to(b, epsilon),
            (DoubleAdaptor::BiGauss(a), DoubleAdaptor::BiGauss(b)) => a.similar_to(b, epsilon),
            (DoubleAdaptor::Swarm(a), DoubleAdaptor::Swarm(b)) => a.similar_to(b, epsilon),
            (DoubleAdaptor::Identity(a), DoubleAdaptor::Identity(b)) => a.similar_to(b, epsilon),
            _ => false,
        }
    }
}

impl Replicable for IntAdaptor {
    fn load_from(&mut self, other: &Self) -> Result<()> {
        match (self, other) {
            (IntAdaptor::Gauss(a), IntAdaptor::Gauss(b)) => a.load_from(b),
            (IntAdaptor::Flip(a), IntAdaptor::Flip(b)) => a.load_from(b),
            (IntAdaptor::Identity(a), IntAdaptor::Identity(b)) => a.load_from(b),
            (me, other) => Err(Error::TypeMismatch {
                expected: Adapt::<i32>::kind(me).as_str(),
                found: Adapt::<i32>::kind(other).as_str(),
            }),
        }
    }

    fn equal_to(&self, other: &Self) -> bool {
        match (self, other) {
            (IntAdaptor::Gauss(a), IntAdaptor::Gauss(b)) => a.equal_to(b),
            (IntAdaptor::Flip(a), IntAdaptor::Flip(b)) => a.equal_to(b),
            (IntAdaptor::Identity(a), IntAdaptor::Identity(b)) => a.equal_to(b),
            _ => false,
        }
    }

    fn similar_to(&self, other: &Self, epsilon: f64) -> bool {
        match (self, other) {
            (IntAdaptor::Gauss(a), IntAdaptor::Gauss(b)) => a.similar_to(b, epsilon),
            (IntAdaptor::Flip(a), IntAdaptor::Flip(b)) => a.similar_to(b, epsilon),
            (IntAdaptor::Identity(a), IntAdaptor::Identity(b)) => a.similar_to(b, epsilon),
            _ => false,
        }
    }
}

impl Replicable for BoolAdaptor {
    fn load_from(&mut self, other: &Self) -> Result<()> {
        match (self, other) {
            (BoolAdaptor::Flip(a), BoolAdaptor::Flip(b)) => a.load_from(b),
            (BoolAdaptor::Identity(a), BoolAdaptor::Identity(b)) => a.load_from(b),
            (me, other) => Err(Error::TypeMismatch {
                expected: Adapt::<bool>::kind(me).as_str(),
                found: Adapt::<bool>::kind(other).as_str(),
            }),
        }
    }

    fn equal_to(&self, other: &Self) -> bool {
        match (self, other) {
            (BoolAdaptor::Flip(a), BoolAdaptor::Flip(b)) => a.equal_to(b),
            (BoolAdaptor::Identity(a), BoolAdaptor::Identity(b)) => a.equal_to(b),
            _ => false,
        }
    }

    fn similar_to(&self, other: &Self, epsilon: f64) -> bool {
        match (self, other) {
            (BoolAdaptor::Flip(a), BoolAdaptor::Flip(b)) => a.similar_to(b, epsilon),
            (BoolAdaptor::Identity(a), BoolAdaptor::Identity(b)) => a.similar_to(b, epsilon),
            _ => false,
        }
    }
}

impl From<DoubleGaussAdaptor> for DoubleAdaptor {
    fn from(adaptor: DoubleGaussAdaptor) -> Self {
        DoubleAdaptor::Gauss(adaptor)
    }
}

impl From<BiGaussAdaptor> for DoubleAdaptor {
    fn from(adaptor: BiGaussAdaptor) -> Self {
        DoubleAdaptor::BiGauss(adaptor)
    }
}

impl From<SwarmAdaptor> for DoubleAdaptor {
    fn from(adaptor: SwarmAdaptor) -> Self {
        DoubleAdaptor::Swarm(adaptor)
    }
}

impl From<IdentityAdaptor> for DoubleAdaptor {
    fn from(adaptor: IdentityAdaptor) -> Self {
        DoubleAdaptor::Identity(adaptor)
    }
}

impl From<IntGaussAdaptor> for IntAdaptor {
    fn from(adaptor: IntGaussAdaptor) -> Self {
        IntAdaptor::Gauss(adaptor)
    }
}

impl From<IntFlipAdaptor> for IntAdaptor {
    fn from(adaptor: IntFlipAdaptor) -> Self {
        IntAdaptor::Flip(adaptor)
    }
}

impl From<IdentityAdaptor> for IntAdaptor {
    fn from(adaptor: IdentityAdaptor) -> Self {
        IntAdaptor::Identity(adaptor)
    }
}

impl From<BitFlipAdaptor> for BoolAdaptor {
    fn from(adaptor: BitFlipAdaptor) -> Self {
        BoolAdaptor::Flip(adaptor)
    }
}

impl From<IdentityAdaptor> for BoolAdaptor {
    fn from(adaptor: IdentityAdaptor) -> Self {
        BoolAdaptor::Identity(adaptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_follows_variant() {
        let gauss: DoubleAdaptor = DoubleGaussAdaptor::new().into();
        assert_eq!(Adapt::<f64>::kind(&gauss), AdaptorKind::GaussianDouble);

        let flip: BoolAdaptor = BitFlipAdaptor::new().into();
        assert_eq!(Adapt::<bool>::kind(&flip), AdaptorKind::BitFlip);

        let id: IntAdaptor = IdentityAdaptor::new().into();
        assert_eq!(Adapt::<i32>::kind(&id), AdaptorKind::Identity);
    }

    #[test]
    fn test_load_rejects_kind_mismatch() {
        let mut gauss: DoubleAdaptor = DoubleGaussAdaptor::new().into();
        let swarm: DoubleAdaptor = SwarmAdaptor::new().into();
        let err = gauss.load_from(&swarm).unwrap_err();
        assert_eq!(
            err,
            Error::TypeMismatch {
                expected: "GaussianDouble",
                found: "Swarm",
            }
        );
    }

    #[test]
    fn test_load_same_kind_succeeds() {
        let mut a: DoubleAdaptor = DoubleGaussAdaptor::with_sigma(0.05).unwrap().into();
        let b: DoubleAdaptor = DoubleGaussAdaptor::new().into();
        a.load_from(&b).unwrap();
        assert!(a.equal_to(&b));
    }

    #[test]
    fn test_equal_to_across_kinds_is_false() {
        let id_a: DoubleAdaptor = IdentityAdaptor::new().into();
        let gauss: DoubleAdaptor = DoubleGaussAdaptor::new().into();
        assert!(!id_a.equal_to(&gauss));
    }

    #[test]
    fn test_swarm_mode_pinned_through_enum() {
        let mut swarm: DoubleAdaptor = SwarmAdaptor::new().into();
        assert!(swarm.set_mode(MutationMode::Never).is_err());
        assert_eq!(swarm.mode(), MutationMode::Always);
    }

    #[test]
    fn test_identity_requests_are_ignored() {
        let mut id: BoolAdaptor = IdentityAdaptor::new().into();
        id.set_probability(0.9).unwrap();
        id.set_mode(MutationMode::Always).unwrap();
        assert_eq!(id.probability(), 0.0);
        assert_eq!(id.mode(), MutationMode::Never);
    }

    #[test]
    fn test_enum_dispatch_mutates() {
        let mut adaptor: DoubleAdaptor =
            DoubleGaussAdaptor::with_parameters(0.1, 0.001, 1e-4, 1.0)
                .unwrap()
                .into();
        let mut value = 1.0f64;
        adaptor.mutate(&mut value);
        assert_ne!(value, 1.0);
    }
}
