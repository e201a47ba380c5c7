//! Single-value carriers.

use serde::{Deserialize, Serialize};

use super::value::ParameterValue;
use super::{
    adaptor_lists_equal, adaptor_lists_similar, attach_adaptor, find_adaptor, find_adaptor_mut,
    load_adaptor_list,
};
use crate::adaptors::Adapt;
use crate::error::{Error, Result};
use crate::object::{alias_guard, Replicable};

/// A single parameter value with its adaptors.
///
/// # Usage
///
/// ```
/// use evoparam::adaptors::DoubleGaussAdaptor;
/// use evoparam::carriers::DoubleParameter;
///
/// let mut x = DoubleParameter::new(1.5);
/// x.add_adaptor(DoubleGaussAdaptor::with_sigma(0.05).unwrap()).unwrap();
/// x.mutate();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(serialize = "T: ParameterValue", deserialize = "T: ParameterValue"))]
pub struct ScalarParameter<T: ParameterValue> {
    value: T,
    adaptors: Vec<T::Adaptor>,
}

/// A single double.
pub type DoubleParameter = ScalarParameter<f64>;
/// A single 32-bit integer.
pub type IntParameter = ScalarParameter<i32>;
/// A single boolean.
pub type BoolParameter = ScalarParameter<bool>;

impl<T: ParameterValue> ScalarParameter<T> {
    /// A carrier holding `value`, with no adaptors attached.
    pub fn new(value: T) -> Self {
        Self {
            value,
            adaptors: Vec::new(),
        }
    }

    /// The stored value.
    pub fn value(&self) -> T {
        self.value
    }

    /// The value as seen by a fitness function; identical to
    /// [`value`](Self::value) for unbounded carriers.
    pub fn external_value(&self) -> T {
        self.value
    }

    /// Replaces the stored value.
    pub fn set_value(&mut self, value: T) {
        self.value = value;
    }

    /// Applies all attached adaptors to the value, in attachment order.
    pub fn mutate(&mut self) {
        for adaptor in self.adaptors.iter_mut() {
            adaptor.mutate(&mut self.value);
        }
    }

    /// Applies only the adaptor with the given name.
    pub fn mutate_with(&mut self, name: &str) -> Result<()> {
        let adaptor = find_adaptor_mut::<T>(&mut self.adaptors, name).ok_or_else(|| {
            Error::InvalidConfiguration(format!("no adaptor named `{name}` attached"))
        })?;
        adaptor.mutate(&mut self.value);
        Ok(())
    }

    /// Attaches an adaptor; names must be unique within the carrier.
    pub fn add_adaptor(&mut self, adaptor: impl Into<T::Adaptor>) -> Result<()> {
        attach_adaptor::<T>(&mut self.adaptors, adaptor.into())
    }

    /// The adaptor with the given name, if attached.
    pub fn adaptor(&self, name: &str) -> Option<&T::Adaptor> {
        find_adaptor::<T>(&self.adaptors, name)
    }

    /// Mutable access to the adaptor with the given name.
    pub fn adaptor_mut(&mut self, name: &str) -> Option<&mut T::Adaptor> {
        find_adaptor_mut::<T>(&mut self.adaptors, name)
    }

    /// All attached adaptors, in attachment order.
    pub fn adaptors(&self) -> &[T::Adaptor] {
        &self.adaptors
    }
}

impl<T: ParameterValue> Replicable for ScalarParameter<T> {
    fn load_from(&mut self, other: &Self) -> Result<()> {
        alias_guard(self, other)?;
        self.value = other.value;
        load_adaptor_list::<T>(&mut self.adaptors, &other.adaptors)
    }

    fn equal_to(&self, other: &Self) -> bool {
        self.value == other.value && adaptor_lists_equal::<T>(&self.adaptors, &other.adaptors)
    }

    fn similar_to(&self, other: &Self, epsilon: f64) -> bool {
        T::similar(self.value, other.value, epsilon)
            && adaptor_lists_similar::<T>(&self.adaptors, &other.adaptors, epsilon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adaptors::{
        BitFlipAdaptor, DoubleGaussAdaptor, IdentityAdaptor, IntFlipAdaptor, MutationMode,
    };

    #[test]
    fn test_mutate_without_adaptors_is_noop() {
        let mut x = DoubleParameter::new(2.0);
        x.mutate();
        assert_eq!(x.value(), 2.0);
    }

    #[test]
    fn test_gauss_mutation_moves_value() {
        let mut x = DoubleParameter::new(1.0);
        x.add_adaptor(DoubleGaussAdaptor::with_sigma(0.1).unwrap())
            .unwrap();
        x.mutate();
        assert_ne!(x.value(), 1.0);
    }

    #[test]
    fn test_duplicate_adaptor_name_rejected() {
        let mut x = DoubleParameter::new(0.0);
        x.add_adaptor(DoubleGaussAdaptor::new()).unwrap();
        let err = x.add_adaptor(DoubleGaussAdaptor::new()).unwrap_err();
        assert_eq!(err, Error::DuplicateAdaptor("gauss".into()));
    }

    #[test]
    fn test_distinct_names_coexist_and_compose() {
        let mut x = DoubleParameter::new(0.0);
        let mut wide = DoubleGaussAdaptor::with_sigma(1.0).unwrap();
        wide.set_name("wide");
        let mut narrow = DoubleGaussAdaptor::with_sigma(0.001).unwrap();
        narrow.set_name("narrow");
        x.add_adaptor(wide).unwrap();
        x.add_adaptor(narrow).unwrap();
        assert_eq!(x.adaptors().len(), 2);
        assert!(x.adaptor("wide").is_some());
        assert!(x.adaptor("narrow").is_some());
        x.mutate();
        assert_ne!(x.value(), 0.0);
    }

    #[test]
    fn test_mutate_with_selects_by_name() {
        let mut x = BoolParameter::new(false);
        let mut frozen = IdentityAdaptor::new();
        frozen.set_name("frozen");
        x.add_adaptor(frozen).unwrap();
        x.add_adaptor(BitFlipAdaptor::with_probability(1.0).unwrap())
            .unwrap();

        x.mutate_with("frozen").unwrap();
        assert!(!x.value());
        x.mutate_with("bitflip").unwrap();
        assert!(x.value());
        assert!(x.mutate_with("missing").is_err());
    }

    #[test]
    fn test_int_parameter_with_flip() {
        let mut x = IntParameter::new(5);
        x.add_adaptor(IntFlipAdaptor::with_probability(1.0).unwrap())
            .unwrap();
        x.mutate();
        assert!(x.value() == 4 || x.value() == 6);
    }

    #[test]
    fn test_load_preserves_matching_adaptor_list() {
        let mut a = DoubleParameter::new(1.0);
        a.add_adaptor(DoubleGaussAdaptor::with_sigma(0.5).unwrap())
            .unwrap();
        let mut b = DoubleParameter::new(9.0);
        b.add_adaptor(DoubleGaussAdaptor::new()).unwrap();

        b.load_from(&a).unwrap();
        assert!(b.equal_to(&a));
        assert_eq!(b.value(), 1.0);
    }

    #[test]
    fn test_load_rebuilds_mismatched_adaptor_list() {
        let mut a = DoubleParameter::new(1.0);
        a.add_adaptor(DoubleGaussAdaptor::new()).unwrap();
        a.add_adaptor(IdentityAdaptor::new()).unwrap();

        let mut b = DoubleParameter::new(2.0);
        b.add_adaptor(IdentityAdaptor::new()).unwrap();

        b.load_from(&a).unwrap();
        assert!(b.equal_to(&a));
        assert_eq!(b.adaptors().len(), 2);
    }

    #[test]
    fn test_similarity_tolerates_float_drift() {
        let mut a = DoubleParameter::new(1.0);
        a.add_adaptor(DoubleGaussAdaptor::new()).unwrap();
        let mut b = a.clone();
        b.set_value(1.0 + 5e-11);
        assert!(!b.equal_to(&a));
        assert!(b.similar_to(&a, 1e-10));
    }

    #[test]
    fn test_clone_is_deep() {
        let mut a = BoolParameter::new(true);
        a.add_adaptor(BitFlipAdaptor::with_probability(1.0).unwrap())
            .unwrap();
        let mut b = a.clone();
        b.adaptor_mut("bitflip")
            .map(|ad| match ad {
                crate::adaptors::BoolAdaptor::Flip(f) => f.set_mode(MutationMode::Never),
                crate::adaptors::BoolAdaptor::Identity(_) => {}
            })
            .unwrap();
        // The original's adaptor is untouched.
        assert_eq!(
            a.adaptor("bitflip").unwrap().mode(),
            MutationMode::Probabilistic
        );
        assert!(!b.equal_to(&a));
    }
}
