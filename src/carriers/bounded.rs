//! A double constrained to a closed interval.

use serde::{Deserialize, Serialize};

use super::{
    adaptor_lists_equal, adaptor_lists_similar, attach_adaptor, find_adaptor, find_adaptor_mut,
    load_adaptor_list,
};
use crate::adaptors::{Adapt, DoubleAdaptor};
use crate::bounds::BoundedMap;
use crate::error::{Error, Result};
use crate::object::{alias_guard, floats_similar, Replicable};

/// A double whose external value always lies inside `[lower, upper]`.
///
/// Adaptors mutate the unconstrained *internal* value; the *external*
/// value a fitness function reads is the internal value folded through
/// [`BoundedMap`]. Inside the interval the two coincide, so in-range
/// assignments are exact.
///
/// # Usage
///
/// ```
/// use evoparam::adaptors::DoubleGaussAdaptor;
/// use evoparam::carriers::BoundedDouble;
///
/// let mut x = BoundedDouble::new(0.0, -10.0, 10.0).unwrap();
/// x.add_adaptor(DoubleGaussAdaptor::with_sigma(0.5).unwrap()).unwrap();
/// for _ in 0..100 {
///     x.mutate();
///     assert!((-10.0..=10.0).contains(&x.external_value()));
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundedDouble {
    internal: f64,
    map: BoundedMap,
    adaptors: Vec<DoubleAdaptor>,
}

impl BoundedDouble {
    /// A bounded double starting at `value` inside `[lower, upper]`.
    ///
    /// Fails with [`Error::InvalidConfiguration`] for reversed bounds and
    /// [`Error::BoundsViolation`] when `value` lies outside them.
    pub fn new(value: f64, lower: f64, upper: f64) -> Result<Self> {
        let map = BoundedMap::new(lower, upper)?;
        if !map.contains(value) {
            return Err(Error::BoundsViolation {
                value,
                lower,
                upper,
            });
        }
        Ok(Self {
            internal: value,
            map,
            adaptors: Vec::new(),
        })
    }

    /// The value a fitness function reads, folded into the interval.
    pub fn external_value(&self) -> f64 {
        self.map.fold(self.internal)
    }

    /// The unconstrained internal representation.
    pub fn internal_value(&self) -> f64 {
        self.internal
    }

    /// Sets the internal value directly; any finite value is allowed.
    pub fn set_internal_value(&mut self, value: f64) -> Result<()> {
        if !value.is_finite() {
            return Err(Error::InvalidConfiguration(format!(
                "internal value must be finite, got {value}"
            )));
        }
        self.internal = value;
        Ok(())
    }

    /// Sets the external value; must lie inside the bounds. The internal
    /// value is reset to the canonical in-range representative.
    pub fn set_external_value(&mut self, value: f64) -> Result<()> {
        if !self.map.contains(value) {
            return Err(Error::BoundsViolation {
                value,
                lower: self.map.lower(),
                upper: self.map.upper(),
            });
        }
        self.internal = value;
        Ok(())
    }

    /// The interval bounds `(lower, upper)`.
    pub fn bounds(&self) -> (f64, f64) {
        (self.map.lower(), self.map.upper())
    }

    /// Replaces the bounds.
    ///
    /// The current external value must lie inside the new interval; it
    /// becomes the new internal value, so future mutations start from the
    /// canonical representative. An excluded current value fails with
    /// [`Error::BoundsViolation`] and leaves the carrier unchanged.
    pub fn set_bounds(&mut self, lower: f64, upper: f64) -> Result<()> {
        let next = BoundedMap::new(lower, upper)?;
        let external = self.external_value();
        if !next.contains(external) {
            return Err(Error::BoundsViolation {
                value: external,
                lower,
                upper,
            });
        }
        self.internal = external;
        self.map = next;
        Ok(())
    }

    /// Applies all attached adaptors to the internal value.
    pub fn mutate(&mut self) {
        for adaptor in self.adaptors.iter_mut() {
            adaptor.mutate(&mut self.internal);
        }
    }

    /// Applies only the adaptor with the given name.
    pub fn mutate_with(&mut self, name: &str) -> Result<()> {
        let adaptor = find_adaptor_mut::<f64>(&mut self.adaptors, name).ok_or_else(|| {
            Error::InvalidConfiguration(format!("no adaptor named `{name}` attached"))
        })?;
        adaptor.mutate(&mut self.internal);
        Ok(())
    }

    /// Attaches an adaptor; names must be unique within the carrier.
    pub fn add_adaptor(&mut self, adaptor: impl Into<DoubleAdaptor>) -> Result<()> {
        attach_adaptor::<f64>(&mut self.adaptors, adaptor.into())
    }

    /// The adaptor with the given name, if attached.
    pub fn adaptor(&self, name: &str) -> Option<&DoubleAdaptor> {
        find_adaptor::<f64>(&self.adaptors, name)
    }

    /// Mutable access to the adaptor with the given name.
    pub fn adaptor_mut(&mut self, name: &str) -> Option<&mut DoubleAdaptor> {
        find_adaptor_mut::<f64>(&mut self.adaptors, name)
    }

    /// All attached adaptors, in attachment order.
    pub fn adaptors(&self) -> &[DoubleAdaptor] {
        &self.adaptors
    }
}

impl Replicable for BoundedDouble {
    fn load_from(&mut self, other: &Self) -> Result<()> {
        alias_guard(self, other)?;
        self.internal = other.internal;
        self.map = other.map;
        load_adaptor_list::<f64>(&mut self.adaptors, &other.adaptors)
    }

    fn equal_to(&self, other: &Self) -> bool {
        self.internal == other.internal
            && self.map.equal_to(&other.map)
            && adaptor_lists_equal::<f64>(&self.adaptors, &other.adaptors)
    }

    fn similar_to(&self, other: &Self, epsilon: f64) -> bool {
        floats_similar(self.internal, other.internal, epsilon)
            && self.map.similar_to(&other.map, epsilon)
            && adaptor_lists_similar::<f64>(&self.adaptors, &other.adaptors, epsilon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adaptors::DoubleGaussAdaptor;

    #[test]
    fn test_construction_validates() {
        assert!(BoundedDouble::new(0.0, -1.0, 1.0).is_ok());
        assert!(matches!(
            BoundedDouble::new(2.0, -1.0, 1.0),
            Err(Error::BoundsViolation { .. })
        ));
        assert!(matches!(
            BoundedDouble::new(0.0, 1.0, -1.0),
            Err(Error::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_identity_inside_bounds() {
        let mut x = BoundedDouble::new(0.0, -10.0, 10.0).unwrap();
        for v in [-10.0, -4.5, 0.0, 9.9, 10.0] {
            x.set_internal_value(v).unwrap();
            assert_eq!(x.external_value(), v);
        }
    }

    #[test]
    fn test_reflection_outside_bounds() {
        let mut x = BoundedDouble::new(0.0, -10.0, 10.0).unwrap();
        x.set_internal_value(15.0).unwrap();
        assert_eq!(x.external_value(), 5.0);
        x.set_internal_value(25.0).unwrap();
        assert_eq!(x.external_value(), -5.0);
        x.set_internal_value(-15.0).unwrap();
        assert_eq!(x.external_value(), -5.0);
        x.set_internal_value(-25.0).unwrap();
        assert_eq!(x.external_value(), 5.0);
    }

    #[test]
    fn test_external_assignment_checked() {
        let mut x = BoundedDouble::new(0.0, -1.0, 1.0).unwrap();
        x.set_external_value(0.5).unwrap();
        assert_eq!(x.external_value(), 0.5);
        assert!(matches!(
            x.set_external_value(1.5),
            Err(Error::BoundsViolation { .. })
        ));
        assert_eq!(x.external_value(), 0.5);
    }

    #[test]
    fn test_mutations_stay_bounded() {
        let mut x = BoundedDouble::new(0.0, -2.0, 2.0).unwrap();
        x.add_adaptor(DoubleGaussAdaptor::with_parameters(1.5, 0.001, 1e-4, 5.0).unwrap())
            .unwrap();
        for _ in 0..1000 {
            x.mutate();
            let v = x.external_value();
            assert!((-2.0..=2.0).contains(&v), "external value escaped: {v}");
        }
    }

    #[test]
    fn test_bound_reset_recanonicalizes() {
        let mut x = BoundedDouble::new(0.0, -10.0, 10.0).unwrap();
        x.set_internal_value(15.0).unwrap(); // external 5.0
        x.set_bounds(0.0, 6.0).unwrap();
        // The external value survived and became the internal one.
        assert_eq!(x.internal_value(), 5.0);
        assert_eq!(x.external_value(), 5.0);
        assert_eq!(x.bounds(), (0.0, 6.0));
    }

    #[test]
    fn test_bound_reset_rejects_excluded_value() {
        let mut x = BoundedDouble::new(8.0, -10.0, 10.0).unwrap();
        let err = x.set_bounds(0.0, 5.0).unwrap_err();
        assert_eq!(
            err,
            Error::BoundsViolation {
                value: 8.0,
                lower: 0.0,
                upper: 5.0,
            }
        );
        // Carrier unchanged.
        assert_eq!(x.bounds(), (-10.0, 10.0));
        assert_eq!(x.external_value(), 8.0);
    }

    #[test]
    fn test_load_and_compare() {
        let mut a = BoundedDouble::new(1.0, -3.0, 3.0).unwrap();
        a.add_adaptor(DoubleGaussAdaptor::new()).unwrap();
        let mut b = BoundedDouble::new(0.0, 0.0, 1.0).unwrap();
        b.load_from(&a).unwrap();
        assert!(b.equal_to(&a));
        assert_eq!(b.bounds(), (-3.0, 3.0));
    }
}
