//! Structural grouping of sub-carriers.

use serde::{Deserialize, Serialize};

use super::parameter::{CarrierKind, Parameter};
use crate::error::{Error, Result};
use crate::object::{alias_guard, Replicable};

/// An ordered group of sub-carriers.
///
/// Used for structural composition, e.g. one group per layer of a
/// network, each holding that layer's weight collections. `mutate()`
/// recurses into every child in insertion order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CarrierGroup {
    children: Vec<Parameter>,
}

impl CarrierGroup {
    /// An empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a sub-carrier.
    pub fn push(&mut self, child: impl Into<Parameter>) {
        self.children.push(child.into());
    }

    /// The sub-carrier at `index`, if present.
    pub fn get(&self, index: usize) -> Option<&Parameter> {
        self.children.get(index)
    }

    /// Mutable access to the sub-carrier at `index`.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Parameter> {
        self.children.get_mut(index)
    }

    /// Typed access to the sub-carrier at `index`.
    ///
    /// Fails with [`Error::TypeMismatch`] when the child at `index` is
    /// of a different carrier kind.
    ///
    /// # Panics
    /// Panics if `index` is out of range, like slice indexing.
    pub fn child_at<C: CarrierKind>(&self, index: usize) -> Result<&C> {
        let child = &self.children[index];
        C::from_parameter(child).ok_or(Error::TypeMismatch {
            expected: C::KIND,
            found: child.kind_name(),
        })
    }

    /// Typed mutable access to the sub-carrier at `index`.
    ///
    /// # Panics
    /// Panics if `index` is out of range, like slice indexing.
    pub fn child_at_mut<C: CarrierKind>(&mut self, index: usize) -> Result<&mut C> {
        let child = &mut self.children[index];
        let found = child.kind_name();
        C::from_parameter_mut(child).ok_or(Error::TypeMismatch {
            expected: C::KIND,
            found,
        })
    }

    /// Number of sub-carriers.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Whether the group has no sub-carriers.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Iterates over the sub-carriers.
    pub fn iter(&self) -> std::slice::Iter<'_, Parameter> {
        self.children.iter()
    }

    /// Index of the first sub-carrier structurally equal to `child`.
    pub fn find(&self, child: &Parameter) -> Option<usize> {
        self.children.iter().position(|c| c.equal_to(child))
    }

    /// Recursively mutates every sub-carrier, in insertion order.
    pub fn mutate(&mut self) {
        for child in self.children.iter_mut() {
            child.mutate();
        }
    }
}

impl Replicable for CarrierGroup {
    fn load_from(&mut self, other: &Self) -> Result<()> {
        alias_guard(self, other)?;
        let kinds_align = self.children.len() == other.children.len()
            && self
                .children
                .iter()
                .zip(other.children.iter())
                .all(|(a, b)| a.kind_name() == b.kind_name());
        if kinds_align {
            for (a, b) in self.children.iter_mut().zip(other.children.iter()) {
                a.load_from(b)?;
            }
        } else {
            self.children = other.children.clone();
        }
        Ok(())
    }

    fn equal_to(&self, other: &Self) -> bool {
        self.children.len() == other.children.len()
            && self
                .children
                .iter()
                .zip(other.children.iter())
                .all(|(a, b)| a.equal_to(b))
    }

    fn similar_to(&self, other: &Self, epsilon: f64) -> bool {
        self.children.len() == other.children.len()
            && self
                .children
                .iter()
                .zip(other.children.iter())
                .all(|(a, b)| a.similar_to(b, epsilon))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adaptors::BitFlipAdaptor;
    use crate::carriers::{BitCollection, DoubleCollection, DoubleParameter};

    fn layer(len: usize) -> BitCollection {
        let mut bits = BitCollection::from_values(vec![false; len]);
        bits.add_adaptor(BitFlipAdaptor::with_probability(1.0).unwrap())
            .unwrap();
        bits
    }

    #[test]
    fn test_group_composition_and_typed_access() {
        let mut group = CarrierGroup::new();
        group.push(layer(3));
        group.push(DoubleParameter::new(1.0));
        assert_eq!(group.len(), 2);

        let bits: &BitCollection = group.child_at(0).unwrap();
        assert_eq!(bits.len(), 3);

        let err = group.child_at::<DoubleCollection>(1).unwrap_err();
        assert_eq!(
            err,
            Error::TypeMismatch {
                expected: "DoubleCollection",
                found: "DoubleParameter",
            }
        );
    }

    #[test]
    fn test_mutate_recurses() {
        let mut group = CarrierGroup::new();
        group.push(layer(2));
        group.push(layer(4));
        group.mutate();
        for i in 0..2 {
            let bits: &BitCollection = group.child_at(i).unwrap();
            assert!(bits.iter().all(|&b| b));
        }
    }

    #[test]
    fn test_nested_groups() {
        let mut inner = CarrierGroup::new();
        inner.push(layer(2));
        let mut outer = CarrierGroup::new();
        outer.push(inner);
        outer.mutate();

        let inner_ref: &CarrierGroup = outer.child_at(0).unwrap();
        let bits: &BitCollection = inner_ref.child_at(0).unwrap();
        assert_eq!(bits.values(), &[true, true]);
    }

    #[test]
    fn test_load_pairwise_and_rebuild() {
        let mut a = CarrierGroup::new();
        a.push(layer(2));
        a.push(DoubleParameter::new(4.0));

        // Same shape: pairwise load.
        let mut b = CarrierGroup::new();
        b.push(layer(5));
        b.push(DoubleParameter::new(0.0));
        b.load_from(&a).unwrap();
        assert!(b.equal_to(&a));

        // Different shape: rebuilt by clone.
        let mut c = CarrierGroup::new();
        c.load_from(&a).unwrap();
        assert!(c.equal_to(&a));
    }

    #[test]
    fn test_find_by_equality() {
        let mut group = CarrierGroup::new();
        group.push(DoubleParameter::new(1.0));
        group.push(DoubleParameter::new(2.0));
        let needle: Parameter = DoubleParameter::new(2.0).into();
        assert_eq!(group.find(&needle), Some(1));
        let missing: Parameter = DoubleParameter::new(9.0).into();
        assert_eq!(group.find(&missing), None);
    }
}
