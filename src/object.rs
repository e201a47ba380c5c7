//! The clone/load/compare protocol shared by all domain objects.
//!
//! Optimization algorithms replicate individuals across generations and
//! across process boundaries. [`Replicable`] gives every carrier, adaptor
//! and individual the same replication surface:
//!
//! - **Deep copy**: the [`Clone`] supertrait. All domain objects own their
//!   state outright, so `clone()` is always a deep, kind-preserving copy
//!   (for tagged enums the runtime kind lives in the variant tag).
//! - **In-place load**: [`Replicable::load_from`] replaces the receiver's
//!   state with a copy of another object of the same runtime kind.
//! - **Comparison**: [`Replicable::equal_to`] for exact structural
//!   equality, [`Replicable::similar_to`] for equality up to an epsilon on
//!   floating-point fields.
//!
//! Serialization round-trips are provided separately by
//! [`crate::codec::Encodable`].

use crate::error::{Error, Result};

/// Clone/load/compare protocol for domain objects.
///
/// Implementations compare *state*, not plumbing: random-number handles,
/// fitness evaluators and personality bags are excluded from both equality
/// and similarity.
///
/// # Usage
///
/// ```
/// use evoparam::bounds::BoundedMap;
/// use evoparam::object::Replicable;
///
/// let a = BoundedMap::new(-1.0, 1.0).unwrap();
/// let mut b = BoundedMap::unit();
/// b.load_from(&a).unwrap();
/// assert!(b.equal_to(&a));
/// ```
pub trait Replicable: Clone {
    /// Replaces this object's state with a deep copy of `other`.
    ///
    /// Enum implementations fail with [`Error::TypeMismatch`] when the
    /// variant tags differ, mirroring a polymorphic load through a base
    /// pointer.
    fn load_from(&mut self, other: &Self) -> Result<()>;

    /// Structural equality, including all parent-contributed fields and
    /// the full adaptor list.
    fn equal_to(&self, other: &Self) -> bool;

    /// Like [`equal_to`](Replicable::equal_to), but floating-point fields
    /// may differ element-wise by up to `epsilon`.
    fn similar_to(&self, other: &Self, epsilon: f64) -> bool;
}

/// Element-wise float comparison used by `similar_to` implementations.
pub(crate) fn floats_similar(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() <= epsilon
}

/// Rejects `load_from(self)` with [`Error::SelfAssignment`].
///
/// Safe callers can never trip this (a `&mut` receiver cannot alias the
/// source argument), but the guard keeps the diagnostic contract of the
/// load protocol intact for interior-mutability call sites.
pub(crate) fn alias_guard<T>(dst: &T, src: &T) -> Result<()> {
    if std::ptr::eq(dst, src) {
        return Err(Error::SelfAssignment);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floats_similar_within_epsilon() {
        assert!(floats_similar(1.0, 1.0 + 1e-12, 1e-10));
        assert!(!floats_similar(1.0, 1.0 + 1e-9, 1e-10));
        assert!(floats_similar(-3.5, -3.5, 0.0));
    }

    #[test]
    fn test_alias_guard_rejects_same_reference() {
        let x = 1.0f64;
        assert_eq!(alias_guard(&x, &x), Err(Error::SelfAssignment));

        let y = 1.0f64;
        assert!(alias_guard(&x, &y).is_ok());
    }
}
