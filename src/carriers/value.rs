//! Leaf value types carriers can hold.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::adaptors::{Adapt, BoolAdaptor, DoubleAdaptor, IntAdaptor};
use crate::error::{Error, Result};
use crate::object::{floats_similar, Replicable};
use crate::random::RandomHandle;

/// A leaf type carriers can hold, linked to its compatible adaptor enum.
///
/// The associated `Adaptor` type is what makes carriers type-safe: a
/// carrier of `f64` can only ever store [`DoubleAdaptor`]s, one of `bool`
/// only [`BoolAdaptor`]s.
pub trait ParameterValue:
    Copy + PartialEq + std::fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// The tagged adaptor enum compatible with this value type.
    type Adaptor: Adapt<Self>
        + Replicable
        + std::fmt::Debug
        + Serialize
        + DeserializeOwned
        + Send
        + Sync
        + 'static;

    /// Element-wise similarity used by `similar_to`; exact equality for
    /// non-float types.
    fn similar(a: Self, b: Self, epsilon: f64) -> bool;
}

impl ParameterValue for f64 {
    type Adaptor = DoubleAdaptor;

    fn similar(a: Self, b: Self, epsilon: f64) -> bool {
        floats_similar(a, b, epsilon)
    }
}

impl ParameterValue for i32 {
    type Adaptor = IntAdaptor;

    fn similar(a: Self, b: Self, _epsilon: f64) -> bool {
        a == b
    }
}

impl ParameterValue for bool {
    type Adaptor = BoolAdaptor;

    fn similar(a: Self, b: Self, _epsilon: f64) -> bool {
        a == b
    }
}

/// Leaf types with a uniform-fill operation over a half-open range.
pub trait NumericValue: ParameterValue {
    /// Validates a fill range.
    fn check_fill_range(lo: Self, hi: Self) -> Result<()>;

    /// Uniform draw from `[lo, hi)`.
    fn random_between(rng: &mut RandomHandle, lo: Self, hi: Self) -> Self;
}

impl NumericValue for f64 {
    fn check_fill_range(lo: Self, hi: Self) -> Result<()> {
        if !lo.is_finite() || !hi.is_finite() || lo >= hi {
            return Err(Error::InvalidConfiguration(format!(
                "fill range [{lo}, {hi}) must be finite and non-empty"
            )));
        }
        Ok(())
    }

    fn random_between(rng: &mut RandomHandle, lo: Self, hi: Self) -> Self {
        rng.even(lo, hi)
    }
}

impl NumericValue for i32 {
    fn check_fill_range(lo: Self, hi: Self) -> Result<()> {
        if lo >= hi {
            return Err(Error::InvalidConfiguration(format!(
                "fill range [{lo}, {hi}) must be non-empty"
            )));
        }
        Ok(())
    }

    fn random_between(rng: &mut RandomHandle, lo: Self, hi: Self) -> Self {
        rng.int_in(lo, hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_similarity_per_type() {
        assert!(f64::similar(1.0, 1.0 + 1e-12, 1e-10));
        assert!(!f64::similar(1.0, 1.1, 1e-10));
        assert!(i32::similar(3, 3, 1e-10));
        assert!(!i32::similar(3, 4, 1e10));
        assert!(bool::similar(true, true, 0.0));
        assert!(!bool::similar(true, false, 1e10));
    }

    #[test]
    fn test_fill_range_validation() {
        assert!(f64::check_fill_range(0.0, 1.0).is_ok());
        assert!(f64::check_fill_range(1.0, 1.0).is_err());
        assert!(f64::check_fill_range(0.0, f64::INFINITY).is_err());
        assert!(i32::check_fill_range(-5, 5).is_ok());
        assert!(i32::check_fill_range(5, 5).is_err());
    }
}
