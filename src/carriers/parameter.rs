//! The tagged union over all carrier kinds.

use serde::{Deserialize, Serialize};

use super::bounded::BoundedDouble;
use super::collection::{BitCollection, DoubleCollection, IntCollection};
use super::group::CarrierGroup;
use super::scalar::{BoolParameter, DoubleParameter, IntParameter};
use crate::error::{Error, Result};
use crate::object::Replicable;

/// Any parameter carrier.
///
/// The variant tag is the carrier's runtime kind; the codecs write it
/// ahead of the payload, which is how polymorphic carriers survive
/// serialization. [`CarrierKind`] extracts the concrete carrier back out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Parameter {
    /// A single boolean.
    Bool(BoolParameter),
    /// A single double.
    Double(DoubleParameter),
    /// A single 32-bit integer.
    Int(IntParameter),
    /// An ordered sequence of doubles.
    DoubleCollection(DoubleCollection),
    /// An ordered sequence of 32-bit integers.
    IntCollection(IntCollection),
    /// An ordered sequence of booleans.
    BitCollection(BitCollection),
    /// A double folded into a closed interval.
    BoundedDouble(BoundedDouble),
    /// An ordered group of sub-carriers.
    Group(CarrierGroup),
}

impl Parameter {
    /// Stable name of the carrier kind, used in mismatch diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Parameter::Bool(_) => "BoolParameter",
            Parameter::Double(_) => "DoubleParameter",
            Parameter::Int(_) => "IntParameter",
            Parameter::DoubleCollection(_) => "DoubleCollection",
            Parameter::IntCollection(_) => "IntCollection",
            Parameter::BitCollection(_) => "BitCollection",
            Parameter::BoundedDouble(_) => "BoundedDouble",
            Parameter::Group(_) => "CarrierGroup",
        }
    }

    /// Applies the carrier's adaptors to its values.
    pub fn mutate(&mut self) {
        match self {
            Parameter::Bool(c) => c.mutate(),
            Parameter::Double(c) => c.mutate(),
            Parameter::Int(c) => c.mutate(),
            Parameter::DoubleCollection(c) => c.mutate(),
            Parameter::IntCollection(c) => c.mutate(),
            Parameter::BitCollection(c) => c.mutate(),
            Parameter::BoundedDouble(c) => c.mutate(),
            Parameter::Group(c) => c.mutate(),
        }
    }
}

impl Replicable for Parameter {
    fn load_from(&mut self, other: &Self) -> Result<()> {
        match (self, other) {
            (Parameter::Bool(a), Parameter::Bool(b)) => a.load_from(b),
            (Parameter::Double(a), Parameter::Double(b)) => a.load_from(b),
            (Parameter::Int(a), Parameter::Int(b)) => a.load_from(b),
            (Parameter::DoubleCollection(a), Parameter::DoubleCollection(b)) => a.load_from(b),
            (Parameter::IntCollection(a), Parameter::IntCollection(b)) => a.load_from(b),
            (Parameter::BitCollection(a), Parameter::BitCollection(b)) => a.load_from(b),
            (Parameter::BoundedDouble(a), Parameter::BoundedDouble(b)) => a.load_from(b),
            (Parameter::Group(a), Parameter::Group(b)) => a.load_from(b),
            (me, other) => Err(Error::TypeMismatch {
                expected: me.kind_name(),
                found: other.kind_name(),
            }),
        }
    }

    fn equal_to(&self, other: &Self) -> bool {
        match (self, other) {
            (Parameter::Bool(a), Parameter::Bool(b)) => a.equal_to(b),
            (Parameter::Double(a), Parameter::Double(b)) => a.equal_to(b),
            (Parameter::Int(a), Parameter::Int(b)) => a.equal_to(b),
            (Parameter::DoubleCollection(a), Parameter::DoubleCollection(b)) => a.equal_to(b),
            (Parameter::IntCollection(a), Parameter::IntCollection(b)) => a.equal_to(b),
            (Parameter::BitCollection(a), Parameter::BitCollection(b)) => a.equal_to(b),
            (Parameter::BoundedDouble(a), Parameter::BoundedDouble(b)) => a.equal_to(b),
            (Parameter::Group(a), Parameter::Group(b)) => a.equal_to(b),
            _ => false,
        }
    }

    fn similar_to(&self, other: &Self, epsilon: f64) -> bool {
        match (self, other) {
            (Parameter::Bool(a), Parameter::Bool(b)) => a.similar_to(b, epsilon),
            (Parameter::Double(a), Parameter::Double(b)) => a.similar_to(b, epsilon),
            (Parameter::Int(a), Parameter::Int(b)) => a.similar_to(b, epsilon),
            (Parameter::DoubleCollection(a), Parameter::DoubleCollection(b)) => {
                a.similar_to(b, epsilon)
            }
            (Parameter::IntCollection(a), Parameter::IntCollection(b)) => a.similar_to(b, epsilon),
            (Parameter::BitCollection(a), Parameter::BitCollection(b)) => a.similar_to(b, epsilon),
            (Parameter::BoundedDouble(a), Parameter::BoundedDouble(b)) => a.similar_to(b, epsilon),
            (Parameter::Group(a), Parameter::Group(b)) => a.similar_to(b, epsilon),
            _ => false,
        }
    }
}

/// Extracts a concrete carrier out of a [`Parameter`].
///
/// Implemented by every carrier type; used by the typed child accessors
/// on individuals and groups.
pub trait CarrierKind: Sized {
    /// Stable kind name, matching [`Parameter::kind_name`].
    const KIND: &'static str;

    /// The concrete carrier, if `parameter` holds this kind.
    fn from_parameter(parameter: &Parameter) -> Option<&Self>;

    /// Mutable variant of [`from_parameter`](Self::from_parameter).
    fn from_parameter_mut(parameter: &mut Parameter) -> Option<&mut Self>;
}

macro_rules! carrier_kind {
    ($carrier:ty, $variant:ident, $kind:literal) => {
        impl CarrierKind for $carrier {
            const KIND: &'static str = $kind;

            fn from_parameter(parameter: &Parameter) -> Option<&Self> {
                match parameter {
                    Parameter::$variant(c) => Some(c),
                    _ => None,
                }
            }

            fn from_parameter_mut(parameter: &mut Parameter) -> Option<&mut Self> {
                match parameter {
                    Parameter::$variant(c) => Some(c),
                    _ => None,
                }
            }
        }

        impl From<$carrier> for Parameter {
            fn from(carrier: $carrier) -> Parameter {
                Parameter::$variant(carrier)
            }
        }
    };
}

carrier_kind!(BoolParameter, Bool, "BoolParameter");
carrier_kind!(DoubleParameter, Double, "DoubleParameter");
carrier_kind!(IntParameter, Int, "IntParameter");
carrier_kind!(DoubleCollection, DoubleCollection, "DoubleCollection");
carrier_kind!(IntCollection, IntCollection, "IntCollection");
carrier_kind!(BitCollection, BitCollection, "BitCollection");
carrier_kind!(BoundedDouble, BoundedDouble, "BoundedDouble");
carrier_kind!(CarrierGroup, Group, "CarrierGroup");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adaptors::{BitFlipAdaptor, DoubleGaussAdaptor};

    #[test]
    fn test_kind_names_match_carrier_kind() {
        let p: Parameter = DoubleCollection::new().into();
        assert_eq!(p.kind_name(), DoubleCollection::KIND);
        let p: Parameter = BoundedDouble::new(0.0, -1.0, 1.0).unwrap().into();
        assert_eq!(p.kind_name(), BoundedDouble::KIND);
    }

    #[test]
    fn test_extraction_round_trip() {
        let mut bits = BitCollection::from_values(vec![true, false]);
        bits.add_adaptor(BitFlipAdaptor::new()).unwrap();
        let mut p: Parameter = bits.into();

        assert!(BitCollection::from_parameter(&p).is_some());
        assert!(DoubleCollection::from_parameter(&p).is_none());

        let back = BitCollection::from_parameter_mut(&mut p).unwrap();
        back.push(true);
        assert_eq!(BitCollection::from_parameter(&p).unwrap().len(), 3);
    }

    #[test]
    fn test_load_rejects_kind_mismatch() {
        let mut p: Parameter = DoubleParameter::new(1.0).into();
        let q: Parameter = IntParameter::new(1).into();
        let err = p.load_from(&q).unwrap_err();
        assert_eq!(
            err,
            Error::TypeMismatch {
                expected: "DoubleParameter",
                found: "IntParameter",
            }
        );
    }

    #[test]
    fn test_mutate_dispatches() {
        let mut xs = DoubleCollection::from_values(vec![0.0; 4]);
        xs.add_adaptor(DoubleGaussAdaptor::with_sigma(0.1).unwrap())
            .unwrap();
        let mut p: Parameter = xs.into();
        p.mutate();
        let xs = DoubleCollection::from_parameter(&p).unwrap();
        assert!(xs.iter().any(|&v| v != 0.0));
    }

    #[test]
    fn test_equality_across_kinds_is_false() {
        let p: Parameter = DoubleParameter::new(1.0).into();
        let q: Parameter = BoolParameter::new(true).into();
        assert!(!p.equal_to(&q));
        assert!(!p.similar_to(&q, 1e10));
    }
}
