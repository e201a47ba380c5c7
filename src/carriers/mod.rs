//! Typed parameter carriers.
//!
//! A *carrier* holds parameter values together with the adaptors that
//! mutate them. All carriers share the same surface: `mutate()` applies
//! the attached adaptors in attachment order, `add_adaptor` attaches one
//! under a unique name, and the external values are what a fitness
//! function reads.
//!
//! # Carriers
//!
//! - [`ScalarParameter`]: one value ([`DoubleParameter`], [`IntParameter`],
//!   [`BoolParameter`])
//! - [`ValueCollection`]: an ordered sequence sharing one adaptor list
//!   ([`DoubleCollection`], [`IntCollection`], [`BitCollection`])
//! - [`BoundedDouble`]: a double whose external value is folded into a
//!   closed interval
//! - [`CarrierGroup`]: an ordered group of sub-carriers for structural
//!   composition
//!
//! [`Parameter`] is the tagged union over all of them; its variant tag is
//! the carrier's runtime kind and serialization type-tag. Typed extraction
//! out of a [`Parameter`] goes through [`CarrierKind`].
//!
//! Every carrier owns its adaptors outright: cloning a carrier deep-copies
//! the adaptor list, and adaptors are never shared between carriers.

mod bounded;
mod collection;
mod group;
mod parameter;
mod scalar;
mod value;

pub use bounded::BoundedDouble;
pub use collection::{BitCollection, DoubleCollection, IntCollection, ValueCollection};
pub use group::CarrierGroup;
pub use parameter::{CarrierKind, Parameter};
pub use scalar::{BoolParameter, DoubleParameter, IntParameter, ScalarParameter};
pub use value::{NumericValue, ParameterValue};

use crate::adaptors::Adapt;
use crate::error::{Error, Result};
use crate::object::Replicable;

/// Attaches an adaptor, enforcing name uniqueness within the carrier.
pub(crate) fn attach_adaptor<T: ParameterValue>(
    list: &mut Vec<T::Adaptor>,
    adaptor: T::Adaptor,
) -> Result<()> {
    let name = adaptor.state().name();
    if list.iter().any(|a| a.state().name() == name) {
        return Err(Error::DuplicateAdaptor(name.to_owned()));
    }
    list.push(adaptor);
    Ok(())
}

/// Looks an adaptor up by name.
pub(crate) fn find_adaptor<'a, T: ParameterValue>(
    list: &'a [T::Adaptor],
    name: &str,
) -> Option<&'a T::Adaptor> {
    list.iter().find(|a| a.state().name() == name)
}

/// Looks an adaptor up by name, mutably.
pub(crate) fn find_adaptor_mut<'a, T: ParameterValue>(
    list: &'a mut [T::Adaptor],
    name: &str,
) -> Option<&'a mut T::Adaptor> {
    list.iter_mut().find(|a| a.state().name() == name)
}

/// Loads one adaptor list from another.
///
/// When count, order and runtime kinds line up, each adaptor is loaded in
/// place, preserving its random handle and packet cursors. Otherwise the
/// whole list is rebuilt by deep clone.
pub(crate) fn load_adaptor_list<T: ParameterValue>(
    dst: &mut Vec<T::Adaptor>,
    src: &[T::Adaptor],
) -> Result<()> {
    let kinds_align = dst.len() == src.len()
        && dst
            .iter()
            .zip(src.iter())
            .all(|(a, b)| a.kind() == b.kind());
    if kinds_align {
        for (a, b) in dst.iter_mut().zip(src.iter()) {
            a.load_from(b)?;
        }
    } else {
        *dst = src.to_vec();
    }
    Ok(())
}

pub(crate) fn adaptor_lists_equal<T: ParameterValue>(
    a: &[T::Adaptor],
    b: &[T::Adaptor],
) -> bool {
    a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.equal_to(y))
}

pub(crate) fn adaptor_lists_similar<T: ParameterValue>(
    a: &[T::Adaptor],
    b: &[T::Adaptor],
    epsilon: f64,
) -> bool {
    a.len() == b.len()
        && a.iter()
            .zip(b.iter())
            .all(|(x, y)| x.similar_to(y, epsilon))
}
