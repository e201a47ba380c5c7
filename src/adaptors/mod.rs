//! Self-adapting mutation operators.
//!
//! An *adaptor* mutates one parameter value per call and periodically
//! perturbs its own meta-parameters (self-adaption). All adaptors share
//! the protocol implemented by [`Adapt`]:
//!
//! - a [`MutationMode`] decides whether a call mutates always, never, or
//!   with the configured probability,
//! - every `adaption_threshold` probabilistic calls the adaptor's own
//!   meta-parameters are perturbed (`0` disables self-adaption),
//! - a rolling index tracks the position when one adaptor is applied
//!   across a sequence of values.
//!
//! # Kinds
//!
//! - [`GaussAdaptor`]: gaussian perturbation with self-adapting step width
//!   ([`DoubleGaussAdaptor`], [`IntGaussAdaptor`])
//! - [`BiGaussAdaptor`]: gaussian step carrying a peak-distance parameter
//!   for a two-peak search scheme
//! - [`BitFlipAdaptor`]: boolean flip with optionally self-adapting
//!   probability
//! - [`IntFlipAdaptor`]: ±1 integer step, overflow-safe
//! - [`IdentityAdaptor`]: leaves values untouched
//! - [`SwarmAdaptor`]: gaussian step that always fires
//!
//! Carriers store adaptors through the per-leaf-type tagged enums
//! [`DoubleAdaptor`], [`IntAdaptor`] and [`BoolAdaptor`], which also serve
//! as the serialization type-tags for polymorphic adaptor values.

mod bigauss;
mod bitflip;
mod common;
mod dispatch;
mod gauss;
mod identity;
mod intflip;
mod swarm;

pub(crate) use common::check_probability;

pub use bigauss::BiGaussAdaptor;
pub use bitflip::BitFlipAdaptor;
pub use common::{Adapt, AdaptorKind, AdaptorState, MutationMode};
pub use dispatch::{BoolAdaptor, DoubleAdaptor, IntAdaptor};
pub use gauss::{DoubleGaussAdaptor, GaussAdaptor, GaussTarget, IntGaussAdaptor};
pub use identity::IdentityAdaptor;
pub use intflip::IntFlipAdaptor;
pub use swarm::SwarmAdaptor;
