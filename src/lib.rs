//! Self-adapting parameter representation for evolutionary optimization.
//!
//! Population-based optimizers — evolutionary strategies, genetic
//! algorithms and their relatives — need candidate solutions they can
//! mutate, clone, compare and ship across process boundaries. This crate
//! is that representation layer:
//!
//! - **Carriers** ([`carriers`]): typed parameter containers — scalars,
//!   numeric and bit collections, interval-bounded doubles, structural
//!   groups — each owning the adaptors that mutate it.
//! - **Adaptors** ([`adaptors`]): stateful mutation operators (gaussian,
//!   bi-gaussian, bit-flip, integer-flip, identity, swarm) that
//!   periodically self-adapt their own meta-parameters.
//! - **Bounded mapping** ([`bounds`]): a triangular-wave folding that lets
//!   unconstrained gaussian mutation produce perfectly bounded external
//!   values without rejection sampling.
//! - **Individuals** ([`individual`]): ordered carrier aggregates with a
//!   dirty-flag-guarded fitness cache and a pluggable objective.
//! - **Randomness** ([`random`]): a process-wide service whose worker
//!   threads pre-generate packets of uniform and gaussian samples.
//! - **Codecs** ([`codec`]): Text/Xml/Binary round-trips with the
//!   concrete kind of every polymorphic value tagged on the wire.
//!
//! Concrete optimisation loops (selection, recombination, population
//! topologies) are deliberately not part of this crate; they sit on top
//! of the [`object::Replicable`] protocol and the carrier interfaces.
//!
//! # Example
//!
//! ```
//! use evoparam::adaptors::DoubleGaussAdaptor;
//! use evoparam::carriers::DoubleCollection;
//! use evoparam::individual::Individual;
//!
//! // Ten parameters starting at 1.0, mutated by a self-adapting
//! // gaussian with sigma 0.1.
//! let mut xs = DoubleCollection::from_values(vec![1.0; 10]);
//! xs.add_adaptor(DoubleGaussAdaptor::with_parameters(0.1, 0.001, 1e-4, 1.0).unwrap())
//!     .unwrap();
//!
//! let mut individual = Individual::new();
//! individual.push(xs);
//! individual.set_objective(|ind: &Individual| {
//!     let xs: &DoubleCollection = ind.child_at(0).unwrap();
//!     xs.iter().map(|x| x * x).sum()
//! });
//!
//! assert_eq!(individual.fitness().unwrap(), 10.0);
//! individual.mutate().unwrap();
//! assert_ne!(individual.fitness().unwrap(), 10.0);
//! ```

pub mod adaptors;
pub mod bounds;
pub mod carriers;
pub mod codec;
pub mod dataset;
pub mod error;
pub mod individual;
pub mod object;
pub mod random;

pub use error::{Error, Result};
