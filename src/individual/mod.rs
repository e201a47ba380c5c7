//! The composite individual.
//!
//! An [`Individual`] aggregates an ordered sequence of parameter carriers
//! with a dirty-flag-guarded fitness cache. The surrounding algorithm
//! calls [`Individual::mutate`] to perturb all carriers and
//! [`Individual::fitness`] to read the objective value; the cache is only
//! recomputed while the dirty flag is set.
//!
//! # Key Types
//!
//! - [`Individual`]: carriers + fitness cache + evaluation policy
//! - [`EvaluationPermission`]: prevent, allow or enforce evaluation
//! - [`FitnessFn`]: the user-supplied objective
//! - [`Personality`]: opaque per-algorithm state attached to an individual

mod member;
mod types;

pub use member::Individual;
pub use types::{EvaluationPermission, FitnessFn, Personality};
