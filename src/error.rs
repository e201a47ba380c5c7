//! Error taxonomy shared across the crate.
//!
//! Every fallible operation returns [`Result`]. Nothing is retried
//! internally; errors surface to the caller unchanged. The only silent
//! recovery in the crate is the random service's local-generation fallback,
//! which never reaches this type.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// All error conditions produced by the representation layer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A setter or constructor received an out-of-contract value
    /// (probability outside `[0, 1]`, reversed sigma bounds, reversed
    /// interval bounds, a crossover position beyond either collection, ...).
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A polymorphic load or typed accessor received an object of the
    /// wrong runtime kind.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// Kind the receiver required.
        expected: &'static str,
        /// Kind that was actually supplied.
        found: &'static str,
    },

    /// `load_from` was handed the receiver itself.
    ///
    /// Rust's borrow rules make this unreachable through safe code; the
    /// guard is kept for parity with the load contract and for callers
    /// that go through interior mutability.
    #[error("attempted to load an object from itself")]
    SelfAssignment,

    /// An adaptor was attached under a name that is already taken on the
    /// same carrier.
    #[error("an adaptor named `{0}` is already attached")]
    DuplicateAdaptor(String),

    /// A value was assigned outside a bounded scalar's range, or the
    /// bounds were reset so that the current external value is excluded.
    #[error("value {value} violates bounds [{lower}, {upper}]")]
    BoundsViolation {
        /// The offending external value.
        value: f64,
        /// Lower bound of the interval.
        lower: f64,
        /// Upper bound of the interval.
        upper: f64,
    },

    /// `fitness()` was called while evaluation is prevented.
    #[error("fitness evaluation is forbidden for this individual")]
    EvaluationForbidden,

    /// `fitness()` found a stale cache while lazy evaluation is disabled
    /// past the zeroth iteration.
    #[error("stale fitness: lazy evaluation is disabled past iteration 0")]
    StaleFitness,

    /// A codec failed to encode or decode (malformed input, unknown
    /// type-tag, truncated binary, unrepresentable value).
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The user-supplied fitness function reported a failure.
    #[error("fitness function failed: {0}")]
    UserFitness(String),
}
