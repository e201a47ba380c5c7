//! Evaluation policy, the fitness callback and the personality bag.

use std::any::Any;

use serde::{Deserialize, Serialize};

use super::member::Individual;

/// Controls whether an individual's objective may run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EvaluationPermission {
    /// A stale fitness request is an error.
    Prevent,
    /// Fitness is computed on demand.
    #[default]
    Allow,
    /// Every mutation immediately refreshes the cache.
    Enforce,
}

/// A user-supplied objective function.
///
/// Must be pure with respect to the individual: it reads the carriers'
/// external values and returns the objective value. Failures are reported
/// through the `Err` string and surface as
/// [`Error::UserFitness`](crate::error::Error::UserFitness); panics
/// propagate to the caller unchanged.
///
/// Any `Fn(&Individual) -> Result<f64, String>` closure implements this
/// trait; for infallible objectives see
/// [`Individual::set_objective`](super::Individual::set_objective).
pub trait FitnessFn: Send + Sync {
    /// Computes the objective value for `individual`.
    fn compute(&self, individual: &Individual) -> Result<f64, String>;
}

impl<F> FitnessFn for F
where
    F: Fn(&Individual) -> Result<f64, String> + Send + Sync,
{
    fn compute(&self, individual: &Individual) -> Result<f64, String> {
        self(individual)
    }
}

/// Opaque per-algorithm state attached to an individual.
///
/// A population layer can stash whatever it needs here (parent/child
/// role, position in the population, velocities, ...). The individual
/// owns the bag outright and deep-copies it on clone; it is neither
/// serialized nor part of structural equality.
///
/// # Implementing
///
/// ```
/// use evoparam::individual::Personality;
///
/// #[derive(Debug, Clone)]
/// struct Role { is_parent: bool }
///
/// impl Personality for Role {
///     fn clone_box(&self) -> Box<dyn Personality> { Box::new(self.clone()) }
///     fn as_any(&self) -> &dyn std::any::Any { self }
///     fn as_any_mut(&mut self) -> &mut dyn std::any::Any { self }
/// }
/// ```
pub trait Personality: Any + Send + std::fmt::Debug {
    /// Deep copy preserving the concrete type.
    fn clone_box(&self) -> Box<dyn Personality>;

    /// Upcast for downcasting to the concrete type.
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for downcasting to the concrete type.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl Clone for Box<dyn Personality> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Role {
        is_parent: bool,
    }

    impl Personality for Role {
        fn clone_box(&self) -> Box<dyn Personality> {
            Box::new(self.clone())
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    #[test]
    fn test_personality_box_clones_deeply() {
        let bag: Box<dyn Personality> = Box::new(Role { is_parent: true });
        let mut copy = bag.clone();
        copy.as_any_mut()
            .downcast_mut::<Role>()
            .unwrap()
            .is_parent = false;
        assert!(bag.as_any().downcast_ref::<Role>().unwrap().is_parent);
        assert!(!copy.as_any().downcast_ref::<Role>().unwrap().is_parent);
    }

    #[test]
    fn test_default_permission_allows() {
        assert_eq!(EvaluationPermission::default(), EvaluationPermission::Allow);
    }
}
