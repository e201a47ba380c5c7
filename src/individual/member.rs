//! The carrier aggregate with its fitness cache.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::types::{EvaluationPermission, FitnessFn, Personality};
use crate::carriers::{CarrierKind, Parameter};
use crate::error::{Error, Result};
use crate::object::{alias_guard, floats_similar, Replicable};

/// An ordered collection of parameter carriers with a cached fitness.
///
/// The dirty flag guards the cache: a fresh or mutated individual is
/// dirty, a successful [`fitness`](Individual::fitness) call cleans it,
/// and any structural modification dirties it again. While the flag is
/// clear, the cached value is exactly what the objective returned for the
/// current parameter state.
///
/// # Usage
///
/// ```
/// use evoparam::adaptors::DoubleGaussAdaptor;
/// use evoparam::carriers::{DoubleCollection, Parameter};
/// use evoparam::individual::Individual;
///
/// let mut xs = DoubleCollection::from_values(vec![1.0; 10]);
/// xs.add_adaptor(DoubleGaussAdaptor::with_sigma(0.1).unwrap()).unwrap();
///
/// let mut ind = Individual::new();
/// ind.push(xs);
/// ind.set_objective(|ind: &Individual| {
///     let xs: &DoubleCollection = ind.child_at(0).unwrap();
///     xs.iter().map(|x| x * x).sum()
/// });
///
/// assert_eq!(ind.fitness().unwrap(), 10.0);
/// ind.mutate().unwrap();
/// assert!(ind.is_dirty());
/// ```
#[derive(Clone, Serialize, Deserialize)]
pub struct Individual {
    parameters: Vec<Parameter>,
    fitness_cache: f64,
    dirty: bool,
    evaluation_permission: EvaluationPermission,
    lazy_evaluation_allowed: bool,
    parent_iteration: u32,
    #[serde(skip)]
    personality: Option<Box<dyn Personality>>,
    #[serde(skip)]
    evaluator: Option<Arc<dyn FitnessFn>>,
}

impl Individual {
    /// An empty, dirty individual with evaluation allowed.
    pub fn new() -> Self {
        Self {
            parameters: Vec::new(),
            fitness_cache: 0.0,
            dirty: true,
            evaluation_permission: EvaluationPermission::default(),
            lazy_evaluation_allowed: true,
            parent_iteration: 0,
            personality: None,
            evaluator: None,
        }
    }

    // ------------------------------------------------------------------
    // Carrier access
    // ------------------------------------------------------------------

    /// Appends a carrier; the individual becomes dirty.
    pub fn push(&mut self, carrier: impl Into<Parameter>) {
        self.parameters.push(carrier.into());
        self.dirty = true;
    }

    /// Number of carriers.
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    /// Whether the individual holds no carriers.
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// The carrier at `index`, if present.
    pub fn get(&self, index: usize) -> Option<&Parameter> {
        self.parameters.get(index)
    }

    /// Mutable access to the carrier at `index`; the individual becomes
    /// dirty.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Parameter> {
        self.dirty = true;
        self.parameters.get_mut(index)
    }

    /// Iterates over the carriers.
    pub fn iter(&self) -> std::slice::Iter<'_, Parameter> {
        self.parameters.iter()
    }

    /// Index of the first carrier structurally equal to `carrier`.
    pub fn find(&self, carrier: &Parameter) -> Option<usize> {
        self.parameters.iter().position(|p| p.equal_to(carrier))
    }

    /// Typed access to the carrier at `index`.
    ///
    /// Fails with [`Error::TypeMismatch`] when the carrier at `index` is
    /// of a different kind.
    ///
    /// # Panics
    /// Panics if `index` is out of range, like slice indexing.
    pub fn child_at<C: CarrierKind>(&self, index: usize) -> Result<&C> {
        let carrier = &self.parameters[index];
        C::from_parameter(carrier).ok_or(Error::TypeMismatch {
            expected: C::KIND,
            found: carrier.kind_name(),
        })
    }

    /// Typed mutable access to the carrier at `index`; the individual
    /// becomes dirty.
    ///
    /// # Panics
    /// Panics if `index` is out of range, like slice indexing.
    pub fn child_at_mut<C: CarrierKind>(&mut self, index: usize) -> Result<&mut C> {
        let carrier = &mut self.parameters[index];
        let found = carrier.kind_name();
        match C::from_parameter_mut(carrier) {
            Some(c) => {
                self.dirty = true;
                Ok(c)
            }
            None => Err(Error::TypeMismatch {
                expected: C::KIND,
                found,
            }),
        }
    }

    // ------------------------------------------------------------------
    // Mutation and fitness
    // ------------------------------------------------------------------

    /// Mutates every carrier in insertion order and marks the individual
    /// dirty.
    ///
    /// With [`EvaluationPermission::Enforce`] the fitness cache is
    /// refreshed immediately, which is where the returned error can come
    /// from.
    pub fn mutate(&mut self) -> Result<()> {
        for parameter in self.parameters.iter_mut() {
            parameter.mutate();
        }
        self.dirty = true;
        if self.evaluation_permission == EvaluationPermission::Enforce {
            self.fitness()?;
        }
        Ok(())
    }

    /// The objective value for the current parameter state.
    ///
    /// Returns the cache while clean. While dirty:
    /// [`Error::EvaluationForbidden`] under
    /// [`EvaluationPermission::Prevent`]; [`Error::StaleFitness`] when
    /// lazy evaluation is disabled past iteration 0; otherwise the
    /// objective runs, the cache is refreshed and the flag cleared. A
    /// failing objective surfaces as [`Error::UserFitness`] and leaves
    /// the flag dirty.
    pub fn fitness(&mut self) -> Result<f64> {
        if !self.dirty {
            return Ok(self.fitness_cache);
        }
        if self.evaluation_permission == EvaluationPermission::Prevent {
            return Err(Error::EvaluationForbidden);
        }
        if !self.lazy_evaluation_allowed && self.parent_iteration > 0 {
            return Err(Error::StaleFitness);
        }
        let evaluator = self.evaluator.clone().ok_or_else(|| {
            Error::InvalidConfiguration("no fitness function attached to this individual".into())
        })?;
        trace!(carriers = self.parameters.len(), "evaluating objective");
        let value = evaluator.compute(self).map_err(Error::UserFitness)?;
        self.fitness_cache = value;
        self.dirty = false;
        Ok(value)
    }

    /// The cached value, regardless of the dirty flag.
    pub fn cached_fitness(&self) -> f64 {
        self.fitness_cache
    }

    /// Whether the cache is stale.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Marks the cache stale by hand.
    pub fn set_dirty(&mut self) {
        self.dirty = true;
    }

    /// Attaches an infallible objective.
    pub fn set_objective<F>(&mut self, objective: F)
    where
        F: Fn(&Individual) -> f64 + Send + Sync + 'static,
    {
        self.evaluator = Some(Arc::new(
            move |individual: &Individual| -> std::result::Result<f64, String> {
                Ok(objective(individual))
            },
        ));
        self.dirty = true;
    }

    /// Attaches a fallible objective.
    pub fn set_evaluator(&mut self, evaluator: impl FitnessFn + 'static) {
        self.evaluator = Some(Arc::new(evaluator));
        self.dirty = true;
    }

    /// Whether an objective is attached.
    pub fn has_evaluator(&self) -> bool {
        self.evaluator.is_some()
    }

    // ------------------------------------------------------------------
    // Evaluation policy
    // ------------------------------------------------------------------

    /// Current evaluation permission.
    pub fn evaluation_permission(&self) -> EvaluationPermission {
        self.evaluation_permission
    }

    /// Sets the evaluation permission, returning the previous value.
    pub fn set_evaluation_permission(
        &mut self,
        permission: EvaluationPermission,
    ) -> EvaluationPermission {
        std::mem::replace(&mut self.evaluation_permission, permission)
    }

    /// Whether a stale cache may be recomputed past iteration 0.
    pub fn lazy_evaluation_allowed(&self) -> bool {
        self.lazy_evaluation_allowed
    }

    /// Permits or forbids deferred fitness computation past iteration 0.
    pub fn set_lazy_evaluation_allowed(&mut self, allowed: bool) {
        self.lazy_evaluation_allowed = allowed;
    }

    /// The surrounding algorithm's iteration this individual belongs to.
    pub fn parent_iteration(&self) -> u32 {
        self.parent_iteration
    }

    /// Records the surrounding algorithm's iteration.
    pub fn set_parent_iteration(&mut self, iteration: u32) {
        self.parent_iteration = iteration;
    }

    // ------------------------------------------------------------------
    // Personality
    // ------------------------------------------------------------------

    /// Attaches a per-algorithm trait bag, replacing any previous one.
    pub fn set_personality(&mut self, personality: impl Personality + 'static) {
        self.personality = Some(Box::new(personality));
    }

    /// The attached trait bag, downcast to its concrete type.
    pub fn personality<P: Personality>(&self) -> Option<&P> {
        self.personality
            .as_deref()
            .and_then(|p| p.as_any().downcast_ref())
    }

    /// Mutable access to the attached trait bag.
    pub fn personality_mut<P: Personality>(&mut self) -> Option<&mut P> {
        self.personality
            .as_deref_mut()
            .and_then(|p| p.as_any_mut().downcast_mut())
    }

    /// Removes and returns the trait bag.
    pub fn take_personality(&mut self) -> Option<Box<dyn Personality>> {
        self.personality.take()
    }
}

impl Default for Individual {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Individual {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Individual")
            .field("parameters", &self.parameters)
            .field("fitness_cache", &self.fitness_cache)
            .field("dirty", &self.dirty)
            .field("evaluation_permission", &self.evaluation_permission)
            .field("lazy_evaluation_allowed", &self.lazy_evaluation_allowed)
            .field("parent_iteration", &self.parent_iteration)
            .field("personality", &self.personality)
            .field("has_evaluator", &self.evaluator.is_some())
            .finish()
    }
}

impl Replicable for Individual {
    /// Loads all state including the dirty flag verbatim. The evaluator
    /// is shared with the source; the personality bag is deep-copied.
    fn load_from(&mut self, other: &Self) -> Result<()> {
        alias_guard(self, other)?;
        let kinds_align = self.parameters.len() == other.parameters.len()
            && self
                .parameters
                .iter()
                .zip(other.parameters.iter())
                .all(|(a, b)| a.kind_name() == b.kind_name());
        if kinds_align {
            for (a, b) in self.parameters.iter_mut().zip(other.parameters.iter()) {
                a.load_from(b)?;
            }
        } else {
            self.parameters = other.parameters.clone();
        }
        self.fitness_cache = other.fitness_cache;
        self.dirty = other.dirty;
        self.evaluation_permission = other.evaluation_permission;
        self.lazy_evaluation_allowed = other.lazy_evaluation_allowed;
        self.parent_iteration = other.parent_iteration;
        self.personality = other.personality.clone();
        self.evaluator = other.evaluator.clone();
        Ok(())
    }

    fn equal_to(&self, other: &Self) -> bool {
        self.parameters.len() == other.parameters.len()
            && self
                .parameters
                .iter()
                .zip(other.parameters.iter())
                .all(|(a, b)| a.equal_to(b))
            && self.fitness_cache == other.fitness_cache
            && self.dirty == other.dirty
            && self.evaluation_permission == other.evaluation_permission
            && self.lazy_evaluation_allowed == other.lazy_evaluation_allowed
            && self.parent_iteration == other.parent_iteration
    }

    fn similar_to(&self, other: &Self, epsilon: f64) -> bool {
        self.parameters.len() == other.parameters.len()
            && self
                .parameters
                .iter()
                .zip(other.parameters.iter())
                .all(|(a, b)| a.similar_to(b, epsilon))
            && floats_similar(self.fitness_cache, other.fitness_cache, epsilon)
            && self.dirty == other.dirty
            && self.evaluation_permission == other.evaluation_permission
            && self.lazy_evaluation_allowed == other.lazy_evaluation_allowed
            && self.parent_iteration == other.parent_iteration
    }
}
