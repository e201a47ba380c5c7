//! Supervised training data in the canonical encoded layout.
//!
//! Objective functions that score a parameter set against recorded
//! observations (e.g. network training) consume input/output pairs of
//! double vectors. The encoded form keys the sequence under `data`, each
//! entry being an `{Input, Output}` pair, in the same three encodings as
//! every other object ([`crate::codec`]).

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One observation: an input vector and the expected output vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingPair {
    /// Input values presented to the model under training.
    #[serde(rename = "Input")]
    pub input: Vec<f64>,
    /// Expected output values.
    #[serde(rename = "Output")]
    pub output: Vec<f64>,
}

impl TrainingPair {
    /// A pair from input and expected output.
    pub fn new(input: Vec<f64>, output: Vec<f64>) -> Self {
        Self { input, output }
    }
}

/// An ordered set of training observations.
///
/// # Usage
///
/// ```
/// use evoparam::codec::{Encodable, Encoding};
/// use evoparam::dataset::{TrainingPair, TrainingSet};
///
/// let mut set = TrainingSet::new();
/// set.push(TrainingPair::new(vec![0.0, 1.0], vec![1.0])).unwrap();
/// let xml = set.to_encoded(Encoding::Xml).unwrap();
/// let back = TrainingSet::from_encoded(&xml, Encoding::Xml).unwrap();
/// assert_eq!(back, set);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TrainingSet {
    data: Vec<TrainingPair>,
}

impl TrainingSet {
    /// An empty training set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an observation.
    ///
    /// All pairs in one set must agree on their input and output widths;
    /// a deviating pair is rejected with [`Error::InvalidConfiguration`].
    pub fn push(&mut self, pair: TrainingPair) -> Result<()> {
        if let Some(first) = self.data.first() {
            if first.input.len() != pair.input.len() || first.output.len() != pair.output.len() {
                return Err(Error::InvalidConfiguration(format!(
                    "pair dimensions {}x{} do not match the set's {}x{}",
                    pair.input.len(),
                    pair.output.len(),
                    first.input.len(),
                    first.output.len()
                )));
            }
        }
        self.data.push(pair);
        Ok(())
    }

    /// The observation at `index`, if present.
    pub fn get(&self, index: usize) -> Option<&TrainingPair> {
        self.data.get(index)
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the set holds no observations.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Iterates over the observations.
    pub fn iter(&self) -> std::slice::Iter<'_, TrainingPair> {
        self.data.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{Encodable, Encoding};

    fn xor_set() -> TrainingSet {
        let mut set = TrainingSet::new();
        set.push(TrainingPair::new(vec![0.0, 0.0], vec![0.0])).unwrap();
        set.push(TrainingPair::new(vec![0.0, 1.0], vec![1.0])).unwrap();
        set.push(TrainingPair::new(vec![1.0, 0.0], vec![1.0])).unwrap();
        set.push(TrainingPair::new(vec![1.0, 1.0], vec![0.0])).unwrap();
        set
    }

    #[test]
    fn test_dimension_check() {
        let mut set = xor_set();
        assert!(set
            .push(TrainingPair::new(vec![1.0], vec![0.0]))
            .is_err());
        assert!(set
            .push(TrainingPair::new(vec![0.5, 0.5], vec![0.5]))
            .is_ok());
    }

    #[test]
    fn test_round_trips_in_all_encodings() {
        let set = xor_set();
        for encoding in [Encoding::Text, Encoding::Xml, Encoding::Binary] {
            let encoded = set.to_encoded(encoding).unwrap();
            let back = TrainingSet::from_encoded(&encoded, encoding).unwrap();
            assert_eq!(back, set, "round trip failed for {encoding:?}");
        }
    }

    #[test]
    fn test_encoded_form_is_keyed_by_data() {
        let text = xor_set().to_encoded(Encoding::Text).unwrap();
        assert!(text.contains("\"data\""));
        assert!(text.contains("\"Input\""));
        assert!(text.contains("\"Output\""));
    }
}
