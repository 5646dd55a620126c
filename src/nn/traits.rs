//! Model traits for policy prediction and training.
//!
//! These traits define the interface between the game engine and a learning
//! model, which may live in Rust or in Python behind the `python` feature.
//! The engine only supplies encoded states and transition tuples; it never
//! looks inside a model.

use serde::{Deserialize, Serialize};

use crate::training::Transition;

/// Encoded observation as a flat feature vector.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EncodedState {
    /// Feature values.
    pub tensor: Vec<f32>,

    /// Shape of the tensor, `[features]` for the flat encoder.
    pub shape: Vec<usize>,
}

impl EncodedState {
    pub fn new(tensor: Vec<f32>, shape: Vec<usize>) -> Self {
        debug_assert_eq!(
            tensor.len(),
            shape.iter().product::<usize>(),
            "Tensor length must match shape product"
        );
        Self { tensor, shape }
    }

    /// A flat vector of features.
    #[must_use]
    pub fn flat(tensor: Vec<f32>) -> Self {
        let len = tensor.len();
        Self {
            tensor,
            shape: vec![len],
        }
    }

    pub fn zeros(shape: Vec<usize>) -> Self {
        let size = shape.iter().product();
        Self {
            tensor: vec![0.0; size],
            shape,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tensor.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tensor.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<f32> {
        self.tensor.get(index).copied()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.tensor
    }
}

/// What a model returns for one decision.
///
/// Both variants refer to positions in the legal action list the model was
/// asked about, not to the global action space.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Prediction {
    /// Pick the action at this position.
    Index(usize),
    /// Sample an action with these weights, one per legal action.
    Distribution(Vec<f32>),
}

impl Prediction {
    /// Whether the prediction can be mapped onto `legal_count` options.
    #[must_use]
    pub fn is_usable(&self, legal_count: usize) -> bool {
        match self {
            Prediction::Index(i) => *i < legal_count,
            Prediction::Distribution(weights) => {
                weights.len() == legal_count
                    && weights.iter().all(|w| w.is_finite() && *w >= 0.0)
                    && weights.iter().any(|w| *w > 0.0)
            }
        }
    }
}

/// A policy over the legal actions of one decision.
pub trait PolicyModel {
    /// Predict an action among `legal_count` options.
    fn predict(&self, state: &EncodedState, legal_count: usize) -> Prediction;
}

impl<M: PolicyModel + ?Sized> PolicyModel for Box<M> {
    fn predict(&self, state: &EncodedState, legal_count: usize) -> Prediction {
        (**self).predict(state, legal_count)
    }
}

/// Consumes batches of experience.
pub trait Learner {
    /// Train on a batch. Returns the loss, or whatever scalar the learner
    /// reports.
    fn train(&mut self, batch: &[Transition]) -> f32;
}

/// Uniform distribution over the legal actions (baseline for testing).
#[derive(Clone, Copy, Debug, Default)]
pub struct UniformModel;

impl UniformModel {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl PolicyModel for UniformModel {
    fn predict(&self, _state: &EncodedState, legal_count: usize) -> Prediction {
        if legal_count == 0 {
            return Prediction::Distribution(Vec::new());
        }
        let prob = 1.0 / legal_count as f32;
        Prediction::Distribution(vec![prob; legal_count])
    }
}

/// Learner that only counts what it was given.
#[derive(Clone, Debug, Default)]
pub struct CountingLearner {
    pub batches: usize,
    pub transitions: usize,
}

impl Learner for CountingLearner {
    fn train(&mut self, batch: &[Transition]) -> f32 {
        self.batches += 1;
        self.transitions += batch.len();
        0.0
    }
}
