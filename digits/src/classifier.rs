//! Training-set-backed k-nearest-neighbor classifier
//!
//! [`KnnClassifier`] owns a materialized training set and answers
//! [`Classify`] queries against it. The distance loop can run on the rayon
//! pool; neighbor selection and voting are shared with the sequential path
//! in `digits_core::knn`, so both produce identical labels.

use digits_core::knn::{self, select_nearest, validate_arguments, vote, VotePolicy};
use digits_core::validation::{max_distance, validate_same_shape};
use digits_core::{Bitmap, Classify, DigitsError, Label, Shape};
use log::{debug, trace};
use rayon::prelude::*;

/// Configuration for k-NN classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnnConfig {
    /// Number of neighbors consulted per query
    pub k: usize,
    /// How the neighbors are turned into a label
    pub policy: VotePolicy,
    /// Evaluate distances on the rayon thread pool
    pub parallel: bool,
}

impl KnnConfig {
    /// Config consulting `k` neighbors with the default policy
    pub fn with_k(k: usize) -> Self {
        Self {
            k,
            ..Self::default()
        }
    }

    /// Set the vote policy
    pub fn with_policy(mut self, policy: VotePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Enable or disable parallel distance evaluation
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

impl Default for KnnConfig {
    fn default() -> Self {
        Self {
            k: 5,
            policy: VotePolicy::Weighted,
            parallel: true,
        }
    }
}

/// Classifier whose model is the raw exemplar set
#[derive(Debug, Clone)]
pub struct KnnClassifier {
    training: Vec<Bitmap>,
    shape: Shape,
    config: KnnConfig,
}

impl KnnClassifier {
    /// Wrap a training set
    ///
    /// Fails on an empty set, a zero `k`, or exemplars of differing shapes.
    pub fn new(training: Vec<Bitmap>, config: KnnConfig) -> Result<Self, DigitsError> {
        validate_arguments(training.len(), config.k)?;
        let shape = training[0].shape();
        for bitmap in &training[1..] {
            validate_same_shape(shape, bitmap.shape())?;
        }
        if max_distance(shape).is_none() {
            return Err(DigitsError::InvalidArgument("bitmaps too large for distance sums"));
        }

        debug!(
            "KnnClassifier: {} exemplars of {shape}, k={}, policy={:?}, parallel={}",
            training.len(),
            config.k,
            config.policy,
            config.parallel
        );

        Ok(Self {
            training,
            shape,
            config,
        })
    }

    pub fn training(&self) -> &[Bitmap] {
        &self.training
    }

    /// Shape every query must have
    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn config(&self) -> &KnnConfig {
        &self.config
    }

    /// Distances from `query` to every exemplar, in training order
    pub fn distances(&self, query: &Bitmap) -> Result<Vec<u64>, DigitsError> {
        validate_same_shape(self.shape, query.shape())?;
        let query = query.pixels();
        let distances: Vec<u64> = if self.config.parallel {
            self.training
                .par_iter()
                .map(|t| knn::squared_distance(query, t.pixels()))
                .collect()
        } else {
            self.training
                .iter()
                .map(|t| knn::squared_distance(query, t.pixels()))
                .collect()
        };
        Ok(distances)
    }

    /// The `k` nearest exemplars, closest first
    pub fn neighbors(&self, query: &Bitmap) -> Result<Vec<knn::Neighbor>, DigitsError> {
        let distances = self.distances(query)?;
        Ok(select_nearest(&distances, &self.training, self.config.k))
    }
}

impl Classify for KnnClassifier {
    fn classify(&self, bitmap: &Bitmap) -> digits_core::Result<Label> {
        let neighbors = self.neighbors(bitmap)?;
        let label = vote(self.config.policy, &neighbors);
        trace!(
            "classified as {label} (nearest distance {:?})",
            neighbors.first().map(|n| n.distance)
        );
        Ok(label)
    }
}
