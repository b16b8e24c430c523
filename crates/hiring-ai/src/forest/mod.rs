//! Seeded random forest classifier.
//!
//! Bagged CART trees with Gini splits and per-node feature subsampling. Training is fully
//! determined by [`ForestParams::seed`], and the fitted model serializes with serde so it
//! can travel inside the model artifact.

mod train;
mod tree;

pub use tree::{DecisionTree, Node};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use train::{fit_bootstrap_tree, TreeOptions};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ForestError {
    #[error("cannot fit a forest on an empty dataset")]
    EmptyDataset,
    #[error("feature matrix has {rows} rows but {labels} labels were given")]
    LengthMismatch { rows: usize, labels: usize },
    #[error("row {row} has {found} features but expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("label {label} is outside 0..{n_classes}")]
    LabelOutOfRange { label: usize, n_classes: usize },
    #[error("invalid forest parameters: {0}")]
    InvalidParams(String),
    #[error("malformed forest: {0}")]
    Malformed(String),
}

/// Number of features examined at each split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaxFeatures {
    /// `max(1, floor(sqrt(n_features)))`.
    #[default]
    Sqrt,
    All,
    Fixed(usize),
}

impl MaxFeatures {
    pub fn resolve(self, n_features: usize) -> usize {
        let count = match self {
            MaxFeatures::Sqrt => (n_features as f64).sqrt().floor() as usize,
            MaxFeatures::All => n_features,
            MaxFeatures::Fixed(count) => count.min(n_features),
        };
        count.max(1)
    }
}

/// Forest hyperparameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestParams {
    pub n_trees: usize,
    pub seed: u64,
    pub max_features: MaxFeatures,
    pub min_samples_split: usize,
    pub max_depth: Option<usize>,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            seed: 42,
            max_features: MaxFeatures::Sqrt,
            min_samples_split: 2,
            max_depth: None,
        }
    }
}

/// Fitted ensemble. Probabilities are the mean of the trees' leaf distributions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    n_features: usize,
    n_classes: usize,
    trees: Vec<DecisionTree>,
    feature_importances: Vec<f64>,
}

impl RandomForest {
    /// Fit on a row-major matrix `x` with class indices `y` in `0..n_classes`.
    pub fn fit(
        x: &[Vec<f64>],
        y: &[usize],
        n_classes: usize,
        params: &ForestParams,
    ) -> Result<Self, ForestError> {
        if x.len() != y.len() {
            return Err(ForestError::LengthMismatch {
                rows: x.len(),
                labels: y.len(),
            });
        }
        if x.is_empty() {
            return Err(ForestError::EmptyDataset);
        }
        if params.n_trees == 0 {
            return Err(ForestError::InvalidParams(
                "n_trees must be at least 1".to_string(),
            ));
        }
        if n_classes < 2 {
            return Err(ForestError::InvalidParams(
                "need at least 2 classes".to_string(),
            ));
        }

        let n_features = x[0].len();
        if let Some((row, found)) = x
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|(_, len)| *len != n_features)
        {
            return Err(ForestError::RaggedRow {
                row,
                expected: n_features,
                found,
            });
        }
        if let Some(&label) = y.iter().find(|&&label| label >= n_classes) {
            return Err(ForestError::LabelOutOfRange { label, n_classes });
        }

        let options = TreeOptions {
            n_classes,
            max_features: params.max_features.resolve(n_features),
            min_samples_split: params.min_samples_split.max(2),
            max_depth: params.max_depth,
        };

        let mut master = StdRng::seed_from_u64(params.seed);
        let mut trees = Vec::with_capacity(params.n_trees);
        let mut importance_sum = vec![0.0; n_features];
        for _ in 0..params.n_trees {
            let tree_seed: u64 = master.random();
            let fitted = fit_bootstrap_tree(x, y, &options, tree_seed);
            for (total, value) in importance_sum.iter_mut().zip(normalized(fitted.importances)) {
                *total += value;
            }
            trees.push(fitted.tree);
        }

        let feature_importances = normalized(importance_sum);
        debug!(
            trees = trees.len(),
            rows = x.len(),
            max_features = options.max_features,
            "random forest fitted"
        );

        Ok(Self {
            n_features,
            n_classes,
            trees,
            feature_importances,
        })
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    pub fn trees(&self) -> &[DecisionTree] {
        &self.trees
    }

    /// Mean decrease in impurity per feature, summing to 1 unless no tree ever split.
    pub fn feature_importances(&self) -> &[f64] {
        &self.feature_importances
    }

    pub fn predict_proba(&self, features: &[f64]) -> Vec<f64> {
        let mut proba = vec![0.0; self.n_classes];
        for tree in &self.trees {
            for (total, value) in proba.iter_mut().zip(tree.predict_proba(features)) {
                *total += value;
            }
        }
        let n_trees = self.trees.len().max(1) as f64;
        for value in &mut proba {
            *value /= n_trees;
        }
        proba
    }

    /// Index of the most probable class; ties go to the lower index.
    pub fn predict(&self, features: &[f64]) -> usize {
        argmax(&self.predict_proba(features))
    }

    pub fn validate(&self) -> Result<(), ForestError> {
        if self.trees.is_empty() {
            return Err(ForestError::Malformed("forest has no trees".to_string()));
        }
        if self.n_classes < 2 {
            return Err(ForestError::Malformed(format!(
                "forest has {} classes",
                self.n_classes
            )));
        }
        if self.feature_importances.len() != self.n_features {
            return Err(ForestError::Malformed(format!(
                "{} importances for {} features",
                self.feature_importances.len(),
                self.n_features
            )));
        }
        for tree in &self.trees {
            tree.validate(self.n_features, self.n_classes)?;
        }
        Ok(())
    }
}

pub(crate) fn argmax(values: &[f64]) -> usize {
    let mut best_idx = 0usize;
    let mut best_val = f64::NEG_INFINITY;
    for (idx, &value) in values.iter().enumerate() {
        if value > best_val {
            best_val = value;
            best_idx = idx;
        }
    }
    best_idx
}

fn normalized(values: Vec<f64>) -> Vec<f64> {
    let total: f64 = values.iter().sum();
    if total <= 0.0 {
        return values.into_iter().map(|_| 0.0).collect();
    }
    values.into_iter().map(|value| value / total).collect()
}
