use serde::{Deserialize, Serialize};

use super::ForestError;

/// Node of a fitted classification tree. Children always sit at higher indices than
/// their parent, with the root at index 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    Split {
        /// Feature index used for the split.
        feature: usize,
        /// Samples with `feature <= threshold` go left.
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        /// Class distribution of the training samples that reached this leaf.
        distribution: Vec<f64>,
    },
}

/// CART classification tree stored as a flat node arena.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    nodes: Vec<Node>,
}

impl DecisionTree {
    pub(crate) fn from_nodes(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], idx: usize) -> usize {
            match &nodes[idx] {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => {
                    1 + walk(nodes, *left).max(walk(nodes, *right))
                }
            }
        }
        if self.nodes.is_empty() {
            0
        } else {
            walk(&self.nodes, 0)
        }
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| matches!(node, Node::Leaf { .. }))
            .count()
    }

    /// Class distribution of the leaf that `features` falls into.
    pub fn predict_proba(&self, features: &[f64]) -> &[f64] {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { distribution } => return distribution,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let value = features.get(*feature).copied().unwrap_or(0.0);
                    idx = if value <= *threshold { *left } else { *right };
                }
            }
        }
    }

    /// Check structural invariants so a deserialized tree cannot loop or index out of bounds.
    pub fn validate(&self, n_features: usize, n_classes: usize) -> Result<(), ForestError> {
        if self.nodes.is_empty() {
            return Err(ForestError::Malformed("tree has no nodes".to_string()));
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            match node {
                Node::Leaf { distribution } => {
                    if distribution.len() != n_classes {
                        return Err(ForestError::Malformed(format!(
                            "leaf {idx} has {} classes but expected {n_classes}",
                            distribution.len()
                        )));
                    }
                }
                Node::Split {
                    feature,
                    left,
                    right,
                    ..
                } => {
                    if *feature >= n_features {
                        return Err(ForestError::Malformed(format!(
                            "node {idx} splits on feature {feature} of {n_features}"
                        )));
                    }
                    for child in [*left, *right] {
                        if child <= idx || child >= self.nodes.len() {
                            return Err(ForestError::Malformed(format!(
                                "node {idx} has invalid child {child}"
                            )));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}
