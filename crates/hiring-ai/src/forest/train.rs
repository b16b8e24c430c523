use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::tree::{DecisionTree, Node};

/// Per-tree growth limits.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TreeOptions {
    pub(crate) n_classes: usize,
    pub(crate) max_features: usize,
    pub(crate) min_samples_split: usize,
    pub(crate) max_depth: Option<usize>,
}

/// Fitted tree plus its unnormalized impurity decrease per feature.
pub(crate) struct FittedTree {
    pub(crate) tree: DecisionTree,
    pub(crate) importances: Vec<f64>,
}

/// Fit one tree on a bootstrap sample drawn from `seed`.
pub(crate) fn fit_bootstrap_tree(
    x: &[Vec<f64>],
    y: &[usize],
    options: &TreeOptions,
    seed: u64,
) -> FittedTree {
    let mut rng = StdRng::seed_from_u64(seed);
    let n = x.len();
    let samples: Vec<usize> = (0..n).map(|_| rng.random_range(0..n)).collect();

    let n_features = x.first().map_or(0, Vec::len);
    let mut builder = TreeBuilder {
        x,
        y,
        options,
        rng,
        nodes: Vec::new(),
        importances: vec![0.0; n_features],
    };
    builder.grow(&samples, 0);

    FittedTree {
        tree: DecisionTree::from_nodes(builder.nodes),
        importances: builder.importances,
    }
}

struct TreeBuilder<'a> {
    x: &'a [Vec<f64>],
    y: &'a [usize],
    options: &'a TreeOptions,
    rng: StdRng,
    nodes: Vec<Node>,
    importances: Vec<f64>,
}

#[derive(Debug, Clone, Copy)]
struct SplitCandidate {
    feature: usize,
    threshold: f64,
    /// `n_left * gini_left + n_right * gini_right`.
    weighted_impurity: f64,
}

impl TreeBuilder<'_> {
    fn grow(&mut self, samples: &[usize], depth: usize) -> usize {
        let counts = self.class_counts(samples);
        let n = samples.len();
        let impurity = gini(&counts, n);

        let idx = self.nodes.len();
        self.nodes.push(leaf(&counts, n));

        let depth_reached = self.options.max_depth.is_some_and(|max| depth >= max);
        if n < self.options.min_samples_split || impurity <= 0.0 || depth_reached {
            return idx;
        }

        let Some(split) = self.best_split(samples) else {
            return idx;
        };

        let (left_samples, right_samples): (Vec<usize>, Vec<usize>) = samples
            .iter()
            .partition(|&&sample| self.x[sample][split.feature] <= split.threshold);
        if left_samples.is_empty() || right_samples.is_empty() {
            return idx;
        }

        self.importances[split.feature] += n as f64 * impurity - split.weighted_impurity;

        let left = self.grow(&left_samples, depth + 1);
        let right = self.grow(&right_samples, depth + 1);
        self.nodes[idx] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        idx
    }

    /// Visit features in random order. At least `max_features` are examined, and the
    /// search keeps going past that only while no feature has produced a valid split.
    fn best_split(&mut self, samples: &[usize]) -> Option<SplitCandidate> {
        let mut features: Vec<usize> = (0..self.importances.len()).collect();
        features.shuffle(&mut self.rng);

        let mut best: Option<SplitCandidate> = None;
        for (visited, feature) in features.into_iter().enumerate() {
            if visited >= self.options.max_features && best.is_some() {
                break;
            }
            if let Some(candidate) = self.best_threshold(samples, feature) {
                let better = best.map_or(true, |current| {
                    candidate.weighted_impurity < current.weighted_impurity
                });
                if better {
                    best = Some(candidate);
                }
            }
        }
        best
    }

    fn best_threshold(&self, samples: &[usize], feature: usize) -> Option<SplitCandidate> {
        let mut ordered: Vec<(f64, usize)> = samples
            .iter()
            .map(|&sample| (self.x[sample][feature], self.y[sample]))
            .collect();
        ordered.sort_by(|a, b| a.0.total_cmp(&b.0));

        let n = ordered.len();
        let n_classes = self.options.n_classes;
        let mut right = vec![0usize; n_classes];
        for &(_, class) in &ordered {
            right[class] += 1;
        }
        let mut left = vec![0usize; n_classes];

        let mut best: Option<SplitCandidate> = None;
        for i in 0..n.saturating_sub(1) {
            let (value, class) = ordered[i];
            left[class] += 1;
            right[class] -= 1;

            let next = ordered[i + 1].0;
            if next <= value {
                continue;
            }

            let n_left = i + 1;
            let n_right = n - n_left;
            let weighted =
                n_left as f64 * gini(&left, n_left) + n_right as f64 * gini(&right, n_right);
            if best.map_or(true, |current| weighted < current.weighted_impurity) {
                let mut threshold = value + (next - value) / 2.0;
                if threshold >= next {
                    threshold = value;
                }
                best = Some(SplitCandidate {
                    feature,
                    threshold,
                    weighted_impurity: weighted,
                });
            }
        }
        best
    }

    fn class_counts(&self, samples: &[usize]) -> Vec<usize> {
        let mut counts = vec![0usize; self.options.n_classes];
        for &sample in samples {
            counts[self.y[sample]] += 1;
        }
        counts
    }
}

fn leaf(counts: &[usize], n: usize) -> Node {
    let total = n.max(1) as f64;
    Node::Leaf {
        distribution: counts.iter().map(|&c| c as f64 / total).collect(),
    }
}

/// Gini impurity `1 - sum(p_k^2)`.
pub(crate) fn gini(counts: &[usize], n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let total = n as f64;
    1.0 - counts
        .iter()
        .map(|&c| {
            let p = c as f64 / total;
            p * p
        })
        .sum::<f64>()
}
