//! Held-out evaluation metrics for the hiring classifier.

use serde::{Deserialize, Serialize};

/// Confusion matrix for a `K`-class classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    /// Number of classes.
    pub n_classes: usize,
    /// Row-major `KxK` counts (`truth * K + predicted`).
    pub counts: Vec<u32>,
}

impl ConfusionMatrix {
    pub fn new(n_classes: usize) -> Self {
        Self {
            n_classes,
            counts: vec![0; n_classes * n_classes],
        }
    }

    pub fn from_pairs(n_classes: usize, truth: &[usize], predicted: &[usize]) -> Self {
        let mut matrix = Self::new(n_classes);
        for (&t, &p) in truth.iter().zip(predicted) {
            matrix.add(t, p);
        }
        matrix
    }

    pub fn add(&mut self, truth: usize, predicted: usize) {
        if truth >= self.n_classes || predicted >= self.n_classes {
            return;
        }
        let idx = truth * self.n_classes + predicted;
        self.counts[idx] = self.counts[idx].saturating_add(1);
    }

    pub fn get(&self, truth: usize, predicted: usize) -> u32 {
        self.counts[truth * self.n_classes + predicted]
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    pub fn rows(&self) -> Vec<Vec<u32>> {
        self.counts
            .chunks(self.n_classes.max(1))
            .map(<[u32]>::to_vec)
            .collect()
    }
}

/// Precision/recall/F1 for a single class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub class_name: String,
    /// `TP / (TP + FP)`.
    pub precision: f64,
    /// `TP / (TP + FN)`.
    pub recall: f64,
    pub f1: f64,
    /// Number of true examples of the class.
    pub support: u32,
}

/// Averaged row of the classification report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AveragedMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: u32,
}

/// Per-class table plus accuracy and macro/weighted averages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub classes: Vec<ClassMetrics>,
    pub accuracy: f64,
    pub macro_avg: AveragedMetrics,
    pub weighted_avg: AveragedMetrics,
}

impl ClassificationReport {
    pub fn from_confusion(cm: &ConfusionMatrix, class_names: &[&str]) -> Self {
        let classes: Vec<ClassMetrics> = (0..cm.n_classes)
            .map(|class_idx| {
                let name = class_names
                    .get(class_idx)
                    .map(|name| name.to_string())
                    .unwrap_or_else(|| class_idx.to_string());
                class_metrics(cm, class_idx, name)
            })
            .collect();

        let n = classes.len().max(1) as f64;
        let support: u32 = classes.iter().map(|class| class.support).sum();
        let macro_avg = AveragedMetrics {
            precision: classes.iter().map(|c| c.precision).sum::<f64>() / n,
            recall: classes.iter().map(|c| c.recall).sum::<f64>() / n,
            f1: classes.iter().map(|c| c.f1).sum::<f64>() / n,
            support,
        };

        let weighted_avg = AveragedMetrics {
            precision: support_weighted(&classes, |c| c.precision),
            recall: support_weighted(&classes, |c| c.recall),
            f1: support_weighted(&classes, |c| c.f1),
            support,
        };

        Self {
            accuracy: accuracy(cm),
            classes,
            macro_avg,
            weighted_avg,
        }
    }
}

fn support_weighted(classes: &[ClassMetrics], value: impl Fn(&ClassMetrics) -> f64) -> f64 {
    let support: u32 = classes.iter().map(|c| c.support).sum();
    if support == 0 {
        return 0.0;
    }
    classes
        .iter()
        .map(|c| value(c) * c.support as f64)
        .sum::<f64>()
        / support as f64
}

fn class_metrics(cm: &ConfusionMatrix, class_idx: usize, class_name: String) -> ClassMetrics {
    let k = cm.n_classes;
    let tp = cm.get(class_idx, class_idx) as f64;
    let mut fp = 0f64;
    let mut fn_ = 0f64;
    let mut support = 0u32;
    for j in 0..k {
        let v = cm.get(class_idx, j);
        support = support.saturating_add(v);
        if j != class_idx {
            fn_ += v as f64;
        }
    }
    for i in 0..k {
        if i != class_idx {
            fp += cm.get(i, class_idx) as f64;
        }
    }
    let precision = if tp + fp == 0.0 { 0.0 } else { tp / (tp + fp) };
    let recall = if tp + fn_ == 0.0 { 0.0 } else { tp / (tp + fn_) };
    let f1 = if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    };
    ClassMetrics {
        class_name,
        precision,
        recall,
        f1,
        support,
    }
}

/// Compute overall accuracy from a confusion matrix.
pub fn accuracy(cm: &ConfusionMatrix) -> f64 {
    let mut correct = 0u64;
    let mut total = 0u64;
    for truth in 0..cm.n_classes {
        for predicted in 0..cm.n_classes {
            let v = cm.get(truth, predicted) as u64;
            total += v;
            if truth == predicted {
                correct += v;
            }
        }
    }
    if total == 0 {
        0.0
    } else {
        correct as f64 / total as f64
    }
}
