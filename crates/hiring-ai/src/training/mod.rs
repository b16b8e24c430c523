//! End-to-end training run: load, split, fit, evaluate, persist.

pub mod chart;

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use tracing::info;

use crate::artifact::{ArtifactError, ModelArtifact};
use crate::config::AppConfig;
use crate::dataset::{DatasetError, LabeledDataset};
use crate::forest::{ForestError, ForestParams, RandomForest};
use crate::metrics::{ClassificationReport, ConfusionMatrix};
use crate::schema::{Decision, Feature};

pub use chart::{write_importance_chart, ChartError};

#[derive(Debug)]
pub enum TrainingError {
    Dataset(DatasetError),
    Forest(ForestError),
    Artifact(ArtifactError),
    Chart(ChartError),
}

impl fmt::Display for TrainingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrainingError::Dataset(err) => write!(f, "{}", err),
            TrainingError::Forest(err) => write!(f, "failed to fit model: {}", err),
            TrainingError::Artifact(err) => write!(f, "{}", err),
            TrainingError::Chart(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for TrainingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TrainingError::Dataset(err) => Some(err),
            TrainingError::Forest(err) => Some(err),
            TrainingError::Artifact(err) => Some(err),
            TrainingError::Chart(err) => Some(err),
        }
    }
}

impl From<DatasetError> for TrainingError {
    fn from(value: DatasetError) -> Self {
        Self::Dataset(value)
    }
}

impl From<ForestError> for TrainingError {
    fn from(value: ForestError) -> Self {
        Self::Forest(value)
    }
}

impl From<ArtifactError> for TrainingError {
    fn from(value: ArtifactError) -> Self {
        Self::Artifact(value)
    }
}

impl From<ChartError> for TrainingError {
    fn from(value: ChartError) -> Self {
        Self::Chart(value)
    }
}

/// Inputs and outputs of one training run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingOptions {
    pub data_path: PathBuf,
    pub model_path: PathBuf,
    /// Skip the importance chart when `None`.
    pub chart_path: Option<PathBuf>,
    pub test_fraction: f64,
    pub params: ForestParams,
}

impl TrainingOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            data_path: config.paths.data.clone(),
            model_path: config.paths.model.clone(),
            chart_path: Some(config.paths.chart.clone()),
            test_fraction: config.training.test_fraction,
            params: ForestParams {
                n_trees: config.training.n_trees,
                seed: config.training.seed,
                ..ForestParams::default()
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureImportance {
    pub feature: Feature,
    pub importance: f64,
}

/// Held-out evaluation of a freshly fitted forest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingSummary {
    pub train_rows: usize,
    pub test_rows: usize,
    pub confusion: ConfusionMatrix,
    pub report: ClassificationReport,
    /// Highest importance first; ties keep schema order.
    pub importances: Vec<FeatureImportance>,
}

impl TrainingSummary {
    pub fn accuracy(&self) -> f64 {
        self.report.accuracy
    }
}

/// Result of [`TrainingPipeline::fit`], before anything touches the filesystem.
#[derive(Debug, Clone)]
pub struct TrainedModel {
    pub artifact: ModelArtifact,
    pub summary: TrainingSummary,
}

pub struct TrainingPipeline {
    options: TrainingOptions,
}

impl TrainingPipeline {
    pub fn new(options: TrainingOptions) -> Self {
        Self { options }
    }

    /// Load the dataset, train, and write the artifact and chart, overwriting both.
    pub fn run(&self) -> Result<TrainingSummary, TrainingError> {
        let dataset = LabeledDataset::from_path(&self.options.data_path)?;
        info!(
            path = %self.options.data_path.display(),
            rows = dataset.len(),
            "training dataset loaded"
        );

        let trained = self.fit(&dataset)?;
        trained.artifact.save(&self.options.model_path)?;

        if let Some(chart_path) = &self.options.chart_path {
            write_importance_chart(chart_path, &trained.summary.importances)?;
            info!(path = %chart_path.display(), "feature importance chart written");
        }

        Ok(trained.summary)
    }

    /// Split, fit and evaluate in memory.
    pub fn fit(&self, dataset: &LabeledDataset) -> Result<TrainedModel, TrainingError> {
        let params = &self.options.params;
        let split = dataset.split(self.options.test_fraction, params.seed)?;
        info!(
            train_rows = split.train.len(),
            test_rows = split.test.len(),
            seed = params.seed,
            "dataset split"
        );

        let forest = RandomForest::fit(
            &split.train.feature_matrix(),
            &split.train.class_indices(),
            Decision::CLASSES.len(),
            params,
        )?;
        info!(trees = forest.trees().len(), "random forest fitted");

        let truth = split.test.class_indices();
        let predicted: Vec<usize> = split
            .test
            .records()
            .iter()
            .map(|record| forest.predict(&record.features()))
            .collect();
        let confusion = ConfusionMatrix::from_pairs(Decision::CLASSES.len(), &truth, &predicted);
        let class_names: Vec<&str> = Decision::CLASSES.iter().map(|d| d.label()).collect();
        let report = ClassificationReport::from_confusion(&confusion, &class_names);
        info!(accuracy = report.accuracy, "held-out evaluation complete");

        let importances = ranked_importances(forest.feature_importances());
        let summary = TrainingSummary {
            train_rows: split.train.len(),
            test_rows: split.test.len(),
            confusion,
            report,
            importances,
        };

        Ok(TrainedModel {
            artifact: ModelArtifact::new(forest, params.clone()),
            summary,
        })
    }
}

fn ranked_importances(values: &[f64]) -> Vec<FeatureImportance> {
    let mut ranked: Vec<FeatureImportance> = Feature::ALL
        .into_iter()
        .zip(values.iter().copied())
        .map(|(feature, importance)| FeatureImportance {
            feature,
            importance,
        })
        .collect();
    ranked.sort_by(|a, b| b.importance.total_cmp(&a.importance));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ApplicantRecord;

    fn synthetic(rows: usize) -> LabeledDataset {
        let mut dataset = LabeledDataset::default();
        for i in 0..rows {
            // Rows come in pairs that differ only in interview score and label.
            let pair = i / 2;
            let hired = i % 2 == 0;
            let score = if hired { 70.0 + (i % 25) as f64 } else { 10.0 + (i % 25) as f64 };
            let record = ApplicantRecord {
                age: 25.0 + (pair % 20) as f64,
                gender: (pair % 2) as i64,
                education_level: 1 + (pair % 4) as i64,
                experience_years: (pair % 10) as f64,
                previous_companies: 1 + (pair % 5) as i64,
                distance_from_company: (pair % 30) as f64,
                interview_score: score,
                skill_score: 50.0,
                personality_score: 50.0,
                recruitment_strategy: 1 + (pair % 3) as i64,
            };
            let label = if hired {
                Decision::Hired
            } else {
                Decision::NotHired
            };
            dataset.push(record, label);
        }
        dataset
    }

    fn pipeline(n_trees: usize) -> TrainingPipeline {
        TrainingPipeline::new(TrainingOptions {
            data_path: PathBuf::from("unused.csv"),
            model_path: PathBuf::from("unused.json"),
            chart_path: None,
            test_fraction: 0.2,
            params: ForestParams {
                n_trees,
                ..ForestParams::default()
            },
        })
    }

    #[test]
    fn ranks_importances_descending_with_stable_ties() {
        let mut values = vec![0.0; 10];
        values[6] = 0.5;
        values[7] = 0.3;
        values[0] = 0.2;
        let ranked = ranked_importances(&values);
        assert_eq!(ranked[0].feature, Feature::InterviewScore);
        assert_eq!(ranked[1].feature, Feature::SkillScore);
        assert_eq!(ranked[2].feature, Feature::Age);
        assert_eq!(ranked[3].feature, Feature::Gender);
        assert_eq!(ranked.len(), 10);
    }

    #[test]
    fn fit_evaluates_on_held_out_rows() {
        let trained = pipeline(20).fit(&synthetic(50)).expect("training succeeds");
        let summary = &trained.summary;
        assert_eq!(summary.test_rows, 10);
        assert_eq!(summary.train_rows, 40);
        assert_eq!(summary.confusion.total(), 10);
        assert_eq!(summary.importances[0].feature, Feature::InterviewScore);
        assert!(summary.accuracy() > 0.9);
        trained.artifact.validate().expect("artifact is consistent");
    }

    #[test]
    fn fit_is_reproducible() {
        let data = synthetic(60);
        let first = pipeline(10).fit(&data).expect("first run");
        let second = pipeline(10).fit(&data).expect("second run");
        assert_eq!(first.summary, second.summary);
        assert_eq!(first.artifact.forest, second.artifact.forest);
    }

    #[test]
    fn tiny_dataset_cannot_be_split() {
        let err = pipeline(5).fit(&synthetic(1)).expect_err("split fails");
        assert!(matches!(
            err,
            TrainingError::Dataset(DatasetError::SplitTooSmall { .. })
        ));
    }
}
