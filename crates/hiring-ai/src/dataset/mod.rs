mod parser;

use crate::schema::{ApplicantRecord, Decision, SchemaError};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::io::Read;
use std::path::Path;
use tracing::debug;

#[derive(Debug)]
pub enum DatasetError {
    Io(std::io::Error),
    Csv(csv::Error),
    Schema(SchemaError),
    Row { row: usize, source: SchemaError },
    InvalidCell {
        row: usize,
        column: String,
        raw: String,
    },
    InvalidLabel { row: usize, raw: String },
    SplitTooSmall { rows: usize, test_fraction: f64 },
}

impl std::fmt::Display for DatasetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetError::Io(err) => write!(f, "failed to read dataset: {}", err),
            DatasetError::Csv(err) => write!(f, "invalid dataset CSV: {}", err),
            DatasetError::Schema(err) => write!(f, "dataset does not match feature schema: {}", err),
            DatasetError::Row { row, source } => write!(f, "row {}: {}", row, source),
            DatasetError::InvalidCell { row, column, raw } => write!(
                f,
                "row {}: column '{}' has non-numeric value '{}'",
                row, column, raw
            ),
            DatasetError::InvalidLabel { row, raw } => write!(
                f,
                "row {}: HiringDecision must be 0 or 1 (got '{}')",
                row, raw
            ),
            DatasetError::SplitTooSmall {
                rows,
                test_fraction,
            } => write!(
                f,
                "cannot split {} rows with test fraction {}: both partitions need at least one row",
                rows, test_fraction
            ),
        }
    }
}

impl std::error::Error for DatasetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DatasetError::Io(err) => Some(err),
            DatasetError::Csv(err) => Some(err),
            DatasetError::Schema(err) => Some(err),
            DatasetError::Row { source, .. } => Some(source),
            DatasetError::InvalidCell { .. }
            | DatasetError::InvalidLabel { .. }
            | DatasetError::SplitTooSmall { .. } => None,
        }
    }
}

impl From<std::io::Error> for DatasetError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for DatasetError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<SchemaError> for DatasetError {
    fn from(err: SchemaError) -> Self {
        Self::Schema(err)
    }
}

/// Applicant records paired with their hiring outcome.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabeledDataset {
    records: Vec<ApplicantRecord>,
    labels: Vec<Decision>,
}

impl LabeledDataset {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        let file = std::fs::File::open(path.as_ref())?;
        let dataset = Self::from_reader(file)?;
        debug!(path = %path.as_ref().display(), rows = dataset.len(), "dataset loaded");
        Ok(dataset)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let mut dataset = Self::default();
        for row in parser::parse_rows(reader)? {
            dataset.push(row.record, row.label);
        }
        Ok(dataset)
    }

    pub fn push(&mut self, record: ApplicantRecord, label: Decision) {
        self.records.push(record);
        self.labels.push(label);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[ApplicantRecord] {
        &self.records
    }

    pub fn labels(&self) -> &[Decision] {
        &self.labels
    }

    /// Row-major feature matrix in schema order.
    pub fn feature_matrix(&self) -> Vec<Vec<f64>> {
        self.records
            .iter()
            .map(|record| record.features().to_vec())
            .collect()
    }

    pub fn class_indices(&self) -> Vec<usize> {
        self.labels.iter().map(|label| label.index()).collect()
    }

    fn subset(&self, indices: &[usize]) -> Self {
        Self {
            records: indices.iter().map(|&i| self.records[i].clone()).collect(),
            labels: indices.iter().map(|&i| self.labels[i]).collect(),
        }
    }

    /// Shuffle with `seed`, hold out `ceil(len * test_fraction)` rows, train on the rest.
    pub fn split(&self, test_fraction: f64, seed: u64) -> Result<DatasetSplit, DatasetError> {
        let rows = self.len();
        let test_len = (rows as f64 * test_fraction).ceil() as usize;
        if test_len == 0 || test_len >= rows {
            return Err(DatasetError::SplitTooSmall {
                rows,
                test_fraction,
            });
        }

        let mut indices: Vec<usize> = (0..rows).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        indices.shuffle(&mut rng);
        let (test_idx, train_idx) = indices.split_at(test_len);

        Ok(DatasetSplit {
            train: self.subset(train_idx),
            test: self.subset(test_idx),
        })
    }
}

/// Training and held-out partitions.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSplit {
    pub train: LabeledDataset,
    pub test: LabeledDataset,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(rows: usize) -> LabeledDataset {
        let mut dataset = LabeledDataset::default();
        for i in 0..rows {
            let record = ApplicantRecord {
                age: 20.0 + i as f64,
                gender: (i % 2) as i64,
                education_level: 1,
                experience_years: 1.0,
                previous_companies: 1,
                distance_from_company: 1.0,
                interview_score: i as f64,
                skill_score: 50.0,
                personality_score: 50.0,
                recruitment_strategy: 1,
            };
            let label = if i % 3 == 0 {
                Decision::Hired
            } else {
                Decision::NotHired
            };
            dataset.push(record, label);
        }
        dataset
    }

    #[test]
    fn split_holds_out_ceiling_share() {
        let split = dataset(11).split(0.2, 42).expect("split");
        assert_eq!(split.test.len(), 3);
        assert_eq!(split.train.len(), 8);

        let mut ages: Vec<f64> = split
            .train
            .records()
            .iter()
            .chain(split.test.records())
            .map(|record| record.age)
            .collect();
        ages.sort_by(|a, b| a.total_cmp(b));
        let expected: Vec<f64> = (0..11).map(|i| 20.0 + i as f64).collect();
        assert_eq!(ages, expected);
    }

    #[test]
    fn split_is_reproducible_for_a_seed() {
        let data = dataset(40);
        assert_eq!(
            data.split(0.2, 42).expect("split"),
            data.split(0.2, 42).expect("split")
        );
    }

    #[test]
    fn split_requires_rows_on_both_sides() {
        assert!(matches!(
            dataset(1).split(0.2, 42),
            Err(DatasetError::SplitTooSmall { rows: 1, .. })
        ));
        assert!(dataset(0).split(0.2, 42).is_err());
    }

    #[test]
    fn missing_file_surfaces_io_error() {
        match LabeledDataset::from_path("definitely/not/here.csv") {
            Err(DatasetError::Io(err)) => assert_eq!(err.kind(), std::io::ErrorKind::NotFound),
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
