use super::DatasetError;
use crate::schema::{ApplicantRecord, Decision, Feature, FeatureSchema, SchemaError};
use crate::schema::{FEATURE_COUNT, LABEL_COLUMN};
use std::io::Read;

#[derive(Debug)]
pub(crate) struct LabeledRow {
    pub(crate) record: ApplicantRecord,
    pub(crate) label: Decision,
}

/// Read labeled rows, matching columns by header name rather than position.
pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<LabeledRow>, DatasetError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let header: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|name| name.to_string())
        .collect();
    let layout = ColumnLayout::resolve(&header)?;

    let mut rows = Vec::new();
    for (idx, record) in csv_reader.records().enumerate() {
        let record = record?;
        let row = idx + 1;

        let mut values = [0.0; FEATURE_COUNT];
        for feature in Feature::ALL {
            let raw = record.get(layout.features[feature.index()]).unwrap_or("");
            values[feature.index()] = parse_cell(row, feature, raw)?;
        }
        let record_values = ApplicantRecord::from_values(values)
            .map_err(|source| DatasetError::Row { row, source })?;

        let raw_label = record.get(layout.label).unwrap_or("");
        let label = parse_label(raw_label).ok_or_else(|| DatasetError::InvalidLabel {
            row,
            raw: raw_label.to_string(),
        })?;

        rows.push(LabeledRow {
            record: record_values,
            label,
        });
    }

    Ok(rows)
}

struct ColumnLayout {
    features: [usize; FEATURE_COUNT],
    label: usize,
}

impl ColumnLayout {
    fn resolve(header: &[String]) -> Result<Self, DatasetError> {
        FeatureSchema::check_columns(header)?;

        let position = |name: &str| header.iter().position(|column| column == name);
        let label = position(LABEL_COLUMN)
            .ok_or_else(|| SchemaError::MissingColumn(LABEL_COLUMN.to_string()))?;

        let mut features = [0; FEATURE_COUNT];
        for feature in Feature::ALL {
            features[feature.index()] = position(feature.column())
                .ok_or_else(|| SchemaError::MissingColumn(feature.column().to_string()))?;
        }

        Ok(Self { features, label })
    }
}

fn parse_cell(row: usize, feature: Feature, raw: &str) -> Result<f64, DatasetError> {
    let value = raw
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| DatasetError::InvalidCell {
            row,
            column: feature.column().to_string(),
            raw: raw.to_string(),
        })?;
    Ok(value)
}

fn parse_label(raw: &str) -> Option<Decision> {
    let value = raw.parse::<f64>().ok()?;
    if value.fract() != 0.0 {
        return None;
    }
    Decision::from_label(value as i64)
}
