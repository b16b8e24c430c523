//! Named feature schema shared by training and inference.
//!
//! Every feature vector handed to the forest is produced from [`Feature::ALL`], and both
//! datasets and model artifacts are checked against [`FeatureSchema`] before use, so a
//! reordered or renamed column fails loudly instead of silently shifting values.

mod domain;
mod record;

pub use domain::{
    Choice, Domain, DomainPolicy, DomainViolation, FieldKind, EDUCATION_CHOICES,
    GENDER_CHOICES, STRATEGY_CHOICES,
};
pub use record::{ApplicantRecord, Decision};

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const FEATURE_COUNT: usize = 10;
pub const LABEL_COLUMN: &str = "HiringDecision";

/// Applicant attributes in the order the model consumes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Feature {
    Age,
    Gender,
    EducationLevel,
    ExperienceYears,
    PreviousCompanies,
    DistanceFromCompany,
    InterviewScore,
    SkillScore,
    PersonalityScore,
    RecruitmentStrategy,
}

impl Feature {
    pub const ALL: [Feature; FEATURE_COUNT] = [
        Feature::Age,
        Feature::Gender,
        Feature::EducationLevel,
        Feature::ExperienceYears,
        Feature::PreviousCompanies,
        Feature::DistanceFromCompany,
        Feature::InterviewScore,
        Feature::SkillScore,
        Feature::PersonalityScore,
        Feature::RecruitmentStrategy,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Dataset column name.
    pub fn column(self) -> &'static str {
        match self {
            Feature::Age => "Age",
            Feature::Gender => "Gender",
            Feature::EducationLevel => "EducationLevel",
            Feature::ExperienceYears => "ExperienceYears",
            Feature::PreviousCompanies => "PreviousCompanies",
            Feature::DistanceFromCompany => "DistanceFromCompany",
            Feature::InterviewScore => "InterviewScore",
            Feature::SkillScore => "SkillScore",
            Feature::PersonalityScore => "PersonalityScore",
            Feature::RecruitmentStrategy => "RecruitmentStrategy",
        }
    }

    /// Human facing label used by prompts and form rows.
    pub fn label(self) -> &'static str {
        match self {
            Feature::Age => "Age",
            Feature::Gender => "Gender",
            Feature::EducationLevel => "Education Level",
            Feature::ExperienceYears => "Years of Experience",
            Feature::PreviousCompanies => "Previous Companies",
            Feature::DistanceFromCompany => "Distance from Company (km)",
            Feature::InterviewScore => "Interview Score",
            Feature::SkillScore => "Skill Score",
            Feature::PersonalityScore => "Personality Score",
            Feature::RecruitmentStrategy => "Recruitment Strategy",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            Feature::Gender => FieldKind::Choice(GENDER_CHOICES),
            Feature::EducationLevel => FieldKind::Choice(EDUCATION_CHOICES),
            Feature::RecruitmentStrategy => FieldKind::Choice(STRATEGY_CHOICES),
            Feature::PreviousCompanies => FieldKind::Count,
            _ => FieldKind::Continuous,
        }
    }

    pub fn domain(self) -> Domain {
        match self {
            Feature::Age => Domain::between(20.0, 50.0),
            Feature::Gender => Domain::between(0.0, 1.0),
            Feature::EducationLevel => Domain::between(1.0, 4.0),
            Feature::ExperienceYears => Domain::between(0.0, 15.0),
            Feature::PreviousCompanies => Domain::between(1.0, 5.0),
            Feature::DistanceFromCompany => Domain::at_least(0.0),
            Feature::InterviewScore | Feature::SkillScore | Feature::PersonalityScore => {
                Domain::between(0.0, 100.0)
            }
            Feature::RecruitmentStrategy => Domain::between(1.0, 3.0),
        }
    }

    /// Whether `value` satisfies the documented domain, including the code table for
    /// choice fields.
    pub fn accepts(self, value: f64) -> bool {
        match self.kind() {
            FieldKind::Choice(choices) => choices.iter().any(|choice| choice.code as f64 == value),
            FieldKind::Count => value.fract() == 0.0 && self.domain().contains(value),
            FieldKind::Continuous => self.domain().contains(value),
        }
    }

    pub fn from_column(name: &str) -> Option<Feature> {
        Feature::ALL
            .into_iter()
            .find(|feature| feature.column() == name)
    }
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.column())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    #[error("missing column '{0}'")]
    MissingColumn(String),
    #[error("unexpected column '{0}'")]
    UnexpectedColumn(String),
    #[error("column '{0}' appears more than once")]
    DuplicateColumn(String),
    #[error("expected {expected} features but found {found}")]
    LengthMismatch { expected: usize, found: usize },
    #[error("feature {position} is '{found}' but the schema expects '{expected}'")]
    OrderMismatch {
        position: usize,
        expected: String,
        found: String,
    },
    #[error("{column} must be a whole number (got {value})")]
    FractionalCode { column: String, value: f64 },
    #[error("{column} code {value} is outside the supported integer range")]
    CodeOutOfRange { column: String, value: f64 },
}

/// Validation entry points for anything that claims to follow the feature layout.
pub struct FeatureSchema;

impl FeatureSchema {
    pub fn names() -> Vec<String> {
        Feature::ALL
            .iter()
            .map(|feature| feature.column().to_string())
            .collect()
    }

    /// Check a dataset header by name. Order is free; the label column may be present.
    pub fn check_columns<S: AsRef<str>>(header: &[S]) -> Result<(), SchemaError> {
        let mut seen = HashSet::new();
        for name in header {
            let name = name.as_ref();
            if !seen.insert(name) {
                return Err(SchemaError::DuplicateColumn(name.to_string()));
            }
            if name != LABEL_COLUMN && Feature::from_column(name).is_none() {
                return Err(SchemaError::UnexpectedColumn(name.to_string()));
            }
        }

        for feature in Feature::ALL {
            if !seen.contains(feature.column()) {
                return Err(SchemaError::MissingColumn(feature.column().to_string()));
            }
        }

        Ok(())
    }

    /// Check a persisted feature list position by position.
    pub fn check_exact<S: AsRef<str>>(names: &[S]) -> Result<(), SchemaError> {
        if names.len() != FEATURE_COUNT {
            return Err(SchemaError::LengthMismatch {
                expected: FEATURE_COUNT,
                found: names.len(),
            });
        }

        for (position, (feature, name)) in Feature::ALL.iter().zip(names).enumerate() {
            if feature.column() != name.as_ref() {
                return Err(SchemaError::OrderMismatch {
                    position,
                    expected: feature.column().to_string(),
                    found: name.as_ref().to_string(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_order_matches_indices() {
        for (idx, feature) in Feature::ALL.iter().enumerate() {
            assert_eq!(feature.index(), idx);
            assert_eq!(Feature::from_column(feature.column()), Some(*feature));
        }
        assert_eq!(FeatureSchema::names()[0], "Age");
        assert_eq!(FeatureSchema::names()[9], "RecruitmentStrategy");
    }

    #[test]
    fn header_check_ignores_order_but_not_names() {
        let mut header = FeatureSchema::names();
        header.reverse();
        header.push(LABEL_COLUMN.to_string());
        FeatureSchema::check_columns(&header).expect("reordered header accepted");

        let mut missing = FeatureSchema::names();
        missing.retain(|name| name != "SkillScore");
        assert_eq!(
            FeatureSchema::check_columns(&missing),
            Err(SchemaError::MissingColumn("SkillScore".to_string()))
        );

        let mut extra = FeatureSchema::names();
        extra.push("Salary".to_string());
        assert_eq!(
            FeatureSchema::check_columns(&extra),
            Err(SchemaError::UnexpectedColumn("Salary".to_string()))
        );
    }

    #[test]
    fn exact_check_rejects_swapped_columns() {
        let mut names = FeatureSchema::names();
        FeatureSchema::check_exact(&names).expect("canonical order accepted");
        names.swap(6, 7);
        match FeatureSchema::check_exact(&names) {
            Err(SchemaError::OrderMismatch { position, .. }) => assert_eq!(position, 6),
            other => panic!("expected order mismatch, got {other:?}"),
        }
        assert!(matches!(
            FeatureSchema::check_exact(&names[..9]),
            Err(SchemaError::LengthMismatch { found: 9, .. })
        ));
    }

    #[test]
    fn choice_fields_accept_only_table_codes() {
        assert!(Feature::Gender.accepts(1.0));
        assert!(!Feature::Gender.accepts(2.0));
        assert!(Feature::EducationLevel.accepts(4.0));
        assert!(!Feature::RecruitmentStrategy.accepts(0.0));
        assert!(!Feature::PreviousCompanies.accepts(2.5));
        assert!(Feature::DistanceFromCompany.accepts(250.0));
        assert!(!Feature::Age.accepts(-3.0));
    }
}
