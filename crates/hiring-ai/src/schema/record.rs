use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{
    DomainPolicy, DomainViolation, Feature, FeatureSchema, FieldKind, SchemaError, FEATURE_COUNT,
};

/// One applicant as described by the ten schema features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApplicantRecord {
    pub age: f64,
    pub gender: i64,
    pub education_level: i64,
    pub experience_years: f64,
    pub previous_companies: i64,
    pub distance_from_company: f64,
    pub interview_score: f64,
    pub skill_score: f64,
    pub personality_score: f64,
    pub recruitment_strategy: i64,
}

impl ApplicantRecord {
    pub fn value(&self, feature: Feature) -> f64 {
        match feature {
            Feature::Age => self.age,
            Feature::Gender => self.gender as f64,
            Feature::EducationLevel => self.education_level as f64,
            Feature::ExperienceYears => self.experience_years,
            Feature::PreviousCompanies => self.previous_companies as f64,
            Feature::DistanceFromCompany => self.distance_from_company,
            Feature::InterviewScore => self.interview_score,
            Feature::SkillScore => self.skill_score,
            Feature::PersonalityScore => self.personality_score,
            Feature::RecruitmentStrategy => self.recruitment_strategy as f64,
        }
    }

    /// Feature vector in schema order. This is the only path from a record to the model.
    pub fn features(&self) -> [f64; FEATURE_COUNT] {
        Feature::ALL.map(|feature| self.value(feature))
    }

    /// Build a record from values laid out in schema order.
    pub fn from_values(values: [f64; FEATURE_COUNT]) -> Result<Self, SchemaError> {
        let code = |feature: Feature| -> Result<i64, SchemaError> {
            let value = values[feature.index()];
            if value.fract() != 0.0 || !value.is_finite() {
                return Err(SchemaError::FractionalCode {
                    column: feature.column().to_string(),
                    value,
                });
            }
            if !FieldKind::fits_code(value) {
                return Err(SchemaError::CodeOutOfRange {
                    column: feature.column().to_string(),
                    value,
                });
            }
            Ok(value as i64)
        };

        Ok(Self {
            age: values[Feature::Age.index()],
            gender: code(Feature::Gender)?,
            education_level: code(Feature::EducationLevel)?,
            experience_years: values[Feature::ExperienceYears.index()],
            previous_companies: code(Feature::PreviousCompanies)?,
            distance_from_company: values[Feature::DistanceFromCompany.index()],
            interview_score: values[Feature::InterviewScore.index()],
            skill_score: values[Feature::SkillScore.index()],
            personality_score: values[Feature::PersonalityScore.index()],
            recruitment_strategy: code(Feature::RecruitmentStrategy)?,
        })
    }

    /// Build a record from column-name keyed values, rejecting missing or unknown names.
    pub fn from_named(named: &BTreeMap<String, f64>) -> Result<Self, SchemaError> {
        let names: Vec<&str> = named.keys().map(String::as_str).collect();
        if let Some(label) = names.iter().find(|name| **name == super::LABEL_COLUMN) {
            return Err(SchemaError::UnexpectedColumn(label.to_string()));
        }
        FeatureSchema::check_columns(&names)?;

        let mut values = [0.0; FEATURE_COUNT];
        for feature in Feature::ALL {
            values[feature.index()] = named[feature.column()];
        }
        Self::from_values(values)
    }

    pub fn domain_violations(&self) -> Vec<DomainViolation> {
        Feature::ALL
            .into_iter()
            .filter_map(|feature| {
                let value = self.value(feature);
                (!feature.accepts(value)).then_some(DomainViolation { feature, value })
            })
            .collect()
    }

    pub fn check(&self, policy: DomainPolicy) -> Result<(), Vec<DomainViolation>> {
        if policy == DomainPolicy::Permissive {
            return Ok(());
        }
        let violations = self.domain_violations();
        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

/// Binary hiring outcome. Discriminants match the dataset label encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
    NotHired = 0,
    Hired = 1,
}

impl Decision {
    pub const CLASSES: [Decision; 2] = [Decision::NotHired, Decision::Hired];

    pub fn from_label(label: i64) -> Option<Self> {
        match label {
            0 => Some(Decision::NotHired),
            1 => Some(Decision::Hired),
            _ => None,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::CLASSES.get(index).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            Decision::NotHired => "Not Hired",
            Decision::Hired => "Hired",
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
