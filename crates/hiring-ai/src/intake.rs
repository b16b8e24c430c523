//! Text-to-record coercion shared by the console loop and the desktop form.

use crate::schema::{
    ApplicantRecord, DomainPolicy, DomainViolation, Feature, FieldKind, SchemaError,
    FEATURE_COUNT,
};

/// Problem with a single raw field value.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FieldError {
    #[error("{} is empty", .feature.label())]
    Empty { feature: Feature },
    #[error("{} must be a number (got '{raw}')", .feature.label())]
    NotNumeric { feature: Feature, raw: String },
    #[error("{} must be a whole number (got {value})", .feature.label())]
    NotWhole { feature: Feature, value: f64 },
    #[error("{} is outside the whole-number range (got {value:e})", .feature.label())]
    CodeOutOfRange { feature: Feature, value: f64 },
    #[error("{} has no option with code {code}", .feature.label())]
    UnknownChoice { feature: Feature, code: i64 },
    #[error("{0}")]
    OutOfRange(DomainViolation),
}

impl FieldError {
    pub fn feature(&self) -> Feature {
        match self {
            FieldError::Empty { feature }
            | FieldError::NotNumeric { feature, .. }
            | FieldError::NotWhole { feature, .. }
            | FieldError::CodeOutOfRange { feature, .. }
            | FieldError::UnknownChoice { feature, .. } => *feature,
            FieldError::OutOfRange(violation) => violation.feature,
        }
    }
}

/// Coerce one raw value to the feature's numeric representation.
pub fn parse_field(feature: Feature, raw: &str, policy: DomainPolicy) -> Result<f64, FieldError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(FieldError::Empty { feature });
    }

    let value = trimmed
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| FieldError::NotNumeric {
            feature,
            raw: trimmed.to_string(),
        })?;

    if feature.kind().is_whole() {
        if value.fract() != 0.0 {
            return Err(FieldError::NotWhole { feature, value });
        }
        if !FieldKind::fits_code(value) {
            return Err(FieldError::CodeOutOfRange { feature, value });
        }
    }

    if policy == DomainPolicy::Enforced {
        let kind = feature.kind();
        if !kind.choices().is_empty() && kind.label_for(value as i64).is_none() {
            return Err(FieldError::UnknownChoice {
                feature,
                code: value as i64,
            });
        }
        if !feature.accepts(value) {
            return Err(FieldError::OutOfRange(DomainViolation { feature, value }));
        }
    }

    Ok(value)
}

/// Raw text for all ten fields, as typed by a user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplicantDraft {
    values: [String; FEATURE_COUNT],
}

impl ApplicantDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, feature: Feature) -> &str {
        &self.values[feature.index()]
    }

    pub fn get_mut(&mut self, feature: Feature) -> &mut String {
        &mut self.values[feature.index()]
    }

    pub fn set(&mut self, feature: Feature, raw: impl Into<String>) {
        self.values[feature.index()] = raw.into();
    }

    /// Select a code from a choice field's table.
    pub fn select(&mut self, feature: Feature, code: i64) {
        debug_assert!(matches!(feature.kind(), FieldKind::Choice(_)));
        self.set(feature, code.to_string());
    }

    /// Parse every field, collecting all errors rather than stopping at the first.
    pub fn parse(&self, policy: DomainPolicy) -> Result<ApplicantRecord, Vec<FieldError>> {
        let mut values = [0.0; FEATURE_COUNT];
        let mut errors = Vec::new();

        for feature in Feature::ALL {
            match parse_field(feature, self.get(feature), policy) {
                Ok(value) => values[feature.index()] = value,
                Err(err) => errors.push(err),
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        ApplicantRecord::from_values(values).map_err(|err| match err {
            SchemaError::FractionalCode { column, value } => Feature::from_column(&column)
                .map(|feature| FieldError::NotWhole { feature, value })
                .into_iter()
                .collect(),
            SchemaError::CodeOutOfRange { column, value } => Feature::from_column(&column)
                .map(|feature| FieldError::CodeOutOfRange { feature, value })
                .into_iter()
                .collect(),
            _ => Vec::new(),
        })
    }
}

impl From<&ApplicantRecord> for ApplicantDraft {
    fn from(record: &ApplicantRecord) -> Self {
        let mut draft = ApplicantDraft::new();
        for feature in Feature::ALL {
            draft.set(feature, record.value(feature).to_string());
        }
        draft
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> ApplicantDraft {
        let mut draft = ApplicantDraft::new();
        for (feature, raw) in Feature::ALL.into_iter().zip([
            "30", "1", "2", "5", "2", "10", "75", "80", "70", "1",
        ]) {
            draft.set(feature, raw);
        }
        draft
    }

    #[test]
    fn parses_complete_draft() {
        let record = filled().parse(DomainPolicy::Permissive).expect("valid");
        assert_eq!(record.age, 30.0);
        assert_eq!(record.recruitment_strategy, 1);
        assert_eq!(record.skill_score, 80.0);
    }

    #[test]
    fn reports_every_bad_field() {
        let mut draft = filled();
        draft.set(Feature::Age, "  ");
        draft.set(Feature::SkillScore, "eighty");
        draft.set(Feature::PreviousCompanies, "2.5");

        let errors = draft
            .parse(DomainPolicy::Permissive)
            .expect_err("errors reported");
        assert_eq!(
            errors,
            vec![
                FieldError::Empty {
                    feature: Feature::Age
                },
                FieldError::NotWhole {
                    feature: Feature::PreviousCompanies,
                    value: 2.5
                },
                FieldError::NotNumeric {
                    feature: Feature::SkillScore,
                    raw: "eighty".to_string()
                },
            ]
        );
    }

    #[test]
    fn rejects_non_finite_input() {
        let err = parse_field(Feature::InterviewScore, "NaN", DomainPolicy::Permissive)
            .expect_err("nan rejected");
        assert!(matches!(err, FieldError::NotNumeric { .. }));
    }

    #[test]
    fn permissive_policy_accepts_out_of_range_values() {
        let mut draft = filled();
        draft.set(Feature::Age, "-5");
        draft.set(Feature::Gender, "3");
        let record = draft.parse(DomainPolicy::Permissive).expect("accepted");
        assert_eq!(record.age, -5.0);
        assert_eq!(record.gender, 3);
    }

    #[test]
    fn huge_codes_are_rejected_under_either_policy() {
        for policy in [DomainPolicy::Permissive, DomainPolicy::Enforced] {
            let err = parse_field(Feature::Gender, "1e300", policy).expect_err("code rejected");
            assert_eq!(
                err,
                FieldError::CodeOutOfRange {
                    feature: Feature::Gender,
                    value: 1e300
                }
            );
            assert_eq!(
                err.to_string(),
                "Gender is outside the whole-number range (got 1e300)"
            );
        }

        let mut draft = filled();
        draft.set(Feature::PreviousCompanies, "-1e19");
        let errors = draft
            .parse(DomainPolicy::Permissive)
            .expect_err("count rejected");
        assert_eq!(errors[0].feature(), Feature::PreviousCompanies);

        assert_eq!(
            parse_field(Feature::InterviewScore, "1e300", DomainPolicy::Permissive),
            Ok(1e300)
        );
    }

    #[test]
    fn enforced_policy_rejects_out_of_range_values() {
        let mut draft = filled();
        draft.set(Feature::Age, "65");
        let errors = draft
            .parse(DomainPolicy::Enforced)
            .expect_err("age rejected");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].feature(), Feature::Age);
        assert_eq!(errors[0].to_string(), "Age must be 20-50 (got 65)");
    }

    #[test]
    fn enforced_policy_rejects_unknown_codes() {
        let err = parse_field(Feature::EducationLevel, "7", DomainPolicy::Enforced)
            .expect_err("code rejected");
        assert_eq!(
            err,
            FieldError::UnknownChoice {
                feature: Feature::EducationLevel,
                code: 7
            }
        );
        assert_eq!(
            parse_field(Feature::EducationLevel, "4", DomainPolicy::Enforced),
            Ok(4.0)
        );
    }

    #[test]
    fn draft_round_trips_from_record() {
        let record = filled().parse(DomainPolicy::Enforced).expect("valid");
        let draft = ApplicantDraft::from(&record);
        assert_eq!(draft.parse(DomainPolicy::Enforced).expect("valid"), record);
    }
}
