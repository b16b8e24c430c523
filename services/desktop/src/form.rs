//! Form state behind the desktop window, kept free of UI types so it can be tested.

use hiring_ai::inference::{Prediction, Predictor};
use hiring_ai::intake::{ApplicantDraft, FieldError};
use hiring_ai::schema::{Choice, DomainPolicy, Feature};

/// What the results panel shows after the last submit.
#[derive(Debug, Clone, PartialEq)]
pub enum FormOutcome {
    Predicted(Prediction),
    Invalid(Vec<FieldError>),
}

#[derive(Debug, Clone)]
pub struct FormState {
    draft: ApplicantDraft,
    policy: DomainPolicy,
    outcome: Option<FormOutcome>,
}

impl FormState {
    /// Empty text fields; each drop-down starts on its first option.
    pub fn new(policy: DomainPolicy) -> Self {
        let mut draft = ApplicantDraft::new();
        for feature in Feature::ALL {
            if let Some(first) = feature.kind().choices().first() {
                draft.select(feature, first.code);
            }
        }
        Self {
            draft,
            policy,
            outcome: None,
        }
    }

    pub fn text_mut(&mut self, feature: Feature) -> &mut String {
        self.draft.get_mut(feature)
    }

    pub fn selected(&self, feature: Feature) -> Option<Choice> {
        let code = self.draft.get(feature).parse::<i64>().ok()?;
        feature
            .kind()
            .choices()
            .iter()
            .find(|choice| choice.code == code)
            .copied()
    }

    pub fn select(&mut self, feature: Feature, code: i64) {
        self.draft.select(feature, code);
    }

    /// Validate the form and predict. Any field error replaces the previous result.
    pub fn submit(&mut self, predictor: &Predictor) -> &FormOutcome {
        let outcome = match self.draft.parse(self.policy) {
            Ok(record) => FormOutcome::Predicted(predictor.predict(&record)),
            Err(errors) => FormOutcome::Invalid(errors),
        };
        self.outcome.insert(outcome)
    }

    pub fn outcome(&self) -> Option<&FormOutcome> {
        self.outcome.as_ref()
    }
}

pub fn choice_text(choice: &Choice) -> String {
    format!("{} ({})", choice.label, choice.code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hiring_ai::artifact::ModelArtifact;
    use hiring_ai::forest::{ForestParams, RandomForest};
    use hiring_ai::schema::{Decision, FEATURE_COUNT};

    fn predictor() -> Predictor {
        let x: Vec<Vec<f64>> = (0..30)
            .map(|i| {
                let mut row = vec![1.0; FEATURE_COUNT];
                row[Feature::InterviewScore.index()] =
                    if i % 2 == 0 { 80.0 + (i % 7) as f64 } else { 20.0 + (i % 7) as f64 };
                row
            })
            .collect();
        let y: Vec<usize> = (0..30).map(|i| usize::from(i % 2 == 0)).collect();
        let params = ForestParams {
            n_trees: 5,
            ..ForestParams::default()
        };
        let forest = RandomForest::fit(&x, &y, 2, &params).expect("forest fits");
        Predictor::new(ModelArtifact::new(forest, params)).expect("artifact valid")
    }

    fn fill(form: &mut FormState, interview: &str) {
        for (feature, raw) in [
            (Feature::Age, "30"),
            (Feature::ExperienceYears, "5"),
            (Feature::PreviousCompanies, "2"),
            (Feature::DistanceFromCompany, "10"),
            (Feature::InterviewScore, interview),
            (Feature::SkillScore, "80"),
            (Feature::PersonalityScore, "70"),
        ] {
            *form.text_mut(feature) = raw.to_string();
        }
    }

    #[test]
    fn dropdowns_start_on_first_choice() {
        let form = FormState::new(DomainPolicy::Permissive);
        assert_eq!(form.selected(Feature::Gender).map(|c| c.code), Some(0));
        assert_eq!(form.selected(Feature::EducationLevel).map(|c| c.code), Some(1));
        assert_eq!(
            form.selected(Feature::RecruitmentStrategy).map(|c| c.label),
            Some("Direct Application")
        );
        assert!(form.outcome().is_none());
    }

    #[test]
    fn selecting_a_choice_stores_its_code() {
        let mut form = FormState::new(DomainPolicy::Enforced);
        form.select(Feature::EducationLevel, 4);
        assert_eq!(
            form.selected(Feature::EducationLevel).map(|c| choice_text(&c)),
            Some("PhD (4)".to_string())
        );
    }

    #[test]
    fn submit_predicts_for_a_complete_form() {
        let predictor = predictor();
        let mut form = FormState::new(DomainPolicy::Permissive);
        fill(&mut form, "85");
        match form.submit(&predictor) {
            FormOutcome::Predicted(prediction) => assert_eq!(prediction.decision, Decision::Hired),
            other => panic!("expected prediction, got {other:?}"),
        }
    }

    #[test]
    fn field_errors_replace_the_previous_result() {
        let predictor = predictor();
        let mut form = FormState::new(DomainPolicy::Permissive);
        fill(&mut form, "85");
        form.submit(&predictor);

        *form.text_mut(Feature::InterviewScore) = String::new();
        *form.text_mut(Feature::Age) = "thirty".to_string();
        match form.submit(&predictor) {
            FormOutcome::Invalid(errors) => {
                let features: Vec<Feature> = errors.iter().map(FieldError::feature).collect();
                assert_eq!(features, vec![Feature::Age, Feature::InterviewScore]);
            }
            other => panic!("expected field errors, got {other:?}"),
        }
        assert!(matches!(form.outcome(), Some(FormOutcome::Invalid(_))));
    }
}
