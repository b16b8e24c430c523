use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::artifact::{ArtifactError, ModelArtifact};
use crate::forest::argmax;
use crate::schema::{ApplicantRecord, Decision};

/// Outcome of a single prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub decision: Decision,
    /// `[P(Not Hired), P(Hired)]`.
    pub probabilities: [f64; 2],
}

impl Prediction {
    /// Probability mass assigned to the predicted class.
    pub fn confidence(&self) -> f64 {
        self.probabilities[self.decision.index()]
    }

    pub fn probability_of(&self, decision: Decision) -> f64 {
        self.probabilities[decision.index()]
    }
}

/// Loaded model, read-only after construction.
#[derive(Debug, Clone)]
pub struct Predictor {
    artifact: ModelArtifact,
}

impl Predictor {
    pub fn new(artifact: ModelArtifact) -> Result<Self, ArtifactError> {
        artifact.validate()?;
        Ok(Self { artifact })
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ArtifactError> {
        ModelArtifact::load(path).map(|artifact| Self { artifact })
    }

    pub fn artifact(&self) -> &ModelArtifact {
        &self.artifact
    }

    /// Score one applicant. No domain checks happen here; front-ends decide whether to
    /// enforce them before calling.
    pub fn predict(&self, record: &ApplicantRecord) -> Prediction {
        let proba = self.artifact.forest.predict_proba(&record.features());
        let probabilities = [proba[0], proba[1]];
        let decision = Decision::from_index(argmax(&probabilities)).unwrap_or(Decision::NotHired);
        debug!(
            %decision,
            p_not_hired = probabilities[0],
            p_hired = probabilities[1],
            "prediction made"
        );
        Prediction {
            decision,
            probabilities,
        }
    }
}
