//! Persisted model artifact: the fitted forest plus the schema it was fitted against.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::forest::{ForestError, ForestParams, RandomForest};
use crate::schema::{Decision, FeatureSchema, SchemaError, FEATURE_COUNT};

pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("model not found at {}; train a model first", .path.display())]
    NotFound { path: PathBuf },
    #[error("failed to access model artifact {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to encode model artifact: {0}")]
    Encode(serde_json::Error),
    #[error("model artifact is not valid JSON: {0}")]
    Decode(serde_json::Error),
    #[error("unsupported model artifact version {found} (expected {})", ARTIFACT_FORMAT_VERSION)]
    UnsupportedVersion { found: u32 },
    #[error("model artifact was trained on a different feature schema: {0}")]
    Schema(#[from] SchemaError),
    #[error("model artifact classes {found:?} do not match Not Hired/Hired")]
    ClassMismatch { found: Vec<String> },
    #[error("model artifact is corrupt: {0}")]
    Malformed(#[from] ForestError),
}

impl ArtifactError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ArtifactError::NotFound { .. })
    }
}

/// Serialized classifier handed from the trainer to the front-ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    pub trained_at: DateTime<Utc>,
    /// Column names in the order the forest consumes them.
    pub feature_names: Vec<String>,
    pub classes: Vec<String>,
    pub params: ForestParams,
    pub forest: RandomForest,
}

impl ModelArtifact {
    pub fn new(forest: RandomForest, params: ForestParams) -> Self {
        Self {
            format_version: ARTIFACT_FORMAT_VERSION,
            trained_at: Utc::now(),
            feature_names: FeatureSchema::names(),
            classes: class_names(),
            params,
            forest,
        }
    }

    /// Write the artifact, replacing any previous file at `path`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ArtifactError> {
        let path = path.as_ref();
        let io_err = |source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let file = File::create(path).map_err(io_err)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, self).map_err(ArtifactError::Encode)?;
        writer.flush().map_err(io_err)?;

        info!(path = %path.display(), trees = self.forest.trees().len(), "model artifact written");
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ArtifactError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                ArtifactError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        let artifact = Self::from_reader(BufReader::new(file))?;
        info!(
            path = %path.display(),
            trained_at = %artifact.trained_at,
            "model artifact loaded"
        );
        Ok(artifact)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ArtifactError> {
        let artifact: Self = serde_json::from_reader(reader).map_err(ArtifactError::Decode)?;
        artifact.validate()?;
        Ok(artifact)
    }

    /// Reject artifacts whose schema, classes or tree structure do not line up with this build.
    pub fn validate(&self) -> Result<(), ArtifactError> {
        if self.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(ArtifactError::UnsupportedVersion {
                found: self.format_version,
            });
        }
        FeatureSchema::check_exact(&self.feature_names)?;
        if self.classes != class_names() {
            return Err(ArtifactError::ClassMismatch {
                found: self.classes.clone(),
            });
        }
        if self.forest.n_features() != FEATURE_COUNT {
            return Err(SchemaError::LengthMismatch {
                expected: FEATURE_COUNT,
                found: self.forest.n_features(),
            }
            .into());
        }
        if self.forest.n_classes() != Decision::CLASSES.len() {
            return Err(ForestError::Malformed(format!(
                "forest predicts {} classes",
                self.forest.n_classes()
            ))
            .into());
        }
        self.forest.validate()?;
        Ok(())
    }
}

fn class_names() -> Vec<String> {
    Decision::CLASSES
        .iter()
        .map(|decision| decision.label().to_string())
        .collect()
}
