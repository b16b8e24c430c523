use crate::schema::DomainPolicy;
use std::env;
use std::fmt;
use std::path::PathBuf;

pub const DEFAULT_DATA_PATH: &str = "recruitment_data.csv";
pub const DEFAULT_MODEL_PATH: &str = "recruitment_model.json";
pub const DEFAULT_CHART_PATH: &str = "feature_importance.png";
pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_TEST_FRACTION: f64 = 0.2;
pub const DEFAULT_TREES: usize = 100;

/// Distinguishes runtime behavior for different stages of deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration shared by the trainer and both front-ends.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub paths: PathConfig,
    pub training: TrainingConfig,
    pub intake: IntakeConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let paths = PathConfig {
            data: path_var("HIRING_DATA_PATH", DEFAULT_DATA_PATH),
            model: path_var("HIRING_MODEL_PATH", DEFAULT_MODEL_PATH),
            chart: path_var("HIRING_CHART_PATH", DEFAULT_CHART_PATH),
        };

        let seed = match env::var("HIRING_SEED") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidSeed)?,
            Err(_) => DEFAULT_SEED,
        };

        let test_fraction = match env::var("HIRING_TEST_FRACTION") {
            Ok(raw) => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|value| *value > 0.0 && *value < 1.0)
                .ok_or(ConfigError::InvalidTestFraction)?,
            Err(_) => DEFAULT_TEST_FRACTION,
        };

        let n_trees = match env::var("HIRING_TREES") {
            Ok(raw) => raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|value| *value > 0)
                .ok_or(ConfigError::InvalidTreeCount)?,
            Err(_) => DEFAULT_TREES,
        };

        let enforce_domains = match env::var("HIRING_ENFORCE_DOMAINS") {
            Ok(raw) => parse_flag(&raw).ok_or(ConfigError::InvalidDomainFlag)?,
            Err(_) => false,
        };

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            paths,
            training: TrainingConfig {
                seed,
                test_fraction,
                n_trees,
            },
            intake: IntakeConfig {
                policy: if enforce_domains {
                    DomainPolicy::Enforced
                } else {
                    DomainPolicy::Permissive
                },
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Filesystem locations for the dataset and the training outputs.
#[derive(Debug, Clone)]
pub struct PathConfig {
    pub data: PathBuf,
    pub model: PathBuf,
    pub chart: PathBuf,
}

/// Reproducibility knobs for the split and the forest.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingConfig {
    pub seed: u64,
    pub test_fraction: f64,
    pub n_trees: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            test_fraction: DEFAULT_TEST_FRACTION,
            n_trees: DEFAULT_TREES,
        }
    }
}

/// How front-ends treat values outside the documented domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntakeConfig {
    pub policy: DomainPolicy,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidSeed,
    InvalidTestFraction,
    InvalidTreeCount,
    InvalidDomainFlag,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidSeed => write!(f, "HIRING_SEED must be a valid u64"),
            ConfigError::InvalidTestFraction => {
                write!(f, "HIRING_TEST_FRACTION must be a number between 0 and 1")
            }
            ConfigError::InvalidTreeCount => {
                write!(f, "HIRING_TREES must be a positive integer")
            }
            ConfigError::InvalidDomainFlag => {
                write!(f, "HIRING_ENFORCE_DOMAINS must be true or false")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

fn path_var(key: &str, default: &str) -> PathBuf {
    env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(default))
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
