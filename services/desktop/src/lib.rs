mod app;
pub mod form;

use app::HiringApp;
use eframe::egui;
use hiring_ai::config::{AppConfig, ConfigError};
use hiring_ai::error::AppError;
use hiring_ai::inference::Predictor;
use hiring_ai::telemetry::{self, TelemetryError};
use std::fmt;
use tracing::{info, warn};

pub const WINDOW_TITLE: &str = "Recruitment Prediction System";

#[derive(Debug)]
pub enum DesktopError {
    App(AppError),
    Ui(eframe::Error),
}

impl fmt::Display for DesktopError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DesktopError::App(err) => write!(f, "{}", err),
            DesktopError::Ui(err) => write!(f, "window error: {}", err),
        }
    }
}

impl std::error::Error for DesktopError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DesktopError::App(err) => Some(err),
            DesktopError::Ui(err) => Some(err),
        }
    }
}

impl From<AppError> for DesktopError {
    fn from(value: AppError) -> Self {
        Self::App(value)
    }
}

impl From<ConfigError> for DesktopError {
    fn from(value: ConfigError) -> Self {
        Self::App(value.into())
    }
}

impl From<TelemetryError> for DesktopError {
    fn from(value: TelemetryError) -> Self {
        Self::App(value.into())
    }
}

pub fn run() -> Result<(), DesktopError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    // A load failure still opens the window so the user sees why no form is offered.
    let loaded = Predictor::load(&config.paths.model);
    match &loaded {
        Ok(_) => info!(model = %config.paths.model.display(), "predictor ready"),
        Err(err) => warn!(error = %err, "model unavailable"),
    }
    let app = HiringApp::new(loaded, config.intake.policy);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([520.0, 640.0])
            .with_min_inner_size([420.0, 520.0])
            .with_title(WINDOW_TITLE),
        ..Default::default()
    };
    eframe::run_native(
        WINDOW_TITLE,
        options,
        Box::new(|_cc| Ok(Box::new(app))),
    )
    .map_err(DesktopError::Ui)
}
