use crate::form::{choice_text, FormOutcome, FormState};
use crate::WINDOW_TITLE;
use eframe::egui::{self, Color32, RichText};
use hiring_ai::artifact::ArtifactError;
use hiring_ai::inference::{Prediction, Predictor};
use hiring_ai::schema::{Decision, DomainPolicy, Feature, FieldKind};

const HIRED_COLOR: Color32 = Color32::from_rgb(34, 139, 34);
const NOT_HIRED_COLOR: Color32 = Color32::from_rgb(200, 40, 40);

enum Screen {
    Form {
        predictor: Predictor,
        form: FormState,
    },
    Unavailable {
        message: String,
    },
}

pub(crate) struct HiringApp {
    screen: Screen,
}

impl HiringApp {
    pub(crate) fn new(loaded: Result<Predictor, ArtifactError>, policy: DomainPolicy) -> Self {
        let screen = match loaded {
            Ok(predictor) => Screen::Form {
                predictor,
                form: FormState::new(policy),
            },
            Err(err) if err.is_not_found() => Screen::Unavailable {
                message: format!("{err}. Run `hiring-ai train` to build the model."),
            },
            Err(err) => Screen::Unavailable {
                message: err.to_string(),
            },
        };
        Self { screen }
    }
}

impl eframe::App for HiringApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| match &mut self.screen {
            Screen::Form { predictor, form } => render_form(ui, predictor, form),
            Screen::Unavailable { message } => {
                if render_unavailable(ui, message) {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            }
        });
    }
}

fn render_form(ui: &mut egui::Ui, predictor: &Predictor, form: &mut FormState) {
    ui.vertical_centered(|ui| {
        ui.heading(RichText::new(WINDOW_TITLE).strong());
    });
    ui.add_space(10.0);

    egui::Grid::new("applicant_fields")
        .num_columns(2)
        .spacing([12.0, 8.0])
        .show(ui, |ui| {
            for feature in Feature::ALL {
                ui.label(field_label(feature));
                match feature.kind() {
                    FieldKind::Choice(choices) => {
                        let selected = form
                            .selected(feature)
                            .map(|choice| choice_text(&choice))
                            .unwrap_or_default();
                        egui::ComboBox::from_id_salt(feature.column())
                            .width(220.0)
                            .selected_text(selected)
                            .show_ui(ui, |ui| {
                                for choice in choices {
                                    let active =
                                        form.selected(feature).map(|c| c.code) == Some(choice.code);
                                    if ui.selectable_label(active, choice_text(choice)).clicked() {
                                        form.select(feature, choice.code);
                                    }
                                }
                            });
                    }
                    FieldKind::Continuous | FieldKind::Count => {
                        ui.add(
                            egui::TextEdit::singleline(form.text_mut(feature)).desired_width(220.0),
                        );
                    }
                }
                ui.end_row();
            }
        });

    ui.add_space(16.0);
    ui.vertical_centered(|ui| {
        if ui.button("Predict").clicked() {
            form.submit(predictor);
        }
    });
    ui.add_space(12.0);

    if let Some(outcome) = form.outcome() {
        ui.group(|ui| {
            ui.set_width(ui.available_width());
            ui.label(RichText::new("Prediction Results").strong());
            match outcome {
                FormOutcome::Predicted(prediction) => render_prediction(ui, prediction),
                FormOutcome::Invalid(errors) => {
                    ui.label(RichText::new("Invalid input").color(NOT_HIRED_COLOR));
                    for error in errors {
                        ui.label(format!("- {error}"));
                    }
                }
            }
        });
    }
}

fn render_prediction(ui: &mut egui::Ui, prediction: &Prediction) {
    let color = match prediction.decision {
        Decision::Hired => HIRED_COLOR,
        Decision::NotHired => NOT_HIRED_COLOR,
    };
    ui.label(
        RichText::new(format!("Decision: {}", prediction.decision))
            .size(16.0)
            .color(color),
    );
    ui.label(format!("Confidence: {:.2}%", prediction.confidence() * 100.0));
    ui.label(format!(
        "Probability of Not Hiring: {:.2}%",
        prediction.probability_of(Decision::NotHired) * 100.0
    ));
    ui.label(format!(
        "Probability of Hiring: {:.2}%",
        prediction.probability_of(Decision::Hired) * 100.0
    ));
}

/// Returns true when the user asked to close the window.
fn render_unavailable(ui: &mut egui::Ui, message: &str) -> bool {
    let mut close = false;
    ui.vertical_centered(|ui| {
        ui.add_space(40.0);
        ui.heading(RichText::new("Model not available").color(NOT_HIRED_COLOR));
        ui.add_space(8.0);
        ui.label(message);
        ui.add_space(16.0);
        close = ui.button("Close").clicked();
    });
    close
}

fn field_label(feature: Feature) -> String {
    let domain = feature.domain();
    match feature.kind() {
        FieldKind::Choice(_) => format!("{}:", feature.label()),
        _ if domain.max.is_some() => format!("{} ({}):", feature.label(), domain.describe()),
        _ => format!("{}:", feature.label()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn missing_model_opens_the_unavailable_screen() {
        let loaded = Predictor::load(Path::new("no-such-dir/recruitment_model.json"));
        let app = HiringApp::new(loaded, DomainPolicy::Permissive);
        match &app.screen {
            Screen::Unavailable { message } => {
                assert!(message.contains("model not found"));
                assert!(message.contains("hiring-ai train"));
            }
            Screen::Form { .. } => panic!("form shown without a model"),
        }
    }

    #[test]
    fn unreadable_model_reports_the_load_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("recruitment_model.json");
        std::fs::write(&path, "not json").expect("artifact written");

        let app = HiringApp::new(Predictor::load(&path), DomainPolicy::Permissive);
        match &app.screen {
            Screen::Unavailable { message } => assert!(!message.contains("hiring-ai train")),
            Screen::Form { .. } => panic!("form shown for a corrupt model"),
        }
    }
}
