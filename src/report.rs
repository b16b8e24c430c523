use hiring_ai::metrics::AveragedMetrics;
use hiring_ai::schema::Decision;
use hiring_ai::training::{TrainingOptions, TrainingSummary};
use std::io::{self, Write};

/// Print the held-out evaluation the way the trainer reports it on stdout.
pub fn render_training_summary<W: Write>(
    out: &mut W,
    summary: &TrainingSummary,
    options: &TrainingOptions,
) -> io::Result<()> {
    writeln!(out, "\nModel Performance Metrics:")?;
    writeln!(
        out,
        "Trained on {} rows, evaluated on {} held-out rows (seed {}, {} trees)",
        summary.train_rows, summary.test_rows, options.params.seed, options.params.n_trees
    )?;

    writeln!(out, "\nConfusion Matrix:")?;
    writeln!(out, "{:>16}{:>16}{:>16}", "", "Pred Not Hired", "Pred Hired")?;
    for (decision, row) in Decision::CLASSES.iter().zip(summary.confusion.rows()) {
        write!(out, "{:>16}", format!("True {}", decision.label()))?;
        for count in row {
            write!(out, "{:>16}", count)?;
        }
        writeln!(out)?;
    }

    let report = &summary.report;
    writeln!(out, "\nClassification Report:")?;
    writeln!(
        out,
        "{:>14}{:>11}{:>10}{:>10}{:>10}",
        "", "precision", "recall", "f1-score", "support"
    )?;
    for class in &report.classes {
        writeln!(
            out,
            "{:>14}{:>11.2}{:>10.2}{:>10.2}{:>10}",
            class.class_name, class.precision, class.recall, class.f1, class.support
        )?;
    }
    writeln!(out)?;
    writeln!(
        out,
        "{:>14}{:>11}{:>10}{:>10.2}{:>10}",
        "accuracy", "", "", report.accuracy, report.macro_avg.support
    )?;
    averaged_row(out, "macro avg", &report.macro_avg)?;
    averaged_row(out, "weighted avg", &report.weighted_avg)?;

    writeln!(out, "\nAccuracy Score: {:.4}", summary.accuracy())?;

    writeln!(out, "\nFeature Importance:")?;
    for entry in &summary.importances {
        writeln!(out, "{:<22}{:.4}", entry.feature.column(), entry.importance)?;
    }

    writeln!(out, "\nModel saved to {}", options.model_path.display())?;
    if let Some(chart) = &options.chart_path {
        writeln!(out, "Feature importance chart saved to {}", chart.display())?;
    }
    Ok(())
}

fn averaged_row<W: Write>(out: &mut W, label: &str, metrics: &AveragedMetrics) -> io::Result<()> {
    writeln!(
        out,
        "{:>14}{:>11.2}{:>10.2}{:>10.2}{:>10}",
        label, metrics.precision, metrics.recall, metrics.f1, metrics.support
    )
}
