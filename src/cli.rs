use crate::console::ConsoleSession;
use crate::report::render_training_summary;
use clap::{Args, Parser, Subcommand};
use hiring_ai::config::AppConfig;
use hiring_ai::error::AppError;
use hiring_ai::inference::Predictor;
use hiring_ai::schema::DomainPolicy;
use hiring_ai::telemetry;
use hiring_ai::training::{TrainingOptions, TrainingPipeline};
use std::io;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "hiring-ai",
    about = "Train the hiring decision model and predict outcomes for applicants",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactively predict hiring decisions (default command)
    Predict(PredictArgs),
    /// Train the model from a labeled recruitment dataset
    Train(TrainArgs),
}

#[derive(Args, Debug, Default)]
struct PredictArgs {
    /// Override the configured model artifact path
    #[arg(long)]
    model: Option<PathBuf>,
    /// Reject values outside each field's documented range
    #[arg(long)]
    enforce_domains: bool,
}

#[derive(Args, Debug, Default)]
struct TrainArgs {
    /// Override the configured dataset path
    #[arg(long)]
    data: Option<PathBuf>,
    /// Override the configured model artifact path
    #[arg(long)]
    model: Option<PathBuf>,
    /// Override the configured feature importance chart path
    #[arg(long)]
    chart: Option<PathBuf>,
    /// Skip writing the feature importance chart
    #[arg(long, conflicts_with = "chart")]
    no_chart: bool,
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let command = cli
        .command
        .unwrap_or_else(|| Command::Predict(PredictArgs::default()));

    match command {
        Command::Predict(args) => run_predict(config, args),
        Command::Train(args) => run_train(config, args),
    }
}

fn run_predict(mut config: AppConfig, args: PredictArgs) -> Result<(), AppError> {
    if let Some(model) = args.model {
        config.paths.model = model;
    }
    if args.enforce_domains {
        config.intake.policy = DomainPolicy::Enforced;
    }

    let predictor = Predictor::load(&config.paths.model)?;
    info!(
        ?config.environment,
        model = %config.paths.model.display(),
        policy = ?config.intake.policy,
        "predictor ready"
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut session = ConsoleSession::new(stdin.lock(), stdout.lock(), config.intake.policy);
    let predictions = session.run(&predictor)?;
    info!(predictions, "prediction session finished");
    Ok(())
}

fn run_train(mut config: AppConfig, args: TrainArgs) -> Result<(), AppError> {
    let TrainArgs {
        data,
        model,
        chart,
        no_chart,
    } = args;

    if let Some(data) = data {
        config.paths.data = data;
    }
    if let Some(model) = model {
        config.paths.model = model;
    }
    if let Some(chart) = chart {
        config.paths.chart = chart;
    }

    let mut options = TrainingOptions::from_config(&config);
    if no_chart {
        options.chart_path = None;
    }

    info!(?config.environment, data = %options.data_path.display(), "training started");
    let summary = TrainingPipeline::new(options.clone()).run()?;

    let stdout = io::stdout();
    render_training_summary(&mut stdout.lock(), &summary, &options)?;
    Ok(())
}
