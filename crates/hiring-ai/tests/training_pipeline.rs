use std::path::{Path, PathBuf};

use hiring_ai::artifact::ModelArtifact;
use hiring_ai::dataset::DatasetError;
use hiring_ai::forest::ForestParams;
use hiring_ai::schema::{Feature, SchemaError};
use hiring_ai::training::{TrainingError, TrainingOptions, TrainingPipeline};

fn fixture_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/recruitment_fixture.csv")
}

fn options(dir: &Path, data_path: PathBuf) -> TrainingOptions {
    TrainingOptions {
        data_path,
        model_path: dir.join("model").join("recruitment_model.json"),
        chart_path: Some(dir.join("feature_importance.png")),
        test_fraction: 0.2,
        params: ForestParams::default(),
    }
}

#[test]
fn training_writes_artifact_and_chart() {
    let dir = tempfile::tempdir().expect("tempdir");
    let options = options(dir.path(), fixture_path());
    let summary = TrainingPipeline::new(options.clone())
        .run()
        .expect("training succeeds");

    assert_eq!(summary.train_rows, 48);
    assert_eq!(summary.test_rows, 12);
    assert_eq!(summary.confusion.total(), 12);
    assert_eq!(summary.accuracy(), 1.0);

    let top: Vec<Feature> = summary.importances.iter().take(2).map(|i| i.feature).collect();
    assert!(top.contains(&Feature::InterviewScore));
    assert!(top.contains(&Feature::SkillScore));
    let total: f64 = summary.importances.iter().map(|i| i.importance).sum();
    assert!((total - 1.0).abs() < 1e-9);

    let artifact = ModelArtifact::load(&options.model_path).expect("artifact written");
    assert_eq!(artifact.forest.trees().len(), 100);
    assert_eq!(artifact.params, ForestParams::default());

    let chart_path = options.chart_path.expect("chart path");
    let chart = image::open(&chart_path).expect("chart is a png");
    assert!(chart.height() > 0);
}

#[test]
fn sample_fixture_evaluation_matches_recorded_output() {
    let dir = tempfile::tempdir().expect("tempdir");
    let data_path =
        Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/recruitment_sample.csv");
    let mut options = options(dir.path(), data_path);
    options.chart_path = None;
    let summary = TrainingPipeline::new(options).run().expect("training succeeds");

    assert_eq!(summary.train_rows, 64);
    assert_eq!(summary.test_rows, 16);
    assert_eq!(summary.confusion.rows(), vec![vec![9, 2], vec![1, 4]]);
    assert_eq!(summary.accuracy(), 0.8125);
    assert_eq!(summary.importances[0].feature, Feature::InterviewScore);
    assert_eq!(summary.importances[1].feature, Feature::SkillScore);
}

#[test]
fn retraining_reproduces_the_evaluation() {
    let dir = tempfile::tempdir().expect("tempdir");
    let first = TrainingPipeline::new(options(dir.path(), fixture_path()))
        .run()
        .expect("first run");
    let second = TrainingPipeline::new(options(dir.path(), fixture_path()))
        .run()
        .expect("second run overwrites outputs");

    assert_eq!(first.confusion, second.confusion);
    assert_eq!(first.accuracy(), second.accuracy());
    assert_eq!(first.importances, second.importances);
}

#[test]
fn missing_dataset_fails_before_writing_anything() {
    let dir = tempfile::tempdir().expect("tempdir");
    let options = options(dir.path(), dir.path().join("absent.csv"));
    let err = TrainingPipeline::new(options.clone())
        .run()
        .expect_err("dataset missing");

    assert!(matches!(err, TrainingError::Dataset(DatasetError::Io(_))));
    assert!(!options.model_path.exists());
}

#[test]
fn schema_mismatch_halts_training() {
    let dir = tempfile::tempdir().expect("tempdir");
    let data_path = dir.path().join("renamed.csv");
    std::fs::write(
        &data_path,
        "Age,Gender,Education,ExperienceYears,PreviousCompanies,DistanceFromCompany,InterviewScore,SkillScore,PersonalityScore,RecruitmentStrategy,HiringDecision\n\
30,1,2,5,2,10,75,80,70,1,1\n",
    )
    .expect("csv written");

    let options = options(dir.path(), data_path);
    let err = TrainingPipeline::new(options.clone())
        .run()
        .expect_err("schema mismatch");

    match err {
        TrainingError::Dataset(DatasetError::Schema(SchemaError::UnexpectedColumn(column))) => {
            assert_eq!(column, "Education")
        }
        other => panic!("expected schema error, got {other:?}"),
    }
    assert!(!options.model_path.exists());
}
