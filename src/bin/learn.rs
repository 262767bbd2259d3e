//! Trains the procedure classifier with a single 80/20 holdout: every
//! fifth record is set aside and doubles as both the validation set during
//! training and the final evaluation set. Writes the training curves
//! (CSV + SVG) and the model artifact under `data/`.

use std::path::Path;

use anyhow::{Context, Result};

use procedure_net::report::svg;
use procedure_net::{
    evaluate, holdout_split, train_loop, Dataset, ModelMetadata, Network, RmsProp, TrainConfig,
    TrainingHistory, FEATURE_DIM,
};

const FEATURES_PATH: &str = "data/procedure-learning-data-input.json";
const LABELS_PATH: &str = "data/procedure-learning-data-output.json";
const MODEL_PATH: &str = "data/procedure-model.json";
const LOG_DIR: &str = "data/train-log";

const EPOCHS: usize = 40;
const BATCH_SIZE: usize = 128;
const LEARNING_RATE: f64 = 0.001;

fn main() -> Result<()> {
    env_logger::init();

    let dataset =
        Dataset::from_files(FEATURES_PATH, LABELS_PATH).context("loading learning data")?;
    anyhow::ensure!(
        dataset.feature_dim() == FEATURE_DIM,
        "expected {FEATURE_DIM}-dimensional features, got {}",
        dataset.feature_dim()
    );
    let (train, holdout) = holdout_split(&dataset);
    log::info!(
        "{} records: {} train, {} held out ({} features each)",
        dataset.len(),
        train.len(),
        holdout.len(),
        dataset.feature_dim()
    );

    let mut network = Network::procedure_classifier(dataset.feature_dim());
    network.metadata = Some(ModelMetadata {
        description: Some("Classifies recipe-page text nodes as procedure steps".into()),
        feature_dim: Some(dataset.feature_dim()),
        output_labels: Some(vec!["other".into(), "procedure".into()]),
    });

    let mut optimizer = RmsProp::new(LEARNING_RATE);
    let config = TrainConfig::new(EPOCHS, BATCH_SIZE);
    let mut history = TrainingHistory::create(LOG_DIR).context("creating the run log")?;

    train_loop(
        &mut network,
        &train.features,
        &train.labels,
        Some((&holdout.features, &holdout.labels)),
        &mut optimizer,
        &config,
        |stats| history.record(stats),
    );

    let (test_loss, test_accuracy) = evaluate(&mut network, &holdout.features, &holdout.labels);
    println!("Test loss: {test_loss}");
    println!("Test accuracy: {test_accuracy}");

    network
        .save_json(MODEL_PATH)
        .context("saving the model artifact")?;
    svg::render_curves(history.stats(), Path::new(LOG_DIR))
        .context("rendering training curves")?;
    log::info!("model saved to {MODEL_PATH}, curves under {LOG_DIR}/");

    Ok(())
}
