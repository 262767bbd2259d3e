//! Trains the procedure classifier with a genuinely held-out test set:
//! every fifth record is split by parity into a validation half (monitored
//! during training) and a test half that is only touched for the final
//! score. Writes the training curves as CSV and the model artifact under
//! `data/`.

use anyhow::{Context, Result};

use procedure_net::{
    evaluate, three_way_split, train_loop, Dataset, ModelMetadata, Network, RmsProp, TrainConfig,
    TrainingHistory, FEATURE_DIM,
};

const FEATURES_PATH: &str = "data/procedure-learning-data-input.json";
const LABELS_PATH: &str = "data/procedure-learning-data-output.json";
const MODEL_PATH: &str = "data/procedure-model.json";
const LOG_DIR: &str = "data/heldout-log";

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
    let (train, validation, test) = three_way_split(&dataset);
    log::info!(
        "{} records: {} train, {} validation, {} test",
        dataset.len(),
        train.len(),
        validation.len(),
        test.len()
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
        Some((&validation.features, &validation.labels)),
        &mut optimizer,
        &config,
        |stats| history.record(stats),
    );

    let (test_loss, test_accuracy) = evaluate(&mut network, &test.features, &test.labels);
    println!("Test loss: {test_loss}");
    println!("Test accuracy: {test_accuracy}");

    network
        .save_json(MODEL_PATH)
        .context("saving the model artifact")?;
    log::info!("model saved to {MODEL_PATH}, history under {LOG_DIR}/");

    Ok(())
}
