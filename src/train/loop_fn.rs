use std::time::Instant;

use rand::seq::SliceRandom;

use crate::loss::BceLoss;
use crate::math::Matrix;
use crate::network::Network;
use crate::optim::RmsProp;
use crate::train::epoch_stats::EpochStats;
use crate::train::train_config::TrainConfig;

// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

/// Trains `network` for `config.epochs` epochs of mini-batch RMSProp with
/// binary cross-entropy, and returns the mean training loss of the last
/// completed epoch.
///
/// # Arguments
/// - `network`        — mutable reference to the network; modified in place
/// - `train_features` — training samples, each a `Vec<f64>` of the input width
/// - `train_labels`   — 0/1 targets, one per training sample
/// - `validation`     — optional `(features, labels)` pair; evaluated in
///                      inference mode after every epoch
/// - `optimizer`      — RMSProp state; reused accumulators carry across epochs
/// - `config`         — epoch count, batch size, shuffle flag
/// - `on_epoch`       — called once per completed epoch with that epoch's
///                      stats; the run-log writer hangs off this
///
/// Dropout is active for training forward passes only; the loss and
/// accuracy reported for the training set therefore reflect the dropped
/// network, while validation figures use the full one.
///
/// # Panics
/// Panics if `train_features` is empty, lengths mismatch, or
/// `batch_size == 0`.
pub fn train_loop<F>(
    network: &mut Network,
    train_features: &[Vec<f64>],
    train_labels: &[f64],
    validation: Option<(&[Vec<f64>], &[f64])>,
    optimizer: &mut RmsProp,
    config: &TrainConfig,
    mut on_epoch: F,
) -> f64
where
    F: FnMut(&EpochStats),
{
    assert!(!train_features.is_empty(), "train_features must not be empty");
    assert_eq!(
        train_features.len(),
        train_labels.len(),
        "train_features and train_labels must have equal length"
    );
    assert!(config.batch_size > 0, "batch_size must be at least 1");

    let mut last_train_loss = 0.0;

    for epoch in 1..=config.epochs {
        let t_start = Instant::now();

        let (train_loss, train_accuracy) = run_one_epoch(
            network,
            train_features,
            train_labels,
            optimizer,
            config,
        );
        last_train_loss = train_loss;

        let (val_loss, val_accuracy) = match validation {
            Some((features, labels)) => {
                let (loss, accuracy) = evaluate(network, features, labels);
                (Some(loss), Some(accuracy))
            }
            None => (None, None),
        };

        let stats = EpochStats {
            epoch,
            total_epochs: config.epochs,
            train_loss,
            val_loss,
            train_accuracy,
            val_accuracy,
            elapsed_ms: t_start.elapsed().as_millis() as u64,
        };

        match (stats.val_loss, stats.val_accuracy) {
            (Some(vl), Some(va)) => log::info!(
                "epoch {}/{} — loss {:.4}, acc {:.4}, val loss {:.4}, val acc {:.4}",
                epoch,
                config.epochs,
                train_loss,
                train_accuracy,
                vl,
                va
            ),
            _ => log::info!(
                "epoch {}/{} — loss {:.4}, acc {:.4}",
                epoch,
                config.epochs,
                train_loss,
                train_accuracy
            ),
        }

        on_epoch(&stats);
    }

    last_train_loss
}

/// Mean BCE and binary accuracy over a dataset, in inference mode.
pub fn evaluate(network: &mut Network, features: &[Vec<f64>], labels: &[f64]) -> (f64, f64) {
    assert_eq!(
        features.len(),
        labels.len(),
        "features and labels must have equal length"
    );
    let n = features.len();
    if n == 0 {
        return (0.0, 0.0);
    }

    let mut total_loss = 0.0;
    let mut correct = 0usize;
    for (input, &label) in features.iter().zip(labels.iter()) {
        let predicted = network.predict(input)[0];
        total_loss += BceLoss::loss(predicted, label);
        if classifies_correctly(predicted, label) {
            correct += 1;
        }
    }
    (total_loss / n as f64, correct as f64 / n as f64)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// One full pass of mini-batch gradient descent over the training data.
/// Returns `(mean loss, accuracy)` measured on the training-mode forward
/// passes.
fn run_one_epoch(
    network: &mut Network,
    features: &[Vec<f64>],
    labels: &[f64],
    optimizer: &mut RmsProp,
    config: &TrainConfig,
) -> (f64, f64) {
    let n = features.len();
    let mut total_loss = 0.0;
    let mut correct = 0usize;

    let mut indices: Vec<usize> = (0..n).collect();
    if config.shuffle {
        indices.shuffle(&mut rand::thread_rng());
    }

    for batch in indices.chunks(config.batch_size) {
        // Zero-initialize accumulated gradient storage.
        let mut acc_grads: Vec<(Matrix, Matrix)> = network
            .layers
            .iter()
            .map(|layer| {
                (
                    Matrix::zeros(layer.weights.rows, layer.weights.cols),
                    Matrix::zeros(layer.biases.rows, layer.biases.cols),
                )
            })
            .collect();

        // Accumulate gradients over the mini-batch.
        for &idx in batch {
            let input = &features[idx];
            let label = labels[idx];

            let predicted = network.forward_train(input)[0];
            total_loss += BceLoss::loss(predicted, label);
            if classifies_correctly(predicted, label) {
                correct += 1;
            }

            let mut delta =
                Matrix::from_rows(vec![vec![BceLoss::derivative(predicted, label)]]);

            // Backward pass.
            for i in (0..network.layers.len()).rev() {
                let input_for_layer = if i == 0 {
                    Matrix::from_rows(vec![input.clone()])
                } else {
                    network.layers[i - 1].activations().clone()
                };

                let (w_grad, b_grad) =
                    network.layers[i].compute_gradients(&delta, &input_for_layer);

                if i > 0 {
                    // Propagate δ_i through the weights to get ∂L/∂a_{i-1}.
                    delta = &b_grad * &network.layers[i].weights.transpose();
                }

                acc_grads[i].0 = &acc_grads[i].0 + &w_grad;
                acc_grads[i].1 = &acc_grads[i].1 + &b_grad;
            }
        }

        // Average over the batch and apply.
        let inv_batch = 1.0 / batch.len() as f64;
        for (i, (w_acc, b_acc)) in acc_grads.into_iter().enumerate() {
            let w_avg = w_acc.map(|x| x * inv_batch);
            let b_avg = b_acc.map(|x| x * inv_batch);
            optimizer.step(i, &mut network.layers[i], &w_avg, &b_avg);
        }
    }

    (total_loss / n as f64, correct as f64 / n as f64)
}

fn classifies_correctly(predicted: f64, label: f64) -> bool {
    (predicted > 0.5) == (label > 0.5)
}
