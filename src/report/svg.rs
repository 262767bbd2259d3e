//! Standalone SVG training curves, one chart per metric, written next to
//! the CSV history so a browser can show the run without extra tooling.

use std::fs;
use std::path::Path;

use crate::error::Error;
use crate::train::EpochStats;

const WIDTH: f64 = 760.0;
const HEIGHT: f64 = 220.0;
const PAD_L: f64 = 60.0;
const PAD_R: f64 = 16.0;
const PAD_T: f64 = 24.0;
const PAD_B: f64 = 30.0;

/// Writes `loss.svg` and `accuracy.svg` under `dir` for the given run.
/// With fewer than two epochs there is no curve to draw and nothing is
/// written.
pub fn render_curves(history: &[EpochStats], dir: &Path) -> Result<(), Error> {
    if history.len() < 2 {
        log::warn!("not enough epochs to draw training curves, skipping");
        return Ok(());
    }
    fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;

    let train_loss: Vec<f64> = history.iter().map(|s| s.train_loss).collect();
    let val_loss: Vec<f64> = history.iter().filter_map(|s| s.val_loss).collect();
    let loss_svg = curve_svg("model loss", &train_loss, &val_loss);
    let loss_path = dir.join("loss.svg");
    fs::write(&loss_path, loss_svg).map_err(|e| Error::io(&loss_path, e))?;

    let train_acc: Vec<f64> = history.iter().map(|s| s.train_accuracy).collect();
    let val_acc: Vec<f64> = history.iter().filter_map(|s| s.val_accuracy).collect();
    let acc_svg = curve_svg("model accuracy", &train_acc, &val_acc);
    let acc_path = dir.join("accuracy.svg");
    fs::write(&acc_path, acc_svg).map_err(|e| Error::io(&acc_path, e))?;

    Ok(())
}

/// Renders one chart: the train series, plus the validation series when it
/// has a point for every epoch.
pub fn curve_svg(title: &str, train: &[f64], val: &[f64]) -> String {
    let n = train.len();
    let all_vals: Vec<f64> = train.iter().chain(val.iter()).cloned().collect();
    let max_y = all_vals.iter().cloned().fold(0.0f64, f64::max) * 1.05;
    let min_y = 0.0f64;

    let px = |i: usize, v: f64| -> (f64, f64) {
        let x = PAD_L + (i as f64 / (n - 1) as f64) * (WIDTH - PAD_L - PAD_R);
        let y = PAD_T + (max_y - v) / (max_y - min_y + 1e-12) * (HEIGHT - PAD_T - PAD_B);
        (x, y)
    };

    let path_for = |points: &[f64]| -> String {
        points
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let (x, y) = px(i, v);
                if i == 0 {
                    format!("M{x:.1},{y:.1}")
                } else {
                    format!(" L{x:.1},{y:.1}")
                }
            })
            .collect()
    };

    let train_path = path_for(train);
    let val_path = if val.len() == n {
        path_for(val)
    } else {
        String::new()
    };

    let grey_grid = "#f0f2f5";
    let grey_text = "#999";

    // Horizontal grid with y-axis labels.
    let y_labels: String = (0..=4)
        .map(|g| {
            let frac = g as f64 / 4.0;
            let val = min_y + (max_y - min_y) * frac;
            let y = PAD_T + (1.0 - frac) * (HEIGHT - PAD_T - PAD_B);
            format!(
                "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"end\" fill=\"{}\" font-size=\"10\">{:.3}</text>\n\
                 <line x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\" stroke=\"{}\" stroke-width=\"1\"/>",
                PAD_L - 4.0, y + 4.0, grey_text, val,
                PAD_L, y, WIDTH - PAD_R, y, grey_grid
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    // Epoch labels at the start, middle and end of the x axis.
    let x_labels: String = [0, (n - 1) / 2, n - 1]
        .iter()
        .map(|&i| {
            let (x, _) = px(i, 0.0);
            format!(
                "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" fill=\"{}\" font-size=\"10\">{}</text>",
                x,
                HEIGHT - PAD_B + 14.0,
                grey_text,
                i + 1
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let val_polyline = if val_path.is_empty() {
        String::new()
    } else {
        format!(
            "<path d=\"{val_path}\" fill=\"none\" stroke=\"#e07b39\" stroke-width=\"1.5\"/>\n\
             <text x=\"{:.1}\" y=\"{:.1}\" fill=\"#e07b39\" font-size=\"10\">validation</text>",
            PAD_L + 50.0,
            PAD_T - 8.0
        )
    };

    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{WIDTH}\" height=\"{HEIGHT}\" viewBox=\"0 0 {WIDTH} {HEIGHT}\">\n\
         <rect width=\"{WIDTH}\" height=\"{HEIGHT}\" fill=\"white\"/>\n\
         <text x=\"{:.1}\" y=\"14\" fill=\"#333\" font-size=\"12\">{title}</text>\n\
         {y_labels}\n\
         {x_labels}\n\
         <path d=\"{train_path}\" fill=\"none\" stroke=\"#3572b0\" stroke-width=\"1.5\"/>\n\
         <text x=\"{:.1}\" y=\"{:.1}\" fill=\"#3572b0\" font-size=\"10\">train</text>\n\
         {val_polyline}\n\
         </svg>\n",
        PAD_L,
        PAD_L,
        PAD_T - 8.0,
    )
}
