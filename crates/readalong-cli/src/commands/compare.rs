//! The `readalong compare` command.

use std::path::PathBuf;

use anyhow::Result;

use readalong_core::report::SessionReport;

pub fn execute(
    baseline_path: PathBuf,
    current_path: PathBuf,
    threshold: f64,
    fail_on_decline: bool,
    format: String,
) -> Result<()> {
    let baseline = SessionReport::load_json(&baseline_path)?;
    let current = SessionReport::load_json(&current_path)?;

    let progress = current.compare(&baseline);

    match format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&progress)?);
        }
        _ => {
            println!(
                "Correct rate: {:.1}% -> {:.1}% ({:+.1}%)",
                baseline.stats.correct_rate * 100.0,
                current.stats.correct_rate * 100.0,
                progress.correct_rate_delta * 100.0
            );
            if let Some(delta) = progress.accuracy_delta {
                println!("Reading accuracy: {delta:+.1} points");
            }
            if let Some(delta) = progress.fluency_delta {
                println!("Reading fluency: {delta:+.1} points");
            }
            println!(
                "Response time: {:+.0}ms, difficulty {} -> {}",
                progress.response_time_delta_ms,
                baseline.stats.final_modifier,
                current.stats.final_modifier
            );
        }
    }

    if fail_on_decline && progress.has_decline(threshold) {
        std::process::exit(1);
    }

    Ok(())
}
