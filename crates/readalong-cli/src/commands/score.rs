//! The `readalong score` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use readalong_core::alignment::AlignmentScorer;
use readalong_core::config::load_config_from;
use readalong_core::model::Transcript;
use readalong_core::traits::{FeedbackGenerator, TemplateFeedback};

pub fn execute(
    expected: String,
    actual: Option<String>,
    transcript_path: Option<PathBuf>,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let mut transcript = match &transcript_path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read transcript: {}", path.display()))?;
            serde_json::from_str::<Transcript>(&content)
                .with_context(|| format!("failed to parse transcript: {}", path.display()))?
        }
        None => Transcript::default(),
    };
    if let Some(actual) = actual {
        transcript.text = actual;
    }

    anyhow::ensure!(
        transcript_path.is_some() || !transcript.text.is_empty(),
        "provide --actual or --transcript"
    );

    let scorer = AlignmentScorer::new(config.scorer);
    let result = scorer.score_response(&expected, &transcript);

    match format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        _ => {
            println!("Accuracy:    {}%", result.accuracy_percent);
            println!("Fluency:     {}%", result.fluency_percent);
            println!(
                "Hesitations: {} ({}ms paused)",
                result.hesitation_count, result.total_pause_ms
            );
            println!("\n{}", TemplateFeedback.feedback(&expected, &result));
        }
    }

    Ok(())
}
