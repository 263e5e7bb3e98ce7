//! The `readalong replay` command.
//!
//! Feeds a scripted sequence of answers through an `AssessmentSession`, the
//! same way a live session loop would, and saves the resulting report.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use readalong_core::config::load_config_from;
use readalong_core::model::{Grade, Transcript, TranscriptWord};
use readalong_core::report::SessionReport;
use readalong_core::session::AssessmentSession;

/// A session script.
#[derive(Debug, Deserialize)]
struct Script {
    session: ScriptHeader,
    #[serde(default)]
    items: Vec<ScriptItem>,
}

#[derive(Debug, Deserialize)]
struct ScriptHeader {
    grade: Grade,
    #[serde(default)]
    base_time_limit_sec: Option<u32>,
}

/// One scripted answer: written items carry `correct`, spoken items carry
/// `expected` plus `actual` text and/or timed `words`.
#[derive(Debug, Deserialize)]
struct ScriptItem {
    #[serde(default)]
    question_id: Option<String>,
    #[serde(default)]
    correct: Option<bool>,
    #[serde(default)]
    expected: Option<String>,
    #[serde(default)]
    actual: Option<String>,
    #[serde(default)]
    words: Option<Vec<TranscriptWord>>,
    response_time_ms: u64,
}

fn load_script(path: &Path) -> Result<Script> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read script: {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("failed to parse script: {}", path.display()))
}

pub fn execute(
    script_path: PathBuf,
    output: PathBuf,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let script = load_script(&script_path)?;

    let mut session = AssessmentSession::new(script.session.grade, &config);
    if let Some(base) = script.session.base_time_limit_sec {
        session = session.with_base_time_limit(base);
    }

    for (i, item) in script.items.into_iter().enumerate() {
        let id = item.question_id.as_deref();
        match (item.expected, item.correct) {
            (Some(expected), _) => {
                let transcript = Transcript {
                    text: item.actual.unwrap_or_default(),
                    words: item.words,
                };
                session.answer_spoken(id, &expected, &transcript, item.response_time_ms);
            }
            (None, Some(correct)) => {
                session.answer_written(id, correct, item.response_time_ms);
            }
            (None, None) => {
                anyhow::bail!(
                    "item {} needs either `expected` (spoken) or `correct` (written)",
                    i + 1
                );
            }
        }
    }

    let report = session.finish();

    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        "markdown" | "md" => println!("{}", report.to_markdown()),
        _ => print_summary(&report),
    }

    std::fs::create_dir_all(&output)?;
    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H%M%S");
    let path = output.join(format!("session-{timestamp}.json"));
    report.save_json(&path)?;
    eprintln!("Report saved to: {}", path.display());

    Ok(())
}

fn print_summary(report: &SessionReport) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec![
        "#",
        "Question",
        "Correct",
        "Time",
        "Limit",
        "Accuracy",
        "Fluency",
        "Hesitations",
        "Difficulty",
    ]);

    for o in &report.outcomes {
        let (acc, flu, hes) = match &o.alignment {
            Some(a) => (
                format!("{}%", a.accuracy_percent),
                format!("{}%", a.fluency_percent),
                a.hesitation_count.to_string(),
            ),
            None => ("-".into(), "-".into(), "-".into()),
        };
        table.add_row(vec![
            Cell::new(o.index),
            Cell::new(o.question_id.as_deref().unwrap_or("-")),
            Cell::new(if o.is_correct { "yes" } else { "no" }),
            Cell::new(format!("{}ms", o.response_time_ms)),
            Cell::new(format!("{}s", o.time_limit_sec)),
            Cell::new(acc),
            Cell::new(flu),
            Cell::new(hes),
            Cell::new(o.modifier_after),
        ]);
    }

    println!("{table}");

    let s = &report.stats;
    println!(
        "\n{}/{} correct ({:.1}%), avg response {:.0}ms, final difficulty {}",
        s.correct,
        s.items_answered,
        s.correct_rate * 100.0,
        s.avg_response_time_ms,
        s.final_modifier
    );
    if let (Some(acc), Some(flu)) = (s.mean_accuracy_percent, s.mean_fluency_percent) {
        println!(
            "Reading: {:.1}% accuracy, {:.1}% fluency, {} hesitation(s)",
            acc, flu, s.total_hesitations
        );
    }
}
