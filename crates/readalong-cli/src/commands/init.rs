//! The `readalong init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("readalong.toml").exists() {
        println!("readalong.toml already exists, skipping.");
    } else {
        std::fs::write("readalong.toml", SAMPLE_CONFIG)?;
        println!("Created readalong.toml");
    }

    std::fs::create_dir_all("question-banks")?;
    let bank_path = std::path::Path::new("question-banks/example.toml");
    if bank_path.exists() {
        println!("question-banks/example.toml already exists, skipping.");
    } else {
        std::fs::write(bank_path, EXAMPLE_BANK)?;
        println!("Created question-banks/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Adjust thresholds in readalong.toml if needed");
    println!("  2. Run: readalong validate --bank question-banks/example.toml");
    println!("  3. Run: readalong select --bank question-banks/example.toml --grade 3");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# readalong configuration

[scorer]
hesitation_threshold_ms = 500
hesitation_penalty = 5
omission_penalty = 15
omission_ratio_percent = 80

[difficulty]
step_up_after = 3
step_down_after = 2
seconds_per_step = 3
min_time_limit_sec = 5
max_time_limit_sec = 60

[session]
pass_accuracy_percent = 80
questions_per_round = 5
"#;

const EXAMPLE_BANK: &str = r#"[bank]
id = "example"
name = "Example Question Bank"
description = "A few read-aloud and arithmetic items to get started"

[[questions]]
id = "read-hen"
prompt = "Read the sentence aloud."
expected_answer = "the little red hen found a seed"
kind = "spoken"
difficulty_level = 1
grade_band = "3-4"
tags = ["reading"]

[[questions]]
id = "read-river"
prompt = "Read the sentence aloud."
expected_answer = "the river curled slowly around the quiet village"
kind = "spoken"
difficulty_level = 3
grade_band = "3-4"
tags = ["reading"]

[[questions]]
id = "add-carry"
prompt = "What is 38 + 47?"
expected_answer = "85"
kind = "written"
difficulty_level = 2
grade_band = "3-4"
tags = ["arithmetic"]

[[questions]]
id = "read-cat"
prompt = "Read the sentence aloud."
expected_answer = "the cat sat on the mat"
kind = "spoken"
difficulty_level = 1
grade_band = "1-2"
tags = ["reading"]
"#;
