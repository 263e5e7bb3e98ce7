//! TOML question bank parser.
//!
//! Loads question banks from TOML files and directories, and validates them.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{GradeBand, Question, QuestionBank, QuestionKind};

/// Intermediate TOML structure for parsing question bank files.
#[derive(Debug, Deserialize)]
struct TomlBankFile {
    bank: TomlBankHeader,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlBankHeader {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    id: String,
    prompt: String,
    #[serde(default)]
    expected_answer: Option<String>,
    #[serde(default)]
    kind: QuestionKind,
    #[serde(default = "default_difficulty")]
    difficulty_level: u8,
    grade_band: String,
    #[serde(default)]
    tags: Vec<String>,
}

fn default_difficulty() -> u8 {
    1
}

/// Parse a single TOML file into a `QuestionBank`.
pub fn parse_question_bank(path: &Path) -> Result<QuestionBank> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question bank file: {}", path.display()))?;

    parse_question_bank_str(&content, path)
}

/// Parse a TOML string into a `QuestionBank` (useful for testing).
pub fn parse_question_bank_str(content: &str, source_path: &Path) -> Result<QuestionBank> {
    let parsed: TomlBankFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let questions = parsed
        .questions
        .into_iter()
        .map(|q| Question {
            id: q.id,
            prompt: q.prompt,
            expected_answer: q.expected_answer,
            kind: q.kind,
            difficulty_level: q.difficulty_level,
            grade_band: q.grade_band.trim().to_string(),
            tags: q.tags,
        })
        .collect();

    Ok(QuestionBank {
        id: parsed.bank.id,
        name: parsed.bank.name,
        description: parsed.bank.description,
        questions,
    })
}

/// Recursively load all `.toml` question bank files from a directory.
pub fn load_bank_directory(dir: &Path) -> Result<Vec<QuestionBank>> {
    let mut banks = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries: Vec<_> = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<_>>()?;
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();

        if path.is_dir() {
            banks.extend(load_bank_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_question_bank(&path) {
                Ok(bank) => banks.push(bank),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(banks)
}

/// Load a single file or every bank under a directory.
pub fn load_banks(path: &Path) -> Result<Vec<QuestionBank>> {
    if path.is_dir() {
        load_bank_directory(path)
    } else {
        Ok(vec![parse_question_bank(path)?])
    }
}

/// A warning from question bank validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question ID (if applicable).
    pub question_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a question bank for common issues.
pub fn validate_question_bank(bank: &QuestionBank) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    let mut seen_ids = HashSet::new();
    for q in &bank.questions {
        if !seen_ids.insert(&q.id) {
            warnings.push(ValidationWarning {
                question_id: Some(q.id.clone()),
                message: format!("duplicate question ID: {}", q.id),
            });
        }
    }

    for q in &bank.questions {
        let mut warn = |message: String| {
            warnings.push(ValidationWarning {
                question_id: Some(q.id.clone()),
                message,
            })
        };

        if !(1..=3).contains(&q.difficulty_level) {
            warn(format!(
                "difficulty_level must be 1, 2 or 3, got {}",
                q.difficulty_level
            ));
        }
        if q.grade_band.parse::<GradeBand>().is_err() {
            warn(format!(
                "unknown grade_band '{}' (expected 1-2, 3-4, 5-6 or 7-8); question will never be selected",
                q.grade_band
            ));
        }
        if q.prompt.trim().is_empty() {
            warn("prompt is empty".into());
        }
        if q.kind == QuestionKind::Spoken
            && q.expected_answer.as_deref().map_or(true, |a| a.trim().is_empty())
        {
            warn("spoken question has no expected_answer to align against".into());
        }
    }

    if bank.questions.is_empty() {
        warnings.push(ValidationWarning {
            question_id: None,
            message: "bank has no questions".into(),
        });
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const VALID_TOML: &str = r#"
[bank]
id = "reading-basics"
name = "Reading Basics"
description = "Short read-aloud sentences"

[[questions]]
id = "cat-sat"
prompt = "Read the sentence aloud."
expected_answer = "the cat sat on the mat"
kind = "spoken"
difficulty_level = 1
grade_band = "1-2"
tags = ["cvc"]

[[questions]]
id = "add-small"
prompt = "What is 7 + 5?"
expected_answer = "12"
difficulty_level = 2
grade_band = "3-4"
"#;

    #[test]
    fn parse_valid_toml() {
        let bank = parse_question_bank_str(VALID_TOML, &PathBuf::from("test.toml")).unwrap();
        assert_eq!(bank.id, "reading-basics");
        assert_eq!(bank.questions.len(), 2);
        assert_eq!(bank.questions[0].kind, QuestionKind::Spoken);
        assert_eq!(bank.questions[1].kind, QuestionKind::Written);
        assert_eq!(bank.questions[1].grade_band, "3-4");
        assert!(validate_question_bank(&bank).is_empty());
    }

    #[test]
    fn parse_missing_optional_fields() {
        let toml = r#"
[bank]
id = "minimal"
name = "Minimal"

[[questions]]
id = "q1"
prompt = "Spell 'dog'"
grade_band = "1-2"
"#;
        let bank = parse_question_bank_str(toml, &PathBuf::from("test.toml")).unwrap();
        assert_eq!(bank.questions[0].difficulty_level, 1);
        assert!(bank.questions[0].expected_answer.is_none());
        assert!(bank.questions[0].tags.is_empty());
    }

    #[test]
    fn validate_flags_problems() {
        let toml = r#"
[bank]
id = "broken"
name = "Broken"

[[questions]]
id = "same"
prompt = "Read aloud"
kind = "spoken"
difficulty_level = 4
grade_band = "9-10"

[[questions]]
id = "same"
prompt = "   "
grade_band = "3-4"
"#;
        let bank = parse_question_bank_str(toml, &PathBuf::from("test.toml")).unwrap();
        let warnings = validate_question_bank(&bank);
        let has = |needle: &str| warnings.iter().any(|w| w.message.contains(needle));
        assert!(has("duplicate"));
        assert!(has("difficulty_level"));
        assert!(has("unknown grade_band"));
        assert!(has("prompt is empty"));
        assert!(has("no expected_answer"));
    }

    #[test]
    fn validate_empty_bank() {
        let toml = "[bank]\nid = \"empty\"\nname = \"Empty\"\n";
        let bank = parse_question_bank_str(toml, &PathBuf::from("test.toml")).unwrap();
        let warnings = validate_question_bank(&bank);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].question_id.is_none());
    }

    #[test]
    fn parse_malformed_toml() {
        let bad = "this is not [valid toml }{";
        assert!(parse_question_bank_str(bad, &PathBuf::from("bad.toml")).is_err());
    }

    #[test]
    fn load_directory_skips_bad_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("good.toml"), VALID_TOML).unwrap();
        std::fs::write(dir.path().join("bad.toml"), "not toml {").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let banks = load_bank_directory(dir.path()).unwrap();
        assert_eq!(banks.len(), 1);
        assert_eq!(banks[0].id, "reading-basics");
    }

    #[test]
    fn load_banks_accepts_file_or_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bank.toml");
        std::fs::write(&path, VALID_TOML).unwrap();

        assert_eq!(load_banks(&path).unwrap().len(), 1);
        assert_eq!(load_banks(dir.path()).unwrap().len(), 1);
        assert!(load_banks(&dir.path().join("missing.toml")).is_err());
    }
}
