//! End-to-end session tests.
//!
//! These tests drive a full session (select, score, record, report) through
//! the public API with a seeded random source.

use std::collections::HashSet;
use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::SeedableRng;

use readalong_core::model::{DifficultyModifier, QuestionKind, Transcript, TranscriptWord};
use readalong_core::parser::{parse_question_bank_str, validate_question_bank};
use readalong_core::report::SessionReport;
use readalong_core::{AssessmentSession, FeedbackGenerator, ReadalongConfig, TemplateFeedback};

const BANK: &str = r#"
[bank]
id = "pipeline"
name = "Pipeline Bank"

[[questions]]
id = "hen"
prompt = "Read aloud"
expected_answer = "the little red hen"
kind = "spoken"
difficulty_level = 1
grade_band = "3-4"

[[questions]]
id = "fox"
prompt = "Read aloud"
expected_answer = "the quick brown fox jumps"
kind = "spoken"
difficulty_level = 2
grade_band = "3-4"

[[questions]]
id = "sum"
prompt = "What is 9 + 6?"
expected_answer = "15"
difficulty_level = 2
grade_band = "3-4"

[[questions]]
id = "diff"
prompt = "What is 14 - 5?"
expected_answer = "9"
difficulty_level = 3
grade_band = "3-4"

[[questions]]
id = "dog"
prompt = "Read aloud"
expected_answer = "a big dog"
kind = "spoken"
difficulty_level = 1
grade_band = "1-2"

[[questions]]
id = "planet"
prompt = "Read aloud"
expected_answer = "planets orbit the sun"
kind = "spoken"
difficulty_level = 3
grade_band = "7-8"
"#;

fn timed(words: &[(&str, f64, f64)]) -> Transcript {
    Transcript {
        text: words.iter().map(|w| w.0).collect::<Vec<_>>().join(" "),
        words: Some(
            words
                .iter()
                .map(|&(text, start, end)| TranscriptWord {
                    text: text.into(),
                    start: Some(start),
                    end: Some(end),
                })
                .collect(),
        ),
    }
}

#[test]
fn full_session_flow() {
    let bank = parse_question_bank_str(BANK, &PathBuf::from("pipeline.toml")).unwrap();
    assert!(validate_question_bank(&bank).is_empty());

    let mut session = AssessmentSession::new("4".parse().unwrap(), &ReadalongConfig::default());
    let mut rng = StdRng::seed_from_u64(2024);

    let round = session.next_questions(&bank.questions, Some(5), &mut rng);
    assert_eq!(round.len(), 5);
    let ids: HashSet<&str> = round.iter().map(|q| q.id.as_str()).collect();
    assert_eq!(ids.len(), 5);
    assert!(!ids.contains("planet"), "7-8 is two bands away from grade 4");

    for q in &round {
        let expected = q.expected_answer.as_deref().unwrap_or_default();
        match q.kind {
            QuestionKind::Spoken => {
                let transcript = Transcript::from_text(expected);
                let outcome = session.answer_spoken(Some(&q.id), expected, &transcript, 3000);
                assert!(outcome.is_correct);
                assert_eq!(outcome.alignment.unwrap().accuracy_percent, 100);
            }
            QuestionKind::Written => {
                session.answer_written(Some(&q.id), true, 2000);
            }
        }
    }

    // five correct in a row: one step up after three, streak of two left
    assert_eq!(session.state().difficulty_modifier, DifficultyModifier::Harder);
    assert_eq!(session.state().correct_streak, 2);
    assert_eq!(session.state().items_answered, 5);

    let report = session.finish();
    assert_eq!(report.stats.correct, 5);
    assert_eq!(report.stats.peak_modifier, DifficultyModifier::Harder);
}

#[test]
fn hesitant_reading_feeds_back_into_difficulty() {
    let mut session = AssessmentSession::new("2".parse().unwrap(), &ReadalongConfig::default());

    // long pauses and a skipped word that shares no letters with the rest
    let transcript = timed(&[
        ("the", 0.0, 0.3),
        ("dog", 1.5, 1.9),
        ("fast", 3.0, 3.3),
    ]);
    let outcome = session
        .answer_spoken(Some("dog-hid"), "the dog hid fast", &transcript, 4000)
        .clone();
    let result = outcome.alignment.unwrap();
    assert_eq!(result.accuracy_percent, 75);
    assert_eq!(result.hesitation_count, 2);
    assert_eq!(result.total_pause_ms, 2300);
    // 100 - 2*5 - 15 for saying 3 of 4 words
    assert_eq!(result.fluency_percent, 75);
    assert!(!outcome.is_correct);

    let feedback = TemplateFeedback.feedback("the dog hid fast", &result);
    assert!(feedback.contains("paused 2 times"));

    session.answer_spoken(Some("dog"), "a big dog", &Transcript::from_text("a dig"), 4000);
    assert_eq!(session.state().difficulty_modifier, DifficultyModifier::Easier);
    // grade 2 base is 28s; one step easier adds 3s
    assert_eq!(session.time_limit(), 31);
}

#[test]
fn report_survives_a_roundtrip_and_resumes() {
    let mut session = AssessmentSession::new("6".parse().unwrap(), &ReadalongConfig::default());
    session.answer_written(Some("a"), true, 1200);
    session.answer_written(Some("b"), true, 1400);
    let report = session.finish();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    report.save_json(&path).unwrap();
    let loaded = SessionReport::load_json(&path).unwrap();

    let mut resumed = AssessmentSession::new(loaded.grade, &ReadalongConfig::default())
        .with_state(loaded.final_state);
    resumed.answer_written(Some("c"), true, 1600);
    assert_eq!(resumed.state().difficulty_modifier, DifficultyModifier::Harder);
    assert!((resumed.state().average_response_time_ms - 1400.0).abs() < 1e-9);
}
