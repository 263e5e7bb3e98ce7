//! Core data model types for readalong.
//!
//! These are the value types shared by the alignment scorer, the difficulty
//! controller, and the session layer that composes them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{GradeError, ModifierError};
use crate::traits::CandidateQuestion;

// ---------------------------------------------------------------------------
// Transcription input
// ---------------------------------------------------------------------------

/// A single recognized word with optional timing, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordToken {
    pub text: String,
    #[serde(default)]
    pub start_ms: Option<u64>,
    #[serde(default)]
    pub end_ms: Option<u64>,
}

impl WordToken {
    /// A token without timing information.
    pub fn untimed(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            start_ms: None,
            end_ms: None,
        }
    }

    /// A token spanning `start_ms..end_ms`.
    pub fn timed(text: impl Into<String>, start_ms: u64, end_ms: u64) -> Self {
        Self {
            text: text.into(),
            start_ms: Some(start_ms),
            end_ms: Some(end_ms),
        }
    }
}

/// Output of the speech-to-text collaborator.
///
/// Word times are in seconds, as the transcription service reports them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transcript {
    /// Full recognized text.
    #[serde(default)]
    pub text: String,
    /// Word-level timing, when the service provides it.
    #[serde(default)]
    pub words: Option<Vec<TranscriptWord>>,
}

/// A word as reported by the transcription service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptWord {
    pub text: String,
    #[serde(default)]
    pub start: Option<f64>,
    #[serde(default)]
    pub end: Option<f64>,
}

impl Transcript {
    /// A transcript carrying only text.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            words: None,
        }
    }

    /// Convert the word list into millisecond-timed tokens.
    ///
    /// Returns an empty list when the service sent no word timing.
    pub fn tokens(&self) -> Vec<WordToken> {
        self.words
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|w| WordToken {
                text: w.text.clone(),
                start_ms: w.start.and_then(seconds_to_ms),
                end_ms: w.end.and_then(seconds_to_ms),
            })
            .collect()
    }
}

fn seconds_to_ms(secs: f64) -> Option<u64> {
    if secs.is_finite() && secs >= 0.0 {
        Some((secs * 1000.0).round() as u64)
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Scoring output
// ---------------------------------------------------------------------------

/// Hesitation statistics derived from word timing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HesitationStats {
    pub hesitation_count: u32,
    pub total_pause_ms: u64,
}

/// Result of scoring one response against its expected text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentResult {
    /// Word-level accuracy, 0..=100.
    pub accuracy_percent: u8,
    pub hesitation_count: u32,
    pub total_pause_ms: u64,
    /// Fluency after hesitation and omission penalties, 0..=100.
    pub fluency_percent: u8,
}

// ---------------------------------------------------------------------------
// Difficulty
// ---------------------------------------------------------------------------

/// How much easier or harder the item stream is relative to the grade baseline.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "i64", into = "i64")]
pub enum DifficultyModifier {
    MuchEasier,
    Easier,
    #[default]
    Baseline,
    Harder,
    MuchHarder,
}

impl DifficultyModifier {
    pub const MIN: DifficultyModifier = DifficultyModifier::MuchEasier;
    pub const MAX: DifficultyModifier = DifficultyModifier::MuchHarder;

    /// Integer value in `-2..=2`.
    pub fn value(self) -> i64 {
        match self {
            DifficultyModifier::MuchEasier => -2,
            DifficultyModifier::Easier => -1,
            DifficultyModifier::Baseline => 0,
            DifficultyModifier::Harder => 1,
            DifficultyModifier::MuchHarder => 2,
        }
    }

    /// One step harder, or `None` at the ceiling.
    pub fn harder(self) -> Option<Self> {
        Self::try_from(self.value() + 1).ok()
    }

    /// One step easier, or `None` at the floor.
    pub fn easier(self) -> Option<Self> {
        Self::try_from(self.value() - 1).ok()
    }
}

impl TryFrom<i64> for DifficultyModifier {
    type Error = ModifierError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            -2 => Ok(DifficultyModifier::MuchEasier),
            -1 => Ok(DifficultyModifier::Easier),
            0 => Ok(DifficultyModifier::Baseline),
            1 => Ok(DifficultyModifier::Harder),
            2 => Ok(DifficultyModifier::MuchHarder),
            other => Err(ModifierError(other)),
        }
    }
}

impl From<DifficultyModifier> for i64 {
    fn from(m: DifficultyModifier) -> Self {
        m.value()
    }
}

impl fmt::Display for DifficultyModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+}", self.value())
    }
}

/// Rolling performance for one test-taker session.
///
/// At most one of the two streaks is nonzero at any time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceState {
    pub correct_streak: u32,
    pub incorrect_streak: u32,
    pub average_response_time_ms: f64,
    pub items_answered: u32,
    pub difficulty_modifier: DifficultyModifier,
}

// ---------------------------------------------------------------------------
// Grades
// ---------------------------------------------------------------------------

/// A school grade, 1 through 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Grade(u8);

impl Grade {
    pub fn new(grade: u8) -> Result<Self, GradeError> {
        if (1..=8).contains(&grade) {
            Ok(Grade(grade))
        } else {
            Err(GradeError::OutOfRange(grade.to_string()))
        }
    }

    pub fn number(self) -> u8 {
        self.0
    }

    /// The coarse band this grade's questions are bucketed into.
    pub fn band(self) -> GradeBand {
        match self.0 {
            1 | 2 => GradeBand::FirstSecond,
            3 | 4 => GradeBand::ThirdFourth,
            5 | 6 => GradeBand::FifthSixth,
            _ => GradeBand::SeventhEighth,
        }
    }

    /// Difficulty level (1..=3) that a baseline item for this grade sits at.
    pub fn base_difficulty(self) -> u8 {
        match self.0 {
            0..=2 => 1,
            3..=4 => 2,
            _ => 3,
        }
    }

    /// Static difficulty profile for this grade.
    pub fn profile(self) -> &'static GradeDifficultyProfile {
        &GRADE_PROFILES[usize::from(self.0 - 1)]
    }
}

impl FromStr for Grade {
    type Err = GradeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u8>()
            .ok()
            .and_then(|g| Grade::new(g).ok())
            .ok_or_else(|| GradeError::OutOfRange(s.to_string()))
    }
}

impl TryFrom<String> for Grade {
    type Error = GradeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Grade> for String {
    fn from(g: Grade) -> Self {
        g.0.to_string()
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Coarse grouping of grades used to bucket question pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GradeBand {
    #[serde(rename = "1-2")]
    FirstSecond,
    #[serde(rename = "3-4")]
    ThirdFourth,
    #[serde(rename = "5-6")]
    FifthSixth,
    #[serde(rename = "7-8")]
    SeventhEighth,
}

impl GradeBand {
    pub const ALL: [GradeBand; 4] = [
        GradeBand::FirstSecond,
        GradeBand::ThirdFourth,
        GradeBand::FifthSixth,
        GradeBand::SeventhEighth,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            GradeBand::FirstSecond => "1-2",
            GradeBand::ThirdFourth => "3-4",
            GradeBand::FifthSixth => "5-6",
            GradeBand::SeventhEighth => "7-8",
        }
    }

    pub fn index(self) -> usize {
        match self {
            GradeBand::FirstSecond => 0,
            GradeBand::ThirdFourth => 1,
            GradeBand::FifthSixth => 2,
            GradeBand::SeventhEighth => 3,
        }
    }

    /// The next band down, if any.
    pub fn lower(self) -> Option<GradeBand> {
        self.index().checked_sub(1).map(|i| Self::ALL[i])
    }

    /// The next band up, if any.
    pub fn higher(self) -> Option<GradeBand> {
        Self::ALL.get(self.index() + 1).copied()
    }
}

impl FromStr for GradeBand {
    type Err = GradeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        GradeBand::ALL
            .into_iter()
            .find(|b| b.as_str() == s)
            .ok_or_else(|| GradeError::UnknownBand(s.to_string()))
    }
}

impl fmt::Display for GradeBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Relative working-memory demand of a grade's items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CognitiveLoad {
    Low,
    Medium,
    High,
}

/// How far a grade's items move away from concrete objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AbstractionLevel {
    Concrete,
    SemiAbstract,
    Abstract,
}

/// Static per-grade configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GradeDifficultyProfile {
    pub base_time_limit_sec: u32,
    /// 1..=5
    pub complexity_level: u8,
    pub cognitive_load: CognitiveLoad,
    pub abstraction_level: AbstractionLevel,
}

const fn profile(
    base_time_limit_sec: u32,
    complexity_level: u8,
    cognitive_load: CognitiveLoad,
    abstraction_level: AbstractionLevel,
) -> GradeDifficultyProfile {
    GradeDifficultyProfile {
        base_time_limit_sec,
        complexity_level,
        cognitive_load,
        abstraction_level,
    }
}

/// Profiles for grades 1 through 8, in order.
static GRADE_PROFILES: [GradeDifficultyProfile; 8] = [
    profile(30, 1, CognitiveLoad::Low, AbstractionLevel::Concrete),
    profile(28, 1, CognitiveLoad::Low, AbstractionLevel::Concrete),
    profile(25, 2, CognitiveLoad::Medium, AbstractionLevel::Concrete),
    profile(22, 2, CognitiveLoad::Medium, AbstractionLevel::SemiAbstract),
    profile(20, 3, CognitiveLoad::Medium, AbstractionLevel::SemiAbstract),
    profile(18, 4, CognitiveLoad::High, AbstractionLevel::SemiAbstract),
    profile(16, 4, CognitiveLoad::High, AbstractionLevel::Abstract),
    profile(15, 5, CognitiveLoad::High, AbstractionLevel::Abstract),
];

// ---------------------------------------------------------------------------
// Question bank records
// ---------------------------------------------------------------------------

/// How a question is answered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    #[default]
    Written,
    Spoken,
}

/// A question from a question bank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub prompt: String,
    /// Reference text a spoken answer is aligned against.
    #[serde(default)]
    pub expected_answer: Option<String>,
    #[serde(default)]
    pub kind: QuestionKind,
    /// 1..=3
    pub difficulty_level: u8,
    pub grade_band: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl CandidateQuestion for Question {
    fn difficulty_level(&self) -> u8 {
        self.difficulty_level
    }

    fn grade_band(&self) -> &str {
        &self.grade_band
    }
}

/// A named collection of questions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionBank {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub questions: Vec<Question>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grade_parse_and_band() {
        let g: Grade = "4".parse().unwrap();
        assert_eq!(g.number(), 4);
        assert_eq!(g.band(), GradeBand::ThirdFourth);
        assert_eq!(" 7 ".parse::<Grade>().unwrap().band(), GradeBand::SeventhEighth);
        assert!("0".parse::<Grade>().is_err());
        assert!("9".parse::<Grade>().is_err());
        assert!("fourth".parse::<Grade>().is_err());
    }

    #[test]
    fn base_difficulty_by_grade() {
        let base = |g: u8| Grade::new(g).unwrap().base_difficulty();
        assert_eq!(base(1), 1);
        assert_eq!(base(2), 1);
        assert_eq!(base(3), 2);
        assert_eq!(base(4), 2);
        assert_eq!(base(5), 3);
        assert_eq!(base(8), 3);
    }

    #[test]
    fn every_grade_has_a_profile() {
        for g in 1..=8 {
            let p = Grade::new(g).unwrap().profile();
            assert!((1..=5).contains(&p.complexity_level));
            assert!(p.base_time_limit_sec >= 5);
        }
    }

    #[test]
    fn band_neighbours() {
        assert_eq!(GradeBand::FirstSecond.lower(), None);
        assert_eq!(GradeBand::FirstSecond.higher(), Some(GradeBand::ThirdFourth));
        assert_eq!(GradeBand::SeventhEighth.higher(), None);
        assert_eq!("5-6".parse::<GradeBand>().unwrap(), GradeBand::FifthSixth);
        assert!("9-10".parse::<GradeBand>().is_err());
    }

    #[test]
    fn modifier_steps_saturate() {
        assert_eq!(DifficultyModifier::MAX.harder(), None);
        assert_eq!(DifficultyModifier::MIN.easier(), None);
        assert_eq!(
            DifficultyModifier::Baseline.harder(),
            Some(DifficultyModifier::Harder)
        );
        assert_eq!(DifficultyModifier::try_from(3), Err(ModifierError(3)));
        assert_eq!(DifficultyModifier::Easier.to_string(), "-1");
    }

    #[test]
    fn modifier_serializes_as_integer() {
        let json = serde_json::to_string(&DifficultyModifier::MuchEasier).unwrap();
        assert_eq!(json, "-2");
        assert!(serde_json::from_str::<DifficultyModifier>("5").is_err());
    }

    #[test]
    fn transcript_tokens_convert_seconds() {
        let json = r#"{
            "text": "the cat",
            "words": [
                {"text": "the", "start": 0.0, "end": 0.25},
                {"text": "cat", "start": 0.9, "end": 1.2}
            ]
        }"#;
        let t: Transcript = serde_json::from_str(json).unwrap();
        let tokens = t.tokens();
        assert_eq!(tokens[0], WordToken::timed("the", 0, 250));
        assert_eq!(tokens[1], WordToken::timed("cat", 900, 1200));
    }

    #[test]
    fn transcript_without_words_has_no_tokens() {
        let t: Transcript = serde_json::from_str(r#"{"text": "hello"}"#).unwrap();
        assert!(t.tokens().is_empty());
    }
}
