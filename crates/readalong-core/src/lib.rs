//! readalong-core: alignment scoring and adaptive difficulty.
//!
//! This crate scores spoken or written answers against their expected text
//! and adapts time limits and question selection to a learner's rolling
//! performance. Every engine operation is a pure function over caller-owned
//! values.

pub mod alignment;
pub mod config;
pub mod difficulty;
pub mod error;
pub mod model;
pub mod parser;
pub mod report;
pub mod session;
pub mod statistics;
pub mod traits;

pub use alignment::{detect_hesitations, fluency_score, score_response, word_accuracy, AlignmentScorer};
pub use config::{load_config, load_config_from, ReadalongConfig};
pub use difficulty::{
    adjusted_time_limit, init_state, rank_candidates, record_answer, select_questions,
    DifficultyController,
};
pub use error::{GradeError, ModifierError};
pub use model::{
    AlignmentResult, DifficultyModifier, Grade, GradeBand, GradeDifficultyProfile,
    PerformanceState, Transcript, WordToken,
};
pub use session::AssessmentSession;
pub use traits::{CandidateQuestion, FeedbackGenerator, TemplateFeedback};
