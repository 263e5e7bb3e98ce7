//! Session loop composing the alignment scorer and the difficulty controller.
//!
//! A session belongs to one test-taker. Spoken answers are scored first and
//! their accuracy becomes the correct/incorrect signal for the controller.
//! The session is an ordinary value owned by the caller; nothing here is
//! shared or global.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::alignment::AlignmentScorer;
use crate::config::{ReadalongConfig, SessionConfig};
use crate::difficulty::{init_state, DifficultyController};
use crate::model::{AlignmentResult, DifficultyModifier, Grade, PerformanceState, Transcript};
use crate::report::SessionReport;
use crate::statistics::SessionStats;
use crate::traits::CandidateQuestion;

/// What happened on one answered item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemOutcome {
    /// 1-based position in the session.
    pub index: u32,
    #[serde(default)]
    pub question_id: Option<String>,
    pub is_correct: bool,
    pub response_time_ms: u64,
    /// Time limit that applied while the item was shown.
    pub time_limit_sec: u32,
    /// Present for spoken items.
    #[serde(default)]
    pub alignment: Option<AlignmentResult>,
    pub modifier_after: DifficultyModifier,
}

/// One test-taker's run through a sequence of items.
#[derive(Debug, Clone)]
pub struct AssessmentSession {
    id: Uuid,
    started_at: DateTime<Utc>,
    grade: Grade,
    base_time_limit_sec: Option<u32>,
    scorer: AlignmentScorer,
    controller: DifficultyController,
    config: SessionConfig,
    state: PerformanceState,
    outcomes: Vec<ItemOutcome>,
}

impl AssessmentSession {
    pub fn new(grade: Grade, config: &ReadalongConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            grade,
            base_time_limit_sec: None,
            scorer: AlignmentScorer::new(config.scorer),
            controller: DifficultyController::new(config.difficulty),
            config: config.session,
            state: init_state(),
            outcomes: Vec::new(),
        }
    }

    /// Override the grade profile's base time limit.
    pub fn with_base_time_limit(mut self, seconds: u32) -> Self {
        self.base_time_limit_sec = Some(seconds);
        self
    }

    /// Resume from a state persisted by the caller.
    pub fn with_state(mut self, state: PerformanceState) -> Self {
        self.state = state;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn grade(&self) -> Grade {
        self.grade
    }

    pub fn state(&self) -> &PerformanceState {
        &self.state
    }

    pub fn outcomes(&self) -> &[ItemOutcome] {
        &self.outcomes
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Time limit for the next item at the current modifier.
    pub fn time_limit(&self) -> u32 {
        self.controller.adjusted_time_limit(
            self.base_time_limit_sec,
            self.grade,
            self.state.difficulty_modifier,
        )
    }

    /// Draw the next round of questions from `pool`.
    ///
    /// `count` defaults to the configured round size.
    pub fn next_questions<Q, R>(&self, pool: &[Q], count: Option<usize>, rng: &mut R) -> Vec<Q>
    where
        Q: CandidateQuestion + Clone,
        R: Rng + ?Sized,
    {
        self.controller.select_questions(
            pool,
            self.grade,
            self.state.difficulty_modifier,
            count.unwrap_or(self.config.questions_per_round),
            rng,
        )
    }

    /// Record a written answer that the caller has already marked.
    pub fn answer_written(
        &mut self,
        question_id: Option<&str>,
        is_correct: bool,
        response_time_ms: u64,
    ) -> &ItemOutcome {
        self.record(question_id, is_correct, response_time_ms, None)
    }

    /// Score a spoken answer and record it.
    ///
    /// The answer counts as correct when its accuracy reaches the configured
    /// pass threshold.
    pub fn answer_spoken(
        &mut self,
        question_id: Option<&str>,
        expected: &str,
        transcript: &Transcript,
        response_time_ms: u64,
    ) -> &ItemOutcome {
        let result = self.scorer.score_response(expected, transcript);
        let is_correct = result.accuracy_percent >= self.config.pass_accuracy_percent;
        self.record(question_id, is_correct, response_time_ms, Some(result))
    }

    fn record(
        &mut self,
        question_id: Option<&str>,
        is_correct: bool,
        response_time_ms: u64,
        alignment: Option<AlignmentResult>,
    ) -> &ItemOutcome {
        let time_limit_sec = self.time_limit();
        self.state = self
            .controller
            .record_answer(&self.state, is_correct, response_time_ms);

        tracing::info!(
            session = %self.id,
            item = self.state.items_answered,
            is_correct,
            modifier = %self.state.difficulty_modifier,
            "answer recorded"
        );

        self.outcomes.push(ItemOutcome {
            index: self.state.items_answered,
            question_id: question_id.map(str::to_string),
            is_correct,
            response_time_ms,
            time_limit_sec,
            alignment,
            modifier_after: self.state.difficulty_modifier,
        });
        &self.outcomes[self.outcomes.len() - 1]
    }

    /// Close the session and produce its report.
    pub fn finish(self) -> SessionReport {
        let stats = SessionStats::compute(&self.outcomes, &self.state);
        SessionReport {
            id: self.id,
            started_at: self.started_at,
            finished_at: Utc::now(),
            grade: self.grade,
            final_state: self.state,
            outcomes: self.outcomes,
            stats,
        }
    }
}
