//! Adaptive difficulty: streak-driven modifier, time limits, and question selection.
//!
//! State is passed by value. [`DifficultyController::record_answer`] returns a
//! new [`PerformanceState`] and never touches the input, so callers own
//! persistence and may share a controller freely across threads.
//!
//! Stepping up takes three correct answers in a row; stepping down takes two
//! misses. Each step spends the streak that earned it.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::DifficultyConfig;
use crate::model::{DifficultyModifier, Grade, GradeBand, PerformanceState};
use crate::traits::CandidateQuestion;

/// Applies a fixed [`DifficultyConfig`] to performance state and question pools.
#[derive(Debug, Clone, Copy, Default)]
pub struct DifficultyController {
    config: DifficultyConfig,
}

impl DifficultyController {
    pub fn new(config: DifficultyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DifficultyConfig {
        &self.config
    }

    /// Fold one answered item into the state.
    pub fn record_answer(
        &self,
        state: &PerformanceState,
        is_correct: bool,
        response_time_ms: u64,
    ) -> PerformanceState {
        let mut next = *state;

        next.items_answered += 1;
        let n = f64::from(next.items_answered);
        next.average_response_time_ms =
            (state.average_response_time_ms * (n - 1.0) + response_time_ms as f64) / n;

        if is_correct {
            next.correct_streak += 1;
            next.incorrect_streak = 0;
            if next.correct_streak >= self.config.step_up_after {
                if let Some(harder) = next.difficulty_modifier.harder() {
                    tracing::debug!(
                        from = %next.difficulty_modifier,
                        to = %harder,
                        streak = next.correct_streak,
                        "stepping difficulty up"
                    );
                    next.difficulty_modifier = harder;
                    next.correct_streak = 0;
                }
            }
        } else {
            next.incorrect_streak += 1;
            next.correct_streak = 0;
            if next.incorrect_streak >= self.config.step_down_after {
                if let Some(easier) = next.difficulty_modifier.easier() {
                    tracing::debug!(
                        from = %next.difficulty_modifier,
                        to = %easier,
                        streak = next.incorrect_streak,
                        "stepping difficulty down"
                    );
                    next.difficulty_modifier = easier;
                    next.incorrect_streak = 0;
                }
            }
        }

        next
    }

    /// Time limit for the next item, in seconds.
    ///
    /// Uses `base_time_limit_sec` when given and nonzero, otherwise the
    /// grade profile's base. Harder modifiers get less time.
    pub fn adjusted_time_limit(
        &self,
        base_time_limit_sec: Option<u32>,
        grade: Grade,
        modifier: DifficultyModifier,
    ) -> u32 {
        let base = base_time_limit_sec
            .filter(|&b| b > 0)
            .unwrap_or(grade.profile().base_time_limit_sec);

        let limit = i64::from(base) - i64::from(self.config.seconds_per_step) * modifier.value();
        limit.clamp(
            i64::from(self.config.min_time_limit_sec),
            i64::from(self.config.max_time_limit_sec),
        ) as u32
    }

    /// Pick up to `count` questions for `grade` at the current modifier.
    ///
    /// Candidates come from the grade's band, ranked by distance from the
    /// target difficulty. A short band is topped up from one adjacent band
    /// only. The candidate list is then shuffled with `rng` and truncated, so
    /// the result may be shorter than `count` when the pool runs out.
    pub fn select_questions<Q, R>(
        &self,
        pool: &[Q],
        grade: Grade,
        modifier: DifficultyModifier,
        count: usize,
        rng: &mut R,
    ) -> Vec<Q>
    where
        Q: CandidateQuestion + Clone,
        R: Rng + ?Sized,
    {
        let band = grade.band();
        let target = target_difficulty(grade, modifier);

        let mut candidates = rank_candidates(pool, band, target);
        if candidates.len() < count {
            if let Some(neighbour) = adjacent_band(band, modifier) {
                let missing = count - candidates.len();
                candidates.extend(rank_candidates(pool, neighbour, target).into_iter().take(missing));
            }
        }

        if candidates.len() < count {
            tracing::debug!(
                band = %band,
                wanted = count,
                available = candidates.len(),
                "question pool exhausted"
            );
        }

        candidates.shuffle(rng);
        candidates.into_iter().take(count).cloned().collect()
    }
}

/// Target difficulty (1..=3): the grade's base shifted by the modifier.
pub fn target_difficulty(grade: Grade, modifier: DifficultyModifier) -> u8 {
    (i64::from(grade.base_difficulty()) + modifier.value()).clamp(1, 3) as u8
}

/// Items in `band` ordered by distance from `target`, nearest first.
///
/// The order is deterministic: equal distances keep their pool order.
pub fn rank_candidates<Q: CandidateQuestion>(pool: &[Q], band: GradeBand, target: u8) -> Vec<&Q> {
    let mut ranked: Vec<&Q> = pool
        .iter()
        .filter(|q| q.grade_band().trim() == band.as_str())
        .collect();
    ranked.sort_by_key(|q| q.difficulty_level().abs_diff(target));
    ranked
}

/// The single band used to top up a short primary band.
///
/// Leans toward harder content while the modifier is positive and toward
/// easier content otherwise, falling back to the other side at the edges.
pub fn adjacent_band(band: GradeBand, modifier: DifficultyModifier) -> Option<GradeBand> {
    if modifier.value() > 0 {
        band.higher().or_else(|| band.lower())
    } else {
        band.lower().or_else(|| band.higher())
    }
}

/// The all-zero starting state.
pub fn init_state() -> PerformanceState {
    PerformanceState::default()
}

/// Fold one answer into `state` with the default thresholds (3 up, 2 down).
pub fn record_answer(state: &PerformanceState, is_correct: bool, response_time_ms: u64) -> PerformanceState {
    DifficultyController::default().record_answer(state, is_correct, response_time_ms)
}

/// Time limit in seconds, `base - 3 * modifier`, clamped to 5..=60.
pub fn adjusted_time_limit(
    base_time_limit_sec: Option<u32>,
    grade: Grade,
    modifier: DifficultyModifier,
) -> u32 {
    DifficultyController::default().adjusted_time_limit(base_time_limit_sec, grade, modifier)
}

/// Select up to `count` questions with the default controller.
pub fn select_questions<Q, R>(
    pool: &[Q],
    grade: Grade,
    modifier: DifficultyModifier,
    count: usize,
    rng: &mut R,
) -> Vec<Q>
where
    Q: CandidateQuestion + Clone,
    R: Rng + ?Sized,
{
    DifficultyController::default().select_questions(pool, grade, modifier, count, rng)
}
