//! Aggregate statistics over a session's answered items.

use serde::{Deserialize, Serialize};

use crate::model::{DifficultyModifier, PerformanceState};
use crate::session::ItemOutcome;

/// Summary of one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub items_answered: usize,
    pub correct: usize,
    /// Fraction of items answered correctly, 0.0..=1.0.
    pub correct_rate: f64,
    pub avg_response_time_ms: f64,
    /// Items that went through the alignment scorer.
    pub spoken_items: usize,
    /// Mean accuracy over spoken items, if any.
    pub mean_accuracy_percent: Option<f64>,
    /// Mean fluency over spoken items, if any.
    pub mean_fluency_percent: Option<f64>,
    pub total_hesitations: u64,
    pub total_pause_ms: u64,
    pub final_modifier: DifficultyModifier,
    /// Highest modifier reached during the session.
    pub peak_modifier: DifficultyModifier,
}

impl SessionStats {
    /// Compute statistics from outcomes and the state after the last answer.
    pub fn compute(outcomes: &[ItemOutcome], final_state: &PerformanceState) -> Self {
        let items_answered = outcomes.len();
        let correct = outcomes.iter().filter(|o| o.is_correct).count();
        let correct_rate = if items_answered == 0 {
            0.0
        } else {
            correct as f64 / items_answered as f64
        };

        let avg_response_time_ms = outcomes
            .iter()
            .map(|o| o.response_time_ms as f64)
            .sum::<f64>()
            / items_answered.max(1) as f64;

        let spoken: Vec<_> = outcomes.iter().filter_map(|o| o.alignment).collect();
        let mean = |values: Vec<f64>| -> Option<f64> {
            if values.is_empty() {
                None
            } else {
                Some(values.iter().sum::<f64>() / values.len() as f64)
            }
        };

        let mean_accuracy_percent = mean(
            spoken
                .iter()
                .map(|a| f64::from(a.accuracy_percent))
                .collect(),
        );
        let mean_fluency_percent = mean(
            spoken
                .iter()
                .map(|a| f64::from(a.fluency_percent))
                .collect(),
        );

        let peak_modifier = outcomes
            .iter()
            .map(|o| o.modifier_after)
            .max()
            .unwrap_or(final_state.difficulty_modifier);

        SessionStats {
            items_answered,
            correct,
            correct_rate,
            avg_response_time_ms,
            spoken_items: spoken.len(),
            mean_accuracy_percent,
            mean_fluency_percent,
            total_hesitations: spoken.iter().map(|a| u64::from(a.hesitation_count)).sum(),
            total_pause_ms: spoken.iter().map(|a| a.total_pause_ms).sum(),
            final_modifier: final_state.difficulty_modifier,
            peak_modifier,
        }
    }
}
