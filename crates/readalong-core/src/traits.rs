//! Trait seams between the engine and its collaborators.
//!
//! The question bank supplies items through [`CandidateQuestion`]; an
//! optional feedback renderer turns scores into a comment through
//! [`FeedbackGenerator`].

use crate::model::AlignmentResult;

// ---------------------------------------------------------------------------
// Question bank capability
// ---------------------------------------------------------------------------

/// The minimal view of a question the difficulty controller needs.
///
/// The controller ranks and filters implementors; it never inspects or
/// persists the rest of the record.
pub trait CandidateQuestion {
    /// Difficulty on the 1..=3 scale.
    fn difficulty_level(&self) -> u8;

    /// Grade band label, e.g. "3-4".
    fn grade_band(&self) -> &str;
}

impl<T: CandidateQuestion + ?Sized> CandidateQuestion for &T {
    fn difficulty_level(&self) -> u8 {
        (**self).difficulty_level()
    }

    fn grade_band(&self) -> &str {
        (**self).grade_band()
    }
}

// ---------------------------------------------------------------------------
// Feedback rendering
// ---------------------------------------------------------------------------

/// Renders a human-readable comment for a scored response.
pub trait FeedbackGenerator: Send + Sync {
    /// Human-readable generator name (e.g. "template").
    fn name(&self) -> &str;

    /// Produce a short comment for the given result.
    fn feedback(&self, expected: &str, result: &AlignmentResult) -> String;
}

/// Fixed-phrase feedback keyed on accuracy and fluency bands.
#[derive(Debug, Clone, Default)]
pub struct TemplateFeedback;

impl FeedbackGenerator for TemplateFeedback {
    fn name(&self) -> &str {
        "template"
    }

    fn feedback(&self, expected: &str, result: &AlignmentResult) -> String {
        if expected.trim().is_empty() {
            return "Nothing to read this time.".to_string();
        }

        let accuracy = match result.accuracy_percent {
            90..=100 => "Excellent reading, almost every word was right.",
            70..=89 => "Good reading, a few words need another look.",
            40..=69 => "Nice try. Let's practise the tricky words together.",
            _ => "Let's read this one again slowly.",
        };

        let mut comment = accuracy.to_string();
        match result.hesitation_count {
            0 => {}
            1 => comment.push_str(" You paused once, keep the words flowing."),
            n => comment.push_str(&format!(" You paused {n} times, try reading in phrases.")),
        }
        if result.fluency_percent >= 90 && result.accuracy_percent >= 90 {
            comment.push_str(" Smooth and steady!");
        }
        comment
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(accuracy: u8, hesitations: u32, fluency: u8) -> AlignmentResult {
        AlignmentResult {
            accuracy_percent: accuracy,
            hesitation_count: hesitations,
            total_pause_ms: 0,
            fluency_percent: fluency,
        }
    }

    #[test]
    fn template_feedback_praises_perfect_reading() {
        let text = TemplateFeedback.feedback("the cat sat", &result(100, 0, 100));
        assert!(text.starts_with("Excellent"));
        assert!(text.contains("Smooth"));
    }

    #[test]
    fn template_feedback_mentions_pauses() {
        let text = TemplateFeedback.feedback("the cat sat", &result(75, 3, 85));
        assert!(text.contains("paused 3 times"), "got: {text}");
    }

    #[test]
    fn template_feedback_empty_prompt() {
        let text = TemplateFeedback.feedback("  ", &result(0, 0, 100));
        assert_eq!(text, "Nothing to read this time.");
    }
}
