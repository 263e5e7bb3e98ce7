//! Session reports with JSON persistence and progress comparison.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{Grade, PerformanceState};
use crate::session::ItemOutcome;
use crate::statistics::SessionStats;

/// A completed assessment session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub grade: Grade,
    /// State after the last answer; feed this back in to resume.
    pub final_state: PerformanceState,
    pub outcomes: Vec<ItemOutcome>,
    pub stats: SessionStats,
}

impl SessionReport {
    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: SessionReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Compare this session against an earlier one.
    pub fn compare(&self, baseline: &SessionReport) -> ProgressReport {
        let delta = |current: Option<f64>, before: Option<f64>| match (current, before) {
            (Some(c), Some(b)) => Some(c - b),
            _ => None,
        };

        ProgressReport {
            baseline_id: baseline.id,
            current_id: self.id,
            correct_rate_delta: self.stats.correct_rate - baseline.stats.correct_rate,
            accuracy_delta: delta(
                self.stats.mean_accuracy_percent,
                baseline.stats.mean_accuracy_percent,
            ),
            fluency_delta: delta(
                self.stats.mean_fluency_percent,
                baseline.stats.mean_fluency_percent,
            ),
            response_time_delta_ms: self.stats.avg_response_time_ms
                - baseline.stats.avg_response_time_ms,
            modifier_delta: self.stats.final_modifier.value()
                - baseline.stats.final_modifier.value(),
        }
    }

    /// Format the report as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();
        let s = &self.stats;

        md.push_str(&format!("## Session {} (grade {})\n\n", self.id, self.grade));
        md.push_str(&format!(
            "**Summary:** {}/{} correct ({:.0}%), final difficulty {}\n\n",
            s.correct,
            s.items_answered,
            s.correct_rate * 100.0,
            s.final_modifier
        ));

        if let (Some(acc), Some(flu)) = (s.mean_accuracy_percent, s.mean_fluency_percent) {
            md.push_str(&format!(
                "Reading: {:.0}% accuracy, {:.0}% fluency, {} hesitation(s)\n\n",
                acc, flu, s.total_hesitations
            ));
        }

        md.push_str("| # | Question | Correct | Time | Limit | Accuracy | Fluency | Difficulty |\n");
        md.push_str("|---|----------|---------|------|-------|----------|---------|------------|\n");
        for o in &self.outcomes {
            let (acc, flu) = match &o.alignment {
                Some(a) => (
                    format!("{}%", a.accuracy_percent),
                    format!("{}%", a.fluency_percent),
                ),
                None => ("-".to_string(), "-".to_string()),
            };
            md.push_str(&format!(
                "| {} | {} | {} | {}ms | {}s | {} | {} | {} |\n",
                o.index,
                o.question_id.as_deref().unwrap_or("-"),
                if o.is_correct { "yes" } else { "no" },
                o.response_time_ms,
                o.time_limit_sec,
                acc,
                flu,
                o.modifier_after
            ));
        }

        md
    }
}

/// Change between two sessions of the same learner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressReport {
    pub baseline_id: Uuid,
    pub current_id: Uuid,
    pub correct_rate_delta: f64,
    /// Only present when both sessions had spoken items.
    pub accuracy_delta: Option<f64>,
    pub fluency_delta: Option<f64>,
    pub response_time_delta_ms: f64,
    pub modifier_delta: i64,
}

impl ProgressReport {
    /// True when the learner answered a smaller share correctly than before.
    pub fn has_decline(&self, threshold: f64) -> bool {
        self.correct_rate_delta < -threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReadalongConfig;
    use crate::model::{DifficultyModifier, Transcript};
    use crate::session::AssessmentSession;

    fn run(answers: &[bool]) -> SessionReport {
        let mut s = AssessmentSession::new("3".parse().unwrap(), &ReadalongConfig::default());
        for (i, &ok) in answers.iter().enumerate() {
            s.answer_written(Some(&format!("q{i}")), ok, 1000 + i as u64 * 100);
        }
        s.answer_spoken(Some("read"), "a red hen", &Transcript::from_text("a red hen"), 2000);
        s.finish()
    }

    #[test]
    fn json_roundtrip() {
        let report = run(&[true, false]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("report.json");

        report.save_json(&path).unwrap();
        let loaded = SessionReport::load_json(&path).unwrap();

        assert_eq!(loaded.id, report.id);
        assert_eq!(loaded.grade, report.grade);
        assert_eq!(loaded.outcomes, report.outcomes);
        assert_eq!(loaded.final_state, report.final_state);
    }

    #[test]
    fn load_missing_file_fails() {
        assert!(SessionReport::load_json(Path::new("/nonexistent/report.json")).is_err());
    }

    #[test]
    fn compare_sessions() {
        let before = run(&[false, false]);
        let after = run(&[true, true, true]);

        let progress = after.compare(&before);
        assert!(progress.correct_rate_delta > 0.0);
        assert_eq!(progress.accuracy_delta, Some(0.0));
        assert_eq!(
            progress.modifier_delta,
            after.stats.final_modifier.value() - before.stats.final_modifier.value()
        );
        assert!(!progress.has_decline(0.05));
        assert!(before.compare(&after).has_decline(0.05));
    }

    #[test]
    fn markdown_output() {
        let report = run(&[true, true, true]);
        let md = report.to_markdown();
        assert!(md.contains("| 1 | q0 | yes |"));
        assert!(md.contains("| 4 | read | yes |"));
        assert!(md.contains("100% accuracy"));
        assert_eq!(report.final_state.difficulty_modifier, DifficultyModifier::Harder);
    }
}
