//! Fuzzy alignment of a spoken transcript against its expected text.
//!
//! Accuracy gives partial credit per expected word using normalized edit
//! distance, so a near-miss like "buter" for "butter" still earns most of
//! the word. Fluency is a linear penalty model over hesitations (gaps in
//! word timing) and omitted content.

use crate::config::ScorerConfig;
use crate::model::{AlignmentResult, HesitationStats, Transcript, WordToken};

/// Split on whitespace, lower-case, and drop empty tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_lowercase).collect()
}

/// Levenshtein distance over Unicode scalar values, unit costs.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            curr[j + 1] = substitution.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// `1 - levenshtein(a, b) / max(len(a), len(b))`, clamped to [0, 1].
///
/// Two empty strings are identical.
pub fn similarity(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }
    (1.0 - levenshtein(a, b) as f64 / longest as f64).clamp(0.0, 1.0)
}

/// Scores responses with a fixed [`ScorerConfig`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AlignmentScorer {
    config: ScorerConfig,
}

impl AlignmentScorer {
    pub fn new(config: ScorerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScorerConfig {
        &self.config
    }

    /// Word-level accuracy, 0..=100. See [`word_accuracy`].
    pub fn word_accuracy(&self, expected: &str, actual: &str) -> u8 {
        let expected = tokenize(expected);
        let actual = tokenize(actual);
        accuracy_of_tokens(&expected, &actual)
    }

    /// Count gaps between consecutive words longer than the hesitation threshold.
    ///
    /// A pair where either side lacks timing (absent or zero) contributes no gap.
    pub fn detect_hesitations(&self, tokens: &[WordToken]) -> HesitationStats {
        let mut stats = HesitationStats::default();

        for pair in tokens.windows(2) {
            let prev_end = pair[0].end_ms.filter(|&t| t > 0);
            let start = pair[1].start_ms.filter(|&t| t > 0);
            let (Some(prev_end), Some(start)) = (prev_end, start) else {
                continue;
            };

            let gap = start.saturating_sub(prev_end);
            if gap > self.config.hesitation_threshold_ms {
                stats.hesitation_count += 1;
                stats.total_pause_ms += gap;
            }
        }

        stats
    }

    /// Fluency after hesitation and omission penalties, 0..=100.
    pub fn fluency_score(
        &self,
        expected_word_count: usize,
        actual_word_count: usize,
        hesitation_count: u32,
    ) -> u8 {
        let mut score = 100i64 - i64::from(self.config.hesitation_penalty) * i64::from(hesitation_count);

        // actual < ratio% of expected, kept in integers to avoid float edge cases
        let actual_scaled = actual_word_count as u128 * 100;
        let expected_scaled = expected_word_count as u128 * u128::from(self.config.omission_ratio_percent);
        if actual_scaled < expected_scaled {
            score -= i64::from(self.config.omission_penalty);
        }

        score.clamp(0, 100) as u8
    }

    /// Score a transcript against the expected text.
    ///
    /// When the transcript carries no text but does carry words, the words
    /// are joined to form the actual response.
    pub fn score_response(&self, expected: &str, transcript: &Transcript) -> AlignmentResult {
        let tokens = transcript.tokens();
        let actual_text = if transcript.text.trim().is_empty() {
            tokens
                .iter()
                .map(|t| t.text.as_str())
                .collect::<Vec<_>>()
                .join(" ")
        } else {
            transcript.text.clone()
        };

        let expected_tokens = tokenize(expected);
        let actual_tokens = tokenize(&actual_text);

        let accuracy_percent = accuracy_of_tokens(&expected_tokens, &actual_tokens);
        let hesitations = self.detect_hesitations(&tokens);
        let fluency_percent = self.fluency_score(
            expected_tokens.len(),
            actual_tokens.len(),
            hesitations.hesitation_count,
        );

        tracing::debug!(
            expected_words = expected_tokens.len(),
            actual_words = actual_tokens.len(),
            accuracy_percent,
            fluency_percent,
            hesitations = hesitations.hesitation_count,
            "scored response"
        );

        AlignmentResult {
            accuracy_percent,
            hesitation_count: hesitations.hesitation_count,
            total_pause_ms: hesitations.total_pause_ms,
            fluency_percent,
        }
    }
}

fn accuracy_of_tokens(expected: &[String], actual: &[String]) -> u8 {
    if expected.is_empty() {
        return 0;
    }

    let total: f64 = expected
        .iter()
        .map(|e| best_similarity(e, actual))
        .sum();

    (total / expected.len() as f64 * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Best similarity of `word` against any candidate; first occurrence wins ties.
fn best_similarity(word: &str, candidates: &[String]) -> f64 {
    let mut best = 0.0f64;
    for candidate in candidates {
        let s = similarity(word, candidate);
        if s > best {
            best = s;
            if best >= 1.0 {
                break;
            }
        }
    }
    best
}

/// Word-level accuracy of `actual` against `expected`, 0..=100.
///
/// Each expected word earns its best similarity against any actual word; the
/// mean is scaled to a percentage and rounded. Empty expected text scores 0.
pub fn word_accuracy(expected: &str, actual: &str) -> u8 {
    AlignmentScorer::default().word_accuracy(expected, actual)
}

/// Hesitations (gaps > 500 ms) in a timed word sequence.
pub fn detect_hesitations(tokens: &[WordToken]) -> HesitationStats {
    AlignmentScorer::default().detect_hesitations(tokens)
}

/// `100 - 5 * hesitations`, minus 15 when fewer than 80% of the expected
/// words were said, clamped to 0..=100.
pub fn fluency_score(expected_word_count: usize, actual_word_count: usize, hesitation_count: u32) -> u8 {
    AlignmentScorer::default().fluency_score(expected_word_count, actual_word_count, hesitation_count)
}

/// Accuracy, hesitations, and fluency for one transcript.
pub fn score_response(expected: &str, transcript: &Transcript) -> AlignmentResult {
    AlignmentScorer::default().score_response(expected, transcript)
}
