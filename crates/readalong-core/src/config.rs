//! Engine configuration and config-file loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Tuning for the alignment scorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScorerConfig {
    /// Gaps strictly longer than this count as a hesitation.
    pub hesitation_threshold_ms: u64,
    /// Fluency points lost per hesitation.
    pub hesitation_penalty: u32,
    /// Flat fluency penalty when the response is materially shorter than expected.
    pub omission_penalty: u32,
    /// A response shorter than this percentage of the expected words is an omission.
    pub omission_ratio_percent: u32,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            hesitation_threshold_ms: 500,
            hesitation_penalty: 5,
            omission_penalty: 15,
            omission_ratio_percent: 80,
        }
    }
}

/// Tuning for the difficulty controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyConfig {
    /// Consecutive correct answers needed to step the modifier up.
    pub step_up_after: u32,
    /// Consecutive incorrect answers needed to step the modifier down.
    pub step_down_after: u32,
    /// Seconds removed from the time limit per modifier step.
    pub seconds_per_step: u32,
    pub min_time_limit_sec: u32,
    pub max_time_limit_sec: u32,
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Self {
            step_up_after: 3,
            step_down_after: 2,
            seconds_per_step: 3,
            min_time_limit_sec: 5,
            max_time_limit_sec: 60,
        }
    }
}

/// Settings for the session loop that composes scorer and controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Spoken answers at or above this accuracy count as correct.
    pub pass_accuracy_percent: u8,
    /// Questions drawn per selection round.
    pub questions_per_round: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            pass_accuracy_percent: 80,
            questions_per_round: 5,
        }
    }
}

/// Top-level readalong configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReadalongConfig {
    #[serde(default)]
    pub scorer: ScorerConfig,
    #[serde(default)]
    pub difficulty: DifficultyConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `readalong.toml` in the current directory
/// 2. `~/.config/readalong/config.toml`
///
/// Environment variable override: `READALONG_PASS_ACCURACY`.
pub fn load_config() -> Result<ReadalongConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<ReadalongConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("readalong.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => ReadalongConfig::default(),
    };

    if let Ok(value) = std::env::var("READALONG_PASS_ACCURACY") {
        let pass: u8 = value
            .trim()
            .parse()
            .with_context(|| format!("invalid READALONG_PASS_ACCURACY: '{value}'"))?;
        config.session.pass_accuracy_percent = pass;
    }

    validate_config(&config)?;
    Ok(config)
}

/// Parse a TOML string into a config.
pub fn parse_config(content: &str) -> Result<ReadalongConfig> {
    Ok(toml::from_str(content)?)
}

fn validate_config(config: &ReadalongConfig) -> Result<()> {
    anyhow::ensure!(
        config.session.pass_accuracy_percent <= 100,
        "pass_accuracy_percent must be at most 100"
    );
    anyhow::ensure!(
        config.difficulty.min_time_limit_sec <= config.difficulty.max_time_limit_sec,
        "min_time_limit_sec must not exceed max_time_limit_sec"
    );
    anyhow::ensure!(
        config.difficulty.step_up_after >= 1 && config.difficulty.step_down_after >= 1,
        "streak thresholds must be at least 1"
    );
    Ok(())
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("readalong"))
}
