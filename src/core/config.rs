//! Game configuration types.
//!
//! A session is configured at construction by a `GameConfig`:
//! - `GameVariant`: classic rules, or rules that flip on a timer
//! - `ScoringPolicy`: how a round outcome moves the scores
//! - `CountdownConfig`: the pre-reveal countdown
//! - `FlipConfig`: cadence of the rule-flip scheduler
//!
//! Configs can be built in code (`GameConfig::classic()`,
//! `GameConfig::flipping()`, `with_*` builders) or loaded from JSON.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default score that ends a match.
pub const DEFAULT_SCORE_LIMIT: u32 = 5;

/// Which game the session plays.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameVariant {
    /// Fixed rules, simple scoring.
    #[default]
    Classic,
    /// Rules flip between Normal and Reversed on a timer, competitive scoring.
    Flipping,
}

/// How a decided round moves the scores.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringPolicy {
    /// Winner gains a point; loser is unchanged.
    #[default]
    Simple,
    /// Winner gains a point; loser drops a point, never below zero.
    Competitive,
}

/// When the session tries to persist the player's score as a high score.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HighScorePolicy {
    /// After every round the player wins.
    #[default]
    EveryPlayerWin,
    /// Only when a match ends.
    MatchEnd,
}

/// Pre-reveal countdown.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CountdownConfig {
    /// Number the countdown starts from.
    pub ticks: u32,
    /// Milliseconds between ticks.
    pub interval_ms: u64,
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self {
            ticks: 3,
            interval_ms: 600,
        }
    }
}

impl CountdownConfig {
    /// Time from the first tick to completion, saturating at `u64::MAX`.
    #[must_use]
    pub const fn total_ms(&self) -> u64 {
        (self.ticks as u64).saturating_mul(self.interval_ms)
    }
}

/// Cadence of the rule-flip scheduler.
///
/// One period is the announcement window followed by the active window
/// in which the next-flip countdown runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlipConfig {
    /// Milliseconds between flips.
    pub period_ms: u64,
    /// How long the "rules changed" notice stays up.
    pub notice_ms: u64,
    /// Steps in the countdown-to-next-flip.
    pub countdown_steps: u32,
    /// Milliseconds between countdown steps.
    pub countdown_interval_ms: u64,
}

impl Default for FlipConfig {
    fn default() -> Self {
        Self {
            period_ms: 17_000,
            notice_ms: 2_000,
            countdown_steps: 15,
            countdown_interval_ms: 1_000,
        }
    }
}

/// Complete session configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Which game to play.
    pub variant: GameVariant,

    /// Score that ends a match.
    pub score_limit: u32,

    /// Scoring policy applied to each decided round.
    pub scoring: ScoringPolicy,

    /// When to persist high scores.
    pub high_score: HighScorePolicy,

    /// Pre-reveal countdown.
    pub countdown: CountdownConfig,

    /// Delay between a match ending and the scores resetting.
    /// Input stays locked for this window.
    pub post_match_delay_ms: u64,

    /// Rule-flip cadence. Ignored by the classic variant.
    pub flip: FlipConfig,

    /// Seed for opponent draws.
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::classic()
    }
}

impl GameConfig {
    /// Classic rules: no flipping, simple scoring.
    #[must_use]
    pub fn classic() -> Self {
        Self {
            variant: GameVariant::Classic,
            score_limit: DEFAULT_SCORE_LIMIT,
            scoring: ScoringPolicy::Simple,
            high_score: HighScorePolicy::default(),
            countdown: CountdownConfig::default(),
            post_match_delay_ms: 500,
            flip: FlipConfig::default(),
            seed: 42,
        }
    }

    /// Flipping rules with competitive scoring.
    #[must_use]
    pub fn flipping() -> Self {
        Self {
            variant: GameVariant::Flipping,
            scoring: ScoringPolicy::Competitive,
            ..Self::classic()
        }
    }

    /// Set the score limit.
    #[must_use]
    pub fn with_score_limit(mut self, limit: u32) -> Self {
        self.score_limit = limit;
        self
    }

    /// Set the scoring policy.
    #[must_use]
    pub fn with_scoring(mut self, scoring: ScoringPolicy) -> Self {
        self.scoring = scoring;
        self
    }

    /// Set the high-score policy.
    #[must_use]
    pub fn with_high_score(mut self, policy: HighScorePolicy) -> Self {
        self.high_score = policy;
        self
    }

    /// Set the countdown.
    #[must_use]
    pub fn with_countdown(mut self, ticks: u32, interval_ms: u64) -> Self {
        self.countdown = CountdownConfig { ticks, interval_ms };
        self
    }

    /// Set the flip cadence.
    #[must_use]
    pub fn with_flip(mut self, flip: FlipConfig) -> Self {
        self.flip = flip;
        self
    }

    /// Set the seed for opponent draws.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Does this config run the rule-flip scheduler?
    #[must_use]
    pub fn flips_rules(&self) -> bool {
        self.variant == GameVariant::Flipping
    }

    /// Check the config for values the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.score_limit == 0 {
            return Err(ConfigError::ZeroScoreLimit);
        }
        if self.countdown.interval_ms == 0 {
            return Err(ConfigError::ZeroInterval { field: "countdown.interval_ms" });
        }
        if self.flips_rules() {
            if self.flip.countdown_interval_ms == 0 {
                return Err(ConfigError::ZeroInterval { field: "flip.countdown_interval_ms" });
            }
            if self.flip.period_ms <= self.flip.notice_ms {
                return Err(ConfigError::FlipPeriodTooShort {
                    period_ms: self.flip.period_ms,
                    notice_ms: self.flip.notice_ms,
                });
            }
        }
        Ok(())
    }

    /// Parse and validate a JSON config. Missing fields take classic defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

/// Reasons a `GameConfig` is rejected.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("score limit must be at least 1")]
    ZeroScoreLimit,
    #[error("{field} must be greater than zero")]
    ZeroInterval { field: &'static str },
    #[error("flip period {period_ms}ms must exceed the notice window {notice_ms}ms")]
    FlipPeriodTooShort { period_ms: u64, notice_ms: u64 },
    #[error("invalid config json: {0}")]
    Parse(#[from] serde_json::Error),
}
