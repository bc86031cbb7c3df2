//! Core engine types: choices, rule sets, scores, RNG, configuration.
//!
//! Everything else in the crate builds on these. None of them know about
//! timers or sessions.

pub mod choice;
pub mod config;
pub mod rng;
pub mod state;

pub use choice::{Choice, RoundOutcome, RuleSet, Side};
pub use config::{
    ConfigError, CountdownConfig, FlipConfig, GameConfig, GameVariant, HighScorePolicy,
    ScoringPolicy, DEFAULT_SCORE_LIMIT,
};
pub use rng::{GameRng, GameRngState};
pub use state::{MatchState, Scores};
