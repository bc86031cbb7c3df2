//! # rps-engine
//!
//! Round engine for a Rock-Paper-Scissors game against the computer.
//!
//! ## Design Principles
//!
//! 1. **Explicit time**: Every delay goes through a `Scheduler`. The engine
//!    never sleeps, spawns threads or owns a real clock; callers advance
//!    virtual time and drain notifications.
//!
//! 2. **Input locking**: At most one round is in flight. Choices submitted
//!    while a round is counting down or resolving are dropped.
//!
//! 3. **Fire-and-forget persistence**: High scores go to an external
//!    `UserDirectory`. Its failures are logged and never stall a match.
//!
//! ## Variants
//!
//! - **Classic**: fixed rules, winner +1.
//! - **Flipping**: rules toggle between Normal and Reversed every 17 s;
//!   winner +1 and loser -1 (never below zero). The rule is read when a
//!   round resolves, so a flip during the countdown changes that round.
//!
//! ## Modules
//!
//! - `core`: Choices, rule sets, scores, RNG, configuration
//! - `rules`: Outcome resolver and opponent policies
//! - `scoring`: Score ledger and match termination
//! - `timing`: Scheduler interface, timer queue, round timer, rule flipper
//! - `session`: The game session state machine
//! - `directory`: User backend contract, in-memory backend, leaderboard

pub mod core;
pub mod directory;
pub mod rules;
pub mod scoring;
pub mod session;
pub mod timing;

// Re-export commonly used types
pub use crate::core::{
    Choice, ConfigError, GameConfig, GameRng, GameVariant, HighScorePolicy, MatchState,
    RoundOutcome, RuleSet, ScoringPolicy, Scores, Side,
};

pub use crate::rules::{beats, resolve, OpponentPolicy, ScriptedOpponent, UniformOpponent};

pub use crate::scoring::{LedgerReport, ScoreLedger};

pub use crate::timing::{
    CancellationHandle, FlipEvent, RoundTimer, RoundTimerEvent, RuleFlipScheduler, Scheduler,
    TimerId, TimerQueue,
};

pub use crate::session::{
    GameSession, RoundRecord, SessionEvent, SessionPhase, SessionSnapshot, SnapshotError,
};

pub use crate::directory::{
    DirectoryError, Leaderboard, MemoryDirectory, UserDirectory, UserId, UserRecord,
};
