//! Session notifications and scheduled tasks.
//!
//! The session never calls back into a UI. It appends `SessionEvent`s to an
//! outbox that the caller drains after driving the clock.

use serde::{Deserialize, Serialize};

use crate::core::{Choice, RoundOutcome, RuleSet, Scores, Side};
use crate::timing::{FlipTask, RoundTimerTask};

/// A resolved round, as kept in the match history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    /// 1-based round number within the session.
    pub round: u32,
    pub player: Choice,
    pub opponent: Choice,
    /// Rule that was active when the round resolved.
    pub rule: RuleSet,
    pub outcome: RoundOutcome,
    /// Scores after the round.
    pub scores: Scores,
    /// Clock time the round resolved at.
    pub at_ms: u64,
}

/// Something the UI should show.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// Round countdown shows this number.
    CountdownTick(u32),
    /// A round was decided.
    RoundResolved(RoundRecord),
    /// The countdown finished with no selection; nothing was scored.
    RoundAborted,
    /// A side reached the score limit.
    MatchOver { winner: Side, scores: Scores },
    /// Scores were zeroed for a new match.
    MatchReset,
    /// A rule became active.
    RuleChanged(RuleSet),
    /// The rule-change banner should be hidden.
    RuleNoticeExpired(RuleSet),
    /// Seconds until the next rule flip.
    FlipCountdown(u32),
    /// The player's score was stored as a new high score.
    HighScoreSaved(u32),
}

/// Everything the session puts on its timer queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionTask {
    Round(RoundTimerTask),
    Flip(FlipTask),
    MatchReset { generation: u64 },
}

impl From<RoundTimerTask> for SessionTask {
    fn from(task: RoundTimerTask) -> Self {
        SessionTask::Round(task)
    }
}

impl From<FlipTask> for SessionTask {
    fn from(task: FlipTask) -> Self {
        SessionTask::Flip(task)
    }
}
