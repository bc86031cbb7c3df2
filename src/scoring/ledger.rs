//! Score ledger.
//!
//! ## Policies
//!
//! - `Simple`: winner +1, loser unchanged
//! - `Competitive`: winner +1, loser -1 (clamped at 0)
//!
//! ## Invariants
//!
//! - Both scores stay in `[0, limit]`
//! - A score only reaches `limit` through a win for that side
//! - Once a side reaches `limit` the match is over and outcomes are ignored
//!   until `reset()`

use serde::{Deserialize, Serialize};

use crate::core::{RoundOutcome, ScoringPolicy, Scores, Side};

/// What the ledger reports after applying an outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerReport {
    /// Scores after the outcome.
    pub scores: Scores,
    /// True once either side has reached the limit.
    pub match_over: bool,
    /// The side that reached the limit, if any.
    pub limit_reached_by: Option<Side>,
}

/// Player and opponent scores for one match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreLedger {
    scores: Scores,
    limit: u32,
    policy: ScoringPolicy,
}

impl ScoreLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new(limit: u32, policy: ScoringPolicy) -> Self {
        assert!(limit > 0, "Score limit must be at least 1");
        Self {
            scores: Scores::default(),
            limit,
            policy,
        }
    }

    /// Restore a ledger at given scores, clamped into range.
    ///
    /// If both sides would sit at the limit, the player keeps it.
    #[must_use]
    pub fn with_scores(limit: u32, policy: ScoringPolicy, scores: Scores) -> Self {
        let mut ledger = Self::new(limit, policy);
        let player = scores.player.min(limit);
        let opponent_cap = if player == limit { limit - 1 } else { limit };
        ledger.scores = Scores::new(player, scores.opponent.min(opponent_cap));
        ledger
    }

    /// Current scores.
    #[must_use]
    pub fn scores(&self) -> Scores {
        self.scores
    }

    /// The score that ends a match.
    #[must_use]
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// The scoring policy in use.
    #[must_use]
    pub fn policy(&self) -> ScoringPolicy {
        self.policy
    }

    /// The side at the limit, if the match is over.
    #[must_use]
    pub fn limit_reached_by(&self) -> Option<Side> {
        if self.scores.player >= self.limit {
            Some(Side::Player)
        } else if self.scores.opponent >= self.limit {
            Some(Side::Opponent)
        } else {
            None
        }
    }

    /// Has either side reached the limit?
    #[must_use]
    pub fn is_match_over(&self) -> bool {
        self.limit_reached_by().is_some()
    }

    /// Apply a round outcome.
    ///
    /// Draws never move the scores. Outcomes arriving after the match is
    /// over are ignored; the report still says the match is over.
    pub fn apply_outcome(&mut self, outcome: RoundOutcome) -> LedgerReport {
        if let (Some(winner), false) = (outcome.winner(), self.is_match_over()) {
            *self.scores.get_mut(winner) += 1;
            if self.policy == ScoringPolicy::Competitive {
                let loser = self.scores.get_mut(winner.other());
                *loser = loser.saturating_sub(1);
            }
        }
        self.report()
    }

    /// Current scores and termination status.
    #[must_use]
    pub fn report(&self) -> LedgerReport {
        let limit_reached_by = self.limit_reached_by();
        LedgerReport {
            scores: self.scores,
            match_over: limit_reached_by.is_some(),
            limit_reached_by,
        }
    }

    /// Zero both scores for a new match.
    pub fn reset(&mut self) {
        self.scores = Scores::default();
    }
}
