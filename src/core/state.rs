//! Match state: scores and the rule in force.
//!
//! ## Scores
//!
//! Player and opponent points for the current match.
//!
//! ## MatchState
//!
//! Observable view of a session's match:
//! - Both scores
//! - Whether the match is still being played
//! - The currently active rule set

use serde::{Deserialize, Serialize};

use super::choice::{RuleSet, Side};

/// Points for each side of the current match.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scores {
    pub player: u32,
    pub opponent: u32,
}

impl Scores {
    /// Create a score pair.
    #[must_use]
    pub const fn new(player: u32, opponent: u32) -> Self {
        Self { player, opponent }
    }

    /// Score for one side.
    #[must_use]
    pub const fn get(&self, side: Side) -> u32 {
        match side {
            Side::Player => self.player,
            Side::Opponent => self.opponent,
        }
    }

    /// Mutable score for one side.
    pub fn get_mut(&mut self, side: Side) -> &mut u32 {
        match side {
            Side::Player => &mut self.player,
            Side::Opponent => &mut self.opponent,
        }
    }
}

impl std::fmt::Display for Scores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.player, self.opponent)
    }
}

/// Snapshot of a match as the session sees it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchState {
    pub player_score: u32,
    pub opponent_score: u32,
    /// False between a match ending and its reset.
    pub active: bool,
    pub current_rule_set: RuleSet,
}

impl MatchState {
    /// Fresh match at 0-0 under the given rule.
    #[must_use]
    pub const fn new(rule: RuleSet) -> Self {
        Self {
            player_score: 0,
            opponent_score: 0,
            active: true,
            current_rule_set: rule,
        }
    }

    /// Scores as a pair.
    #[must_use]
    pub const fn scores(&self) -> Scores {
        Scores::new(self.player_score, self.opponent_score)
    }
}

impl Default for MatchState {
    fn default() -> Self {
        Self::new(RuleSet::Normal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scores_by_side() {
        let mut scores = Scores::new(3, 1);
        assert_eq!(scores.get(Side::Player), 3);
        assert_eq!(scores.get(Side::Opponent), 1);

        *scores.get_mut(Side::Opponent) += 1;
        assert_eq!(scores, Scores::new(3, 2));
        assert_eq!(scores.to_string(), "3-2");
    }

    #[test]
    fn test_new_match_state() {
        let state = MatchState::new(RuleSet::Reversed);
        assert_eq!(state.scores(), Scores::default());
        assert!(state.active);
        assert_eq!(state.current_rule_set, RuleSet::Reversed);
    }
}
