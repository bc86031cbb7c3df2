//! Choices, rule sets and round outcomes.
//!
//! ## Choice
//!
//! The three hands a player can throw. Closed enum, no lifecycle.
//!
//! ## RuleSet
//!
//! Which beats-relation is active. The flipping variant toggles between
//! `Normal` and `Reversed` on a timer; the classic variant stays `Normal`.

use serde::{Deserialize, Serialize};

/// A hand thrown in a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Choice {
    Rock,
    Paper,
    Scissors,
}

impl Choice {
    /// All choices, in the order the opponent draws from.
    pub const ALL: [Choice; 3] = [Choice::Paper, Choice::Scissors, Choice::Rock];

    /// Lowercase name, as used in asset paths and CLI input.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Choice::Rock => "rock",
            Choice::Paper => "paper",
            Choice::Scissors => "scissors",
        }
    }

    /// Parse a choice name, case-insensitive.
    ///
    /// ```
    /// use rps_engine::core::Choice;
    ///
    /// assert_eq!(Choice::parse("Rock"), Some(Choice::Rock));
    /// assert_eq!(Choice::parse("lizard"), None);
    /// ```
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "rock" => Some(Choice::Rock),
            "paper" => Some(Choice::Paper),
            "scissors" => Some(Choice::Scissors),
            _ => None,
        }
    }
}

impl std::fmt::Display for Choice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Choice::Rock => "Rock",
            Choice::Paper => "Paper",
            Choice::Scissors => "Scissors",
        };
        f.write_str(name)
    }
}

/// The active win/lose mapping between choices.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleSet {
    #[default]
    Normal,
    Reversed,
}

impl RuleSet {
    /// The other rule set.
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            RuleSet::Normal => RuleSet::Reversed,
            RuleSet::Reversed => RuleSet::Normal,
        }
    }

    /// Banner text shown when this rule becomes active.
    #[must_use]
    pub const fn banner(self) -> &'static str {
        match self {
            RuleSet::Normal => "NORMAL MODE",
            RuleSet::Reversed => "REVERSED RULE",
        }
    }
}

impl std::fmt::Display for RuleSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleSet::Normal => f.write_str("Normal"),
            RuleSet::Reversed => f.write_str("Reversed"),
        }
    }
}

/// One of the two participants in a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Player,
    Opponent,
}

impl Side {
    /// The other side.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Side::Player => Side::Opponent,
            Side::Opponent => Side::Player,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Player => f.write_str("Player"),
            Side::Opponent => f.write_str("Opponent"),
        }
    }
}

/// Result of a single round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundOutcome {
    /// One side took the round.
    Winner(Side),
    /// Both threw the same hand.
    Draw,
}

impl RoundOutcome {
    /// The winning side, if any.
    #[must_use]
    pub const fn winner(self) -> Option<Side> {
        match self {
            RoundOutcome::Winner(side) => Some(side),
            RoundOutcome::Draw => None,
        }
    }

    /// Check if a side won.
    #[must_use]
    pub fn is_winner(self, side: Side) -> bool {
        self.winner() == Some(side)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_flip_round_trip() {
        assert_eq!(RuleSet::Normal.flipped(), RuleSet::Reversed);
        assert_eq!(RuleSet::Normal.flipped().flipped(), RuleSet::Normal);
    }

    #[test]
    fn test_parse_choice() {
        assert_eq!(Choice::parse(" SCISSORS "), Some(Choice::Scissors));
        assert_eq!(Choice::parse("paper"), Some(Choice::Paper));
        assert_eq!(Choice::parse(""), None);
    }

    #[test]
    fn test_outcome_winner() {
        let outcome = RoundOutcome::Winner(Side::Opponent);
        assert!(outcome.is_winner(Side::Opponent));
        assert!(!outcome.is_winner(Side::Player));
        assert_eq!(RoundOutcome::Draw.winner(), None);
    }

    #[test]
    fn test_all_choices_distinct() {
        let all = Choice::ALL;
        assert_ne!(all[0], all[1]);
        assert_ne!(all[1], all[2]);
        assert_ne!(all[0], all[2]);
    }
}
