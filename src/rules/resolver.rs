//! Choice and outcome resolver.
//!
//! Pure functions over closed enums. No side effects, no error cases.
//!
//! Under `Normal`: Paper beats Scissors, Scissors beats Rock, Rock beats Paper.
//! `Reversed` is the exact inverse relation.

use crate::core::{Choice, RoundOutcome, RuleSet, Side};

/// Does `a` beat `b` under `rules`?
///
/// Always false when `a == b`.
#[must_use]
pub const fn beats(a: Choice, b: Choice, rules: RuleSet) -> bool {
    let normal = matches!(
        (a, b),
        (Choice::Paper, Choice::Scissors)
            | (Choice::Scissors, Choice::Rock)
            | (Choice::Rock, Choice::Paper)
    );
    let reversed = matches!(
        (a, b),
        (Choice::Rock, Choice::Scissors)
            | (Choice::Paper, Choice::Rock)
            | (Choice::Scissors, Choice::Paper)
    );
    match rules {
        RuleSet::Normal => normal,
        RuleSet::Reversed => reversed,
    }
}

/// Resolve a round between the player's and the opponent's hand.
///
/// ```
/// use rps_engine::core::{Choice, RoundOutcome, RuleSet, Side};
/// use rps_engine::rules::resolve;
///
/// let outcome = resolve(Choice::Rock, Choice::Scissors, RuleSet::Reversed);
/// assert_eq!(outcome, RoundOutcome::Winner(Side::Player));
/// ```
#[must_use]
pub const fn resolve(player: Choice, opponent: Choice, rules: RuleSet) -> RoundOutcome {
    if beats(player, opponent, rules) {
        RoundOutcome::Winner(Side::Player)
    } else if beats(opponent, player, rules) {
        RoundOutcome::Winner(Side::Opponent)
    } else {
        RoundOutcome::Draw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_relation() {
        assert!(beats(Choice::Paper, Choice::Scissors, RuleSet::Normal));
        assert!(beats(Choice::Scissors, Choice::Rock, RuleSet::Normal));
        assert!(beats(Choice::Rock, Choice::Paper, RuleSet::Normal));
        assert!(!beats(Choice::Scissors, Choice::Paper, RuleSet::Normal));
    }

    #[test]
    fn test_reversed_relation() {
        assert!(beats(Choice::Rock, Choice::Scissors, RuleSet::Reversed));
        assert!(beats(Choice::Paper, Choice::Rock, RuleSet::Reversed));
        assert!(beats(Choice::Scissors, Choice::Paper, RuleSet::Reversed));
        assert!(!beats(Choice::Paper, Choice::Scissors, RuleSet::Reversed));
    }

    #[test]
    fn test_same_hand_never_beats_itself() {
        for choice in Choice::ALL {
            for rules in [RuleSet::Normal, RuleSet::Reversed] {
                assert!(!beats(choice, choice, rules));
                assert_eq!(resolve(choice, choice, rules), RoundOutcome::Draw);
            }
        }
    }

    #[test]
    fn test_exactly_one_side_wins_distinct_hands() {
        for a in Choice::ALL {
            for b in Choice::ALL {
                if a == b {
                    continue;
                }
                for rules in [RuleSet::Normal, RuleSet::Reversed] {
                    assert_ne!(beats(a, b, rules), beats(b, a, rules));
                }
            }
        }
    }

    #[test]
    fn test_opponent_win_under_normal() {
        assert_eq!(
            resolve(Choice::Rock, Choice::Scissors, RuleSet::Normal),
            RoundOutcome::Winner(Side::Opponent)
        );
    }
}
