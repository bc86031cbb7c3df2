//! Opponent policies.
//!
//! - `UniformOpponent`: draws each hand with equal probability (the default)
//! - `ScriptedOpponent`: replays a fixed sequence; used for demos and tests

use std::collections::VecDeque;

use crate::core::{Choice, GameRng};

/// How the opponent picks its hand when a round resolves.
pub trait OpponentPolicy: Send {
    /// Pick the opponent's hand for the round being resolved.
    fn choose(&mut self, rng: &mut GameRng) -> Choice;
}

/// Uniform random opponent.
#[derive(Clone, Copy, Debug, Default)]
pub struct UniformOpponent;

impl OpponentPolicy for UniformOpponent {
    fn choose(&mut self, rng: &mut GameRng) -> Choice {
        rng.choice()
    }
}

/// Opponent that plays a fixed list of hands in order.
///
/// Falls back to uniform draws once the script runs out.
#[derive(Clone, Debug, Default)]
pub struct ScriptedOpponent {
    script: VecDeque<Choice>,
}

impl ScriptedOpponent {
    /// Create an opponent that plays `hands` in order.
    pub fn new(hands: impl IntoIterator<Item = Choice>) -> Self {
        Self {
            script: hands.into_iter().collect(),
        }
    }

    /// An opponent that always throws the same hand.
    #[must_use]
    pub fn repeating(hand: Choice, rounds: usize) -> Self {
        Self::new(std::iter::repeat(hand).take(rounds))
    }

    /// Hands left in the script.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl OpponentPolicy for ScriptedOpponent {
    fn choose(&mut self, rng: &mut GameRng) -> Choice {
        self.script.pop_front().unwrap_or_else(|| rng.choice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_plays_in_order_then_falls_back() {
        let mut rng = GameRng::new(1);
        let mut opponent = ScriptedOpponent::new([Choice::Rock, Choice::Paper]);

        assert_eq!(opponent.choose(&mut rng), Choice::Rock);
        assert_eq!(opponent.choose(&mut rng), Choice::Paper);
        assert_eq!(opponent.remaining(), 0);

        // Script exhausted: still produces a valid hand
        let next = opponent.choose(&mut rng);
        assert!(Choice::ALL.contains(&next));
    }

    #[test]
    fn test_uniform_matches_rng() {
        let mut a = GameRng::new(5);
        let mut b = GameRng::new(5);
        let mut opponent = UniformOpponent;

        for _ in 0..20 {
            assert_eq!(opponent.choose(&mut a), b.choice());
        }
    }
}
