//! Leaderboard view over a `UserDirectory`.

use serde::{Deserialize, Serialize};

use super::{DirectoryError, UserDirectory, UserId};

/// Entries shown on the public leaderboard.
pub const DEFAULT_LEADERBOARD_SIZE: usize = 10;

/// Display badge for a leaderboard rank.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RankBadge {
    Gold,
    Silver,
    Bronze,
    Place(usize),
}

impl RankBadge {
    /// Badge for a 1-based rank.
    #[must_use]
    pub const fn for_rank(rank: usize) -> Self {
        match rank {
            1 => RankBadge::Gold,
            2 => RankBadge::Silver,
            3 => RankBadge::Bronze,
            n => RankBadge::Place(n),
        }
    }
}

impl std::fmt::Display for RankBadge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RankBadge::Gold => f.write_str("🥇"),
            RankBadge::Silver => f.write_str("🥈"),
            RankBadge::Bronze => f.write_str("🥉"),
            RankBadge::Place(n) => write!(f, "{n}"),
        }
    }
}

/// One leaderboard row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// 1-based rank.
    pub rank: usize,
    pub badge: RankBadge,
    pub user: UserId,
    /// Display name; "Anonymous" when the user has none.
    pub name: String,
    pub score: u32,
    /// Row belongs to the signed-in user.
    pub is_current_user: bool,
}

/// Ranked view of the top users.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// Load the top `limit` users.
    pub fn load<D: UserDirectory + ?Sized>(
        directory: &D,
        limit: usize,
        current_user: Option<&UserId>,
    ) -> Result<Self, DirectoryError> {
        let entries = directory
            .ranked_users(limit)?
            .into_iter()
            .enumerate()
            .map(|(i, ranked)| {
                let name = if ranked.name.trim().is_empty() {
                    "Anonymous".to_string()
                } else {
                    ranked.name
                };
                LeaderboardEntry {
                    rank: i + 1,
                    badge: RankBadge::for_rank(i + 1),
                    is_current_user: current_user == Some(&ranked.id),
                    user: ranked.id,
                    name,
                    score: ranked.score,
                }
            })
            .collect();
        Ok(Self { entries })
    }

    /// Rows, best first.
    #[must_use]
    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    /// No scores yet?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The signed-in user's row, if they made the board.
    #[must_use]
    pub fn current_user_entry(&self) -> Option<&LeaderboardEntry> {
        self.entries.iter().find(|e| e.is_current_user)
    }
}
