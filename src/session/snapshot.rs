//! Session checkpoints.
//!
//! A snapshot captures the match, not the clock: scores, round history and
//! the opponent RNG position. Restored sessions come back stopped and
//! `Idle`; `start` brings the flip cycle back up from `Normal`.

use im::Vector;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{ConfigError, GameConfig, GameRng, GameRngState, Scores};
use crate::directory::UserDirectory;

use super::controller::GameSession;
use super::event::RoundRecord;

/// Serializable checkpoint of a session's match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub config: GameConfig,
    pub scores: Scores,
    pub rounds_played: u32,
    pub rng: GameRngState,
    pub history: Vector<RoundRecord>,
}

/// Snapshot encode/restore failures.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot codec error: {0}")]
    Codec(#[from] bincode::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl SessionSnapshot {
    /// Encode to bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode from bytes produced by `to_bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        Ok(bincode::deserialize(bytes)?)
    }
}

impl<D: UserDirectory> GameSession<D> {
    /// Capture the current match.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            config: self.config().clone(),
            scores: self.scores(),
            rounds_played: self.rounds_played(),
            rng: self.rng().state(),
            history: self.history().clone(),
        }
    }

    /// Rebuild a stopped session from a snapshot.
    pub fn restore(snapshot: SessionSnapshot, directory: D) -> Result<Self, SnapshotError> {
        let mut session = GameSession::new(snapshot.config, directory)?;
        session.restore_parts(
            snapshot.scores,
            snapshot.rounds_played,
            GameRng::from_state(&snapshot.rng),
            snapshot.history,
        );
        Ok(session)
    }
}
