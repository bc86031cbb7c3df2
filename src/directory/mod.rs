//! User directory: the hosted backend the game reports to.
//!
//! The engine never talks to a concrete backend. It holds a
//! `UserDirectory` and calls a handful of operations on it:
//! - look up a user's record (and stored high score)
//! - write a high score, which only ever raises the stored value
//! - list users ranked by score, for the leaderboard
//! - feedback bookkeeping for admins
//!
//! `MemoryDirectory` is an in-process implementation used by the simulator
//! and the tests. It can be switched offline to exercise failure paths.

mod leaderboard;
mod memory;

pub use leaderboard::{Leaderboard, LeaderboardEntry, RankBadge, DEFAULT_LEADERBOARD_SIZE};
pub use memory::MemoryDirectory;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Backend user identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub String);

impl UserId {
    /// Create a user ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw ID string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A user as stored by the backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub name: String,
    pub email: String,
    /// Best score the user has reached.
    pub score: u32,
    pub is_admin: bool,
    /// Unverified accounts cannot record high scores.
    pub email_verified: bool,
}

impl UserRecord {
    /// A verified, non-admin user with no score.
    pub fn new(id: UserId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            score: 0,
            is_admin: false,
            email_verified: true,
        }
    }

    /// Grant admin rights (builder pattern).
    #[must_use]
    pub fn admin(mut self) -> Self {
        self.is_admin = true;
        self
    }

    /// Mark the email as unverified (builder pattern).
    #[must_use]
    pub fn unverified(mut self) -> Self {
        self.email_verified = false;
        self
    }

    /// Set the stored score (builder pattern).
    #[must_use]
    pub fn with_score(mut self, score: u32) -> Self {
        self.score = score;
        self
    }
}

/// One row of a score ranking.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedUser {
    pub id: UserId,
    pub name: String,
    pub score: u32,
}

/// Feedback identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeedbackId(pub u32);

impl std::fmt::Display for FeedbackId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Feedback({})", self.0)
    }
}

/// Admin triage state of a feedback entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackStatus {
    #[default]
    Open,
    Reviewed,
    Resolved,
}

/// Feedback left by a user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub id: FeedbackId,
    pub author: UserId,
    pub message: String,
    pub status: FeedbackStatus,
}

/// Backend failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("user {0} not found")]
    NotFound(UserId),
    #[error("feedback {0} not found")]
    FeedbackNotFound(FeedbackId),
    #[error("user {0} must verify their email before recording scores")]
    EmailNotVerified(UserId),
    #[error("user {0} is not an admin")]
    NotAuthorized(UserId),
    #[error("directory unavailable: {0}")]
    Unavailable(String),
    #[error("feedback store is full")]
    FeedbackFull,
}

/// Operations the engine needs from the user backend.
///
/// ## Implementation Notes
///
/// - `write_high_score`: must never lower a stored score; returns whether
///   it wrote
/// - `ranked_users`: descending by score; ties keep a stable order
/// - `set_feedback_status`: admin only
pub trait UserDirectory {
    /// Fetch a user's record.
    fn user_record(&self, user: &UserId) -> Result<UserRecord, DirectoryError>;

    /// Store `score` if it beats the stored score.
    fn write_high_score(&mut self, user: &UserId, score: u32) -> Result<bool, DirectoryError>;

    /// Set a user's stored score to zero.
    fn reset_user_score(&mut self, user: &UserId) -> Result<(), DirectoryError>;

    /// Set every stored score to zero.
    fn reset_all_scores(&mut self) -> Result<(), DirectoryError>;

    /// Top `limit` users by score.
    fn ranked_users(&self, limit: usize) -> Result<Vec<RankedUser>, DirectoryError>;

    /// Record feedback from a user.
    fn append_feedback(
        &mut self,
        author: &UserId,
        message: &str,
    ) -> Result<FeedbackId, DirectoryError>;

    /// Change a feedback entry's status.
    fn set_feedback_status(
        &mut self,
        actor: &UserId,
        id: FeedbackId,
        status: FeedbackStatus,
    ) -> Result<(), DirectoryError>;

    /// A user's stored high score; unknown users count as zero.
    fn stored_score(&self, user: &UserId) -> Result<u32, DirectoryError> {
        match self.user_record(user) {
            Ok(record) => Ok(record.score),
            Err(DirectoryError::NotFound(_)) => Ok(0),
            Err(e) => Err(e),
        }
    }
}

impl<D: UserDirectory + ?Sized> UserDirectory for Box<D> {
    fn user_record(&self, user: &UserId) -> Result<UserRecord, DirectoryError> {
        (**self).user_record(user)
    }

    fn write_high_score(&mut self, user: &UserId, score: u32) -> Result<bool, DirectoryError> {
        (**self).write_high_score(user, score)
    }

    fn reset_user_score(&mut self, user: &UserId) -> Result<(), DirectoryError> {
        (**self).reset_user_score(user)
    }

    fn reset_all_scores(&mut self) -> Result<(), DirectoryError> {
        (**self).reset_all_scores()
    }

    fn ranked_users(&self, limit: usize) -> Result<Vec<RankedUser>, DirectoryError> {
        (**self).ranked_users(limit)
    }

    fn append_feedback(
        &mut self,
        author: &UserId,
        message: &str,
    ) -> Result<FeedbackId, DirectoryError> {
        (**self).append_feedback(author, message)
    }

    fn set_feedback_status(
        &mut self,
        actor: &UserId,
        id: FeedbackId,
        status: FeedbackStatus,
    ) -> Result<(), DirectoryError> {
        (**self).set_feedback_status(actor, id, status)
    }
}
