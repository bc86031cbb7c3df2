//! In-memory user directory.

use rustc_hash::FxHashMap;

use super::{
    DirectoryError, Feedback, FeedbackId, FeedbackStatus, RankedUser, UserDirectory, UserId,
    UserRecord,
};

/// User directory held entirely in memory.
///
/// Users keep their registration order, which is the tie-break for equal
/// scores in `ranked_users`.
#[derive(Clone, Debug, Default)]
pub struct MemoryDirectory {
    users: Vec<UserRecord>,
    index: FxHashMap<UserId, usize>,
    feedback: Vec<Feedback>,
    offline: bool,
}

impl MemoryDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a user.
    pub fn insert_user(&mut self, record: UserRecord) {
        match self.index.get(&record.id) {
            Some(&slot) => self.users[slot] = record,
            None => {
                self.index.insert(record.id.clone(), self.users.len());
                self.users.push(record);
            }
        }
    }

    /// Add a user (builder pattern).
    #[must_use]
    pub fn with_user(mut self, record: UserRecord) -> Self {
        self.insert_user(record);
        self
    }

    /// Simulate a backend outage: every call fails with `Unavailable`.
    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    /// Number of registered users.
    #[must_use]
    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// All feedback entries, oldest first.
    #[must_use]
    pub fn feedback(&self) -> &[Feedback] {
        &self.feedback
    }

    fn check_online(&self) -> Result<(), DirectoryError> {
        if self.offline {
            Err(DirectoryError::Unavailable("backend offline".to_string()))
        } else {
            Ok(())
        }
    }

    fn get(&self, user: &UserId) -> Result<&UserRecord, DirectoryError> {
        self.index
            .get(user)
            .map(|&slot| &self.users[slot])
            .ok_or_else(|| DirectoryError::NotFound(user.clone()))
    }

    fn get_mut(&mut self, user: &UserId) -> Result<&mut UserRecord, DirectoryError> {
        match self.index.get(user) {
            Some(&slot) => Ok(&mut self.users[slot]),
            None => Err(DirectoryError::NotFound(user.clone())),
        }
    }
}

/// ID for the feedback entry stored at `slot`.
fn feedback_id_for(slot: usize) -> Result<FeedbackId, DirectoryError> {
    u32::try_from(slot)
        .map(FeedbackId)
        .map_err(|_| DirectoryError::FeedbackFull)
}

impl UserDirectory for MemoryDirectory {
    fn user_record(&self, user: &UserId) -> Result<UserRecord, DirectoryError> {
        self.check_online()?;
        self.get(user).cloned()
    }

    fn write_high_score(&mut self, user: &UserId, score: u32) -> Result<bool, DirectoryError> {
        self.check_online()?;
        let record = self.get_mut(user)?;
        if !record.email_verified {
            return Err(DirectoryError::EmailNotVerified(user.clone()));
        }
        if score > record.score {
            record.score = score;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn reset_user_score(&mut self, user: &UserId) -> Result<(), DirectoryError> {
        self.check_online()?;
        self.get_mut(user)?.score = 0;
        Ok(())
    }

    fn reset_all_scores(&mut self) -> Result<(), DirectoryError> {
        self.check_online()?;
        for record in &mut self.users {
            record.score = 0;
        }
        Ok(())
    }

    fn ranked_users(&self, limit: usize) -> Result<Vec<RankedUser>, DirectoryError> {
        self.check_online()?;
        let mut ranked: Vec<&UserRecord> = self.users.iter().collect();
        // Stable sort: equal scores keep registration order
        ranked.sort_by(|a, b| b.score.cmp(&a.score));
        Ok(ranked
            .into_iter()
            .take(limit)
            .map(|r| RankedUser {
                id: r.id.clone(),
                name: r.name.clone(),
                score: r.score,
            })
            .collect())
    }

    fn append_feedback(
        &mut self,
        author: &UserId,
        message: &str,
    ) -> Result<FeedbackId, DirectoryError> {
        self.check_online()?;
        self.get(author)?;
        let id = feedback_id_for(self.feedback.len())?;
        self.feedback.push(Feedback {
            id,
            author: author.clone(),
            message: message.to_string(),
            status: FeedbackStatus::Open,
        });
        Ok(id)
    }

    fn set_feedback_status(
        &mut self,
        actor: &UserId,
        id: FeedbackId,
        status: FeedbackStatus,
    ) -> Result<(), DirectoryError> {
        self.check_online()?;
        if !self.get(actor)?.is_admin {
            return Err(DirectoryError::NotAuthorized(actor.clone()));
        }
        let entry = self
            .feedback
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or(DirectoryError::FeedbackNotFound(id))?;
        entry.status = status;
        Ok(())
    }
}
