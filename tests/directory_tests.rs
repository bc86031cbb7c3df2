//! User directory integration tests.
//!
//! Exercises the in-memory backend through the `UserDirectory` trait and
//! the leaderboard view built on it.

use rps_engine::directory::{
    FeedbackId, FeedbackStatus, LeaderboardEntry, RankBadge, DEFAULT_LEADERBOARD_SIZE,
};
use rps_engine::{DirectoryError, Leaderboard, MemoryDirectory, UserDirectory, UserId, UserRecord};

fn user(id: &str, name: &str, score: u32) -> UserRecord {
    UserRecord::new(UserId::new(id), name, format!("{id}@example.com")).with_score(score)
}

fn populated() -> MemoryDirectory {
    MemoryDirectory::new()
        .with_user(user("ana", "Ana", 4))
        .with_user(user("bo", "Bo", 9))
        .with_user(user("cy", "", 4))
        .with_user(user("di", "Di", 1))
        .with_user(user("ed", "Ed", 7).admin())
}

// =============================================================================
// High Scores
// =============================================================================

/// Writes only ever raise the stored score.
#[test]
fn test_high_score_monotonic() {
    let mut dir = populated();
    let ana = UserId::new("ana");

    assert_eq!(dir.write_high_score(&ana, 3), Ok(false));
    assert_eq!(dir.write_high_score(&ana, 6), Ok(true));
    assert_eq!(dir.write_high_score(&ana, 5), Ok(false));
    assert_eq!(dir.stored_score(&ana), Ok(6));
}

/// Unknown users have no stored score but cannot be written.
#[test]
fn test_unknown_user() {
    let mut dir = populated();
    let ghost = UserId::new("ghost");

    assert_eq!(dir.stored_score(&ghost), Ok(0));
    assert_eq!(
        dir.write_high_score(&ghost, 3),
        Err(DirectoryError::NotFound(ghost.clone()))
    );
    assert_eq!(dir.user_record(&ghost), Err(DirectoryError::NotFound(ghost)));
}

/// Score resets are explicit backend operations.
#[test]
fn test_resets() {
    let mut dir = populated();
    let bo = UserId::new("bo");

    dir.reset_user_score(&bo).unwrap();
    assert_eq!(dir.stored_score(&bo), Ok(0));
    assert_eq!(dir.stored_score(&UserId::new("ed")), Ok(7));

    dir.reset_all_scores().unwrap();
    let ranked = dir.ranked_users(DEFAULT_LEADERBOARD_SIZE).unwrap();
    assert!(ranked.iter().all(|r| r.score == 0));
}

/// An offline backend fails every call.
#[test]
fn test_offline_backend() {
    let mut dir = populated();
    dir.set_offline(true);
    let ana = UserId::new("ana");

    assert!(matches!(
        dir.stored_score(&ana),
        Err(DirectoryError::Unavailable(_))
    ));
    assert!(matches!(
        dir.write_high_score(&ana, 10),
        Err(DirectoryError::Unavailable(_))
    ));
    assert!(Leaderboard::load(&dir, 5, None).is_err());

    dir.set_offline(false);
    assert_eq!(dir.stored_score(&ana), Ok(4));
}

// =============================================================================
// Leaderboard
// =============================================================================

/// Rows are ranked by score with medal badges for the top three.
#[test]
fn test_leaderboard_order_and_badges() {
    let dir = populated();
    let board = Leaderboard::load(&dir, DEFAULT_LEADERBOARD_SIZE, None).unwrap();

    let scores: Vec<u32> = board.entries().iter().map(|e| e.score).collect();
    assert_eq!(scores, vec![9, 7, 4, 4, 1]);

    let badges: Vec<RankBadge> = board.entries().iter().map(|e| e.badge).collect();
    assert_eq!(
        badges,
        vec![
            RankBadge::Gold,
            RankBadge::Silver,
            RankBadge::Bronze,
            RankBadge::Place(4),
            RankBadge::Place(5),
        ]
    );
}

/// Ties keep registration order; blank names show as "Anonymous".
#[test]
fn test_leaderboard_ties_and_anonymous() {
    let board = Leaderboard::load(&populated(), DEFAULT_LEADERBOARD_SIZE, None).unwrap();

    let third: &LeaderboardEntry = &board.entries()[2];
    let fourth: &LeaderboardEntry = &board.entries()[3];
    assert_eq!(third.user, UserId::new("ana"));
    assert_eq!(fourth.user, UserId::new("cy"));
    assert_eq!(fourth.name, "Anonymous");
}

/// The limit caps the rows; the signed-in user is highlighted.
#[test]
fn test_leaderboard_limit_and_current_user() {
    let dir = populated();
    let ed = UserId::new("ed");
    let di = UserId::new("di");

    let board = Leaderboard::load(&dir, 3, Some(&ed)).unwrap();
    assert_eq!(board.entries().len(), 3);
    let mine = board.current_user_entry().unwrap();
    assert_eq!(mine.rank, 2);
    assert!(mine.is_current_user);

    let board = Leaderboard::load(&dir, 3, Some(&di)).unwrap();
    assert!(board.current_user_entry().is_none());
}

/// An empty backend gives an empty board.
#[test]
fn test_empty_leaderboard() {
    let dir = MemoryDirectory::new();
    let board = Leaderboard::load(&dir, DEFAULT_LEADERBOARD_SIZE, None).unwrap();
    assert!(board.is_empty());
}

// =============================================================================
// Feedback
// =============================================================================

/// Users leave feedback; only admins change its status.
#[test]
fn test_feedback_admin_only() {
    let mut dir = populated();
    let ana = UserId::new("ana");
    let ed = UserId::new("ed");

    let id = dir.append_feedback(&ana, "rules flip too fast").unwrap();
    assert_eq!(dir.feedback()[0].status, FeedbackStatus::Open);

    assert_eq!(
        dir.set_feedback_status(&ana, id, FeedbackStatus::Reviewed),
        Err(DirectoryError::NotAuthorized(ana.clone()))
    );
    dir.set_feedback_status(&ed, id, FeedbackStatus::Resolved).unwrap();
    assert_eq!(dir.feedback()[0].status, FeedbackStatus::Resolved);
    assert_eq!(dir.feedback()[0].author, ana);
}

/// Unknown feedback IDs and unknown authors are rejected.
#[test]
fn test_feedback_errors() {
    let mut dir = populated();
    let ed = UserId::new("ed");
    let ghost = UserId::new("ghost");

    assert_eq!(
        dir.set_feedback_status(&ed, FeedbackId(42), FeedbackStatus::Reviewed),
        Err(DirectoryError::FeedbackNotFound(FeedbackId(42)))
    );
    assert_eq!(
        dir.append_feedback(&ghost, "hello"),
        Err(DirectoryError::NotFound(ghost))
    );
    assert!(dir.feedback().is_empty());
}

/// The trait is usable as a boxed object.
#[test]
fn test_boxed_directory_forwards() {
    let mut dir: Box<dyn UserDirectory> = Box::new(populated());
    let di = UserId::new("di");

    assert_eq!(dir.write_high_score(&di, 10), Ok(true));
    let board = Leaderboard::load(&dir, 1, Some(&di)).unwrap();
    assert_eq!(board.entries()[0].user, di);
    assert_eq!(board.entries()[0].badge, RankBadge::Gold);
}
