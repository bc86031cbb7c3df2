//! Game session: the round state machine.
//!
//! `GameSession` ties the pieces together:
//! - `RoundTimer` for the pre-reveal countdown
//! - `resolve` for the round outcome under the rule in force
//! - `ScoreLedger` for scoring and match termination
//! - `RuleFlipScheduler` in the flipping variant
//! - a `UserDirectory` for high scores
//!
//! ## Example
//!
//! ```
//! use rps_engine::core::{Choice, GameConfig};
//! use rps_engine::directory::MemoryDirectory;
//! use rps_engine::session::{GameSession, SessionEvent};
//!
//! let mut session = GameSession::new(GameConfig::classic(), MemoryDirectory::new()).unwrap();
//! session.start();
//!
//! assert!(session.submit_choice(Choice::Rock));
//! session.advance_by(session.config().countdown.total_ms());
//!
//! let resolved = session
//!     .drain_events()
//!     .into_iter()
//!     .any(|e| matches!(e, SessionEvent::RoundResolved(_)));
//! assert!(resolved);
//! ```

mod controller;
mod event;
mod snapshot;

pub use controller::{GameSession, SessionPhase};
pub use event::{RoundRecord, SessionEvent, SessionTask};
pub use snapshot::{SessionSnapshot, SnapshotError};
