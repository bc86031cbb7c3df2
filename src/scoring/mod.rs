//! Score keeping for a match.
//!
//! The ledger applies round outcomes under a `ScoringPolicy` and reports
//! when a side reaches the score limit. Resetting is the caller's job.

mod ledger;

pub use ledger::{LedgerReport, ScoreLedger};
