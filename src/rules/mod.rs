//! Round resolution.
//!
//! - `resolve`: who wins a round under the active rule set
//! - `OpponentPolicy`: how the opponent picks its hand
//!
//! Both are deterministic given their inputs; the session supplies the
//! rule set and the RNG.

pub mod opponent;
pub mod resolver;

pub use opponent::{OpponentPolicy, ScriptedOpponent, UniformOpponent};
pub use resolver::{beats, resolve};
