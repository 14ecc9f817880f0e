//! Conversational trip-planning core
//!
//! A fixed-stage dialogue: destination capture, transport choice,
//! preference capture, then scripted journey tracking. The turn function
//! is pure; all I/O lives with the caller.

pub mod intent;
pub mod reply;
pub mod routes;
pub mod session;
pub(crate) mod turn;

#[cfg(test)]
mod proptests;

pub use reply::{compose, environment_summary, Reply, TurnData, TurnOutput};
pub use session::{Preference, RouteProposal, Session, Stage, Transport};
pub use turn::{take_turn, TurnResult};
