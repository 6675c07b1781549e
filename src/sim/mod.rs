//! Frame-driven simulation module
//!
//! All gameplay logic lives here. The module is deterministic for a given
//! sequence of inputs and frame times:
//! - Fixed update order (players, then balls)
//! - Possession tracked as index relations, kept in sync by the tick pass
//! - No rendering or platform dependencies
//!
//! A host driver advances it with [`tick`] and reads state back for drawing.

pub mod entity;
pub mod state;
pub mod tick;

pub use entity::Rect;
pub use state::{Ball, BallState, Direction, HeldDirections, MatchState, Outcome, Player};
pub use tick::tick;
