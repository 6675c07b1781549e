//! Dodgeball - a two-player arena dodgeball game
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (movement, possession, eliminations)
//! - `config`: Match configuration and construction-time validation
//!
//! Rendering, keyboard wiring, and the page shell are host concerns: a
//! driver calls [`sim::tick`] once per display frame, feeds input through
//! [`sim::MatchState::set_direction_held`] and
//! [`sim::MatchState::trigger_throw`], and reads entity state back for
//! drawing.

pub mod config;
pub mod sim;

pub use config::{ConfigError, MatchConfig};

/// Game tuning constants
pub mod consts {
    /// Player square side length (pixels)
    pub const PLAYER_SIZE: f32 = 50.0;
    /// Ball bounding-square side length; drawn as a circle of this diameter
    pub const BALL_SIZE: f32 = 50.0;

    /// Velocity added per frame while a direction is held (not dt-scaled)
    pub const PLAYER_SPEED: f32 = 50.0;
    /// Per-axis player velocity clamp
    pub const PLAYER_MAX_VELOCITY: f32 = 800.0;
    /// Fraction of player velocity removed each frame
    pub const PLAYER_DRAG: f32 = 0.05;

    /// Fraction of ball velocity removed each frame
    pub const BALL_DRAG: f32 = 0.008;
    /// Fraction of speed lost on each wall bounce
    pub const WALL_FRICTION: f32 = 0.5;
    /// Per-axis speed at or below which a thrown ball settles back to free
    pub const BALL_MOVING_THRESHOLD: f32 = 100.0;

    /// Seconds counted down before the simulation starts
    pub const COUNTDOWN_SECS: u32 = 3;

    /// Distance from a field side wall to each player's starting edge
    pub const PLAYER_START_INSET: f32 = 100.0;
    /// Gap between the center line and each play area
    pub const CENTER_LINE_GAP: f32 = 2.0;

    /// Fill color for an eliminated player
    pub const DEAD_COLOR: &str = "#555555";
    /// Ball fill color
    pub const BALL_COLOR: &str = "#dddddd";
    /// Ball outline color while nobody holds it
    pub const FREE_OUTLINE_COLOR: &str = "#888888";
}
