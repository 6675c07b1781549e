//! Match configuration and construction-time validation
//!
//! Degenerate geometry is a configuration error surfaced here, before a
//! match exists — the simulation itself has no recoverable error paths.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{BALL_SIZE, CENTER_LINE_GAP, PLAYER_SIZE};
use crate::sim::Rect;

/// Errors detectable before a match is constructed
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("field is degenerate: {width}x{height}")]
    DegenerateField { width: f32, height: f32 },
    #[error("field {width}x{height} cannot fit a player in each half")]
    FieldTooSmall { width: f32, height: f32 },
    #[error("a match needs at least one ball")]
    NoBalls,
}

/// Fixed-at-construction match parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Playing field bounds; also the balls' bounce container
    pub field: Rect,
    /// Number of balls spawned on the center line
    pub ball_count: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self::for_canvas(1280.0, 720.0)
    }
}

impl MatchConfig {
    /// Default ball count (the game is played multi-ball)
    pub const DEFAULT_BALL_COUNT: usize = 2;

    /// Field covering the centered 80% of a canvas
    pub fn for_canvas(width: f32, height: f32) -> Self {
        Self {
            field: Rect::new(width * 0.1, height * 0.1, width * 0.8, height * 0.8),
            ball_count: Self::DEFAULT_BALL_COUNT,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let width = self.field.size.x;
        let height = self.field.size.y;
        if width <= 0.0 || height <= 0.0 {
            return Err(ConfigError::DegenerateField { width, height });
        }
        // Each half (minus the center-line gap) must hold a player, and the
        // field must be tall enough for the largest entity.
        if width / 2.0 - CENTER_LINE_GAP < PLAYER_SIZE || height < PLAYER_SIZE.max(BALL_SIZE) {
            return Err(ConfigError::FieldTooSmall { width, height });
        }
        if self.ball_count == 0 {
            return Err(ConfigError::NoBalls);
        }
        Ok(())
    }
}
