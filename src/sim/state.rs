//! Match state and entity types
//!
//! All state the renderer reads and the simulation mutates lives here.
//! Possession is an index relation (player index <-> ball index) owned by
//! [`MatchState`]; the tick pass keeps both sides in sync, so neither entity
//! ever holds a reference into the other.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::Rect;
use crate::config::{ConfigError, MatchConfig};
use crate::consts::*;

/// One of the four movement inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Held movement keys for one player, populated by the host driver
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeldDirections {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl HeldDirections {
    pub fn set(&mut self, direction: Direction, held: bool) {
        match direction {
            Direction::Up => self.up = held,
            Direction::Down => self.down = held,
            Direction::Left => self.left = held,
            Direction::Right => self.right = held,
        }
    }

    /// -1, 0, or 1 along x from the held left/right keys
    #[inline]
    pub fn x_dir(&self) -> f32 {
        (self.right as i8 - self.left as i8) as f32
    }

    /// -1, 0, or 1 along y from the held up/down keys (y grows downward)
    #[inline]
    pub fn y_dir(&self) -> f32 {
        (self.down as i8 - self.up as i8) as f32
    }
}

/// A player: a colored square confined to its half of the field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub rect: Rect,
    initial_pos: Vec2,
    pub color: String,
    pub held: HeldDirections,
    pub vel: Vec2,
    /// Velocity added per frame while a direction is held (not dt-scaled)
    pub speed: f32,
    /// Per-axis velocity clamp
    pub max_velocity: f32,
    /// Fraction of velocity removed each frame
    pub drag: f32,
    /// Rectangle the player's full rect must stay inside
    pub play_area: Rect,
    /// Direction bias applied to throw impulses
    pub throw_direction: Vec2,
    /// Throw impulse magnitude (the field width at setup)
    pub throw_power: f32,
    /// Index of the ball this player carries, if any
    pub holding: Option<usize>,
    pub dead: bool,
}

impl Player {
    pub fn new(
        pos: Vec2,
        color: &str,
        play_area: Rect,
        throw_direction: Vec2,
        throw_power: f32,
    ) -> Self {
        Self {
            rect: Rect::from_pos_size(pos, Vec2::splat(PLAYER_SIZE)),
            initial_pos: pos,
            color: color.to_owned(),
            held: HeldDirections::default(),
            vel: Vec2::ZERO,
            speed: PLAYER_SPEED,
            max_velocity: PLAYER_MAX_VELOCITY,
            drag: PLAYER_DRAG,
            play_area,
            throw_direction,
            throw_power,
            holding: None,
            dead: false,
        }
    }

    /// Fill color the renderer should use
    pub fn fill_color(&self) -> &str {
        if self.dead { DEAD_COLOR } else { self.color.as_str() }
    }

    /// Movement integration: input accumulation, velocity clamp, position
    /// clamp into the play area, then drag. Ball interactions happen in the
    /// tick pass, which also skips this entirely for dead players.
    pub(crate) fn integrate(&mut self, dt: f32) {
        let direction = Vec2::new(self.held.x_dir(), self.held.y_dir());
        self.vel += direction * self.speed;
        self.vel = self.vel.clamp(
            Vec2::splat(-self.max_velocity),
            Vec2::splat(self.max_velocity),
        );

        self.rect.pos += self.vel * dt;
        self.rect.pos = self.rect.pos.clamp(
            self.play_area.pos,
            self.play_area.pos + self.play_area.size - self.rect.size,
        );

        self.vel *= (1.0 - self.drag).clamp(0.0, 1.0);
    }

    /// Back to the starting spot: initial position, at rest, alive. Held
    /// keys are left as the driver set them; the caller clears possession on
    /// both sides.
    pub(crate) fn reset(&mut self) {
        self.rect.pos = self.initial_pos;
        self.vel = Vec2::ZERO;
        self.dead = false;
        self.holding = None;
    }
}

/// Possession state for a ball
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallState {
    /// Nobody holds it; eligible for pickup
    Free,
    /// Snapped to the holder's center every frame
    Carried { holder: usize },
    /// In flight, still attributed to the thrower
    Thrown { thrower: usize },
}

impl BallState {
    /// Player index the ball belongs to, carried or in flight
    pub fn holder(&self) -> Option<usize> {
        match *self {
            BallState::Free => None,
            BallState::Carried { holder } => Some(holder),
            BallState::Thrown { thrower } => Some(thrower),
        }
    }
}

/// A ball: bounces inside the field, carried and thrown by players
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub rect: Rect,
    initial_pos: Vec2,
    pub vel: Vec2,
    /// Fraction of velocity removed each frame
    pub drag: f32,
    /// Fraction of speed lost on each wall bounce
    pub wall_friction: f32,
    /// Field bounds the ball reflects off
    pub container: Rect,
    pub state: BallState,
}

impl Ball {
    pub fn new(pos: Vec2, container: Rect) -> Self {
        Self {
            rect: Rect::from_pos_size(pos, Vec2::splat(BALL_SIZE)),
            initial_pos: pos,
            vel: Vec2::ZERO,
            drag: BALL_DRAG,
            wall_friction: WALL_FRICTION,
            container,
            state: BallState::Free,
        }
    }

    /// Radius the renderer should draw (the rect is the bounding square)
    #[inline]
    pub fn radius(&self) -> f32 {
        self.rect.size.x / 2.0
    }

    /// Outline color: the holder's color while held, neutral gray otherwise
    pub fn outline_color<'a>(&self, players: &'a [Player; 2]) -> &'a str {
        match self.state.holder() {
            Some(holder) => players[holder].color.as_str(),
            None => FREE_OUTLINE_COLOR,
        }
    }

    /// Pick up a free ball
    pub(crate) fn acquire(&mut self, holder: usize) {
        debug_assert_eq!(self.state, BallState::Free, "acquire on a held ball");
        self.state = BallState::Carried { holder };
    }

    /// Release the carried ball with a throw impulse
    pub(crate) fn release(&mut self, impulse: Vec2) {
        let BallState::Carried { holder } = self.state else {
            debug_assert!(false, "release without a holder");
            return;
        };
        self.vel += impulse;
        self.state = BallState::Thrown { thrower: holder };
    }

    /// Still fast enough to count as in flight?
    pub(crate) fn is_moving(&self) -> bool {
        self.vel.x.abs() > BALL_MOVING_THRESHOLD || self.vel.y.abs() > BALL_MOVING_THRESHOLD
    }

    /// Drag, position integration, and wall reflection. The four container
    /// half-planes are resolved independently with inclusive comparisons.
    /// Returns true when a left/right wall was struck: side-wall strikes
    /// force the ball free, and the caller clears the holder's side of the
    /// relation too. Top/bottom strikes only reflect.
    pub(crate) fn integrate(&mut self, dt: f32) -> bool {
        self.vel *= 1.0 - self.drag;
        self.rect.pos += self.vel * dt;

        let mut struck_side_wall = false;
        if self.rect.left() <= self.container.left() {
            self.rect.pos.x = self.container.left();
            self.vel.x = -self.vel.x * (1.0 - self.wall_friction);
            struck_side_wall = true;
        }
        if self.rect.right() >= self.container.right() {
            self.rect.pos.x = self.container.right() - self.rect.size.x;
            self.vel.x = -self.vel.x * (1.0 - self.wall_friction);
            struck_side_wall = true;
        }
        if self.rect.top() <= self.container.top() {
            self.rect.pos.y = self.container.top();
            self.vel.y = -self.vel.y * (1.0 - self.wall_friction);
        }
        if self.rect.bottom() >= self.container.bottom() {
            self.rect.pos.y = self.container.bottom() - self.rect.size.y;
            self.vel.y = -self.vel.y * (1.0 - self.wall_friction);
        }
        struck_side_wall
    }

    pub(crate) fn reset(&mut self) {
        self.rect.pos = self.initial_pos;
        self.vel = Vec2::ZERO;
        self.state = BallState::Free;
    }
}

/// Match outcome derived from the players' dead flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    InProgress,
    /// Index of the surviving player
    Win(usize),
    Tied,
}

/// The whole match: both players, every ball, and the start countdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchState {
    /// Playing field; also every ball's bounce container
    pub field: Rect,
    pub players: [Player; 2],
    pub balls: Vec<Ball>,
    /// Seconds left before the simulation starts
    pub countdown: u32,
    /// Wall-clock accumulator feeding the countdown
    countdown_accum: f32,
}

impl MatchState {
    /// Set up a match: red on the left half, blue on the right, balls spaced
    /// evenly along the center line.
    pub fn new(config: &MatchConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let field = config.field;
        let center = field.center();
        let half_width = field.size.x / 2.0 - CENTER_LINE_GAP;

        let players = [
            Player::new(
                Vec2::new(field.left() + PLAYER_START_INSET, center.y - PLAYER_SIZE / 2.0),
                "red",
                Rect::new(field.left(), field.top(), half_width, field.size.y),
                Vec2::new(1.0, 0.0),
                field.size.x,
            ),
            Player::new(
                Vec2::new(
                    field.right() - PLAYER_START_INSET - PLAYER_SIZE,
                    center.y - PLAYER_SIZE / 2.0,
                ),
                "blue",
                Rect::new(center.x + CENTER_LINE_GAP, field.top(), half_width, field.size.y),
                Vec2::new(-1.0, 0.0),
                field.size.x,
            ),
        ];

        let balls = (0..config.ball_count)
            .map(|i| {
                let fraction = (i + 1) as f32 / (config.ball_count + 1) as f32;
                let y = field.top() + field.size.y * fraction - BALL_SIZE / 2.0;
                Ball::new(Vec2::new(center.x - BALL_SIZE / 2.0, y), field)
            })
            .collect();

        Ok(Self {
            field,
            players,
            balls,
            countdown: COUNTDOWN_SECS,
            countdown_accum: 0.0,
        })
    }

    /// Simulation is still gated behind the countdown
    pub fn countdown_active(&self) -> bool {
        self.countdown > 0
    }

    /// Press or release one of a player's movement directions. Presses are
    /// ignored while the player is dead; releases always land.
    pub fn set_direction_held(&mut self, player: usize, direction: Direction, held: bool) {
        let player = &mut self.players[player];
        if held && player.dead {
            return;
        }
        player.held.set(direction, held);
    }

    /// Throw the held ball, if any: impulse is the player's current velocity
    /// plus throw power along the throw direction. Ignored for dead or
    /// empty-handed players.
    pub fn trigger_throw(&mut self, player: usize) {
        if self.players[player].dead {
            return;
        }
        let Some(ball) = self.players[player].holding.take() else {
            return;
        };
        let thrower = &self.players[player];
        let impulse = thrower.vel + thrower.throw_direction * thrower.throw_power;
        self.balls[ball].release(impulse);
        log::debug!("player {player} threw ball {ball}");
    }

    /// Outcome derived from the dead flags, recomputed on demand
    pub fn outcome(&self) -> Outcome {
        match (self.players[0].dead, self.players[1].dead) {
            (false, false) => Outcome::InProgress,
            (true, true) => Outcome::Tied,
            (true, false) => Outcome::Win(1),
            (false, true) => Outcome::Win(0),
        }
    }

    /// End-of-match banner text, if the match is over
    pub fn outcome_message(&self) -> Option<String> {
        match self.outcome() {
            Outcome::InProgress => None,
            Outcome::Tied => Some("Tied".to_owned()),
            Outcome::Win(winner) => Some(format!("{} wins", self.players[winner].color)),
        }
    }

    /// Reset every entity and restart the countdown
    pub fn restart(&mut self) {
        for player in &mut self.players {
            player.reset();
        }
        for ball in &mut self.balls {
            ball.reset();
        }
        self.countdown = COUNTDOWN_SECS;
        self.countdown_accum = 0.0;
        log::debug!("match restarted");
    }

    /// Advance the countdown by wall-clock time, one decrement per whole
    /// second. Returns true while the simulation is still gated; the frame
    /// on which the countdown reaches zero already simulates.
    pub(crate) fn advance_countdown(&mut self, dt: f32) -> bool {
        if self.countdown == 0 {
            return false;
        }
        self.countdown_accum += dt;
        while self.countdown_accum >= 1.0 && self.countdown > 0 {
            self.countdown_accum -= 1.0;
            self.countdown -= 1;
        }
        if self.countdown == 0 {
            self.countdown_accum = 0.0;
            log::debug!("countdown finished");
            return false;
        }
        true
    }
}
