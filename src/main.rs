//! Dodgeball headless demo driver
//!
//! Plays a scripted match against an idle opponent: red chases the nearest
//! free ball, lines up with blue, and throws. This exercises the same
//! contract a renderer-backed host uses — feed input through
//! `set_direction_held`/`trigger_throw`, call `tick` once per frame, read
//! state back between frames.

use glam::Vec2;

use dodgeball::MatchConfig;
use dodgeball::sim::{BallState, Direction, MatchState, tick};

/// Display frame rate the demo steps at
const FRAME_DT: f32 = 1.0 / 60.0;
/// Give up after this much simulated time
const MAX_SECS: f32 = 30.0;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = MatchConfig::default();
    let mut state = MatchState::new(&config).expect("default config is valid");
    log::info!(
        "match start: field {}x{}, {} balls",
        state.field.size.x,
        state.field.size.y,
        state.balls.len()
    );
    log::info!("starting in {}", state.countdown);

    let mut last_countdown = state.countdown;
    let mut frames = 0u32;

    while (frames as f32) * FRAME_DT < MAX_SECS {
        drive_red(&mut state);
        tick(&mut state, FRAME_DT);
        frames += 1;

        if state.countdown != last_countdown {
            last_countdown = state.countdown;
            if state.countdown > 0 {
                log::info!("starting in {}", state.countdown);
            } else {
                log::info!("go!");
            }
        }

        if let Some(message) = state.outcome_message() {
            log::info!("{message} after {:.1}s", frames as f32 * FRAME_DT);
            return;
        }
    }
    log::info!("no winner after {MAX_SECS}s");
}

/// Steering for the red player: chase a free ball; once holding, match
/// blue's height and throw when lined up and nearly at rest vertically.
fn drive_red(state: &mut MatchState) {
    let red_center = state.players[0].rect.center();
    let red_vel = state.players[0].vel;
    let holding = state.players[0].holding.is_some();
    let blue_center = state.players[1].rect.center();

    let target = if holding {
        if (red_center.y - blue_center.y).abs() < 6.0 && red_vel.y.abs() < 25.0 {
            state.trigger_throw(0);
            release_all_keys(state);
            return;
        }
        Vec2::new(red_center.x, blue_center.y)
    } else {
        match nearest_free_ball(state) {
            Some(center) => center,
            // Every ball is in flight; coast until one settles
            None => {
                release_all_keys(state);
                return;
            }
        }
    };

    steer(state, red_center, red_vel, target);
}

fn nearest_free_ball(state: &MatchState) -> Option<Vec2> {
    let red_center = state.players[0].rect.center();
    state
        .balls
        .iter()
        .filter(|ball| ball.state == BallState::Free)
        .map(|ball| ball.rect.center())
        .min_by(|a, b| {
            a.distance_squared(red_center)
                .partial_cmp(&b.distance_squared(red_center))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}

/// Bang-bang steering with a braking horizon: press toward the target until
/// the predicted position overshoots, then let drag bleed the speed off.
fn steer(state: &mut MatchState, center: Vec2, vel: Vec2, target: Vec2) {
    const DEADZONE: f32 = 4.0;
    const HORIZON: f32 = 0.25;

    let predicted = center + vel * HORIZON;
    set_axis(state, Direction::Left, Direction::Right, target.x - predicted.x, DEADZONE);
    set_axis(state, Direction::Up, Direction::Down, target.y - predicted.y, DEADZONE);
}

fn set_axis(state: &mut MatchState, neg: Direction, pos: Direction, delta: f32, deadzone: f32) {
    state.set_direction_held(0, pos, delta > deadzone);
    state.set_direction_held(0, neg, delta < -deadzone);
}

fn release_all_keys(state: &mut MatchState) {
    for direction in [Direction::Up, Direction::Down, Direction::Left, Direction::Right] {
        state.set_direction_held(0, direction, false);
    }
}
