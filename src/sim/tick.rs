//! Per-frame simulation update
//!
//! The host driver calls [`tick`] once per display frame. Update order is
//! fixed: all players first, then all balls — acquisition and elimination
//! checks therefore see previous-frame ball positions.

use super::state::{BallState, MatchState};

/// Advance the match by one frame of `dt` seconds. While the start countdown
/// is running, only the countdown advances (the driver keeps rendering).
pub fn tick(state: &mut MatchState, dt: f32) {
    if state.advance_countdown(dt) {
        return;
    }
    for idx in 0..state.players.len() {
        update_player(state, idx, dt);
    }
    for idx in 0..state.balls.len() {
        update_ball(state, idx, dt);
    }
}

/// Movement integration plus the ball interaction pass for one player
fn update_player(state: &mut MatchState, idx: usize, dt: f32) {
    let MatchState { players, balls, .. } = state;
    let player = &mut players[idx];
    if player.dead {
        return;
    }

    player.integrate(dt);

    for (ball_idx, ball) in balls.iter_mut().enumerate() {
        if !player.rect.overlaps(&ball.rect) {
            continue;
        }
        match ball.state {
            BallState::Free => {
                if player.holding.is_none() {
                    ball.acquire(idx);
                    player.holding = Some(ball_idx);
                    log::debug!("player {idx} picked up ball {ball_idx}");
                }
            }
            BallState::Carried { holder } | BallState::Thrown { thrower: holder } => {
                if holder != idx {
                    player.dead = true;
                    log::debug!("player {idx} eliminated by ball {ball_idx}");
                }
            }
        }
    }

    // An eliminated player drops whatever they were carrying; both sides of
    // the possession relation are cleared in the same frame.
    if player.dead {
        if let Some(ball_idx) = player.holding.take() {
            balls[ball_idx].state = BallState::Free;
        }
    }
}

/// Motion integration and possession resolution for one ball
fn update_ball(state: &mut MatchState, idx: usize, dt: f32) {
    let MatchState { players, balls, .. } = state;
    let ball = &mut balls[idx];

    let struck_side_wall = ball.integrate(dt);
    if struck_side_wall && ball.state != BallState::Free {
        // Side-wall strikes free the ball no matter how it was held
        if let Some(holder) = ball.state.holder() {
            players[holder].holding = None;
        }
        ball.state = BallState::Free;
        log::debug!("ball {idx} freed by wall strike");
    }

    match ball.state {
        BallState::Carried { holder } => {
            let center = players[holder].rect.center();
            ball.rect.center_on(center);
        }
        BallState::Thrown { .. } if !ball.is_moving() => {
            ball.state = BallState::Free;
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;
    use proptest::prelude::*;

    use super::*;
    use crate::config::MatchConfig;
    use crate::consts::*;
    use crate::sim::state::{Direction, Outcome};

    const DT: f32 = 1.0 / 60.0;

    /// A default match with the countdown already burned off. The oversized
    /// frame is safe: nothing is held and every entity is at rest.
    fn started_match() -> MatchState {
        let mut state = MatchState::new(&MatchConfig::default()).unwrap();
        tick(&mut state, COUNTDOWN_SECS as f32);
        assert!(!state.countdown_active());
        state
    }

    #[test]
    fn test_countdown_gates_simulation() {
        let mut state = MatchState::new(&MatchConfig::default()).unwrap();
        state.set_direction_held(0, Direction::Right, true);
        let start = state.players[0].rect.pos;

        for _ in 0..5 {
            tick(&mut state, 0.5);
        }
        assert!(state.countdown_active());
        assert_eq!(state.players[0].rect.pos, start);

        // Sixth half-second frame ends the countdown and already simulates
        tick(&mut state, 0.5);
        assert!(!state.countdown_active());
        assert!(state.players[0].rect.pos.x > start.x);
    }

    #[test]
    fn test_restart_restores_countdown_gate() {
        let mut state = started_match();
        state.restart();
        assert_eq!(state.countdown, COUNTDOWN_SECS);

        let start = state.players[0].rect.pos;
        state.set_direction_held(0, Direction::Down, true);
        tick(&mut state, DT);
        assert_eq!(state.players[0].rect.pos, start);
    }

    #[test]
    fn test_free_ball_is_picked_up_on_contact() {
        let mut state = started_match();
        state.balls[0].rect.pos = state.players[0].rect.pos;

        tick(&mut state, DT);

        assert_eq!(state.balls[0].state, BallState::Carried { holder: 0 });
        assert_eq!(state.players[0].holding, Some(0));
    }

    #[test]
    fn test_carried_ball_tracks_holder_center() {
        let mut state = started_match();
        state.balls[0].rect.pos = state.players[0].rect.pos;
        tick(&mut state, DT);

        state.set_direction_held(0, Direction::Right, true);
        for _ in 0..30 {
            tick(&mut state, DT);
            let holder_center = state.players[0].rect.center();
            let ball_center = state.balls[0].rect.center();
            assert!((ball_center - holder_center).length() < 1e-3);
        }
    }

    #[test]
    fn test_second_ball_is_refused_while_holding() {
        let mut state = started_match();
        state.balls[0].rect.pos = state.players[0].rect.pos;
        state.balls[1].rect.pos = state.players[0].rect.pos;

        tick(&mut state, DT);

        assert_eq!(state.players[0].holding, Some(0));
        assert_eq!(state.balls[1].state, BallState::Free);
    }

    #[test]
    fn test_opponent_ball_contact_eliminates() {
        let mut state = started_match();
        state.balls[0].state = BallState::Thrown { thrower: 0 };
        state.balls[0].rect.pos = state.players[1].rect.pos;

        tick(&mut state, DT);

        assert!(state.players[1].dead);
        assert!(!state.players[0].dead);
        assert_eq!(state.outcome(), Outcome::Win(0));
    }

    #[test]
    fn test_own_thrown_ball_is_harmless() {
        let mut state = started_match();
        state.balls[0].state = BallState::Thrown { thrower: 0 };
        state.balls[0].rect.pos = state.players[0].rect.pos;

        tick(&mut state, DT);

        assert!(!state.players[0].dead);
    }

    #[test]
    fn test_elimination_drops_carried_ball() {
        let mut state = started_match();
        // Player 1 carries ball 1; player 0's thrown ball 0 hits them
        state.balls[1].acquire(1);
        state.players[1].holding = Some(1);
        state.balls[0].state = BallState::Thrown { thrower: 0 };
        state.balls[0].rect.pos = state.players[1].rect.pos;

        tick(&mut state, DT);

        assert!(state.players[1].dead);
        assert_eq!(state.players[1].holding, None);
        assert_eq!(state.balls[1].state, BallState::Free);
    }

    #[test]
    fn test_thrown_ball_settles_below_threshold() {
        let mut state = started_match();
        state.balls[0].state = BallState::Thrown { thrower: 0 };
        state.balls[0].vel = Vec2::new(90.0, -90.0);

        tick(&mut state, DT);
        assert_eq!(state.balls[0].state, BallState::Free);
    }

    #[test]
    fn test_fast_thrown_ball_stays_in_flight() {
        let mut state = started_match();
        state.balls[0].state = BallState::Thrown { thrower: 0 };
        state.balls[0].vel = Vec2::new(300.0, 0.0);

        tick(&mut state, DT);
        assert_eq!(state.balls[0].state, BallState::Thrown { thrower: 0 });
    }

    #[test]
    fn test_side_wall_frees_thrown_ball_at_any_speed() {
        let mut state = started_match();
        state.balls[0].state = BallState::Thrown { thrower: 0 };
        state.balls[0].rect.pos.x = state.field.left();
        state.balls[0].vel = Vec2::new(-500.0, 0.0);

        tick(&mut state, DT);

        assert_eq!(state.balls[0].state, BallState::Free);
        assert_eq!(state.balls[0].rect.left(), state.field.left());
        assert!(state.balls[0].vel.x > 0.0);
    }

    #[test]
    fn test_side_wall_strips_carried_ball() {
        let mut state = started_match();
        // Holder hugging the left wall: the carried ball's edge sits on it
        let field = state.field;
        state.players[0].rect.pos = Vec2::new(field.left(), field.center().y);
        state.balls[0].acquire(0);
        state.players[0].holding = Some(0);
        state.balls[0].rect.center_on(state.players[0].rect.center());

        tick(&mut state, DT);

        assert_eq!(state.balls[0].state, BallState::Free);
        assert_eq!(state.players[0].holding, None);
    }

    proptest! {
        #[test]
        fn prop_player_never_leaves_play_area(
            keys in proptest::collection::vec(any::<[bool; 4]>(), 1..150),
            dt in 0.001f32..0.05,
        ) {
            let mut state = started_match();
            for [up, down, left, right] in keys {
                state.set_direction_held(0, Direction::Up, up);
                state.set_direction_held(0, Direction::Down, down);
                state.set_direction_held(0, Direction::Left, left);
                state.set_direction_held(0, Direction::Right, right);
                tick(&mut state, dt);

                let player = &state.players[0];
                prop_assert!(player.rect.left() >= player.play_area.left() - 1e-3);
                prop_assert!(player.rect.right() <= player.play_area.right() + 1e-3);
                prop_assert!(player.rect.top() >= player.play_area.top() - 1e-3);
                prop_assert!(player.rect.bottom() <= player.play_area.bottom() + 1e-3);
            }
        }

        #[test]
        fn prop_carried_ball_never_lags(
            keys in proptest::collection::vec(any::<[bool; 4]>(), 1..100),
        ) {
            let mut state = started_match();
            state.balls[0].rect.pos = state.players[0].rect.pos;
            tick(&mut state, DT);
            prop_assume!(state.players[0].holding == Some(0));

            for [up, down, left, right] in keys {
                state.set_direction_held(0, Direction::Up, up);
                state.set_direction_held(0, Direction::Down, down);
                state.set_direction_held(0, Direction::Left, left);
                state.set_direction_held(0, Direction::Right, right);
                tick(&mut state, DT);

                // Holds until something strips possession (side wall)
                if state.players[0].holding != Some(0) {
                    break;
                }
                let holder_center = state.players[0].rect.center();
                let ball_center = state.balls[0].rect.center();
                prop_assert!((ball_center - holder_center).length() < 1e-3);
            }
        }
    }
}
