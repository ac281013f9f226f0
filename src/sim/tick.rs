//! Physics step
//!
//! Advances every ball by one frame delta: constant-acceleration motion,
//! side-wall bounce, then piece collisions in board order. Balls that drop
//! out through the floor are removed and touched pieces are marked hit.

use std::collections::BTreeSet;

use glam::DVec2;

use super::collision::{resolve_wall, resolve_with};
use super::state::{Ball, Board, GameState, Piece};

/// Clamp a frame delta to something integrable
fn sanitize_delta(delta: f64) -> f64 {
    if delta.is_finite() && delta >= 0.0 {
        delta
    } else {
        log::debug!("Ignoring invalid tick delta {delta}, using 0");
        0.0
    }
}

/// Integrate one ball under constant vertical acceleration
#[inline]
pub fn integrate(ball: &Ball, gravity: f64, delta: f64) -> Ball {
    Ball {
        position: DVec2::new(
            ball.position.x + ball.velocity.x * delta,
            ball.position.y + ball.velocity.y * delta + gravity * 0.5 * delta * delta,
        ),
        velocity: DVec2::new(ball.velocity.x, ball.velocity.y + gravity * delta),
    }
}

/// Move one ball and resolve its collisions, recording touched piece indices
fn step_ball(board: &Board, ball: &Ball, delta: f64, hit_ids: &mut BTreeSet<usize>) -> Ball {
    let mut updated = integrate(ball, board.gravity, delta);

    if let Some(bounced) = resolve_wall(&updated, board.ball_radius, board.width / 2.0) {
        updated = bounced;
    }

    // Sequential: each piece sees the ball as deflected by the ones before it
    for (i, piece) in board.pieces.iter().enumerate() {
        if !piece.is_visible {
            continue;
        }
        let hit = resolve_with(
            &updated,
            piece,
            board.ball_radius,
            board.piece_radius,
            board.configuration.contact_snap,
        );
        if let Some(hit) = hit {
            log::debug!("Ball hit piece {} ({})", i, piece.kind.as_str());
            hit_ids.insert(i);
            updated = hit.into();
        }
    }

    updated
}

/// True once the ball's top edge is below the floor
#[inline]
fn below_floor(board: &Board, ball: &Ball) -> bool {
    ball.position.y + board.ball_radius < board.bottom()
}

/// Advance the game state by `delta` seconds
///
/// A negative or non-finite delta is treated as zero.
pub fn tick(state: &GameState, delta: f64) -> GameState {
    let delta = sanitize_delta(delta);
    let board = &state.board;

    let mut hit_ids = BTreeSet::new();
    let balls: Vec<Ball> = board
        .balls
        .iter()
        .map(|ball| step_ball(board, ball, delta, &mut hit_ids))
        .filter(|ball| {
            let gone = below_floor(board, ball);
            if gone {
                log::debug!("Ball left the board at x={:.1}", ball.position.x);
            }
            !gone
        })
        .collect();

    let pieces: Vec<Piece> = if hit_ids.is_empty() {
        board.pieces.clone()
    } else {
        board
            .pieces
            .iter()
            .enumerate()
            .map(|(i, piece)| {
                if hit_ids.contains(&i) {
                    Piece {
                        is_hit: true,
                        ..*piece
                    }
                } else {
                    *piece
                }
            })
            .collect()
    };

    GameState {
        cannon: state.cannon,
        player: state.player.clone(),
        board: Board {
            width: board.width,
            height: board.height,
            ball_radius: board.ball_radius,
            piece_radius: board.piece_radius,
            gravity: board.gravity,
            balls,
            pieces,
            configuration: board.configuration.clone(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::ContactSnap;
    use crate::sim::state::PieceKind;

    fn empty_board_state() -> GameState {
        let mut state = GameState::default();
        state.board.pieces.clear();
        state
    }

    fn with_ball(mut state: GameState, position: DVec2, velocity: DVec2) -> GameState {
        state.board.balls.push(Ball { position, velocity });
        state
    }

    #[test]
    fn test_integrate_formula() {
        let ball = Ball {
            position: DVec2::new(0.0, 285.0),
            velocity: DVec2::new(30.0, -750.0),
        };
        let dt = 0.016;
        let next = integrate(&ball, -900.0, dt);
        assert!((next.position.x - (30.0 * dt)).abs() < 1e-12);
        assert!((next.position.y - (285.0 - 750.0 * dt - 900.0 * 0.5 * dt * dt)).abs() < 1e-12);
        assert_eq!(next.velocity.x, 30.0);
        assert!((next.velocity.y - (-750.0 - 14.4)).abs() < 1e-9);
    }

    #[test]
    fn test_tick_without_balls_keeps_state() {
        let state = GameState::default();
        assert_eq!(tick(&state, 0.016), state);
    }

    #[test]
    fn test_zero_and_invalid_delta() {
        let state = with_ball(
            empty_board_state(),
            DVec2::new(0.0, 0.0),
            DVec2::new(10.0, 10.0),
        );
        assert_eq!(tick(&state, 0.0), state);
        assert_eq!(tick(&state, -1.0), state);
        assert_eq!(tick(&state, f64::NAN), state);
    }

    #[test]
    fn test_wall_bounce_within_tick() {
        let state = with_ball(
            empty_board_state(),
            DVec2::new(315.0, 0.0),
            DVec2::new(500.0, 0.0),
        );
        let next = tick(&state, 0.016);
        let ball = next.board.balls[0];
        assert!(ball.velocity.x < 0.0);
        assert!(ball.position.x + next.board.ball_radius <= next.board.right());
    }

    #[test]
    fn test_floor_exit() {
        let mut state = with_ball(
            empty_board_state(),
            DVec2::new(0.0, 0.0),
            DVec2::new(0.0, -50.0),
        );
        let mut ticks = 0;
        while !state.board.balls.is_empty() {
            let ball = state.board.balls[0];
            assert!(ball.position.y + state.board.ball_radius >= state.board.bottom());
            state = tick(&state, 0.016);
            ticks += 1;
            assert!(ticks < 1000, "ball never left the board");
        }
        assert!(ticks > 1);
    }

    #[test]
    fn test_direct_hit_marks_piece_and_reflects() {
        // Default layout, ball resting on top of the BONUS piece at (100, 0)
        let state = with_ball(
            GameState::default(),
            DVec2::new(100.0, 23.9),
            DVec2::new(0.0, -100.0),
        );
        let piece = state.board.pieces[2];
        assert_eq!(piece.kind, PieceKind::Bonus);

        let next = tick(&state, 0.001);
        assert!(next.board.pieces[2].is_hit);
        assert!(!next.board.pieces[0].is_hit);
        assert!(!next.board.pieces[1].is_hit);
        assert!(!next.board.pieces[3].is_hit);

        let before = integrate(&state.board.balls[0], state.board.gravity, 0.001);
        let after = next.board.balls[0];
        let normal = (after.position - piece.position) / state.board.piece_radius;
        assert!((normal.length() - 1.0).abs() < 1e-9);
        assert!(before.velocity.dot(normal) < 0.0);
        assert!(after.velocity.dot(normal) > 0.0);
    }

    #[test]
    fn test_head_on_hit_bounces_up() {
        let mut state = empty_board_state();
        state.board.pieces.push(Piece::new(PieceKind::Goal, 0.0, 0.0));
        let state = with_ball(state, DVec2::new(0.0, 23.99), DVec2::new(0.0, -100.0));

        let next = tick(&state, 0.0);
        assert!(next.board.pieces[0].is_hit);
        let ball = next.board.balls[0];
        assert!((ball.position - DVec2::new(0.0, 14.0)).length() < 1e-9);
        assert!((ball.velocity - DVec2::new(0.0, 90.0)).length() < 1e-9);
    }

    #[test]
    fn test_invisible_pieces_are_ignored() {
        let mut state = empty_board_state();
        let mut piece = Piece::new(PieceKind::Goal, 0.0, 0.0);
        piece.is_visible = false;
        state.board.pieces.push(piece);
        let state = with_ball(state, DVec2::new(0.0, 20.0), DVec2::new(0.0, -100.0));

        let next = tick(&state, 0.0);
        assert!(!next.board.pieces[0].is_hit);
        assert_eq!(next.board.balls[0], state.board.balls[0]);
    }

    #[test]
    fn test_sequential_piece_resolution() {
        // Two stacked pieces at the origin: the second sees the ball the first
        // already snapped to its surface, which still overlaps, so both hit.
        let mut state = empty_board_state();
        state.board.pieces.push(Piece::new(PieceKind::Goal, 0.0, 0.0));
        state.board.pieces.push(Piece::new(PieceKind::Point, 0.0, 0.0));
        let state = with_ball(state, DVec2::new(0.0, 20.0), DVec2::new(0.0, -100.0));

        let next = tick(&state, 0.0);
        assert!(next.board.pieces[0].is_hit);
        assert!(next.board.pieces[1].is_hit);
        // reflected twice: back to moving down, at 0.81 of the speed
        let ball = next.board.balls[0];
        assert!((ball.velocity - DVec2::new(0.0, -81.0)).length() < 1e-9);
    }

    #[test]
    fn test_hits_are_monotonic() {
        let state = with_ball(
            GameState::default(),
            DVec2::new(100.0, 23.9),
            DVec2::new(0.0, -100.0),
        );
        let mut state = tick(&state, 0.001);
        assert!(state.board.pieces[2].is_hit);
        for _ in 0..400 {
            state = tick(&state, 0.016);
            assert!(state.board.pieces[2].is_hit);
        }
    }

    #[test]
    fn test_ball_offset_snap_lets_ball_drain() {
        let mut state = with_ball(
            GameState::default(),
            DVec2::new(100.0, 23.9),
            DVec2::new(0.0, -100.0),
        );
        state.board.configuration.contact_snap = ContactSnap::BallOffset;

        let mut state = tick(&state, 0.001);
        assert!(state.board.pieces[2].is_hit);
        let mut ticks = 0;
        while !state.board.balls.is_empty() {
            state = tick(&state, 0.016);
            ticks += 1;
            assert!(ticks < 2000, "ball never left the board");
        }
        assert!(state.board.pieces[2].is_hit);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_ball() -> impl Strategy<Value = Ball> {
        (-320.0..320.0f64, -330.0..330.0f64, -1500.0..1500.0f64, -1500.0..1500.0f64)
            .prop_map(|(x, y, vx, vy)| Ball {
                position: DVec2::new(x, y),
                velocity: DVec2::new(vx, vy),
            })
    }

    proptest! {
        #[test]
        fn walls_contain_every_returned_ball(
            ball in arb_ball(),
            deltas in prop::collection::vec(0.0..0.05f64, 1..40),
        ) {
            let mut state = GameState::default();
            state.board.balls.push(ball);
            for delta in deltas {
                state = tick(&state, delta);
                for b in &state.board.balls {
                    prop_assert!(b.position.x - state.board.ball_radius >= state.board.left() - 1e-9);
                    prop_assert!(b.position.x + state.board.ball_radius <= state.board.right() + 1e-9);
                }
            }
        }

        #[test]
        fn hits_never_revert(
            ball in arb_ball(),
            deltas in prop::collection::vec(0.0..0.05f64, 1..60),
        ) {
            let mut state = GameState::default();
            state.board.balls.push(ball);
            let mut seen = vec![false; state.board.pieces.len()];
            for delta in deltas {
                state = tick(&state, delta);
                for (i, piece) in state.board.pieces.iter().enumerate() {
                    if seen[i] {
                        prop_assert!(piece.is_hit);
                    }
                    seen[i] = piece.is_hit;
                }
            }
        }

        #[test]
        fn piece_bounces_lose_energy(
            ball in arb_ball(),
            piece_x in -300.0..300.0f64,
            piece_y in -300.0..300.0f64,
        ) {
            let piece = Piece::new(crate::sim::state::PieceKind::Point, piece_x, piece_y);
            if let Some(hit) = crate::sim::collision::resolve(&ball, &piece, 10.0, 14.0) {
                prop_assert!(hit.velocity.length() <= ball.velocity.length() + 1e-9);
            }
        }
    }
}
