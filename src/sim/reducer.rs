//! State transitions
//!
//! `apply` is the single mutation surface of the game: it takes a snapshot
//! and an action and returns the next snapshot. It never panics and never
//! touches its input. Preconditions that don't hold (locked barrel, no
//! ammo, ball already in flight) are silent no-ops.

use super::action::{Action, ActionMessage};
use super::state::{Ball, Board, Cannon, GameState};
use super::tick::tick;

/// Apply one action to a snapshot
pub fn apply(state: &GameState, action: &Action) -> GameState {
    match *action {
        Action::Aim { x, y } => aim(state, x, y),
        Action::Shoot => shoot(state),
        Action::ToggleAim => toggle_aim(state),
        Action::Tick { delta } => tick(state, delta),
    }
}

/// Apply an untyped `{name, payload}` message
///
/// Unknown names and malformed payloads are logged and leave the state as is.
pub fn apply_message(state: &GameState, msg: &ActionMessage) -> GameState {
    match Action::try_from(msg) {
        Ok(action) => apply(state, &action),
        Err(e) => {
            log::warn!("Ignoring action: {e}");
            state.clone()
        }
    }
}

/// Fold a sequence of actions over a starting snapshot
pub fn replay<'a, I>(initial: &GameState, actions: I) -> GameState
where
    I: IntoIterator<Item = &'a Action>,
{
    actions
        .into_iter()
        .fold(initial.clone(), |state, action| apply(&state, action))
}

/// Rotate the barrel toward a world-space point
///
/// Targets above the pivot are clamped to the pivot's height so the barrel
/// never swings past horizontal.
fn aim(state: &GameState, x: f64, y: f64) -> GameState {
    let cannon = &state.cannon;
    if !cannon.can_move {
        return state.clone();
    }
    if !x.is_finite() || !y.is_finite() {
        log::debug!("Ignoring aim at non-finite point ({x}, {y})");
        return state.clone();
    }

    let dx = cannon.origin.x - x;
    let dy = cannon.origin.y - cannon.origin.y.min(y);
    GameState {
        cannon: Cannon {
            angle: dy.atan2(dx).to_degrees() - 90.0,
            ..*cannon
        },
        ..state.clone()
    }
}

/// Launch a ball from the muzzle tip
///
/// Ammunition is checked but not spent.
fn shoot(state: &GameState) -> GameState {
    if !state.can_shoot() {
        return state.clone();
    }

    let ball = Ball {
        position: state.cannon.muzzle_position(),
        velocity: state.cannon.muzzle_velocity_vector(),
    };
    log::debug!(
        "Shot fired at {:.1}° from ({:.1}, {:.1})",
        state.cannon.angle,
        ball.position.x,
        ball.position.y
    );

    let mut balls = state.board.balls.clone();
    balls.push(ball);
    GameState {
        board: Board {
            balls,
            ..state.board.clone()
        },
        ..state.clone()
    }
}

fn toggle_aim(state: &GameState) -> GameState {
    GameState {
        cannon: Cannon {
            can_move: !state.cannon.can_move,
            ..state.cannon
        },
        ..state.clone()
    }
}
