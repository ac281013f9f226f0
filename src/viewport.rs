//! Viewport helpers for hosts
//!
//! Screen space has its origin at the top-left corner of the board with y
//! pointing down; world space is centered on the board with y pointing up.

use glam::DVec2;

use crate::consts::CANNON_TOP_INSET;
use crate::sim::{Board, Cannon, GameState};

/// Gap kept between the host window and the board, in pixels (both axes)
pub const WINDOW_PADDING: f64 = 40.0;

/// Board-sized screen mapping
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn of(board: &Board) -> Self {
        Self {
            width: board.width,
            height: board.height,
        }
    }

    pub fn world_to_screen(&self, point: DVec2) -> DVec2 {
        DVec2::new(self.width / 2.0 + point.x, self.height / 2.0 - point.y)
    }

    pub fn screen_to_world(&self, point: DVec2) -> DVec2 {
        DVec2::new(point.x - self.width / 2.0, self.height / 2.0 - point.y)
    }
}

/// Resize the board to a host window and re-seat the cannon under the top edge.
///
/// The board keeps [`WINDOW_PADDING`] of space around it. Only the board
/// dimensions and the cannon's vertical origin change.
pub fn fit(state: &GameState, inner_width: f64, inner_height: f64) -> GameState {
    let width = (inner_width - WINDOW_PADDING).max(0.0);
    let height = (inner_height - WINDOW_PADDING).max(0.0);
    log::info!("Fitting board to {width}x{height}");

    let mut origin = state.cannon.origin;
    origin.y = height / 2.0 - CANNON_TOP_INSET;

    GameState {
        cannon: Cannon {
            origin,
            ..state.cannon
        },
        player: state.player.clone(),
        board: Board {
            width,
            height,
            ..state.board.clone()
        },
    }
}
