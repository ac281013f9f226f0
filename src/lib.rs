//! Peggle Prime - a cannon-and-pegs arcade simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (state tree, actions, reducer, physics)
//! - `session`: Frame scheduler that owns the action queue and the current snapshot
//! - `config`: Injectable game configuration
//! - `scoring`: Score computation from hit pieces
//! - `viewport`: World/screen coordinate conversion for hosts

pub mod config;
pub mod scoring;
pub mod session;
pub mod sim;
pub mod viewport;

pub use config::{ConfigError, GameConfig};
pub use scoring::{ScoreBreakdown, score};
pub use session::{Dispatcher, DrainOrder, GameSession, Renderer};

use glam::DVec2;

/// Game configuration constants
pub mod consts {
    /// Default arena dimensions
    pub const BOARD_WIDTH: f64 = 660.0;
    pub const BOARD_HEIGHT: f64 = 680.0;

    /// Default radii
    pub const BALL_RADIUS: f64 = 10.0;
    pub const PIECE_RADIUS: f64 = 14.0;

    /// Downward acceleration (world units/s²)
    pub const GRAVITY: f64 = -900.0;

    /// Cannon defaults
    pub const CANNON_LENGTH: f64 = 50.0;
    pub const MUZZLE_VELOCITY: f64 = 750.0;
    /// Cannon pivot sits this far below the top edge of the board
    pub const CANNON_TOP_INSET: f64 = 5.0;

    /// Starting ammunition
    pub const PLAYER_BALLS: u32 = 10;

    /// Fraction of speed kept after bouncing off a piece
    pub const RESTITUTION: f64 = 0.9;

    /// Offsets smaller than this snap to zero in `move_point`
    pub const SNAP_EPSILON: f64 = 0.0001;
}

/// Move `point` by `magnitude` along `angle` (degrees, measured from the -y axis).
///
/// Angle 0 points straight down, 90 points right, -90 points left.
/// Offsets below [`consts::SNAP_EPSILON`] are snapped to exactly zero so
/// axis-aligned shots stay axis-aligned.
#[inline]
pub fn move_point(point: DVec2, angle: f64, magnitude: f64) -> DVec2 {
    let radians = angle.to_radians();
    let x_off = magnitude * radians.sin();
    let y_off = magnitude * radians.cos();
    DVec2::new(point.x + snap(x_off), point.y - snap(y_off))
}

#[inline]
fn snap(offset: f64) -> f64 {
    if offset.abs() < consts::SNAP_EPSILON {
        0.0
    } else {
        offset
    }
}
