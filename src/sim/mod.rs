//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Every transition returns a fresh snapshot
//! - Stable iteration order (balls by launch, pieces by index)
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod action;
pub mod collision;
pub mod layout;
pub mod reducer;
pub mod state;
pub mod tick;

pub use action::{Action, ActionBinding, ActionError, ActionMessage, InputMapping, PLAYER_ACTIONS};
pub use collision::{Collision, ContactSnap, reflect_velocity, resolve, resolve_wall, resolve_with};
pub use reducer::{apply, apply_message, replay};
pub use state::{Ball, Board, BoardConfiguration, Cannon, Effect, GameState, Piece, PieceKind, Player};
pub use tick::{integrate, tick};
