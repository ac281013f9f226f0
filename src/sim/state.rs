//! Game state and core simulation types
//!
//! Every type here is a plain value. Transitions build a new `GameState`
//! instead of editing a published one.

use std::collections::BTreeMap;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::collision::ContactSnap;
use super::layout;
use crate::consts::*;
use crate::move_point;

/// The pivoting launcher at the top of the board
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cannon {
    /// Pivot point (world space)
    pub origin: DVec2,
    /// Barrel length; shots spawn at the barrel tip
    pub length: f64,
    /// Barrel angle in degrees, measured from the -y axis
    pub angle: f64,
    /// Launch speed of a fresh ball
    pub muzzle_velocity: f64,
    /// Whether AIM is allowed to rotate the barrel
    pub can_move: bool,
}

impl Default for Cannon {
    fn default() -> Self {
        Self {
            origin: DVec2::new(0.0, BOARD_HEIGHT / 2.0 - CANNON_TOP_INSET),
            length: CANNON_LENGTH,
            angle: 0.0,
            muzzle_velocity: MUZZLE_VELOCITY,
            can_move: true,
        }
    }
}

impl Cannon {
    /// Point at the end of the barrel
    pub fn muzzle_position(&self) -> DVec2 {
        move_point(self.origin, self.angle, self.length)
    }

    /// Velocity a ball leaves the barrel with
    pub fn muzzle_velocity_vector(&self) -> DVec2 {
        move_point(DVec2::ZERO, self.angle, self.muzzle_velocity)
    }
}

/// An active player modifier. No transition reads these yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Effect {
    pub name: String,
    /// Shots left before the effect wears off
    pub shots_remaining: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Ammunition
    pub balls: u32,
    pub effects: Vec<Effect>,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            balls: PLAYER_BALLS,
            effects: Vec::new(),
        }
    }
}

/// Piece types
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PieceKind {
    Goal,
    Point,
    Bonus,
    Power,
}

impl PieceKind {
    pub const ALL: [PieceKind; 4] = [
        PieceKind::Goal,
        PieceKind::Point,
        PieceKind::Bonus,
        PieceKind::Power,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::Goal => "GOAL",
            PieceKind::Point => "POINT",
            PieceKind::Bonus => "BONUS",
            PieceKind::Power => "POWER",
        }
    }

    /// Default score for hitting a piece of this kind
    pub fn default_value(&self) -> u32 {
        match self {
            PieceKind::Goal => 100,
            PieceKind::Point => 25,
            PieceKind::Bonus => 1000,
            PieceKind::Power => 100,
        }
    }
}

/// A stationary circular target
///
/// A piece's index in `Board::pieces` is its identity for the session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    /// Invisible pieces are skipped by collision
    pub is_visible: bool,
    /// Set on the first tick a ball touches the piece; never cleared
    pub is_hit: bool,
    pub position: DVec2,
}

impl Piece {
    pub fn new(kind: PieceKind, x: f64, y: f64) -> Self {
        Self {
            kind,
            is_visible: true,
            is_hit: false,
            position: DVec2::new(x, y),
        }
    }
}

/// A ball in flight
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub position: DVec2,
    pub velocity: DVec2,
}

/// Scoring table and bounce rules carried with the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfiguration {
    pub piece_values: BTreeMap<PieceKind, u32>,
    #[serde(default)]
    pub contact_snap: ContactSnap,
}

impl Default for BoardConfiguration {
    fn default() -> Self {
        Self {
            piece_values: PieceKind::ALL
                .iter()
                .map(|kind| (*kind, kind.default_value()))
                .collect(),
            contact_snap: ContactSnap::default(),
        }
    }
}

impl BoardConfiguration {
    /// Value of a piece kind; kinds missing from the table are worth nothing
    pub fn value_of(&self, kind: PieceKind) -> u32 {
        self.piece_values.get(&kind).copied().unwrap_or(0)
    }
}

/// The arena: a width x height box centered on the origin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub width: f64,
    pub height: f64,
    pub ball_radius: f64,
    pub piece_radius: f64,
    /// Vertical acceleration (negative = downward)
    pub gravity: f64,
    /// Balls in flight, in launch order
    pub balls: Vec<Ball>,
    /// Pieces in stable, index-addressable order
    pub pieces: Vec<Piece>,
    pub configuration: BoardConfiguration,
}

impl Default for Board {
    fn default() -> Self {
        Self {
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
            ball_radius: BALL_RADIUS,
            piece_radius: PIECE_RADIUS,
            gravity: GRAVITY,
            balls: Vec::new(),
            pieces: layout::default_layout(),
            configuration: BoardConfiguration::default(),
        }
    }
}

impl Board {
    pub fn left(&self) -> f64 {
        -self.width / 2.0
    }

    pub fn right(&self) -> f64 {
        self.width / 2.0
    }

    pub fn bottom(&self) -> f64 {
        -self.height / 2.0
    }

    pub fn top(&self) -> f64 {
        self.height / 2.0
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GameState {
    pub cannon: Cannon,
    pub player: Player,
    pub board: Board,
}

impl GameState {
    /// True while a ball is on the board
    pub fn in_flight(&self) -> bool {
        !self.board.balls.is_empty()
    }

    /// Whether SHOOT would launch a ball right now
    pub fn can_shoot(&self) -> bool {
        self.player.balls > 0 && !self.in_flight()
    }

    /// Where a renderer should draw the ball waiting in the barrel, if any
    pub fn loaded_ball_position(&self) -> Option<DVec2> {
        self.can_shoot().then(|| self.cannon.muzzle_position())
    }
}
