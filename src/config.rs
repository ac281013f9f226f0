//! Game configuration
//!
//! Board dimensions, physics constants, cannon parameters, piece values and
//! the piece layout. A configuration has no effect beyond seeding the
//! initial `GameState`. Every field is optional in JSON; missing fields take
//! the reference board's values.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use glam::DVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::layout;
use crate::sim::{
    Board, BoardConfiguration, Cannon, ContactSnap, GameState, Piece, PieceKind, Player,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// One piece in a fixed layout
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PieceSpec {
    pub kind: PieceKind,
    pub x: f64,
    pub y: f64,
    #[serde(default = "visible_by_default")]
    pub visible: bool,
}

fn visible_by_default() -> bool {
    true
}

impl From<PieceSpec> for Piece {
    fn from(spec: PieceSpec) -> Self {
        Piece {
            is_visible: spec.visible,
            ..Piece::new(spec.kind, spec.x, spec.y)
        }
    }
}

/// Where the pieces go
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayoutConfig {
    /// The four-piece reference board
    #[default]
    Default,
    /// Pieces at explicit coordinates, in index order
    Fixed { pieces: Vec<PieceSpec> },
    /// Seeded random placement
    Scattered { seed: u64, count: usize },
}

/// Initial game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Board ===
    pub width: f64,
    pub height: f64,
    pub ball_radius: f64,
    pub piece_radius: f64,
    /// Negative pulls balls down
    pub gravity: f64,

    // === Cannon ===
    pub cannon_length: f64,
    pub muzzle_velocity: f64,
    /// Starting barrel angle (degrees from -y)
    pub cannon_angle: f64,

    // === Player ===
    pub player_balls: u32,

    // === Pieces ===
    pub piece_values: BTreeMap<PieceKind, u32>,
    pub contact_snap: ContactSnap,
    pub layout: LayoutConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
            ball_radius: BALL_RADIUS,
            piece_radius: PIECE_RADIUS,
            gravity: GRAVITY,

            cannon_length: CANNON_LENGTH,
            muzzle_velocity: MUZZLE_VELOCITY,
            cannon_angle: 0.0,

            player_balls: PLAYER_BALLS,

            piece_values: BoardConfiguration::default().piece_values,
            contact_snap: ContactSnap::default(),
            layout: LayoutConfig::Default,
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Reject configurations the simulation can't run on
    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = [
            ("width", self.width),
            ("height", self.height),
            ("ball_radius", self.ball_radius),
            ("piece_radius", self.piece_radius),
            ("gravity", self.gravity),
            ("cannon_length", self.cannon_length),
            ("muzzle_velocity", self.muzzle_velocity),
            ("cannon_angle", self.cannon_angle),
        ];
        if let Some((name, _)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::Invalid(format!("{name} must be finite")));
        }

        let positive = [
            ("width", self.width),
            ("height", self.height),
            ("ball_radius", self.ball_radius),
            ("piece_radius", self.piece_radius),
        ];
        if let Some((name, _)) = positive.iter().find(|(_, v)| *v <= 0.0) {
            return Err(ConfigError::Invalid(format!("{name} must be positive")));
        }

        if self.ball_radius * 2.0 >= self.width {
            return Err(ConfigError::Invalid(
                "ball must be narrower than the board".to_string(),
            ));
        }

        if let LayoutConfig::Fixed { pieces } = &self.layout {
            if let Some(spec) = pieces.iter().find(|p| !p.x.is_finite() || !p.y.is_finite()) {
                return Err(ConfigError::Invalid(format!(
                    "{} piece has a non-finite position",
                    spec.kind.as_str()
                )));
            }
        }

        Ok(())
    }

    /// Build the first snapshot of a game
    pub fn initial_state(&self) -> GameState {
        let mut board = Board {
            width: self.width,
            height: self.height,
            ball_radius: self.ball_radius,
            piece_radius: self.piece_radius,
            gravity: self.gravity,
            balls: Vec::new(),
            pieces: Vec::new(),
            configuration: BoardConfiguration {
                piece_values: self.piece_values.clone(),
                contact_snap: self.contact_snap,
            },
        };
        board.pieces = match &self.layout {
            LayoutConfig::Default => layout::default_layout(),
            LayoutConfig::Fixed { pieces } => pieces.iter().copied().map(Piece::from).collect(),
            LayoutConfig::Scattered { seed, count } => layout::scattered(*seed, *count, &board),
        };

        GameState {
            cannon: Cannon {
                origin: DVec2::new(0.0, self.height / 2.0 - CANNON_TOP_INSET),
                length: self.cannon_length,
                angle: self.cannon_angle,
                muzzle_velocity: self.muzzle_velocity,
                can_move: true,
            },
            player: Player {
                balls: self.player_balls,
                effects: Vec::new(),
            },
            board,
        }
    }
}
