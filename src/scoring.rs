//! Scoring
//!
//! The score is derived from the board, never stored: every hit piece is
//! worth its kind's value from the board configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::sim::{Board, PieceKind};

/// Total score for the hit pieces on a board
pub fn score(board: &Board) -> u64 {
    board
        .pieces
        .iter()
        .filter(|p| p.is_hit)
        .map(|p| u64::from(board.configuration.value_of(p.kind)))
        .sum()
}

/// Hits and points for one piece kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindTally {
    pub hits: u32,
    pub points: u64,
}

/// Per-kind score summary (for HUDs and end-of-round screens)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub by_kind: BTreeMap<PieceKind, KindTally>,
    pub total: u64,
    /// Pieces still waiting to be hit
    pub remaining: u32,
}

impl ScoreBreakdown {
    pub fn from_board(board: &Board) -> Self {
        let mut breakdown = Self::default();
        for piece in &board.pieces {
            if !piece.is_hit {
                if piece.is_visible {
                    breakdown.remaining += 1;
                }
                continue;
            }
            let points = u64::from(board.configuration.value_of(piece.kind));
            let tally = breakdown.by_kind.entry(piece.kind).or_default();
            tally.hits += 1;
            tally.points += points;
            breakdown.total += points;
        }
        breakdown
    }

    /// True once every visible piece has been hit
    pub fn is_cleared(&self) -> bool {
        self.remaining == 0
    }
}
