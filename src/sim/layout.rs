//! Piece layouts
//!
//! `default_layout` is the fixed four-piece board used as the canonical
//! fixture. `scattered` builds larger boards from a seed.

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::{Board, Piece, PieceKind};

/// Attempts per piece before `scattered` gives up on placing it
const MAX_PLACEMENT_ATTEMPTS: u32 = 64;

/// Fraction of the board height (from the top) kept clear for the cannon
const CANNON_CLEARANCE: f64 = 0.2;

/// The reference board: four pieces at fixed world coordinates
pub fn default_layout() -> Vec<Piece> {
    vec![
        Piece::new(PieceKind::Goal, -100.0, 0.0),
        Piece::new(PieceKind::Point, -50.0, -50.0),
        Piece::new(PieceKind::Bonus, 100.0, 0.0),
        Piece::new(PieceKind::Power, 50.0, -50.0),
    ]
}

/// Pick a piece kind. Points are common, bonuses rare.
fn roll_kind(rng: &mut Pcg32) -> PieceKind {
    let roll: f64 = rng.random();
    if roll < 0.55 {
        PieceKind::Point
    } else if roll < 0.85 {
        PieceKind::Goal
    } else if roll < 0.95 {
        PieceKind::Power
    } else {
        PieceKind::Bonus
    }
}

/// Generate up to `count` non-overlapping pieces for `board`.
///
/// Pieces keep a ball-width gap from each other and from the side walls,
/// and stay out of the band under the cannon. The same seed always yields
/// the same layout. Fewer than `count` pieces are returned if the board is
/// too crowded.
pub fn scattered(seed: u64, count: usize, board: &Board) -> Vec<Piece> {
    let mut rng = Pcg32::seed_from_u64(seed);

    let margin = board.piece_radius + board.ball_radius * 2.0;
    let min_x = board.left() + margin;
    let max_x = board.right() - margin;
    let min_y = board.bottom() + margin;
    let max_y = board.top() - board.height * CANNON_CLEARANCE;
    if min_x >= max_x || min_y >= max_y {
        log::warn!(
            "Board {}x{} too small for a scattered layout",
            board.width,
            board.height
        );
        return Vec::new();
    }

    let min_spacing = board.piece_radius * 2.0 + board.ball_radius * 2.0;
    let mut pieces: Vec<Piece> = Vec::with_capacity(count);

    for _ in 0..count {
        let kind = roll_kind(&mut rng);
        let placed = (0..MAX_PLACEMENT_ATTEMPTS).find_map(|_| {
            let candidate = DVec2::new(
                rng.random_range(min_x..max_x),
                rng.random_range(min_y..max_y),
            );
            let clear = pieces
                .iter()
                .all(|p| p.position.distance(candidate) >= min_spacing);
            clear.then_some(candidate)
        });

        match placed {
            Some(pos) => pieces.push(Piece::new(kind, pos.x, pos.y)),
            None => {
                log::debug!("Stopped scattering after {} pieces", pieces.len());
                break;
            }
        }
    }

    pieces
}
