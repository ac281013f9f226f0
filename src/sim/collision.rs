//! Collision detection and response
//!
//! Ball vs. piece is a plain circle-overlap test run once per tick, so a fast
//! ball can tunnel through a piece between ticks. Ball vs. wall only looks at
//! the two side walls; the floor is an exit, not a wall.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::state::{Ball, Piece};
use crate::consts::RESTITUTION;

/// Where a ball is placed after bouncing off a piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContactSnap {
    /// `piece + normal·piece_radius`. The ball still overlaps the piece
    /// afterwards and is resolved again on following ticks.
    #[default]
    PieceCenter,
    /// `ball + normal·piece_radius`, pushing the ball out from where it was
    BallOffset,
}

/// Ball state after bouncing off a piece
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collision {
    pub position: DVec2,
    pub velocity: DVec2,
}

impl From<Collision> for Ball {
    fn from(c: Collision) -> Self {
        Ball {
            position: c.position,
            velocity: c.velocity,
        }
    }
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: DVec2, normal: DVec2) -> DVec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Check a ball against one piece and compute the bounce.
///
/// Returns `None` when the circles don't overlap. On overlap the contact
/// normal is the unit vector of `(dx·rb/r - piece.x, dy·rb/r - piece.y)`,
/// the ball is snapped to `piece + normal·piece_radius` and its velocity is
/// reflected about the normal and scaled by [`RESTITUTION`].
///
/// A degenerate (zero-length) normal still counts as a hit but applies no
/// impulse: the ball comes back unchanged.
pub fn resolve(
    ball: &Ball,
    piece: &Piece,
    ball_radius: f64,
    piece_radius: f64,
) -> Option<Collision> {
    resolve_with(ball, piece, ball_radius, piece_radius, ContactSnap::PieceCenter)
}

/// [`resolve`] with an explicit placement rule for the bounced ball
pub fn resolve_with(
    ball: &Ball,
    piece: &Piece,
    ball_radius: f64,
    piece_radius: f64,
    snap: ContactSnap,
) -> Option<Collision> {
    let r = ball_radius + piece_radius;
    let d = ball.position - piece.position;
    if d.length_squared() > r * r {
        return None;
    }

    let weighted = DVec2::new(
        d.x * ball_radius / r - piece.position.x,
        d.y * ball_radius / r - piece.position.y,
    );
    let Some(normal) = weighted.try_normalize() else {
        return Some(Collision {
            position: ball.position,
            velocity: ball.velocity,
        });
    };

    let anchor = match snap {
        ContactSnap::PieceCenter => piece.position,
        ContactSnap::BallOffset => ball.position,
    };

    Some(Collision {
        position: anchor + normal * piece_radius,
        velocity: reflect_velocity(ball.velocity, normal) * RESTITUTION,
    })
}

/// Bounce a ball off the side walls at `±half_width`.
///
/// The penetrating edge is mirrored back inside by the penetration depth and
/// the horizontal velocity is negated. Only one wall is checked per call; the
/// left wall wins if both are crossed. Returns `None` when the ball is clear
/// of both walls.
pub fn resolve_wall(ball: &Ball, ball_radius: f64, half_width: f64) -> Option<Ball> {
    let left = -half_width;
    let right = half_width;
    let mut out = *ball;

    if ball.position.x - ball_radius < left {
        let penetration = left - (ball.position.x - ball_radius);
        out.position.x = left + ball_radius + penetration;
    } else if ball.position.x + ball_radius > right {
        let penetration = ball.position.x + ball_radius - right;
        out.position.x = right - ball_radius - penetration;
    } else {
        return None;
    }

    out.velocity.x = -out.velocity.x;
    Some(out)
}
