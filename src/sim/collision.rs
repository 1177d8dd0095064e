//! Collision detection and response
//!
//! Every target (paddle or brick) is probed with four 1-pixel strips along
//! its edges. The strips the ball overlaps decide which edge was struck, and
//! the struck edge decides which velocity axis flips.

use super::effects;
use super::rect::Rect;
use super::state::{BallTint, Edge, GameEvent, GamePhase, GameState};
use crate::consts::PADDLE_ENGLISH;

/// Thickness of an edge probe
pub const PROBE_THICKNESS: f32 = 1.0;

/// Edge probes of a target rectangle
#[derive(Debug, Clone, Copy)]
pub struct EdgeProbes {
    pub left: Rect,
    pub right: Rect,
    pub top: Rect,
    pub bottom: Rect,
}

impl EdgeProbes {
    pub fn of(target: &Rect) -> Self {
        Self {
            left: Rect::new(target.left(), target.top(), PROBE_THICKNESS, target.h),
            right: Rect::new(target.right(), target.top(), PROBE_THICKNESS, target.h),
            top: Rect::new(target.left(), target.top(), target.w, PROBE_THICKNESS),
            bottom: Rect::new(target.left(), target.bottom(), target.w, PROBE_THICKNESS),
        }
    }
}

/// Classify which edge of `target` the ball (given by its bounds) struck.
///
/// A ball sliding over a corner can overlap a horizontal and a vertical probe
/// at once. It counts as a side hit once its center has crossed the target's
/// top (or bottom) edge, otherwise as a top (or bottom) hit. A side hit is
/// on the left only while the ball center is still left of the target.
pub fn classify_edge(target: &Rect, ball: &Rect) -> Option<Edge> {
    let probes = EdgeProbes::of(target);
    let left = ball.intersects(&probes.left);
    let right = ball.intersects(&probes.right);
    let top = ball.intersects(&probes.top);
    let bottom = ball.intersects(&probes.bottom);

    let center = ball.center();
    let side = || {
        if center.x < target.left() {
            Edge::Left
        } else {
            Edge::Right
        }
    };
    let any_side = left || right;

    match (top, bottom) {
        (false, false) if !any_side => None,
        (false, false) if left && right => Some(side()),
        (false, false) => Some(if left { Edge::Left } else { Edge::Right }),
        (true, false) if !any_side => Some(Edge::Top),
        (true, false) => Some(if center.y >= target.top() {
            side()
        } else {
            Edge::Top
        }),
        (false, true) if !any_side => Some(Edge::Bottom),
        (false, true) => Some(if center.y <= target.bottom() {
            side()
        } else {
            Edge::Bottom
        }),
        // Ball taller than the target: closest horizontal edge wins
        (true, true) => Some(if center.y < target.center().y {
            Edge::Top
        } else {
            Edge::Bottom
        }),
    }
}

/// Resolve all ball collisions for this frame
///
/// Paddle, ceiling, floor, side walls, then bricks. Several can fire in the
/// same frame.
pub fn resolve(state: &mut GameState) {
    state.ball.tint = BallTint::Idle;

    resolve_paddle(state);

    let ball = state.ball.bounds();
    let arena = state.arena();
    let mut wall_resolved = false;

    // Ceiling
    if ball.top() <= arena.top() {
        state.ball.vel.y = -state.ball.vel.y;
        state.ball.tint = BallTint::WallHit;
        state.events.push(GameEvent::WallHit);
        wall_resolved = true;
    }

    // Floor
    if ball.top() >= arena.bottom() {
        wall_resolved = true;
        state.lose_life();
        if state.phase == GamePhase::Lost {
            return;
        }
    }

    // Side walls
    if !wall_resolved && (ball.left() <= arena.left() || ball.right() >= arena.right()) {
        state.ball.vel.x = -state.ball.vel.x;
        state.ball.tint = BallTint::WallHit;
        state.events.push(GameEvent::WallHit);
    }

    resolve_bricks(state);
}

fn resolve_paddle(state: &mut GameState) {
    let Some(edge) = classify_edge(&state.paddle.bounds, &state.ball.bounds()) else {
        return;
    };

    match edge {
        Edge::Top => {
            state.ball.vel.y = -state.ball.vel.y;
            let heading = state.paddle.heading();
            if heading != 0.0 {
                state.ball.vel.x += PADDLE_ENGLISH * heading;
            }
        }
        Edge::Left | Edge::Right => state.ball.vel.x = -state.ball.vel.x,
        Edge::Bottom => {}
    }
    state.ball.tint = BallTint::PaddleHit;
    state.events.push(GameEvent::PaddleHit { edge });
    log::debug!("Paddle hit on {:?} edge, ball vel {:?}", edge, state.ball.vel);
}

fn resolve_bricks(state: &mut GameState) {
    let ball = state.ball.bounds();

    let mut hits = Vec::new();
    state.bricks.retain(|brick| match classify_edge(&brick.bounds, &ball) {
        Some(edge) => {
            hits.push((brick.id, edge, brick.effect));
            false
        }
        None => true,
    });

    for (id, edge, effect) in hits {
        let points = state.points_per_brick;
        state.score += points;
        match edge {
            Edge::Top | Edge::Bottom => state.ball.vel.y = -state.ball.vel.y,
            Edge::Left | Edge::Right => state.ball.vel.x = -state.ball.vel.x,
        }
        state.ball.tint = BallTint::BrickHit;
        state.events.push(GameEvent::BrickDestroyed { id, edge, points });
        log::debug!("Brick {} destroyed on {:?} edge (+{})", id, edge, points);

        if let Some(kind) = effect {
            effects::activate(state, kind);
        }
    }
}
