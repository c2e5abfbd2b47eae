//! Input conditioning for drawing surfaces: snap raw pointer coordinates onto
//! known geometry before a line is committed.
//!
//! Candidates, all within `GeomCfg::snap_distance` (strict):
//! - registry points (endpoints and crossings),
//! - in-line subdivision points of every active line,
//! - axis projections of registry points (same x or same y as the pointer),
//!   used only when no point of the first two kinds is in range.

use nalgebra::Vector2;

use crate::cfg::GeomCfg;
use crate::geometry::{distance, subdivision_points};
use crate::plane::{Line, PointRegistry};

type Vec2 = Vector2<f64>;

/// Fixed snap candidates (independent of the pointer position).
pub fn snap_points(lines: &[Line], points: &PointRegistry, cfg: &GeomCfg) -> Vec<Vec2> {
    let mut out: Vec<Vec2> = points.iter().map(|p| p.pos).collect();
    for line in lines {
        out.extend(subdivision_points(line, cfg.divisions).into_iter().map(|p| p.pos));
    }
    out
}

/// Closest fixed candidate to `p` strictly within the snap distance; failing
/// that, the closest axis projection; else `p` unchanged.
pub fn snap_target(p: Vec2, lines: &[Line], points: &PointRegistry, cfg: &GeomCfg) -> Vec2 {
    let projections = points
        .iter()
        .flat_map(|q| [Vec2::new(q.pos.x, p.y), Vec2::new(p.x, q.pos.y)]);
    nearest_within(p, snap_points(lines, points, cfg), cfg.snap_distance)
        .or_else(|| nearest_within(p, projections, cfg.snap_distance))
        .unwrap_or(p)
}

fn nearest_within(p: Vec2, candidates: impl IntoIterator<Item = Vec2>, radius: f64) -> Option<Vec2> {
    candidates
        .into_iter()
        .map(|c| (distance(p, c), c))
        .filter(|(d, _)| *d < radius)
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, c)| c)
}

/// Lock `p` onto the anchor's x and/or y when within the parallel safe zone,
/// so nearly axis-aligned strokes come out exactly horizontal or vertical.
pub fn align_axis(anchor: Vec2, p: Vec2, cfg: &GeomCfg) -> Vec2 {
    let x = if (p.x - anchor.x).abs() < cfg.parallel_safe_zone {
        anchor.x
    } else {
        p.x
    };
    let y = if (p.y - anchor.y).abs() < cfg.parallel_safe_zone {
        anchor.y
    } else {
        p.y
    };
    Vec2::new(x, y)
}
