//! Incremental segment splitting and single-step undo.
//!
//! Each committed line is intersected with every active line. A crossing
//! interior to an existing line splits that line in two; crossings interior
//! to the new line split it into an ordered chain. Parents are then retired
//! through `PointRegistry::prune_parent_lines`, which also moves point
//! associations onto the children.

use std::collections::HashSet;

use nalgebra::Vector2;
use tracing::{debug, warn};

use crate::cfg::GeomCfg;
use crate::geometry::{intersect, same_point};

use super::registry::PointRegistry;
use super::types::{Line, LineId, Point};

type Vec2 = Vector2<f64>;

/// What one `add_line` changed, enough to reverse it exactly.
#[derive(Clone, Debug, PartialEq)]
pub struct Commit {
    /// Id of the drawn line (retired if it was split).
    pub drawn: LineId,
    /// Lines that became active.
    pub added: Vec<LineId>,
    /// Lines retired by splitting, with their former index in the active list.
    pub superseded: Vec<(usize, Line)>,
}

/// New state produced by `add_line`.
#[derive(Clone, Debug)]
pub struct SplitOutcome {
    pub lines: Vec<Line>,
    pub points: PointRegistry,
    pub commit: Commit,
}

/// Insert `new_line` into the arrangement `lines`/`points`.
///
/// Post: the returned lines are pairwise non-crossing except at shared
/// endpoints (collinear overlaps excepted), and every point is associated
/// exactly with the active lines ending there.
pub fn add_line(
    new_line: Line,
    lines: &[Line],
    points: &PointRegistry,
    cfg: &GeomCfg,
) -> SplitOutcome {
    if new_line.is_degenerate() {
        warn!(line = %new_line.id, x = new_line.start.x, y = new_line.start.y,
            "zero-length line accepted; excluded from intersections");
    } else if new_line.length < cfg.min_line_length {
        warn!(line = %new_line.id, length = new_line.length, "line shorter than minimal length");
    }

    let mut points = points.clone();
    points.add_or_merge(Point::new(new_line.start, [new_line.id]));
    points.add_or_merge(Point::new(new_line.end, [new_line.id]));

    if lines.is_empty() {
        let commit = Commit {
            drawn: new_line.id,
            added: vec![new_line.id],
            superseded: Vec::new(),
        };
        return SplitOutcome {
            lines: vec![new_line],
            points,
            commit,
        };
    }

    let mut children: Vec<Line> = Vec::new();
    let mut superseded: Vec<(usize, Line)> = Vec::new();
    let mut cuts: Vec<Vec2> = Vec::new();
    let mut crossings: Vec<Point> = Vec::new();

    for (idx, other) in lines.iter().enumerate() {
        let Some(raw) = intersect(new_line.start, new_line.end, other.start, other.end) else {
            continue;
        };
        let x = settle_crossing(raw, &new_line, other, &points, cfg.eps_merge);
        if !other.touches(x) {
            children.push(Line::new(other.start, x, Some(other.id), None));
            children.push(Line::new(x, other.end, Some(other.id), None));
            superseded.push((idx, other.clone()));
        }
        if !new_line.touches(x) && !cuts.contains(&x) {
            cuts.push(x);
        }
        crossings.push(Point::new(x, [new_line.id, other.id]));
    }

    let fragments = chain(&new_line, cuts);
    for p in crossings {
        points.add_or_merge(p);
    }

    let mut added: Vec<LineId> = children.iter().map(|l| l.id).collect();
    let mut candidates: Vec<Line> = lines.to_vec();
    candidates.append(&mut children);
    if fragments.is_empty() {
        added.push(new_line.id);
        candidates.push(new_line.clone());
    } else {
        added.extend(fragments.iter().map(|l| l.id));
        candidates.push(new_line.clone());
        candidates.extend(fragments);
    }

    let active = points.prune_parent_lines(candidates);
    debug!(
        line = %new_line.id,
        split = superseded.len(),
        added = added.len(),
        active = active.len(),
        points = points.len(),
        "line committed"
    );
    SplitOutcome {
        lines: active,
        points,
        commit: Commit {
            drawn: new_line.id,
            added,
            superseded,
        },
    }
}

/// Reverse `commit`, which must be the most recent commit applied to
/// `lines`/`points`.
pub fn remove_last_line(
    lines: &[Line],
    points: &PointRegistry,
    commit: &Commit,
) -> (Vec<Line>, PointRegistry) {
    let added: HashSet<LineId> = commit.added.iter().copied().collect();
    let mut restored: Vec<Line> = lines
        .iter()
        .filter(|l| !added.contains(&l.id))
        .cloned()
        .collect();
    let mut superseded = commit.superseded.clone();
    superseded.sort_by_key(|(idx, _)| *idx);

    let mut points = points.clone();
    for (idx, parent) in superseded {
        let ids: Vec<_> = points
            .iter()
            .filter(|p| parent.touches(p.pos))
            .map(|p| p.id)
            .collect();
        for id in ids {
            if let Some(p) = points.get_mut(id) {
                p.lines.insert(parent.id);
            }
        }
        let at = idx.min(restored.len());
        restored.insert(at, parent);
    }
    points.remove_associations_for_removed_lines(&commit.added);
    debug!(line = %commit.drawn, active = restored.len(), points = points.len(), "line undone");
    (restored, points)
}

/// Snap a computed crossing onto an endpoint of either segment or onto a
/// registered point, so coincident crossings share exact coordinates.
fn settle_crossing(raw: Vec2, a: &Line, b: &Line, points: &PointRegistry, eps: f64) -> Vec2 {
    [a.start, a.end, b.start, b.end]
        .into_iter()
        .find(|&c| same_point(raw, c, eps))
        .unwrap_or_else(|| points.snap(raw, eps))
}

/// Split `line` at interior `cuts` into consecutive children (empty if no cuts).
fn chain(line: &Line, mut cuts: Vec<Vec2>) -> Vec<Line> {
    if cuts.is_empty() {
        return Vec::new();
    }
    cuts.sort_by(|p, q| line.param_of(*p).total_cmp(&line.param_of(*q)));
    let mut stops = Vec::with_capacity(cuts.len() + 2);
    stops.push(line.start);
    stops.extend(cuts);
    stops.push(line.end);
    stops
        .windows(2)
        .map(|w| Line::new(w[0], w[1], Some(line.id), None))
        .collect()
}
