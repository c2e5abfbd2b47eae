//! Point registry: endpoints and crossings keyed by exact coordinates.
//!
//! Invariants
//! - No two points share coordinates (`add_or_merge` unions associations).
//! - A point with no associated line is removed.

use std::collections::{BTreeSet, HashSet};

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::geometry::distance;

use super::types::{Line, LineId, Point, PointId};

type Vec2 = Vector2<f64>;

/// Insertion-ordered set of points.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PointRegistry {
    points: Vec<Point>,
}

impl PointRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Point> {
        self.points.iter()
    }

    pub fn as_slice(&self) -> &[Point] {
        &self.points
    }

    pub fn get(&self, id: PointId) -> Option<&Point> {
        self.points.iter().find(|p| p.id == id)
    }

    /// Point at exactly `pos`.
    pub fn find_at(&self, pos: Vec2) -> Option<&Point> {
        self.points.iter().find(|p| p.pos == pos)
    }

    /// Closest point within `eps` of `pos` (inclusive).
    pub fn find_near(&self, pos: Vec2, eps: f64) -> Option<&Point> {
        self.points
            .iter()
            .map(|p| (distance(p.pos, pos), p))
            .filter(|(d, _)| *d <= eps)
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, p)| p)
    }

    /// Replace `pos` by the coordinates of a registered point within `eps`.
    pub fn snap(&self, pos: Vec2, eps: f64) -> Vec2 {
        if eps <= 0.0 {
            return pos;
        }
        self.find_near(pos, eps).map_or(pos, |p| p.pos)
    }

    /// Points associated with `line`.
    pub fn points_on(&self, line: LineId) -> impl Iterator<Item = &Point> {
        self.points.iter().filter(move |p| p.has_line(line))
    }

    /// Insert `point`, or union its associations into the point already at
    /// the same coordinates. Returns the id of the surviving point.
    pub fn add_or_merge(&mut self, point: Point) -> PointId {
        if let Some(existing) = self.points.iter_mut().find(|p| p.pos == point.pos) {
            existing.lines.extend(point.lines);
            return existing.id;
        }
        let id = point.id;
        self.points.push(point);
        id
    }

    /// Strip `removed` from every point; drop points left without lines.
    pub fn remove_associations_for_removed_lines(&mut self, removed: &[LineId]) {
        let removed: HashSet<LineId> = removed.iter().copied().collect();
        for p in &mut self.points {
            p.lines.retain(|id| !removed.contains(id));
        }
        self.points.retain(|p| !p.lines.is_empty());
    }

    /// Retire split parents from `candidates` and move their point
    /// associations onto the children that touch each point.
    ///
    /// Returns the active lines: candidates minus parents, deduplicated by id,
    /// first occurrence order preserved.
    pub fn prune_parent_lines(&mut self, candidates: Vec<Line>) -> Vec<Line> {
        let parents: BTreeSet<LineId> = candidates.iter().filter_map(|l| l.parent).collect();
        if !parents.is_empty() {
            for p in &mut self.points {
                let stale: Vec<LineId> = p
                    .lines
                    .iter()
                    .copied()
                    .filter(|id| parents.contains(id))
                    .collect();
                for parent in stale {
                    p.lines.remove(&parent);
                    let mut adopted = false;
                    for child in candidates
                        .iter()
                        .filter(|l| l.parent == Some(parent) && l.touches(p.pos))
                    {
                        p.lines.insert(child.id);
                        adopted = true;
                    }
                    if !adopted {
                        warn!(point = %p.id, line = %parent, "no child of split line touches point");
                    }
                }
            }
            self.points.retain(|p| !p.lines.is_empty());
        }
        let mut seen = HashSet::new();
        candidates
            .into_iter()
            .filter(|l| !parents.contains(&l.id))
            .filter(|l| seen.insert(l.id))
            .collect()
    }

    pub(crate) fn get_mut(&mut self, id: PointId) -> Option<&mut Point> {
        self.points.iter_mut().find(|p| p.id == id)
    }
}

impl<'a> IntoIterator for &'a PointRegistry {
    type Item = &'a Point;
    type IntoIter = std::slice::Iter<'a, Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
