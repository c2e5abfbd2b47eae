//! Shapes (closed cycles of lines) and their vertex angles.
//!
//! Records are immutable; value edits go through `with_angle_value` /
//! `with_line_value`, which return an updated copy.

use std::fmt;

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::geometry::distance;
use crate::plane::{Line, LineId};

type Vec2 = Vector2<f64>;

/// Canonical shape identity: ascending line ids joined by `-`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ShapeId(pub String);

/// Angle identity: the ascending pair of adjacent line ids.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AngleId(pub String);

impl ShapeId {
    pub fn of(ids: impl IntoIterator<Item = LineId>) -> Self {
        Self(join_sorted(ids))
    }
}

impl AngleId {
    pub fn of(a: LineId, b: LineId) -> Self {
        Self(join_sorted([a, b]))
    }
}

fn join_sorted(ids: impl IntoIterator<Item = LineId>) -> String {
    let mut ids: Vec<u64> = ids.into_iter().map(|id| id.0).collect();
    ids.sort_unstable();
    ids.iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join("-")
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S[{}]", self.0)
    }
}

impl fmt::Display for AngleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "A[{}]", self.0)
    }
}

/// Coordinate shared by two lines, checked as start/start, end/end,
/// a.start/b.end, a.end/b.start.
pub fn shared_vertex(a: &Line, b: &Line) -> Option<Vec2> {
    if a.start == b.start {
        Some(a.start)
    } else if a.end == b.end {
        Some(a.end)
    } else if a.start == b.end {
        Some(a.start)
    } else if a.end == b.start {
        Some(a.end)
    } else {
        None
    }
}

/// Far endpoint of `line` as seen from `vertex`.
fn arm(line: &Line, vertex: Vec2) -> Vec2 {
    if line.start == vertex {
        line.end
    } else {
        line.start
    }
}

/// One vertex of a shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Angle {
    pub id: AngleId,
    pub position: Vec2,
    /// Far endpoints of the two incident lines.
    pub arms: [Vec2; 2],
    pub value: Option<f64>,
}

impl Angle {
    /// Vertex between `line` and its cyclic predecessor `prev`.
    ///
    /// A pair without a shared coordinate is logged and placed at the origin.
    pub fn new(line: &Line, prev: &Line) -> Self {
        let position = shared_vertex(line, prev).unwrap_or_else(|| {
            warn!(first = %line.id, second = %prev.id, "adjacent lines share no vertex");
            Vec2::zeros()
        });
        Self {
            id: AngleId::of(line.id, prev.id),
            position,
            arms: [arm(line, position), arm(prev, position)],
            value: None,
        }
    }

    /// Geometric angle between the two arms, in degrees within `[0, 180]`.
    pub fn degrees(&self) -> f64 {
        let u = self.arms[0] - self.position;
        let v = self.arms[1] - self.position;
        let nu = u.norm();
        let nv = v.norm();
        if nu == 0.0 || nv == 0.0 {
            return 0.0;
        }
        let c = (u.dot(&v) / (nu * nv)).clamp(-1.0, 1.0);
        c.acos().to_degrees()
    }
}

/// A closed cycle of lines with one angle per vertex.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub id: ShapeId,
    /// Lines in traversal order.
    pub lines: Vec<Line>,
    /// `angles[i]` sits between `lines[i]` and `lines[i - 1]` (cyclically).
    pub angles: Vec<Angle>,
}

impl Shape {
    /// Build from an ordered cycle. Fewer than two lines is not a shape.
    pub fn from_cycle(lines: Vec<Line>) -> Option<Self> {
        if lines.len() < 2 {
            warn!(lines = lines.len(), "cycle too short for a shape");
            return None;
        }
        let n = lines.len();
        let angles = (0..n)
            .map(|i| Angle::new(&lines[i], &lines[(i + n - 1) % n]))
            .collect();
        Some(Self {
            id: ShapeId::of(lines.iter().map(|l| l.id)),
            lines,
            angles,
        })
    }

    pub fn has_line(&self, id: LineId) -> bool {
        self.lines.iter().any(|l| l.id == id)
    }

    pub fn angle(&self, id: &AngleId) -> Option<&Angle> {
        self.angles.iter().find(|a| &a.id == id)
    }

    pub fn line(&self, id: LineId) -> Option<&Line> {
        self.lines.iter().find(|l| l.id == id)
    }

    /// Vertex positions in cycle order.
    pub fn vertices(&self) -> Vec<Vec2> {
        self.angles.iter().map(|a| a.position).collect()
    }

    pub fn perimeter(&self) -> f64 {
        self.lines.iter().map(|l| l.length).sum()
    }

    /// Shoelace area over `vertices()`; positive for counterclockwise order.
    pub fn signed_area(&self) -> f64 {
        let v = self.vertices();
        let n = v.len();
        let twice: f64 = (0..n)
            .map(|i| {
                let (p, q) = (v[i], v[(i + 1) % n]);
                p.x * q.y - q.x * p.y
            })
            .sum();
        0.5 * twice
    }

    /// Every adjacent pair shares a coordinate.
    pub fn vertices_consistent(&self) -> bool {
        let n = self.lines.len();
        (0..n).all(|i| shared_vertex(&self.lines[i], &self.lines[(i + n - 1) % n]).is_some())
    }

    /// Nearest angle strictly within `radius` of `tap`.
    pub fn is_close_to_angle(&self, tap: Vec2, radius: f64) -> Option<&Angle> {
        self.angles
            .iter()
            .map(|a| (distance(tap, a.position), a))
            .filter(|(d, _)| *d < radius)
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, a)| a)
    }

    /// Line whose center is nearest and strictly within `radius` of `tap`.
    pub fn is_close_to_line(&self, tap: Vec2, radius: f64) -> Option<&Line> {
        self.lines
            .iter()
            .map(|l| (distance(tap, l.center), l))
            .filter(|(d, _)| *d < radius)
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, l)| l)
    }

    /// Copy with the value of angle `id` replaced; `None` if absent.
    pub fn with_angle_value(&self, id: &AngleId, value: f64) -> Option<Self> {
        let idx = self.angles.iter().position(|a| &a.id == id)?;
        let mut next = self.clone();
        next.angles[idx] = Angle {
            value: Some(value),
            ..self.angles[idx].clone()
        };
        Some(next)
    }

    /// Copy with the value of line `id` replaced; `None` if absent.
    pub fn with_line_value(&self, id: LineId, value: f64) -> Option<Self> {
        let idx = self.lines.iter().position(|l| l.id == id)?;
        let mut next = self.clone();
        next.lines[idx] = self.lines[idx].with_value(Some(value));
        Some(next)
    }
}
