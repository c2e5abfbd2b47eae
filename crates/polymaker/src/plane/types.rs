//! Identifiers, line segments and registry points.
//!
//! Lines are value objects: every derived field is computed once in
//! `Line::new`, and an "edit" builds a new `Line`.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::cfg::ON_SEGMENT_EPS;
use crate::geometry::{distance, is_point_on_segment};

type Vec2 = Vector2<f64>;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-wide fresh id; strictly increasing, shared by lines and points.
fn fresh_id() -> u64 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LineId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PointId(pub u64);

impl LineId {
    pub fn fresh() -> Self {
        Self(fresh_id())
    }
}

impl PointId {
    pub fn fresh() -> Self {
        Self(fresh_id())
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// A straight segment with derived center and length.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub id: LineId,
    /// The line this one was split from.
    pub parent: Option<LineId>,
    pub start: Vec2,
    pub end: Vec2,
    pub center: Vec2,
    pub length: f64,
    /// User-editable measurement.
    pub value: Option<f64>,
}

impl Line {
    pub fn new(start: Vec2, end: Vec2, parent: Option<LineId>, value: Option<f64>) -> Self {
        Self {
            id: LineId::fresh(),
            parent,
            start,
            end,
            center: (start + end) * 0.5,
            length: distance(start, end),
            value,
        }
    }

    /// Same geometry and identity, different measurement.
    pub fn with_value(&self, value: Option<f64>) -> Self {
        Self {
            value,
            ..self.clone()
        }
    }

    #[inline]
    pub fn is_start_point(&self, p: Vec2) -> bool {
        self.start == p
    }

    #[inline]
    pub fn is_end_point(&self, p: Vec2) -> bool {
        self.end == p
    }

    /// `p` is one of the two endpoints.
    #[inline]
    pub fn touches(&self, p: Vec2) -> bool {
        self.is_start_point(p) || self.is_end_point(p)
    }

    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.start == self.end
    }

    /// Strictly interior to the segment (default on-segment slack).
    pub fn is_point_in_line(&self, p: Vec2) -> bool {
        self.is_point_in_line_eps(p, ON_SEGMENT_EPS)
    }

    pub fn is_point_in_line_eps(&self, p: Vec2, eps: f64) -> bool {
        !self.touches(p) && is_point_on_segment(p, self.start, self.end, eps)
    }

    /// Position of `p` along the segment as a fraction of its length.
    pub(crate) fn param_of(&self, p: Vec2) -> f64 {
        let d = self.end - self.start;
        let n2 = d.norm_squared();
        if n2 == 0.0 {
            0.0
        } else {
            (p - self.start).dot(&d) / n2
        }
    }
}

/// A special location (endpoint or crossing) and the lines meeting there.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub id: PointId,
    pub pos: Vec2,
    pub lines: BTreeSet<LineId>,
}

impl Point {
    pub fn new(pos: Vec2, lines: impl IntoIterator<Item = LineId>) -> Self {
        Self {
            id: PointId::fresh(),
            pos,
            lines: lines.into_iter().collect(),
        }
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.pos.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.pos.y
    }

    #[inline]
    pub fn has_line(&self, id: LineId) -> bool {
        self.lines.contains(&id)
    }
}
