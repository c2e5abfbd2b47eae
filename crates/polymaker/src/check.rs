//! Structural invariants of an engine snapshot.
//!
//! `validate` is cheap enough for tests and for the CLI's `--check` flag; the
//! engine itself never calls it on the hot path.

use std::collections::HashSet;
use std::fmt;

use crate::engine::Snapshot;
use crate::plane::{LineId, PointId};
use crate::shape::ShapeId;

/// First violated invariant found by `validate`.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsistencyError {
    NonFinite { line: LineId },
    CoincidentPoints { a: PointId, b: PointId },
    EmptyPoint { point: PointId },
    DanglingAssociation { point: PointId, line: LineId },
    NotAnEndpoint { point: PointId, line: LineId },
    UnregisteredEndpoint { line: LineId },
    StaleParent { parent: LineId },
    ShortShape { shape: ShapeId },
    ShapeIdMismatch { shape: ShapeId },
    MissingVertex { shape: ShapeId },
}

impl fmt::Display for ConsistencyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFinite { line } => write!(f, "line {line} has non-finite coordinates"),
            Self::CoincidentPoints { a, b } => write!(f, "points {a} and {b} coincide"),
            Self::EmptyPoint { point } => write!(f, "point {point} has no associated line"),
            Self::DanglingAssociation { point, line } => {
                write!(f, "point {point} lists inactive line {line}")
            }
            Self::NotAnEndpoint { point, line } => {
                write!(f, "point {point} is not an endpoint of line {line}")
            }
            Self::UnregisteredEndpoint { line } => {
                write!(f, "an endpoint of line {line} is not registered")
            }
            Self::StaleParent { parent } => {
                write!(f, "split parent {parent} is still active")
            }
            Self::ShortShape { shape } => write!(f, "shape {shape} has fewer than 2 lines"),
            Self::ShapeIdMismatch { shape } => {
                write!(f, "shape id {shape} does not match its lines")
            }
            Self::MissingVertex { shape } => {
                write!(f, "shape {shape} has adjacent lines without a shared vertex")
            }
        }
    }
}

impl std::error::Error for ConsistencyError {}

/// Check the arrangement and shape invariants of `snap`.
pub fn validate(snap: &Snapshot) -> Result<(), ConsistencyError> {
    for l in &snap.lines {
        let finite = [l.start.x, l.start.y, l.end.x, l.end.y]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(ConsistencyError::NonFinite { line: l.id });
        }
    }

    for (i, p) in snap.points.iter().enumerate() {
        if let Some(q) = snap.points[i + 1..].iter().find(|q| q.pos == p.pos) {
            return Err(ConsistencyError::CoincidentPoints { a: p.id, b: q.id });
        }
        if p.lines.is_empty() {
            return Err(ConsistencyError::EmptyPoint { point: p.id });
        }
        for &id in &p.lines {
            let Some(line) = snap.lines.iter().find(|l| l.id == id) else {
                return Err(ConsistencyError::DanglingAssociation { point: p.id, line: id });
            };
            if !line.touches(p.pos) {
                return Err(ConsistencyError::NotAnEndpoint { point: p.id, line: id });
            }
        }
    }

    let active: HashSet<LineId> = snap.lines.iter().map(|l| l.id).collect();
    for l in &snap.lines {
        let registered = [l.start, l.end].iter().all(|&end| {
            snap.points
                .iter()
                .any(|p| p.pos == end && p.lines.contains(&l.id))
        });
        if !registered {
            return Err(ConsistencyError::UnregisteredEndpoint { line: l.id });
        }
        if let Some(parent) = l.parent.filter(|p| active.contains(p)) {
            return Err(ConsistencyError::StaleParent { parent });
        }
    }

    for s in &snap.shapes {
        if s.lines.len() < 2 {
            return Err(ConsistencyError::ShortShape { shape: s.id.clone() });
        }
        if s.id != ShapeId::of(s.lines.iter().map(|l| l.id)) {
            return Err(ConsistencyError::ShapeIdMismatch { shape: s.id.clone() });
        }
        if !s.vertices_consistent() {
            return Err(ConsistencyError::MissingVertex { shape: s.id.clone() });
        }
    }
    Ok(())
}
