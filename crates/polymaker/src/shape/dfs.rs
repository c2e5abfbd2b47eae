//! Exhaustive depth-first search for closed cycles in the point/line graph.
//!
//! Nodes are registry points; two points are adjacent through every line
//! both list. A walk never reuses a line and never revisits a point other
//! than its start, so each closure is a simple cycle. Cycles found from
//! different start points or in opposite directions collapse on `ShapeId`.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::plane::{Line, LineId, Point, PointRegistry};

use super::types::{Shape, ShapeId};

/// Enumerate every simple cycle of `lines` through `points`.
///
/// The result is recomputed from scratch; an empty list is a valid answer.
pub fn find_shapes(lines: &[Line], points: &PointRegistry) -> Vec<Shape> {
    let graph = ShapeGraph::new(lines, points.as_slice());
    let mut walk = Walk {
        path: Vec::new(),
        visited: vec![false; graph.points.len()],
        shapes: Vec::new(),
        seen: HashSet::new(),
    };
    for s in 0..graph.points.len() {
        walk.visited[s] = true;
        graph.recur(s, s, &mut walk);
        walk.visited[s] = false;
        debug_assert!(walk.path.is_empty());
    }
    debug!(
        points = graph.points.len(),
        lines = lines.len(),
        shapes = walk.shapes.len(),
        "shape search finished"
    );
    walk.shapes
}

/// Read-only adjacency shared by every branch of the search.
struct ShapeGraph<'a> {
    points: &'a [Point],
    lines: HashMap<LineId, &'a Line>,
    /// Point indices listing each line.
    by_line: HashMap<LineId, Vec<usize>>,
}

/// Mutable search state.
struct Walk {
    path: Vec<LineId>,
    visited: Vec<bool>,
    shapes: Vec<Shape>,
    seen: HashSet<ShapeId>,
}

impl<'a> ShapeGraph<'a> {
    fn new(lines: &'a [Line], points: &'a [Point]) -> Self {
        let mut by_line: HashMap<LineId, Vec<usize>> = HashMap::new();
        for (k, p) in points.iter().enumerate() {
            for &id in &p.lines {
                by_line.entry(id).or_default().push(k);
            }
        }
        Self {
            points,
            lines: lines.iter().map(|l| (l.id, l)).collect(),
            by_line,
        }
    }

    fn recur(&self, start: usize, cur: usize, walk: &mut Walk) {
        for &line_id in &self.points[cur].lines {
            if walk.path.contains(&line_id) || !self.lines.contains_key(&line_id) {
                continue;
            }
            let Some(targets) = self.by_line.get(&line_id) else {
                continue;
            };
            for &next in targets {
                if next == cur {
                    continue;
                }
                walk.path.push(line_id);
                if next == start {
                    self.close(walk);
                } else if !walk.visited[next] {
                    walk.visited[next] = true;
                    self.recur(start, next, walk);
                    walk.visited[next] = false;
                }
                walk.path.pop();
            }
        }
    }

    /// Record the current path as a shape unless it is too short or known.
    fn close(&self, walk: &mut Walk) {
        if walk.path.len() < 2 {
            return;
        }
        let id = ShapeId::of(walk.path.iter().copied());
        if walk.seen.contains(&id) {
            return;
        }
        let cycle: Vec<Line> = walk
            .path
            .iter()
            .map(|id| (*self.lines[id]).clone())
            .collect();
        if let Some(shape) = Shape::from_cycle(cycle) {
            walk.seen.insert(id);
            walk.shapes.push(shape);
        }
    }
}
