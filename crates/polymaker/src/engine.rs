//! Single-owner engine: lines, points, shapes, undo history and selection.
//!
//! Every command runs one synchronous pass (split, prune, enumerate shapes,
//! derive angles) and replaces the shape list atomically. Callers read
//! borrowed views or take an owned `Snapshot`.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::cfg::GeomCfg;
use crate::plane::{self, Commit, Line, LineId, Point, PointRegistry};
use crate::shape::{carry_values, find_shapes, Angle, AngleId, Shape, ShapeId};

type Vec2 = Vector2<f64>;

/// Current selection: a copy of one shape plus at most one of its elements.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Selection {
    pub shape: Option<Shape>,
    pub angle: Option<AngleId>,
    pub line: Option<LineId>,
}

/// Outcome of a tap.
#[derive(Clone, Debug, PartialEq)]
pub enum Selected {
    Angle(AngleId),
    Line(LineId),
    /// A previously selected element was released.
    Cleared,
    Nothing,
}

/// Ids of the selected shape/element, as exported in snapshots.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionIds {
    pub shape: Option<ShapeId>,
    pub angle: Option<AngleId>,
    pub line: Option<LineId>,
}

/// Owned, serializable view of the engine state.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub lines: Vec<Line>,
    pub points: Vec<Point>,
    pub shapes: Vec<Shape>,
    pub selection: SelectionIds,
}

#[derive(Clone, Debug, Default)]
pub struct Engine {
    cfg: GeomCfg,
    lines: Vec<Line>,
    points: PointRegistry,
    shapes: Vec<Shape>,
    history: Vec<Commit>,
    selection: Selection,
}

impl Engine {
    pub fn new(cfg: GeomCfg) -> Self {
        Self {
            cfg,
            ..Self::default()
        }
    }

    pub fn cfg(&self) -> &GeomCfg {
        &self.cfg
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn points(&self) -> &PointRegistry {
        &self.points
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Number of commits `undo` can still reverse.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Commit a drawn segment. Endpoints within the merge epsilon of a known
    /// point are moved onto it. Returns the id of the drawn line (retired if
    /// the line was split on insertion).
    pub fn add_line(&mut self, start: Vec2, end: Vec2) -> LineId {
        let start = self.points.snap(start, self.cfg.eps_merge);
        let end = self.points.snap(end, self.cfg.eps_merge);
        let line = Line::new(start, end, None, None);
        let id = line.id;
        let out = plane::add_line(line, &self.lines, &self.points, &self.cfg);
        self.lines = out.lines;
        self.points = out.points;
        self.history.push(out.commit);
        self.refresh_shapes();
        id
    }

    /// Reverse the most recent `add_line`. No-op (returns false) when there is
    /// nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(commit) = self.history.pop() else {
            debug!("nothing to undo");
            return false;
        };
        let (lines, points) = plane::remove_last_line(&self.lines, &self.points, &commit);
        self.lines = lines;
        self.points = points;
        self.refresh_shapes();
        true
    }

    /// Select a shape by id; clears any element selection.
    pub fn select_shape(&mut self, id: &ShapeId) -> bool {
        let Some(shape) = self.shapes.iter().find(|s| &s.id == id) else {
            return false;
        };
        self.selection = Selection {
            shape: Some(shape.clone()),
            angle: None,
            line: None,
        };
        true
    }

    /// Tap at `(x, y)`. Releases a held angle/line selection; otherwise picks
    /// the selected shape's angle, then line, within the selection radius.
    pub fn select_point(&mut self, x: f64, y: f64) -> Selected {
        if self.selection.angle.is_some() || self.selection.line.is_some() {
            self.selection.angle = None;
            self.selection.line = None;
            return Selected::Cleared;
        }
        let Some(shape) = &self.selection.shape else {
            return Selected::Nothing;
        };
        let tap = Vec2::new(x, y);
        let radius = self.cfg.select_radius;
        if let Some(angle) = shape.is_close_to_angle(tap, radius) {
            let id = angle.id.clone();
            self.selection.angle = Some(id.clone());
            return Selected::Angle(id);
        }
        if let Some(line) = shape.is_close_to_line(tap, radius) {
            let id = line.id;
            self.selection.line = Some(id);
            return Selected::Line(id);
        }
        Selected::Nothing
    }

    pub fn clear_selection(&mut self) {
        self.selection = Selection::default();
    }

    pub fn selected_angle(&self) -> Option<&Angle> {
        let id = self.selection.angle.as_ref()?;
        self.selection.shape.as_ref()?.angle(id)
    }

    pub fn selected_line(&self) -> Option<&Line> {
        let id = self.selection.line?;
        self.selection.shape.as_ref()?.line(id)
    }

    /// Overwrite the selected angle's value. No-op without a selected angle.
    pub fn set_selected_angle_value(&mut self, value: f64) -> bool {
        let (Some(shape), Some(id)) = (&self.selection.shape, &self.selection.angle) else {
            return false;
        };
        let Some(next) = shape.with_angle_value(id, value) else {
            return false;
        };
        self.store_edit(next);
        true
    }

    /// Overwrite the selected line's value. No-op without a selected line.
    pub fn set_selected_line_value(&mut self, value: f64) -> bool {
        let (Some(shape), Some(id)) = (&self.selection.shape, self.selection.line) else {
            return false;
        };
        let Some(next) = shape.with_line_value(id, value) else {
            return false;
        };
        self.store_edit(next);
        true
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            lines: self.lines.clone(),
            points: self.points.as_slice().to_vec(),
            shapes: self.shapes.clone(),
            selection: SelectionIds {
                shape: self.selection.shape.as_ref().map(|s| s.id.clone()),
                angle: self.selection.angle.clone(),
                line: self.selection.line,
            },
        }
    }

    fn store_edit(&mut self, shape: Shape) {
        if let Some(slot) = self.shapes.iter_mut().find(|s| s.id == shape.id) {
            *slot = shape.clone();
        }
        self.selection.shape = Some(shape);
    }

    fn refresh_shapes(&mut self) {
        let fresh = find_shapes(&self.lines, &self.points);
        for s in fresh.iter().filter(|s| !s.vertices_consistent()) {
            warn!(shape = %s.id, "shape has adjacent lines without a shared vertex");
        }
        self.shapes = carry_values(&self.shapes, fresh);
        let kept = self
            .selection
            .shape
            .as_ref()
            .and_then(|sel| self.shapes.iter().find(|s| s.id == sel.id))
            .cloned();
        match kept {
            Some(shape) => self.selection.shape = Some(shape),
            None if self.selection.shape.is_some() => self.clear_selection(),
            None => {}
        }
        debug!(
            lines = self.lines.len(),
            points = self.points.len(),
            shapes = self.shapes.len(),
            "state refreshed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::validate;
    use nalgebra::vector;

    fn triangle() -> Engine {
        let mut e = Engine::default();
        e.add_line(vector![0.0, 0.0], vector![10.0, 0.0]);
        e.add_line(vector![10.0, 0.0], vector![5.0, 10.0]);
        e.add_line(vector![5.0, 10.0], vector![0.0, 0.0]);
        e
    }

    #[test]
    fn triangle_scenario() {
        let e = triangle();
        assert_eq!(e.points().len(), 3);
        assert_eq!(e.lines().len(), 3);
        assert_eq!(e.shapes().len(), 1);
        let s = &e.shapes()[0];
        assert_eq!(s.lines.len(), 3);
        let mut corners: Vec<(f64, f64)> = s.angles.iter().map(|a| (a.position.x, a.position.y)).collect();
        corners.sort_by(|a, b| a.0.total_cmp(&b.0));
        assert_eq!(corners, vec![(0.0, 0.0), (5.0, 10.0), (10.0, 0.0)]);
        validate(&e.snapshot()).unwrap();
    }

    #[test]
    fn x_crossing_scenario() {
        let mut e = Engine::default();
        e.add_line(vector![0.0, 0.0], vector![10.0, 10.0]);
        e.add_line(vector![0.0, 10.0], vector![10.0, 0.0]);
        let center = e.points().find_at(vector![5.0, 5.0]).unwrap();
        assert_eq!(center.lines.len(), 4);
        assert!(e.shapes().is_empty());
        validate(&e.snapshot()).unwrap();
    }

    #[test]
    fn degenerate_scenario() {
        let mut e = Engine::default();
        e.add_line(vector![0.0, 5.0], vector![10.0, 5.0]);
        e.add_line(vector![5.0, 5.0], vector![5.0, 5.0]);
        assert_eq!(e.lines().len(), 2);
        assert!(e.lines().iter().all(|l| l.parent.is_none()));
        assert!(e.shapes().is_empty());
    }

    #[test]
    fn undo_walks_back_each_commit() {
        let mut e = Engine::default();
        let mut states = vec![e.snapshot()];
        for (a, b) in [
            (vector![0.0, 0.0], vector![10.0, 10.0]),
            (vector![0.0, 10.0], vector![10.0, 0.0]),
            (vector![0.0, 5.0], vector![10.0, 5.0]),
            (vector![5.0, -5.0], vector![5.0, 15.0]),
        ] {
            e.add_line(a, b);
            validate(&e.snapshot()).unwrap();
            states.push(e.snapshot());
        }
        states.pop();
        while let Some(expected) = states.pop() {
            assert!(e.undo());
            assert_eq!(e.snapshot(), expected);
        }
        assert!(!e.undo());
        assert!(e.lines().is_empty() && e.points().is_empty());
    }

    #[test]
    fn endpoints_snap_onto_known_points() {
        let mut e = Engine::default();
        e.add_line(vector![0.0, 0.0], vector![10.0, 0.0]);
        e.add_line(vector![10.0 + 1e-12, 0.0], vector![5.0, 10.0]);
        assert_eq!(e.points().len(), 3);
    }

    #[test]
    fn select_and_edit_flow() {
        let mut e = triangle();
        assert_eq!(e.select_point(0.0, 0.0), Selected::Nothing);
        assert!(!e.set_selected_angle_value(60.0));

        let id = e.shapes()[0].id.clone();
        assert!(e.select_shape(&id));
        let Selected::Angle(angle_id) = e.select_point(1.0, 1.0) else {
            panic!("expected an angle near the origin");
        };
        assert!(e.set_selected_angle_value(60.0));
        assert_eq!(e.selected_angle().unwrap().value, Some(60.0));
        assert_eq!(e.shapes()[0].angle(&angle_id).unwrap().value, Some(60.0));
        assert!(!e.set_selected_line_value(1.0));

        // a second tap releases the element but keeps the shape
        assert_eq!(e.select_point(1.0, 1.0), Selected::Cleared);
        assert!(e.selection().shape.is_some());
        assert!(e.selected_angle().is_none());
    }

    #[test]
    fn line_selection_uses_centers() {
        let mut e = Engine::new(GeomCfg {
            select_radius: 3.0,
            ..GeomCfg::default()
        });
        e.add_line(vector![0.0, 0.0], vector![100.0, 0.0]);
        e.add_line(vector![100.0, 0.0], vector![50.0, 100.0]);
        e.add_line(vector![50.0, 100.0], vector![0.0, 0.0]);
        let id = e.shapes()[0].id.clone();
        e.select_shape(&id);
        let Selected::Line(line_id) = e.select_point(50.0, 1.0) else {
            panic!("expected the base line");
        };
        assert!(e.set_selected_line_value(100.0));
        assert_eq!(e.selected_line().unwrap().id, line_id);
        assert_eq!(e.selected_line().unwrap().value, Some(100.0));
        // active lines are not edited in place
        assert!(e.lines().iter().all(|l| l.value.is_none()));
        assert_eq!(e.snapshot().selection.line, Some(line_id));
    }

    #[test]
    fn edits_survive_unrelated_lines_and_selection_follows_shape() {
        let mut e = triangle();
        let id = e.shapes()[0].id.clone();
        e.select_shape(&id);
        e.select_point(1.0, 1.0);
        e.set_selected_angle_value(45.0);

        e.add_line(vector![50.0, 50.0], vector![60.0, 60.0]);
        assert_eq!(e.shapes().len(), 1);
        assert_eq!(e.selection().shape.as_ref().unwrap().id, id);
        assert_eq!(e.selected_angle().unwrap().value, Some(45.0));

        // splitting a side retires the shape and drops the selection
        e.add_line(vector![5.0, -5.0], vector![5.0, 5.0]);
        assert!(e.selection().shape.is_none());
        assert_eq!(e.shapes().len(), 1);
        assert_ne!(e.shapes()[0].id, id);
    }

    #[test]
    fn snapshot_round_trips_through_json() {
        let e = triangle();
        let snap = e.snapshot();
        let text = serde_json::to_string(&snap).unwrap();
        let back: Snapshot = serde_json::from_str(&text).unwrap();
        assert_eq!(back, snap);
    }
}
