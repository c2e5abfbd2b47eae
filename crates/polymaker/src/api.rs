//! Curated API for callers (UNSTABLE).
//!
//! Prefer these re-exports over deep module paths; the module layout is free
//! to change between versions.

// segment geometry
pub use crate::geometry::{
    cross, distance, intersect, is_point_on_segment, same_point, subdivision_points,
};
// arrangement
pub use crate::plane::{
    add_line, remove_last_line, Commit, Line, LineId, Point, PointId, PointRegistry, SplitOutcome,
};
// shapes
pub use crate::shape::{carry_values, find_shapes, shared_vertex, Angle, AngleId, Shape, ShapeId};
// session
pub use crate::cfg::GeomCfg;
pub use crate::check::{validate, ConsistencyError};
pub use crate::engine::{Engine, Selected, Selection, SelectionIds, Snapshot};
pub use crate::snap::{align_axis, snap_points, snap_target};
pub use crate::scribble::{draw_lines, ReplayToken, ScribbleCfg};
