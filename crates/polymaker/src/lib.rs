//! Planar line-drawing geometry: split, undo, and closed-shape discovery.
//!
//! Layout
//! - `geometry`: segment intersection and point predicates (pure functions).
//! - `plane`: active segments plus the point registry, split on every commit.
//! - `shape`: cycle search over the registry, angle/line records per shape.
//! - `engine`: editing session (history, selection, value edits, snapshots).
//! - `snap`, `scribble`, `check`: input snapping, random drawings, invariant checks.
//!
//! API Policy
//! - `api` and `prelude` are the curated import surfaces; module paths may move.

pub mod api;
pub mod cfg;
pub mod check;
pub mod engine;
pub mod geometry;
pub mod plane;
pub mod scribble;
pub mod shape;
pub mod snap;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use cfg::GeomCfg;
pub use nalgebra::Vector2 as Vec2;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::cfg::GeomCfg;
    pub use crate::engine::{Engine, Selected, Snapshot};
    pub use crate::plane::{Line, LineId, Point, PointId, PointRegistry};
    pub use crate::scribble::{draw_lines, ReplayToken, ScribbleCfg};
    pub use crate::shape::{Angle, AngleId, Shape, ShapeId};
    pub use nalgebra::Vector2 as Vec2;
}
