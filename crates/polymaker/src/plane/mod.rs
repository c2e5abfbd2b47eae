//! Planar arrangement of user-drawn segments.
//!
//! Purpose
//! - Keep the set of active segments free of interior crossings by splitting
//!   at every intersection as lines are committed.
//! - Maintain the point registry (endpoints and crossings) together with the
//!   lines meeting at each point; this is the graph the shape search walks.
//!
//! Invariants (after every `add_line` / `remove_last_line`)
//! - Points have pairwise distinct coordinates.
//! - A point lists line L iff L is active and the point is one of L's endpoints.
//! - No active line is the split parent of another active line.
//!
//! Code cross-refs: `geometry::intersect`, `shape::find_shapes`, `engine::Engine`.

mod registry;
mod split;
mod types;

pub use registry::PointRegistry;
pub use split::{add_line, remove_last_line, Commit, SplitOutcome};
pub use types::{Line, LineId, Point, PointId};
