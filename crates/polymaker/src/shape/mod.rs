//! Closed shapes formed by the line arrangement.
//!
//! - `dfs`: cycle enumeration over the point registry (`find_shapes`).
//! - `types`: `Shape`/`Angle` records, canonical ids, copy-on-write edits.
//!
//! Code cross-refs: `plane::{PointRegistry, Line}`, `engine::Engine`.

mod dfs;
mod types;

pub use dfs::find_shapes;
pub use types::{shared_vertex, Angle, AngleId, Shape, ShapeId};

/// Keep earlier records (and their edited values) for shapes that survive a
/// recomputation unchanged.
pub fn carry_values(previous: &[Shape], fresh: Vec<Shape>) -> Vec<Shape> {
    fresh
        .into_iter()
        .map(|s| {
            previous
                .iter()
                .find(|p| p.id == s.id)
                .cloned()
                .unwrap_or(s)
        })
        .collect()
}

#[cfg(test)]
mod tests;
