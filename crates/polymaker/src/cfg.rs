//! Tolerances and interaction radii.
//!
//! Policy
//! - Geometry decisions (coincidence, on-segment tests) read their epsilons
//!   from `GeomCfg` so callers can tighten or loosen them in one place.
//! - Interaction radii (selection, snapping) are in drawing-surface units.
//! - Constants below are internal defaults; `GeomCfg::default()` is the only
//!   place they are read from outside this module.

use serde::{Deserialize, Serialize};

/// Coordinates closer than this collapse onto one point.
pub(crate) const MERGE_EPS: f64 = 1e-9;
/// Relative slack for `d(p,a) + d(p,b) == |ab|`.
pub(crate) const ON_SEGMENT_EPS: f64 = 1e-9;
/// Segments shorter than this are accepted but logged as degenerate.
pub(crate) const MIN_LINE_LENGTH: f64 = 5.0;
/// Tap radius for angle and line selection.
pub(crate) const SELECT_RADIUS: f64 = 30.0;
/// Radius for snapping a drawn coordinate onto a known point.
pub(crate) const SNAP_DISTANCE: f64 = 20.0;
/// Band around an anchor's x/y inside which a drawn line becomes axis-aligned.
pub(crate) const PARALLEL_SAFE_ZONE: f64 = 10.0;
/// Number of equal parts used for in-line snap points.
pub(crate) const DIVISION_COUNT: usize = 2;

/// Engine configuration (tolerances and radii).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeomCfg {
    pub eps_merge: f64,
    pub eps_on_segment: f64,
    pub min_line_length: f64,
    pub select_radius: f64,
    pub snap_distance: f64,
    pub parallel_safe_zone: f64,
    pub divisions: usize,
}

impl Default for GeomCfg {
    fn default() -> Self {
        Self {
            eps_merge: MERGE_EPS,
            eps_on_segment: ON_SEGMENT_EPS,
            min_line_length: MIN_LINE_LENGTH,
            select_radius: SELECT_RADIUS,
            snap_distance: SNAP_DISTANCE,
            parallel_safe_zone: PARALLEL_SAFE_ZONE,
            divisions: DIVISION_COUNT,
        }
    }
}

impl GeomCfg {
    /// Exact arithmetic everywhere (no merge slack, exact on-segment test).
    pub fn exact() -> Self {
        Self {
            eps_merge: 0.0,
            eps_on_segment: 0.0,
            ..Self::default()
        }
    }
}
