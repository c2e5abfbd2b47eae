//! Planar primitives on `Vec2`: segment intersection, distances, on-segment
//! predicate and in-line subdivision points.

use nalgebra::Vector2;

use crate::plane::{Line, Point};

type Vec2 = Vector2<f64>;

/// Intersection of segments `a0a1` and `b0b1` (Bourke's parametric form).
///
/// Pre: none; zero-length segments are accepted.
/// Post: `Some(p)` iff both parameters lie in `[0, 1]`; `p` is evaluated on
/// the first segment. Zero-length or parallel (including collinear) input
/// yields `None`.
pub fn intersect(a0: Vec2, a1: Vec2, b0: Vec2, b1: Vec2) -> Option<Vec2> {
    if a0 == a1 || b0 == b1 {
        return None;
    }
    let da = a1 - a0;
    let db = b1 - b0;
    let denom = db.y * da.x - db.x * da.y;
    if denom == 0.0 {
        return None;
    }
    let ua = (db.x * (a0.y - b0.y) - db.y * (a0.x - b0.x)) / denom;
    let ub = (da.x * (a0.y - b0.y) - da.y * (a0.x - b0.x)) / denom;
    if !(0.0..=1.0).contains(&ua) || !(0.0..=1.0).contains(&ub) {
        return None;
    }
    // Endpoint hits return the stored coordinates bit-for-bit.
    let p = match (ua, ub) {
        (u, _) if u == 0.0 => a0,
        (u, _) if u == 1.0 => a1,
        (_, u) if u == 0.0 => b0,
        (_, u) if u == 1.0 => b1,
        _ => a0 + da * ua,
    };
    Some(p)
}

/// Euclidean distance.
#[inline]
pub fn distance(p: Vec2, q: Vec2) -> f64 {
    (q - p).norm()
}

/// Coincidence under an absolute slack (`eps = 0` is exact equality).
#[inline]
pub fn same_point(p: Vec2, q: Vec2, eps: f64) -> bool {
    if eps == 0.0 {
        p == q
    } else {
        distance(p, q) <= eps
    }
}

/// Signed area of the parallelogram spanned by `b - a` and `c - a`.
#[inline]
pub fn cross(a: Vec2, b: Vec2, c: Vec2) -> f64 {
    let ab = b - a;
    let ac = c - a;
    ab.x * ac.y - ab.y * ac.x
}

/// True iff `p` lies strictly between `start` and `end` on the segment.
///
/// The test is `d(p,start) + d(p,end) == |start end|` with slack
/// `eps * max(1, length)`; endpoints are never "on" the open segment.
pub fn is_point_on_segment(p: Vec2, start: Vec2, end: Vec2, eps: f64) -> bool {
    if p == start || p == end {
        return false;
    }
    let length = distance(start, end);
    let sum = distance(p, start) + distance(p, end);
    (sum - length).abs() <= eps * length.max(1.0)
}

/// `divisions - 1` evenly spaced interior points of `line`, each associated
/// with that line only. Fewer than two divisions yield no points.
pub fn subdivision_points(line: &Line, divisions: usize) -> Vec<Point> {
    if divisions < 2 {
        return Vec::new();
    }
    let diff = line.end - line.start;
    (1..divisions)
        .map(|k| {
            let t = k as f64 / divisions as f64;
            Point::new(line.start + diff * t, [line.id])
        })
        .collect()
}
