use super::*;
use crate::cfg::GeomCfg;
use crate::plane::{add_line, Line, PointRegistry};
use nalgebra::{vector, Vector2};

type Vec2 = Vector2<f64>;

fn arrange(segments: &[(Vec2, Vec2)]) -> (Vec<Line>, PointRegistry) {
    let mut lines = Vec::new();
    let mut points = PointRegistry::new();
    for &(a, b) in segments {
        let out = add_line(Line::new(a, b, None, None), &lines, &points, &GeomCfg::default());
        lines = out.lines;
        points = out.points;
    }
    (lines, points)
}

fn square() -> Vec<(Vec2, Vec2)> {
    vec![
        (vector![0.0, 0.0], vector![10.0, 0.0]),
        (vector![10.0, 0.0], vector![10.0, 10.0]),
        (vector![10.0, 10.0], vector![0.0, 10.0]),
        (vector![0.0, 10.0], vector![0.0, 0.0]),
    ]
}

fn has_vertex(shape: &Shape, p: Vec2) -> bool {
    shape.angles.iter().any(|a| a.position == p)
}

#[test]
fn triangle_forms_one_shape() {
    let (lines, points) = arrange(&[
        (vector![0.0, 0.0], vector![10.0, 0.0]),
        (vector![10.0, 0.0], vector![5.0, 10.0]),
        (vector![5.0, 10.0], vector![0.0, 0.0]),
    ]);
    assert_eq!(points.len(), 3);
    assert_eq!(lines.len(), 3);
    let shapes = find_shapes(&lines, &points);
    assert_eq!(shapes.len(), 1);
    let s = &shapes[0];
    assert_eq!(s.lines.len(), 3);
    assert_eq!(s.angles.len(), 3);
    for corner in [vector![0.0, 0.0], vector![10.0, 0.0], vector![5.0, 10.0]] {
        assert!(has_vertex(s, corner), "missing corner {corner:?}");
    }
    assert!(s.vertices_consistent());
    let sum: f64 = s.angles.iter().map(Angle::degrees).sum();
    assert!((sum - 180.0).abs() < 1e-9);
    assert!((s.signed_area().abs() - 50.0).abs() < 1e-9);
}

#[test]
fn square_forms_one_shape_from_any_start() {
    let (lines, points) = arrange(&square());
    let shapes = find_shapes(&lines, &points);
    assert_eq!(shapes.len(), 1);
    assert_eq!(shapes[0].lines.len(), 4);
    assert_eq!(shapes[0].angles.len(), 4);
    assert!((shapes[0].perimeter() - 40.0).abs() < 1e-12);
    for a in &shapes[0].angles {
        assert!((a.degrees() - 90.0).abs() < 1e-9);
    }

    // Same drawing, registry rotated so the search starts elsewhere.
    let mut rotated = PointRegistry::new();
    let all: Vec<_> = points.iter().cloned().collect();
    for p in all.iter().skip(2).chain(all.iter().take(2)) {
        rotated.add_or_merge(p.clone());
    }
    let again = find_shapes(&lines, &rotated);
    assert_eq!(again.len(), 1);
    assert_eq!(again[0].id, shapes[0].id);
}

#[test]
fn x_crossing_has_no_shape() {
    let (lines, points) = arrange(&[
        (vector![0.0, 0.0], vector![10.0, 10.0]),
        (vector![0.0, 10.0], vector![10.0, 0.0]),
    ]);
    assert_eq!(lines.len(), 4);
    assert!(find_shapes(&lines, &points).is_empty());
}

#[test]
fn square_with_diagonal_has_three_shapes() {
    let mut segs = square();
    segs.push((vector![0.0, 0.0], vector![10.0, 10.0]));
    let (lines, points) = arrange(&segs);
    let shapes = find_shapes(&lines, &points);
    assert_eq!(shapes.len(), 3);
    let mut sizes: Vec<usize> = shapes.iter().map(|s| s.lines.len()).collect();
    sizes.sort_unstable();
    assert_eq!(sizes, vec![3, 3, 4]);
    assert!(shapes.iter().all(Shape::vertices_consistent));
}

#[test]
fn square_with_both_diagonals() {
    let mut segs = square();
    segs.push((vector![0.0, 0.0], vector![10.0, 10.0]));
    segs.push((vector![10.0, 0.0], vector![0.0, 10.0]));
    let (lines, points) = arrange(&segs);
    assert_eq!(lines.len(), 8);
    assert_eq!(points.len(), 5);
    let shapes = find_shapes(&lines, &points);
    // Wheel graph (hub at the crossing, four rim corners): two spokes plus
    // either rim path for each of the 6 rim pairs, plus the rim itself.
    assert_eq!(shapes.len(), 13);
    let ids: std::collections::HashSet<_> = shapes.iter().map(|s| s.id.clone()).collect();
    assert_eq!(ids.len(), shapes.len());
    assert!(shapes.iter().any(|s| s.lines.len() == 3 && has_vertex(s, vector![5.0, 5.0])));
    assert!(shapes.iter().all(|s| s.lines.len() >= 3));
    assert!(shapes.iter().all(Shape::vertices_consistent));
}

#[test]
fn bowtie_yields_only_simple_cycles() {
    let (lines, points) = arrange(&[
        (vector![0.0, 0.0], vector![10.0, 10.0]),
        (vector![10.0, 10.0], vector![0.0, 20.0]),
        (vector![0.0, 20.0], vector![0.0, 0.0]),
        (vector![10.0, 10.0], vector![20.0, 0.0]),
        (vector![20.0, 0.0], vector![20.0, 20.0]),
        (vector![20.0, 20.0], vector![10.0, 10.0]),
    ]);
    let shapes = find_shapes(&lines, &points);
    assert_eq!(shapes.len(), 2);
    assert!(shapes.iter().all(|s| s.lines.len() == 3));
}

#[test]
fn duplicate_segment_forms_two_line_shape() {
    let (lines, points) = arrange(&[
        (vector![0.0, 0.0], vector![10.0, 0.0]),
        (vector![0.0, 0.0], vector![10.0, 0.0]),
    ]);
    let shapes = find_shapes(&lines, &points);
    assert_eq!(shapes.len(), 1);
    assert_eq!(shapes[0].lines.len(), 2);
}

#[test]
fn open_path_has_no_shape() {
    let (lines, points) = arrange(&[
        (vector![0.0, 0.0], vector![10.0, 0.0]),
        (vector![10.0, 0.0], vector![10.0, 10.0]),
        (vector![10.0, 10.0], vector![0.0, 10.0]),
    ]);
    assert!(find_shapes(&lines, &points).is_empty());
}

#[test]
fn single_line_cycle_is_rejected() {
    let l = Line::new(vector![0.0, 0.0], vector![1.0, 0.0], None, None);
    assert!(Shape::from_cycle(vec![l]).is_none());
    assert!(Shape::from_cycle(Vec::new()).is_none());
}

#[test]
fn canonical_id_ignores_order() {
    let (lines, _) = arrange(&square());
    let fwd = Shape::from_cycle(lines.clone()).unwrap();
    let mut rev = lines.clone();
    rev.reverse();
    let bwd = Shape::from_cycle(rev).unwrap();
    assert_eq!(fwd.id, bwd.id);
    assert_eq!(
        AngleId::of(lines[0].id, lines[1].id),
        AngleId::of(lines[1].id, lines[0].id)
    );
}

#[test]
fn angle_without_shared_vertex_falls_back_to_origin() {
    let a = Line::new(vector![0.0, 0.0], vector![1.0, 0.0], None, None);
    let b = Line::new(vector![5.0, 5.0], vector![6.0, 5.0], None, None);
    let angle = Angle::new(&a, &b);
    assert_eq!(angle.position, Vec2::zeros());
    assert!(shared_vertex(&a, &b).is_none());
    let shape = Shape::from_cycle(vec![a, b]).unwrap();
    assert!(!shape.vertices_consistent());
}

#[test]
fn hit_tests_use_strict_radius() {
    let (lines, points) = arrange(&square());
    let shape = find_shapes(&lines, &points).remove(0);
    let angle = shape.is_close_to_angle(vector![1.0, 1.0], 30.0).unwrap();
    assert_eq!(angle.position, vector![0.0, 0.0]);
    assert!(shape.is_close_to_angle(vector![0.0, 30.0], 30.0).map(|a| a.position) == Some(vector![0.0, 10.0]));
    assert!(shape.is_close_to_angle(vector![100.0, 100.0], 30.0).is_none());
    let line = shape.is_close_to_line(vector![5.0, -1.0], 3.0).unwrap();
    assert_eq!(line.center, vector![5.0, 0.0]);
    assert!(shape.is_close_to_line(vector![5.0, -3.0], 3.0).is_none());
}

#[test]
fn value_edits_are_copy_on_write() {
    let (lines, points) = arrange(&square());
    let shape = find_shapes(&lines, &points).remove(0);
    let angle_id = shape.angles[1].id.clone();
    let edited = shape.with_angle_value(&angle_id, 45.0).unwrap();
    assert_eq!(edited.angle(&angle_id).unwrap().value, Some(45.0));
    assert_eq!(shape.angle(&angle_id).unwrap().value, None);

    let line_id = shape.lines[2].id;
    let edited = edited.with_line_value(line_id, 7.5).unwrap();
    assert_eq!(edited.line(line_id).unwrap().value, Some(7.5));
    assert_eq!(shape.line(line_id).unwrap().value, None);
    assert_eq!(edited.id, shape.id);

    assert!(shape.with_angle_value(&AngleId("nope".into()), 1.0).is_none());
}

#[test]
fn carry_values_keeps_surviving_records() {
    let (lines, points) = arrange(&square());
    let before = find_shapes(&lines, &points);
    let edited = vec![before[0].with_line_value(before[0].lines[0].id, 3.0).unwrap()];
    let again = carry_values(&edited, find_shapes(&lines, &points));
    assert_eq!(again, edited);
}
