//! Draw a small house (square body, triangular roof, one diagonal brace) and
//! print the shapes the engine finds, then undo the brace.
//!
//! Usage:
//!   cargo run -p polymaker --example house

use polymaker::prelude::*;

fn main() {
    let mut e = Engine::default();
    let corners = [
        Vec2::new(0.0, 0.0),
        Vec2::new(100.0, 0.0),
        Vec2::new(100.0, 100.0),
        Vec2::new(0.0, 100.0),
    ];
    for i in 0..4 {
        e.add_line(corners[i], corners[(i + 1) % 4]);
    }
    e.add_line(Vec2::new(0.0, 100.0), Vec2::new(50.0, 160.0));
    e.add_line(Vec2::new(50.0, 160.0), Vec2::new(100.0, 100.0));
    e.add_line(Vec2::new(0.0, 0.0), Vec2::new(100.0, 100.0));
    report("with brace", &e);

    e.undo();
    report("after undo", &e);
}

fn report(label: &str, e: &Engine) {
    println!(
        "{label}: lines={}, points={}, shapes={}",
        e.lines().len(),
        e.points().len(),
        e.shapes().len()
    );
    for s in e.shapes() {
        println!(
            "  {}: {} sides, area {:.1}",
            s.id,
            s.lines.len(),
            s.signed_area().abs()
        );
    }
}
