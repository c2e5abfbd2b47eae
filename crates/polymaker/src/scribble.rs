//! Reproducible random line drawings.
//!
//! Model
//! - `lines` segments with endpoints uniform in `[0, canvas]²`.
//! - With `grid = Some(g)` every coordinate is rounded to a multiple of `g`,
//!   which produces shared endpoints, T-junctions, concurrent crossings and
//!   collinear overlaps, the cases hand-drawn input actually hits.
//! - A replay token `(seed, index)` selects one drawing deterministically.

use nalgebra::Vector2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

type Vec2 = Vector2<f64>;

/// Random drawing configuration.
#[derive(Clone, Copy, Debug)]
pub struct ScribbleCfg {
    pub lines: usize,
    pub canvas: f64,
    pub grid: Option<f64>,
}

impl Default for ScribbleCfg {
    fn default() -> Self {
        Self {
            lines: 6,
            canvas: 100.0,
            grid: Some(20.0),
        }
    }
}

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    #[inline]
    fn rng(&self) -> StdRng {
        let mix = self
            .seed
            .wrapping_mul(0x9E37_79B9_7F4A_7C15)
            .wrapping_add(self.index);
        StdRng::seed_from_u64(mix)
    }
}

/// Draw `cfg.lines` segments for `token`.
pub fn draw_lines(cfg: &ScribbleCfg, token: ReplayToken) -> Vec<(Vec2, Vec2)> {
    let mut rng = token.rng();
    let canvas = cfg.canvas.max(1.0);
    let coord = |rng: &mut StdRng| {
        let v = rng.gen_range(0.0..=canvas);
        match cfg.grid {
            Some(g) if g > 0.0 => (v / g).round() * g,
            _ => v,
        }
    };
    (0..cfg.lines)
        .map(|_| {
            let a = Vec2::new(coord(&mut rng), coord(&mut rng));
            let b = Vec2::new(coord(&mut rng), coord(&mut rng));
            (a, b)
        })
        .collect()
}
