//! JSON command scripts for `polymaker replay`.
//!
//! A script is a JSON array of objects tagged by `cmd`, e.g.
//! `[{"cmd": "add_line", "start": [0, 0], "end": [10, 0]}, {"cmd": "undo"}]`.
//! Commands that do not apply (nothing to undo, no selection) are skipped and
//! counted, never fatal.

use polymaker::engine::{Engine, Selected};
use polymaker::snap::{align_axis, snap_target};
use polymaker::Vec2;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum Command {
    AddLine {
        start: [f64; 2],
        end: [f64; 2],
        /// Snap both endpoints onto known geometry and straighten the stroke.
        #[serde(default)]
        snap: bool,
    },
    Undo,
    /// Select the shape at `index` in the current shape list.
    SelectShape { index: usize },
    SelectPoint { x: f64, y: f64 },
    SetAngleValue { value: f64 },
    SetLineValue { value: f64 },
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Summary {
    pub applied: usize,
    pub skipped: usize,
}

pub fn parse(text: &str) -> serde_json::Result<Vec<Command>> {
    serde_json::from_str(text)
}

/// Apply one command; false when it was a no-op.
pub fn apply(engine: &mut Engine, cmd: &Command) -> bool {
    match *cmd {
        Command::AddLine { start, end, snap } => {
            let (mut a, mut b) = (Vec2::from(start), Vec2::from(end));
            if snap {
                let cfg = *engine.cfg();
                a = snap_target(a, engine.lines(), engine.points(), &cfg);
                b = snap_target(b, engine.lines(), engine.points(), &cfg);
                b = align_axis(a, b, &cfg);
            }
            engine.add_line(a, b);
            true
        }
        Command::Undo => engine.undo(),
        Command::SelectShape { index } => match engine.shapes().get(index) {
            Some(shape) => {
                let id = shape.id.clone();
                engine.select_shape(&id)
            }
            None => false,
        },
        Command::SelectPoint { x, y } => engine.select_point(x, y) != Selected::Nothing,
        Command::SetAngleValue { value } => engine.set_selected_angle_value(value),
        Command::SetLineValue { value } => engine.set_selected_line_value(value),
    }
}

pub fn run(engine: &mut Engine, script: &[Command]) -> Summary {
    let mut summary = Summary::default();
    for (i, cmd) in script.iter().enumerate() {
        if apply(engine, cmd) {
            summary.applied += 1;
        } else {
            debug!(step = i, ?cmd, "skipped");
            summary.skipped += 1;
        }
    }
    summary
}
