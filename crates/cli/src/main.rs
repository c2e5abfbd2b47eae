use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use polymaker::check::validate;
use polymaker::engine::Engine;
use polymaker::scribble::{draw_lines, ReplayToken, ScribbleCfg};
use polymaker::GeomCfg;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;

mod provenance;
mod script;

use provenance::{write_sidecar, Payload};

#[derive(Parser)]
#[command(name = "polymaker")]
#[command(about = "Replay line drawings and inspect the shapes they close")]
struct Cmd {
    /// Log per-command debug summaries
    #[arg(long, global = true)]
    verbose: bool,

    /// Tap radius for angle/line selection
    #[arg(long, global = true)]
    select_radius: Option<f64>,

    /// Length below which drawn lines are reported as too short
    #[arg(long, global = true)]
    min_length: Option<f64>,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Run a JSON command script and write the final snapshot
    Replay {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
        /// Validate arrangement and shape invariants before writing
        #[arg(long)]
        check: bool,
    },
    /// Draw a random scribble and print line/point/shape counts
    Random {
        #[arg(long, default_value_t = 6)]
        lines: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Round coordinates to multiples of this step
        #[arg(long)]
        grid: Option<f64>,
        /// Also write the snapshot (with provenance sidecar)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print version and provenance JSON
    Report,
}

impl Cmd {
    fn geom(&self) -> GeomCfg {
        let mut cfg = GeomCfg::default();
        if let Some(r) = self.select_radius {
            cfg.select_radius = r;
        }
        if let Some(l) = self.min_length {
            cfg.min_line_length = l;
        }
        cfg
    }
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = if cmd.verbose { Level::DEBUG } else { Level::INFO };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .init();
    let cfg = cmd.geom();
    match cmd.action {
        Action::Replay { input, out, check } => replay(cfg, &input, &out, check),
        Action::Random {
            lines,
            seed,
            grid,
            out,
        } => random(cfg, lines, seed, grid, out.as_deref()),
        Action::Report => report(),
    }
}

fn replay(cfg: GeomCfg, input: &Path, out: &Path, check: bool) -> Result<()> {
    let text = fs::read_to_string(input)
        .with_context(|| format!("reading script {}", input.display()))?;
    let commands = script::parse(&text)
        .with_context(|| format!("parsing script {}", input.display()))?;
    let mut engine = Engine::new(cfg);
    let summary = script::run(&mut engine, &commands);
    tracing::info!(
        applied = summary.applied,
        skipped = summary.skipped,
        shapes = engine.shapes().len(),
        "replay"
    );
    let params = json!({
        "input": input.to_string_lossy(),
        "check": check,
        "cfg": cfg,
        "applied": summary.applied,
        "skipped": summary.skipped,
    });
    write_snapshot(&engine, out, check, Payload::new("replay", params))
}

fn random(cfg: GeomCfg, lines: usize, seed: u64, grid: Option<f64>, out: Option<&Path>) -> Result<()> {
    let scribble = ScribbleCfg {
        lines,
        grid,
        ..ScribbleCfg::default()
    };
    let mut engine = Engine::new(cfg);
    for (a, b) in draw_lines(&scribble, ReplayToken { seed, index: 0 }) {
        engine.add_line(a, b);
    }
    let summary = json!({
        "seed": seed,
        "drawn": lines,
        "lines": engine.lines().len(),
        "points": engine.points().len(),
        "shapes": engine.shapes().len(),
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    if let Some(out) = out {
        write_snapshot(&engine, out, true, Payload::new("random", summary))?;
    }
    Ok(())
}

fn write_snapshot(engine: &Engine, out: &Path, check: bool, payload: Payload) -> Result<()> {
    let snap = engine.snapshot();
    if check {
        if let Err(err) = validate(&snap) {
            bail!("snapshot failed validation: {err}");
        }
    }
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    fs::write(out, serde_json::to_vec_pretty(&snap)?)
        .with_context(|| format!("writing {}", out.display()))?;
    let sidecar = write_sidecar(out, payload)?;
    tracing::info!(out = %out.display(), provenance = %sidecar.display(), "snapshot written");
    Ok(())
}

fn report() -> Result<()> {
    let mut doc = provenance::header();
    doc["cfg"] = json!(GeomCfg::default());
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}
