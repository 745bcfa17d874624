//! Analyze a frame model stored as JSON
//!
//! Usage: `frame-analyze <model.json> [--diagrams]`
//!
//! Results are written to stdout as JSON. Set `RUST_LOG=info` to log the
//! per-node results of every element.

use anyhow::{bail, Context};
use std::{env, fs};

use frame_solver::diagram::DEFAULT_SAMPLES;
use frame_solver::prelude::*;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut path = None;
    let mut with_diagrams = false;
    for arg in env::args().skip(1) {
        if arg == "--diagrams" {
            with_diagrams = true;
        } else if path.is_none() {
            path = Some(arg);
        } else {
            bail!("unexpected argument: {}", arg);
        }
    }
    let Some(path) = path else {
        bail!("usage: frame-analyze <model.json> [--diagrams]");
    };

    let text = fs::read_to_string(&path).with_context(|| format!("failed to read {}", path))?;
    let input = FrameInput::from_json(&text).with_context(|| format!("failed to parse {}", path))?;

    log::info!("Analyzing {} ({} elements)", path, input.elements.len());
    let system = input.analyze().context("analysis failed")?;

    let report = AnalysisReport::from_system(&system, with_diagrams.then_some(DEFAULT_SAMPLES))?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
