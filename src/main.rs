// src/main.rs
mod cli;
mod drivers;
mod engine;
mod gui;
mod render;
mod simulator;
mod types;
mod visualizer;
use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use drivers::{capture_channel, open_replay, open_serial, LineSource};
use render::{CaptureRenderer, ConsoleRenderer, JsonRenderer};
use simulator::SimulatedInstrument;
use std::time::Duration;
use types::ConnectionMode;

// 模拟仪器参数
const SIM_RECORD_LENGTH: usize = 1024;
const SIM_TIMEBASE_SECONDS: f64 = 0.000_5;
const SIM_PACE: Duration = Duration::from_secs(1);

fn open_source(mode: &ConnectionMode) -> Result<Box<dyn LineSource + Send>> {
    Ok(match mode {
        ConnectionMode::Simulation => Box::new(SimulatedInstrument::new(
            SIM_RECORD_LENGTH,
            SIM_TIMEBASE_SECONDS,
            SIM_PACE,
        )),
        ConnectionMode::Hardware { port, baud } => Box::new(open_serial(port, *baud)?),
        ConnectionMode::Replay(path) => Box::new(open_replay(path)?),
    })
}

// 入口函数
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    let mode = cli.connection_mode()?;
    let source = open_source(&mode).context("could not open input")?;
    log::info!("reading from {mode:?}");

    let (publisher, receiver) = capture_channel();
    let engine = engine::spawn_thread(source, publisher);

    if cli.headless {
        let mut renderer: Box<dyn CaptureRenderer> = if cli.json {
            Box::new(JsonRenderer::new(std::io::stdout()))
        } else {
            Box::new(ConsoleRenderer)
        };
        let rendered = render::run_headless(&receiver, renderer.as_mut(), engine)?;
        log::info!("rendered {rendered} captures");
        return Ok(());
    }
    gui::run(receiver, engine)
}
