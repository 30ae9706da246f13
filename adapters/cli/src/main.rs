#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Edge Runner experience.

mod levels;
mod session;

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use edge_runner_core::AgentRole;
use edge_runner_rendering::{Color, FrameInput, Presentation, RenderingBackend};
use edge_runner_rendering_macroquad::MacroquadBackend;
use edge_runner_system_campaign::{builtin_levels, Campaign};
use edge_runner_world::query;

use crate::session::Session;

/// Steer a runner along the edges of a graph, painting every edge before the
/// chaser catches you.
#[derive(Debug, Parser)]
#[command(name = "edge-runner", version)]
struct Args {
    /// TOML file with `[[levels]]` tables replacing the built-in campaign.
    #[arg(long)]
    levels: Option<PathBuf>,
    /// Zero-based index of the level to start on.
    #[arg(long, default_value_t = 0)]
    start_level: usize,
    /// Synchronise presentation with the display refresh rate.
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    vsync: bool,
    /// Log the frame rate once per second.
    #[arg(long)]
    show_fps: bool,
    /// Run this many frames without opening a window, then print a summary.
    #[arg(long)]
    headless_frames: Option<u32>,
    /// Simulated frame length in headless mode, in milliseconds.
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,
    /// Keys held for the whole headless run.
    #[arg(long, value_enum, default_value_t = Heading::None)]
    direction: Heading,
}

/// Fixed steering used by headless runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Heading {
    None,
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl Heading {
    fn frame_input(self) -> FrameInput {
        let (up, down, left, right) = match self {
            Heading::None => (false, false, false, false),
            Heading::Up => (true, false, false, false),
            Heading::Down => (false, true, false, false),
            Heading::Left => (false, false, true, false),
            Heading::Right => (false, false, false, true),
            Heading::UpLeft => (true, false, true, false),
            Heading::UpRight => (true, false, false, true),
            Heading::DownLeft => (false, true, true, false),
            Heading::DownRight => (false, true, false, true),
        };
        FrameInput {
            up,
            down,
            left,
            right,
        }
    }
}

/// Entry point for the Edge Runner command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let levels = match &args.levels {
        Some(path) => levels::load_level_file(path)
            .with_context(|| format!("failed to load levels from {}", path.display()))?,
        None => builtin_levels(),
    };
    let campaign =
        Campaign::starting_at(levels, args.start_level).context("failed to set up the campaign")?;
    let session = Session::new(campaign).context("failed to start the first level")?;

    match args.headless_frames {
        Some(frames) => run_headless(
            session,
            frames,
            Duration::from_millis(args.frame_ms),
            args.direction.frame_input(),
        ),
        None => run_windowed(session, &args),
    }
}

fn run_headless(
    mut session: Session,
    frames: u32,
    frame: Duration,
    input: FrameInput,
) -> Result<()> {
    for index in 0..frames {
        if let Some(verdict) = session.step(frame, input) {
            log::info!("frame {index}: {verdict:?}");
        }
        if session.is_finished() {
            break;
        }
    }

    let world = session.world();
    let runner = query::agent(world, AgentRole::Runner);
    let chaser = query::agent(world, AgentRole::Chaser);
    let coverage = query::coverage_summary(world);
    println!("{}", query::welcome_banner(world));
    println!(
        "level {} | covered {:.1}% ({:.3} of {:.3}) | runner {:?} | chaser {:?}",
        query::level_name(world),
        coverage.fraction() * 100.0,
        coverage.covered_length,
        coverage.total_length,
        runner.position,
        chaser.position,
    );
    if session.is_finished() {
        println!("campaign complete");
    }
    Ok(())
}

fn run_windowed(mut session: Session, args: &Args) -> Result<()> {
    let scene = session.scene().context("failed to describe the first level")?;
    let presentation = Presentation::new(
        "Edge Runner",
        Color::from_rgb_u8(0x12, 0x14, 0x1a),
        scene,
    );
    let backend = MacroquadBackend::new()
        .with_vsync(args.vsync)
        .with_show_fps(args.show_fps);

    backend.run(presentation, move |dt, input, scene| {
        let _ = session.step(dt, input);
        match session.scene() {
            Ok(next) => *scene = next,
            Err(error) => log::error!("failed to describe the scene: {error}"),
        }
    })
}
