//! Headless bubble simulator: drives one bubble through a scripted mode
//! sequence at a fixed frame rate and prints every frame as a JSON line.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use thought_bubble::bubble::{BubbleMode, FrameInputs, MessageType, ThoughtBubble};
use thought_bubble::options::BubbleOptions;
use web_time::{Duration, Instant};

/// One scripted mode change, written `mode@seconds`.
#[derive(Debug, Clone, Copy)]
struct ScriptStep {
    at: f32,
    mode: BubbleMode,
}

fn parse_step(raw: &str) -> Result<ScriptStep, String> {
    let (mode, at) = raw
        .split_once('@')
        .ok_or_else(|| format!("expected mode@seconds, got {raw}"))?;
    let at: f32 = at
        .trim()
        .parse()
        .map_err(|e| format!("bad time in {raw}: {e}"))?;
    if !at.is_finite() || at < 0.0 {
        return Err(format!("time must be non-negative in {raw}"));
    }
    Ok(ScriptStep {
        at,
        mode: mode.trim().parse()?,
    })
}

#[derive(Parser)]
#[command(name = "thought-bubble")]
#[command(about = "Simulate a thought bubble and print its frames as JSON lines", long_about = None)]
struct Cli {
    /// TOML options preset (defaults when omitted)
    #[arg(short, long)]
    options: Option<PathBuf>,

    /// Seed for the bubble's packing choices
    #[arg(short, long, default_value_t = 0x5EED)]
    seed: u64,

    /// Frames per simulated second
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Simulated seconds
    #[arg(short, long, default_value_t = 8.0)]
    duration: f32,

    /// Target bubble width
    #[arg(long, default_value_t = 180.0)]
    width: f32,

    /// Target bubble height
    #[arg(long, default_value_t = 64.0)]
    height: f32,

    /// Place the tail on the right (outgoing message)
    #[arg(long)]
    outgoing: bool,

    /// Mode changes, e.g. talking@1.5,read@4,thinking@6
    #[arg(long, value_delimiter = ',', value_parser = parse_step)]
    script: Vec<ScriptStep>,

    /// Print the options JSON schema and exit
    #[arg(long)]
    schema: bool,
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut out = io::stdout().lock();

    if cli.schema {
        let schema = BubbleOptions::json_schema();
        writeln!(out, "{}", serde_json::to_string_pretty(&schema)?)?;
        return Ok(());
    }

    let options = match &cli.options {
        Some(path) => BubbleOptions::load(path)?,
        None => BubbleOptions::default(),
    };
    options.validate()?;

    let epoch = Instant::now();
    let mut bubble = ThoughtBubble::with_epoch(options, cli.seed, epoch);
    let mut inputs = FrameInputs::new(cli.width, cli.height);
    if cli.outgoing {
        inputs.message_type = MessageType::Outgoing;
    }

    let mut script = cli.script.clone();
    script.sort_by(|a, b| a.at.total_cmp(&b.at));
    let mut next_step = 0;

    let fps = cli.fps.max(1);
    let frames = (cli.duration.max(0.0) * fps as f32).ceil() as u64;
    log::info!(
        "simulating {frames} frames at {fps} fps (seed {:#x})",
        cli.seed
    );

    for index in 0..=frames {
        let t = index as f32 / fps as f32;
        while let Some(step) = script.get(next_step).filter(|s| s.at <= t) {
            log::debug!("script: {} at {:.3}s", step.mode, step.at);
            inputs.mode = step.mode;
            next_step += 1;
        }
        let now = epoch + Duration::from_secs_f32(t);
        let frame = bubble.tick(now, &inputs);
        serde_json::to_writer(&mut out, &frame)?;
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
