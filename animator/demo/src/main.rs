//! Animator Demo - a block-glyph character reacting to agent activity
//!
//! Loads a built-in character, starts its ticker and replays a scripted
//! stream of agent events ("thinking", "grep", "editing", ...) against it
//! while redrawing the current frame.
//!
//! # Usage
//!
//! ```bash
//! # Default character
//! animator-demo 2>demo.log
//!
//! # The micro character with per-state rates
//! animator-demo --micro --character mote --recommended-fps 2>demo.log
//!
//! # With config file, stop after ten seconds
//! animator-demo --config ./animator.toml --duration-secs 10 2>demo.log
//!
//! # Verbose logging
//! RUST_LOG=debug animator-demo 2>demo.log
//! ```
//!
//! Logs go to stderr; redirect them or they scribble over the frame.
//! Ctrl-C exits and restores the terminal.

mod characters;
mod render;
mod script;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::info;

use animator_core::{
    load_config, load_config_from_path, CharacterKind, ConfigOverrides, ExpressionCycler,
    StateController,
};

use characters::{builtin_registry, DEFAULT_CHARACTER};
use render::Screen;
use script::SCRIPT;

const RENDER_INTERVAL: Duration = Duration::from_millis(50);

/// Animator Demo - drive a terminal character from simulated agent events
#[derive(Parser, Debug)]
#[command(name = "animator-demo")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Character to animate
    #[arg(short = 'n', long, env = "ANIMATOR_CHARACTER", default_value = DEFAULT_CHARACTER)]
    character: String,

    /// Load the character from the micro registry (enables the noise overlay)
    #[arg(short = 'm', long)]
    micro: bool,

    /// Configuration file path
    #[arg(short = 'c', long, env = "ANIMATOR_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Default frame rate override
    #[arg(short = 'f', long, value_name = "FPS")]
    fps: Option<u32>,

    /// Install the recommended per-state rates
    #[arg(long)]
    recommended_fps: bool,

    /// Seconds between scripted agent events
    #[arg(short = 'e', long, default_value_t = 3)]
    event_secs: u64,

    /// Stop after this many seconds (0 runs until Ctrl-C)
    #[arg(short = 'd', long, default_value_t = 0)]
    duration_secs: u64,

    /// Draw frames without color escapes
    #[arg(long)]
    plain: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, env = "ANIMATOR_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

/// Initialize logging with the specified level
fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!("animator_demo={level},animator_core={level}"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    Ok(())
}

fn status_line(controller: &StateController, expressions: &mut ExpressionCycler) -> String {
    let state = controller.state();
    let mut status = format!(
        "{} | {state} @ {} fps | loop {}",
        controller.character_name(),
        controller.fps(),
        controller.loop_count()
    );
    if state == controller.idle_state() {
        status.push_str(" | ");
        status.push_str(expressions.current());
    }
    status
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging first
    init_logging(&args.log_level)?;

    info!("Animator Demo starting");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let mut config = match args.config {
        Some(ref path) => load_config_from_path(Some(path.clone()))
            .with_context(|| format!("Failed to load config file: {path:?}"))?,
        None => load_config().context("Failed to load configuration")?,
    };

    let mut overrides = ConfigOverrides::new();
    if let Some(fps) = args.fps {
        overrides = overrides.with_default_fps(fps);
    }
    if args.recommended_fps {
        overrides = overrides.with_recommended_fps(true);
    }
    overrides.apply(&mut config);
    config.validate().context("Invalid configuration")?;

    info!(
        source = ?config.source(),
        default_fps = config.default_fps,
        idle_state = %config.idle_state,
        "Configuration loaded"
    );

    let kind = if args.micro {
        CharacterKind::Micro
    } else {
        CharacterKind::Regular
    };
    let registry = builtin_registry().context("Built-in characters failed validation")?;
    let controller = StateController::with_config(&registry, &args.character, kind, &config)
        .with_context(|| format!("Failed to create controller for {:?}", args.character))?;

    controller.on_state_change(|from, to| info!(from, to, "State changed"));
    controller.start();

    let mut screen = Screen::enter().context("Failed to prepare terminal")?;
    let mut expressions = ExpressionCycler::new();
    let mut events = SCRIPT.iter().cycle();

    let mut render_tick = interval(RENDER_INTERVAL);
    render_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut event_tick = interval(Duration::from_secs(args.event_secs.max(1)));
    event_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let deadline = (args.duration_secs > 0)
        .then(|| Instant::now() + Duration::from_secs(args.duration_secs));

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            result = &mut ctrl_c => {
                result.context("Failed to listen for Ctrl-C")?;
                info!("Interrupted");
                break;
            }
            _ = event_tick.tick() => {
                if let Some(event) = events.next() {
                    script::apply(&controller, event);
                }
            }
            _ = render_tick.tick() => {
                if deadline.is_some_and(|d| Instant::now() >= d) {
                    info!("Duration reached");
                    break;
                }
                let lines = if args.plain {
                    controller.frame_raw()
                } else {
                    controller.frame()
                };
                let status = status_line(&controller, &mut expressions);
                screen.draw(&lines, &status).context("Failed to draw frame")?;
            }
        }
    }

    controller.stop();
    drop(screen);

    info!(loops = controller.loop_count(), "Animator Demo stopped");
    Ok(())
}
