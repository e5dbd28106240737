//! Gesture pointer process: reads hand landmarks from the webcam and drives
//! the system pointer until SIGINT/SIGTERM or the debug window is closed.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use hand_pointer::camera::CameraProvider;
use hand_pointer::hand::LandmarkProvider;
use hand_pointer::pointer::{EnigoPointer, PointerSink, TracingPointer};
use hand_pointer::{Config, LoopController, StopSignal};

#[derive(Debug, Parser)]
#[command(name = "hand_pointer", version = env!("GIT_VERSION"), about = "Webcam hand gestures to pointer")]
struct Args {
    /// Configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Log pointer actions instead of moving the real pointer
    #[arg(long)]
    dry_run: bool,

    /// Debug-level logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    let config = Config::load_or_default(&args.config);
    info!("Hand Pointer ({})", env!("GIT_VERSION"));
    info!(
        "camera {} {}x{} mirror={} | margin={} smooth={} click<{} scroll deadzone={}",
        config.camera.index,
        config.camera.width,
        config.camera.height,
        config.camera.mirror,
        config.region.margin,
        config.smooth.divisor,
        config.click.threshold,
        config.scroll.deadzone,
    );

    // SIGINT / SIGTERM → cooperative stop, so a held button is released
    let stop = StopSignal::new();
    signal_hook::flag::register(signal_hook::consts::SIGINT, stop.flag())?;
    signal_hook::flag::register(signal_hook::consts::SIGTERM, stop.flag())?;

    let mut provider = CameraProvider::open(&config)?;

    if args.dry_run {
        let mut pointer = TracingPointer::new(1920, 1080);
        run(&config, &mut provider, &mut pointer, &stop)
    } else {
        let mut pointer = EnigoPointer::new()?;
        run(&config, &mut provider, &mut pointer, &stop)
    }
}

fn run<S: PointerSink>(config: &Config, provider: &mut CameraProvider, pointer: &mut S, stop: &StopSignal) -> Result<()> {
    let screen = pointer.primary_display_size()?;
    info!("display {}x{}", screen.0, screen.1);

    let mut controller = LoopController::new(config, provider.frame_size(), screen)?;
    let summary = controller.run(provider, pointer, stop)?;
    info!(
        "done: {} frames, {} clicks, {} scroll events",
        summary.frames, summary.clicks, summary.scroll_events
    );
    Ok(())
}
