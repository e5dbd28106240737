//! Interactive host for the gesture loop: toggles it on a dedicated thread.

use anyhow::Result;
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use hand_pointer::camera::CameraProvider;
use hand_pointer::pointer::EnigoPointer;
use hand_pointer::{Config, LoopState, VisionToggle};

#[derive(Debug, Parser)]
#[command(name = "vision_console", version = env!("GIT_VERSION"))]
struct Args {
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::load_or_default(&args.config);

    println!("=== Hand Pointer - Vision Console ===");
    println!();
    println!("Commands:");
    println!("  v             - start/stop gesture control");
    println!("  s             - show state");
    println!("  q             - quit");
    println!();

    let mut vision = VisionToggle::new();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let command = input.trim();

        match command {
            "" => continue,
            "v" => {
                let loop_config = config.clone();
                let result = vision.toggle(&config, move || {
                    let provider = CameraProvider::open(&loop_config)?;
                    let pointer = EnigoPointer::new()?;
                    Ok((provider, pointer))
                });
                match result {
                    Ok(LoopState::Running) => println!("Vision engaged. Hand tracking active."),
                    Ok(LoopState::Stopped) => println!("Vision offline."),
                    Err(e) => println!("Vision error: {:#}", anyhow::Error::from(e)),
                }
            }
            "s" => {
                println!("state: {:?}", vision.state());
            }
            "q" => {
                println!("exiting");
                break;
            }
            other => {
                println!("unknown command: {}", other);
            }
        }
    }

    if let Some(summary) = vision.stop()? {
        println!("frames: {}, clicks: {}", summary.frames, summary.clicks);
    }
    Ok(())
}
