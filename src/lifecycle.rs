use anyhow::{anyhow, Context, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread::{self, JoinHandle};
use tracing::{info, warn};

use crate::config::Config;
use crate::controller::{LoopController, LoopError, RunSummary};
use crate::hand::LandmarkProvider;
use crate::pointer::PointerSink;

/// Cooperative cancellation token, checked once per frame.
///
/// Backed by an `Arc<AtomicBool>` so it can be handed to
/// `signal_hook::flag::register` directly.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Stopped,
    Running,
}

struct RunningLoop {
    stop: StopSignal,
    handle: JoinHandle<Result<RunSummary, LoopError>>,
}

/// Runs the gesture loop on a dedicated thread; at most one at a time.
///
/// All pointer calls happen on that thread. The host only toggles.
#[derive(Default)]
pub struct VisionToggle {
    running: Option<RunningLoop>,
}

impl VisionToggle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> LoopState {
        match &self.running {
            Some(run) if !run.handle.is_finished() => LoopState::Running,
            _ => LoopState::Stopped,
        }
    }

    /// Start the loop, or stop it if it is already running.
    ///
    /// `open` runs on the loop thread and builds the provider and pointer.
    /// If it (or the display query) fails, the error is returned here and
    /// nothing keeps running.
    pub fn toggle<P, S, F>(&mut self, config: &Config, open: F) -> Result<LoopState, LoopError>
    where
        P: LandmarkProvider + 'static,
        S: PointerSink + 'static,
        F: FnOnce() -> Result<(P, S)> + Send + 'static,
    {
        if self.state() == LoopState::Running {
            self.stop()?;
            return Ok(LoopState::Stopped);
        }
        // reap a loop that ended on its own
        match self.stop() {
            Ok(Some(summary)) => info!(frames = summary.frames, "previous gesture loop had already stopped"),
            Ok(None) => {}
            Err(e) => warn!("previous gesture loop ended with error: {e}"),
        }

        let stop = StopSignal::new();
        let (ready_tx, ready_rx) = mpsc::sync_channel::<Result<()>>(1);
        let config = config.clone();
        let loop_stop = stop.clone();

        let handle = thread::Builder::new()
            .name("gesture-loop".to_string())
            .spawn(move || {
                let opened = open().and_then(|(provider, pointer)| {
                    let screen = pointer.primary_display_size()?;
                    let controller = LoopController::new(&config, provider.frame_size(), screen)?;
                    info!(screen = ?screen, "pointer display");
                    Ok((provider, pointer, controller))
                });
                let (mut provider, mut pointer, mut controller) = match opened {
                    Ok(parts) => {
                        let _ = ready_tx.send(Ok(()));
                        parts
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return Ok(RunSummary::default());
                    }
                };
                controller.run(&mut provider, &mut pointer, &loop_stop)
            })
            .context("failed to spawn gesture loop thread")
            .map_err(LoopError::Startup)?;

        let ready = ready_rx
            .recv()
            .unwrap_or_else(|_| Err(anyhow!("gesture loop thread exited during startup")));
        if let Err(e) = ready {
            let _ = handle.join();
            return Err(LoopError::Startup(e));
        }

        self.running = Some(RunningLoop { stop, handle });
        Ok(LoopState::Running)
    }

    /// Stop the loop and wait for its cleanup. `Ok(None)` if nothing ran.
    pub fn stop(&mut self) -> Result<Option<RunSummary>, LoopError> {
        let Some(run) = self.running.take() else {
            return Ok(None);
        };
        run.stop.raise();
        match run.handle.join() {
            Ok(result) => result.map(Some),
            Err(_) => {
                warn!("gesture loop thread panicked");
                Ok(None)
            }
        }
    }
}

impl Drop for VisionToggle {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            warn!("gesture loop ended with error: {e}");
        }
    }
}
