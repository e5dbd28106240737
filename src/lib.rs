#[cfg(feature = "desktop")]
pub mod camera;
pub mod config;
pub mod controller;
pub mod gesture;
pub mod hand;
pub mod lifecycle;
pub mod pointer;
#[cfg(feature = "desktop")]
pub mod render;

pub use config::Config;
pub use controller::{FrameReport, LoopController, LoopError, RunSummary};
pub use lifecycle::{LoopState, StopSignal, VisionToggle};
