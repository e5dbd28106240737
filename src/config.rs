use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub region: RegionConfig,
    #[serde(default)]
    pub smooth: SmoothConfig,
    #[serde(default)]
    pub click: ClickConfig,
    #[serde(default)]
    pub scroll: ScrollConfig,
    #[serde(default)]
    pub app: AppConfig,
    #[serde(default)]
    pub debug: DebugConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CameraConfig {
    #[serde(default)]
    pub index: i32,
    #[serde(default = "default_camera_width")]
    pub width: u32,
    #[serde(default = "default_camera_height")]
    pub height: u32,
    #[serde(default = "default_camera_fps")]
    pub fps: u32,
    /// Flip frames horizontally so the preview behaves like a mirror
    #[serde(default = "default_true")]
    pub mirror: bool,
}

fn default_camera_width() -> u32 { 640 }
fn default_camera_height() -> u32 { 480 }
fn default_camera_fps() -> u32 { 30 }
fn default_true() -> bool { true }

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            index: 0,
            width: default_camera_width(),
            height: default_camera_height(),
            fps: default_camera_fps(),
            mirror: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ModelConfig {
    #[serde(default = "default_model_path")]
    pub path: String,
    #[serde(default = "default_input_name")]
    pub input_name: String,
    /// [1, 63] tensor: 21 x (x, y, z) in model input pixels
    #[serde(default = "default_landmarks_output")]
    pub landmarks_output: String,
    /// [1, 1] hand presence score
    #[serde(default = "default_presence_output")]
    pub presence_output: String,
    #[serde(default = "default_min_presence")]
    pub min_presence: f32,
}

fn default_model_path() -> String { "models/hand_landmark.onnx".to_string() }
fn default_input_name() -> String { "input_1".to_string() }
fn default_landmarks_output() -> String { "Identity".to_string() }
fn default_presence_output() -> String { "Identity_1".to_string() }
fn default_min_presence() -> f32 { 0.7 }

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: default_model_path(),
            input_name: default_input_name(),
            landmarks_output: default_landmarks_output(),
            presence_output: default_presence_output(),
            min_presence: default_min_presence(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct RegionConfig {
    /// Inset of the active region from each camera frame edge, in camera pixels
    #[serde(default = "default_margin")]
    pub margin: f32,
}

fn default_margin() -> f32 { 100.0 }

impl Default for RegionConfig {
    fn default() -> Self {
        Self { margin: default_margin() }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SmoothConfig {
    /// Each frame the cursor covers 1/divisor of the remaining distance
    #[serde(default = "default_divisor")]
    pub divisor: f32,
}

fn default_divisor() -> f32 { 5.0 }

impl Default for SmoothConfig {
    fn default() -> Self {
        Self { divisor: default_divisor() }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ClickConfig {
    /// Index/thumb tip distance (camera pixels) below which the button is held
    #[serde(default = "default_click_threshold")]
    pub threshold: f32,
}

fn default_click_threshold() -> f32 { 30.0 }

impl Default for ClickConfig {
    fn default() -> Self {
        Self { threshold: default_click_threshold() }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScrollConfig {
    #[serde(default = "default_deadzone")]
    pub deadzone: f32,
    /// Offset from center at which scroll speed saturates
    #[serde(default = "default_max_reference")]
    pub max_reference: f32,
    #[serde(default = "default_max_speed")]
    pub max_speed: f32,
    /// Hand above center scrolls down instead of up
    #[serde(default)]
    pub invert: bool,
}

fn default_deadzone() -> f32 { 40.0 }
fn default_max_reference() -> f32 { 150.0 }
fn default_max_speed() -> f32 { 15.0 }

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            deadzone: default_deadzone(),
            max_reference: default_max_reference(),
            max_speed: default_max_speed(),
            invert: false,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_min_frame_interval_ms")]
    pub min_frame_interval_ms: u64,
    /// Consecutive failed camera reads before the loop gives up
    #[serde(default = "default_max_capture_failures")]
    pub max_capture_failures: u32,
}

fn default_min_frame_interval_ms() -> u64 { 10 }
fn default_max_capture_failures() -> u32 { 30 }

impl AppConfig {
    pub fn min_frame_interval(&self) -> Duration {
        Duration::from_millis(self.min_frame_interval_ms)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            min_frame_interval_ms: default_min_frame_interval_ms(),
            max_capture_failures: default_max_capture_failures(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DebugConfig {
    #[serde(default)]
    pub view: bool,
    /// Lets the host find (and minimize) the overlay window
    #[serde(default = "default_window_title")]
    pub window_title: String,
}

fn default_window_title() -> String { "Hand Pointer".to_string() }

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            view: false,
            window_title: default_window_title(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Falls back to defaults when the file is missing or invalid.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path.as_ref()) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("{e:#}; using default config");
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.smooth.divisor >= 1.0) {
            bail!("smooth.divisor must be >= 1 (got {})", self.smooth.divisor);
        }
        if !(self.click.threshold > 0.0) {
            bail!("click.threshold must be positive (got {})", self.click.threshold);
        }
        if !(self.region.margin >= 0.0) {
            bail!("region.margin must not be negative (got {})", self.region.margin);
        }
        if self.scroll.deadzone < 0.0 || self.scroll.max_reference <= self.scroll.deadzone {
            bail!(
                "scroll.max_reference ({}) must exceed scroll.deadzone ({})",
                self.scroll.max_reference,
                self.scroll.deadzone
            );
        }
        if !(self.scroll.max_speed >= 1.0) {
            bail!("scroll.max_speed must be at least 1 (got {})", self.scroll.max_speed);
        }
        if self.app.max_capture_failures == 0 {
            bail!("app.max_capture_failures must be at least 1");
        }
        Ok(())
    }
}
