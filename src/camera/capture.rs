use anyhow::{Context, Result};
use opencv::{
    core::{self, Mat},
    prelude::*,
    videoio::{self, VideoCapture, VideoCaptureAPIs, VideoCaptureTrait},
};
use tracing::info;

use crate::config::CameraConfig;

/// Camera capture via OpenCV
pub struct OpenCvCamera {
    capture: VideoCapture,
    width: u32,
    height: u32,
    mirror: bool,
}

impl OpenCvCamera {
    /// Open the configured camera. Failing to open is a startup error
    pub fn open(config: &CameraConfig) -> Result<Self> {
        let index = config.index;
        let mut capture = VideoCapture::new(index, VideoCaptureAPIs::CAP_ANY as i32)
            .with_context(|| format!("Failed to open camera {index}"))?;

        if !capture.is_opened()? {
            anyhow::bail!("Camera {} is not available", index);
        }

        capture.set(videoio::CAP_PROP_FRAME_WIDTH, config.width as f64)?;
        capture.set(videoio::CAP_PROP_FRAME_HEIGHT, config.height as f64)?;
        capture.set(videoio::CAP_PROP_FPS, config.fps as f64)?;
        capture.set(videoio::CAP_PROP_BUFFERSIZE, 1.0)?;

        let actual_width = capture.get(videoio::CAP_PROP_FRAME_WIDTH)? as u32;
        let actual_height = capture.get(videoio::CAP_PROP_FRAME_HEIGHT)? as u32;
        let actual_fps = capture.get(videoio::CAP_PROP_FPS)?;
        info!(index, width = actual_width, height = actual_height, fps = actual_fps, "camera opened");

        Ok(Self {
            capture,
            width: actual_width,
            height: actual_height,
            mirror: config.mirror,
        })
    }

    /// Capture resolution
    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Read one BGR frame, flipped horizontally when `mirror` is set
    pub fn read_frame(&mut self) -> Result<Mat> {
        let mut frame = Mat::default();
        self.capture
            .read(&mut frame)
            .context("Failed to read frame")?;

        if frame.empty() {
            anyhow::bail!("Empty frame received");
        }

        if !self.mirror {
            return Ok(frame);
        }
        let mut flipped = Mat::default();
        core::flip(&frame, &mut flipped, 1)?;
        Ok(flipped)
    }
}

impl Drop for OpenCvCamera {
    fn drop(&mut self) {
        if let Err(e) = self.capture.release() {
            tracing::warn!("camera release failed: {e}");
        }
    }
}
