use anyhow::Result;

use super::capture::OpenCvCamera;
use crate::config::Config;
use crate::gesture::ActiveRegion;
use crate::hand::{preprocess_for_hand, HandDetector, LandmarkProvider, LandmarkSet};
use crate::render::MinifbRenderer;

/// Camera + hand model as a landmark provider, with an optional debug window.
pub struct CameraProvider {
    camera: OpenCvCamera,
    detector: HandDetector,
    view: Option<DebugView>,
}

struct DebugView {
    renderer: MinifbRenderer,
    region: ActiveRegion,
    deadzone: f32,
}

impl CameraProvider {
    /// Opens the camera and loads the model; either failing is a startup error.
    pub fn open(config: &Config) -> Result<Self> {
        let camera = OpenCvCamera::open(&config.camera)?;
        let detector = HandDetector::new(&config.model)?;
        let (width, height) = camera.resolution();

        let view = if config.debug.view {
            Some(DebugView {
                renderer: MinifbRenderer::new(&config.debug.window_title, width as usize, height as usize)?,
                region: ActiveRegion::inset(width, height, config.region.margin)?,
                deadzone: config.scroll.deadzone,
            })
        } else {
            None
        };

        Ok(Self { camera, detector, view })
    }
}

impl LandmarkProvider for CameraProvider {
    fn frame_size(&self) -> (u32, u32) {
        self.camera.resolution()
    }

    fn next_frame(&mut self) -> Result<Option<LandmarkSet>> {
        let frame = self.camera.read_frame()?;
        let input = preprocess_for_hand(&frame)?;
        let landmarks = self.detector.detect(input)?;

        if let Some(view) = &mut self.view {
            let r = &mut view.renderer;
            r.draw_frame(&frame)?;
            r.draw_guides(&view.region, view.deadzone);
            if let Some(set) = &landmarks {
                r.draw_hand(set);
            }
            r.update()?;
        }

        Ok(landmarks)
    }

    fn is_open(&self) -> bool {
        self.view.as_ref().map_or(true, |v| v.renderer.is_open())
    }
}
