use anyhow::{anyhow, Result};
use std::collections::VecDeque;

use super::landmark::{HandLandmark, Landmark, LandmarkSet};

/// Source of per-frame hand landmarks.
///
/// `next_frame` blocks until the next frame is available. `Ok(None)` means the
/// frame was captured but no hand was found; `Err` is a failed capture read.
pub trait LandmarkProvider {
    /// Camera frame size in pixels, fixed for the provider's lifetime.
    fn frame_size(&self) -> (u32, u32);

    fn next_frame(&mut self) -> Result<Option<LandmarkSet>>;

    /// `false` once the provider has nothing more to deliver (window closed,
    /// script exhausted).
    fn is_open(&self) -> bool {
        true
    }
}

/// One step of a scripted landmark sequence.
#[derive(Debug, Clone)]
pub enum ScriptedFrame {
    Hand(LandmarkSet),
    NoHand,
    CaptureError,
}

/// Replays a fixed landmark sequence in place of a camera.
pub struct ScriptedProvider {
    frames: VecDeque<ScriptedFrame>,
    frame_size: (u32, u32),
    looping: Option<Vec<ScriptedFrame>>,
}

impl ScriptedProvider {
    pub fn new(frame_size: (u32, u32), frames: impl IntoIterator<Item = ScriptedFrame>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
            frame_size,
            looping: None,
        }
    }

    /// Restart the script whenever it runs out, so the provider never closes.
    pub fn looping(mut self) -> Self {
        self.looping = Some(self.frames.iter().cloned().collect());
        self
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl LandmarkProvider for ScriptedProvider {
    fn frame_size(&self) -> (u32, u32) {
        self.frame_size
    }

    fn next_frame(&mut self) -> Result<Option<LandmarkSet>> {
        if self.frames.is_empty() {
            if let Some(script) = &self.looping {
                self.frames.extend(script.iter().cloned());
            }
        }
        match self.frames.pop_front() {
            Some(ScriptedFrame::Hand(set)) => Ok(Some(set)),
            Some(ScriptedFrame::NoHand) | None => Ok(None),
            Some(ScriptedFrame::CaptureError) => Err(anyhow!("scripted capture failure")),
        }
    }

    fn is_open(&self) -> bool {
        !self.frames.is_empty() || self.looping.as_ref().is_some_and(|s| !s.is_empty())
    }
}

/// Builds synthetic hands for scripted sessions.
///
/// Positions are camera-normalized. Finger extension is produced by placing
/// the knuckle just below (up) or above (down) the corresponding tip.
#[derive(Debug, Clone)]
pub struct HandSketch {
    index_tip: Landmark,
    thumb_tip: Landmark,
    middle_tip: Landmark,
    index_up: bool,
    middle_up: bool,
}

const KNUCKLE_OFFSET: f32 = 0.05;

impl HandSketch {
    /// Index finger up at the frame center, middle finger curled, thumb far away.
    pub fn pointing() -> Self {
        Self {
            index_tip: Landmark::new(0.5, 0.5),
            thumb_tip: Landmark::new(0.2, 0.8),
            middle_tip: Landmark::new(0.55, 0.6),
            index_up: true,
            middle_up: false,
        }
    }

    /// Index and middle fingers up.
    pub fn two_fingers() -> Self {
        Self {
            middle_up: true,
            ..Self::pointing()
        }
    }

    /// Fist: no finger up.
    pub fn fist() -> Self {
        Self {
            index_up: false,
            middle_up: false,
            ..Self::pointing()
        }
    }

    pub fn index_tip(mut self, x: f32, y: f32) -> Self {
        self.index_tip = Landmark::new(x, y);
        self
    }

    pub fn thumb_tip(mut self, x: f32, y: f32) -> Self {
        self.thumb_tip = Landmark::new(x, y);
        self
    }

    /// Thumb tip placed `dx_px` camera pixels to the right of the index tip.
    pub fn pinch_px(mut self, dx_px: f32, frame_width: u32) -> Self {
        self.thumb_tip = Landmark::new(self.index_tip.x + dx_px / frame_width as f32, self.index_tip.y);
        self
    }

    pub fn build(&self) -> LandmarkSet {
        let mut set = LandmarkSet::default();
        let knuckle = |tip: Landmark, up: bool| {
            let dy = if up { KNUCKLE_OFFSET } else { -KNUCKLE_OFFSET };
            Landmark::new(tip.x, tip.y + dy)
        };
        set.set(HandLandmark::IndexTip, self.index_tip);
        set.set(HandLandmark::IndexPip, knuckle(self.index_tip, self.index_up));
        set.set(HandLandmark::MiddleTip, self.middle_tip);
        set.set(HandLandmark::MiddlePip, knuckle(self.middle_tip, self.middle_up));
        set.set(HandLandmark::ThumbTip, self.thumb_tip);
        set
    }

    pub fn frame(&self) -> ScriptedFrame {
        ScriptedFrame::Hand(self.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::Finger;

    #[test]
    fn test_sketch_extension() {
        let pointing = HandSketch::pointing().build();
        assert!(pointing.is_finger_up(Finger::Index));
        assert!(!pointing.is_finger_up(Finger::Middle));

        let two = HandSketch::two_fingers().build();
        assert!(two.is_finger_up(Finger::Index));
        assert!(two.is_finger_up(Finger::Middle));

        let fist = HandSketch::fist().build();
        assert!(!fist.is_finger_up(Finger::Index));
    }

    #[test]
    fn test_pinch_px_places_thumb() {
        let set = HandSketch::pointing().pinch_px(25.0, 640).build();
        let (ix, _) = set.get(HandLandmark::IndexTip).to_pixel(640, 480);
        let (tx, _) = set.get(HandLandmark::ThumbTip).to_pixel(640, 480);
        assert!((tx - ix - 25.0).abs() < 1e-3);
    }

    #[test]
    fn test_scripted_provider_replays_then_closes() {
        let mut provider = ScriptedProvider::new(
            (640, 480),
            [HandSketch::pointing().frame(), ScriptedFrame::NoHand, ScriptedFrame::CaptureError],
        );
        assert!(provider.is_open());
        assert!(provider.next_frame().unwrap().is_some());
        assert!(provider.next_frame().unwrap().is_none());
        assert!(provider.next_frame().is_err());
        assert!(!provider.is_open());
        assert!(provider.next_frame().unwrap().is_none());
    }

    #[test]
    fn test_looping_provider_never_closes() {
        let mut provider = ScriptedProvider::new((640, 480), [ScriptedFrame::NoHand]).looping();
        for _ in 0..5 {
            assert!(provider.next_frame().unwrap().is_none());
            assert!(provider.is_open());
        }
    }
}
