use std::fmt;

use crate::hand::{Finger, LandmarkSet};

/// Interaction mode, recomputed from scratch every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Idle,
    Cursor,
    Scroll,
}

impl Mode {
    /// | index up | middle up | mode   |
    /// |----------|-----------|--------|
    /// | no       | any       | Idle   |
    /// | yes      | no        | Cursor |
    /// | yes      | yes       | Scroll |
    pub fn classify(landmarks: Option<&LandmarkSet>) -> Self {
        let Some(set) = landmarks else {
            return Mode::Idle;
        };
        match (set.is_finger_up(Finger::Index), set.is_finger_up(Finger::Middle)) {
            (false, _) => Mode::Idle,
            (true, false) => Mode::Cursor,
            (true, true) => Mode::Scroll,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::Idle => "IDLE",
            Mode::Cursor => "CURSOR",
            Mode::Scroll => "SCROLL",
        };
        f.write_str(name)
    }
}
