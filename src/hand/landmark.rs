/// The 21 MediaPipe hand landmark indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum HandLandmark {
    Wrist = 0,
    ThumbCmc = 1,
    ThumbMcp = 2,
    ThumbIp = 3,
    ThumbTip = 4,
    IndexMcp = 5,
    IndexPip = 6,
    IndexDip = 7,
    IndexTip = 8,
    MiddleMcp = 9,
    MiddlePip = 10,
    MiddleDip = 11,
    MiddleTip = 12,
    RingMcp = 13,
    RingPip = 14,
    RingDip = 15,
    RingTip = 16,
    PinkyMcp = 17,
    PinkyPip = 18,
    PinkyDip = 19,
    PinkyTip = 20,
}

impl HandLandmark {
    pub const COUNT: usize = 21;

    pub fn from_index(index: usize) -> Option<Self> {
        use HandLandmark::*;
        const ALL: [HandLandmark; HandLandmark::COUNT] = [
            Wrist, ThumbCmc, ThumbMcp, ThumbIp, ThumbTip, IndexMcp, IndexPip, IndexDip, IndexTip,
            MiddleMcp, MiddlePip, MiddleDip, MiddleTip, RingMcp, RingPip, RingDip, RingTip,
            PinkyMcp, PinkyPip, PinkyDip, PinkyTip,
        ];
        ALL.get(index).copied()
    }
}

/// Fingers whose extension drives the interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finger {
    Index,
    Middle,
}

impl Finger {
    /// (tip, knuckle) pair compared by the extension test
    fn joints(self) -> (HandLandmark, HandLandmark) {
        match self {
            Finger::Index => (HandLandmark::IndexTip, HandLandmark::IndexPip),
            Finger::Middle => (HandLandmark::MiddleTip, HandLandmark::MiddlePip),
        }
    }
}

/// One landmark in camera-normalized coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Landmark {
    /// Normalized x (0.0-1.0)
    pub x: f32,
    /// Normalized y (0.0-1.0), increasing downward
    pub y: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Convert to camera pixels
    pub fn to_pixel(&self, width: u32, height: u32) -> (f32, f32) {
        (self.x * width as f32, self.y * height as f32)
    }
}

/// One frame's hand landmarks
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkSet {
    pub landmarks: [Landmark; HandLandmark::COUNT],
}

impl LandmarkSet {
    pub fn new(landmarks: [Landmark; HandLandmark::COUNT]) -> Self {
        Self { landmarks }
    }

    pub fn get(&self, index: HandLandmark) -> &Landmark {
        &self.landmarks[index as usize]
    }

    pub fn set(&mut self, index: HandLandmark, landmark: Landmark) {
        self.landmarks[index as usize] = landmark;
    }

    /// False if any coordinate is NaN or infinite.
    pub fn is_finite(&self) -> bool {
        self.landmarks.iter().all(|lm| lm.x.is_finite() && lm.y.is_finite())
    }

    /// A finger is up when its tip sits above (smaller y than) its knuckle.
    pub fn is_finger_up(&self, finger: Finger) -> bool {
        let (tip, knuckle) = finger.joints();
        self.get(tip).y < self.get(knuckle).y
    }
}

impl Default for LandmarkSet {
    fn default() -> Self {
        Self {
            landmarks: [Landmark::default(); HandLandmark::COUNT],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hand_landmark_count() {
        assert_eq!(HandLandmark::COUNT, 21);
    }

    #[test]
    fn test_hand_landmark_from_index() {
        assert_eq!(HandLandmark::from_index(0), Some(HandLandmark::Wrist));
        assert_eq!(HandLandmark::from_index(8), Some(HandLandmark::IndexTip));
        assert_eq!(HandLandmark::from_index(20), Some(HandLandmark::PinkyTip));
        assert_eq!(HandLandmark::from_index(21), None);
    }

    #[test]
    fn test_landmark_to_pixel() {
        let lm = Landmark::new(0.5, 0.25);
        let (px, py) = lm.to_pixel(640, 480);
        assert_eq!(px, 320.0);
        assert_eq!(py, 120.0);
    }

    #[test]
    fn test_non_finite_coordinate_detected() {
        let mut set = LandmarkSet::default();
        assert!(set.is_finite());
        set.set(HandLandmark::IndexTip, Landmark::new(f32::NAN, 0.2));
        assert!(!set.is_finite());
        set.set(HandLandmark::IndexTip, Landmark::new(0.5, f32::INFINITY));
        assert!(!set.is_finite());
    }

    #[test]
    fn test_finger_up_compares_tip_with_knuckle() {
        let mut set = LandmarkSet::default();
        set.set(HandLandmark::IndexTip, Landmark::new(0.5, 0.3));
        set.set(HandLandmark::IndexPip, Landmark::new(0.5, 0.4));
        set.set(HandLandmark::MiddleTip, Landmark::new(0.6, 0.5));
        set.set(HandLandmark::MiddlePip, Landmark::new(0.6, 0.4));

        assert!(set.is_finger_up(Finger::Index));
        assert!(!set.is_finger_up(Finger::Middle));
    }

    #[test]
    fn test_finger_level_with_knuckle_is_down() {
        let mut set = LandmarkSet::default();
        set.set(HandLandmark::IndexTip, Landmark::new(0.5, 0.4));
        set.set(HandLandmark::IndexPip, Landmark::new(0.5, 0.4));
        assert!(!set.is_finger_up(Finger::Index));
    }
}
