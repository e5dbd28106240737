use crate::hand::HandLandmark;

/// Hand skeleton edges (from landmark, to landmark)
pub const HAND_CONNECTIONS: [(HandLandmark, HandLandmark); 21] = [
    // thumb
    (HandLandmark::Wrist, HandLandmark::ThumbCmc),
    (HandLandmark::ThumbCmc, HandLandmark::ThumbMcp),
    (HandLandmark::ThumbMcp, HandLandmark::ThumbIp),
    (HandLandmark::ThumbIp, HandLandmark::ThumbTip),
    // index
    (HandLandmark::Wrist, HandLandmark::IndexMcp),
    (HandLandmark::IndexMcp, HandLandmark::IndexPip),
    (HandLandmark::IndexPip, HandLandmark::IndexDip),
    (HandLandmark::IndexDip, HandLandmark::IndexTip),
    // middle
    (HandLandmark::IndexMcp, HandLandmark::MiddleMcp),
    (HandLandmark::MiddleMcp, HandLandmark::MiddlePip),
    (HandLandmark::MiddlePip, HandLandmark::MiddleDip),
    (HandLandmark::MiddleDip, HandLandmark::MiddleTip),
    // ring
    (HandLandmark::MiddleMcp, HandLandmark::RingMcp),
    (HandLandmark::RingMcp, HandLandmark::RingPip),
    (HandLandmark::RingPip, HandLandmark::RingDip),
    (HandLandmark::RingDip, HandLandmark::RingTip),
    // pinky
    (HandLandmark::RingMcp, HandLandmark::PinkyMcp),
    (HandLandmark::Wrist, HandLandmark::PinkyMcp),
    (HandLandmark::PinkyMcp, HandLandmark::PinkyPip),
    (HandLandmark::PinkyPip, HandLandmark::PinkyDip),
    (HandLandmark::PinkyDip, HandLandmark::PinkyTip),
];

/// Landmark color (RGB)
pub const LANDMARK_COLOR: u32 = 0x00FF00; // green

/// Skeleton line color (RGB)
pub const SKELETON_COLOR: u32 = 0xFFFF00; // yellow

/// Active region and scroll center line color (RGB)
pub const GUIDE_COLOR: u32 = 0x00C8FF; // cyan

/// Deadzone boundary color (RGB)
pub const DEADZONE_COLOR: u32 = 0x006400; // dark green
