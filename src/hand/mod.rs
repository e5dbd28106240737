#[cfg(feature = "desktop")]
pub mod detector;
pub mod landmark;
#[cfg(feature = "desktop")]
pub mod preprocess;
pub mod provider;

#[cfg(feature = "desktop")]
pub use detector::HandDetector;
pub use landmark::{Finger, HandLandmark, Landmark, LandmarkSet};
#[cfg(feature = "desktop")]
pub use preprocess::preprocess_for_hand;
pub use provider::{HandSketch, LandmarkProvider, ScriptedFrame, ScriptedProvider};
