pub mod capture;
pub mod landmarks;

pub use capture::OpenCvCamera;
pub use landmarks::CameraProvider;
