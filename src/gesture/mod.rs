pub mod mapper;
pub mod mode;
pub mod pinch;
pub mod scroll;
pub mod smooth;

pub use mapper::{ActiveRegion, CoordinateMapper};
pub use mode::Mode;
pub use pinch::{ClickEvent, PinchDetector};
pub use scroll::ScrollController;
pub use smooth::Smoother;
