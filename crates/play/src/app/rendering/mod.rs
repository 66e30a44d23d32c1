mod normalize;
mod window;

pub use normalize::{normalize, DisplayFrame, FrameSize};
pub use window::WindowFrontend;
