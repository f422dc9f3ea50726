pub use display::Display;
pub use screen::{FrameBuffer, Screen};

mod display;
mod screen;
