pub use chip8::Chip8;
pub use error::{Error, Result};
pub use hardware::Hardware;
pub use quirks::Quirks;
pub use state::{State, Step};

mod chip8;
pub mod constants;
pub mod debug;
mod error;
mod hardware;
mod instruction;
#[cfg(test)]
mod mock;
mod opcode;
mod operations;
mod quirks;
pub mod state;
