use thiserror::Error;

/// Faults that stop the CPU from making progress.
///
/// An unrecognized opcode is not one of these; see `Step::Unrecognized`.
#[derive(Debug, Error)]
pub enum Error {
    #[error("ROM is too large ({size} bytes), max size is {max} bytes")]
    RomTooLarge { size: usize, max: usize },

    #[error("stack overflow calling a subroutine at {pc:#06X}")]
    StackOverflow { pc: u16 },

    #[error("stack underflow returning from a subroutine at {pc:#06X}")]
    StackUnderflow { pc: u16 },

    #[error("program counter {pc:#06X} is outside of program memory")]
    PcOutOfRange { pc: u16 },

    #[error("memory access of {len} bytes at {address:#06X} is out of bounds")]
    MemoryOutOfRange { address: u16, len: usize },

    #[error("{key:#04X} is not a key on the keypad")]
    InvalidKey { key: u8 },

    #[error("unable to read ROM")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
