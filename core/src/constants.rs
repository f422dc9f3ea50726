/// Bytes of addressable memory
pub const MEMORY_SIZE: usize = 0x1000;

/// ROMs are loaded into memory starting at this address; everything below is reserved
pub const PROGRAM_OFFSET: u16 = 0x200;

/// The largest ROM that fits between `PROGRAM_OFFSET` and the end of memory
pub const MAX_ROM_SIZE: usize = MEMORY_SIZE - PROGRAM_OFFSET as usize;

/// Number of return addresses the call stack can hold
pub const STACK_SIZE: usize = 16;

/// Number of general purpose registers (V0..VF)
pub const REGISTER_COUNT: usize = 16;

/// Number of keys on the hexadecimal keypad
pub const KEY_COUNT: usize = 16;

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// Bytes (rows) per built-in glyph
pub const GLYPH_SIZE: usize = 5;

/// Frequency at which the delay and sound timers are decremented
pub const TIMER_HZ: u32 = 60;

/// Default number of instructions executed per second
pub const DEFAULT_SPEED: u32 = 500;

/// Upper bound on instructions executed per second
pub const MAX_SPEED: u32 = 1000;

/// # Typography
/// Built-in sprites for the hexadecimal digits 0..F, loaded at address 0x000.
///
/// Each glyph is 5 bytes; each byte is a row whose upper nibble holds the 4 pixels of that row.
/// ```text
/// 0xF0 ****
/// 0x90 *  *
/// 0x90 *  *
/// 0x90 *  *
/// 0xF0 ****
/// ```
pub const TYPOGRAPHY: [u8; 16 * GLYPH_SIZE] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
