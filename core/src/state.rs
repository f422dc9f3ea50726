use std::fmt;
use std::ops::Range;

use log::{trace, warn};

use crate::constants::{
    GLYPH_SIZE, KEY_COUNT, MAX_ROM_SIZE, MEMORY_SIZE, PROGRAM_OFFSET, REGISTER_COUNT, STACK_SIZE,
    TYPOGRAPHY,
};
use crate::error::{Error, Result};
use crate::hardware::Hardware;
use crate::instruction::from_op;
use crate::quirks::Quirks;

/// The outcome of a single `State::step`
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Step {
    /// The instruction was executed
    Advanced,
    /// Fx0A found no recorded key; the PC was left in place so the instruction runs again
    AwaitingKey,
    /// The fetched word isn't a known instruction; it was skipped
    Unrecognized(u16),
}

impl Step {
    /// Whether the fetched word was a known instruction
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Step::Unrecognized(_))
    }
}

/// The Chip-8 internal state
///
/// ## CPU
/// Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - the first 15 (V0..VE) are general purpose registers
///     - the 16th (VF) doubles as the flag register
/// - (i) a 16-bit memory address register, only the low 12 bits address memory
///
/// Counter
/// - (pc) a 16-bit program counter
///
/// Pointer
/// - (sp) an 8-bit stack pointer; the number of return addresses on the stack
///
/// Timers
/// - 2 8-bit timers (delay & sound), decremented by the host at 60Hz
///
/// ## Memory
/// - 16 return addresses of stack
/// - 4096 bytes of addressable memory
///     - 0x000..0x200 is reserved; the typography lives at its start
///     - 0x200.. holds the loaded ROM
///
/// ## Input
/// - the pressed status of keys 0..F
/// - the first key pressed since the host last cleared it
#[derive(Clone)]
pub struct State {
    pub v: [u8; REGISTER_COUNT],
    pub i: u16,
    pub pc: u16,
    pub sp: u8,
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub stack: [u16; STACK_SIZE],
    pub memory: [u8; MEMORY_SIZE],
    pub key_states: [bool; KEY_COUNT],
    pub last_key: Option<u8>,
}

impl State {
    pub fn new() -> Self {
        let mut state = State {
            v: [0; REGISTER_COUNT],
            i: 0,
            pc: PROGRAM_OFFSET,
            sp: 0,
            delay_timer: 0,
            sound_timer: 0,
            stack: [0; STACK_SIZE],
            memory: [0; MEMORY_SIZE],
            key_states: [false; KEY_COUNT],
            last_key: None,
        };
        state.load_typography(&TYPOGRAPHY);
        state
    }

    /// Copy a glyph table (16 glyphs of 5 bytes) to the start of memory
    pub fn load_typography(&mut self, typography: &[u8; 16 * GLYPH_SIZE]) {
        self.memory[..typography.len()].copy_from_slice(typography);
    }

    /// Copy a ROM into memory starting at `PROGRAM_OFFSET`
    pub fn load_rom(&mut self, rom: &[u8]) -> Result<()> {
        if rom.len() > MAX_ROM_SIZE {
            return Err(Error::RomTooLarge {
                size: rom.len(),
                max: MAX_ROM_SIZE,
            });
        }
        let start = PROGRAM_OFFSET as usize;
        self.memory[start..start + rom.len()].copy_from_slice(rom);
        Ok(())
    }

    /// Set the pressed status of key
    ///
    /// The key is recorded as the last key unless one has been recorded since the last clear.
    pub fn press_key(&mut self, key: u8) -> Result<()> {
        let index = Self::key_index(key)?;
        self.key_states[index] = true;
        if self.last_key.is_none() {
            self.last_key = Some(key);
        }
        Ok(())
    }

    /// Unset the pressed status of key
    pub fn release_key(&mut self, key: u8) -> Result<()> {
        let index = Self::key_index(key)?;
        self.key_states[index] = false;
        Ok(())
    }

    /// Forget the last key pressed
    pub fn clear_last_key(&mut self) {
        self.last_key = None;
    }

    fn key_index(key: u8) -> Result<usize> {
        if (key as usize) < KEY_COUNT {
            Ok(key as usize)
        } else {
            Err(Error::InvalidKey { key })
        }
    }

    /// Decrement both timers, stopping at 0
    pub fn tick_timers(&mut self) {
        self.delay_timer = self.delay_timer.saturating_sub(1);
        self.sound_timer = self.sound_timer.saturating_sub(1);
    }

    /// Whether the buzzer should be sounding
    pub fn sound_active(&self) -> bool {
        self.sound_timer > 0
    }

    /// Gets the opcode currently pointed at by the pc.
    pub fn fetch(&self) -> Result<u16> {
        self.word_at(self.pc)
    }

    /// Gets the opcode stored at `address` in program memory.
    /// Memory is stored as bytes, but opcodes are 16 bits so we combine two subsequent bytes.
    pub fn word_at(&self, address: u16) -> Result<u16> {
        let pc = address as usize;
        if address < PROGRAM_OFFSET || pc + 1 >= MEMORY_SIZE {
            return Err(Error::PcOutOfRange { pc: address });
        }
        Ok(u16::from(self.memory[pc]) << 8 | u16::from(self.memory[pc + 1]))
    }

    /// Executes exactly one instruction
    ///
    /// On `Err` the state is left as it was before the call.
    pub fn step(&mut self, hardware: &mut dyn Hardware, quirks: &Quirks) -> Result<Step> {
        let op = self.fetch()?;
        self.execute(op, hardware, quirks)
    }

    /// Executes `op` as if it had just been fetched from the pc
    pub(crate) fn execute(
        &mut self,
        op: u16,
        hardware: &mut dyn Hardware,
        quirks: &Quirks,
    ) -> Result<Step> {
        trace!(
            "{:04X} v{:02X?} i{:04X} pc{:04X}",
            op,
            self.v,
            self.i,
            self.pc
        );
        match from_op(&op) {
            Some(operation) => operation(&op, self, hardware, quirks),
            None => {
                warn!("unrecognized opcode {:04X} at {:04X}", op, self.pc);
                self.pc += 0x2;
                Ok(Step::Unrecognized(op))
            }
        }
    }

    /// Moves on to the next instruction
    pub(crate) fn advance(&mut self) -> Step {
        self.pc += 0x2;
        Step::Advanced
    }

    /// Moves past the next instruction if `condition` holds
    pub(crate) fn skip_if(&mut self, condition: bool) -> Step {
        self.pc += if condition { 0x4 } else { 0x2 };
        Step::Advanced
    }

    /// The `len` bytes of memory starting at I
    pub(crate) fn indexed(&self, len: usize) -> Result<Range<usize>> {
        let start = self.i as usize;
        if start + len > MEMORY_SIZE {
            return Err(Error::MemoryOutOfRange {
                address: self.i,
                len,
            });
        }
        Ok(start..start + len)
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pc = {:#06x}, sp = {:#04x}, dt = {:#04x}, st = {:#04x}, I = {:#06x} V[ ",
            self.pc, self.sp, self.delay_timer, self.sound_timer, self.i
        )?;
        for v in self.v.iter() {
            write!(f, "{:02x} ", v)?;
        }
        write!(f, "]\nK[ ")?;
        for &pressed in self.key_states.iter() {
            write!(f, "{} ", pressed as u8)?;
        }
        write!(f, "]")
    }
}
