use std::io::Read;

use log::{debug, info};

use crate::debug::Debugger;
use crate::error::Result;
use crate::hardware::Hardware;
use crate::quirks::Quirks;
use crate::state::{State, Step};

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Tracks:
///  - current `state`
///  - the `quirks` every step runs with
///  - the loaded `rom` so the machine can be reset
///  - a `debugger` that can pause execution
///
/// Supplies interfaces for:
/// - loading roms and resetting
/// - pressing and releasing keys
/// - advancing the CPU and its timers
pub struct Chip8 {
    state: State,
    quirks: Quirks,
    rom: Vec<u8>,
    debugger: Debugger,
    paused: bool,
}

impl Chip8 {
    pub fn new() -> Self {
        Chip8 {
            state: State::new(),
            quirks: Quirks::default(),
            rom: Vec::new(),
            debugger: Debugger::new(),
            paused: false,
        }
    }

    /// Load a rom from a source file, replacing whatever was running
    ///
    /// # Arguments
    /// * `reader` a file reader that contains a ROM
    pub fn load_rom(&mut self, reader: &mut dyn Read) -> Result<()> {
        let mut rom = Vec::new();
        reader.read_to_end(&mut rom)?;
        let mut state = State::new();
        state.load_rom(&rom)?;
        info!("loaded {} byte ROM", rom.len());
        self.state = state;
        self.rom = rom;
        self.paused = false;
        Ok(())
    }

    /// Restart the loaded rom from a fresh state
    pub fn reset(&mut self) -> Result<()> {
        let mut state = State::new();
        state.load_rom(&self.rom)?;
        info!("reset");
        self.state = state;
        self.paused = false;
        Ok(())
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn quirks(&self) -> Quirks {
        self.quirks
    }

    /// Replace the quirks used from the next step on
    pub fn set_quirks(&mut self, quirks: Quirks) {
        info!("quirks set to {:?}", quirks);
        self.quirks = quirks;
    }

    pub fn debugger(&self) -> &Debugger {
        &self.debugger
    }

    pub fn debugger_mut(&mut self) -> &mut Debugger {
        &mut self.debugger
    }

    /// Whether the debugger has paused execution
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Set the pressed status of key
    ///
    /// # Arguments
    /// * `key` the 8-bit representation of the key that was pressed
    pub fn key_press(&mut self, key: u8) -> Result<()> {
        self.state.press_key(key)
    }

    /// Unset the pressed status of key
    ///
    /// # Arguments
    /// * `key` the 8-bit representation of the key that was released
    pub fn key_release(&mut self, key: u8) -> Result<()> {
        self.state.release_key(key)
    }

    /// Forget the last key pressed; called once per input cycle
    pub fn clear_last_key(&mut self) {
        self.state.clear_last_key();
    }

    /// Advances the CPU by a single cycle
    /// - does nothing while paused
    /// - gets and executes the next opcode
    /// - pauses if the debugger asks for it
    pub fn advance_cpu(&mut self, hardware: &mut dyn Hardware) -> Result<Option<Step>> {
        if self.paused {
            return Ok(None);
        }
        let pc = self.state.pc;
        let op = self.state.fetch()?;
        let step = self.state.execute(op, hardware, &self.quirks)?;
        // a key wait that is still waiting hasn't finished executing
        if step != Step::AwaitingKey && self.debugger.should_pause(op, self.state.pc) {
            debug!("paused after {:04X} at {:04X}", op, pc);
            self.paused = true;
        }
        Ok(Some(step))
    }

    /// Advances the delay and sound timers by one 60Hz tick
    pub fn advance_timers(&mut self) {
        self.state.tick_timers();
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new()
    }
}
