//! Observation of a running CPU: breakpoints and a disassembler.
//!
//! Nothing in here mutates the `State`.

use crate::constants::{MEMORY_SIZE, PROGRAM_OFFSET};
use crate::opcode::Opcode;
use crate::quirks::Quirks;
use crate::state::State;

/// One breakpoint slot per instruction-aligned address of program memory
const BREAKPOINT_SLOTS: usize = (MEMORY_SIZE - PROGRAM_OFFSET as usize) / 2;

const CATEGORY_COUNT: usize = 7;

/// Kinds of instruction execution can be paused after
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    /// 1nnn, Bnnn
    Jump,
    /// 2nnn
    Call,
    /// 00EE
    Return,
    /// 3xkk, 4xkk, 5xy0, 9xy0
    Skip,
    /// Dxyn
    Draw,
    /// Fx0A
    KeyWait,
    /// Ex9E, ExA1
    KeySkip,
}

impl Category {
    /// The category of an instruction word, if it belongs to one
    pub fn classify(op: u16) -> Option<Category> {
        match op.nibbles() {
            (0x0, 0x0, 0xE, 0xE) => Some(Category::Return),
            (0x1, ..) | (0xB, ..) => Some(Category::Jump),
            (0x2, ..) => Some(Category::Call),
            (0x3, ..) | (0x4, ..) | (0x5, .., 0x0) | (0x9, .., 0x0) => Some(Category::Skip),
            (0xD, ..) => Some(Category::Draw),
            (0xF, _, 0x0, 0xA) => Some(Category::KeyWait),
            (0xE, _, 0x9, 0xE) | (0xE, _, 0xA, 0x1) => Some(Category::KeySkip),
            _ => None,
        }
    }
}

/// # Debugger
/// Decides whether execution should pause after a step.
///
/// Pauses when the executed instruction belongs to an armed `Category`, or when the
/// program counter lands on an address with a breakpoint set.
#[derive(Clone)]
pub struct Debugger {
    armed: [bool; CATEGORY_COUNT],
    breakpoints: Vec<bool>,
}

impl Debugger {
    pub fn new() -> Self {
        Debugger {
            armed: [false; CATEGORY_COUNT],
            breakpoints: vec![false; BREAKPOINT_SLOTS],
        }
    }

    pub fn arm(&mut self, category: Category) {
        self.armed[category as usize] = true;
    }

    pub fn disarm(&mut self, category: Category) {
        self.armed[category as usize] = false;
    }

    pub fn is_armed(&self, category: Category) -> bool {
        self.armed[category as usize]
    }

    /// Set a breakpoint at `pc`
    ///
    /// Returns false if `pc` isn't an even address in program memory.
    pub fn set_breakpoint(&mut self, pc: u16) -> bool {
        match Self::slot(pc) {
            Some(slot) => {
                self.breakpoints[slot] = true;
                true
            }
            None => false,
        }
    }

    pub fn clear_breakpoint(&mut self, pc: u16) {
        if let Some(slot) = Self::slot(pc) {
            self.breakpoints[slot] = false;
        }
    }

    pub fn has_breakpoint(&self, pc: u16) -> bool {
        Self::slot(pc).map_or(false, |slot| self.breakpoints[slot])
    }

    /// Whether to pause after executing `op`, leaving the program counter at `next_pc`
    pub fn should_pause(&self, op: u16, next_pc: u16) -> bool {
        let armed = Category::classify(op).map_or(false, |category| self.is_armed(category));
        armed || self.has_breakpoint(next_pc)
    }

    fn slot(pc: u16) -> Option<usize> {
        if pc < PROGRAM_OFFSET || pc % 2 != 0 {
            return None;
        }
        let slot = (pc - PROGRAM_OFFSET) as usize / 2;
        if slot < BREAKPOINT_SLOTS {
            Some(slot)
        } else {
            None
        }
    }
}

impl Default for Debugger {
    fn default() -> Self {
        Self::new()
    }
}

/// Describes the instruction stored at `pc`, annotated with the current values of its operands
///
/// e.g. `0x204  8124  ADD  V1=0A, V2=FF`
pub fn disassemble(pc: u16, state: &State, quirks: &Quirks) -> String {
    let op = match state.word_at(pc) {
        Ok(op) => op,
        Err(_) => return "???".to_string(),
    };

    let (x, y) = (op.x(), op.y());
    let vx = format!("V{:X}={:02X}", x, state.v[x]);
    let vy = format!("V{:X}={:02X}", y, state.v[y]);

    let instruction = match op.nibbles() {
        (0x0, 0x0, 0xE, 0x0) => "CLS".to_string(),
        (0x0, 0x0, 0xE, 0xE) => "RET".to_string(),
        (0x1, ..) => format!("JP   {:03X}", op.addr()),
        (0x2, ..) => format!("CALL {:03X}", op.addr()),
        (0x3, ..) => format!("SE   {}, {:02X}", vx, op.kk()),
        (0x4, ..) => format!("SNE  {}, {:02X}", vx, op.kk()),
        (0x5, .., 0x0) => format!("SE   {}, {}", vx, vy),
        (0x6, ..) => format!("LD   {}, {:02X}", vx, op.kk()),
        (0x7, ..) => format!("ADD  {}, {:02X}", vx, op.kk()),
        (0x8, .., 0x0) => format!("LD   {}, {}", vx, vy),
        (0x8, .., 0x1) => format!("OR   {}, {}", vx, vy),
        (0x8, .., 0x2) => format!("AND  {}, {}", vx, vy),
        (0x8, .., 0x3) => format!("XOR  {}, {}", vx, vy),
        (0x8, .., 0x4) => format!("ADD  {}, {}", vx, vy),
        (0x8, .., 0x5) => format!("SUB  {}, {}", vx, vy),
        (0x8, .., 0x6) if quirks.shift => format!("SHR  {}", vx),
        (0x8, .., 0x6) => format!("SHR  {}, {}", vx, vy),
        (0x8, .., 0x7) => format!("SUBN {}, {}", vx, vy),
        (0x8, .., 0xE) if quirks.shift => format!("SHL  {}", vx),
        (0x8, .., 0xE) => format!("SHL  {}, {}", vx, vy),
        (0x9, .., 0x0) => format!("SNE  {}, {}", vx, vy),
        (0xA, ..) => format!("LD   I, {:03X}", op.addr()),
        (0xB, ..) => format!("JP   V0={:02X}, {:03X}", state.v[0x0], op.addr()),
        (0xC, ..) => format!("RND  {}, {:02X}", vx, op.kk()),
        (0xD, ..) => format!("DRW  {}, {}, {:X}", vx, vy, op.n()),
        (0xE, _, 0x9, 0xE) => format!("SKP  {}", vx),
        (0xE, _, 0xA, 0x1) => format!("SKNP {}", vx),
        (0xF, _, 0x0, 0x7) => format!("LD   {}, DT={:02X}", vx, state.delay_timer),
        (0xF, _, 0x0, 0xA) => format!("LD   {}, K", vx),
        (0xF, _, 0x1, 0x5) => format!("LD   DT, {}", vx),
        (0xF, _, 0x1, 0x8) => format!("LD   ST, {}", vx),
        (0xF, _, 0x1, 0xE) => format!("ADD  I={:03X}, {}", state.i, vx),
        (0xF, _, 0x2, 0x9) => format!("LD   F, {}", vx),
        (0xF, _, 0x3, 0x3) => format!("LD   B, {}", vx),
        (0xF, _, 0x5, 0x5) => format!("LD   [I={:03X}], {}", state.i, vx),
        (0xF, _, 0x6, 0x5) => format!("LD   {}, [I={:03X}]", vx, state.i),
        _ => "???".to_string(),
    };

    format!("{:#05X}  {:04X}  {}", pc, op, instruction)
}
