use crate::constants::{GLYPH_SIZE, KEY_COUNT, STACK_SIZE};
use crate::error::{Error, Result};
use crate::hardware::Hardware;
use crate::opcode::Opcode;
use crate::quirks::Quirks;
use crate::state::{State, Step};

/// clear
pub fn clr(
    _op: &dyn Opcode,
    state: &mut State,
    hardware: &mut dyn Hardware,
    _quirks: &Quirks,
) -> Result<Step> {
    hardware.clear_screen();
    Ok(state.advance())
}

/// PC = STACK.pop()
pub fn rts(
    _op: &dyn Opcode,
    state: &mut State,
    _hardware: &mut dyn Hardware,
    _quirks: &Quirks,
) -> Result<Step> {
    if state.sp == 0 {
        return Err(Error::StackUnderflow { pc: state.pc });
    }
    state.sp -= 0x1;
    state.pc = state.stack[state.sp as usize];
    Ok(Step::Advanced)
}

/// PC = addr
pub fn jump(
    op: &dyn Opcode,
    state: &mut State,
    _hardware: &mut dyn Hardware,
    _quirks: &Quirks,
) -> Result<Step> {
    state.pc = op.addr();
    Ok(Step::Advanced)
}

/// STACK.push(PC + 2); PC = addr
pub fn call(
    op: &dyn Opcode,
    state: &mut State,
    _hardware: &mut dyn Hardware,
    _quirks: &Quirks,
) -> Result<Step> {
    if state.sp as usize == STACK_SIZE {
        return Err(Error::StackOverflow { pc: state.pc });
    }
    state.stack[state.sp as usize] = state.pc + 0x2;
    state.sp += 0x1;
    state.pc = op.addr();
    Ok(Step::Advanced)
}

/// if Vx == kk then pc += 2
pub fn ske(
    op: &dyn Opcode,
    state: &mut State,
    _hardware: &mut dyn Hardware,
    _quirks: &Quirks,
) -> Result<Step> {
    Ok(state.skip_if(state.v[op.x()] == op.kk()))
}

/// if Vx != kk then pc += 2
pub fn skne(
    op: &dyn Opcode,
    state: &mut State,
    _hardware: &mut dyn Hardware,
    _quirks: &Quirks,
) -> Result<Step> {
    Ok(state.skip_if(state.v[op.x()] != op.kk()))
}

/// if Vx == Vy then pc += 2
pub fn skre(
    op: &dyn Opcode,
    state: &mut State,
    _hardware: &mut dyn Hardware,
    _quirks: &Quirks,
) -> Result<Step> {
    Ok(state.skip_if(state.v[op.x()] == state.v[op.y()]))
}

/// Vx = kk
pub fn load(
    op: &dyn Opcode,
    state: &mut State,
    _hardware: &mut dyn Hardware,
    _quirks: &Quirks,
) -> Result<Step> {
    state.v[op.x()] = op.kk();
    Ok(state.advance())
}

/// Vx += kk
/// Add kk to Vx; allow for overflow but implicitly drop it
pub fn add(
    op: &dyn Opcode,
    state: &mut State,
    _hardware: &mut dyn Hardware,
    _quirks: &Quirks,
) -> Result<Step> {
    state.v[op.x()] = state.v[op.x()].wrapping_add(op.kk());
    Ok(state.advance())
}

/// Vx = Vy
pub fn mv(
    op: &dyn Opcode,
    state: &mut State,
    _hardware: &mut dyn Hardware,
    _quirks: &Quirks,
) -> Result<Step> {
    state.v[op.x()] = state.v[op.y()];
    Ok(state.advance())
}

/// Vx |= Vy
pub fn or(
    op: &dyn Opcode,
    state: &mut State,
    _hardware: &mut dyn Hardware,
    quirks: &Quirks,
) -> Result<Step> {
    state.v[op.x()] |= state.v[op.y()];
    reset_flag(state, quirks);
    Ok(state.advance())
}

/// Vx &= Vy
pub fn and(
    op: &dyn Opcode,
    state: &mut State,
    _hardware: &mut dyn Hardware,
    quirks: &Quirks,
) -> Result<Step> {
    state.v[op.x()] &= state.v[op.y()];
    reset_flag(state, quirks);
    Ok(state.advance())
}

/// Vx ^= Vy
pub fn xor(
    op: &dyn Opcode,
    state: &mut State,
    _hardware: &mut dyn Hardware,
    quirks: &Quirks,
) -> Result<Step> {
    state.v[op.x()] ^= state.v[op.y()];
    reset_flag(state, quirks);
    Ok(state.advance())
}

fn reset_flag(state: &mut State, quirks: &Quirks) {
    if quirks.logic_flag_reset {
        state.v[0xF] = 0x0;
    }
}

/// Vx += Vy; VF = overflow
pub fn addr(
    op: &dyn Opcode,
    state: &mut State,
    _hardware: &mut dyn Hardware,
    _quirks: &Quirks,
) -> Result<Step> {
    let (res, over) = state.v[op.x()].overflowing_add(state.v[op.y()]);
    state.v[op.x()] = res;
    state.v[0xF] = over as u8;
    Ok(state.advance())
}

/// Vx -= Vy; VF = !underflow
pub fn sub(
    op: &dyn Opcode,
    state: &mut State,
    _hardware: &mut dyn Hardware,
    _quirks: &Quirks,
) -> Result<Step> {
    let (res, under) = state.v[op.x()].overflowing_sub(state.v[op.y()]);
    state.v[op.x()] = res;
    state.v[0xF] = !under as u8;
    Ok(state.advance())
}

/// Vx = Vy - Vx; VF = !underflow
pub fn subn(
    op: &dyn Opcode,
    state: &mut State,
    _hardware: &mut dyn Hardware,
    _quirks: &Quirks,
) -> Result<Step> {
    let (res, under) = state.v[op.y()].overflowing_sub(state.v[op.x()]);
    state.v[op.x()] = res;
    state.v[0xF] = !under as u8;
    Ok(state.advance())
}

/// The register a shift reads from
fn shift_source(op: &dyn Opcode, state: &State, quirks: &Quirks) -> u8 {
    if quirks.shift {
        state.v[op.x()]
    } else {
        state.v[op.y()]
    }
}

/// Vx = source / 2; VF = Vx's low bit before the shift
pub fn shr(
    op: &dyn Opcode,
    state: &mut State,
    _hardware: &mut dyn Hardware,
    quirks: &Quirks,
) -> Result<Step> {
    let flag = state.v[op.x()] & 0x1;
    state.v[op.x()] = shift_source(op, state, quirks) >> 1;
    state.v[0xF] = flag;
    Ok(state.advance())
}

/// Vx = source * 2; VF = Vx's high bit before the shift
pub fn shl(
    op: &dyn Opcode,
    state: &mut State,
    _hardware: &mut dyn Hardware,
    quirks: &Quirks,
) -> Result<Step> {
    let flag = state.v[op.x()] >> 7;
    state.v[op.x()] = shift_source(op, state, quirks) << 1;
    state.v[0xF] = flag;
    Ok(state.advance())
}

/// if Vx != Vy then pc +=2
pub fn skrne(
    op: &dyn Opcode,
    state: &mut State,
    _hardware: &mut dyn Hardware,
    _quirks: &Quirks,
) -> Result<Step> {
    Ok(state.skip_if(state.v[op.x()] != state.v[op.y()]))
}

/// I = addr
pub fn loadi(
    op: &dyn Opcode,
    state: &mut State,
    _hardware: &mut dyn Hardware,
    _quirks: &Quirks,
) -> Result<Step> {
    state.i = op.addr();
    Ok(state.advance())
}

/// PC = V0 + addr
pub fn jumpi(
    op: &dyn Opcode,
    state: &mut State,
    _hardware: &mut dyn Hardware,
    _quirks: &Quirks,
) -> Result<Step> {
    state.pc = u16::from(state.v[0x0]) + op.addr();
    Ok(Step::Advanced)
}

/// Vx = rand_byte & kk
pub fn rand(
    op: &dyn Opcode,
    state: &mut State,
    hardware: &mut dyn Hardware,
    _quirks: &Quirks,
) -> Result<Step> {
    state.v[op.x()] = hardware.random_byte() & op.kk();
    Ok(state.advance())
}

/// draw_sprite(x=Vx y=Vy size=n)
/// Hands the sprite at memory i..i+n to the hardware. Sets VF if any pixels were erased
pub fn draw(
    op: &dyn Opcode,
    state: &mut State,
    hardware: &mut dyn Hardware,
    quirks: &Quirks,
) -> Result<Step> {
    let sprite = state.indexed(op.n() as usize)?;
    let collided = hardware.draw_sprite(
        &state.memory[sprite],
        state.v[op.x()],
        state.v[op.y()],
        quirks.wrap,
    );
    state.v[0xF] = collided as u8;
    Ok(state.advance())
}

/// The key named by the low nibble of Vx
fn key(op: &dyn Opcode, state: &State) -> usize {
    state.v[op.x()] as usize % KEY_COUNT
}

/// if Vx.pressed then pc += 2
pub fn skpr(
    op: &dyn Opcode,
    state: &mut State,
    _hardware: &mut dyn Hardware,
    _quirks: &Quirks,
) -> Result<Step> {
    Ok(state.skip_if(state.key_states[key(op, state)]))
}

/// if !Vx.pressed then pc += 2
pub fn skup(
    op: &dyn Opcode,
    state: &mut State,
    _hardware: &mut dyn Hardware,
    _quirks: &Quirks,
) -> Result<Step> {
    Ok(state.skip_if(!state.key_states[key(op, state)]))
}

/// Vx = DT
pub fn moved(
    op: &dyn Opcode,
    state: &mut State,
    _hardware: &mut dyn Hardware,
    _quirks: &Quirks,
) -> Result<Step> {
    state.v[op.x()] = state.delay_timer;
    Ok(state.advance())
}

/// await keypress for Vx
/// Leaves the pc where it is until the host records a key, so this runs again next step
pub fn keyd(
    op: &dyn Opcode,
    state: &mut State,
    _hardware: &mut dyn Hardware,
    _quirks: &Quirks,
) -> Result<Step> {
    match state.last_key {
        None => Ok(Step::AwaitingKey),
        Some(key) if key as usize >= KEY_COUNT => Err(Error::InvalidKey { key }),
        Some(key) => {
            state.v[op.x()] = key;
            Ok(state.advance())
        }
    }
}

/// DT = Vx
pub fn loads(
    op: &dyn Opcode,
    state: &mut State,
    _hardware: &mut dyn Hardware,
    _quirks: &Quirks,
) -> Result<Step> {
    state.delay_timer = state.v[op.x()];
    Ok(state.advance())
}

/// ST = Vx
pub fn ld(
    op: &dyn Opcode,
    state: &mut State,
    _hardware: &mut dyn Hardware,
    _quirks: &Quirks,
) -> Result<Step> {
    state.sound_timer = state.v[op.x()];
    Ok(state.advance())
}

/// I += Vx; VF = I > 0xFFF
pub fn addi(
    op: &dyn Opcode,
    state: &mut State,
    _hardware: &mut dyn Hardware,
    _quirks: &Quirks,
) -> Result<Step> {
    state.i = state.i.wrapping_add(u16::from(state.v[op.x()]));
    state.v[0xF] = (state.i > 0xFFF) as u8;
    Ok(state.advance())
}

/// I = Vx * 5
/// Set I to the memory address of the glyph for Vx
/// See constants::TYPOGRAPHY for more details
pub fn ldspr(
    op: &dyn Opcode,
    state: &mut State,
    _hardware: &mut dyn Hardware,
    _quirks: &Quirks,
) -> Result<Step> {
    state.i = u16::from(state.v[op.x()]) * GLYPH_SIZE as u16;
    Ok(state.advance())
}

/// mem[I..I+3] = bcd(Vx)
/// Store BCD repr of Vx in memory starting at address i
pub fn bcd(
    op: &dyn Opcode,
    state: &mut State,
    _hardware: &mut dyn Hardware,
    _quirks: &Quirks,
) -> Result<Step> {
    let vx = state.v[op.x()];
    let range = state.indexed(3)?;
    state.memory[range].copy_from_slice(&[vx / 100, vx / 10 % 10, vx % 10]);
    Ok(state.advance())
}

/// mem[I..=I+x] = V0..=Vx
/// Fill memory starting at address i with V0..=Vx
pub fn stor(
    op: &dyn Opcode,
    state: &mut State,
    _hardware: &mut dyn Hardware,
    quirks: &Quirks,
) -> Result<Step> {
    let range = state.indexed(op.x() + 1)?;
    state.memory[range].copy_from_slice(&state.v[..=op.x()]);
    advance_index(op, state, quirks);
    Ok(state.advance())
}

/// V0..=Vx = mem[I..=I+x]
/// Fill V0..=Vx with memory starting at address i
pub fn read(
    op: &dyn Opcode,
    state: &mut State,
    _hardware: &mut dyn Hardware,
    quirks: &Quirks,
) -> Result<Step> {
    let range = state.indexed(op.x() + 1)?;
    state.v[..=op.x()].copy_from_slice(&state.memory[range]);
    advance_index(op, state, quirks);
    Ok(state.advance())
}

fn advance_index(op: &dyn Opcode, state: &mut State, quirks: &Quirks) {
    if !quirks.load_store {
        state.i = state.i.wrapping_add(op.x() as u16 + 1);
    }
}
