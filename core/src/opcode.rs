/// # Opcodes
///
/// An instruction word is two big-endian bytes, read as four nibbles `(f, x, y, n)`.
/// `from_op` matches on the whole tuple; which nibbles it looks at depends on the family:
/// - `f` alone for families with a single instruction (`1nnn`, `6xkk`, `Dxyn`, ...)
/// - `f` and `n` for the register-to-register families `5xy0`, `8xy_` and `9xy0`
/// - `f` and the low byte for `Ex__` and `Fx__`
/// - all four for `00E0` and `00EE`
///
/// The nibbles that don't select the instruction are its operands:
/// - `x`: register Vx, or the last register of V0..=Vx for Fx55/Fx65
/// - `y`: register Vy
/// - `kk`: an immediate byte
/// - `addr`: a 12-bit address
/// - `n`: the height of a sprite for Dxyn
pub trait Opcode {
    /// `(f, x, y, n)`, the tuple `from_op` matches on
    fn nibbles(&self) -> (u8, u8, u8, u8);

    /// `[f___]` selects the instruction family
    fn family(&self) -> u8;

    /// `[_x__]` as a register index
    fn x(&self) -> usize;

    /// `[__y_]` as a register index
    fn y(&self) -> usize;

    /// `[___n]`
    fn n(&self) -> u8;

    /// `[__kk]`
    fn kk(&self) -> u8;

    /// `[_nnn]`
    fn addr(&self) -> u16;
}

impl Opcode for u16 {
    fn nibbles(&self) -> (u8, u8, u8, u8) {
        (self.family(), self.x() as u8, self.y() as u8, self.n())
    }

    fn family(&self) -> u8 {
        ((self & 0xF000) >> 12) as u8
    }

    fn x(&self) -> usize {
        ((self & 0x0F00) >> 8) as usize
    }

    fn y(&self) -> usize {
        ((self & 0x00F0) >> 4) as usize
    }

    fn n(&self) -> u8 {
        (self & 0x000F) as u8
    }

    fn kk(&self) -> u8 {
        (self & 0x00FF) as u8
    }

    fn addr(&self) -> u16 {
        self & 0x0FFF
    }
}
