/// # Hardware
/// Every operation a Chip-8 instruction can kick off outside of the CPU itself.
///
/// The host owns the display and the source of randomness; the CPU only calls into them.
pub trait Hardware {
    /// XORs `sprite` onto the screen with its top left corner at (x mod width, y mod height).
    ///
    /// Each byte of `sprite` is one row of 8 pixels, most significant bit leftmost.
    /// Pixels that fall off the screen wrap around when `wrap` is set and are clipped otherwise.
    ///
    /// Returns whether any pixel that was set got unset.
    fn draw_sprite(&mut self, sprite: &[u8], x: u8, y: u8, wrap: bool) -> bool;

    /// Unsets every pixel on the screen.
    fn clear_screen(&mut self);

    /// A uniformly distributed byte.
    fn random_byte(&mut self) -> u8;
}
