/// # Quirks
/// Toggles reproducing the deviations of specific historical interpreters that some ROMs rely on.
///
/// The defaults match the behavior most modern ROMs expect.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Quirks {
    /// 8xy6/8xyE shift Vx in place rather than shifting Vy into Vx
    pub shift: bool,
    /// Fx55/Fx65 leave I untouched rather than advancing it past the last register
    pub load_store: bool,
    /// Sprites drawn past the edge of the screen wrap around rather than being clipped.
    /// Only consulted by the drawing hardware.
    pub wrap: bool,
    /// 8xy1/8xy2/8xy3 clear VF
    pub logic_flag_reset: bool,
}

impl Default for Quirks {
    fn default() -> Self {
        Quirks {
            shift: true,
            load_store: true,
            wrap: true,
            logic_flag_reset: true,
        }
    }
}
