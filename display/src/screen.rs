use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use chip8_core::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use chip8_core::Hardware;

/// The FrameBuffer is indexed as [y][x]
pub type FrameBuffer = [[u8; DISPLAY_WIDTH]; DISPLAY_HEIGHT];

/// # Screen
/// The hardware a Chip-8 program draws on.
///
/// Owns the pixels of the 64x32 display, where each pixel is either on (1) or off (0),
/// along with the source of random bytes.
pub struct Screen {
    frame_buffer: FrameBuffer,
    draw_flag: bool,
    rng: SmallRng,
}

impl Screen {
    pub fn new() -> Self {
        Screen::with_rng(SmallRng::from_entropy())
    }

    /// A screen whose random bytes are reproducible
    pub fn seeded(seed: u64) -> Self {
        Screen::with_rng(SmallRng::seed_from_u64(seed))
    }

    fn with_rng(rng: SmallRng) -> Self {
        Screen {
            frame_buffer: [[0; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
            draw_flag: true,
            rng,
        }
    }

    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.frame_buffer
    }

    /// Returns the FrameBuffer if the display should be redrawn, unsetting the draw flag
    pub fn take_frame(&mut self) -> Option<FrameBuffer> {
        if self.draw_flag {
            self.draw_flag = false;
            Some(self.frame_buffer)
        } else {
            None
        }
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

impl Hardware for Screen {
    /// XORs a sprite onto the FrameBuffer at position x, y.
    /// The origin always wraps; the rest of the sprite wraps or is clipped depending on `wrap`.
    fn draw_sprite(&mut self, sprite: &[u8], x: u8, y: u8, wrap: bool) -> bool {
        let x = x as usize % DISPLAY_WIDTH;
        let y = y as usize % DISPLAY_HEIGHT;
        let mut collided = false;

        for (row, byte) in sprite.iter().enumerate() {
            let mut py = y + row;
            if py >= DISPLAY_HEIGHT {
                if !wrap {
                    break;
                }
                py %= DISPLAY_HEIGHT;
            }
            for bit in 0..8 {
                let pixel_value = (byte >> (7 - bit)) & 1;
                if pixel_value == 0 {
                    continue;
                }
                let mut px = x + bit;
                if px >= DISPLAY_WIDTH {
                    if !wrap {
                        break;
                    }
                    px %= DISPLAY_WIDTH;
                }
                collided |= self.frame_buffer[py][px] == 1;
                self.frame_buffer[py][px] ^= pixel_value;
            }
        }

        self.draw_flag = true;
        collided
    }

    fn clear_screen(&mut self) {
        self.frame_buffer = [[0; DISPLAY_WIDTH]; DISPLAY_HEIGHT];
        self.draw_flag = true;
    }

    fn random_byte(&mut self) -> u8 {
        self.rng.gen()
    }
}
