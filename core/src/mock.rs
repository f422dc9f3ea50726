use crate::hardware::Hardware;

/// Records the calls the CPU makes into the hardware
#[derive(Default)]
pub struct MockHardware {
    pub clears: usize,
    pub sprites: Vec<(Vec<u8>, u8, u8, bool)>,
    pub collide: bool,
    pub random: u8,
}

impl Hardware for MockHardware {
    fn draw_sprite(&mut self, sprite: &[u8], x: u8, y: u8, wrap: bool) -> bool {
        self.sprites.push((sprite.to_vec(), x, y, wrap));
        self.collide
    }

    fn clear_screen(&mut self) {
        self.clears += 1;
    }

    fn random_byte(&mut self) -> u8 {
        self.random
    }
}
