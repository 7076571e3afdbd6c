use crate::devices::DisplaySurface;
use crate::video::palette::Palette;
use crate::video::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// Shade buffer the frontend presents. Only cleared by the bus; drawing into
/// it belongs to the pixel pipeline.
#[derive(Clone)]
pub struct Screen {
    pixels: Box<[[Palette; SCREEN_WIDTH]; SCREEN_HEIGHT]>,
}

impl Screen {
    pub fn new() -> Screen {
        Screen {
            pixels: Box::new([[Palette::default(); SCREEN_WIDTH]; SCREEN_HEIGHT]),
        }
    }

    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, palette: Palette) {
        self.pixels[y][x] = palette;
    }

    pub fn is_blank(&self) -> bool {
        self.pixels.iter().flatten().all(|&p| p == Palette::White)
    }
}

impl Default for Screen {
    fn default() -> Screen {
        Screen::new()
    }
}

impl DisplaySurface for Screen {
    fn clear(&mut self) {
        for row in self.pixels.iter_mut() {
            row.fill(Palette::White);
        }
    }
}
