pub mod palette;
pub mod ppu;
pub mod screen;
pub mod state;

pub const SCREEN_WIDTH: usize = 160;
pub const SCREEN_HEIGHT: usize = 144;

pub const DOTS_PER_SCANLINE: usize = 456;
pub const SCANLINES_PER_FRAME: u8 = 154;
pub const OAM_SCAN_DOTS: usize = 80;
pub const DRAWING_DOTS: usize = 172;
