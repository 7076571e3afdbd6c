pub mod devices;
pub mod dma;
pub mod error;
pub mod gameboy;
pub mod joypad;
pub mod lr35902;
pub mod memory;
pub mod video;
