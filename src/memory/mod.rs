pub mod cartridge;
pub mod mem_register;
pub mod mmu;
pub mod registers;
pub mod storage;

pub const MEMORY_SIZE: usize = 0x10000;

// Fixed cartridge window. Bus writes never land here.
pub const ROM_START: u16 = 0x0000;
pub const ROM_END: u16 = 0x7fff;
pub const ROM_SIZE: usize = 0x8000;

pub const BOOTROM_SIZE: usize = 0x100;

pub const WORK_RAM_MIRRORED_START: u16 = 0xc000;
pub const WORK_RAM_MIRRORED_END: u16 = 0xddff;
pub const ECHO_RAM_START: u16 = 0xe000;
pub const ECHO_RAM_END: u16 = 0xfdff;
pub const ECHO_RAM_OFFSET: u16 = 0x2000;

pub const OAM_START: u16 = 0xfe00;
pub const OAM_SIZE: u16 = 0xa0;

pub const JOYPAD_REGISTER: u16 = 0xff00;
pub const SERIAL_DATA_REGISTER: u16 = 0xff01;
pub const DIV_LSB_REGISTER: u16 = 0xff03;
pub const DIV_REGISTER: u16 = 0xff04;
pub const TIMA_REGISTER: u16 = 0xff05;
pub const TMA_REGISTER: u16 = 0xff06;
pub const TAC_REGISTER: u16 = 0xff07;
pub const INTERRUPT_FLAGS_REGISTER: u16 = 0xff0f;
pub const LCD_CONTROL_REGISTER: u16 = 0xff40;
pub const LCD_STATUS_REGISTER: u16 = 0xff41;
pub const SCROLL_Y_REGISTER: u16 = 0xff42;
pub const SCROLL_X_REGISTER: u16 = 0xff43;
pub const SCANLINE_Y_REGISTER: u16 = 0xff44;
pub const SCANLINE_Y_COMPARE_REGISTER: u16 = 0xff45;
pub const OAM_DMA_REGISTER: u16 = 0xff46;
pub const BG_PALETTE_REGISTER: u16 = 0xff47;
pub const OBJ0_PALETTE_REGISTER: u16 = 0xff48;
pub const OBJ1_PALETTE_REGISTER: u16 = 0xff49;
pub const BOOTROM_MAPPER_REGISTER: u16 = 0xff50;
pub const INTERRUPT_ENABLE_REGISTER: u16 = 0xffff;

// Highest page OAM DMA accepts as a source.
pub const OAM_DMA_MAX_SOURCE_PAGE: u8 = 0xf1;
