use crate::memory::storage::Memory;
use crate::memory::*;
use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct InterruptFlags: u8 {
        const VBLANK    = 0b00001;
        const LCD_STAT  = 0b00010;
        const TIMER     = 0b00100;
        const SERIAL    = 0b01000;
        const JOYPAD    = 0b10000;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct LcdControl: u8 {
        const BG_DISPLAY = 0b0000_0001;
        const OBJ_DISPLAY = 0b0000_0010;
        const OBJ_SIZE = 0b0000_0100;
        const BG_TILE_MAP = 0b0000_1000;
        const BG_TILE_DATA = 0b0001_0000;
        const WINDOW_DISPLAY = 0b0010_0000;
        const WINDOW_TILE_MAP = 0b0100_0000;
        const LCD_DISPLAY = 0b1000_0000;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct LcdStatus: u8 {
        const MODE = 0b0000_0011;
        const LYC_EQUAL = 0b0000_0100;
        const HBLANK_INT = 0b0000_1000;
        const VBLANK_INT = 0b0001_0000;
        const OAM_INT = 0b0010_0000;
        const LYC_INT = 0b0100_0000;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TimerControl: u8 {
        const CLOCK_SELECT = 0b011;
        const ENABLE = 0b100;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct JoypadSelect: u8 {
        const DIRECTIONS = 0b0001_0000;
        const BUTTONS = 0b0010_0000;
    }
}

impl From<u8> for InterruptFlags {
    fn from(byte: u8) -> Self {
        Self::from_bits_truncate(byte)
    }
}

impl From<u8> for LcdControl {
    fn from(byte: u8) -> Self {
        Self::from_bits_truncate(byte)
    }
}

impl From<u8> for LcdStatus {
    fn from(byte: u8) -> Self {
        Self::from_bits_truncate(byte)
    }
}

impl From<u8> for TimerControl {
    fn from(byte: u8) -> Self {
        Self::from_bits_truncate(byte)
    }
}

impl LcdControl {
    // Bits whose clearing turns the display path off.
    pub const DISPLAY_ENABLE_MASK: LcdControl = LcdControl::LCD_DISPLAY.union(LcdControl::WINDOW_TILE_MAP);

    pub fn display_enabled(self) -> bool {
        self.intersects(Self::DISPLAY_ENABLE_MASK)
    }
}

impl LcdStatus {
    /// Bits the bus is allowed to replace.
    pub const WRITABLE: LcdStatus = LcdStatus::HBLANK_INT
        .union(LcdStatus::VBLANK_INT)
        .union(LcdStatus::OAM_INT)
        .union(LcdStatus::LYC_INT);
}

impl TimerControl {
    pub fn enabled(self) -> bool {
        self.contains(TimerControl::ENABLE)
    }

    /// Index of the divider bit whose falling edge clocks TIMA.
    pub fn divider_bit(self) -> u16 {
        match (self & TimerControl::CLOCK_SELECT).bits() {
            0b00 => 9,
            0b01 => 3,
            0b10 => 5,
            0b11 => 7,
            _ => unreachable!(),
        }
    }
}

/// Identity of every memory-mapped register the bus knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RegisterId {
    Joyp,
    DivLsb,
    Div,
    Tima,
    Tma,
    Tac,
    If,
    Lcdc,
    Stat,
    Scy,
    Scx,
    Ly,
    Lyc,
    Dma,
    Bgp,
    Obp0,
    Obp1,
    BootRomDisable,
    Ie,
}

impl RegisterId {
    pub const ALL: [RegisterId; 19] = [
        RegisterId::Joyp,
        RegisterId::DivLsb,
        RegisterId::Div,
        RegisterId::Tima,
        RegisterId::Tma,
        RegisterId::Tac,
        RegisterId::If,
        RegisterId::Lcdc,
        RegisterId::Stat,
        RegisterId::Scy,
        RegisterId::Scx,
        RegisterId::Ly,
        RegisterId::Lyc,
        RegisterId::Dma,
        RegisterId::Bgp,
        RegisterId::Obp0,
        RegisterId::Obp1,
        RegisterId::BootRomDisable,
        RegisterId::Ie,
    ];

    pub const fn address(self) -> u16 {
        match self {
            RegisterId::Joyp => JOYPAD_REGISTER,
            RegisterId::DivLsb => DIV_LSB_REGISTER,
            RegisterId::Div => DIV_REGISTER,
            RegisterId::Tima => TIMA_REGISTER,
            RegisterId::Tma => TMA_REGISTER,
            RegisterId::Tac => TAC_REGISTER,
            RegisterId::If => INTERRUPT_FLAGS_REGISTER,
            RegisterId::Lcdc => LCD_CONTROL_REGISTER,
            RegisterId::Stat => LCD_STATUS_REGISTER,
            RegisterId::Scy => SCROLL_Y_REGISTER,
            RegisterId::Scx => SCROLL_X_REGISTER,
            RegisterId::Ly => SCANLINE_Y_REGISTER,
            RegisterId::Lyc => SCANLINE_Y_COMPARE_REGISTER,
            RegisterId::Dma => OAM_DMA_REGISTER,
            RegisterId::Bgp => BG_PALETTE_REGISTER,
            RegisterId::Obp0 => OBJ0_PALETTE_REGISTER,
            RegisterId::Obp1 => OBJ1_PALETTE_REGISTER,
            RegisterId::BootRomDisable => BOOTROM_MAPPER_REGISTER,
            RegisterId::Ie => INTERRUPT_ENABLE_REGISTER,
        }
    }

    // Unused bits that always read back as 1.
    #[inline]
    const fn forced_bits(self) -> u8 {
        match self {
            RegisterId::Joyp => 0b1100_0000,
            RegisterId::If | RegisterId::Ie => 0b1110_0000,
            RegisterId::Stat => 0b1000_0000,
            _ => 0,
        }
    }

    /// Plain storage read: the stored byte with the forced bits applied.
    #[inline]
    pub fn read(self, memory: &Memory) -> u8 {
        memory.read_byte(self.address()) | self.forced_bits()
    }

    /// Plain storage write, no device side effects.
    #[inline]
    pub fn write(self, memory: &mut Memory, data: u8) {
        memory.write_byte(self.address(), data | self.forced_bits());
    }
}

impl std::fmt::Display for RegisterId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            RegisterId::Joyp => "JOYP",
            RegisterId::DivLsb => "DIVLSB",
            RegisterId::Div => "DIV",
            RegisterId::Tima => "TIMA",
            RegisterId::Tma => "TMA",
            RegisterId::Tac => "TAC",
            RegisterId::If => "IF",
            RegisterId::Lcdc => "LCDC",
            RegisterId::Stat => "STAT",
            RegisterId::Scy => "SCY",
            RegisterId::Scx => "SCX",
            RegisterId::Ly => "LY",
            RegisterId::Lyc => "LYC",
            RegisterId::Dma => "DMA",
            RegisterId::Bgp => "BGP",
            RegisterId::Obp0 => "OBP0",
            RegisterId::Obp1 => "OBP1",
            RegisterId::BootRomDisable => "BOOT",
            RegisterId::Ie => "IE",
        };
        write!(f, "{}", name)
    }
}

/// Identity-keyed register access that skips bus quirks. Devices use this to
/// update their own registers.
pub trait IoRegisters {
    fn get_register(&self, id: RegisterId) -> u8;
    fn set_register(&mut self, id: RegisterId, data: u8);
}

impl IoRegisters for Memory {
    #[inline]
    fn get_register(&self, id: RegisterId) -> u8 {
        id.read(self)
    }

    #[inline]
    fn set_register(&mut self, id: RegisterId, data: u8) {
        id.write(self, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addresses_are_unique() {
        for (i, a) in RegisterId::ALL.iter().enumerate() {
            for b in &RegisterId::ALL[i + 1..] {
                assert_ne!(a.address(), b.address(), "{} and {} collide", a, b);
            }
        }
    }

    #[test]
    fn every_identity_lives_in_io_space() {
        for id in RegisterId::ALL {
            assert!(id.address() >= JOYPAD_REGISTER, "{} outside I/O space", id);
            assert_ne!(id.address(), SERIAL_DATA_REGISTER);
        }
    }

    #[test]
    fn forced_bits_survive_a_zero_write() {
        let mut memory = Memory::new();
        memory.set_register(RegisterId::If, 0x00);
        memory.set_register(RegisterId::Ie, 0x00);
        memory.set_register(RegisterId::Joyp, 0x00);
        memory.set_register(RegisterId::Stat, 0x00);
        memory.set_register(RegisterId::Scx, 0x00);

        assert_eq!(memory.get_register(RegisterId::If), 0xe0);
        assert_eq!(memory.get_register(RegisterId::Ie), 0xe0);
        assert_eq!(memory.get_register(RegisterId::Joyp), 0xc0);
        assert_eq!(memory.get_register(RegisterId::Stat), 0x80);
        assert_eq!(memory.get_register(RegisterId::Scx), 0x00);
    }

    #[test]
    fn timer_divider_bit_follows_clock_select() {
        assert_eq!(TimerControl::from(0b100).divider_bit(), 9);
        assert_eq!(TimerControl::from(0b101).divider_bit(), 3);
        assert_eq!(TimerControl::from(0b110).divider_bit(), 5);
        assert_eq!(TimerControl::from(0b111).divider_bit(), 7);
        assert!(!TimerControl::from(0b011).enabled());
    }

    #[test]
    fn lcd_display_enable_covers_top_two_bits() {
        assert!(LcdControl::from(0x80).display_enabled());
        assert!(LcdControl::from(0x40).display_enabled());
        assert!(!LcdControl::from(0x3f).display_enabled());
        assert_eq!(LcdStatus::WRITABLE.bits(), 0x78);
    }
}
