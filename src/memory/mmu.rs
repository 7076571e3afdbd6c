use crate::devices::{DisplaySurface, DmaDevice, InputSource, Peripherals, TimerDevice, VideoDevice};
use crate::error::{AyyError, InvalidAddressRangeSnafu, RegistersAlreadyInitializedSnafu};
use crate::memory::cartridge::{BootRom, CartridgeSource};
use crate::memory::mem_register::{MemRegister, Quirk, WriteEffect};
use crate::memory::registers::{IoRegisters, RegisterId};
use crate::memory::storage::Memory;
use crate::memory::*;
use log::{debug, error, info, trace};
use snafu::prelude::*;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

#[derive(Clone)]
pub struct Mmu {
    memory: Memory,
    registers: BTreeMap<u16, MemRegister>,
    peripherals: Peripherals,
    cartridge: Box<dyn CartridgeSource>,
    bootrom: Option<BootRom>,
    serial: String,
}

impl Mmu {
    /// Loads the cartridge into the fixed ROM window and overlays the boot ROM
    /// on top of it. Registers are not bound until
    /// [`initialize_registers`](Mmu::initialize_registers) runs.
    pub fn new(cartridge: Box<dyn CartridgeSource>, bootrom: Option<BootRom>) -> Result<Mmu, AyyError> {
        let mut mmu = Mmu {
            memory: Memory::new(),
            registers: BTreeMap::new(),
            peripherals: Peripherals::new(),
            cartridge,
            bootrom,
            serial: String::new(),
        };

        mmu.load_cartridge()?;
        if let Some(bootrom) = &mmu.bootrom {
            mmu.memory.write_bytes(ROM_START, bootrom.data());
            debug!("Boot ROM mapped ({} bytes)", bootrom.data().len());
        }

        Ok(mmu)
    }

    pub fn set_timer(&mut self, timer: Rc<RefCell<dyn TimerDevice>>) {
        self.peripherals.set_timer(timer);
    }

    pub fn set_video(&mut self, video: Rc<RefCell<dyn VideoDevice>>) {
        self.peripherals.set_video(video);
    }

    pub fn set_display(&mut self, display: Rc<RefCell<dyn DisplaySurface>>) {
        self.peripherals.set_display(display);
    }

    pub fn set_input(&mut self, input: Rc<RefCell<dyn InputSource>>) {
        self.peripherals.set_input(input);
    }

    pub fn set_dma(&mut self, dma: Rc<RefCell<dyn DmaDevice>>) {
        self.peripherals.set_dma(dma);
    }

    /// Binds every register to its address. Devices have to be attached first
    /// since the quirks capture them here.
    pub fn initialize_registers(&mut self) -> Result<(), AyyError> {
        ensure!(self.registers.is_empty(), RegistersAlreadyInitializedSnafu);

        let groups = [
            self.joypad_registers()?,
            self.timer_registers()?,
            self.video_registers()?,
            self.interrupt_registers()?,
            self.control_registers()?,
        ];

        for register in groups.into_iter().flatten() {
            let previous = self.registers.insert(register.address(), register);
            debug_assert!(previous.is_none(), "two registers bound to one address");
        }

        debug!("Bound {} memory registers", self.registers.len());
        Ok(())
    }

    fn joypad_registers(&self) -> Result<Vec<MemRegister>, AyyError> {
        Ok(vec![MemRegister::new(RegisterId::Joyp, Quirk::Joypad(self.peripherals.input()?))])
    }

    fn timer_registers(&self) -> Result<Vec<MemRegister>, AyyError> {
        let timer = self.peripherals.timer()?;
        Ok(vec![
            MemRegister::new(RegisterId::DivLsb, Quirk::DividerLsb(timer.clone())),
            MemRegister::new(RegisterId::Div, Quirk::Divider(timer.clone())),
            MemRegister::new(RegisterId::Tima, Quirk::TimerCounter(timer.clone())),
            MemRegister::new(RegisterId::Tma, Quirk::TimerModulo(timer.clone())),
            MemRegister::new(RegisterId::Tac, Quirk::TimerControl(timer)),
        ])
    }

    fn video_registers(&self) -> Result<Vec<MemRegister>, AyyError> {
        let lcd_control = Quirk::LcdControl {
            video: self.peripherals.video()?,
            display: self.peripherals.display()?,
        };
        Ok(vec![
            MemRegister::new(RegisterId::Lcdc, lcd_control),
            MemRegister::new(RegisterId::Stat, Quirk::LcdStatus),
            MemRegister::plain(RegisterId::Scy),
            MemRegister::plain(RegisterId::Scx),
            MemRegister::plain(RegisterId::Ly),
            MemRegister::plain(RegisterId::Lyc),
            MemRegister::plain(RegisterId::Bgp),
            MemRegister::plain(RegisterId::Obp0),
            MemRegister::plain(RegisterId::Obp1),
        ])
    }

    fn interrupt_registers(&self) -> Result<Vec<MemRegister>, AyyError> {
        Ok(vec![
            MemRegister::new(RegisterId::If, Quirk::InterruptFlags(self.peripherals.timer()?)),
            MemRegister::plain(RegisterId::Ie),
        ])
    }

    fn control_registers(&self) -> Result<Vec<MemRegister>, AyyError> {
        Ok(vec![
            MemRegister::new(RegisterId::Dma, Quirk::OamDma(self.peripherals.dma()?)),
            MemRegister::new(RegisterId::BootRomDisable, Quirk::BootRomDisable),
        ])
    }

    pub fn read_byte(&self, addr: u16) -> u8 {
        match self.registers.get(&addr) {
            Some(register) => register.controlled_read(&self.memory),
            None => self.memory.read_byte(addr),
        }
    }

    pub fn write_byte(&mut self, addr: u16, data: u8) {
        if (ROM_START..=ROM_END).contains(&addr) {
            return;
        }

        if addr == SERIAL_DATA_REGISTER {
            trace!("Serial: {:?}", data as char);
            self.serial.push(data as char);
        }

        if let Some(register) = self.registers.get(&addr) {
            if register.controlled_write(&mut self.memory, data) == WriteEffect::ReloadCartridge {
                self.unmap_bootrom();
            }
            return;
        }

        self.memory.write_byte(addr, data);
        match addr {
            WORK_RAM_MIRRORED_START..=WORK_RAM_MIRRORED_END => self.memory.write_byte(addr + ECHO_RAM_OFFSET, data),
            ECHO_RAM_START..=ECHO_RAM_END => self.memory.write_byte(addr - ECHO_RAM_OFFSET, data),
            _ => {}
        }
    }

    pub fn read16(&self, addr: u16) -> u16 {
        let lo = self.read_byte(addr) as u16;
        let hi = self.read_byte(addr.wrapping_add(1)) as u16;
        (hi << 8) | lo
    }

    pub fn write16(&mut self, addr: u16, data: u16) {
        let [lo, hi] = data.to_le_bytes();
        self.write_byte(addr, lo);
        self.write_byte(addr.wrapping_add(1), hi);
    }

    /// Reads `start..=end` through the bus, quirks included.
    pub fn dump(&self, start: u16, end: u16) -> Result<Vec<u8>, AyyError> {
        ensure!(start <= end, InvalidAddressRangeSnafu { start, end });
        Ok((start..=end).map(|addr| self.read_byte(addr)).collect())
    }

    /// Which register, if any, the bus dispatches `addr` to.
    pub fn register_at(&self, addr: u16) -> Option<RegisterId> {
        self.registers.get(&addr).map(MemRegister::id)
    }

    /// Replaces the whole ROM window with the cartridge image, zero padded.
    /// Anything past 0x8000 is left to whatever handles banking.
    pub fn load_cartridge(&mut self) -> Result<(), AyyError> {
        let rom = self.cartridge.load()?;
        let len = rom.len().min(ROM_SIZE);
        let mut window = vec![0u8; ROM_SIZE];
        window[..len].copy_from_slice(&rom[..len]);
        self.memory.write_bytes(ROM_START, &window);
        info!("Loaded cartridge {} ({} bytes)", self.cartridge.name(), rom.len());
        Ok(())
    }

    fn unmap_bootrom(&mut self) {
        debug!("Boot ROM disabled, restoring cartridge");
        // The bus has no error path; keep whatever is mapped.
        if let Err(e) = self.load_cartridge() {
            error!("Failed to reload cartridge after boot ROM: {}", e);
        }
    }

    pub fn is_bootrom_mapped(&self) -> bool {
        self.bootrom.is_some() && self.get_register(RegisterId::BootRomDisable) != 0x01
    }

    /// Register state the DMG boot ROM leaves behind, for sessions started
    /// without one.
    pub fn apply_post_boot_state(&mut self) {
        const POST_BOOT: [(RegisterId, u8); 19] = [
            (RegisterId::Joyp, 0xcf),
            (RegisterId::DivLsb, 0x00),
            (RegisterId::Div, 0xab),
            (RegisterId::Tima, 0x00),
            (RegisterId::Tma, 0x00),
            (RegisterId::Tac, 0xf8),
            (RegisterId::If, 0xe1),
            (RegisterId::Lcdc, 0x91),
            (RegisterId::Stat, 0x85),
            (RegisterId::Scy, 0x00),
            (RegisterId::Scx, 0x00),
            (RegisterId::Ly, 0x00),
            (RegisterId::Lyc, 0x00),
            (RegisterId::Dma, 0xff),
            (RegisterId::Bgp, 0xfc),
            (RegisterId::Obp0, 0xff),
            (RegisterId::Obp1, 0xff),
            (RegisterId::BootRomDisable, 0x01),
            (RegisterId::Ie, 0x00),
        ];

        for (id, data) in POST_BOOT {
            self.set_register(id, data);
        }
    }

    pub fn serial_output(&self) -> &str {
        &self.serial
    }

    pub fn take_serial_output(&mut self) -> String {
        std::mem::take(&mut self.serial)
    }
}

impl IoRegisters for Mmu {
    fn get_register(&self, id: RegisterId) -> u8 {
        match self.registers.get(&id.address()) {
            Some(register) => register.read(&self.memory),
            None => id.read(&self.memory),
        }
    }

    fn set_register(&mut self, id: RegisterId, data: u8) {
        match self.registers.get(&id.address()) {
            Some(register) => register.write(&mut self.memory, data),
            None => id.write(&mut self.memory, data),
        }
    }
}
