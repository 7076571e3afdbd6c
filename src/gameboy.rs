use crate::dma::DmaController;
use crate::error::AyyError;
use crate::joypad::{Button, Joypad};
use crate::lr35902::timer::Timer;
use crate::memory::cartridge::{BootRom, CartridgeSource};
use crate::memory::mmu::Mmu;
use crate::video::ppu::Ppu;
use crate::video::screen::Screen;
use std::cell::RefCell;
use std::rc::Rc;

/// Owns the devices and the bus. The MMU only holds weak handles to the
/// devices, so they live exactly as long as this session.
pub struct GameBoy {
    mmu: Mmu,
    timer: Rc<RefCell<Timer>>,
    dma: Rc<RefCell<DmaController>>,
    ppu: Rc<RefCell<Ppu>>,
    screen: Rc<RefCell<Screen>>,
    joypad: Rc<RefCell<Joypad>>,
}

impl GameBoy {
    pub fn new(cartridge: Box<dyn CartridgeSource>, bootrom: Option<BootRom>) -> Result<GameBoy, AyyError> {
        let skip_boot = bootrom.is_none();
        let mut mmu = Mmu::new(cartridge, bootrom)?;

        let timer = Rc::new(RefCell::new(Timer::new()));
        let dma = Rc::new(RefCell::new(DmaController::new()));
        let ppu = Rc::new(RefCell::new(Ppu::new()));
        let screen = Rc::new(RefCell::new(Screen::new()));
        let joypad = Rc::new(RefCell::new(Joypad::new()));

        mmu.set_input(joypad.clone());
        mmu.set_timer(timer.clone());
        mmu.set_video(ppu.clone());
        mmu.set_display(screen.clone());
        mmu.set_dma(dma.clone());
        mmu.initialize_registers()?;

        if skip_boot {
            mmu.apply_post_boot_state();
        }

        Ok(GameBoy {
            mmu,
            timer,
            dma,
            ppu,
            screen,
            joypad,
        })
    }

    /// Advances every device by `cycles` T-cycles.
    pub fn tick(&mut self, cycles: usize) {
        self.timer.borrow_mut().tick(&mut self.mmu, cycles);
        self.dma.borrow_mut().tick(&mut self.mmu, cycles);
        self.ppu.borrow_mut().tick(&mut self.mmu, cycles);
    }

    pub fn mmu(&self) -> &Mmu {
        &self.mmu
    }

    pub fn mmu_mut(&mut self) -> &mut Mmu {
        &mut self.mmu
    }

    pub fn update_button(&mut self, button: Button, pressed: bool) {
        self.joypad.borrow_mut().update_button(button, pressed);
    }

    pub fn timer(&self) -> &Rc<RefCell<Timer>> {
        &self.timer
    }

    pub fn dma(&self) -> &Rc<RefCell<DmaController>> {
        &self.dma
    }

    pub fn ppu(&self) -> &Rc<RefCell<Ppu>> {
        &self.ppu
    }

    pub fn screen(&self) -> &Rc<RefCell<Screen>> {
        &self.screen
    }

    pub fn serial_output(&self) -> &str {
        self.mmu.serial_output()
    }
}
