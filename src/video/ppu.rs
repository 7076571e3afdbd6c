use crate::devices::VideoDevice;
use crate::memory::registers::{InterruptFlags, IoRegisters, LcdControl, LcdStatus, RegisterId};
use crate::video::state::State;
use crate::video::{DOTS_PER_SCANLINE, DRAWING_DOTS, OAM_SCAN_DOTS, SCANLINES_PER_FRAME, SCREEN_HEIGHT};

/// Scanline timing only. Keeps LY and the STAT mode/coincidence bits in step
/// with the dot clock; pixels are somebody else's job.
#[derive(Clone)]
pub struct Ppu {
    dots: usize,
    line: u8,
    state: State,
    coincidence: bool,
}

impl Ppu {
    pub fn new() -> Ppu {
        Ppu {
            dots: 0,
            line: 0,
            state: State::HBlank,
            coincidence: false,
        }
    }

    pub fn tick(&mut self, io: &mut dyn IoRegisters, cycles: usize) {
        let lcdc = LcdControl::from(io.get_register(RegisterId::Lcdc));
        if !lcdc.contains(LcdControl::LCD_DISPLAY) {
            // LY is held at 0 and STAT reports HBlank while the LCD is off
            io.set_register(RegisterId::Ly, 0);
            self.write_stat(io);
            return;
        }

        for _ in 0..cycles {
            self.step(io);
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn line(&self) -> u8 {
        self.line
    }

    fn step(&mut self, io: &mut dyn IoRegisters) {
        self.dots += 1;
        let mut changed = false;

        if self.dots == DOTS_PER_SCANLINE {
            self.dots = 0;
            self.line = (self.line + 1) % SCANLINES_PER_FRAME;
            io.set_register(RegisterId::Ly, self.line);
            changed = true;
        }

        let state = self.current_state();
        if state != self.state {
            if state == State::VBlank {
                request_interrupt(io, InterruptFlags::VBLANK);
            }
            self.state = state;
            changed = true;
        }

        if changed {
            let coincidence = self.line == io.get_register(RegisterId::Lyc);
            let stat = LcdStatus::from(io.get_register(RegisterId::Stat));
            if coincidence && !self.coincidence && stat.contains(LcdStatus::LYC_INT) {
                request_interrupt(io, InterruptFlags::LCD_STAT);
            }
            self.coincidence = coincidence;
            self.write_stat(io);
        }
    }

    fn current_state(&self) -> State {
        if self.line as usize >= SCREEN_HEIGHT {
            State::VBlank
        } else if self.dots < OAM_SCAN_DOTS {
            State::OamScan
        } else if self.dots < OAM_SCAN_DOTS + DRAWING_DOTS {
            State::Drawing
        } else {
            State::HBlank
        }
    }

    fn write_stat(&self, io: &mut dyn IoRegisters) {
        let stat = io.get_register(RegisterId::Stat) & !(LcdStatus::MODE | LcdStatus::LYC_EQUAL).bits();
        let mut status = self.state.mode_bits();
        if self.coincidence {
            status |= LcdStatus::LYC_EQUAL.bits();
        }
        io.set_register(RegisterId::Stat, stat | status);
    }
}

impl Default for Ppu {
    fn default() -> Ppu {
        Ppu::new()
    }
}

impl VideoDevice for Ppu {
    fn reset(&mut self) {
        self.dots = 0;
        self.line = 0;
        self.state = State::HBlank;
        self.coincidence = false;
    }
}

fn request_interrupt(io: &mut dyn IoRegisters, interrupt: InterruptFlags) {
    let flags = InterruptFlags::from(io.get_register(RegisterId::If)) | interrupt;
    io.set_register(RegisterId::If, flags.bits());
}
