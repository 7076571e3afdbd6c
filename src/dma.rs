use crate::devices::DmaDevice;
use crate::lr35902::T_CYCLES_PER_M_CYCLE;
use crate::memory::mmu::Mmu;
use crate::memory::{OAM_SIZE, OAM_START};
use log::debug;

/// OAM DMA: copies 160 bytes from `source` into OAM, one byte per machine
/// cycle. A new trigger restarts the transfer.
#[derive(Clone)]
pub struct DmaController {
    source: u16,
    copied: Option<u16>,
    cycles: usize,
    transfers: usize,
}

impl DmaController {
    pub fn new() -> DmaController {
        DmaController {
            source: 0,
            copied: None,
            cycles: 0,
            transfers: 0,
        }
    }

    pub fn tick(&mut self, mmu: &mut Mmu, cycles: usize) {
        let Some(mut copied) = self.copied else {
            return;
        };

        self.cycles += cycles;
        while self.cycles >= T_CYCLES_PER_M_CYCLE && copied < OAM_SIZE {
            let data = mmu.read_byte(self.source.wrapping_add(copied));
            mmu.write_byte(OAM_START + copied, data);
            copied += 1;
            self.cycles -= T_CYCLES_PER_M_CYCLE;
        }

        if copied == OAM_SIZE {
            debug!("OAM DMA from ${:04x} finished", self.source);
            self.copied = None;
            self.cycles = 0;
        } else {
            self.copied = Some(copied);
        }
    }

    pub fn is_active(&self) -> bool {
        self.copied.is_some()
    }

    pub fn source(&self) -> u16 {
        self.source
    }

    /// Number of transfers started since power on.
    pub fn transfers(&self) -> usize {
        self.transfers
    }
}

impl Default for DmaController {
    fn default() -> DmaController {
        DmaController::new()
    }
}

impl DmaDevice for DmaController {
    fn start_transfer(&mut self, source: u16) {
        self.source = source;
        self.copied = Some(0);
        self.cycles = 0;
        self.transfers += 1;
    }
}
