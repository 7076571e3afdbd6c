use crate::devices::{DisplaySurface, DmaDevice, InputSource, TimerDevice, VideoDevice};
use crate::lr35902::T_CYCLES_PER_M_CYCLE;
use crate::memory::registers::{JoypadSelect, LcdControl, LcdStatus, RegisterId};
use crate::memory::storage::Memory;
use crate::memory::{DIV_LSB_REGISTER, DIV_REGISTER, OAM_DMA_MAX_SOURCE_PAGE};
use log::{debug, warn};
use std::cell::RefCell;
use std::rc::Weak;

/// What the owning bus has to do after a controlled write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteEffect {
    None,
    ReloadCartridge,
}

/// Behavior layered on top of plain storage for one register.
#[derive(Clone)]
pub enum Quirk {
    Plain,
    Joypad(Weak<RefCell<dyn InputSource>>),
    DividerLsb(Weak<RefCell<dyn TimerDevice>>),
    Divider(Weak<RefCell<dyn TimerDevice>>),
    TimerCounter(Weak<RefCell<dyn TimerDevice>>),
    TimerModulo(Weak<RefCell<dyn TimerDevice>>),
    TimerControl(Weak<RefCell<dyn TimerDevice>>),
    InterruptFlags(Weak<RefCell<dyn TimerDevice>>),
    LcdControl {
        video: Weak<RefCell<dyn VideoDevice>>,
        display: Weak<RefCell<dyn DisplaySurface>>,
    },
    LcdStatus,
    OamDma(Weak<RefCell<dyn DmaDevice>>),
    BootRomDisable,
}

/// A register bound to one bus address.
///
/// `read`/`write` apply the storage mask only. `controlled_read` and
/// `controlled_write` are what the bus calls; they add the device quirk and
/// still store through `write` (or raw memory where the hardware bypasses the
/// mask).
#[derive(Clone)]
pub struct MemRegister {
    id: RegisterId,
    quirk: Quirk,
}

impl MemRegister {
    pub fn new(id: RegisterId, quirk: Quirk) -> MemRegister {
        MemRegister { id, quirk }
    }

    pub fn plain(id: RegisterId) -> MemRegister {
        MemRegister::new(id, Quirk::Plain)
    }

    #[inline]
    pub fn id(&self) -> RegisterId {
        self.id
    }

    #[inline]
    pub fn address(&self) -> u16 {
        self.id.address()
    }

    #[inline]
    pub fn read(&self, memory: &Memory) -> u8 {
        self.id.read(memory)
    }

    #[inline]
    pub fn write(&self, memory: &mut Memory, data: u8) {
        self.id.write(memory, data)
    }

    pub fn controlled_read(&self, memory: &Memory) -> u8 {
        match &self.quirk {
            Quirk::Joypad(joypad) => {
                let mut joyp = self.read(memory) | 0x0f;
                let pressed = with_device(joypad, self.id, |joypad| joypad.pressed_inputs()).unwrap_or_default();
                for input in pressed {
                    // active low on both the select lines and the report bits
                    if joyp & (1 << input.select_bit) == 0 {
                        joyp &= !(1 << input.pressed_bit);
                    }
                }
                joyp
            }
            _ => self.read(memory),
        }
    }

    pub fn controlled_write(&self, memory: &mut Memory, data: u8) -> WriteEffect {
        match &self.quirk {
            Quirk::Plain => self.write(memory, data),
            Quirk::Joypad(_) => {
                let joyp = self.read(memory);
                let select = JoypadSelect::all().bits();
                self.write(memory, (joyp & !select) | (data & select));
            }
            Quirk::DividerLsb(timer) | Quirk::Divider(timer) => {
                with_device(timer, self.id, |timer| timer.check_tima_unexpected_increase(memory));
                memory.write_byte(DIV_LSB_REGISTER, 0);
                memory.write_byte(DIV_REGISTER, 0);
            }
            Quirk::TimerCounter(timer) => {
                let accepted = with_device(timer, self.id, |timer| {
                    if timer.ticks_since_overflow() < T_CYCLES_PER_M_CYCLE {
                        timer.unset_overflow();
                        true
                    } else {
                        false
                    }
                })
                .unwrap_or(true);

                if accepted {
                    self.write(memory, data);
                } else {
                    debug!("TIMA write of ${:02x} dropped during overflow reload", data);
                }
            }
            Quirk::TimerModulo(timer) => {
                self.write(memory, data);
                with_device(timer, self.id, |timer| {
                    if timer.ticks_since_overflow() >= T_CYCLES_PER_M_CYCLE {
                        timer.set_tima(memory, data);
                    }
                });
            }
            Quirk::TimerControl(timer) => {
                with_device(timer, self.id, |timer| {
                    let old_signal = timer.is_timer_enabled(memory) && timer.tick_rate_bit(memory);
                    self.write(memory, data);
                    let new_signal = timer.is_timer_enabled(memory) && timer.tick_rate_bit(memory);
                    if old_signal && !new_signal {
                        timer.check_tima_unexpected_increase(memory);
                    }
                })
                .unwrap_or_else(|| self.write(memory, data));
            }
            Quirk::InterruptFlags(timer) => {
                self.write(memory, data);
                with_device(timer, self.id, |timer| {
                    if timer.ticks_since_overflow() >= T_CYCLES_PER_M_CYCLE {
                        timer.set_if_override();
                    }
                });
            }
            Quirk::LcdControl { video, display } => {
                let old = LcdControl::from(self.read(memory));
                let new = LcdControl::from(data);
                if old.display_enabled() && !new.display_enabled() {
                    debug!("LCD turned off, resetting video state");
                    with_device(video, self.id, |video| video.reset());
                    with_device(display, self.id, |display| display.clear());
                }
                self.write(memory, data);
            }
            Quirk::LcdStatus => {
                let stat = self.read(memory);
                let writable = LcdStatus::WRITABLE.bits();
                self.write(memory, (data & writable) | (stat & !writable));
            }
            Quirk::OamDma(dma) => {
                if data <= OAM_DMA_MAX_SOURCE_PAGE {
                    self.write(memory, data);
                    let source = (data as u16) << 8;
                    debug!("OAM DMA started from ${:04x}", source);
                    with_device(dma, self.id, |dma| dma.start_transfer(source));
                } else {
                    warn!("OAM DMA source page ${:02x} out of range, ignoring", data);
                }
            }
            Quirk::BootRomDisable => {
                if self.read(memory) != 0x01 && data == 0x01 {
                    memory.write_byte(self.address(), data);
                    return WriteEffect::ReloadCartridge;
                }
            }
        }

        WriteEffect::None
    }
}

impl std::fmt::Debug for MemRegister {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} @ ${:04x}", self.id, self.address())
    }
}

// Runs `f` against a live device. A dropped or re-entered device skips the
// quirk rather than faulting the bus.
fn with_device<T, R>(device: &Weak<RefCell<T>>, id: RegisterId, f: impl FnOnce(&mut T) -> R) -> Option<R>
where
    T: ?Sized,
{
    let Some(device) = device.upgrade() else {
        warn!("Device behind {} is gone, skipping side effect", id);
        return None;
    };

    let Ok(mut borrowed) = device.try_borrow_mut() else {
        warn!("Device behind {} is busy, skipping side effect", id);
        return None;
    };

    Some(f(&mut *borrowed))
}
