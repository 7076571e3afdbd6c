use crate::devices::TimerDevice;
use crate::lr35902::T_CYCLES_PER_M_CYCLE;
use crate::memory::registers::{InterruptFlags, IoRegisters, RegisterId, TimerControl};
use log::trace;

// TIMA reads 0x00 for one machine cycle after overflowing, then TMA is loaded
// and the interrupt is requested. The window closes one machine cycle later.
const RELOAD_TICK: usize = T_CYCLES_PER_M_CYCLE;
const OVERFLOW_WINDOW: usize = T_CYCLES_PER_M_CYCLE * 2;

/// DIV/TIMA/TMA/TAC timer. The 16-bit divider lives in DIVLSB:DIV so the bus
/// sees it directly; everything else it touches goes through [`IoRegisters`].
#[derive(Clone)]
pub struct Timer {
    overflow: bool,
    ticks_since_overflow: usize,
    if_override: bool,
    last_signal: bool,
}

impl Timer {
    pub fn new() -> Timer {
        Timer {
            overflow: false,
            ticks_since_overflow: 0,
            if_override: false,
            last_signal: false,
        }
    }

    pub fn tick(&mut self, io: &mut dyn IoRegisters, cycles: usize) {
        for _ in 0..cycles {
            self.step(io);
        }
    }

    pub fn is_overflowing(&self) -> bool {
        self.overflow
    }

    fn step(&mut self, io: &mut dyn IoRegisters) {
        if self.overflow {
            self.ticks_since_overflow += 1;
            if self.ticks_since_overflow == RELOAD_TICK {
                let tma = io.get_register(RegisterId::Tma);
                io.set_register(RegisterId::Tima, tma);
                request_timer_interrupt(io);
            } else if self.ticks_since_overflow >= OVERFLOW_WINDOW {
                self.unset_overflow();
            }
        }

        if self.if_override {
            request_timer_interrupt(io);
            self.if_override = false;
        }

        let divider = divider(io).wrapping_add(1);
        set_divider(io, divider);

        let signal = self.is_timer_enabled(io) && self.tick_rate_bit(io);
        if self.last_signal && !signal {
            self.increment_tima(io);
        }
        self.last_signal = signal;
    }

    fn increment_tima(&mut self, io: &mut dyn IoRegisters) {
        let tima = io.get_register(RegisterId::Tima);
        if tima == 0xff {
            trace!("TIMA overflow");
            io.set_register(RegisterId::Tima, 0);
            self.overflow = true;
            self.ticks_since_overflow = 0;
        } else {
            io.set_register(RegisterId::Tima, tima + 1);
        }
    }
}

impl Default for Timer {
    fn default() -> Timer {
        Timer::new()
    }
}

impl TimerDevice for Timer {
    fn check_tima_unexpected_increase(&mut self, io: &mut dyn IoRegisters) {
        // The caller is about to drop (or has just dropped) the clock signal.
        if self.last_signal {
            self.increment_tima(io);
        }
        self.last_signal = false;
    }

    #[inline]
    fn ticks_since_overflow(&self) -> usize {
        if self.overflow {
            self.ticks_since_overflow
        } else {
            0
        }
    }

    fn unset_overflow(&mut self) {
        self.overflow = false;
        self.ticks_since_overflow = 0;
    }

    fn set_tima(&mut self, io: &mut dyn IoRegisters, data: u8) {
        io.set_register(RegisterId::Tima, data);
    }

    fn set_if_override(&mut self) {
        self.if_override = true;
    }

    fn is_timer_enabled(&self, io: &dyn IoRegisters) -> bool {
        TimerControl::from(io.get_register(RegisterId::Tac)).enabled()
    }

    fn tick_rate_bit(&self, io: &dyn IoRegisters) -> bool {
        let bit = TimerControl::from(io.get_register(RegisterId::Tac)).divider_bit();
        divider(io) & (1 << bit) != 0
    }
}

#[inline]
fn divider(io: &dyn IoRegisters) -> u16 {
    u16::from_le_bytes([io.get_register(RegisterId::DivLsb), io.get_register(RegisterId::Div)])
}

#[inline]
fn set_divider(io: &mut dyn IoRegisters, value: u16) {
    let [lsb, msb] = value.to_le_bytes();
    io.set_register(RegisterId::DivLsb, lsb);
    io.set_register(RegisterId::Div, msb);
}

fn request_timer_interrupt(io: &mut dyn IoRegisters) {
    let flags = InterruptFlags::from(io.get_register(RegisterId::If)) | InterruptFlags::TIMER;
    io.set_register(RegisterId::If, flags.bits());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::storage::Memory;

    fn armed(tac: u8, tima: u8) -> (Timer, Memory) {
        let mut memory = Memory::new();
        memory.set_register(RegisterId::Tac, tac);
        memory.set_register(RegisterId::Tima, tima);
        (Timer::new(), memory)
    }

    #[test]
    fn divider_counts_every_t_cycle() {
        let (mut timer, mut memory) = armed(0x00, 0x00);
        timer.tick(&mut memory, 0x1234);
        assert_eq!(memory.get_register(RegisterId::Div), 0x12);
        assert_eq!(memory.get_register(RegisterId::DivLsb), 0x34);
        assert_eq!(memory.get_register(RegisterId::Tima), 0x00);
    }

    #[test]
    fn tima_clocks_on_selected_divider_edge() {
        // 0b101 clocks on divider bit 3, every 16 T-cycles
        let (mut timer, mut memory) = armed(0b101, 0x00);
        timer.tick(&mut memory, 15);
        assert_eq!(memory.get_register(RegisterId::Tima), 0x00);
        timer.tick(&mut memory, 1);
        assert_eq!(memory.get_register(RegisterId::Tima), 0x01);
        timer.tick(&mut memory, 32);
        assert_eq!(memory.get_register(RegisterId::Tima), 0x03);
    }

    #[test]
    fn overflow_reloads_after_one_machine_cycle() {
        let (mut timer, mut memory) = armed(0b101, 0xff);
        memory.set_register(RegisterId::Tma, 0x80);
        memory.set_register(RegisterId::If, 0x00);

        timer.tick(&mut memory, 16);
        assert!(timer.is_overflowing());
        assert_eq!(memory.get_register(RegisterId::Tima), 0x00);
        assert_eq!(memory.get_register(RegisterId::If), 0xe0);

        timer.tick(&mut memory, T_CYCLES_PER_M_CYCLE);
        assert_eq!(timer.ticks_since_overflow(), T_CYCLES_PER_M_CYCLE);
        assert_eq!(memory.get_register(RegisterId::Tima), 0x80);
        assert_eq!(memory.get_register(RegisterId::If), 0xe0 | InterruptFlags::TIMER.bits());

        timer.tick(&mut memory, T_CYCLES_PER_M_CYCLE);
        assert!(!timer.is_overflowing());
        assert_eq!(timer.ticks_since_overflow(), 0);
    }

    #[test]
    fn unexpected_increase_only_when_signal_was_high() {
        let (mut timer, mut memory) = armed(0b101, 0x10);
        timer.tick(&mut memory, 8);
        assert!(timer.tick_rate_bit(&memory));
        timer.check_tima_unexpected_increase(&mut memory);
        assert_eq!(memory.get_register(RegisterId::Tima), 0x11);

        // signal already consumed
        timer.check_tima_unexpected_increase(&mut memory);
        assert_eq!(memory.get_register(RegisterId::Tima), 0x11);
    }

    #[test]
    fn disabled_timer_never_clocks() {
        let (mut timer, mut memory) = armed(0b001, 0x00);
        timer.tick(&mut memory, 1024);
        assert!(!timer.is_timer_enabled(&memory));
        assert_eq!(memory.get_register(RegisterId::Tima), 0x00);
    }
}
