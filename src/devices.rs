//! Capability interfaces the bus calls into when a register write or read has
//! a side effect outside of memory.
//!
//! The bus never owns a device. Whoever composes the session owns them through
//! `Rc<RefCell<_>>` and hands the MMU a [`Weak`] handle via [`Peripherals`].

use crate::error::{AyyError, DeviceNotAttachedSnafu};
use crate::memory::registers::IoRegisters;
use snafu::OptionExt;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

pub trait TimerDevice {
    /// Resetting DIV or lowering the TAC signal can itself clock TIMA.
    fn check_tima_unexpected_increase(&mut self, io: &mut dyn IoRegisters);
    /// T-cycles elapsed since the last TIMA overflow, 0 outside of the
    /// overflow window.
    fn ticks_since_overflow(&self) -> usize;
    fn unset_overflow(&mut self);
    fn set_tima(&mut self, io: &mut dyn IoRegisters, data: u8);
    fn set_if_override(&mut self);
    fn is_timer_enabled(&self, io: &dyn IoRegisters) -> bool;
    fn tick_rate_bit(&self, io: &dyn IoRegisters) -> bool;
}

pub trait VideoDevice {
    fn reset(&mut self);
}

pub trait DisplaySurface {
    fn clear(&mut self);
}

/// A pressed input as seen by JOYP: the select line that must be low for the
/// input to be reported, and the report bit it pulls low.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Input {
    pub select_bit: u8,
    pub pressed_bit: u8,
}

pub trait InputSource {
    fn pressed_inputs(&self) -> Vec<Input>;
}

pub trait DmaDevice {
    fn start_transfer(&mut self, source: u16);
}

/// Non-owning handles to every device a register quirk may need.
#[derive(Clone, Default)]
pub struct Peripherals {
    pub(crate) timer: Option<Weak<RefCell<dyn TimerDevice>>>,
    pub(crate) video: Option<Weak<RefCell<dyn VideoDevice>>>,
    pub(crate) display: Option<Weak<RefCell<dyn DisplaySurface>>>,
    pub(crate) input: Option<Weak<RefCell<dyn InputSource>>>,
    pub(crate) dma: Option<Weak<RefCell<dyn DmaDevice>>>,
}

impl Peripherals {
    pub fn new() -> Peripherals {
        Peripherals::default()
    }

    pub fn set_timer(&mut self, timer: Rc<RefCell<dyn TimerDevice>>) {
        self.timer = Some(Rc::downgrade(&timer));
    }

    pub fn set_video(&mut self, video: Rc<RefCell<dyn VideoDevice>>) {
        self.video = Some(Rc::downgrade(&video));
    }

    pub fn set_display(&mut self, display: Rc<RefCell<dyn DisplaySurface>>) {
        self.display = Some(Rc::downgrade(&display));
    }

    pub fn set_input(&mut self, input: Rc<RefCell<dyn InputSource>>) {
        self.input = Some(Rc::downgrade(&input));
    }

    pub fn set_dma(&mut self, dma: Rc<RefCell<dyn DmaDevice>>) {
        self.dma = Some(Rc::downgrade(&dma));
    }

    pub(crate) fn timer(&self) -> Result<Weak<RefCell<dyn TimerDevice>>, AyyError> {
        self.timer.clone().context(DeviceNotAttachedSnafu { device: "timer" })
    }

    pub(crate) fn video(&self) -> Result<Weak<RefCell<dyn VideoDevice>>, AyyError> {
        self.video.clone().context(DeviceNotAttachedSnafu { device: "video" })
    }

    pub(crate) fn display(&self) -> Result<Weak<RefCell<dyn DisplaySurface>>, AyyError> {
        self.display.clone().context(DeviceNotAttachedSnafu { device: "display" })
    }

    pub(crate) fn input(&self) -> Result<Weak<RefCell<dyn InputSource>>, AyyError> {
        self.input.clone().context(DeviceNotAttachedSnafu { device: "joypad" })
    }

    pub(crate) fn dma(&self) -> Result<Weak<RefCell<dyn DmaDevice>>, AyyError> {
        self.dma.clone().context(DeviceNotAttachedSnafu { device: "dma" })
    }
}
