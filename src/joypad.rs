use crate::devices::{Input, InputSource};
use log::trace;

// Select lines in JOYP, active low.
const DIRECTION_SELECT_BIT: u8 = 4;
const BUTTON_SELECT_BIT: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Right,
    Left,
    Up,
    Down,
    A,
    B,
    Select,
    Start,
}

impl Button {
    pub const ALL: [Button; 8] = [
        Button::Right,
        Button::Left,
        Button::Up,
        Button::Down,
        Button::A,
        Button::B,
        Button::Select,
        Button::Start,
    ];

    pub fn input(self) -> Input {
        let (select_bit, pressed_bit) = match self {
            Button::Right => (DIRECTION_SELECT_BIT, 0),
            Button::Left => (DIRECTION_SELECT_BIT, 1),
            Button::Up => (DIRECTION_SELECT_BIT, 2),
            Button::Down => (DIRECTION_SELECT_BIT, 3),
            Button::A => (BUTTON_SELECT_BIT, 0),
            Button::B => (BUTTON_SELECT_BIT, 1),
            Button::Select => (BUTTON_SELECT_BIT, 2),
            Button::Start => (BUTTON_SELECT_BIT, 3),
        };
        Input { select_bit, pressed_bit }
    }
}

#[derive(Clone, Default)]
pub struct Joypad {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub a: bool,
    pub b: bool,
    pub start: bool,
    pub select: bool,
}

impl Joypad {
    pub fn new() -> Joypad {
        Joypad::default()
    }

    pub fn update_button(&mut self, button: Button, pressed: bool) {
        trace!("{:?} {}", button, if pressed { "pressed" } else { "released" });
        match button {
            Button::Up => self.up = pressed,
            Button::Down => self.down = pressed,
            Button::Left => self.left = pressed,
            Button::Right => self.right = pressed,
            Button::A => self.a = pressed,
            Button::B => self.b = pressed,
            Button::Start => self.start = pressed,
            Button::Select => self.select = pressed,
        }
    }

    pub fn is_pressed(&self, button: Button) -> bool {
        match button {
            Button::Up => self.up,
            Button::Down => self.down,
            Button::Left => self.left,
            Button::Right => self.right,
            Button::A => self.a,
            Button::B => self.b,
            Button::Start => self.start,
            Button::Select => self.select,
        }
    }
}

impl InputSource for Joypad {
    fn pressed_inputs(&self) -> Vec<Input> {
        Button::ALL
            .into_iter()
            .filter(|&button| self.is_pressed(button))
            .map(Button::input)
            .collect()
    }
}
