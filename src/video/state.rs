/// PPU mode, as reported in the low two bits of STAT.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum State {
    HBlank,
    VBlank,
    OamScan,
    Drawing,
}

impl State {
    pub fn mode_bits(self) -> u8 {
        match self {
            State::HBlank => 0b00,
            State::VBlank => 0b01,
            State::OamScan => 0b10,
            State::Drawing => 0b11,
        }
    }
}
