pub mod timer;

pub const T_CYCLES_PER_M_CYCLE: usize = 4;
