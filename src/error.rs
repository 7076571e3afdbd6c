use snafu::prelude::*;
use std::path::PathBuf;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum AyyError {
    #[snafu(display("Failed to read cartridge image {}", path.display()))]
    CartridgeRead { path: PathBuf, source: std::io::Error },
    #[snafu(display("Boot ROM is too large: {} bytes (max {})", size, max))]
    BootRomTooLarge { size: usize, max: usize },
    #[snafu(display("Device not attached before register initialization: {}", device))]
    DeviceNotAttached { device: &'static str },
    #[snafu(display("Memory registers have already been initialized"))]
    RegistersAlreadyInitialized,
    #[snafu(display("Invalid address range: ${:04x}..=${:04x}", start, end))]
    InvalidAddressRange { start: u16, end: u16 },
    #[snafu(display("Failed to set up logger"))]
    LoggerSetup { source: log::SetLoggerError },
}
