use crate::error::{AyyError, BootRomTooLargeSnafu, CartridgeReadSnafu};
use crate::memory::BOOTROM_SIZE;
use dyn_clone::DynClone;
use snafu::prelude::*;
use std::path::{Path, PathBuf};

/// Where the cartridge image comes from. Called once at power on and again
/// whenever the boot ROM is unmapped.
pub trait CartridgeSource: DynClone {
    fn load(&self) -> Result<Vec<u8>, AyyError>;
    fn name(&self) -> String;
}

dyn_clone::clone_trait_object!(CartridgeSource);

#[derive(Clone)]
pub struct FileCartridge {
    path: PathBuf,
}

impl FileCartridge {
    pub fn new<P: AsRef<Path>>(path: P) -> FileCartridge {
        FileCartridge {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl CartridgeSource for FileCartridge {
    fn load(&self) -> Result<Vec<u8>, AyyError> {
        std::fs::read(&self.path).context(CartridgeReadSnafu { path: &self.path })
    }

    fn name(&self) -> String {
        self.path.display().to_string()
    }
}

/// An image that is already in memory.
#[derive(Clone)]
pub struct RomImage {
    data: Vec<u8>,
}

impl RomImage {
    pub fn new(data: Vec<u8>) -> RomImage {
        RomImage { data }
    }
}

impl CartridgeSource for RomImage {
    fn load(&self) -> Result<Vec<u8>, AyyError> {
        Ok(self.data.clone())
    }

    fn name(&self) -> String {
        String::from("ROM image")
    }
}

#[derive(Clone)]
pub struct BootRom {
    data: Vec<u8>,
}

impl BootRom {
    pub fn new(data: Vec<u8>) -> Result<BootRom, AyyError> {
        ensure!(
            data.len() <= BOOTROM_SIZE,
            BootRomTooLargeSnafu {
                size: data.len(),
                max: BOOTROM_SIZE
            }
        );
        Ok(BootRom { data })
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<BootRom, AyyError> {
        let path = path.as_ref();
        let data = std::fs::read(path).context(CartridgeReadSnafu { path })?;
        BootRom::new(data)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}
