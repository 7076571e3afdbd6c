use crate::memory::MEMORY_SIZE;

/// Raw 64 KiB address space. Knows nothing about hardware registers.
#[derive(Clone)]
pub struct Memory {
    data: Vec<u8>,
}

impl Memory {
    pub fn new() -> Memory {
        Memory {
            data: vec![0; MEMORY_SIZE],
        }
    }

    #[inline]
    pub fn read_byte(&self, addr: u16) -> u8 {
        self.data[addr as usize]
    }

    #[inline]
    pub fn write_byte(&mut self, addr: u16, data: u8) {
        self.data[addr as usize] = data;
    }

    /// Copies `bytes` starting at `start`. The caller keeps the copy inside the
    /// address space.
    pub fn write_bytes(&mut self, start: u16, bytes: &[u8]) {
        let start = start as usize;
        self.data[start..start + bytes.len()].copy_from_slice(bytes);
    }
}

impl Default for Memory {
    fn default() -> Memory {
        Memory::new()
    }
}
