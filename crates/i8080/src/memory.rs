use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::LoadError;
use crate::ADDRESS_SPACE_SIZE;

/// Fixed-size memory image seen by the CPU.
///
/// The image may be smaller than the 64 KiB address space. Reads from
/// addresses past the end return 0x00 and writes there are dropped, so a
/// program that strays outside its image never touches host memory.
#[derive(Clone)]
pub struct Memory {
    bytes: Box<[u8]>,
}

impl Default for Memory {
    fn default() -> Self {
        Self::new(ADDRESS_SPACE_SIZE)
    }
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Memory").field("len", &self.len()).finish()
    }
}

impl Memory {
    /// Create a zero-filled image of `size` bytes.
    pub fn new(size: usize) -> Self {
        Self {
            bytes: vec![0; size].into_boxed_slice(),
        }
    }

    /// Wrap an existing buffer. Its length becomes the image bound.
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        Self {
            bytes: bytes.into_boxed_slice(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    #[inline]
    pub fn read(&self, addr: u16) -> u8 {
        match self.bytes.get(addr as usize) {
            Some(&value) => value,
            None => {
                log::trace!("read outside memory image at 0x{:04X}", addr);
                0
            }
        }
    }

    #[inline]
    pub fn write(&mut self, addr: u16, value: u8) {
        match self.bytes.get_mut(addr as usize) {
            Some(slot) => *slot = value,
            None => {
                log::trace!(
                    "dropped write of 0x{:02X} outside memory image at 0x{:04X}",
                    value,
                    addr
                );
            }
        }
    }

    /// Little-endian 16-bit read. The high byte address wraps at 0xFFFF.
    pub fn read_word(&self, addr: u16) -> u16 {
        let lo = self.read(addr);
        let hi = self.read(addr.wrapping_add(1));
        u16::from_le_bytes([lo, hi])
    }

    pub fn write_word(&mut self, addr: u16, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.write(addr, lo);
        self.write(addr.wrapping_add(1), hi);
    }

    /// Copy `data` into the image at `offset`, truncated to the image bound.
    ///
    /// Returns the number of bytes copied.
    pub fn load_bytes(&mut self, offset: usize, data: &[u8]) -> Result<usize, LoadError> {
        let size = self.len();
        if offset > size {
            return Err(LoadError::OffsetOutOfRange { offset, size });
        }
        let count = data.len().min(size - offset);
        self.bytes[offset..offset + count].copy_from_slice(&data[..count]);
        Ok(count)
    }

    /// Read everything from `source` and copy it into the image at `offset`.
    pub fn load<R: Read>(&mut self, offset: usize, mut source: R) -> Result<usize, LoadError> {
        let mut data = Vec::new();
        source.read_to_end(&mut data)?;
        let copied = self.load_bytes(offset, &data)?;
        if copied < data.len() {
            log::warn!(
                "program image truncated: {} of {} bytes fit at offset 0x{:04X}",
                copied,
                data.len(),
                offset
            );
        }
        Ok(copied)
    }

    pub fn load_file<P: AsRef<Path>>(&mut self, offset: usize, path: P) -> Result<usize, LoadError> {
        let file = File::open(path.as_ref())?;
        self.load(offset, file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accesses_past_the_image_read_zero_and_drop_writes() {
        let mut mem = Memory::new(0x100);
        mem.write(0x0200, 0xAA);
        assert_eq!(mem.read(0x0200), 0);
        mem.write(0x00FF, 0x55);
        assert_eq!(mem.read(0x00FF), 0x55);
    }

    #[test]
    fn from_vec_keeps_the_image_length() {
        let mut mem = Memory::from_vec(vec![0x11, 0x22, 0x33]);
        assert_eq!(mem.len(), 3);
        assert_eq!(mem.read(1), 0x22);
        mem.as_mut_slice()[2] = 0x44;
        assert_eq!(mem.read(2), 0x44);
        mem.write(3, 0x55);
        assert_eq!(mem.as_slice(), &[0x11, 0x22, 0x44]);
    }

    #[test]
    fn words_are_little_endian() {
        let mut mem = Memory::default();
        mem.write_word(0x1000, 0xBEEF);
        assert_eq!(mem.read(0x1000), 0xEF);
        assert_eq!(mem.read(0x1001), 0xBE);
        assert_eq!(mem.read_word(0x1000), 0xBEEF);
    }

    #[test]
    fn load_truncates_to_image_bound() {
        let mut mem = Memory::new(8);
        let copied = mem.load(4, &[1u8, 2, 3, 4, 5, 6][..]).unwrap();
        assert_eq!(copied, 4);
        assert_eq!(mem.as_slice(), &[0, 0, 0, 0, 1, 2, 3, 4]);
    }

    #[test]
    fn load_rejects_offset_past_the_end() {
        let mut mem = Memory::new(8);
        let err = mem.load_bytes(9, &[1]).unwrap_err();
        assert!(matches!(
            err,
            LoadError::OffsetOutOfRange { offset: 9, size: 8 }
        ));
    }

    #[test]
    fn missing_file_is_reported() {
        let mut mem = Memory::new(8);
        let err = mem
            .load_file(0, "definitely/not/a/real/image.bin")
            .unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }
}
