//! Guest memory for the RISC-V 32 emulator.

use crate::error::{EmulatorError, MemoryAccessKind};

/// Default RAM start address, where images are loaded and execution begins.
pub const DEFAULT_RAM_START: u32 = 0x8000_0000;

/// Memory access width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    Byte = 1,
    Half = 2,
    Word = 4,
}

impl Width {
    /// Width from a byte count, `None` for anything but 1, 2 or 4.
    pub fn from_bytes(bytes: u8) -> Option<Self> {
        match bytes {
            1 => Some(Width::Byte),
            2 => Some(Width::Half),
            4 => Some(Width::Word),
            _ => None,
        }
    }

    pub fn bytes(self) -> usize {
        self as usize
    }

    pub fn bits(self) -> u32 {
        self as u32 * 8
    }

    /// Mask selecting the low `bits()` bits of a word.
    pub fn mask(self) -> u32 {
        match self {
            Width::Word => u32::MAX,
            _ => (1u32 << self.bits()) - 1,
        }
    }
}

/// Guest physical address space as seen by loads, stores and the debugger.
///
/// Values are little-endian; reads zero-extend to 32 bits and writes keep
/// only the low `width` bytes of `value`.
pub trait GuestMemory {
    fn read(&self, address: u32, width: Width) -> Result<u32, EmulatorError>;

    fn write(&mut self, address: u32, width: Width, value: u32) -> Result<(), EmulatorError>;
}

/// Flat RAM region starting at a base address.
#[derive(Debug, Clone)]
pub struct Memory {
    base: u32,
    ram: Vec<u8>,
}

impl Memory {
    /// Create a zero-filled RAM region of `size` bytes at `base`.
    pub fn new(base: u32, size: usize) -> Self {
        Self {
            base,
            ram: vec![0; size],
        }
    }

    /// Create a RAM region at [`DEFAULT_RAM_START`].
    pub fn with_default_base(size: usize) -> Self {
        Self::new(DEFAULT_RAM_START, size)
    }

    /// Copy `bytes` into memory starting at `address`.
    pub fn load(&mut self, address: u32, bytes: &[u8]) -> Result<(), EmulatorError> {
        let range = self.range(address, bytes.len(), MemoryAccessKind::Write)?;
        self.ram[range].copy_from_slice(bytes);
        Ok(())
    }

    /// Read a 32-bit instruction word.
    pub fn fetch_instruction(&self, address: u32) -> Result<u32, EmulatorError> {
        let range = self.range(address, 4, MemoryAccessKind::InstructionFetch)?;
        Ok(le_value(&self.ram[range]))
    }

    pub fn base(&self) -> u32 {
        self.base
    }

    pub fn size(&self) -> usize {
        self.ram.len()
    }

    /// Get a reference to the RAM region (for inspection).
    pub fn ram(&self) -> &[u8] {
        &self.ram
    }

    /// Get a mutable reference to the RAM region (for initialization).
    pub fn ram_mut(&mut self) -> &mut [u8] {
        &mut self.ram
    }

    fn range(
        &self,
        address: u32,
        size: usize,
        kind: MemoryAccessKind,
    ) -> Result<core::ops::Range<usize>, EmulatorError> {
        let out_of_bounds = || EmulatorError::InvalidMemoryAccess {
            address,
            size,
            kind,
            pc: 0, // Will be filled in by caller
        };
        let start = address
            .checked_sub(self.base)
            .ok_or_else(out_of_bounds)? as usize;
        let end = start.checked_add(size).ok_or_else(out_of_bounds)?;
        if end > self.ram.len() {
            return Err(out_of_bounds());
        }
        Ok(start..end)
    }
}

impl GuestMemory for Memory {
    fn read(&self, address: u32, width: Width) -> Result<u32, EmulatorError> {
        let range = self.range(address, width.bytes(), MemoryAccessKind::Read)?;
        Ok(le_value(&self.ram[range]))
    }

    fn write(&mut self, address: u32, width: Width, value: u32) -> Result<(), EmulatorError> {
        let range = self.range(address, width.bytes(), MemoryAccessKind::Write)?;
        self.ram[range].copy_from_slice(&value.to_le_bytes()[..width.bytes()]);
        Ok(())
    }
}

fn le_value(bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .rev()
        .fold(0u32, |acc, &byte| (acc << 8) | byte as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widths_zero_extend() {
        let mut mem = Memory::with_default_base(64);
        mem.load(DEFAULT_RAM_START, &[0xef, 0xbe, 0xad, 0xde]).unwrap();
        assert_eq!(mem.read(DEFAULT_RAM_START, Width::Word).unwrap(), 0xdead_beef);
        assert_eq!(mem.read(DEFAULT_RAM_START, Width::Half).unwrap(), 0xbeef);
        assert_eq!(mem.read(DEFAULT_RAM_START + 3, Width::Byte).unwrap(), 0xde);
    }

    #[test]
    fn test_write_truncates() {
        let mut mem = Memory::with_default_base(8);
        mem.write(DEFAULT_RAM_START, Width::Word, 0x1111_1111).unwrap();
        mem.write(DEFAULT_RAM_START, Width::Byte, 0xaabb_ccdd).unwrap();
        assert_eq!(mem.read(DEFAULT_RAM_START, Width::Word).unwrap(), 0x1111_11dd);
        mem.write(DEFAULT_RAM_START + 2, Width::Half, 0xffff_0102).unwrap();
        assert_eq!(mem.read(DEFAULT_RAM_START, Width::Word).unwrap(), 0x0102_11dd);
    }

    #[test]
    fn test_unaligned_access_is_allowed() {
        let mut mem = Memory::with_default_base(8);
        mem.write(DEFAULT_RAM_START + 1, Width::Word, 0x0403_0201).unwrap();
        assert_eq!(mem.ram()[1..5], [1, 2, 3, 4]);
    }

    #[test]
    fn test_out_of_bounds() {
        let mem = Memory::with_default_base(8);
        assert!(matches!(
            mem.read(DEFAULT_RAM_START + 6, Width::Word),
            Err(EmulatorError::InvalidMemoryAccess {
                address: 0x8000_0006,
                size: 4,
                kind: MemoryAccessKind::Read,
                ..
            })
        ));
        assert!(mem.read(DEFAULT_RAM_START - 4, Width::Word).is_err());
        assert!(matches!(
            mem.fetch_instruction(0),
            Err(EmulatorError::InvalidMemoryAccess {
                kind: MemoryAccessKind::InstructionFetch,
                ..
            })
        ));
    }

    #[test]
    fn test_width_helpers() {
        assert_eq!(Width::from_bytes(2), Some(Width::Half));
        assert_eq!(Width::from_bytes(3), None);
        assert_eq!(Width::Byte.mask(), 0xff);
        assert_eq!(Width::Word.mask(), u32::MAX);
        assert_eq!(Width::Half.bits(), 16);
    }
}
