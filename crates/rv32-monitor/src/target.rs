//! Read-only view of the machine an expression is evaluated against.

use rv32_core::{CpuState, EmulatorError, GuestMemory, Riscv32Emulator, Width};

/// Architectural state visible to expressions.
pub trait DebugTarget {
    /// Value of a register by ABI name or `pc`; `None` if there is no such
    /// register.
    fn reg_value(&self, name: &str) -> Option<u32>;

    /// Little-endian word at `addr`.
    fn read_word(&self, addr: u32) -> Result<u32, EmulatorError>;
}

impl DebugTarget for Riscv32Emulator {
    fn reg_value(&self, name: &str) -> Option<u32> {
        self.cpu().value_of(name)
    }

    fn read_word(&self, addr: u32) -> Result<u32, EmulatorError> {
        self.memory().read(addr, Width::Word)
    }
}

/// Borrowed register file and memory, for machines not driven by a
/// [`Riscv32Emulator`].
#[derive(Clone, Copy)]
pub struct MachineView<'a> {
    pub cpu: &'a CpuState,
    pub memory: &'a dyn GuestMemory,
}

impl<'a> MachineView<'a> {
    pub fn new(cpu: &'a CpuState, memory: &'a dyn GuestMemory) -> Self {
        Self { cpu, memory }
    }
}

impl DebugTarget for MachineView<'_> {
    fn reg_value(&self, name: &str) -> Option<u32> {
        self.cpu.value_of(name)
    }

    fn read_word(&self, addr: u32) -> Result<u32, EmulatorError> {
        self.memory.read(addr, Width::Word)
    }
}
