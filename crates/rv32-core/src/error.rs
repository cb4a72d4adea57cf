//! Error types for the RISC-V 32 emulator.
//!
//! [`EmulatorError`] describes something the guest program did. [`FatalError`]
//! describes a bug in the emulator itself and is never returned: it is raised
//! through [`fatal`], which ends the process.

use core::fmt;

use thiserror::Error;

/// Kind of memory access that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryAccessKind {
    Read,
    Write,
    InstructionFetch,
}

impl fmt::Display for MemoryAccessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MemoryAccessKind::Read => "read",
            MemoryAccessKind::Write => "write",
            MemoryAccessKind::InstructionFetch => "instruction fetch",
        })
    }
}

/// Faults caused by the guest program.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmulatorError {
    /// Instruction limit exceeded.
    #[error("Instruction limit exceeded: executed {executed} instructions (limit: {limit}) at PC 0x{pc:08x}")]
    InstructionLimitExceeded { limit: u64, executed: u64, pc: u32 },

    /// Access outside guest memory.
    #[error("Invalid memory {kind} at address 0x{address:08x} (size: {size} bytes) at PC 0x{pc:08x}")]
    InvalidMemoryAccess {
        address: u32,
        size: usize,
        kind: MemoryAccessKind,
        pc: u32,
    },

    /// Instruction word the decoder does not recognize.
    #[error("Invalid instruction 0x{instruction:08x} at PC 0x{pc:08x}: {reason}")]
    InvalidInstruction {
        pc: u32,
        instruction: u32,
        reason: String,
    },
}

impl EmulatorError {
    /// Get the PC where the error occurred.
    pub fn pc(&self) -> u32 {
        match self {
            EmulatorError::InstructionLimitExceeded { pc, .. }
            | EmulatorError::InvalidMemoryAccess { pc, .. }
            | EmulatorError::InvalidInstruction { pc, .. } => *pc,
        }
    }

    /// Attach the PC of the faulting instruction.
    ///
    /// Memory reports errors with PC 0 since it does not know which
    /// instruction issued the access.
    pub fn at_pc(mut self, at: u32) -> Self {
        match &mut self {
            EmulatorError::InstructionLimitExceeded { pc, .. }
            | EmulatorError::InvalidMemoryAccess { pc, .. }
            | EmulatorError::InvalidInstruction { pc, .. } => *pc = at,
        }
        self
    }
}

/// Internal invariant violations of the emulator.
///
/// These are decoder or dispatch bugs, never properties of the guest program.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FatalError {
    /// A memory helper was handed a width other than 1, 2 or 4 bytes.
    #[error("unsupported memory access width {width} at PC 0x{pc:08x}")]
    UnsupportedWidth { width: u8, pc: u32 },

    /// A helper received an operand of a shape its opcode never produces.
    #[error("{helper}: {operand} operand has an unexpected shape at PC 0x{pc:08x}")]
    MalformedOperand {
        helper: &'static str,
        operand: &'static str,
        pc: u32,
    },
}

/// Abort on an emulator bug.
///
/// Logs the diagnostic and panics with the [`FatalError`] itself as payload,
/// so a harness catching the unwind can downcast and inspect the kind.
pub fn fatal(error: FatalError) -> ! {
    log::error!("emulator invariant violated: {}", error);
    std::panic::panic_any(error)
}
