//! Logging infrastructure for the RISC-V 32 emulator.

use core::fmt;

use rv32_isa::{disassemble_instruction, Gpr};

use crate::memory::Width;

/// Logging verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// No logging.
    None,
    /// Only log errors.
    Errors,
    /// Keep a trace entry for each retired instruction.
    Instructions,
    /// Trace entries are also emitted through the `log` facade.
    Verbose,
}

/// A memory read performed by an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemRead {
    pub addr: u32,
    pub width: Width,
    pub value: u32,
}

/// A memory write performed by an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemWrite {
    pub addr: u32,
    pub width: Width,
    /// Previous contents, when they were readable.
    pub old: Option<u32>,
    pub new: u32,
}

/// Trace entry for a single instruction execution.
///
/// Filled in by the RTL primitives as the helper runs, so it records exactly
/// the architectural effects of the instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstLog {
    pub cycle: u64,
    pub pc: u32,
    pub instruction: u32,
    /// `(register, old, new)` for every effective register write.
    pub regs_written: Vec<(Gpr, u32, u32)>,
    pub memory_reads: Vec<MemRead>,
    pub memory_writes: Vec<MemWrite>,
    /// Committed jump target, if the instruction jumped.
    pub jump: Option<u32>,
}

impl InstLog {
    pub fn new(pc: u32, instruction: u32) -> Self {
        Self {
            cycle: 0,
            pc,
            instruction,
            regs_written: Vec::new(),
            memory_reads: Vec::new(),
            memory_writes: Vec::new(),
            jump: None,
        }
    }

    /// Set the cycle count for this log entry.
    pub fn set_cycle(mut self, cycle: u64) -> Self {
        self.cycle = cycle;
        self
    }
}

impl fmt::Display for InstLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:4}] 0x{:08x}: {}",
            self.cycle,
            self.pc,
            disassemble_instruction(self.instruction)
        )?;

        for read in &self.memory_reads {
            write!(
                f,
                "\n    mem[0x{:08x}] ({}B) = 0x{:x}",
                read.addr,
                read.width.bytes(),
                read.value
            )?;
        }
        for write in &self.memory_writes {
            match write.old {
                Some(old) => write!(
                    f,
                    "\n    mem[0x{:08x}] ({}B): 0x{:x} -> 0x{:x}",
                    write.addr,
                    write.width.bytes(),
                    old,
                    write.new
                )?,
                None => write!(
                    f,
                    "\n    mem[0x{:08x}] ({}B): -> 0x{:x}",
                    write.addr,
                    write.width.bytes(),
                    write.new
                )?,
            }
        }
        for (reg, old, new) in &self.regs_written {
            write!(f, "\n    {}: 0x{:x} -> 0x{:x}", reg, old, new)?;
        }
        if let Some(target) = self.jump {
            write!(f, "\n    jump: 0x{:08x} -> 0x{:08x}", self.pc, target)?;
        }

        Ok(())
    }
}
