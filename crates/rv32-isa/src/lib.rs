//! RISC-V 32-bit ISA definitions.
//!
//! Register naming shared by the execution core and the debugger, plus
//! encoders and a disassembler for the RV32I subset the core executes.

#![no_std]

extern crate alloc;

mod disasm;
mod encode;
mod regs;

pub use disasm::{disassemble_code, disassemble_instruction};
pub use encode::*;
pub use regs::{Gpr, REG_NAMES};
