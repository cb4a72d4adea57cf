//! RISC-V 32-bit execution core.
//!
//! Instructions are decoded into a [`DecodedInstruction`] record and executed
//! by per-opcode helpers that only touch machine state through the primitive
//! transfer layer in [`rtl`]. Jumps are staged and committed after the helper
//! returns, so a helper always observes the pre-jump PC.

mod config;
mod decoder;
mod difftest;
mod emulator;
mod error;
mod executor;
mod helpers;
mod logging;
mod memory;
pub mod rtl;
mod state;

pub use config::EmulatorConfig;
pub use decoder::{decode_instruction, DecodedInstruction, Opcode, Operand};
pub use difftest::{DifftestHook, SkipReason};
pub use emulator::{Riscv32Emulator, StepResult, SyscallInfo};
pub use error::{fatal, EmulatorError, FatalError, MemoryAccessKind};
pub use executor::{execute_instruction, Flow};
pub use helpers::{debug_riscv32_ops, expect_a0, expect_error, expect_ok, expect_register};
pub use logging::{InstLog, LogLevel, MemRead, MemWrite};
pub use memory::{GuestMemory, Memory, Width, DEFAULT_RAM_START};
pub use rv32_isa::Gpr;
pub use state::{CpuState, RegName};
