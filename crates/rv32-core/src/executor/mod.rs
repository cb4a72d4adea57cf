//! Instruction executor for RISC-V 32-bit instructions.
//!
//! Each helper takes the decoded record and an [`Rtl`] context and expresses
//! the instruction purely as RTL primitives.

mod compute;
mod control;
mod ldst;

use rv32_isa::Gpr;

use crate::decoder::{DecodedInstruction, Opcode, Operand};
use crate::error::{fatal, EmulatorError, FatalError};
use crate::rtl::Rtl;

/// What the run loop should do after an instruction retires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// `ecall`: hand control to the environment.
    Syscall,
    /// `ebreak`: stop execution.
    Halt,
}

/// Execute a decoded instruction.
///
/// A jump, if any, is left pending in `rtl`.
pub fn execute_instruction(
    inst: &DecodedInstruction,
    rtl: &mut Rtl<'_>,
) -> Result<Flow, EmulatorError> {
    match inst.opcode {
        Opcode::Lui => compute::lui(inst, rtl),
        Opcode::Auipc => compute::auipc(inst, rtl),
        Opcode::Addi => compute::addi(inst, rtl),
        Opcode::Jal => control::jal(inst, rtl),
        Opcode::Jalr => control::jalr(inst, rtl),
        Opcode::Ld => ldst::ld(inst, rtl)?,
        Opcode::St => ldst::st(inst, rtl)?,
        Opcode::Lh => ldst::lh(inst, rtl)?,
        Opcode::Lb => ldst::lb(inst, rtl)?,
        Opcode::Ecall => return Ok(Flow::Syscall),
        Opcode::Ebreak => return Ok(Flow::Halt),
    }
    Ok(Flow::Continue)
}

fn malformed(helper: &'static str, operand: &'static str, rtl: &Rtl<'_>) -> ! {
    fatal(FatalError::MalformedOperand {
        helper,
        operand,
        pc: rtl.pc(),
    })
}

/// Destination register of `inst`.
fn dest_reg(inst: &DecodedInstruction, helper: &'static str, rtl: &Rtl<'_>) -> Gpr {
    inst.dest
        .reg()
        .unwrap_or_else(|| malformed(helper, "destination", rtl))
}

fn operand_val(op: &Operand, helper: &'static str, name: &'static str, rtl: &Rtl<'_>) -> u32 {
    op.val().unwrap_or_else(|| malformed(helper, name, rtl))
}

fn operand_addr(op: &Operand, helper: &'static str, rtl: &Rtl<'_>) -> u32 {
    op.addr().unwrap_or_else(|| malformed(helper, "address", rtl))
}
