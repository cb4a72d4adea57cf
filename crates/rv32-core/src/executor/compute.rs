//! Upper-immediate and immediate-arithmetic helpers.

use crate::decoder::DecodedInstruction;
use crate::rtl::Rtl;

use super::{dest_reg, operand_val};

pub(super) fn lui(inst: &DecodedInstruction, rtl: &mut Rtl<'_>) {
    let rd = dest_reg(inst, "lui", rtl);
    let imm = operand_val(&inst.src, "lui", "immediate", rtl);
    rtl.set_register(rd, imm);
}

pub(super) fn auipc(inst: &DecodedInstruction, rtl: &mut Rtl<'_>) {
    let rd = dest_reg(inst, "auipc", rtl);
    let imm = operand_val(&inst.src, "auipc", "immediate", rtl);
    let value = rtl.add32(rtl.pc(), imm);
    rtl.set_register(rd, value);
}

pub(super) fn addi(inst: &DecodedInstruction, rtl: &mut Rtl<'_>) {
    let rd = dest_reg(inst, "addi", rtl);
    let a = operand_val(&inst.src, "addi", "source", rtl);
    let b = operand_val(&inst.src2, "addi", "immediate", rtl);
    let value = rtl.add32(a, b);
    rtl.set_register(rd, value);
}

#[cfg(test)]
mod tests {
    use rv32_isa::Gpr;

    use crate::decoder::{DecodedInstruction, Opcode, Operand};
    use crate::executor::test_support::{reg, Machine};
    use crate::executor::Flow;
    use crate::memory::DEFAULT_RAM_START;

    fn inst(opcode: Opcode, dest: Operand, src: Operand, src2: Operand) -> DecodedInstruction {
        DecodedInstruction {
            opcode,
            raw: 0,
            dest,
            src,
            src2,
            width: 0,
        }
    }

    #[test]
    fn test_lui_and_auipc() {
        let mut m = Machine::new();
        m.exec(inst(Opcode::Lui, reg(Gpr::A0, 0), Operand::Imm(0x1234_5000), Operand::None));
        assert_eq!(m.cpu.reg(Gpr::A0), 0x1234_5000);

        let (flow, _) = m.exec(inst(Opcode::Auipc, reg(Gpr::A1, 0), Operand::Imm(0x1000), Operand::None));
        assert_eq!(flow, Flow::Continue);
        assert_eq!(m.cpu.reg(Gpr::A1), DEFAULT_RAM_START + 4 + 0x1000);
        assert_eq!(m.cpu.pc(), DEFAULT_RAM_START + 8);
    }

    #[test]
    fn test_addi_wraps() {
        let mut m = Machine::new();
        let (_, log) = m.exec(inst(
            Opcode::Addi,
            reg(Gpr::T1, 0),
            reg(Gpr::T0, 0xffff_ffff),
            Operand::Imm(2),
        ));
        assert_eq!(m.cpu.reg(Gpr::T1), 1);
        assert_eq!(log.regs_written, vec![(Gpr::T1, 0, 1)]);
    }

    #[test]
    fn test_addi_to_zero_discarded() {
        let mut m = Machine::new();
        let (_, log) = m.exec(inst(Opcode::Addi, reg(Gpr::ZERO, 0), reg(Gpr::ZERO, 0), Operand::Imm(7)));
        assert_eq!(m.cpu.reg(Gpr::ZERO), 0);
        assert!(log.regs_written.is_empty());
    }
}
