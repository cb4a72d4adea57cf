//! Jump-and-link helpers.

use crate::decoder::DecodedInstruction;
use crate::rtl::Rtl;

use super::{dest_reg, operand_val};

/// `jal`: link `pc + 4`, jump to `pc + imm`.
pub(super) fn jal(inst: &DecodedInstruction, rtl: &mut Rtl<'_>) {
    let rd = dest_reg(inst, "jal", rtl);
    let offset = operand_val(&inst.src, "jal", "offset", rtl);

    let link = rtl.add32(rtl.pc(), 4);
    rtl.set_register(rd, link);
    let target = rtl.add32(rtl.pc(), offset);
    rtl.commit_jump(target);
}

/// `jalr`: jump to `(rs1 + imm) & !1`, link `pc + 4`.
///
/// The reference model retires `jalr` in two steps, so it is told to skip one.
pub(super) fn jalr(inst: &DecodedInstruction, rtl: &mut Rtl<'_>) {
    let rd = dest_reg(inst, "jalr", rtl);
    let base = operand_val(&inst.src, "jalr", "base", rtl);
    let offset = operand_val(&inst.src2, "jalr", "offset", rtl);

    let target = rtl.add32(base, offset) & !1;
    let link = rtl.add32(rtl.pc(), 4);
    rtl.set_register(rd, link);
    rtl.commit_jump(target);

    rtl.difftest_skip(1);
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use rv32_isa::Gpr;

    use crate::decoder::{DecodedInstruction, Opcode, Operand};
    use crate::difftest::{DifftestHook, SkipReason};
    use crate::executor::test_support::{reg, Machine};
    use crate::memory::DEFAULT_RAM_START;

    fn jal_inst(rd: Gpr, imm: i32) -> DecodedInstruction {
        DecodedInstruction {
            opcode: Opcode::Jal,
            raw: rv32_isa::jal(rd, imm),
            dest: reg(rd, 0),
            src: Operand::Imm(imm as u32),
            src2: Operand::None,
            width: 0,
        }
    }

    fn jalr_inst(rd: Gpr, base: u32, imm: i32) -> DecodedInstruction {
        DecodedInstruction {
            opcode: Opcode::Jalr,
            raw: rv32_isa::jalr(rd, Gpr::T0, imm),
            dest: reg(rd, 0),
            src: reg(Gpr::T0, base),
            src2: Operand::Imm(imm as u32),
            width: 0,
        }
    }

    struct Recorder(Rc<RefCell<Vec<(u32, SkipReason)>>>);

    impl DifftestHook for Recorder {
        fn skip(&mut self, count: u32, reason: SkipReason) {
            self.0.borrow_mut().push((count, reason));
        }
    }

    #[test]
    fn test_jal_links_and_jumps() {
        let mut m = Machine::new();
        let (_, log) = m.exec(jal_inst(Gpr::RA, 0x40));
        assert_eq!(m.cpu.reg(Gpr::RA), DEFAULT_RAM_START + 4);
        assert_eq!(m.cpu.pc(), DEFAULT_RAM_START + 0x40);
        assert_eq!(log.jump, Some(DEFAULT_RAM_START + 0x40));
    }

    #[test]
    fn test_jal_backwards() {
        let mut m = Machine::new();
        m.cpu.set_pc(DEFAULT_RAM_START + 0x100);
        m.exec(jal_inst(Gpr::ZERO, -0x100));
        assert_eq!(m.cpu.pc(), DEFAULT_RAM_START);
        assert_eq!(m.cpu.reg(Gpr::ZERO), 0);
    }

    #[test]
    fn test_jalr_clears_low_bit() {
        for (base, imm) in [(0x8000_0011u32, 0), (0x8000_0010, 1), (0x8000_0013, -2), (1, 0)] {
            let mut m = Machine::new();
            m.exec(jalr_inst(Gpr::RA, base, imm));
            assert_eq!(m.cpu.pc() & 1, 0, "base=0x{:x} imm={}", base, imm);
            assert_eq!(m.cpu.pc(), base.wrapping_add(imm as u32) & !1);
            assert_eq!(m.cpu.reg(Gpr::RA), DEFAULT_RAM_START + 4);
        }
    }

    #[test]
    fn test_jalr_rd_equals_rs1_uses_old_base() {
        let mut m = Machine::new();
        let mut inst = jalr_inst(Gpr::T0, 0x8000_0200, 4);
        inst.dest = reg(Gpr::T0, 0x8000_0200);
        m.exec(inst);
        assert_eq!(m.cpu.pc(), 0x8000_0204);
        assert_eq!(m.cpu.reg(Gpr::T0), DEFAULT_RAM_START + 4);
    }

    #[test]
    fn test_jalr_signals_difftest_skip() {
        let skips = Rc::new(RefCell::new(Vec::new()));
        let mut m = Machine::new();
        m.difftest = Some(Box::new(Recorder(skips.clone())));
        m.exec(jalr_inst(Gpr::RA, 0x8000_0000, 0));
        m.exec(jal_inst(Gpr::RA, 8));
        assert_eq!(*skips.borrow(), vec![(1, SkipReason::MultiStepEmulation)]);
    }

    #[test]
    fn test_jal_missing_destination_is_fatal() {
        let caught = std::panic::catch_unwind(|| {
            let mut inst = jal_inst(Gpr::RA, 8);
            inst.dest = Operand::Imm(0);
            Machine::new().exec(inst);
        })
        .unwrap_err();
        assert!(matches!(
            caught.downcast_ref::<crate::FatalError>(),
            Some(crate::FatalError::MalformedOperand { helper: "jal", .. })
        ));
    }
}
