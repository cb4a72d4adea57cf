//! Load and store helpers.

use crate::decoder::DecodedInstruction;
use crate::error::EmulatorError;
use crate::rtl::Rtl;

use super::{dest_reg, operand_addr, operand_val};

/// Zero-extending load of `inst.width` bytes.
pub(super) fn ld(inst: &DecodedInstruction, rtl: &mut Rtl<'_>) -> Result<(), EmulatorError> {
    let rd = dest_reg(inst, "ld", rtl);
    let addr = operand_addr(&inst.src, "ld", rtl);
    let value = rtl.load_memory(addr, inst.width)?;
    rtl.set_register(rd, value);
    Ok(())
}

/// Store the low `inst.width` bytes of the destination operand's value.
pub(super) fn st(inst: &DecodedInstruction, rtl: &mut Rtl<'_>) -> Result<(), EmulatorError> {
    let addr = operand_addr(&inst.src, "st", rtl);
    let value = operand_val(&inst.dest, "st", "value", rtl);
    rtl.store_memory(addr, value, inst.width)
}

/// Sign-extending halfword load.
pub(super) fn lh(inst: &DecodedInstruction, rtl: &mut Rtl<'_>) -> Result<(), EmulatorError> {
    let rd = dest_reg(inst, "lh", rtl);
    let addr = operand_addr(&inst.src, "lh", rtl);
    let value = rtl.load_memory(addr, 2)?;
    let value = rtl.sign_extend(value, 2);
    rtl.set_register(rd, value);
    Ok(())
}

/// Sign-extending byte load.
pub(super) fn lb(inst: &DecodedInstruction, rtl: &mut Rtl<'_>) -> Result<(), EmulatorError> {
    let rd = dest_reg(inst, "lb", rtl);
    let addr = operand_addr(&inst.src, "lb", rtl);
    let value = rtl.load_memory(addr, 1)?;
    let value = rtl.sign_extend(value, 1);
    rtl.set_register(rd, value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use rv32_isa::Gpr;

    use crate::decoder::{DecodedInstruction, Opcode, Operand};
    use crate::error::{EmulatorError, FatalError, MemoryAccessKind};
    use crate::executor::execute_instruction;
    use crate::executor::test_support::{reg, Machine};
    use crate::memory::{GuestMemory, Width, DEFAULT_RAM_START};
    use crate::rtl::Rtl;

    const DATA: u32 = DEFAULT_RAM_START + 0x100;

    fn load(opcode: Opcode, rd: Gpr, addr: u32, width: u8) -> DecodedInstruction {
        DecodedInstruction {
            opcode,
            raw: 0,
            dest: reg(rd, 0),
            src: Operand::Addr(addr),
            src2: Operand::None,
            width,
        }
    }

    fn store(value: u32, addr: u32, width: u8) -> DecodedInstruction {
        DecodedInstruction {
            opcode: Opcode::St,
            raw: 0,
            dest: reg(Gpr::A1, value),
            src: Operand::Addr(addr),
            src2: Operand::None,
            width,
        }
    }

    fn machine_with_data() -> Machine {
        let mut m = Machine::new();
        m.memory.load(DATA, &[0x80, 0xff, 0x7f, 0x12]).unwrap();
        m
    }

    #[test]
    fn test_zero_vs_sign_extension() {
        let mut m = machine_with_data();
        m.exec(load(Opcode::Ld, Gpr::A0, DATA, 1));
        m.exec(load(Opcode::Lb, Gpr::A1, DATA, 1));
        m.exec(load(Opcode::Ld, Gpr::A2, DATA, 2));
        m.exec(load(Opcode::Lh, Gpr::A3, DATA, 2));
        m.exec(load(Opcode::Lh, Gpr::A4, DATA + 2, 2));
        m.exec(load(Opcode::Ld, Gpr::A5, DATA, 4));

        assert_eq!(m.cpu.reg(Gpr::A0), 0x80);
        assert_eq!(m.cpu.reg(Gpr::A1), 0xffff_ff80);
        assert_eq!(m.cpu.reg(Gpr::A2), 0xff80);
        assert_eq!(m.cpu.reg(Gpr::A3), 0xffff_ff80);
        assert_eq!(m.cpu.reg(Gpr::A4), 0x127f);
        assert_eq!(m.cpu.reg(Gpr::A5), 0x127f_ff80);
    }

    #[test]
    fn test_store_widths() {
        let mut m = Machine::new();
        m.exec(store(0xdead_beef, DATA, 4));
        m.exec(store(0x1234_5678, DATA, 1));
        m.exec(store(0xaaaa_cccc, DATA + 2, 2));
        assert_eq!(m.memory.read(DATA, Width::Word).unwrap(), 0xcccc_be78);
    }

    #[test]
    fn test_store_then_load_round_trip() {
        let mut m = Machine::new();
        let (_, log) = m.exec(store(0x0000_8001, DATA, 2));
        assert_eq!(log.memory_writes.len(), 1);
        assert_eq!(log.memory_writes[0].old, Some(0));
        m.exec(load(Opcode::Lh, Gpr::A0, DATA, 2));
        assert_eq!(m.cpu.reg(Gpr::A0), 0xffff_8001);
    }

    #[test]
    fn test_load_out_of_range() {
        let mut m = Machine::new();
        let inst = load(Opcode::Ld, Gpr::A0, 0x10, 4);
        let mut rtl = Rtl::new(&mut m.cpu, &mut m.memory, &mut m.difftest, 0);
        let err = execute_instruction(&inst, &mut rtl).unwrap_err();
        assert!(matches!(
            err,
            EmulatorError::InvalidMemoryAccess {
                address: 0x10,
                kind: MemoryAccessKind::Read,
                ..
            }
        ));
        drop(rtl);
        assert_eq!(m.cpu.reg(Gpr::A0), 0);
    }

    #[test]
    fn test_unsupported_width_is_fatal() {
        let caught = std::panic::catch_unwind(|| {
            machine_with_data().exec(load(Opcode::Ld, Gpr::A0, DATA, 3));
        })
        .unwrap_err();
        assert!(matches!(
            caught.downcast_ref::<FatalError>(),
            Some(FatalError::UnsupportedWidth { width: 3, .. })
        ));
    }

    #[test]
    fn test_store_without_address_is_fatal() {
        let caught = std::panic::catch_unwind(|| {
            let mut inst = store(1, DATA, 4);
            inst.src = Operand::Imm(DATA);
            Machine::new().exec(inst);
        })
        .unwrap_err();
        assert!(matches!(
            caught.downcast_ref::<FatalError>(),
            Some(FatalError::MalformedOperand {
                helper: "st",
                operand: "address",
                ..
            })
        ));
    }
}
