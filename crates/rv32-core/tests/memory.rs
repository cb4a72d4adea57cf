//! Memory access tests for the RISC-V 32 emulator.

use rv32_core::{
    EmulatorConfig, EmulatorError, GuestMemory, MemoryAccessKind, Riscv32Emulator, Width,
    DEFAULT_RAM_START,
};
use rv32_isa::{addi, jalr, lui, lw, sw, Gpr};

fn code(ops: &[u32]) -> Vec<u8> {
    ops.iter().flat_map(|op| op.to_le_bytes()).collect()
}

#[test]
fn test_unaligned_access_is_allowed() {
    let mut emu = Riscv32Emulator::new(&code(&[
        lui(Gpr::SP, 0x80000),
        addi(Gpr::SP, Gpr::SP, 0x101),
        addi(Gpr::A1, Gpr::ZERO, 0x123),
        sw(Gpr::SP, Gpr::A1, 0),
        lw(Gpr::A0, Gpr::SP, 0),
        rv32_isa::ebreak(),
    ]))
    .unwrap();

    assert_eq!(emu.run_until_ebreak().unwrap(), 0x123);
    assert_eq!(
        emu.memory().read(DEFAULT_RAM_START + 0x101, Width::Half).unwrap(),
        0x123
    );
}

#[test]
fn test_out_of_bounds_read() {
    // 0x80100000 is one past the end of the default 1 MiB of RAM.
    let mut emu = Riscv32Emulator::new(&code(&[
        lui(Gpr::SP, 0x80100),
        lw(Gpr::A0, Gpr::SP, 0),
    ]))
    .unwrap();

    assert!(emu.step().is_ok());
    match emu.step() {
        Err(EmulatorError::InvalidMemoryAccess {
            address, kind, pc, ..
        }) => {
            assert_eq!(address, 0x8010_0000);
            assert_eq!(kind, MemoryAccessKind::Read);
            assert_eq!(pc, DEFAULT_RAM_START + 4);
        }
        other => panic!("Expected InvalidMemoryAccess error, got {:?}", other),
    }
}

#[test]
fn test_out_of_bounds_write() {
    let mut emu = Riscv32Emulator::new(&code(&[
        lui(Gpr::SP, 0x80100),
        addi(Gpr::SP, Gpr::SP, -2),
        sw(Gpr::SP, Gpr::A0, 0),
    ]))
    .unwrap();

    let err = emu.run_until_ebreak().unwrap_err();
    assert_eq!(
        err,
        EmulatorError::InvalidMemoryAccess {
            address: 0x800f_fffe,
            size: 4,
            kind: MemoryAccessKind::Write,
            pc: DEFAULT_RAM_START + 8,
        }
    );
    // A faulting instruction does not advance the PC.
    assert_eq!(emu.pc(), DEFAULT_RAM_START + 8);
}

#[test]
fn test_fetch_outside_ram() {
    let mut emu = Riscv32Emulator::new(&code(&[jalr(Gpr::ZERO, Gpr::ZERO, 0)])).unwrap();
    emu.step().unwrap();
    match emu.step() {
        Err(EmulatorError::InvalidMemoryAccess { kind, pc, .. }) => {
            assert_eq!(kind, MemoryAccessKind::InstructionFetch);
            assert_eq!(pc, 0);
        }
        other => panic!("Expected instruction fetch error, got {:?}", other),
    }
}

#[test]
fn test_custom_ram_base() {
    let config = EmulatorConfig::default().with_ram(0x1000, 0x100);
    let mut emu = Riscv32Emulator::with_config(
        config,
        &code(&[
            lui(Gpr::T0, 0x1),
            addi(Gpr::A1, Gpr::ZERO, 77),
            sw(Gpr::T0, Gpr::A1, 0x80),
            lw(Gpr::A0, Gpr::T0, 0x80),
            rv32_isa::ebreak(),
        ]),
    )
    .unwrap();

    assert_eq!(emu.pc(), 0x1000);
    assert_eq!(emu.run_until_ebreak().unwrap(), 77);
    assert_eq!(emu.memory().ram()[0x80], 77);
}
