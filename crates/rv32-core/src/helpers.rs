//! Helper functions for testing RISC-V code.

use rv32_isa::{disassemble_code, Gpr};

use crate::{
    config::EmulatorConfig, emulator::Riscv32Emulator, error::EmulatorError, logging::LogLevel,
};

/// Create an emulator from encoded instruction words, with tracing enabled.
pub fn debug_riscv32_ops(ops: &[u32]) -> Result<Riscv32Emulator, EmulatorError> {
    let code = encode_ops(ops);
    let config = EmulatorConfig::default().with_log_level(LogLevel::Instructions);
    Riscv32Emulator::with_config(config, &code)
}

fn encode_ops(ops: &[u32]) -> Vec<u8> {
    ops.iter().flat_map(|op| op.to_le_bytes()).collect()
}

/// Format error with disassembly and logs.
fn format_error(emu: &Riscv32Emulator, error: &EmulatorError, ops: &[u32]) -> String {
    let base = emu.memory().base();
    let mut result = String::new();

    result.push_str("=== RISC-V Execution Error ===\n\n");
    result.push_str(&format!("Error: {}\n", error));
    result.push_str(&format!("PC: 0x{:08x}\n\n", error.pc()));

    result.push_str("Disassembly:\n");
    for line in disassemble_code(&encode_ops(ops), base).lines() {
        let marker = if line.starts_with(&format!("0x{:08x}:", error.pc())) {
            ">>> "
        } else {
            "    "
        };
        result.push_str(marker);
        result.push_str(line);
        result.push('\n');
    }

    let logs = emu.format_recent_logs(10);
    if !logs.is_empty() {
        result.push_str("\nLast execution logs:\n");
        result.push_str(&logs);
    }

    result
}

fn run(ops: &[u32]) -> (Riscv32Emulator, Result<u32, EmulatorError>) {
    let mut emu = debug_riscv32_ops(ops).expect("Failed to load code");
    let result = emu.run_until_ebreak();
    (emu, result)
}

/// Expect code to run successfully until EBREAK, returning the emulator.
pub fn expect_ok(ops: &[u32]) -> Riscv32Emulator {
    match run(ops) {
        (emu, Ok(_)) => emu,
        (emu, Err(e)) => panic!("{}\n{}", format_error(&emu, &e, ops), e),
    }
}

/// Expect code to run successfully and leave `expected` in `reg`.
pub fn expect_register(ops: &[u32], reg: Gpr, expected: u32) {
    let emu = expect_ok(ops);
    let actual = emu.get_register(reg);
    if actual != expected {
        panic!(
            "Register {} mismatch: expected 0x{:x}, got 0x{:x}\n\nCode:\n{}",
            reg,
            expected,
            actual,
            disassemble_code(&encode_ops(ops), emu.memory().base())
        );
    }
}

/// Expect code to run successfully and return a specific value in a0 (convenience function).
pub fn expect_a0(ops: &[u32], expected: u32) {
    expect_register(ops, Gpr::A0, expected);
}

/// Expect code to fail with an error accepted by `check`.
pub fn expect_error<F>(ops: &[u32], check: F)
where
    F: FnOnce(&EmulatorError) -> bool,
{
    match run(ops) {
        (emu, Ok(_)) => panic!(
            "Expected error but execution succeeded\n\nCode:\n{}",
            disassemble_code(&encode_ops(ops), emu.memory().base())
        ),
        (emu, Err(e)) => {
            if !check(&e) {
                panic!("Error check failed\n{}\n{}", format_error(&emu, &e, ops), e);
            }
        }
    }
}
