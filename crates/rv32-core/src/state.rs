//! Architectural register file.

use core::fmt::Write as _;

use rv32_isa::{Gpr, REG_NAMES};

/// A register the debugger can name: one of the 32 GPRs or the PC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegName {
    Gpr(Gpr),
    Pc,
}

impl RegName {
    /// Resolve a mnemonic (`$0`, `ra`, ..., `t6`, `xN`, or `pc`).
    pub fn parse(name: &str) -> Option<Self> {
        if name == "pc" {
            return Some(RegName::Pc);
        }
        Gpr::from_name(name).map(RegName::Gpr)
    }

    pub fn name(&self) -> &'static str {
        match self {
            RegName::Gpr(reg) => reg.name(),
            RegName::Pc => "pc",
        }
    }
}

/// General-purpose registers and program counter.
///
/// Register 0 always reads as zero; writes to it are discarded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CpuState {
    gpr: [u32; 32],
    pc: u32,
}

impl CpuState {
    pub fn new(pc: u32) -> Self {
        Self { gpr: [0; 32], pc }
    }

    pub fn reg(&self, reg: Gpr) -> u32 {
        if reg == Gpr::ZERO {
            0
        } else {
            self.gpr[reg.index()]
        }
    }

    /// Write a register, returning the previous value.
    ///
    /// Returns `None` for the zero register, whose writes are dropped.
    pub fn set_reg(&mut self, reg: Gpr, value: u32) -> Option<u32> {
        if reg == Gpr::ZERO {
            return None;
        }
        Some(core::mem::replace(&mut self.gpr[reg.index()], value))
    }

    pub fn pc(&self) -> u32 {
        self.pc
    }

    pub fn set_pc(&mut self, pc: u32) {
        self.pc = pc;
    }

    pub fn regs(&self) -> &[u32; 32] {
        &self.gpr
    }

    pub fn read(&self, name: RegName) -> u32 {
        match name {
            RegName::Gpr(reg) => self.reg(reg),
            RegName::Pc => self.pc,
        }
    }

    /// Value of the register called `name`, or `None` if no register has
    /// that name.
    pub fn value_of(&self, name: &str) -> Option<u32> {
        RegName::parse(name).map(|reg| self.read(reg))
    }

    /// One line per register plus the PC: name, hex value, signed decimal.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for (index, name) in REG_NAMES.iter().enumerate() {
            let value = self.reg(Gpr::new(index as u8));
            let _ = writeln!(out, "{:<6} 0x{:08x} {:>11}", name, value, value as i32);
        }
        let _ = writeln!(out, "{:<6} 0x{:08x} {:>11}", "pc", self.pc, self.pc as i32);
        out
    }
}
