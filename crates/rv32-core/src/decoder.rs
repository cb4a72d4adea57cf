//! Instruction decoder for RISC-V 32-bit instructions.
//!
//! Operands are resolved at decode time: register sources carry the value
//! read from the register file and memory operands carry the effective
//! address, so execute helpers only combine precomputed values.

use rv32_isa::{
    Gpr, OPCODE_AUIPC, OPCODE_JAL, OPCODE_JALR, OPCODE_LOAD, OPCODE_LUI, OPCODE_OP_IMM,
    OPCODE_STORE, OPCODE_SYSTEM,
};

use crate::state::CpuState;

/// Helper family an instruction is dispatched to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    Lui,
    Auipc,
    Addi,
    Jal,
    Jalr,
    /// Zero-extending load (`lw`, `lhu`, `lbu`).
    Ld,
    /// Store (`sw`, `sh`, `sb`).
    St,
    Lh,
    Lb,
    Ecall,
    Ebreak,
}

/// A decoded operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    None,
    /// Register and the value it held at decode time.
    Reg { reg: Gpr, val: u32 },
    Imm(u32),
    /// Effective memory address.
    Addr(u32),
}

impl Operand {
    fn reg_of(cpu: &CpuState, reg: Gpr) -> Self {
        Operand::Reg {
            reg,
            val: cpu.reg(reg),
        }
    }

    pub fn reg(&self) -> Option<Gpr> {
        match self {
            Operand::Reg { reg, .. } => Some(*reg),
            _ => None,
        }
    }

    /// Register value or immediate.
    pub fn val(&self) -> Option<u32> {
        match self {
            Operand::Reg { val, .. } => Some(*val),
            Operand::Imm(imm) => Some(*imm),
            _ => None,
        }
    }

    pub fn addr(&self) -> Option<u32> {
        match self {
            Operand::Addr(addr) => Some(*addr),
            _ => None,
        }
    }
}

/// Decoded instruction record consumed by one execute helper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedInstruction {
    pub opcode: Opcode,
    /// Raw instruction word.
    pub raw: u32,
    pub dest: Operand,
    pub src: Operand,
    pub src2: Operand,
    /// Access width in bytes for loads and stores, 0 otherwise.
    pub width: u8,
}

impl DecodedInstruction {
    fn new(opcode: Opcode, raw: u32) -> Self {
        Self {
            opcode,
            raw,
            dest: Operand::None,
            src: Operand::None,
            src2: Operand::None,
            width: 0,
        }
    }
}

fn imm_i(inst: u32) -> u32 {
    ((inst as i32) >> 20) as u32
}

fn imm_s(inst: u32) -> u32 {
    ((((inst & 0xfe00_0000) as i32) >> 20) as u32) | ((inst >> 7) & 0x1f)
}

fn imm_j(inst: u32) -> u32 {
    let imm = ((inst >> 31) & 0x1) << 20
        | ((inst >> 12) & 0xff) << 12
        | ((inst >> 20) & 0x1) << 11
        | ((inst >> 21) & 0x3ff) << 1;
    (((imm << 11) as i32) >> 11) as u32
}

/// Decode a 32-bit instruction word against the current register state.
pub fn decode_instruction(inst: u32, cpu: &CpuState) -> Result<DecodedInstruction, String> {
    let opcode = inst & 0x7f;
    let rd = Gpr::from_field(inst >> 7);
    let funct3 = (inst >> 12) & 0x7;
    let rs1 = Gpr::from_field(inst >> 15);
    let rs2 = Gpr::from_field(inst >> 20);

    let decoded = match opcode {
        OPCODE_LUI | OPCODE_AUIPC => {
            let op = if opcode == OPCODE_LUI {
                Opcode::Lui
            } else {
                Opcode::Auipc
            };
            DecodedInstruction {
                dest: Operand::reg_of(cpu, rd),
                src: Operand::Imm(inst & 0xffff_f000),
                ..DecodedInstruction::new(op, inst)
            }
        }
        OPCODE_OP_IMM => match funct3 {
            0x0 => DecodedInstruction {
                dest: Operand::reg_of(cpu, rd),
                src: Operand::reg_of(cpu, rs1),
                src2: Operand::Imm(imm_i(inst)),
                ..DecodedInstruction::new(Opcode::Addi, inst)
            },
            _ => {
                return Err(format!(
                    "Unknown I-type arithmetic instruction: funct3=0x{:x}",
                    funct3
                ))
            }
        },
        OPCODE_JAL => DecodedInstruction {
            dest: Operand::reg_of(cpu, rd),
            src: Operand::Imm(imm_j(inst)),
            ..DecodedInstruction::new(Opcode::Jal, inst)
        },
        OPCODE_JALR => match funct3 {
            0x0 => DecodedInstruction {
                dest: Operand::reg_of(cpu, rd),
                src: Operand::reg_of(cpu, rs1),
                src2: Operand::Imm(imm_i(inst)),
                ..DecodedInstruction::new(Opcode::Jalr, inst)
            },
            _ => return Err(format!("Unknown jalr instruction: funct3=0x{:x}", funct3)),
        },
        OPCODE_LOAD => {
            let (op, width) = match funct3 {
                0x0 => (Opcode::Lb, 1),
                0x1 => (Opcode::Lh, 2),
                0x2 => (Opcode::Ld, 4),
                0x4 => (Opcode::Ld, 1),
                0x5 => (Opcode::Ld, 2),
                _ => return Err(format!("Unknown load instruction: funct3=0x{:x}", funct3)),
            };
            DecodedInstruction {
                dest: Operand::reg_of(cpu, rd),
                src: Operand::Addr(cpu.reg(rs1).wrapping_add(imm_i(inst))),
                width,
                ..DecodedInstruction::new(op, inst)
            }
        }
        OPCODE_STORE => {
            let width = match funct3 {
                0x0 => 1,
                0x1 => 2,
                0x2 => 4,
                _ => return Err(format!("Unknown store instruction: funct3=0x{:x}", funct3)),
            };
            DecodedInstruction {
                dest: Operand::reg_of(cpu, rs2),
                src: Operand::Addr(cpu.reg(rs1).wrapping_add(imm_s(inst))),
                width,
                ..DecodedInstruction::new(Opcode::St, inst)
            }
        }
        OPCODE_SYSTEM => match inst {
            0x0000_0073 => DecodedInstruction::new(Opcode::Ecall, inst),
            0x0010_0073 => DecodedInstruction::new(Opcode::Ebreak, inst),
            _ => return Err(format!("Unknown system instruction: 0x{:08x}", inst)),
        },
        _ => return Err(format!("Unknown opcode: 0x{:02x}", opcode)),
    };

    Ok(decoded)
}
