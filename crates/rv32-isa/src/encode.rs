//! Instruction encoders for the RV32I subset.
//!
//! Immediates are taken as the architectural value (byte offsets for jumps,
//! the 20-bit upper value for `lui`/`auipc`) and truncated to the field width.

use crate::Gpr;

pub const OPCODE_LOAD: u32 = 0x03;
pub const OPCODE_OP_IMM: u32 = 0x13;
pub const OPCODE_AUIPC: u32 = 0x17;
pub const OPCODE_STORE: u32 = 0x23;
pub const OPCODE_LUI: u32 = 0x37;
pub const OPCODE_JALR: u32 = 0x67;
pub const OPCODE_JAL: u32 = 0x6f;
pub const OPCODE_SYSTEM: u32 = 0x73;

fn i_type(opcode: u32, funct3: u32, rd: Gpr, rs1: Gpr, imm: i32) -> u32 {
    ((imm as u32 & 0xfff) << 20)
        | ((rs1.num() as u32) << 15)
        | (funct3 << 12)
        | ((rd.num() as u32) << 7)
        | opcode
}

fn s_type(funct3: u32, rs1: Gpr, rs2: Gpr, imm: i32) -> u32 {
    let imm = imm as u32;
    (((imm >> 5) & 0x7f) << 25)
        | ((rs2.num() as u32) << 20)
        | ((rs1.num() as u32) << 15)
        | (funct3 << 12)
        | ((imm & 0x1f) << 7)
        | OPCODE_STORE
}

fn u_type(opcode: u32, rd: Gpr, imm: u32) -> u32 {
    ((imm & 0xfffff) << 12) | ((rd.num() as u32) << 7) | opcode
}

/// `addi rd, rs1, imm`
pub fn addi(rd: Gpr, rs1: Gpr, imm: i32) -> u32 {
    i_type(OPCODE_OP_IMM, 0x0, rd, rs1, imm)
}

/// `lui rd, imm` where `imm` is the 20-bit upper value.
pub fn lui(rd: Gpr, imm: u32) -> u32 {
    u_type(OPCODE_LUI, rd, imm)
}

/// `auipc rd, imm` where `imm` is the 20-bit upper value.
pub fn auipc(rd: Gpr, imm: u32) -> u32 {
    u_type(OPCODE_AUIPC, rd, imm)
}

/// `jal rd, imm`
pub fn jal(rd: Gpr, imm: i32) -> u32 {
    let imm = imm as u32;
    (((imm >> 20) & 0x1) << 31)
        | (((imm >> 1) & 0x3ff) << 21)
        | (((imm >> 11) & 0x1) << 20)
        | (((imm >> 12) & 0xff) << 12)
        | ((rd.num() as u32) << 7)
        | OPCODE_JAL
}

/// `jalr rd, imm(rs1)`
pub fn jalr(rd: Gpr, rs1: Gpr, imm: i32) -> u32 {
    i_type(OPCODE_JALR, 0x0, rd, rs1, imm)
}

/// `lb rd, imm(rs1)`
pub fn lb(rd: Gpr, rs1: Gpr, imm: i32) -> u32 {
    i_type(OPCODE_LOAD, 0x0, rd, rs1, imm)
}

/// `lh rd, imm(rs1)`
pub fn lh(rd: Gpr, rs1: Gpr, imm: i32) -> u32 {
    i_type(OPCODE_LOAD, 0x1, rd, rs1, imm)
}

/// `lw rd, imm(rs1)`
pub fn lw(rd: Gpr, rs1: Gpr, imm: i32) -> u32 {
    i_type(OPCODE_LOAD, 0x2, rd, rs1, imm)
}

/// `lbu rd, imm(rs1)`
pub fn lbu(rd: Gpr, rs1: Gpr, imm: i32) -> u32 {
    i_type(OPCODE_LOAD, 0x4, rd, rs1, imm)
}

/// `lhu rd, imm(rs1)`
pub fn lhu(rd: Gpr, rs1: Gpr, imm: i32) -> u32 {
    i_type(OPCODE_LOAD, 0x5, rd, rs1, imm)
}

/// `sb rs2, imm(rs1)`
pub fn sb(rs1: Gpr, rs2: Gpr, imm: i32) -> u32 {
    s_type(0x0, rs1, rs2, imm)
}

/// `sh rs2, imm(rs1)`
pub fn sh(rs1: Gpr, rs2: Gpr, imm: i32) -> u32 {
    s_type(0x1, rs1, rs2, imm)
}

/// `sw rs2, imm(rs1)`
pub fn sw(rs1: Gpr, rs2: Gpr, imm: i32) -> u32 {
    s_type(0x2, rs1, rs2, imm)
}

pub fn ecall() -> u32 {
    OPCODE_SYSTEM
}

pub fn ebreak() -> u32 {
    0x0010_0000 | OPCODE_SYSTEM
}
