//! RISC-V 32-bit instruction disassembly.

use alloc::{format, string::String};

use crate::encode::{
    OPCODE_AUIPC, OPCODE_JAL, OPCODE_JALR, OPCODE_LOAD, OPCODE_LUI, OPCODE_OP_IMM, OPCODE_STORE,
    OPCODE_SYSTEM,
};
use crate::Gpr;

fn imm_i(inst: u32) -> i32 {
    (inst as i32) >> 20
}

fn imm_s(inst: u32) -> i32 {
    (((inst & 0xfe00_0000) as i32) >> 20) | ((inst >> 7) & 0x1f) as i32
}

fn imm_j(inst: u32) -> i32 {
    let imm = ((inst >> 31) & 0x1) << 20
        | ((inst >> 12) & 0xff) << 12
        | ((inst >> 20) & 0x1) << 11
        | ((inst >> 21) & 0x3ff) << 1;
    ((imm << 11) as i32) >> 11
}

/// Disassemble a single RISC-V 32-bit instruction.
///
/// Returns a human-readable string like "lw a0, 4(sp)" or "jal ra, 16".
pub fn disassemble_instruction(inst: u32) -> String {
    let opcode = inst & 0x7f;
    let rd = Gpr::from_field(inst >> 7);
    let funct3 = (inst >> 12) & 0x7;
    let rs1 = Gpr::from_field(inst >> 15);
    let rs2 = Gpr::from_field(inst >> 20);

    match opcode {
        OPCODE_OP_IMM if funct3 == 0 => format!("addi {}, {}, {}", rd, rs1, imm_i(inst)),
        OPCODE_LUI => format!("lui {}, 0x{:05x}", rd, inst >> 12),
        OPCODE_AUIPC => format!("auipc {}, 0x{:05x}", rd, inst >> 12),
        OPCODE_JAL => format!("jal {}, {}", rd, imm_j(inst)),
        OPCODE_JALR if funct3 == 0 => format!("jalr {}, {}({})", rd, imm_i(inst), rs1),
        OPCODE_LOAD => {
            let name = match funct3 {
                0x0 => "lb",
                0x1 => "lh",
                0x2 => "lw",
                0x4 => "lbu",
                0x5 => "lhu",
                _ => return format!("unknown_load 0x{:08x}", inst),
            };
            format!("{} {}, {}({})", name, rd, imm_i(inst), rs1)
        }
        OPCODE_STORE => {
            let name = match funct3 {
                0x0 => "sb",
                0x1 => "sh",
                0x2 => "sw",
                _ => return format!("unknown_store 0x{:08x}", inst),
            };
            format!("{} {}, {}({})", name, rs2, imm_s(inst), rs1)
        }
        OPCODE_SYSTEM if inst == 0x0000_0073 => String::from("ecall"),
        OPCODE_SYSTEM if inst == 0x0010_0073 => String::from("ebreak"),
        _ => format!("unknown 0x{:08x} (opcode=0x{:02x})", inst, opcode),
    }
}

/// Disassemble a code buffer, one instruction per line prefixed with its
/// address relative to `base`.
pub fn disassemble_code(code: &[u8], base: u32) -> String {
    let mut result = String::new();
    let mut chunks = code.chunks_exact(4);
    let mut offset = 0u32;

    for chunk in &mut chunks {
        let inst = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        result.push_str(&format!(
            "0x{:08x}: {}\n",
            base.wrapping_add(offset),
            disassemble_instruction(inst)
        ));
        offset += 4;
    }

    if !chunks.remainder().is_empty() {
        result.push_str(&format!(
            "0x{:08x}: <incomplete instruction>\n",
            base.wrapping_add(offset)
        ));
    }

    result
}
