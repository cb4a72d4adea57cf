//! Primitive register-transfer operations.
//!
//! Execute helpers never touch [`CpuState`] or guest memory directly; every
//! architectural effect goes through an [`Rtl`] so it can be traced and so the
//! jump target stays pending until the helper returns.

use rv32_isa::Gpr;

use crate::difftest::{DifftestHook, SkipReason};
use crate::error::{fatal, EmulatorError, FatalError};
use crate::logging::{InstLog, MemRead, MemWrite};
use crate::memory::{GuestMemory, Width};
use crate::state::CpuState;

/// Register-transfer context for one instruction.
pub struct Rtl<'a> {
    cpu: &'a mut CpuState,
    memory: &'a mut dyn GuestMemory,
    difftest: &'a mut Option<Box<dyn DifftestHook>>,
    pc: u32,
    jmp_target: Option<u32>,
    log: InstLog,
}

impl<'a> Rtl<'a> {
    pub fn new(
        cpu: &'a mut CpuState,
        memory: &'a mut dyn GuestMemory,
        difftest: &'a mut Option<Box<dyn DifftestHook>>,
        instruction: u32,
    ) -> Self {
        let pc = cpu.pc();
        Self {
            cpu,
            memory,
            difftest,
            pc,
            jmp_target: None,
            log: InstLog::new(pc, instruction),
        }
    }

    /// PC of the instruction being executed. Never reflects a pending jump.
    pub fn pc(&self) -> u32 {
        self.pc
    }

    fn width(&self, bytes: u8) -> Width {
        Width::from_bytes(bytes).unwrap_or_else(|| {
            fatal(FatalError::UnsupportedWidth {
                width: bytes,
                pc: self.pc,
            })
        })
    }

    /// Read `width` bytes at `addr`, zero-extended.
    pub fn load_memory(&mut self, addr: u32, width: u8) -> Result<u32, EmulatorError> {
        let width = self.width(width);
        let value = self.memory.read(addr, width)?;
        self.log.memory_reads.push(MemRead { addr, width, value });
        Ok(value)
    }

    /// Write the low `width` bytes of `value` at `addr`.
    pub fn store_memory(&mut self, addr: u32, value: u32, width: u8) -> Result<(), EmulatorError> {
        let width = self.width(width);
        let old = self.memory.read(addr, width).ok();
        self.memory.write(addr, width, value)?;
        self.log.memory_writes.push(MemWrite {
            addr,
            width,
            old,
            new: value & width.mask(),
        });
        Ok(())
    }

    /// Sign-extend the low `width * 8` bits of `value`.
    pub fn sign_extend(&self, value: u32, width: u8) -> u32 {
        let shift = 32 - self.width(width).bits();
        (((value << shift) as i32) >> shift) as u32
    }

    /// Write a register; writes to register 0 are discarded.
    pub fn set_register(&mut self, reg: Gpr, value: u32) {
        if let Some(old) = self.cpu.set_reg(reg, value) {
            self.log.regs_written.push((reg, old, value));
        }
    }

    pub fn add32(&self, a: u32, b: u32) -> u32 {
        a.wrapping_add(b)
    }

    /// Stage `target` as the next PC. Applied by the caller once the helper
    /// has returned.
    pub fn commit_jump(&mut self, target: u32) {
        self.jmp_target = Some(target);
        self.log.jump = Some(target);
    }

    /// Tell an attached reference model to skip `count` retirements.
    pub fn difftest_skip(&mut self, count: u32) {
        if let Some(hook) = self.difftest.as_mut() {
            log::trace!("difftest: skip {} at 0x{:08x}", count, self.pc);
            hook.skip(count, SkipReason::MultiStepEmulation);
        }
    }

    /// Consume the context, returning the pending jump and the trace entry.
    pub fn finish(self) -> (Option<u32>, InstLog) {
        (self.jmp_target, self.log)
    }
}
