//! Core RISC-V 32-bit emulator implementation.

use std::collections::VecDeque;

use rv32_isa::Gpr;

use crate::{
    config::EmulatorConfig,
    decoder::decode_instruction,
    difftest::DifftestHook,
    error::EmulatorError,
    executor::{execute_instruction, Flow},
    logging::{InstLog, LogLevel},
    memory::Memory,
    rtl::Rtl,
    state::CpuState,
};

/// Result of a single step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepResult {
    /// Normal step completed, continue execution
    Continue,
    /// ECALL encountered, syscall information available
    Syscall(SyscallInfo),
    /// EBREAK encountered, execution halted
    Halted,
}

/// Information about a syscall (ECALL).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyscallInfo {
    /// Syscall number (from a7 register)
    pub number: u32,
    /// Syscall arguments (from a0-a6 registers)
    pub args: [u32; 7],
}

/// RISC-V 32-bit emulator.
pub struct Riscv32Emulator {
    cpu: CpuState,
    memory: Memory,
    difftest: Option<Box<dyn DifftestHook>>,
    instruction_count: u64,
    max_instructions: u64,
    log_level: LogLevel,
    trace_capacity: usize,
    log_buffer: VecDeque<InstLog>,
}

impl Riscv32Emulator {
    /// Create an emulator with the default configuration, `image` loaded at
    /// the start of RAM.
    pub fn new(image: &[u8]) -> Result<Self, EmulatorError> {
        Self::with_config(EmulatorConfig::default(), image)
    }

    pub fn with_config(config: EmulatorConfig, image: &[u8]) -> Result<Self, EmulatorError> {
        let mut memory = Memory::new(config.ram_base, config.ram_size);
        memory.load(config.ram_base, image)?;
        log::debug!(
            "loaded {} byte image at 0x{:08x} ({} bytes of RAM)",
            image.len(),
            config.ram_base,
            config.ram_size
        );

        Ok(Self {
            cpu: CpuState::new(config.ram_base),
            memory,
            difftest: None,
            instruction_count: 0,
            max_instructions: config.max_instructions,
            log_level: config.log_level,
            trace_capacity: config.trace_capacity,
            log_buffer: VecDeque::new(),
        })
    }

    /// Set the maximum number of instructions to execute.
    pub fn with_max_instructions(mut self, limit: u64) -> Self {
        self.max_instructions = limit;
        self
    }

    /// Set the logging level.
    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    /// Attach a differential-testing reference model.
    pub fn with_difftest(mut self, hook: Box<dyn DifftestHook>) -> Self {
        self.difftest = Some(hook);
        self
    }

    /// Execute a single instruction.
    pub fn step(&mut self) -> Result<StepResult, EmulatorError> {
        let result = self.step_inner();
        if let Err(e) = &result {
            if self.log_level >= LogLevel::Errors {
                log::warn!("{}", e);
            }
        }
        result
    }

    fn step_inner(&mut self) -> Result<StepResult, EmulatorError> {
        let pc = self.cpu.pc();

        if self.instruction_count >= self.max_instructions {
            return Err(EmulatorError::InstructionLimitExceeded {
                limit: self.max_instructions,
                executed: self.instruction_count,
                pc,
            });
        }

        let inst_word = self
            .memory
            .fetch_instruction(pc)
            .map_err(|e| e.at_pc(pc))?;

        let decoded = decode_instruction(inst_word, &self.cpu).map_err(|reason| {
            EmulatorError::InvalidInstruction {
                pc,
                instruction: inst_word,
                reason,
            }
        })?;

        // Counted before execution so the trace carries the retirement number.
        self.instruction_count += 1;

        let mut rtl = Rtl::new(&mut self.cpu, &mut self.memory, &mut self.difftest, inst_word);
        let flow = execute_instruction(&decoded, &mut rtl).map_err(|e| e.at_pc(pc))?;
        let (jump, log) = rtl.finish();

        self.cpu.set_pc(jump.unwrap_or(pc.wrapping_add(4)));
        self.log_instruction(log.set_cycle(self.instruction_count));

        match flow {
            Flow::Continue => Ok(StepResult::Continue),
            Flow::Halt => Ok(StepResult::Halted),
            Flow::Syscall => {
                let reg = |r: Gpr| self.cpu.reg(r);
                Ok(StepResult::Syscall(SyscallInfo {
                    number: reg(Gpr::A7),
                    args: [
                        reg(Gpr::A0),
                        reg(Gpr::A1),
                        reg(Gpr::A2),
                        reg(Gpr::A3),
                        reg(Gpr::A4),
                        reg(Gpr::A5),
                        reg(Gpr::A6),
                    ],
                }))
            }
        }
    }

    /// Run until EBREAK is encountered, returning the value in a0.
    pub fn run_until_ebreak(&mut self) -> Result<u32, EmulatorError> {
        loop {
            match self.step()? {
                StepResult::Halted => return Ok(self.cpu.reg(Gpr::A0)),
                StepResult::Continue => {}
                StepResult::Syscall(_) => {
                    // The ecall has retired, so the PC already points past it.
                    let pc = self.cpu.pc().wrapping_sub(4);
                    return Err(EmulatorError::InvalidInstruction {
                        pc,
                        instruction: rv32_isa::ecall(),
                        reason: String::from("Unexpected ECALL in run_until_ebreak"),
                    });
                }
            }
        }
    }

    /// Run until ECALL is encountered, returning syscall information.
    pub fn run_until_ecall(&mut self) -> Result<SyscallInfo, EmulatorError> {
        loop {
            match self.step()? {
                StepResult::Syscall(info) => return Ok(info),
                StepResult::Continue => {}
                StepResult::Halted => {
                    let pc = self.cpu.pc().wrapping_sub(4);
                    return Err(EmulatorError::InvalidInstruction {
                        pc,
                        instruction: rv32_isa::ebreak(),
                        reason: String::from("Unexpected EBREAK in run_until_ecall"),
                    });
                }
            }
        }
    }

    pub fn cpu(&self) -> &CpuState {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut CpuState {
        &mut self.cpu
    }

    /// Get a reference to the memory (for inspection).
    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Get a mutable reference to the memory (for initialization).
    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    /// Get the value of a register.
    pub fn get_register(&self, reg: Gpr) -> u32 {
        self.cpu.reg(reg)
    }

    /// Set the value of a register.
    ///
    /// Note: Writing to x0 (ZERO) is a no-op.
    pub fn set_register(&mut self, reg: Gpr, value: u32) {
        self.cpu.set_reg(reg, value);
    }

    pub fn pc(&self) -> u32 {
        self.cpu.pc()
    }

    pub fn set_pc(&mut self, pc: u32) {
        self.cpu.set_pc(pc);
    }

    /// Get the number of instructions executed so far.
    pub fn instruction_count(&self) -> u64 {
        self.instruction_count
    }

    /// Captured trace entries, oldest first.
    pub fn get_logs(&self) -> impl Iterator<Item = &InstLog> {
        self.log_buffer.iter()
    }

    /// Format all captured logs as a string.
    pub fn format_logs(&self) -> String {
        self.format_recent_logs(self.log_buffer.len())
    }

    /// Format the last `count` captured logs.
    pub fn format_recent_logs(&self, count: usize) -> String {
        let start = self.log_buffer.len().saturating_sub(count);
        let mut result = String::new();
        for log in self.log_buffer.iter().skip(start) {
            result.push_str(&format!("{}\n", log));
        }
        result
    }

    /// Clear captured log messages.
    pub fn clear_logs(&mut self) {
        self.log_buffer.clear();
    }

    /// Dump the current emulator state as a human-readable string.
    pub fn dump_state(&self) -> String {
        format!(
            "Instructions executed: {}\n{}",
            self.instruction_count,
            self.cpu.dump()
        )
    }

    fn log_instruction(&mut self, log: InstLog) {
        if self.log_level == LogLevel::Verbose {
            log::trace!("{}", log);
        }
        if self.log_level < LogLevel::Instructions || self.trace_capacity == 0 {
            return;
        }
        if self.log_buffer.len() >= self.trace_capacity {
            self.log_buffer.pop_front();
        }
        self.log_buffer.push_back(log);
    }
}
