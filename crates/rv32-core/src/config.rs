//! Emulator configuration.

use crate::logging::LogLevel;
use crate::memory::DEFAULT_RAM_START;

/// Settings used to build a [`Riscv32Emulator`](crate::Riscv32Emulator).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmulatorConfig {
    /// Guest address of the first RAM byte; the image is loaded here and
    /// execution starts here.
    pub ram_base: u32,
    /// RAM size in bytes.
    pub ram_size: usize,
    /// Retirement budget before `InstructionLimitExceeded`.
    pub max_instructions: u64,
    pub log_level: LogLevel,
    /// Number of trace entries kept in the rolling buffer.
    pub trace_capacity: usize,
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        Self {
            ram_base: DEFAULT_RAM_START,
            ram_size: 1024 * 1024,
            max_instructions: 100_000,
            log_level: LogLevel::None,
            trace_capacity: 100,
        }
    }
}

impl EmulatorConfig {
    pub fn with_ram(mut self, base: u32, size: usize) -> Self {
        self.ram_base = base;
        self.ram_size = size;
        self
    }

    pub fn with_max_instructions(mut self, limit: u64) -> Self {
        self.max_instructions = limit;
        self
    }

    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    pub fn with_trace_capacity(mut self, capacity: usize) -> Self {
        self.trace_capacity = capacity;
        self
    }
}
