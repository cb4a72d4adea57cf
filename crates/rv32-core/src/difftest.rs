//! Hook for an external differential-testing reference model.

/// Why the reference model is asked to skip retirements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// One guest instruction is emulated by a sequence the reference model
    /// retires differently (e.g. `jalr`).
    MultiStepEmulation,
}

/// Reference model co-simulating with the emulator.
///
/// The core only ever tells it to skip comparisons; stepping and comparing
/// are the model's business.
pub trait DifftestHook {
    fn skip(&mut self, count: u32, reason: SkipReason);
}
