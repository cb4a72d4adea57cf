//! RISC-V 32-bit general-purpose registers.

use core::fmt;

/// ABI mnemonics indexed by register number.
///
/// Register 0 is spelled `$0`, which is also how the debugger refers to it.
pub const REG_NAMES: [&str; 32] = [
    "$0", "ra", "sp", "gp", "tp", "t0", "t1", "t2", "s0", "s1", "a0", "a1", "a2", "a3", "a4",
    "a5", "a6", "a7", "s2", "s3", "s4", "s5", "s6", "s7", "s8", "s9", "s10", "s11", "t3", "t4",
    "t5", "t6",
];

/// RISC-V 32-bit general-purpose register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Gpr(u8);

impl Gpr {
    /// Create a new GPR from register number (0-31).
    ///
    /// # Panics
    ///
    /// Panics if the register number is >= 32.
    pub fn new(num: u8) -> Self {
        assert!(num < 32, "Register number must be < 32");
        Self(num)
    }

    /// Register number taken from a 5-bit instruction field.
    pub fn from_field(bits: u32) -> Self {
        Self((bits & 0x1f) as u8)
    }

    /// Get the register number (0-31).
    pub fn num(&self) -> u8 {
        self.0
    }

    /// Register number as an index into a register array.
    pub fn index(&self) -> usize {
        self.0 as usize
    }

    /// ABI mnemonic of this register.
    pub fn name(&self) -> &'static str {
        REG_NAMES[self.index()]
    }

    /// Look up a register by ABI mnemonic or `xN` form.
    ///
    /// Returns `None` for anything else, including `pc`.
    pub fn from_name(name: &str) -> Option<Self> {
        if let Some(num) = REG_NAMES.iter().position(|n| *n == name) {
            return Some(Gpr(num as u8));
        }
        let num = name.strip_prefix('x')?.parse::<u8>().ok()?;
        (num < 32).then_some(Gpr(num))
    }

    /// Iterate over all 32 registers in index order.
    pub fn all() -> impl Iterator<Item = Gpr> {
        (0..32u8).map(Gpr)
    }
}

// Named registers
impl Gpr {
    pub const ZERO: Gpr = Gpr(0);
    pub const RA: Gpr = Gpr(1);
    pub const SP: Gpr = Gpr(2);
    pub const GP: Gpr = Gpr(3);
    pub const TP: Gpr = Gpr(4);
    pub const T0: Gpr = Gpr(5);
    pub const T1: Gpr = Gpr(6);
    pub const T2: Gpr = Gpr(7);
    pub const S0: Gpr = Gpr(8);
    pub const S1: Gpr = Gpr(9);
    pub const A0: Gpr = Gpr(10);
    pub const A1: Gpr = Gpr(11);
    pub const A2: Gpr = Gpr(12);
    pub const A3: Gpr = Gpr(13);
    pub const A4: Gpr = Gpr(14);
    pub const A5: Gpr = Gpr(15);
    pub const A6: Gpr = Gpr(16);
    pub const A7: Gpr = Gpr(17);
    pub const S2: Gpr = Gpr(18);
    pub const S3: Gpr = Gpr(19);
    pub const S4: Gpr = Gpr(20);
    pub const S5: Gpr = Gpr(21);
    pub const S6: Gpr = Gpr(22);
    pub const S7: Gpr = Gpr(23);
    pub const S8: Gpr = Gpr(24);
    pub const S9: Gpr = Gpr(25);
    pub const S10: Gpr = Gpr(26);
    pub const S11: Gpr = Gpr(27);
    pub const T3: Gpr = Gpr(28);
    pub const T4: Gpr = Gpr(29);
    pub const T5: Gpr = Gpr(30);
    pub const T6: Gpr = Gpr(31);
}

impl fmt::Display for Gpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
