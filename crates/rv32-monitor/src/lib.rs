//! Debug expressions over a running RV32 machine.
//!
//! An expression such as `*(sp + 8) == 0x10` is tokenized, its operators are
//! classified as unary or binary, and it is evaluated recursively by splitting
//! each token range at its loosest-binding operator. All arithmetic is
//! unsigned 32-bit and wraps.
//!
//! ```ignore
//! let value = rv32_monitor::expr("$0 + pc", &emulator)?;
//! ```

mod error;
mod eval;
mod parser;
mod target;
mod token;

pub use error::{ErrorClass, ExprError};
pub use eval::Evaluator;
pub use parser::{check_parentheses, classify, main_operator, Item, Operator, ParenShape};
pub use target::{DebugTarget, MachineView};
pub use token::{init_rules, tokenize, Token, TokenKind, MAX_TOKENS};

/// Evaluate `text` against `target`.
///
/// Nothing is kept between calls; the machine is only read.
pub fn expr<T: DebugTarget + ?Sized>(text: &str, target: &T) -> Result<u32, ExprError> {
    let result = tokenize(text).and_then(|tokens| {
        let items = classify(tokens);
        match items.len() {
            0 => Err(ExprError::EmptyRange { at: 0 }),
            len => Evaluator::new(&items, target).eval(0, len - 1),
        }
    });
    if let Err(e) = &result {
        log::debug!("expression {:?}: {} ({:?} error)", text, e, e.class());
    }
    result
}
