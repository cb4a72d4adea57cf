//! Recursive evaluation over classified items.

use crate::error::ExprError;
use crate::parser::{check_parentheses, main_operator, Item, Operator, ParenShape};
use crate::target::DebugTarget;
use crate::token::{Token, TokenKind};

/// Evaluates ranges of one classified expression against a target.
pub struct Evaluator<'a, T: DebugTarget + ?Sized> {
    items: &'a [Item],
    target: &'a T,
}

impl<'a, T: DebugTarget + ?Sized> Evaluator<'a, T> {
    pub fn new(items: &'a [Item], target: &'a T) -> Self {
        Self { items, target }
    }

    /// Value of `items[p..=q]`.
    pub fn eval(&self, p: usize, q: usize) -> Result<u32, ExprError> {
        if p > q || q >= self.items.len() {
            return Err(ExprError::EmptyRange { at: p });
        }
        if p == q {
            return self.value(p);
        }

        match check_parentheses(self.items, p, q) {
            ParenShape::Malformed => Err(ExprError::UnbalancedParens { start: p, end: q }),
            ParenShape::Enclosed => self.eval(p + 1, q - 1),
            ParenShape::Open => {
                let i = main_operator(self.items, p, q)?;
                let Item::Op(op) = self.items[i] else {
                    return Err(ExprError::NotAValue { index: i });
                };
                log::trace!("tokens {}..={}: main operator {:?} at {}", p, q, op, i);

                if op.is_unary() {
                    let value = self.eval(i + 1, q)?;
                    return self.unary(op, value);
                }
                if i == p {
                    return Err(ExprError::EmptyRange { at: p });
                }
                let left = self.eval(p, i - 1)?;
                let right = self.eval(i + 1, q)?;
                binary(op, left, right)
            }
        }
    }

    fn value(&self, index: usize) -> Result<u32, ExprError> {
        match &self.items[index] {
            Item::Value(token) => self.token_value(token),
            _ => Err(ExprError::NotAValue { index }),
        }
    }

    fn token_value(&self, token: &Token) -> Result<u32, ExprError> {
        let invalid = || ExprError::InvalidLiteral(token.lexeme.clone());
        match token.kind {
            TokenKind::Dec => token.lexeme.parse::<u32>().map_err(|_| invalid()),
            TokenKind::Hex => u32::from_str_radix(&token.lexeme[2..], 16).map_err(|_| invalid()),
            TokenKind::Reg => self
                .target
                .reg_value(&token.lexeme)
                .ok_or_else(|| ExprError::UnknownRegister(token.lexeme.clone())),
            _ => Err(invalid()),
        }
    }

    fn unary(&self, op: Operator, value: u32) -> Result<u32, ExprError> {
        match op {
            Operator::Pos => Ok(value),
            Operator::Neg => Ok(value.wrapping_neg()),
            Operator::Deref => self.target.read_word(value).map_err(|e| {
                log::debug!("dereference failed: {}", e);
                ExprError::BadAddress { addr: value }
            }),
            _ => unreachable!("{:?} is not a unary operator", op),
        }
    }
}

fn binary(op: Operator, left: u32, right: u32) -> Result<u32, ExprError> {
    let truth = |b: bool| b as u32;
    Ok(match op {
        Operator::Add => left.wrapping_add(right),
        Operator::Sub => left.wrapping_sub(right),
        Operator::Mul => left.wrapping_mul(right),
        Operator::Div => left.checked_div(right).ok_or(ExprError::DivideByZero)?,
        Operator::Lt => truth(left < right),
        Operator::Gt => truth(left > right),
        Operator::Le => truth(left <= right),
        Operator::Ge => truth(left >= right),
        Operator::Eq => truth(left == right),
        Operator::Ne => truth(left != right),
        Operator::And => truth(left != 0 && right != 0),
        Operator::Or => truth(left != 0 || right != 0),
        Operator::Deref | Operator::Pos | Operator::Neg => {
            unreachable!("{:?} is not a binary operator", op)
        }
    })
}
