//! Operator classification and range analysis over a token sequence.

use core::fmt;

use crate::error::ExprError;
use crate::token::{Token, TokenKind};

/// An operator after unary/binary disambiguation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Deref,
    Pos,
    Neg,
    Mul,
    Div,
    Add,
    Sub,
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,
    And,
    Or,
}

impl Operator {
    /// Binding rank; a larger rank binds more loosely.
    pub fn rank(self) -> u8 {
        match self {
            Operator::Pos | Operator::Neg => 1,
            Operator::Deref => 2,
            Operator::Mul | Operator::Div => 3,
            Operator::Add | Operator::Sub => 4,
            Operator::Lt | Operator::Gt | Operator::Le | Operator::Ge => 5,
            Operator::Eq | Operator::Ne => 6,
            Operator::And => 7,
            Operator::Or => 8,
        }
    }

    pub fn is_unary(self) -> bool {
        matches!(self, Operator::Deref | Operator::Pos | Operator::Neg)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operator::Deref | Operator::Mul => "*",
            Operator::Pos | Operator::Add => "+",
            Operator::Neg | Operator::Sub => "-",
            Operator::Div => "/",
            Operator::Lt => "<",
            Operator::Gt => ">",
            Operator::Le => "<=",
            Operator::Ge => ">=",
            Operator::Eq => "==",
            Operator::Ne => "!=",
            Operator::And => "&&",
            Operator::Or => "||",
        })
    }
}

/// A classified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    /// Literal or register.
    Value(Token),
    Op(Operator),
    LParen,
    RParen,
}

impl From<Token> for Item {
    fn from(token: Token) -> Self {
        let op = match token.kind {
            TokenKind::LParen => return Item::LParen,
            TokenKind::RParen => return Item::RParen,
            TokenKind::Hex | TokenKind::Dec | TokenKind::Reg => return Item::Value(token),
            TokenKind::Star => Operator::Mul,
            TokenKind::Slash => Operator::Div,
            TokenKind::Plus => Operator::Add,
            TokenKind::Minus => Operator::Sub,
            TokenKind::Lt => Operator::Lt,
            TokenKind::Gt => Operator::Gt,
            TokenKind::Le => Operator::Le,
            TokenKind::Ge => Operator::Ge,
            TokenKind::Eq => Operator::Eq,
            TokenKind::Ne => Operator::Ne,
            TokenKind::And => Operator::And,
            TokenKind::Or => Operator::Or,
        };
        Item::Op(op)
    }
}

impl Item {
    /// Whether an operator following this item has a left operand.
    fn ends_operand(&self) -> bool {
        matches!(
            self,
            Item::Value(_) | Item::RParen | Item::Op(Operator::Pos) | Item::Op(Operator::Neg)
        )
    }
}

/// Classify tokens, turning `*`, `+` and `-` without a left operand into
/// their unary forms.
///
/// Dereference is decided first, then sign, so `*-5` is the dereference of a
/// negation.
pub fn classify(tokens: Vec<Token>) -> Vec<Item> {
    let mut items: Vec<Item> = tokens.into_iter().map(Item::from).collect();

    let passes: [&[(Operator, Operator)]; 2] = [
        &[(Operator::Mul, Operator::Deref)],
        &[(Operator::Add, Operator::Pos), (Operator::Sub, Operator::Neg)],
    ];
    for pass in passes {
        for i in 0..items.len() {
            let has_left = i > 0 && items[i - 1].ends_operand();
            if has_left {
                continue;
            }
            if let Item::Op(op) = items[i] {
                if let Some(&(_, unary)) = pass.iter().find(|(binary, _)| *binary == op) {
                    items[i] = Item::Op(unary);
                }
            }
        }
    }

    items
}

/// How the parentheses of a token range are arranged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParenShape {
    /// The whole range is one `( ... )` pair.
    Enclosed,
    /// Balanced, but not a single enclosing pair.
    Open,
    /// A `)` closes nothing, or a `(` is never closed.
    Malformed,
}

fn depth_never_negative(items: &[Item]) -> Option<i32> {
    let mut depth = 0i32;
    for item in items {
        match item {
            Item::LParen => depth += 1,
            Item::RParen => {
                depth -= 1;
                if depth < 0 {
                    return None;
                }
            }
            _ => {}
        }
    }
    Some(depth)
}

/// Inspect the parentheses of `items[p..=q]`.
pub fn check_parentheses(items: &[Item], p: usize, q: usize) -> ParenShape {
    let range = &items[p..=q];
    if depth_never_negative(range) != Some(0) {
        return ParenShape::Malformed;
    }
    let enclosed = p < q
        && range[0] == Item::LParen
        && range[range.len() - 1] == Item::RParen
        && depth_never_negative(&range[1..range.len() - 1]).is_some();
    if enclosed {
        ParenShape::Enclosed
    } else {
        ParenShape::Open
    }
}

/// Index of the operator applied last when evaluating `items[p..=q]`.
///
/// Only operators outside all parentheses are candidates. Among binary
/// operators the loosest-binding one wins, ties going to the rightmost. A
/// prefix operator is only chosen when nothing precedes it, so `-*5` splits
/// at the `-`.
pub fn main_operator(items: &[Item], p: usize, q: usize) -> Result<usize, ExprError> {
    let malformed = ExprError::UnbalancedParens { start: p, end: q };
    let mut depth = 0usize;
    let mut best: Option<(usize, Operator)> = None;

    for (i, item) in items.iter().enumerate().take(q + 1).skip(p) {
        match item {
            Item::LParen => depth += 1,
            Item::RParen => {
                depth = depth.checked_sub(1).ok_or_else(|| malformed.clone())?;
            }
            Item::Op(op) if depth == 0 => {
                let take = match best {
                    None => true,
                    Some((_, current)) => !op.is_unary() && op.rank() >= current.rank(),
                };
                if take {
                    best = Some((i, *op));
                }
            }
            _ => {}
        }
    }

    if depth != 0 {
        return Err(malformed);
    }
    match best {
        None => Err(ExprError::NoMainOperator { start: p, end: q }),
        Some((i, op)) if op.is_unary() && i != p => Err(ExprError::MisplacedUnary { index: i }),
        Some((i, _)) => Ok(i),
    }
}
