//! Regex-driven tokenizer.
//!
//! Rules are tried in table order at the current position and the first one
//! that matches wins, so longer operators are listed before their prefixes
//! and hex literals before decimal ones.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::ExprError;

/// Maximum number of tokens in one expression.
pub const MAX_TOKENS: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Eq,
    Ne,
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
    And,
    Or,
    Le,
    Ge,
    Lt,
    Gt,
    Hex,
    Dec,
    Reg,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Matched source text.
    pub lexeme: String,
}

struct Rule {
    regex: Regex,
    /// `None` for whitespace, which produces no token.
    kind: Option<TokenKind>,
}

const RULES: &[(&str, Option<TokenKind>)] = &[
    (r" +", None),
    (r"==", Some(TokenKind::Eq)),
    (r"!=", Some(TokenKind::Ne)),
    (r"\+", Some(TokenKind::Plus)),
    (r"-", Some(TokenKind::Minus)),
    (r"\*", Some(TokenKind::Star)),
    (r"/", Some(TokenKind::Slash)),
    (r"\(", Some(TokenKind::LParen)),
    (r"\)", Some(TokenKind::RParen)),
    (r"&&", Some(TokenKind::And)),
    (r"\|\|", Some(TokenKind::Or)),
    (r"<=", Some(TokenKind::Le)),
    (r">=", Some(TokenKind::Ge)),
    (r"<", Some(TokenKind::Lt)),
    (r">", Some(TokenKind::Gt)),
    (r"0[xX][0-9a-fA-F]+", Some(TokenKind::Hex)),
    (r"[0-9]+", Some(TokenKind::Dec)),
    // s10/s11 come before s[0-9]: alternation is leftmost-first.
    (
        r"\$0|pc|ra|[sgt]p|t[0-6]|a[0-7]|s1[01]|s[0-9]",
        Some(TokenKind::Reg),
    ),
];

static COMPILED: OnceLock<Vec<Rule>> = OnceLock::new();

/// Compile the rule table. Idempotent; [`tokenize`] calls it on first use.
pub fn init_rules() {
    rules();
}

fn rules() -> &'static [Rule] {
    COMPILED.get_or_init(|| {
        RULES
            .iter()
            .map(|&(pattern, kind)| Rule {
                regex: Regex::new(&format!("^(?:{})", pattern)).unwrap_or_else(|e| {
                    panic!("lexical rule {:?} does not compile: {}", pattern, e)
                }),
                kind,
            })
            .collect()
    })
}

/// Split `text` into at most [`MAX_TOKENS`] tokens.
pub fn tokenize(text: &str) -> Result<Vec<Token>, ExprError> {
    let rules = rules();
    let mut tokens = Vec::new();
    let mut position = 0;

    while position < text.len() {
        let rest = &text[position..];
        let (index, rule, len) = rules
            .iter()
            .enumerate()
            .find_map(|(i, rule)| rule.regex.find(rest).map(|m| (i, rule, m.end())))
            .ok_or_else(|| {
                log::debug!(
                    "no match at position {}\n{}\n{:>width$}",
                    position,
                    text,
                    "^",
                    width = position + 1
                );
                ExprError::NoMatch {
                    position,
                    rest: rest.to_string(),
                }
            })?;

        let lexeme = &rest[..len];
        log::trace!(
            "match rules[{}] at position {} with len {}: {:?}",
            index,
            position,
            len,
            lexeme
        );
        position += len;

        if let Some(kind) = rule.kind {
            if tokens.len() == MAX_TOKENS {
                return Err(ExprError::TooManyTokens { limit: MAX_TOKENS });
            }
            tokens.push(Token {
                kind,
                lexeme: lexeme.to_string(),
            });
        }
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<TokenKind> {
        tokenize(text).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_longest_operators_first() {
        use TokenKind::*;
        assert_eq!(kinds("1<=2"), vec![Dec, Le, Dec]);
        assert_eq!(kinds("1 < 2>=3"), vec![Dec, Lt, Dec, Ge, Dec]);
        assert_eq!(kinds("a0==a1 != 3"), vec![Reg, Eq, Reg, Ne, Dec]);
        assert_eq!(kinds("1&&0||1"), vec![Dec, And, Dec, Or, Dec]);
    }

    #[test]
    fn test_literals_keep_lexeme() {
        let tokens = tokenize("0x1F + 42").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Hex);
        assert_eq!(tokens[0].lexeme, "0x1F");
        assert_eq!(tokens[2].kind, TokenKind::Dec);
        assert_eq!(tokens[2].lexeme, "42");
    }

    #[test]
    fn test_register_names() {
        for name in ["$0", "pc", "ra", "sp", "gp", "tp", "t0", "t6", "a7", "s0", "s9", "s10", "s11"] {
            let tokens = tokenize(name).unwrap();
            assert_eq!(tokens.len(), 1, "{}", name);
            assert_eq!(tokens[0].kind, TokenKind::Reg);
            assert_eq!(tokens[0].lexeme, name);
        }
    }

    #[test]
    fn test_whitespace_yields_nothing() {
        assert!(tokenize("   ").unwrap().is_empty());
        assert!(tokenize("").unwrap().is_empty());
    }

    #[test]
    fn test_single_ampersand_is_lex_error() {
        assert_eq!(
            tokenize("1 & 2"),
            Err(ExprError::NoMatch {
                position: 2,
                rest: "& 2".to_string()
            })
        );
        assert!(matches!(tokenize("1 | 2"), Err(ExprError::NoMatch { position: 2, .. })));
        assert!(matches!(tokenize("foo"), Err(ExprError::NoMatch { position: 0, .. })));
    }

    #[test]
    fn test_token_limit() {
        let ok = vec!["1"; 16].join("+");
        assert_eq!(tokenize(&ok).unwrap().len(), 31);
        let full = format!("{}+1", ok);
        assert_eq!(tokenize(&full).unwrap_err(), ExprError::TooManyTokens { limit: 32 });
        let exact = format!("-({})", vec!["1"; 15].join("+"));
        assert_eq!(tokenize(&exact).unwrap().len(), MAX_TOKENS);
    }
}
