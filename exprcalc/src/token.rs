//! # Expression Tokens
//!
//! This module defines the concrete token value and token type shared by the
//! lexer and both parsing engines:
//!
//! - [`TokenValue`]: the payload carried by a token (a numeric literal, an
//!   identifier name, the text of an invalid lexeme, or the value of a
//!   reduced expression),
//! - [`CalcToken`]: a concrete token that pairs a [`TokenID`], a
//!   [`TokenValue`] and a source span, and implements [`parsekit::Token`].
//!
//! Reduced nonterminals are tokens too: every `Expr` on the symbol stack is
//! a `CalcToken` whose value is `TokenValue::Number` and whose span covers
//! the whole sub-expression.
use crate::TokenID;
use parsekit::{ParserTokenID, Span, Token};
use smartstring::alias::String;
use std::fmt;

/// The payload carried by a token.
///
/// # Example
/// ```rust
/// # use exprcalc::TokenValue;
/// let value = TokenValue::Number(2.5);
/// let TokenValue::Number(n) = value else {
///     panic!("expected a number");
/// };
/// assert_eq!(n, 2.5);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    /// No associated data (operators, punctuation, end of input).
    None,

    /// Numeric literal, or the value of a reduced expression.
    Number(f64),

    /// Identifier name.
    Ident(String),

    /// Text of a lexeme that matched no token class.
    Invalid(String),
}

/// A concrete token for the expression frontend.
///
/// # Example
/// ```rust
/// # use exprcalc::{CalcToken, TokenID, TokenValue};
/// # use parsekit::{Token, span};
/// let tok = CalcToken {
///     token_id: TokenID::Real,
///     value: TokenValue::Number(99.0),
///     span: span!(0, 0, 0, 2),
/// };
///
/// assert_eq!(tok.token_id(), TokenID::Real);
/// assert_eq!(tok.to_string(), "real 99");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CalcToken {
    /// The token's kind.
    pub token_id: TokenID,
    /// The associated value for the token, if applicable.
    pub value: TokenValue,
    /// Where the token sits in the input.
    pub span: Option<Span>,
}

impl CalcToken {
    /// A reduced expression with the given value.
    pub fn expr(value: f64, span: Option<Span>) -> Self {
        Self {
            token_id: TokenID::Expr,
            value: TokenValue::Number(value),
            span,
        }
    }

    /// The numeric payload, if any.
    pub fn number(&self) -> Option<f64> {
        match self.value {
            TokenValue::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn merge_span(&mut self, other_span: &Option<Span>) {
        match other_span {
            Some(other_span) => match &mut self.span {
                Some(my_span) => {
                    *my_span = my_span.merge(other_span);
                }
                None => {
                    self.span = Some(*other_span);
                }
            },
            None => (),
        }
    }
}

impl fmt::Display for CalcToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = self.token_id.label();
        match &self.value {
            TokenValue::None => f.write_str(label),
            TokenValue::Number(n) => write!(f, "{label} {n}"),
            TokenValue::Ident(name) => write!(f, "{label} {name}"),
            TokenValue::Invalid(text) => write!(f, "{label} {:?}", text.as_str()),
        }
    }
}

impl Token for CalcToken {
    type TokenID = TokenID;

    fn token_id(&self) -> Self::TokenID {
        self.token_id
    }

    fn span(&self) -> Option<Span> {
        self.span
    }
}
