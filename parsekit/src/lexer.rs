use crate::Span;
use std::fmt::{Debug, Display};

/// A lexical token as seen by the parser driver.
///
/// The driver only needs the token's kind (to index the action table) and
/// its location (for diagnostics); `Display` renders the token inside
/// error messages.
pub trait Token: Clone + Debug + Display {
    type TokenID: Copy + Debug + Eq + Into<usize>;

    fn token_id(&self) -> Self::TokenID;
    fn span(&self) -> Option<Span>;
}

/// A source of tokens with one token of look-ahead.
///
/// `next_token` never fails: input that matches no token class comes back
/// as the grammar's error token, which has no transition in any state.
/// Once the input is exhausted every call returns the end token.
pub trait Lexer {
    type Token: Token;

    fn next_token(&mut self) -> Self::Token;

    fn stats(&self) -> LexerStats;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LexerStats {
    /// Characters consumed from the input, whitespace included.
    pub chars: usize,
    /// Tokens handed out, end tokens included.
    pub tokens: usize,
    /// Lexemes that matched no token class.
    pub invalid: usize,
}
