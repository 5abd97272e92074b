//! # parsekit
//!
//! Runtime support for table-driven LR parsers: the action enum and ID
//! traits that generated or hand-written tables implement, a [`Parser`]
//! driver loop with shift/reduce/goto/accept handling, the [`Token`] and
//! [`Lexer`] traits it consumes, and source spans for diagnostics.
//!
//! Grammar-specific code plugs in through [`ParserData`] (the tables) and
//! the [`Parser::reduce`] / [`Parser::resolve_ambiguity`] hooks (the
//! semantics).
mod error;
mod lexer;
mod parser;

pub use crate::error::{ParserError, Position, Span};
pub use crate::lexer::{Lexer, LexerStats, Token};
pub use crate::parser::{
    Parser, ParserAction, ParserAmbigID, ParserCtx, ParserData, ParserProdID, ParserStateID,
    ParserStats, ParserTokenID,
};
