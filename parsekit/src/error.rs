//! Source locations and the driver's error type.
//!
//! [`Position`] and [`Span`] locate tokens in the input; [`ParserError`] is
//! raised by the table driver (and by hand-written state procedures that
//! want the same diagnostics) when the automaton has no way forward.
//!
//! # Examples
//!
//! ```rust
//! # use parsekit::{ParserError, Position, Span, span};
//! let sp = Span::new(Position::new(0, 2), Position::new(0, 5));
//! assert_eq!(sp.merge(&span!(0, 7, 0, 8).unwrap()).end.column, 8);
//!
//! let err = ParserError::NoTransition {
//!     state: "after_expr".into(),
//!     lookahead: "')'".into(),
//!     span: span!(0, 2, 0, 3),
//! };
//! assert!(err.to_string().contains("after_expr"));
//! ```

use smartstring::alias::String;
use thiserror::Error;

/// A 0-based line/column position in source text.
#[derive(Debug, Clone, Default, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    /// 0-based line number.
    pub line: usize,
    /// 0-based column number (character position in the line).
    pub column: usize,
}

impl Position {
    /// Creates a new `Position`.
    #[inline]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// A half-open source range: `[start, end)`.
///
/// `Span` is used to mark the region of source text that a token or a
/// reduced non-terminal covers, or to attach precise locations to
/// diagnostics.
///
/// Invariants are not enforced here, but it is conventional for `start <= end`
/// in lexicographic `(line, column)` ordering.
#[derive(Debug, Clone, Default, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    /// Creates a new `Span`.
    #[inline]
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Merge with another span by covering both.
    pub fn merge(&self, other: &Span) -> Span {
        let start = if self.start <= other.start {
            self.start
        } else {
            other.start
        };
        let end = if self.end >= other.end {
            self.end
        } else {
            other.end
        };
        Span { start, end }
    }

    /// Is this span empty (start == end)?
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Errors raised while driving an LR automaton.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParserError {
    /// The current state has no action for the look-ahead terminal.
    #[error("no transition from {state} on look-ahead {lookahead}")]
    NoTransition {
        /// Label of the state (or name of the state procedure).
        state: String,
        /// Human-readable rendering of the look-ahead token.
        lookahead: String,
        /// Where the look-ahead token sits in the input.
        span: Option<Span>,
    },

    /// A reduction uncovered a state with no goto for the produced non-terminal.
    #[error("no goto from {state} on non-terminal {nonterminal}")]
    MissingGoto { state: String, nonterminal: String },

    /// A reduction asked for more symbols than the stack holds.
    #[error("parse stack underflow")]
    StackUnderflow,

    /// A reduction found a symbol of the wrong kind on the stack.
    #[error("unexpected symbol {found} on the parse stack")]
    UnexpectedSymbol { found: String },
}

impl ParserError {
    /// Source span attached to the error, if any.
    pub fn span(&self) -> Option<Span> {
        match self {
            ParserError::NoTransition { span, .. } => *span,
            _ => None,
        }
    }
}

/// Build an `Option<Span>` inline from 0-based line/column coordinates.
///
/// # Examples
///
/// ```rust
/// # use parsekit::span;
/// let s = span!(0, 0, 1, 4);
/// assert_eq!(s.unwrap().end.column, 4);
/// ```
#[macro_export]
macro_rules! span {
    ($line_start:expr, $col_start:expr, $line_end:expr, $col_end:expr) => {
        Some($crate::Span {
            start: $crate::Position {
                line: $line_start,
                column: $col_start,
            },
            end: $crate::Position {
                line: $line_end,
                column: $col_end,
            },
        })
    };
}
