//! # Evaluation Error Type
//!
//! [`CalcError`] is the single error surface of both parsing engines. It
//! separates failures into three kinds:
//!
//! - **syntax**: the automaton has no transition for the look-ahead
//!   (invalid characters end up here too, as error tokens),
//! - **semantic**: a name is unknown to the [`Environment`] or is called
//!   with the wrong number of arguments,
//! - **depth**: the recursive-ascent engine gave up on an input nested more
//!   deeply than its configured limit.
//!
//! [`Environment`]: crate::Environment
use crate::EnvError;
use parsekit::{ParserError, Span};
use thiserror::Error;

/// Errors produced while parsing and evaluating one expression.
///
/// # Examples
/// ```rust
/// # use exprcalc::{CalcError, EnvError};
/// let err = CalcError::Env {
///     source: EnvError::UnknownVariable { name: "foo".into() },
///     span: None,
/// };
/// assert!(err.is_semantic());
/// assert_eq!(err.to_string(), "unknown variable foo");
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    /// No transition from the current state on the look-ahead token.
    #[error("syntax error: {0}")]
    Syntax(#[from] ParserError),

    /// Name lookup failed during a reduction.
    #[error("{source}")]
    Env {
        source: EnvError,
        /// Source range of the offending identifier or call.
        span: Option<Span>,
    },

    /// Input nested deeper than the engine's frame limit.
    #[error("expression nested deeper than {limit} levels")]
    TooDeep { limit: usize },
}

impl CalcError {
    pub fn is_syntax(&self) -> bool {
        matches!(self, CalcError::Syntax(_))
    }

    pub fn is_semantic(&self) -> bool {
        matches!(self, CalcError::Env { .. })
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            CalcError::Syntax(err) => err.span(),
            CalcError::Env { span, .. } => *span,
            CalcError::TooDeep { .. } => None,
        }
    }
}
