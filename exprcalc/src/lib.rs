//! # exprcalc
//!
//! An LR(1) parser and evaluator for one-line arithmetic expressions, built
//! on **parsekit**. Values are computed during parsing: each reduction runs
//! its semantic action, so accepting the input yields the result directly.
//!
//! ```text
//! 2+3*4          -> 14
//! -2^2           -> -4
//! 2^3^2          -> 512
//! pow((2+3)*4,2) -> 400
//! ```
//!
//! ## Engines
//!
//! - [`ExprParser`]: recursive ascent. Each automaton state is a method;
//!   shifts are calls and reductions unwind a counted number of frames.
//! - [`TableParser`]: the same automaton as an explicit action table
//!   ([`ParData`]) driven by [`parsekit::Parser::try_parse`].
//!
//! Both implement [`Engine`] and agree on every input, in value and in the
//! kind of error reported.
//!
//! ## Example
//!
//! ```rust
//! use exprcalc::{Engine, Environment, ExprParser, TableParser};
//!
//! let mut env = Environment::with_builtins();
//! env.set_var("x", 3.0);
//!
//! let mut ascent = ExprParser::new();
//! let mut table = TableParser::new();
//! assert_eq!(ascent.parse("2*x+1", &env).unwrap(), 7.0);
//! assert_eq!(table.parse("2*x+1", &env).unwrap(), 7.0);
//!
//! let err = Engine::parse(&mut ascent, "2*y", &env).unwrap_err();
//! assert!(err.is_semantic());
//! ```
//!
//! ## Modules
//!
//! - [`grammar`]: token, production and state IDs and the LR table
//! - [`lexer`]: longest-match tokenizer
//! - [`token`]: token values
//! - [`env`]: variables and functions
//! - [`ascent`] / [`table`]: the two engines
pub mod ascent;
pub mod engine;
pub mod env;
pub mod error;
pub mod grammar;
pub mod lexer;
pub mod semantic;
pub mod table;
pub mod token;

pub use ascent::ExprParser;
pub use engine::Engine;
pub use env::{EnvError, Environment};
pub use error::CalcError;
pub use grammar::{Assoc, ParData, ProdID, StateID, TokenID};
pub use lexer::CalcLexer;
pub use table::TableParser;
pub use token::{CalcToken, TokenValue};
