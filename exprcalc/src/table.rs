//! # Table-Driven Engine
//!
//! [`TableParser`] runs the same automaton as [`ExprParser`] from the
//! explicit action table in [`ParData`], using the generic
//! [`parsekit::Parser::try_parse`] loop. The table lists every
//! operator/operator shift-reduce conflict as an ambiguity;
//! [`TableParser`] settles each one from [`ProdID::precedence`]:
//! shift when the look-ahead operator binds tighter than the production,
//! or equally tight and right-associative; otherwise reduce.
//!
//! [`ExprParser`]: crate::ExprParser

use crate::{
    Assoc, CalcError, CalcLexer, CalcToken, Environment, ParData, ProdID, semantic,
    grammar::{Action, AmbigID},
};
use parsekit::{Lexer, Parser, ParserCtx, ParserData, ParserError};

/// Table-driven parser and evaluator for one-line expressions.
///
/// # Example
/// ```rust
/// # use exprcalc::{Environment, TableParser};
/// let env = Environment::with_builtins();
/// let mut parser = TableParser::new();
/// assert_eq!(parser.parse("2^3^2", &env).unwrap(), 512.0);
/// ```
pub struct TableParser {
    ctx: ParserCtx<CalcLexer, ParData>,
}

impl Default for TableParser {
    fn default() -> Self {
        Self::new()
    }
}

impl TableParser {
    pub fn new() -> Self {
        Self {
            ctx: ParserCtx::new(CalcLexer::new("")),
        }
    }

    /// Parses and evaluates `input` against `env`.
    pub fn parse(&mut self, input: &str, env: &Environment) -> Result<f64, CalcError> {
        self.ctx.reset(CalcLexer::new(input));
        let result = self.try_parse(env).and_then(|token| {
            token.number().ok_or_else(|| {
                ParserError::UnexpectedSymbol {
                    found: token.to_string().into(),
                }
                .into()
            })
        });
        log::debug!("{:?}", self.ctx.lexer.stats());
        match &result {
            Ok(value) => log::debug!("{:?} = {}", input, value),
            Err(err) => log::debug!("{:?}: {}", input, err),
        }
        result
    }
}

impl Parser for TableParser {
    type Lexer = CalcLexer;
    type ParserData = ParData;
    type Context = Environment;
    type Error = CalcError;

    fn ctx(&self) -> &ParserCtx<Self::Lexer, Self::ParserData> {
        &self.ctx
    }

    fn ctx_mut(&mut self) -> &mut ParserCtx<Self::Lexer, Self::ParserData> {
        &mut self.ctx
    }

    fn resolve_ambiguity(
        &mut self,
        _env: &Environment,
        ambig: AmbigID,
        token: &CalcToken,
    ) -> Result<Action, CalcError> {
        let [shift, reduce] = ParData::lookup_ambig(ambig);
        let Action::Reduce(prod_id) = reduce else {
            return Ok(shift);
        };
        let next = token.token_id.binary_operator();
        let (Some((prec, assoc)), Some((next_prec, _))) =
            (prod_id.precedence(), next.and_then(ProdID::precedence))
        else {
            return Ok(reduce);
        };
        if next_prec > prec || (next_prec == prec && assoc == Assoc::Right) {
            Ok(shift)
        } else {
            Ok(reduce)
        }
    }

    fn reduce(
        &mut self,
        env: &Environment,
        prod_id: ProdID,
        _token: &CalcToken,
    ) -> Result<(), CalcError> {
        semantic::reduce(&mut self.ctx.tokens, prod_id, env)
    }
}
