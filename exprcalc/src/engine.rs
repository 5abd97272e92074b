use crate::{CalcError, Environment, ExprParser, TableParser};
use parsekit::{Parser, ParserStats};

/// A parser that evaluates one expression per call.
///
/// Implemented by both [`ExprParser`] and [`TableParser`]; the two accept
/// the same language and compute the same values.
pub trait Engine {
    fn parse(&mut self, input: &str, env: &Environment) -> Result<f64, CalcError>;

    /// Statistics of the most recent parse.
    fn stats(&self) -> ParserStats;
}

impl Engine for ExprParser {
    fn parse(&mut self, input: &str, env: &Environment) -> Result<f64, CalcError> {
        ExprParser::parse(self, input, env)
    }

    fn stats(&self) -> ParserStats {
        ExprParser::stats(self)
    }
}

impl Engine for TableParser {
    fn parse(&mut self, input: &str, env: &Environment) -> Result<f64, CalcError> {
        TableParser::parse(self, input, env)
    }

    fn stats(&self) -> ParserStats {
        Parser::stats(self)
    }
}
