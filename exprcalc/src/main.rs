//! Command-line interface for exprcalc.
//!
//! Reads one expression per line from a file or standard input and prints
//! its value. A line of the form `name = expr` evaluates `expr` and binds the
//! result to `name` for the lines that follow. Diagnostics go to standard
//! error; the exit status is non-zero when any line failed.

use anyhow::{Context, bail};
use clap::{Parser as ClapParser, ValueEnum};
use exprcalc::{
    CalcError, CalcLexer, Engine, Environment, ExprParser, TableParser, TokenID, TokenValue,
};
use parsekit::{Lexer, Span};
use std::fs::File;
use std::io::{self, BufRead, BufReader, IsTerminal, Write};
use std::path::PathBuf;

#[derive(ClapParser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Input file with one expression per line (standard input if omitted)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Parsing engine
    #[arg(short, long, value_enum, default_value_t = EngineKind::Ascent)]
    engine: EngineKind,

    /// Maximum nesting of parser states (recursive-ascent engine only)
    #[arg(long, default_value_t = ExprParser::DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Digits after the decimal point (shortest exact form if omitted)
    #[arg(short, long)]
    precision: Option<usize>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum EngineKind {
    /// One function per parser state
    Ascent,
    /// Explicit action table
    Table,
}

/// Splits `name = expr` into the name and the expression text.
fn split_assignment(line: &str) -> Option<(smartstring::alias::String, &str)> {
    let mut lexer = CalcLexer::new(line);
    let TokenValue::Ident(name) = lexer.next_token().value else {
        return None;
    };
    if lexer.next_token().token_id != TokenID::Equals {
        return None;
    }
    Some((name, &line[lexer.offset()..]))
}

fn eval_line(engine: &mut dyn Engine, env: &mut Environment, line: &str) -> Result<f64, CalcError> {
    match split_assignment(line) {
        Some((name, expr)) => {
            let value = engine.parse(expr, env)?;
            log::info!("{} = {}", name, value);
            env.set_var(&name, value);
            Ok(value)
        }
        None => engine.parse(line, env),
    }
}

fn format_value(value: f64, precision: Option<usize>) -> String {
    match precision {
        Some(p) => format!("{value:.p$}"),
        None => format!("{value}"),
    }
}

/// Renders `err` with the columns it covers in `line`, 1-based.
fn diagnostic(line: &str, err: &CalcError) -> String {
    let Some(Span { start, end }) = err.span() else {
        return err.to_string();
    };
    // spans of an assignment are relative to the expression text
    let shift = split_assignment(line)
        .map(|(_, expr)| line[..line.len() - expr.len()].chars().count())
        .unwrap_or(0);
    let (first, last) = (start.column + shift + 1, end.column + shift);
    if Span::new(start, end).is_empty() || first == last {
        format!("column {first}: {err}")
    } else {
        format!("columns {first}-{last}: {err}")
    }
}

fn prompt(interactive: bool) -> io::Result<()> {
    if interactive {
        let mut stdout = io::stdout().lock();
        stdout.write_all(b"> ")?;
        stdout.flush()?;
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();

    let mut engine: Box<dyn Engine> = match args.engine {
        EngineKind::Ascent => Box::new(ExprParser::new().with_max_depth(args.max_depth)),
        EngineKind::Table => Box::new(TableParser::new()),
    };
    let mut env = Environment::with_builtins();

    let interactive = args.input.is_none() && io::stdin().is_terminal();
    let reader: Box<dyn BufRead> = match &args.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("can't open {:?}", path))?,
        )),
        None => Box::new(io::stdin().lock()),
    };

    let mut failed = 0usize;
    prompt(interactive)?;
    for (n, line) in reader.lines().enumerate() {
        let line = line.context("can't read input")?;
        if !line.trim().is_empty() {
            match eval_line(engine.as_mut(), &mut env, &line) {
                Ok(value) => println!("{}", format_value(value, args.precision)),
                Err(err) => {
                    failed += 1;
                    eprintln!("line {}, {}", n + 1, diagnostic(&line, &err));
                }
            }
        }
        prompt(interactive)?;
    }

    if failed > 0 {
        bail!("{} line(s) failed", failed);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignment_is_split_after_the_equals_sign() {
        let (name, expr) = split_assignment("x1 = 2*3").unwrap();
        assert_eq!(name.as_str(), "x1");
        assert_eq!(expr, " 2*3");
        assert!(split_assignment("x + 1").is_none());
        assert!(split_assignment("1 = 2").is_none());
        assert!(split_assignment("sin(x)").is_none());
    }

    #[test]
    fn assignment_binds_for_later_lines() {
        let mut env = Environment::with_builtins();
        let mut engine = ExprParser::new();
        assert_eq!(eval_line(&mut engine, &mut env, "r = 2").unwrap(), 2.0);
        assert_eq!(eval_line(&mut engine, &mut env, "r^2*3").unwrap(), 12.0);
        assert!(eval_line(&mut engine, &mut env, "q = foo").is_err());
        assert!(env.var("q").is_err());
    }

    #[test]
    fn diagnostics_point_at_columns() {
        let env = Environment::with_builtins();
        let mut engine = ExprParser::new();
        let err = engine.parse("2+*3", &env).unwrap_err();
        assert!(diagnostic("2+*3", &err).starts_with("column 3: no transition"));

        let line = "y = 2+*3";
        let err = engine.parse(&line[3..], &env).unwrap_err();
        assert!(diagnostic(line, &err).starts_with("column 7: "));

        let err = engine.parse("1+foo", &env).unwrap_err();
        assert!(diagnostic("1+foo", &err).starts_with("columns 3-5: "));

        let err = CalcError::TooDeep { limit: 1 };
        assert_eq!(diagnostic("1", &err), err.to_string());
    }

    #[test]
    fn precision_controls_fraction_digits() {
        assert_eq!(format_value(0.5, None), "0.5");
        assert_eq!(format_value(1.0 / 3.0, Some(3)), "0.333");
        assert_eq!(format_value(f64::INFINITY, None), "inf");
    }

    #[test]
    fn cli_arguments() {
        let args = Args::try_parse_from(["exprcalc", "-e", "table", "--precision", "4"]).unwrap();
        assert_eq!(args.engine, EngineKind::Table);
        assert_eq!(args.precision, Some(4));
        assert_eq!(args.max_depth, ExprParser::DEFAULT_MAX_DEPTH);
        assert!(args.input.is_none());
    }
}
