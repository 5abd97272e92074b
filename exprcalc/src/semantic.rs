//! Semantic actions, shared by both engines.
//!
//! [`reduce`] replaces the right-hand side of a production on the symbol
//! stack with a single `Expr` token carrying the computed value. The new
//! token's span covers the whole right-hand side.

use crate::{CalcError, CalcToken, Environment, ProdID, TokenValue};
use parsekit::{ParserError, ParserProdID};

pub fn reduce(
    stack: &mut Vec<CalcToken>,
    prod_id: ProdID,
    env: &Environment,
) -> Result<(), CalcError> {
    let size = prod_id.size();
    if stack.len() < size {
        return Err(ParserError::StackUnderflow.into());
    }
    let rhs = stack.split_off(stack.len() - size);

    let mut lhs = CalcToken::expr(0.0, None);
    for t in &rhs {
        lhs.merge_span(&t.span);
    }

    let value = match (prod_id, rhs.as_slice()) {
        (ProdID::Start | ProdID::Real, [x]) => number(x)?,
        (ProdID::Add, [l, _, r]) => number(l)? + number(r)?,
        (ProdID::Sub, [l, _, r]) => number(l)? - number(r)?,
        (ProdID::Mul, [l, _, r]) => number(l)? * number(r)?,
        (ProdID::Div, [l, _, r]) => number(l)? / number(r)?,
        (ProdID::Mod, [l, _, r]) => number(l)? % number(r)?,
        (ProdID::Pow, [l, _, r]) => number(l)?.powf(number(r)?),
        (ProdID::Plus, [_, x]) => number(x)?,
        (ProdID::Minus, [_, x]) => -number(x)?,
        (ProdID::Paren, [_, x, _]) => number(x)?,
        (ProdID::Var, [id]) => env.var(ident(id)?).map_err(|source| CalcError::Env {
            source,
            span: id.span,
        })?,
        (ProdID::Call0, [id, _, _]) => call(env, id, &[], &lhs)?,
        (ProdID::Call1, [id, _, a, _]) => call(env, id, &[number(a)?], &lhs)?,
        (ProdID::Call2, [id, _, a, _, b, _]) => call(env, id, &[number(a)?, number(b)?], &lhs)?,
        (_, rhs) => {
            return Err(ParserError::UnexpectedSymbol {
                found: rhs.first().map(|t| t.to_string()).unwrap_or_default().into(),
            }
            .into());
        }
    };

    log::trace!("{} = {}", prod_id.label(), value);
    lhs.value = TokenValue::Number(value);
    stack.push(lhs);
    Ok(())
}

fn number(t: &CalcToken) -> Result<f64, CalcError> {
    t.number().ok_or_else(|| {
        ParserError::UnexpectedSymbol {
            found: t.to_string().into(),
        }
        .into()
    })
}

fn ident(t: &CalcToken) -> Result<&str, CalcError> {
    match &t.value {
        TokenValue::Ident(name) => Ok(name.as_str()),
        _ => Err(ParserError::UnexpectedSymbol {
            found: t.to_string().into(),
        }
        .into()),
    }
}

fn call(env: &Environment, id: &CalcToken, args: &[f64], lhs: &CalcToken) -> Result<f64, CalcError> {
    env.call(ident(id)?, args).map_err(|source| CalcError::Env {
        source,
        span: lhs.span,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EnvError, TokenID};
    use parsekit::span;

    fn real(n: f64, col: usize) -> CalcToken {
        CalcToken {
            token_id: TokenID::Real,
            value: TokenValue::Number(n),
            span: span!(0, col, 0, col + 1),
        }
    }

    fn expr(n: f64, col: usize) -> CalcToken {
        CalcToken::expr(n, span!(0, col, 0, col + 1))
    }

    fn op(token_id: TokenID, col: usize) -> CalcToken {
        CalcToken {
            token_id,
            value: TokenValue::None,
            span: span!(0, col, 0, col + 1),
        }
    }

    fn ident(name: &str, col: usize) -> CalcToken {
        CalcToken {
            token_id: TokenID::Ident,
            value: TokenValue::Ident(name.into()),
            span: span!(0, col, 0, col + name.len()),
        }
    }

    #[test]
    fn binary_reduction_replaces_three_symbols() {
        let env = Environment::new();
        let mut stack = vec![expr(9.0, 0), expr(7.0, 2), op(TokenID::Percent, 3), expr(4.0, 4)];
        reduce(&mut stack, ProdID::Mod, &env).unwrap();
        assert_eq!(stack.len(), 2);
        let top = stack.last().unwrap();
        assert_eq!(top.token_id, TokenID::Expr);
        assert_eq!(top.number(), Some(3.0));
        assert_eq!(top.span, span!(0, 2, 0, 5));
    }

    #[test]
    fn unary_minus_and_literal() {
        let env = Environment::new();
        let mut stack = vec![op(TokenID::Minus, 0), real(5.0, 1)];
        reduce(&mut stack, ProdID::Real, &env).unwrap();
        reduce(&mut stack, ProdID::Minus, &env).unwrap();
        assert_eq!(stack, vec![CalcToken::expr(-5.0, span!(0, 0, 0, 2))]);
    }

    #[test]
    fn division_by_zero_is_not_guarded() {
        let env = Environment::new();
        let mut stack = vec![expr(1.0, 0), op(TokenID::Slash, 1), expr(0.0, 2)];
        reduce(&mut stack, ProdID::Div, &env).unwrap();
        assert_eq!(stack[0].number(), Some(f64::INFINITY));
    }

    #[test]
    fn variable_lookup_failure_carries_identifier_span() {
        let env = Environment::new();
        let mut stack = vec![ident("foo", 3)];
        let err = reduce(&mut stack, ProdID::Var, &env).unwrap_err();
        assert_eq!(
            err,
            CalcError::Env {
                source: EnvError::UnknownVariable { name: "foo".into() },
                span: span!(0, 3, 0, 6),
            }
        );
    }

    #[test]
    fn two_argument_call() {
        let env = Environment::with_builtins();
        let mut stack = vec![
            ident("pow", 0),
            op(TokenID::LeftParen, 3),
            expr(2.0, 4),
            op(TokenID::Comma, 5),
            expr(3.0, 6),
            op(TokenID::RightParen, 7),
        ];
        reduce(&mut stack, ProdID::Call2, &env).unwrap();
        assert_eq!(stack, vec![CalcToken::expr(8.0, span!(0, 0, 0, 8))]);
    }

    #[test]
    fn arity_mismatch_covers_the_call() {
        let env = Environment::with_builtins();
        let mut stack = vec![ident("sqrt", 0), op(TokenID::LeftParen, 4), op(TokenID::RightParen, 5)];
        let err = reduce(&mut stack, ProdID::Call0, &env).unwrap_err();
        assert!(err.is_semantic());
        assert_eq!(err.span(), span!(0, 0, 0, 6));
    }

    #[test]
    fn short_stack_underflows() {
        let env = Environment::new();
        let mut stack = vec![expr(1.0, 0)];
        assert_eq!(
            reduce(&mut stack, ProdID::Add, &env),
            Err(CalcError::Syntax(ParserError::StackUnderflow))
        );
    }
}
