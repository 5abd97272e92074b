//! # Recursive-Ascent Engine
//!
//! [`ExprParser`] runs the LR(1) automaton for the expression grammar as a
//! set of mutually recursive methods, one per state. A state consumes its
//! look-ahead in one of five ways:
//!
//! - **shift**: push the look-ahead onto the symbol stack, read the next
//!   token and call the successor state;
//! - **goto**: once a callee has left a freshly reduced `Expr` on top of the
//!   stack, call the state that follows `Expr` here, and keep doing so while
//!   the reductions end in this frame;
//! - **reduce**: run the production's semantic action and set
//!   `dist_to_jump` to the length of its right-hand side. Every frame
//!   decrements it on the way out, so the frames of the reduced symbols
//!   return without further work and control lands in the state that
//!   performs the goto;
//! - **accept**: only in `after_expr` with the end token;
//! - **error**: report the state and the look-ahead.
//!
//! Each active state costs a handful of native call frames. Deeply nested
//! input is cut off with [`CalcError::TooDeep`]; the default limit fits a
//! 2 MiB thread stack in an unoptimised build.
//!
//! # Example
//! ```rust
//! # use exprcalc::{Environment, ExprParser};
//! let env = Environment::with_builtins();
//! let mut parser = ExprParser::new();
//! assert_eq!(parser.parse("pow((2+3)*4,2)", &env).unwrap(), 400.0);
//! assert!(parser.parse("2+*3", &env).unwrap_err().is_syntax());
//! ```

use crate::{CalcError, CalcLexer, CalcToken, Environment, ProdID, TokenID, semantic};
use parsekit::{Lexer, ParserError, ParserProdID, ParserStats};

type Step = Result<(), CalcError>;

/// Recursive-ascent parser and evaluator for one-line expressions.
#[derive(Debug, Clone)]
pub struct ExprParser {
    max_depth: usize,
    stats: ParserStats,
}

impl Default for ExprParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ExprParser {
    /// Default limit on simultaneously active state frames.
    pub const DEFAULT_MAX_DEPTH: usize = 256;

    pub fn new() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
            stats: ParserStats::default(),
        }
    }

    /// Sets the limit on simultaneously active state frames.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Parses and evaluates `input` against `env`.
    ///
    /// The symbol stack, the lexer and the look-ahead belong to this call;
    /// nothing but the statistics survives it.
    pub fn parse(&mut self, input: &str, env: &Environment) -> Result<f64, CalcError> {
        let mut ascent = Ascent::new(input, env, self.max_depth);
        let result = ascent.run();
        self.stats = ascent.stats;
        log::debug!("{:?}", ascent.lexer.stats());
        match &result {
            Ok(value) => log::debug!("{:?} = {}", input, value),
            Err(err) => log::debug!("{:?}: {}", input, err),
        }
        result
    }

    /// Statistics of the most recent parse.
    pub fn stats(&self) -> ParserStats {
        self.stats.clone()
    }
}

struct Ascent<'e> {
    env: &'e Environment,
    lexer: CalcLexer,
    lookahead: CalcToken,
    symbols: Vec<CalcToken>,
    accepted: bool,
    dist_to_jump: usize,
    depth: usize,
    max_depth: usize,
    stats: ParserStats,
}

impl<'e> Ascent<'e> {
    fn new(input: &str, env: &'e Environment, max_depth: usize) -> Self {
        let mut lexer = CalcLexer::new(input);
        let lookahead = lexer.next_token();
        Self {
            env,
            lexer,
            lookahead,
            symbols: Vec::new(),
            accepted: false,
            dist_to_jump: 0,
            depth: 0,
            max_depth,
            stats: ParserStats {
                tokens: 1,
                ..ParserStats::default()
            },
        }
    }

    fn run(&mut self) -> Result<f64, CalcError> {
        self.start()?;
        let result = self.symbols.pop().ok_or(ParserError::StackUnderflow)?;
        result.number().ok_or_else(|| {
            ParserError::UnexpectedSymbol {
                found: result.to_string().into(),
            }
            .into()
        })
    }

    // Frame bookkeeping

    /// Calls a state procedure as a new frame and runs its epilogue.
    fn enter(&mut self, state: impl FnOnce(&mut Self) -> Step) -> Step {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(CalcError::TooDeep {
                limit: self.max_depth,
            });
        }
        state(self)?;
        self.depth -= 1;
        if !self.accepted {
            self.dist_to_jump -= 1;
        }
        Ok(())
    }

    fn shift(&mut self, next: impl FnOnce(&mut Self) -> Step) -> Step {
        let token = std::mem::replace(&mut self.lookahead, self.lexer.next_token());
        log::trace!("shift {}", token);
        self.symbols.push(token);
        self.stats.tokens += 1;
        self.stats.shifts += 1;
        self.enter(next)
    }

    /// Calls the goto target for `Expr` for as long as reductions land in
    /// the current frame.
    fn goto(&mut self, next: impl Fn(&mut Self) -> Step) -> Step {
        while self.dist_to_jump == 0 && !self.accepted {
            self.enter(&next)?;
        }
        Ok(())
    }

    fn reduce(&mut self, prod_id: ProdID) -> Step {
        log::trace!("reduce {}", prod_id.label());
        semantic::reduce(&mut self.symbols, prod_id, self.env)?;
        self.dist_to_jump = prod_id.size();
        self.stats.reductions += 1;
        Ok(())
    }

    fn error(&self, state: &'static str) -> CalcError {
        log::debug!("no transition from {} on {}", state, self.lookahead);
        ParserError::NoTransition {
            state: state.into(),
            lookahead: self.lookahead.to_string().into(),
            span: self.lookahead.span,
        }
        .into()
    }

    fn at_follow(&self) -> bool {
        self.lookahead.token_id.follows_expr()
    }

    /// Start of an operand: a sign, a bracket, a literal or an identifier.
    fn operand(&mut self, state: &'static str, next: impl Fn(&mut Self) -> Step) -> Step {
        match self.lookahead.token_id {
            TokenID::Plus => self.shift(|p| p.sign_after_op(ProdID::Plus))?,
            TokenID::Minus => self.shift(|p| p.sign_after_op(ProdID::Minus))?,
            TokenID::LeftParen => self.shift(Self::after_bracket)?,
            TokenID::Real => self.shift(Self::after_real)?,
            TokenID::Ident => self.shift(Self::after_ident)?,
            _ => return Err(self.error(state)),
        }
        self.goto(next)
    }

    /// Any binary operator after a complete left operand.
    fn operator(&mut self, state: &'static str) -> Step {
        match self.lookahead.token_id.binary_operator() {
            Some(op @ (ProdID::Add | ProdID::Sub)) => self.shift(move |p| p.add_after_op(op)),
            Some(op @ (ProdID::Mul | ProdID::Div | ProdID::Mod)) => {
                self.shift(move |p| p.mul_after_op(op))
            }
            Some(ProdID::Pow) => self.shift(Self::pow_after_op),
            _ => Err(self.error(state)),
        }
    }

    // States

    fn start(&mut self) -> Step {
        self.operand("start", Self::after_expr)
    }

    fn after_expr(&mut self) -> Step {
        if self.lookahead.token_id == TokenID::End {
            log::trace!("accept");
            self.accepted = true;
            return Ok(());
        }
        self.operator("after_expr")
    }

    /// `Expr + . Expr` and `Expr - . Expr`.
    fn add_after_op(&mut self, op: ProdID) -> Step {
        self.operand("add_after_op", move |p| p.after_add(op))
    }

    fn after_add(&mut self, op: ProdID) -> Step {
        match self.lookahead.token_id {
            TokenID::Asterisk | TokenID::Slash | TokenID::Percent | TokenID::Caret => {
                self.operator("after_add")
            }
            TokenID::Plus | TokenID::Minus | TokenID::RightParen | TokenID::Comma | TokenID::End => {
                self.reduce(op)
            }
            _ => Err(self.error("after_add")),
        }
    }

    /// `Expr * . Expr`, `Expr / . Expr` and `Expr % . Expr`.
    fn mul_after_op(&mut self, op: ProdID) -> Step {
        self.operand("mul_after_op", move |p| p.after_mul(op))
    }

    fn after_mul(&mut self, op: ProdID) -> Step {
        match self.lookahead.token_id {
            TokenID::Caret => self.shift(Self::pow_after_op),
            _ if self.at_follow() => self.reduce(op),
            _ => Err(self.error("after_mul")),
        }
    }

    fn pow_after_op(&mut self) -> Step {
        self.operand("pow_after_op", Self::after_pow)
    }

    fn after_pow(&mut self) -> Step {
        match self.lookahead.token_id {
            // right-associative
            TokenID::Caret => self.shift(Self::pow_after_op),
            _ if self.at_follow() => self.reduce(ProdID::Pow),
            _ => Err(self.error("after_pow")),
        }
    }

    /// `+ . Expr` and `- . Expr`.
    fn sign_after_op(&mut self, op: ProdID) -> Step {
        self.operand("sign_after_op", move |p| p.after_sign(op))
    }

    fn after_sign(&mut self, op: ProdID) -> Step {
        match self.lookahead.token_id {
            TokenID::Asterisk | TokenID::Slash | TokenID::Percent | TokenID::Caret => {
                self.operator("after_sign")
            }
            TokenID::Plus | TokenID::Minus | TokenID::RightParen | TokenID::Comma | TokenID::End => {
                self.reduce(op)
            }
            _ => Err(self.error("after_sign")),
        }
    }

    fn after_bracket(&mut self) -> Step {
        self.operand("after_bracket", Self::bracket_after_expr)
    }

    fn bracket_after_expr(&mut self) -> Step {
        match self.lookahead.token_id {
            TokenID::RightParen => self.shift(Self::after_bracket_expr),
            _ => self.operator("bracket_after_expr"),
        }
    }

    fn after_bracket_expr(&mut self) -> Step {
        if !self.at_follow() {
            return Err(self.error("after_bracket_expr"));
        }
        self.reduce(ProdID::Paren)
    }

    fn after_ident(&mut self) -> Step {
        match self.lookahead.token_id {
            TokenID::LeftParen => self.shift(Self::funccall_after_ident),
            _ if self.at_follow() => self.reduce(ProdID::Var),
            _ => Err(self.error("after_ident")),
        }
    }

    fn after_real(&mut self) -> Step {
        if !self.at_follow() {
            return Err(self.error("after_real"));
        }
        self.reduce(ProdID::Real)
    }

    fn funccall_after_ident(&mut self) -> Step {
        match self.lookahead.token_id {
            TokenID::RightParen => self.shift(Self::after_funccall_0args),
            _ => self.operand("funccall_after_ident", Self::funccall_after_arg),
        }
    }

    fn after_funccall_0args(&mut self) -> Step {
        if !self.at_follow() {
            return Err(self.error("after_funccall_0args"));
        }
        self.reduce(ProdID::Call0)
    }

    fn funccall_after_arg(&mut self) -> Step {
        match self.lookahead.token_id {
            TokenID::Comma => self.shift(Self::funccall_after_comma),
            TokenID::RightParen => self.shift(Self::after_funccall_1arg),
            _ => self.operator("funccall_after_arg"),
        }
    }

    fn after_funccall_1arg(&mut self) -> Step {
        if !self.at_follow() {
            return Err(self.error("after_funccall_1arg"));
        }
        self.reduce(ProdID::Call1)
    }

    fn funccall_after_comma(&mut self) -> Step {
        self.operand("funccall_after_comma", Self::funccall_after_arg2)
    }

    fn funccall_after_arg2(&mut self) -> Step {
        match self.lookahead.token_id {
            TokenID::RightParen => self.shift(Self::after_funccall_2args),
            _ => self.operator("funccall_after_arg2"),
        }
    }

    fn after_funccall_2args(&mut self) -> Step {
        if !self.at_follow() {
            return Err(self.error("after_funccall_2args"));
        }
        self.reduce(ProdID::Call2)
    }
}
