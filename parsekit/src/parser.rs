use crate::{Lexer, ParserError, Token};
use smartstring::alias::String;
use std::fmt::Debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParserAction<US, UP, UA>
where
    US: ParserStateID,
    UP: ParserProdID,
    UA: ParserAmbigID,
{
    Error,
    Accept,
    Shift(US),
    Reduce(UP),
    Ambig(UA),
    Goto(US),
}

pub trait ParserStateID: Copy + Debug + Eq + Into<usize> {
    const COUNT: usize;

    fn label(&self) -> &'static str;
}

pub trait ParserAmbigID: Copy + Debug + Eq + Into<usize> {
    const COUNT: usize;
}

pub trait ParserProdID: Copy + Debug + Eq + Into<usize> {
    type TokenID: ParserTokenID;

    const COUNT: usize;

    fn label(&self) -> &'static str;
    /// Non-terminal produced by this production.
    fn lhs_token_id(&self) -> Self::TokenID;
    /// Number of right-hand-side symbols.
    fn size(&self) -> usize;
}

pub trait ParserTokenID: Copy + Debug + Eq + Into<usize> {
    const COUNT_NONTERMINALS: usize;
    const COUNT_TERMINALS: usize;
    const COUNT: usize;

    fn label(&self) -> &'static str;
}

type Action<P> = ParserAction<
    <<P as Parser>::ParserData as ParserData>::StateID,
    <<P as Parser>::ParserData as ParserData>::ProdID,
    <<P as Parser>::ParserData as ParserData>::AmbigID,
>;

type ParserToken<P> = <<P as Parser>::Lexer as Lexer>::Token;

/// The action/goto tables of an LR automaton.
pub trait ParserData {
    type StateID: ParserStateID;
    type AmbigID: ParserAmbigID;
    type TokenID: ParserTokenID;
    type ProdID: ParserProdID<TokenID = Self::TokenID>;

    fn start_state() -> Self::StateID;

    fn lookup(
        state_id: Self::StateID,
        token_id: Self::TokenID,
    ) -> ParserAction<Self::StateID, Self::ProdID, Self::AmbigID>;

    /// Returns the `[shift, reduce]` pair recorded for a conflict.
    fn lookup_ambig(
        ambig_id: Self::AmbigID,
    ) -> [ParserAction<Self::StateID, Self::ProdID, Self::AmbigID>; 2];
}

/// A table-driven LR parser.
///
/// Implementors supply the tables ([`ParserData`]), the token source, and
/// two semantic hooks: [`Parser::reduce`], which replaces the right-hand side
/// on the token stack with the produced non-terminal, and
/// [`Parser::resolve_ambiguity`], which picks shift or reduce for a conflict
/// entry. [`Parser::try_parse`] runs the automaton over one sentence.
pub trait Parser {
    type Lexer: Lexer<Token: Token<TokenID = <Self::ParserData as ParserData>::TokenID>>;
    type ParserData: ParserData;
    type Context: ?Sized;
    type Error: From<ParserError>;

    fn ctx(&self) -> &ParserCtx<Self::Lexer, Self::ParserData>;
    fn ctx_mut(&mut self) -> &mut ParserCtx<Self::Lexer, Self::ParserData>;

    fn resolve_ambiguity(
        &mut self,
        context: &Self::Context,
        ambig: <Self::ParserData as ParserData>::AmbigID,
        token: &ParserToken<Self>,
    ) -> Result<Action<Self>, Self::Error>;

    /// Pops the right-hand side of `prod_id` from the token stack and pushes
    /// exactly one token for the produced non-terminal.
    fn reduce(
        &mut self,
        context: &Self::Context,
        prod_id: <Self::ParserData as ParserData>::ProdID,
        token: &ParserToken<Self>,
    ) -> Result<(), Self::Error>;

    fn stats(&self) -> ParserStats {
        self.ctx().stats.clone()
    }

    /// Parses one sentence and returns the accepted start token.
    fn try_parse(&mut self, context: &Self::Context) -> Result<ParserToken<Self>, Self::Error> {
        self.ctx_mut().states.clear();
        self.ctx_mut().tokens.clear();
        let mut token = self.ctx_mut().next_token();
        let mut state = <Self as Parser>::ParserData::start_state();
        self.ctx_mut().states.push(state);
        loop {
            if log::log_enabled!(log::Level::Trace) {
                self.ctx().dump_state(&token);
            }
            let action = match <Self as Parser>::ParserData::lookup(state, token.token_id()) {
                Action::<Self>::Ambig(ambig) => {
                    log::trace!("Ambig {:?}", ambig);
                    let action = self.resolve_ambiguity(context, ambig, &token)?;
                    self.ctx_mut().stats.ambigs += 1;
                    action
                }
                action => action,
            };
            match action {
                Action::<Self>::Shift(new_state) => {
                    log::trace!("Shift {:?}", new_state);
                    self.ctx_mut().tokens.push(token);
                    state = new_state;
                    self.ctx_mut().states.push(state);
                    token = self.ctx_mut().next_token();
                    self.ctx_mut().stats.shifts += 1;
                }

                Action::<Self>::Reduce(prod_id) => {
                    log::trace!("Reduce {:?}", prod_id);
                    self.reduce(context, prod_id, &token)?;
                    let ctx = self.ctx_mut();
                    let size = prod_id.size();
                    if ctx.states.len() <= size {
                        return Err(ParserError::StackUnderflow.into());
                    }
                    ctx.states.truncate(ctx.states.len() - size);
                    state = ctx.states[ctx.states.len() - 1];
                    let lhs_id = prod_id.lhs_token_id();
                    let Action::<Self>::Goto(new_state) =
                        <Self as Parser>::ParserData::lookup(state, lhs_id)
                    else {
                        return Err(ParserError::MissingGoto {
                            state: state.label().into(),
                            nonterminal: lhs_id.label().into(),
                        }
                        .into());
                    };
                    log::trace!("Goto {:?}", new_state);
                    state = new_state;
                    ctx.states.push(state);
                    ctx.stats.reductions += 1;
                }

                Action::<Self>::Accept => {
                    log::trace!("Accept");
                    let token = self.ctx_mut().tokens_pop()?;
                    return Ok(token);
                }

                Action::<Self>::Error => {
                    return Err(ParserError::NoTransition {
                        state: state.label().into(),
                        lookahead: token.to_string().into(),
                        span: token.span(),
                    }
                    .into());
                }

                Action::<Self>::Ambig(_) | Action::<Self>::Goto(_) => unreachable!(),
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParserStats {
    pub tokens: usize,
    pub shifts: usize,
    pub reductions: usize,
    pub ambigs: usize,
}

pub struct ParserCtx<L, D>
where
    L: Lexer,
    D: ParserData,
{
    pub lexer: L,
    pub tokens: Vec<L::Token>,
    pub states: Vec<D::StateID>,
    pub stats: ParserStats,
}

impl<L, D> ParserCtx<L, D>
where
    L: Lexer,
    D: ParserData,
{
    pub fn new(lexer: L) -> Self {
        Self {
            lexer,
            tokens: Vec::new(),
            states: Vec::new(),
            stats: ParserStats::default(),
        }
    }

    /// Replaces the token source and forgets everything about the previous
    /// sentence, statistics included.
    pub fn reset(&mut self, lexer: L) {
        self.lexer = lexer;
        self.tokens.clear();
        self.states.clear();
        self.stats = ParserStats::default();
    }

    pub fn next_token(&mut self) -> L::Token {
        self.stats.tokens += 1;
        self.lexer.next_token()
    }

    pub fn tokens_pop(&mut self) -> Result<L::Token, ParserError> {
        self.tokens.pop().ok_or(ParserError::StackUnderflow)
    }

    pub fn dump_state(&self, incoming: &L::Token) {
        let mut output = String::new();
        if !self.states.is_empty() {
            for (i, (token, state)) in self
                .tokens
                .iter()
                .chain(std::iter::once(incoming))
                .zip(self.states.iter())
                .enumerate()
            {
                output.push_str(&format!(
                    "<{}>  {}{}  ",
                    state.label(),
                    if i == self.states.len() - 1 {
                        "<-  "
                    } else {
                        ""
                    },
                    token,
                ));
            }
            log::trace!("{}", output);
        } else {
            log::trace!("<>");
        }
    }
}

#[cfg(test)]
mod tests {
    //! Drives the two-rule grammar `S -> S a | a` and counts the `a`s in
    //! the reductions.

    use super::*;
    use crate::{LexerStats, Position, Span};
    use std::fmt;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[repr(u8)]
    enum TokenID {
        Start = 0,
        S = 1,
        A = 2,
        End = 3,
        Error = 4,
    }

    impl From<TokenID> for usize {
        fn from(t: TokenID) -> Self {
            t as usize
        }
    }

    impl ParserTokenID for TokenID {
        const COUNT_NONTERMINALS: usize = 2;
        const COUNT_TERMINALS: usize = 2;
        const COUNT: usize = 5;

        fn label(&self) -> &'static str {
            ["Start", "S", "a", "end", "error"][*self as usize]
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct StateID(u8);

    impl From<StateID> for usize {
        fn from(s: StateID) -> Self {
            s.0 as usize
        }
    }

    impl ParserStateID for StateID {
        const COUNT: usize = 4;

        fn label(&self) -> &'static str {
            ["start", "after_s", "after_a", "after_s_a"][self.0 as usize]
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct AmbigID(u8);

    impl From<AmbigID> for usize {
        fn from(a: AmbigID) -> Self {
            a.0 as usize
        }
    }

    impl ParserAmbigID for AmbigID {
        const COUNT: usize = 0;
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[repr(u8)]
    enum ProdID {
        Start = 0,
        One = 1,
        More = 2,
    }

    impl From<ProdID> for usize {
        fn from(p: ProdID) -> Self {
            p as usize
        }
    }

    impl ParserProdID for ProdID {
        type TokenID = TokenID;

        const COUNT: usize = 3;

        fn label(&self) -> &'static str {
            ["start", "s_one", "s_more"][*self as usize]
        }
        fn lhs_token_id(&self) -> TokenID {
            match self {
                ProdID::Start => TokenID::Start,
                ProdID::One | ProdID::More => TokenID::S,
            }
        }
        fn size(&self) -> usize {
            [1, 1, 2][*self as usize]
        }
    }

    type Act = ParserAction<StateID, ProdID, AmbigID>;

    struct XParserData;

    impl XParserData {
        const TAB: [[Act; 4]; 4] = [
            /* start */
            [
                Act::Error,
                Act::Goto(StateID(1)),
                Act::Shift(StateID(2)),
                Act::Error,
            ],
            /* after_s */
            [Act::Error, Act::Error, Act::Shift(StateID(3)), Act::Accept],
            /* after_a */
            [
                Act::Error,
                Act::Error,
                Act::Reduce(ProdID::One),
                Act::Reduce(ProdID::One),
            ],
            /* after_s_a */
            [
                Act::Error,
                Act::Error,
                Act::Reduce(ProdID::More),
                Act::Reduce(ProdID::More),
            ],
        ];
    }

    impl ParserData for XParserData {
        type StateID = StateID;
        type AmbigID = AmbigID;
        type TokenID = TokenID;
        type ProdID = ProdID;

        fn start_state() -> StateID {
            StateID(0)
        }

        fn lookup(state_id: StateID, token_id: TokenID) -> Act {
            match token_id {
                TokenID::Error => Act::Error,
                _ => Self::TAB[usize::from(state_id)][usize::from(token_id)],
            }
        }

        fn lookup_ambig(_ambig_id: AmbigID) -> [Act; 2] {
            unreachable!("grammar has no conflicts")
        }
    }

    #[derive(Debug, Clone)]
    struct XToken {
        token_id: TokenID,
        count: usize,
        span: Option<Span>,
    }

    impl fmt::Display for XToken {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", self.token_id.label())
        }
    }

    impl Token for XToken {
        type TokenID = TokenID;

        fn token_id(&self) -> TokenID {
            self.token_id
        }
        fn span(&self) -> Option<Span> {
            self.span
        }
    }

    struct XLexer {
        input: Vec<u8>,
        pos: usize,
        stats: LexerStats,
    }

    impl XLexer {
        fn new(input: &str) -> Self {
            Self {
                input: input.bytes().collect(),
                pos: 0,
                stats: LexerStats::default(),
            }
        }
    }

    impl Lexer for XLexer {
        type Token = XToken;

        fn next_token(&mut self) -> XToken {
            self.stats.tokens += 1;
            let start = Position::new(0, self.pos);
            let token_id = match self.input.get(self.pos) {
                None => TokenID::End,
                Some(b'a') => TokenID::A,
                Some(_) => TokenID::Error,
            };
            if token_id != TokenID::End {
                self.pos += 1;
                self.stats.chars += 1;
            }
            XToken {
                token_id,
                count: 0,
                span: Some(Span::new(start, Position::new(0, self.pos))),
            }
        }

        fn stats(&self) -> LexerStats {
            self.stats.clone()
        }
    }

    struct XParser {
        ctx: ParserCtx<XLexer, XParserData>,
    }

    impl XParser {
        fn new(input: &str) -> Self {
            Self {
                ctx: ParserCtx::new(XLexer::new(input)),
            }
        }
    }

    impl Parser for XParser {
        type Lexer = XLexer;
        type ParserData = XParserData;
        type Context = ();
        type Error = ParserError;

        fn ctx(&self) -> &ParserCtx<XLexer, XParserData> {
            &self.ctx
        }
        fn ctx_mut(&mut self) -> &mut ParserCtx<XLexer, XParserData> {
            &mut self.ctx
        }

        fn resolve_ambiguity(
            &mut self,
            _context: &(),
            _ambig: AmbigID,
            _token: &XToken,
        ) -> Result<Act, ParserError> {
            unreachable!("grammar has no conflicts")
        }

        fn reduce(&mut self, _context: &(), prod_id: ProdID, _token: &XToken) -> Result<(), ParserError> {
            let a = self.ctx.tokens_pop()?;
            let count = match prod_id {
                ProdID::One => 1,
                ProdID::More => self.ctx.tokens_pop()?.count + 1,
                ProdID::Start => unreachable!(),
            };
            self.ctx.tokens.push(XToken {
                token_id: TokenID::S,
                count,
                span: a.span,
            });
            Ok(())
        }
    }

    #[test]
    fn counts_left_recursive_reductions() {
        init_logger();
        let mut parser = XParser::new("aaaa");
        let tok = parser.try_parse(&()).unwrap();
        assert_eq!(tok.token_id, TokenID::S);
        assert_eq!(tok.count, 4);
        assert_eq!(
            parser.stats(),
            ParserStats {
                tokens: 5,
                shifts: 4,
                reductions: 4,
                ambigs: 0,
            }
        );
        assert_eq!(parser.ctx().lexer.stats().chars, 4);
    }

    #[test]
    fn reports_state_and_lookahead_on_error() {
        init_logger();
        let mut parser = XParser::new("aab");
        let err = parser.try_parse(&()).unwrap_err();
        assert_eq!(
            err,
            ParserError::NoTransition {
                state: "after_s_a".into(),
                lookahead: "error".into(),
                span: crate::span!(0, 2, 0, 3),
            }
        );
    }

    #[test]
    fn empty_input_has_no_transition_from_start() {
        init_logger();
        let mut parser = XParser::new("");
        let err = parser.try_parse(&()).unwrap_err();
        assert!(matches!(err, ParserError::NoTransition { ref state, .. } if state == "start"));
    }

    #[test]
    fn reset_clears_stacks_and_stats() {
        init_logger();
        let mut parser = XParser::new("ab");
        assert!(parser.try_parse(&()).is_err());
        parser.ctx_mut().reset(XLexer::new("aa"));
        assert_eq!(parser.stats(), ParserStats::default());
        assert!(parser.ctx().tokens.is_empty());
        let tok = parser.try_parse(&()).unwrap();
        assert_eq!(tok.count, 2);
        assert!(parser.ctx().tokens.is_empty());
    }
}
