//! # Expression Grammar
//!
//! Token, production and state identifiers for the expression automaton and
//! the explicit LR action table ([`ParData`]) that drives [`TableParser`].
//!
//! ```text
//! Start -> Expr
//! Expr  -> Expr + Expr | Expr - Expr | Expr * Expr | Expr / Expr | Expr % Expr
//!        | Expr ^ Expr | + Expr | - Expr | ( Expr ) | ident | real
//!        | ident ( ) | ident ( Expr ) | ident ( Expr , Expr )
//! ```
//!
//! The binary-operator productions make the grammar ambiguous. The table
//! records every shift/reduce conflict as a [`ParserAction::Ambig`] entry and
//! [`TableParser`] resolves it from [`ProdID::precedence`]: `+ -` (binary and
//! unary) bind loosest, then `* / %`, then `^`; `^` is right-associative,
//! the rest are left-associative. Signs chain, so `--5` is `5` and
//! `2*-+3` is `-6`.
//!
//! State names match the state procedures of [`ExprParser`] where the two
//! coincide; the table splits states that the recursive-ascent procedures
//! share through a parameter (for example `add_after_op` and `sub_after_op`).
//!
//! [`TableParser`]: crate::TableParser
//! [`ExprParser`]: crate::ExprParser

use once_cell::sync::Lazy;
use parsekit::{
    ParserAction, ParserAmbigID, ParserData, ParserProdID, ParserStateID, ParserTokenID,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TokenID {
    // Nonterminals:
    Start = 0,
    Expr = 1,

    // Terminals:
    Plus = 2,
    Minus = 3,
    Asterisk = 4,
    Slash = 5,
    Percent = 6,
    Caret = 7,
    LeftParen = 8,
    RightParen = 9,
    Comma = 10,
    Equals = 11,
    Real = 12,
    Ident = 13,
    End = 14,

    // Error:
    Error = 15,
}

impl ParserTokenID for TokenID {
    const COUNT_NONTERMINALS: usize = 2;
    const COUNT_TERMINALS: usize = 13;
    const COUNT: usize = Self::COUNT_NONTERMINALS + Self::COUNT_TERMINALS + 1;

    fn label(&self) -> &'static str {
        TokenID::LABELS[usize::from(*self)]
    }
}

impl From<TokenID> for usize {
    fn from(t: TokenID) -> Self {
        t as usize
    }
}

impl TokenID {
    pub const LABELS: &'static [&'static str] = &[
        "Start", // 0
        "Expr",  // 1
        "'+'",   // 2
        "'-'",   // 3
        "'*'",   // 4
        "'/'",   // 5
        "'%'",   // 6
        "'^'",   // 7
        "'('",   // 8
        "')'",   // 9
        "','",   // 10
        "'='",   // 11
        "real",  // 12
        "ident", // 13
        "end",   // 14
        "error", // 15
    ];

    /// Binary operators, in the order the table lists them.
    pub const OPERATORS: [TokenID; 6] = [
        TokenID::Plus,
        TokenID::Minus,
        TokenID::Asterisk,
        TokenID::Slash,
        TokenID::Percent,
        TokenID::Caret,
    ];

    /// Token for a single-character lexeme.
    pub fn from_char(c: char) -> Option<TokenID> {
        Some(match c {
            '+' => TokenID::Plus,
            '-' => TokenID::Minus,
            '*' => TokenID::Asterisk,
            '/' => TokenID::Slash,
            '%' => TokenID::Percent,
            '^' => TokenID::Caret,
            '(' => TokenID::LeftParen,
            ')' => TokenID::RightParen,
            ',' => TokenID::Comma,
            '=' => TokenID::Equals,
            _ => return None,
        })
    }

    /// The binary production this token introduces when it follows an
    /// expression.
    pub fn binary_operator(self) -> Option<ProdID> {
        match self {
            TokenID::Plus => Some(ProdID::Add),
            TokenID::Minus => Some(ProdID::Sub),
            TokenID::Asterisk => Some(ProdID::Mul),
            TokenID::Slash => Some(ProdID::Div),
            TokenID::Percent => Some(ProdID::Mod),
            TokenID::Caret => Some(ProdID::Pow),
            _ => None,
        }
    }

    /// Terminals that may follow a complete expression.
    pub fn follows_expr(self) -> bool {
        self.binary_operator().is_some()
            || matches!(self, TokenID::RightParen | TokenID::Comma | TokenID::End)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assoc {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ProdID {
    Start = 0,
    Add = 1,
    Sub = 2,
    Mul = 3,
    Div = 4,
    Mod = 5,
    Pow = 6,
    Plus = 7,
    Minus = 8,
    Paren = 9,
    Var = 10,
    Real = 11,
    Call0 = 12,
    Call1 = 13,
    Call2 = 14,
}

impl ParserProdID for ProdID {
    type TokenID = TokenID;

    const COUNT: usize = 15;

    fn label(&self) -> &'static str {
        ProdID::LABELS[usize::from(*self)]
    }
    fn lhs_token_id(&self) -> TokenID {
        match self {
            ProdID::Start => TokenID::Start,
            _ => TokenID::Expr,
        }
    }
    fn size(&self) -> usize {
        ProdID::SIZES[usize::from(*self)]
    }
}

impl From<ProdID> for usize {
    fn from(p: ProdID) -> Self {
        p as usize
    }
}

impl ProdID {
    pub const LABELS: &'static [&'static str] = &[
        "start",       // 0: Start -> Expr
        "expr_add",    // 1: Expr -> Expr + Expr
        "expr_sub",    // 2: Expr -> Expr - Expr
        "expr_mul",    // 3: Expr -> Expr * Expr
        "expr_div",    // 4: Expr -> Expr / Expr
        "expr_mod",    // 5: Expr -> Expr % Expr
        "expr_pow",    // 6: Expr -> Expr ^ Expr
        "expr_plus",   // 7: Expr -> + Expr
        "expr_minus",  // 8: Expr -> - Expr
        "expr_paren",  // 9: Expr -> ( Expr )
        "expr_var",    // 10: Expr -> ident
        "expr_real",   // 11: Expr -> real
        "expr_call0",  // 12: Expr -> ident ( )
        "expr_call1",  // 13: Expr -> ident ( Expr )
        "expr_call2",  // 14: Expr -> ident ( Expr , Expr )
    ];

    pub const SIZES: &'static [usize] = &[
        1, // 0
        3, // 1
        3, // 2
        3, // 3
        3, // 4
        3, // 5
        3, // 6
        2, // 7
        2, // 8
        3, // 9
        1, // 10
        1, // 11
        3, // 12
        4, // 13
        6, // 14
    ];

    /// Binding strength of operator productions; higher binds tighter.
    pub fn precedence(self) -> Option<(u8, Assoc)> {
        match self {
            ProdID::Add | ProdID::Sub | ProdID::Plus | ProdID::Minus => Some((1, Assoc::Left)),
            ProdID::Mul | ProdID::Div | ProdID::Mod => Some((2, Assoc::Left)),
            ProdID::Pow => Some((3, Assoc::Right)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StateID {
    Start = 0,
    AfterExpr = 1,
    AddAfterOp = 2,
    SubAfterOp = 3,
    MulAfterOp = 4,
    DivAfterOp = 5,
    ModAfterOp = 6,
    PowAfterOp = 7,
    AfterAdd = 8,
    AfterSub = 9,
    AfterMul = 10,
    AfterDiv = 11,
    AfterMod = 12,
    AfterPow = 13,
    PlusAfterOp = 14,
    MinusAfterOp = 15,
    AfterPlus = 16,
    AfterMinus = 17,
    AfterBracket = 18,
    BracketAfterExpr = 19,
    AfterBracketExpr = 20,
    AfterIdent = 21,
    AfterReal = 22,
    FunccallAfterIdent = 23,
    AfterFunccall0Args = 24,
    FunccallAfterArg = 25,
    AfterFunccall1Arg = 26,
    FunccallAfterComma = 27,
    FunccallAfterArg2 = 28,
    AfterFunccall2Args = 29,
}

impl ParserStateID for StateID {
    const COUNT: usize = 30;

    fn label(&self) -> &'static str {
        StateID::LABELS[usize::from(*self)]
    }
}

impl From<StateID> for usize {
    fn from(s: StateID) -> Self {
        s as usize
    }
}

impl StateID {
    pub const LABELS: &'static [&'static str] = &[
        "start",                // 0: Start -> . Expr
        "after_expr",           // 1: Start -> Expr .
        "add_after_op",         // 2: Expr -> Expr + . Expr
        "sub_after_op",         // 3: Expr -> Expr - . Expr
        "mul_after_op",         // 4: Expr -> Expr * . Expr
        "div_after_op",         // 5: Expr -> Expr / . Expr
        "mod_after_op",         // 6: Expr -> Expr % . Expr
        "pow_after_op",         // 7: Expr -> Expr ^ . Expr
        "after_add",            // 8: Expr -> Expr + Expr .
        "after_sub",            // 9: Expr -> Expr - Expr .
        "after_mul",            // 10: Expr -> Expr * Expr .
        "after_div",            // 11: Expr -> Expr / Expr .
        "after_mod",            // 12: Expr -> Expr % Expr .
        "after_pow",            // 13: Expr -> Expr ^ Expr .
        "plus_after_op",        // 14: Expr -> + . Expr
        "minus_after_op",       // 15: Expr -> - . Expr
        "after_plus",           // 16: Expr -> + Expr .
        "after_minus",          // 17: Expr -> - Expr .
        "after_bracket",        // 18: Expr -> ( . Expr )
        "bracket_after_expr",   // 19: Expr -> ( Expr . )
        "after_bracket_expr",   // 20: Expr -> ( Expr ) .
        "after_ident",          // 21: Expr -> ident . | ident . ( ...
        "after_real",           // 22: Expr -> real .
        "funccall_after_ident", // 23: Expr -> ident ( . ...
        "after_funccall_0args", // 24: Expr -> ident ( ) .
        "funccall_after_arg",   // 25: Expr -> ident ( Expr . ...
        "after_funccall_1arg",  // 26: Expr -> ident ( Expr ) .
        "funccall_after_comma", // 27: Expr -> ident ( Expr , . Expr )
        "funccall_after_arg2",  // 28: Expr -> ident ( Expr , Expr . )
        "after_funccall_2args", // 29: Expr -> ident ( Expr , Expr ) .
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmbigID(u8);

impl ParserAmbigID for AmbigID {
    const COUNT: usize = 48;
}

impl From<AmbigID> for usize {
    fn from(a: AmbigID) -> Self {
        a.0 as usize
    }
}

pub type Action = ParserAction<StateID, ProdID, AmbigID>;

const COLUMNS: usize = TokenID::COUNT - 1;

struct ParTable {
    actions: Vec<[Action; COLUMNS]>,
    ambigs: Vec<[Action; 2]>,
}

static TABLE: Lazy<ParTable> = Lazy::new(ParTable::build);

impl ParTable {
    fn build() -> Self {
        use StateID as S;

        let mut tab = Self {
            actions: vec![[Action::Error; COLUMNS]; StateID::COUNT],
            ambigs: Vec::with_capacity(AmbigID::COUNT),
        };

        tab.operand(S::Start, S::AfterExpr);
        tab.operators(S::AfterExpr);
        tab.set(S::AfterExpr, TokenID::End, Action::Accept);

        for (op_state, result_state, prod_id) in [
            (S::AddAfterOp, S::AfterAdd, ProdID::Add),
            (S::SubAfterOp, S::AfterSub, ProdID::Sub),
            (S::MulAfterOp, S::AfterMul, ProdID::Mul),
            (S::DivAfterOp, S::AfterDiv, ProdID::Div),
            (S::ModAfterOp, S::AfterMod, ProdID::Mod),
            (S::PowAfterOp, S::AfterPow, ProdID::Pow),
        ] {
            tab.operand(op_state, result_state);
            tab.conflicts(result_state, prod_id);
        }

        for (sign_state, result_state, prod_id) in [
            (S::PlusAfterOp, S::AfterPlus, ProdID::Plus),
            (S::MinusAfterOp, S::AfterMinus, ProdID::Minus),
        ] {
            tab.operand(sign_state, result_state);
            tab.conflicts(result_state, prod_id);
        }

        tab.operand(S::AfterBracket, S::BracketAfterExpr);
        tab.operators(S::BracketAfterExpr);
        tab.set(
            S::BracketAfterExpr,
            TokenID::RightParen,
            Action::Shift(S::AfterBracketExpr),
        );
        tab.reduce_on_follow(S::AfterBracketExpr, ProdID::Paren);

        tab.set(
            S::AfterIdent,
            TokenID::LeftParen,
            Action::Shift(S::FunccallAfterIdent),
        );
        tab.reduce_on_follow(S::AfterIdent, ProdID::Var);
        tab.reduce_on_follow(S::AfterReal, ProdID::Real);

        tab.operand(S::FunccallAfterIdent, S::FunccallAfterArg);
        tab.set(
            S::FunccallAfterIdent,
            TokenID::RightParen,
            Action::Shift(S::AfterFunccall0Args),
        );
        tab.reduce_on_follow(S::AfterFunccall0Args, ProdID::Call0);

        tab.operators(S::FunccallAfterArg);
        tab.set(
            S::FunccallAfterArg,
            TokenID::Comma,
            Action::Shift(S::FunccallAfterComma),
        );
        tab.set(
            S::FunccallAfterArg,
            TokenID::RightParen,
            Action::Shift(S::AfterFunccall1Arg),
        );
        tab.reduce_on_follow(S::AfterFunccall1Arg, ProdID::Call1);

        tab.operand(S::FunccallAfterComma, S::FunccallAfterArg2);
        tab.operators(S::FunccallAfterArg2);
        tab.set(
            S::FunccallAfterArg2,
            TokenID::RightParen,
            Action::Shift(S::AfterFunccall2Args),
        );
        tab.reduce_on_follow(S::AfterFunccall2Args, ProdID::Call2);

        debug_assert_eq!(tab.ambigs.len(), AmbigID::COUNT);
        tab
    }

    fn set(&mut self, state: StateID, token_id: TokenID, action: Action) {
        self.actions[usize::from(state)][usize::from(token_id)] = action;
    }

    /// Entries for a state that expects the start of an operand.
    fn operand(&mut self, state: StateID, goto: StateID) {
        self.set(state, TokenID::Plus, Action::Shift(StateID::PlusAfterOp));
        self.set(state, TokenID::Minus, Action::Shift(StateID::MinusAfterOp));
        self.set(state, TokenID::LeftParen, Action::Shift(StateID::AfterBracket));
        self.set(state, TokenID::Real, Action::Shift(StateID::AfterReal));
        self.set(state, TokenID::Ident, Action::Shift(StateID::AfterIdent));
        self.set(state, TokenID::Expr, Action::Goto(goto));
    }

    /// Shifts every binary operator after a complete left operand.
    fn operators(&mut self, state: StateID) {
        for op in TokenID::OPERATORS {
            self.set(state, op, Action::Shift(operator_state(op)));
        }
    }

    /// A completed operator production: operators conflict with the
    /// reduction, the closing terminals reduce.
    fn conflicts(&mut self, state: StateID, prod_id: ProdID) {
        for op in TokenID::OPERATORS {
            let ambig = AmbigID(self.ambigs.len() as u8);
            self.ambigs
                .push([Action::Shift(operator_state(op)), Action::Reduce(prod_id)]);
            self.set(state, op, Action::Ambig(ambig));
        }
        for token_id in [TokenID::RightParen, TokenID::Comma, TokenID::End] {
            self.set(state, token_id, Action::Reduce(prod_id));
        }
    }

    fn reduce_on_follow(&mut self, state: StateID, prod_id: ProdID) {
        for op in TokenID::OPERATORS {
            self.set(state, op, Action::Reduce(prod_id));
        }
        for token_id in [TokenID::RightParen, TokenID::Comma, TokenID::End] {
            self.set(state, token_id, Action::Reduce(prod_id));
        }
    }
}

fn operator_state(op: TokenID) -> StateID {
    match op {
        TokenID::Plus => StateID::AddAfterOp,
        TokenID::Minus => StateID::SubAfterOp,
        TokenID::Asterisk => StateID::MulAfterOp,
        TokenID::Slash => StateID::DivAfterOp,
        TokenID::Percent => StateID::ModAfterOp,
        _ => StateID::PowAfterOp,
    }
}

pub struct ParData;

impl ParserData for ParData {
    type StateID = StateID;
    type AmbigID = AmbigID;
    type TokenID = TokenID;
    type ProdID = ProdID;

    #[inline]
    fn start_state() -> StateID {
        StateID::Start
    }

    #[inline]
    fn lookup(state_id: StateID, token_id: TokenID) -> Action {
        match token_id {
            TokenID::Error => Action::Error,
            _ => TABLE.actions[usize::from(state_id)][usize::from(token_id)],
        }
    }

    #[inline]
    fn lookup_ambig(ambig_id: AmbigID) -> [Action; 2] {
        TABLE.ambigs[usize::from(ambig_id)]
    }
}
