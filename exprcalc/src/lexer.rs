//! # Expression Lexer
//!
//! [`CalcLexer`] turns one line of text into [`CalcToken`]s. Three token
//! classes compete at every position:
//!
//! | class        | pattern                    | token              |
//! |--------------|----------------------------|--------------------|
//! | real literal | `[0-9]+(\.[0-9]*)?`        | [`TokenID::Real`]  |
//! | identifier   | `[A-Za-z][A-Za-z0-9]*`     | [`TokenID::Ident`] |
//! | single char  | `+ - * / % ^ ( ) , =`      | operator tokens    |
//!
//! The longest match wins; equally long matches go to the class listed first.
//! Spaces and tabs separate tokens. A newline or the end of the text yields
//! [`TokenID::End`], and every later call yields `End` again. A character
//! that starts no token becomes a single [`TokenID::Error`] token, which no
//! parser state accepts.
//!
//! Spans are single-line: line 0, columns counted in characters.
use crate::{CalcToken, TokenID, TokenValue};
use once_cell::sync::Lazy;
use parsekit::{Lexer, LexerStats, Position, Span};
use regex::Regex;

static REAL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\A[0-9]+(\.[0-9]*)?").unwrap());
static IDENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\A[A-Za-z][A-Za-z0-9]*").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Class {
    Real,
    Ident,
    Char(TokenID),
}

#[derive(Debug, Clone)]
pub struct CalcLexer {
    input: String,
    pos: usize,
    column: usize,
    done: bool,
    stats: LexerStats,
}

impl CalcLexer {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.to_owned(),
            pos: 0,
            column: 0,
            done: false,
            stats: LexerStats::default(),
        }
    }

    /// Byte offset of the first unread character.
    pub fn offset(&self) -> usize {
        self.pos
    }

    fn skip_blanks(&mut self) {
        let rest = &self.input[self.pos..];
        let n = rest.len() - rest.trim_start_matches([' ', '\t']).len();
        self.advance(n, n);
    }

    fn advance(&mut self, bytes: usize, chars: usize) -> Span {
        let start = Position::new(0, self.column);
        self.pos += bytes;
        self.column += chars;
        self.stats.chars += chars;
        Span::new(start, Position::new(0, self.column))
    }

    /// Longest candidate at the cursor, earlier classes winning ties.
    fn longest_match(rest: &str) -> Option<(Class, usize)> {
        let single = rest
            .chars()
            .next()
            .and_then(TokenID::from_char)
            .map(|t| (Class::Char(t), 1));
        let candidates = [
            REAL_RE.find(rest).map(|m| (Class::Real, m.end())),
            IDENT_RE.find(rest).map(|m| (Class::Ident, m.end())),
            single,
        ];
        candidates
            .into_iter()
            .flatten()
            .fold(None, |best, (class, len)| match best {
                Some((_, best_len)) if best_len >= len => best,
                _ => Some((class, len)),
            })
    }

    fn end_token(&self) -> CalcToken {
        let here = Position::new(0, self.column);
        CalcToken {
            token_id: TokenID::End,
            value: TokenValue::None,
            span: Some(Span::new(here, here)),
        }
    }

    fn invalid_token(&mut self, c: char) -> CalcToken {
        let span = self.advance(c.len_utf8(), 1);
        self.stats.invalid += 1;
        log::warn!("invalid input {:?} at column {}", c, span.start.column);
        CalcToken {
            token_id: TokenID::Error,
            value: TokenValue::Invalid(c.to_string().into()),
            span: Some(span),
        }
    }

    fn scan(&mut self) -> CalcToken {
        if self.done {
            return self.end_token();
        }
        self.skip_blanks();

        let rest = &self.input[self.pos..];
        let c = match rest.chars().next() {
            None => {
                self.done = true;
                return self.end_token();
            }
            Some('\n') => {
                self.done = true;
                let token = self.end_token();
                self.advance(1, 1);
                return token;
            }
            Some(c) => c,
        };

        let Some((class, len)) = Self::longest_match(rest) else {
            return self.invalid_token(c);
        };
        let lexeme = &rest[..len];
        let (token_id, value) = match class {
            Class::Real => match lexeme.parse::<f64>() {
                Ok(n) => (TokenID::Real, TokenValue::Number(n)),
                Err(_) => return self.invalid_token(c),
            },
            Class::Ident => (TokenID::Ident, TokenValue::Ident(lexeme.into())),
            Class::Char(token_id) => (token_id, TokenValue::None),
        };
        // every class matches ASCII only
        let span = self.advance(len, len);
        CalcToken {
            token_id,
            value,
            span: Some(span),
        }
    }
}

impl Lexer for CalcLexer {
    type Token = CalcToken;

    fn next_token(&mut self) -> CalcToken {
        let token = self.scan();
        self.stats.tokens += 1;
        log::trace!("token {} at {:?}", token, token.span);
        token
    }

    fn stats(&self) -> LexerStats {
        self.stats.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parsekit::{Token, span};

    fn lex(input: &str) -> Vec<CalcToken> {
        let mut lexer = CalcLexer::new(input);
        let mut out = Vec::new();
        loop {
            let t = lexer.next_token();
            let end = t.token_id == TokenID::End;
            out.push(t);
            if end {
                return out;
            }
        }
    }

    fn ids(input: &str) -> Vec<TokenID> {
        lex(input).iter().map(|t| t.token_id()).collect()
    }

    #[test]
    fn operators_and_literals() {
        use TokenID::*;
        assert_eq!(
            ids("2+3*4"),
            vec![Real, Plus, Real, Asterisk, Real, End]
        );
        assert_eq!(
            ids("a-b/c%d^e,(=)"),
            vec![
                Ident, Minus, Ident, Slash, Ident, Percent, Ident, Caret, Ident, Comma,
                LeftParen, Equals, RightParen, End
            ]
        );
    }

    #[test]
    fn real_literal_forms() {
        let toks = lex("3. 4.25 007");
        assert_eq!(toks[0].value, TokenValue::Number(3.0));
        assert_eq!(toks[1].value, TokenValue::Number(4.25));
        assert_eq!(toks[2].value, TokenValue::Number(7.0));
        // no leading-dot form
        assert_eq!(ids(".5"), vec![TokenID::Error, TokenID::Real, TokenID::End]);
    }

    #[test]
    fn identifiers_take_trailing_digits() {
        let toks = lex("atan2(x1,2y)");
        assert_eq!(toks[0].value, TokenValue::Ident("atan2".into()));
        assert_eq!(toks[2].value, TokenValue::Ident("x1".into()));
        // a literal stops at the first letter
        assert_eq!(toks[4].value, TokenValue::Number(2.0));
        assert_eq!(toks[5].value, TokenValue::Ident("y".into()));
    }

    #[test]
    fn blanks_are_skipped_and_spans_are_columns() {
        let toks = lex(" 12 +\tpi ");
        assert_eq!(toks[0].span, span!(0, 1, 0, 3));
        assert_eq!(toks[1].span, span!(0, 4, 0, 5));
        assert_eq!(toks[2].span, span!(0, 6, 0, 8));
        assert_eq!(toks[3].span, span!(0, 9, 0, 9));
    }

    #[test]
    fn newline_ends_input() {
        assert_eq!(ids("1\n+2"), vec![TokenID::Real, TokenID::End]);
    }

    #[test]
    fn end_repeats() {
        let mut lexer = CalcLexer::new("x");
        lexer.next_token();
        assert_eq!(lexer.next_token().token_id, TokenID::End);
        assert_eq!(lexer.next_token().token_id, TokenID::End);
        assert_eq!(lexer.stats().tokens, 3);
    }

    #[test]
    fn invalid_character_is_one_token() {
        let toks = lex("1 $ 2");
        assert_eq!(toks[1].token_id, TokenID::Error);
        assert_eq!(toks[1].value, TokenValue::Invalid("$".into()));
        assert_eq!(toks[1].span, span!(0, 2, 0, 3));
        assert_eq!(toks[2].value, TokenValue::Number(2.0));
    }

    #[test]
    fn non_ascii_advances_by_one_character() {
        let mut lexer = CalcLexer::new("é1");
        assert_eq!(lexer.next_token().span, span!(0, 0, 0, 1));
        let one = lexer.next_token();
        assert_eq!(one.value, TokenValue::Number(1.0));
        assert_eq!(one.span, span!(0, 1, 0, 2));
        assert_eq!(lexer.stats().invalid, 1);
    }

    #[test]
    fn offset_tracks_bytes_consumed() {
        let mut lexer = CalcLexer::new("x = 1+2");
        lexer.next_token();
        lexer.next_token();
        assert_eq!(lexer.offset(), 3);
        assert_eq!(&"x = 1+2"[lexer.offset()..], " 1+2");
    }

    #[test]
    fn stats_count_characters() {
        let mut lexer = CalcLexer::new("1 + 2");
        while lexer.next_token().token_id != TokenID::End {}
        let stats = lexer.stats();
        assert_eq!(stats.chars, 5);
        assert_eq!(stats.tokens, 4);
        assert_eq!(stats.invalid, 0);
    }
}
