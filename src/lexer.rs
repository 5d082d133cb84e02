// Licensed under MIT. See LICENSE for details.

use std::fmt;

use nom::bytes::complete::tag;
use nom::character::complete::{alpha1, multispace1, satisfy};
use nom::combinator::not;
use nom::sequence::terminated;
use nom::IResult;
use once_cell::sync::Lazy;
use thiserror::Error;

use crate::token::{Token, TokenKind};

/// Anything a lexer group can emit: each value belongs to exactly one kind.
pub trait Classify {
    type Kind: Copy + Eq + fmt::Debug;

    fn kind(&self) -> Self::Kind;
}

impl Classify for Token {
    type Kind = TokenKind;

    fn kind(&self) -> TokenKind {
        Token::kind(self)
    }
}

// What a single recognizer step yields.
#[derive(Clone, Debug, PartialEq)]
pub enum Lexeme<T> {
    Emit(T),
    // Consumed input that never reaches the output (whitespace).
    Skip,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Produces<K> {
    Kind(K),
    Skip,
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum LexError {
    #[error("lexer group has more than one recognizer producing {produces}")]
    DuplicateRecognizer { produces: String },
    #[error("unrecognized input {found:?} at {line}:{column} (offset {offset})")]
    Unrecognized {
        offset: usize,
        line: usize,
        column: usize,
        found: char,
    },
}

type Scan<T> = Box<dyn Fn(&str, &mut usize) -> Option<Lexeme<T>> + Send + Sync>;

/// One entry of a lexer group. The scan function either advances `pos` and
/// returns a lexeme, or leaves `pos` alone and returns `None`. A lexeme that
/// does not match the declared `produces` counts as no match.
pub struct Recognizer<T: Classify> {
    produces: Produces<T::Kind>,
    scan: Scan<T>,
}

impl<T: Classify> Recognizer<T> {
    pub fn new<F>(produces: Produces<T::Kind>, scan: F) -> Self
    where
        F: Fn(&str, &mut usize) -> Option<Lexeme<T>> + Send + Sync + 'static,
    {
        Self {
            produces,
            scan: Box::new(scan),
        }
    }

    pub fn produces(&self) -> Produces<T::Kind> {
        self.produces
    }

    fn scan(&self, text: &str, pos: &mut usize) -> Option<Lexeme<T>> {
        let start = *pos;
        let lexeme = (self.scan)(text, pos);
        let declared = match lexeme {
            Some(Lexeme::Emit(ref t)) => self.produces == Produces::Kind(t.kind()),
            Some(Lexeme::Skip) => self.produces == Produces::Skip,
            None => false,
        };
        if !declared {
            *pos = start;
            return None;
        }
        lexeme
    }
}

impl<T: Classify> fmt::Debug for Recognizer<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Recognizer")
            .field("produces", &self.produces)
            .finish()
    }
}

/// An ordered list of recognizers. At every position the first recognizer
/// that matches wins, so the order of the list is its priority.
#[derive(Debug)]
pub struct Lexer<T: Classify> {
    recognizers: Vec<Recognizer<T>>,
}

impl<T: Classify> Lexer<T> {
    pub fn new(recognizers: Vec<Recognizer<T>>) -> Result<Self, LexError> {
        for (i, r) in recognizers.iter().enumerate() {
            if recognizers[..i].iter().any(|o| o.produces() == r.produces()) {
                return Err(LexError::DuplicateRecognizer {
                    produces: format!("{:?}", r.produces()),
                });
            }
        }

        Ok(Self { recognizers })
    }

    // Try every recognizer in declaration order at `pos`.
    fn step(&self, text: &str, pos: &mut usize) -> Option<Lexeme<T>> {
        self.recognizers.iter().find_map(|r| r.scan(text, pos))
    }

    /// Lex everything from `pos` to the end of `text`. On failure `pos` is
    /// restored and nothing is returned.
    pub fn lex(&self, text: &str, pos: &mut usize) -> Result<Vec<T>, LexError> {
        let start = *pos;
        if !text.is_char_boundary(start) {
            return Err(unrecognized(text, start));
        }
        let mut out = vec![];

        while *pos < text.len() {
            let before = *pos;
            match self.step(text, pos) {
                Some(_) if *pos == before => break,
                Some(Lexeme::Emit(t)) => out.push(t),
                Some(Lexeme::Skip) => {}
                None => break,
            }
        }

        if *pos == text.len() {
            return Ok(out);
        }

        let err = unrecognized(text, *pos);
        *pos = start;
        Err(err)
    }
}

// `offset` may lie past the end or inside a character; line and column then
// refer to the last boundary before it and `found` is NUL.
fn unrecognized(text: &str, offset: usize) -> LexError {
    let boundary = (0..=offset.min(text.len()))
        .rev()
        .find(|&i| text.is_char_boundary(i))
        .unwrap_or(0);
    let consumed = &text[..boundary];
    let line = consumed.matches('\n').count() + 1;
    let column = consumed.rsplit('\n').next().map_or(0, |l| l.chars().count()) + 1;
    LexError::Unrecognized {
        offset,
        line,
        column,
        found: text
            .get(offset..)
            .and_then(|rest| rest.chars().next())
            .unwrap_or('\0'),
    }
}

// Run a nom parser at `pos`, moving `pos` past the recognized span.
fn advance<'a, P>(text: &'a str, pos: &mut usize, mut parser: P) -> Option<&'a str>
where
    P: FnMut(&'a str) -> IResult<&'a str, &'a str>,
{
    let input = text.get(*pos..)?;
    let (rest, span) = parser(input).ok()?;
    *pos = text.len() - rest.len();
    Some(span)
}

/// Whitespace, consumed and dropped.
pub fn whitespace() -> Recognizer<Token> {
    Recognizer::new(Produces::Skip, |text, pos| {
        advance(text, pos, multispace1).map(|_| Lexeme::Skip)
    })
}

/// A fixed symbol such as `::` or `{`.
pub fn symbol(token: Token) -> Recognizer<Token> {
    let kind = token.kind();
    let spelling = kind.spelling().unwrap_or_default();
    Recognizer::new(Produces::Kind(kind), move |text, pos| {
        advance(text, pos, tag(spelling)).map(|_| Lexeme::Emit(token.clone()))
    })
}

/// A keyword. Matches only a whole alphabetic run, so `index` is left for
/// the identifier recognizer.
pub fn keyword(token: Token) -> Recognizer<Token> {
    let kind = token.kind();
    let spelling = kind.spelling().unwrap_or_default();
    Recognizer::new(Produces::Kind(kind), move |text, pos| {
        advance(
            text,
            pos,
            terminated(tag(spelling), not(satisfy(|c: char| c.is_ascii_alphabetic()))),
        )
        .map(|_| Lexeme::Emit(token.clone()))
    })
}

/// Maximal run of alphabetic characters.
pub fn identifier() -> Recognizer<Token> {
    Recognizer::new(Produces::Kind(TokenKind::Identifier), |text, pos| {
        advance(text, pos, alpha1).map(|id| Lexeme::Emit(Token::Identifier(id.to_string())))
    })
}

impl Lexer<Token> {
    /// The standard table: keywords come before identifiers.
    pub fn oxidius() -> Result<Self, LexError> {
        Self::new(vec![
            whitespace(),
            symbol(Token::LeftBrace),
            symbol(Token::RightBrace),
            symbol(Token::LeftParen),
            symbol(Token::RightParen),
            symbol(Token::Dollar),
            symbol(Token::DoubleColon),
            symbol(Token::Equals),
            symbol(Token::Plus),
            symbol(Token::Comma),
            keyword(Token::In),
            keyword(Token::Use),
            keyword(Token::From),
            identifier(),
        ])
    }
}

static STANDARD: Lazy<Result<Lexer<Token>, LexError>> = Lazy::new(Lexer::oxidius);

/// Lex `text` with the standard table, which is built on first use.
pub fn tokenize(text: &str) -> Result<Vec<Token>, LexError> {
    let lexer = (*STANDARD).as_ref().map_err(|err| err.clone())?;
    let mut pos = 0;
    lexer.lex(text, &mut pos)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn _id(s: &str) -> Token {
        Token::Identifier(String::from(s))
    }

    #[test]
    fn test_symbols() {
        assert_eq!(
            tokenize("{}()$::=+,").unwrap(),
            vec![
                Token::LeftBrace,
                Token::RightBrace,
                Token::LeftParen,
                Token::RightParen,
                Token::Dollar,
                Token::DoubleColon,
                Token::Equals,
                Token::Plus,
                Token::Comma,
            ]
        );
    }

    #[test]
    fn test_import() {
        assert_eq!(
            tokenize("from std use Real").unwrap(),
            vec![Token::From, _id("std"), Token::Use, _id("Real")]
        );
    }

    #[test]
    fn test_whitespace_dropped() {
        assert_eq!(tokenize("").unwrap(), vec![]);
        assert_eq!(tokenize(" \t\r\n ").unwrap(), vec![]);
        assert_eq!(tokenize("\n  a\n\tb  ").unwrap(), vec![_id("a"), _id("b")]);
    }

    #[test]
    fn test_keyword_boundaries() {
        assert_eq!(tokenize("index").unwrap(), vec![_id("index")]);
        assert_eq!(tokenize("user").unwrap(), vec![_id("user")]);
        assert_eq!(tokenize("fromage").unwrap(), vec![_id("fromage")]);
        assert_eq!(tokenize("in{").unwrap(), vec![Token::In, Token::LeftBrace]);
        assert_eq!(
            tokenize("$a in Real").unwrap(),
            vec![Token::Dollar, _id("a"), Token::In, _id("Real")]
        );
    }

    #[test]
    fn test_predicates() {
        assert_eq!(
            tokenize("{ $a in Real, $b in Real }").unwrap(),
            vec![
                Token::LeftBrace,
                Token::Dollar,
                _id("a"),
                Token::In,
                _id("Real"),
                Token::Comma,
                Token::Dollar,
                _id("b"),
                Token::In,
                _id("Real"),
                Token::RightBrace,
            ]
        );
    }

    #[test]
    fn test_unrecognized() {
        assert_eq!(
            tokenize("a : b"),
            Err(LexError::Unrecognized {
                offset: 2,
                line: 1,
                column: 3,
                found: ':',
            })
        );
        assert_eq!(
            tokenize("a\n  b1"),
            Err(LexError::Unrecognized {
                offset: 5,
                line: 2,
                column: 4,
                found: '1',
            })
        );
    }

    #[test]
    fn test_failure_restores_position() {
        let lexer = Lexer::oxidius().unwrap();
        let mut pos = 2;
        assert!(lexer.lex("a b ; c", &mut pos).is_err());
        assert_eq!(pos, 2);

        let mut pos = 2;
        assert_eq!(lexer.lex("a b c", &mut pos).unwrap(), vec![_id("b"), _id("c")]);
        assert_eq!(pos, 5);
    }

    #[test]
    fn test_first_match_wins() {
        // Identifiers ahead of keywords swallow them.
        let lexer = Lexer::new(vec![whitespace(), identifier(), keyword(Token::From)]).unwrap();
        let mut pos = 0;
        assert_eq!(lexer.lex("from", &mut pos).unwrap(), vec![_id("from")]);
    }

    #[test]
    fn test_duplicate_recognizers() {
        let err = Lexer::new(vec![whitespace(), symbol(Token::Plus), symbol(Token::Plus)]);
        assert_eq!(
            err.unwrap_err(),
            LexError::DuplicateRecognizer {
                produces: "Kind(Plus)".to_string(),
            }
        );

        assert!(Lexer::new(vec![whitespace(), whitespace()]).is_err());
    }

    #[test]
    fn test_standard_table_built_once() {
        assert_eq!(tokenize("a").unwrap(), vec![_id("a")]);
        let table = (*STANDARD).as_ref().unwrap() as *const Lexer<Token>;
        assert_eq!(tokenize("b").unwrap(), vec![_id("b")]);
        assert_eq!((*STANDARD).as_ref().unwrap() as *const Lexer<Token>, table);
    }

    #[test]
    fn test_produces() {
        assert_eq!(whitespace().produces(), Produces::Skip);
        assert_eq!(keyword(Token::In).produces(), Produces::Kind(TokenKind::In));
        assert_eq!(identifier().produces(), Produces::Kind(TokenKind::Identifier));
    }

    #[test]
    fn test_undeclared_lexeme_is_no_match() {
        // Declared as '+' but emits '='.
        let liar = Recognizer::new(Produces::Kind(TokenKind::Plus), |text, pos| {
            advance(text, pos, tag("=")).map(|_| Lexeme::Emit(Token::Equals))
        });
        let lexer = Lexer::new(vec![liar, symbol(Token::Equals)]).unwrap();
        let mut pos = 0;
        assert_eq!(lexer.lex("=", &mut pos).unwrap(), vec![Token::Equals]);

        let liar = Recognizer::new(Produces::Kind(TokenKind::Plus), |text, pos| {
            advance(text, pos, tag("=")).map(|_| Lexeme::Emit(Token::Equals))
        });
        let lexer = Lexer::new(vec![liar]).unwrap();
        let mut pos = 0;
        assert!(lexer.lex("=", &mut pos).is_err());
        assert_eq!(pos, 0);
    }

    #[test]
    fn test_non_ascii() {
        assert_eq!(
            tokenize("aé"),
            Err(LexError::Unrecognized {
                offset: 1,
                line: 1,
                column: 2,
                found: 'é',
            })
        );
    }

    #[test]
    fn test_start_off_boundary() {
        let lexer = Lexer::oxidius().unwrap();

        // Inside the two bytes of 'é'.
        let mut pos = 2;
        assert_eq!(
            lexer.lex("aé", &mut pos),
            Err(LexError::Unrecognized {
                offset: 2,
                line: 1,
                column: 2,
                found: '\0',
            })
        );
        assert_eq!(pos, 2);

        let mut pos = 10;
        assert_eq!(
            lexer.lex("a\nb", &mut pos),
            Err(LexError::Unrecognized {
                offset: 10,
                line: 2,
                column: 2,
                found: '\0',
            })
        );
        assert_eq!(pos, 10);

        let mut pos = 3;
        assert_eq!(lexer.lex("a\nb", &mut pos), Ok(vec![]));
    }
}
