// Licensed under MIT. See LICENSE for details.

//! Backtracking parser combinators over a token slice and a cursor.
//!
//! Every parser returns `Ok(Some(_))` on success, `Ok(None)` when the input
//! does not match, and `Err(_)` for a hard error raised by [`expect`]. Unless
//! a parser succeeds it leaves the cursor where it found it.

use std::fmt;
use std::marker::PhantomData;

use thiserror::Error;

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ParseError {
    #[error("expected {expected} at token {at}, found {found}")]
    Expected {
        expected: &'static str,
        found: String,
        at: usize,
    },
}

pub type PResult<O> = Result<Option<O>, ParseError>;

pub trait Parser<T, O> {
    fn parse(&self, tokens: &[T], cursor: &mut usize) -> PResult<O>;
}

// Plain functions are parsers, which is how grammar productions refer to
// each other (and to themselves) before they are fully defined.
impl<T, O, F> Parser<T, O> for F
where
    F: Fn(&[T], &mut usize) -> PResult<O>,
{
    fn parse(&self, tokens: &[T], cursor: &mut usize) -> PResult<O> {
        self(tokens, cursor)
    }
}

// Run `f`, putting the cursor back unless it produced a value.
fn rewind_unless<O, F>(cursor: &mut usize, f: F) -> PResult<O>
where
    F: FnOnce(&mut usize) -> PResult<O>,
{
    let start = *cursor;
    let res = f(cursor);
    if !matches!(res, Ok(Some(_))) {
        *cursor = start;
    }
    res
}

/// Match exactly one token. `extract` decides whether the token has the
/// wanted kind and pulls out its payload.
#[derive(Clone, Copy, Debug)]
pub struct Singlet<F> {
    extract: F,
}

pub fn singlet<F>(extract: F) -> Singlet<F> {
    Singlet { extract }
}

impl<T, O, F> Parser<T, O> for Singlet<F>
where
    F: Fn(&T) -> Option<O>,
{
    fn parse(&self, tokens: &[T], cursor: &mut usize) -> PResult<O> {
        let out = tokens.get(*cursor).and_then(|t| (self.extract)(t));
        if out.is_some() {
            *cursor += 1;
        }
        Ok(out)
    }
}

/// Sequence. Takes a tuple of parsers and yields the tuple of their results.
#[derive(Clone, Copy, Debug)]
pub struct Chain<P>(P);

pub fn chain<P>(parsers: P) -> Chain<P> {
    Chain(parsers)
}

macro_rules! chain_impl {
    ($($P:ident $O:ident $idx:tt),+) => {
        impl<T, $($P, $O),+> Parser<T, ($($O,)+)> for Chain<($($P,)+)>
        where
            $($P: Parser<T, $O>),+
        {
            fn parse(&self, tokens: &[T], cursor: &mut usize) -> PResult<($($O,)+)> {
                rewind_unless(cursor, |cursor| {
                    Ok(Some(($(
                        match self.0.$idx.parse(tokens, cursor)? {
                            Some(v) => v,
                            None => return Ok(None),
                        },
                    )+)))
                })
            }
        }
    };
}

chain_impl!(P0 O0 0, P1 O1 1);
chain_impl!(P0 O0 0, P1 O1 1, P2 O2 2);
chain_impl!(P0 O0 0, P1 O1 1, P2 O2 2, P3 O3 3);
chain_impl!(P0 O0 0, P1 O1 1, P2 O2 2, P3 O3 3, P4 O4 4);
chain_impl!(P0 O0 0, P1 O1 1, P2 O2 2, P3 O3 3, P4 O4 4, P5 O5 5);

/// Ordered alternation. All alternatives start from the same cursor and the
/// first one that succeeds wins, even if a later one would match more.
#[derive(Clone, Copy, Debug)]
pub struct Options<P>(P);

pub fn options<P>(parsers: P) -> Options<P> {
    Options(parsers)
}

macro_rules! options_impl {
    ($($P:ident $idx:tt),+) => {
        impl<T, O, $($P),+> Parser<T, O> for Options<($($P,)+)>
        where
            $($P: Parser<T, O>),+
        {
            fn parse(&self, tokens: &[T], cursor: &mut usize) -> PResult<O> {
                rewind_unless(cursor, |cursor| {
                    $(
                        if let Some(v) = self.0.$idx.parse(tokens, cursor)? {
                            return Ok(Some(v));
                        }
                    )+
                    Ok(None)
                })
            }
        }
    };
}

options_impl!(P0 0, P1 1);
options_impl!(P0 0, P1 1, P2 2);
options_impl!(P0 0, P1 1, P2 2, P3 3);
options_impl!(P0 0, P1 1, P2 2, P3 3, P4 4);
options_impl!(P0 0, P1 1, P2 2, P3 3, P4 4, P5 5);

/// Succeeds without consuming anything.
#[derive(Clone, Copy, Debug)]
pub struct Always;

impl<T> Parser<T, ()> for Always {
    fn parse(&self, _: &[T], _: &mut usize) -> PResult<()> {
        Ok(Some(()))
    }
}

/// Zero or one `parser`. A mismatch succeeds with `None` without consuming.
#[derive(Clone, Copy, Debug)]
pub struct Optional<P>(P);

pub fn optional<P>(parser: P) -> Optional<P> {
    Optional(parser)
}

impl<T, O, P> Parser<T, Option<O>> for Optional<P>
where
    P: Parser<T, O>,
{
    fn parse(&self, tokens: &[T], cursor: &mut usize) -> PResult<Option<O>> {
        Ok(Some(self.0.parse(tokens, cursor)?))
    }
}

/// Loop over `parser`, each repetition followed by `delimiter`.
#[derive(Clone, Copy, Debug)]
pub struct Repeat<P, D, DO> {
    parser: P,
    delimiter: D,
    empty_ok: bool,
    _delimited: PhantomData<fn() -> DO>,
}

/// Apply `parser` as long as it matches.
pub fn repeated<P>(parser: P, empty_ok: bool) -> Repeat<P, Always, ()> {
    separated(parser, Always, empty_ok)
}

/// Apply `parser`, continuing only while `delimiter` matches after each
/// repetition. A trailing delimiter is consumed and ends the loop quietly.
pub fn separated<P, D, DO>(parser: P, delimiter: D, empty_ok: bool) -> Repeat<P, D, DO> {
    Repeat {
        parser,
        delimiter,
        empty_ok,
        _delimited: PhantomData,
    }
}

impl<T, O, DO, P, D> Parser<T, Vec<O>> for Repeat<P, D, DO>
where
    P: Parser<T, O>,
    D: Parser<T, DO>,
{
    fn parse(&self, tokens: &[T], cursor: &mut usize) -> PResult<Vec<O>> {
        rewind_unless(cursor, |cursor| {
            let mut out = vec![];
            loop {
                let before = *cursor;
                match self.parser.parse(tokens, cursor)? {
                    Some(v) => out.push(v),
                    None => break,
                }

                // A repetition that consumed nothing would spin forever.
                if self.delimiter.parse(tokens, cursor)?.is_none() || *cursor == before {
                    break;
                }
            }

            if out.is_empty() && !self.empty_ok {
                return Ok(None);
            }
            Ok(Some(out))
        })
    }
}

/// Build `O` from the result of `parser`. Picking fields out of a chain is
/// done by destructuring the tuple in `build`.
#[derive(Clone, Copy)]
pub struct Convert<P, F, I> {
    parser: P,
    build: F,
    _input: PhantomData<fn() -> I>,
}

pub fn convert<T, P, F, I, O>(parser: P, build: F) -> Convert<P, F, I>
where
    P: Parser<T, I>,
    F: Fn(I) -> O,
{
    Convert {
        parser,
        build,
        _input: PhantomData,
    }
}

impl<T, I, O, P, F> Parser<T, O> for Convert<P, F, I>
where
    P: Parser<T, I>,
    F: Fn(I) -> O,
{
    fn parse(&self, tokens: &[T], cursor: &mut usize) -> PResult<O> {
        Ok(self.parser.parse(tokens, cursor)?.map(&self.build))
    }
}

/// Commit point: a mismatch of `parser` becomes a hard error.
#[derive(Clone, Copy, Debug)]
pub struct Expect<P> {
    parser: P,
    what: &'static str,
}

pub fn expect<P>(parser: P, what: &'static str) -> Expect<P> {
    Expect { parser, what }
}

impl<T, O, P> Parser<T, O> for Expect<P>
where
    T: fmt::Display,
    P: Parser<T, O>,
{
    fn parse(&self, tokens: &[T], cursor: &mut usize) -> PResult<O> {
        match self.parser.parse(tokens, cursor)? {
            Some(v) => Ok(Some(v)),
            None => Err(ParseError::Expected {
                expected: self.what,
                found: tokens
                    .get(*cursor)
                    .map_or_else(|| String::from("end of input"), |t| t.to_string()),
                at: *cursor,
            }),
        }
    }
}
