// Licensed under MIT. See LICENSE for details.

pub mod combinators;
pub mod lexer;
pub mod parser;
pub mod token;
pub mod types;

use thiserror::Error;

pub use combinators::{PResult, ParseError, Parser};
pub use lexer::{tokenize, LexError, Lexer};
pub use parser::{instruction as parse_instruction, Instructions};
pub use token::{Token, TokenKind};

use crate::types::Instruction;

#[derive(Debug, Error, PartialEq)]
pub enum Error {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("no instruction starts at token {at}, found {found}")]
    Incomplete { at: usize, found: String },
}

/// Lex and parse a whole program. Fails unless every token belongs to an
/// instruction.
pub fn parse(source: &str) -> Result<Vec<Instruction>, Error> {
    let tokens = tokenize(source)?;
    let mut insts = Instructions::new(&tokens);
    let parsed = insts.by_ref().collect::<Result<Vec<_>, _>>()?;

    if let Some(token) = insts.next_token() {
        return Err(Error::Incomplete {
            at: insts.position(),
            found: token.to_string(),
        });
    }

    Ok(parsed)
}
