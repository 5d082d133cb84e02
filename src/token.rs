// Licensed under MIT. See LICENSE for details.

use std::fmt;

// Lexical categories.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TokenKind {
    In,
    Use,
    From,
    Dollar,
    DoubleColon,
    Equals,
    Plus,
    LeftBrace,
    RightBrace,
    LeftParen,
    RightParen,
    Comma,
    Identifier,
}

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Token {
    // Keywords.
    In,
    Use,
    From,
    // Symbols.
    Dollar,
    DoubleColon,
    Equals,
    Plus,
    LeftBrace,
    RightBrace,
    LeftParen,
    RightParen,
    Comma,
    Identifier(String),
}

impl Token {
    pub fn kind(&self) -> TokenKind {
        match *self {
            Token::In => TokenKind::In,
            Token::Use => TokenKind::Use,
            Token::From => TokenKind::From,
            Token::Dollar => TokenKind::Dollar,
            Token::DoubleColon => TokenKind::DoubleColon,
            Token::Equals => TokenKind::Equals,
            Token::Plus => TokenKind::Plus,
            Token::LeftBrace => TokenKind::LeftBrace,
            Token::RightBrace => TokenKind::RightBrace,
            Token::LeftParen => TokenKind::LeftParen,
            Token::RightParen => TokenKind::RightParen,
            Token::Comma => TokenKind::Comma,
            Token::Identifier(_) => TokenKind::Identifier,
        }
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind() == kind
    }

    /// The name carried by an identifier, `None` for every other kind.
    pub fn as_identifier(&self) -> Option<&str> {
        match *self {
            Token::Identifier(ref id) => Some(id),
            _ => None,
        }
    }
}

impl TokenKind {
    /// Fixed spelling of keywords and symbols.
    pub fn spelling(self) -> Option<&'static str> {
        let s = match self {
            TokenKind::In => "in",
            TokenKind::Use => "use",
            TokenKind::From => "from",
            TokenKind::Dollar => "$",
            TokenKind::DoubleColon => "::",
            TokenKind::Equals => "=",
            TokenKind::Plus => "+",
            TokenKind::LeftBrace => "{",
            TokenKind::RightBrace => "}",
            TokenKind::LeftParen => "(",
            TokenKind::RightParen => ")",
            TokenKind::Comma => ",",
            TokenKind::Identifier => return None,
        };
        Some(s)
    }

    pub fn is_keyword(self) -> bool {
        matches!(self, TokenKind::In | TokenKind::Use | TokenKind::From)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.spelling() {
            Some(s) => write!(f, "'{}'", s),
            None => f.write_str("identifier"),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Token::Identifier(ref id) = *self {
            return write!(f, "<identifier: '{}'>", id);
        }

        let kind = self.kind();
        match kind.spelling() {
            Some(s) if kind.is_keyword() => write!(f, "<kwd: '{}'>", s),
            Some(s) => write!(f, "<sym: '{}'>", s),
            None => f.write_str("?"),
        }
    }
}
