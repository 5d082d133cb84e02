// Licensed under MIT. See LICENSE for details.

use crate::combinators::{
    chain, convert, expect, optional, options, separated, singlet, PResult, ParseError, Parser,
};
use crate::token::{Token, TokenKind};
use crate::types::*;

// Every production is a function, so productions can refer to each other
// (pure_factor -> pure_expression -> pure_term -> pure_factor) in any order.
// Alternatives are tried in the order they are listed and the first match
// wins.

fn symbol(kind: TokenKind) -> impl Parser<Token, ()> {
    singlet(move |t: &Token| t.is(kind).then_some(()))
}

fn identifier(tokens: &[Token], cursor: &mut usize) -> PResult<String> {
    singlet(|t: &Token| t.as_identifier().map(String::from)).parse(tokens, cursor)
}

// reference := identifier
pub fn reference(tokens: &[Token], cursor: &mut usize) -> PResult<Reference> {
    convert(identifier, Reference).parse(tokens, cursor)
}

// pure_variable := identifier
pub fn pure_variable(tokens: &[Token], cursor: &mut usize) -> PResult<PureVariable> {
    convert(identifier, PureVariable).parse(tokens, cursor)
}

// pure_factor := '(' pure_expression ')' | pure_variable
pub fn pure_factor(tokens: &[Token], cursor: &mut usize) -> PResult<PureFactor> {
    options((
        convert(
            chain((
                symbol(TokenKind::LeftParen),
                pure_expression,
                symbol(TokenKind::RightParen),
            )),
            |(_, expr, _)| PureFactor::Parenthesized(Box::new(expr)),
        ),
        convert(pure_variable, PureFactor::Variable),
    ))
    .parse(tokens, cursor)
}

// pure_term := pure_factor
pub fn pure_term(tokens: &[Token], cursor: &mut usize) -> PResult<PureTerm> {
    convert(pure_factor, PureTerm).parse(tokens, cursor)
}

// pure_expression := pure_term '+' pure_term | pure_term
//
// The left term is shared by both alternatives and parsed once; re-parsing it
// on fallback doubles the work at every level of parenthesis nesting.
pub fn pure_expression(tokens: &[Token], cursor: &mut usize) -> PResult<PureExpression> {
    convert(
        chain((
            pure_term,
            optional(chain((symbol(TokenKind::Plus), pure_term))),
        )),
        |(lhs, rest)| match rest {
            Some((_, rhs)) => PureExpression::Sum(lhs, rhs),
            None => PureExpression::Term(lhs),
        },
    )
    .parse(tokens, cursor)
}

// pure_statement := pure_expression '=' pure_expression
pub fn pure_statement(tokens: &[Token], cursor: &mut usize) -> PResult<PureStatement> {
    convert(
        chain((pure_expression, symbol(TokenKind::Equals), pure_expression)),
        |(lhs, _, rhs)| PureStatement { lhs, rhs },
    )
    .parse(tokens, cursor)
}

// variable := reference | '$' pure_variable
pub fn variable(tokens: &[Token], cursor: &mut usize) -> PResult<Variable> {
    options((
        convert(reference, Variable::Reference),
        convert(
            chain((
                symbol(TokenKind::Dollar),
                expect(pure_variable, "identifier after '$'"),
            )),
            |(_, var)| Variable::Pure(var),
        ),
    ))
    .parse(tokens, cursor)
}

// expression := '$' '(' pure_expression ')' | reference
pub fn expression(tokens: &[Token], cursor: &mut usize) -> PResult<Expression> {
    options((
        convert(
            chain((
                symbol(TokenKind::Dollar),
                symbol(TokenKind::LeftParen),
                pure_expression,
                symbol(TokenKind::RightParen),
            )),
            |(_, _, expr, _)| Expression::Pure(expr),
        ),
        convert(reference, Expression::Reference),
    ))
    .parse(tokens, cursor)
}

// statement := '$' '(' pure_statement ')' | reference
pub fn statement(tokens: &[Token], cursor: &mut usize) -> PResult<Statement> {
    options((
        convert(
            chain((
                symbol(TokenKind::Dollar),
                symbol(TokenKind::LeftParen),
                pure_statement,
                symbol(TokenKind::RightParen),
            )),
            |(_, _, stmt, _)| Statement::Pure(stmt),
        ),
        convert(reference, Statement::Reference),
    ))
    .parse(tokens, cursor)
}

// pure_predicate_domain := variable 'in' expression
pub fn pure_predicate_domain(
    tokens: &[Token],
    cursor: &mut usize,
) -> PResult<PurePredicateDomain> {
    convert(
        chain((variable, symbol(TokenKind::In), expression)),
        |(var, _, domain)| PurePredicateDomain { var, domain },
    )
    .parse(tokens, cursor)
}

// pure_predicates := '{' ( pure_predicate_domain ','? )* '}'
//
// Nothing else starts with '{', so a list that is not closed is an error
// rather than a mismatch.
pub fn pure_predicates(tokens: &[Token], cursor: &mut usize) -> PResult<PurePredicates> {
    convert(
        chain((
            symbol(TokenKind::LeftBrace),
            separated(pure_predicate_domain, symbol(TokenKind::Comma), true),
            expect(symbol(TokenKind::RightBrace), "'}' closing the predicate list"),
        )),
        |(_, domains, _)| PurePredicates { domains },
    )
    .parse(tokens, cursor)
}

// predicates := reference | pure_predicates
pub fn predicates(tokens: &[Token], cursor: &mut usize) -> PResult<Predicates> {
    options((
        convert(reference, Predicates::Reference),
        convert(pure_predicates, Predicates::Pure),
    ))
    .parse(tokens, cursor)
}

// import := 'from' identifier 'use' identifier
pub fn import(tokens: &[Token], cursor: &mut usize) -> PResult<Import> {
    convert(
        chain((
            symbol(TokenKind::From),
            identifier,
            symbol(TokenKind::Use),
            identifier,
        )),
        |(_, package, _, items)| Import { package, items },
    )
    .parse(tokens, cursor)
}

// association := statement '::' predicates
pub fn association(tokens: &[Token], cursor: &mut usize) -> PResult<Association> {
    convert(
        chain((statement, symbol(TokenKind::DoubleColon), predicates)),
        |(statement, _, predicates)| Association {
            statement,
            predicates,
        },
    )
    .parse(tokens, cursor)
}

// value := association | reference | predicates | statement
//
// association goes first: a bare reference or statement is a prefix of it.
pub fn value(tokens: &[Token], cursor: &mut usize) -> PResult<Value> {
    options((
        convert(association, Value::Association),
        convert(reference, Value::Reference),
        convert(predicates, Value::Predicates),
        convert(statement, Value::Statement),
    ))
    .parse(tokens, cursor)
}

// assignment := reference '=' value
pub fn assignment(tokens: &[Token], cursor: &mut usize) -> PResult<Assignment> {
    convert(
        chain((reference, symbol(TokenKind::Equals), value)),
        |(destination, _, value)| Assignment { destination, value },
    )
    .parse(tokens, cursor)
}

// instruction := import | assignment | value
pub fn instruction(tokens: &[Token], cursor: &mut usize) -> PResult<Instruction> {
    options((
        convert(import, Instruction::Import),
        convert(assignment, Instruction::Assignment),
        convert(value, Instruction::Value),
    ))
    .parse(tokens, cursor)
}

/// Drains a program one instruction at a time. Iteration stops at the first
/// token where no instruction starts, or after the first hard error.
#[derive(Clone, Debug)]
pub struct Instructions<'a> {
    tokens: &'a [Token],
    cursor: usize,
    done: bool,
}

impl<'a> Instructions<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            cursor: 0,
            done: false,
        }
    }

    /// Index of the first token not yet consumed.
    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn next_token(&self) -> Option<&'a Token> {
        self.tokens.get(self.cursor)
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor == self.tokens.len()
    }
}

impl<'a> Iterator for Instructions<'a> {
    type Item = Result<Instruction, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match instruction(self.tokens, &mut self.cursor) {
            Ok(Some(inst)) => Some(Ok(inst)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}
