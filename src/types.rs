// Licensed under MIT. See LICENSE for details.

use std::fmt;

use itertools::Itertools;

// AST node types. Display renders each node back to source text that parses
// to the same node.

// Mathematical variable, `a` inside `$(a + b = b + a)`.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct PureVariable(pub String);

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PureFactor {
    Variable(PureVariable),
    // (a + b)
    Parenthesized(Box<PureExpression>),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PureTerm(pub PureFactor);

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PureExpression {
    Term(PureTerm),
    // lhs + rhs
    Sum(PureTerm, PureTerm),
}

// lhs = rhs
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PureStatement {
    pub lhs: PureExpression,
    pub rhs: PureExpression,
}

// Name of a value bound by the program, as opposed to a PureVariable.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Reference(pub String);

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Variable {
    Pure(PureVariable),
    Reference(Reference),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Expression {
    Pure(PureExpression),
    Reference(Reference),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Statement {
    Pure(PureStatement),
    Reference(Reference),
}

// var in domain
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PurePredicateDomain {
    pub var: Variable,
    pub domain: Expression,
}

// Domains in declaration order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PurePredicates {
    pub domains: Vec<PurePredicateDomain>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Predicates {
    Pure(PurePredicates),
    Reference(Reference),
}

// from package use items
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Import {
    pub package: String,
    // TODO: accept a comma separated list of items.
    pub items: String,
}

// statement :: predicates
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Association {
    pub statement: Statement,
    pub predicates: Predicates,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Value {
    Reference(Reference),
    Predicates(Predicates),
    Statement(Statement),
    Association(Association),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Assignment {
    pub destination: Reference,
    pub value: Value,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Instruction {
    Import(Import),
    Assignment(Assignment),
    Value(Value),
}

impl PureVariable {
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl Reference {
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<PureVariable> for PureFactor {
    fn from(var: PureVariable) -> Self {
        PureFactor::Variable(var)
    }
}

impl From<PureExpression> for PureFactor {
    fn from(expr: PureExpression) -> Self {
        PureFactor::Parenthesized(Box::new(expr))
    }
}

impl Instruction {
    pub fn kind(&self) -> &'static str {
        match *self {
            Instruction::Import(_) => "import",
            Instruction::Assignment(_) => "assignment",
            Instruction::Value(_) => "value",
        }
    }
}

impl fmt::Display for PureVariable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for PureFactor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            PureFactor::Variable(ref var) => fmt::Display::fmt(var, f),
            PureFactor::Parenthesized(ref expr) => write!(f, "({})", expr),
        }
    }
}

impl fmt::Display for PureTerm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::Display for PureExpression {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            PureExpression::Term(ref term) => fmt::Display::fmt(term, f),
            PureExpression::Sum(ref lhs, ref rhs) => write!(f, "{} + {}", lhs, rhs),
        }
    }
}

impl fmt::Display for PureStatement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} = {}", self.lhs, self.rhs)
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Variable::Pure(ref var) => write!(f, "${}", var),
            Variable::Reference(ref r) => fmt::Display::fmt(r, f),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Expression::Pure(ref expr) => write!(f, "$({})", expr),
            Expression::Reference(ref r) => fmt::Display::fmt(r, f),
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Statement::Pure(ref stmt) => write!(f, "$({})", stmt),
            Statement::Reference(ref r) => fmt::Display::fmt(r, f),
        }
    }
}

impl fmt::Display for PurePredicateDomain {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} in {}", self.var, self.domain)
    }
}

impl fmt::Display for PurePredicates {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.domains.is_empty() {
            return f.write_str("{}");
        }
        write!(f, "{{ {} }}", self.domains.iter().join(", "))
    }
}

impl fmt::Display for Predicates {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Predicates::Pure(ref preds) => fmt::Display::fmt(preds, f),
            Predicates::Reference(ref r) => fmt::Display::fmt(r, f),
        }
    }
}

impl fmt::Display for Import {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "from {} use {}", self.package, self.items)
    }
}

impl fmt::Display for Association {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} :: {}", self.statement, self.predicates)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Value::Reference(ref r) => fmt::Display::fmt(r, f),
            Value::Predicates(ref preds) => fmt::Display::fmt(preds, f),
            Value::Statement(ref stmt) => fmt::Display::fmt(stmt, f),
            Value::Association(ref assoc) => fmt::Display::fmt(assoc, f),
        }
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} = {}", self.destination, self.value)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Instruction::Import(ref import) => fmt::Display::fmt(import, f),
            Instruction::Assignment(ref assign) => fmt::Display::fmt(assign, f),
            Instruction::Value(ref value) => fmt::Display::fmt(value, f),
        }
    }
}
