/*!
A module to represent propositional formulas in clausal form.
*/

use std::{collections::HashMap, fmt::Display, iter::FromIterator};

use typed_index_collections::TiVec;

use crate::prelude::*;

#[derive(Debug, Snafu)]
pub enum VariableParseError {
    #[snafu(display("Variable name is empty"))]
    EmptyName,
    #[snafu(display("Variable name '{}' must start with a letter or '_'", name))]
    InvalidStart { name: String },
    #[snafu(display("Variable name '{}' contains invalid character '{}'", name, found))]
    InvalidCharacter { name: String, found: char },
}

/// Checks `name` against `[A-Za-z_][A-Za-z0-9_]*`.
pub fn validate_name(name: &str) -> Result<(), VariableParseError> {
    let mut chars = name.chars();
    let first = chars.next().context(EmptyName)?;

    ensure!(first.is_ascii_alphabetic() || first == '_', InvalidStart { name });

    if let Some(found) = chars.find(|c| !(c.is_ascii_alphanumeric() || *c == '_')) {
        return InvalidCharacter { name, found }.fail();
    }

    Ok(())
}

/// Newtype wrapper for the registry index of a variable.
/// Two variables of the same formula are equal iff their names are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Variable(usize);

impl Variable {
    pub fn as_index(&self) -> usize {
        self.0
    }
}

impl From<usize> for Variable {
    fn from(index: usize) -> Self {
        Variable(index)
    }
}

impl From<Variable> for usize {
    fn from(variable: Variable) -> Self {
        variable.0
    }
}

/// Names of the variables of a formula, in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct VariableRegistry {
    names: TiVec<Variable, String>,
    lookup: HashMap<String, Variable>,
}

impl VariableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn find(&self, name: &str) -> Option<Variable> {
        self.lookup.get(name).copied()
    }

    /// Returns the variable named `name`, registering it if it is new.
    /// The name is not validated.
    pub fn find_or_add(&mut self, name: &str) -> Variable {
        if let Some(variable) = self.find(name) {
            return variable;
        }

        let variable = Variable::from(self.names.len());
        self.names.push(name.to_owned());
        self.lookup.insert(name.to_owned(), variable);
        variable
    }

    pub fn name(&self, variable: Variable) -> Option<&str> {
        self.names.get(variable).map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Literal {
    id: Variable,
    positive: bool,
}

impl Literal {
    pub fn new(id: Variable, positive: bool) -> Self {
        Literal { id, positive }
    }

    pub fn variable(&self) -> Variable {
        self.id
    }

    pub fn positive(&self) -> bool {
        self.positive
    }

    pub fn negated(&self) -> bool {
        !self.positive
    }

    pub fn display<'a>(&self, variables: &'a VariableRegistry) -> LiteralDisplay<'a> {
        LiteralDisplay {
            literal: *self,
            variables,
        }
    }
}

impl std::ops::Not for Literal {
    type Output = Literal;

    fn not(self) -> Self::Output {
        Literal {
            id: self.id,
            positive: !self.positive,
        }
    }
}

pub struct LiteralDisplay<'a> {
    literal: Literal,
    variables: &'a VariableRegistry,
}

impl Display for LiteralDisplay<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.literal.positive { "" } else { "¬" };
        match self.variables.name(self.literal.id) {
            Some(name) => write!(f, "{}{}", sign, name),
            None => write!(f, "{}#{}", sign, self.literal.id.0),
        }
    }
}

/// Disjunction of literals with set semantics.
///
/// A literal is stored at most once, so the literal count is the size of the
/// set. Literal order carries no meaning. A clause without literals is the
/// empty clause, a contradiction.
#[derive(Debug, Clone, Default)]
pub struct Clause {
    literals: Vec<Literal>,
}

impl Clause {
    pub fn new(literals: Vec<Literal>) -> Self {
        let mut clause = Clause {
            literals: Vec::with_capacity(literals.len()),
        };
        for literal in literals {
            clause.push(literal);
        }
        clause
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Adds `literal` unless the clause already holds it.
    pub fn push(&mut self, literal: Literal) {
        if !self.contains(literal) {
            self.literals.push(literal);
        }
    }

    pub fn num_literals(&self) -> usize {
        self.literals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Literal> + '_ {
        self.literals.iter().copied()
    }

    pub fn contains(&self, literal: Literal) -> bool {
        self.literals.contains(&literal)
    }

    /// Returns the only literal of a unit clause.
    pub fn unit(&self) -> Option<Literal> {
        match self.literals.as_slice() {
            [literal] => Some(*literal),
            _ => None,
        }
    }

    /// A clause is a tautology if it holds a literal together with its negation.
    pub fn is_tautology(&self) -> bool {
        self.iter().any(|literal| self.contains(!literal))
    }

    /// Returns a copy of the clause with `literal` removed.
    pub fn without(&self, literal: Literal) -> Clause {
        Clause {
            literals: self.iter().filter(|&l| l != literal).collect(),
        }
    }

    pub fn display<'a>(&'a self, variables: &'a VariableRegistry) -> ClauseDisplay<'a> {
        ClauseDisplay {
            clause: self,
            variables,
        }
    }
}

impl PartialEq for Clause {
    fn eq(&self, other: &Self) -> bool {
        self.num_literals() == other.num_literals()
            && self.iter().all(|literal| other.contains(literal))
            && other.iter().all(|literal| self.contains(literal))
    }
}

impl Eq for Clause {}

impl FromIterator<Literal> for Clause {
    fn from_iter<I: IntoIterator<Item = Literal>>(iter: I) -> Self {
        let mut clause = Clause::empty();
        for literal in iter {
            clause.push(literal);
        }
        clause
    }
}

pub struct ClauseDisplay<'a> {
    clause: &'a Clause,
    variables: &'a VariableRegistry,
}

impl Display for ClauseDisplay<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(")?;

        let mut iter = self.clause.iter();
        if let Some(first) = iter.next() {
            write!(f, "{}", first.display(self.variables))?;
        }
        for literal in iter {
            write!(f, " ∨ {}", literal.display(self.variables))?;
        }

        write!(f, ")")?;

        Ok(())
    }
}

/// Formula representation in Conjunctive Normal Form
///
/// Invariant: no stored clause is empty or a tautology.
/// Clauses are not deduplicated.
#[derive(Debug, Clone, Default)]
pub struct Cnf {
    variables: VariableRegistry,
    clauses: Vec<Clause>,
}

impl Cnf {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_variables(variables: VariableRegistry) -> Self {
        Cnf {
            variables,
            clauses: Vec::new(),
        }
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn variables(&self) -> &VariableRegistry {
        &self.variables
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn into_parts(self) -> (VariableRegistry, Vec<Clause>) {
        (self.variables, self.clauses)
    }

    /// Returns the literal for a validated variable name.
    pub fn literal(&mut self, name: &str, positive: bool) -> Result<Literal, VariableParseError> {
        validate_name(name)?;
        Ok(Literal::new(self.variables.find_or_add(name), positive))
    }

    /// Parses a token of the form `name` or `!name`.
    pub fn parse_literal(&mut self, token: &str) -> Result<Literal, VariableParseError> {
        match token.strip_prefix('!') {
            Some(name) => self.literal(name, false),
            None => self.literal(token, true),
        }
    }

    /// Looks up a literal without registering its variable.
    pub fn find_literal(&self, name: &str, positive: bool) -> Option<Literal> {
        self.variables
            .find(name)
            .map(|variable| Literal::new(variable, positive))
    }

    /// Checks whether `clause` holds the literal `name` with the given polarity.
    pub fn contains(&self, clause: &Clause, name: &str, negated: bool) -> bool {
        self.find_literal(name, !negated)
            .map_or(false, |literal| clause.contains(literal))
    }

    /// Adds a clause to the formula.
    /// Returns `false` and drops the clause if it is empty or a tautology.
    pub fn add_clause(&mut self, clause: Clause) -> bool {
        if clause.is_empty() || clause.is_tautology() {
            return false;
        }
        self.clauses.push(clause);
        true
    }
}

impl Display for Cnf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CNF with {} variables (", self.num_variables())?;

        let mut iter = self.clauses.iter();
        if let Some(first) = iter.next() {
            write!(f, "{}", first.display(&self.variables))?;
        }
        for clause in iter {
            write!(f, " ∧ {}", clause.display(&self.variables))?;
        }

        write!(f, ")")?;

        Ok(())
    }
}
