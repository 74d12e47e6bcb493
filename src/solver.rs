use std::fmt::Display;

use crate::{config::Config, formula::Cnf};

mod resolution;
pub mod simplify;

pub use resolution::{resolve, ResolutionSolver, Stats};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Satisfiable,
    Unsatisfiable,
}

impl Verdict {
    pub fn is_satisfiable(&self) -> bool {
        *self == Verdict::Satisfiable
    }
}

impl Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Satisfiable => write!(f, "satisfiable"),
            Verdict::Unsatisfiable => write!(f, "unsatisfiable"),
        }
    }
}

pub trait Solver {
    /// Creates a new solver instance.
    fn new(formula: Cnf, config: Config) -> Self;

    /// Decides satisfiability of the formula given to the solver.
    fn solve(self) -> Verdict;
}
