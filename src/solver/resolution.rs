use typed_index_collections::TiVec;

use crate::{
    config::Config,
    formula::{Clause, Cnf, Literal, VariableRegistry},
};

use super::{simplify::unit_simplify, Solver, Verdict};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct ClauseIdx(usize);

impl From<usize> for ClauseIdx {
    fn from(index: usize) -> Self {
        ClauseIdx(index)
    }
}

impl From<ClauseIdx> for usize {
    fn from(index: ClauseIdx) -> Self {
        index.0
    }
}

/// Resolves `first` and `second` on `pivot`.
///
/// `pivot` is the literal taken from `first`; its negation is removed from
/// `second`. Returns `None` if the resolvent is a tautology.
pub fn resolve(first: &Clause, second: &Clause, pivot: Literal) -> Option<Clause> {
    let resolvent: Clause = first
        .iter()
        .filter(|&literal| literal != pivot)
        .chain(second.iter().filter(|&literal| literal != !pivot))
        .collect();

    if resolvent.is_tautology() {
        None
    } else {
        Some(resolvent)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    /// Completed rounds that added at least one resolvent.
    pub rounds: usize,
    /// Resolvents added to the working set.
    pub resolvents: usize,
    /// The search was abandoned because the working set could not grow.
    pub exhausted: bool,
}

enum Round {
    Completed,
    Refuted,
    Exhausted,
}

/// Saturation-based resolution refutation.
///
/// Each round resolves every pair of clauses present when the round started,
/// appending resolvents that are neither tautologies nor equal to a clause
/// already in the working set. The search ends when the empty clause is
/// derived or a round adds nothing.
///
/// There is no bound on time or memory besides `Config::max_clauses`. If the
/// working set cannot grow the solver gives up and reports satisfiable.
#[derive(Debug)]
pub struct ResolutionSolver {
    variables: VariableRegistry,
    clauses: TiVec<ClauseIdx, Clause>,
    config: Config,
    stats: Stats,
}

impl ResolutionSolver {
    pub fn stats(&self) -> Stats {
        self.stats
    }

    /// Current working set. Order is unspecified.
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses.raw
    }

    /// Converts the working set back into a formula over the same variables.
    pub fn into_formula(self) -> Cnf {
        let mut cnf = Cnf::with_variables(self.variables);
        for clause in self.clauses {
            cnf.add_clause(clause);
        }
        cnf
    }

    pub fn refute(&mut self) -> Verdict {
        if self.clauses.iter().any(Clause::is_empty) {
            debug!("Working set starts with the empty clause");
            return Verdict::Unsatisfiable;
        }

        loop {
            let end = self.clauses.len();

            match self.round(end) {
                Round::Refuted => {
                    debug!("Derived the empty clause in round {}", self.stats.rounds + 1);
                    return Verdict::Unsatisfiable;
                }
                Round::Exhausted => {
                    warn!(
                        "Working set cannot grow beyond {} clauses, reporting satisfiable",
                        self.clauses.len()
                    );
                    self.stats.exhausted = true;
                    return Verdict::Satisfiable;
                }
                Round::Completed => (),
            }

            if self.clauses.len() == end {
                debug!(
                    "Saturated after {} rounds with {} clauses",
                    self.stats.rounds,
                    self.clauses.len()
                );
                return Verdict::Satisfiable;
            }

            self.stats.rounds += 1;
            debug!(
                "Round {}: {} -> {} clauses",
                self.stats.rounds,
                end,
                self.clauses.len()
            );
        }
    }

    /// Resolves all pairs among the first `end` clauses.
    fn round(&mut self, end: usize) -> Round {
        for i in 0..end {
            for j in (i + 1)..end {
                let (i, j) = (ClauseIdx::from(i), ClauseIdx::from(j));

                let pivots: Vec<Literal> = self.clauses[i]
                    .iter()
                    .filter(|&literal| self.clauses[j].contains(!literal))
                    .collect();

                for pivot in pivots {
                    let resolvent = match resolve(&self.clauses[i], &self.clauses[j], pivot) {
                        Some(resolvent) => resolvent,
                        None => continue,
                    };

                    if resolvent.is_empty() {
                        return Round::Refuted;
                    }

                    if self.clauses.iter().any(|clause| *clause == resolvent) {
                        continue;
                    }

                    if !self.reserve() {
                        return Round::Exhausted;
                    }

                    trace!("Resolvent {}", resolvent.display(&self.variables));
                    self.clauses.push(resolvent);
                    self.stats.resolvents += 1;
                }
            }
        }

        Round::Completed
    }

    /// Makes room for one more clause.
    fn reserve(&mut self) -> bool {
        if let Some(limit) = self.config.max_clauses {
            if self.clauses.len() >= limit {
                return false;
            }
        }

        match self.clauses.raw.try_reserve(1) {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to grow the working set: {}", e);
                false
            }
        }
    }
}

impl Solver for ResolutionSolver {
    fn new(formula: Cnf, config: Config) -> Self {
        let (variables, mut clauses) = formula.into_parts();

        if config.unit_simplify {
            let before = clauses.len();
            let applied = unit_simplify(&mut clauses);
            debug!(
                "Unit simplification applied {} units: {} -> {} clauses",
                applied,
                before,
                clauses.len()
            );
        }

        ResolutionSolver {
            variables,
            clauses: TiVec::from(clauses),
            config,
            stats: Stats::default(),
        }
    }

    fn solve(mut self) -> Verdict {
        self.refute()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_str;

    fn literals(cnf: &mut Cnf, tokens: &str) -> Clause {
        tokens
            .split_whitespace()
            .map(|token| cnf.parse_literal(token).unwrap())
            .collect()
    }

    fn refute_str(input: &str) -> (Verdict, ResolutionSolver) {
        let mut solver = ResolutionSolver::new(parse_str(input).unwrap(), Config::default());
        let verdict = solver.refute();
        (verdict, solver)
    }

    #[test]
    fn resolvent_on_pivot() {
        let mut cnf = Cnf::new();
        let first = literals(&mut cnf, "A B");
        let second = literals(&mut cnf, "!A C");
        let expected = literals(&mut cnf, "B C");
        let a = cnf.find_literal("A", true).unwrap();

        assert_eq!(resolve(&first, &second, a), Some(expected.clone()));
        assert_eq!(resolve(&second, &first, !a), Some(expected));
    }

    #[test]
    fn resolvent_merges_shared_literals() {
        let mut cnf = Cnf::new();
        let first = literals(&mut cnf, "A B");
        let second = literals(&mut cnf, "!A B");
        let a = cnf.find_literal("A", true).unwrap();

        let resolvent = resolve(&first, &second, a).unwrap();
        assert_eq!(resolvent.num_literals(), 1);
    }

    #[test]
    fn tautological_resolvent_is_rejected() {
        let mut cnf = Cnf::new();
        let first = literals(&mut cnf, "A B");
        let second = literals(&mut cnf, "!A !B");
        let a = cnf.find_literal("A", true).unwrap();

        assert_eq!(resolve(&first, &second, a), None);
    }

    #[test]
    fn complementary_units_give_empty_clause() {
        let mut cnf = Cnf::new();
        let first = literals(&mut cnf, "A");
        let second = literals(&mut cnf, "!A");
        let a = cnf.find_literal("A", true).unwrap();

        assert!(resolve(&first, &second, a).unwrap().is_empty());
    }

    #[test]
    fn empty_formula_is_satisfiable() {
        let (verdict, solver) = refute_str("# only a comment\n");
        assert_eq!(verdict, Verdict::Satisfiable);
        assert_eq!(solver.stats(), Stats::default());
    }

    #[test]
    fn complementary_units_are_unsatisfiable() {
        let (verdict, solver) = refute_str("A\n!A\n");
        assert_eq!(verdict, Verdict::Unsatisfiable);
        assert_eq!(solver.stats().rounds, 0);
    }

    #[test]
    fn no_pivot_reaches_fixpoint() {
        let (verdict, solver) = refute_str("A B\n");
        assert_eq!(verdict, Verdict::Satisfiable);
        assert_eq!(solver.stats().rounds, 0);
        assert_eq!(solver.clauses().len(), 1);
    }

    #[test]
    fn all_sign_combinations_are_unsatisfiable() {
        let (verdict, _) = refute_str("A B\n!A !B\nA !B\n!A B\n");
        assert_eq!(verdict, Verdict::Unsatisfiable);
    }

    #[test]
    fn working_set_has_no_duplicate_resolvents() {
        let (verdict, solver) = refute_str("A B\n!A B\nB C\n!C B\n");
        assert_eq!(verdict, Verdict::Satisfiable);

        let clauses = solver.clauses();
        for (i, first) in clauses.iter().enumerate() {
            for second in &clauses[i + 1..] {
                assert_ne!(first, second);
            }
        }
        assert_eq!(solver.stats().resolvents, clauses.len() - 4);
    }

    #[test]
    fn saturated_set_needs_no_rounds() {
        let (verdict, solver) = refute_str("A B\n!A C\n!C D\n");
        assert_eq!(verdict, Verdict::Satisfiable);
        assert!(solver.stats().rounds > 0);

        let saturated = solver.into_formula();
        let count = saturated.clauses().len();
        let mut again = ResolutionSolver::new(saturated, Config::default());

        assert_eq!(again.refute(), Verdict::Satisfiable);
        assert_eq!(again.stats().rounds, 0);
        assert_eq!(again.stats().resolvents, 0);
        assert_eq!(again.clauses().len(), count);
    }

    #[test]
    fn clause_limit_fails_open() {
        let config = Config {
            max_clauses: Some(4),
            ..Config::default()
        };
        let formula = parse_str("A B\n!A B\nA !B\n!A !B\n").unwrap();
        let mut solver = ResolutionSolver::new(formula, config);

        assert_eq!(solver.refute(), Verdict::Satisfiable);
        assert!(solver.stats().exhausted);
    }

    #[test]
    fn unit_simplification_keeps_verdict() {
        let config = Config {
            unit_simplify: true,
            ..Config::default()
        };
        for (input, expected) in &[
            ("A\n!A B\n!B\n", Verdict::Unsatisfiable),
            ("A\n!A B\nB C\n", Verdict::Satisfiable),
            ("A\n!A\n", Verdict::Unsatisfiable),
        ] {
            let solver = ResolutionSolver::new(parse_str(input).unwrap(), config);
            assert_eq!(solver.solve(), *expected, "input {:?}", input);
        }
    }
}
