/*!
Unit simplification, an optional pre-pass before resolution.

For a unit clause `l`, every other clause containing `l` is satisfied and
removed, and `¬l` is removed from the remaining clauses. This is repeated
until no unit clause changes the set. Satisfiability is preserved, and an
empty clause may appear when two units contradict each other.
*/

use crate::formula::{Clause, Literal};

/// Simplifies `clauses` in place and returns the number of units applied.
/// Clause order is not preserved.
pub fn unit_simplify(clauses: &mut Vec<Clause>) -> usize {
    let mut applied = 0;

    while let Some((index, unit)) = next_unit(clauses) {
        let unit_clause = clauses.swap_remove(index);

        clauses.retain(|clause| !clause.contains(unit));
        for clause in clauses.iter_mut() {
            if clause.contains(!unit) {
                *clause = clause.without(!unit);
            }
        }

        clauses.push(unit_clause);
        applied += 1;
    }

    applied
}

/// Finds a unit clause whose variable still occurs in some other clause.
fn next_unit(clauses: &[Clause]) -> Option<(usize, Literal)> {
    clauses
        .iter()
        .enumerate()
        .filter_map(|(index, clause)| clause.unit().map(|unit| (index, unit)))
        .find(|&(index, unit)| {
            clauses
                .iter()
                .enumerate()
                .any(|(other, clause)| other != index && (clause.contains(unit) || clause.contains(!unit)))
        })
}
