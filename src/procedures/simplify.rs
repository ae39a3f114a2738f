/*!
Simplification of the formula at level zero, by the ruler.

# Overview

A round of simplification runs before rings are cloned, when [preparing](Ruler::prepare) a solve, and whenever the first ring requests a round during the solve.
During a solve, a round runs between the `import` and `copy` [barriers](crate::ruler::Barriers), when no ring holds a watch, and so the leader may freely rewrite the formula.

A round:
1. Propagates the units of the ruler over the formula, to a fixed point, noting any fresh units.
2. Drops every clause satisfied by some unit, marking dropped large clauses as garbage.
3. Drops every false literal from the remaining clauses.
   A large clause strengthened to two literals becomes a binary clause, and otherwise a fresh large clause replaces the original.
4. Compacts the index space, if enough variables are fixed.

A contradiction found during propagation makes the ruler inconsistent.
*/

use std::sync::{atomic::Ordering, Arc};

use crate::{
    misc::log::targets::{self},
    ruler::{Formula, Ruler, UnitTrail},
    structures::{clause::LargeClause, literal::Literal},
};

/// Counts from a round of simplification, for logs.
#[derive(Debug, Default)]
struct Simplified {
    satisfied: usize,
    strengthened: usize,
    units: usize,
}

impl Ruler {
    /// Simplifies the formula at level zero, ahead of a solve.
    ///
    /// Does nothing if simplification is not configured.
    pub fn prepare(&mut self) {
        if self.config.simplify.value && !self.is_inconsistent() {
            self.simplify_round();
        }
        *self.compaction.get_mut() = None;
    }

    /// A round of simplification, with the compaction (if any) published for rings to follow.
    pub(crate) fn simplify_round(&self) {
        let mut formula = self.formula.lock();
        let mut units = self.units.lock();
        formula.simplifications += 1;
        let mut compaction = None;

        match propagate_units(&formula, &mut units) {
            Err(literal) => self.set_inconsistent(&format!("simplification falsified {literal}")),

            Ok(fresh) => {
                self.fixed_count.fetch_add(fresh as u64, Ordering::Relaxed);
                let mut simplified = Simplified {
                    units: fresh,
                    ..Default::default()
                };
                rebuild(&mut formula, &units, &mut simplified);
                log::info!(target: targets::SIMPLIFY, "Simplification {}: {} units, {} clauses satisfied, {} strengthened",
                    formula.simplifications,
                    simplified.units,
                    simplified.satisfied,
                    simplified.strengthened
                );

                if self.compacting(&formula, &units) {
                    compaction = Some(self.compact_formula(&mut formula, &mut units));
                }
            }
        }

        *self.compaction.lock() = compaction;
        self.simplify.store(false, Ordering::Relaxed);
    }
}

/// Propagates units over the formula to a fixed point, returning the count of fresh units.
///
/// On a contradiction, the literal found false is returned as an error.
fn propagate_units(formula: &Formula, units: &mut UnitTrail) -> Result<usize, Literal> {
    let initial = units.len();
    let mut next = 0;

    loop {
        while next < units.len() {
            let unit = units.literals[next];
            next += 1;
            for other in &formula.binaries[(!unit).index()] {
                if !units.push(*other) {
                    return Err(*other);
                }
            }
        }

        let mut fresh = false;
        for clause in &formula.clauses {
            if clause.is_garbage() {
                continue;
            }
            let mut unassigned = None;
            let mut count = 0;
            let mut satisfied = false;
            for literal in clause.literals() {
                match units.value(*literal) {
                    1 => {
                        satisfied = true;
                        break;
                    }
                    0 => {
                        unassigned = Some(*literal);
                        count += 1;
                    }
                    _ => {}
                }
            }
            match (satisfied, count, unassigned) {
                (true, _, _) => {}
                (false, 0, _) => return Err(clause.literals()[0]),
                (false, 1, Some(unit)) => {
                    units.push(unit);
                    fresh = true;
                }
                _ => {}
            }
        }

        if !fresh && next == units.len() {
            break;
        }
    }

    Ok(units.len() - initial)
}

/// Removes satisfied clauses and false literals, given the units have been propagated to a fixed point.
fn rebuild(formula: &mut Formula, units: &UnitTrail, simplified: &mut Simplified) {
    let mut binaries = vec![Vec::default(); 2 * formula.size];
    for (code, others) in formula.binaries.iter().enumerate() {
        let literal = Literal::from_code(code as u32);
        if units.value(literal) != 0 {
            continue;
        }
        binaries[code].extend(others.iter().filter(|other| units.value(**other) == 0));
    }

    let mut clauses = Vec::with_capacity(formula.clauses.len());
    for clause in formula.clauses.drain(..) {
        if clause.is_garbage() {
            continue;
        }
        if clause.literals().iter().any(|literal| units.value(*literal) > 0) {
            simplified.satisfied += 1;
            clause.mark_garbage();
            continue;
        }

        let literals = clause
            .literals()
            .iter()
            .copied()
            .filter(|literal| units.value(*literal) == 0)
            .collect::<Vec<_>>();
        if literals.len() == clause.size() {
            clauses.push(clause);
            continue;
        }

        simplified.strengthened += 1;
        clause.mark_garbage();
        match literals.as_slice() {
            [a, b] => {
                binaries[a.index()].push(*b);
                binaries[b.index()].push(*a);
            }
            _ => clauses.push(LargeClause::new(&literals, false, 0, 0)),
        }
    }

    let kept = binaries.iter().map(|others| others.len()).sum::<usize>() / 2;
    simplified.satisfied += formula.binary_count().saturating_sub(kept);
    formula.binaries = Arc::new(binaries);
    formula.clauses = clauses;
}

#[cfg(test)]
mod tests {
    use crate::{config::Config, ruler::Ruler, structures::literal::Literal};

    fn lit(external: i32) -> Literal {
        Literal::from_external(external).unwrap()
    }

    fn ruler_over(clauses: &[&[i32]]) -> Ruler {
        let mut config = Config::default();
        config.compact_fraction.value = 1.0;
        let mut ruler = Ruler::from_config(config);
        for clause in clauses {
            ruler.add_clause(clause).unwrap();
        }
        ruler
    }

    #[test]
    fn units_propagate_and_clauses_shrink() {
        let mut ruler = ruler_over(&[&[1], &[-1, 2], &[-2, 3, 4, 5], &[2, 6, 7], &[-3, -5, 6, 7]]);
        ruler.prepare();

        let formula = ruler.formula.lock();
        let units = ruler.units.lock();
        assert_eq!(units.value(lit(2)), 1);
        assert_eq!(formula.simplifications, 1);
        assert_eq!(formula.clauses.len(), 2);
        assert_eq!(formula.clauses[0].literals(), &[lit(3), lit(4), lit(5)]);
        assert_eq!(formula.binary_count(), 0);
        assert!(ruler.compaction.lock().is_none());
    }

    #[test]
    fn strengthening_yields_binaries() {
        let mut ruler = ruler_over(&[&[-1], &[1, 2, 3], &[2, 3, 4, 5]]);
        ruler.prepare();

        let formula = ruler.formula.lock();
        assert!(formula.binaries[lit(2).index()].contains(&lit(3)));
        assert_eq!(formula.clauses.len(), 1);
    }

    #[test]
    fn contradictions_are_inconsistent() {
        let mut ruler = ruler_over(&[&[1], &[-1, 2], &[-1, 3], &[-2, -3, 4], &[-2, -3, -4]]);
        ruler.prepare();
        assert!(ruler.is_inconsistent());
    }

    #[test]
    fn enough_units_compact() {
        let mut config = Config::default();
        config.compact_fraction.value = 0.25;
        let mut ruler = Ruler::from_config(config);
        ruler.add_clause(&[1]).unwrap();
        ruler.add_clause(&[-1, -2]).unwrap();
        ruler.add_clause(&[3, 4, 5]).unwrap();
        ruler.add_clause(&[-3, -4, 5]).unwrap();
        ruler.add_clause(&[2, 4, -5]).unwrap();

        ruler.simplify_round();
        assert!(ruler.compaction.lock().is_some());
        let formula = ruler.formula.lock();
        assert_eq!(formula.size, 3);
        assert_eq!(formula.compactions, 1);
        assert_eq!(*ruler.fixed.lock(), vec![1, -1, 0, 0, 0]);
    }
}
