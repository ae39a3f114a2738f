/*!
Import of clauses from an external producer.

A ring asks the [producer](crate::ruler::Ruler::set_produce_clause) for clauses when at level zero, at most once for each fresh count of conflicts.
Clauses are requested until the producer has none to give.

Each clause is validated literal by literal, in the original index space:
- A literal which is zero, outside the original variables, or whose variable was removed by compaction, discards the clause.
- A literal true at level zero discards the clause, as the clause is satisfied.
- A literal false at level zero is dropped from the clause.
- Duplicate literals are dropped, and a tautology discards the clause.

Discarded clauses are counted on the ruler, and a clause with no literal remaining is also discarded.
A clause which survives is installed as a unit, a binary clause, or a large clause, as if learnt, and is then offered to peers.
*/

use std::sync::atomic::Ordering;

use crate::{
    misc::log::targets::{self},
    ring::GenericRing,
    ruler::Ruler,
    structures::{
        clause::{ClauseRef, LargeClause},
        literal::Literal,
    },
};

/// Why a clause from the producer was not installed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Rejection {
    Invalid(i32),
    Satisfied,
    Tautology,
    Empty,
}

impl<R: rand::Rng + rand::SeedableRng> GenericRing<R> {
    /// Whether the ring should request clauses from an external producer.
    pub fn importing_external(&self, ruler: &Ruler) -> bool {
        ruler.external.has_producer
            && self.level == 0
            && self.last.external != Some(self.statistics.conflicts())
    }

    /// Requests and installs clauses from the external producer, until none remain.
    pub fn import_external(&mut self, ruler: &Ruler) {
        self.last.external = Some(self.statistics.conflicts());
        let mut buffer = Vec::default();
        let mut clause = Vec::default();

        loop {
            buffer.clear();
            let glue = {
                let mut produce = ruler.external.produce.lock();
                let Some(produce) = produce.as_mut() else {
                    return;
                };
                match produce(&mut buffer) {
                    Some(glue) => glue,
                    None => return,
                }
            };

            match self.validate_external(&buffer, &mut clause) {
                Ok(()) => {
                    self.install_external(ruler, &clause, glue);
                    self.statistics.external_imported += 1;
                    ruler.external.imported.fetch_add(1, Ordering::Relaxed);
                }
                Err(rejection) => {
                    log::trace!(target: targets::EXTERNAL, "Ring {}: discarding {buffer:?} ({rejection:?})", self.id);
                    self.statistics.external_discarded += 1;
                    ruler.external.discarded.fetch_add(1, Ordering::Relaxed);
                }
            }

            if self.inconsistent {
                return;
            }
        }
    }

    /// Maps the external literals of `buffer` into the ring, writing the unassigned literals to `clause`.
    fn validate_external(&mut self, buffer: &[i32], clause: &mut Vec<Literal>) -> Result<(), Rejection> {
        clause.clear();
        let mut rejection = None;

        for external in buffer {
            let Some(original) = Literal::from_external(*external) else {
                rejection = Some(Rejection::Invalid(*external));
                break;
            };
            let Some(literal) = original.mapped(&self.map) else {
                rejection = Some(Rejection::Invalid(*external));
                break;
            };
            if literal.var_index() >= self.size {
                rejection = Some(Rejection::Invalid(*external));
                break;
            }

            match self.value(literal) {
                1 => {
                    rejection = Some(Rejection::Satisfied);
                    break;
                }
                -1 => continue,
                _ => {}
            }

            if self.marks[literal.index()] != 0 {
                continue;
            }
            if self.marks[(!literal).index()] != 0 {
                rejection = Some(Rejection::Tautology);
                break;
            }
            self.marks[literal.index()] = 1;
            clause.push(literal);
        }

        for literal in clause.iter() {
            self.marks[literal.index()] = 0;
        }

        match rejection {
            Some(rejection) => Err(rejection),
            None if clause.is_empty() => Err(Rejection::Empty),
            None => Ok(()),
        }
    }

    /// Installs a validated clause at level zero, and offers the clause to peers.
    fn install_external(&mut self, ruler: &Ruler, clause: &[Literal], glue: u32) {
        debug_assert!(self.level == 0);
        let installed = match clause {
            [unit] => {
                log::trace!(target: targets::EXTERNAL, "Ring {}: importing unit {unit}", self.id);
                self.assign_unit(*unit);
                return;
            }

            [first, second] => {
                let binary = self.watches.watch_binary(*first, *second);
                ClauseRef::Binary(binary)
            }

            _ => {
                let large = LargeClause::new(clause, true, glue, self.id);
                let glue = large.glue();
                self.watches.watch_large(large.clone(), clause[0], clause[1], true, glue);
                ClauseRef::Large(large)
            }
        };

        self.export_to_peers(ruler, &installed);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use crate::{config::Config, ring::Ring, ruler::Ruler, structures::literal::Literal};

    fn lit(external: i32) -> Literal {
        Literal::from_external(external).unwrap()
    }

    fn ruler_producing(clauses: Vec<Vec<i32>>) -> Ruler {
        let mut config = Config::default();
        config.simplify.value = false;
        let mut ruler = Ruler::from_config(config);
        ruler.add_clause(&[1, 2, 3, 4, 5]).unwrap();
        let mut queue = VecDeque::from(clauses);
        ruler.set_produce_clause(move |buffer| {
            let clause = queue.pop_front()?;
            buffer.extend_from_slice(&clause);
            Some(2)
        });
        ruler.prepare();
        ruler
    }

    #[test]
    fn validation_and_installation() {
        let ruler = ruler_producing(vec![
            vec![1, -2],
            vec![0, 3],
            vec![9, 1],
            vec![-1, 1, 3],
            vec![3, 4, -5],
            vec![2, 2, 4],
        ]);
        let mut ring = Ring::new(&ruler, 0);
        assert!(ring.importing_external(&ruler));
        ring.import_external(&ruler);

        let statistics = ruler.statistics();
        assert_eq!(statistics.external_imported, 3);
        assert_eq!(statistics.external_discarded, 3);
        assert!(ring.watches.contains_binary(lit(1), lit(-2)));
        assert!(ring.watches.contains_binary(lit(2), lit(4)));
        assert_eq!(ring.watches.watchers.len(), 2);
        assert!(ring.marks.iter().all(|mark| *mark == 0));

        // Asked once for each count of conflicts.
        assert!(!ring.importing_external(&ruler));
    }

    #[test]
    fn fixed_literals_filter_clauses() {
        let ruler = ruler_producing(vec![vec![1, 2], vec![-1, 3]]);
        let mut ring = Ring::new(&ruler, 0);
        ring.assign_unit(lit(1));
        ring.import_external(&ruler);

        // The first clause is satisfied, and the second is strengthened to a unit.
        assert_eq!(ring.value(lit(3)), 1);
        assert_eq!(ring.statistics.external_discarded, 1);
        assert_eq!(ring.statistics.external_imported, 1);
    }
}
