/*!
The lifecycle of a ring on its thread.

# Overview

Each thread creates its ring from the formula of the ruler, and every ring then waits at the `start` [barrier](crate::ruler::Barriers).
From there, each ring searches until the search ends, and:

- On a verdict the ring offers the verdict (and, if satisfiable, its values) to the ruler, which records the first verdict as the winner.
- Every ring then waits at the `unclone` barrier.
- If no ring found a verdict and no limit was reached, the search ended for a round of simplification:
  1. Each ring *unclones*: backtracks, exports its units, saves its best redundant clauses, flushes the buckets it filled, and releases its watches.
  2. At the `import` barrier, the leader (ring zero) [simplifies](crate::procedures::simplify) the formula, and perhaps [compacts](crate::procedures::compact) the index space.
  3. At the `copy` barrier, each ring follows the compaction, watches the formula again, restores its saved clauses, and imports units.
  4. At the `run` barrier, every ring searches again.
- Otherwise every ring flushes its buckets, and waits at the `end` barrier.

As every ring reaches `unclone` before any flag is read, each ring reads the same flags and takes the same branch.

# Saved clauses

Redundant binary clauses are always saved, as are redundant large clauses of tier one or two which are not garbage and have not been vivified.
A saved clause with some literal fixed when restored is dropped.
*/

use std::sync::atomic::Ordering;

use crate::{
    db::watches::{Watch, Watches},
    misc::log::targets::{self},
    reports::Report,
    ring::{GenericRing, Ring, SearchOutcome},
    ruler::{Compaction, Ruler},
    structures::{clause::ClauseRef, literal::Literal},
};

impl Ruler {
    /// Runs ring `id` through every phase of a solve, on the calling thread.
    pub(crate) fn run_ring(&self, id: usize) {
        let mut ring = Ring::new(self, id);
        self.barriers.start.wait();

        loop {
            let outcome = ring.search(self);
            if let SearchOutcome::Verdict(report) = outcome {
                ring.offer_verdict(self, report);
            }

            self.barriers.unclone.wait();
            if self.terminate.load(Ordering::Relaxed) || !self.simplify.load(Ordering::Relaxed) {
                break;
            }

            ring.unclone(self);
            self.barriers.import.wait();
            if id == 0 {
                self.simplify_round();
            }
            self.barriers.copy.wait();
            ring.copy(self);
            self.barriers.run.wait();
        }

        ring.flush_pool(self);
        ring.publish(self);
        log::debug!(target: targets::CLONE, "Ring {id} finished");
        self.barriers.end.wait();
    }
}

impl<R: rand::Rng + rand::SeedableRng> GenericRing<R> {
    /// Offers a verdict to the ruler.
    pub fn offer_verdict(&mut self, ruler: &Ruler, report: Report) {
        let values = match report {
            Report::Satisfiable => Some(self.original_values(ruler.variable_count())),
            _ => None,
        };
        if !ruler.set_winner(self.id, report, values) {
            log::debug!(target: targets::RING, "Ring {}: verdict {report} found after the winner", self.id);
        }
    }

    /// Prepares the ring for a round of simplification, leaving the ring with no watch.
    pub fn unclone(&mut self, ruler: &Ruler) {
        if !self.backtrack_propagate_iterate(ruler) {
            ruler.set_inconsistent("ring inconsistent at level zero");
        }
        self.export_units(ruler);
        self.save_redundant();
        self.flush_pool(ruler);
        self.watches.release();
        log::debug!(target: targets::CLONE, "Ring {}: uncloned, saving {} clauses", self.id, self.saved.len());
    }

    /// Saves redundant clauses worth keeping through a round of simplification.
    fn save_redundant(&mut self) {
        self.saved.clear();
        let tier2 = self.config.tier2_glue_limit.value;

        for (code, list) in self.watches.lists.iter().enumerate() {
            let anchor = Literal::from_code(code as u32);
            for watch in list {
                if let Watch::Binary(clause) = watch {
                    if anchor < clause.other {
                        self.saved.push(ClauseRef::Binary(*clause));
                    }
                }
            }
        }

        for watcher in &self.watches.watchers {
            let clause = &watcher.clause;
            if watcher.redundant
                && !watcher.garbage
                && watcher.glue <= tier2
                && !clause.is_garbage()
                && !clause.is_vivified()
            {
                self.saved.push(ClauseRef::Large(clause.clone()));
            }
        }
    }

    /// Follows any compaction of the ruler, watches the formula, restores saved clauses, and imports units.
    pub fn copy(&mut self, ruler: &Ruler) {
        let compaction = ruler.compaction.lock().clone();
        if let Some(compaction) = compaction.as_deref() {
            self.compact(compaction);
        }

        let formula = ruler.formula.lock();
        debug_assert!(formula.size == self.size);
        self.watches = Watches::new(self.size, formula.binaries.clone());
        self.map = formula.map.clone();
        self.unmap = formula.unmap.clone();
        self.watch_formula_clauses(&formula.clauses);
        drop(formula);

        self.restore_saved(compaction.as_deref());
        self.import_units(ruler);
        log::debug!(target: targets::CLONE, "Ring {}: copied with {} watchers", self.id, self.watches.watchers.len());
    }

    fn restore_saved(&mut self, compaction: Option<&Compaction>) {
        let mut restored = 0;
        for clause in std::mem::take(&mut self.saved) {
            match clause {
                ClauseRef::Binary(binary) => {
                    let (anchor, other) = match compaction {
                        Some(compaction) => match (binary.anchor.mapped(&compaction.map), binary.other.mapped(&compaction.map)) {
                            (Some(anchor), Some(other)) => (anchor, other),
                            _ => continue,
                        },
                        None => (binary.anchor, binary.other),
                    };
                    if self.value(anchor) != 0 || self.value(other) != 0 {
                        continue;
                    }
                    self.watches.watch_binary(anchor, other);
                }

                ClauseRef::Large(large) => {
                    let large = match compaction {
                        Some(compaction) => match compaction.remap(&large) {
                            Some(remapped) => remapped,
                            None => continue,
                        },
                        None => large,
                    };
                    if large.is_garbage() || large.literals().iter().any(|literal| self.value(*literal) != 0) {
                        continue;
                    }
                    let literals = large.literals();
                    let (first, second) = (literals[0], literals[1]);
                    let glue = large.glue();
                    self.watches.watch_large(large.clone(), first, second, true, glue);
                }
            }
            restored += 1;
        }
        log::trace!(target: targets::CLONE, "Ring {}: restored {restored} clauses", self.id);
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        config::Config,
        ring::Ring,
        ruler::Ruler,
        structures::{clause::LargeClause, literal::Literal},
    };

    fn lit(external: i32) -> Literal {
        Literal::from_external(external).unwrap()
    }

    #[test]
    fn uncloning_saves_and_copying_restores() {
        let mut config = Config::default();
        config.simplify.value = false;
        let mut ruler = Ruler::from_config(config);
        ruler.add_clause(&[1, 2, 3, 4]).unwrap();
        ruler.add_clause(&[-1, -2, -3, -4]).unwrap();
        ruler.prepare();

        let mut ring = Ring::new(&ruler, 0);
        ring.watches.watch_binary(lit(1), lit(-2));
        let kept = LargeClause::new(&[lit(1), lit(2), lit(-3)], true, 2, 0);
        ring.watches.watch_large(kept, lit(1), lit(2), true, 2);
        let dropped = LargeClause::new(&[lit(2), lit(3), lit(-4)], true, 9, 0);
        ring.watches.watch_large(dropped, lit(2), lit(3), true, 9);

        ring.unclone(&ruler);
        assert_eq!(ring.saved.len(), 2);
        assert!(ring.watches.watchers.is_empty());

        ring.copy(&ruler);
        assert!(ring.saved.is_empty());
        assert!(ring.watches.contains_binary(lit(1), lit(-2)));
        assert_eq!(ring.watches.watchers.len(), 3);
        assert_eq!(ring.watches.watchers.iter().filter(|watcher| watcher.redundant).count(), 1);
    }
}
