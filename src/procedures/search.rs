/*!
The search loop of a ring.

# Overview

Each pass of the loop propagates, and on a conflict analyzes the conflict.
Otherwise, the first of the following which applies is done:

- With no unassigned variable the formula is satisfied.
- Fresh units are exported to the ruler.
- The loop ends, if some ring has found a verdict, a limit was reached, or simplification was requested.
- Learnt clauses are reduced.
- The ring restarts.
- The mode is switched.
- Phases are reset.
- The ring probes.
- Clauses are requested from an external producer.
- Clauses are imported from peers.
- A decision is made.

The first ring also requests rounds of simplification, every `simplify_interval · nlogn(simplifications)` conflicts.

The loop returns an [outcome](SearchOutcome), which is handled by the [lifecycle](crate::procedures::clone) of the ring.
*/

use std::sync::atomic::Ordering;

use crate::{
    generic::random::nlogn,
    misc::log::targets::{self},
    reports::Report,
    ring::{GenericRing, SearchOutcome},
    ruler::Ruler,
};

impl<R: rand::Rng + rand::SeedableRng> GenericRing<R> {
    /// Searches until a verdict, or until asked to stop.
    pub fn search(&mut self, ruler: &Ruler) -> SearchOutcome {
        log::debug!(target: targets::RING, "Ring {}: searching with {} unassigned variables", self.id, self.unassigned);

        let outcome = loop {
            if self.inconsistent || ruler.is_inconsistent() {
                break SearchOutcome::Verdict(Report::Unsatisfiable);
            }

            if let Some(conflict) = self.propagate(None) {
                self.analyze(ruler, conflict);
                continue;
            }

            if self.unassigned == 0 {
                break SearchOutcome::Verdict(Report::Satisfiable);
            }

            if self.iterating {
                self.export_units(ruler);
            } else if self.terminating(ruler) {
                match ruler.simplify.load(Ordering::Relaxed) && !ruler.terminate.load(Ordering::Relaxed) {
                    true => break SearchOutcome::Simplify,
                    false => break SearchOutcome::Terminated,
                }
            } else if self.requesting_simplification() {
                self.request_simplification(ruler);
            } else if self.reducing() {
                self.reduce();
            } else if self.restarting() {
                self.restart();
                self.publish(ruler);
            } else if self.switching_mode() {
                self.switch_mode();
            } else if self.rephasing() {
                self.rephase();
            } else if self.probing() {
                self.probe(ruler);
            } else if self.importing_external(ruler) {
                self.import_external(ruler);
            } else if !self.import_shared(ruler) {
                self.decide();
            }
        };

        self.publish(ruler);
        log::debug!(target: targets::RING, "Ring {}: search ends with {outcome:?}", self.id);
        outcome
    }

    /// Whether the ring should request a round of simplification, which only the first ring does.
    fn requesting_simplification(&self) -> bool {
        self.id == 0 && self.config.simplify.value && self.statistics.conflicts() >= self.limits.simplify
    }

    fn request_simplification(&mut self, ruler: &Ruler) {
        let rounds = ruler.formula.lock().simplifications;
        let delta = self.config.simplify_interval.value as f64 * nlogn(rounds + 1);
        self.limits.simplify = self.statistics.conflicts() + delta as u64;
        log::info!(target: targets::SIMPLIFY, "Ring {}: requesting simplification, next at {} conflicts", self.id, self.limits.simplify);
        ruler.simplify.store(true, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        config::Config,
        reports::Report,
        ring::{Ring, SearchOutcome},
        ruler::Ruler,
    };

    fn ring_over(clauses: &[&[i32]]) -> (Ruler, Ring) {
        let mut config = Config::default();
        config.simplify.value = false;
        let mut ruler = Ruler::from_config(config);
        for clause in clauses {
            ruler.add_clause(clause).unwrap();
        }
        ruler.prepare();
        let ring = Ring::new(&ruler, 0);
        (ruler, ring)
    }

    #[test]
    fn satisfiable_search() {
        let (ruler, mut ring) = ring_over(&[&[1, 2], &[-1, 2], &[-2, 3, 4], &[-3, -4]]);
        assert_eq!(ring.search(&ruler), SearchOutcome::Verdict(Report::Satisfiable));
        assert_eq!(ring.unassigned, 0);
        assert_eq!(ring.value(crate::structures::literal::Literal::from_external(2).unwrap()), 1);
    }

    #[test]
    fn unsatisfiable_search() {
        let (ruler, mut ring) = ring_over(&[&[1, 2], &[-1, 2], &[1, -2], &[-1, -2]]);
        assert_eq!(ring.search(&ruler), SearchOutcome::Verdict(Report::Unsatisfiable));
    }

    #[test]
    fn termination_is_observed() {
        let (ruler, mut ring) = ring_over(&[&[1, 2, 3], &[-1, -2, -3]]);
        ruler.terminate.store(true, std::sync::atomic::Ordering::Relaxed);
        assert_eq!(ring.search(&ruler), SearchOutcome::Terminated);
    }
}
