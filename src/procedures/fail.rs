//! Failed literal probing.
//!
//! A literal is *failed* if assuming the literal at level one leads to a conflict, in which case the negation of the literal is a unit.
//!
//! Variables are probed round-robin from the probe cursor of the ring, which persists between probes, and both literals of each unassigned variable are tried.
//! Probing stops once the effort (a fraction of the search ticks since the last probe) is spent, or once every variable has been tried.

use crate::{
    misc::log::targets::{self},
    ring::GenericRing,
    ruler::Ruler,
    structures::literal::Literal,
};

impl<R: rand::Rng + rand::SeedableRng> GenericRing<R> {
    /// Probes unassigned literals, fixing the negation of each failed literal found.
    pub fn failed_literal_probing(&mut self, ruler: &Ruler) {
        if self.inconsistent || !self.config.fail.value || self.size == 0 {
            return;
        }
        if !self.backtrack_propagate_iterate(ruler) {
            return;
        }

        let delta_search = self
            .statistics
            .search_ticks()
            .saturating_sub(self.last.probing)
            .max(self.config.min_effort.value);
        let effort = (self.config.fail_effort.value * delta_search as f64) as u64;
        let limit = self.statistics.probing_ticks() + effort;

        let failed = self.statistics.failed;
        let mut probed = 0;
        while probed < self.size {
            if self.statistics.probing_ticks() > limit || self.terminating(ruler) {
                break;
            }

            if self.probe_cursor >= self.size {
                self.probe_cursor = 0;
            }
            let index = self.probe_cursor;
            self.probe_cursor += 1;
            probed += 1;

            for negative in [false, true] {
                let literal = Literal::new(index as u32, negative);
                if self.value(literal) != 0 {
                    continue;
                }
                self.probe_literal(literal);
                if self.inconsistent {
                    return;
                }
            }
        }

        if self.iterating {
            self.export_units(ruler);
        }
        log::debug!(target: targets::PROBE, "Ring {}: probed {probed} variables, with {} failed", self.id, self.statistics.failed - failed);
    }

    /// Assumes `literal` and propagates, returning whether the literal failed.
    fn probe_literal(&mut self, literal: Literal) -> bool {
        debug_assert!(self.level == 0);
        self.probe_decision(literal);
        let conflict = self.propagate(None);
        self.backtrack(0);
        if conflict.is_none() {
            return false;
        }

        log::trace!(target: targets::PROBE, "Ring {}: failed literal {literal}", self.id);
        self.statistics.failed += 1;
        self.assign_unit(!literal);
        if self.propagate(None).is_some() {
            self.set_inconsistent("propagation of the negation of a failed literal fails");
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        config::Config,
        ring::{Ring, SearchContext},
        ruler::Ruler,
        structures::literal::Literal,
    };

    fn ring_over(clauses: &[&[i32]]) -> (Ruler, Ring) {
        let mut config = Config::default();
        config.simplify.value = false;
        config.fail_effort.value = 1.0;
        let mut ruler = Ruler::from_config(config);
        for clause in clauses {
            ruler.add_clause(clause).unwrap();
        }
        ruler.prepare();
        let ring = Ring::new(&ruler, 0);
        (ruler, ring)
    }

    #[test]
    fn failed_literals_are_fixed() {
        // Assuming 1 forces both 2 and ¬2.
        let (ruler, mut ring) = ring_over(&[&[-1, 2], &[-1, -2], &[1, 3, 4]]);
        ring.context = SearchContext::Probing;
        ring.failed_literal_probing(&ruler);
        ring.context = SearchContext::Search;

        assert_eq!(ring.level, 0);
        assert_eq!(ring.value(Literal::new(0, true)), 1);
        assert!(ring.statistics.failed >= 1);
        assert_eq!(ruler.units.lock().value(Literal::new(0, true)), 1);
    }

    #[test]
    fn failing_both_ways_is_inconsistent() {
        let (ruler, mut ring) = ring_over(&[&[-1, 2], &[-1, -2], &[1, 3], &[1, -3]]);
        ring.context = SearchContext::Probing;
        ring.failed_literal_probing(&ruler);
        assert!(ring.inconsistent);
    }

    #[test]
    fn nothing_fails_on_free_clauses() {
        let (ruler, mut ring) = ring_over(&[&[1, 2, 3], &[-1, -2, -3]]);
        ring.context = SearchContext::Probing;
        ring.failed_literal_probing(&ruler);
        assert_eq!(ring.statistics.failed, 0);
        assert_eq!(ring.unassigned, 3);
        assert_eq!(ring.probe_cursor, 3);
    }
}
