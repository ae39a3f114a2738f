/*!
Scheduling of probing, which is failed literal probing followed by vivification.

Probing happens once the ring has reduced at least once since the last probe, and once the conflict limit is reached.
After each probe the limit is set to `probe_interval · nlogn(probings)` conflicts from the current count, with nlogn as in [nlogn](crate::generic::random::nlogn).

The effort of each part of a probe is measured in ticks of propagation during probing, and is bounded by a fraction of the ticks of search since the last probe.
*/

use crate::{
    generic::random::nlogn,
    misc::log::targets::{self},
    ring::{GenericRing, SearchContext},
    ruler::Ruler,
};

impl<R: rand::Rng + rand::SeedableRng> GenericRing<R> {
    /// Whether the ring should probe.
    pub fn probing(&self) -> bool {
        self.config.probe.value
            && self.statistics.reductions >= self.limits.probe_reductions
            && self.statistics.conflicts() > self.limits.probe
    }

    /// Probes for failed literals, then vivifies redundant clauses, and schedules the next probe.
    pub fn probe(&mut self, ruler: &Ruler) {
        self.context = SearchContext::Probing;
        self.statistics.probings += 1;
        log::debug!(target: targets::PROBE, "Ring {}: probe {}", self.id, self.statistics.probings);

        self.failed_literal_probing(ruler);
        self.vivify_clauses(ruler);

        self.context = SearchContext::Search;
        self.last.probing = self.statistics.search_ticks();

        let delta = self.config.probe_interval.value as f64 * nlogn(self.statistics.probings);
        self.limits.probe = self.statistics.conflicts() + delta as u64;
        self.limits.probe_reductions = self.statistics.reductions + 1;
        log::debug!(target: targets::PROBE, "Ring {}: next probe at {} conflicts", self.id, self.limits.probe);
    }

    /// Backtracks to level zero and propagates, exporting any fresh units.
    ///
    /// Returns false if the ring is inconsistent.
    pub fn backtrack_propagate_iterate(&mut self, ruler: &Ruler) -> bool {
        if self.level > 0 {
            self.backtrack(0);
        }
        if self.propagate(None).is_some() {
            self.set_inconsistent("propagation at level zero fails");
            return false;
        }
        if self.iterating {
            self.export_units(ruler);
        }
        true
    }
}
