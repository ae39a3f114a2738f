/*!
Reduction of the learnt clauses watched by a ring.

# Overview

A reduction collects a fraction of the redundant large clauses of a ring, and compacts the arena of watchers.

Candidates for collection are redundant watchers which:
- Are not the reason for an assignment on the trail.
- Are above tier one.
- Have not been used as a reason since the last reduction.
  A watcher which has been used instead has its use count decremented, so tier two watchers (noted with a use count of two) survive two reductions.

Candidates are ordered by glue, then size, and the configured fraction of the worst candidates is collected.
Independent of candidacy, non-reason watchers of clauses which are garbage (satisfied at the root) or which some ring has vivified are always collected.

Collected watchers are dropped from the arena, watch lists are compacted, and the keys of reasons on the trail are updated.

# Schedule

Reductions happen every `reduce_interval · √reductions` conflicts.
*/

use crate::{
    db::variable::Reason,
    misc::log::targets::{self},
    ring::GenericRing,
};

impl<R: rand::Rng + rand::SeedableRng> GenericRing<R> {
    pub fn reducing(&self) -> bool {
        self.statistics.conflicts() >= self.limits.reduce
    }

    pub fn reduce(&mut self) {
        self.statistics.reductions += 1;
        self.mark_reasons(true);

        let tier1 = self.config.tier1_glue_limit.value;
        let mut candidates = Vec::default();
        let mut collected = 0;

        for (key, watcher) in self.watches.watchers.iter_mut().enumerate() {
            if watcher.garbage || watcher.reason {
                continue;
            }
            if watcher.clause.is_garbage() || (watcher.redundant && watcher.clause.is_vivified()) {
                watcher.garbage = true;
                collected += 1;
                continue;
            }
            if !watcher.redundant || watcher.glue <= tier1 {
                continue;
            }
            if watcher.used > 0 {
                watcher.used -= 1;
                continue;
            }
            candidates.push((watcher.glue, watcher.clause.size(), key));
        }

        candidates.sort_unstable_by(|a, b| b.cmp(a));
        let target = (candidates.len() as f64 * self.config.reduce_fraction.value) as usize;
        for (_, _, key) in candidates.iter().take(target) {
            self.watches.watchers[*key].garbage = true;
            collected += 1;
        }

        self.mark_reasons(false);
        self.collect_watchers();

        self.statistics.collected += collected;
        let reductions = self.statistics.reductions as f64;
        self.limits.reduce = self.statistics.conflicts()
            + (self.config.reduce_interval.value as f64 * (reductions + 1.0).sqrt()) as u64;

        log::debug!(target: targets::REDUCE, "Ring {}: reduction {} collected {collected} of {} candidates", self.id, self.statistics.reductions, candidates.len());
    }

    /// Sets (or clears) the reason flag of every watcher which is a reason on the trail.
    fn mark_reasons(&mut self, reason: bool) {
        for literal in &self.trail.literals {
            if let Some(Reason::Large(key)) = self.variables[literal.var_index()].reason {
                self.watches.watchers[key].reason = reason;
            }
        }
    }

    /// Drops garbage watchers from the arena, and updates the keys of reasons on the trail.
    pub fn collect_watchers(&mut self) {
        let map = self.watches.compact_watchers(|watcher| !watcher.garbage);
        for literal in &self.trail.literals {
            let variable = &mut self.variables[literal.var_index()];
            if let Some(Reason::Large(key)) = variable.reason {
                match map[key] {
                    Some(fresh) => variable.reason = Some(Reason::Large(fresh)),
                    None => {
                        log::error!(target: targets::REDUCE, "Reason {key} collected");
                        variable.reason = None;
                    }
                }
            }
        }
    }
}
