/*!
Export of learnt clauses to peers, of units to the ruler, and of clauses to an external consumer.

# Peers

A ring exports when there are at least two rings and sharing is enabled.
The peers a clause is offered to follow the [export policy](crate::config::ExportPolicy):
- A single random peer.
- ⌈log₂ n⌉ distinct random peers, for n rings.
- Every peer.

Each peer is offered the clause through the [grid](crate::pool::Grid), which places the clause in an empty bucket, or in place of the bucket of worst rank if the clause is better.
A clause is shared, not copied, and so an offer of a large clause to several peers is an offer of the same [Arc].

Binary clauses are always exported.
Large clauses are exported if of tier one, or if both the glue is at most half the slow glue average and the size is at most the size average.

# Units

Units are exported to the unit trail of the ruler, under its lock.
Units already on the trail of the ruler are skipped, and a unit whose negation is on the trail of the ruler makes the ruler inconsistent.

# External consumer

If a consumer is installed, each clause learnt or imported from a peer is passed to the consumer in the original index space, if at most the configured size.
The glue passed to the consumer is clamped to between one and the size of the clause less one, with units given glue one.
*/

use std::sync::atomic::Ordering;

use crate::{
    config::ExportPolicy,
    generic::random::{log2ceil, random_other},
    misc::log::targets::{self},
    pool::PutResult,
    ring::GenericRing,
    ruler::Ruler,
    structures::{clause::ClauseRef, literal::Literal},
};

impl<R: rand::Rng + rand::SeedableRng> GenericRing<R> {
    /// Whether the ring exports clauses to peers.
    pub fn exporting(&self) -> bool {
        self.rings > 1 && self.config.share_learned.value
    }

    /// The peers to export a clause to, following the export policy.
    fn export_peers(&mut self) -> Vec<usize> {
        match self.config.export_policy.value {
            ExportPolicy::Single => vec![random_other(&mut self.rng, self.id, self.rings)],

            ExportPolicy::Logarithmic => {
                let target = log2ceil(self.rings).clamp(1, self.rings - 1);
                let mut peers = Vec::with_capacity(target);
                while peers.len() < target {
                    let peer = random_other(&mut self.rng, self.id, self.rings);
                    if !peers.contains(&peer) {
                        peers.push(peer);
                    }
                }
                peers
            }

            ExportPolicy::All => (0..self.rings).filter(|peer| *peer != self.id).collect(),
        }
    }

    /// Exports a freshly learnt clause to peers, if eligible.
    pub fn export_clause(&mut self, ruler: &Ruler, clause: &ClauseRef) {
        if !self.exporting() {
            return;
        }

        if let ClauseRef::Large(large) = clause {
            let glue = large.glue();
            if glue > self.config.tier1_glue_limit.value {
                let averages = self.averages();
                let glue_limit = 0.5 * averages.glue.slow.value();
                if glue as f64 > glue_limit {
                    log::trace!(target: targets::EXPORT, "Ring {}: not exporting {large} (glue above {glue_limit})", self.id);
                    return;
                }
                let size_limit = averages.size.value();
                if large.size() as f64 > size_limit {
                    log::trace!(target: targets::EXPORT, "Ring {}: not exporting {large} (size above {size_limit})", self.id);
                    return;
                }
            }
        }

        self.export_to_peers(ruler, clause);
    }

    /// Offers `clause` to peers, without checks on the quality of the clause.
    pub fn export_to_peers(&mut self, ruler: &Ruler, clause: &ClauseRef) {
        if !self.exporting() {
            return;
        }

        let redundancy = clause.redundancy(self.config.share_by_size.value);
        for peer in self.export_peers() {
            match ruler.pool.put(self.id, peer, clause.clone(), redundancy) {
                PutResult::Placed => {}
                PutResult::Displaced => self.statistics.export_drops.displaced += 1,
                PutResult::Dropped => {
                    log::trace!(target: targets::EXPORT, "Ring {}: export to {peer} dropped", self.id);
                    self.statistics.export_drops.dropped += 1;
                    continue;
                }
            }
            match clause {
                ClauseRef::Binary(_) => self.statistics.exported.binary += 1,
                ClauseRef::Large(_) => self.statistics.exported.large += 1,
            }
        }
    }

    /// Exports units fixed by the ring to the unit trail of the ruler.
    pub fn export_units(&mut self, ruler: &Ruler) {
        if self.exported_units == self.units.len() {
            self.iterating = false;
            return;
        }

        let mut fresh = Vec::default();
        {
            let mut ruler_units = ruler.units.lock();
            for unit in &self.units[self.exported_units..] {
                match ruler_units.value(*unit) {
                    1 => {}
                    -1 => {
                        ruler.set_inconsistent("exported unit contradicts a fixed unit");
                        break;
                    }
                    _ => {
                        ruler_units.push(*unit);
                        fresh.push(*unit);
                    }
                }
            }
        }
        ruler.fixed_count.fetch_add(fresh.len() as u64, Ordering::Relaxed);
        self.exported_units = self.units.len();
        self.iterating = false;

        for unit in fresh {
            log::trace!(target: targets::EXPORT, "Ring {}: exported unit {unit}", self.id);
            self.statistics.exported.units += 1;
            self.export_external(ruler, &[unit], 1);
        }
    }

    /// Passes `literals` to the external consumer, if installed and the clause is small enough.
    pub fn export_external(&mut self, ruler: &Ruler, literals: &[Literal], glue: u32) {
        let external = &ruler.external;
        if !external.has_consumer || literals.len() > external.max_size {
            return;
        }

        let size = literals.len() as u32;
        let glue = glue.max(1).min(size.saturating_sub(1).max(1));
        let clause = literals
            .iter()
            .map(|literal| self.external(*literal))
            .collect::<Vec<_>>();

        if let Some(consume) = external.consume.lock().as_mut() {
            consume(&clause, glue, self.id);
            external.exported.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Releases every clause the ring has offered to peers, which have not been taken.
    pub fn flush_pool(&mut self, ruler: &Ruler) {
        let flushed = ruler.pool.flush(self.id);
        self.statistics.flushed += flushed as u64;
        log::trace!(target: targets::EXPORT, "Ring {}: flushed {flushed} clauses", self.id);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use crate::{
        config::{Config, ExportPolicy},
        ring::Ring,
        ruler::Ruler,
        structures::{clause::ClauseRef, literal::Literal},
    };

    fn ruler(threads: usize, policy: ExportPolicy) -> Ruler {
        let mut config = Config::with_threads(threads);
        config.simplify.value = false;
        config.export_policy.value = policy;
        let mut ruler = Ruler::from_config(config);
        ruler.add_clause(&[1, 2, 3]).unwrap();
        ruler.add_clause(&[-1, -2, -3]).unwrap();
        ruler.prepare();
        ruler
    }

    #[test]
    fn logarithmic_peers_are_distinct() {
        let ruler = ruler(9, ExportPolicy::Logarithmic);
        let mut ring = Ring::new(&ruler, 4);
        for _ in 0..20 {
            let mut peers = ring.export_peers();
            assert_eq!(peers.len(), 4);
            assert!(!peers.contains(&4));
            peers.sort_unstable();
            peers.dedup();
            assert_eq!(peers.len(), 4);
        }
    }

    #[test]
    fn binary_clauses_reach_every_peer() {
        let ruler = ruler(3, ExportPolicy::All);
        let mut ring = Ring::new(&ruler, 0);
        let clause = ClauseRef::binary(Literal::new(0, false), Literal::new(1, true), true);
        ring.export_clause(&ruler, &clause);
        assert_eq!(ring.statistics.exported.binary, 2);
        assert!(ruler.pool.take(0, 1).is_some());
        assert!(ruler.pool.take(0, 2).is_some());
        assert!(ruler.pool.take(0, 1).is_none());
    }

    #[test]
    fn units_reach_the_ruler_and_consumer() {
        let mut ruler = ruler(2, ExportPolicy::All);
        let consumed = Arc::new(Mutex::new(Vec::default()));
        let sink = consumed.clone();
        ruler.set_consume_clause(8, move |literals, glue, ring| {
            sink.lock().unwrap().push((literals.to_vec(), glue, ring));
        });

        let mut ring = Ring::new(&ruler, 1);
        ring.assign_unit(Literal::new(2, true));
        ring.export_units(&ruler);
        ring.export_units(&ruler);

        assert_eq!(ruler.units.lock().literals, vec![Literal::new(2, true)]);
        assert_eq!(ruler.statistics().fixed, 1);
        assert_eq!(*consumed.lock().unwrap(), vec![(vec![-3], 1, 1)]);
        assert!(!ring.iterating);
    }
}
