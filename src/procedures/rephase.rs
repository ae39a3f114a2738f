//! Rephasing, i.e. resetting the saved phase of every variable.
//!
//! Saved phases are reset in the cycle best, original, best, inverted, where:
//! - *Best* phases are those of the longest trail seen since the last rephase, if any.
//! - *Original* phases are the initial phase.
//! - *Inverted* phases are the negation of the initial phase.
//!
//! After a rephase the target and best phases are cleared, so fresh targets are taken from the search that follows.

use crate::{misc::log::targets::{self}, ring::GenericRing};

/// The kinds of rephase, in the order cycled through.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rephase {
    Best,
    Original,
    Inverted,
}

const CYCLE: [Rephase; 4] = [Rephase::Best, Rephase::Original, Rephase::Best, Rephase::Inverted];

impl<R: rand::Rng + rand::SeedableRng> GenericRing<R> {
    pub fn rephasing(&self) -> bool {
        self.statistics.conflicts() >= self.limits.rephase
    }

    pub fn rephase(&mut self) {
        let kind = CYCLE[(self.statistics.rephased % CYCLE.len() as u64) as usize];
        let initial = self.config.initial_phase.value.value();

        for phases in self.phases.iter_mut() {
            match kind {
                Rephase::Best => {
                    if phases.best != 0 {
                        phases.saved = phases.best;
                    }
                }
                Rephase::Original => phases.saved = initial,
                Rephase::Inverted => phases.saved = -initial,
            }
            phases.best = 0;
            phases.target = 0;
        }
        self.best_assigned = 0;
        self.target_assigned = 0;

        self.statistics.rephased += 1;
        self.limits.rephase = self.statistics.conflicts()
            + self.config.rephase_interval.value * (self.statistics.rephased + 1);
        log::debug!(target: targets::REPHASE, "Ring {}: rephased {kind:?}, next at {} conflicts", self.id, self.limits.rephase);
    }
}

#[cfg(test)]
mod tests {
    use crate::{config::Config, ring::Ring, ruler::Ruler};

    #[test]
    fn rephase_cycle() {
        let mut config = Config::default();
        config.simplify.value = false;
        let mut ruler = Ruler::from_config(config);
        ruler.add_clause(&[1, 2, 3]).unwrap();
        ruler.prepare();
        let mut ring = Ring::new(&ruler, 0);

        ring.phases[0].best = -1;
        ring.phases[1].saved = -1;
        ring.rephase();
        assert_eq!(ring.phases[0].saved, -1);
        assert_eq!(ring.phases[1].saved, -1);
        assert_eq!(ring.phases[0].best, 0);

        ring.rephase();
        assert!(ring.phases.iter().all(|phases| phases.saved == 1));

        ring.rephase();
        ring.rephase();
        assert!(ring.phases.iter().all(|phases| phases.saved == -1));
        assert_eq!(ring.statistics.rephased, 4);
        assert_eq!(ring.limits.rephase, 5 * 1000);
    }
}
