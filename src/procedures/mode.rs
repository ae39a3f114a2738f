/*!
Switching between focused and stable mode.

# Overview

A ring begins in focused mode, and alternates between focused and stable mode.

- Focused mode decides on the [queue](crate::generic::queue) and restarts often, guided by glue averages.
- Stable mode decides on the [heap](crate::generic::index_heap), uses target phases, and restarts rarely, following the luby sequence.

# Schedule

The first switch happens after a fixed count of conflicts.
The ticks of search up to the first switch are taken as the base interval, and every later switch happens after `(switched / 2 + 1)²` base intervals of search ticks since the previous switch.
So, each pair of modes receives a roughly equal count of ticks, and switches become rarer as the solve continues.

On a switch, the decision structure of the fresh mode is reset, the restart limit is set for the fresh mode, and a handful of random decisions are scheduled.
Averages are kept for each mode, and are not reset.
*/

use crate::{misc::log::targets::{self}, ring::GenericRing};

impl<R: rand::Rng + rand::SeedableRng> GenericRing<R> {
    /// Whether the ring should switch mode.
    pub fn switching_mode(&self) -> bool {
        match self.statistics.switched {
            0 => self.statistics.conflicts() >= self.limits.mode,
            _ => self.statistics.search_ticks() >= self.limits.mode,
        }
    }

    /// Switches from focused to stable mode, or from stable to focused mode.
    pub fn switch_mode(&mut self) {
        let ticks = self.statistics.search_ticks();
        if self.statistics.switched == 0 {
            self.mode_interval = ticks.max(1);
            log::debug!(target: targets::MODE, "Ring {}: mode switching interval of {} ticks", self.id, self.mode_interval);
        }
        self.statistics.switched += 1;

        let conflicts = self.statistics.conflicts();
        match self.stable {
            true => {
                self.stable = false;
                self.queue.reset_search();
                self.limits.restart = conflicts + self.config.focused_restart_interval.value;
            }

            false => {
                self.stable = true;
                let values = &self.values;
                self.heap.rebuild(|index| values[2 * index] == 0);
                self.luby.reset();
                self.limits.restart =
                    conflicts + self.config.stable_restart_interval.value * self.luby.current();
            }
        }

        let scale = self.statistics.switched / 2 + 1;
        self.limits.mode = ticks + scale * scale * self.mode_interval;
        self.limits.random_decisions = self.config.random_decisions.value;
        self.last.switched = ticks;

        log::debug!(target: targets::MODE, "Ring {}: switched to {} mode, next switch at {} ticks", self.id,
            match self.stable { true => "stable", false => "focused" },
            self.limits.mode
        );
    }
}

#[cfg(test)]
mod tests {
    use crate::{config::Config, ring::Ring, ruler::Ruler};

    fn ring() -> (Ruler, Ring) {
        let mut config = Config::default();
        config.simplify.value = false;
        config.mode_interval.value = 10;
        let mut ruler = Ruler::from_config(config);
        ruler.add_clause(&[1, 2, 3]).unwrap();
        ruler.prepare();
        let ring = Ring::new(&ruler, 0);
        (ruler, ring)
    }

    #[test]
    fn first_switch_is_by_conflicts() {
        let (_ruler, mut ring) = ring();
        assert!(!ring.switching_mode());
        ring.statistics.contexts[0].conflicts = 10;
        ring.statistics.contexts[0].ticks = 400;
        assert!(ring.switching_mode());

        ring.switch_mode();
        assert!(ring.stable);
        assert_eq!(ring.mode_interval, 400);
        assert_eq!(ring.limits.mode, 400 + 400);
        assert_eq!(ring.heap.len(), 3);
        assert_eq!(ring.limits.restart, 10 + 1024);
    }

    #[test]
    fn later_switches_are_by_ticks() {
        let (_ruler, mut ring) = ring();
        ring.statistics.contexts[0].conflicts = 10;
        ring.statistics.contexts[0].ticks = 100;
        ring.switch_mode();

        ring.statistics.contexts[0].conflicts = 1_000_000;
        assert!(!ring.switching_mode());
        ring.statistics.contexts[0].ticks = 500;
        assert!(ring.switching_mode());

        ring.switch_mode();
        assert!(!ring.stable);
        assert_eq!(ring.limits.mode, 500 + 4 * 100);
        assert_eq!(ring.limits.restart, 1_000_000 + 50);
        assert_eq!(ring.limits.random_decisions, 100);
    }
}
