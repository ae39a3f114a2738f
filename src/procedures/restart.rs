/*!
Restarts.

# Overview

A restart backtracks towards level zero, keeping the heuristic state of the ring (scores, stamps, phases) while discarding the current assignment.

In focused mode a restart is made once the restart interval has passed and the fast glue average exceeds the slow glue average by the configured margin, i.e. when recently learnt clauses are worse than usual.
In stable mode a restart is made whenever the restart interval has passed, where the interval follows the luby sequence.

# Trail reuse

Restarting to level zero would often make the same decisions again.
So, a restart only backtracks to the lowest level whose decision is less preferred than the variable which would be decided next, and each level kept is counted as reused.
*/

use crate::{misc::log::targets::{self}, ring::GenericRing};

impl<R: rand::Rng + rand::SeedableRng> GenericRing<R> {
    /// Whether the ring should restart.
    pub fn restarting(&self) -> bool {
        if self.level == 0 || self.statistics.conflicts() < self.limits.restart {
            return false;
        }
        if self.stable {
            return true;
        }
        let glue = &self.averages().glue;
        glue.fast.value() > self.config.restart_margin.value * glue.slow.value()
    }

    pub fn restart(&mut self) {
        self.statistics.restarts += 1;

        let target = self.reuse_trail();
        self.statistics.reused_levels += target as u64;
        log::trace!(target: targets::RESTART, "Ring {}: restart from level {} to {target}", self.id, self.level);
        self.backtrack(target);
        self.update_trail_average();

        let conflicts = self.statistics.conflicts();
        self.limits.restart = match self.stable {
            true => {
                let luby = self.luby.next().unwrap_or(1);
                conflicts + self.config.stable_restart_interval.value * luby
            }
            false => conflicts + self.config.focused_restart_interval.value,
        };
    }

    /// The level to backtrack to on a restart.
    fn reuse_trail(&mut self) -> u32 {
        match self.stable {
            true => {
                let next = loop {
                    match self.heap.peek_max() {
                        None => return 0,
                        Some(index) if self.values[2 * index] == 0 => break index,
                        Some(_) => {
                            self.heap.pop_max();
                        }
                    }
                };
                let score = self.heap.score(next);
                let mut reuse = 0;
                while reuse < self.level {
                    let decision = self.trail.decision(reuse + 1);
                    if self.heap.score(decision.var_index()) < score {
                        break;
                    }
                    reuse += 1;
                }
                reuse
            }

            false => {
                let values = &self.values;
                let Some(next) = self.queue.next_unassigned(|index| values[2 * index] != 0) else {
                    return 0;
                };
                let stamp = self.queue.stamp(next);
                let mut reuse = 0;
                while reuse < self.level {
                    let decision = self.trail.decision(reuse + 1);
                    if self.queue.stamp(decision.var_index()) < stamp {
                        break;
                    }
                    reuse += 1;
                }
                reuse
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{config::Config, ring::Ring, ruler::Ruler, structures::literal::Literal};

    fn ring() -> (Ruler, Ring) {
        let mut config = Config::default();
        config.simplify.value = false;
        let mut ruler = Ruler::from_config(config);
        ruler.add_clause(&[1, 2, 3, 4]).unwrap();
        ruler.add_clause(&[-1, -2, -3, -4]).unwrap();
        ruler.prepare();
        let ring = Ring::new(&ruler, 0);
        (ruler, ring)
    }

    fn decide(ring: &mut Ring, literal: Literal) {
        ring.level += 1;
        ring.trail.level_starts.push(ring.trail.len());
        ring.assign_decision(literal);
    }

    #[test]
    fn focused_restarts_need_worse_glue() {
        let (_ruler, mut ring) = ring();
        decide(&mut ring, Literal::new(0, false));
        ring.statistics.contexts[0].conflicts = ring.limits.restart;
        assert!(!ring.restarting());

        for _ in 0..10 {
            ring.averages_mut().glue.update(2.0);
        }
        ring.averages_mut().glue.fast.update(50.0);
        assert!(ring.restarting());
    }

    #[test]
    fn stable_trail_reuse() {
        let (_ruler, mut ring) = ring();
        ring.stable = true;
        for (index, bumps) in [(0, 3), (1, 2), (2, 1)] {
            for _ in 0..bumps {
                ring.heap.bump(index, 1e150);
            }
        }
        decide(&mut ring, Literal::new(0, false));
        decide(&mut ring, Literal::new(3, false));

        // Variable 1 is next, and outranks the decision of level two but not level one.
        ring.restart();
        assert_eq!(ring.level, 1);
        assert_eq!(ring.statistics.reused_levels, 1);
        assert_eq!(ring.statistics.restarts, 1);
    }
}
