/*!
Decisions.

# Overview

A decision chooses some unassigned variable, and some value for the variable, and assigns the variable at a fresh level.

The variable is chosen by:
- A random unassigned variable, while random decisions remain after a [switch of mode](crate::procedures::mode).
- The unassigned variable of highest score on the [index heap](crate::generic::index_heap), in stable mode.
- The latest unassigned variable on the [queue](crate::generic::queue), in focused mode.

The value is the target phase of the variable in stable mode, if target phases are used and the variable has a target phase.
Otherwise, the value is the saved phase of the variable.

# Bumping

Variables are bumped after each conflict by [analysis](crate::procedures::analysis), and bumping depends on the mode.
- In stable mode, the score of each variable is increased by the current increment on the heap, and the increment is then grown by the inverse of the decay factor.
  Scores are rescaled when exceeding the configured maximum.
- In focused mode, variables are moved to the end of the queue in order of their existing stamps, and so receive fresh stamps in the same relative order.
*/

use crate::{
    misc::log::targets::{self},
    ring::GenericRing,
    structures::literal::Literal,
};

impl<R: rand::Rng + rand::SeedableRng> GenericRing<R> {
    /// Makes a decision, if some variable is unassigned, and returns whether a decision was made.
    pub fn decide(&mut self) -> bool {
        let index = match self.limits.random_decisions > 0 {
            true => {
                self.limits.random_decisions -= 1;
                self.random_unassigned()
            }
            false => match self.stable {
                true => self.heap_unassigned(),
                false => self.queue_unassigned(),
            },
        };

        let Some(index) = index.or_else(|| self.first_unassigned()) else {
            return false;
        };

        let phases = self.phases[index];
        let phase = match self.stable && self.config.target_phases.value && phases.target != 0 {
            true => phases.target,
            false => phases.saved,
        };
        let literal = Literal::new(index as u32, phase < 0);

        self.level += 1;
        self.trail.level_starts.push(self.trail.len());
        if self.used_levels.len() <= self.level as usize {
            self.used_levels.resize(self.level as usize + 1, false);
        }

        log::trace!(target: targets::ASSIGN, "Ring {}: decision {literal} at level {}", self.id, self.level);
        self.statistics.context_mut(self.context).decisions += 1;
        self.assign_decision(literal);
        true
    }

    fn is_unassigned(&self, index: usize) -> bool {
        self.values[2 * index] == 0
    }

    /// An unassigned variable, chosen uniformly at random from the variables, with a linear scan from the chosen variable.
    fn random_unassigned(&mut self) -> Option<usize> {
        if self.unassigned == 0 {
            return None;
        }
        let start = self.rng.random_range(0..self.size);
        (start..self.size)
            .chain(0..start)
            .find(|index| self.is_unassigned(*index))
    }

    /// The unassigned variable of highest score, removing assigned variables from the heap.
    fn heap_unassigned(&mut self) -> Option<usize> {
        while let Some(index) = self.heap.peek_max() {
            if self.is_unassigned(index) {
                return Some(index);
            }
            self.heap.pop_max();
        }
        None
    }

    fn queue_unassigned(&mut self) -> Option<usize> {
        let values = &self.values;
        self.queue.next_unassigned(|index| values[2 * index] != 0)
    }

    fn first_unassigned(&self) -> Option<usize> {
        (0..self.size).find(|index| self.is_unassigned(*index))
    }
}

#[cfg(test)]
mod tests {
    use crate::{config::Config, ring::Ring, ruler::Ruler, structures::literal::Literal};

    fn ring_with(config: Config) -> (Ruler, Ring) {
        let mut ruler = Ruler::from_config(config);
        ruler.add_clause(&[1, 2, 3]).unwrap();
        ruler.add_clause(&[-1, -2, -3]).unwrap();
        ruler.prepare();
        let ring = Ring::new(&ruler, 0);
        (ruler, ring)
    }

    #[test]
    fn focused_decisions_follow_the_queue() {
        let mut config = Config::default();
        config.simplify.value = false;
        let (_ruler, mut ring) = ring_with(config);

        // The queue is enqueued in index order, and the search link is the last index.
        assert!(ring.decide());
        assert_eq!(ring.trail.literals, vec![Literal::new(2, false)]);
        assert!(ring.decide());
        assert_eq!(ring.trail.literals[1], Literal::new(1, false));
        assert_eq!(ring.level, 2);
        assert_eq!(ring.statistics.decisions(), 2);
    }

    #[test]
    fn stable_decisions_follow_scores_and_target_phases() {
        let mut config = Config::default();
        config.simplify.value = false;
        let (_ruler, mut ring) = ring_with(config);
        ring.stable = true;
        ring.heap.bump(1, 1e150);
        ring.phases[1].target = -1;

        assert!(ring.decide());
        assert_eq!(ring.trail.literals, vec![Literal::new(1, true)]);
    }

    #[test]
    fn nothing_to_decide() {
        let mut config = Config::default();
        config.simplify.value = false;
        let (_ruler, mut ring) = ring_with(config);
        ring.limits.random_decisions = 2;
        for _ in 0..3 {
            assert!(ring.decide());
        }
        assert_eq!(ring.unassigned, 0);
        assert!(!ring.decide());
        assert_eq!(ring.limits.random_decisions, 0);
    }
}
