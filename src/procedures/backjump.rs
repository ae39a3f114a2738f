//! Backtracking to a lower decision level.
//!
//! # Overview
//!
//! A backjump to level *t* unassigns every literal assigned at a level above *t*.
//!
//! As assignments may be [out of order](crate::db::trail), literals of level *t* or lower may sit above the start of level *t + 1* on the trail.
//! These are kept, and moved down the trail, preserving their relative order.
//! The propagate cursor is moved to the start of the kept literals, so kept literals are propagated again.
//!
//! Unassigned variables are returned to the decision structure of the current mode, i.e. pushed back onto the heap in stable mode, and noted as candidates for the search link of the queue in focused mode.
//!
//! Before any literal is unassigned, the target and best phases are [updated](GenericRing::update_phases) if the trail is longer than at the last update.

use crate::{misc::log::targets::{self}, ring::GenericRing};

impl<R: rand::Rng + rand::SeedableRng> GenericRing<R> {
    /// Backtracks to `target`, which is expected to be at most the current level.
    ///
    /// A target at or above the current level does nothing.
    pub fn backtrack(&mut self, target: u32) {
        if target >= self.level {
            return;
        }
        log::trace!(target: targets::BACKJUMP, "Ring {}: backtrack from {} to {target}", self.id, self.level);

        self.update_phases();

        let start = self.trail.level_starts[target as usize];
        let mut kept = start;

        for position in start..self.trail.literals.len() {
            let literal = self.trail.literals[position];
            let index = literal.var_index();
            let level = self.variables[index].level;

            if level > target {
                self.values[literal.index()] = 0;
                self.values[(!literal).index()] = 0;
                self.unassigned += 1;
                match self.stable {
                    true => {
                        if !self.heap.contains(index) {
                            self.heap.push(index);
                        }
                    }
                    false => self.queue.update_search(index),
                }
            } else {
                self.trail.literals[kept] = literal;
                self.trail.positions[index] = kept;
                kept += 1;
            }
        }

        self.trail.literals.truncate(kept);
        self.trail.level_starts.truncate(target as usize);
        self.trail.propagate = self.trail.propagate.min(start);
        self.level = target;
    }

    /// The highest level of `literals` other than `skip`, i.e. the level an asserting clause jumps to.
    pub fn jump_level(&self, literals: &[crate::structures::literal::Literal], skip: usize) -> u32 {
        literals
            .iter()
            .enumerate()
            .filter(|(position, _)| *position != skip)
            .map(|(_, literal)| self.level_of(*literal))
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        config::Config, db::variable::Reason, ring::Ring, ruler::Ruler,
        structures::{clause::BinaryClause, literal::Literal},
    };

    fn lit(external: i32) -> Literal {
        Literal::from_external(external).unwrap()
    }

    #[test]
    fn out_of_order_literals_are_kept() {
        let mut config = Config::default();
        config.simplify.value = false;
        let mut ruler = Ruler::from_config(config);
        ruler.add_clause(&[1, 2, 3, 4]).unwrap();
        ruler.add_clause(&[-1, -2, -3, -4]).unwrap();
        ruler.prepare();
        let mut ring = Ring::new(&ruler, 0);

        ring.level = 1;
        ring.trail.level_starts.push(ring.trail.len());
        ring.assign_decision(lit(1));

        ring.level = 2;
        ring.trail.level_starts.push(ring.trail.len());
        ring.assign_decision(lit(2));

        // Implied by the first decision alone, though assigned at level two.
        ring.assign_with_reason(lit(3), Reason::Binary(BinaryClause::new(lit(3), lit(-1), true)));
        assert_eq!(ring.level_of(lit(3)), 1);

        ring.trail.propagate = ring.trail.len();
        ring.backtrack(1);

        assert_eq!(ring.level, 1);
        assert_eq!(ring.trail.literals, vec![lit(1), lit(3)]);
        assert_eq!(ring.trail.positions[2], 1);
        assert_eq!(ring.value(lit(2)), 0);
        assert_eq!(ring.value(lit(3)), 1);
        assert_eq!(ring.trail.propagate, 1);
        assert_eq!(ring.unassigned, 2);
    }
}
