/*!
Assignment of values to literals.

# Overview

Every assignment goes through [assign](GenericRing::assign), which:
- Sets the value of the literal and its negation.
- Computes the *assignment level* of the literal.
- Records the reason for the assignment, unless the literal is fixed.
- Saves the phase of the variable, unless the ring is probing.
- Appends the literal to the trail.

# Assignment levels

- A decision is assigned at the current level.
- A unit is assigned at level zero.
- A literal propagated by a large clause is assigned at the maximum level of the other (false) literals of the clause.
  This may be lower than the current level, in which case the assignment is *out of order*.
- A literal propagated by a binary clause is assigned at the level of the other literal.
  If the other literal was itself propagated by a binary clause, the reason is replaced by the resolvent of the two clauses.
  This shortens chains of binary implications during analysis, and the resolvent is redundant if either clause is.

A literal assigned at level zero is fixed, and is queued for [export](crate::procedures::export) to the ruler.
*/

use crate::{
    db::variable::Reason,
    generic::ema::Average,
    misc::log::targets::{self},
    ring::{GenericRing, SearchContext},
    structures::{clause::BinaryClause, literal::Literal},
};

impl<R: rand::Rng + rand::SeedableRng> GenericRing<R> {
    /// Assigns `literal` as a decision, at the current level.
    pub fn assign_decision(&mut self, literal: Literal) {
        let level = self.level;
        self.assign(literal, level, None);
    }

    /// Assigns `literal` at level zero.
    pub fn assign_unit(&mut self, literal: Literal) {
        self.assign(literal, 0, None);
    }

    /// Assigns `literal` with the given reason, at the level derived from the reason.
    pub fn assign_with_reason(&mut self, literal: Literal, reason: Reason) {
        let (level, reason) = match reason {
            Reason::Binary(clause) => self.binary_assignment_level(clause),

            Reason::Large(key) => {
                let mut level = 0;
                for other in self.watches.watchers[key].literals() {
                    if *other != literal {
                        level = level.max(self.variables[other.var_index()].level);
                    }
                }
                (level, reason)
            }
        };
        self.assign(literal, level, Some(reason))
    }

    /// The level of a binary implication, and the reason to record, jumping over a binary reason of the other literal.
    fn binary_assignment_level(&self, clause: BinaryClause) -> (u32, Reason) {
        debug_assert!(self.value(clause.other) < 0);
        let other = &self.variables[clause.other.var_index()];
        let level = other.level;
        if level > 0 {
            if let Some(Reason::Binary(other_reason)) = other.reason {
                debug_assert!(other_reason.anchor == !clause.other);
                let jumped = BinaryClause::new(
                    clause.anchor,
                    other_reason.other,
                    clause.redundant || other_reason.redundant,
                );
                return (level, Reason::Binary(jumped));
            }
        }
        (level, Reason::Binary(clause))
    }

    fn assign(&mut self, literal: Literal, level: u32, reason: Option<Reason>) {
        debug_assert!(self.values[literal.index()] == 0);
        debug_assert!(self.values[(!literal).index()] == 0);

        let index = literal.var_index();

        if level < self.level && reason.is_some() {
            log::trace!(target: targets::ASSIGN, "Ring {}: out of order assignment of {literal} at level {level} below {}", self.id, self.level);
        }

        let variable = &mut self.variables[index];
        variable.level = level;
        match level {
            0 => {
                variable.reason = None;
                self.units.push(literal);
                self.iterating = true;
                self.statistics.fixed += 1;
                log::trace!(target: targets::ASSIGN, "Ring {}: fixed {literal}", self.id);
            }
            _ => variable.reason = reason,
        }

        self.values[literal.index()] = 1;
        self.values[(!literal).index()] = -1;

        if self.context != SearchContext::Probing {
            self.phases[index].saved = match literal.is_negative() {
                true => -1,
                false => 1,
            };
        }

        self.trail.push(literal);
        self.unassigned -= 1;
    }

    /// Updates the target and best phases, if the trail is longer than at their last update.
    ///
    /// Called before backtracking, outside of probing.
    pub fn update_phases(&mut self) {
        if self.context == SearchContext::Probing {
            return;
        }
        let assigned = self.trail.len();
        if self.stable && assigned > self.target_assigned {
            for literal in &self.trail.literals {
                self.phases[literal.var_index()].target = match literal.is_negative() {
                    true => -1,
                    false => 1,
                };
            }
            self.target_assigned = assigned;
        }
        if assigned > self.best_assigned {
            for literal in &self.trail.literals {
                self.phases[literal.var_index()].best = match literal.is_negative() {
                    true => -1,
                    false => 1,
                };
            }
            self.best_assigned = assigned;
        }
    }

    /// Updates averages with the size of the trail.
    pub fn update_trail_average(&mut self) {
        let assigned = self.trail.len() as f64;
        let average: &mut Average = &mut self.averages_mut().trail;
        average.update(assigned);
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        config::Config,
        db::variable::Reason,
        ring::Ring,
        ruler::Ruler,
        structures::{clause::BinaryClause, literal::Literal},
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

    fn lit(external: i32) -> Literal {
        Literal::from_external(external).unwrap()
    }

    #[test]
    fn values_are_paired() {
        let (_ruler, mut ring) = ring_over(&[&[1, 2, 3], &[-1, -2, -3]]);
        for literal in [lit(1), lit(-1), lit(2), lit(-2)] {
            assert_eq!(ring.value(literal), 0);
        }

        ring.level = 1;
        ring.trail.level_starts.push(0);
        ring.assign_decision(lit(-2));
        assert_eq!(ring.value(lit(-2)), 1);
        assert_eq!(ring.value(lit(2)), -1);
        assert_eq!(ring.level_of(lit(2)), 1);
        assert_eq!(ring.unassigned, 2);
        assert_eq!(ring.phases[1].saved, -1);
    }

    #[test]
    fn binary_reasons_jump() {
        let (_ruler, mut ring) = ring_over(&[&[1, 2, 3], &[-1, -2, -3]]);
        ring.level = 1;
        ring.trail.level_starts.push(0);
        ring.assign_decision(lit(1));

        // (¬1 ∨ 2), then (¬2 ∨ 3)
        ring.assign_with_reason(lit(2), Reason::Binary(BinaryClause::new(lit(2), lit(-1), false)));
        ring.assign_with_reason(lit(3), Reason::Binary(BinaryClause::new(lit(3), lit(-2), true)));

        assert_eq!(ring.level_of(lit(3)), 1);
        assert_eq!(
            ring.variables[2].reason,
            Some(Reason::Binary(BinaryClause::new(lit(3), lit(-1), true)))
        );
    }

    #[test]
    fn level_zero_assignments_are_units() {
        let (_ruler, mut ring) = ring_over(&[&[1, 2, 3], &[-1, -2, -3]]);
        ring.assign_unit(lit(-3));
        ring.level = 1;
        ring.trail.level_starts.push(1);
        ring.assign_with_reason(lit(2), Reason::Binary(BinaryClause::new(lit(2), lit(3), false)));

        assert_eq!(ring.level_of(lit(2)), 0);
        assert!(ring.variables[1].reason.is_none());
        assert_eq!(ring.units, vec![lit(-3), lit(2)]);
        assert!(ring.iterating);
    }
}
