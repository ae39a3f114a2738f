/*!
Analysis of a conflict, and learning of the derived clause.

# Overview

Given a conflict, [analyze](GenericRing::analyze):

1. Finds the *conflict level*, the highest level of a literal in the conflict.
   As assignments may be out of order, the conflict level may be below the current level, in which case the ring first backtracks to the conflict level.
2. If exactly one literal of the conflict is at the conflict level the conflict is a *missed implication*.
   The ring backtracks to the highest level of the remaining literals, and the one literal is assigned with the conflict as its reason.
3. Otherwise, the reasons of literals at the conflict level are resolved, walking the trail backwards, until a single literal of the conflict level remains (the first UIP).
4. The derived clause is [shrunk or minimized](crate::procedures::minimize), and the literal of highest level (after the asserted literal) is moved to the second position.
5. Variables seen during analysis are bumped, the ring backtracks to the jump level, and the clause is learnt and exported.

# Glue

The glue of a derived clause is the count of distinct levels among the literals other than the asserted literal.
So, a derived binary clause has glue one, and a derived unit has glue zero.

Redundant large clauses used as reasons are noted as used, which protects them from the next [reduction](crate::procedures::reduce).
If the glue of such a clause is above tier one, the glue is recomputed and the clause is [promoted](crate::db::watches::Watches::promote) if the glue has dropped.

# Conflicts at level zero

A conflict at level zero, or a conflict whose literals are all at level zero, derives the empty clause, and the ring is marked inconsistent.
*/

use crate::{
    db::variable::{Conflict, Reason},
    misc::log::targets::{self},
    ring::GenericRing,
    ruler::Ruler,
    structures::{
        clause::{ClauseRef, LargeClause},
        literal::Literal,
    },
};

impl<R: rand::Rng + rand::SeedableRng> GenericRing<R> {
    /// Analyzes `conflict`, learning (and exporting) a clause, or marking the ring inconsistent.
    pub fn analyze(&mut self, ruler: &Ruler, conflict: Conflict) {
        self.statistics.context_mut(self.context).conflicts += 1;

        if self.level == 0 {
            self.set_inconsistent("conflict at level zero");
            return;
        }

        let literals = self.conflict_literals(conflict);
        let mut conflict_level = 0;
        let mut count = 0;
        for literal in &literals {
            let level = self.level_of(*literal);
            if level > conflict_level {
                conflict_level = level;
                count = 1;
            } else if level == conflict_level {
                count += 1;
            }
        }

        if conflict_level == 0 {
            self.set_inconsistent("conflict with every literal fixed");
            return;
        }

        if conflict_level < self.level {
            log::trace!(target: targets::ANALYSIS, "Ring {}: conflict at level {conflict_level} below {}", self.id, self.level);
            self.backtrack(conflict_level);
        }

        if count == 1 {
            self.missed_implication(conflict, &literals, conflict_level);
            return;
        }

        let uip = self.derive_clause(&literals, conflict_level);
        self.clause[0] = !uip;

        let glue = self.levels.len() as u32;
        self.shrink_or_minimize(glue);

        let size = self.clause.len();
        if size > 2 {
            let mut max_position = 1;
            let mut max_level = self.level_of(self.clause[1]);
            for position in 2..size {
                let level = self.level_of(self.clause[position]);
                if level > max_level {
                    max_position = position;
                    max_level = level;
                }
            }
            self.clause.swap(1, max_position);
        }

        let jump = match size {
            1 => 0,
            _ => self.level_of(self.clause[1]),
        };

        let averages = self.averages_mut();
        averages.glue.update(glue as f64);
        averages.size.update(size as f64);
        averages.level.update(conflict_level as f64);

        self.backtrack(jump);
        self.bump_analyzed();
        self.clear_analyzed();

        self.learn(ruler, glue);
    }

    /// A conflict with a single literal at the conflict level, which should have been propagated at a lower level.
    fn missed_implication(&mut self, conflict: Conflict, literals: &[Literal], conflict_level: u32) {
        let mut forced = literals[0];
        let mut jump = 0;
        for literal in literals {
            let level = self.level_of(*literal);
            if level == conflict_level {
                forced = *literal;
            } else {
                jump = jump.max(level);
            }
        }

        log::trace!(target: targets::ANALYSIS, "Ring {}: missed implication of {forced} at level {jump}", self.id);
        self.backtrack(jump);

        let reason = match conflict {
            Reason::Binary(clause) => match clause.anchor == forced {
                true => Reason::Binary(clause),
                false => Reason::Binary(clause.flipped()),
            },
            Reason::Large(key) => Reason::Large(key),
        };
        self.assign_with_reason(forced, reason);
    }

    /// Resolves reasons of the conflict level until a single literal of the level remains, returning the literal.
    ///
    /// On return `clause` holds a placeholder at position zero, followed by the literals of lower levels.
    fn derive_clause(&mut self, literals: &[Literal], conflict_level: u32) -> Literal {
        self.clause.clear();
        self.clause.push(Literal::default());
        debug_assert!(self.levels.is_empty());

        let mut open = 0;
        for literal in literals {
            self.analyze_literal(*literal, conflict_level, &mut open);
        }

        let mut position = self.trail.len();
        let uip = loop {
            let literal = loop {
                position -= 1;
                let literal = self.trail.literals[position];
                let variable = &self.variables[literal.var_index()];
                if variable.seen && variable.level == conflict_level {
                    break literal;
                }
            };

            open -= 1;
            if open == 0 {
                break literal;
            }

            match self.variables[literal.var_index()].reason {
                Some(Reason::Binary(clause)) => {
                    debug_assert!(clause.anchor == literal);
                    self.analyze_literal(clause.other, conflict_level, &mut open);
                }

                Some(Reason::Large(key)) => {
                    self.note_reason_use(key);
                    for index in 0..self.watches.watchers[key].literals().len() {
                        let other = self.watches.watchers[key].literals()[index];
                        if other != literal {
                            self.analyze_literal(other, conflict_level, &mut open);
                        }
                    }
                }

                None => {
                    log::error!(target: targets::ANALYSIS, "Ring {}: resolution on {literal} without a reason", self.id);
                    debug_assert!(false);
                    break literal;
                }
            }
        };

        uip
    }

    /// Marks `literal` as seen, adding it to the derived clause if below the conflict level, or counting it as open otherwise.
    fn analyze_literal(&mut self, literal: Literal, conflict_level: u32, open: &mut usize) {
        let index = literal.var_index();
        let variable = &mut self.variables[index];
        if variable.level == 0 || variable.seen {
            return;
        }
        variable.seen = true;
        let level = variable.level;
        self.analyzed.push(index);

        if level == conflict_level {
            *open += 1;
        } else {
            self.clause.push(literal);
            self.use_level(level);
        }
    }

    fn use_level(&mut self, level: u32) {
        if !self.used_levels[level as usize] {
            self.used_levels[level as usize] = true;
            self.levels.push(level);
        }
    }

    /// Notes a redundant watcher was used as a reason, and promotes the watcher if its glue has dropped.
    fn note_reason_use(&mut self, key: usize) {
        let tier1 = self.config.tier1_glue_limit.value;
        let tier2 = self.config.tier2_glue_limit.value;

        let watcher = &mut self.watches.watchers[key];
        if !watcher.redundant {
            return;
        }
        watcher.used = 1 + (watcher.glue <= tier2) as u8;
        if watcher.glue <= tier1 {
            return;
        }

        let mut levels = watcher
            .literals()
            .iter()
            .map(|literal| self.variables[literal.var_index()].level)
            .collect::<Vec<_>>();
        levels.sort_unstable();
        levels.dedup();
        let glue = levels.len() as u32;
        if glue < watcher.glue {
            log::trace!(target: targets::ANALYSIS, "Ring {}: promoting watcher {key} from glue {} to {glue}", self.id, watcher.glue);
            self.watches.promote(key, glue);
        }
    }

    /// Bumps every variable seen during analysis, in the manner of the current mode.
    fn bump_analyzed(&mut self) {
        let mut bumped = self
            .analyzed
            .iter()
            .copied()
            .filter(|index| self.variables[*index].seen)
            .collect::<Vec<_>>();
        bumped.sort_unstable();
        bumped.dedup();

        match self.stable {
            true => {
                let max_score = self.config.max_score.value;
                for index in &bumped {
                    self.heap.bump(*index, max_score);
                }
                self.heap.decay(self.config.decay.value, max_score);
            }

            false => {
                bumped.sort_unstable_by_key(|index| self.queue.stamp(*index));
                for index in bumped {
                    let unassigned = self.values[2 * index] == 0;
                    self.queue.move_to_front(index, unassigned);
                }
            }
        }
    }

    /// Clears every analysis flag, and every used level.
    pub fn clear_analyzed(&mut self) {
        for index in self.analyzed.drain(..) {
            self.variables[index].clear_flags();
        }
        for level in self.levels.drain(..) {
            self.used_levels[level as usize] = false;
        }
    }

    /// Learns the derived clause, after backtracking to the jump level, and exports the clause.
    fn learn(&mut self, ruler: &Ruler, glue: u32) {
        let asserted = self.clause[0];
        let clause = match self.clause.len() {
            1 => {
                log::trace!(target: targets::ANALYSIS, "Ring {}: learnt unit {asserted}", self.id);
                self.assign_unit(asserted);
                None
            }

            2 => {
                let other = self.clause[1];
                let binary = self.watches.watch_binary(asserted, other);
                self.assign_with_reason(asserted, Reason::Binary(binary));
                Some(ClauseRef::Binary(binary))
            }

            _ => {
                let clause = LargeClause::new(&self.clause, true, glue, self.id);
                log::trace!(target: targets::ANALYSIS, "Ring {}: learnt {clause}", self.id);
                let key = self.watches.watch_large(clause.clone(), asserted, self.clause[1], true, clause.glue());
                self.assign_with_reason(asserted, Reason::Large(key));
                Some(ClauseRef::Large(clause))
            }
        };

        // Units reach peers and the consumer on export to the ruler.
        if let Some(clause) = clause {
            self.export_clause(ruler, &clause);
            self.export_external(ruler, &clause.to_vec(), glue);
        }
    }
}
