/*!
Import of units from the ruler, and of learnt clauses from peers.

# Units

Units on the trail of the ruler beyond the cursor of the ring are imported first, under the lock of the unit trail.
- A unit already true at level zero is skipped.
- A unit assigned above level zero makes the ring backtrack below the level of the assignment, after which the unit is unassigned.
- A unit false at level zero makes the ring inconsistent.
- Otherwise, the unit is assigned at level zero.

# Clauses

After units, a ring picks a random peer and takes the clause of best rank from the buckets the peer fills for the ring.

The two literals to watch are chosen to keep the watch invariant under the current (partial) assignment:
unassigned and true literals are preferred to false literals, true literals of lower level are preferred, and false literals of higher level are preferred.
With the two literals chosen, the clause is either:
- Satisfied, or not unit, and watched without further work.
- Unit or false, and the trail is rewound to the assignment of a watched false literal, so [propagation](crate::procedures::propagate) finds the clause.

A clause true at level zero is dropped, as is a large clause which some ring has vivified or found satisfied.
If enabled, a clause is also dropped if some clause of the ring subsumes the clause, where a literal false at level zero is treated as absent.

Installed clauses are passed to an external consumer, if any.

# Divergence

During probing, an imported clause may be satisfied by a literal of a level below the levels of the false literals.
Such a clause is watched, but the assignment no longer follows from the decisions in order, and the ring notes a divergence, asking the caller to propagate.
*/

use crate::{
    db::watches::Watch,
    generic::random::random_other,
    misc::log::targets::{self},
    ring::{GenericRing, SearchContext},
    ruler::Ruler,
    structures::{
        clause::{BinaryClause, ClauseRef, LargeClause},
        literal::Literal,
    },
};

use std::sync::Arc;

impl<R: rand::Rng + rand::SeedableRng> GenericRing<R> {
    /// Imports units from the ruler, returning true if some unit was imported or the ring is now inconsistent.
    pub fn import_units(&mut self, ruler: &Ruler) -> bool {
        let units = ruler.units.lock();
        if self.ruler_units >= units.len() {
            return false;
        }

        let mut imported = 0;
        while self.ruler_units < units.len() {
            let unit = units.literals[self.ruler_units];
            self.ruler_units += 1;

            let mut value = self.value(unit);
            let level = self.level_of(unit);
            if value != 0 && level > 0 {
                self.backtrack(level - 1);
                value = 0;
            }

            match value {
                1 => continue,

                -1 => {
                    self.statistics.imported.units += 1;
                    self.set_inconsistent("imported falsified unit");
                    return true;
                }

                _ => {
                    log::trace!(target: targets::IMPORT, "Ring {}: importing unit {unit}", self.id);
                    self.statistics.imported.units += 1;
                    imported += 1;
                    self.assign_unit(unit);
                }
            }
        }
        drop(units);

        match imported {
            0 => false,
            _ => {
                self.iterating = true;
                true
            }
        }
    }

    /// Imports units, and then a clause from a random peer.
    ///
    /// Returns true if the ring should propagate before anything else.
    pub fn import_shared(&mut self, ruler: &Ruler) -> bool {
        if self.import_units(ruler) {
            return true;
        }
        if self.rings < 2 {
            return false;
        }

        if self.config.limit_import_rate.value {
            let conflicts = self.statistics.conflicts();
            if self.last.import == conflicts {
                return false;
            }
            self.last.import = conflicts;
        }

        let peer = random_other(&mut self.rng, self.id, self.rings);
        let Some(clause) = ruler.pool.take(peer, self.id) else {
            return false;
        };
        log::trace!(target: targets::IMPORT, "Ring {}: took a clause of size {} from ring {peer}", self.id, clause.size());

        match clause {
            ClauseRef::Binary(binary) => self.import_binary(ruler, binary),
            ClauseRef::Large(large) => self.import_large_clause(ruler, large),
        }
    }

    /// Rewinds the propagate cursor to the assignment falsifying `literal`.
    fn force_to_repropagate(&mut self, literal: Literal) {
        debug_assert!(self.value(literal) < 0);
        log::trace!(target: targets::IMPORT, "Ring {}: repropagating {}", self.id, !literal);
        self.trail.repropagate_from(literal);
        if self.level == 0 {
            self.iterating = true;
        }
    }

    /// Whether the ring holds the binary clause of `a` and `b`.
    fn subsumed_binary(&mut self, a: Literal, b: Literal) -> bool {
        if !self.config.subsume_imported.value {
            return false;
        }
        self.statistics.subsumed.binary_checked += 1;
        let subsumed = self.watches.contains_binary(a, b);
        if subsumed {
            self.statistics.subsumed.binary += 1;
        }
        subsumed
    }

    /// Whether `literal` is false at level zero.
    fn root_false(&self, literal: Literal) -> bool {
        self.value(literal) < 0 && self.level_of(literal) == 0
    }

    fn import_binary(&mut self, ruler: &Ruler, clause: BinaryClause) -> bool {
        let (mut lit, mut other) = (clause.anchor, clause.other);

        let mut lit_value = self.value(lit);
        let mut lit_level = 0;
        if lit_value != 0 {
            lit_level = self.level_of(lit);
            if lit_value > 0 && lit_level == 0 {
                return false;
            }
        }
        let mut other_value = self.value(other);
        let mut other_level = 0;
        if other_value != 0 {
            other_level = self.level_of(other);
            if other_value > 0 && other_level == 0 {
                return false;
            }
        }

        if lit_value < other_value
            || (lit_value == other_value
                && ((lit_value > 0 && lit_level > other_level)
                    || (lit_value < 0 && lit_level < other_level)))
        {
            std::mem::swap(&mut lit, &mut other);
            std::mem::swap(&mut lit_value, &mut other_value);
            std::mem::swap(&mut lit_level, &mut other_level);
        }

        if self.subsumed_binary(lit, other) {
            log::trace!(target: targets::IMPORT, "Ring {}: subsumed binary {lit} {other}", self.id);
            return false;
        }

        let propagate = if other_value >= 0 {
            false
        } else if lit_value > 0 && lit_level <= other_level {
            lit_level < other_level && self.note_divergence()
        } else if lit_value < 0
            && lit_level == other_level
            && self.trail.positions[lit.var_index()] > self.trail.positions[other.var_index()]
        {
            self.force_to_repropagate(lit);
            true
        } else {
            self.force_to_repropagate(other);
            true
        };

        self.watches.watch_binary(lit, other);
        self.statistics.imported.binary += 1;
        self.export_external(ruler, &[lit, other], 1);
        propagate
    }

    /// During probing, notes the assignment has diverged from the decisions made, returning true.
    fn note_divergence(&mut self) -> bool {
        match self.context {
            SearchContext::Probing => {
                self.statistics.diverged += 1;
                true
            }
            SearchContext::Search => false,
        }
    }

    /// Whether some binary clause, or some redundant large clause, of the ring subsumes `clause`, ignoring literals false at level zero.
    fn subsumed_large_clause(&mut self, clause: &LargeClause) -> bool {
        if !self.config.subsume_imported.value {
            return false;
        }
        self.statistics.subsumed.large_checked += 1;

        let mut max_occurrences = 0;
        let mut max_literal = None;
        for literal in clause.literals() {
            if self.root_false(*literal) {
                continue;
            }
            self.marks[literal.index()] = 1;
            if self.value(*literal) < 0 {
                continue;
            }
            let occurrences = self.watches.lists[literal.index()].len();
            if occurrences > max_occurrences {
                max_occurrences = occurrences;
                max_literal = Some(*literal);
            }
        }

        let mut subsumed = false;
        'literal_loop: for literal in clause.literals() {
            if Some(*literal) == max_literal || self.value(*literal) < 0 {
                continue;
            }

            if let Some(others) = self.watches.binaries.get(literal.index()) {
                if others
                    .iter()
                    .any(|other| self.marks[other.index()] != 0 || self.root_false(*other))
                {
                    subsumed = true;
                    break 'literal_loop;
                }
            }

            for watch in &self.watches.lists[literal.index()] {
                let (blocking, key) = match watch {
                    Watch::Binary(binary) => {
                        if !binary.redundant {
                            continue;
                        }
                        (binary.other, None)
                    }
                    Watch::Large { key, blocking } => {
                        if !self.watches.watchers[*key].redundant {
                            continue;
                        }
                        (*blocking, Some(*key))
                    }
                };

                if self.marks[blocking.index()] == 0 && !self.root_false(blocking) {
                    continue;
                }

                let Some(key) = key else {
                    subsumed = true;
                    break 'literal_loop;
                };

                let watcher = &self.watches.watchers[key];
                if watcher.garbage {
                    continue;
                }
                let covered = watcher.literals().iter().all(|other| {
                    *other == *literal
                        || *other == blocking
                        || self.marks[other.index()] != 0
                        || self.root_false(*other)
                });
                if covered {
                    subsumed = true;
                    break 'literal_loop;
                }
            }
        }

        for literal in clause.literals() {
            self.marks[literal.index()] = 0;
        }
        if subsumed {
            self.statistics.subsumed.large += 1;
        }
        subsumed
    }

    /// The literal of `clause` (other than `ignore`) most suited to be watched, with its value and level.
    fn find_literal_to_watch(&self, clause: &LargeClause, ignore: Option<Literal>) -> (Literal, i8, u32) {
        let mut best: Option<(Literal, i8, u32)> = None;
        for literal in clause.literals() {
            if Some(*literal) == ignore {
                continue;
            }
            let value = self.value(*literal);
            let level = self.level_of(*literal);
            if let Some((_, best_value, best_level)) = best {
                let skip = match value {
                    -1 => best_value >= 0 || level <= best_level,
                    1 => best_value > 0 && level >= best_level,
                    _ => best_value >= 0,
                };
                if skip {
                    continue;
                }
            }
            best = Some((*literal, value, level));
        }
        // Large clauses hold at least three literals.
        best.unwrap_or((clause.literals()[0], 0, 0))
    }

    fn import_large_clause(&mut self, ruler: &Ruler, clause: Arc<LargeClause>) -> bool {
        if clause.is_garbage() || clause.is_vivified() {
            log::trace!(target: targets::IMPORT, "Ring {}: not importing stale {clause}", self.id);
            return false;
        }
        if let Some(satisfied) = clause
            .literals()
            .iter()
            .find(|literal| self.value(**literal) > 0 && self.level_of(**literal) == 0)
        {
            log::trace!(target: targets::IMPORT, "Ring {}: not importing {clause} satisfied by {satisfied}", self.id);
            return false;
        }

        let (lit, lit_value, lit_level) = self.find_literal_to_watch(&clause, None);
        let (other, other_value, other_level) = self.find_literal_to_watch(&clause, Some(lit));
        debug_assert!(lit_value >= other_value);

        if self.subsumed_large_clause(&clause) {
            log::trace!(target: targets::IMPORT, "Ring {}: subsumed {clause}", self.id);
            return false;
        }

        let propagate = if other_value >= 0 {
            false
        } else if lit_value > 0 && lit_level <= other_level {
            lit_level < other_level && self.note_divergence()
        } else if lit_value < 0
            && lit_level == other_level
            && self.trail.positions[lit.var_index()] > self.trail.positions[other.var_index()]
        {
            self.force_to_repropagate(lit);
            true
        } else {
            self.force_to_repropagate(other);
            true
        };

        let glue = clause.glue();
        self.watches.watch_large(clause.clone(), lit, other, true, glue);
        self.statistics.imported.large += 1;
        self.export_external(ruler, clause.literals(), glue);
        propagate
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        config::Config,
        ring::Ring,
        ruler::Ruler,
        structures::{
            clause::{ClauseRef, LargeClause},
            literal::Literal,
        },
    };

    fn lit(external: i32) -> Literal {
        Literal::from_external(external).unwrap()
    }

    fn ruler_over(threads: usize, clauses: &[&[i32]]) -> Ruler {
        let mut config = Config::with_threads(threads);
        config.simplify.value = false;
        let mut ruler = Ruler::from_config(config);
        for clause in clauses {
            ruler.add_clause(clause).unwrap();
        }
        ruler.prepare();
        ruler
    }

    fn decide(ring: &mut Ring, literal: Literal) {
        ring.level += 1;
        ring.trail.level_starts.push(ring.trail.len());
        ring.assign_decision(literal);
    }

    #[test]
    fn units_backtrack_and_assign() {
        let ruler = ruler_over(2, &[&[1, 2, 3], &[-1, -2, -3]]);
        let mut ring = Ring::new(&ruler, 0);
        decide(&mut ring, lit(1));
        decide(&mut ring, lit(2));

        assert!(ruler.units.lock().push(lit(-2)));
        assert!(ring.import_units(&ruler));
        assert_eq!(ring.level, 1);
        assert_eq!(ring.value(lit(-2)), 1);
        assert_eq!(ring.level_of(lit(-2)), 0);
        assert_eq!(ring.statistics.imported.units, 1);

        // Nothing fresh.
        assert!(!ring.import_units(&ruler));
    }

    #[test]
    fn falsified_units_are_inconsistent() {
        let ruler = ruler_over(2, &[&[1, 2, 3]]);
        let mut ring = Ring::new(&ruler, 0);
        ring.assign_unit(lit(3));
        assert!(ruler.units.lock().push(lit(-3)));
        assert!(ring.import_units(&ruler));
        assert!(ring.inconsistent);
    }

    #[test]
    fn imported_binary_forces_repropagation() {
        let ruler = ruler_over(2, &[&[1, 2, 3], &[-1, -2, -3]]);
        let mut ring = Ring::new(&ruler, 1);
        decide(&mut ring, lit(1));
        assert!(ring.propagate(None).is_none());
        decide(&mut ring, lit(2));
        assert!(ring.propagate(None).is_none());

        // The clause ¬1 ∨ ¬2 is false, and propagation is rewound to the literal of lower level.
        let clause = ClauseRef::binary(lit(-1), lit(-2), true);
        ruler.pool.put(0, 1, clause, 1);
        assert!(ring.import_shared(&ruler));
        assert_eq!(ring.trail.propagate, 0);
        assert_eq!(ring.statistics.imported.binary, 1);
        assert!(ring.propagate(None).is_some());
    }

    #[test]
    fn subsumed_imports_are_dropped() {
        let ruler = ruler_over(2, &[&[1, 2, 3, 4], &[-1, -2, -3, -4]]);
        let mut ring = Ring::new(&ruler, 1);
        ring.watches.watch_binary(lit(1), lit(2));

        let clause = LargeClause::new(&[lit(1), lit(2), lit(4)], true, 2, 0);
        ruler.pool.put(0, 1, ClauseRef::Large(clause), 1);
        assert!(!ring.import_shared(&ruler));
        assert_eq!(ring.statistics.subsumed.large, 1);
        assert_eq!(ring.statistics.imported.large, 0);

        let clause = LargeClause::new(&[lit(1), lit(3), lit(4)], true, 2, 0);
        ruler.pool.put(0, 1, ClauseRef::Large(clause), 1);
        assert!(!ring.import_shared(&ruler));
        assert_eq!(ring.statistics.imported.large, 1);
        assert!(ring.marks.iter().all(|mark| *mark == 0));
    }

    #[test]
    fn irredundant_binaries_subsume_imports() {
        let ruler = ruler_over(2, &[&[2, 3], &[1, 2, 3, 4], &[-1, -2, -3, -4]]);
        let mut ring = Ring::new(&ruler, 1);

        let clause = LargeClause::new(&[lit(1), lit(2), lit(3)], true, 2, 0);
        ruler.pool.put(0, 1, ClauseRef::Large(clause), 1);
        assert!(!ring.import_shared(&ruler));
        assert_eq!(ring.statistics.subsumed.large, 1);
        assert_eq!(ring.statistics.imported.large, 0);
        assert!(ring.marks.iter().all(|mark| *mark == 0));
    }

    #[test]
    fn root_satisfied_clauses_are_dropped() {
        let ruler = ruler_over(2, &[&[1, 2, 3, 4]]);
        let mut ring = Ring::new(&ruler, 1);
        ring.assign_unit(lit(3));

        let clause = LargeClause::new(&[lit(1), lit(2), lit(3)], true, 2, 0);
        ruler.pool.put(0, 1, ClauseRef::Large(clause), 1);
        assert!(!ring.import_shared(&ruler));
        assert_eq!(ring.statistics.imported.large, 0);
        assert!(ring.watches.watchers.len() == 1);
    }
}
