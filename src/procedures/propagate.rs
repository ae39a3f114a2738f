/*!
Boolean constraint propagation.

# Overview

Propagation visits each literal on the trail beyond the propagate cursor, and for each such literal *l*, the clauses in which *¬l* is watched.
- First, the others of *¬l* in irredundant binary clauses, shared by every ring.
- Then, the watch list of *¬l*, holding redundant binary clauses and watches of large clauses.

For each clause visited, either:
- The clause is satisfied by some literal, and nothing happens.
- A replacement watch is found, and the watch moves to the list of the replacement.
- The clause is unit, and the other watched literal is [assigned](crate::procedures::assign).
- The clause is false, and returned as a conflict.

Propagation stops at the first conflict, leaving the watch list consistent, and the propagate cursor just beyond the literal whose list held the conflict.

# Large clauses

A watch of a large clause carries a *blocking* literal, and if the blocking literal is true the clause is skipped without visiting its watcher.
Otherwise, the other watched literal is recovered from the `sum` of the watcher, and if true becomes the fresh blocking literal.
The search for a replacement begins at the position the previous search ended (the *middle* of the clause), wrapping around, which avoids rescanning the same false prefix of a long clause.

Watchers marked as garbage are dropped from the list as they are visited.
A single watcher may be *ignored*, which is used during [vivification](crate::procedures::vivify) to propagate without the clause being vivified.
The watches of an ignored watcher still move to replacement literals, so once the watcher is no longer ignored it is found false (or unit) under the same assignment.

# Ticks

Each visit to a watch list, and each visit to the literals of a large clause, counts as a tick.
Ticks approximate cache lines touched, and are used to budget inprocessing relative to search.
*/

use crate::{
    db::{
        variable::{Conflict, Reason},
        watches::{Watch, WatcherKey},
    },
    misc::log::targets::{self},
    ring::GenericRing,
    structures::clause::BinaryClause,
};

impl<R: rand::Rng + rand::SeedableRng> GenericRing<R> {
    /// Propagates every literal beyond the propagate cursor, returning the first conflict found, if any.
    pub fn propagate(&mut self, ignore: Option<WatcherKey>) -> Option<Conflict> {
        let binaries = self.watches.binaries.clone();
        let mut ticks = 0;
        let mut propagations = 0;
        let mut conflict = None;

        'trail_loop: while self.trail.propagate < self.trail.len() {
            let literal = self.trail.literals[self.trail.propagate];
            self.trail.propagate += 1;
            propagations += 1;
            let falsified = !literal;

            if let Some(others) = binaries.get(falsified.index()) {
                ticks += 1;
                for other in others {
                    match self.value(*other) {
                        1 => {}
                        -1 => {
                            conflict = Some(Reason::Binary(BinaryClause::new(falsified, *other, false)));
                            break 'trail_loop;
                        }
                        _ => self.assign_with_reason(
                            *other,
                            Reason::Binary(BinaryClause::new(*other, falsified, false)),
                        ),
                    }
                }
            }

            let mut list = std::mem::take(&mut self.watches.lists[falsified.index()]);
            ticks += 1;
            let mut kept = 0;
            let mut index = 0;

            while index < list.len() {
                let watch = list[index];
                index += 1;

                match watch {
                    Watch::Binary(clause) => {
                        list[kept] = watch;
                        kept += 1;
                        match self.value(clause.other) {
                            1 => {}
                            -1 => {
                                conflict = Some(Reason::Binary(clause));
                                break;
                            }
                            _ => self.assign_with_reason(clause.other, Reason::Binary(clause.flipped())),
                        }
                    }

                    Watch::Large { key, blocking } => {
                        if self.value(blocking) > 0 {
                            list[kept] = watch;
                            kept += 1;
                            continue;
                        }

                        let watcher = &self.watches.watchers[key];
                        if watcher.garbage {
                            continue;
                        }

                        let other = watcher.other(falsified);
                        let other_value = self.value(other);
                        if other_value > 0 {
                            list[kept] = Watch::Large {
                                key,
                                blocking: other,
                            };
                            kept += 1;
                            continue;
                        }

                        ticks += 1;
                        let literals = watcher.literals();
                        let size = literals.len();
                        let middle = watcher.middle.min(size - 1);
                        let mut replacement = None;
                        for position in (middle..size).chain(0..middle) {
                            let candidate = literals[position];
                            if candidate == falsified || candidate == other {
                                continue;
                            }
                            if self.value(candidate) >= 0 {
                                replacement = Some((position, candidate));
                                break;
                            }
                        }

                        match replacement {
                            Some((position, candidate)) => {
                                let watcher = &mut self.watches.watchers[key];
                                watcher.middle = position;
                                watcher.sum = other.code() ^ candidate.code();
                                self.watches.lists[candidate.index()].push(Watch::Large {
                                    key,
                                    blocking: other,
                                });
                            }

                            None => {
                                list[kept] = watch;
                                kept += 1;
                                if ignore == Some(key) {
                                    continue;
                                }
                                match other_value {
                                    0 => self.assign_with_reason(other, Reason::Large(key)),
                                    _ => {
                                        conflict = Some(Reason::Large(key));
                                        break;
                                    }
                                }
                            }
                        }
                    }
                }
            }

            if conflict.is_some() {
                while index < list.len() {
                    list[kept] = list[index];
                    kept += 1;
                    index += 1;
                }
            }
            list.truncate(kept);
            self.watches.lists[falsified.index()] = list;

            if conflict.is_some() {
                break;
            }
        }

        let counters = self.statistics.context_mut(self.context);
        counters.ticks += ticks;
        counters.propagations += propagations;

        if let Some(conflict) = &conflict {
            log::trace!(target: targets::PROPAGATION, "Ring {}: conflict {conflict:?}", self.id);
        }
        conflict
    }

    /// The literals of a conflict (or reason), as a fresh vector.
    pub fn conflict_literals(&self, conflict: Conflict) -> Vec<crate::structures::literal::Literal> {
        match conflict {
            Reason::Binary(clause) => clause.literals().to_vec(),
            Reason::Large(key) => self.watches.watchers[key].literals().to_vec(),
        }
    }
}
