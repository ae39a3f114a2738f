/*!
Vivification of redundant clauses.

# Overview

To vivify a clause, the negation of each literal of the clause is assumed in turn (as a decision), and propagated.
If some conflict (or some literal of the clause) is found before every literal is assumed, the clause may be improved:

- *Subsumed*: some other clause was the reason for a conflict (or implication) using only literals of the candidate, and so subsumes the candidate.
- *Strengthened*: analysis of the conflict uses only some of the assumed literals, and those literals form a smaller clause.
- *Implied*: some literal of the clause became true from assumptions of other literals, and so the clause is implied by the remaining clauses.

The candidate itself is ignored during propagation.
A subsumed or implied candidate is marked as garbage, and a strengthened candidate is replaced by the smaller clause, which is exported to peers if configured.
The clause of a strengthened candidate is marked as vivified, after which every other ring drops its watcher of the clause.

# Candidates

Candidates are redundant clauses of tier one, then of tier two.
Each tier is given a share of the effort, which is a fraction of the search ticks since the last probe.
Candidates not reached before the effort is spent are marked, and tried first in the next round.

Candidates are ordered so literals occurring often among candidates are assumed first, and candidates sharing such literals are tried in sequence.
As such, decisions made for one candidate are often *reused* by the next, avoiding repeated propagation.

# Sharing

Clauses are imported from peers between candidates, after which the ring propagates from level zero.
*/

use std::cmp::Reverse;

use crate::{
    db::{
        variable::{Conflict, Reason},
        watches::{WatcherKey, WATCHER_LITERALS},
    },
    misc::log::targets::{self},
    ring::{GenericRing, SearchContext},
    ruler::Ruler,
    structures::{
        clause::{ClauseRef, LargeClause},
        literal::Literal,
    },
};

/// State kept over a round of vivification of a tier.
#[derive(Debug, Default)]
struct Vivifier {
    candidates: Vec<WatcherKey>,

    /// The decision of each level, so decisions may be reused.
    decisions: Vec<Literal>,

    /// Occurrences of each unassigned literal among candidates, indexed by literal.
    counts: Vec<u32>,

    /// The literals of the current candidate, in the order assumed.
    sorted: Vec<Literal>,
}

impl Vivifier {
    /// Whether literal `a` should be assumed before literal `b`.
    fn better_literal(&self, a: Literal, b: Literal) -> bool {
        let (u, v) = (self.counts[a.index()], self.counts[b.index()]);
        u > v || (u == v && a < b)
    }

    /// The ordering key of a literal, where lower is better.
    fn literal_key(&self, literal: Literal) -> (Reverse<u32>, Literal) {
        (Reverse(self.counts[literal.index()]), literal)
    }
}

impl<R: rand::Rng + rand::SeedableRng> GenericRing<R> {
    /// Vivifies tier one and then tier two clauses, within the configured effort.
    pub fn vivify_clauses(&mut self, ruler: &Ruler) {
        if self.inconsistent || !self.config.vivify.value {
            return;
        }
        if !self.backtrack_propagate_iterate(ruler) {
            return;
        }

        let delta_search = self
            .statistics
            .search_ticks()
            .saturating_sub(self.last.probing)
            .max(self.config.min_effort.value);
        let effort = (self.config.vivify_effort.value * delta_search as f64) as u64;
        log::debug!(target: targets::VIVIFY, "Ring {}: vivification effort of {effort} ticks", self.id);

        let tier1_effort = self.config.vivify_tier1_effort.value;
        let tier2_effort = self.config.vivify_tier2_effort.value;
        let sum = tier1_effort + tier2_effort;
        let mut limit = self.statistics.probing_ticks();

        for (tier, share) in [(1, tier1_effort), (2, tier2_effort)] {
            if self.inconsistent || self.terminating(ruler) {
                break;
            }
            if sum > 0.0 {
                limit += (share / sum * effort as f64) as u64;
            }
            self.vivify_tier(ruler, tier, limit);
        }
    }

    fn vivify_tier(&mut self, ruler: &Ruler, tier: u8, limit: u64) {
        let mut vivifier = Vivifier {
            counts: vec![0; 2 * self.size],
            ..Default::default()
        };
        self.schedule_vivification_candidates(&mut vivifier, tier);
        let scheduled = vivifier.candidates.len();
        let succeeded = self.statistics.vivify.succeeded;

        let mut next = 0;
        while next < vivifier.candidates.len() {
            if self.statistics.probing_ticks() > limit || self.terminating(ruler) {
                break;
            }

            if self.import_shared(ruler) {
                if self.inconsistent {
                    break;
                }
                if self.level > 0 {
                    self.backtrack(0);
                }
                self.trail.propagate = 0;
                vivifier.decisions.truncate(self.level as usize);
                if self.propagate(None).is_some() {
                    self.set_inconsistent("propagation of imported clauses during vivification fails");
                    break;
                }
            }

            let key = vivifier.candidates[next];
            next += 1;
            self.vivify_watcher(ruler, &mut vivifier, key);
            if self.inconsistent {
                break;
            }
        }

        if !self.inconsistent && self.level > 0 {
            self.backtrack(0);
        }

        for key in &vivifier.candidates[next..] {
            self.watches.watchers[*key].vivify = true;
        }

        log::debug!(target: targets::VIVIFY, "Ring {}: vivified {} of {next} tried tier{tier} clauses, with {} scheduled", self.id,
            self.statistics.vivify.succeeded - succeeded,
            scheduled
        );
    }

    /// Whether the watcher is a candidate of the given tier, refreshing its glue from the clause.
    fn vivification_candidate(&mut self, key: WatcherKey, tier: u8) -> bool {
        let tier1 = self.config.tier1_glue_limit.value;
        let tier2 = self.config.tier2_glue_limit.value;

        let watcher = &mut self.watches.watchers[key];
        if watcher.garbage || !watcher.redundant {
            return false;
        }
        let limit = match tier {
            1 => tier1,
            _ => tier2,
        };
        if watcher.glue > limit {
            watcher.glue = watcher.glue.min(watcher.clause.glue());
            if watcher.glue > limit {
                return false;
            }
        }
        if tier == 2 && watcher.glue <= tier1 {
            return false;
        }

        if watcher.clause.is_vivified() {
            watcher.garbage = true;
            return false;
        }
        true
    }

    /// Schedules candidates of the tier, with candidates left over from the previous round first.
    fn schedule_vivification_candidates(&mut self, vivifier: &mut Vivifier, tier: u8) {
        debug_assert!(self.level == 0);
        let mut rescheduled = Vec::default();
        let mut fresh = Vec::default();

        for key in 0..self.watches.watchers.len() {
            if !self.vivification_candidate(key, tier) {
                continue;
            }
            let watcher = &self.watches.watchers[key];
            if watcher.literals().iter().any(|literal| self.value(*literal) > 0) {
                self.watches.watchers[key].garbage = true;
                continue;
            }
            for literal in watcher.literals() {
                if self.value(*literal) == 0 {
                    vivifier.counts[literal.index()] += 1;
                }
            }
            match watcher.vivify {
                true => rescheduled.push(key),
                false => fresh.push(key),
            }
        }

        for group in [&mut rescheduled, &mut fresh] {
            group.sort_by_cached_key(|key| {
                let literals = self.watches.watchers[*key].literals();
                let mut best = literals
                    .iter()
                    .map(|literal| vivifier.literal_key(*literal))
                    .collect::<Vec<_>>();
                best.sort_unstable();
                best.truncate(WATCHER_LITERALS);
                (best, literals.len(), Reverse(*key))
            });
        }

        log::trace!(target: targets::VIVIFY, "Ring {}: scheduled {} rescheduled and {} fresh tier{tier} candidates", self.id, rescheduled.len(), fresh.len());
        vivifier.candidates = rescheduled;
        vivifier.candidates.append(&mut fresh);
    }

    /// Assumes `literal` as a decision on a fresh level, during probing.
    pub fn probe_decision(&mut self, literal: Literal) {
        self.level += 1;
        self.trail.level_starts.push(self.trail.len());
        if self.used_levels.len() <= self.level as usize + 1 {
            self.used_levels.resize(self.level as usize + 2, false);
        }
        self.statistics.context_mut(SearchContext::Probing).decisions += 1;
        self.assign_decision(literal);
    }

    fn vivify_watcher(&mut self, ruler: &Ruler, vivifier: &mut Vivifier, key: WatcherKey) {
        debug_assert!(vivifier.decisions.len() == self.level as usize);
        let clause = self.watches.watchers[key].clause.clone();
        if clause.is_vivified() {
            self.watches.watchers[key].garbage = true;
            return;
        }
        self.watches.watchers[key].vivify = false;

        // Satisfied at the root, or the reason for a literal of the clause.
        let mut reason_for = None;
        for literal in clause.literals() {
            if self.value(*literal) <= 0 {
                continue;
            }
            let variable = &self.variables[literal.var_index()];
            if variable.level == 0 {
                self.watches.watchers[key].garbage = true;
                return;
            }
            if variable.reason == Some(Reason::Large(key)) {
                reason_for = Some(*literal);
            }
        }
        if let Some(literal) = reason_for {
            let level = self.level_of(literal) - 1;
            self.backtrack(level);
            vivifier.decisions.truncate(level as usize);
        }

        log::trace!(target: targets::VIVIFY, "Ring {}: trying to vivify {clause}", self.id);
        self.statistics.vivify.tried += 1;

        for level in 0..vivifier.decisions.len() {
            let decision = vivifier.decisions[level];
            let reusable = clause.literals().contains(&!decision) && self.value(decision) > 0;
            if !reusable {
                self.backtrack(level as u32);
                vivifier.decisions.truncate(level);
                break;
            }
        }
        if !vivifier.decisions.is_empty() {
            self.statistics.vivify.reused += 1;
        }

        vivifier.sorted.clear();
        for literal in clause.literals() {
            let value = self.value(*literal);
            let variable = &self.variables[literal.var_index()];
            if value < 0 && variable.level == 0 {
                continue;
            }
            if value != 0 && variable.reason.is_none() {
                // The negation of a reused decision.
                continue;
            }
            vivifier.sorted.push(*literal);
        }
        let mut sorted = std::mem::take(&mut vivifier.sorted);
        sorted.sort_unstable_by(|a, b| match vivifier.better_literal(*a, *b) {
            true => std::cmp::Ordering::Less,
            false => match vivifier.better_literal(*b, *a) {
                true => std::cmp::Ordering::Greater,
                false => std::cmp::Ordering::Equal,
            },
        });

        let mut implied = None;
        let mut conflict = None;
        for literal in &sorted {
            match self.value(*literal) {
                -1 => continue,
                1 => {
                    implied = Some(*literal);
                    break;
                }
                _ => {}
            }
            self.probe_decision(!*literal);
            vivifier.decisions.push(!*literal);
            conflict = self.propagate(Some(key));
            if conflict.is_some() {
                break;
            }
        }
        vivifier.sorted = sorted;
        debug_assert!(conflict.is_none() || implied.is_none());

        for literal in clause.literals() {
            self.marks[literal.index()] = 1;
        }
        let subsuming = self.vivify_deduce(key, conflict, implied);
        for literal in clause.literals() {
            self.marks[literal.index()] = 0;
        }

        let mut strengthened = false;
        if let Some(subsuming) = subsuming {
            self.statistics.vivify.succeeded += 1;
            self.statistics.vivify.subsumed += 1;
            log::trace!(target: targets::VIVIFY, "Ring {}: {clause} subsumed by {subsuming:?}", self.id);
            if let Reason::Large(other) = subsuming {
                let glue = self.watches.watchers[key].glue;
                if self.watches.watchers[other].redundant && glue < self.watches.watchers[other].glue {
                    self.watches.promote(other, glue);
                }
            }
            self.watches.watchers[key].garbage = true;
        } else if self.vivify_shrink(key, conflict, &mut implied) {
            if self.clause.is_empty() {
                log::warn!(target: targets::VIVIFY, "Ring {}: no literal derived when strengthening {clause}", self.id);
            } else {
                self.statistics.vivify.succeeded += 1;
                self.statistics.vivify.strengthened += 1;
                self.vivify_learn(ruler, vivifier, key);
                self.watches.watchers[key].garbage = true;
                clause.mark_vivified();
                strengthened = true;
            }
        } else if implied.is_some() {
            self.statistics.vivify.succeeded += 1;
            self.statistics.vivify.implied += 1;
            log::trace!(target: targets::VIVIFY, "Ring {}: {clause} implied", self.id);
            self.watches.watchers[key].garbage = true;
        } else {
            log::trace!(target: targets::VIVIFY, "Ring {}: vivification failed on {clause}", self.id);
        }

        // Strengthening permits an import, as learning would.
        self.last.import = match strengthened {
            true => u64::MAX,
            false => self.statistics.conflicts(),
        };

        self.clear_analyzed();
        self.clause.clear();
    }

    /// Marks a literal seen during vivification analysis, collecting decisions into the clause.
    ///
    /// Returns false if the literal is not in the candidate, i.e. the reason analyzed does not subsume the candidate.
    fn vivify_analyze_literal(&mut self, literal: Literal) -> bool {
        debug_assert!(self.value(literal) != 0);
        let index = literal.var_index();
        let level = self.variables[index].level;
        if level == 0 {
            return true;
        }
        let marked = self.marks[literal.index()] > 0;
        if self.variables[index].seen {
            return marked;
        }

        self.variables[index].seen = true;
        self.analyzed.push(index);
        if level != self.level && !self.used_levels[level as usize] {
            self.used_levels[level as usize] = true;
            self.levels.push(level);
        }
        if self.variables[index].reason.is_none() {
            self.clause.push(literal);
        }
        marked
    }

    /// Analyzes the conflict (or the reason for the implied literal), collecting the decisions used into the clause.
    ///
    /// Returns a reason (other than the candidate) whose literals are all in the candidate, if found.
    fn vivify_deduce(
        &mut self,
        candidate: WatcherKey,
        mut conflict: Option<Conflict>,
        implied: Option<Literal>,
    ) -> Option<Reason> {
        debug_assert!(self.analyzed.is_empty());
        self.clause.clear();

        if let Some(implied) = implied {
            let index = implied.var_index();
            let level = self.variables[index].level;
            self.variables[index].seen = true;
            self.analyzed.push(index);
            if level != self.level && !self.used_levels[level as usize] {
                self.used_levels[level as usize] = true;
                self.levels.push(level);
            }
            self.clause.push(implied);
            conflict = self.variables[index].reason;
        }

        let candidate_reason = Reason::Large(candidate);
        let mut reason = conflict.unwrap_or(candidate_reason);
        let mut position = self.trail.len();

        loop {
            let mut subsuming = reason != candidate_reason;
            for literal in self.conflict_literals(reason) {
                if !self.vivify_analyze_literal(literal) {
                    subsuming = false;
                }
            }
            // A binary reason may be a resolvent from jumping, which is not held by any watch list.
            if let Reason::Binary(clause) = reason {
                subsuming &= self.watches.contains_binary(clause.anchor, clause.other);
            }
            if subsuming {
                return Some(reason);
            }

            let mut found = None;
            while position > 0 {
                position -= 1;
                let literal = self.trail.literals[position];
                let variable = &self.variables[literal.var_index()];
                if variable.level == 0 || !variable.seen {
                    continue;
                }
                match variable.reason {
                    Some(next) if Some(next) != conflict => {
                        found = Some(next);
                        break;
                    }
                    _ => continue,
                }
            }

            match found {
                Some(next) => reason = next,
                None => return None,
            }
        }
    }

    /// Whether the analysis shows the candidate may be strengthened, noting a true literal as implied otherwise.
    fn vivify_shrink(&mut self, key: WatcherKey, conflict: Option<Conflict>, implied: &mut Option<Literal>) -> bool {
        for position in 0..self.watches.watchers[key].literals().len() {
            let literal = self.watches.watchers[key].literals()[position];
            let variable = &self.variables[literal.var_index()];
            match self.value(literal) {
                0 => return true,

                1 => {
                    if conflict.is_some() {
                        return true;
                    }
                    if implied.is_none() {
                        *implied = Some(literal);
                    }
                }

                _ => {
                    if variable.level == 0 {
                        continue;
                    }
                    if !variable.seen || variable.reason.is_some() {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Learns the strengthened clause at level zero, and exports the clause if configured.
    fn vivify_learn(&mut self, ruler: &Ruler, vivifier: &mut Vivifier, key: WatcherKey) {
        if self.level > 0 {
            self.backtrack(0);
            vivifier.decisions.clear();
        }

        let literals = std::mem::take(&mut self.clause);
        match literals.as_slice() {
            [unit] => {
                log::trace!(target: targets::VIVIFY, "Ring {}: strengthened to unit {unit}", self.id);
                self.statistics.vivify.units += 1;
                self.assign_unit(*unit);
                if self.propagate(None).is_some() {
                    self.set_inconsistent("propagation of strengthened clause unit fails");
                } else {
                    self.export_units(ruler);
                }
            }

            [first, second] => {
                let binary = self.watches.watch_binary(*first, *second);
                if self.config.vivify_export.value {
                    self.export_to_peers(ruler, &ClauseRef::Binary(binary));
                }
            }

            _ => {
                let size = literals.len() as u32;
                let mut glue = (self.levels.len() as u32).min(self.watches.watchers[key].glue);
                if glue == size {
                    glue = size - 1;
                }
                let clause = LargeClause::new(&literals, true, glue, self.id);
                log::trace!(target: targets::VIVIFY, "Ring {}: strengthened to {clause}", self.id);
                let glue = clause.glue();
                self.watches.watch_large(clause.clone(), literals[0], literals[1], true, glue);
                if self.config.vivify_export.value {
                    self.export_to_peers(ruler, &ClauseRef::Large(clause));
                }
            }
        }
        self.clause = literals;
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        config::Config,
        ring::{Ring, SearchContext},
        ruler::Ruler,
        structures::{clause::LargeClause, literal::Literal},
    };

    fn lit(external: i32) -> Literal {
        Literal::from_external(external).unwrap()
    }

    fn ring_over(clauses: &[&[i32]]) -> (Ruler, Ring) {
        let mut config = Config::default();
        config.simplify.value = false;
        config.min_effort.value = 1_000_000;
        config.vivify_effort.value = 1.0;
        let mut ruler = Ruler::from_config(config);
        for clause in clauses {
            ruler.add_clause(clause).unwrap();
        }
        ruler.prepare();
        let ring = Ring::new(&ruler, 0);
        (ruler, ring)
    }

    fn learn(ring: &mut Ring, clause: &[i32], glue: u32) -> usize {
        let literals = clause.iter().map(|external| lit(*external)).collect::<Vec<_>>();
        let large = LargeClause::new(&literals, true, glue, 0);
        ring.watches.watch_large(large, literals[0], literals[1], true, glue)
    }

    #[test]
    fn strengthening_drops_literals() {
        // With ¬1 ∨ 2 and ¬2 ∨ 3 the clause ¬1 ∨ 3 ∨ 4 ∨ 5 strengthens to ¬1 ∨ 3.
        let (ruler, mut ring) = ring_over(&[&[-1, 2], &[-2, 3], &[1, 3, 4, 5, 6]]);
        let key = learn(&mut ring, &[-1, 3, 4, 5], 2);

        ring.context = SearchContext::Probing;
        ring.vivify_clauses(&ruler);
        ring.context = SearchContext::Search;

        assert_eq!(ring.level, 0);
        assert!(ring.watches.watchers[key].garbage);
        assert!(ring.watches.watchers[key].clause.is_vivified());
        assert!(ring.statistics.vivify.succeeded >= 1);
        assert_eq!(ring.statistics.vivify.strengthened, 1);
        assert!(ring.watches.contains_binary(lit(-1), lit(3)));
        assert!(ring.variables.iter().all(|variable| !variable.seen));
        assert!(ring.marks.iter().all(|mark| *mark == 0));
    }

    #[test]
    fn subsumed_candidates_are_collected() {
        let (ruler, mut ring) = ring_over(&[&[1, 2, 3, 4, 5]]);
        let subsuming = learn(&mut ring, &[1, 2, 3], 2);
        let subsumed = learn(&mut ring, &[1, 2, 3, 4], 2);

        ring.context = SearchContext::Probing;
        ring.vivify_clauses(&ruler);
        ring.context = SearchContext::Search;

        // The subsumed candidate reuses the decisions made for the subsuming candidate.
        assert!(ring.watches.watchers[subsumed].garbage);
        assert!(!ring.watches.watchers[subsuming].garbage);
        assert_eq!(ring.statistics.vivify.tried, 2);
        assert_eq!(ring.statistics.vivify.reused, 1);
        assert_eq!(ring.statistics.vivify.subsumed, 1);
        assert_eq!(ring.level, 0);
    }

    #[test]
    fn root_satisfied_candidates_are_garbage() {
        let (ruler, mut ring) = ring_over(&[&[1, 2, 3, 4]]);
        let key = learn(&mut ring, &[1, 2, 3], 2);
        ring.assign_unit(lit(2));

        ring.vivify_clauses(&ruler);
        assert!(ring.watches.watchers[key].garbage);
        assert_eq!(ring.statistics.vivify.tried, 0);
    }
}
