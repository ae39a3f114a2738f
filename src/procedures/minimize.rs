/*!
Shrinking and minimization of a derived clause.

Both procedures work on the clause derived by [analysis](crate::procedures::analysis), in place, and never touch the asserted literal at position zero.
At most one of the two applies to any clause.

# Shrinking

Shrinking applies to clauses of glue one, with more than two literals.
So, every literal after the asserted literal is at the same level.

Starting from the latest literal of the level on the trail, the reasons of literals in the block are resolved, much as in analysis, until a single literal of the block remains.
The block is then replaced by the negation of that literal, resulting in a binary clause.
If some reason contains a literal of a different level (other than zero), shrinking fails and the clause is unchanged.

# Minimization

Each literal after the asserted literal is removed if its reason is subsumed by the remainder of the clause, up to literals at level zero.
This is checked recursively through reasons, with results memoized by the *minimize* and *poison* flags of a variable, and with a bound on the depth of recursion.
A literal at a level with no other literal in the clause is never removable, as no reason can reach it.
*/

use crate::{
    db::variable::Reason,
    misc::log::targets::{self},
    ring::GenericRing,
    structures::literal::Literal,
};

impl<R: rand::Rng + rand::SeedableRng> GenericRing<R> {
    /// Shrinks the derived clause if of glue one, otherwise minimizes the clause, and counts the result.
    pub fn shrink_or_minimize(&mut self, glue: u32) {
        let deduced = self.clause.len();
        let mut shrunken = 0;
        let mut minimized = 0;

        if glue == 1 && deduced > 2 && self.config.shrink.value {
            shrunken = self.shrink_clause();
        }

        if glue > 0 && shrunken == 0 && deduced > 2 && self.config.minimize.value {
            minimized = self.minimize_clause();
        }

        let learned = self.clause.len();
        debug_assert!(learned + minimized + shrunken == deduced);

        let tier1 = self.config.tier1_glue_limit.value;
        let tier2 = self.config.tier2_glue_limit.value;
        let counts = &mut self.statistics.learned;
        counts.clauses += 1;
        match learned {
            1 => counts.units += 1,
            2 => counts.binary += 1,
            _ if glue == 1 => counts.glue1 += 1,
            _ if glue <= tier1 => counts.tier1 += 1,
            _ if glue <= tier2 => counts.tier2 += 1,
            _ => counts.tier3 += 1,
        }

        let literals = &mut self.statistics.literals;
        literals.deduced += deduced as u64;
        literals.learned += learned as u64;
        literals.minimized += minimized as u64;
        literals.shrunken += shrunken as u64;
    }

    /// Shrinks the block of literals after the asserted literal to its first UIP, returning the count of literals removed.
    fn shrink_clause(&mut self) -> usize {
        let mut level = 0;
        let mut max_position = 0;
        let mut open = 0;

        for position in 1..self.clause.len() {
            let literal = self.clause[position];
            let index = literal.var_index();
            let variable = &mut self.variables[index];
            if variable.level == 0 {
                continue;
            }
            debug_assert!(level == 0 || level == variable.level);
            level = variable.level;
            variable.shrinkable = true;
            self.analyzed.push(index);
            max_position = max_position.max(self.trail.positions[index]);
            open += 1;
        }

        if open < 2 {
            return 0;
        }

        let mut position = max_position + 1;
        let mut uip = None;
        while open > 0 {
            position -= 1;
            let literal = self.trail.literals[position];
            let index = literal.var_index();
            if !self.variables[index].shrinkable {
                continue;
            }

            match self.variables[index].reason {
                Some(Reason::Binary(clause)) => {
                    if !self.shrink_literal(clause.other, literal, level, &mut open) {
                        return 0;
                    }
                }

                Some(Reason::Large(key)) => {
                    for offset in 0..self.watches.watchers[key].literals().len() {
                        let other = self.watches.watchers[key].literals()[offset];
                        if !self.shrink_literal(other, literal, level, &mut open) {
                            return 0;
                        }
                    }
                }

                None => {}
            }

            open -= 1;
            uip = Some(literal);
        }

        let Some(uip) = uip else {
            return 0;
        };
        log::trace!(target: targets::MINIMIZE, "Ring {}: shrinking succeeded with {uip} at level {level}", self.id);

        let shrunken = self.clause.len() - 2;
        self.clause[1] = !uip;
        self.clause.truncate(2);
        shrunken
    }

    /// Adds `other` to the block being shrunk, returning false if `other` is at a level other than the block level (or zero).
    fn shrink_literal(&mut self, other: Literal, uip: Literal, level: u32, open: &mut usize) -> bool {
        if other == uip {
            return true;
        }
        let index = other.var_index();
        let variable = &mut self.variables[index];
        if variable.level == 0 {
            return true;
        }
        if variable.level != level {
            log::trace!(target: targets::MINIMIZE, "Ring {}: shrinking failed due to {other}", self.id);
            return false;
        }
        if variable.shrinkable {
            return true;
        }
        variable.shrinkable = true;
        self.analyzed.push(index);
        *open += 1;
        true
    }

    /// Removes every literal after the asserted literal whose reason is subsumed by the clause, returning the count removed.
    fn minimize_clause(&mut self) -> usize {
        let mut kept = 1;
        for position in 1..self.clause.len() {
            let literal = self.clause[position];
            self.clause[kept] = literal;
            if self.minimize_literal(literal, 0) {
                log::trace!(target: targets::MINIMIZE, "Ring {}: minimized {literal}", self.id);
            } else {
                kept += 1;
            }
        }
        let minimized = self.clause.len() - kept;
        self.clause.truncate(kept);
        minimized
    }

    /// Whether the false `literal` is implied by the literals of the clause, through reasons.
    fn minimize_literal(&mut self, literal: Literal, depth: usize) -> bool {
        debug_assert!(self.value(literal) < 0);
        if depth >= self.config.minimize_depth.value {
            return false;
        }

        let index = literal.var_index();
        let variable = self.variables[index];
        if variable.level == 0 {
            return true;
        }
        if !self.used_levels[variable.level as usize] {
            return false;
        }
        if variable.poison {
            return false;
        }
        if variable.minimize {
            return true;
        }
        if depth > 0 && variable.seen {
            return true;
        }

        let removable = match variable.reason {
            None => return false,

            Some(Reason::Binary(clause)) => {
                debug_assert!(clause.anchor == !literal);
                self.minimize_literal(clause.other, depth + 1)
            }

            Some(Reason::Large(key)) => {
                let mut removable = true;
                for offset in 0..self.watches.watchers[key].literals().len() {
                    let other = self.watches.watchers[key].literals()[offset];
                    if other != !literal && !self.minimize_literal(other, depth + 1) {
                        removable = false;
                    }
                }
                removable
            }
        };

        match removable {
            true => self.variables[index].minimize = true,
            false => self.variables[index].poison = true,
        }
        self.analyzed.push(index);
        removable
    }
}

#[cfg(test)]
mod tests {
    use crate::{config::Config, ring::Ring, ruler::Ruler, structures::literal::Literal};

    fn lit(external: i32) -> Literal {
        Literal::from_external(external).unwrap()
    }

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

    fn decide(ring: &mut Ring, literal: Literal) {
        ring.level += 1;
        ring.trail.level_starts.push(ring.trail.len());
        ring.assign_decision(literal);
    }

    #[test]
    fn glue_one_clauses_shrink_to_binary() {
        let (ruler, mut ring) = ring_over(&[&[-1, 2], &[-1, -2, -3, 4], &[-2, -3, -4]]);
        decide(&mut ring, lit(1));
        assert!(ring.propagate(None).is_none());
        decide(&mut ring, lit(3));
        let conflict = ring.propagate(None).unwrap();
        ring.analyze(&ruler, conflict);

        assert_eq!(ring.statistics.literals.shrunken, 1);
        assert_eq!(ring.statistics.learned.binary, 1);
        assert_eq!(ring.level, 1);
        assert_eq!(ring.value(lit(-3)), 1);
    }

    #[test]
    fn implied_literals_are_minimized() {
        let (ruler, mut ring) = ring_over(&[&[-1, 2], &[-5, -1, -2, -3, 4], &[-2, -3, -4]]);
        decide(&mut ring, lit(5));
        decide(&mut ring, lit(1));
        assert!(ring.propagate(None).is_none());
        decide(&mut ring, lit(3));
        let conflict = ring.propagate(None).unwrap();
        ring.analyze(&ruler, conflict);

        assert_eq!(ring.statistics.literals.minimized, 1);
        assert_eq!(ring.statistics.literals.deduced, 4);
        assert_eq!(ring.statistics.literals.learned, 3);

        let learnt = ring.watches.watchers.last().unwrap();
        assert_eq!(learnt.literals().len(), 3);
        assert_eq!(learnt.literals()[0], lit(-3));
        assert!(!learnt.literals().contains(&lit(-2)));
        assert_eq!(ring.value(lit(-3)), 1);
    }

    #[test]
    fn depth_bound_keeps_literals() {
        let mut config = Config::default();
        config.simplify.value = false;
        config.minimize_depth.value = 0;
        let mut ruler = Ruler::from_config(config);
        for clause in [&[-1, 2][..], &[-5, -1, -2, -3, 4], &[-2, -3, -4]] {
            ruler.add_clause(clause).unwrap();
        }
        ruler.prepare();
        let mut ring = Ring::new(&ruler, 0);

        decide(&mut ring, lit(5));
        decide(&mut ring, lit(1));
        assert!(ring.propagate(None).is_none());
        decide(&mut ring, lit(3));
        let conflict = ring.propagate(None).unwrap();
        ring.analyze(&ruler, conflict);

        assert_eq!(ring.statistics.literals.minimized, 0);
        assert_eq!(ring.statistics.literals.learned, 4);
    }
}
