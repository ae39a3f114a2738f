/*!
Binary and large clauses, and handles to either.

# Binary clauses

Clauses of two literals dominate most formulas, and so binary clauses are never allocated.
A [BinaryClause] is a plain value of an *anchor* literal, the *other* literal, and a flag for whether the clause is redundant (learnt), and each watch list holding a binary clause holds its own copy of the value.

A binary clause viewed from the watch list of its other literal is the [flipped](BinaryClause::flipped) clause, and so the clause is recoverable, identically, from either list.

For transport through the lock-free [buckets](crate::pool) a binary clause [packs](BinaryClause::pack) into a single word with the lowest bit set.
The lowest bit of the address of a large clause is never set, and so a single word distinguishes the two.

# Large clauses

Clauses of three or more literals are stored as a [LargeClause] behind an [Arc], so the same clause may be watched by every ring.
Apart from a handful of flags, a large clause is immutable once created.
- The glue of a clause may only decrease, through [promotion](LargeClause::promote), and may be lowered by any ring.
- The vivified flag is only ever set, by the first ring which strengthens the clause.
- The garbage flag is only ever set, when the clause is satisfied by some globally fixed literal.

Reference counts are those of the [Arc], and so a clause is freed exactly once, when the last ring (or pool bucket) holding the clause releases it.
*/

use std::sync::{
    atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering},
    Arc,
};

use crate::structures::literal::{Literal, INVALID};

/// The maximum glue recorded for a clause.
pub const MAX_GLUE: u32 = 255;

/// A source of fresh clause identifiers, shared by every ring.
static CLAUSE_IDS: AtomicU64 = AtomicU64::new(0);

/// A clause of exactly two literals.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BinaryClause {
    /// The literal whose watch list holds this copy of the clause.
    pub anchor: Literal,

    /// The other literal of the clause.
    pub other: Literal,

    /// Whether the clause was learnt.
    pub redundant: bool,
}

impl BinaryClause {
    pub fn new(anchor: Literal, other: Literal, redundant: bool) -> Self {
        BinaryClause {
            anchor,
            other,
            redundant,
        }
    }

    /// The same clause, as seen from the watch list of the other literal.
    pub fn flipped(self) -> Self {
        BinaryClause {
            anchor: self.other,
            other: self.anchor,
            redundant: self.redundant,
        }
    }

    /// The literals of the clause, anchor first.
    pub fn literals(&self) -> [Literal; 2] {
        [self.anchor, self.other]
    }

    /// Packs the clause into a word whose lowest bit is set.
    ///
    /// Bit 1 holds the redundant flag, bits 2 to 32 the anchor, and bits 33 to 63 the other literal.
    pub fn pack(self) -> u64 {
        debug_assert!(self.anchor.code() < (1 << 31));
        debug_assert!(self.other.code() < (1 << 31));
        1 | (self.redundant as u64) << 1
            | (self.anchor.code() as u64) << 2
            | (self.other.code() as u64) << 33
    }

    /// The clause packed into `word`, or None if the word does not hold a binary clause.
    pub fn unpack(word: u64) -> Option<Self> {
        if word & 1 == 0 {
            return None;
        }
        let mask = (1_u64 << 31) - 1;
        Some(BinaryClause {
            anchor: Literal::from_code(((word >> 2) & mask) as u32),
            other: Literal::from_code(((word >> 33) & mask) as u32),
            redundant: (word >> 1) & 1 == 1,
        })
    }
}

/// A clause of at least three literals, shared between rings.
#[derive(Debug)]
pub struct LargeClause {
    id: u64,
    origin: u32,
    redundant: bool,
    glue: AtomicU32,
    garbage: AtomicBool,
    subsume: AtomicBool,
    vivified: AtomicBool,
    literals: Box<[Literal]>,
}

impl LargeClause {
    /// A fresh clause of the given literals, with glue clamped to [MAX_GLUE].
    pub fn new(literals: &[Literal], redundant: bool, glue: u32, origin: usize) -> Arc<Self> {
        debug_assert!(literals.len() > 2);
        Arc::new(LargeClause {
            id: CLAUSE_IDS.fetch_add(1, Ordering::Relaxed),
            origin: origin as u32,
            redundant,
            glue: AtomicU32::new(glue.min(MAX_GLUE)),
            garbage: AtomicBool::new(false),
            subsume: AtomicBool::new(false),
            vivified: AtomicBool::new(false),
            literals: literals.into(),
        })
    }

    /// The identifier of the clause, unique over all rings.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The id of the ring which created the clause.
    pub fn origin(&self) -> usize {
        self.origin as usize
    }

    pub fn is_redundant(&self) -> bool {
        self.redundant
    }

    pub fn glue(&self) -> u32 {
        self.glue.load(Ordering::Relaxed)
    }

    /// Lowers the glue of the clause to `glue`, if lower, and returns the resulting glue.
    pub fn promote(&self, glue: u32) -> u32 {
        let previous = self.glue.fetch_min(glue, Ordering::Relaxed);
        previous.min(glue)
    }

    pub fn size(&self) -> usize {
        self.literals.len()
    }

    pub fn literals(&self) -> &[Literal] {
        &self.literals
    }

    pub fn is_garbage(&self) -> bool {
        self.garbage.load(Ordering::Relaxed)
    }

    /// Notes the clause is satisfied by a globally fixed literal.
    pub fn mark_garbage(&self) {
        self.garbage.store(true, Ordering::Relaxed)
    }

    pub fn is_vivified(&self) -> bool {
        self.vivified.load(Ordering::Relaxed)
    }

    /// Notes some ring has strengthened the clause, after which other rings may drop their watchers.
    pub fn mark_vivified(&self) {
        self.vivified.store(true, Ordering::Relaxed)
    }

    /// Whether the clause is a candidate for subsumption checks during simplification.
    pub fn is_subsume(&self) -> bool {
        self.subsume.load(Ordering::Relaxed)
    }

    pub fn set_subsume(&self, value: bool) {
        self.subsume.store(value, Ordering::Relaxed)
    }

    /// A copy of the clause with each variable mapped through `map`, keeping identity, glue, and flags.
    ///
    /// None if some variable of the clause has no counterpart in the map.
    pub fn remapped(&self, map: &[u32]) -> Option<Arc<Self>> {
        let mut literals = Vec::with_capacity(self.size());
        for literal in self.literals() {
            match map.get(literal.var_index()) {
                Some(&mapped) if mapped != INVALID => {
                    literals.push(Literal::new(mapped, literal.is_negative()))
                }
                _ => return None,
            }
        }
        Some(Arc::new(LargeClause {
            id: self.id,
            origin: self.origin,
            redundant: self.redundant,
            glue: AtomicU32::new(self.glue()),
            garbage: AtomicBool::new(self.is_garbage()),
            subsume: AtomicBool::new(self.is_subsume()),
            vivified: AtomicBool::new(self.is_vivified()),
            literals: literals.into(),
        }))
    }
}

impl std::fmt::Display for LargeClause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "clause[{}] glue {} (", self.id, self.glue())?;
        for (index, literal) in self.literals.iter().enumerate() {
            match index {
                0 => write!(f, "{literal}")?,
                _ => write!(f, " {literal}")?,
            }
        }
        write!(f, ")")
    }
}

/// A handle to a clause, either an inline binary clause or a shared large clause.
#[derive(Clone, Debug)]
pub enum ClauseRef {
    Binary(BinaryClause),
    Large(Arc<LargeClause>),
}

impl ClauseRef {
    /// A handle to the binary clause of `anchor` and `other`.
    pub fn binary(anchor: Literal, other: Literal, redundant: bool) -> Self {
        ClauseRef::Binary(BinaryClause::new(anchor, other, redundant))
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, ClauseRef::Binary(_))
    }

    /// The anchor of a binary clause.
    pub fn anchor(&self) -> Option<Literal> {
        match self {
            ClauseRef::Binary(binary) => Some(binary.anchor),
            ClauseRef::Large(_) => None,
        }
    }

    /// The other literal of a binary clause.
    pub fn other(&self) -> Option<Literal> {
        match self {
            ClauseRef::Binary(binary) => Some(binary.other),
            ClauseRef::Large(_) => None,
        }
    }

    pub fn is_redundant(&self) -> bool {
        match self {
            ClauseRef::Binary(binary) => binary.redundant,
            ClauseRef::Large(clause) => clause.is_redundant(),
        }
    }

    /// The glue of the clause, where a binary clause always has glue one.
    pub fn glue(&self) -> u32 {
        match self {
            ClauseRef::Binary(_) => 1,
            ClauseRef::Large(clause) => clause.glue(),
        }
    }

    pub fn size(&self) -> usize {
        match self {
            ClauseRef::Binary(_) => 2,
            ClauseRef::Large(clause) => clause.size(),
        }
    }

    /// A copy of the literals of the clause.
    pub fn to_vec(&self) -> Vec<Literal> {
        match self {
            ClauseRef::Binary(binary) => binary.literals().to_vec(),
            ClauseRef::Large(clause) => clause.literals().to_vec(),
        }
    }

    /// The redundancy rank of the clause, where lower is better.
    ///
    /// The rank packs glue and size into a single word, with the more significant of the two given by `by_size`.
    pub fn redundancy(&self, by_size: bool) -> u64 {
        let glue = self.glue() as u64;
        let size = self.size() as u64;
        match by_size {
            true => (size << 32) + glue,
            false => (glue << 32) + size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(code: u32) -> Literal {
        Literal::from_code(code)
    }

    #[test]
    fn binary_flip() {
        let clause = BinaryClause::new(lit(4), lit(9), true);
        assert_eq!(clause.flipped().anchor, lit(9));
        assert_eq!(clause.flipped().flipped(), clause);
    }

    #[test]
    fn binary_pack_limits() {
        use crate::structures::literal::MAX_LITERAL;

        for (a, b) in [(0, 1), (MAX_LITERAL, 0), (0, MAX_LITERAL), (MAX_LITERAL, MAX_LITERAL - 1)] {
            for redundant in [false, true] {
                let clause = BinaryClause::new(lit(a), lit(b), redundant);
                let word = clause.pack();
                assert_eq!(word & 1, 1);
                assert_eq!(BinaryClause::unpack(word), Some(clause));
            }
        }
        assert_eq!(BinaryClause::unpack(8), None);
    }

    #[test]
    fn glue_is_clamped_and_only_lowered() {
        let clause = LargeClause::new(&[lit(0), lit(2), lit(4)], true, 1000, 0);
        assert_eq!(clause.glue(), MAX_GLUE);
        assert_eq!(clause.promote(7), 7);
        assert_eq!(clause.promote(9), 7);
        assert_eq!(clause.glue(), 7);
    }

    #[test]
    fn remapping() {
        let clause = LargeClause::new(&[lit(0), lit(3), lit(5)], false, 2, 1);
        let map = [1, 0, 2];
        let mapped = clause.remapped(&map).unwrap();
        assert_eq!(mapped.id(), clause.id());
        assert_eq!(mapped.literals(), &[lit(2), lit(1), lit(5)]);

        let map = [1, INVALID, 2];
        assert!(clause.remapped(&map).is_none());
    }

    #[test]
    fn redundancy_rank() {
        let binary = ClauseRef::binary(lit(0), lit(2), true);
        let large = ClauseRef::Large(LargeClause::new(&[lit(0), lit(2), lit(4), lit(6)], true, 3, 0));
        assert_eq!(binary.redundancy(false), (1 << 32) + 2);
        assert_eq!(large.redundancy(false), (3 << 32) + 4);
        assert_eq!(large.redundancy(true), (4 << 32) + 3);
        assert!(binary.redundancy(false) < large.redundancy(false));
    }
}
