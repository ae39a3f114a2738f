/*!
A single word cell holding at most one clause.

A [ClauseCell] holds either nothing, a packed [binary clause](crate::structures::clause::BinaryClause::pack), or the raw pointer of an [Arc] to a [LargeClause].
The three are distinguished by the word alone:
- Zero is empty.
- An odd word is a packed binary clause.
- Any other word is a pointer, as the allocation of a large clause is aligned to (at least) eight bytes.

Every transition of the cell is a single atomic swap, so a clause put into a cell is taken out at most once.
Ownership of the reference held by the [Arc] moves into the cell on [swap](ClauseCell::swap) and out of the cell on the following swap, and a cell which is dropped while holding a clause releases the reference.
*/

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use crate::structures::clause::{BinaryClause, ClauseRef, LargeClause};

const EMPTY: u64 = 0;

/// The cell.
#[derive(Debug, Default)]
pub struct ClauseCell {
    word: AtomicU64,
}

impl ClauseCell {
    /// Whether the cell holds a clause, at the time of the call.
    pub fn is_occupied(&self) -> bool {
        self.word.load(Ordering::Acquire) != EMPTY
    }

    /// Places `clause` in the cell, returning the clause previously held.
    pub fn swap(&self, clause: Option<ClauseRef>) -> Option<ClauseRef> {
        let word = Self::into_word(clause);
        let previous = self.word.swap(word, Ordering::AcqRel);
        // SAFETY: Every word stored in the cell is created by `into_word`, and the swap transfers ownership of the stored word to this call.
        unsafe { Self::from_word(previous) }
    }

    /// Takes the clause held in the cell, if any, leaving the cell empty.
    pub fn take(&self) -> Option<ClauseRef> {
        if !self.is_occupied() {
            return None;
        }
        self.swap(None)
    }

    fn into_word(clause: Option<ClauseRef>) -> u64 {
        match clause {
            None => EMPTY,
            Some(ClauseRef::Binary(binary)) => binary.pack(),
            Some(ClauseRef::Large(large)) => {
                let pointer = Arc::into_raw(large);
                debug_assert!(pointer as usize & 1 == 0);
                pointer as usize as u64
            }
        }
    }

    /// # Safety
    /// The word must have been created by `into_word`, and the caller must have exclusive ownership of the word.
    unsafe fn from_word(word: u64) -> Option<ClauseRef> {
        match word {
            EMPTY => None,
            _ if word & 1 == 1 => BinaryClause::unpack(word).map(ClauseRef::Binary),
            _ => {
                let pointer = word as usize as *const LargeClause;
                Some(ClauseRef::Large(unsafe { Arc::from_raw(pointer) }))
            }
        }
    }
}

impl Drop for ClauseCell {
    fn drop(&mut self) {
        let word = std::mem::take(self.word.get_mut());
        // SAFETY: As the cell is being dropped, no other reference to the word exists.
        drop(unsafe { Self::from_word(word) });
    }
}
