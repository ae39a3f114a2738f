//! Per-variable records of a ring.
//!
//! Each ring keeps a [Variable] and a [Phases] record for each variable of its index space.
//! Records are created when a ring is cloned and remapped when a ring is compacted, and are never shared between rings.

use crate::{db::watches::WatcherKey, structures::clause::BinaryClause};

/// The reason a literal was assigned.
///
/// Decisions and units have no reason.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reason {
    /// A binary clause, whose anchor is the assigned literal and whose other literal is false.
    Binary(BinaryClause),

    /// A large clause, through the key of its watcher.
    Large(WatcherKey),
}

/// A clause found false on the current assignment.
///
/// Conflicts share the representation of reasons, and for a binary conflict both literals are false.
pub type Conflict = Reason;

/// The state of a variable.
#[derive(Clone, Copy, Debug, Default)]
pub struct Variable {
    /// The level of the assignment to the variable, if any.
    pub level: u32,

    /// The reason for the assignment, if the assignment was propagated above level zero.
    pub reason: Option<Reason>,

    /// Seen during analysis.
    pub seen: bool,

    /// Known to be not removable during minimization.
    pub poison: bool,

    /// Known to be removable during minimization.
    pub minimize: bool,

    /// Part of the block of literals being shrunk.
    pub shrinkable: bool,
}

impl Variable {
    /// Clears every analysis flag.
    pub fn clear_flags(&mut self) {
        self.seen = false;
        self.poison = false;
        self.minimize = false;
        self.shrinkable = false;
    }
}

/// Phases of a variable, each as a value in `{-1, 0, 1}`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Phases {
    /// The value of the most recent assignment, or the initial phase.
    pub saved: i8,

    /// The value on the longest conflict free trail since the last rephase, used in stable mode.
    pub target: i8,

    /// The value on the longest conflict free trail since the last rephase, in any mode.
    pub best: i8,
}

impl Phases {
    pub fn new(initial: i8) -> Self {
        Phases {
            saved: initial,
            target: 0,
            best: 0,
        }
    }
}
