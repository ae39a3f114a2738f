/*!
The trail of assigned literals.

The trail records literals in order of assignment, along with:
- The position of each assigned variable on the trail, for constant time lookup.
- A *propagate* cursor, before which every literal has been propagated.
- The start of each decision level above zero.

# Out of order assignments

A literal may be assigned at a level lower than the current decision level, e.g. when an imported clause is found to be unit at some earlier level.
As such, the literals of a level need not be contiguous on the trail.
When [backtracking](crate::procedures::backjump) literals of lower levels found above the target level are kept, and moved down the trail.
*/

use crate::structures::literal::Literal;

/// The trail struct.
#[derive(Clone, Debug, Default)]
pub struct Trail {
    /// Assigned literals, in order of assignment.
    pub literals: Vec<Literal>,

    /// The position of each assigned variable on the trail, indexed by variable.
    pub positions: Vec<usize>,

    /// Literals before this position have been propagated.
    pub propagate: usize,

    /// The trail position at which each level above zero starts, so `level_starts[l]` is the start of level `l + 1`.
    pub level_starts: Vec<usize>,
}

impl Trail {
    pub fn new(variables: usize) -> Self {
        Trail {
            literals: Vec::with_capacity(variables),
            positions: vec![0; variables],
            propagate: 0,
            level_starts: Vec::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// Appends `literal` to the trail, noting its position.
    pub fn push(&mut self, literal: Literal) {
        self.positions[literal.var_index()] = self.literals.len();
        self.literals.push(literal);
    }

    /// Whether every literal on the trail has been propagated.
    pub fn fully_propagated(&self) -> bool {
        self.propagate == self.literals.len()
    }

    /// The decision of the given level, which must be above zero.
    pub fn decision(&self, level: u32) -> Literal {
        self.literals[self.level_starts[level as usize - 1]]
    }

    /// Moves the propagate cursor back to the position of the variable of `literal`.
    pub fn repropagate_from(&mut self, literal: Literal) {
        let position = self.positions[literal.var_index()];
        if position < self.propagate {
            self.propagate = position;
        }
    }
}
