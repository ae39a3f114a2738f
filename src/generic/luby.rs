/*!
The luby sequence, and reluctant doubling.

See <https://oeis.org/A182105> for details on the luby sequence.

The sequence is generated by Knuth's *reluctant doubling* formula, where a pair `(u, v)` steps to `(u + 1, 1)` if `u & -u == v`, and to `(u, 2v)` otherwise, with `v` the current element of the sequence.

In stable mode restarts are scheduled by multiplying elements of the sequence with a base interval of conflicts, and the sequence is [reset](Luby::reset) on each switch to stable mode.
*/

/// Representation used for numbers in a luby sequence.
pub type LubyRepresentation = u64;

/// Foundation of the iterator.
#[derive(Clone, Copy, Debug)]
pub struct Luby {
    u: LubyRepresentation,
    v: LubyRepresentation,
}

// The default iterator has already produced the first element of the sequence.
impl Default for Luby {
    fn default() -> Self {
        Luby { u: 1, v: 1 }
    }
}

impl Iterator for Luby {
    type Item = LubyRepresentation;

    fn next(&mut self) -> Option<Self::Item> {
        if self.u & self.u.wrapping_neg() == self.v {
            self.u = self.u.checked_add(1)?;
            self.v = 1;
        } else {
            self.v = self.v.checked_add(self.v)?;
        }

        Some(self.v)
    }
}

impl Luby {
    /// The current element of the sequence.
    pub fn current(&self) -> LubyRepresentation {
        self.v
    }

    /// Returns to the start of the sequence.
    pub fn reset(&mut self) {
        *self = Luby::default()
    }
}
