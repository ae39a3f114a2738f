/*!
Literals, as small unsigned integers.

A literal packs a variable index and a polarity into a single `u32`, with the polarity in the low bit:
- `code = var * 2 + negative`
- `var = code >> 1`
- `¬code = code ^ 1`

As a consequence, literals may directly index arrays of size `2 * variables`, and the two literals of a variable are neighbours in such arrays.

External literals are the signed, one-based, non-zero integers of DIMACS.
[from_external](Literal::from_external) and [external](Literal::external) form a bijection between the two representations without any remapping of variables.
Remapping, for the compact index space used by rings, is handled by the [ruler](crate::ruler).

```rust
# use ring_sat::structures::literal::Literal;
let p = Literal::from_external(-3).unwrap();
assert_eq!(p.var(), 2);
assert!(p.is_negative());
assert_eq!((!p).external(), 3);
assert_eq!(Literal::from_external(p.external()), Some(p));
```
*/

/// A variable, as an index.
pub type Var = u32;

/// The largest representable variable index.
pub const MAX_VAR: Var = (1 << 30) - 1;

/// The largest representable literal code.
pub const MAX_LITERAL: u32 = 2 * MAX_VAR + 1;

/// A marker for a variable (or literal) without a mapped counterpart.
pub const INVALID: u32 = u32::MAX;

/// A literal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Literal(u32);

impl Literal {
    /// The literal of `var` with the given polarity.
    pub const fn new(var: Var, negative: bool) -> Self {
        Literal((var << 1) | negative as u32)
    }

    /// The literal with the given code.
    pub const fn from_code(code: u32) -> Self {
        Literal(code)
    }

    /// The code of the literal.
    pub const fn code(self) -> u32 {
        self.0
    }

    /// The code of the literal, as an index to arrays over literals.
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The variable of the literal.
    pub const fn var(self) -> Var {
        self.0 >> 1
    }

    /// The variable of the literal, as an index to arrays over variables.
    pub const fn var_index(self) -> usize {
        (self.0 >> 1) as usize
    }

    /// Whether the literal is the negative literal of its variable.
    pub const fn is_negative(self) -> bool {
        self.0 & 1 == 1
    }

    /// The negation of the literal.
    pub const fn negate(self) -> Self {
        Literal(self.0 ^ 1)
    }

    /// The literal corresponding to a signed, one-based, external literal.
    ///
    /// None if `external` is zero or outside the supported range of variables.
    pub fn from_external(external: i32) -> Option<Self> {
        if external == 0 || external == i32::MIN {
            return None;
        }
        let var = external.unsigned_abs() - 1;
        if var > MAX_VAR {
            return None;
        }
        Some(Literal::new(var, external < 0))
    }

    /// The signed, one-based, external literal corresponding to the literal.
    pub fn external(self) -> i32 {
        let magnitude = (self.var() + 1) as i32;
        match self.is_negative() {
            true => -magnitude,
            false => magnitude,
        }
    }

    /// The literal with the variable mapped through `map`, or None if the variable has no mapped counterpart.
    pub fn mapped(self, map: &[u32]) -> Option<Self> {
        match map.get(self.var_index()) {
            Some(&mapped) if mapped != INVALID => Some(Literal::new(mapped, self.is_negative())),
            _ => None,
        }
    }
}

impl std::ops::Not for Literal {
    type Output = Self;

    fn not(self) -> Self::Output {
        self.negate()
    }
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.external())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negation_flips_the_low_bit() {
        let p = Literal::new(7, false);
        assert_eq!(p.code(), 14);
        assert_eq!((!p).code(), 15);
        assert_eq!(!!p, p);
        assert_eq!(p.var(), (!p).var());
    }

    #[test]
    fn external_bijection() {
        for external in (-500..=500).filter(|e| *e != 0) {
            let literal = Literal::from_external(external).unwrap();
            assert_eq!(literal.external(), external);
        }
    }

    #[test]
    fn external_limits() {
        assert_eq!(Literal::from_external(0), None);
        assert_eq!(Literal::from_external(i32::MIN), None);

        let largest = (MAX_VAR + 1) as i32;
        let literal = Literal::from_external(-largest).unwrap();
        assert_eq!(literal.code(), MAX_LITERAL);
        assert_eq!(Literal::from_external(largest + 1), None);
    }

    #[test]
    fn mapping() {
        let map = [INVALID, 0, 1];
        assert_eq!(Literal::new(0, false).mapped(&map), None);
        assert_eq!(Literal::new(1, true).mapped(&map), Some(Literal::new(0, true)));
        assert_eq!(Literal::new(5, true).mapped(&map), None);
    }
}
