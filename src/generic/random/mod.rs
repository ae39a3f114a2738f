//! Sources of randomness, and helpers for choosing peers.

mod minimal_pcg;

pub use minimal_pcg::MinimalPCG32;

/// A uniformly chosen index of `0..rings` other than `id`.
///
/// Requires at least two rings.
pub fn random_other(rng: &mut impl rand::Rng, id: usize, rings: usize) -> usize {
    debug_assert!(rings > 1 && id < rings);
    let other = rng.random_range(0..rings - 1);
    match other < id {
        true => other,
        false => other + 1,
    }
}

/// The least `k` with `2^k ≥ n`.
pub fn log2ceil(n: usize) -> usize {
    match n {
        0 | 1 => 0,
        _ => (usize::BITS - (n - 1).leading_zeros()) as usize,
    }
}

/// `m · log₁₀(m)²` for `m = n + 9`, used to scale intervals which should grow slowly with their count.
pub fn nlogn(n: u64) -> f64 {
    let m = (n + 9) as f64;
    m * m.log10() * m.log10()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn other_is_never_self() {
        let mut rng = MinimalPCG32::seed_from_u64(0);
        for rings in 2..6 {
            for id in 0..rings {
                for _ in 0..20 {
                    let other = random_other(&mut rng, id, rings);
                    assert_ne!(other, id);
                    assert!(other < rings);
                }
            }
        }
    }

    #[test]
    fn log2ceil_values() {
        assert_eq!(log2ceil(1), 0);
        assert_eq!(log2ceil(2), 1);
        assert_eq!(log2ceil(3), 2);
        assert_eq!(log2ceil(4), 2);
        assert_eq!(log2ceil(5), 3);
    }
}
