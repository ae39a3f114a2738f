/*!
Exponential moving averages.

An average of a sequence `x₁, x₂, …` with smoothing factor `α` is updated by `biased += α (x - biased)`.
As the biased value starts at zero, early values are dominated by the start, and so the reported value is corrected by `1 - (1 - α)ⁿ` until the correction is negligible.

Rings keep averages of glue (with a fast and a slow factor), size, level, and trail length, which drive restarts in focused mode and gate the export of large clauses.
*/

/// An exponential moving average with bias correction.
#[derive(Clone, Copy, Debug)]
pub struct Average {
    value: f64,
    biased: f64,
    exp: f64,
    alpha: f64,
}

impl Average {
    pub fn new(alpha: f64) -> Self {
        debug_assert!(0.0 < alpha && alpha <= 1.0);
        Average {
            value: 0.0,
            biased: 0.0,
            exp: 1.0,
            alpha,
        }
    }

    /// The current (corrected) value of the average.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Updates the average with `x`.
    pub fn update(&mut self, x: f64) {
        self.biased += self.alpha * (x - self.biased);
        if self.exp > 0.0 {
            self.exp *= 1.0 - self.alpha;
            if self.exp < f64::EPSILON {
                self.exp = 0.0;
            }
        }
        self.value = match self.exp > 0.0 {
            true => self.biased / (1.0 - self.exp),
            false => self.biased,
        };
    }
}

/// A fast and a slow average of the same sequence.
#[derive(Clone, Copy, Debug)]
pub struct FastSlow {
    pub fast: Average,
    pub slow: Average,
}

impl FastSlow {
    pub fn new(fast_alpha: f64, slow_alpha: f64) -> Self {
        FastSlow {
            fast: Average::new(fast_alpha),
            slow: Average::new(slow_alpha),
        }
    }

    pub fn update(&mut self, x: f64) {
        self.fast.update(x);
        self.slow.update(x);
    }
}

/// The averages kept by a ring, one set for each mode.
#[derive(Clone, Copy, Debug)]
pub struct Averages {
    pub glue: FastSlow,
    pub level: Average,
    pub size: Average,
    pub trail: Average,
}

impl Averages {
    pub fn new(fast_alpha: f64, slow_alpha: f64) -> Self {
        Averages {
            glue: FastSlow::new(fast_alpha, slow_alpha),
            level: Average::new(fast_alpha),
            size: Average::new(fast_alpha),
            trail: Average::new(fast_alpha),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corrected_from_the_start() {
        let mut average = Average::new(0.1);
        average.update(4.0);
        assert!((average.value() - 4.0).abs() < 1e-9);
        average.update(4.0);
        assert!((average.value() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn fast_tracks_quicker_than_slow() {
        let mut averages = FastSlow::new(3e-2, 1e-5);
        for _ in 0..100 {
            averages.update(2.0);
        }
        for _ in 0..100 {
            averages.update(10.0);
        }
        assert!(averages.fast.value() > averages.slow.value());
        assert!(averages.fast.value() > 8.0);
    }
}
