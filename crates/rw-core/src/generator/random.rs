use rand::Rng;
use rand::rngs::{StdRng, ThreadRng};

/// Largest `f64` strictly below `1.0`.
const MAX_UNIT: f64 = 1.0 - f64::EPSILON / 2.0;

/// Uniform random draws consumed by the generator.
///
/// Implemented for the `rand` generators used in production and for
/// [`ReplaySource`], which replays a fixed sequence in tests.
pub trait RandomSource {
    /// Next uniform draw in `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    /// Uniform index into a non-empty collection of `len` items.
    fn pick_index(&mut self, len: usize) -> usize {
        let idx = (self.next_unit() * len as f64) as usize;
        idx.min(len.saturating_sub(1))
    }
}

impl RandomSource for StdRng {
    fn next_unit(&mut self) -> f64 {
        self.random::<f64>()
    }
}

impl RandomSource for ThreadRng {
    fn next_unit(&mut self) -> f64 {
        self.random::<f64>()
    }
}

impl<S: RandomSource + ?Sized> RandomSource for Box<S> {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

/// Replays a fixed sequence of draws, wrapping around at the end.
#[derive(Debug, Clone)]
pub struct ReplaySource {
    draws: Vec<f64>,
    pos: usize,
}

impl ReplaySource {
    /// Panics if `draws` is empty.
    pub fn new(draws: impl Into<Vec<f64>>) -> Self {
        let draws = draws.into();
        assert!(!draws.is_empty(), "replay source needs at least one draw");
        Self { draws, pos: 0 }
    }

    /// Number of draws consumed so far.
    pub fn consumed(&self) -> usize {
        self.pos
    }
}

impl RandomSource for ReplaySource {
    fn next_unit(&mut self) -> f64 {
        let v = self.draws[self.pos % self.draws.len()];
        self.pos += 1;
        v.clamp(0.0, MAX_UNIT)
    }
}
