//! Uniform random numbers for spawning.
//!
//! The effect only ever needs one thing from randomness: a real number in
//! `[0, 1)`. Any [`rand::RngCore`] provides that; [`SequenceRandom`] replays
//! fixed values for scripted scenes and tests.

use rand::Rng;

/// Source of uniform samples in `[0, 1)`.
pub trait RandomSource {
    /// Next sample in `[0, 1)`.
    fn next_unit(&mut self) -> f32;
}

impl<R: rand::RngCore> RandomSource for R {
    #[inline]
    fn next_unit(&mut self) -> f32 {
        self.gen::<f32>()
    }
}

/// Replays a fixed list of samples, cycling when exhausted.
///
/// Values are returned as given, even outside `[0, 1)`, so callers can
/// exercise their clamping.
#[derive(Clone, Debug)]
pub struct SequenceRandom {
    values: Vec<f32>,
    cursor: usize,
}

impl SequenceRandom {
    /// Create a sequence. An empty list behaves like `[0.0]`.
    pub fn new(values: Vec<f32>) -> Self {
        let values = if values.is_empty() { vec![0.0] } else { values };
        Self { values, cursor: 0 }
    }
}

impl RandomSource for SequenceRandom {
    fn next_unit(&mut self) -> f32 {
        let value = self.values[self.cursor];
        self.cursor = (self.cursor + 1) % self.values.len();
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_sequence_cycles() {
        let mut rng = SequenceRandom::new(vec![0.1, 0.2]);
        assert_eq!(rng.next_unit(), 0.1);
        assert_eq!(rng.next_unit(), 0.2);
        assert_eq!(rng.next_unit(), 0.1);
    }

    #[test]
    fn test_empty_sequence_yields_zero() {
        let mut rng = SequenceRandom::new(Vec::new());
        assert_eq!(rng.next_unit(), 0.0);
        assert_eq!(rng.next_unit(), 0.0);
    }

    #[test]
    fn test_rng_samples_unit_interval() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let u = rng.next_unit();
            assert!((0.0..1.0).contains(&u));
        }
    }
}
