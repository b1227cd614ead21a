//! Discrete weighted distributions.
//!
//! Weights are stored in basis points (hundredths of a percent) so that
//! fractional percentages such as `0.05` stay exact. A draw is an integer in
//! `1..=10000`; the first outcome whose cumulative weight reaches the draw
//! wins, and the sampler's default covers the unassigned tail when the
//! weights sum to less than 100 %.

use rand::Rng;

/// Draws are taken from `1..=DRAW_SCALE`.
pub const DRAW_SCALE: u32 = 10_000;

/// Diagnosis count weights in basis points: 1→25 %, 2→30 % … 12→0.05 %.
pub const DIAGNOSIS_COUNT_WEIGHTS: [(usize, u32); 12] = [
    (1, 2500),
    (2, 3000),
    (3, 2000),
    (4, 1500),
    (5, 500),
    (6, 300),
    (7, 100),
    (8, 50),
    (9, 30),
    (10, 10),
    (11, 5),
    (12, 5),
];

#[derive(Debug, Clone)]
pub struct WeightedSampler<T> {
    outcomes: Vec<(T, u32)>,
    fallback: T,
}

impl<T: Copy> WeightedSampler<T> {
    /// Build a sampler from ordered `(outcome, basis_points)` pairs.
    ///
    /// Weights beyond [`DRAW_SCALE`] in total are unreachable; they are kept
    /// but never selected.
    pub fn new(outcomes: impl IntoIterator<Item = (T, u32)>, fallback: T) -> Self {
        Self {
            outcomes: outcomes.into_iter().collect(),
            fallback,
        }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> T {
        self.sample_with_draw(rng.random_range(1..=DRAW_SCALE))
    }

    /// Resolve a draw in `1..=DRAW_SCALE` to an outcome.
    pub fn sample_with_draw(&self, draw: u32) -> T {
        let mut cumulative = 0u32;
        for &(outcome, weight) in &self.outcomes {
            cumulative = cumulative.saturating_add(weight);
            if draw <= cumulative {
                return outcome;
            }
        }
        self.fallback
    }

    pub fn total_weight(&self) -> u32 {
        self.outcomes.iter().map(|(_, weight)| weight).sum()
    }
}

impl WeightedSampler<usize> {
    /// Sampler for the number of box 21 diagnoses, defaulting to one.
    pub fn diagnosis_count() -> Self {
        Self::new(DIAGNOSIS_COUNT_WEIGHTS, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn diagnosis_weights_cover_the_full_scale() {
        assert_eq!(WeightedSampler::diagnosis_count().total_weight(), DRAW_SCALE);
    }

    #[test]
    fn boundaries_pick_first_cumulative_match() {
        let sampler = WeightedSampler::diagnosis_count();
        assert_eq!(sampler.sample_with_draw(1), 1);
        assert_eq!(sampler.sample_with_draw(2500), 1);
        assert_eq!(sampler.sample_with_draw(2501), 2);
        assert_eq!(sampler.sample_with_draw(5500), 2);
        assert_eq!(sampler.sample_with_draw(5501), 3);
        assert_eq!(sampler.sample_with_draw(9800), 6);
        assert_eq!(sampler.sample_with_draw(9990), 10);
        assert_eq!(sampler.sample_with_draw(9991), 11);
        assert_eq!(sampler.sample_with_draw(9996), 12);
        assert_eq!(sampler.sample_with_draw(DRAW_SCALE), 12);
    }

    #[test]
    fn short_weights_fall_back_to_default() {
        let sampler = WeightedSampler::new([('a', 1000), ('b', 1000)], 'z');
        assert_eq!(sampler.sample_with_draw(1500), 'b');
        assert_eq!(sampler.sample_with_draw(2001), 'z');
    }

    #[test]
    fn samples_stay_in_range() {
        let sampler = WeightedSampler::diagnosis_count();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..2_000 {
            let count = sampler.sample(&mut rng);
            assert!((1..=12).contains(&count));
        }
    }
}
