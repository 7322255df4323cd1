use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::schema::Relations;

/// Per-tie-type sampling caps. Strong ties are never capped.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SamplingConfig {
    pub max_moderate: usize,
    pub max_weak: usize,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            max_moderate: 5,
            max_weak: 3,
        }
    }
}

/// Stratified neighbor sampling: strong ties pass through unchanged,
/// moderate and weak ties are down-sampled to their caps.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelationSampler {
    config: SamplingConfig,
}

impl RelationSampler {
    pub fn new(config: SamplingConfig) -> Self {
        Self { config }
    }

    /// Returns a new Relations with `moderate`/`weak` replaced by a uniform
    /// sample without replacement of size min(cap, available). The input is
    /// not mutated. The RNG is caller-supplied so runs can be seeded.
    pub fn sample<R: Rng>(&self, relations: &Relations, rng: &mut R) -> Relations {
        Relations {
            strong: relations.strong.clone(),
            moderate: sample_up_to(&relations.moderate, self.config.max_moderate, rng),
            weak: sample_up_to(&relations.weak, self.config.max_weak, rng),
        }
    }
}

fn sample_up_to<R: Rng>(ids: &[u64], cap: usize, rng: &mut R) -> Vec<u64> {
    let n = cap.min(ids.len());
    ids.choose_multiple(rng, n).copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn relations() -> Relations {
        Relations {
            strong: vec![1, 2, 3, 4, 5, 6, 7, 8],
            moderate: (10..30).collect(),
            weak: vec![40, 41],
        }
    }

    #[test]
    fn test_strong_passthrough_and_caps() {
        let sampler = RelationSampler::new(SamplingConfig::default());
        let mut rng = StdRng::seed_from_u64(1);
        let input = relations();
        let sampled = sampler.sample(&input, &mut rng);

        assert_eq!(sampled.strong, input.strong);
        assert_eq!(sampled.moderate.len(), 5);
        // fewer weak ties than the cap: all of them survive
        assert_eq!(sampled.weak.len(), 2);
    }

    #[test]
    fn test_sample_without_replacement_subset() {
        let sampler = RelationSampler::new(SamplingConfig::default());
        let mut rng = StdRng::seed_from_u64(2);
        let input = relations();
        let sampled = sampler.sample(&input, &mut rng);

        let mut seen = std::collections::HashSet::new();
        for id in &sampled.moderate {
            assert!(input.moderate.contains(id));
            assert!(seen.insert(*id), "duplicate id {} in sample", id);
        }
    }

    #[test]
    fn test_input_not_mutated() {
        let sampler = RelationSampler::new(SamplingConfig::default());
        let mut rng = StdRng::seed_from_u64(3);
        let input = relations();
        let before = input.clone();
        let _ = sampler.sample(&input, &mut rng);
        assert_eq!(input, before);
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let sampler = RelationSampler::new(SamplingConfig::default());
        let input = relations();

        let a = sampler.sample(&input, &mut StdRng::seed_from_u64(42));
        let b = sampler.sample(&input, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_relations() {
        let sampler = RelationSampler::new(SamplingConfig::default());
        let mut rng = StdRng::seed_from_u64(4);
        let sampled = sampler.sample(&Relations::default(), &mut rng);
        assert!(sampled.is_empty());
    }
}
