use crate::networks::Brain;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// A collection of reproductively compatible brains: every member lies
/// within the compatibility-distance threshold of the species champion.
///
/// The champion is the best-scoring member tracked so far; a species
/// that fails to improve its champion's fitness for the configured
/// number of consecutive generations stagnates and is removed at the
/// start of the following generation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Species {
    pub(super) members: Vec<Brain>,
    champion: Option<Brain>,
    shared_fitness: f64,
    stagnation: usize,
}

impl Species {
    /// Creates a species over the given members.
    pub(super) fn new(members: Vec<Brain>) -> Species {
        Species {
            members,
            champion: None,
            shared_fitness: 0.0,
            stagnation: 0,
        }
    }

    /// Creates a species seeded with a single founding member.
    pub(super) fn seeded(founder: Brain) -> Species {
        Species::new(vec![founder])
    }

    /// Returns an iterator over the species' members.
    pub fn members(&self) -> impl Iterator<Item = &Brain> {
        self.members.iter()
    }

    /// Returns the number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns whether the species has no members left.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Returns the best-scoring brain tracked so far, if the species
    /// has been evaluated at all.
    pub fn champion(&self) -> Option<&Brain> {
        self.champion.as_ref()
    }

    /// Returns the sum of the members' fitness-sharing-normalized
    /// fitness values, as of the last sharing pass.
    pub fn shared_fitness(&self) -> f64 {
        self.shared_fitness
    }

    pub(super) fn set_shared_fitness(&mut self, shared_fitness: f64) {
        self.shared_fitness = shared_fitness;
    }

    /// Returns the number of consecutive generations without a
    /// champion-fitness improvement.
    pub fn time_stagnated(&self) -> usize {
        self.stagnation
    }

    /// Scores every member, sorts them by descending fitness, and
    /// updates the champion and the stagnation counter.
    ///
    /// The sort is stable so that runs with a fixed random seed stay
    /// reproducible under fitness ties.
    pub(super) fn evaluate<F>(&mut self, scorer: &mut F)
    where
        F: FnMut(&mut Brain) -> f64,
    {
        let previous_best = self.champion.as_ref().map_or(0.0, Brain::fitness);

        for member in &mut self.members {
            let fitness = scorer(member);
            assert!(fitness >= 0.0, "fitness function returned a negative value");
            member.set_fitness(fitness);
        }
        self.members.sort_by(|a, b| {
            b.fitness()
                .partial_cmp(&a.fitness())
                .unwrap_or_else(|| panic!("invalid fitness values detected (NaN)"))
        });

        if let Some(best) = self.members.first() {
            let improved = self
                .champion
                .as_ref()
                .map_or(true, |champion| best.fitness() > champion.fitness());
            if improved {
                self.champion = Some(best.clone());
            }
        }

        let best_now = self.champion.as_ref().map_or(0.0, Brain::fitness);
        if best_now > previous_best {
            self.stagnation = 0;
        } else {
            self.stagnation += 1;
        }
    }

    /// Probabilistically drops lower-ranked members. Members must be
    /// sorted by descending fitness; the drop probability rises from
    /// near zero for the best-ranked member to near one for the worst,
    /// and rank 0 is never dropped.
    pub(super) fn cull(&mut self, steepness: f64, rng: &mut impl Rng) {
        let count = self.members.len();
        for rank in (1..count).rev() {
            if rng.gen::<f64>() < tanh_cutoff(rank, count, steepness) {
                self.members.remove(rank);
            }
        }
    }
}

/// Smooth rank cutoff used for culling: 0.5 * (1 + tanh(2m·rank/n - m)).
fn tanh_cutoff(rank: usize, count: usize, steepness: f64) -> f64 {
    let (x, n) = (rank as f64, count as f64);
    0.5 * (1.0 + (2.0 * steepness * x / n - steepness).tanh())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genomics::{GeneticConfig, Genome};

    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use std::num::NonZeroUsize;

    fn members(count: usize) -> Vec<Brain> {
        let config = GeneticConfig::new(
            NonZeroUsize::new(2).unwrap(),
            NonZeroUsize::new(1).unwrap(),
        );
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        (0..count)
            .map(|_| Brain::new(Genome::minimal(&config, &mut rng)))
            .collect()
    }

    #[test]
    fn cutoff_is_monotone_in_rank() {
        assert!(tanh_cutoff(1, 100, 5.0) < 1e-4);
        assert!(tanh_cutoff(99, 100, 5.0) > 0.999);
        for rank in 1..99 {
            assert!(tanh_cutoff(rank, 100, 5.0) <= tanh_cutoff(rank + 1, 100, 5.0));
        }
    }

    #[test]
    fn culling_never_drops_the_best_member() {
        let mut species = Species::new(members(30));
        let mut scores = (0..30).rev().map(|i| i as f64);
        species.evaluate(&mut |_| scores.next().unwrap());
        let best = species.members[0].fitness();

        let mut rng = ChaCha8Rng::seed_from_u64(23);
        species.cull(5.0, &mut rng);

        assert!(!species.is_empty());
        assert!(species.len() < 30);
        assert_eq!(species.members[0].fitness(), best);
    }

    #[test]
    fn stagnation_counts_generations_without_improvement() {
        let mut species = Species::new(members(3));

        species.evaluate(&mut |_| 1.0);
        assert_eq!(species.time_stagnated(), 0);

        species.evaluate(&mut |_| 1.0);
        assert_eq!(species.time_stagnated(), 1);

        species.evaluate(&mut |_| 2.0);
        assert_eq!(species.time_stagnated(), 0);
        assert_eq!(species.champion().unwrap().fitness(), 2.0);
    }
}
