//! A population is a collection of brains, grouped into species,
//! which can be evolved using a scoring function as the source of
//! selective pressure.
//!
//! One generation, as performed by [`Population::evolve`] followed by
//! [`Population::evaluate_fitness`], consists of: extinction of
//! stagnated species, fitness sharing, offspring allotment, culling,
//! breeding, re-speciation, and re-evaluation, in that order. Each
//! step relies on invariants the previous one established.

mod config;
pub mod logging;
mod offspring;
mod species;

pub use config::PopulationConfig;
pub use logging::GenerationSummary;
pub use species::Species;

use crate::genomics::{compatibility_distance, sharing, GeneticConfig, Genome, History};
use crate::networks::Brain;
use offspring::Breeder;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// The full set of species competing to optimize a scoring function,
/// together with the overall champion and the innovation bookkeeping
/// shared by every lineage.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Population {
    species: Vec<Species>,
    champion: Option<Brain>,
    history: History,
    generation: usize,
    genetic_config: GeneticConfig,
    population_config: PopulationConfig,
}

impl Population {
    /// Creates a population of minimal genomes: sensor and output
    /// nodes, one enabled connection from every sensor to every
    /// output, randomized weights. All members start in one founding
    /// species.
    ///
    /// # Examples
    /// ```
    /// use neatcore::genomics::GeneticConfig;
    /// use neatcore::populations::{Population, PopulationConfig};
    /// use rand::{rngs::StdRng, SeedableRng};
    /// use std::num::NonZeroUsize;
    ///
    /// let mut rng = StdRng::seed_from_u64(7);
    /// let population = Population::new(
    ///     GeneticConfig::new(
    ///         NonZeroUsize::new(2).unwrap(),
    ///         NonZeroUsize::new(1).unwrap(),
    ///     ),
    ///     PopulationConfig::new(NonZeroUsize::new(50).unwrap()),
    ///     &mut rng,
    /// );
    ///
    /// assert_eq!(population.size(), 50);
    /// assert_eq!(population.species().count(), 1);
    /// ```
    pub fn new(
        genetic_config: GeneticConfig,
        population_config: PopulationConfig,
        rng: &mut impl Rng,
    ) -> Population {
        let members = (0..population_config.size.get())
            .map(|_| Brain::new(Genome::minimal(&genetic_config, rng)))
            .collect();
        Population {
            species: vec![Species::new(members)],
            champion: None,
            history: History::new(&genetic_config),
            generation: 0,
            genetic_config,
            population_config,
        }
    }

    /// Scores every brain in the population, updating each species'
    /// champion and stagnation counter and the overall champion.
    ///
    /// The scorer is called once per brain and may drive the network
    /// through [`Brain::activate`](crate::networks::Brain::activate);
    /// it must not change the network's topology. Returned values must
    /// be non-negative.
    pub fn evaluate_fitness<F>(&mut self, mut scorer: F)
    where
        F: FnMut(&mut Brain) -> f64,
    {
        for species in &mut self.species {
            species.evaluate(&mut scorer);
            if let Some(champion) = species.champion() {
                let improved = self
                    .champion
                    .as_ref()
                    .map_or(true, |best| champion.fitness() > best.fitness());
                if improved {
                    self.champion = Some(champion.clone());
                }
            }
        }
    }

    /// Advances the population by one generation: stagnated species
    /// go extinct, fitness sharing and offspring quotas are computed
    /// from the last evaluation, species are culled and bred back up
    /// to their quotas, and members that drifted too far from their
    /// species' champion are re-speciated.
    ///
    /// Call [`evaluate_fitness`](Population::evaluate_fitness) before
    /// the first `evolve` and after each one.
    pub fn evolve(&mut self, rng: &mut impl Rng) {
        self.history.begin_generation();
        self.remove_stagnated_species();
        self.update_shared_fitness();
        let quotas = self.offspring_quotas();
        for species in &mut self.species {
            species.cull(self.population_config.culling_steepness, rng);
        }
        let mut breeder = Breeder::new(
            &mut self.history,
            &self.genetic_config,
            &self.population_config,
        );
        for (species, quota) in self.species.iter_mut().zip(&quotas) {
            breeder.breed_species(species, *quota, rng);
        }
        self.respeciate();
        self.generation += 1;
    }

    /// Runs the full evolution loop for `generations` generations,
    /// invoking `observer` with a summary after every evaluation.
    ///
    /// # Examples
    /// ```
    /// use neatcore::genomics::GeneticConfig;
    /// use neatcore::populations::{Population, PopulationConfig};
    /// use rand::{rngs::StdRng, SeedableRng};
    /// use std::num::NonZeroUsize;
    ///
    /// let mut rng = StdRng::seed_from_u64(7);
    /// let mut population = Population::new(
    ///     GeneticConfig::new(
    ///         NonZeroUsize::new(1).unwrap(),
    ///         NonZeroUsize::new(1).unwrap(),
    ///     ),
    ///     PopulationConfig::new(NonZeroUsize::new(20).unwrap()),
    ///     &mut rng,
    /// );
    ///
    /// population.optimize(
    ///     |brain| {
    ///         brain.reset_state();
    ///         let output = brain.activate(&[1.0]);
    ///         (1.0 - output[0]).max(0.0)
    ///     },
    ///     5,
    ///     &mut rng,
    ///     |summary| println!("{}", summary),
    /// );
    ///
    /// assert_eq!(population.generation(), 5);
    /// ```
    pub fn optimize<F, R, O>(
        &mut self,
        mut scorer: F,
        generations: usize,
        rng: &mut R,
        mut observer: O,
    ) where
        F: FnMut(&mut Brain) -> f64,
        R: Rng,
        O: FnMut(&GenerationSummary),
    {
        self.evaluate_fitness(&mut scorer);
        observer(&self.summary());
        for _ in 0..generations {
            self.evolve(rng);
            self.evaluate_fitness(&mut scorer);
            observer(&self.summary());
        }
    }

    /// Removes species that have stagnated past the configured
    /// threshold, and species left empty by the previous generation.
    fn remove_stagnated_species(&mut self) {
        let threshold = self.population_config.stagnation_threshold;
        self.species
            .retain(|species| species.time_stagnated() < threshold && !species.is_empty());
    }

    /// Normalizes every brain's fitness by the number of population
    /// members its genome is compatible with, and accumulates the
    /// result per species.
    fn update_shared_fitness(&mut self) {
        let all: Vec<&Genome> = self
            .species
            .iter()
            .flat_map(Species::members)
            .map(Brain::genome)
            .collect();
        let threshold = self.population_config.distance_threshold;

        let sums: Vec<f64> = self
            .species
            .iter()
            .map(|species| {
                species
                    .members()
                    .map(|member| {
                        let compatible: f64 = all
                            .iter()
                            .map(|genome| {
                                sharing(member.genome(), genome, &self.genetic_config, threshold)
                            })
                            .sum();
                        if compatible == 0.0 {
                            0.0
                        } else {
                            member.fitness() / compatible
                        }
                    })
                    .sum()
            })
            .collect();

        for (species, sum) in self.species.iter_mut().zip(sums) {
            species.set_shared_fitness(sum);
        }
    }

    /// Allots each species' next-generation size proportionally to its
    /// share of the population's shared fitness. A degenerate zero
    /// fitness sum allots zero offspring rather than propagating NaN.
    fn offspring_quotas(&self) -> Vec<usize> {
        let total: f64 = self.species.iter().map(Species::shared_fitness).sum();
        let size = self.population_config.size.get() as f64;
        self.species
            .iter()
            .map(|species| {
                if total == 0.0 {
                    0
                } else {
                    (species.shared_fitness() / total * size + 0.5).floor() as usize
                }
            })
            .collect()
    }

    /// Walks each species' members in reverse order and removes any
    /// member whose compatibility distance to its species' champion
    /// exceeds the threshold. Removed members join the first new
    /// species created this pass that they are compatible with, or
    /// seed one of their own if the source species retains at least
    /// one member.
    fn respeciate(&mut self) {
        let threshold = self.population_config.distance_threshold;
        let mut new_species: Vec<Species> = Vec::new();

        for species in &mut self.species {
            let champion_genome = match species.champion() {
                Some(champion) => champion.genome().clone(),
                None => continue,
            };
            let mut index = species.members.len();
            while index > 0 {
                index -= 1;
                let distance = compatibility_distance(
                    &champion_genome,
                    species.members[index].genome(),
                    &self.genetic_config,
                );
                if distance <= threshold {
                    continue;
                }
                let home = new_species.iter_mut().find(|candidate| {
                    compatibility_distance(
                        species.members[index].genome(),
                        candidate.members[0].genome(),
                        &self.genetic_config,
                    ) < threshold
                });
                match home {
                    Some(candidate) => {
                        let member = species.members.remove(index);
                        candidate.members.push(member);
                    }
                    None if species.members.len() > 1 => {
                        let member = species.members.remove(index);
                        new_species.push(Species::seeded(member));
                    }
                    None => {}
                }
            }
        }

        self.species.extend(new_species);
    }

    /// Returns the per-generation summary used by observers.
    pub fn summary(&self) -> GenerationSummary {
        let (champion_fitness, champion_nodes, champion_connections) = match &self.champion {
            Some(champion) => (
                champion.fitness(),
                champion.node_count(),
                champion.connection_count(),
            ),
            None => (0.0, 0, 0),
        };
        GenerationSummary {
            generation: self.generation,
            population_size: self.size(),
            species_count: self.species.len(),
            champion_fitness,
            champion_nodes,
            champion_connections,
        }
    }

    /// Returns the best-scoring brain seen so far, if the population
    /// has been evaluated at all.
    pub fn champion(&self) -> Option<&Brain> {
        self.champion.as_ref()
    }

    /// Returns an iterator over all current species.
    pub fn species(&self) -> impl Iterator<Item = &Species> {
        self.species.iter()
    }

    /// Returns an iterator over all current brains.
    pub fn brains(&self) -> impl Iterator<Item = &Brain> {
        self.species.iter().flat_map(Species::members)
    }

    /// Returns the current total member count.
    pub fn size(&self) -> usize {
        self.species.iter().map(Species::len).sum()
    }

    /// Returns the current generation number.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Returns the population's innovation history.
    pub fn history(&self) -> &History {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genomics::Gene;

    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use std::num::NonZeroUsize;

    fn configs(size: usize) -> (GeneticConfig, PopulationConfig) {
        (
            GeneticConfig::new(
                NonZeroUsize::new(1).unwrap(),
                NonZeroUsize::new(1).unwrap(),
            ),
            PopulationConfig::new(NonZeroUsize::new(size).unwrap()),
        )
    }

    #[test]
    fn initial_members_are_minimal_and_alignable() {
        let (genetic, population_config) = configs(25);
        let mut rng = ChaCha8Rng::seed_from_u64(41);
        let population = Population::new(genetic, population_config, &mut rng);

        assert_eq!(population.size(), 25);
        assert_eq!(population.species().count(), 1);
        for brain in population.brains() {
            assert_eq!(brain.genome().len(), 3);
            let ids: Vec<_> = brain.genome().genes().iter().map(Gene::mutation_id).collect();
            assert_eq!(ids, vec![0, 1, 2]);
        }
    }

    #[test]
    fn offspring_quotas_approximate_population_size() {
        let (genetic, population_config) = configs(40);
        let mut rng = ChaCha8Rng::seed_from_u64(43);
        let mut population = Population::new(genetic, population_config, &mut rng);
        population.evaluate_fitness(|brain| {
            1.0 + brain.genome().connection_genes().next().unwrap().weight().abs()
        });

        population.update_shared_fitness();
        let quotas = population.offspring_quotas();
        let total: usize = quotas.iter().sum();
        let species_count = population.species().count();
        assert!(total >= 40 - species_count && total <= 40 + species_count);
    }

    #[test]
    fn zero_fitness_population_allots_zero_offspring() {
        let (genetic, population_config) = configs(10);
        let mut rng = ChaCha8Rng::seed_from_u64(47);
        let mut population = Population::new(genetic, population_config, &mut rng);
        population.evaluate_fitness(|_| 0.0);

        population.update_shared_fitness();
        assert_eq!(population.offspring_quotas(), vec![0]);
    }

    #[test]
    fn stagnated_species_go_extinct() {
        let (genetic, mut population_config) = configs(10);
        // Keep everything in one species so extinction empties the
        // whole population.
        population_config.distance_threshold = 1e6;
        let mut rng = ChaCha8Rng::seed_from_u64(53);
        let mut population = Population::new(genetic, population_config, &mut rng);

        population.evaluate_fitness(|_| 1.0);
        for generation in 1..=16 {
            population.evolve(&mut rng);
            if population.species().count() == 0 {
                // The species survived exactly 15 stagnated
                // generations and died at the start of the 16th.
                assert_eq!(generation, 16);
                return;
            }
            population.evaluate_fitness(|_| 1.0);
        }
        panic!("stagnated species was never removed");
    }

    #[test]
    fn evolution_tracks_the_configured_population_size() {
        let (genetic, mut population_config) = configs(30);
        population_config.distance_threshold = 1e6;
        let mut rng = ChaCha8Rng::seed_from_u64(59);
        let mut population = Population::new(genetic, population_config, &mut rng);

        let scorer = |brain: &mut Brain| {
            brain.reset_state();
            let output = brain.activate(&[1.0]);
            (1.0 - output[0]).max(0.0) + 0.1
        };
        population.evaluate_fitness(scorer);
        for _ in 0..5 {
            population.evolve(&mut rng);
            population.evaluate_fitness(scorer);
            // Sexual breeding can overshoot a species' quota by one.
            assert!(population.size() >= 30 && population.size() <= 31);
        }
        assert!(population.champion().is_some());
    }

    #[test]
    fn respeciation_splits_distant_members() {
        let (genetic, population_config) = configs(4);
        let near = "n,0,0;n,1,1;c,2,0,1,3ff0000000000000,1;";
        let far = "n,0,0;n,1,1;c,2,0,1,4035000000000000,1;"; // weight 21.0
        let members = vec![
            Brain::new(Genome::decode(near).unwrap()),
            Brain::new(Genome::decode(near).unwrap()),
            Brain::new(Genome::decode(far).unwrap()),
            Brain::new(Genome::decode(far).unwrap()),
        ];
        let mut population = Population {
            species: vec![Species::new(members)],
            champion: None,
            history: History::new(&genetic),
            generation: 0,
            genetic_config: genetic,
            population_config,
        };
        // Distance between the clusters is 0.4 * 20 = 8.
        population.evaluate_fitness(|brain| {
            let weight = brain.genome().connection_genes().next().unwrap().weight();
            if weight < 5.0 {
                2.0
            } else {
                1.0
            }
        });

        population.respeciate();

        let mut sizes: Vec<usize> = population.species().map(Species::len).collect();
        sizes.sort_unstable();
        assert_eq!(sizes, vec![2, 2]);
    }

    #[test]
    fn optimize_reports_every_generation() {
        let (genetic, population_config) = configs(15);
        let mut rng = ChaCha8Rng::seed_from_u64(61);
        let mut population = Population::new(genetic, population_config, &mut rng);

        let mut seen = Vec::new();
        population.optimize(
            |brain| {
                brain.reset_state();
                let output = brain.activate(&[0.5]);
                output[0].max(0.0) + 0.1
            },
            3,
            &mut rng,
            |summary| seen.push(summary.generation),
        );

        assert_eq!(seen, vec![0, 1, 2, 3]);
        assert_eq!(population.generation(), 3);
    }
}
