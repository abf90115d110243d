use crate::genomics::{align, Gene, GeneticConfig, Genome, History};
use crate::networks::Brain;
use crate::populations::{PopulationConfig, Species};

use rand::Rng;

/// Auxiliary type for offspring generation. Breeds each species up to
/// its allotted quota, threading one shared [`History`] through every
/// mutation so that lineages converging on the same structural change
/// within the generation receive matching ids.
pub(super) struct Breeder<'a> {
    history: &'a mut History,
    genetic_config: &'a GeneticConfig,
    population_config: &'a PopulationConfig,
}

impl<'a> Breeder<'a> {
    pub(super) fn new(
        history: &'a mut History,
        genetic_config: &'a GeneticConfig,
        population_config: &'a PopulationConfig,
    ) -> Breeder<'a> {
        Breeder {
            history,
            genetic_config,
            population_config,
        }
    }

    /// Adds offspring to the species until its member count reaches
    /// `quota`. Parents are drawn uniformly, with replacement, from
    /// the members that survived culling.
    pub(super) fn breed_species(
        &mut self,
        species: &mut Species,
        quota: usize,
        rng: &mut impl Rng,
    ) {
        let parents = species.members.len();
        if parents == 0 {
            return;
        }
        while species.members.len() < quota {
            if rng.gen::<f64>() < self.population_config.asexual_reproduction_chance {
                let genome = species.members[rng.gen_range(0..parents)].genome().clone();
                let offspring = self.mutated(genome, rng);
                species.members.push(offspring);
            } else {
                let (first, second) = {
                    let mother = &species.members[rng.gen_range(0..parents)];
                    let father = &species.members[rng.gen_range(0..parents)];
                    self.crossover(mother, father, rng)
                };
                species.members.push(first);
                species.members.push(second);
            }
        }
    }

    fn mutated(&mut self, mut genome: Genome, rng: &mut impl Rng) -> Brain {
        genome.mutate(self.history, self.genetic_config, rng);
        Brain::new(genome)
    }

    /// Produces two complementary offspring. Each matched position is
    /// assigned one parent's gene in one offspring and the other
    /// parent's in the other; the tail genes past the matched count
    /// come from the parent with strictly greater fitness *and* the
    /// longer genome, or from neither, and go to both offspring. Both
    /// offspring are then mutated.
    fn crossover(
        &mut self,
        mother: &Brain,
        father: &Brain,
        rng: &mut impl Rng,
    ) -> (Brain, Brain) {
        let maternal = mother.genome().genes();
        let paternal = father.genome().genes();
        let matched = align(mother.genome(), father.genome()).matched;

        let tail: &[Gene] = if mother.fitness() > father.fitness() && maternal.len() > paternal.len()
        {
            &maternal[matched..]
        } else if father.fitness() > mother.fitness() && paternal.len() > maternal.len() {
            &paternal[matched..]
        } else {
            &[]
        };

        let mut first = Vec::with_capacity(matched + tail.len());
        let mut second = Vec::with_capacity(matched + tail.len());
        for position in 0..matched {
            if rng.gen::<f64>() < 0.5 {
                first.push(maternal[position]);
                second.push(paternal[position]);
            } else {
                first.push(paternal[position]);
                second.push(maternal[position]);
            }
        }
        first.extend_from_slice(tail);
        second.extend_from_slice(tail);

        let mut first = Genome::from_genes(first);
        let mut second = Genome::from_genes(second);
        first.mutate(self.history, self.genetic_config, rng);
        second.mutate(self.history, self.genetic_config, rng);
        (Brain::new(first), Brain::new(second))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use std::num::NonZeroUsize;

    fn configs() -> (GeneticConfig, PopulationConfig) {
        let genetic = GeneticConfig {
            // Structural mutation off: offspring gene content is then
            // fully determined by the parents.
            weight_mutation_chance: 0.0,
            node_addition_chance: 0.0,
            gene_addition_chance: 0.0,
            ..GeneticConfig::new(
                NonZeroUsize::new(2).unwrap(),
                NonZeroUsize::new(1).unwrap(),
            )
        };
        let population = PopulationConfig::new(NonZeroUsize::new(10).unwrap());
        (genetic, population)
    }

    #[test]
    fn breeding_fills_the_quota() {
        let (genetic, population) = configs();
        let mut history = History::new(&genetic);
        let mut rng = ChaCha8Rng::seed_from_u64(29);

        let members = (0..3)
            .map(|_| Brain::new(Genome::minimal(&genetic, &mut rng)))
            .collect();
        let mut species = Species::new(members);
        species.evaluate(&mut |_| 1.0);

        let mut breeder = Breeder::new(&mut history, &genetic, &population);
        breeder.breed_species(&mut species, 9, &mut rng);

        // Sexual reproduction adds two at a time, so the quota may be
        // overshot by one.
        assert!(species.len() >= 9 && species.len() <= 10);
    }

    #[test]
    fn crossover_of_identical_parents_reproduces_the_genome() {
        let (genetic, population) = configs();
        let mut history = History::new(&genetic);
        let mut rng = ChaCha8Rng::seed_from_u64(31);

        let genome = Genome::minimal(&genetic, &mut rng);
        let mother = Brain::new(genome.clone());
        let father = Brain::new(genome.clone());

        let mut breeder = Breeder::new(&mut history, &genetic, &population);
        let (first, second) = breeder.crossover(&mother, &father, &mut rng);
        assert_eq!(first.genome(), &genome);
        assert_eq!(second.genome(), &genome);
    }

    #[test]
    fn tail_comes_from_the_fitter_longer_parent() {
        let (genetic, population) = configs();
        let split_config = GeneticConfig {
            node_addition_chance: 1.0,
            ..genetic.clone()
        };
        let mut history = History::new(&genetic);
        let mut rng = ChaCha8Rng::seed_from_u64(37);

        let base = Genome::minimal(&genetic, &mut rng);
        let mut longer = base.clone();
        longer.mutate(&mut history, &split_config, &mut rng);
        assert!(longer.len() > base.len());

        let mut mother = Brain::new(longer.clone());
        mother.set_fitness(2.0);
        let mut father = Brain::new(base.clone());
        father.set_fitness(1.0);

        let mut breeder = Breeder::new(&mut history, &genetic, &population);
        let (first, second) = breeder.crossover(&mother, &father, &mut rng);
        assert_eq!(first.genome().len(), longer.len());
        assert_eq!(second.genome().len(), longer.len());

        // With the fitness order reversed, the tail is dropped.
        mother.set_fitness(0.5);
        let (first, second) = breeder.crossover(&mother, &father, &mut rng);
        let matched = align(mother.genome(), father.genome()).matched;
        assert_eq!(first.genome().len(), matched);
        assert_eq!(second.genome().len(), matched);
    }
}
