//! An implementation of NeuroEvolution of Augmenting Topologies:
//! a genetic algorithm that evolves both the topology and the
//! connection weights of small neural networks against an opaque,
//! caller-supplied scoring function.
//!
//! Callers provide the number of sensors and outputs and a function
//! mapping a network to a scalar fitness; the population handles the
//! genetics (speciation, fitness sharing, culling, breeding, and
//! innovation tracking) and produces increasingly capable networks.
//! A genome's textual encoding is stable across versions and is the
//! canonical way to persist an evolved champion.
//!
//! # Example usage: driving a network's output towards a target
//! ```
//! use neatcore::genomics::GeneticConfig;
//! use neatcore::populations::{Population, PopulationConfig};
//! use rand::{rngs::StdRng, SeedableRng};
//! use std::num::NonZeroUsize;
//!
//! let mut rng = StdRng::seed_from_u64(271828);
//! let genetic_config = GeneticConfig::new(
//!     NonZeroUsize::new(2).unwrap(),
//!     NonZeroUsize::new(1).unwrap(),
//! );
//! let population_config = PopulationConfig::new(NonZeroUsize::new(30).unwrap());
//! let mut population = Population::new(genetic_config, population_config, &mut rng);
//!
//! for _ in 0..10 {
//!     population.evaluate_fitness(|brain| {
//!         brain.reset_state();
//!         let output = brain.activate(&[1.0, 0.5]);
//!         (1.0 - (output[0] - 0.25).abs()).max(0.0)
//!     });
//!     population.evolve(&mut rng);
//! }
//!
//! let champion = population.champion().unwrap();
//! println!("{}", champion.genome());
//! ```

pub mod genomics;
pub mod networks;
pub mod populations;

/// Identifier assigned to every gene at creation time, marking when
/// and how it arose. Used to align homologous genes across genomes.
pub type MutationId = usize;
