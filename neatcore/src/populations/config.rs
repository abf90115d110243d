use serde::{Deserialize, Serialize};

use std::num::NonZeroUsize;

/// Configuration data for population evolution.
///
/// # Note
/// All quantities expressing probabilities should be in the
/// range [0.0, 1.0].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PopulationConfig {
    /// Target size of the population. Offspring quotas are allotted
    /// against this value every generation.
    pub size: NonZeroUsize,
    /// Compatibility distance beyond which brains are considered as
    /// belonging to different species.
    pub distance_threshold: f64,
    /// Number of consecutive generations without a champion-fitness
    /// improvement before a species goes extinct.
    pub stagnation_threshold: usize,
    /// Chance that an offspring is produced by mutating a single
    /// parent rather than by crossover.
    pub asexual_reproduction_chance: f64,
    /// Steepness of the tanh rank cutoff used when culling species
    /// members between generations.
    pub culling_steepness: f64,
}

impl PopulationConfig {
    /// Returns the standard configuration for a population of the
    /// given size.
    ///
    /// # Examples
    /// ```
    /// use neatcore::populations::PopulationConfig;
    /// use std::num::NonZeroUsize;
    ///
    /// let config = PopulationConfig::new(NonZeroUsize::new(150).unwrap());
    ///
    /// assert_eq!(config.distance_threshold, 3.0);
    /// assert_eq!(config.stagnation_threshold, 15);
    /// ```
    pub fn new(size: NonZeroUsize) -> PopulationConfig {
        PopulationConfig {
            size,
            distance_threshold: 3.0,
            stagnation_threshold: 15,
            asexual_reproduction_chance: 0.25,
            culling_steepness: 5.0,
        }
    }
}
