use serde::{Deserialize, Serialize};

use std::num::NonZeroUsize;

/// Configuration data for genome construction, mutation,
/// and compatibility measurement.
///
/// # Note
/// All quantities expressing probabilities should be in the
/// range [0.0, 1.0]. Using values outside this bound may result
/// in odd behaviours.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GeneticConfig {
    /// Number of sensor nodes in every genome of the lineage.
    pub input_count: NonZeroUsize,
    /// Number of output nodes in every genome of the lineage.
    pub output_count: NonZeroUsize,
    /// Chance that a genome's connection weights are perturbed
    /// at all during a mutation pass.
    pub weight_mutation_chance: f64,
    /// Per-connection chance of receiving a nudge, given the
    /// genome-level gate fired. Applies to disabled connections too.
    pub weight_nudge_chance: f64,
    /// Magnitude bound of a single weight nudge, drawn uniformly
    /// from ±this value.
    pub weight_mutation_power: f64,
    /// Chance of a split-connection mutation, which disables a
    /// connection and routes it through a new hidden node.
    pub node_addition_chance: f64,
    /// Chance of an add-connection mutation.
    pub gene_addition_chance: f64,
    /// Retry budget for the structural mutation operators before
    /// they give up for the current pass.
    pub max_mutation_attempts: usize,
    /// Bound for freshly drawn connection weights, drawn uniformly
    /// from ±this value.
    pub initial_weight_bound: f64,
    /// Weighting factor for disjoint genes in compatibility distance.
    pub disjoint_gene_factor: f64,
    /// Weighting factor for excess genes in compatibility distance.
    pub excess_gene_factor: f64,
    /// Weighting factor for matched-connection weight differences
    /// in compatibility distance.
    pub common_weight_factor: f64,
}

impl GeneticConfig {
    /// Returns the standard configuration for a lineage with the
    /// given sensor and output counts.
    ///
    /// # Examples
    /// ```
    /// use neatcore::genomics::GeneticConfig;
    /// use std::num::NonZeroUsize;
    ///
    /// let config = GeneticConfig::new(
    ///     NonZeroUsize::new(3).unwrap(),
    ///     NonZeroUsize::new(1).unwrap(),
    /// );
    ///
    /// assert_eq!(config.weight_nudge_chance, 0.9);
    /// ```
    pub fn new(input_count: NonZeroUsize, output_count: NonZeroUsize) -> GeneticConfig {
        GeneticConfig {
            input_count,
            output_count,
            weight_mutation_chance: 0.8,
            weight_nudge_chance: 0.9,
            weight_mutation_power: 0.5,
            node_addition_chance: 0.03,
            gene_addition_chance: 0.05,
            max_mutation_attempts: 10,
            initial_weight_bound: 2.0,
            disjoint_gene_factor: 1.0,
            excess_gene_factor: 1.0,
            common_weight_factor: 0.4,
        }
    }
}
