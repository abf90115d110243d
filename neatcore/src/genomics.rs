//! Genome representation, textual codec, and mutation operators.
//!
//! A [`Genome`] is an ordered sequence of node and connection genes,
//! each carrying a mutation id assigned at creation time. The genome's
//! textual encoding is the canonical persisted representation; the
//! structured gene sequence is the working one, and text is produced
//! or parsed only at serialization boundaries.

mod alignment;
mod config;
mod errors;
mod genes;
mod history;

pub use alignment::{align, compatibility_distance, sharing, Alignment};
pub use config::GeneticConfig;
pub use errors::DecodeError;
pub use genes::{ConnectionGene, Gene, NodeGene, NodeKind};
pub use history::History;

use crate::MutationId;

use rand::Rng;
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// An ordered sequence of node and connection genes describing one
/// network's structure and weights.
///
/// Genes are kept sorted ascending by mutation id, and no two genes
/// within one genome share an id. Both compatibility distance and
/// crossover rely on this ordering.
///
/// # Examples
/// ```
/// use neatcore::genomics::Genome;
///
/// let text = "n,0,0;n,1,1;c,2,0,1,3ff0000000000000,1;";
/// let genome = Genome::decode(text).unwrap();
///
/// assert_eq!(genome.len(), 3);
/// assert_eq!(genome.encode(), text);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Genome {
    genes: Vec<Gene>,
}

impl Genome {
    /// Returns the minimal genome for a lineage: sensor and output
    /// nodes, and one enabled connection from every sensor to every
    /// output with a weight drawn uniformly from the configured bound.
    ///
    /// Sensors take ids `0..inputs`, outputs the next `outputs` ids,
    /// and the connections the block after those, so every genome of
    /// the lineage starts out fully alignable.
    pub fn minimal(config: &GeneticConfig, rng: &mut impl Rng) -> Genome {
        let inputs = config.input_count.get();
        let outputs = config.output_count.get();
        let bound = config.initial_weight_bound;

        let mut genes = Vec::with_capacity(inputs + outputs + inputs * outputs);
        let mut id = 0;
        for _ in 0..inputs {
            genes.push(Gene::Node(NodeGene::new(id, NodeKind::Sensor)));
            id += 1;
        }
        for _ in 0..outputs {
            genes.push(Gene::Node(NodeGene::new(id, NodeKind::Output)));
            id += 1;
        }
        for i in 0..inputs {
            for o in 0..outputs {
                let weight = rng.gen_range(-bound..bound);
                genes.push(Gene::Connection(ConnectionGene::new(
                    id,
                    i,
                    inputs + o,
                    weight,
                    true,
                )));
                id += 1;
            }
        }

        Genome { genes }
    }

    /// Builds a genome from a gene sequence, restoring the ascending
    /// mutation-id order.
    pub(crate) fn from_genes(mut genes: Vec<Gene>) -> Genome {
        genes.sort_by_key(Gene::mutation_id);
        Genome { genes }
    }

    /// Parses a genome from its textual encoding.
    ///
    /// # Errors
    /// Returns a [`DecodeError`] on the first unrecognized or
    /// malformed gene record; the caller decides whether that is
    /// fatal.
    ///
    /// # Examples
    /// ```
    /// use neatcore::genomics::{DecodeError, Genome};
    ///
    /// assert!(Genome::decode("n,0,0;").is_ok());
    /// assert!(matches!(
    ///     Genome::decode("q,0,0;"),
    ///     Err(DecodeError::UnknownGeneKind(_))
    /// ));
    /// ```
    pub fn decode(s: &str) -> Result<Genome, DecodeError> {
        let mut genes = Vec::new();
        let mut rest = s;
        while !rest.is_empty() {
            match rest.split_once(';') {
                Some((record, tail)) => {
                    genes.push(Gene::decode(record)?);
                    rest = tail;
                }
                None => return Err(DecodeError::MalformedRecord(rest.to_string())),
            }
        }
        Ok(Genome { genes })
    }

    /// Returns the genome's textual encoding: the concatenation of
    /// every gene record in ascending mutation-id order.
    pub fn encode(&self) -> String {
        self.to_string()
    }

    /// Returns the genes in ascending mutation-id order.
    pub fn genes(&self) -> &[Gene] {
        &self.genes
    }

    /// Returns the number of genes in the genome.
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    /// Returns whether the genome carries no genes at all.
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Returns an iterator over the node genes, in id order.
    pub fn node_genes(&self) -> impl Iterator<Item = &NodeGene> {
        self.genes.iter().filter_map(|gene| match gene {
            Gene::Node(node) => Some(node),
            Gene::Connection(_) => None,
        })
    }

    /// Returns an iterator over the connection genes, in id order.
    pub fn connection_genes(&self) -> impl Iterator<Item = &ConnectionGene> {
        self.genes.iter().filter_map(|gene| match gene {
            Gene::Connection(connection) => Some(connection),
            Gene::Node(_) => None,
        })
    }

    /// Splits the genome into its node and connection genes.
    fn parts(&self) -> (Vec<NodeGene>, Vec<ConnectionGene>) {
        let mut nodes = Vec::new();
        let mut connections = Vec::new();
        for gene in &self.genes {
            match gene {
                Gene::Node(node) => nodes.push(*node),
                Gene::Connection(connection) => connections.push(*connection),
            }
        }
        (nodes, connections)
    }

    /// Applies the three stochastic mutation operators to the genome:
    /// weight perturbation, split-connection, and add-connection, each
    /// behind its own probability gate. Structural changes draw their
    /// ids from `history`, so identical changes made by other lineages
    /// this generation receive matching ids.
    ///
    /// The gene sequence is re-sorted by mutation id afterwards.
    pub fn mutate(&mut self, history: &mut History, config: &GeneticConfig, rng: &mut impl Rng) {
        let (mut nodes, mut connections) = self.parts();

        if rng.gen::<f64>() < config.weight_mutation_chance {
            mutate_connection_weights(&mut connections, config, rng);
        }

        if rng.gen::<f64>() < config.node_addition_chance {
            mutate_split_connection(&mut nodes, &mut connections, history, config, rng);
        }

        if rng.gen::<f64>() < config.gene_addition_chance {
            mutate_add_connection(&nodes, &mut connections, history, config, rng);
        }

        let mut genes: Vec<Gene> = nodes.into_iter().map(Gene::Node).collect();
        genes.extend(connections.into_iter().map(Gene::Connection));
        *self = Genome::from_genes(genes);
    }
}

/// Nudges each connection's weight with the configured per-connection
/// chance. Disabled connections are perturbed too; their weights stay
/// meaningful for compatibility distance.
fn mutate_connection_weights(
    connections: &mut [ConnectionGene],
    config: &GeneticConfig,
    rng: &mut impl Rng,
) {
    let power = config.weight_mutation_power;
    for connection in connections {
        if rng.gen::<f64>() < config.weight_nudge_chance {
            connection.weight += rng.gen_range(-power..power);
        }
    }
}

/// Picks a random enabled connection, disables it, and routes it
/// through a new hidden node: `from -> node` with weight 1 and
/// `node -> to` with the original weight. Gives up silently once the
/// attempt budget is spent.
fn mutate_split_connection(
    nodes: &mut Vec<NodeGene>,
    connections: &mut Vec<ConnectionGene>,
    history: &mut History,
    config: &GeneticConfig,
    rng: &mut impl Rng,
) {
    if connections.is_empty() {
        return;
    }
    for _ in 0..config.max_mutation_attempts {
        let split = rng.gen_range(0..connections.len());
        if !connections[split].enabled {
            continue;
        }
        let (from, to, weight) = (
            connections[split].from,
            connections[split].to,
            connections[split].weight,
        );

        let mut base = history.split_innovation(from, to, false);
        if contains_id_block(nodes, connections, base) {
            // The registered ids were already bred into this genome
            // through another lineage; treat this as a new mutation.
            base = history.split_innovation(from, to, true);
        }

        connections[split].enabled = false;
        nodes.push(NodeGene::new(base, NodeKind::Hidden));
        connections.push(ConnectionGene::new(base + 1, from, base, 1.0, true));
        connections.push(ConnectionGene::new(base + 2, base, to, weight, true));
        return;
    }
}

/// Picks a random node pair with a non-sensor destination that is not
/// already connected and adds an enabled connection between them with
/// a freshly drawn weight. Gives up silently once the attempt budget
/// is spent.
fn mutate_add_connection(
    nodes: &[NodeGene],
    connections: &mut Vec<ConnectionGene>,
    history: &mut History,
    config: &GeneticConfig,
    rng: &mut impl Rng,
) {
    let targets: Vec<MutationId> = nodes
        .iter()
        .filter(|node| node.kind() != NodeKind::Sensor)
        .map(NodeGene::mutation_id)
        .collect();
    if targets.is_empty() {
        return;
    }
    for _ in 0..config.max_mutation_attempts {
        let from = nodes[rng.gen_range(0..nodes.len())].mutation_id();
        let to = targets[rng.gen_range(0..targets.len())];
        if connections
            .iter()
            .any(|connection| connection.from == from && connection.to == to)
        {
            continue;
        }
        let id = history.connection_innovation(from, to);
        let bound = config.initial_weight_bound;
        connections.push(ConnectionGene::new(
            id,
            from,
            to,
            rng.gen_range(-bound..bound),
            true,
        ));
        return;
    }
}

fn contains_id_block(nodes: &[NodeGene], connections: &[ConnectionGene], base: MutationId) -> bool {
    let ids = base..base + 3;
    nodes.iter().any(|node| ids.contains(&node.mutation_id))
        || connections
            .iter()
            .any(|connection| ids.contains(&connection.mutation_id))
}

impl fmt::Display for Genome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for gene in &self.genes {
            fmt::Display::fmt(gene, f)?;
        }
        Ok(())
    }
}

impl FromStr for Genome {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Genome, DecodeError> {
        Genome::decode(s)
    }
}
