//! Network construction and single-step evaluation.
//!
//! A [`Brain`] is the evaluable phenotype of one genome: a node slot
//! per node gene and an edge per *enabled* connection gene. Brains are
//! rebuilt from their genome whenever one is to be evaluated and are
//! never themselves mutated genetically.

mod connections;
mod nodes;

pub use connections::Connection;
pub use nodes::Node;

use crate::genomics::{Gene, Genome, NodeKind};
use crate::MutationId;

use ahash::RandomState;
use serde::{Deserialize, Serialize};

use std::collections::HashMap;

/// An evaluable network instance built from a genome, carrying the
/// genome itself, the transient per-step computation state, and a
/// cached fitness value assigned by evaluation.
///
/// # Evaluation state
/// Node outputs persist between [`activate`](Brain::activate) calls;
/// only accumulators are cleared per step. A connection reaching back
/// into the graph therefore feeds its source's *previous* output
/// forward, which makes repeated activation behave as successive
/// discrete time-steps of a recurrent network. This memory is a
/// capability: callers evaluating independent cases should call
/// [`reset_state`](Brain::reset_state) in between.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Brain {
    genome: Genome,
    nodes: Vec<Node>,
    connections: Vec<Connection>,
    input_count: usize,
    output_count: usize,
    fitness: f64,
}

impl Brain {
    /// Builds the network described by a genome.
    ///
    /// Disabled connection genes are dropped from the evaluable graph
    /// entirely (they remain in the genome), as are connections whose
    /// endpoints do not occur among the genome's nodes.
    ///
    /// # Examples
    /// ```
    /// use neatcore::genomics::Genome;
    /// use neatcore::networks::Brain;
    ///
    /// let genome = Genome::decode("n,0,0;n,1,1;c,2,0,1,3ff0000000000000,1;").unwrap();
    /// let brain = Brain::new(genome);
    ///
    /// assert_eq!(brain.input_count(), 1);
    /// assert_eq!(brain.output_count(), 1);
    /// assert_eq!(brain.connection_count(), 1);
    /// ```
    pub fn new(genome: Genome) -> Brain {
        let mut nodes = Vec::new();
        let mut slots: HashMap<MutationId, usize, RandomState> = HashMap::default();
        let (mut input_count, mut output_count) = (0, 0);

        for gene in genome.genes() {
            if let Gene::Node(node) = gene {
                match node.kind() {
                    NodeKind::Sensor => input_count += 1,
                    NodeKind::Output => output_count += 1,
                    NodeKind::Hidden => {}
                }
                slots.insert(node.mutation_id(), nodes.len());
                nodes.push(Node::new(node.kind()));
            }
        }

        let mut connections = Vec::new();
        for gene in genome.genes() {
            if let Gene::Connection(connection) = gene {
                if !connection.enabled() {
                    continue;
                }
                if let (Some(&from), Some(&to)) =
                    (slots.get(&connection.from()), slots.get(&connection.to()))
                {
                    connections.push(Connection::new(from, to, connection.weight()));
                }
            }
        }

        Brain {
            genome,
            nodes,
            connections,
            input_count,
            output_count,
            fitness: 0.0,
        }
    }

    /// Runs one synchronous step of the network and returns the
    /// output vector.
    ///
    /// Accumulators are cleared, the input vector is loaded into the
    /// sensor nodes, every edge feeds `output[from] * weight` into its
    /// destination's accumulator, and every non-sensor node then
    /// applies the steepened sigmoid `1 / (1 + exp(-5x))`. Outputs are
    /// read from the output-node slots.
    ///
    /// # Panics
    /// Panics if `inputs` is shorter than the network's sensor count.
    pub fn activate(&mut self, inputs: &[f64]) -> Vec<f64> {
        assert!(
            inputs.len() >= self.input_count,
            "expected {} inputs, got {}",
            self.input_count,
            inputs.len()
        );

        for node in &mut self.nodes {
            node.clear_accumulator();
        }

        // Sensor and output nodes occupy the first slots in id order.
        let sensors = self.nodes.iter_mut().take(self.input_count);
        for (node, input) in sensors.zip(inputs) {
            node.load(*input);
        }

        for connection in &self.connections {
            let value = self.nodes[connection.from()].output() * connection.weight();
            self.nodes[connection.to()].accumulate(value);
        }

        for node in &mut self.nodes {
            node.activate();
        }

        self.nodes[self.input_count..self.input_count + self.output_count]
            .iter()
            .map(Node::output)
            .collect()
    }

    /// Clears all persistent evaluation state, forgetting any memory
    /// carried over from previous [`activate`](Brain::activate) calls.
    pub fn reset_state(&mut self) {
        for node in &mut self.nodes {
            node.reset();
        }
    }

    /// Returns the genome this network was built from.
    pub fn genome(&self) -> &Genome {
        &self.genome
    }

    /// Returns the cached fitness value.
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    /// Caches a fitness value for sorting and selection.
    pub fn set_fitness(&mut self, fitness: f64) {
        self.fitness = fitness;
    }

    /// Returns the number of sensor nodes.
    pub fn input_count(&self) -> usize {
        self.input_count
    }

    /// Returns the number of output nodes.
    pub fn output_count(&self) -> usize {
        self.output_count
    }

    /// Returns the total number of node slots.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of enabled connections in the graph.
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }
}

impl From<Genome> for Brain {
    fn from(genome: Genome) -> Brain {
        Brain::new(genome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genomics::{ConnectionGene, NodeGene};

    fn two_sensor_brain() -> Brain {
        let genome = Genome::decode(&format!(
            "{}{}{}{}{}",
            NodeGene::new(0, NodeKind::Sensor),
            NodeGene::new(1, NodeKind::Sensor),
            NodeGene::new(2, NodeKind::Output),
            ConnectionGene::new(3, 0, 2, 1.0, true),
            ConnectionGene::new(4, 1, 2, 1.0, true),
        ))
        .unwrap();
        Brain::new(genome)
    }

    #[test]
    fn deterministic_two_sensor_evaluation() {
        let mut brain = two_sensor_brain();

        let saturated = brain.activate(&[1.0, 1.0]);
        assert!((saturated[0] - 1.0 / (1.0 + (-10.0f64).exp())).abs() < 1e-12);
        assert!((saturated[0] - 0.9999546).abs() < 1e-6);

        let midpoint = brain.activate(&[0.0, 0.0]);
        assert_eq!(midpoint[0], 0.5);
    }

    #[test]
    fn disabled_connections_are_dropped_from_the_graph() {
        let genome = Genome::decode(&format!(
            "{}{}{}",
            NodeGene::new(0, NodeKind::Sensor),
            NodeGene::new(1, NodeKind::Output),
            ConnectionGene::new(2, 0, 1, 1.0, false),
        ))
        .unwrap();
        let mut brain = Brain::new(genome);

        assert_eq!(brain.connection_count(), 0);
        assert_eq!(brain.genome().connection_genes().count(), 1);
        assert_eq!(brain.activate(&[1.0])[0], 0.5);
    }

    #[test]
    fn dangling_connections_are_dropped_from_the_graph() {
        let genome = Genome::decode(&format!(
            "{}{}{}",
            NodeGene::new(0, NodeKind::Sensor),
            NodeGene::new(1, NodeKind::Output),
            ConnectionGene::new(9, 7, 1, 1.0, true),
        ))
        .unwrap();
        let brain = Brain::new(genome);
        assert_eq!(brain.connection_count(), 0);
    }

    #[test]
    fn recurrent_state_persists_until_reset() {
        // A self-loop on the output node: its previous output feeds
        // back into the next step.
        let genome = Genome::decode(&format!(
            "{}{}{}",
            NodeGene::new(0, NodeKind::Sensor),
            NodeGene::new(1, NodeKind::Output),
            ConnectionGene::new(2, 1, 1, 1.0, true),
        ))
        .unwrap();
        let mut brain = Brain::new(genome);

        let first = brain.activate(&[0.0])[0];
        assert_eq!(first, 0.5);
        let second = brain.activate(&[0.0])[0];
        assert!(second > first);

        brain.reset_state();
        assert_eq!(brain.activate(&[0.0])[0], first);
    }

    #[test]
    fn serde_round_trip() {
        let brain = two_sensor_brain();
        let json = serde_json::to_string(&brain).unwrap();
        let restored: Brain = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.genome(), brain.genome());
        assert_eq!(restored.connection_count(), brain.connection_count());
    }
}
