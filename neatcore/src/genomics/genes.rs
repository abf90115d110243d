use crate::genomics::DecodeError;
use crate::MutationId;

use serde::{Deserialize, Serialize};

use std::fmt;

/// The role a node plays in the network its genome describes.
///
/// The discriminant values are part of the genome text format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Input nodes. Sensors bypass activation entirely.
    Sensor = 0,
    /// Output nodes.
    Output = 1,
    /// Nodes introduced by split-connection mutations.
    Hidden = 2,
}

/// A gene describing a single node.
///
/// # Examples
/// ```
/// use neatcore::genomics::{NodeGene, NodeKind};
///
/// let gene = NodeGene::new(42, NodeKind::Hidden);
///
/// assert_eq!(gene.mutation_id(), 42);
/// assert_eq!(gene.to_string(), "n,42,2;");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeGene {
    pub(crate) mutation_id: MutationId,
    pub(crate) kind: NodeKind,
}

impl NodeGene {
    /// Returns a new node gene with the specified parameters.
    pub fn new(mutation_id: MutationId, kind: NodeKind) -> NodeGene {
        NodeGene { mutation_id, kind }
    }

    /// Returns the gene's mutation id.
    pub fn mutation_id(&self) -> MutationId {
        self.mutation_id
    }

    /// Returns the kind of node the gene describes.
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub(crate) fn decode(record: &str) -> Result<NodeGene, DecodeError> {
        let fields: Vec<&str> = record.split(',').collect();
        if fields.len() != 3 || fields[0] != "n" {
            return Err(DecodeError::MalformedRecord(record.to_string()));
        }
        let mutation_id = parse_id(fields[1], record, "mutation-id")?;
        let kind = match fields[2] {
            "0" => NodeKind::Sensor,
            "1" => NodeKind::Output,
            "2" => NodeKind::Hidden,
            _ => {
                return Err(DecodeError::InvalidField {
                    record: record.to_string(),
                    field: "kind",
                })
            }
        };
        Ok(NodeGene { mutation_id, kind })
    }
}

impl fmt::Display for NodeGene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n,{},{};", self.mutation_id, self.kind as u8)
    }
}

/// A gene describing a single weighted connection between two nodes.
///
/// `from` and `to` are the mutation ids of the endpoint node genes.
/// Disabling a connection never removes it from the genome; the gene
/// is kept so that genomes remain alignable by position.
///
/// # Examples
/// ```
/// use neatcore::genomics::ConnectionGene;
///
/// let gene = ConnectionGene::new(7, 0, 2, 1.0, true);
///
/// assert_eq!(gene.to_string(), "c,7,0,2,3ff0000000000000,1;");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConnectionGene {
    pub(crate) mutation_id: MutationId,
    pub(crate) from: MutationId,
    pub(crate) to: MutationId,
    pub(crate) weight: f64,
    pub(crate) enabled: bool,
}

impl ConnectionGene {
    /// Returns a new connection gene with the specified parameters.
    pub fn new(
        mutation_id: MutationId,
        from: MutationId,
        to: MutationId,
        weight: f64,
        enabled: bool,
    ) -> ConnectionGene {
        ConnectionGene {
            mutation_id,
            from,
            to,
            weight,
            enabled,
        }
    }

    /// Returns the gene's mutation id.
    pub fn mutation_id(&self) -> MutationId {
        self.mutation_id
    }

    /// Returns the mutation id of the source node.
    pub fn from(&self) -> MutationId {
        self.from
    }

    /// Returns the mutation id of the destination node.
    pub fn to(&self) -> MutationId {
        self.to
    }

    /// Returns the connection's weight.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Returns whether the connection is expressed in the network.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub(crate) fn decode(record: &str) -> Result<ConnectionGene, DecodeError> {
        let fields: Vec<&str> = record.split(',').collect();
        if fields.len() != 6 || fields[0] != "c" {
            return Err(DecodeError::MalformedRecord(record.to_string()));
        }
        let mutation_id = parse_id(fields[1], record, "mutation-id")?;
        let from = parse_id(fields[2], record, "from")?;
        let to = parse_id(fields[3], record, "to")?;
        let weight = u64::from_str_radix(fields[4], 16)
            .map(f64::from_bits)
            .map_err(|_| DecodeError::InvalidField {
                record: record.to_string(),
                field: "weight",
            })?;
        let enabled = match fields[5] {
            "0" => false,
            "1" => true,
            _ => {
                return Err(DecodeError::InvalidField {
                    record: record.to_string(),
                    field: "enabled-bit",
                })
            }
        };
        Ok(ConnectionGene {
            mutation_id,
            from,
            to,
            weight,
            enabled,
        })
    }
}

impl fmt::Display for ConnectionGene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "c,{},{},{},{:016x},{};",
            self.mutation_id,
            self.from,
            self.to,
            self.weight.to_bits(),
            self.enabled as u8,
        )
    }
}

/// Either kind of gene, as stored in a genome's id-ordered sequence.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Gene {
    Node(NodeGene),
    Connection(ConnectionGene),
}

impl Gene {
    /// Returns the mutation id carried by the gene, regardless of kind.
    pub fn mutation_id(&self) -> MutationId {
        match self {
            Gene::Node(gene) => gene.mutation_id,
            Gene::Connection(gene) => gene.mutation_id,
        }
    }

    /// Parses one `;`-stripped gene record by its leading tag.
    pub(crate) fn decode(record: &str) -> Result<Gene, DecodeError> {
        match record.as_bytes().first() {
            Some(b'n') => NodeGene::decode(record).map(Gene::Node),
            Some(b'c') => ConnectionGene::decode(record).map(Gene::Connection),
            _ => Err(DecodeError::UnknownGeneKind(record.to_string())),
        }
    }
}

impl fmt::Display for Gene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gene::Node(gene) => fmt::Display::fmt(gene, f),
            Gene::Connection(gene) => fmt::Display::fmt(gene, f),
        }
    }
}

fn parse_id(s: &str, record: &str, field: &'static str) -> Result<MutationId, DecodeError> {
    s.parse().map_err(|_| DecodeError::InvalidField {
        record: record.to_string(),
        field,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_gene_round_trip() {
        for kind in [NodeKind::Sensor, NodeKind::Output, NodeKind::Hidden] {
            let gene = NodeGene::new(13, kind);
            let record = gene.to_string();
            assert_eq!(NodeGene::decode(record.trim_end_matches(';')).unwrap(), gene);
        }
    }

    #[test]
    fn connection_gene_round_trip() {
        let gene = ConnectionGene::new(91, 4, 17, -0.7251, false);
        let record = gene.to_string();
        assert_eq!(record.matches(',').count(), 5);
        assert_eq!(
            ConnectionGene::decode(record.trim_end_matches(';')).unwrap(),
            gene
        );
    }

    #[test]
    fn weight_encoding_is_padded_hex() {
        let gene = ConnectionGene::new(0, 0, 1, 1.0, true);
        assert_eq!(gene.to_string(), "c,0,0,1,3ff0000000000000,1;");
        let negative = ConnectionGene::new(0, 0, 1, -2.0, true);
        assert_eq!(negative.to_string(), "c,0,0,1,c000000000000000,1;");
    }

    #[test]
    fn unknown_tag_is_rejected() {
        assert!(matches!(
            Gene::decode("x,1,2"),
            Err(DecodeError::UnknownGeneKind(_))
        ));
    }

    #[test]
    fn wrong_field_count_is_rejected() {
        assert!(matches!(
            Gene::decode("n,5"),
            Err(DecodeError::MalformedRecord(_))
        ));
        assert!(matches!(
            Gene::decode("c,5,0,1,3ff0000000000000"),
            Err(DecodeError::MalformedRecord(_))
        ));
    }

    #[test]
    fn bad_fields_are_rejected() {
        assert!(matches!(
            Gene::decode("n,five,0"),
            Err(DecodeError::InvalidField { field: "mutation-id", .. })
        ));
        assert!(matches!(
            Gene::decode("n,5,7"),
            Err(DecodeError::InvalidField { field: "kind", .. })
        ));
        assert!(matches!(
            Gene::decode("c,5,0,1,zzz,1"),
            Err(DecodeError::InvalidField { field: "weight", .. })
        ));
        assert!(matches!(
            Gene::decode("c,5,0,1,3ff0000000000000,yes"),
            Err(DecodeError::InvalidField { field: "enabled-bit", .. })
        ));
    }
}
