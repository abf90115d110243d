use serde::{Deserialize, Serialize};

/// A weighted edge between two node slots of a
/// [`Brain`](crate::networks::Brain). Endpoints are slot indices,
/// resolved from node mutation ids at build time; only enabled
/// connection genes become edges.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Connection {
    from: usize,
    to: usize,
    weight: f64,
}

impl Connection {
    pub(super) fn new(from: usize, to: usize, weight: f64) -> Connection {
        Connection { from, to, weight }
    }

    /// Returns the source node's slot index.
    pub fn from(&self) -> usize {
        self.from
    }

    /// Returns the destination node's slot index.
    pub fn to(&self) -> usize {
        self.to
    }

    /// Returns the edge weight.
    pub fn weight(&self) -> f64 {
        self.weight
    }
}
