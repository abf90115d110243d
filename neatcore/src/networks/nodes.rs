use crate::genomics::NodeKind;

use serde::{Deserialize, Serialize};

/// The steepened logistic activation applied to non-sensor nodes.
pub(super) fn steep_sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-5.0 * x).exp())
}

/// A neuron slot in a [`Brain`](crate::networks::Brain): the node's
/// kind plus its transient accumulator and output values.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Node {
    kind: NodeKind,
    accumulator: f64,
    output: f64,
}

impl Node {
    pub(super) fn new(kind: NodeKind) -> Node {
        Node {
            kind,
            accumulator: 0.0,
            output: 0.0,
        }
    }

    /// Returns the node's kind.
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Returns the node's current output value.
    pub fn output(&self) -> f64 {
        self.output
    }

    /// Clears the accumulator for the next step. The output value is
    /// deliberately left in place; it carries state between steps.
    pub(super) fn clear_accumulator(&mut self) {
        self.accumulator = 0.0;
    }

    pub(super) fn reset(&mut self) {
        self.accumulator = 0.0;
        self.output = 0.0;
    }

    pub(super) fn load(&mut self, input: f64) {
        self.output = input;
    }

    pub(super) fn accumulate(&mut self, value: f64) {
        self.accumulator += value;
    }

    /// Applies the activation function. Sensors pass their loaded
    /// input through untouched.
    pub(super) fn activate(&mut self) {
        if self.kind != NodeKind::Sensor {
            self.output = steep_sigmoid(self.accumulator);
        }
    }
}
