use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::graph::connection::ConnectionId;
use crate::graph::layer::{LayerId, LayerRole};

/// Stable index of a node in the network arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub usize);

/// An aggregation point in the graph.
///
/// A node owns its outgoing connections (their positions in the arena are
/// listed in `outgoing`) and keeps non-owning back-references to the
/// connections feeding it in `incoming`. The accumulator is the running sum
/// of weighted inputs for the current forward pass; it is only cleared by an
/// explicit reset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    id: usize,
    layer: LayerId,
    accumulator: f64,
    activation: ActivationFunction,
    is_bias: bool,
    outgoing: Vec<ConnectionId>,
    incoming: Vec<ConnectionId>,
}

impl Node {
    pub fn new(id: usize, layer: LayerId, activation: ActivationFunction, is_bias: bool) -> Node {
        Node {
            id,
            layer,
            accumulator: 0.0,
            activation,
            is_bias,
            outgoing: Vec::new(),
            incoming: Vec::new(),
        }
    }

    /// Position of this node within its layer. Target vectors are indexed by
    /// this id on the output layer.
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn layer(&self) -> LayerId {
        self.layer
    }

    pub fn activation(&self) -> ActivationFunction {
        self.activation
    }

    pub fn is_bias(&self) -> bool {
        self.is_bias
    }

    /// Raw accumulated input for the current forward pass.
    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    pub fn set_accumulator(&mut self, v: f64) {
        self.accumulator = v;
    }

    pub fn accumulate(&mut self, v: f64) {
        self.accumulator += v;
    }

    /// Clears the accumulator. Must happen before injecting a new example;
    /// there is no implicit reset between forward passes.
    pub fn reset_accumulator(&mut self) {
        self.accumulator = 0.0;
    }

    /// Activation output given the owning layer's role: bias nodes report 1
    /// and input-layer nodes report the raw accumulator; everything else
    /// applies the activation function.
    pub fn output(&self, role: LayerRole) -> f64 {
        if self.is_bias {
            return 1.0;
        }
        if role == LayerRole::Input {
            return self.accumulator;
        }
        self.activation.function(self.accumulator)
    }

    /// Derivative of the activation output.
    ///
    /// ReLU differentiates at the *activated* output; Sigmoid differentiates
    /// at the *raw* accumulator. The two kinds intentionally differ in their
    /// evaluation point.
    pub fn output_derivative(&self, role: LayerRole) -> f64 {
        match self.activation {
            ActivationFunction::Linear => 1.0,
            ActivationFunction::ReLU => self.activation.derivative(self.output(role)),
            ActivationFunction::Sigmoid => self.activation.derivative(self.accumulator),
        }
    }

    /// Outgoing connection ids, in creation order (owned positions).
    pub fn outgoing(&self) -> &[ConnectionId] {
        &self.outgoing
    }

    /// Incoming connection ids, in creation order (back-references).
    pub fn incoming(&self) -> &[ConnectionId] {
        &self.incoming
    }

    pub(crate) fn register_outgoing(&mut self, conn: ConnectionId) {
        self.outgoing.push(conn);
    }

    pub(crate) fn register_incoming(&mut self, conn: ConnectionId) {
        self.incoming.push(conn);
    }
}
