use serde::{Serialize, Deserialize};

use crate::error::NetResult;
use crate::graph::layer::LayerId;
use crate::graph::node::NodeId;
use crate::network::network::Network;

/// Gradient-descent step configuration: the learning rate, threaded
/// explicitly through every weight update instead of living in process-wide
/// state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Sgd {
    pub learning_rate: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Sgd {
        Sgd { learning_rate }
    }

    /// Applies one layer's proposed shifts (from `backward_shifts`), scaled
    /// by this learning rate.
    pub fn step(&self, network: &mut Network, layer: LayerId, shifts: &[Vec<f64>]) -> NetResult<()> {
        network.apply_incoming_shifts(layer, shifts, self.learning_rate)
    }

    /// Node-level variant of `step`.
    pub fn step_node(&self, network: &mut Network, node: NodeId, deltas: &[f64]) -> NetResult<()> {
        network.apply_node_incoming_shifts(node, deltas, self.learning_rate)
    }
}
