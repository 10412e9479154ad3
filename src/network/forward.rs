//! Forward-pass operations: accumulator management, input injection, and
//! the layer-by-layer fan-out. The driver must run `forward_pass` from the
//! input layer downward; a node's fan-out is only meaningful once every
//! layer feeding it has fanned out.

use crate::error::{NetResult, NetworkError};
use crate::graph::connection::ConnectionId;
use crate::graph::layer::LayerId;
use crate::graph::node::NodeId;
use crate::network::network::Network;

impl Network {
    pub fn accumulator(&self, node: NodeId) -> f64 {
        self.nodes[node.0].accumulator()
    }

    pub fn set_accumulator(&mut self, node: NodeId, v: f64) {
        self.nodes[node.0].set_accumulator(v);
    }

    /// Adds into a node's accumulator. `propagate` is the normal path; this
    /// is exposed for node-level drivers.
    pub fn accumulate(&mut self, node: NodeId, v: f64) {
        self.nodes[node.0].accumulate(v);
    }

    pub fn reset_accumulator(&mut self, node: NodeId) {
        self.nodes[node.0].reset_accumulator();
    }

    /// Clears every accumulator in the layer. Call before injecting the next
    /// example; accumulators are never reset implicitly.
    pub fn reset_layer(&mut self, layer: LayerId) {
        for i in 0..self.layers[layer.0].len() {
            let node_id = self.layers[layer.0].nodes()[i];
            self.nodes[node_id.0].reset_accumulator();
        }
    }

    /// Injects an example into the layer's non-bias nodes positionally.
    ///
    /// Starting a new example makes any backprop scratch left over from the
    /// previous backward pass stale.
    pub fn set_inputs(&mut self, layer: LayerId, values: &[f64]) -> NetResult<()> {
        let declared = self.layers[layer.0].declared_size();
        if values.len() != declared {
            return Err(NetworkError::dimension_mismatch(
                declared,
                values.len(),
                "input values",
            ));
        }
        if let Some(&bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(NetworkError::anomaly("input values", bad));
        }
        self.generation += 1;
        for (i, &v) in values.iter().enumerate() {
            let node_id = self.layers[layer.0].nodes()[i];
            self.nodes[node_id.0].set_accumulator(v);
        }
        Ok(())
    }

    /// The sole forward-pass data-transfer primitive: adds
    /// `value × weight` into the target node's accumulator.
    pub fn propagate(&mut self, conn: ConnectionId, value: f64) {
        let connection = &self.connections[conn.0];
        let (target, contribution) = (connection.target(), value * connection.weight());
        self.nodes[target.0].accumulate(contribution);
    }

    /// Computes this node's output once and propagates it along every
    /// outgoing connection.
    pub fn forward_fan_out(&mut self, node: NodeId) {
        let value = self.node_output(node);
        for i in 0..self.nodes[node.0].outgoing().len() {
            let conn = self.nodes[node.0].outgoing()[i];
            self.propagate(conn, value);
        }
    }

    /// Fans out every node of the layer, in node order.
    pub fn forward_pass(&mut self, layer: LayerId) {
        for i in 0..self.layers[layer.0].len() {
            let node_id = self.layers[layer.0].nodes()[i];
            self.forward_fan_out(node_id);
        }
    }

    /// Activation output of one node, honoring bias and input-layer rules.
    pub fn node_output(&self, node: NodeId) -> f64 {
        let n = &self.nodes[node.0];
        n.output(self.layers[n.layer().0].role())
    }

    /// Derivative of one node's activation output; see
    /// `Node::output_derivative` for the per-kind evaluation points.
    pub fn node_output_derivative(&self, node: NodeId) -> f64 {
        let n = &self.nodes[node.0];
        n.output_derivative(self.layers[n.layer().0].role())
    }

    /// Collects `node_output` from every node in id order. For an input
    /// layer this is the injected values plus a trailing 1 for the bias;
    /// for the output layer it is the prediction vector.
    pub fn outputs(&self, layer: LayerId) -> Vec<f64> {
        self.layers[layer.0]
            .nodes()
            .iter()
            .map(|n| self.node_output(*n))
            .collect()
    }
}
