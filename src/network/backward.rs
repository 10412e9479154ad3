//! Backward-pass operations: the generalized delta rule over the graph.
//!
//! Ordering contract: within one pass, the output layer's shifts must be
//! computed before any upstream layer's, because upstream nodes consume the
//! error signals the downstream layer wrote into connection scratch. Every scratch
//! write is stamped with the current pass generation, so a violation reads
//! as a `StaleBackpropMemory` error instead of silently consuming stale
//! data. `backward_shifts` on the output layer opens the pass itself;
//! node-level drivers call `begin_backward_pass` once per pass.

use crate::error::{NetResult, NetworkError};
use crate::graph::connection::ConnectionId;
use crate::graph::layer::{LayerId, LayerRole};
use crate::graph::node::NodeId;
use crate::network::network::Network;

impl Network {
    /// Opens a new backward pass; scratch written in earlier passes becomes
    /// stale. Returns the new pass generation.
    pub fn begin_backward_pass(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Proposed weight deltas for one node's incoming connections, in
    /// incoming order, and the scratch writes upstream nodes will consume.
    ///
    /// Output-layer nodes seed the pass from `target` (indexed by node id);
    /// all other nodes fold their outgoing scratch back through the weights.
    pub fn node_backward_shifts(&mut self, node_id: NodeId, target: &[f64]) -> NetResult<Vec<f64>> {
        let pass = self.generation;
        let node = &self.nodes[node_id.0];
        let layer_index = node.layer().0;
        let node_index = node.id();
        let role = self.layers[layer_index].role();
        let incoming = node.incoming().to_vec();

        let signal = if role == LayerRole::Output {
            if node_index >= target.len() {
                return Err(NetworkError::dimension_mismatch(
                    node_index + 1,
                    target.len(),
                    "target vector",
                ));
            }
            let err = node.output(role) - target[node_index];
            err * node.output_derivative(role)
        } else {
            let derivative = node.output_derivative(role);
            let mut d = 0.0;
            for i in 0..node.outgoing().len() {
                let conn = &self.connections[node.outgoing()[i].0];
                let memory = conn
                    .read_memory(pass)
                    .ok_or_else(|| NetworkError::stale_memory(layer_index, node_index))?;
                d += memory * conn.weight();
            }
            d * derivative
        };

        let mut shifts = Vec::with_capacity(incoming.len());
        for &conn_id in &incoming {
            let source = self.connections[conn_id.0].source();
            shifts.push(-signal * self.node_output(source));
        }
        for &conn_id in &incoming {
            self.connections[conn_id.0].write_memory(signal, pass);
        }
        Ok(shifts)
    }

    /// Proposed weight deltas for a whole layer, outer index = node id.
    ///
    /// On the output layer this validates the target vector length, opens a
    /// new pass generation, and seeds the scratch; hidden layers must be
    /// visited afterwards, in output-to-input order.
    pub fn backward_shifts(&mut self, layer: LayerId, target: &[f64]) -> NetResult<Vec<Vec<f64>>> {
        if self.layers[layer.0].role() == LayerRole::Output {
            let declared = self.layers[layer.0].declared_size();
            if target.len() != declared {
                return Err(NetworkError::dimension_mismatch(
                    declared,
                    target.len(),
                    "target vector",
                ));
            }
            self.begin_backward_pass();
        }
        let node_count = self.layers[layer.0].len();
        let mut shifts = Vec::with_capacity(node_count);
        for i in 0..node_count {
            let node_id = self.layers[layer.0].nodes()[i];
            shifts.push(self.node_backward_shifts(node_id, target)?);
        }
        Ok(shifts)
    }

    /// Applies proposed deltas positionally over one node's incoming
    /// connections, scaled by the learning rate.
    pub fn apply_node_incoming_shifts(
        &mut self,
        node: NodeId,
        deltas: &[f64],
        learning_rate: f64,
    ) -> NetResult<()> {
        let incoming_len = self.nodes[node.0].incoming().len();
        if deltas.len() != incoming_len {
            return Err(NetworkError::dimension_mismatch(
                incoming_len,
                deltas.len(),
                "incoming shifts",
            ));
        }
        if let Some(&bad) = deltas.iter().find(|d| !d.is_finite()) {
            return Err(NetworkError::anomaly("incoming shifts", bad));
        }
        for i in 0..incoming_len {
            let conn_id = self.nodes[node.0].incoming()[i];
            self.connections[conn_id.0].shift_weight(deltas[i], learning_rate);
        }
        Ok(())
    }

    /// Applies a layer's proposed deltas, outer index = node id.
    pub fn apply_incoming_shifts(
        &mut self,
        layer: LayerId,
        shifts: &[Vec<f64>],
        learning_rate: f64,
    ) -> NetResult<()> {
        let node_count = self.layers[layer.0].len();
        if shifts.len() != node_count {
            return Err(NetworkError::dimension_mismatch(
                node_count,
                shifts.len(),
                "layer shift rows",
            ));
        }
        for i in 0..node_count {
            let node_id = self.layers[layer.0].nodes()[i];
            self.apply_node_incoming_shifts(node_id, &shifts[i], learning_rate)?;
        }
        Ok(())
    }

    /// Rolls back the most recent shift on one connection.
    pub fn undo_last_shift(&mut self, conn: ConnectionId) {
        self.connections[conn.0].undo_last_shift();
    }
}
