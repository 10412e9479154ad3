use std::fmt;

use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::error::{NetResult, NetworkError};
use crate::graph::connection::{Connection, ConnectionId};
use crate::graph::layer::{Layer, LayerId};
use crate::graph::node::{Node, NodeId};
use crate::network::config::LayerConfig;

/// Layer-to-layer wiring draws initial weights uniformly from
/// `[-DEFAULT_WEIGHT_BOUND, DEFAULT_WEIGHT_BOUND]`.
pub const DEFAULT_WEIGHT_BOUND: f64 = 5.0;

/// Arena owner of the whole graph.
///
/// Layers, nodes, and connections live in contiguous collections and refer
/// to each other through stable integer ids; ownership is membership in the
/// arena, back-references carry no destruction responsibility. The driver
/// composes layers into an ordered pipeline with `add_layer` +
/// `connect_fully`, then runs forward and backward passes layer by layer.
///
/// `generation` stamps backprop scratch writes; see the backward-pass
/// operations for the staleness contract.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Network {
    pub(crate) layers: Vec<Layer>,
    pub(crate) nodes: Vec<Node>,
    pub(crate) connections: Vec<Connection>,
    pub(crate) generation: u64,
}

impl Network {
    pub fn new() -> Network {
        Network::default()
    }

    /// Validates the configuration and allocates the layer's nodes:
    /// `size + 1` with a trailing bias for input/standard roles, exactly
    /// `size` for the output role.
    pub fn add_layer(&mut self, config: &LayerConfig) -> NetResult<LayerId> {
        config.validate()?;
        let id = LayerId(self.layers.len());
        let mut layer = Layer::new(id, config.role, config.activation, config.size);
        let total = if layer.has_bias() {
            config.size + 1
        } else {
            config.size
        };
        for i in 0..total {
            let is_bias = layer.has_bias() && i == config.size;
            let node_id = NodeId(self.nodes.len());
            self.nodes.push(Node::new(i, id, config.activation, is_bias));
            layer.push_node(node_id);
        }
        self.layers.push(layer);
        Ok(id)
    }

    /// The sole graph-construction primitive: creates a weighted connection
    /// and registers it on both endpoints.
    pub fn connect(&mut self, source: NodeId, target: NodeId, weight: f64) -> ConnectionId {
        let conn_id = ConnectionId(self.connections.len());
        self.connections.push(Connection::new(source, target, weight));
        self.nodes[source.0].register_outgoing(conn_id);
        self.nodes[target.0].register_incoming(conn_id);
        conn_id
    }

    /// Pairwise variant of the wiring: one connection with a fresh uniform
    /// weight in the default bound.
    pub fn connect_random(&mut self, source: NodeId, target: NodeId) -> ConnectionId {
        let weight =
            rand::thread_rng().gen_range(-DEFAULT_WEIGHT_BOUND..=DEFAULT_WEIGHT_BOUND);
        self.connect(source, target, weight)
    }

    /// Complete bipartite wiring: every node of `from` (bias included) to
    /// every non-bias node of `to`, feed-forward only. Initial weights are
    /// uniform in `[-DEFAULT_WEIGHT_BOUND, DEFAULT_WEIGHT_BOUND]`.
    pub fn connect_fully(&mut self, from: LayerId, to: LayerId) {
        self.connect_fully_with(from, to, &mut rand::thread_rng());
    }

    pub fn connect_fully_with(&mut self, from: LayerId, to: LayerId, rng: &mut impl Rng) {
        for i in 0..self.layers[from.0].len() {
            let source = self.layers[from.0].nodes()[i];
            for j in 0..self.layers[to.0].len() {
                let target = self.layers[to.0].nodes()[j];
                if self.nodes[target.0].is_bias() {
                    continue;
                }
                let weight = rng.gen_range(-DEFAULT_WEIGHT_BOUND..=DEFAULT_WEIGHT_BOUND);
                self.connect(source, target, weight);
            }
        }
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer(&self, id: LayerId) -> &Layer {
        &self.layers[id.0]
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn connection(&self, id: ConnectionId) -> &Connection {
        &self.connections[id.0]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn is_bias(&self, node: NodeId) -> bool {
        self.nodes[node.0].is_bias()
    }

    // ── Weight access ───────────────────────────────────────────────────

    pub fn weight(&self, conn: ConnectionId) -> f64 {
        self.connections[conn.0].weight()
    }

    /// Overwrites one weight through its handle.
    pub fn set_weight(&mut self, conn: ConnectionId, w: f64) -> NetResult<()> {
        if !w.is_finite() {
            return Err(NetworkError::anomaly("connection weight", w));
        }
        self.connections[conn.0].set_weight(w);
        Ok(())
    }

    /// Outgoing connection ids of one node, in creation order.
    pub fn outgoing_connections(&self, node: NodeId) -> &[ConnectionId] {
        self.nodes[node.0].outgoing()
    }

    /// Incoming connection ids of one node, in creation order. Backward
    /// shifts and `apply_node_incoming_shifts` follow this order.
    pub fn incoming_connections(&self, node: NodeId) -> &[ConnectionId] {
        self.nodes[node.0].incoming()
    }

    /// Snapshot of one node's outgoing weights, positionally.
    pub fn outgoing_weights(&self, node: NodeId) -> Vec<f64> {
        self.nodes[node.0]
            .outgoing()
            .iter()
            .map(|c| self.connections[c.0].weight())
            .collect()
    }

    /// Overwrites one node's outgoing weights positionally.
    pub fn set_outgoing_weights(&mut self, node: NodeId, weights: &[f64]) -> NetResult<()> {
        let outgoing_len = self.nodes[node.0].outgoing().len();
        if weights.len() != outgoing_len {
            return Err(NetworkError::dimension_mismatch(
                outgoing_len,
                weights.len(),
                "outgoing weights",
            ));
        }
        if let Some(&bad) = weights.iter().find(|w| !w.is_finite()) {
            return Err(NetworkError::anomaly("outgoing weights", bad));
        }
        for i in 0..outgoing_len {
            let conn_id = self.nodes[node.0].outgoing()[i];
            self.connections[conn_id.0].set_weight(weights[i]);
        }
        Ok(())
    }

    /// Per-node outgoing connection ids for a whole layer; outer index is
    /// the node id within the layer.
    pub fn connections_of(&self, layer: LayerId) -> Vec<Vec<ConnectionId>> {
        self.layers[layer.0]
            .nodes()
            .iter()
            .map(|n| self.nodes[n.0].outgoing().to_vec())
            .collect()
    }

    /// Per-node outgoing weight snapshot for a whole layer.
    pub fn weights(&self, layer: LayerId) -> Vec<Vec<f64>> {
        self.layers[layer.0]
            .nodes()
            .iter()
            .map(|n| self.outgoing_weights(*n))
            .collect()
    }

    /// Overwrites a whole layer's outgoing weights; outer index is the node
    /// id, inner slices must match each node's outgoing connection count.
    pub fn set_weights(&mut self, layer: LayerId, weights: &[Vec<f64>]) -> NetResult<()> {
        let node_count = self.layers[layer.0].len();
        if weights.len() != node_count {
            return Err(NetworkError::dimension_mismatch(
                node_count,
                weights.len(),
                "layer weight rows",
            ));
        }
        for i in 0..node_count {
            let node_id = self.layers[layer.0].nodes()[i];
            self.set_outgoing_weights(node_id, &weights[i])?;
        }
        Ok(())
    }

    // ── Stochastic weight search ────────────────────────────────────────

    /// Re-draws one node's outgoing weights uniformly in `[-bound, bound]`.
    pub fn randomize_outgoing_weights(&mut self, node: NodeId, bound: f64) {
        self.randomize_outgoing_weights_with(node, bound, &mut rand::thread_rng());
    }

    pub fn randomize_outgoing_weights_with(
        &mut self,
        node: NodeId,
        bound: f64,
        rng: &mut impl Rng,
    ) {
        for i in 0..self.nodes[node.0].outgoing().len() {
            let conn_id = self.nodes[node.0].outgoing()[i];
            self.connections[conn_id.0].set_weight(rng.gen_range(-bound..=bound));
        }
    }

    /// Re-draws a whole layer's outgoing weights uniformly in
    /// `[-bound, bound]`.
    pub fn randomize_weights(&mut self, layer: LayerId, bound: f64) {
        self.randomize_weights_with(layer, bound, &mut rand::thread_rng());
    }

    pub fn randomize_weights_with(&mut self, layer: LayerId, bound: f64, rng: &mut impl Rng) {
        for i in 0..self.layers[layer.0].len() {
            let node_id = self.layers[layer.0].nodes()[i];
            self.randomize_outgoing_weights_with(node_id, bound, rng);
        }
    }

    /// Adds uniform noise in `[-range, range]` to one node's outgoing
    /// weights. Independent of gradient computation: no learning rate, no
    /// shift record.
    pub fn jitter_outgoing_weights(&mut self, node: NodeId, range: f64) {
        self.jitter_outgoing_weights_with(node, range, &mut rand::thread_rng());
    }

    pub fn jitter_outgoing_weights_with(&mut self, node: NodeId, range: f64, rng: &mut impl Rng) {
        for i in 0..self.nodes[node.0].outgoing().len() {
            let conn_id = self.nodes[node.0].outgoing()[i];
            let w = self.connections[conn_id.0].weight();
            self.connections[conn_id.0].set_weight(w + rng.gen_range(-range..=range));
        }
    }

    /// Adds uniform noise in `[-range, range]` to a whole layer's outgoing
    /// weights.
    pub fn jitter_weights(&mut self, layer: LayerId, range: f64) {
        self.jitter_weights_with(layer, range, &mut rand::thread_rng());
    }

    pub fn jitter_weights_with(&mut self, layer: LayerId, range: f64, rng: &mut impl Rng) {
        for i in 0..self.layers[layer.0].len() {
            let node_id = self.layers[layer.0].nodes()[i];
            self.jitter_outgoing_weights_with(node_id, range, rng);
        }
    }
}

impl fmt::Display for Network {
    /// One line per node: `[layer,node](w,w,...)` over its outgoing weights.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for layer in &self.layers {
            writeln!(
                f,
                "layer {} ({:?}, {:?})",
                layer.id().0,
                layer.role(),
                layer.activation()
            )?;
            for &node_id in layer.nodes() {
                let node = &self.nodes[node_id.0];
                let weights: Vec<String> = node
                    .outgoing()
                    .iter()
                    .map(|c| format!("{:.4}", self.connections[c.0].weight()))
                    .collect();
                writeln!(f, "  [{},{}]({})", layer.id().0, node.id(), weights.join(","))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::activation::ActivationFunction;
    use crate::graph::layer::LayerRole;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn input_config(size: usize) -> LayerConfig {
        LayerConfig::new(LayerRole::Input, size, ActivationFunction::Linear)
    }

    #[test]
    fn input_and_standard_layers_get_a_trailing_bias() {
        let mut net = Network::new();
        let input = net.add_layer(&input_config(3)).unwrap();
        let hidden = net
            .add_layer(&LayerConfig::new(
                LayerRole::Standard,
                2,
                ActivationFunction::Sigmoid,
            ))
            .unwrap();
        let output = net
            .add_layer(&LayerConfig::new(
                LayerRole::Output,
                2,
                ActivationFunction::Linear,
            ))
            .unwrap();

        assert_eq!(net.layer(input).len(), 4);
        assert_eq!(net.layer(hidden).len(), 3);
        assert_eq!(net.layer(output).len(), 2);

        for layer in [input, hidden] {
            let bias_count = net
                .layer(layer)
                .nodes()
                .iter()
                .filter(|n| net.is_bias(**n))
                .count();
            assert_eq!(bias_count, 1);
            // the bias node is the last allocated one
            assert!(net.is_bias(*net.layer(layer).nodes().last().unwrap()));
        }
        assert!(net.layer(output).nodes().iter().all(|n| !net.is_bias(*n)));
    }

    #[test]
    fn zero_size_layer_is_a_configuration_error() {
        let mut net = Network::new();
        let err = net.add_layer(&input_config(0)).unwrap_err();
        assert!(matches!(err, NetworkError::Configuration { .. }));
    }

    #[test]
    fn connect_fully_creates_m_times_k_connections_within_bound() {
        let mut net = Network::new();
        let input = net.add_layer(&input_config(3)).unwrap();
        let hidden = net
            .add_layer(&LayerConfig::new(
                LayerRole::Standard,
                2,
                ActivationFunction::Sigmoid,
            ))
            .unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        net.connect_fully_with(input, hidden, &mut rng);

        // 4 source nodes (bias included) × 2 non-bias targets
        assert_eq!(net.connection_count(), 8);
        for conn in 0..net.connection_count() {
            let w = net.weight(ConnectionId(conn));
            assert!(w.abs() <= DEFAULT_WEIGHT_BOUND);
        }
    }

    #[test]
    fn connect_fully_never_targets_a_bias_node() {
        let mut net = Network::new();
        let input = net.add_layer(&input_config(2)).unwrap();
        let hidden = net
            .add_layer(&LayerConfig::new(
                LayerRole::Standard,
                2,
                ActivationFunction::Sigmoid,
            ))
            .unwrap();
        net.connect_fully(input, hidden);

        for conn in 0..net.connection_count() {
            let target = net.connection(ConnectionId(conn)).target();
            assert!(!net.is_bias(target));
        }
        // the bias node of the hidden layer has no incoming connections
        let hidden_bias = *net.layer(hidden).nodes().last().unwrap();
        assert!(net.incoming_connections(hidden_bias).is_empty());
    }

    #[test]
    fn connect_random_registers_both_endpoints() {
        let mut net = Network::new();
        let input = net.add_layer(&input_config(1)).unwrap();
        let output = net
            .add_layer(&LayerConfig::new(
                LayerRole::Output,
                1,
                ActivationFunction::Linear,
            ))
            .unwrap();
        let source = net.layer(input).nodes()[0];
        let target = net.layer(output).nodes()[0];

        let conn = net.connect_random(source, target);
        assert_eq!(net.outgoing_connections(source), &[conn]);
        assert_eq!(net.incoming_connections(target), &[conn]);
        assert!(net.weight(conn).abs() <= DEFAULT_WEIGHT_BOUND);
    }

    #[test]
    fn set_weights_rejects_wrong_outer_and_inner_lengths() {
        let mut net = Network::new();
        let input = net.add_layer(&input_config(1)).unwrap();
        let output = net
            .add_layer(&LayerConfig::new(
                LayerRole::Output,
                1,
                ActivationFunction::Linear,
            ))
            .unwrap();
        net.connect_fully(input, output);

        // input layer has 2 nodes (value + bias)
        let err = net.set_weights(input, &[vec![0.1]]).unwrap_err();
        assert!(matches!(err, NetworkError::DimensionMismatch { .. }));

        let err = net
            .set_weights(input, &[vec![0.1, 0.2], vec![0.3]])
            .unwrap_err();
        assert!(matches!(err, NetworkError::DimensionMismatch { .. }));

        assert!(net.set_weights(input, &[vec![0.1], vec![0.3]]).is_ok());
        assert_eq!(net.weights(input), vec![vec![0.1], vec![0.3]]);
    }

    #[test]
    fn non_finite_weights_are_an_arithmetic_anomaly() {
        let mut net = Network::new();
        let input = net.add_layer(&input_config(1)).unwrap();
        let output = net
            .add_layer(&LayerConfig::new(
                LayerRole::Output,
                1,
                ActivationFunction::Linear,
            ))
            .unwrap();
        net.connect_fully(input, output);

        let err = net
            .set_weights(input, &[vec![f64::INFINITY], vec![0.0]])
            .unwrap_err();
        assert!(matches!(err, NetworkError::ArithmeticAnomaly { .. }));

        let handle = net.outgoing_connections(net.layer(input).nodes()[0])[0];
        let err = net.set_weight(handle, f64::NAN).unwrap_err();
        assert!(matches!(err, NetworkError::ArithmeticAnomaly { .. }));
    }

    #[test]
    fn randomize_respects_bound_and_jitter_stays_near() {
        let mut net = Network::new();
        let input = net.add_layer(&input_config(2)).unwrap();
        let output = net
            .add_layer(&LayerConfig::new(
                LayerRole::Output,
                2,
                ActivationFunction::Linear,
            ))
            .unwrap();
        net.connect_fully(input, output);

        let mut rng = StdRng::seed_from_u64(11);
        net.randomize_weights_with(input, 0.5, &mut rng);
        for w in net.weights(input).into_iter().flatten() {
            assert!(w.abs() <= 0.5);
        }

        let before = net.weights(input);
        net.jitter_weights_with(input, 0.1, &mut rng);
        let after = net.weights(input);
        for (row_b, row_a) in before.iter().zip(after.iter()) {
            for (b, a) in row_b.iter().zip(row_a.iter()) {
                assert!((a - b).abs() <= 0.1);
            }
        }
        // jitter never touches the shift record
        for conn in 0..net.connection_count() {
            assert_eq!(net.connection(ConnectionId(conn)).last_shift(), 0.0);
        }
    }
}
