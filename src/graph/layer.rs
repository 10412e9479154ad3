use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::graph::node::NodeId;

/// Stable index of a layer in the network arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayerId(pub usize);

/// Determines bias presence and which backward formula the layer's nodes use.
///
/// - `Input`    — non-bias nodes report their raw accumulator, so injected
///                values pass through unchanged; holds a trailing bias node.
/// - `Standard` — hidden layer; activated outputs, trailing bias node.
/// - `Output`   — activated outputs, no bias; its nodes seed the backward
///                pass from the target vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerRole {
    Input,
    Standard,
    Output,
}

/// An owned, ordered, fixed collection of nodes of one role and activation.
///
/// `Input`/`Standard` layers hold `declared_size + 1` nodes, the last being
/// the permanent bias; `Output` layers hold exactly `declared_size`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layer {
    id: LayerId,
    role: LayerRole,
    activation: ActivationFunction,
    declared_size: usize,
    nodes: Vec<NodeId>,
}

impl Layer {
    pub(crate) fn new(
        id: LayerId,
        role: LayerRole,
        activation: ActivationFunction,
        declared_size: usize,
    ) -> Layer {
        Layer {
            id,
            role,
            activation,
            declared_size,
            nodes: Vec::new(),
        }
    }

    pub(crate) fn push_node(&mut self, node: NodeId) {
        self.nodes.push(node);
    }

    pub fn id(&self) -> LayerId {
        self.id
    }

    pub fn role(&self) -> LayerRole {
        self.role
    }

    pub fn activation(&self) -> ActivationFunction {
        self.activation
    }

    /// The size the layer was declared with; excludes the bias node.
    pub fn declared_size(&self) -> usize {
        self.declared_size
    }

    /// Node ids in id order (bias last for `Input`/`Standard`).
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Total node count, bias included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn has_bias(&self) -> bool {
        self.role != LayerRole::Output
    }
}
