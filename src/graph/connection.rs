use serde::{Serialize, Deserialize};

use crate::graph::node::NodeId;

/// Stable index of a connection in the network arena.
///
/// Doubles as the "weight handle": it stays valid for the lifetime of the
/// network, so drivers can hold a list of ids for later inspection or
/// overwriting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(pub usize);

/// A directed weighted link from a source node to a target node.
///
/// Connections live in the network arena; the source node's `outgoing` list
/// holds the owning position and the target node's `incoming` list holds the
/// back-reference. Everything here is pure arithmetic; no connection
/// operation can fail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    source: NodeId,
    target: NodeId,
    weight: f64,
    last_shift: f64,
    memory: f64,
    memory_pass: u64,
}

impl Connection {
    pub fn new(source: NodeId, target: NodeId, weight: f64) -> Connection {
        Connection {
            source,
            target,
            weight,
            last_shift: 0.0,
            memory: 0.0,
            // u64::MAX marks a slot that has never been written
            memory_pass: u64::MAX,
        }
    }

    pub fn source(&self) -> NodeId {
        self.source
    }

    pub fn target(&self) -> NodeId {
        self.target
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Overwrites the weight directly, bypassing the learning rate and the
    /// shift record.
    pub fn set_weight(&mut self, w: f64) {
        self.weight = w;
    }

    /// Applies a proposed delta scaled by the learning rate, and remembers
    /// the applied amount for a single-step undo.
    pub fn shift_weight(&mut self, delta: f64, learning_rate: f64) {
        let applied = delta * learning_rate;
        self.weight += applied;
        self.last_shift = applied;
    }

    /// The most recently applied shift (already scaled by the learning rate).
    pub fn last_shift(&self) -> f64 {
        self.last_shift
    }

    /// Rolls back the most recently applied shift. Single-step only, not a
    /// history stack.
    pub fn undo_last_shift(&mut self) {
        self.weight -= self.last_shift;
    }

    /// Writes the backward-pass scratch slot, stamping it with `pass`.
    pub fn write_memory(&mut self, v: f64, pass: u64) {
        self.memory = v;
        self.memory_pass = pass;
    }

    /// Reads the scratch slot if it was written during `pass`; `None` means
    /// the slot is unset or left over from an earlier pass.
    pub fn read_memory(&self, pass: u64) -> Option<f64> {
        (self.memory_pass == pass).then_some(self.memory)
    }
}
