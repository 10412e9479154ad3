pub mod connection;
pub mod layer;
pub mod node;

pub use connection::{Connection, ConnectionId};
pub use layer::{Layer, LayerId, LayerRole};
pub use node::{Node, NodeId};
