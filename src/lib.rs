pub mod activation;
pub mod error;
pub mod graph;
pub mod loss;
pub mod network;
pub mod optim;

// Convenience re-exports
pub use activation::activation::ActivationFunction;
pub use error::{NetResult, NetworkError};
pub use graph::connection::{Connection, ConnectionId};
pub use graph::layer::{Layer, LayerId, LayerRole};
pub use graph::node::{Node, NodeId};
pub use loss::squared_error::SquaredError;
pub use network::config::LayerConfig;
pub use network::network::{Network, DEFAULT_WEIGHT_BOUND};
pub use optim::sgd::Sgd;
