use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::error::{NetResult, NetworkError};
use crate::graph::layer::LayerRole;

/// Describes one layer to be added to a `Network`.
///
/// Fields:
/// - `role`       — input/standard/output placement; decides whether a bias
///                  node is allocated and which backward formula applies
/// - `size`       — number of non-bias nodes; must be at least 1
/// - `activation` — activation function shared by the layer's nodes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerConfig {
    pub role: LayerRole,
    pub size: usize,
    pub activation: ActivationFunction,
}

impl LayerConfig {
    pub fn new(role: LayerRole, size: usize, activation: ActivationFunction) -> LayerConfig {
        LayerConfig {
            role,
            size,
            activation,
        }
    }

    /// Role and activation are enums and cannot hold out-of-range values, so
    /// the remaining validated contract is a positive size.
    pub fn validate(&self) -> NetResult<()> {
        if self.size == 0 {
            return Err(NetworkError::configuration(
                "size",
                "0",
                "a layer must hold at least one node",
            ));
        }
        Ok(())
    }
}
