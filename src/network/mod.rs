pub mod config;
pub mod network;

mod backward;
mod forward;

pub use config::LayerConfig;
pub use network::{Network, DEFAULT_WEIGHT_BOUND};
