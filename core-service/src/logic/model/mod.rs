//! Model Module - Isolation Forest Engine
//!
//! Tree construction, scoring and contamination calibration. Operates on
//! plain numeric vectors; knows nothing about water-quality fields.

pub mod forest;
pub mod threshold;
pub mod tree;

#[cfg(test)]
mod tests;

// Re-export common types
pub use forest::{ForestParams, IsolationForest};
pub use threshold::ThresholdStats;
pub use tree::{IsolationTree, Node};
