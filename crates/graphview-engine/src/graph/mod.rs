//! Graph data and its wire formats.
//!
//! Two encodings live here:
//! - the flat interchange buffer (`encode`, `FlatGraph`): header + 7-float
//!   node and edge records, shared with the graph engine
//! - the instance stream (`GraphSource`): what the renderer uploads, with edge
//!   endpoints already resolved to positions

mod color;
mod data;
mod encoder;
mod flat;
mod instance;
mod source;

pub use color::Rgb;
pub use data::{Edge, EdgeAttributes, GraphData, Node, NodeAttributes};
pub use encoder::encode;
pub use flat::{EdgeRecord, FlatBufferError, FlatGraph, NodeRecord};
pub use instance::{EdgeInstance, NodeInstance};
pub use source::{GraphSource, MemoryGraph};

/// Floats in the flat buffer header (`node_count`, `edge_count`).
pub const HEADER_LEN: usize = 2;

/// Floats per node record: `[id, x, y, radius, r, g, b]`.
pub const NODE_STRIDE: usize = 7;

/// Floats per edge record: `[id, source, target, width, r, g, b]`.
pub const EDGE_STRIDE: usize = 7;
