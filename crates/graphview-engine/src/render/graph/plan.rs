use std::ops::Range;

use crate::graph::{EdgeInstance, NodeInstance};

/// Which pipeline a draw call binds.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DrawPass {
    Edges,
    Nodes,
}

/// One instanced draw into the combined buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawCall {
    pub pass: DrawPass,
    pub vertices: Range<u32>,
    pub instances: Range<u32>,
    /// Byte range of the combined buffer bound as instance data.
    pub bytes: Range<u64>,
}

/// Ordered draw list for one frame: edges first, then nodes.
///
/// Passes with no instances are left out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrawPlan {
    calls: Vec<DrawCall>,
}

/// Vertices per edge line-quad (triangle strip).
pub const EDGE_VERTICES: u32 = 4;
/// Vertices per node quad (triangle list).
pub const NODE_VERTICES: u32 = 6;

impl DrawPlan {
    pub fn new(node_count: u32, edge_count: u32, edges_offset: u64) -> Self {
        let mut calls = Vec::with_capacity(2);

        if edge_count > 0 {
            calls.push(DrawCall {
                pass: DrawPass::Edges,
                vertices: 0..EDGE_VERTICES,
                instances: 0..edge_count,
                bytes: edges_offset..edges_offset + edge_count as u64 * EdgeInstance::STRIDE,
            });
        }
        if node_count > 0 {
            calls.push(DrawCall {
                pass: DrawPass::Nodes,
                vertices: 0..NODE_VERTICES,
                instances: 0..node_count,
                bytes: 0..node_count as u64 * NodeInstance::STRIDE,
            });
        }

        Self { calls }
    }

    #[inline]
    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }
}
