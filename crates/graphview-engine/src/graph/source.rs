use std::collections::HashMap;

use super::color::Rgb;
use super::flat::{EdgeRecord, FlatBufferError, FlatGraph, NodeRecord};
use super::instance::{EdgeInstance, NodeInstance};
use super::{EDGE_STRIDE, HEADER_LEN, NODE_STRIDE};

/// Boundary to the graph engine, as seen by the renderer.
///
/// `instance_data` holds `node_count` node instances followed by `edge_count`
/// edge instances; edges start `edges_offset` bytes into it.
pub trait GraphSource {
    fn instance_data(&self) -> &[f32];
    fn node_count(&self) -> u32;
    fn edge_count(&self) -> u32;
    fn edges_offset(&self) -> u64;
    /// Current graph in the flat wire format.
    fn flat_buffer(&self) -> Vec<f32>;
}

/// In-memory graph engine.
///
/// Owns node/edge records and keeps the instance stream rebuilt after every
/// mutation, so reads are free. Node ids and edge ids are unique within their
/// kind; edges whose endpoints are missing are kept but not drawn.
#[derive(Debug, Default, Clone)]
pub struct MemoryGraph {
    nodes: Vec<NodeRecord>,
    edges: Vec<EdgeRecord>,

    instances: Vec<f32>,
    drawn_edges: u32,
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from the flat wire format.
    pub fn from_flat(buf: &[f32]) -> Result<Self, FlatBufferError> {
        let mut g = Self::new();
        g.set_graph(buf)?;
        Ok(g)
    }

    /// Replaces the whole graph. On error the current graph is left untouched.
    pub fn set_graph(&mut self, buf: &[f32]) -> Result<(), FlatBufferError> {
        let flat = FlatGraph::parse(buf)?;
        self.nodes = flat.nodes().collect();
        self.edges = flat.edges().collect();
        self.rebuild();
        Ok(())
    }

    #[inline]
    pub fn nodes(&self) -> &[NodeRecord] {
        &self.nodes
    }

    #[inline]
    pub fn edges(&self) -> &[EdgeRecord] {
        &self.edges
    }

    /// Adds a node; `false` if the id is taken.
    pub fn add_node(&mut self, node: NodeRecord) -> bool {
        if self.nodes.iter().any(|n| n.id == node.id) {
            return false;
        }
        self.nodes.push(node);
        self.rebuild();
        true
    }

    /// Adds an edge; `false` if the id is taken.
    pub fn add_edge(&mut self, edge: EdgeRecord) -> bool {
        if self.edges.iter().any(|e| e.id == edge.id) {
            return false;
        }
        self.edges.push(edge);
        self.rebuild();
        true
    }

    pub fn update_node(&mut self, id: u32, x: f32, y: f32, radius: f32, color: Rgb) -> bool {
        let Some(node) = self.nodes.iter_mut().find(|n| n.id == id) else {
            return false;
        };
        node.x = x;
        node.y = y;
        node.radius = radius;
        node.color = color;
        self.rebuild();
        true
    }

    pub fn update_edge(&mut self, id: u32, width: f32, color: Rgb) -> bool {
        let Some(edge) = self.edges.iter_mut().find(|e| e.id == id) else {
            return false;
        };
        edge.width = width;
        edge.color = color;
        self.rebuild();
        true
    }

    /// Removes a node and every edge touching it.
    pub fn remove_node(&mut self, id: u32) -> bool {
        let before = self.nodes.len();
        self.nodes.retain(|n| n.id != id);
        if self.nodes.len() == before {
            return false;
        }
        self.edges.retain(|e| e.source != id && e.target != id);
        self.rebuild();
        true
    }

    pub fn remove_edge(&mut self, id: u32) -> bool {
        let before = self.edges.len();
        self.edges.retain(|e| e.id != id);
        if self.edges.len() == before {
            return false;
        }
        self.rebuild();
        true
    }

    fn rebuild(&mut self) {
        let positions: HashMap<u32, [f32; 2]> =
            self.nodes.iter().map(|n| (n.id, [n.x, n.y])).collect();

        let nodes: Vec<NodeInstance> = self
            .nodes
            .iter()
            .map(|n| NodeInstance {
                kind: NodeInstance::KIND,
                position: [n.x, n.y],
                radius: n.radius,
                color: n.color.to_array(),
            })
            .collect();

        let edges: Vec<EdgeInstance> = self
            .edges
            .iter()
            .filter_map(|e| {
                let source = *positions.get(&e.source)?;
                let target = *positions.get(&e.target)?;
                Some(EdgeInstance {
                    kind: EdgeInstance::KIND,
                    source,
                    target,
                    width: e.width,
                    color: e.color.to_array(),
                })
            })
            .collect();

        if edges.len() != self.edges.len() {
            log::debug!(
                "{} edge(s) reference missing nodes and are not drawn",
                self.edges.len() - edges.len()
            );
        }

        self.instances.clear();
        self.instances.extend_from_slice(bytemuck::cast_slice(&nodes));
        self.instances.extend_from_slice(bytemuck::cast_slice(&edges));
        self.drawn_edges = edges.len() as u32;
    }
}

impl GraphSource for MemoryGraph {
    fn instance_data(&self) -> &[f32] {
        &self.instances
    }

    fn node_count(&self) -> u32 {
        self.nodes.len() as u32
    }

    fn edge_count(&self) -> u32 {
        self.drawn_edges
    }

    fn edges_offset(&self) -> u64 {
        self.nodes.len() as u64 * NodeInstance::STRIDE
    }

    fn flat_buffer(&self) -> Vec<f32> {
        let mut buf = Vec::with_capacity(
            HEADER_LEN + self.nodes.len() * NODE_STRIDE + self.edges.len() * EDGE_STRIDE,
        );
        buf.push(self.nodes.len() as f32);
        buf.push(self.edges.len() as f32);
        for n in &self.nodes {
            buf.extend_from_slice(&n.to_wire());
        }
        for e in &self.edges {
            buf.extend_from_slice(&e.to_wire());
        }
        buf
    }
}
