use serde::{Deserialize, Serialize};

/// Structured graph as delivered by fixtures and application code.
///
/// The JSON shape is:
///
/// ```json
/// {
///   "nodes": [{ "id": 0, "attributes": { "x": 0, "y": 0, "r": 5, "color": "#ff0000" } }],
///   "edges": [{ "id": 0, "source": 0, "target": 1, "attributes": { "width": 1, "color": "#fff" } }]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: u32,
    pub attributes: NodeAttributes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeAttributes {
    pub x: f32,
    pub y: f32,
    pub r: f32,
    /// `#rgb` or `#rrggbb`.
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: u32,
    pub source: u32,
    pub target: u32,
    pub attributes: EdgeAttributes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeAttributes {
    pub width: f32,
    /// `#rgb` or `#rrggbb`.
    pub color: String,
}

impl Node {
    pub fn new(id: u32, x: f32, y: f32, r: f32, color: impl Into<String>) -> Self {
        Self {
            id,
            attributes: NodeAttributes {
                x,
                y,
                r,
                color: color.into(),
            },
        }
    }
}

impl Edge {
    pub fn new(id: u32, source: u32, target: u32, width: f32, color: impl Into<String>) -> Self {
        Self {
            id,
            source,
            target,
            attributes: EdgeAttributes {
                width,
                color: color.into(),
            },
        }
    }
}
