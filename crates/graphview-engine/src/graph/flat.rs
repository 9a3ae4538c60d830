use std::fmt;

use super::color::Rgb;
use super::{EDGE_STRIDE, HEADER_LEN, NODE_STRIDE};

/// Wire-format desync between a flat buffer and its declared counts.
///
/// Unlike a malformed color, this means producer and consumer disagree on the
/// layout, so it is always surfaced to the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum FlatBufferError {
    /// Buffer is shorter than the two-slot header.
    MissingHeader { len: usize },
    /// A header count is negative, fractional or not finite.
    InvalidCount { field: &'static str, value: f32 },
    /// Buffer length disagrees with `2 + nodes * 7 + edges * 7`.
    LengthMismatch { expected: usize, actual: usize },
}

impl fmt::Display for FlatBufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlatBufferError::MissingHeader { len } => {
                write!(f, "flat graph buffer too short for header ({len} floats)")
            }
            FlatBufferError::InvalidCount { field, value } => {
                write!(f, "flat graph buffer has invalid {field}: {value}")
            }
            FlatBufferError::LengthMismatch { expected, actual } => write!(
                f,
                "flat graph buffer length mismatch: expected {expected} floats, got {actual}"
            ),
        }
    }
}

impl std::error::Error for FlatBufferError {}

/// Decoded node record.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct NodeRecord {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub color: Rgb,
}

/// Decoded edge record. `source`/`target` are node ids.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct EdgeRecord {
    pub id: u32,
    pub source: u32,
    pub target: u32,
    pub width: f32,
    pub color: Rgb,
}

impl NodeRecord {
    pub fn to_wire(&self) -> [f32; NODE_STRIDE] {
        let c = self.color;
        [self.id as f32, self.x, self.y, self.radius, c.r, c.g, c.b]
    }
}

impl EdgeRecord {
    pub fn to_wire(&self) -> [f32; EDGE_STRIDE] {
        let c = self.color;
        [
            self.id as f32,
            self.source as f32,
            self.target as f32,
            self.width,
            c.r,
            c.g,
            c.b,
        ]
    }
}

/// Validated view over a flat graph buffer.
#[derive(Debug, Copy, Clone)]
pub struct FlatGraph<'a> {
    nodes: &'a [f32],
    edges: &'a [f32],
}

impl<'a> FlatGraph<'a> {
    /// Validates header and length, then splits the buffer into sections.
    pub fn parse(buf: &'a [f32]) -> Result<Self, FlatBufferError> {
        if buf.len() < HEADER_LEN {
            return Err(FlatBufferError::MissingHeader { len: buf.len() });
        }

        let node_count = read_count("node count", buf[0])?;
        let edge_count = read_count("edge count", buf[1])?;

        let expected = node_count
            .checked_mul(NODE_STRIDE)
            .and_then(|n| edge_count.checked_mul(EDGE_STRIDE).map(|e| (n, e)))
            .and_then(|(n, e)| n.checked_add(e))
            .and_then(|body| body.checked_add(HEADER_LEN))
            .unwrap_or(usize::MAX);

        if buf.len() != expected {
            return Err(FlatBufferError::LengthMismatch {
                expected,
                actual: buf.len(),
            });
        }

        let split = HEADER_LEN + node_count * NODE_STRIDE;
        Ok(Self {
            nodes: &buf[HEADER_LEN..split],
            edges: &buf[split..],
        })
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len() / NODE_STRIDE
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len() / EDGE_STRIDE
    }

    pub fn nodes(self) -> impl ExactSizeIterator<Item = NodeRecord> + 'a {
        self.nodes.chunks_exact(NODE_STRIDE).map(|r| NodeRecord {
            id: r[0] as u32,
            x: r[1],
            y: r[2],
            radius: r[3],
            color: Rgb::new(r[4], r[5], r[6]),
        })
    }

    pub fn edges(self) -> impl ExactSizeIterator<Item = EdgeRecord> + 'a {
        self.edges.chunks_exact(EDGE_STRIDE).map(|r| EdgeRecord {
            id: r[0] as u32,
            source: r[1] as u32,
            target: r[2] as u32,
            width: r[3],
            color: Rgb::new(r[4], r[5], r[6]),
        })
    }
}

fn read_count(field: &'static str, value: f32) -> Result<usize, FlatBufferError> {
    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 {
        return Err(FlatBufferError::InvalidCount { field, value });
    }
    Ok(value as usize)
}
