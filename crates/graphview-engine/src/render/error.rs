use std::fmt;

use super::shader::ShaderError;

/// Errors surfaced by the graph renderer and its buffer pool.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderError {
    /// Requested buffer exceeds the device's `max_buffer_size`.
    BufferTooLarge { requested: u64, max: u64 },
    /// The device could not back a buffer of this size.
    OutOfMemory { requested: u64 },
    /// Instance stream counts do not fit the uploaded data.
    StreamMismatch {
        node_count: u32,
        edge_count: u32,
        edges_offset: u64,
        byte_len: u64,
    },
    /// Shader source could not be assembled.
    Shader(ShaderError),
    /// The renderer has been disposed.
    Disposed,
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::BufferTooLarge { requested, max } => write!(
                f,
                "buffer of {requested} bytes exceeds the device limit of {max} bytes"
            ),
            RenderError::OutOfMemory { requested } => {
                write!(f, "out of GPU memory allocating {requested} bytes")
            }
            RenderError::StreamMismatch {
                node_count,
                edge_count,
                edges_offset,
                byte_len,
            } => write!(
                f,
                "instance stream of {byte_len} bytes cannot hold {node_count} nodes and \
                 {edge_count} edges starting at byte {edges_offset}"
            ),
            RenderError::Shader(e) => write!(f, "shader assembly failed: {e}"),
            RenderError::Disposed => f.write_str("renderer has been disposed"),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Shader(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ShaderError> for RenderError {
    fn from(e: ShaderError) -> Self {
        RenderError::Shader(e)
    }
}
