//! Shared GPU types used by the node and edge pipelines.

use bytemuck::{Pod, Zeroable};

use crate::camera::ViewProj;
use crate::graph::{EdgeInstance, NodeInstance};

// ── blend ─────────────────────────────────────────────────────────────────

/// Straight-alpha "over": `src.a * src + (1 - src.a) * dst`.
pub(super) fn alpha_over_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::SrcAlpha,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
    }
}

// ── view-projection uniform ───────────────────────────────────────────────

pub(super) fn view_proj_binding_size() -> wgpu::BufferSize {
    wgpu::BufferSize::new(std::mem::size_of::<ViewProj>() as u64).unwrap()
}

// ── static geometry ───────────────────────────────────────────────────────

/// Unit quad vertex for node discs: corner in [-1, 1] and uv in [0, 1].
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct QuadVertex {
    pub pos: [f32; 2],
    pub uv: [f32; 2],
}

impl QuadVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        4 => Float32x2, // pos
        5 => Float32x2  // uv
    ];

    pub(super) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Two triangles, drawn as a triangle list.
pub(super) const NODE_QUAD: [QuadVertex; 6] = [
    QuadVertex { pos: [-1.0, -1.0], uv: [0.0, 0.0] },
    QuadVertex { pos: [1.0, -1.0], uv: [1.0, 0.0] },
    QuadVertex { pos: [1.0, 1.0], uv: [1.0, 1.0] },
    QuadVertex { pos: [-1.0, -1.0], uv: [0.0, 0.0] },
    QuadVertex { pos: [1.0, 1.0], uv: [1.0, 1.0] },
    QuadVertex { pos: [-1.0, 1.0], uv: [0.0, 1.0] },
];

/// Line-quad vertex: x along the edge (0..1), y across it (-0.5..0.5).
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct LineVertex {
    pub pos: [f32; 2],
}

impl LineVertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![5 => Float32x2];

    pub(super) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<LineVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Drawn as a triangle strip.
pub(super) const EDGE_QUAD: [LineVertex; 4] = [
    LineVertex { pos: [0.0, -0.5] },
    LineVertex { pos: [0.0, 0.5] },
    LineVertex { pos: [1.0, -0.5] },
    LineVertex { pos: [1.0, 0.5] },
];

// ── instance layouts ──────────────────────────────────────────────────────

const NODE_INSTANCE_ATTRS: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
    0 => Float32,   // kind
    1 => Float32x2, // position
    2 => Float32,   // radius
    3 => Float32x3  // color
];

const EDGE_INSTANCE_ATTRS: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
    0 => Float32,   // kind
    1 => Float32x2, // source
    2 => Float32x2, // target
    3 => Float32,   // width
    4 => Float32x3  // color
];

pub(super) fn node_instance_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: NodeInstance::STRIDE,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &NODE_INSTANCE_ATTRS,
    }
}

pub(super) fn edge_instance_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: EdgeInstance::STRIDE,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &EDGE_INSTANCE_ATTRS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn end_of(attrs: &[wgpu::VertexAttribute]) -> u64 {
        attrs
            .iter()
            .map(|a| a.offset + a.format.size())
            .max()
            .unwrap_or(0)
    }

    #[test]
    fn instance_attributes_fill_their_stride() {
        assert_eq!(end_of(&NODE_INSTANCE_ATTRS), NodeInstance::STRIDE);
        assert_eq!(end_of(&EDGE_INSTANCE_ATTRS), EdgeInstance::STRIDE);
    }

    #[test]
    fn static_vertex_sizes() {
        assert_eq!(std::mem::size_of::<QuadVertex>(), 16);
        assert_eq!(std::mem::size_of::<LineVertex>(), 8);
        assert_eq!(view_proj_binding_size().get(), 64);
    }
}
