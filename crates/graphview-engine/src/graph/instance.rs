use bytemuck::{Pod, Zeroable};

/// Per-instance record for the node pipeline (28 bytes).
///
///  offset  0  kind      f32        loc 0  (always 0)
///  offset  4  position  [f32; 2]   loc 1
///  offset 12  radius    f32        loc 2
///  offset 16  color     [f32; 3]   loc 3
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct NodeInstance {
    pub kind: f32,
    pub position: [f32; 2],
    pub radius: f32,
    pub color: [f32; 3],
}

/// Per-instance record for the edge pipeline (36 bytes).
///
/// Endpoints are resolved node positions, not ids.
///
///  offset  0  kind      f32        loc 0  (always 1)
///  offset  4  source    [f32; 2]   loc 1
///  offset 12  target    [f32; 2]   loc 2
///  offset 20  width     f32        loc 3
///  offset 24  color     [f32; 3]   loc 4
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct EdgeInstance {
    pub kind: f32,
    pub source: [f32; 2],
    pub target: [f32; 2],
    pub width: f32,
    pub color: [f32; 3],
}

impl NodeInstance {
    pub const KIND: f32 = 0.0;
    pub const STRIDE: u64 = std::mem::size_of::<NodeInstance>() as u64;
}

impl EdgeInstance {
    pub const KIND: f32 = 1.0;
    pub const STRIDE: u64 = std::mem::size_of::<EdgeInstance>() as u64;
}
