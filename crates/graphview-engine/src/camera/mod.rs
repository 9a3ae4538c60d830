//! Camera subsystem.
//!
//! `Camera` owns the view state (position, zoom, viewport size) and the
//! screen↔world mapping. It never touches the GPU; the renderer only reads the
//! `ViewProj` it produces once per frame.

mod camera;
mod command;

pub use camera::{Camera, CameraConfig};
pub use command::CameraCommand;

use bytemuck::{Pod, Zeroable};

/// Column-major 4×4 view-projection matrix, laid out as the shader's `mat4x4<f32>`.
///
/// The 16 values are, in order: the three diagonal columns followed by the
/// translation column `[tx, ty, 0, 1]`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct ViewProj {
    cols: [f32; 16],
}

impl ViewProj {
    pub const IDENTITY: ViewProj = ViewProj {
        cols: [
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ],
    };

    #[inline]
    pub const fn from_cols_array(cols: [f32; 16]) -> Self {
        Self { cols }
    }

    #[inline]
    pub fn to_cols_array(self) -> [f32; 16] {
        self.cols
    }

    #[inline]
    pub fn to_mat4(self) -> glam::Mat4 {
        glam::Mat4::from_cols_array(&self.cols)
    }

    /// Projects a world point to normalized device coordinates.
    pub fn project(self, x: f32, y: f32) -> glam::Vec2 {
        let p = self.to_mat4() * glam::Vec4::new(x, y, 0.0, 1.0);
        glam::Vec2::new(p.x, p.y)
    }
}

impl Default for ViewProj {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<glam::Mat4> for ViewProj {
    fn from(m: glam::Mat4) -> Self {
        Self::from_cols_array(m.to_cols_array())
    }
}
