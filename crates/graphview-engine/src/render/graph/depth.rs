/// Depth attachment sized to the render target.
pub struct DepthTarget {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
    extent: (u32, u32),
}

impl DepthTarget {
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24Plus;

    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let extent = depth_extent(width, height);
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("graphview depth texture"),
            size: wgpu::Extent3d {
                width: extent.0,
                height: extent.1,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            _texture: texture,
            view,
            extent,
        }
    }

    #[inline]
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    #[inline]
    pub fn extent(&self) -> (u32, u32) {
        self.extent
    }

    /// True if a target of `width`×`height` needs a new depth texture.
    #[inline]
    pub fn is_stale(&self, width: u32, height: u32) -> bool {
        needs_rebuild(self.extent, width, height)
    }
}

/// Texture size for a render target; wgpu rejects zero-sized textures.
#[inline]
pub(crate) fn depth_extent(width: u32, height: u32) -> (u32, u32) {
    (width.max(1), height.max(1))
}

#[inline]
pub(crate) fn needs_rebuild(current: (u32, u32), width: u32, height: u32) -> bool {
    current != depth_extent(width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rebuild_follows_resize() {
        let current = depth_extent(800, 600);
        assert!(!needs_rebuild(current, 800, 600));
        assert!(needs_rebuild(current, 1024, 600));
        assert!(needs_rebuild(current, 800, 601));
    }

    #[test]
    fn zero_sized_target_uses_one_pixel() {
        assert_eq!(depth_extent(0, 0), (1, 1));
        assert!(!needs_rebuild((1, 1), 0, 0));
        assert!(needs_rebuild((1, 1), 2, 0));
    }
}
