//! Surface configuration choices, kept free of live GPU objects.

/// Picks the surface format.
///
/// With `prefer_srgb` the first sRGB format wins, otherwise the first linear
/// one; either way the adapter's first format is the fallback.
pub(crate) fn choose_surface_format(
    formats: &[wgpu::TextureFormat],
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    formats
        .iter()
        .copied()
        .find(|f| f.is_srgb() == prefer_srgb)
        .or_else(|| formats.first().copied())
}

pub(crate) fn choose_alpha_mode(
    supported: &[wgpu::CompositeAlphaMode],
    preferred: wgpu::CompositeAlphaMode,
) -> wgpu::CompositeAlphaMode {
    if supported.contains(&preferred) {
        return preferred;
    }
    supported
        .first()
        .copied()
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}
