use texel_buffer::{InternalFormat, WrapMode};

pub(crate) fn map_texture_format(format: InternalFormat) -> wgpu::TextureFormat {
    match format {
        InternalFormat::R8Uint => wgpu::TextureFormat::R8Uint,
        InternalFormat::Rg8Uint => wgpu::TextureFormat::Rg8Uint,
        InternalFormat::Rgba8Uint => wgpu::TextureFormat::Rgba8Uint,
        InternalFormat::R8Sint => wgpu::TextureFormat::R8Sint,
        InternalFormat::Rg8Sint => wgpu::TextureFormat::Rg8Sint,
        InternalFormat::Rgba8Sint => wgpu::TextureFormat::Rgba8Sint,
        InternalFormat::R16Uint => wgpu::TextureFormat::R16Uint,
        InternalFormat::Rg16Uint => wgpu::TextureFormat::Rg16Uint,
        InternalFormat::Rgba16Uint => wgpu::TextureFormat::Rgba16Uint,
        InternalFormat::R16Sint => wgpu::TextureFormat::R16Sint,
        InternalFormat::Rg16Sint => wgpu::TextureFormat::Rg16Sint,
        InternalFormat::Rgba16Sint => wgpu::TextureFormat::Rgba16Sint,
        InternalFormat::R16Float => wgpu::TextureFormat::R16Float,
        InternalFormat::Rg16Float => wgpu::TextureFormat::Rg16Float,
        InternalFormat::Rgba16Float => wgpu::TextureFormat::Rgba16Float,
        InternalFormat::R32Uint => wgpu::TextureFormat::R32Uint,
        InternalFormat::Rg32Uint => wgpu::TextureFormat::Rg32Uint,
        InternalFormat::Rgba32Uint => wgpu::TextureFormat::Rgba32Uint,
        InternalFormat::R32Sint => wgpu::TextureFormat::R32Sint,
        InternalFormat::Rg32Sint => wgpu::TextureFormat::Rg32Sint,
        InternalFormat::Rgba32Sint => wgpu::TextureFormat::Rgba32Sint,
        InternalFormat::R32Float => wgpu::TextureFormat::R32Float,
        InternalFormat::Rg32Float => wgpu::TextureFormat::Rg32Float,
        InternalFormat::Rgba32Float => wgpu::TextureFormat::Rgba32Float,
    }
}

pub(crate) fn map_address_mode(mode: WrapMode) -> wgpu::AddressMode {
    match mode {
        WrapMode::ClampToEdge => wgpu::AddressMode::ClampToEdge,
        WrapMode::Repeat => wgpu::AddressMode::Repeat,
        WrapMode::MirroredRepeat => wgpu::AddressMode::MirrorRepeat,
    }
}
