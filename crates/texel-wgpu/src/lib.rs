//! `wgpu` storage backend for `texel-buffer`.
//!
//! [`WgpuDevice`] implements [`texel_buffer::StorageDevice`]; every buffer it backs lives in a
//! single-mip 2D texture that can be sampled, rendered to and copied in both directions.
//! Read-back goes through a padded staging buffer and is available both blocking
//! ([`texel_buffer::TextureStorage::read`]) and non-blocking
//! ([`texel_buffer::AsyncReadback::read_async`]).

mod device;
mod format;
mod readback;
mod texture;

pub use device::{WgpuDevice, WgpuInitError, WgpuInitOptions};
pub use texture::WgpuTexture;

/// Convenience alias for a context backed by a `wgpu` device.
pub type WgpuContext = texel_buffer::TexelContext<WgpuDevice>;

/// Convenience alias for a buffer backed by a `wgpu` device.
pub type WgpuBuffer = texel_buffer::GpuBuffer<WgpuDevice>;
