//! Storage backend abstraction.
//!
//! Buffers are backend-agnostic; production hosts plug in a GPU implementation (see the
//! `texel-wgpu` crate) while tests use the deterministic [`crate::CpuDevice`].

use std::future::Future;
use std::pin::Pin;

use crate::error::StorageError;
use crate::format::FormatDesc;
use crate::layout::Wrap;

/// Subset of device limits relevant for texture-backed buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceCaps {
    /// Largest width or height of a 2D texture.
    pub max_texture_dimension_2d: u32,
    /// Whether read-back can complete without blocking the caller.
    pub async_readback: bool,
}

impl Default for DeviceCaps {
    fn default() -> Self {
        Self {
            // WebGPU's guaranteed minimum.
            max_texture_dimension_2d: 8192,
            async_readback: false,
        }
    }
}

/// Description of one 2D storage texture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageDesc<'a> {
    pub label: Option<&'a str>,
    pub format: FormatDesc,
    pub width: u32,
    pub height: u32,
    pub wrap: Wrap,
}

impl StorageDesc<'_> {
    /// Size of the whole texture in bytes (tightly packed rows).
    pub fn size_bytes(&self) -> usize {
        self.width as usize * self.height as usize * self.format.bytes_per_texel as usize
    }

    pub fn bytes_per_row(&self) -> u32 {
        self.width * self.format.bytes_per_texel
    }
}

/// Creates storage textures.
pub trait StorageDevice {
    type Texture: TextureStorage;

    fn caps(&self) -> DeviceCaps;

    /// Allocates a zero-initialized texture.
    fn create_texture(&self, desc: &StorageDesc<'_>) -> Result<Self::Texture, StorageError>;
}

/// A single 2D texture holding packed buffer data.
pub trait TextureStorage {
    fn format(&self) -> FormatDesc;

    fn width(&self) -> u32;

    fn height(&self) -> u32;

    fn wrap(&self) -> Wrap;

    fn size_bytes(&self) -> usize {
        self.width() as usize * self.height() as usize * self.format().bytes_per_texel as usize
    }

    /// Replaces the texture contents with `bytes`, zero-padding anything past its end.
    ///
    /// Fails with [`StorageError::OutOfBounds`] if `bytes` is larger than the texture.
    fn upload(&mut self, bytes: &[u8]) -> Result<(), StorageError>;

    /// Copies the first `dst.len()` bytes of the texture into `dst`.
    fn read(&self, dst: &mut [u8]) -> Result<(), StorageError>;

    /// Device-side deep copy.
    fn duplicate(&self) -> Result<Self, StorageError>
    where
        Self: Sized;

    /// Frees the device resource now instead of at drop time.
    fn release(self)
    where
        Self: Sized,
    {
        drop(self);
    }
}

/// Storage that can be read back without blocking the calling thread.
pub trait AsyncReadback: TextureStorage {
    /// Fills `dst` like [`TextureStorage::read`] and hands it back once the device is done.
    ///
    /// The copy out of the texture is recorded when this is called; the returned future only waits
    /// for it and does not borrow the texture. Writes submitted to the same texture before the
    /// future resolves may or may not be visible in the result.
    fn read_async(&self, dst: Vec<u8>) -> PendingRead;
}

/// An in-flight read-back started by [`AsyncReadback::read_async`].
pub type PendingRead = Pin<Box<dyn Future<Output = Result<Vec<u8>, StorageError>>>>;
