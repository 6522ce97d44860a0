//! Deterministic in-memory storage.
//!
//! Used by tests and by hosts without a GPU. Every texture registers itself with its device so
//! tests can assert that swaps and copies do not leak resources.

use std::cell::Cell;
use std::rc::Rc;

use crate::error::StorageError;
use crate::format::FormatDesc;
use crate::layout::Wrap;
use crate::storage::{
    AsyncReadback, DeviceCaps, PendingRead, StorageDesc, StorageDevice, TextureStorage,
};

/// A CPU "device" handing out [`CpuTexture`]s.
///
/// Cloning yields another handle to the same device (and the same live-texture counter).
#[derive(Debug, Clone, Default)]
pub struct CpuDevice {
    caps: DeviceCaps,
    live: Rc<Cell<usize>>,
}

impl CpuDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_caps(caps: DeviceCaps) -> Self {
        Self {
            caps,
            live: Rc::default(),
        }
    }

    /// Number of textures created by this device that have not been dropped or released.
    pub fn live_textures(&self) -> usize {
        self.live.get()
    }
}

impl StorageDevice for CpuDevice {
    type Texture = CpuTexture;

    fn caps(&self) -> DeviceCaps {
        self.caps
    }

    fn create_texture(&self, desc: &StorageDesc<'_>) -> Result<CpuTexture, StorageError> {
        if desc.width > self.caps.max_texture_dimension_2d
            || desc.height > self.caps.max_texture_dimension_2d
        {
            return Err(StorageError::Backend(format!(
                "{}x{} texture exceeds max dimension {}",
                desc.width, desc.height, self.caps.max_texture_dimension_2d
            )));
        }

        Ok(CpuTexture::new(
            desc.format,
            desc.width,
            desc.height,
            desc.wrap,
            vec![0; desc.size_bytes()],
            self.live.clone(),
        ))
    }
}

/// A texture backed by a `Vec<u8>` with tightly packed rows.
#[derive(Debug)]
pub struct CpuTexture {
    format: FormatDesc,
    width: u32,
    height: u32,
    wrap: Wrap,
    data: Vec<u8>,
    live: Rc<Cell<usize>>,
}

impl CpuTexture {
    fn new(
        format: FormatDesc,
        width: u32,
        height: u32,
        wrap: Wrap,
        data: Vec<u8>,
        live: Rc<Cell<usize>>,
    ) -> Self {
        live.set(live.get() + 1);
        Self {
            format,
            width,
            height,
            wrap,
            data,
            live,
        }
    }

    /// Raw texel bytes, including row padding texels.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    fn check_len(&self, requested: usize) -> Result<(), StorageError> {
        if requested > self.data.len() {
            return Err(StorageError::OutOfBounds {
                requested,
                capacity: self.data.len(),
            });
        }
        Ok(())
    }
}

impl Drop for CpuTexture {
    fn drop(&mut self) {
        self.live.set(self.live.get().saturating_sub(1));
    }
}

impl TextureStorage for CpuTexture {
    fn format(&self) -> FormatDesc {
        self.format
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn wrap(&self) -> Wrap {
        self.wrap
    }

    fn upload(&mut self, bytes: &[u8]) -> Result<(), StorageError> {
        self.check_len(bytes.len())?;
        let (head, tail) = self.data.split_at_mut(bytes.len());
        head.copy_from_slice(bytes);
        tail.fill(0);
        Ok(())
    }

    fn read(&self, dst: &mut [u8]) -> Result<(), StorageError> {
        self.check_len(dst.len())?;
        dst.copy_from_slice(&self.data[..dst.len()]);
        Ok(())
    }

    fn duplicate(&self) -> Result<Self, StorageError> {
        Ok(CpuTexture::new(
            self.format,
            self.width,
            self.height,
            self.wrap,
            self.data.clone(),
            self.live.clone(),
        ))
    }
}

impl AsyncReadback for CpuTexture {
    fn read_async(&self, mut dst: Vec<u8>) -> PendingRead {
        let res = self.read(&mut dst).map(|()| dst);
        Box::pin(std::future::ready(res))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementType;
    use crate::format::format_for;
    use crate::layout::VectorWidth;

    fn desc() -> StorageDesc<'static> {
        StorageDesc {
            label: Some("test"),
            format: format_for(ElementType::U16, VectorWidth::Two),
            width: 3,
            height: 2,
            wrap: Wrap::default(),
        }
    }

    #[test]
    fn textures_start_zeroed() {
        let device = CpuDevice::new();
        let tex = device.create_texture(&desc()).unwrap();
        assert_eq!(tex.size_bytes(), 3 * 2 * 4);
        assert!(tex.data().iter().all(|b| *b == 0));
    }

    #[test]
    fn upload_zero_pads_tail() {
        let device = CpuDevice::new();
        let mut tex = device.create_texture(&desc()).unwrap();
        tex.upload(&[0xff; 24]).unwrap();
        tex.upload(&[1, 2, 3]).unwrap();
        assert_eq!(&tex.data()[..3], &[1, 2, 3]);
        assert!(tex.data()[3..].iter().all(|b| *b == 0));
    }

    #[test]
    fn oversized_transfers_are_rejected() {
        let device = CpuDevice::new();
        let mut tex = device.create_texture(&desc()).unwrap();
        assert!(matches!(
            tex.upload(&[0; 25]),
            Err(StorageError::OutOfBounds {
                requested: 25,
                capacity: 24
            })
        ));
        let mut dst = [0u8; 25];
        assert!(tex.read(&mut dst).is_err());
    }

    #[test]
    fn duplicate_does_not_alias() {
        let device = CpuDevice::new();
        let mut a = device.create_texture(&desc()).unwrap();
        a.upload(&[7; 24]).unwrap();
        let mut b = a.duplicate().unwrap();
        b.upload(&[9; 24]).unwrap();
        assert!(a.data().iter().all(|v| *v == 7));
        assert!(b.data().iter().all(|v| *v == 9));
    }

    #[test]
    fn live_count_tracks_drop_and_release() {
        let device = CpuDevice::new();
        let a = device.create_texture(&desc()).unwrap();
        let b = a.duplicate().unwrap();
        assert_eq!(device.live_textures(), 2);
        a.release();
        assert_eq!(device.live_textures(), 1);
        drop(b);
        assert_eq!(device.live_textures(), 0);
    }

    #[test]
    fn create_respects_max_dimension() {
        let device = CpuDevice::with_caps(DeviceCaps {
            max_texture_dimension_2d: 2,
            async_readback: false,
        });
        assert!(device.create_texture(&desc()).is_err());
    }

    #[test]
    fn async_read_matches_blocking_read() {
        let device = CpuDevice::new();
        let mut tex = device.create_texture(&desc()).unwrap();
        tex.upload(&(0..24).collect::<Vec<u8>>()).unwrap();
        let out = pollster::block_on(tex.read_async(vec![0; 10])).unwrap();
        assert_eq!(out, (0..10).collect::<Vec<u8>>());
    }
}
