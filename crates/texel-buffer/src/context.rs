use crate::buffer::{BufferDescriptor, GpuBuffer};
use crate::error::Result;
use crate::storage::{DeviceCaps, StorageDevice};

/// Owns a storage device and the capabilities queried from it.
///
/// Capabilities are captured once, when the context is created; every buffer created through the
/// context sees the same limits and the same async read-back decision.
pub struct TexelContext<D> {
    device: D,
    caps: DeviceCaps,
}

impl<D: StorageDevice + Clone> TexelContext<D> {
    pub fn new(device: D) -> Self {
        let caps = device.caps();
        tracing::debug!(
            max_texture_dimension_2d = caps.max_texture_dimension_2d,
            async_readback = caps.async_readback,
            "texel context created"
        );
        Self { device, caps }
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn caps(&self) -> DeviceCaps {
        self.caps
    }

    pub fn create_buffer(&self, desc: BufferDescriptor) -> Result<GpuBuffer<D>> {
        GpuBuffer::with_caps(self.device.clone(), self.caps, desc)
    }

    /// Replace the underlying device (e.g. after device-lost recovery).
    ///
    /// Buffers created from the previous device still reference its textures and must be
    /// recreated by the caller.
    pub fn replace_device(&mut self, device: D) {
        self.caps = device.caps();
        self.device = device;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::CpuDevice;

    #[test]
    fn caps_are_captured_at_creation() {
        let device = CpuDevice::with_caps(DeviceCaps {
            max_texture_dimension_2d: 4,
            async_readback: true,
        });
        let ctx = TexelContext::new(device);
        let buf = ctx.create_buffer(BufferDescriptor::with_len(16)).unwrap();
        assert_eq!(buf.caps(), ctx.caps());
        assert!(buf.async_reader().is_some());
        assert!(ctx.create_buffer(BufferDescriptor::with_len(17)).is_err());
    }

    #[test]
    fn replace_device_requeries_caps() {
        let mut ctx = TexelContext::new(CpuDevice::new());
        ctx.replace_device(CpuDevice::with_caps(DeviceCaps {
            max_texture_dimension_2d: 2,
            async_readback: false,
        }));
        assert_eq!(ctx.caps().max_texture_dimension_2d, 2);
        assert!(ctx.create_buffer(BufferDescriptor::with_len(5)).is_err());
    }
}
