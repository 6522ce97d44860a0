//! Helpers for texture read-back (GPU → CPU).
//!
//! `copy_texture_to_buffer` requires `bytes_per_row` to be a multiple of 256, so texture rows
//! land in a padded staging buffer and are unpacked into the tightly packed host layout.

use std::future::Future;
use std::pin::pin;
use std::task::Poll;

use futures_intrusive::channel::shared::{oneshot_channel, OneshotReceiver};
use texel_buffer::StorageError;

pub(crate) fn padded_bytes_per_row(unpadded_bytes_per_row: u32) -> u32 {
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    unpadded_bytes_per_row.div_ceil(align) * align
}

/// Copies the first `out.len()` bytes of a tightly packed image out of padded rows.
pub(crate) fn unpad_rows(padded: &[u8], unpadded_bpr: usize, padded_bpr: usize, out: &mut [u8]) {
    debug_assert!(padded_bpr >= unpadded_bpr);

    for (row, dst_row) in out.chunks_mut(unpadded_bpr).enumerate() {
        let src_off = row * padded_bpr;
        dst_row.copy_from_slice(&padded[src_off..src_off + dst_row.len()]);
    }
}

/// A staging buffer holding `rows` padded rows copied out of a texture.
pub(crate) struct Staging {
    pub buffer: wgpu::Buffer,
    pub unpadded_bpr: u32,
    pub padded_bpr: u32,
}

impl Staging {
    /// Records and submits a copy of the first `rows` rows of `texture`.
    pub fn submit_copy(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        texture: &wgpu::Texture,
        width: u32,
        bytes_per_texel: u32,
        rows: u32,
    ) -> Self {
        let unpadded_bpr = width * bytes_per_texel;
        let padded_bpr = padded_bytes_per_row(unpadded_bpr);

        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("texel readback staging"),
            size: u64::from(padded_bpr) * u64::from(rows),
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("texel readback encoder"),
        });
        encoder.copy_texture_to_buffer(
            wgpu::ImageCopyTexture {
                texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::ImageCopyBuffer {
                buffer: &buffer,
                layout: wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_bpr),
                    rows_per_image: Some(rows),
                },
            },
            wgpu::Extent3d {
                width,
                height: rows,
                depth_or_array_layers: 1,
            },
        );
        queue.submit(Some(encoder.finish()));

        Self {
            buffer,
            unpadded_bpr,
            padded_bpr,
        }
    }

    /// Starts mapping the staging buffer; the receiver resolves once the device is done.
    pub fn map(&self) -> OneshotReceiver<Result<(), wgpu::BufferAsyncError>> {
        let (sender, receiver) = oneshot_channel();
        self.buffer
            .slice(..)
            .map_async(wgpu::MapMode::Read, move |res| {
                sender.send(res).ok();
            });
        receiver
    }

    /// Unpacks the mapped rows into `out` and unmaps the buffer.
    pub fn finish(
        self,
        mapped: Option<Result<(), wgpu::BufferAsyncError>>,
        out: &mut [u8],
    ) -> Result<(), StorageError> {
        mapped
            .ok_or_else(|| StorageError::ReadbackFailed("map_async sender dropped".into()))?
            .map_err(|err| StorageError::ReadbackFailed(format!("map_async failed: {err:?}")))?;

        {
            let mapped = self.buffer.slice(..).get_mapped_range();
            unpad_rows(
                &mapped,
                self.unpadded_bpr as usize,
                self.padded_bpr as usize,
                out,
            );
        }
        self.buffer.unmap();
        Ok(())
    }
}

/// Awaits `receiver`, polling `device` so map callbacks get delivered without blocking.
///
/// On wasm32 callbacks are delivered by the browser event loop instead.
pub(crate) async fn receive_with_poll<T>(
    device: &wgpu::Device,
    receiver: OneshotReceiver<T>,
) -> Option<T> {
    let mut recv = pin!(receiver.receive());
    std::future::poll_fn(|cx| {
        #[cfg(not(target_arch = "wasm32"))]
        device.poll(wgpu::Maintain::Poll);
        #[cfg(target_arch = "wasm32")]
        let _ = device;

        match recv.as_mut().poll(cx) {
            Poll::Ready(v) => Poll::Ready(v),
            Poll::Pending => {
                cx.waker().wake_by_ref();
                Poll::Pending
            }
        }
    })
    .await
}
