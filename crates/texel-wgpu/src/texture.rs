use std::sync::Arc;

use texel_buffer::{
    AsyncReadback, FormatDesc, PendingRead, StorageDesc, StorageError, TextureStorage, Wrap,
};

use crate::format::{map_address_mode, map_texture_format};
use crate::readback::{receive_with_poll, Staging};

pub(crate) const TEXTURE_USAGES: wgpu::TextureUsages = wgpu::TextureUsages::COPY_SRC
    .union(wgpu::TextureUsages::COPY_DST)
    .union(wgpu::TextureUsages::TEXTURE_BINDING)
    .union(wgpu::TextureUsages::RENDER_ATTACHMENT);

/// A buffer's storage texture on a `wgpu` device.
#[derive(Debug)]
pub struct WgpuTexture {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    texture: wgpu::Texture,
    label: Option<String>,
    format: FormatDesc,
    width: u32,
    height: u32,
    wrap: Wrap,
}

impl WgpuTexture {
    pub(crate) fn create(
        device: Arc<wgpu::Device>,
        queue: Arc<wgpu::Queue>,
        desc: &StorageDesc<'_>,
    ) -> Result<Self, StorageError> {
        let texture = create_raw(&device, desc.label, desc.format, desc.width, desc.height)?;
        Ok(Self {
            device,
            queue,
            texture,
            label: desc.label.map(str::to_owned),
            format: desc.format,
            width: desc.width,
            height: desc.height,
            wrap: desc.wrap,
        })
    }

    /// The underlying texture, for binding as a compute input or render target.
    pub fn raw(&self) -> &wgpu::Texture {
        &self.texture
    }

    pub fn create_view(&self) -> wgpu::TextureView {
        self.texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    /// Sampler state matching the buffer's wrap policy.
    ///
    /// Filtering is always nearest: texels hold independent values, not an image.
    pub fn sampler_descriptor(&self) -> wgpu::SamplerDescriptor<'static> {
        wgpu::SamplerDescriptor {
            label: Some("texel buffer sampler"),
            address_mode_u: map_address_mode(self.wrap.s),
            address_mode_v: map_address_mode(self.wrap.t),
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        }
    }

    fn extent(&self) -> wgpu::Extent3d {
        wgpu::Extent3d {
            width: self.width,
            height: self.height,
            depth_or_array_layers: 1,
        }
    }

    fn whole(&self) -> wgpu::ImageCopyTexture<'_> {
        wgpu::ImageCopyTexture {
            texture: &self.texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        }
    }

    fn check_len(&self, requested: usize) -> Result<(), StorageError> {
        let capacity = self.size_bytes();
        if requested > capacity {
            return Err(StorageError::OutOfBounds {
                requested,
                capacity,
            });
        }
        Ok(())
    }

    /// Rows that must be copied out to cover `len` bytes.
    fn rows_for(&self, len: usize) -> u32 {
        let row_bytes = (self.width * self.format.bytes_per_texel) as usize;
        len.div_ceil(row_bytes) as u32
    }
}

fn create_raw(
    device: &wgpu::Device,
    label: Option<&str>,
    format: FormatDesc,
    width: u32,
    height: u32,
) -> Result<wgpu::Texture, StorageError> {
    device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label,
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: map_texture_format(format.internal),
        usage: TEXTURE_USAGES,
        view_formats: &[],
    });
    let validation = pollster::block_on(device.pop_error_scope());
    let oom = pollster::block_on(device.pop_error_scope());
    if let Some(err) = validation.or(oom) {
        return Err(StorageError::Backend(err.to_string()));
    }
    Ok(texture)
}

impl TextureStorage for WgpuTexture {
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

        // `write_texture` covers whole rows; pad short uploads out to the full texture.
        let size = self.size_bytes();
        let padded;
        let bytes = if bytes.len() == size {
            bytes
        } else {
            let mut v = vec![0u8; size];
            v[..bytes.len()].copy_from_slice(bytes);
            padded = v;
            &padded[..]
        };

        self.queue.write_texture(
            self.whole(),
            bytes,
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(self.width * self.format.bytes_per_texel),
                rows_per_image: Some(self.height),
            },
            self.extent(),
        );
        Ok(())
    }

    fn read(&self, dst: &mut [u8]) -> Result<(), StorageError> {
        self.check_len(dst.len())?;
        if dst.is_empty() {
            return Ok(());
        }

        let staging = Staging::submit_copy(
            &self.device,
            &self.queue,
            &self.texture,
            self.width,
            self.format.bytes_per_texel,
            self.rows_for(dst.len()),
        );
        let receiver = staging.map();
        #[cfg(not(target_arch = "wasm32"))]
        self.device.poll(wgpu::Maintain::Wait);
        let mapped = pollster::block_on(receiver.receive());
        staging.finish(mapped, dst)
    }

    fn duplicate(&self) -> Result<Self, StorageError> {
        let texture = create_raw(
            &self.device,
            self.label.as_deref(),
            self.format,
            self.width,
            self.height,
        )?;

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("texel duplicate encoder"),
            });
        encoder.copy_texture_to_texture(
            self.whole(),
            wgpu::ImageCopyTexture {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            self.extent(),
        );
        self.queue.submit(Some(encoder.finish()));

        Ok(Self {
            device: self.device.clone(),
            queue: self.queue.clone(),
            texture,
            label: self.label.clone(),
            format: self.format,
            width: self.width,
            height: self.height,
            wrap: self.wrap,
        })
    }

    fn release(self) {
        self.texture.destroy();
    }
}

impl AsyncReadback for WgpuTexture {
    fn read_async(&self, mut dst: Vec<u8>) -> PendingRead {
        if let Err(err) = self.check_len(dst.len()) {
            return Box::pin(std::future::ready(Err(err)));
        }
        if dst.is_empty() {
            return Box::pin(std::future::ready(Ok(dst)));
        }

        let staging = Staging::submit_copy(
            &self.device,
            &self.queue,
            &self.texture,
            self.width,
            self.format.bytes_per_texel,
            self.rows_for(dst.len()),
        );
        let receiver = staging.map();
        let device = self.device.clone();
        Box::pin(async move {
            let mapped = receive_with_poll(&device, receiver).await;
            staging.finish(mapped, &mut dst).map(|()| dst)
        })
    }
}
