use std::fmt;
use std::future::Future;
use std::pin::Pin;

use tracing::debug;

use crate::element::{ElementType, HostArray};
use crate::error::{Advisory, BufferError, Result};
use crate::format::{format_for, FormatDesc};
use crate::layout::{TextureLayout, VectorWidth, Wrap};
use crate::slots::{SlotState, StorageSlots};
use crate::storage::{
    AsyncReadback, DeviceCaps, PendingRead, StorageDesc, StorageDevice, TextureStorage,
};

/// Parameters for [`GpuBuffer::new`].
///
/// When `data` is set it decides both the element count and the element type; `alloc_count`
/// and `element_type` are only used for buffers created without data.
#[derive(Debug, Clone)]
pub struct BufferDescriptor {
    pub label: Option<String>,
    pub alloc_count: Option<usize>,
    pub data: Option<HostArray>,
    pub element_type: ElementType,
    /// Requested components per texel. Clamped to `[1, 4]`; 3 is widened to 4.
    pub vector_width: u32,
    pub wrap: Wrap,
}

impl Default for BufferDescriptor {
    fn default() -> Self {
        Self {
            label: None,
            alloc_count: None,
            data: None,
            element_type: ElementType::default(),
            vector_width: 1,
            wrap: Wrap::default(),
        }
    }
}

impl BufferDescriptor {
    /// An uninitialized (zeroed) buffer of `count` components.
    pub fn with_len(count: usize) -> Self {
        Self {
            alloc_count: Some(count),
            ..Self::default()
        }
    }

    /// A buffer initialized from `data`.
    pub fn with_data(data: impl Into<HostArray>) -> Self {
        Self {
            data: Some(data.into()),
            ..Self::default()
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn element_type(mut self, ty: ElementType) -> Self {
        self.element_type = ty;
        self
    }

    pub fn vector_width(mut self, width: u32) -> Self {
        self.vector_width = width;
        self
    }

    pub fn wrap(mut self, wrap: impl Into<Wrap>) -> Self {
        self.wrap = wrap.into();
        self
    }
}

/// A host read-back in flight, produced by [`AsyncReader::to_host`].
pub type PendingHost = Pin<Box<dyn Future<Output = Result<HostArray>>>>;

/// A linear buffer stored in a 2D texture.
///
/// The handle owns its readable texture and, while a compute pass is in flight, a writable
/// duplicate (see [`StorageSlots`]). Textures are released on [`GpuBuffer::delete`] or when the
/// handle is dropped.
pub struct GpuBuffer<D: StorageDevice> {
    device: D,
    caps: DeviceCaps,
    label: Option<String>,
    layout: TextureLayout,
    element_type: ElementType,
    wrap: Wrap,
    format: FormatDesc,
    advisories: Vec<Advisory>,
    slots: StorageSlots<D::Texture>,
}

impl<D: StorageDevice + Clone> GpuBuffer<D> {
    /// Builds a buffer and eagerly allocates its readable storage.
    ///
    /// Fails with [`BufferError::CapacityExceeded`] before allocating anything if the packed
    /// texture does not fit the device.
    pub fn new(device: D, desc: BufferDescriptor) -> Result<Self> {
        let caps = device.caps();
        Self::with_caps(device, caps, desc)
    }

    pub(crate) fn with_caps(device: D, caps: DeviceCaps, desc: BufferDescriptor) -> Result<Self> {
        let BufferDescriptor {
            label,
            alloc_count,
            data,
            element_type,
            vector_width,
            wrap,
        } = desc;

        let element_count = match &data {
            Some(data) => data.len(),
            None => alloc_count.unwrap_or(0),
        };

        let (vector_width, advisory) = VectorWidth::coerce(vector_width);
        let layout =
            TextureLayout::resolve(element_count, vector_width, caps.max_texture_dimension_2d)?;

        let element_type = data
            .as_ref()
            .map(HostArray::element_type)
            .unwrap_or(element_type);

        let mut buffer = Self {
            device,
            caps,
            label,
            layout,
            element_type,
            wrap,
            format: format_for(element_type, vector_width),
            advisories: advisory.into_iter().collect(),
            slots: StorageSlots::new(),
        };
        buffer.allocate_readable()?;

        if let Some(data) = data {
            buffer.to_device(&data.reinterpret_clamped())?;
        }
        Ok(buffer)
    }

    /// A new handle with the same shape whose storage is a device-side copy of this one.
    ///
    /// The copy goes through the normal construction path; the texture allocated there is
    /// released and replaced by the duplicate.
    pub fn copy(&self) -> Result<Self> {
        let source = self.slots.readable()?;

        let desc = BufferDescriptor {
            label: self.label.clone(),
            alloc_count: Some(self.layout.element_count),
            data: None,
            element_type: self.element_type,
            vector_width: self.layout.vector_width.get(),
            wrap: self.wrap,
        };
        let mut copy = Self::with_caps(self.device.clone(), self.caps, desc)?;
        copy.slots.replace_readable(source.duplicate()?);
        Ok(copy)
    }

    /// Uploads `data` into the readable storage, allocating it first if needed.
    ///
    /// Data shorter than the texture is zero-padded; the storage rejects data that is longer.
    pub fn to_device(&mut self, data: &HostArray) -> Result<()> {
        let texture = self.allocate_readable()?;
        texture.upload(data.as_bytes())?;
        Ok(())
    }

    fn allocate_readable(&mut self) -> Result<&mut D::Texture> {
        let device = &self.device;
        let desc = StorageDesc {
            label: self.label.as_deref(),
            format: self.format,
            width: self.layout.width,
            height: self.layout.height,
            wrap: self.wrap,
        };
        let texture = self.slots.force_readable(|| {
            debug!(
                label = desc.label,
                width = desc.width,
                height = desc.height,
                format = ?desc.format.internal,
                "allocating buffer storage"
            );
            device.create_texture(&desc)
        })?;
        Ok(texture)
    }
}

impl<D: StorageDevice> GpuBuffer<D> {
    /// Reads the readable storage back to the host.
    ///
    /// With `None` a host array of [`Self::element_count`] components typed per
    /// [`Self::element_type`] is allocated. A provided array is filled in place (clamped byte
    /// arrays come back as plain byte arrays).
    pub fn to_host(&self, data: Option<HostArray>) -> Result<HostArray> {
        let mut out = self.prepare_host(data);
        self.slots.readable()?.read(out.as_bytes_mut())?;
        Ok(out)
    }

    fn prepare_host(&self, data: Option<HostArray>) -> HostArray {
        match data {
            Some(data) => data.reinterpret_clamped(),
            None => HostArray::zeroed(self.element_type, self.layout.element_count),
        }
    }

    /// The storage a compute pass renders into.
    ///
    /// Created on first request as a copy of the readable storage; later requests return the
    /// same texture until [`Self::finish`].
    pub fn request_writable(&mut self) -> Result<&mut D::Texture> {
        if self.slots.state() == SlotState::Live {
            debug!(label = self.label.as_deref(), "duplicating buffer storage for writing");
        }
        self.slots.request_writable()
    }

    /// Promotes the writable storage to readable. No-op if no pass is pending.
    pub fn finish(&mut self) {
        if self.slots.finish() {
            debug!(label = self.label.as_deref(), "swapped buffer storage");
        }
    }

    /// Releases the readable storage and any pending writable.
    pub fn delete(&mut self) {
        if self.slots.release_all() {
            tracing::warn!(
                label = self.label.as_deref(),
                "buffer deleted with a pending writable; discarding it"
            );
        }
        debug!(label = self.label.as_deref(), "released buffer storage");
    }

    pub fn readable(&self) -> Result<&D::Texture> {
        self.slots.readable()
    }

    pub fn writable(&self) -> Option<&D::Texture> {
        self.slots.writable()
    }

    pub fn state(&self) -> SlotState {
        self.slots.state()
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn layout(&self) -> &TextureLayout {
        &self.layout
    }

    pub fn element_count(&self) -> usize {
        self.layout.element_count
    }

    pub fn element_type(&self) -> ElementType {
        self.element_type
    }

    pub fn vector_width(&self) -> VectorWidth {
        self.layout.vector_width
    }

    /// `(width, height)` of the backing texture.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.layout.width, self.layout.height)
    }

    pub fn wrap(&self) -> Wrap {
        self.wrap
    }

    pub fn format(&self) -> FormatDesc {
        self.format
    }

    pub fn caps(&self) -> DeviceCaps {
        self.caps
    }

    /// Non-fatal conditions noticed during construction.
    pub fn advisories(&self) -> &[Advisory] {
        &self.advisories
    }
}

impl<D> GpuBuffer<D>
where
    D: StorageDevice,
    D::Texture: AsyncReadback,
{
    /// Non-blocking read-back, available only when the device reported the capability.
    pub fn async_reader(&self) -> Option<AsyncReader<'_, D>> {
        self.caps
            .async_readback
            .then_some(AsyncReader { buffer: self })
    }
}

/// Capability token for non-blocking read-back of a [`GpuBuffer`].
pub struct AsyncReader<'a, D: StorageDevice> {
    buffer: &'a GpuBuffer<D>,
}

impl<D> AsyncReader<'_, D>
where
    D: StorageDevice,
    D::Texture: AsyncReadback,
{
    /// Like [`GpuBuffer::to_host`], but resolves once the device has delivered the data.
    ///
    /// The read is submitted immediately; errors (including a missing readable) surface when the
    /// returned future is awaited. Do not write to the buffer before it resolves.
    pub fn to_host(&self, data: Option<HostArray>) -> PendingHost {
        let out = self.buffer.prepare_host(data);
        let started = self
            .buffer
            .slots
            .readable()
            .map(|texture| texture.read_async(vec![0; out.as_bytes().len()]));
        Box::pin(complete_read(out, started))
    }
}

async fn complete_read(
    mut out: HostArray,
    started: Result<PendingRead>,
) -> Result<HostArray> {
    let bytes = started?.await?;
    out.as_bytes_mut().copy_from_slice(&bytes);
    Ok(out)
}

impl<D: StorageDevice> fmt::Debug for GpuBuffer<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GpuBuffer")
            .field("label", &self.label)
            .field("layout", &self.layout)
            .field("element_type", &self.element_type)
            .field("wrap", &self.wrap)
            .field("state", &self.slots.state())
            .finish()
    }
}
