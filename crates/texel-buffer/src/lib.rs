//! `texel-buffer` stores linear numeric buffers in 2D textures for GPGPU work.
//!
//! This crate provides:
//! - the packing of a 1D buffer into texture dimensions (see [`TextureLayout`]),
//! - the element-type and format tables (see [`ElementType`], [`format_for`]),
//! - a backend-agnostic storage interface (see [`StorageDevice`]) plus an in-memory
//!   implementation for tests (see [`CpuDevice`]),
//! - the buffer handle with ping-pong readable/writable storage (see [`GpuBuffer`]).

mod buffer;
mod context;
mod cpu;
mod element;
mod error;
mod format;
mod layout;
mod slots;
mod storage;

pub use buffer::{AsyncReader, BufferDescriptor, GpuBuffer, PendingHost};
pub use context::TexelContext;
pub use cpu::{CpuDevice, CpuTexture};
pub use element::{infer_element_type, ElementType, HostArray, HostKind, INFERENCE_TABLE};
pub use error::{Advisory, BufferError, Result, StorageError};
pub use format::{format_for, FormatDesc, InternalFormat, PixelLayout};
pub use layout::{closest_dimensions, TextureLayout, VectorWidth, Wrap, WrapMode};
pub use slots::{SlotState, StorageSlots};
pub use storage::{AsyncReadback, DeviceCaps, PendingRead, StorageDesc, StorageDevice, TextureStorage};

pub use half::f16;
