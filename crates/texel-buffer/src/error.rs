use thiserror::Error;

pub type Result<T> = std::result::Result<T, BufferError>;

/// Errors raised by storage resources (CPU or device backed).
///
/// Device-level failures are surfaced unchanged; nothing in this crate retries them.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("out of bounds: requested {requested} bytes, capacity {capacity} bytes")]
    OutOfBounds { requested: usize, capacity: usize },

    #[error("read-back failed: {0}")]
    ReadbackFailed(String),

    #[error("backend error: {0}")]
    Backend(String),
}

/// Errors raised by [`crate::GpuBuffer`] operations.
#[derive(Debug, Error)]
pub enum BufferError {
    /// The packed texture would not fit the device's maximum 2D texture edge.
    #[error("buffer needs a {width}x{height} texture but the device limit is {max}")]
    CapacityExceeded { width: u64, height: u64, max: u32 },

    /// A transfer was requested on a handle without readable storage.
    ///
    /// This only happens after [`crate::GpuBuffer::delete`]; it is a usage bug, not a
    /// recoverable runtime condition.
    #[error("buffer has no readable storage")]
    MissingReadable,

    #[error("invalid descriptor: {0}")]
    InvalidDescriptor(&'static str),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Non-fatal conditions noticed while building a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advisory {
    /// Three-component vectors are stored in four-component texels.
    VectorWidthCoerced { requested: u32, effective: u32 },
}
