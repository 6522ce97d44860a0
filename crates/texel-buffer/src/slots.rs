//! Readable/writable storage slots for ping-pong buffering.
//!
//! A buffer always reads from its *readable* texture. A compute pass renders into a *writable*
//! duplicate, and [`StorageSlots::finish`] promotes it once the pass is done, so readers never
//! observe a half-written texture.

use crate::error::{BufferError, StorageError};
use crate::storage::TextureStorage;

/// Lifecycle state of a [`StorageSlots`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// Nothing allocated yet.
    Empty,
    /// Readable present, no pass in flight.
    Live,
    /// Readable present plus a writable awaiting promotion.
    Pending,
    /// Storage was explicitly released.
    Deleted,
}

/// At most one readable and at most one writable texture.
///
/// A writable only ever exists as the successor of a readable.
#[derive(Debug)]
pub struct StorageSlots<T> {
    readable: Option<T>,
    writable: Option<T>,
    deleted: bool,
}

impl<T> Default for StorageSlots<T> {
    fn default() -> Self {
        Self {
            readable: None,
            writable: None,
            deleted: false,
        }
    }
}

impl<T: TextureStorage> StorageSlots<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SlotState {
        match (&self.readable, &self.writable) {
            (Some(_), Some(_)) => SlotState::Pending,
            (Some(_), None) => SlotState::Live,
            (None, _) if self.deleted => SlotState::Deleted,
            (None, _) => SlotState::Empty,
        }
    }

    pub fn readable(&self) -> Result<&T, BufferError> {
        self.readable.as_ref().ok_or(BufferError::MissingReadable)
    }

    pub fn writable(&self) -> Option<&T> {
        self.writable.as_ref()
    }

    /// Returns the readable texture, creating it with `create` if there is none.
    pub fn force_readable<F>(&mut self, create: F) -> Result<&mut T, StorageError>
    where
        F: FnOnce() -> Result<T, StorageError>,
    {
        match self.readable {
            Some(ref mut readable) => Ok(readable),
            None => {
                let created = create()?;
                self.deleted = false;
                Ok(self.readable.insert(created))
            }
        }
    }

    /// Returns the writable texture, duplicating the readable one on first use.
    pub fn request_writable(&mut self) -> Result<&mut T, BufferError> {
        match self.writable {
            Some(ref mut writable) => Ok(writable),
            None => {
                let dup = self.readable()?.duplicate()?;
                Ok(self.writable.insert(dup))
            }
        }
    }

    /// Promotes a pending writable to readable and releases the old readable.
    ///
    /// Returns `false` (and changes nothing) if no writable was pending.
    pub fn finish(&mut self) -> bool {
        let Some(next) = self.writable.take() else {
            return false;
        };
        if let Some(prev) = self.readable.replace(next) {
            prev.release();
        }
        true
    }

    /// Installs `next` as the readable texture, releasing the current one.
    pub fn replace_readable(&mut self, next: T) {
        if let Some(prev) = self.readable.replace(next) {
            prev.release();
        }
        self.deleted = false;
    }

    /// Releases every texture. Returns `true` if a pending writable was discarded.
    pub fn release_all(&mut self) -> bool {
        let had_writable = match self.writable.take() {
            Some(w) => {
                w.release();
                true
            }
            None => false,
        };
        if let Some(r) = self.readable.take() {
            r.release();
        }
        self.deleted = true;
        had_writable
    }
}
