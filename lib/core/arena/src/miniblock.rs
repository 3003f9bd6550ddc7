//! The finest-grained unit of the address space.

use alloc::vec::Vec;

use conversion::{u64_to_usize_checked, usize_to_u64};

use crate::{AddressRange, ArenaError, Permissions};

/// A sub-range of a [`Block`][b] carrying its own [`Permissions`] and data buffer.
///
/// [b]: crate::Block
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Miniblock {
    /// The addresses covered by this [`Miniblock`].
    range: AddressRange,
    /// The accesses allowed on this [`Miniblock`].
    permissions: Permissions,
    /// The contents of this [`Miniblock`], present once it has been written.
    ///
    /// When present, the buffer holds exactly `range.size()` bytes.
    buffer: Option<Vec<u8>>,
}

impl Miniblock {
    /// Creates an unwritten [`Miniblock`] covering `range` with [`Permissions::DEFAULT`].
    pub(crate) const fn new(range: AddressRange) -> Self {
        Self {
            range,
            permissions: Permissions::DEFAULT,
            buffer: None,
        }
    }

    /// Returns the addresses covered by this [`Miniblock`].
    pub const fn range(&self) -> AddressRange {
        self.range
    }

    /// Returns the address at the start of this [`Miniblock`].
    pub const fn start(&self) -> u64 {
        self.range.start()
    }

    /// Returns the number of bytes in this [`Miniblock`].
    pub const fn size(&self) -> u64 {
        self.range.size()
    }

    /// Returns the accesses allowed on this [`Miniblock`].
    pub const fn permissions(&self) -> Permissions {
        self.permissions
    }

    /// Returns the contents of this [`Miniblock`], or `None` if it has never been written.
    pub fn buffer(&self) -> Option<&[u8]> {
        self.buffer.as_deref()
    }

    /// Returns the number of bytes currently held in this [`Miniblock`]'s buffer.
    pub fn buffered_bytes(&self) -> u64 {
        self.buffer
            .as_ref()
            .map_or(0, |buffer| usize_to_u64(buffer.len()))
    }

    /// Replaces the accesses allowed on this [`Miniblock`].
    pub(crate) fn set_permissions(&mut self, permissions: Permissions) {
        self.permissions = permissions;
    }

    /// Allocates a zero-filled buffer large enough to replace this [`Miniblock`]'s contents.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::BufferAllocation`] if the buffer cannot be allocated.
    pub(crate) fn fresh_buffer(&self) -> Result<Vec<u8>, ArenaError> {
        let error = ArenaError::BufferAllocation { size: self.size() };
        let length = u64_to_usize_checked(self.size()).ok_or(error)?;

        let mut buffer = Vec::new();
        buffer.try_reserve_exact(length).map_err(|_| error)?;
        buffer.resize(length, 0);
        Ok(buffer)
    }

    /// Installs `buffer` as the contents of this [`Miniblock`], discarding the previous contents.
    pub(crate) fn replace_buffer(&mut self, buffer: Vec<u8>) {
        debug_assert_eq!(usize_to_u64(buffer.len()), self.size());
        self.buffer = Some(buffer);
    }
}
