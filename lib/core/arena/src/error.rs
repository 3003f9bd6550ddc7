//! Errors produced by [`Arena`][a] operations.
//!
//! [a]: crate::Arena

use core::{error, fmt};

/// The [`Arena`][a] operation during which an error occurred.
///
/// [a]: crate::Arena
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum Operation {
    /// [`Arena::deallocate`][d].
    ///
    /// [d]: crate::Arena::deallocate
    Free,
    /// [`Arena::read`][r].
    ///
    /// [r]: crate::Arena::read
    Read,
    /// [`Arena::write`][w].
    ///
    /// [w]: crate::Arena::write
    Write,
    /// [`Arena::protect`][p].
    ///
    /// [p]: crate::Arena::protect
    Protect,
}

impl Operation {
    /// Returns the textual representation of the [`Operation`].
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Read => "read",
            Self::Write => "write",
            Self::Protect => "mprotect",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The edge of a requested range that fell outside of the [`Arena`][a].
///
/// [a]: crate::Arena
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum Bound {
    /// The first address of the range is outside of the [`Arena`][a].
    ///
    /// [a]: crate::Arena
    Start,
    /// The last address of the range is outside of the [`Arena`][a].
    ///
    /// [a]: crate::Arena
    End,
}

/// Various errors that can occur while operating on an [`Arena`][a].
///
/// Every error leaves the [`Arena`][a] exactly as it was before the failed operation.
///
/// [a]: crate::Arena
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// The [`Arena`][a] has not been opened, or has already been closed.
    ///
    /// [a]: crate::Arena
    Uninitialized,
    /// The [`Arena`][a] was opened while it was already open.
    ///
    /// [a]: crate::Arena
    AlreadyOpen,
    /// A zero-sized allocation was requested.
    EmptyRange,
    /// The requested range does not fit within the capacity of the [`Arena`][a].
    ///
    /// [a]: crate::Arena
    OutOfBounds(Bound),
    /// The requested range intersects an existing block.
    Overlap,
    /// No block contains the address, or the address is not the start of a miniblock when one is
    /// required.
    AddressNotFound(Operation),
    /// A miniblock spanned by the access lacks the permission the [`Operation`] requires.
    PermissionDenied(Operation),
    /// A miniblock spanned by a read has never been written.
    UninitializedRead {
        /// The start address of the unwritten miniblock.
        address: u64,
    },
    /// The backing buffer of a miniblock could not be allocated.
    BufferAllocation {
        /// The number of bytes that were requested.
        size: u64,
    },
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uninitialized => write!(f, "Arena was not allocated."),
            Self::AlreadyOpen => write!(f, "Arena was already allocated."),
            Self::EmptyRange => write!(f, "The allocated size must be greater than zero."),
            Self::OutOfBounds(Bound::Start) => {
                write!(f, "The allocated address is outside the size of arena")
            }
            Self::OutOfBounds(Bound::End) => {
                write!(f, "The end address is past the size of the arena")
            }
            Self::Overlap => write!(f, "This zone was already allocated."),
            Self::AddressNotFound(operation) => write!(f, "Invalid address for {operation}."),
            Self::PermissionDenied(operation) => write!(f, "Invalid permissions for {operation}."),
            Self::UninitializedRead { address } => {
                write!(f, "Invalid read of uninitialized memory at 0x{address:X}.")
            }
            Self::BufferAllocation { size } => {
                write!(f, "Failed to allocate a buffer of 0x{size:X} bytes.")
            }
        }
    }
}

impl error::Error for ArenaError {}
