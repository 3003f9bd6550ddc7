//! Results of reads and writes, including the non-fatal truncation warning.

use alloc::vec::Vec;
use core::fmt;

use crate::{Operation, Permissions};

/// A data access on the contents of a block.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum Access {
    /// The bytes are copied out of the block.
    Read,
    /// The bytes are copied into the block.
    Write,
}

impl Access {
    /// Returns the [`Operation`] reported in errors raised by this [`Access`].
    pub const fn operation(self) -> Operation {
        match self {
            Self::Read => Operation::Read,
            Self::Write => Operation::Write,
        }
    }

    /// Returns the [`Permissions`] every covered miniblock must allow.
    pub const fn required(self) -> Permissions {
        match self {
            Self::Read => Permissions::READ,
            Self::Write => Permissions::WRITE,
        }
    }
}

/// The requested access extended past the end of its block and was clamped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Truncation {
    /// The [`Access`] that was clamped.
    pub access: Access,
    /// The number of bytes that were requested.
    pub requested: u64,
    /// The number of bytes between the access address and the end of the block.
    pub available: u64,
}

impl fmt::Display for Truncation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self.access {
            Access::Read => "Reading",
            Access::Write => "Writing",
        };

        write!(
            f,
            "Warning: size was bigger than the block size. {verb} {} characters.",
            self.available
        )
    }
}

/// The bytes produced by a successful [`Arena::read`][r].
///
/// [r]: crate::Arena::read
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReadOutcome {
    /// The bytes read, in address order.
    pub data: Vec<u8>,
    /// Present if the read was clamped to the end of its block.
    pub truncation: Option<Truncation>,
}

/// The result of a successful [`Arena::write`][w].
///
/// [w]: crate::Arena::write
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WriteOutcome {
    /// The number of payload bytes that were copied into the address space.
    pub written: u64,
    /// Present if the write was clamped to the end of its block.
    pub truncation: Option<Truncation>,
}

/// A validated access within a single block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Span {
    /// The index of the miniblock containing [`Span::address`].
    pub first: usize,
    /// The first address accessed.
    pub address: u64,
    /// The number of bytes accessed after clamping.
    pub size: u64,
    /// Present if the access was clamped to the end of its block.
    pub truncation: Option<Truncation>,
}

/// The part of a [`Span`] that falls within one miniblock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Segment {
    /// The index of the miniblock within its block.
    pub index: usize,
    /// The first address accessed within the miniblock.
    pub address: u64,
    /// The number of bytes accessed within the miniblock.
    pub length: u64,
}
