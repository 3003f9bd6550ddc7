//! A simulated virtual address space.
//!
//! An [`Arena`] is a flat range of addresses in which contiguous ranges are mapped as [`Block`]s.
//! Every [`Block`] is tiled by one or more [`Miniblock`]s, one per successful allocation, each
//! carrying its own [`Permissions`] and data buffer. Allocations that touch existing [`Block`]s
//! are coalesced with them, and freeing an interior [`Miniblock`] splits its [`Block`] in two.
#![no_std]

extern crate alloc;

mod access;
mod arena;
mod block;
mod error;
mod miniblock;
mod permissions;
mod range;
mod report;
mod space;

pub use access::{Access, ReadOutcome, Truncation, WriteOutcome};
pub use arena::{Arena, Released};
pub use block::Block;
pub use error::{ArenaError, Bound, Operation};
pub use miniblock::Miniblock;
pub use permissions::Permissions;
pub use range::AddressRange;
pub use report::{BlockReport, MiniblockReport, Report};
