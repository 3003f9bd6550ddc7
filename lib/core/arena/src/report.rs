//! A snapshot of the mapped layout of an [`Arena`][a].
//!
//! [a]: crate::Arena

use alloc::vec::Vec;
use core::fmt;

use conversion::usize_to_u64;

use crate::{AddressRange, Permissions};

/// The layout of an open [`Arena`][a] at the time [`Arena::report`][r] was called.
///
/// [a]: crate::Arena
/// [r]: crate::Arena::report
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report {
    /// The number of addressable bytes.
    pub capacity: u64,
    /// Every mapped block in address order.
    pub blocks: Vec<BlockReport>,
}

impl Report {
    /// Returns the number of bytes not covered by any block.
    pub fn free_bytes(&self) -> u64 {
        let mapped: u64 = self.blocks.iter().map(|block| block.range.size()).sum();
        self.capacity - mapped
    }

    /// Returns the number of mapped blocks.
    pub fn block_count(&self) -> u64 {
        usize_to_u64(self.blocks.len())
    }

    /// Returns the number of mapped miniblocks across every block.
    pub fn miniblock_count(&self) -> u64 {
        self.blocks
            .iter()
            .map(|block| usize_to_u64(block.miniblocks.len()))
            .sum()
    }
}

/// A mapped block within a [`Report`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockReport {
    /// The addresses covered by the block.
    pub range: AddressRange,
    /// The miniblocks tiling the block in address order.
    pub miniblocks: Vec<MiniblockReport>,
}

/// A mapped miniblock within a [`BlockReport`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MiniblockReport {
    /// The addresses covered by the miniblock.
    pub range: AddressRange,
    /// The accesses allowed on the miniblock.
    pub permissions: Permissions,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total memory: 0x{:X} bytes", self.capacity)?;
        writeln!(f, "Free memory: 0x{:X} bytes", self.free_bytes())?;
        writeln!(f, "Number of allocated blocks: {}", self.block_count())?;
        writeln!(f, "Number of allocated miniblocks: {}", self.miniblock_count())?;

        for (block_number, block) in (1..).zip(&self.blocks) {
            writeln!(f)?;
            writeln!(f, "Block {block_number} begin")?;
            writeln!(f, "Zone: {}", block.range)?;
            for (miniblock_number, miniblock) in (1..).zip(&block.miniblocks) {
                writeln!(
                    f,
                    "Miniblock {miniblock_number}:\t\t0x{:X}\t\t-\t\t0x{:X}\t\t| {}",
                    miniblock.range.start(),
                    miniblock.range.end_exclusive(),
                    miniblock.permissions
                )?;
            }
            writeln!(f, "Block {block_number} end")?;
        }

        Ok(())
    }
}
