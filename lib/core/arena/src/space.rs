//! Bookkeeping for an open [`Arena`][a]: placement, coalescing, and splitting of [`Block`]s.
//!
//! [a]: crate::Arena

use sequence::OrderedSequence;

use crate::{
    Access, AddressRange, ArenaError, Block, Bound, Operation, Permissions, ReadOutcome, Report,
    WriteOutcome,
    block::Removal,
    report::{BlockReport, MiniblockReport},
};

/// The state of an open [`Arena`][a].
///
/// [`AddressSpace::blocks`] is sorted by start address and no two consecutive [`Block`]s touch or
/// overlap.
///
/// [a]: crate::Arena
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct AddressSpace {
    /// The number of addressable bytes.
    capacity: u64,
    /// The mapped [`Block`]s in address order.
    blocks: OrderedSequence<Block>,
}

impl AddressSpace {
    /// Creates an empty [`AddressSpace`] of `capacity` bytes.
    pub(crate) const fn new(capacity: u64) -> Self {
        Self {
            capacity,
            blocks: OrderedSequence::new(),
        }
    }

    /// Returns the number of addressable bytes.
    pub(crate) const fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Returns the mapped [`Block`]s in address order.
    pub(crate) const fn blocks(&self) -> &OrderedSequence<Block> {
        &self.blocks
    }

    /// Returns the index of the [`Block`] containing `address`.
    pub(crate) fn find_block(&self, address: u64) -> Option<usize> {
        self.blocks.position(|block| block.contains(address))
    }

    /// Maps `size` bytes starting at `address`, coalescing with touching [`Block`]s.
    pub(crate) fn allocate(&mut self, address: u64, size: u64) -> Result<(), ArenaError> {
        let range = self.validate(address, size)?;

        match self.locate(range) {
            Placement::Standalone(index) => {
                log::trace!("placing {range} as standalone block {index}");
                self.blocks.insert(index, Block::new(range));
            }
            Placement::Suffix(index) => {
                log::trace!("appending {range} to block {index}");
                self.block_mut(index).absorb_after(Block::new(range));
            }
            Placement::Prefix(index) => {
                log::trace!("prepending {range} to block {index}");
                self.block_mut(index).absorb_before(Block::new(range));
            }
            Placement::Bridge(index) => {
                log::trace!("bridging blocks {index} and {} with {range}", index + 1);
                let successor = self
                    .blocks
                    .remove(index + 1)
                    .expect("bridged successor must exist");
                let predecessor = self.block_mut(index);
                predecessor.absorb_after(Block::new(range));
                predecessor.absorb_after(successor);
            }
        }

        Ok(())
    }

    /// Returns the [`Block`] at `index`, which [`AddressSpace::locate`] has already found.
    fn block_mut(&mut self, index: usize) -> &mut Block {
        self.blocks
            .get_mut(index)
            .expect("located block must exist")
    }

    /// Checks that `size` bytes starting at `address` fit within the [`AddressSpace`] and do not
    /// intersect any mapped [`Block`].
    fn validate(&self, address: u64, size: u64) -> Result<AddressRange, ArenaError> {
        if address >= self.capacity {
            return Err(ArenaError::OutOfBounds(Bound::Start));
        }
        if size == 0 {
            return Err(ArenaError::EmptyRange);
        }

        let range = AddressRange::new(address, size)
            .filter(|range| range.end_inclusive() < self.capacity)
            .ok_or(ArenaError::OutOfBounds(Bound::End))?;

        if self.blocks.iter().any(|block| block.range().overlaps(range)) {
            return Err(ArenaError::Overlap);
        }

        Ok(range)
    }

    /// Determines where the free `range` belongs among the mapped [`Block`]s.
    fn locate(&self, range: AddressRange) -> Placement {
        let index = self
            .blocks
            .position(|block| block.start() > range.start())
            .unwrap_or(self.blocks.len());

        let touches_predecessor = index
            .checked_sub(1)
            .and_then(|previous| self.blocks.get(previous))
            .is_some_and(|predecessor| predecessor.range().touches(range));
        let touches_successor = self
            .blocks
            .get(index)
            .is_some_and(|successor| successor.range().touches(range));

        match (touches_predecessor, touches_successor) {
            (true, true) => Placement::Bridge(index - 1),
            (true, false) => Placement::Suffix(index - 1),
            (false, true) => Placement::Prefix(index),
            (false, false) => Placement::Standalone(index),
        }
    }

    /// Unmaps the [`Miniblock`][m] starting exactly at `address`.
    ///
    /// [m]: crate::Miniblock
    pub(crate) fn deallocate(&mut self, address: u64) -> Result<(), ArenaError> {
        let not_found = ArenaError::AddressNotFound(Operation::Free);

        let index = self.find_block(address).ok_or(not_found)?;
        let block = self.blocks.get_mut(index).ok_or(not_found)?;
        let position = block.miniblock_starting_at(address).ok_or(not_found)?;

        match block.remove_miniblock(position).ok_or(not_found)? {
            Removal::Emptied => {
                log::trace!("discarding block {index}");
                self.blocks
                    .remove(index)
                    .expect("emptied block must exist");
            }
            Removal::Shrunk(removed) => {
                log::trace!("trimmed {} from block {index}", removed.range());
            }
            Removal::Split { removed, tail } => {
                log::trace!(
                    "removed {} from block {index}, splitting off {}",
                    removed.range(),
                    tail.range()
                );
                self.blocks.insert(index + 1, tail);
            }
        }

        Ok(())
    }

    /// Replaces the [`Permissions`] of the [`Miniblock`][m] starting exactly at `address`.
    ///
    /// [m]: crate::Miniblock
    pub(crate) fn protect(
        &mut self,
        address: u64,
        permissions: Permissions,
    ) -> Result<(), ArenaError> {
        let not_found = ArenaError::AddressNotFound(Operation::Protect);

        let index = self.find_block(address).ok_or(not_found)?;
        let block = self.blocks.get_mut(index).ok_or(not_found)?;
        let position = block.miniblock_starting_at(address).ok_or(not_found)?;
        block
            .miniblock_mut(position)
            .ok_or(not_found)?
            .set_permissions(permissions);

        Ok(())
    }

    /// Reads up to `size` bytes starting at `address`.
    pub(crate) fn read(&self, address: u64, size: u64) -> Result<ReadOutcome, ArenaError> {
        let not_found = ArenaError::AddressNotFound(Operation::Read);

        let index = self.find_block(address).ok_or(not_found)?;
        let block = self.blocks.get(index).ok_or(not_found)?;
        let span = block.span(address, size, Access::Read)?;
        let data = block.read(span)?;

        Ok(ReadOutcome {
            data,
            truncation: span.truncation,
        })
    }

    /// Writes `payload` into up to `size` bytes starting at `address`.
    pub(crate) fn write(
        &mut self,
        address: u64,
        size: u64,
        payload: &[u8],
    ) -> Result<WriteOutcome, ArenaError> {
        let not_found = ArenaError::AddressNotFound(Operation::Write);

        let index = self.find_block(address).ok_or(not_found)?;
        let block = self.blocks.get_mut(index).ok_or(not_found)?;
        let span = block.span(address, size, Access::Write)?;
        let written = block.write(span, payload)?;

        Ok(WriteOutcome {
            written,
            truncation: span.truncation,
        })
    }

    /// Produces a [`Report`] describing every mapped [`Block`] and [`Miniblock`][m].
    ///
    /// [m]: crate::Miniblock
    pub(crate) fn report(&self) -> Report {
        let blocks = self
            .blocks
            .iter()
            .map(|block| BlockReport {
                range: block.range(),
                miniblocks: block
                    .miniblocks()
                    .iter()
                    .map(|miniblock| MiniblockReport {
                        range: miniblock.range(),
                        permissions: miniblock.permissions(),
                    })
                    .collect(),
            })
            .collect();

        Report {
            capacity: self.capacity,
            blocks,
        }
    }
}

/// The position of a newly allocated range relative to the existing [`Block`]s.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Placement {
    /// The range touches nothing and becomes a new [`Block`] at the index.
    Standalone(usize),
    /// The range directly follows the [`Block`] at the index.
    Suffix(usize),
    /// The range directly precedes the [`Block`] at the index.
    Prefix(usize),
    /// The range fills the gap between the [`Block`] at the index and the one after it exactly.
    Bridge(usize),
}
