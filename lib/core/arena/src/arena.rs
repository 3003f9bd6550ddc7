//! The [`Arena`] handle and its open/closed lifecycle.

use core::fmt;

use sequence::OrderedSequence;

use crate::{
    ArenaError, Block, Permissions, ReadOutcome, Report, WriteOutcome, space::AddressSpace,
};

/// A simulated flat address space.
///
/// An [`Arena`] starts closed. [`Arena::open`] gives it a fixed capacity, after which ranges can
/// be mapped with [`Arena::allocate`], unmapped with [`Arena::deallocate`], and accessed with
/// [`Arena::read`] and [`Arena::write`] subject to the [`Permissions`] set by
/// [`Arena::protect`]. [`Arena::close`] releases everything and returns the [`Arena`] to the
/// closed state, where every operation fails with [`ArenaError::Uninitialized`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Arena {
    /// The mapped state, present while the [`Arena`] is open.
    space: Option<AddressSpace>,
}

impl Arena {
    /// Creates a closed [`Arena`].
    pub const fn new() -> Self {
        Self { space: None }
    }

    /// Opens the [`Arena`] with `capacity` addressable bytes and no mapped blocks.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::AlreadyOpen`] if the [`Arena`] is already open.
    pub fn open(&mut self, capacity: u64) -> Result<(), ArenaError> {
        if self.space.is_some() {
            return Err(ArenaError::AlreadyOpen);
        }

        log::debug!("opening arena of 0x{capacity:X} bytes");
        self.space = Some(AddressSpace::new(capacity));
        Ok(())
    }

    /// Closes the [`Arena`], releasing every block, miniblock, and buffer.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::Uninitialized`] if the [`Arena`] is not open.
    pub fn close(&mut self) -> Result<Released, ArenaError> {
        let space = self.space.take().ok_or(ArenaError::Uninitialized)?;

        let blocks = space.blocks();
        let released = Released {
            blocks: blocks.len(),
            miniblocks: blocks.iter().map(|block| block.miniblocks().len()).sum(),
            buffered_bytes: blocks
                .iter()
                .flat_map(|block| block.miniblocks().iter())
                .map(|miniblock| miniblock.buffered_bytes())
                .sum(),
        };
        log::debug!("closing arena: {released}");

        Ok(released)
    }

    /// Returns `true` if the [`Arena`] is open.
    pub const fn is_open(&self) -> bool {
        self.space.is_some()
    }

    /// Returns the capacity of the [`Arena`], or `None` if it is closed.
    pub fn capacity(&self) -> Option<u64> {
        self.space.as_ref().map(AddressSpace::capacity)
    }

    /// Returns the mapped [`Block`]s in address order.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::Uninitialized`] if the [`Arena`] is not open.
    pub fn blocks(&self) -> Result<&OrderedSequence<Block>, ArenaError> {
        self.space().map(AddressSpace::blocks)
    }

    /// Returns the [`Block`] containing `address`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::Uninitialized`] if the [`Arena`] is not open.
    pub fn find_block(&self, address: u64) -> Result<Option<&Block>, ArenaError> {
        let space = self.space()?;
        Ok(space
            .find_block(address)
            .and_then(|index| space.blocks().get(index)))
    }

    /// Returns the number of mapped [`Block`]s.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::Uninitialized`] if the [`Arena`] is not open.
    pub fn block_count(&self) -> Result<usize, ArenaError> {
        self.blocks().map(OrderedSequence::len)
    }

    /// Returns the number of mapped miniblocks across every [`Block`].
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::Uninitialized`] if the [`Arena`] is not open.
    pub fn miniblock_count(&self) -> Result<usize, ArenaError> {
        let blocks = self.blocks()?;
        Ok(blocks.iter().map(|block| block.miniblocks().len()).sum())
    }

    /// Returns the number of bytes not covered by any [`Block`].
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::Uninitialized`] if the [`Arena`] is not open.
    pub fn free_bytes(&self) -> Result<u64, ArenaError> {
        let space = self.space()?;
        let mapped: u64 = space.blocks().iter().map(Block::size).sum();
        Ok(space.capacity() - mapped)
    }

    /// Maps the `size` bytes starting at `address`.
    ///
    /// The new range becomes a single miniblock with [`Permissions::DEFAULT`]. If it touches the
    /// block before it, the block after it, or both, the touching blocks are merged with it into a
    /// single block.
    ///
    /// # Errors
    ///
    /// - [`ArenaError::Uninitialized`]: the [`Arena`] is not open.
    /// - [`ArenaError::OutOfBounds`]: the range does not fit within the capacity of the
    ///   [`Arena`].
    /// - [`ArenaError::EmptyRange`]: `size` is zero.
    /// - [`ArenaError::Overlap`]: the range intersects a mapped block.
    pub fn allocate(&mut self, address: u64, size: u64) -> Result<(), ArenaError> {
        self.space_mut()?.allocate(address, size)?;

        log::debug!("allocated 0x{size:X} bytes at 0x{address:X}");
        Ok(())
    }

    /// Unmaps the miniblock starting exactly at `address`.
    ///
    /// Removing the only miniblock of a block discards the block. Removing an interior miniblock
    /// splits its block in two; the miniblocks after it form a new block placed directly after the
    /// original one.
    ///
    /// # Errors
    ///
    /// - [`ArenaError::Uninitialized`]: the [`Arena`] is not open.
    /// - [`ArenaError::AddressNotFound`]: no miniblock starts at `address`.
    pub fn deallocate(&mut self, address: u64) -> Result<(), ArenaError> {
        self.space_mut()?.deallocate(address)?;

        log::debug!("freed miniblock at 0x{address:X}");
        Ok(())
    }

    /// Replaces the [`Permissions`] of the miniblock starting exactly at `address`.
    ///
    /// # Errors
    ///
    /// - [`ArenaError::Uninitialized`]: the [`Arena`] is not open.
    /// - [`ArenaError::AddressNotFound`]: no miniblock starts at `address`.
    pub fn protect(&mut self, address: u64, permissions: Permissions) -> Result<(), ArenaError> {
        self.space_mut()?.protect(address, permissions)?;

        log::debug!("protected miniblock at 0x{address:X} as {permissions}");
        Ok(())
    }

    /// Reads `size` bytes starting at `address`.
    ///
    /// The read may begin in the middle of a miniblock and continue through the following
    /// miniblocks of the same block. A read extending past the end of its block is clamped and
    /// reports a [`Truncation`][t].
    ///
    /// # Errors
    ///
    /// - [`ArenaError::Uninitialized`]: the [`Arena`] is not open.
    /// - [`ArenaError::AddressNotFound`]: no block contains `address`.
    /// - [`ArenaError::PermissionDenied`]: a covered miniblock is not readable.
    /// - [`ArenaError::UninitializedRead`]: a covered miniblock has never been written.
    /// - [`ArenaError::BufferAllocation`]: the output buffer cannot be allocated.
    ///
    /// [t]: crate::Truncation
    pub fn read(&self, address: u64, size: u64) -> Result<ReadOutcome, ArenaError> {
        let outcome = self.space()?.read(address, size)?;

        log::debug!("read {} bytes at 0x{address:X}", outcome.data.len());
        Ok(outcome)
    }

    /// Writes `payload` into `size` bytes starting at `address`.
    ///
    /// Every miniblock covered by the write receives a fresh zero-filled buffer, discarding
    /// whatever it held before, and the corresponding bytes of `payload` are copied in at their
    /// addresses. Bytes of `payload` beyond `size` are ignored. A write extending past the end of
    /// its block is clamped and reports a [`Truncation`][t].
    ///
    /// # Errors
    ///
    /// - [`ArenaError::Uninitialized`]: the [`Arena`] is not open.
    /// - [`ArenaError::AddressNotFound`]: no block contains `address`.
    /// - [`ArenaError::PermissionDenied`]: a covered miniblock is not writable.
    /// - [`ArenaError::BufferAllocation`]: a miniblock buffer cannot be allocated.
    ///
    /// [t]: crate::Truncation
    pub fn write(
        &mut self,
        address: u64,
        size: u64,
        payload: &[u8],
    ) -> Result<WriteOutcome, ArenaError> {
        let outcome = self.space_mut()?.write(address, size, payload)?;

        log::debug!("wrote {} bytes at 0x{address:X}", outcome.written);
        Ok(outcome)
    }

    /// Describes every mapped block and miniblock.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::Uninitialized`] if the [`Arena`] is not open.
    pub fn report(&self) -> Result<Report, ArenaError> {
        self.space().map(AddressSpace::report)
    }

    /// Returns the [`AddressSpace`] of an open [`Arena`].
    fn space(&self) -> Result<&AddressSpace, ArenaError> {
        self.space.as_ref().ok_or(ArenaError::Uninitialized)
    }

    /// Returns the [`AddressSpace`] of an open [`Arena`] mutably.
    fn space_mut(&mut self) -> Result<&mut AddressSpace, ArenaError> {
        self.space.as_mut().ok_or(ArenaError::Uninitialized)
    }
}

/// What [`Arena::close`] released.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Released {
    /// The number of blocks that were mapped.
    pub blocks: usize,
    /// The number of miniblocks that were mapped.
    pub miniblocks: usize,
    /// The number of bytes held in miniblock buffers.
    pub buffered_bytes: u64,
}

impl fmt::Display for Released {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} blocks, {} miniblocks, {} buffered bytes",
            self.blocks, self.miniblocks, self.buffered_bytes
        )
    }
}

#[cfg(test)]
mod test {
    use alloc::{string::ToString, vec::Vec};

    use super::Arena;
    use crate::{Access, AddressRange, ArenaError, Bound, Operation, Permissions, Truncation};

    fn open(capacity: u64) -> Arena {
        let mut arena = Arena::new();
        arena.open(capacity).unwrap();
        arena
    }

    fn range(start: u64, size: u64) -> AddressRange {
        AddressRange::new(start, size).unwrap()
    }

    /// Returns every block as its range plus the start addresses of its miniblocks.
    fn layout(arena: &Arena) -> Vec<(AddressRange, Vec<u64>)> {
        arena
            .blocks()
            .unwrap()
            .iter()
            .map(|block| {
                let starts = block
                    .miniblocks()
                    .iter()
                    .map(|miniblock| miniblock.start())
                    .collect();
                (block.range(), starts)
            })
            .collect()
    }

    /// Checks tiling within every block and separation between consecutive blocks.
    fn assert_invariants(arena: &Arena) {
        let blocks = arena.blocks().unwrap();
        for block in blocks {
            let miniblocks = block.miniblocks();
            assert!(!miniblocks.is_empty());
            assert_eq!(miniblocks.first().unwrap().start(), block.start());

            let mut expected = block.start();
            for miniblock in miniblocks {
                assert_eq!(miniblock.start(), expected);
                expected += miniblock.size();
            }
            assert_eq!(expected, block.range().end_exclusive());
        }

        let blocks: Vec<_> = blocks.iter().collect();
        for pair in blocks.windows(2) {
            assert!(pair[0].range().end_inclusive() + 1 < pair[1].start());
        }
    }

    #[test]
    fn closed_arena_rejects_every_operation() {
        let mut arena = Arena::new();

        assert!(!arena.is_open());
        assert_eq!(arena.allocate(0, 1), Err(ArenaError::Uninitialized));
        assert_eq!(arena.deallocate(0), Err(ArenaError::Uninitialized));
        assert_eq!(
            arena.protect(0, Permissions::READ),
            Err(ArenaError::Uninitialized)
        );
        assert_eq!(arena.read(0, 1), Err(ArenaError::Uninitialized));
        assert_eq!(arena.write(0, 1, b"a"), Err(ArenaError::Uninitialized));
        assert_eq!(arena.report(), Err(ArenaError::Uninitialized));
        assert_eq!(arena.close(), Err(ArenaError::Uninitialized));
    }

    #[test]
    fn close_releases_everything_and_disables_arena() {
        let mut arena = open(100);
        arena.allocate(0, 10).unwrap();
        arena.allocate(10, 10).unwrap();
        arena.allocate(50, 5).unwrap();
        arena.write(0, 4, b"data").unwrap();

        let released = arena.close().unwrap();
        assert_eq!(released.blocks, 2);
        assert_eq!(released.miniblocks, 3);
        assert_eq!(released.buffered_bytes, 10);

        assert_eq!(arena.capacity(), None);
        assert_eq!(arena.read(0, 4), Err(ArenaError::Uninitialized));
        assert_eq!(arena.close(), Err(ArenaError::Uninitialized));
    }

    #[test]
    fn reopening_requires_close() {
        let mut arena = open(100);
        assert_eq!(arena.open(200), Err(ArenaError::AlreadyOpen));
        assert_eq!(arena.capacity(), Some(100));

        arena.close().unwrap();
        arena.open(200).unwrap();
        assert_eq!(arena.capacity(), Some(200));
    }

    #[test]
    fn allocation_bounds() {
        let mut arena = open(100);

        assert_eq!(
            arena.allocate(100, 1),
            Err(ArenaError::OutOfBounds(Bound::Start))
        );
        assert_eq!(
            arena.allocate(95, 6),
            Err(ArenaError::OutOfBounds(Bound::End))
        );
        assert_eq!(
            arena.allocate(1, u64::MAX),
            Err(ArenaError::OutOfBounds(Bound::End))
        );
        assert_eq!(arena.allocate(5, 0), Err(ArenaError::EmptyRange));

        arena.allocate(95, 5).unwrap();
        assert_eq!(layout(&arena), [(range(95, 5), [95].to_vec())]);
    }

    #[test]
    fn overlapping_allocation_leaves_arena_untouched() {
        let mut arena = open(100);
        arena.allocate(10, 10).unwrap();
        arena.allocate(40, 10).unwrap();
        let before = arena.clone();

        assert_eq!(arena.allocate(15, 2), Err(ArenaError::Overlap));
        assert_eq!(arena.allocate(5, 6), Err(ArenaError::Overlap));
        assert_eq!(arena.allocate(19, 30), Err(ArenaError::Overlap));
        assert_eq!(arena.allocate(0, 100), Err(ArenaError::Overlap));
        assert_eq!(arena, before);
    }

    #[test]
    fn allocation_keeps_blocks_sorted() {
        let mut arena = open(1000);
        arena.allocate(500, 10).unwrap();
        arena.allocate(100, 10).unwrap();
        arena.allocate(900, 10).unwrap();
        arena.allocate(300, 10).unwrap();

        let starts: Vec<_> = arena
            .blocks()
            .unwrap()
            .iter()
            .map(|block| block.start())
            .collect();
        assert_eq!(starts, [100, 300, 500, 900]);
        assert_invariants(&arena);
    }

    #[test]
    fn allocation_merges_with_first_and_last_blocks() {
        let mut arena = open(100);
        arena.allocate(20, 10).unwrap();

        arena.allocate(10, 10).unwrap();
        assert_eq!(layout(&arena), [(range(10, 20), [10, 20].to_vec())]);

        arena.allocate(30, 5).unwrap();
        assert_eq!(layout(&arena), [(range(10, 25), [10, 20, 30].to_vec())]);
        assert_invariants(&arena);
    }

    #[test]
    fn allocation_between_blocks_merges_with_one_neighbour() {
        let mut arena = open(100);
        arena.allocate(0, 10).unwrap();
        arena.allocate(50, 10).unwrap();

        arena.allocate(10, 5).unwrap();
        arena.allocate(45, 5).unwrap();
        assert_eq!(
            layout(&arena),
            [
                (range(0, 15), [0, 10].to_vec()),
                (range(45, 15), [45, 50].to_vec())
            ]
        );

        arena.allocate(20, 5).unwrap();
        assert_eq!(arena.blocks().unwrap().len(), 3);
        assert_invariants(&arena);
    }

    #[test]
    fn allocation_bridging_two_blocks_coalesces_three() {
        let mut arena = open(100);
        arena.allocate(0, 10).unwrap();
        arena.allocate(20, 10).unwrap();
        arena.allocate(10, 10).unwrap();

        assert_eq!(layout(&arena), [(range(0, 30), [0, 10, 20].to_vec())]);
        assert_invariants(&arena);
    }

    #[test]
    fn allocate_then_free_restores_empty_arena() {
        let mut arena = open(100);
        arena.allocate(40, 20).unwrap();
        arena.deallocate(40).unwrap();

        assert!(arena.blocks().unwrap().is_empty());
        assert_eq!(arena.report().unwrap().free_bytes(), 100);
    }

    #[test]
    fn free_requires_exact_miniblock_start() {
        let mut arena = open(100);
        arena.allocate(0, 30).unwrap();
        let before = arena.clone();

        assert_eq!(
            arena.deallocate(10),
            Err(ArenaError::AddressNotFound(Operation::Free))
        );
        assert_eq!(
            arena.deallocate(30),
            Err(ArenaError::AddressNotFound(Operation::Free))
        );
        assert_eq!(arena, before);
    }

    #[test]
    fn free_of_interior_miniblock_splits_block() {
        let mut arena = open(100);
        arena.allocate(0, 10).unwrap();
        arena.allocate(20, 10).unwrap();
        arena.allocate(10, 10).unwrap();

        arena.deallocate(10).unwrap();
        assert_eq!(
            layout(&arena),
            [(range(0, 10), [0].to_vec()), (range(20, 10), [20].to_vec())]
        );
        assert_invariants(&arena);
    }

    #[test]
    fn split_block_is_placed_before_later_blocks() {
        let mut arena = open(100);
        for start in [0, 5, 10, 15] {
            arena.allocate(start, 5).unwrap();
        }
        arena.allocate(60, 5).unwrap();

        arena.deallocate(5).unwrap();
        assert_eq!(
            layout(&arena),
            [
                (range(0, 5), [0].to_vec()),
                (range(10, 10), [10, 15].to_vec()),
                (range(60, 5), [60].to_vec())
            ]
        );
        assert_invariants(&arena);
    }

    #[test]
    fn free_of_boundary_miniblocks_shrinks_block() {
        let mut arena = open(100);
        for start in [0, 10, 20] {
            arena.allocate(start, 10).unwrap();
        }

        arena.deallocate(0).unwrap();
        assert_eq!(layout(&arena), [(range(10, 20), [10, 20].to_vec())]);

        arena.deallocate(20).unwrap();
        assert_eq!(layout(&arena), [(range(10, 10), [10].to_vec())]);

        arena.deallocate(10).unwrap();
        assert!(arena.blocks().unwrap().is_empty());
    }

    #[test]
    fn allocation_refills_split_gap() {
        let mut arena = open(100);
        for start in [0, 10, 20] {
            arena.allocate(start, 10).unwrap();
        }
        arena.deallocate(10).unwrap();
        arena.allocate(10, 10).unwrap();

        assert_eq!(layout(&arena), [(range(0, 30), [0, 10, 20].to_vec())]);
        assert_invariants(&arena);
    }

    #[test]
    fn protect_requires_exact_miniblock_start() {
        let mut arena = open(100);
        arena.allocate(0, 10).unwrap();

        assert_eq!(
            arena.protect(5, Permissions::READ),
            Err(ArenaError::AddressNotFound(Operation::Protect))
        );
        arena.protect(0, Permissions::READ | Permissions::EXEC).unwrap();

        let block = arena.find_block(3).unwrap().unwrap();
        let miniblock = block.miniblocks().first().unwrap();
        assert_eq!(miniblock.permissions().to_string(), "R-X");
    }

    #[test]
    fn read_only_miniblock_rejects_write_and_keeps_buffer() {
        let mut arena = open(100);
        arena.allocate(0, 8).unwrap();
        arena.write(0, 8, b"original").unwrap();
        arena.protect(0, Permissions::parse("PROT_READ")).unwrap();

        assert_eq!(
            arena.write(0, 8, b"replaced"),
            Err(ArenaError::PermissionDenied(Operation::Write))
        );
        assert_eq!(arena.read(0, 8).unwrap().data, b"original");
    }

    #[test]
    fn write_only_miniblock_rejects_read() {
        let mut arena = open(100);
        arena.allocate(0, 8).unwrap();
        arena.write(0, 8, b"abcdefgh").unwrap();
        arena.protect(0, Permissions::WRITE).unwrap();

        assert_eq!(
            arena.read(0, 1),
            Err(ArenaError::PermissionDenied(Operation::Read))
        );
    }

    #[test]
    fn permission_check_spans_following_miniblocks() {
        let mut arena = open(100);
        arena.allocate(0, 4).unwrap();
        arena.allocate(4, 4).unwrap();
        arena.protect(4, Permissions::READ).unwrap();

        assert_eq!(
            arena.write(2, 4, b"abcd"),
            Err(ArenaError::PermissionDenied(Operation::Write))
        );
        assert!(arena.write(0, 4, b"abcd").is_ok());
    }

    #[test]
    fn access_outside_blocks_is_not_found() {
        let mut arena = open(100);
        arena.allocate(10, 10).unwrap();

        assert_eq!(
            arena.read(20, 1),
            Err(ArenaError::AddressNotFound(Operation::Read))
        );
        assert_eq!(
            arena.write(9, 1, b"x"),
            Err(ArenaError::AddressNotFound(Operation::Write))
        );
    }

    #[test]
    fn read_before_write_is_an_error() {
        let mut arena = open(100);
        arena.allocate(0, 10).unwrap();

        assert_eq!(
            arena.read(0, 5),
            Err(ArenaError::UninitializedRead { address: 0 })
        );
    }

    #[test]
    fn write_and_read_across_miniblocks_from_the_middle() {
        let mut arena = open(100);
        arena.allocate(0, 5).unwrap();
        arena.allocate(5, 5).unwrap();
        arena.allocate(10, 5).unwrap();

        let outcome = arena.write(3, 9, b"123456789").unwrap();
        assert_eq!(outcome.written, 9);
        assert_eq!(outcome.truncation, None);

        assert_eq!(arena.read(3, 9).unwrap().data, b"123456789");
        assert_eq!(arena.read(5, 5).unwrap().data, b"34567");
        assert_eq!(arena.read(0, 3).unwrap().data, b"\0\0\0");
    }

    #[test]
    fn partial_write_discards_previous_miniblock_contents() {
        let mut arena = open(100);
        arena.allocate(0, 6).unwrap();
        arena.write(0, 6, b"abcdef").unwrap();

        arena.write(2, 2, b"XY").unwrap();
        assert_eq!(arena.read(0, 6).unwrap().data, b"\0\0XY\0\0");
    }

    #[test]
    fn short_payload_is_zero_filled() {
        let mut arena = open(100);
        arena.allocate(0, 6).unwrap();

        let outcome = arena.write(0, 6, b"ab").unwrap();
        assert_eq!(outcome.written, 2);
        assert_eq!(arena.read(0, 6).unwrap().data, b"ab\0\0\0\0");
    }

    #[test]
    fn long_payload_is_cut_at_size() {
        let mut arena = open(100);
        arena.allocate(0, 6).unwrap();
        arena.allocate(6, 6).unwrap();

        let outcome = arena.write(0, 3, b"abcdefghijkl").unwrap();
        assert_eq!(outcome.written, 3);
        assert_eq!(arena.read(0, 6).unwrap().data, b"abc\0\0\0");
        assert_eq!(
            arena.read(6, 1),
            Err(ArenaError::UninitializedRead { address: 6 })
        );
    }

    #[test]
    fn accesses_past_block_end_are_truncated() {
        let mut arena = open(100);
        arena.allocate(0, 4).unwrap();
        arena.allocate(10, 4).unwrap();

        let outcome = arena.write(2, 10, b"abcdefghij").unwrap();
        assert_eq!(outcome.written, 2);
        assert_eq!(
            outcome.truncation,
            Some(Truncation {
                access: Access::Write,
                requested: 10,
                available: 2,
            })
        );

        let outcome = arena.read(0, 100).unwrap();
        assert_eq!(outcome.data, b"\0\0ab");
        assert_eq!(outcome.truncation.unwrap().available, 4);
    }

    #[test]
    fn report_counts_blocks_and_miniblocks() {
        let mut arena = open(100);
        arena.allocate(0, 10).unwrap();
        arena.allocate(10, 10).unwrap();

        assert_eq!(arena.block_count(), Ok(1));
        assert_eq!(arena.miniblock_count(), Ok(2));
        assert_eq!(arena.free_bytes(), Ok(80));

        let report = arena.report().unwrap();
        assert_eq!(report.capacity, 100);
        assert_eq!(report.free_bytes(), 80);
        assert_eq!(report.block_count(), 1);
        assert_eq!(report.miniblock_count(), 2);
        assert_eq!(report.blocks[0].range, range(0, 20));
    }

    #[test]
    fn report_renders_fixed_layout() {
        let mut arena = open(0x100);
        arena.allocate(0x10, 0x10).unwrap();
        arena.allocate(0x20, 0x8).unwrap();
        arena.protect(0x20, Permissions::parse("PROT_READ | PROT_EXEC")).unwrap();
        arena.allocate(0x80, 0x4).unwrap();

        let expected = "Total memory: 0x100 bytes\n\
                        Free memory: 0xE4 bytes\n\
                        Number of allocated blocks: 2\n\
                        Number of allocated miniblocks: 3\n\
                        \n\
                        Block 1 begin\n\
                        Zone: 0x10 - 0x28\n\
                        Miniblock 1:\t\t0x10\t\t-\t\t0x20\t\t| RW-\n\
                        Miniblock 2:\t\t0x20\t\t-\t\t0x28\t\t| R-X\n\
                        Block 1 end\n\
                        \n\
                        Block 2 begin\n\
                        Zone: 0x80 - 0x84\n\
                        Miniblock 1:\t\t0x80\t\t-\t\t0x84\t\t| RW-\n\
                        Block 2 end\n";
        assert_eq!(arena.report().unwrap().to_string(), expected);
    }

    #[test]
    fn mixed_workload_preserves_invariants() {
        let mut arena = open(256);
        let allocations = [(40, 8), (0, 8), (8, 8), (64, 16), (48, 16), (16, 8), (100, 4)];
        for (address, size) in allocations {
            arena.allocate(address, size).unwrap();
            assert_invariants(&arena);
        }

        for address in [8, 48, 100, 0, 64] {
            arena.deallocate(address).unwrap();
            assert_invariants(&arena);
        }

        let mapped: u64 = arena
            .blocks()
            .unwrap()
            .iter()
            .map(|block| block.size())
            .sum();
        assert_eq!(mapped, 16);
    }
}
