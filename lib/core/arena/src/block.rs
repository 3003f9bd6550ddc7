//! Maximal contiguous mapped ranges and the miniblocks tiling them.

use alloc::vec::Vec;

use conversion::{offset_from, u64_to_usize_checked, usize_to_u64};
use sequence::OrderedSequence;

use crate::{
    AddressRange, ArenaError, Miniblock,
    access::{Access, Segment, Span, Truncation},
};

/// A contiguous mapped range of the [`Arena`][a].
///
/// The [`Miniblock`]s of a [`Block`] are never empty, are ordered by address, and exactly tile the
/// range of the [`Block`] without gaps.
///
/// [a]: crate::Arena
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    /// The addresses covered by this [`Block`].
    range: AddressRange,
    /// The [`Miniblock`]s tiling [`Block::range`].
    miniblocks: OrderedSequence<Miniblock>,
}

impl Block {
    /// Creates a [`Block`] covered by a single fresh [`Miniblock`].
    pub(crate) fn new(range: AddressRange) -> Self {
        Self {
            range,
            miniblocks: OrderedSequence::single(Miniblock::new(range)),
        }
    }

    /// Returns the addresses covered by this [`Block`].
    pub const fn range(&self) -> AddressRange {
        self.range
    }

    /// Returns the address at the start of this [`Block`].
    pub const fn start(&self) -> u64 {
        self.range.start()
    }

    /// Returns the number of bytes in this [`Block`].
    pub const fn size(&self) -> u64 {
        self.range.size()
    }

    /// Returns the [`Miniblock`]s of this [`Block`] in address order.
    pub const fn miniblocks(&self) -> &OrderedSequence<Miniblock> {
        &self.miniblocks
    }

    /// Returns `true` if `address` lies within this [`Block`].
    pub const fn contains(&self, address: u64) -> bool {
        self.range.contains(address)
    }

    /// Returns the index of the [`Miniblock`] starting exactly at `address`.
    pub fn miniblock_starting_at(&self, address: u64) -> Option<usize> {
        self.miniblocks
            .position(|miniblock| miniblock.start() == address)
    }

    /// Returns the index of the [`Miniblock`] whose range contains `address`.
    pub fn miniblock_containing(&self, address: u64) -> Option<usize> {
        self.miniblocks
            .position(|miniblock| miniblock.range().contains(address))
    }

    /// Returns the [`Miniblock`] at `index` mutably.
    pub(crate) fn miniblock_mut(&mut self, index: usize) -> Option<&mut Miniblock> {
        self.miniblocks.get_mut(index)
    }

    /// Moves every [`Miniblock`] of `other`, which must begin where `self` ends, onto the end of
    /// `self`.
    pub(crate) fn absorb_after(&mut self, other: Block) {
        debug_assert_eq!(self.range.end_exclusive(), other.start());

        self.range = self
            .range
            .merge(other.range)
            .expect("absorbed block must touch its predecessor");
        self.miniblocks.append(other.miniblocks);
    }

    /// Moves every [`Miniblock`] of `other`, which must end where `self` begins, onto the front of
    /// `self`.
    pub(crate) fn absorb_before(&mut self, other: Block) {
        debug_assert_eq!(other.range.end_exclusive(), self.start());

        self.range = self
            .range
            .merge(other.range)
            .expect("absorbed block must touch its successor");
        self.miniblocks.prepend(other.miniblocks);
    }

    /// Removes the [`Miniblock`] at `index`, shrinking or splitting this [`Block`] as required.
    ///
    /// When the [`Miniblock`] is the only one left, nothing is removed and [`Removal::Emptied`] is
    /// returned so that the caller discards the whole [`Block`].
    pub(crate) fn remove_miniblock(&mut self, index: usize) -> Option<Removal> {
        let count = self.miniblocks.len();
        if index >= count {
            return None;
        }
        if count == 1 {
            return Some(Removal::Emptied);
        }

        let end = self.range.end_exclusive();
        if index == 0 {
            let removed = self.miniblocks.remove(index)?;
            self.range = AddressRange::from_inclusive(removed.range().end_exclusive(), end - 1)
                .expect("remaining miniblocks must cover a non-empty range");
            return Some(Removal::Shrunk(removed));
        }
        if index == count - 1 {
            let removed = self.miniblocks.remove(index)?;
            self.range = AddressRange::from_inclusive(self.start(), removed.start() - 1)
                .expect("remaining miniblocks must cover a non-empty range");
            return Some(Removal::Shrunk(removed));
        }

        let tail = self.miniblocks.split_off(index + 1)?;
        let removed = self.miniblocks.remove(index)?;
        self.range = AddressRange::from_inclusive(self.start(), removed.start() - 1)
            .expect("leading miniblocks must cover a non-empty range");

        let tail_start = tail.first().map(Miniblock::start)?;
        let tail = Block {
            range: AddressRange::from_inclusive(tail_start, end - 1)
                .expect("trailing miniblocks must cover a non-empty range"),
            miniblocks: tail,
        };
        Some(Removal::Split { removed, tail })
    }

    /// Validates an `access` of `requested` bytes starting at `address`.
    ///
    /// The access is clamped to the end of this [`Block`]. Every [`Miniblock`] covered by the
    /// clamped access must allow [`Access::required`].
    ///
    /// # Errors
    ///
    /// - [`ArenaError::AddressNotFound`]: `address` does not lie within this [`Block`].
    /// - [`ArenaError::PermissionDenied`]: a covered [`Miniblock`] does not allow the access.
    pub(crate) fn span(
        &self,
        address: u64,
        requested: u64,
        access: Access,
    ) -> Result<Span, ArenaError> {
        let operation = access.operation();
        let first = self
            .miniblock_containing(address)
            .ok_or(ArenaError::AddressNotFound(operation))?;
        let available = self
            .range
            .remaining_from(address)
            .ok_or(ArenaError::AddressNotFound(operation))?;

        let (size, truncation) = if requested > available {
            let truncation = Truncation {
                access,
                requested,
                available,
            };
            (available, Some(truncation))
        } else {
            (requested, None)
        };

        let span = Span {
            first,
            address,
            size,
            truncation,
        };
        for segment in self.segments(span) {
            let allowed = self
                .miniblocks
                .get(segment.index)
                .is_some_and(|miniblock| miniblock.permissions().contains(access.required()));
            if !allowed {
                return Err(ArenaError::PermissionDenied(operation));
            }
        }

        Ok(span)
    }

    /// Returns the per-[`Miniblock`] pieces of `span` in address order.
    pub(crate) fn segments(&self, span: Span) -> impl Iterator<Item = Segment> + '_ {
        let mut cursor = span.address;
        let mut remaining = span.size;

        self.miniblocks
            .iter()
            .enumerate()
            .skip(span.first)
            .map_while(move |(index, miniblock)| {
                if remaining == 0 {
                    return None;
                }

                let length = miniblock.range().remaining_from(cursor)?.min(remaining);
                let segment = Segment {
                    index,
                    address: cursor,
                    length,
                };
                cursor += length;
                remaining -= length;
                Some(segment)
            })
    }

    /// Copies the bytes covered by `span` out of this [`Block`].
    ///
    /// # Errors
    ///
    /// - [`ArenaError::UninitializedRead`]: a covered [`Miniblock`] has never been written.
    /// - [`ArenaError::BufferAllocation`]: the output buffer cannot be allocated.
    pub(crate) fn read(&self, span: Span) -> Result<Vec<u8>, ArenaError> {
        let total = u64_to_usize_checked(span.size)
            .ok_or(ArenaError::BufferAllocation { size: span.size })?;
        let mut data = Vec::new();
        data.try_reserve_exact(total)
            .map_err(|_| ArenaError::BufferAllocation { size: span.size })?;

        for segment in self.segments(span) {
            let Some(miniblock) = self.miniblocks.get(segment.index) else {
                break;
            };
            let uninitialized = ArenaError::UninitializedRead {
                address: miniblock.start(),
            };

            let buffer = miniblock.buffer().ok_or(uninitialized)?;
            let bytes = byte_window(miniblock, segment)
                .and_then(|(start, end)| buffer.get(start..end))
                .ok_or(uninitialized)?;
            data.extend_from_slice(bytes);
        }

        Ok(data)
    }

    /// Distributes `payload` over the [`Miniblock`]s covered by `span`.
    ///
    /// Every covered [`Miniblock`] receives a fresh zero-filled buffer, so bytes of a covered
    /// [`Miniblock`] outside of `span`, or beyond the end of `payload`, read back as zero. Returns
    /// the number of payload bytes copied.
    ///
    /// # Errors
    ///
    /// [`ArenaError::BufferAllocation`] is returned, without modifying any [`Miniblock`], if a
    /// buffer cannot be allocated.
    pub(crate) fn write(&mut self, span: Span, payload: &[u8]) -> Result<u64, ArenaError> {
        let mut staged = Vec::new();
        let mut payload = payload;
        let mut written = 0;

        for segment in self.segments(span) {
            let Some(miniblock) = self.miniblocks.get(segment.index) else {
                break;
            };
            let mut buffer = miniblock.fresh_buffer()?;

            let (start, end) = byte_window(miniblock, segment).ok_or(ArenaError::BufferAllocation {
                size: miniblock.size(),
            })?;
            let count = (end - start).min(payload.len());
            let (chunk, rest) = payload.split_at(count);
            buffer[start..start + count].copy_from_slice(chunk);
            payload = rest;
            written += usize_to_u64(count);

            staged.push((segment.index, buffer));
        }

        for (index, buffer) in staged {
            if let Some(miniblock) = self.miniblocks.get_mut(index) {
                miniblock.replace_buffer(buffer);
            }
        }

        Ok(written)
    }
}

/// Converts a [`Segment`] into a `start..end` window of `miniblock`'s buffer.
fn byte_window(miniblock: &Miniblock, segment: Segment) -> Option<(usize, usize)> {
    let start = offset_from(miniblock.start(), segment.address)?;
    let length = u64_to_usize_checked(segment.length)?;
    Some((start, start.checked_add(length)?))
}

/// The effect of [`Block::remove_miniblock`] on its [`Block`].
#[derive(Debug)]
pub(crate) enum Removal {
    /// The [`Block`] only held the requested [`Miniblock`] and must be discarded as a whole.
    Emptied,
    /// A boundary [`Miniblock`] was removed and the [`Block`] shrank.
    Shrunk(Miniblock),
    /// An interior [`Miniblock`] was removed; `tail` holds every [`Miniblock`] that followed it and
    /// must be placed directly after the [`Block`].
    Split {
        /// The [`Miniblock`] that was removed.
        removed: Miniblock,
        /// The new [`Block`] made of the trailing [`Miniblock`]s.
        tail: Block,
    },
}
