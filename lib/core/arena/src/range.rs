//! Byte ranges within the simulated address space.

use core::fmt;

/// A non-empty, contiguous range of addresses.
///
/// The exclusive end of every [`AddressRange`] is representable as a `u64`.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct AddressRange {
    /// The inclusive start of the range.
    start: u64,
    /// The number of bytes in the range.
    size: u64,
}

impl AddressRange {
    /// Creates a new [`AddressRange`] with a base of `start` that contains `size` bytes.
    ///
    /// Returns `None` if `size` is zero or if the exclusive end of the range would not fit within a
    /// `u64`.
    pub const fn new(start: u64, size: u64) -> Option<Self> {
        if size == 0 || start.checked_add(size).is_none() {
            return None;
        }

        Some(Self { start, size })
    }

    /// Creates a new [`AddressRange`] between `start` and the inclusive `end`.
    ///
    /// Returns `None` if `end < start` or if `end == u64::MAX`.
    pub const fn from_inclusive(start: u64, end: u64) -> Option<Self> {
        if end < start {
            return None;
        }

        match (end - start).checked_add(1) {
            Some(size) => Self::new(start, size),
            None => None,
        }
    }

    /// Returns the address at the start of this range.
    pub const fn start(self) -> u64 {
        self.start
    }

    /// Returns the number of bytes in this range.
    pub const fn size(self) -> u64 {
        self.size
    }

    /// Returns the address at the inclusive end of this range.
    pub const fn end_inclusive(self) -> u64 {
        self.start + (self.size - 1)
    }

    /// Returns the address at the exclusive end of this range.
    pub const fn end_exclusive(self) -> u64 {
        self.start + self.size
    }

    /// Returns `true` if `address` is contained within this range.
    pub const fn contains(self, address: u64) -> bool {
        self.start <= address && address - self.start < self.size
    }

    /// Returns `true` if `self` and `other` share at least one byte.
    pub const fn overlaps(self, other: Self) -> bool {
        self.start <= other.end_inclusive() && other.start <= self.end_inclusive()
    }

    /// Returns `true` if `self` ends exactly where `other` begins or `other` ends exactly where
    /// `self` begins.
    ///
    /// Overlapping ranges do not touch.
    pub const fn touches(self, other: Self) -> bool {
        self.end_exclusive() == other.start || other.end_exclusive() == self.start
    }

    /// Returns the merged range if the two ranges touch or overlap.
    ///
    /// Otherwise, `None` is returned.
    pub const fn merge(self, other: Self) -> Option<Self> {
        if !self.overlaps(other) && !self.touches(other) {
            return None;
        }

        let start = if self.start <= other.start {
            self.start
        } else {
            other.start
        };
        let end = if self.end_exclusive() >= other.end_exclusive() {
            self.end_exclusive()
        } else {
            other.end_exclusive()
        };

        Some(Self {
            start,
            size: end - start,
        })
    }

    /// Splits this range into two seperate ranges.
    ///
    /// - [start : at)
    /// - [at : end)
    ///
    /// Returns `None` if `at` is not strictly inside the range, since neither half may be empty.
    pub const fn split_at(self, at: u64) -> Option<(Self, Self)> {
        if at <= self.start || at >= self.end_exclusive() {
            return None;
        }

        let lower = Self {
            start: self.start,
            size: at - self.start,
        };
        let upper = Self {
            start: at,
            size: self.end_exclusive() - at,
        };
        Some((lower, upper))
    }

    /// Returns the number of bytes from `address` up to the exclusive end of this range.
    ///
    /// Returns `None` if `address` is not contained within this range.
    pub const fn remaining_from(self, address: u64) -> Option<u64> {
        if !self.contains(address) {
            return None;
        }

        Some(self.end_exclusive() - address)
    }
}

impl fmt::Display for AddressRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:X} - 0x{:X}", self.start, self.end_exclusive())
    }
}

#[cfg(test)]
mod test {
    use super::AddressRange;

    #[test]
    fn construction_rejects_empty_and_overflowing_ranges() {
        assert!(AddressRange::new(0, 0).is_none());
        assert!(AddressRange::new(u64::MAX, 1).is_none());
        assert!(AddressRange::new(u64::MAX - 1, 1).is_some());
        assert!(AddressRange::from_inclusive(10, 9).is_none());
        assert_eq!(
            AddressRange::from_inclusive(10, 19),
            AddressRange::new(10, 10)
        );
    }

    #[test]
    fn bounds_and_containment() {
        let range = AddressRange::new(0x1000, 0x10).unwrap();

        assert_eq!(range.end_inclusive(), 0x100F);
        assert_eq!(range.end_exclusive(), 0x1010);
        assert!(range.contains(0x1000));
        assert!(range.contains(0x100F));
        assert!(!range.contains(0x0FFF));
        assert!(!range.contains(0x1010));
        assert_eq!(range.remaining_from(0x100C), Some(4));
        assert_eq!(range.remaining_from(0x1010), None);
    }

    #[test]
    fn touching_is_not_overlapping() {
        let lower = AddressRange::new(0, 10).unwrap();
        let upper = AddressRange::new(10, 10).unwrap();
        let apart = AddressRange::new(21, 4).unwrap();
        let inside = AddressRange::new(5, 2).unwrap();

        assert!(lower.touches(upper));
        assert!(upper.touches(lower));
        assert!(!lower.overlaps(upper));
        assert!(!upper.touches(apart));
        assert!(lower.overlaps(inside));
        assert!(!lower.touches(inside));
    }

    #[test]
    fn merge_requires_contact() {
        let lower = AddressRange::new(0, 10).unwrap();
        let upper = AddressRange::new(10, 10).unwrap();
        let apart = AddressRange::new(30, 10).unwrap();

        assert_eq!(lower.merge(upper), AddressRange::new(0, 20));
        assert_eq!(upper.merge(lower), AddressRange::new(0, 20));
        assert_eq!(lower.merge(apart), None);
    }

    #[test]
    fn split_keeps_both_halves_non_empty() {
        let range = AddressRange::new(0, 30).unwrap();

        assert_eq!(
            range.split_at(10),
            Some((
                AddressRange::new(0, 10).unwrap(),
                AddressRange::new(10, 20).unwrap()
            ))
        );
        assert_eq!(range.split_at(0), None);
        assert_eq!(range.split_at(30), None);
    }

    #[test]
    fn display_uses_exclusive_end() {
        let range = AddressRange::new(0x10, 0x20).unwrap();
        assert_eq!(alloc::format!("{range}"), "0x10 - 0x30");
    }
}
