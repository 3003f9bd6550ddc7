//! Const-friendly conversions between the `u64` address domain and the `usize` buffer domain.
#![no_std]

/// Converts `value` to a `u64` relying on compile time code checking.
#[cfg(any(
    target_pointer_width = "16",
    target_pointer_width = "32",
    target_pointer_width = "64"
))]
pub const fn usize_to_u64(value: usize) -> u64 {
    value as u64
}

/// Converts `value` to a `usize`.
///
/// Returns `None` if `value` cannot fit within a `usize`, which only happens on targets whose
/// pointers are narrower than 64 bits.
#[expect(clippy::cast_possible_truncation)]
pub const fn u64_to_usize_checked(value: u64) -> Option<usize> {
    if value > usize_to_u64(usize::MAX) {
        return None;
    }

    Some(value as usize)
}

/// Returns the number of bytes between `base` and `address` as a buffer offset.
///
/// Returns `None` if `address` is below `base` or the distance does not fit within a `usize`.
pub const fn offset_from(base: u64, address: u64) -> Option<usize> {
    match address.checked_sub(base) {
        Some(distance) => u64_to_usize_checked(distance),
        None => None,
    }
}
