//! Collection of `WRITE` payloads that continue past their command line.

use std::io::{self, BufRead, Read};

use conversion::{u64_to_usize_checked, usize_to_u64};

/// Completes `data`, the inline part of a `WRITE` payload, to exactly `size` bytes.
///
/// If the inline part is too short, the line terminator it was cut at becomes part of the payload
/// and raw bytes, newlines included, are taken from `input` until `size` bytes are present or
/// `input` is exhausted. An inline part longer than `size` is cut to `size`.
///
/// # Errors
///
/// Returns any error produced while reading from `input`.
pub(crate) fn collect<R: BufRead>(data: &mut Vec<u8>, size: u64, input: &mut R) -> io::Result<()> {
    if usize_to_u64(data.len()) < size {
        data.push(b'\n');

        let missing = size.saturating_sub(usize_to_u64(data.len()));
        let read = input.by_ref().take(missing).read_to_end(data)?;
        log::trace!("collected {read} continuation bytes of a {size} byte payload");
    }

    if let Some(size) = u64_to_usize_checked(size) {
        data.truncate(size);
    }

    Ok(())
}
