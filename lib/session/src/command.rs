//! Parsing of a single protocol line into a [`Command`].

use core::{error, fmt};

use arena::Permissions;

/// A request read from the command stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// `ALLOC_ARENA size`: opens the arena with `size` addressable bytes.
    AllocArena {
        /// The capacity of the arena.
        size: u64,
    },
    /// `DEALLOC_ARENA`: closes the arena and ends the session.
    DeallocArena,
    /// `ALLOC_BLOCK address size`: maps `size` bytes starting at `address`.
    AllocBlock {
        /// The first address of the new range.
        address: u64,
        /// The number of bytes to map.
        size: u64,
    },
    /// `FREE_BLOCK address`: unmaps the miniblock starting at `address`.
    FreeBlock {
        /// The start address of the miniblock.
        address: u64,
    },
    /// `READ address size`: prints `size` bytes starting at `address`.
    Read {
        /// The first address to read.
        address: u64,
        /// The number of bytes to read.
        size: u64,
    },
    /// `WRITE address size data...`: stores `data` starting at `address`.
    Write {
        /// The first address to write.
        address: u64,
        /// The number of bytes to write.
        size: u64,
        /// The payload found on the command line itself.
        ///
        /// This may be shorter than `size`, in which case the remainder of the payload follows on
        /// the next lines of the input.
        data: Vec<u8>,
    },
    /// `PMAP`: prints the layout of the arena.
    Pmap,
    /// `MPROTECT address permissions...`: replaces the permissions of the miniblock starting at
    /// `address`.
    Mprotect {
        /// The start address of the miniblock.
        address: u64,
        /// The new permissions.
        permissions: Permissions,
    },
}

impl Command {
    /// Parses `line`, which must not include its line terminator.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedCommand`] if the verb is unknown, the number of arguments does not match
    /// the verb, or a numeric argument is not an unsigned decimal number.
    pub fn parse(line: &[u8]) -> Result<Self, MalformedCommand> {
        let count = Tokens::new(line).count();
        let malformed = MalformedCommand { tokens: count };

        let mut tokens = Tokens::new(line);
        let verb = tokens.next().ok_or(malformed)?;
        let mut number = || parse_number(tokens.next()).ok_or(malformed);

        let command = match verb {
            b"ALLOC_ARENA" if count == 2 => Self::AllocArena { size: number()? },
            b"DEALLOC_ARENA" if count == 1 => Self::DeallocArena,
            b"ALLOC_BLOCK" if count == 3 => {
                let address = number()?;
                Self::AllocBlock {
                    address,
                    size: number()?,
                }
            }
            b"FREE_BLOCK" if count == 2 => Self::FreeBlock { address: number()? },
            b"READ" if count == 3 => {
                let address = number()?;
                Self::Read {
                    address,
                    size: number()?,
                }
            }
            b"WRITE" if count >= 3 => {
                let address = number()?;
                let size = number()?;
                Self::Write {
                    address,
                    size,
                    data: tokens.remainder().to_vec(),
                }
            }
            b"PMAP" if count == 1 => Self::Pmap,
            b"MPROTECT" if count >= 3 => {
                let address = number()?;
                let spec = String::from_utf8_lossy(tokens.remainder());
                Self::Mprotect {
                    address,
                    permissions: Permissions::parse(&spec),
                }
            }
            _ => return Err(malformed),
        };

        Ok(command)
    }
}

/// Parses an unsigned decimal number.
fn parse_number(token: Option<&[u8]>) -> Option<u64> {
    core::str::from_utf8(token?).ok()?.parse().ok()
}

/// The input line is not a valid [`Command`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MalformedCommand {
    /// The number of tokens on the offending line.
    ///
    /// One diagnostic is reported per token.
    pub tokens: usize,
}

impl fmt::Display for MalformedCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Invalid command. Please try again.")
    }
}

impl error::Error for MalformedCommand {}

/// Splits a line into whitespace-separated tokens while keeping track of the unconsumed remainder.
struct Tokens<'a> {
    /// The part of the line following the last token produced.
    rest: &'a [u8],
}

impl<'a> Tokens<'a> {
    /// Creates a [`Tokens`] over `line`.
    const fn new(line: &'a [u8]) -> Self {
        Self { rest: line }
    }

    /// Returns everything after the last token produced, minus the single separator that ended
    /// it.
    fn remainder(&self) -> &'a [u8] {
        self.rest.split_first().map_or(self.rest, |(_, tail)| tail)
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        let Some(start) = self.rest.iter().position(|byte| !byte.is_ascii_whitespace()) else {
            self.rest = &[];
            return None;
        };

        let (_, rest) = self.rest.split_at(start);
        let end = rest
            .iter()
            .position(u8::is_ascii_whitespace)
            .unwrap_or(rest.len());
        let (token, rest) = rest.split_at(end);
        self.rest = rest;

        Some(token)
    }
}
