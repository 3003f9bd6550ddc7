//! Dispatch of [`Command`]s onto an [`Arena`] and rendering of their results.

use std::io::{self, BufRead, Write};

use arena::{Arena, ArenaError};

use crate::{Command, payload};

/// Whether the session should keep accepting [`Command`]s.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum Flow {
    /// More [`Command`]s may follow.
    Continue,
    /// `DEALLOC_ARENA` was processed and the session is over.
    Terminate,
}

/// A command-driven session over a single [`Arena`].
///
/// Diagnostics, warnings, and the results of `READ` and `PMAP` are all written to the same output
/// stream, each on its own line.
#[derive(Clone, Debug, Default)]
pub struct Session {
    /// The [`Arena`] every [`Command`] operates on.
    arena: Arena,
}

impl Session {
    /// Creates a [`Session`] whose [`Arena`] is not yet open.
    pub const fn new() -> Self {
        Self {
            arena: Arena::new(),
        }
    }

    /// Returns the [`Arena`] driven by this [`Session`].
    pub const fn arena(&self) -> &Arena {
        &self.arena
    }

    /// Reads and executes [`Command`]s from `input` until `DEALLOC_ARENA` is processed or `input`
    /// is exhausted.
    ///
    /// Blank lines are skipped. A malformed line produces one diagnostic per token and is
    /// otherwise ignored.
    ///
    /// # Errors
    ///
    /// Returns any error produced while reading from `input` or writing to `out`.
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, out: &mut W) -> io::Result<Flow> {
        let mut line = Vec::new();

        loop {
            line.clear();
            if input.read_until(b'\n', &mut line)? == 0 {
                log::debug!("input exhausted");
                return Ok(Flow::Continue);
            }

            let text = strip_terminator(&line);
            if text.iter().all(u8::is_ascii_whitespace) {
                continue;
            }

            let mut command = match Command::parse(text) {
                Ok(command) => command,
                Err(malformed) => {
                    log::debug!("rejecting {:?}", String::from_utf8_lossy(text));
                    for _ in 0..malformed.tokens {
                        writeln!(out, "{malformed}")?;
                    }
                    continue;
                }
            };
            if let Command::Write { size, data, .. } = &mut command {
                payload::collect(data, *size, &mut input)?;
            }

            if self.execute(command, out)? == Flow::Terminate {
                return Ok(Flow::Terminate);
            }
        }
    }

    /// Executes a single [`Command`], writing its output and any diagnostic to `out`.
    ///
    /// A failed operation leaves the [`Arena`] unchanged and does not end the session.
    ///
    /// # Errors
    ///
    /// Returns any error produced while writing to `out`.
    pub fn execute<W: Write>(&mut self, command: Command, out: &mut W) -> io::Result<Flow> {
        log::trace!("executing {command:?}");

        let flow = match command {
            Command::DeallocArena => Flow::Terminate,
            _ => Flow::Continue,
        };

        match self.dispatch(command, out) {
            Ok(()) => {}
            Err(Failure::Arena(error)) => {
                log::debug!("operation failed: {error:?}");
                writeln!(out, "{error}")?;
            }
            Err(Failure::Io(error)) => return Err(error),
        }

        Ok(flow)
    }

    /// Applies `command` to the [`Arena`].
    fn dispatch<W: Write>(&mut self, command: Command, out: &mut W) -> Result<(), Failure> {
        match command {
            Command::AllocArena { size } => self.arena.open(size)?,
            Command::DeallocArena => {
                let released = self.arena.close()?;
                log::info!("released {released}");
            }
            Command::AllocBlock { address, size } => self.arena.allocate(address, size)?,
            Command::FreeBlock { address } => self.arena.deallocate(address)?,
            Command::Read { address, size } => {
                let outcome = self.arena.read(address, size)?;
                if let Some(truncation) = outcome.truncation {
                    writeln!(out, "{truncation}")?;
                }
                out.write_all(&outcome.data)?;
                writeln!(out)?;
            }
            Command::Write {
                address,
                size,
                data,
            } => {
                let outcome = self.arena.write(address, size, &data)?;
                if let Some(truncation) = outcome.truncation {
                    writeln!(out, "{truncation}")?;
                }
            }
            Command::Pmap => {
                let report = self.arena.report()?;
                write!(out, "{report}")?;
            }
            Command::Mprotect {
                address,
                permissions,
            } => self.arena.protect(address, permissions)?,
        }

        Ok(())
    }
}

/// Removes a trailing `\n` or `\r\n` from `line`.
fn strip_terminator(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Why [`Session::dispatch`] did not complete.
enum Failure {
    /// The [`Arena`] rejected the operation.
    Arena(ArenaError),
    /// The output could not be written.
    Io(io::Error),
}

impl From<ArenaError> for Failure {
    fn from(error: ArenaError) -> Self {
        Self::Arena(error)
    }
}

impl From<io::Error> for Failure {
    fn from(error: io::Error) -> Self {
        Self::Io(error)
    }
}
