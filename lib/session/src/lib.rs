//! The line-oriented command protocol that drives an [`Arena`][a].
//!
//! Each input line holds one [`Command`]. [`Session::run`] parses the lines, gathers `WRITE`
//! payloads that continue onto later lines, executes every [`Command`], and writes results and
//! diagnostics to an output stream until `DEALLOC_ARENA` ends the session.
//!
//! [a]: arena::Arena

mod command;
mod payload;
mod session;

pub use command::{Command, MalformedCommand};
pub use session::{Flow, Session};
