//! Interactive driver for a simulated virtual address space.
//!
//! Commands are read one per line from stdin, or from the file named by `--input`, and their
//! results are printed to stdout.

use std::{
    fs::File,
    io::{self, BufReader, Write},
};

use anyhow::{Context, Result};
use session::Session;

pub mod cli;
pub mod logger;

fn main() -> Result<()> {
    let config = cli::get_config();
    logger::init(config.log_level).context("failed to install logger")?;
    log::debug!("starting with {config:?}");

    let mut session = Session::new();
    let mut stdout = io::stdout().lock();
    let flow = match &config.input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open \"{}\"", path.display()))?;
            session.run(BufReader::new(file), &mut stdout)
        }
        None => session.run(io::stdin().lock(), &mut stdout),
    }
    .context("failed to process commands")?;
    stdout.flush().context("failed to flush stdout")?;

    log::info!("session ended with {flow:?}");
    Ok(())
}
