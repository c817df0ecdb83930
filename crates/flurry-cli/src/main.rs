#![doc = include_str!("../README.md")]

mod config;
mod output;
mod telemetry;

use std::io::{self, BufWriter, Write};

use anyhow::Context;
use clap::Parser;
use config::{CliArgs, Config};
use telemetry::init_tracing;

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = Config::try_from(args)?;

    init_tracing()?;
    log_startup_info(&config);

    let mut generator = config.build_generator()?;

    let mut out = BufWriter::new(io::stdout().lock());
    let written = match output::write_ids(&mut out, generator.iter(), &config)
        .and_then(|written| out.flush().map(|()| written))
    {
        Ok(written) => written,
        // The reader went away (`flurry --count 0 | head`); that is how a
        // stream is meant to end.
        Err(err) if err.kind() == io::ErrorKind::BrokenPipe => {
            tracing::debug!("stdout closed");
            return Ok(());
        }
        Err(err) => return Err(err).context("failed to write ids to stdout"),
    };

    tracing::debug!(written, last = ?generator.current_id(), "done");
    Ok(())
}

fn log_startup_info(config: &Config) {
    if cfg!(debug_assertions) {
        tracing::debug!("Starting with full config: {:#?}", config);
    } else {
        tracing::debug!(
            machine_id = config.machine_id,
            node_id = config.node_id,
            count = config.count,
            "Starting"
        );
    }
}
