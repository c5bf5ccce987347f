#![doc = include_str!("../README.md")]

mod config;
mod telemetry;

use anyhow::Context;
use clap::Parser;
use config::{CliArgs, Command, Config};
use flakeid::{
    Error, IdGenerator, SequentialGenerator, SequentialId, ShortGenerator, check_unique, luhn,
    shuffle,
};
use std::io::{self, BufWriter, Write};
use telemetry::init_telemetry;

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    init_telemetry()?;
    let config = Config::try_from(args)?;

    tracing::debug!(?config, "starting");
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    run(&config, &mut out)?;
    out.flush()?;
    Ok(())
}

fn run(config: &Config, out: &mut impl Write) -> anyhow::Result<()> {
    match &config.command {
        Command::Sequential { count, radix, luhn } => {
            let generator = SequentialGenerator::from_config(&config.sequential)?;
            for _ in 0..*count {
                let id = generate_retrying(&generator)?;
                if *radix {
                    writeln!(out, "{}", id.to_radix_string())?;
                } else if *luhn {
                    let full = luhn::append_check_digit(id.to_raw())
                        .with_context(|| format!("{id} is too large for a check digit"))?;
                    writeln!(out, "{full}")?;
                } else {
                    writeln!(out, "{id}")?;
                }
            }
        }
        Command::Short { count } => {
            let generator = ShortGenerator::from_config(&config.short)?;
            for _ in 0..*count {
                writeln!(out, "{}", generate_retrying(&generator)?)?;
            }
        }
        Command::Decode { id, radix } => {
            let parsed = if *radix {
                SequentialId::from_radix_string(id)
            } else {
                id.parse()
            };
            let id = parsed.with_context(|| format!("cannot decode {id:?}"))?;
            describe(&id, out)?;
        }
        Command::Shuffle { alphabet, seed } => {
            if !check_unique(alphabet) {
                anyhow::bail!("alphabet symbols must be unique");
            }
            writeln!(out, "{}", shuffle(alphabet, *seed))?;
        }
    }
    Ok(())
}

/// Retries exhausted ticks until the clock advances; every other error is
/// returned.
fn generate_retrying<G: IdGenerator>(generator: &G) -> anyhow::Result<G::Id> {
    loop {
        match generator.try_generate() {
            Ok(id) => return Ok(id),
            Err(Error::SequenceOverflow { .. }) => std::thread::yield_now(),
            Err(e) => return Err(e).context("failed to generate id"),
        }
    }
}

fn describe(id: &SequentialId, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "id:        {id}")?;
    writeln!(out, "radix:     {}", id.to_radix_string())?;
    writeln!(out, "precision: {}", id.precision())?;
    writeln!(out, "timestamp: {}", id.timestamp())?;
    writeln!(out, "time:      {}", id.datetime().to_rfc3339())?;
    writeln!(out, "sequence:  {}", id.sequence())?;
    writeln!(out, "node:      {}", id.node_id())?;
    writeln!(out, "rendered:  {}", id.render())
}
