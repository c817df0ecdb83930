use core::time::Duration;

use anyhow::{Context, bail};
use clap::Parser;
use flurry::{FlakeGenerator, FlakeId, GeneratorOptions, OverflowMode, SystemClock, TimeSource};

/// Command-line arguments for the `flurry` binary.
///
/// Every flag can also be set through the environment variable named next to
/// it, or through a `.env` file in the working directory.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "flurry",
    version,
    about = "Prints Snowflake-style 64-bit IDs, one per line"
)]
pub struct CliArgs {
    /// Machine ID encoded into every ID (0 to 31).
    ///
    /// Environment variable: `FLURRY_MACHINE_ID`
    #[arg(long, env = "FLURRY_MACHINE_ID", default_value_t = 0, allow_negative_numbers = true)]
    pub machine_id: i64,

    /// Node ID encoded into every ID (0 to 31).
    ///
    /// Together with the machine ID this must be unique among every process
    /// minting IDs into the same namespace.
    ///
    /// Environment variable: `FLURRY_NODE_ID`
    #[arg(long, env = "FLURRY_NODE_ID", default_value_t = 0, allow_negative_numbers = true)]
    pub node_id: i64,

    /// Number of IDs to print. `0` streams until stdout is closed.
    ///
    /// Environment variable: `FLURRY_COUNT`
    #[arg(short = 'n', long, env = "FLURRY_COUNT", default_value_t = 1)]
    pub count: u64,

    /// Keep counting the sequence past the current millisecond and only
    /// consult the clock once all 4096 sequence values are used.
    ///
    /// Environment variable: `FLURRY_BULK`
    #[arg(long, env = "FLURRY_BULK", default_value_t = false)]
    pub bulk: bool,

    /// Epoch, in milliseconds since the Unix epoch, that timestamps count
    /// from. Must not lie in the future.
    ///
    /// Environment variable: `FLURRY_EPOCH_MILLIS`
    #[arg(long, env = "FLURRY_EPOCH_MILLIS", default_value_t = 0)]
    pub epoch_millis: u64,

    /// Print the timestamp, machine ID, node ID and sequence next to each ID.
    #[arg(short, long, default_value_t = false)]
    pub explain: bool,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub machine_id: i64,
    pub node_id: i64,
    pub count: u64,
    pub overflow: OverflowMode,
    pub epoch: Duration,
    pub explain: bool,
}

impl TryFrom<CliArgs> for Config {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let epoch = Duration::from_millis(args.epoch_millis);
        let unix_now = SystemClock::default().current_millis();

        if args.epoch_millis > unix_now {
            bail!(
                "--epoch-millis / FLURRY_EPOCH_MILLIS ({}) lies in the future (now = {})",
                args.epoch_millis,
                unix_now
            );
        }

        if unix_now - args.epoch_millis > FlakeId::max_timestamp() {
            bail!(
                "--epoch-millis / FLURRY_EPOCH_MILLIS ({}) is too old: timestamps would exceed the 42-bit field",
                args.epoch_millis
            );
        }

        let overflow = if args.bulk {
            OverflowMode::Bulk
        } else {
            OverflowMode::PerTick
        };

        Ok(Self {
            machine_id: args.machine_id,
            node_id: args.node_id,
            count: args.count,
            overflow,
            epoch,
            explain: args.explain,
        })
    }
}

impl Config {
    /// Builds the generator, validating the identity pair.
    pub fn build_generator(&self) -> anyhow::Result<FlakeGenerator<SystemClock>> {
        let options = GeneratorOptions::new(SystemClock::with_epoch(self.epoch))
            .with_overflow(self.overflow);
        FlakeGenerator::try_new(self.machine_id, self.node_id, options)
            .context("invalid generator identity")
    }
}
