use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use flakeid::{Alphabet, DEFAULT_ABC, Precision, SequentialConfig, SequentialId, ShortConfig};

/// Issues and inspects distributed unique IDs.
///
/// Generator settings are read from CLI flags, then environment variables,
/// then a `.env` file in the working directory.
#[derive(Parser, Debug, Clone)]
#[command(name = "flakeid", version, arg_required_else_help = true)]
pub struct CliArgs {
    /// Node ID stamped into sequential IDs (0..=1023).
    ///
    /// Environment variable: `FLAKEID_NODE_ID`
    #[arg(long, global = true, env = "FLAKEID_NODE_ID", default_value_t = 0)]
    pub node_id: u64,

    /// Timestamp precision of sequential IDs.
    ///
    /// Environment variable: `FLAKEID_PRECISION`
    #[arg(
        long,
        global = true,
        env = "FLAKEID_PRECISION",
        value_enum,
        default_value_t = PrecisionArg::Second
    )]
    pub precision: PrecisionArg,

    /// Base alphabet of short IDs (32 or 64 unique printable ASCII symbols).
    ///
    /// Environment variable: `FLAKEID_ALPHABET`
    #[arg(
        long,
        global = true,
        env = "FLAKEID_ALPHABET",
        default_value_t = String::from(DEFAULT_ABC)
    )]
    pub alphabet: String,

    /// Seed used to shuffle the short ID alphabet.
    ///
    /// Environment variable: `FLAKEID_SEED`
    #[arg(long, global = true, env = "FLAKEID_SEED", default_value_t = 1)]
    pub seed: u64,

    /// Worker ID packed into short IDs.
    ///
    /// Environment variable: `FLAKEID_WORKER`
    #[arg(long, global = true, env = "FLAKEID_WORKER", default_value_t = 0)]
    pub worker: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Issue 64-bit time-ordered IDs
    Sequential {
        /// Number of IDs to issue
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
        /// Print IDs in the default radix encoding instead of decimal
        #[arg(long, conflicts_with = "luhn")]
        radix: bool,
        /// Append a Luhn check digit to the decimal form
        #[arg(long)]
        luhn: bool,
    },
    /// Issue short opaque string IDs
    Short {
        /// Number of IDs to issue
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
    },
    /// Break a sequential ID into its fields
    Decode {
        /// The ID, decimal unless `--radix` is given
        id: String,
        /// Parse the ID in the default radix encoding
        #[arg(long)]
        radix: bool,
    },
    /// Print the permutation of an alphabet for a seed
    Shuffle {
        /// Alphabet to permute
        alphabet: String,
        /// Shuffle seed
        seed: u64,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrecisionArg {
    Second,
    Millisecond,
}

impl From<PrecisionArg> for Precision {
    fn from(arg: PrecisionArg) -> Self {
        match arg {
            PrecisionArg::Second => Self::Second,
            PrecisionArg::Millisecond => Self::Millisecond,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub sequential: SequentialConfig,
    pub short: ShortConfig,
    pub command: Command,
}

impl TryFrom<CliArgs> for Config {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.node_id > SequentialId::MAX_NODE_ID {
            bail!(
                "FLAKEID_NODE_ID ({}) exceeds the node ID space (max = {})",
                args.node_id,
                SequentialId::MAX_NODE_ID
            );
        }

        if let Command::Sequential { count: 0, .. } | Command::Short { count: 0 } = args.command {
            bail!("--count must be greater than 0");
        }

        // only validated when short IDs are requested
        if matches!(args.command, Command::Short { .. }) {
            let alphabet = Alphabet::new(&args.alphabet).context("invalid FLAKEID_ALPHABET")?;
            let max_worker = (1_u64 << alphabet.data_bits()) - 1;
            if u64::from(args.worker) > max_worker {
                bail!(
                    "FLAKEID_WORKER ({}) does not fit a {}-symbol alphabet (max = {})",
                    args.worker,
                    alphabet.len(),
                    max_worker
                );
            }
        }

        Ok(Self {
            sequential: SequentialConfig {
                node_id: args.node_id,
                precision: args.precision.into(),
            },
            short: ShortConfig {
                worker: args.worker,
                alphabet: args.alphabet,
                seed: args.seed,
            },
            command: args.command,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(args: &[&str]) -> anyhow::Result<Config> {
        let args = CliArgs::try_parse_from(std::iter::once("flakeid").chain(args.iter().copied()))?;
        Config::try_from(args)
    }

    #[test]
    fn defaults() {
        let config = config(&["sequential"]).unwrap();
        assert_eq!(config.sequential, SequentialConfig::default());
        assert_eq!(config.short, ShortConfig::default());
        assert_eq!(
            config.command,
            Command::Sequential {
                count: 1,
                radix: false,
                luhn: false
            }
        );
    }

    #[test]
    fn global_flags_after_subcommand() {
        let config = config(&[
            "sequential",
            "-n",
            "3",
            "--node-id",
            "9",
            "--precision",
            "millisecond",
        ])
        .unwrap();
        assert_eq!(config.sequential.node_id, 9);
        assert_eq!(config.sequential.precision, Precision::Millisecond);
    }

    #[test]
    fn rejects_node_id_out_of_range() {
        let err = config(&["--node-id", "1024", "sequential"]).unwrap_err();
        assert!(err.to_string().contains("1024"));
    }

    #[test]
    fn rejects_zero_count() {
        assert!(config(&["short", "--count", "0"]).is_err());
    }

    #[test]
    fn radix_and_luhn_conflict() {
        assert!(config(&["sequential", "--radix", "--luhn"]).is_err());
    }

    #[test]
    fn short_validates_alphabet_and_worker() {
        let err = config(&["--alphabet", "abc", "short"]).unwrap_err();
        assert_eq!(err.to_string(), "invalid FLAKEID_ALPHABET");

        assert!(config(&["--worker", "31", "short"]).is_ok());
        assert!(config(&["--worker", "32", "short"]).is_err());
        assert!(
            config(&["--worker", "16", "--alphabet", "0123456789ABCDEFGHJKMNPQRSTVWXYZ", "short"])
                .is_err()
        );
        // the alphabet is not used by other commands
        assert!(config(&["--alphabet", "abc", "sequential"]).is_ok());
    }

    #[test]
    fn shuffle_takes_positional_args() {
        let config = config(&["shuffle", "abcd", "7"]).unwrap();
        assert_eq!(
            config.command,
            Command::Shuffle {
                alphabet: "abcd".to_owned(),
                seed: 7
            }
        );
    }
}
