use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use seedgc_garble::MAX_ADDER_BITS;
use seedgc_primitives::{HashAlgorithm, PrfAlgorithm, PrgAlgorithm};

/// Seed-based garbling and hash audit of ripple-carry adder circuits
#[derive(Parser, Debug)]
#[command(name = "gcaudit")]
#[command(author, version, about, long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) algorithms: AlgorithmArgs,

    /// Width of the adder circuit in bits
    #[arg(
        short,
        long,
        global = true,
        default_value_t = 32,
        value_name = "BITS",
        value_parser = clap::value_parser!(u32).range(..=i64::from(MAX_ADDER_BITS))
    )]
    pub(crate) bits: u32,

    #[command(subcommand)]
    pub(crate) command: Command,
}

/// Algorithm selection, layered over the optional config file.
#[derive(Args, Debug, Default)]
pub(crate) struct AlgorithmArgs {
    /// TOML file with `prg`, `prf` and `hash` entries
    #[arg(short, long, global = true, value_name = "FILE")]
    pub(crate) config: Option<PathBuf>,

    /// Seed expander (chacha20, aes128-ctr)
    #[arg(long, global = true, value_name = "NAME")]
    pub(crate) prg: Option<PrgAlgorithm>,

    /// Label and pad PRF (blake3, hmac-sha256)
    #[arg(long, global = true, value_name = "NAME")]
    pub(crate) prf: Option<PrfAlgorithm>,

    /// Commitment hash (blake3, sha256)
    #[arg(long, global = true, value_name = "NAME")]
    pub(crate) hash: Option<HashAlgorithm>,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Garble the adder from a seed and print its commitment digest
    Garble(GarbleCommand),
    /// Regenerate the adder from a seed and check it against a digest
    Verify(VerifyCommand),
    /// Check a garbled table file against a digest
    CheckTables(CheckTablesCommand),
    /// Run a full cut-and-choose exchange between garbler and verifier
    CutAndChoose(CutAndChooseCommand),
}

#[derive(Parser, Debug)]
pub(crate) struct GarbleCommand {
    /// Seed as hex; a random seed is drawn when omitted
    #[arg(short, long, value_name = "HEX")]
    pub(crate) seed: Option<String>,

    /// Write the garbled tables, in gate order, to this file
    #[arg(short, long, value_name = "FILE")]
    pub(crate) tables: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub(crate) struct VerifyCommand {
    /// Revealed seed as hex
    #[arg(short, long, value_name = "HEX")]
    pub(crate) seed: String,

    /// Committed digest as hex
    #[arg(short, long, value_name = "HEX")]
    pub(crate) digest: String,
}

#[derive(Parser, Debug)]
pub(crate) struct CheckTablesCommand {
    /// File written by `garble --tables`
    #[arg(value_name = "FILE")]
    pub(crate) tables: PathBuf,

    /// Committed digest as hex
    #[arg(short, long, value_name = "HEX")]
    pub(crate) digest: String,
}

#[derive(Parser, Debug)]
pub(crate) struct CutAndChooseCommand {
    /// Number of garbled instances committed to
    #[arg(short = 'n', long, default_value_t = 10, value_name = "N")]
    pub(crate) circuits: usize,

    /// Number of instances opened for checking
    #[arg(short = 'k', long, default_value_t = 5, value_name = "K")]
    pub(crate) checks: usize,

    /// Seed both parties' randomness for a reproducible run
    #[arg(long, value_name = "U64")]
    pub(crate) rng_seed: Option<u64>,
}

impl Cli {
    /// Parse command line arguments
    pub(crate) fn parse_args() -> Self {
        Cli::parse()
    }
}
