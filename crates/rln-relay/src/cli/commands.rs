use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

const BUILD_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "rln-relay")]
#[command(version = BUILD_VERSION)]
#[command(about = "RLN relay - registry membership sync and rate-limit proof tooling")]
#[command(long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[arg(short, long, global = true, value_name = "FILE", help = "Path to config file")]
    pub config: Option<PathBuf>,

    #[arg(short, long, action = clap::ArgAction::Count, global = true, help = "Increase verbosity (-v, -vv, -vvv)")]
    pub verbose: u8,

    #[arg(short, long, global = true, help = "Suppress non-error output")]
    pub quiet: bool,

    #[arg(long, global = true, value_name = "FILE", help = "Write logs to file")]
    pub log_file: Option<PathBuf>,

    #[arg(long, global = true, default_value = "text", help = "Output format")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Synchronize registry membership")]
    #[command(long_about = "Backfill registry events into a local membership tree.\n\nWith --follow, keep applying live events until interrupted.")]
    Sync {
        #[arg(long, value_name = "BLOCK", help = "First block to scan (defaults to the configured start block)")]
        from_block: Option<u64>,
        #[arg(long, help = "Keep watching for new events after the backfill")]
        follow: bool,
    },

    #[command(about = "Show the epoch for a timestamp")]
    Epoch {
        #[arg(long, value_name = "SECS", help = "Unix timestamp (defaults to now)")]
        at: Option<i64>,
    },

    #[command(about = "Inspect proofs and signals")]
    Proof {
        #[command(subcommand)]
        action: ProofAction,
    },

    #[command(about = "Register a membership commitment")]
    #[command(long_about = "Pay the membership deposit and register a commitment.\n\nThe signing key is read from RLN_PRIVATE_KEY.")]
    Register {
        #[arg(long, value_name = "HEX", help = "32-byte commitment, little-endian hex")]
        commitment: String,
    },

    #[command(about = "Manage configuration")]
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ProofAction {
    #[command(about = "Decode a 320-byte proof")]
    Decode {
        #[arg(value_name = "HEX")]
        proof: String,
    },
    #[command(about = "Build the public signal for a message")]
    Signal {
        #[arg(long, value_name = "TOPIC")]
        topic: String,
        #[arg(long, value_name = "HEX", default_value = "")]
        payload: String,
    },
    #[command(about = "Fetch a member's Merkle path from the proof service")]
    Path {
        #[arg(value_name = "HEX", help = "32-byte commitment, little-endian hex")]
        commitment: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    #[command(about = "Show effective configuration")]
    Show,
    #[command(about = "Write a default configuration file")]
    Init {
        #[arg(short, long, help = "Overwrite existing configuration")]
        force: bool,
    },
}
