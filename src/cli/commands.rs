use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "megalonia-chain")]
pub struct Opt {
    #[arg(long = "config", global = true, help = "TOML file with miner settings")]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(
        name = "demo",
        about = "Submit random transfers, mine them, and print the chain"
    )]
    Demo {
        #[arg(
            long = "transactions",
            default_value_t = 91,
            help = "Number of transfers to submit"
        )]
        transactions: usize,
        #[arg(long = "json", help = "Print blocks as JSON")]
        json: bool,
    },
    #[command(name = "genesis", about = "Print the genesis block")]
    Genesis {
        #[arg(long = "json", help = "Print the block as JSON")]
        json: bool,
    },
    #[command(name = "hash", about = "Print the double text hash of TEXT")]
    Hash {
        #[arg(help = "Text to hash")]
        text: String,
    },
}
