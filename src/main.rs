// Demo driver for the ledger: fabricates transfers, mines them, and prints
// what ended up on the chain
use clap::Parser;
use log::{error, LevelFilter};
use megalonia_chain::core::monetary::conversions::format_subunits;
use megalonia_chain::utils::text_hash;
use megalonia_chain::{Block, Command, Miner, MinerConfig, Opt};
use rand::seq::SliceRandom;
use rand::Rng;
use std::process;

// The cast of characters the demo sends coins between
const NAMES: [&str; 12] = [
    "Spongebob",
    "Patrick",
    "Squidward",
    "Plankton",
    "Sandy",
    "Gary",
    "Goku",
    "Vegeta",
    "Piccolo",
    "Kami",
    "Frieza",
    "Beerus",
];

fn main() {
    // Info level by default; RUST_LOG still wins when set
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let opt = Opt::parse();

    if let Err(e) = run_command(opt) {
        error!("Error: {e}");
        process::exit(1);
    }
}

fn load_config(opt: &Opt) -> Result<MinerConfig, Box<dyn std::error::Error>> {
    let mut config = match &opt.config {
        Some(path) => MinerConfig::load(path)?,
        None => MinerConfig::default(),
    };
    config.apply_env_overrides()?;
    Ok(config)
}

fn run_command(opt: Opt) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(&opt)?;
    match opt.command {
        Command::Demo { transactions, json } => {
            let mut miner = Miner::new(config)?;
            submit_random_transfers(&mut miner, transactions)?;

            for report in miner.mine()? {
                println!(
                    "Mined block {} with nonce {} ({} transactions, fees {})",
                    report.height,
                    report.nonce,
                    report.transaction_count,
                    format_subunits(report.total_fees)
                );
            }

            if json {
                for block in miner.get_chain().iter() {
                    print_block_json(block)?;
                }
            } else {
                println!("Blocks (height, hash):");
                for block in miner.get_chain().iter() {
                    println!("{} {}", block.get_index(), block.get_hash());
                }
                println!("Transactions (count, hash):");
                let all = miner
                    .get_chain()
                    .iter()
                    .flat_map(|block| block.get_transactions());
                for (i, tx) in all.enumerate() {
                    println!("{} {}", i + 1, tx.get_hash());
                }
            }
            println!(
                "Block height of the top of the chain: {}",
                miner.get_last_block().get_index()
            );
        }
        Command::Genesis { json } => {
            let miner = Miner::new(config)?;
            let genesis = miner.get_last_block();
            if json {
                print_block_json(genesis)?;
            } else {
                println!("Genesis block hash: {}", genesis.get_hash());
                println!("Timestamp: {}", genesis.get_header().get_timestamp());
                println!("Size: {} bytes", genesis.size()?);
            }
        }
        Command::Hash { text } => {
            println!("{}", text_hash(&text));
        }
    }
    Ok(())
}

fn submit_random_transfers(
    miner: &mut Miner,
    count: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = rand::thread_rng();
    for i in 0..count {
        let sender = *NAMES.choose(&mut rng).ok_or("no names to choose from")?;
        let recipients: Vec<&str> = NAMES.iter().copied().filter(|n| *n != sender).collect();
        let recipient = *recipients.choose(&mut rng).ok_or("no recipient available")?;
        let amount = f64::from(rng.gen_range(1..=101u32));
        let output_amount = i as f64 / 1000.0;
        miner.submit_transaction(sender, recipient, amount, output_amount);
    }
    Ok(())
}

fn print_block_json(block: &Block) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(block)?);
    Ok(())
}
