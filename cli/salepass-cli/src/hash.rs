use anyhow::{Context, Result};
use clap::Parser;

use salepass::calculate_hash;

#[derive(Parser, Debug)]
#[command(about = "Compute the leaf hash of a single sale pass", long_about = None)]
pub struct Cli {
    /// Pass id as a decimal integer
    #[arg(short, long)]
    pass_id: String,

    /// Signer address (hex, checksummed or single-case)
    #[arg(short, long)]
    signer: String,
}

pub fn run(cli: &Cli) -> Result<()> {
    let hash = calculate_hash(&cli.pass_id, &cli.signer).context("Failed to hash sale pass")?;
    println!("{hash}");
    Ok(())
}
