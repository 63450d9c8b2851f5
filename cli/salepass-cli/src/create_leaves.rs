use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::fs;
use std::io::Read;
use std::path::PathBuf;
use tracing::info;
use zeroize::Zeroizing;

use salepass::{create_leaves, hash_leaves, LeafHash, PassLeaf};

use crate::write_output;

#[derive(Parser, Debug)]
#[command(about = "Derive fixture leaves from private keys", long_about = None)]
pub struct Cli {
    /// File with one private key per line (hex, with or without 0x prefix)
    /// Alternatively, use "-" to read from stdin (more secure)
    #[arg(short, long)]
    keys: String,

    /// Output JSON file (stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Include each leaf's hash next to its pass id and signer
    #[arg(long)]
    with_hashes: bool,
}

#[derive(Debug, Serialize)]
struct HashedLeaf<'a> {
    #[serde(flatten)]
    leaf: &'a PassLeaf,
    hash: LeafHash,
}

fn read_keys_source(source: &str) -> Result<Zeroizing<String>> {
    let mut buffer = Zeroizing::new(String::new());
    if source == "-" {
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read private keys from stdin")?;
    } else {
        let mut file = fs::File::open(source).context("Failed to open keys file")?;
        file.read_to_string(&mut buffer)
            .context("Failed to read keys file")?;
    }
    Ok(buffer)
}

/// Splits key text into trimmed, non-empty lines borrowed from `text`.
fn key_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

fn render(leaves: &[PassLeaf], with_hashes: bool) -> Result<String> {
    if !with_hashes {
        return serde_json::to_string_pretty(leaves).context("Failed to serialize JSON");
    }

    let hashes = hash_leaves(leaves).context("Failed to hash derived leaves")?;
    let hashed: Vec<HashedLeaf<'_>> = leaves
        .iter()
        .zip(hashes)
        .map(|(leaf, hash)| HashedLeaf { leaf, hash })
        .collect();
    serde_json::to_string_pretty(&hashed).context("Failed to serialize JSON")
}

pub fn run(cli: Cli) -> Result<()> {
    if cli.keys == "-" {
        info!("Reading private keys from stdin...");
    } else {
        info!("Reading private keys from {:?}...", cli.keys);
    }
    let text = read_keys_source(&cli.keys)?;
    let keys = key_lines(&text);
    if keys.is_empty() {
        anyhow::bail!("No private keys found");
    }

    info!("Deriving {} fixture leaves...", keys.len());
    let leaves = create_leaves(&keys).context("Failed to derive fixture leaves")?;
    drop(keys);
    drop(text);

    let json_output = render(&leaves, cli.with_hashes)?;
    write_output(cli.output.as_deref(), &json_output)?;

    info!("Created {} leaves", leaves.len());
    Ok(())
}
