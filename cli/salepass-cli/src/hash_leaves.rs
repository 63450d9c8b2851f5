use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use salepass::{hash_leaves, PassLeaf};

use crate::write_output;

#[derive(Parser, Debug)]
#[command(about = "Hash a JSON list of sale pass leaves", long_about = None)]
pub struct Cli {
    /// Input JSON file: [{"passId": "0", "signer": "0x..."}, ...]
    #[arg(short, long)]
    input: PathBuf,

    /// Output JSON file for the leaf hashes (stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn load_leaves(path: &Path) -> Result<Vec<PassLeaf>> {
    let content = fs::read_to_string(path).context("Failed to read leaves file")?;
    serde_json::from_str(&content).context("Failed to parse leaves JSON")
}

pub fn run(cli: &Cli) -> Result<()> {
    info!("Reading leaves from {:?}...", cli.input);
    let leaves = load_leaves(&cli.input)?;

    info!("Hashing {} leaves...", leaves.len());
    let hashes = hash_leaves(&leaves).with_context(|| {
        match leaves.iter().position(|leaf| leaf.hash().is_err()) {
            Some(index) => format!("Leaf {index} is invalid"),
            None => "Failed to hash leaves".to_string(),
        }
    })?;

    let json_output =
        serde_json::to_string_pretty(&hashes).context("Failed to serialize hashes")?;
    write_output(cli.output.as_deref(), &json_output)?;

    info!("Done!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use salepass::LeafHash;

    const VITALIK: &str = "0xAb5801a7D398351b8bE11C439e05C5B3259aeC9B";

    #[test]
    fn test_run_writes_hashes() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("leaves.json");
        let output = dir.path().join("hashes.json");
        let leaves = vec![PassLeaf::new("0", VITALIK), PassLeaf::new("1", VITALIK)];
        fs::write(&input, serde_json::to_string(&leaves).unwrap()).unwrap();

        run(&Cli {
            input,
            output: Some(output.clone()),
        })
        .unwrap();

        let hashes: Vec<LeafHash> =
            serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(hashes.len(), 2);
        assert_eq!(
            hashes[1].to_string(),
            "0x9f2d9e5a6b5367c74f3b0e7cc4e83e6700e8db4f2d036851ae5c688e088c387c"
        );
    }

    #[test]
    fn test_run_names_offending_leaf() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("leaves.json");
        let leaves = vec![PassLeaf::new("0", VITALIK), PassLeaf::new("0", "0xnope")];
        fs::write(&input, serde_json::to_string(&leaves).unwrap()).unwrap();

        let err = run(&Cli {
            input,
            output: None,
        })
        .unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("Leaf 1 is invalid"));
        assert!(message.contains("0xnope"));
    }

    #[test]
    fn test_run_rejects_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("leaves.json");
        fs::write(&input, r#"[{"pass_id": "0"}]"#).unwrap();
        assert!(run(&Cli {
            input,
            output: None,
        })
        .is_err());
    }
}
