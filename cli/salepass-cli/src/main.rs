#![forbid(unsafe_code)]
#![allow(unreachable_pub)]

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;

use salepass::write_file_atomic;

mod create_leaves;
mod hash;
mod hash_leaves;

#[derive(Parser, Debug)]
#[command(name = "salepass")]
#[command(about = "Sale pass Merkle leaf tools", long_about = None)]
#[command(version)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Hash(hash::Cli),
    HashLeaves(hash_leaves::Cli),
    CreateLeaves(create_leaves::Cli),
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Writes command output to `output` atomically, or to stdout when absent.
fn write_output(output: Option<&Path>, contents: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            info!("Writing output to {:?}...", path);
            write_file_atomic(path, contents)
                .with_context(|| format!("Failed to write {}", path.display()))
        }
        None => {
            println!("{contents}");
            Ok(())
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Hash(args) => hash::run(&args)?,
        Commands::HashLeaves(args) => hash_leaves::run(&args)?,
        Commands::CreateLeaves(args) => create_leaves::run(args)?,
    }

    Ok(())
}
