//! Command-line front end for huff-compress.
//!
//! ## Usage
//!
//! ```bash
//! # Compress, skipping files that would not shrink
//! huff compress notes.txt notes.huff
//!
//! # Compress regardless of size
//! huff compress --force image.bin image.huff
//!
//! # Restore the original
//! huff decompress notes.huff notes.txt
//!
//! # Show symbol counts and codes without writing anything
//! huff stats notes.txt
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use huff_compress::{CompressionConfig, Compressor};

#[derive(Parser, Debug)]
#[command(name = "huff")]
#[command(version)]
#[command(about = "Huffman file compressor", long_about = None)]
struct Args {
    /// JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compress a file
    Compress {
        input: PathBuf,
        output: PathBuf,
        /// Write output even when it is not smaller than the input
        #[arg(short, long)]
        force: bool,
    },
    /// Decompress a file
    Decompress { input: PathBuf, output: PathBuf },
    /// Print symbol counts, codes and size estimate as JSON
    Stats { input: PathBuf },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = match &args.config {
        Some(path) => CompressionConfig::from_file(path)?,
        None => CompressionConfig::default(),
    };
    let compressor = Compressor::new(config);

    match args.command {
        Command::Compress {
            input,
            output,
            force,
        } => {
            let summary = compressor
                .compress_file(&input, &output, force)
                .with_context(|| format!("compressing {}", input.display()))?;
            if !summary.written {
                eprintln!(
                    "{}: compressed form would not be smaller; use --force to write it anyway",
                    input.display()
                );
            }
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::Decompress { input, output } => {
            let n = compressor
                .decompress_file(&input, &output)
                .with_context(|| format!("decompressing {}", input.display()))?;
            info!("Wrote {} bytes to {}", n, output.display());
        }
        Command::Stats { input } => {
            let analysis = compressor
                .inspect_file(&input)
                .with_context(|| format!("reading {}", input.display()))?;
            let report = serde_json::json!({
                "summary": analysis.summary,
                "counts": analysis.frequencies,
                "codes": analysis.codes,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
