use std::{fs, path::PathBuf, time::Instant};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use fgk_rust::fgk::{self, CodecConfig, END_OF_TEXT};

#[derive(Parser, Debug)]
#[command(about = "Compress a file with adaptive (FGK) Huffman coding")]
struct Args {
    /// The file to compress
    source_name: PathBuf,
    /// The destination of the compressed stream
    dest_name: PathBuf,
    /// End-of-stream byte; picked automatically when the default occurs in the input
    #[arg(long)]
    sentinel: Option<u8>,
    /// Check the tree invariants after every symbol
    #[arg(long)]
    verify_invariants: bool,
    /// Write the final coding tree as JSON to this file
    #[arg(long)]
    dump_tree: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let payload = fs::read(&args.source_name)
        .with_context(|| format!("failed to read {}", args.source_name.display()))?;

    let sentinel = fgk::choose_sentinel(&payload, args.sentinel)?;
    if sentinel != END_OF_TEXT {
        info!(sentinel, "using a non-default sentinel, pass it to the decompressor");
    }

    let config = CodecConfig { sentinel, verify_invariants: args.verify_invariants };

    let comp_time = Instant::now();
    let encoder = fgk::encode_payload(&payload, &config).context("compression failed")?;

    if let Some(path) = &args.dump_tree {
        let json = serde_json::to_string_pretty(encoder.tree())?;
        fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    }

    let written = encoder.finish();
    let comp_time = comp_time.elapsed().as_nanos() as f64;

    fs::write(&args.dest_name, &written.os)
        .with_context(|| format!("failed to write {}", args.dest_name.display()))?;

    println!("compressed {} bytes into {} bytes ({} bits) in {}ns", payload.len(), written.len(), written.written_bits, comp_time);

    Ok(())
}
