use std::{fs, path::PathBuf, time::Instant};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use fgk_rust::fgk::{self, CodecConfig, END_OF_TEXT};

#[derive(Parser, Debug)]
#[command(about = "Decompress a stream produced by compress_fgk")]
struct Args {
    /// The compressed stream
    source_name: PathBuf,
    /// The destination of the decoded bytes
    dest_name: PathBuf,
    /// End-of-stream byte used by the compressor
    #[arg(long, default_value_t = END_OF_TEXT)]
    sentinel: u8,
    /// Check the tree invariants after every symbol
    #[arg(long)]
    verify_invariants: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let stream = fs::read(&args.source_name)
        .with_context(|| format!("failed to read {}", args.source_name.display()))?;

    let config = CodecConfig { sentinel: args.sentinel, verify_invariants: args.verify_invariants };

    let decomp_time = Instant::now();
    let decoded = fgk::decompress(&stream, &config)
        .with_context(|| format!("failed to decompress {}", args.source_name.display()))?;
    let decomp_time = decomp_time.elapsed().as_nanos() as f64;

    fs::write(&args.dest_name, &decoded)
        .with_context(|| format!("failed to write {}", args.dest_name.display()))?;

    println!("decompressed {} bytes into {} bytes in {}ns", stream.len(), decoded.len(), decomp_time);

    Ok(())
}
