use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use fgk_rust::{fgk, huffman::StaticHuffman};

#[derive(Parser, Debug)]
#[command(about = "Print the static Huffman code of a file and compare its size with the adaptive one")]
struct Args {
    /// The file to analyse
    source_name: PathBuf,
    /// Print the codes as JSON
    #[arg(long)]
    json: bool,
}

fn render(code: &[bool]) -> String {
    code.iter().map(|&bit| if bit { '1' } else { '0' }).collect()
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let payload = fs::read(&args.source_name)
        .with_context(|| format!("failed to read {}", args.source_name.display()))?;

    let huff = StaticHuffman::build(&payload).context("cannot build a code for an empty file")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&huff)?);
        return Ok(());
    }

    for (symbol, code) in huff.codes() {
        println!("{:#04x} ({}) : {}", symbol, huff.frequencies()[symbol], render(code));
    }

    println!("static payload: {} bits", huff.encoded_bits());

    if let Some(sentinel) = fgk::pick_sentinel(&payload) {
        let config = fgk::CodecConfig { sentinel, ..Default::default() };
        let encoder = fgk::encode_payload(&payload, &config)?;
        println!("adaptive stream: {} bits", encoder.written_bits());
    }

    Ok(())
}
