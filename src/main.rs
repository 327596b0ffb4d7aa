use std::{fs, path::PathBuf, process::ExitCode, time::Instant};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use fgk_rust::{fgk::{self, END_OF_TEXT}, huffman::StaticHuffman, properties::Properties, report::RoundTripReport};

#[derive(Parser, Debug)]
#[command(about = "Compress a file with adaptive Huffman coding, decompress it again and compare")]
struct Args {
    /// The file to compress
    input: PathBuf,
    /// A .properties file with the codec and output settings
    #[arg(short, long)]
    properties: Option<PathBuf>,
    /// Where the compressed stream is written
    #[arg(long)]
    compressed_output: Option<String>,
    /// Where the decompressed bytes are written
    #[arg(long)]
    decoded_output: Option<String>,
    /// End-of-stream byte, it must not occur in the input. Picked from the input when
    /// neither this nor the properties file sets it
    #[arg(long)]
    sentinel: Option<u8>,
    /// Check the tree invariants after every symbol
    #[arg(long)]
    verify_invariants: bool,
    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut props = match &args.properties {
        Some(path) => Properties::load(path)
            .with_context(|| format!("failed to load properties from {}", path.display()))?,
        None => Properties::default(),
    };
    if let Some(sentinel) = args.sentinel {
        props.sentinel = Some(sentinel);
    }
    if let Some(output) = args.compressed_output {
        props.compressed_output = output;
    }
    if let Some(output) = args.decoded_output {
        props.decoded_output = output;
    }
    props.verify_invariants |= args.verify_invariants;

    let original = fs::read(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    info!(path = %args.input.display(), bytes = original.len(), "read input");

    let config = props.codec_config(&original).context("no sentinel available for this input")?;
    if config.sentinel != END_OF_TEXT {
        info!(sentinel = config.sentinel, "using a non-default sentinel");
    }

    let comp_time = Instant::now();
    let compressed = fgk::compress(&original, &config).context("compression failed")?;
    let comp_time = comp_time.elapsed().as_nanos() as u64;

    fs::write(&props.compressed_output, &compressed)
        .with_context(|| format!("failed to write {}", props.compressed_output))?;
    let stored = fs::read(&props.compressed_output)
        .with_context(|| format!("failed to read back {}", props.compressed_output))?;

    let decomp_time = Instant::now();
    let decoded = fgk::decompress(&stored, &config).context("decompression failed")?;
    let decomp_time = decomp_time.elapsed().as_nanos() as u64;

    fs::write(&props.decoded_output, &decoded)
        .with_context(|| format!("failed to write {}", props.decoded_output))?;

    let static_huffman_bytes = StaticHuffman::build(&original)
        .ok()
        .map(|huff| huff.encoded_bits().div_ceil(8) as usize);

    let report = RoundTripReport {
        original_bytes: original.len(),
        compressed_bytes: stored.len(),
        static_huffman_bytes,
        compression_ns: comp_time,
        decompression_ns: decomp_time,
        matches: decoded == original,
    };

    if args.json {
        println!("{}", report.to_json()?);
    } else {
        println!("{}", report);
    }

    if report.matches {
        Ok(ExitCode::SUCCESS)
    } else {
        warn!(decoded = decoded.len(), original = original.len(), "decoded bytes differ from the input");
        Ok(ExitCode::FAILURE)
    }
}
