use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use rand::{rngs::StdRng, SeedableRng};
use tracing::info;
use tracing_subscriber::EnvFilter;

use fgk_rust::{generator::{self, DEFAULT_SIZES}, END_OF_TEXT};

#[derive(Parser, Debug)]
#[command(about = "Write files of random bytes to test the compressor with")]
struct Args {
    /// The directory the random<size>.txt files are written to
    #[arg(default_value = "testing_data")]
    dest_dir: PathBuf,
    /// File sizes in bytes, defaults to 100, 1000, 10000 and 100000
    #[arg(short, long, num_args = 1..)]
    sizes: Vec<usize>,
    /// Byte value left out of the data, so it stays usable as the sentinel
    #[arg(long, default_value_t = END_OF_TEXT)]
    sentinel: u8,
    /// Seed for reproducible files
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let sizes = if args.sizes.is_empty() { DEFAULT_SIZES.to_vec() } else { args.sizes };

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    fs::create_dir_all(&args.dest_dir)
        .with_context(|| format!("failed to create {}", args.dest_dir.display()))?;

    for size in sizes {
        let path = args.dest_dir.join(generator::payload_file_name(size));
        let payload = generator::random_payload(size, args.sentinel, &mut rng);

        fs::write(&path, payload).with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), size, "generated");
    }

    Ok(())
}
