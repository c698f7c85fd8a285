//! Pipeline materialization tool
//!
//! Builds a configured record pipeline (JSONL sources, weighted
//! interleaving, optional bounded-memory shuffling) and writes the
//! resulting stream to an output JSONL file.
//!
//! # Usage
//!
//! ```bash
//! mezcla-cli --config pipeline.json --output mixed.jsonl [--limit 1000] [--quiet]
//!
//! mezcla-cli \
//!   --input a.jsonl --weight 0.6 \
//!   --input b.jsonl --weight 0.4 \
//!   --policy all-exhausted \
//!   --buffer-size 1024 \
//!   --seed 42 \
//!   --output mixed.jsonl
//! ```

use anyhow::{bail, Context, Result};
use clap::Parser;
use mezcla_stream::config::{PipelineConfig, SourceSpec};
use mezcla_stream::interleave::ExhaustionPolicy;
use mezcla_stream::source::RecordSource;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// Materialize a shuffled/interleaved record pipeline to JSONL
#[derive(Parser, Debug)]
#[command(name = "mezcla-cli")]
#[command(about = "Materialize a shuffled/interleaved record pipeline to JSONL", long_about = None)]
struct Args {
    /// Path to pipeline configuration file
    #[arg(long, value_name = "PATH", conflicts_with = "input")]
    config: Option<PathBuf>,

    /// Input JSONL file or directory of JSONL files (repeatable)
    #[arg(long, value_name = "PATH")]
    input: Vec<PathBuf>,

    /// Sampling weight for the matching --input (repeatable; defaults to 1.0 each)
    #[arg(long, value_name = "WEIGHT")]
    weight: Vec<f64>,

    /// Exhaustion policy: first-exhausted or all-exhausted
    #[arg(long, value_name = "POLICY", default_value = "first-exhausted")]
    policy: String,

    /// Shuffle buffer size in records; omit to keep stream order
    #[arg(long, value_name = "N")]
    buffer_size: Option<usize>,

    /// Random seed for interleaving and shuffling
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Stop after writing this many records
    #[arg(long, value_name = "N")]
    limit: Option<usize>,

    /// Output JSONL file
    #[arg(long, value_name = "PATH", required = true)]
    output: PathBuf,

    /// Suppress progress output
    #[arg(long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration from file or assemble it from flags
    let config = if let Some(config_path) = &args.config {
        PipelineConfig::from_file(config_path).context("Failed to load pipeline config")?
    } else {
        config_from_flags(&args)?
    };

    let mut source = config.build().context("Failed to build pipeline")?;

    let out_file = fs::File::create(&args.output)
        .with_context(|| format!("Failed to create output file: {:?}", args.output))?;
    let mut writer = BufWriter::new(out_file);

    let mut written = 0usize;
    while let Some(record) = source.next_record().context("Pipeline pull failed")? {
        serde_json::to_writer(&mut writer, &record).context("Failed to write record")?;
        writer.write_all(b"\n").context("Failed to write record")?;
        written += 1;

        if args.limit.is_some_and(|limit| written >= limit) {
            break;
        }
    }
    writer.flush().context("Failed to flush output")?;

    if !args.quiet {
        println!("Wrote {} records to {:?}", written, args.output);
    }

    Ok(())
}

/// Assemble a pipeline config from inline flags
fn config_from_flags(args: &Args) -> Result<PipelineConfig> {
    if args.input.is_empty() {
        bail!("Either --config or at least one --input is required");
    }
    if !args.weight.is_empty() && args.weight.len() != args.input.len() {
        bail!(
            "Got {} --weight values for {} --input values",
            args.weight.len(),
            args.input.len()
        );
    }

    let sources = args
        .input
        .iter()
        .enumerate()
        .map(|(i, path)| SourceSpec {
            path: path.clone(),
            weight: args.weight.get(i).copied().unwrap_or(1.0),
        })
        .collect();

    Ok(PipelineConfig {
        sources,
        seed: args.seed,
        policy: parse_policy(&args.policy)?,
        shuffle_buffer: args.buffer_size,
    })
}

/// Parse an exhaustion policy name from the command line
fn parse_policy(value: &str) -> Result<ExhaustionPolicy> {
    match value {
        "first-exhausted" => Ok(ExhaustionPolicy::FirstExhausted),
        "all-exhausted" => Ok(ExhaustionPolicy::AllExhausted),
        other => bail!(
            "Unknown exhaustion policy: {} (expected first-exhausted or all-exhausted)",
            other
        ),
    }
}
