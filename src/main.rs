use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use repfeed::config::{DEFAULT_SAMPLE_COUNT, DEFAULT_SHARD_ROW_CAP};
use repfeed::estimate::estimate_record_count;
use repfeed::ConvertConfig;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "repfeed")]
#[command(about = "Convert XML reputation feeds into sharded CSV files")]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a reputation feed (.xml, .xml.gz, .xml.bz2) into CSV shards
    Convert(ConvertArgs),
    /// Estimate the number of records in a feed
    Estimate(EstimateArgs),
}

#[derive(Args)]
struct ConvertArgs {
    /// Path to the reputation feed
    #[arg(short, long)]
    input: PathBuf,

    /// Output directory for CSV shards
    #[arg(short, long)]
    output: PathBuf,

    /// Maximum data rows per CSV shard
    #[arg(long, default_value_t = DEFAULT_SHARD_ROW_CAP, value_parser = clap::value_parser!(u64).range(1..))]
    max_rows: u64,

    /// Number of leading records sampled for the progress estimate
    #[arg(long, default_value_t = DEFAULT_SAMPLE_COUNT)]
    sample_count: usize,

    /// Disable the progress bar
    #[arg(long)]
    no_progress: bool,
}

#[derive(Args)]
struct EstimateArgs {
    /// Path to the reputation feed
    #[arg(short, long)]
    input: PathBuf,

    /// Number of leading records to sample
    #[arg(long, default_value_t = DEFAULT_SAMPLE_COUNT)]
    sample_count: usize,
}

fn run_convert(args: ConvertArgs) -> Result<()> {
    let config = ConvertConfig {
        input: args.input,
        output_dir: args.output,
        shard_row_cap: args.max_rows,
        sample_count: args.sample_count,
        show_progress: !args.no_progress && std::io::stderr().is_terminal(),
    };

    let start = Instant::now();
    let stats = repfeed::run_conversion(&config).with_context(|| {
        format!(
            "Failed to convert {} into {}",
            config.input.display(),
            config.output_dir.display()
        )
    })?;
    let duration = start.elapsed();
    info!(duration_secs = duration.as_secs_f64(), "Conversion finished");

    println!();
    println!("=== Summary ===");
    println!("Conversion time:    {:.2}s", duration.as_secs_f64());
    println!("Records converted:  {}", stats.records());
    match (stats.estimated_records, stats.estimate_error()) {
        (Some(estimate), Some(off_by)) => {
            println!("Estimated records:  {} (off by {})", estimate, off_by)
        }
        _ => println!("Estimated records:  unknown"),
    }
    println!("Shards written:     {}", stats.shard_count());
    println!("Rows written:       {}", stats.rows_written());
    for shard in &stats.shards {
        println!("  {:<40} {} rows", shard.path.display(), shard.rows);
    }

    Ok(())
}

fn run_estimate(args: EstimateArgs) -> Result<()> {
    let estimate = estimate_record_count(&args.input, args.sample_count)
        .with_context(|| format!("Failed to estimate records in {}", args.input.display()))?;

    match estimate {
        Some(estimate) => {
            println!("Estimated total number of <reputation> elements: {}", estimate.records());
            println!("  File size:           {} bytes", estimate.file_bytes());
            println!("  Sampled records:     {}", estimate.sampled_records());
            println!("  Average record size: {} bytes", estimate.average_record_bytes());
        }
        None => println!("Estimated total number of <reputation> elements: unknown"),
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    let result = match cli.command {
        Commands::Convert(args) => run_convert(args),
        Commands::Estimate(args) => run_estimate(args),
    };

    match result {
        Ok(()) => {
            info!("Completed successfully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Error: {:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
