mod logger;
mod progress;

use std::path::PathBuf;

use clap::Parser;
use eyre::{bail, Result};
use ferry_core::bench::BenchResult;
use ferry_core::logger::Logger;
use ferry_core::orchestrator::{TransferOptions, TransferOrchestrator, TransferSummary, TuneMode};
use ferry_core::progress::{NullProgress, ProgressSink};
use indicatif::HumanBytes;

use crate::logger::{FileConsoleLogger, LogLevel};
use crate::progress::BarProgress;

#[derive(Parser, Debug)]
#[command(name = "ferry")]
#[command(version)]
#[command(about = "Bulk tree copy/move with verification and benchmark-driven tuning")]
struct Cli {
    /// Source directory
    source: PathBuf,
    /// Destination directory
    dest: PathBuf,

    /// Scan and summarize without copying anything
    #[arg(long)]
    dry_run: bool,
    /// Measure the tuning grid on a sample and report, without copying
    #[arg(long)]
    benchmark: bool,
    /// After benchmarking, ask whether to proceed with the safe settings
    #[arg(long, requires = "benchmark", conflicts_with = "auto")]
    ask: bool,
    /// Benchmark, then copy with the safe settings and post-copy verification
    #[arg(long)]
    auto: bool,

    /// Verify each file inline while it is written
    #[arg(long, conflicts_with = "verify_after")]
    verify: bool,
    /// Re-hash every copied file after the whole copy phase
    #[arg(long)]
    verify_after: bool,
    /// Remove source files after a verified copy
    #[arg(long = "move")]
    move_source: bool,
    /// Skip destination files that already match by size and mtime
    #[arg(long)]
    update: bool,

    /// Worker threads (0 = logical CPU count)
    #[arg(long, default_value_t = 1)]
    threads: usize,
    /// I/O buffer size in MiB
    #[arg(long, default_value_t = 1, value_name = "MIB")]
    buffer: usize,

    /// Append a detailed run log to this file
    #[arg(long, value_name = "FILE")]
    log: Option<PathBuf>,
    /// File log verbosity
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    /// Print the final summary as JSON on stdout
    #[arg(long)]
    json: bool,
    /// Suppress the progress bar
    #[arg(long)]
    quiet: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    validate(&cli)?;

    let logger = FileConsoleLogger::new(cli.log.as_deref(), cli.log_level)?;
    logger.info(&format!("ferry {} started", env!("CARGO_PKG_VERSION")));

    let threads = if cli.threads == 0 {
        num_cpus::get().max(1)
    } else {
        cli.threads
    };
    let options = TransferOptions {
        threads,
        buffer_mib: cli.buffer.max(1),
        verify_inline: cli.verify,
        verify_after: cli.verify_after,
        update: cli.update,
        move_source: cli.move_source,
        dry_run: cli.dry_run,
        tune: tune_mode(&cli),
    };

    let progress: Box<dyn ProgressSink> = if cli.quiet || cli.dry_run {
        Box::new(NullProgress)
    } else {
        Box::new(BarProgress::new())
    };

    let confirm = |results: &[BenchResult], safe: &BenchResult| -> bool {
        if !cli.json {
            print_bench(results);
        }
        dialoguer::Confirm::new()
            .with_prompt(format!(
                "Run with SAFE settings (threads={}, buffer={}MiB, verify-after)?",
                safe.threads, safe.buffer_mib
            ))
            .default(true)
            .interact()
            .unwrap_or(false)
    };

    if !cli.json && !cli.dry_run && options.tune == TuneMode::Off {
        print_run_header(&options);
    }

    let orchestrator = TransferOrchestrator::new();
    let summary = orchestrator.execute(
        &cli.source,
        &cli.dest,
        options,
        progress.as_ref(),
        &confirm,
        &logger,
    )?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else if summary.dry_run {
        print_dry_run(&cli, &summary);
    } else {
        if !summary.bench.is_empty() && !cli.ask {
            print_bench(&summary.bench);
        }
        if !summary.benchmark_only {
            print_report(&summary);
        }
    }

    if summary.failed_files > 0 || summary.verify_mismatches > 0 {
        std::process::exit(1);
    }
    Ok(())
}

/// The one rule clap cannot express: move needs some form of verification.
fn validate(cli: &Cli) -> Result<()> {
    if cli.move_source && !(cli.verify || cli.verify_after) {
        bail!("--move requires --verify or --verify-after for safety");
    }
    Ok(())
}

fn tune_mode(cli: &Cli) -> TuneMode {
    if cli.auto {
        TuneMode::Auto
    } else if cli.benchmark && cli.ask {
        TuneMode::BenchmarkAsk
    } else if cli.benchmark {
        TuneMode::Benchmark
    } else {
        TuneMode::Off
    }
}

fn print_run_header(options: &TransferOptions) {
    println!("Running ferry");
    println!("Threads      : {}", options.threads);
    println!("Buffer       : {} MiB", options.buffer_mib);
    println!("Verify inline: {}", options.verify_inline);
    println!("Verify after : {}", options.verify_after);
    println!(
        "Mode         : {}",
        if options.move_source { "MOVE" } else { "COPY" }
    );
    println!();
}

fn print_dry_run(cli: &Cli, summary: &TransferSummary) {
    println!("Dry-run summary");
    println!("Files      : {}", summary.planned_files);
    println!("Total size : {}", HumanBytes(summary.total_bytes));
    println!(
        "Sample     : {} files / {}",
        summary.sample_files,
        HumanBytes(summary.sample_bytes)
    );
    println!(
        "Intent     : {}",
        if cli.verify || cli.verify_after || cli.auto {
            "SAFE"
        } else {
            "FAST"
        }
    );
}

fn print_bench(results: &[BenchResult]) {
    println!("Results (MB/s):");
    for result in results {
        println!(
            "  threads={} buffer={}MiB -> {:.1}",
            result.threads, result.buffer_mib, result.mbps
        );
    }
    if let Some(fast) = ferry_core::bench::fastest(results) {
        println!();
        println!("Recommended FAST:");
        println!("  --threads {} --buffer {}", fast.threads, fast.buffer_mib);
    }
    if let Some(safe) = ferry_core::bench::safest(results) {
        println!("Recommended SAFE:");
        println!(
            "  --threads {} --buffer {} --verify-after",
            safe.threads, safe.buffer_mib
        );
    }
    println!();
}

fn print_report(summary: &TransferSummary) {
    println!();
    println!(
        "{} copied ({}), {} skipped, {} failed in {:.1?}",
        summary.copied_files,
        HumanBytes(summary.bytes_copied),
        summary.skipped_files,
        summary.failed_files,
        summary.duration
    );
    if summary.verify_mismatches > 0 {
        println!("verification mismatches: {}", summary.verify_mismatches);
    }
    if summary.removed_sources > 0 {
        println!("sources removed: {}", summary.removed_sources);
    }
}
