use std::path::Path;
use std::time::Instant;

use eyre::{eyre, Result};

use crate::bench::{self, BenchResult};
use crate::copy::{parallel_copy_files, PoolOptions};
use crate::delete;
use crate::enumeration;
use crate::logger::Logger;
use crate::progress::ProgressSink;
use crate::sample;
use crate::verify;

use super::options::{TransferOptions, TuneMode};
use super::summary::TransferSummary;

const MIB: usize = 1024 * 1024;

/// Sequences the transfer phases: scan, optional dry-run exit, optional
/// tuning, copy, optional post-copy verification, optional move cleanup.
pub struct TransferOrchestrator;

impl TransferOrchestrator {
    pub fn new() -> Self {
        Self
    }

    /// Run one transfer. `confirm` is consulted at most once, only in
    /// [`TuneMode::BenchmarkAsk`], with the full grid and the safe pick;
    /// a `false` return stops the run before any copy work.
    pub fn execute(
        &self,
        src_root: &Path,
        dest_root: &Path,
        mut options: TransferOptions,
        progress: &dyn ProgressSink,
        confirm: &dyn Fn(&[BenchResult], &BenchResult) -> bool,
        logger: &dyn Logger,
    ) -> Result<TransferSummary> {
        check_roots(src_root, dest_root)?;

        let start = Instant::now();
        let mut summary = TransferSummary::default();

        // ---- scan ----
        let entries = enumeration::enumerate_source(src_root, logger);
        summary.planned_files = entries.len();
        summary.total_bytes = entries.iter().map(|e| e.size).sum();

        let (sample, sample_bytes) = sample::take_sample(&entries);
        summary.sample_files = sample.len();
        summary.sample_bytes = sample_bytes;

        if options.dry_run {
            summary.dry_run = true;
            summary.duration = start.elapsed();
            return Ok(summary);
        }

        // ---- tune ----
        if options.tune != TuneMode::Off {
            logger.info(&format!(
                "benchmarking {} sampled files ({} bytes)",
                summary.sample_files, summary.sample_bytes
            ));
            let results = bench::run_grid(&sample, options.verify_inline, logger);
            summary.bench = results.clone();

            let adopted = match options.tune {
                TuneMode::Benchmark => {
                    summary.benchmark_only = true;
                    summary.duration = start.elapsed();
                    return Ok(summary);
                }
                TuneMode::BenchmarkAsk => match bench::safest(&results) {
                    Some(safe) if confirm(&results, safe) => Some(safe.clone()),
                    _ => {
                        summary.benchmark_only = true;
                        summary.duration = start.elapsed();
                        return Ok(summary);
                    }
                },
                TuneMode::Auto => bench::safest(&results).cloned(),
                TuneMode::Off => unreachable!(),
            };

            if let Some(safe) = adopted {
                logger.info(&format!(
                    "adopting safe settings: threads={} buffer={}MiB, verify-after on",
                    safe.threads, safe.buffer_mib
                ));
                options.threads = safe.threads;
                options.buffer_mib = safe.buffer_mib;
                options.verify_after = true;
            }
        }

        // ---- copy ----
        let buffer_size = options.buffer_mib.max(1) * MIB;
        log::debug!(
            "copy phase: {} files, {} workers, {buffer_size}-byte buffers",
            summary.planned_files,
            options.threads
        );
        progress.begin_bytes(summary.total_bytes);
        let stats = parallel_copy_files(
            &entries,
            src_root,
            dest_root,
            PoolOptions {
                threads: options.threads,
                buffer_size,
                update: options.update,
                verify_inline: options.verify_inline,
            },
            progress,
            logger,
        )?;
        progress.finish();

        summary.copied_files = stats.copied_files;
        summary.skipped_files = stats.skipped_files;
        summary.failed_files = stats.failed_files;
        summary.bytes_copied = stats.bytes_copied;

        // ---- verify after ----
        if options.verify_after {
            logger.info(&format!(
                "verifying {} copied files",
                stats.copied_pairs.len()
            ));
            summary.verify_mismatches =
                verify::verify_pairs(&stats.copied_pairs, buffer_size, progress, logger);
        }

        // ---- move cleanup ----
        if options.move_source {
            summary.removed_sources = delete::remove_copied_sources(&stats.copied_pairs, logger);
        }

        summary.duration = start.elapsed();
        logger.info(&format!(
            "done: {} copied, {} skipped, {} failed",
            summary.copied_files, summary.skipped_files, summary.failed_files
        ));
        Ok(summary)
    }
}

impl Default for TransferOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

/// Fatal preconditions, checked before any work begins. Everything past
/// this point is isolated per file and aggregated into the summary.
fn check_roots(src_root: &Path, dest_root: &Path) -> Result<()> {
    if !src_root.is_dir() {
        return Err(eyre!(
            "source is not an accessible directory: {}",
            src_root.display()
        ));
    }
    if dest_root.starts_with(src_root) {
        return Err(eyre!(
            "destination cannot be inside the source directory: {}",
            dest_root.display()
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn destination_inside_source_is_rejected() {
        let temp = tempfile::tempdir().unwrap();
        let src = temp.path().join("src");
        std::fs::create_dir_all(&src).unwrap();

        assert!(check_roots(&src, &src.join("nested/dest")).is_err());
        assert!(check_roots(&src, &src).is_err());
        assert!(check_roots(&src, &temp.path().join("dest")).is_ok());
    }

    #[test]
    fn missing_source_is_rejected() {
        let temp = tempfile::tempdir().unwrap();
        assert!(check_roots(&temp.path().join("absent"), temp.path()).is_err());
    }
}
