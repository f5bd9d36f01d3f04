use std::time::Duration;

use serde::Serialize;

use crate::bench::BenchResult;

/// Summary of one run. Counts are computed after the worker pool has
/// fully drained, so they are consistent regardless of completion order.
#[derive(Debug, Default, Clone, Serialize)]
pub struct TransferSummary {
    pub planned_files: usize,
    pub total_bytes: u64,
    pub sample_files: usize,
    pub sample_bytes: u64,
    pub copied_files: u64,
    pub skipped_files: u64,
    pub failed_files: u64,
    pub bytes_copied: u64,
    pub verify_mismatches: usize,
    pub removed_sources: u64,
    pub bench: Vec<BenchResult>,
    pub dry_run: bool,
    /// True when the run stopped after the tuning phase (plain benchmark
    /// mode, or an interactive decline) with no copy work performed.
    pub benchmark_only: bool,
    pub duration: Duration,
}
