//! Throughput probing over the sampled file set

use std::fs::File;
use std::io::Read;
use std::time::Instant;

use eyre::{Context, Result};
use serde::Serialize;

use crate::checksum;
use crate::enumeration::FileEntry;
use crate::logger::Logger;

/// Thread counts probed by the tuning grid.
pub const THREAD_GRID: [usize; 3] = [1, 2, 4];
/// Buffer sizes probed by the tuning grid, in MiB.
pub const BUFFER_GRID_MIB: [usize; 2] = [1, 2];

const MIB: usize = 1024 * 1024;

/// Measured throughput for one grid combination.
#[derive(Debug, Clone, Serialize)]
pub struct BenchResult {
    pub threads: usize,
    pub buffer_mib: usize,
    pub mbps: f64,
}

/// Sweep the sample once per grid combination and record MB/s for each.
///
/// Each sweep reads the whole sample sequentially at the combination's
/// buffer size, discarding the data (plus one digest per file when
/// `verify` is set). The thread count is carried as a label for the
/// recommendation; it is not applied to the read loop. A failed sweep is
/// logged and recorded as 0 MB/s so the grid stays complete.
pub fn run_grid(sample: &[FileEntry], verify: bool, logger: &dyn Logger) -> Vec<BenchResult> {
    let mut results = Vec::with_capacity(THREAD_GRID.len() * BUFFER_GRID_MIB.len());
    for &threads in &THREAD_GRID {
        for &buffer_mib in &BUFFER_GRID_MIB {
            let mbps = match sweep(sample, buffer_mib * MIB, verify) {
                Ok(mbps) => mbps,
                Err(err) => {
                    logger.warn(&format!(
                        "sweep failed at threads={threads} buffer={buffer_mib}MiB: {err:#}"
                    ));
                    0.0
                }
            };
            results.push(BenchResult {
                threads,
                buffer_mib,
                mbps,
            });
        }
    }
    results
}

fn sweep(sample: &[FileEntry], buffer_size: usize, verify: bool) -> Result<f64> {
    let start = Instant::now();
    let mut total: u64 = 0;
    let mut buf = vec![0u8; buffer_size];
    for entry in sample {
        let mut file =
            File::open(&entry.path).with_context(|| format!("open {}", entry.path.display()))?;
        loop {
            let n = file.read(&mut buf)?;
            if n == 0 {
                break;
            }
        }
        if verify {
            checksum::hash_file(&entry.path, buffer_size)?;
        }
        total += entry.size;
    }
    let elapsed = start.elapsed().as_secs_f64();
    if elapsed > 0.0 {
        Ok(total as f64 / MIB as f64 / elapsed)
    } else {
        Ok(0.0)
    }
}

/// Highest measured throughput; ties keep the first grid entry seen.
pub fn fastest(results: &[BenchResult]) -> Option<&BenchResult> {
    let mut best: Option<&BenchResult> = None;
    for result in results {
        if best.is_none_or(|b| result.mbps > b.mbps) {
            best = Some(result);
        }
    }
    best
}

/// Combination closest to (2 threads, 2 MiB) by Manhattan distance; ties
/// keep the first grid entry seen. The conservative pick for auto mode.
pub fn safest(results: &[BenchResult]) -> Option<&BenchResult> {
    let mut best: Option<(&BenchResult, usize)> = None;
    for result in results {
        let dist = result.threads.abs_diff(2) + result.buffer_mib.abs_diff(2);
        if best.is_none_or(|(_, d)| dist < d) {
            best = Some((result, dist));
        }
    }
    best.map(|(result, _)| result)
}
