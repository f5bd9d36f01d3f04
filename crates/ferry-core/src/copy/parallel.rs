use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use eyre::{Context, Result};
use parking_lot::Mutex;
use rayon::prelude::*;

use crate::enumeration::FileEntry;
use crate::logger::Logger;
use crate::progress::ProgressSink;

use super::file_copy::copy_file;
use super::stats::{CopyOutcome, CopyStats};

/// Per-run knobs the pool hands to every task.
#[derive(Debug, Clone, Copy)]
pub struct PoolOptions {
    pub threads: usize,
    pub buffer_size: usize,
    pub update: bool,
    pub verify_inline: bool,
}

/// Drive one transfer task per entry on a pool bounded to
/// `options.threads`. Tasks are independent; the shared state is the
/// progress sink plus the tallies below, and the mutexes are held only
/// for a push, never across I/O. The pool drains fully before returning.
pub fn parallel_copy_files(
    entries: &[FileEntry],
    src_root: &Path,
    dest_root: &Path,
    options: PoolOptions,
    progress: &dyn ProgressSink,
    logger: &dyn Logger,
) -> Result<CopyStats> {
    struct ConcurrentStats {
        copied: AtomicU64,
        skipped: AtomicU64,
        failed: AtomicU64,
        bytes: AtomicU64,
        pairs: Mutex<Vec<(PathBuf, PathBuf)>>,
        errors: Mutex<Vec<String>>,
    }

    let stats = ConcurrentStats {
        copied: AtomicU64::new(0),
        skipped: AtomicU64::new(0),
        failed: AtomicU64::new(0),
        bytes: AtomicU64::new(0),
        pairs: Mutex::new(Vec::new()),
        errors: Mutex::new(Vec::new()),
    };

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.threads.max(1))
        .build()
        .context("build copy worker pool")?;

    pool.install(|| {
        entries.par_iter().for_each(|entry| {
            let dst = match entry.path.strip_prefix(src_root) {
                Ok(rel) => dest_root.join(rel),
                Err(err) => {
                    stats.failed.fetch_add(1, Ordering::Relaxed);
                    stats
                        .errors
                        .lock()
                        .push(format!("{}: {err}", entry.path.display()));
                    logger.error("project", &entry.path, &err.to_string());
                    return;
                }
            };
            match copy_file(
                &entry.path,
                entry.size,
                &dst,
                options.buffer_size,
                options.update,
                options.verify_inline,
                progress,
                logger,
            ) {
                CopyOutcome::Copied => {
                    stats.copied.fetch_add(1, Ordering::Relaxed);
                    stats.bytes.fetch_add(entry.size, Ordering::Relaxed);
                    stats.pairs.lock().push((entry.path.clone(), dst));
                }
                CopyOutcome::Skipped => {
                    stats.skipped.fetch_add(1, Ordering::Relaxed);
                }
                CopyOutcome::Failed => {
                    stats.failed.fetch_add(1, Ordering::Relaxed);
                    stats
                        .errors
                        .lock()
                        .push(format!("copy failed: {}", entry.path.display()));
                }
            }
        });
    });

    Ok(CopyStats {
        copied_files: stats.copied.load(Ordering::Relaxed),
        skipped_files: stats.skipped.load(Ordering::Relaxed),
        failed_files: stats.failed.load(Ordering::Relaxed),
        bytes_copied: stats.bytes.load(Ordering::Relaxed),
        copied_pairs: stats.pairs.into_inner(),
        errors: stats.errors.into_inner(),
    })
}
