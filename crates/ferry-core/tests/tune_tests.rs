use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use eyre::Result;
use ferry_core::bench::BenchResult;
use ferry_core::logger::NullLogger;
use ferry_core::orchestrator::{TransferOptions, TransferOrchestrator, TuneMode};
use ferry_core::progress::{NullProgress, ProgressSink};
use tempfile::tempdir;

fn write_file(path: &Path, contents: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

fn seeded_tree(root: &Path) {
    write_file(&root.join("a.bin"), &vec![3u8; 200_000]);
    write_file(&root.join("b.bin"), &vec![4u8; 100_000]);
}

#[derive(Default)]
struct PhaseProgress {
    file_phases: AtomicU64,
}

impl ProgressSink for PhaseProgress {
    fn begin_bytes(&self, _total: u64) {}
    fn begin_files(&self, _total: u64) {
        self.file_phases.fetch_add(1, Ordering::Relaxed);
    }
    fn advance(&self, _n: u64) {}
    fn finish(&self) {}
}

#[test]
fn plain_benchmark_reports_the_grid_and_copies_nothing() -> Result<()> {
    let temp = tempdir()?;
    let src = temp.path().join("src");
    let dest = temp.path().join("dest");
    seeded_tree(&src);

    let summary = TransferOrchestrator::new().execute(
        &src,
        &dest,
        TransferOptions {
            tune: TuneMode::Benchmark,
            ..Default::default()
        },
        &NullProgress,
        &|_, _| panic!("plain benchmark must not prompt"),
        &NullLogger,
    )?;

    assert!(summary.benchmark_only);
    assert_eq!(summary.bench.len(), 6);
    assert_eq!(summary.copied_files, 0);
    assert!(!dest.exists());
    Ok(())
}

#[test]
fn declined_ask_stops_before_any_copy_work() -> Result<()> {
    let temp = tempdir()?;
    let src = temp.path().join("src");
    let dest = temp.path().join("dest");
    seeded_tree(&src);

    let prompts = AtomicU64::new(0);
    let summary = TransferOrchestrator::new().execute(
        &src,
        &dest,
        TransferOptions {
            tune: TuneMode::BenchmarkAsk,
            ..Default::default()
        },
        &NullProgress,
        &|results: &[BenchResult], safe: &BenchResult| {
            prompts.fetch_add(1, Ordering::Relaxed);
            assert_eq!(results.len(), 6);
            // The safe pick sits on the moderate point of the full grid.
            assert_eq!((safe.threads, safe.buffer_mib), (2, 2));
            false
        },
        &NullLogger,
    )?;

    assert_eq!(prompts.load(Ordering::Relaxed), 1);
    assert!(summary.benchmark_only);
    assert_eq!(summary.copied_files, 0);
    assert!(!dest.exists());
    Ok(())
}

#[test]
fn accepted_ask_copies_with_the_safe_settings() -> Result<()> {
    let temp = tempdir()?;
    let src = temp.path().join("src");
    let dest = temp.path().join("dest");
    seeded_tree(&src);

    let progress = PhaseProgress::default();
    let summary = TransferOrchestrator::new().execute(
        &src,
        &dest,
        TransferOptions {
            tune: TuneMode::BenchmarkAsk,
            ..Default::default()
        },
        &progress,
        &|_, _| true,
        &NullLogger,
    )?;

    assert!(!summary.benchmark_only);
    assert_eq!(summary.copied_files, 2);
    // Accepting the safe settings forces the post-copy verification pass.
    assert_eq!(progress.file_phases.load(Ordering::Relaxed), 1);
    assert_eq!(summary.verify_mismatches, 0);
    Ok(())
}

#[test]
fn auto_mode_adopts_safe_settings_without_prompting() -> Result<()> {
    let temp = tempdir()?;
    let src = temp.path().join("src");
    let dest = temp.path().join("dest");
    seeded_tree(&src);

    let progress = PhaseProgress::default();
    let summary = TransferOrchestrator::new().execute(
        &src,
        &dest,
        TransferOptions {
            tune: TuneMode::Auto,
            ..Default::default()
        },
        &progress,
        &|_, _| panic!("auto mode must not prompt"),
        &NullLogger,
    )?;

    assert!(!summary.benchmark_only);
    assert_eq!(summary.bench.len(), 6);
    assert_eq!(summary.copied_files, 2);
    assert!(dest.join("a.bin").exists());
    // Verify-after is forced on by adoption.
    assert_eq!(progress.file_phases.load(Ordering::Relaxed), 1);
    Ok(())
}
