/// Byte/item progress consumer. Workers call `advance` concurrently; the
/// engine performs its own aggregation, so implementations only need to
/// tolerate overlapping increments.
pub trait ProgressSink: Send + Sync {
    /// Start a byte-counted phase (the copy pass).
    fn begin_bytes(&self, total: u64);
    /// Start an item-counted phase (the post-copy verification pass).
    fn begin_files(&self, total: u64);
    fn advance(&self, n: u64);
    fn finish(&self);
}

/// Sink that ignores all progress.
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn begin_bytes(&self, _total: u64) {}
    fn begin_files(&self, _total: u64) {}
    fn advance(&self, _n: u64) {}
    fn finish(&self) {}
}
