/// How the tuning phase runs, if at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TuneMode {
    /// No benchmark; copy with the configured parameters.
    Off,
    /// Measure the grid on the sample, report, and stop without copying.
    Benchmark,
    /// Measure the grid, then ask once whether to proceed with the safe
    /// settings. Declining stops before any copy work.
    BenchmarkAsk,
    /// Measure the grid and adopt the safe settings plus post-copy
    /// verification without asking.
    Auto,
}

/// Parameters for one transfer run. Fixed once the copy phase starts; the
/// tuning phase may overwrite threads/buffer/verify_after exactly once
/// before that, never afterward.
#[derive(Debug, Clone)]
pub struct TransferOptions {
    pub threads: usize,
    pub buffer_mib: usize,
    pub verify_inline: bool,
    pub verify_after: bool,
    pub update: bool,
    pub move_source: bool,
    pub dry_run: bool,
    pub tune: TuneMode,
}

impl Default for TransferOptions {
    fn default() -> Self {
        Self {
            threads: 1,
            buffer_mib: 1,
            verify_inline: false,
            verify_after: false,
            update: false,
            move_source: false,
            dry_run: false,
            tune: TuneMode::Off,
        }
    }
}
