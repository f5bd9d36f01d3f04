use std::path::PathBuf;

/// Final disposition of one transfer task. Exactly one per enumerated
/// file, never ambiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied,
    Skipped,
    Failed,
}

/// Aggregated result of a copy phase.
#[derive(Debug, Default, Clone)]
pub struct CopyStats {
    pub copied_files: u64,
    pub skipped_files: u64,
    pub failed_files: u64,
    pub bytes_copied: u64,
    /// Source/destination pairs for files that were actually written.
    /// Skipped entries are deliberately absent: they never feed post-copy
    /// verification or move cleanup.
    pub copied_pairs: Vec<(PathBuf, PathBuf)>,
    pub errors: Vec<String>,
}
