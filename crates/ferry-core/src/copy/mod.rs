mod file_copy;
mod parallel;
mod stats;

pub use file_copy::{copy_file, temp_path, TMP_SUFFIX};
pub use parallel::{parallel_copy_files, PoolOptions};
pub use stats::{CopyOutcome, CopyStats};
