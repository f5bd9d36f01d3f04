use std::fs;
use std::path::PathBuf;

use crate::logger::Logger;

/// Move cleanup: unlink the source of every pair that was actually
/// written. Sources of skipped or failed entries are never touched.
/// Unlink failures are logged and do not stop the remaining cleanups.
pub fn remove_copied_sources(pairs: &[(PathBuf, PathBuf)], logger: &dyn Logger) -> u64 {
    let mut removed = 0;
    for (src, _) in pairs {
        match fs::remove_file(src) {
            Ok(()) => removed += 1,
            Err(err) => logger.error("unlink", src, &err.to_string()),
        }
    }
    removed
}
