use std::path::PathBuf;

use crate::checksum;
use crate::logger::Logger;
use crate::progress::ProgressSink;

/// Post-copy verification: re-read and re-hash both sides of every copied
/// pair, single-threaded, reusing no state from the copy pass. Mismatches
/// and unreadable files are logged and counted but never abort the pass.
pub fn verify_pairs(
    pairs: &[(PathBuf, PathBuf)],
    buffer_size: usize,
    progress: &dyn ProgressSink,
    logger: &dyn Logger,
) -> usize {
    progress.begin_files(pairs.len() as u64);
    let mut mismatches = 0;
    for (src, dst) in pairs {
        match (
            checksum::hash_file(src, buffer_size),
            checksum::hash_file(dst, buffer_size),
        ) {
            (Ok(a), Ok(b)) if a == b => {}
            (Ok(_), Ok(_)) => {
                mismatches += 1;
                logger.error(
                    "verify",
                    src,
                    &format!("digest mismatch against {}", dst.display()),
                );
            }
            (Err(err), _) | (_, Err(err)) => {
                mismatches += 1;
                logger.error("verify", src, &format!("{err:#}"));
            }
        }
        progress.advance(1);
    }
    progress.finish();
    mismatches
}
