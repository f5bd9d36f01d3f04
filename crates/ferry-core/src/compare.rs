use std::path::Path;
use std::time::{Duration, SystemTime};

/// Modification-time slack tolerated when deciding a destination is
/// already current (FAT and network filesystems round mtimes to 2 s).
const MTIME_TOLERANCE: Duration = Duration::from_secs(2);

/// Update-mode check: the destination counts as current when it exists
/// with the same size and an mtime within [`MTIME_TOLERANCE`] of the
/// source's, in either direction. Any stat error means "not current" so
/// the caller falls through to a copy.
pub fn is_up_to_date(src_size: u64, src_mtime: SystemTime, dst: &Path) -> bool {
    let Ok(dst_meta) = dst.metadata() else {
        return false;
    };
    if dst_meta.len() != src_size {
        return false;
    }
    let Ok(dst_mtime) = dst_meta.modified() else {
        return false;
    };
    let delta = match src_mtime.duration_since(dst_mtime) {
        Ok(diff) => diff,
        Err(err) => err.duration(),
    };
    delta < MTIME_TOLERANCE
}
